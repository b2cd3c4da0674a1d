use super::Tracker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerCategory {
    pub title: String,
    pub trackers: Vec<Tracker>,
}

impl TrackerCategory {
    pub fn new(title: &str, trackers: Vec<Tracker>) -> Self {
        Self {
            title: title.to_string(),
            trackers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

/// Sort categories for display: the pinned pseudo-category first, then by title.
pub fn sort_for_display(categories: &mut [TrackerCategory], pinned_title: &str) {
    categories.sort_by(|a, b| {
        let a_pinned = a.title == pinned_title;
        let b_pinned = b.title == pinned_title;
        b_pinned.cmp(&a_pinned).then_with(|| a.title.cmp(&b.title))
    });
}

/// Group trackers into display categories.
///
/// Pinned trackers go to `pinned_title` (only created when non-empty).
/// Everything else goes to its `original_category`, or `default_title` when
/// it has none. `extra_titles` are user-created categories that are listed
/// even with no trackers yet. Tracker order within a category follows the
/// input order.
pub fn group_into_categories<'a>(
    trackers: impl IntoIterator<Item = &'a Tracker>,
    extra_titles: impl IntoIterator<Item = &'a str>,
    pinned_title: &str,
    default_title: &str,
) -> Vec<TrackerCategory> {
    let mut pinned = Vec::new();
    let mut by_title: BTreeMap<String, Vec<Tracker>> = extra_titles
        .into_iter()
        .filter(|title| *title != pinned_title)
        .map(|title| (title.to_string(), Vec::new()))
        .collect();

    for tracker in trackers {
        if tracker.is_pinned {
            pinned.push(tracker.clone());
        } else {
            by_title
                .entry(tracker.category_or(default_title).to_string())
                .or_default()
                .push(tracker.clone());
        }
    }

    let mut categories: Vec<TrackerCategory> = by_title
        .into_iter()
        .map(|(title, trackers)| TrackerCategory { title, trackers })
        .collect();

    if !pinned.is_empty() {
        categories.push(TrackerCategory::new(pinned_title, pinned));
    }

    sort_for_display(&mut categories, pinned_title);
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Weekday;

    fn titles(categories: &[TrackerCategory]) -> Vec<&str> {
        categories.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_pinned_first_then_alphabetical() {
        let run = Tracker::habit("Run", "#111111", "🏃", Weekday::ALL, "Sport");
        let read = Tracker::habit("Read", "#222222", "📚", Weekday::ALL, "Mind");
        let water = Tracker::habit("Water", "#333333", "💧", Weekday::ALL, "Health").pinned("Health");

        let categories = group_into_categories([&run, &read, &water], Vec::<&str>::new(), "Pinned", "Important");

        assert_eq!(titles(&categories), vec!["Pinned", "Mind", "Sport"]);
        assert_eq!(categories[0].trackers, vec![water]);
    }

    #[test]
    fn test_pinned_category_omitted_when_empty() {
        let run = Tracker::habit("Run", "#111111", "🏃", Weekday::ALL, "Sport");
        let categories = group_into_categories([&run], Vec::<&str>::new(), "Pinned", "Important");
        assert_eq!(titles(&categories), vec!["Sport"]);
    }

    #[test]
    fn test_missing_category_uses_default() {
        let mut run = Tracker::habit("Run", "#111111", "🏃", Weekday::ALL, "Sport");
        run.original_category = None;
        let categories = group_into_categories([&run], Vec::<&str>::new(), "Pinned", "Important");
        assert_eq!(titles(&categories), vec!["Important"]);
    }

    #[test]
    fn test_extra_titles_listed_empty() {
        let categories = group_into_categories(Vec::<&Tracker>::new(), ["Work", "Pinned"], "Pinned", "Important");
        assert_eq!(titles(&categories), vec!["Work"]);
        assert!(categories[0].is_empty());
    }

    #[test]
    fn test_sort_for_display_is_case_sensitive_by_title() {
        let mut categories = vec![
            TrackerCategory::new("b", vec![]),
            TrackerCategory::new("Pinned", vec![]),
            TrackerCategory::new("A", vec![]),
        ];
        sort_for_display(&mut categories, "Pinned");
        assert_eq!(titles(&categories), vec!["Pinned", "A", "b"]);
    }
}
