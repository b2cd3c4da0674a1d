use crate::constants::{MAX_CATEGORY_TITLE_LEN, MAX_TRACKER_TITLE_LEN};
use crate::error::AppError;
use crate::models::Tracker;

fn validate_title<'a>(field: &'static str, title: &'a str, max_len: usize) -> Result<&'a str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput {
            field,
            reason: "cannot be empty".into(),
        });
    }
    if title.chars().count() > max_len {
        return Err(AppError::InvalidInput {
            field,
            reason: format!("cannot exceed {max_len} characters"),
        });
    }
    Ok(title)
}

/// Validate tracker title. Returns the trimmed title.
pub fn validate_tracker_title(title: &str) -> Result<&str, AppError> {
    validate_title("title", title, MAX_TRACKER_TITLE_LEN)
}

/// Validate category title. Returns the trimmed title.
pub fn validate_category_title(title: &str) -> Result<&str, AppError> {
    validate_title("category", title, MAX_CATEGORY_TITLE_LEN)
}

/// Validate color format (`#RRGGBB`).
pub fn validate_color(color: &str) -> Result<(), AppError> {
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(AppError::InvalidInput {
            field: "color",
            reason: format!("'{color}' is not in #RRGGBB format"),
        });
    }
    Ok(())
}

pub fn validate_emoji(emoji: &str) -> Result<(), AppError> {
    if emoji.trim().is_empty() {
        return Err(AppError::InvalidInput {
            field: "emoji",
            reason: "cannot be empty".into(),
        });
    }
    Ok(())
}

/// Check every user-supplied field of a tracker. Returns it with the title
/// and category trimmed.
pub fn validate_tracker(tracker: Tracker) -> Result<Tracker, AppError> {
    let title = validate_tracker_title(&tracker.title)?.to_string();
    validate_color(&tracker.color)?;
    validate_emoji(&tracker.emoji)?;
    let original_category = tracker
        .original_category
        .as_deref()
        .map(validate_category_title)
        .transpose()?
        .map(str::to_string);

    Ok(Tracker {
        title,
        original_category,
        ..tracker
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Weekday;

    #[test]
    fn test_validate_tracker_title_trims() {
        assert_eq!(validate_tracker_title("  Run  ").unwrap(), "Run");
    }

    #[test]
    fn test_validate_tracker_title_empty() {
        assert!(validate_tracker_title("").is_err());
        assert!(validate_tracker_title("   ").is_err());
    }

    #[test]
    fn test_validate_tracker_title_length_counts_characters() {
        let at_limit = "я".repeat(MAX_TRACKER_TITLE_LEN);
        assert!(validate_tracker_title(&at_limit).is_ok());

        let too_long = "a".repeat(MAX_TRACKER_TITLE_LEN + 1);
        let err = validate_tracker_title(&too_long).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { field: "title", .. }));
    }

    #[test]
    fn test_validate_category_title() {
        assert_eq!(validate_category_title(" Health ").unwrap(), "Health");
        assert!(validate_category_title("").is_err());
        assert!(validate_category_title(&"x".repeat(MAX_CATEGORY_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_color_valid() {
        assert!(validate_color("#FF5733").is_ok());
        assert!(validate_color("#ff5733").is_ok());
        assert!(validate_color("#000000").is_ok());
    }

    #[test]
    fn test_validate_color_invalid() {
        assert!(validate_color("FF5733").is_err());
        assert!(validate_color("#FFF").is_err());
        assert!(validate_color("#GGGGGG").is_err());
        assert!(validate_color("#FF57331").is_err());
        assert!(validate_color("").is_err());
    }

    #[test]
    fn test_validate_emoji() {
        assert!(validate_emoji("🔥").is_ok());
        assert!(validate_emoji("").is_err());
        assert!(validate_emoji(" ").is_err());
    }

    #[test]
    fn test_validate_tracker_normalizes_strings() {
        let t = Tracker::habit("  Run ", "#00AA00", "🏃", Weekday::ALL, " Sport ");
        let valid = validate_tracker(t.clone()).unwrap();
        assert_eq!(valid.title, "Run");
        assert_eq!(valid.original_category.as_deref(), Some("Sport"));
        assert_eq!(valid.id, t.id);
    }

    #[test]
    fn test_validate_tracker_reports_first_bad_field() {
        let t = Tracker::habit("Run", "green", "🏃", Weekday::ALL, "Sport");
        let err = validate_tracker(t).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { field: "color", .. }));
    }
}
