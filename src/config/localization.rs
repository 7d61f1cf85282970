//! User-facing strings, overridable through `[localization]`.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_DATE_FORMAT: &str = "%a %d %b, %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatLocalization {
    pub common_share: String,
    pub common_copy: String,
    pub common_open: String,
    /// Header of the multi-attachment container; `{count}` is substituted.
    pub attachments_title: String,
    pub survey_default_title: String,
    pub custom_default_title: String,
    /// `chrono` format string for date headers.
    pub date_format: String,
}

impl Default for ChatLocalization {
    fn default() -> Self {
        Self {
            common_share: "Share".to_string(),
            common_copy: "Copy".to_string(),
            common_open: "Open".to_string(),
            attachments_title: "{count} attachments".to_string(),
            survey_default_title: "Rate your experience".to_string(),
            custom_default_title: "Custom content".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ChatLocalization {
    pub fn attachments(&self, count: usize) -> String {
        self.attachments_title.replace("{count}", &count.to_string())
    }

    /// Whether `date_format` is a format string `chrono` accepts.
    pub fn has_valid_date_format(&self) -> bool {
        StrftimeItems::new(&self.date_format).all(|item| !matches!(item, Item::Error))
    }

    /// Restore the default date format if the configured one is unusable.
    pub fn sanitize_date_format(&mut self) {
        if !self.has_valid_date_format() {
            tracing::warn!(
                "Invalid date_format {:?}, using {:?}",
                self.date_format,
                DEFAULT_DATE_FORMAT
            );
            self.date_format = DEFAULT_DATE_FORMAT.to_string();
        }
    }

    /// Date header text; falls back to the default format instead of
    /// failing on a bad one.
    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", date.format(DEFAULT_DATE_FORMAT));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachments_substitution() {
        let loc = ChatLocalization::default();
        assert_eq!(loc.attachments(3), "3 attachments");

        let custom = ChatLocalization {
            attachments_title: "Pièces jointes : {count}".to_string(),
            ..ChatLocalization::default()
        };
        assert_eq!(custom.attachments(2), "Pièces jointes : 2");
    }

    #[test]
    fn test_bad_date_format_falls_back() {
        let date = DateTime::parse_from_rfc3339("2024-03-01T09:15:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut loc = ChatLocalization {
            date_format: "%Q".to_string(),
            ..ChatLocalization::default()
        };
        assert!(!loc.has_valid_date_format());
        assert_eq!(loc.format_date(&date), "Fri 01 Mar, 09:15");

        loc.sanitize_date_format();
        assert_eq!(loc, ChatLocalization::default());

        loc.date_format = "%Y-%m-%d".to_string();
        assert!(loc.has_valid_date_format());
        assert_eq!(loc.format_date(&date), "2024-03-01");
    }
}
