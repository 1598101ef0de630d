// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller configuration: class-name scheme, confirmation delay and creation modes.
//!
//! Configuration is a plain value handed to
//! [`TimeCreation::new`](crate::controller::TimeCreation::new). Every field has a
//! default, so hosts can deserialize a partial table from their own settings:
//!
//! ```
//! use understory_time_creation::config::TimeCreationConfig;
//!
//! let config: TimeCreationConfig = serde_json::from_str(
//!     r#"{ "class_names": { "prefix": "cal-" }, "double_click_creation": true }"#,
//! ).unwrap();
//!
//! assert_eq!(config.class_names.classname("time-date"), "cal-time-date");
//! assert_eq!(config.click_delay, 0);
//! assert!(config.drag_creation);
//!
//! let matcher = config.class_names.compile().unwrap();
//! assert_eq!(matcher.column_id("cal-time-date cal-time-date-4"), Some("4"));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default click confirmation delay, in host ticks.
///
/// Zero does not mean "synchronous": the confirmation still runs on a later
/// scheduler turn, after any drag signal dispatched by the same gesture.
pub const CLICK_DELAY: u64 = 0;

/// Default length of a schedule created by a click, in minutes.
pub const DEFAULT_NEW_SCHEDULE_MINUTES: u32 = 30;

/// Placeholder substituted with the escaped prefix in [`ClassNames::column_id_pattern`].
pub const PREFIX_PLACEHOLDER: &str = "{prefix}";

/// Naming scheme used to recognize time-grid column elements from their class strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Prefix prepended to every bare class name.
    pub prefix: String,
    /// Bare class name of the decorative wrapper inside a column.
    pub schedule_block_wrap: String,
    /// Regular expression matched against a column's class string. Capture group 1
    /// is the column id. `{prefix}` is replaced with the escaped [`prefix`](Self::prefix).
    pub column_id_pattern: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            schedule_block_wrap: "time-date-schedule-block-wrap".to_owned(),
            column_id_pattern: r"^{prefix}time-date\s.*?{prefix}time-date-(\d+)".to_owned(),
        }
    }
}

impl ClassNames {
    /// Default scheme with a different prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Prefixes a bare class name.
    #[must_use]
    pub fn classname(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// The column id pattern with the prefix substituted.
    #[must_use]
    pub fn expanded_pattern(&self) -> String {
        self.column_id_pattern
            .replace(PREFIX_PLACEHOLDER, &regex::escape(&self.prefix))
    }

    /// Compiles the scheme into a [`ColumnMatcher`].
    pub fn compile(&self) -> ConfigResult<ColumnMatcher> {
        let pattern = self.expanded_pattern();
        let column_id = Regex::new(&pattern)?;
        if column_id.captures_len() < 2 {
            return Err(ConfigError::MissingCaptureGroup { pattern });
        }
        Ok(ColumnMatcher {
            block_wrap: self.classname(&self.schedule_block_wrap),
            column_id,
        })
    }
}

/// Compiled form of [`ClassNames`].
#[derive(Clone, Debug)]
pub struct ColumnMatcher {
    block_wrap: String,
    column_id: Regex,
}

impl ColumnMatcher {
    /// Returns `true` if `class` is exactly the decorative wrapper class.
    #[must_use]
    pub fn is_block_wrap(&self, class: &str) -> bool {
        class == self.block_wrap
    }

    /// Extracts the column id from a class string.
    ///
    /// Returns `None` when the pattern does not match or the id group is empty.
    #[must_use]
    pub fn column_id<'a>(&self, class: &'a str) -> Option<&'a str> {
        self.column_id
            .captures(class)?
            .get(1)
            .map(|m| m.as_str())
            .filter(|id| !id.is_empty())
    }

    /// The compiled column id pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.column_id.as_str()
    }
}

/// Settings for [`TimeCreation`](crate::controller::TimeCreation).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeCreationConfig {
    /// Class-name scheme for recognizing columns.
    pub class_names: ClassNames,
    /// Delay between a candidate click and its confirmation, in scheduler ticks.
    pub click_delay: u64,
    /// Create duration entries from press-drag-release gestures.
    pub drag_creation: bool,
    /// Create entries immediately on a double click in the grid container.
    pub double_click_creation: bool,
    /// Length of a schedule created by a click, and the padding added to a dragged range.
    pub new_schedule_minutes: u32,
}

impl Default for TimeCreationConfig {
    fn default() -> Self {
        Self {
            class_names: ClassNames::default(),
            click_delay: CLICK_DELAY,
            drag_creation: true,
            double_click_creation: false,
            new_schedule_minutes: DEFAULT_NEW_SCHEDULE_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scheme_extracts_numeric_ids() {
        let matcher = ClassNames::default().compile().unwrap();
        assert_eq!(matcher.column_id("time-date time-date-3"), Some("3"));
        assert_eq!(matcher.column_id("time-date time-date-last time-date-12"), Some("12"));
        assert_eq!(matcher.column_id("time-date-3"), None);
        assert_eq!(matcher.column_id("something-else"), None);
        assert_eq!(matcher.column_id(""), None);
    }

    #[test]
    fn prefix_is_escaped_and_applied() {
        let names = ClassNames::with_prefix("tui.cal-");
        let matcher = names.compile().unwrap();
        assert_eq!(
            matcher.column_id("tui.cal-time-date tui.cal-time-date-7"),
            Some("7")
        );
        // `.` in the prefix is literal.
        assert_eq!(matcher.column_id("tuixcal-time-date tuixcal-time-date-7"), None);
        assert!(matcher.is_block_wrap("tui.cal-time-date-schedule-block-wrap"));
        assert!(!matcher.is_block_wrap("time-date-schedule-block-wrap"));
    }

    #[test]
    fn wrapper_detection_is_exact() {
        let matcher = ClassNames::default().compile().unwrap();
        assert!(matcher.is_block_wrap("time-date-schedule-block-wrap"));
        assert!(!matcher.is_block_wrap("time-date-schedule-block-wrap extra"));
    }

    #[test]
    fn custom_pattern_without_group_is_rejected() {
        let names = ClassNames {
            column_id_pattern: r"^column-\d+$".to_owned(),
            ..ClassNames::default()
        };
        assert!(matches!(
            names.compile(),
            Err(ConfigError::MissingCaptureGroup { .. })
        ));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let names = ClassNames {
            column_id_pattern: r"(unclosed".to_owned(),
            ..ClassNames::default()
        };
        assert!(matches!(names.compile(), Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn empty_capture_is_not_an_id() {
        let names = ClassNames {
            column_id_pattern: r"^col-(\w*)$".to_owned(),
            ..ClassNames::default()
        };
        let matcher = names.compile().unwrap();
        assert_eq!(matcher.column_id("col-"), None);
        assert_eq!(matcher.column_id("col-a"), Some("a"));
    }

    #[test]
    fn config_loads_from_partial_toml() {
        let config: TimeCreationConfig = toml::from_str(
            r#"
            click_delay = 5
            new_schedule_minutes = 60

            [class_names]
            prefix = "tui-full-calendar-"
            "#,
        )
        .unwrap();

        assert_eq!(config.click_delay, 5);
        assert_eq!(config.new_schedule_minutes, 60);
        assert!(config.drag_creation);
        assert!(!config.double_click_creation);
        assert_eq!(
            config.class_names.schedule_block_wrap,
            "time-date-schedule-block-wrap"
        );
        assert_eq!(
            config.class_names.classname("time-date"),
            "tui-full-calendar-time-date"
        );
    }
}
