//! Per-maneuver notification progress

use std::fmt;

use serde::{Deserialize, Serialize};

/// How many of the two notifications have been pronounced for the current
/// maneuver.
///
/// Only ever advances `Nothing → First → Second`; a new maneuver index or an
/// explicit reset puts it back to `Nothing`. Ordered by that sequence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NotificationProgress {
    #[default]
    Nothing,
    First,
    Second,
}

impl NotificationProgress {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationProgress::Nothing => "Nothing",
            NotificationProgress::First => "First",
            NotificationProgress::Second => "Second",
        }
    }
}

impl fmt::Display for NotificationProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(NotificationProgress::Nothing.to_string(), "Nothing");
        assert_eq!(NotificationProgress::First.to_string(), "First");
        assert_eq!(NotificationProgress::Second.to_string(), "Second");
        assert_eq!(NotificationProgress::default(), NotificationProgress::Nothing);
    }
}
