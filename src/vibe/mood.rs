//! Keyword-based mood classification
//!
//! A fixed ordered rule list, checked first-match-wins against the
//! lower-cased summary text. Alert keywords are checked before Active
//! keywords, so text containing both maps to Alert.

use serde::Serialize;
use std::fmt;

/// Coarse mood label derived from the generated summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoodLabel {
    Alert,
    Active,
    Calm,
}

impl MoodLabel {
    /// Short caption shown next to the mood metric
    pub fn caption(&self) -> &'static str {
        match self {
            Self::Alert => "High activity",
            Self::Active => "Lively",
            Self::Calm => "Peaceful",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alert => write!(f, "Alert"),
            Self::Active => write!(f, "Active"),
            Self::Calm => write!(f, "Calm"),
        }
    }
}

/// Ordered (keyword set, label) rules; earlier tiers win
const MOOD_RULES: &[(&[&str], MoodLabel)] = &[
    (&["chaotic", "alert", "heavy traffic"], MoodLabel::Alert),
    (&["busy", "buzzing", "active"], MoodLabel::Active),
];

/// Classify summary text into a mood label
pub fn classify(text: &str) -> MoodLabel {
    let lower = text.to_lowercase();

    for (keywords, label) in MOOD_RULES {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return *label;
        }
    }

    MoodLabel::Calm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_keywords() {
        assert_eq!(
            classify("Expect heavy traffic on the main road tonight."),
            MoodLabel::Alert
        );
        assert_eq!(classify("The area feels chaotic today"), MoodLabel::Alert);
        assert_eq!(classify("Stay ALERT near the junction"), MoodLabel::Alert);
    }

    #[test]
    fn test_active_keywords() {
        assert_eq!(
            classify("The street food scene is buzzing this week"),
            MoodLabel::Active
        );
        assert_eq!(classify("A busy evening market"), MoodLabel::Active);
    }

    #[test]
    fn test_calm_fallback() {
        assert_eq!(
            classify("A quiet residential stretch with tree-lined lanes."),
            MoodLabel::Calm
        );
        assert_eq!(classify(""), MoodLabel::Calm);
    }

    #[test]
    fn test_alert_wins_over_active() {
        // Text containing keywords from both tiers maps to Alert
        assert_eq!(
            classify("Buzzing nightlife but heavy traffic at the signal"),
            MoodLabel::Alert
        );
    }
}
