//! Joint configuration classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the fastener head seats and what it threads into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JointConfiguration {
    /// Protruding head, nut
    ThroughBolt,
    /// Countersunk head, nut
    FlatHeadThrough,
    /// Protruding head, tapped hole
    ThreadedEnd,
    /// Countersunk head, tapped hole
    FlatHeadThreaded,
}

impl JointConfiguration {
    pub const ALL: [JointConfiguration; 4] = [
        JointConfiguration::ThroughBolt,
        JointConfiguration::FlatHeadThrough,
        JointConfiguration::ThreadedEnd,
        JointConfiguration::FlatHeadThreaded,
    ];

    /// Every (head, member) combination maps to exactly one configuration.
    pub fn classify(flat_head: bool, threaded_plate: bool) -> Self {
        match (flat_head, threaded_plate) {
            (false, false) => JointConfiguration::ThroughBolt,
            (true, false) => JointConfiguration::FlatHeadThrough,
            (false, true) => JointConfiguration::ThreadedEnd,
            (true, true) => JointConfiguration::FlatHeadThreaded,
        }
    }

    pub fn is_flat_head(&self) -> bool {
        matches!(self, JointConfiguration::FlatHeadThrough | JointConfiguration::FlatHeadThreaded)
    }

    pub fn is_threaded_end(&self) -> bool {
        matches!(self, JointConfiguration::ThreadedEnd | JointConfiguration::FlatHeadThreaded)
    }

    pub fn name(&self) -> &'static str {
        match self {
            JointConfiguration::ThroughBolt => "THROUGH_BOLT",
            JointConfiguration::FlatHeadThrough => "FLAT_HEAD_THROUGH",
            JointConfiguration::ThreadedEnd => "THREADED_END",
            JointConfiguration::FlatHeadThreaded => "FLAT_HEAD_THREADED",
        }
    }
}

impl fmt::Display for JointConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_table() {
        assert_eq!(JointConfiguration::classify(false, false), JointConfiguration::ThroughBolt);
        assert_eq!(JointConfiguration::classify(true, false), JointConfiguration::FlatHeadThrough);
        assert_eq!(JointConfiguration::classify(false, true), JointConfiguration::ThreadedEnd);
        assert_eq!(JointConfiguration::classify(true, true), JointConfiguration::FlatHeadThreaded);
    }

    #[test]
    fn test_flags_round_trip() {
        for config in JointConfiguration::ALL {
            let again = JointConfiguration::classify(config.is_flat_head(), config.is_threaded_end());
            assert_eq!(again, config);
        }
    }

    #[test]
    fn test_serialized_name_matches_display() {
        for config in JointConfiguration::ALL {
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(json, format!("\"{}\"", config));
        }
    }
}
