//! Engine event types
//!
//! Observers (UI, logging, tests) subscribe to these through
//! `RuleExecutor::subscribe_events`. Delivery is fire-and-forget: the
//! executor never blocks on, or fails because of, event consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rule::Effect;

/// Events emitted by the rule engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// A rule table was compiled for a track (track change or manual reset)
    TableCompiled {
        track_id: Uuid,
        rule_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A rule fired and its effect was applied
    RuleFired {
        track_id: Uuid,
        trigger: u32,
        effect: Effect,
        timestamp: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = EngineEvent::RuleFired {
            track_id: Uuid::nil(),
            trigger: 40,
            effect: Effect::Volume { level: 60 },
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "RuleFired");
        assert_eq!(json["trigger"], 40);
        assert_eq!(json["effect"]["action"], "volume");
        assert_eq!(json["effect"]["level"], 60);
    }

    #[test]
    fn test_event_round_trip() {
        let event = EngineEvent::TableCompiled {
            track_id: Uuid::new_v4(),
            rule_count: 3,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        match back {
            EngineEvent::TableCompiled { rule_count, .. } => assert_eq!(rule_count, 3),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
