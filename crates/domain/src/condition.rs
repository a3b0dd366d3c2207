use serde::{Deserialize, Serialize};

/// A single eligibility predicate on an `Event`.
///
/// Conditions are stored as a tagged value and evaluated in list order
/// against external user-activity facts. The `Unknown` variant captures
/// condition documents with an unrecognized type tag: those always fail
/// evaluation instead of being silently skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCondition {
    LoginStreak {
        value: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    FriendInvitation {
        value: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    QuestClear {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    MinimumPurchase {
        value: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    AlwaysTrue {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl EventCondition {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::LoginStreak { .. } => "LOGIN_STREAK",
            Self::FriendInvitation { .. } => "FRIEND_INVITATION",
            Self::QuestClear { .. } => "QUEST_CLEAR",
            Self::MinimumPurchase { .. } => "MINIMUM_PURCHASE",
            Self::AlwaysTrue { .. } => "ALWAYS_TRUE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserializes_tagged_conditions() {
        let json = r#"{ "type": "LOGIN_STREAK", "value": 3, "description": "3 days in a row" }"#;
        let condition: EventCondition = serde_json::from_str(json).unwrap();
        assert_eq!(
            condition,
            EventCondition::LoginStreak {
                value: 3,
                description: Some("3 days in a row".into()),
            }
        );

        let json = r#"{ "type": "QUEST_CLEAR", "value": "questA" }"#;
        let condition: EventCondition = serde_json::from_str(json).unwrap();
        assert_eq!(
            condition,
            EventCondition::QuestClear {
                value: "questA".into(),
                description: None,
            }
        );

        let json = r#"{ "type": "ALWAYS_TRUE" }"#;
        let condition: EventCondition = serde_json::from_str(json).unwrap();
        assert_eq!(
            condition,
            EventCondition::AlwaysTrue { description: None }
        );
    }

    #[test]
    fn unrecognized_type_becomes_unknown() {
        let json = r#"{ "type": "TOTAL_PLAYTIME", "value": 120 }"#;
        let condition: EventCondition = serde_json::from_str(json).unwrap();
        assert_eq!(condition, EventCondition::Unknown);
    }

    #[test]
    fn roundtrips_through_json() {
        let conditions = vec![
            EventCondition::MinimumPurchase {
                value: 10000,
                description: None,
            },
            EventCondition::AlwaysTrue { description: None },
        ];
        let json = serde_json::to_string(&conditions).unwrap();
        let parsed: Vec<EventCondition> = serde_json::from_str(&json).unwrap();
        assert_eq!(conditions, parsed);
    }
}
