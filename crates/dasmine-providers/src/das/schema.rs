use serde::{Deserialize, Deserializer};

/// One line of a decoded activity stream
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DasRecord {
    pub database_activity_event_list: Vec<DasActivityEvent>,
}

/// Nested activity entry.
///
/// Only `type` is guaranteed: heartbeat entries carry none of the other fields,
/// so presence is checked after the entry is known to be a record. Pass-through
/// columns distinguish an absent key (`None`) from an explicit null
/// (`Some(None)`), since engines emit null for values they do not know.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DasActivityEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub session_id: Option<DasSessionId>,
    #[serde(default)]
    pub log_time: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub db_user_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub server_host: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub database_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub command_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub remote_host: Option<Option<String>>,
}

pub(crate) const RECORD_KIND: &str = "record";

/// Engines differ in whether `sessionId` is a string or a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DasSessionId {
    Text(String),
    Number(serde_json::Number),
}

impl DasSessionId {
    pub fn into_string(self) -> String {
        match self {
            DasSessionId::Text(text) => text,
            DasSessionId::Number(number) => number.to_string(),
        }
    }
}

/// Marks a key as present even when its value is null
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
