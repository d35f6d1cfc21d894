use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::mention::format_mention;

/// Last-known identity of one member in one chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Public username without the leading `@`.
    #[serde(alias = "username", default)]
    pub handle: Option<String>,
    /// Full name as last observed.
    #[serde(alias = "name", default)]
    pub display_name: String,
}

impl MemberRecord {
    /// Builds a record, dropping blank handles.
    pub fn new(handle: Option<&str>, display_name: &str) -> Self {
        let handle = handle
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string);
        Self {
            handle,
            display_name: display_name.to_string(),
        }
    }
}

/// A roster record together with the member id it is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub member_id: i64,
    pub handle: Option<String>,
    pub display_name: String,
}

impl Member {
    /// Renders the member as a taggable HTML mention.
    pub fn mention(&self) -> String {
        format_mention(self.member_id, self.handle.as_deref(), &self.display_name)
    }
}

/// Members of a single chat keyed by member id.
pub type ChatRoster = BTreeMap<i64, MemberRecord>;

/// The whole roster: chat id -> member id -> record.
///
/// Serialized as a JSON object with string keys at both levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    chats: BTreeMap<i64, ChatRoster>,
}

/// Counts reported by the health endpoint and the import tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStats {
    pub chats: usize,
    pub members: usize,
}

impl Roster {
    /// Parses a roster document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serializes the roster as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Inserts or replaces the record for `(chat_id, member_id)`.
    pub fn upsert(&mut self, chat_id: i64, member_id: i64, record: MemberRecord) {
        self.chats
            .entry(chat_id)
            .or_default()
            .insert(member_id, record);
    }

    /// All members of a chat, empty when the chat is unknown.
    pub fn members(&self, chat_id: i64) -> Vec<Member> {
        self.chats
            .get(&chat_id)
            .map(|members| {
                members
                    .iter()
                    .map(|(member_id, record)| Member {
                        member_id: *member_id,
                        handle: record.handle.clone(),
                        display_name: record.display_name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copies every record of `other` into `self`, overwriting existing ones.
    /// Returns the number of records copied.
    pub fn merge(&mut self, other: Roster) -> usize {
        let mut merged = 0;
        for (chat_id, members) in other.chats {
            let target = self.chats.entry(chat_id).or_default();
            for (member_id, record) in members {
                target.insert(member_id, record);
                merged += 1;
            }
        }
        merged
    }

    /// Chat ids with at least one record, ascending.
    pub fn chat_ids(&self) -> Vec<i64> {
        self.chats.keys().copied().collect()
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats {
            chats: self.chats.len(),
            members: self.chats.values().map(BTreeMap::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
