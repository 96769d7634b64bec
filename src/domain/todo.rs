use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Server-assigned identifier. The API is free to use numbers or strings;
/// numbers are kept exactly as sent, whatever their range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum TodoId {
    Number(Number),
    Text(String),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Number(n) => write!(f, "{n}"),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

/// A todo as the server represents it.
///
/// Fields the client does not know about are kept in `extra` so that a
/// server response can replace the local copy without losing anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoItem {
    pub id: TodoId,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TodoItem {
    pub fn new(id: TodoId, title: impl Into<String>, description: impl Into<String>, completed: bool) -> Self {
        Self { id, title: title.into(), description: description.into(), completed, extra: Map::new() }
    }
}

/// Body of create and full-replace update requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPayload {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TodoPayload {
    /// Same title and description, completion inverted.
    pub fn toggled(item: &TodoItem) -> Self {
        Self { title: item.title.clone(), description: item.description.clone(), completed: !item.completed }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
