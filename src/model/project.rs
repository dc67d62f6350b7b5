use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    Active,
    Archived,
    Done,
    /// Assigned to directories discovered on disk without a config entry
    #[default]
    NotSet,
}

impl Status {
    /// Every status, in menu order.
    pub const ALL: [Status; 4] = [
        Status::Active,
        Status::Archived,
        Status::Done,
        Status::NotSet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Archived => "archived",
            Status::Done => "done",
            Status::NotSet => "not set",
        }
    }

    /// Every status except `self`, in menu order.
    pub fn others(self) -> Vec<Status> {
        Status::ALL.into_iter().filter(|s| *s != self).collect()
    }

    /// Parse a stored status. Unknown or empty values read as `NotSet` so a
    /// hand-edited file never fails to load over one bad field.
    fn from_stored(s: &str) -> Status {
        s.parse().unwrap_or(Status::NotSet)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{0}'. Valid: active, archived, done, not set")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "archived" => Ok(Status::Archived),
            "done" => Ok(Status::Done),
            "not set" | "not-set" | "notset" | "not_set" => Ok(Status::NotSet),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Status::from_stored(&raw))
    }
}

/// A tracked project. `path` is always absolute but need not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub path: PathBuf,
    #[serde(default)]
    pub status: Status,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, status: Status) -> Self {
        Project {
            name: name.into(),
            alias: None,
            path: path.into(),
            status,
        }
    }
}
