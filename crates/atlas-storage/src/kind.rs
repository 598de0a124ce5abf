//! Entity kinds and their content directories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of markdown-backed entity.
///
/// Each kind lives in its own top-level content directory, with one
/// subdirectory per locale: `<root>/<dir>/<locale>/<slug>.md`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Documentation page, grouped into sections with prev/next links.
    Doc,
    /// Blog post.
    Blog,
    /// Client directory entry.
    Client,
    /// Server directory entry.
    Server,
}

impl EntityKind {
    /// All kinds in a stable order.
    pub const ALL: [EntityKind; 4] = [Self::Doc, Self::Blog, Self::Client, Self::Server];

    /// Content directory name for this kind.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Doc => "docs",
            Self::Blog => "blog",
            Self::Client => "clients",
            Self::Server => "servers",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Error returned when parsing an unknown entity kind.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownKind;

    /// Accepts both the directory name (`docs`) and the singular form (`doc`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doc" | "docs" => Ok(Self::Doc),
            "blog" | "blogs" => Ok(Self::Blog),
            "client" | "clients" => Ok(Self::Client),
            "server" | "servers" => Ok(Self::Server),
            other => Err(UnknownKind(other.to_owned())),
        }
    }
}
