use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Names the remote resource type a record lives in (the URL path segment).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection(Cow<'static, str>);

impl Collection {
    /// Devices ("things") that report state and hold plates.
    pub const DEVICES: Collection = Collection::from_static("interaction-things");
    pub const EXPERIMENTS: Collection = Collection::from_static("experiments");
    pub const PLATES: Collection = Collection::from_static("plates");
    pub const WELLS: Collection = Collection::from_static("wells");
    pub const SAMPLES: Collection = Collection::from_static("samples");

    /// Builds a collection name from a string literal.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Builds a collection name from any owned or borrowed string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Collection {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Collection {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Collection {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
