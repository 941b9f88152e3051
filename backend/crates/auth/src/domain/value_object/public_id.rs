//! Public user identifier
//!
//! 21-character Nanoid shown to clients (seller links, `/me`). Internal UUIDs
//! and Telegram ids are never exposed through it.

use std::fmt;
use std::str::FromStr;

use nid::Nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicId(Nanoid);

impl PublicId {
    #[inline]
    pub fn new() -> Self {
        Self(Nanoid::new())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for PublicId {
    type Err = nid::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Nanoid::from_str(s).map(Self)
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
