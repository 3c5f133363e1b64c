use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::GraphError;

pub type NodeId = u32;
pub type EdgeId = u32;

/// Maximum length of a `color` attribute (unicode(10) column).
pub const COLOR_LENGTH: usize = 10;

/// One of the two ends of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Source,
    Target,
}

impl Endpoint {
    /// Resolve a positional index: `0`/`-1` is the source, `1`/`-2` the target.
    pub fn from_index(n: isize) -> Result<Self, GraphError> {
        match n {
            0 | -1 => Ok(Endpoint::Source),
            1 | -2 => Ok(Endpoint::Target),
            _ => Err(GraphError::IndexOutOfRange(n)),
        }
    }

    pub fn id_attr(self) -> &'static str {
        match self {
            Endpoint::Source => "source_id",
            Endpoint::Target => "target_id",
        }
    }

    //name of the collection this endpoint shows up in on the node side
    pub fn backref(self) -> &'static str {
        match self {
            Endpoint::Source => "out_edges",
            Endpoint::Target => "in_edges",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Target => write!(f, "target"),
        }
    }
}
