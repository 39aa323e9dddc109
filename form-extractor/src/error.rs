use std::fmt;

use thiserror::Error;

/// Which lookup of a [`crate::block_index::BlockIndex`] a reference was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    All,
    Value,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lookup::All => "block",
            Lookup::Value => "value block",
        })
    }
}

/// Structural inconsistencies found while walking the block graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("key block `{key_id}` has no VALUE relationship")]
    MissingValueLink { key_id: String },
    #[error("block `{from_id}` references unknown {lookup} `{target_id}`")]
    UnresolvedReference {
        from_id: String,
        target_id: String,
        lookup: Lookup,
    },
}

impl ExtractError {
    /// Stable taxonomy label for callers that report errors outward.
    pub fn label(&self) -> &'static str {
        match self {
            ExtractError::MissingValueLink { .. } => "MissingValueLink",
            ExtractError::UnresolvedReference { .. } => "UnresolvedReference",
        }
    }
}
