use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Structural failures raised while loading or reading graph state.
///
/// Per-query "no answer" cases (missing node, missing location, no path) are
/// never errors; they surface as `None` from the metric functions.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed document")]
    Json(#[from] serde_json::Error),

    #[error("lineage node has no name attribute")]
    UnnamedLineageNode,

    #[error("duplicate name in lineage: {0}")]
    DuplicateLineageName(String),

    #[error("lineage is not a rooted tree: {0}")]
    InvalidLineage(&'static str),

    #[error("location of node {node} is not a 3-element numeric array")]
    MalformedLocation { node: String },

    #[error("remote fetch of {uri} failed: {reason}")]
    Fetch { uri: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
