//! Comparative analysis of two graphs of the *C. elegans* nervous system:
//! the cell-lineage tree and the spatially annotated connectome.
//!
//! Loaded graphs are immutable; the folding and shuffling transforms return
//! new graphs, and the metric functions only read.

mod config;
pub use config::Config;

mod connectome;
pub use connectome::{Attributes, Connectome};

mod error;
pub use error::{Error, Result};

mod fold;
pub use fold::{fold_connectome, Side};

mod lineage;
pub use lineage::Lineage;

mod metrics;
pub use metrics::{
    common_predecessors, common_successors, euclidean_distance, lineage_distances,
    lineage_shortest_path, similarity_scores, spatial_distances, ExecutionStrategy, LineageMetric,
    SimilarityMetric, SpatialMetric,
};

mod shuffle;
pub use shuffle::{shuffle_relabel, shuffle_relabel_with, Relabel};

mod store;
pub use store::{GraphStore, NodeLocationMap, RemoteStore};

pub mod utils;
