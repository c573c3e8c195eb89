use serde::Deserialize;
use std::path::PathBuf;

use crate::fold::Side;
use crate::metrics::{ExecutionStrategy, LineageMetric, SimilarityMetric, SpatialMetric};

/// Settings consumed by the loaders and batch evaluators. Built once and
/// passed by value into each component; deserializable so a run can be
/// described in a JSON document.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub lineage_path: PathBuf,
    pub connectome_path: PathBuf,
    pub locations_path: PathBuf,

    /// When set, the connectome document is fetched from the remote object
    /// store instead of read from `connectome_path`.
    pub connectome_remote_uri: Option<String>,

    /// Node attribute under which coordinates are attached and later read.
    pub location_key: String,

    pub fold_connectome: bool,
    pub prefer_side: Side,

    pub lineage_metric: LineageMetric,
    pub similarity_metric: SimilarityMetric,
    pub spatial_metric: SpatialMetric,

    pub lineage_execution: ExecutionStrategy,
    pub similarity_execution: ExecutionStrategy,
    pub spatial_execution: ExecutionStrategy,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            lineage_path: PathBuf::from("data/bhatla-lineage.json"),
            connectome_path: PathBuf::from("data/witvliet2021-Dataset8.json"),
            locations_path: PathBuf::from("data/locations.openworm2012.blender.json"),
            connectome_remote_uri: None,
            location_key: "location".to_string(),
            fold_connectome: true,
            prefer_side: Side::Right,
            lineage_metric: LineageMetric::ShortestPath,
            similarity_metric: SimilarityMetric::CommonSuccessors,
            spatial_metric: SpatialMetric::Euclidean,
            lineage_execution: ExecutionStrategy::Parallel,
            similarity_execution: ExecutionStrategy::Sequential,
            spatial_execution: ExecutionStrategy::Sequential,
        }
    }
}
