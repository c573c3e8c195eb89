use rayon::prelude::*;
use serde::Deserialize;

use crate::connectome::Connectome;
use crate::error::Result;
use crate::lineage::Lineage;
use crate::utils::FastSet;

/// Ancestry distance: shortest-path edge count between two cells, treating
/// the lineage tree as undirected. Symmetric. `None` if either cell is
/// absent.
pub fn lineage_shortest_path(lineage: &Lineage, source: &str, target: &str) -> Option<usize> {
    lineage.shortest_path(source, target)
}

/// Number of post-synaptic partners shared by two neurons. `None` if either
/// neuron is absent.
pub fn common_successors(connectome: &Connectome, source: &str, target: &str) -> Option<usize> {
    let source_targets: FastSet<&str> = connectome.successors(source)?.collect();
    Some(
        connectome
            .successors(target)?
            .filter(|n| source_targets.contains(n))
            .count(),
    )
}

/// Number of pre-synaptic partners shared by two neurons. `None` if either
/// neuron is absent.
pub fn common_predecessors(connectome: &Connectome, source: &str, target: &str) -> Option<usize> {
    let source_sources: FastSet<&str> = connectome.predecessors(source)?.collect();
    Some(
        connectome
            .predecessors(target)?
            .filter(|n| source_sources.contains(n))
            .count(),
    )
}

/// L2 distance between two neurons' coordinates, read from the given node
/// attribute. `Ok(None)` if either neuron is absent or has no coordinate; a
/// coordinate that is present but not a 3-element numeric array is an error.
pub fn euclidean_distance(
    connectome: &Connectome,
    source: &str,
    target: &str,
    location_key: &str,
) -> Result<Option<f64>> {
    let a = match connectome.location(source, location_key)? {
        Some(location) => location,
        None => return Ok(None),
    };
    let b = match connectome.location(target, location_key)? {
        Some(location) => location,
        None => return Ok(None),
    };
    Ok(Some(a.distance_to(&b)))
}

/// Metric choice for developmental distance.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineageMetric {
    ShortestPath,
}

/// Metric choice for wiring similarity.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    CommonSuccessors,
    CommonPredecessors,
}

/// Metric choice for spatial distance.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpatialMetric {
    Euclidean,
}

/// How a batch of pair evaluations is run. Every metric only reads shared
/// immutable graph data, so the parallel map needs no synchronisation.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    Sequential,
    Parallel,
}

fn map_pairs<T, F>(pairs: &[(String, String)], strategy: ExecutionStrategy, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&str, &str) -> T + Sync,
{
    match strategy {
        ExecutionStrategy::Sequential => pairs.iter().map(|(u, v)| f(u, v)).collect(),
        ExecutionStrategy::Parallel => pairs.par_iter().map(|(u, v)| f(u, v)).collect(),
    }
}

/// Evaluates the chosen developmental-distance metric for every pair.
pub fn lineage_distances(
    lineage: &Lineage,
    pairs: &[(String, String)],
    metric: LineageMetric,
    strategy: ExecutionStrategy,
) -> Vec<Option<usize>> {
    map_pairs(pairs, strategy, |u, v| match metric {
        LineageMetric::ShortestPath => lineage_shortest_path(lineage, u, v),
    })
}

/// Evaluates the chosen wiring-similarity metric for every pair.
pub fn similarity_scores(
    connectome: &Connectome,
    pairs: &[(String, String)],
    metric: SimilarityMetric,
    strategy: ExecutionStrategy,
) -> Vec<Option<usize>> {
    map_pairs(pairs, strategy, |u, v| match metric {
        SimilarityMetric::CommonSuccessors => common_successors(connectome, u, v),
        SimilarityMetric::CommonPredecessors => common_predecessors(connectome, u, v),
    })
}

/// Evaluates the chosen spatial-distance metric for every pair. The first
/// malformed coordinate aborts the batch.
pub fn spatial_distances(
    connectome: &Connectome,
    pairs: &[(String, String)],
    metric: SpatialMetric,
    location_key: &str,
    strategy: ExecutionStrategy,
) -> Result<Vec<Option<f64>>> {
    let evaluate = |u: &str, v: &str| match metric {
        SpatialMetric::Euclidean => euclidean_distance(connectome, u, v, location_key),
    };
    match strategy {
        ExecutionStrategy::Sequential => pairs.iter().map(|(u, v)| evaluate(u, v)).collect(),
        ExecutionStrategy::Parallel => pairs.par_iter().map(|(u, v)| evaluate(u, v)).collect(),
    }
}
