use serde::Deserialize;

use crate::connectome::Connectome;

/// Hemisphere of a bilateral neuron pair, named by the trailing character of
/// the neuron's identifier.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Side {
    pub fn suffix(self) -> char {
        match self {
            Side::Left => 'L',
            Side::Right => 'R',
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Merges every bilateral left/right neuron pair into a single node on the
/// preferred side.
///
/// The preferred-side node absorbs all edges of its counterpart, under the
/// contraction policy of [`Connectome::contract_nodes`]. Nodes without a
/// counterpart are untouched. Iteration is lexicographic, so the result is
/// deterministic, and the operation is idempotent.
pub fn fold_connectome(connectome: &Connectome, prefer: Side) -> Connectome {
    let mut folded = connectome.clone();

    let mut names: Vec<String> = folded.nodes().map(str::to_string).collect();
    names.sort_unstable();

    for name in names {
        if let Some(stem) = name.strip_suffix(prefer.suffix()) {
            let counterpart = format!("{}{}", stem, prefer.opposite().suffix());
            if folded.contains(&counterpart) {
                folded.contract_nodes(&name, &counterpart);
            }
        }
    }
    folded
}
