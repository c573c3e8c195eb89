use rand::seq::SliceRandom;
use rand::Rng;

use crate::connectome::Connectome;
use crate::lineage::Lineage;
use crate::utils::FastMap;

/// Graphs whose nodes can be renamed wholesale, for null-model generation.
pub trait Relabel: Sized {
    fn node_names(&self) -> Vec<String>;

    fn apply_relabel(&self, mapping: &FastMap<String, String>) -> Self;
}

impl Relabel for Connectome {
    fn node_names(&self) -> Vec<String> {
        self.nodes().map(str::to_string).collect()
    }

    fn apply_relabel(&self, mapping: &FastMap<String, String>) -> Self {
        self.relabel(mapping)
    }
}

impl Relabel for Lineage {
    fn node_names(&self) -> Vec<String> {
        self.nodes().map(str::to_string).collect()
    }

    fn apply_relabel(&self, mapping: &FastMap<String, String>) -> Self {
        self.relabel(mapping)
    }
}

/// Returns a copy of the graph with node names permuted uniformly at random.
///
/// Topology and attributes move with their owning node, so degree sequence
/// and edge count are preserved. The input is never mutated, and each call
/// draws a fresh permutation from the given generator.
pub fn shuffle_relabel_with<G: Relabel, R: Rng>(graph: &G, rng: &mut R) -> G {
    let mut names = graph.node_names();
    // Hash order is arbitrary; sort so a seeded generator is reproducible.
    names.sort_unstable();

    let mut shuffled = names.clone();
    shuffled.shuffle(rng);

    let mapping: FastMap<String, String> = names.into_iter().zip(shuffled).collect();
    graph.apply_relabel(&mapping)
}

/// [`shuffle_relabel_with`] drawing from the thread-local generator.
pub fn shuffle_relabel<G: Relabel>(graph: &G) -> G {
    shuffle_relabel_with(graph, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_connectome() -> Connectome {
        let mut c = Connectome::new();
        // A directed chain has no symmetry, so distinct permutations always
        // produce distinct edge sets.
        let chain = [
            "ASHL", "ASHR", "AVAL", "AVAR", "AVDL", "AVDR", "PVCL", "PVCR",
        ];
        for pair in chain.windows(2) {
            c.add_edge(pair[0], pair[1]);
        }
        c.add_edge("ASHL", "AVAL");
        c.add_edge("PVCL", "AVAL");
        c
    }

    fn edge_list(c: &Connectome) -> Vec<(String, String)> {
        let mut edges: Vec<(String, String)> = c
            .nodes()
            .flat_map(|source| {
                c.successors(source)
                    .expect("node exists")
                    .map(move |target| (source.to_string(), target.to_string()))
            })
            .collect();
        edges.sort();
        edges
    }

    #[test]
    fn preserves_node_and_edge_counts() {
        let c = make_connectome();
        let shuffled = shuffle_relabel(&c);
        assert_eq!(shuffled.node_count(), c.node_count());
        assert_eq!(shuffled.edge_count(), c.edge_count());
    }

    #[test]
    fn preserves_degree_sequence() {
        let c = make_connectome();
        let shuffled = shuffle_relabel(&c);

        let mut degrees: Vec<usize> = c
            .nodes()
            .map(|n| c.total_degree(n).expect("node exists"))
            .collect();
        let mut shuffled_degrees: Vec<usize> = shuffled
            .nodes()
            .map(|n| shuffled.total_degree(n).expect("node exists"))
            .collect();
        degrees.sort_unstable();
        shuffled_degrees.sort_unstable();
        assert_eq!(degrees, shuffled_degrees);
    }

    #[test]
    fn seeded_shuffle_is_deterministic() {
        let c = make_connectome();
        let a = shuffle_relabel_with(&c, &mut StdRng::seed_from_u64(174));
        let b = shuffle_relabel_with(&c, &mut StdRng::seed_from_u64(174));

        assert_eq!(edge_list(&a), edge_list(&b));
    }

    #[test]
    fn consecutive_draws_are_independent() {
        let c = make_connectome();
        let mut rng = StdRng::seed_from_u64(174);
        let first = shuffle_relabel_with(&c, &mut rng);
        let second = shuffle_relabel_with(&c, &mut rng);

        assert_ne!(edge_list(&first), edge_list(&second));
    }

    #[test]
    fn lineage_shuffle_keeps_tree_shape() {
        let lineage = Lineage::from_edges(vec![("P0", "AB"), ("P0", "P1"), ("AB", "ABa")])
            .expect("valid tree");
        let shuffled = shuffle_relabel_with(&lineage, &mut StdRng::seed_from_u64(7));

        assert_eq!(shuffled.node_count(), lineage.node_count());
        assert!(shuffled.check_valid().is_ok());
    }
}
