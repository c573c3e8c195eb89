use serde_json::Value;

use crate::error::{Error, Result};
use crate::utils::{FastMap, FastSet, Location};

/// String-keyed JSON attributes carried by a node or an edge.
pub type Attributes = FastMap<String, Value>;

/// Directed synaptic wiring graph. Edges point pre-synaptic -> post-synaptic.
///
/// Nodes are neuron names; node and edge attributes are arbitrary JSON values
/// taken from the source document. A predecessor index is kept alongside the
/// successor adjacency so both neighbourhoods are cheap to read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Connectome {
    nodes: FastMap<String, Attributes>,
    succ: FastMap<String, FastMap<String, Attributes>>,
    pred: FastMap<String, FastSet<String>>,
}

impl Connectome {
    pub fn new() -> Connectome {
        Connectome::default()
    }

    /// Adds a node with the given attributes, replacing any existing ones.
    pub fn add_node_with(&mut self, name: &str, attributes: Attributes) {
        self.nodes.insert(name.to_string(), attributes);
        self.succ.entry(name.to_string()).or_default();
        self.pred.entry(name.to_string()).or_default();
    }

    /// Adds a node if absent, keeping existing attributes.
    pub fn add_node(&mut self, name: &str) {
        if !self.contains(name) {
            self.add_node_with(name, Attributes::default());
        }
    }

    /// Adds an edge, creating missing endpoints. An existing edge's
    /// attributes are replaced.
    pub fn add_edge_with(&mut self, source: &str, target: &str, attributes: Attributes) {
        self.add_node(source);
        self.add_node(target);
        self.succ
            .get_mut(source)
            .expect("endpoint just added")
            .insert(target.to_string(), attributes);
        self.pred
            .get_mut(target)
            .expect("endpoint just added")
            .insert(source.to_string());
    }

    pub fn add_edge(&mut self, source: &str, target: &str) {
        self.add_edge_with(source, target, Attributes::default());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.succ
            .get(source)
            .map_or(false, |targets| targets.contains_key(target))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.succ.values().map(|targets| targets.len()).sum()
    }

    /// Iterate over node names in arbitrary order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn node_attrs(&self, name: &str) -> Option<&Attributes> {
        self.nodes.get(name)
    }

    pub fn node_attr(&self, name: &str, key: &str) -> Option<&Value> {
        self.nodes.get(name)?.get(key)
    }

    /// Sets an attribute on an existing node; no-op if the node is absent.
    pub fn set_node_attr(&mut self, name: &str, key: &str, value: Value) {
        if let Some(attrs) = self.nodes.get_mut(name) {
            attrs.insert(key.to_string(), value);
        }
    }

    pub fn edge_attrs(&self, source: &str, target: &str) -> Option<&Attributes> {
        self.succ.get(source)?.get(target)
    }

    /// Out-neighbours of a node, or `None` if the node is absent.
    pub fn successors(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        self.succ
            .get(name)
            .map(|targets| targets.keys().map(String::as_str))
    }

    /// In-neighbours of a node, or `None` if the node is absent.
    pub fn predecessors(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        self.pred
            .get(name)
            .map(|sources| sources.iter().map(String::as_str))
    }

    /// Degree counting both directions, parallel edges impossible.
    pub fn total_degree(&self, name: &str) -> Option<usize> {
        let out_degree = self.succ.get(name)?.len();
        let in_degree = self.pred.get(name)?.len();
        Some(out_degree + in_degree)
    }

    /// Removes a node and all its incident edges; no-op if absent.
    pub fn remove_node(&mut self, name: &str) {
        if self.nodes.remove(name).is_none() {
            return;
        }
        for target in self.succ.remove(name).unwrap_or_default().into_keys() {
            if let Some(sources) = self.pred.get_mut(&target) {
                sources.remove(name);
            }
        }
        for source in self.pred.remove(name).unwrap_or_default() {
            if let Some(targets) = self.succ.get_mut(&source) {
                targets.remove(name);
            }
        }
    }

    /// Contracts `discard` into `keep`: every edge incident to `discard` is
    /// rerouted onto `keep`, then `discard` is removed.
    ///
    /// Where `keep` already has the rerouted edge, its own attributes win and
    /// the duplicate's are dropped; `keep`'s node attributes always survive.
    /// An edge between the two nodes becomes a self-loop on `keep`.
    pub fn contract_nodes(&mut self, keep: &str, discard: &str) {
        if keep == discard || !self.contains(keep) || !self.contains(discard) {
            return;
        }

        let outgoing: Vec<(String, Attributes)> = self
            .succ
            .get(discard)
            .expect("contains checked")
            .iter()
            .map(|(target, attrs)| (target.clone(), attrs.clone()))
            .collect();
        let incoming: Vec<(String, Attributes)> = self
            .pred
            .get(discard)
            .expect("contains checked")
            .iter()
            .map(|source| {
                let attrs = self.succ[source][discard].clone();
                (source.clone(), attrs)
            })
            .collect();

        for (target, attrs) in outgoing {
            let target = if target == discard {
                keep
            } else {
                target.as_str()
            };
            if !self.has_edge(keep, target) {
                self.add_edge_with(keep, target, attrs);
            }
        }
        for (source, attrs) in incoming {
            let source = if source == discard {
                keep
            } else {
                source.as_str()
            };
            if !self.has_edge(source, keep) {
                self.add_edge_with(source, keep, attrs);
            }
        }

        self.remove_node(discard);
    }

    /// Returns a copy with every node renamed through the mapping. Names
    /// absent from the mapping are kept.
    pub fn relabel(&self, mapping: &FastMap<String, String>) -> Connectome {
        let rename = |name: &String| mapping.get(name).unwrap_or(name).clone();
        Connectome {
            nodes: self
                .nodes
                .iter()
                .map(|(name, attrs)| (rename(name), attrs.clone()))
                .collect(),
            succ: self
                .succ
                .iter()
                .map(|(source, targets)| {
                    (
                        rename(source),
                        targets
                            .iter()
                            .map(|(target, attrs)| (rename(target), attrs.clone()))
                            .collect(),
                    )
                })
                .collect(),
            pred: self
                .pred
                .iter()
                .map(|(target, sources)| {
                    (
                        rename(target),
                        sources.iter().map(|source| rename(source)).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Returns a copy with every edge direction flipped, attributes intact.
    pub fn reverse(&self) -> Connectome {
        let mut reversed = Connectome::new();
        for (name, attrs) in &self.nodes {
            reversed.add_node_with(name, attrs.clone());
        }
        for (source, targets) in &self.succ {
            for (target, attrs) in targets {
                reversed.add_edge_with(target, source, attrs.clone());
            }
        }
        reversed
    }

    /// Reads a node's coordinate from the given attribute key.
    ///
    /// `Ok(None)` when the node or the attribute is absent; an attribute that
    /// exists but is not a 3-element numeric array is a structural error.
    pub fn location(&self, name: &str, key: &str) -> Result<Option<Location<f64>>> {
        let value = match self.nodes.get(name).and_then(|attrs| attrs.get(key)) {
            Some(value) => value,
            None => return Ok(None),
        };

        let coords: Vec<f64> = value
            .as_array()
            .filter(|entries| entries.len() == 3)
            .and_then(|entries| entries.iter().map(Value::as_f64).collect())
            .ok_or_else(|| Error::MalformedLocation {
                node: name.to_string(),
            })?;

        Ok(Some(Location {
            x: coords[0],
            y: coords[1],
            z: coords[2],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_connectome() -> Connectome {
        let mut c = Connectome::new();
        c.add_edge("ASHL", "AVAL");
        c.add_edge("ASHL", "AVDL");
        c.add_edge("AVAL", "AVDL");
        c
    }

    #[test]
    fn add_edge_creates_endpoints() {
        let c = make_connectome();
        assert_eq!(c.node_count(), 3);
        assert_eq!(c.edge_count(), 3);
        assert!(c.has_edge("ASHL", "AVAL"));
        assert!(!c.has_edge("AVAL", "ASHL"));
    }

    #[test]
    fn neighbourhoods() {
        let c = make_connectome();
        let mut succ: Vec<&str> = c.successors("ASHL").expect("node exists").collect();
        succ.sort();
        assert_eq!(succ, vec!["AVAL", "AVDL"]);

        let mut pred: Vec<&str> = c.predecessors("AVDL").expect("node exists").collect();
        pred.sort();
        assert_eq!(pred, vec!["ASHL", "AVAL"]);

        assert!(c.successors("nope").is_none());
    }

    #[test]
    fn remove_node_clears_incident_edges() {
        let mut c = make_connectome();
        c.remove_node("AVAL");
        assert_eq!(c.node_count(), 2);
        assert_eq!(c.edge_count(), 1);
        assert!(!c.has_edge("ASHL", "AVAL"));
        assert!(c.has_edge("ASHL", "AVDL"));
    }

    #[test]
    fn contract_reroutes_edges() {
        let mut c = Connectome::new();
        c.add_edge("AVAR", "PVCR");
        c.add_edge("AVAL", "DVA");
        c.add_edge("RIML", "AVAL");
        c.contract_nodes("AVAR", "AVAL");

        assert!(!c.contains("AVAL"));
        assert!(c.has_edge("AVAR", "PVCR"));
        assert!(c.has_edge("AVAR", "DVA"));
        assert!(c.has_edge("RIML", "AVAR"));
    }

    #[test]
    fn contract_keeps_absorbing_edge_attributes() {
        let mut c = Connectome::new();
        let strong: Attributes = vec![("weight".to_string(), json!(7))].into_iter().collect();
        let weak: Attributes = vec![("weight".to_string(), json!(1))].into_iter().collect();
        c.add_edge_with("AVAR", "PVCR", strong);
        c.add_edge_with("AVAL", "PVCR", weak);
        c.contract_nodes("AVAR", "AVAL");

        let attrs = c.edge_attrs("AVAR", "PVCR").expect("edge survives");
        assert_eq!(attrs.get("weight"), Some(&json!(7)));
    }

    #[test]
    fn contract_edge_between_pair_becomes_self_loop() {
        let mut c = Connectome::new();
        c.add_edge("AVAL", "AVAR");
        c.contract_nodes("AVAR", "AVAL");
        assert!(c.has_edge("AVAR", "AVAR"));
        assert_eq!(c.node_count(), 1);
    }

    #[test]
    fn reverse_swaps_neighbourhoods() {
        let c = make_connectome();
        let r = c.reverse();
        assert_eq!(r.edge_count(), c.edge_count());
        assert!(r.has_edge("AVAL", "ASHL"));
        let mut succ: Vec<&str> = r.successors("AVDL").expect("node exists").collect();
        succ.sort();
        assert_eq!(succ, vec!["ASHL", "AVAL"]);
    }

    #[test]
    fn relabel_preserves_attributes() {
        let mut c = Connectome::new();
        c.add_edge_with(
            "ASHL",
            "AVAL",
            vec![("weight".to_string(), json!(3))].into_iter().collect(),
        );
        c.set_node_attr("ASHL", "location", json!([1.0, 2.0, 3.0]));

        let mapping: FastMap<String, String> = vec![
            ("ASHL".to_string(), "AVAL".to_string()),
            ("AVAL".to_string(), "ASHL".to_string()),
        ]
        .into_iter()
        .collect();
        let renamed = c.relabel(&mapping);

        assert!(renamed.has_edge("AVAL", "ASHL"));
        assert_eq!(
            renamed.edge_attrs("AVAL", "ASHL").unwrap().get("weight"),
            Some(&json!(3))
        );
        assert_eq!(
            renamed.node_attr("AVAL", "location"),
            Some(&json!([1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn location_reads_triple() {
        let mut c = Connectome::new();
        c.add_node("ASHL");
        c.set_node_attr("ASHL", "location", json!([3.0, 4.0, 0.0]));
        let loc = c.location("ASHL", "location").unwrap().expect("present");
        assert_eq!(loc.norm(), 5.0);
    }

    #[test]
    fn location_absent_is_none() {
        let mut c = Connectome::new();
        c.add_node("ASHL");
        assert!(c.location("ASHL", "location").unwrap().is_none());
        assert!(c.location("nope", "location").unwrap().is_none());
    }

    #[test]
    fn location_malformed_is_error() {
        let mut c = Connectome::new();
        c.add_node("ASHL");
        c.set_node_attr("ASHL", "location", json!([1.0, 2.0]));
        assert!(c.location("ASHL", "location").is_err());

        c.set_node_attr("ASHL", "location", json!("posterior"));
        assert!(c.location("ASHL", "location").is_err());
    }
}
