use crate::error::{Error, Result};
use crate::utils::{FastMap, FastSet};

/// Rooted tree of cell-division ancestry.
///
/// Edges point parent -> child but are stored as a child -> parent map, so
/// every node except the root has exactly one entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lineage {
    pub(crate) parents: FastMap<String, String>,
    pub root: Option<String>,
}

impl Lineage {
    /// Creates an empty lineage
    pub fn new() -> Lineage {
        Lineage {
            parents: FastMap::default(),
            root: None,
        }
    }

    /// Creates a populated lineage and checks that it is valid
    pub fn from(parents: FastMap<String, String>, root: Option<String>) -> Result<Lineage> {
        let l = Lineage { parents, root };
        l.check_valid()?;
        Ok(l)
    }

    /// Builds a lineage from (parent, child) pairs, inferring the root.
    pub fn from_edges<I, S>(edges: I) -> Result<Lineage>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let parents: FastMap<String, String> = edges
            .into_iter()
            .map(|(parent, child)| (child.into(), parent.into()))
            .collect();
        let root = Lineage {
            parents: parents.clone(),
            root: None,
        }
        .find_root()?;
        Lineage::from(parents, Some(root))
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.parents.contains_key(node)
            || match &self.root {
                Some(n) => n == node,
                None => false,
            }
    }

    pub fn get_parent(&self, node: &str) -> Option<&String> {
        self.parents.get(node)
    }

    /// Iterate over node names in arbitrary order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.root
            .iter()
            .map(String::as_str)
            .chain(self.parents.keys().map(String::as_str))
    }

    pub fn node_count(&self) -> usize {
        self.parents.len() + usize::from(self.root.is_some())
    }

    pub fn path_to_root<'a>(&'a self, start: &'a str) -> Option<RootwardPath<'a>> {
        if self.has_node(start) {
            Some(RootwardPath {
                lineage: self,
                next: Some(start),
            })
        } else {
            None
        }
    }

    /// Shortest-path edge count between two nodes, treating the tree as
    /// undirected. `None` if either node is absent.
    pub fn shortest_path(&self, source: &str, target: &str) -> Option<usize> {
        let mut to_source: FastMap<&str, usize> = FastMap::default();
        for (order, node) in self.path_to_root(source)?.enumerate() {
            to_source.insert(node, order);
        }

        // Both rootward paths end at the root, so they must meet.
        for (steps, node) in self.path_to_root(target)?.enumerate() {
            if let Some(order) = to_source.get(node) {
                return Some(order + steps);
            }
        }
        None
    }

    /// Returns a copy with every node renamed through the mapping. Names
    /// absent from the mapping are kept.
    pub fn relabel(&self, mapping: &FastMap<String, String>) -> Lineage {
        let rename = |name: &String| mapping.get(name).unwrap_or(name).clone();
        Lineage {
            parents: self
                .parents
                .iter()
                .map(|(child, parent)| (rename(child), rename(parent)))
                .collect(),
            root: self.root.as_ref().map(rename),
        }
    }

    fn check_valid_root(&self) -> Result<&str> {
        match &self.root {
            Some(root) => {
                if &self.find_root()? == root {
                    Ok(root)
                } else {
                    Err(Error::InvalidLineage(
                        "explicit root does not match implicit root",
                    ))
                }
            }
            None => Err(Error::InvalidLineage("no explicit root")),
        }
    }

    pub fn check_valid(&self) -> Result<&Lineage> {
        let root = self.check_valid_root()?.to_string();

        let mut global_visited: FastSet<&str> = FastSet::default();
        global_visited.insert(&root);
        let mut intersects: bool;

        for start in self.parents.keys() {
            let mut local_visited: FastSet<&str> = FastSet::default();
            intersects = false;

            for node in self.path_to_root(start).expect("key is a node") {
                if !local_visited.insert(node) {
                    return Err(Error::InvalidLineage("tree has cycles"));
                }

                if !global_visited.insert(node) {
                    intersects = true;
                    break;
                }
            }

            if !intersects {
                return Err(Error::InvalidLineage(
                    "not fully connected (some nodes do not lead to root)",
                ));
            }
        }

        Ok(self)
    }

    fn find_root(&self) -> Result<String> {
        let children: FastSet<&String> = self.parents.keys().collect();
        let parents: FastSet<&String> = self.parents.values().collect();

        let diff: Vec<&String> = parents.difference(&children).cloned().collect();

        match diff.len() {
            1 => Ok(diff[0].clone()),
            0 => {
                if children.is_empty() {
                    self.root
                        .clone()
                        .ok_or(Error::InvalidLineage("no edges or nodes"))
                } else {
                    Err(Error::InvalidLineage("no implicit root"))
                }
            }
            _ => Err(Error::InvalidLineage("more than one implicit root")),
        }
    }
}

pub struct RootwardPath<'a> {
    lineage: &'a Lineage,
    next: Option<&'a str>,
}

impl<'a> Iterator for RootwardPath<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.next?;
        self.next = self.lineage.parents.get(current).map(String::as_str);
        Some(current)
    }
}
