use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::connectome::{Attributes, Connectome};
use crate::error::{Error, Result};
use crate::lineage::Lineage;
use crate::utils::{FastMap, FastSet, Location};

/// Neuron name -> coordinate lookup, loaded once and shared by reference.
pub type NodeLocationMap = FastMap<String, Location<f64>>;

/// Fetches raw graph-document bytes by URI. Implemented by whichever remote
/// object-store client is in use; the loaders only need this surface.
pub trait RemoteStore {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>>;
}

/// One node of the lineage document. Identity comes from `name`; any
/// synthetic `id` in the document is ignored.
#[derive(Deserialize, Debug)]
struct TreeNode {
    name: Option<String>,
    #[serde(default)]
    children: Vec<TreeNode>,
}

#[derive(Deserialize, Debug)]
struct NodeEntry {
    id: String,
    #[serde(flatten)]
    attributes: Attributes,
}

#[derive(Deserialize, Debug)]
struct LinkEntry {
    source: String,
    target: String,
    #[serde(flatten)]
    attributes: Attributes,
}

/// Node-link serialization of an attributed directed graph.
#[derive(Deserialize, Debug)]
struct ConnectomeDoc {
    #[serde(default)]
    nodes: Vec<NodeEntry>,
    #[serde(default, alias = "edges")]
    links: Vec<LinkEntry>,
}

/// Loads the lineage, the connectome, and the location map from the paths
/// (or remote URI) named in its config.
pub struct GraphStore {
    config: Config,
    remote: Option<Box<dyn RemoteStore>>,
}

impl GraphStore {
    pub fn new(config: Config) -> GraphStore {
        GraphStore {
            config,
            remote: None,
        }
    }

    pub fn with_remote(config: Config, remote: Box<dyn RemoteStore>) -> GraphStore {
        GraphStore {
            config,
            remote: Some(remote),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses the lineage tree document, renaming every node by its `name`
    /// field.
    pub fn load_lineage(&self) -> Result<Lineage> {
        let doc: TreeNode = serde_json::from_str(&read_file(&self.config.lineage_path)?)?;

        let root = name_of(&doc)?.to_string();
        let mut seen: FastSet<String> = FastSet::default();
        seen.insert(root.clone());

        let mut parents: FastMap<String, String> = FastMap::default();
        let mut to_visit: Vec<(&TreeNode, String)> = doc
            .children
            .iter()
            .map(|child| (child, root.clone()))
            .collect();

        while let Some((node, parent)) = to_visit.pop() {
            let name = name_of(node)?.to_string();
            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateLineageName(name));
            }
            for child in &node.children {
                to_visit.push((child, name.clone()));
            }
            parents.insert(name, parent);
        }

        Lineage::from(parents, Some(root))
    }

    /// Parses the connectome document and attaches each neuron's coordinate
    /// from the location map.
    ///
    /// A neuron missing from the map simply lacks the attribute; with
    /// `debug` enabled that is reported as a diagnostic, never an error.
    pub fn load_connectome(&self, debug: bool) -> Result<Connectome> {
        let doc: ConnectomeDoc = match (&self.config.connectome_remote_uri, &self.remote) {
            (Some(uri), Some(remote)) => serde_json::from_slice(&remote.fetch(uri)?)?,
            _ => serde_json::from_str(&read_file(&self.config.connectome_path)?)?,
        };

        let mut connectome = Connectome::new();
        for node in doc.nodes {
            connectome.add_node_with(&node.id, node.attributes);
        }
        for link in doc.links {
            connectome.add_edge_with(&link.source, &link.target, link.attributes);
        }

        let locations = self.load_location_map()?;
        let names: Vec<String> = connectome.nodes().map(str::to_string).collect();
        for name in names {
            match locations.get(&name) {
                Some(location) => connectome.set_node_attr(
                    &name,
                    &self.config.location_key,
                    json!([location.x, location.y, location.z]),
                ),
                None => {
                    if debug {
                        debug!(neuron = %name, "no recorded location for neuron");
                    }
                }
            }
        }

        Ok(connectome)
    }

    /// Parses the flat name -> [x, y, z] coordinate document.
    pub fn load_location_map(&self) -> Result<NodeLocationMap> {
        let raw: FastMap<String, Vec<f64>> =
            serde_json::from_str(&read_file(&self.config.locations_path)?)?;

        raw.into_iter()
            .map(|(name, coords)| match coords[..] {
                [x, y, z] => Ok((name, Location { x, y, z })),
                _ => Err(Error::MalformedLocation { node: name }),
            })
            .collect()
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn name_of(node: &TreeNode) -> Result<&str> {
    node.name.as_deref().ok_or(Error::UnnamedLineageNode)
}
