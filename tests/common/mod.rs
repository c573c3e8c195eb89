use std::path::PathBuf;

use lineome::{Config, GraphStore};

pub fn resource(relpath: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("resources/test");
    p.push(relpath);
    p
}

pub fn test_config() -> Config {
    Config {
        lineage_path: resource("lineage.json"),
        connectome_path: resource("connectome.json"),
        locations_path: resource("locations.json"),
        ..Config::default()
    }
}

pub fn store() -> GraphStore {
    GraphStore::new(test_config())
}
