use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::component::{Component, Connection};
use crate::error::Result;
use crate::schematic::Schematic;

/// Persisted document state, a direct dump of the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub counter: HashMap<String, u32>,
}

impl ProjectData {
    pub fn from_json(text: &str) -> Result<Self> {
        let mut data: ProjectData = serde_json::from_str(text)?;
        for component in &mut data.components {
            component.normalize();
        }
        Ok(data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a project file
    pub fn load(filename: impl AsRef<Path>) -> Result<Self> {
        let filename = filename.as_ref();
        let data = Self::from_json(&fs::read_to_string(filename)?)?;
        info!(
            "Loaded project {}: {} component(s), {} connection(s)",
            filename.display(),
            data.components.len(),
            data.connections.len()
        );
        Ok(data)
    }

    /// Write a project file
    pub fn save(&self, filename: impl AsRef<Path>) -> Result<()> {
        let filename = filename.as_ref();
        fs::write(filename, self.to_json()?)?;
        info!("Saved project to {}", filename.display());
        Ok(())
    }
}

impl Schematic {
    /// Snapshot the store for saving
    pub fn to_project(&self) -> ProjectData {
        ProjectData {
            components: self.components.clone(),
            connections: self.connections.clone(),
            counter: self.counter.clone(),
        }
    }

    /// Replace the whole store with `data`. Selection and history start empty.
    ///
    /// Name counters never fall behind the names already in use, so a file
    /// saved without `counter` still hands out fresh names.
    pub fn load_project(&mut self, data: ProjectData) {
        self.components = data.components;
        self.connections = data.connections;
        self.counter = data.counter;
        for component in &mut self.components {
            component.normalize();
        }
        self.seed_counter();
        self.history.clear();
        self.selected = None;
    }

    fn seed_counter(&mut self) {
        for component in &self.components {
            let prefix = component.kind.prefix();
            let used = component
                .name
                .strip_prefix(prefix)
                .and_then(|digits| digits.parse::<u32>().ok());
            if let Some(used) = used {
                let sequence = self.counter.entry(prefix.to_string()).or_insert(0);
                if *sequence < used {
                    debug!("Counter {} raised from {} to {}", prefix, sequence, used);
                    *sequence = used;
                }
            }
        }
    }

    /// Build a fresh document from a project file
    pub fn open(filename: impl AsRef<Path>) -> Result<Self> {
        let mut schematic = Schematic::new();
        schematic.load_project(ProjectData::load(filename)?);
        Ok(schematic)
    }
}
