use std::collections::{BTreeMap, HashMap};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::component::{Category, Component, ComponentKind, Connection};
use crate::error::{Result, SchematicError};
use crate::geometry::{snap_to_grid, Point, Viewport};
use crate::history::{History, HistoryEntry};

/// Tunable constants for editing, hit-testing and analysis
#[derive(Debug, Clone)]
pub struct SchematicConfig {
    pub grid_size: i32,
    pub terminal_hit_radius: f64,
    pub body_half_width: i32,
    pub body_half_height: i32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub default_supply_voltage: f64,
    pub arrange_origin: i32,
    pub arrange_spacing: i32,
    pub fit_margin: i32,
    pub fit_max_zoom: f64,
}

impl Default for SchematicConfig {
    fn default() -> Self {
        SchematicConfig {
            grid_size: 20,
            terminal_hit_radius: 15.0,
            body_half_width: 50,
            body_half_height: 40,
            min_zoom: 0.2,
            max_zoom: 3.0,
            default_supply_voltage: 12.0,
            arrange_origin: 100,
            arrange_spacing: 120,
            fit_margin: 100,
            fit_max_zoom: 2.0,
        }
    }
}

/// One editable schematic document.
///
/// Owns every component and connection, the per-prefix name counters, the
/// undo/redo log and the current selection. Components and connections are
/// kept in insertion order, which hit-testing, the netlist and the analysis
/// all depend on.
#[derive(Debug, Clone, Default)]
pub struct Schematic {
    pub(crate) components: Vec<Component>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) counter: HashMap<String, u32>,
    pub(crate) history: History,
    pub(crate) selected: Option<Uuid>,
    pub(crate) config: SchematicConfig,
}

impl Schematic {
    /// Create an empty document with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with custom configuration
    pub fn with_config(config: SchematicConfig) -> Self {
        Schematic {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SchematicConfig {
        &self.config
    }

    /// A view transform using this document's zoom limits
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.min_zoom, self.config.max_zoom)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Highest sequence number handed out per name prefix
    pub fn counter(&self) -> &HashMap<String, u32> {
        &self.counter
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn component(&self, id: Uuid) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    fn component_mut(&mut self, id: Uuid) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Components at the far end of every wire touching `id`, in wire order.
    /// Wires whose far end no longer exists are skipped.
    pub fn connected_components(&self, id: Uuid) -> Vec<&Component> {
        self.connections
            .iter()
            .filter_map(|wire| wire.other_end(id))
            .filter_map(|other| self.component(other))
            .collect()
    }

    /// Number of live components per kind, keyed by type string
    pub fn kind_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for component in &self.components {
            *counts.entry(component.kind.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Live components grouped by category, groups in first-seen order
    pub fn components_by_category(&self) -> Vec<(Category, Vec<&Component>)> {
        let mut groups: Vec<(Category, Vec<&Component>)> = Vec::new();
        for component in &self.components {
            match groups.iter_mut().find(|(category, _)| *category == component.category) {
                Some((_, members)) => members.push(component),
                None => groups.push((component.category, vec![component])),
            }
        }
        groups
    }

    fn next_name(&mut self, kind: &ComponentKind) -> String {
        let prefix = kind.prefix();
        let sequence = self.counter.entry(prefix.to_string()).or_insert(0);
        *sequence += 1;
        format!("{}{}", prefix, sequence)
    }

    /// Place a new component of `kind` at `(x, y)`
    pub fn add_component(&mut self, kind: ComponentKind, x: i32, y: i32) -> &Component {
        let name = self.next_name(&kind);
        let component = Component::new(kind, name, x, y);
        info!("Added {} ({}) at ({}, {})", component.name, component.kind, x, y);

        self.history.record(HistoryEntry::AddComponent(component.clone()));
        self.components.push(component);
        &self.components[self.components.len() - 1]
    }

    /// Remove a component and every wire touching it. Returns the removed
    /// component, or `None` if it was not in the store.
    pub fn delete_component(&mut self, id: Uuid) -> Option<Component> {
        let index = self.components.iter().position(|c| c.id == id)?;

        let wires_before = self.connections.len();
        self.connections.retain(|wire| !wire.touches(id));
        let component = self.components.remove(index);
        info!(
            "Deleted {} and {} connection(s)",
            component.name,
            wires_before - self.connections.len()
        );

        self.history.record(HistoryEntry::DeleteComponent(component.clone()));
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(component)
    }

    /// Wire terminal `t1` of `c1` to terminal `t2` of `c2`.
    ///
    /// Both components must exist, must differ, and must have the named
    /// terminals; otherwise nothing is recorded.
    pub fn add_connection(&mut self, c1: Uuid, t1: usize, c2: Uuid, t2: usize) -> Result<&Connection> {
        if let Err(e) = self.check_endpoints(c1, t1, c2, t2) {
            warn!("Rejected connection: {}", e);
            return Err(e);
        }

        let connection = Connection::new(c1, t1, c2, t2);
        debug!("Connected {}:{} -> {}:{}", c1, t1, c2, t2);

        self.history.record(HistoryEntry::AddConnection(connection.clone()));
        self.connections.push(connection);
        Ok(&self.connections[self.connections.len() - 1])
    }

    fn check_endpoints(&self, c1: Uuid, t1: usize, c2: Uuid, t2: usize) -> Result<()> {
        if c1 == c2 {
            return Err(SchematicError::SelfConnection(c1));
        }
        for (id, terminal) in [(c1, t1), (c2, t2)] {
            let component = self.component(id).ok_or(SchematicError::UnknownComponent(id))?;
            if terminal >= component.terminal_count() {
                return Err(SchematicError::TerminalOutOfRange {
                    name: component.name.clone(),
                    terminal,
                    count: component.terminal_count(),
                });
            }
        }
        Ok(())
    }

    /// Turn a component by 90 degrees. Not recorded in history.
    pub fn rotate(&mut self, id: Uuid) -> Option<u16> {
        let component = self.component_mut(id)?;
        component.rotation = (component.rotation % 360 + 90) % 360;
        Some(component.rotation)
    }

    /// Not recorded in history
    pub fn set_visible(&mut self, id: Uuid, visible: bool) -> bool {
        match self.component_mut(id) {
            Some(component) => {
                component.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Not recorded in history
    pub fn set_value(&mut self, id: Uuid, value: impl Into<String>) -> bool {
        match self.component_mut(id) {
            Some(component) => {
                component.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Drag a component: `to` is snapped to the grid. Not recorded in history.
    pub fn move_component(&mut self, id: Uuid, to: Point) -> Option<Point> {
        let snapped = snap_to_grid(to, self.config.grid_size);
        let component = self.component_mut(id)?;
        component.x = snapped.x;
        component.y = snapped.y;
        Some(snapped)
    }

    pub fn show_all(&mut self) {
        for component in &mut self.components {
            component.visible = true;
        }
    }

    pub fn hide_all(&mut self) {
        for component in &mut self.components {
            component.visible = false;
        }
    }

    /// Lay components out on a square grid in insertion order
    pub fn auto_arrange(&mut self) {
        if self.components.is_empty() {
            return;
        }
        let cols = (self.components.len() as f64).sqrt().ceil() as usize;
        let origin = self.config.arrange_origin;
        let spacing = self.config.arrange_spacing;

        for (i, component) in self.components.iter_mut().enumerate() {
            component.x = origin + (i % cols) as i32 * spacing;
            component.y = origin + (i / cols) as i32 * spacing;
        }
    }

    /// Empty the document and reset name counters. Cannot be undone.
    pub fn clear(&mut self) {
        self.components.clear();
        self.connections.clear();
        self.counter.clear();
        self.history.clear();
        self.selected = None;
        info!("Schematic cleared");
    }

    /// Revert the most recent recorded mutation. Returns false if there was
    /// nothing to undo.
    ///
    /// Undoing a deletion restores the component only; wires removed with it
    /// stay removed.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo() else {
            return false;
        };
        debug!("Undo {}", entry.label());

        match entry {
            HistoryEntry::AddComponent(component) => {
                self.components.retain(|c| c.id != component.id);
            }
            HistoryEntry::DeleteComponent(component) => {
                self.components.push(component);
            }
            HistoryEntry::AddConnection(connection) => {
                self.connections.retain(|w| w.id != connection.id);
            }
        }
        self.drop_stale_selection();
        true
    }

    /// Re-apply the most recently undone mutation. Returns false if there was
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo() else {
            return false;
        };
        debug!("Redo {}", entry.label());

        match entry {
            HistoryEntry::AddComponent(component) => {
                self.components.push(component);
            }
            HistoryEntry::DeleteComponent(component) => {
                self.components.retain(|c| c.id != component.id);
            }
            HistoryEntry::AddConnection(connection) => {
                self.connections.push(connection);
            }
        }
        self.drop_stale_selection();
        true
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selected {
            if self.component(id).is_none() {
                self.selected = None;
            }
        }
    }

    /// Select a component; returns false if it does not exist
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.component(id).is_some() {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// Select the most recently added component
    pub fn select_last(&mut self) {
        if let Some(last) = self.components.last() {
            self.selected = Some(last.id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Component> {
        self.selected.and_then(|id| self.component(id))
    }

    /// No-op without a selection
    pub fn delete_selected(&mut self) -> Option<Component> {
        let id = self.selected?;
        self.delete_component(id)
    }

    /// No-op without a selection
    pub fn rotate_selected(&mut self) -> Option<u16> {
        let id = self.selected?;
        self.rotate(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_component_uses_type_table() {
        let mut schematic = Schematic::new();
        let resistor = schematic.add_component(ComponentKind::Resistor, 100, 200).clone();

        assert_eq!(resistor.name, "R1");
        assert_eq!(resistor.value, "1k");
        assert_eq!((resistor.x, resistor.y), (100, 200));
        assert_eq!(schematic.components().len(), 1);
        assert_eq!(schematic.history().undo_entries().len(), 1);

        let other = schematic.add_component(ComponentKind::Other("widget".into()), 0, 0);
        assert_eq!(other.name, "X1");
        assert_eq!(other.terminals, vec![(-30, 0), (30, 0)]);
    }

    #[test]
    fn test_names_share_prefix_counter() {
        let mut schematic = Schematic::new();
        let d1 = schematic.add_component(ComponentKind::Diode, 0, 0).name.clone();
        let d2 = schematic.add_component(ComponentKind::Led, 0, 0).name.clone();
        let v1 = schematic.add_component(ComponentKind::VoltageSource, 0, 0).name.clone();
        let v2 = schematic.add_component(ComponentKind::VoltageAc, 0, 0).name.clone();
        assert_eq!((d1.as_str(), d2.as_str()), ("D1", "D2"));
        assert_eq!((v1.as_str(), v2.as_str()), ("V1", "V2"));
    }

    #[test]
    fn test_names_stay_unique_across_deletions() {
        let mut schematic = Schematic::new();
        for _ in 0..3 {
            let id = schematic.add_component(ComponentKind::Capacitor, 0, 0).id;
            schematic.add_component(ComponentKind::Capacitor, 0, 0);
            schematic.delete_component(id);
        }

        let mut names: Vec<&str> = schematic.components().iter().map(|c| c.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["C2", "C4", "C6"]);
        assert_eq!(schematic.counter()["C"], 6);
    }

    #[test]
    fn test_add_then_delete_restores_collections() {
        for kind in ComponentKind::ALL.iter() {
            let mut schematic = Schematic::new();
            let a = schematic.add_component(ComponentKind::Resistor, 0, 0).id;
            let b = schematic.add_component(ComponentKind::Capacitor, 100, 0).id;
            schematic.add_connection(a, 1, b, 0).unwrap();
            let components = schematic.components().to_vec();
            let connections = schematic.connections().to_vec();

            let id = schematic.add_component(kind.clone(), 40, 40).id;
            assert!(schematic.delete_component(id).is_some());

            assert_eq!(schematic.components(), components.as_slice());
            assert_eq!(schematic.connections(), connections.as_slice());
        }
    }

    #[test]
    fn test_delete_cascades_connections() {
        let mut schematic = Schematic::new();
        let v = schematic.add_component(ComponentKind::VoltageSource, 0, 0).id;
        let r = schematic.add_component(ComponentKind::Resistor, 100, 0).id;
        let c = schematic.add_component(ComponentKind::Capacitor, 200, 0).id;
        schematic.add_connection(v, 0, r, 0).unwrap();
        schematic.add_connection(r, 1, c, 0).unwrap();
        schematic.add_connection(c, 1, v, 1).unwrap();

        schematic.delete_component(r);
        assert_eq!(schematic.connections().len(), 1);
        assert!(schematic.connections().iter().all(|w| !w.touches(r)));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut schematic = Schematic::new();
        schematic.add_component(ComponentKind::Resistor, 0, 0);
        assert!(schematic.delete_component(Uuid::new_v4()).is_none());
        assert_eq!(schematic.history().undo_entries().len(), 1);
    }

    #[test]
    fn test_connection_preconditions() {
        let mut schematic = Schematic::new();
        let r = schematic.add_component(ComponentKind::Resistor, 0, 0).id;
        let g = schematic.add_component(ComponentKind::Ground, 100, 0).id;

        assert!(matches!(
            schematic.add_connection(r, 0, r, 1),
            Err(SchematicError::SelfConnection(_))
        ));
        assert!(matches!(
            schematic.add_connection(r, 0, g, 1),
            Err(SchematicError::TerminalOutOfRange { terminal: 1, count: 1, .. })
        ));
        assert!(matches!(
            schematic.add_connection(r, 0, Uuid::new_v4(), 0),
            Err(SchematicError::UnknownComponent(_))
        ));
        assert!(schematic.connections().is_empty());
        assert_eq!(schematic.history().undo_entries().len(), 2);

        let wire = schematic.add_connection(r, 1, g, 0).unwrap();
        assert_eq!((wire.from_terminal, wire.to_terminal), (1, 0));
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        let mut schematic = Schematic::new();
        let id = schematic.add_component(ComponentKind::Opamp, 0, 0).id;

        assert_eq!(schematic.rotate(id), Some(90));
        assert_eq!(schematic.rotate(id), Some(180));
        assert_eq!(schematic.rotate(id), Some(270));
        assert_eq!(schematic.rotate(id), Some(0));
        assert_eq!(schematic.history().undo_entries().len(), 1);
        assert_eq!(schematic.rotate(Uuid::new_v4()), None);
    }

    #[test]
    fn test_rotate_wraps_out_of_range_angle() {
        let mut schematic = Schematic::new();
        let id = schematic.add_component(ComponentKind::Resistor, 0, 0).id;
        schematic.component_mut(id).unwrap().rotation = u16::MAX;

        assert_eq!(schematic.rotate(id), Some((u16::MAX % 360 + 90) % 360));
    }

    #[test]
    fn test_field_edits_are_not_recorded() {
        let mut schematic = Schematic::new();
        let id = schematic.add_component(ComponentKind::Resistor, 0, 0).id;

        assert!(schematic.set_value(id, "4k7"));
        assert!(schematic.set_visible(id, false));
        assert_eq!(schematic.move_component(id, Point::new(33, 47)), Some(Point::new(40, 40)));

        let component = schematic.component(id).unwrap();
        assert_eq!(component.value, "4k7");
        assert!(!component.visible);
        assert_eq!(component.position(), Point::new(40, 40));
        assert_eq!(schematic.history().undo_entries().len(), 1);
    }

    #[test]
    fn test_undo_redo_add_component() {
        let mut schematic = Schematic::new();
        schematic.add_component(ComponentKind::Resistor, 0, 0);
        let added = schematic.add_component(ComponentKind::Inductor, 60, 80).clone();

        assert!(schematic.undo());
        assert!(schematic.component(added.id).is_none());
        assert_eq!(schematic.components().len(), 1);
        assert_eq!(schematic.history().redo_entries().len(), 1);

        assert!(schematic.redo());
        assert_eq!(schematic.component(added.id), Some(&added));
    }

    #[test]
    fn test_undo_delete_does_not_restore_wires() {
        let mut schematic = Schematic::new();
        let a = schematic.add_component(ComponentKind::Resistor, 0, 0).id;
        let b = schematic.add_component(ComponentKind::Resistor, 100, 0).id;
        schematic.add_connection(a, 1, b, 0).unwrap();

        schematic.delete_component(b);
        assert!(schematic.connections().is_empty());

        assert!(schematic.undo());
        assert!(schematic.component(b).is_some());
        assert!(schematic.connections().is_empty());
        // Restored components go to the end of the collection
        assert_eq!(schematic.components().last().map(|c| c.id), Some(b));
    }

    #[test]
    fn test_undo_redo_connection() {
        let mut schematic = Schematic::new();
        let a = schematic.add_component(ComponentKind::Resistor, 0, 0).id;
        let b = schematic.add_component(ComponentKind::Resistor, 100, 0).id;
        let wire = schematic.add_connection(a, 1, b, 0).unwrap().clone();

        assert!(schematic.undo());
        assert!(schematic.connections().is_empty());
        assert!(schematic.redo());
        assert_eq!(schematic.connections(), &[wire]);
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut schematic = Schematic::new();
        schematic.add_component(ComponentKind::Resistor, 0, 0);
        schematic.undo();
        schematic.add_component(ComponentKind::Capacitor, 0, 0);

        assert!(!schematic.redo());
        assert_eq!(schematic.components().len(), 1);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut schematic = Schematic::new();
        assert!(!schematic.undo());
        assert!(!schematic.redo());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut schematic = Schematic::new();
        let id = schematic.add_component(ComponentKind::Resistor, 0, 0).id;
        schematic.select(id);
        schematic.clear();

        assert!(schematic.components().is_empty());
        assert!(schematic.counter().is_empty());
        assert!(schematic.selected().is_none());
        assert!(!schematic.undo());
        assert_eq!(schematic.add_component(ComponentKind::Resistor, 0, 0).name, "R1");
    }

    #[test]
    fn test_selection() {
        let mut schematic = Schematic::new();
        assert!(schematic.delete_selected().is_none());
        assert!(schematic.rotate_selected().is_none());

        schematic.add_component(ComponentKind::Resistor, 0, 0);
        let last = schematic.add_component(ComponentKind::Fuse, 0, 0).id;
        schematic.select_last();
        assert_eq!(schematic.selected().map(|c| c.id), Some(last));
        assert_eq!(schematic.rotate_selected(), Some(90));

        assert!(schematic.delete_selected().is_some());
        assert!(schematic.selected().is_none());
        assert!(!schematic.select(last));
    }

    #[test]
    fn test_connected_components() {
        let mut schematic = Schematic::new();
        let r = schematic.add_component(ComponentKind::Resistor, 0, 0).id;
        let i = schematic.add_component(ComponentKind::CurrentSource, 100, 0).id;
        let g = schematic.add_component(ComponentKind::Ground, 0, 100).id;
        schematic.add_connection(r, 0, i, 0).unwrap();
        schematic.add_connection(g, 0, r, 1).unwrap();

        let names: Vec<&str> = schematic.connected_components(r).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["I1", "GND1"]);
    }

    #[test]
    fn test_visibility_and_arrange() {
        let mut schematic = Schematic::new();
        for _ in 0..5 {
            schematic.add_component(ComponentKind::Switch, 0, 0);
        }
        schematic.hide_all();
        assert!(schematic.components().iter().all(|c| !c.visible));
        schematic.show_all();
        assert!(schematic.components().iter().all(|c| c.visible));

        schematic.auto_arrange();
        let positions: Vec<(i32, i32)> = schematic.components().iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(positions, vec![(100, 100), (220, 100), (340, 100), (100, 220), (220, 220)]);
    }

    #[test]
    fn test_kind_counts() {
        let mut schematic = Schematic::new();
        schematic.add_component(ComponentKind::Resistor, 0, 0);
        schematic.add_component(ComponentKind::Resistor, 0, 0);
        schematic.add_component(ComponentKind::Inductor, 0, 0);

        let counts = schematic.kind_counts();
        assert_eq!(counts.get("resistor"), Some(&2));
        assert_eq!(counts.get("indutor"), Some(&1));
    }

    #[test]
    fn test_components_by_category() {
        let mut schematic = Schematic::new();
        schematic.add_component(ComponentKind::VoltageSource, 0, 0);
        schematic.add_component(ComponentKind::Resistor, 0, 0);
        schematic.add_component(ComponentKind::Vcc, 0, 0);
        let hidden = schematic.add_component(ComponentKind::Capacitor, 0, 0).id;
        schematic.set_visible(hidden, false);

        let groups = schematic.components_by_category();
        let summary: Vec<(Category, Vec<&str>)> = groups
            .iter()
            .map(|(category, members)| (*category, members.iter().map(|c| c.name.as_str()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Category::Source, vec!["V1", "VCC1"]),
                (Category::Passive, vec!["R1", "C1"]),
            ]
        );
        assert!(Schematic::new().components_by_category().is_empty());
    }
}
