pub mod cli;
pub mod component;
pub mod error;
pub mod geometry;
pub mod history;
pub mod netlist;
pub mod project;
pub mod schematic;
pub mod simulator;
pub mod spatial;
pub mod value;

// Re-export commonly used types
pub use component::{Category, Component, ComponentKind, Connection};
pub use error::{Result, SchematicError};
pub use geometry::{snap_to_grid, terminal_positions, Point, Viewport};
pub use history::{History, HistoryEntry};
pub use project::ProjectData;
pub use schematic::{Schematic, SchematicConfig};
pub use simulator::{SimulationResults, SimulationSummary};
pub use spatial::{TerminalHit, WireTool};
pub use value::parse_value;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
