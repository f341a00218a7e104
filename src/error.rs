use thiserror::Error;
use uuid::Uuid;

/// Result type alias using [`SchematicError`].
pub type Result<T> = std::result::Result<T, SchematicError>;

/// Errors surfaced by the schematic core.
///
/// Editing operations are total; only the checked wiring precondition and
/// project file access can fail.
#[derive(Error, Debug)]
pub enum SchematicError {
    /// Reading or writing a project file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A project file could not be (de)serialized
    #[error("Invalid project data: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing tabular results failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A connection referenced a component that is not in the store
    #[error("Component {0} not found")]
    UnknownComponent(Uuid),

    /// Both ends of a connection are on the same component
    #[error("Cannot connect component {0} to itself")]
    SelfConnection(Uuid),

    /// A connection referenced a terminal the component does not have
    #[error("Terminal {terminal} out of range for {name} ({count} terminals)")]
    TerminalOutOfRange {
        name: String,
        terminal: usize,
        count: usize,
    },
}
