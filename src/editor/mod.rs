//! Editor layer.
//!
//! - `state`: the pieces, title and rules being edited, plus selection and tool state
//! - `session`: actor wrapping the state with debounced autosave through a gateway

pub mod state;
pub mod session;

pub use state::{AutosaveStatus, EditorCommand, EditorState};
pub use session::{Edit, EditorSession, Load, Save, SessionSnapshot, Snapshot};
