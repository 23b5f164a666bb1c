//! Direct-manipulation editing: gestures, validation, optimistic commit and
//! undo/redo

pub mod controller;
pub mod error;
pub mod gesture;
pub mod history;

pub use controller::{DropOutcome, EditController, EditRules};
pub use error::{EditError, EditResult};
pub use gesture::{Gesture, GestureKind, GesturePhase, Preview, ResizeEdge, SnapRules};
pub use history::UndoHistory;
