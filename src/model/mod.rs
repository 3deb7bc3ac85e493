//! Domain model types (pure).
//!
//! Identifiers, the test hierarchy and run state. Nothing here performs I/O.

pub mod error;
pub mod hierarchy;
pub mod identifier;
pub mod key_action;
pub mod run_state;

// Re-export for convenience
pub use error::{AppError, DiscoveryError, LaunchError};
pub use hierarchy::{ClassNode, HierarchyNode, LeafNode, ModuleChild, ModuleNode, TestTree};
pub use identifier::{TestIdentifier, SEPARATOR};
pub use key_action::KeyAction;
pub use run_state::{RunEpoch, RunState, RunStatus, RunUpdate, StreamKind};
