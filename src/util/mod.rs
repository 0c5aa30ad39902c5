// Utility Module
// Presentation helpers shared by the CLI and the protocol roles

pub mod display;
pub mod pacing;

pub use display::{render_message, truncate};
pub use pacing::Pacing;
