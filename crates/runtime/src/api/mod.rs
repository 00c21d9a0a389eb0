//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate
//! so the scheduler internals can stay focused on orchestration.

pub mod errors;
pub mod events;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use events::SessionEvent;
pub use handle::RuntimeHandle;
