//! Auth context: backend addressing config, validated identifiers, and transport handles.

pub mod config;
pub mod context;
pub mod id;

pub use config::*;
pub use context::*;
pub use id::*;
