//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod encumbrance;
mod read_profile;

pub use encumbrance::Encumbrance;
pub use read_profile::ReadProfile;
