//! relevo-core
//!
//! Pure domain types for the Relevo handoff engine. No I/O and no score
//! arithmetic: this is the shared vocabulary of the system.

pub mod models;
