//! CLI command handlers
//!
//! Each submodule backs one subcommand tree of the binary: the roster
//! table, one student's training page, and CSV transfer. Handlers build
//! their service from the loaded [`Config`](crate::config::Config), run
//! one operation, and print user-facing output in the same wording the
//! staff-facing front end uses.

pub mod roster;
pub mod training;
pub mod transfer;
