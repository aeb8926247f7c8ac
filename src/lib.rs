//! jiaxiao - Driving-school roster and training-hours manager
//!
//! A client for a remote collection-oriented HTTP store holding a
//! driving school's student roster and per-student practice-session
//! records. The store owns all durable state; every operation here works
//! on a freshly fetched snapshot.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`validate`] - Pure acceptance rules (ID cards, time grid, duration)
//! - [`models`] - Core data structures and types
//! - [`store`] - Remote store client (HTTP collections)
//! - [`roster`] - Student CRUD, search and sort
//! - [`training`] - Practice-session CRUD and totals
//! - [`transfer`] - CSV import/export engine
//! - [`commands`] - CLI command handlers
//!
//! # Example
//!
//! ```no_run
//! use jiaxiao::config::Config;
//! use jiaxiao::roster::RosterService;
//! use jiaxiao::store::RemoteStoreClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = RemoteStoreClient::new(config.store_config())?;
//!     let roster = RosterService::new(store);
//!     let students = roster.list(None).await?;
//!     println!("{} students", students.len());
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;
pub mod store;
pub mod training;
pub mod transfer;
pub mod validate;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, NotFoundError, Result, ValidationError};
    pub use crate::models::{
        Student, Subject3Status, TrainingRecord, VehicleType, WeakItem, SENTINEL_ID_CARD,
    };
    pub use crate::roster::{RosterService, SortField, SortOrder};
    pub use crate::store::{Collection, RemoteStoreClient, StoreConfig};
    pub use crate::training::{TrainingDraft, TrainingOverview, TrainingService};
    pub use crate::transfer::{ImportMode, ImportReport, TransferEngine};
}

// Direct re-exports for convenience
pub use models::{Student, Subject3Status, TrainingRecord, VehicleType, WeakItem};
