//! Application services layer.
//!
//! This module contains the file and process work that the UI never does
//! itself. Services know nothing about screens; the task runner calls them
//! on worker threads and reports their outcome as completion events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Control loop (App)                 │
//! │  ScreenController  ◄── completion events ──┐    │
//! └─────────────────────┬──────────────────────┼────┘
//!                       │ task requests        │
//!                       ▼                      │
//! ┌──────────────────────────────────────────────────┐
//! │                  TaskRunner                      │
//! └─────────────────────┬────────────────────────────┘
//!                       ▼
//! ┌──────────────────────────────────────────────────┐
//! │                Services Layer                    │
//! │  ┌──────────────┐ ┌───────────────┐ ┌───────────┐│
//! │  │ ProfileStore │ │ BackupService │ │SystemProbe││
//! │  └──────────────┘ └───────────────┘ └───────────┘│
//! └──────────────────────────────────────────────────┘
//! ```

pub mod backup_service;
pub mod process_watch;
pub mod profile_store;

// Re-export common types
pub use backup_service::BackupService;
pub use process_watch::{ProcessProbe, SystemProbe};
pub use profile_store::{ErrorKind, ProfileConfig, ProfileStore, StoreError, StorePaths};
