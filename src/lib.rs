//! EVE Launch Manager - named profiles and backups for the EVE launcher
//!
//! The launcher keeps its settings in a single live state file. This crate
//! keeps one snapshot per named profile next to it, swaps snapshots in and
//! out on request, and writes zip backups, from a terminal UI or the CLI.

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod controller;
pub mod keymap;
pub mod services;
pub mod state;
pub mod styles;
pub mod tasks;
pub mod tui;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use controller::ScreenController;
pub use keymap::Action;
pub use services::{ProfileConfig, ProfileStore, StoreError};
