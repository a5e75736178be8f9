//! Library crate for orguser-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Directory service models, backends and background fetches (`api`)
//! - Application state, the add-user dialog and the update loop (`app`)
//! - Error and result types (`error`)
//! - UI rendering (`ui`)
//!
//! It is used by the `orguser-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod error;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
