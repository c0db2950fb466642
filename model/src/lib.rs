//! # docsort-model
//!
//! State and rules of the docsort dashboard, kept free of any browser or
//! server dependency so the web UI, the host and the tests share one copy.
//!
//! ## Core Components
//!
//! - [`tree`]: folder forest built from flat file paths
//! - [`selection`]: file and folder checkbox state
//! - [`category`]: manually authored categories and their sample documents
//! - [`wizard`]: step machines for category creation, OCR and classification
//! - [`progress`]: cosmetic progress simulators and the sequential batch runner
//! - [`history`]: change-history write-back records and history views
//! - [`stats`]: per-folder classification statistics
//! - [`session`]: header session countdown
//! - [`validation`]: form checks
//! - [`config`]: settings served to the web UI
//! - [`types`]: wire types of the document backend
//! - [`error`]: the shared error type

pub mod category;
pub mod config;
pub mod error;
pub mod history;
pub mod progress;
pub mod selection;
pub mod session;
pub mod stats;
pub mod tree;
pub mod types;
pub mod validation;
pub mod wizard;

pub use error::{ModelError, ModelResult};
