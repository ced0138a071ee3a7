//! Mentorship session dashboard core: load a session log, filter it, and
//! report which counties have no submissions under the current filter.
//!
//! The egui shell lives in the `county-dashboard` binary; everything here is
//! UI-free and synchronous.

pub mod config;
pub mod data;
pub mod error;

pub use data::filter::{apply, DateRange, FilterSelection, FilteredView};
pub use data::model::{Gender, LoadReport, SessionRecord};
pub use data::registry::CountyRegistry;
pub use error::LoadError;
