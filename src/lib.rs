//! Filter-and-aggregate engine behind the PPP / thesis dashboard.
//!
//! The full record table is loaded once; every filter interaction produces a
//! fresh [`FilterCriteria`] and each chart is recomputed from scratch.

pub mod config;
pub mod data;

pub use config::{ConfigError, DashboardConfig};
pub use data::filter::FilterCriteria;
pub use data::model::{Area, CellValue, Dataset, DateField, Dimension, Field, Record};
pub use data::view::{DashboardView, ViewOptions};
