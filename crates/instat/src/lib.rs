//! `instat` - Record keeping for institutional statistics
//!
//! This library stores enrollment, staff, hostel, programme, placement and
//! scholarship records as flat CSV files, one file per collection, and
//! derives the dashboard counts from them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod logging;
pub mod record;
pub mod schema;
pub mod storage;

pub use config::Config;
pub use dashboard::DashboardStats;
pub use error::{Error, Result};
pub use forms::{apply, build_record, Action, FormData, Outcome};
pub use logging::init_logging;
pub use record::Record;
pub use schema::{Collection, Field, FieldDefault};
pub use storage::{CollectionStats, RecordStore};
