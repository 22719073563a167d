//! # crickdash-core
//!
//! Core library for crickdash - a terminal dashboard for canned aggregate
//! analytics over delivery-level cricket records in MySQL.
//!
//! This library provides:
//! - Domain types for datasets, values and query results
//! - The session-scoped connection manager (one connection per session)
//! - The fixed catalog of eleven analyses per dataset
//! - Chart classification keyed on analysis identity
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use crickdash_core::{catalog, Analysis, Dataset, ConnectParams, Session};
//!
//! # async fn run() -> crickdash_core::Result<()> {
//! let mut session = Session::new();
//! session.connect(&ConnectParams::default()).await?;
//!
//! let query = catalog::select(Analysis::TeamRuns, Dataset::Test, None);
//! let (result, charts) = session.run_analysis(&query).await?;
//! println!("{} rows, {} charts", result.rows.len(), charts.len());
//!
//! session.disconnect().await;
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use catalog::{Analysis, AnalysisQuery};
pub use chart::{Chart, ChartKind};
pub use config::Config;
pub use error::{Error, Result};
pub use session::{ConnectParams, Session};
pub use types::{Dataset, QueryResult, Row, Value};

// Public modules
pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod types;
