//! Exploratory data analysis session.
//!
//! A [`Session`] wraps one in-memory [`Table`], applies feature-engineering
//! transforms to it, records each one in a replayable [`Log`], and keeps
//! named snapshots of the table+log pair for branching exploration.
//!
//! ```no_run
//! use dora_eda::{DataSource, Mapper, Session};
//!
//! let mut session = Session::from_source(DataSource::from("data.csv"), Some("price"))?;
//! session.snapshot("raw")?;
//! session.extract_ordinal_feature("district")?;
//! session.extract_feature("area", "log_area", Mapper::numeric("ln", f64::ln))?;
//! session.impute_missing_values()?;
//! session.scale_input_values()?;
//! println!("{}", session.log().to_script());
//! session.use_snapshot("raw")?;
//! # Ok::<(), dora_eda::DoraError>(())
//! ```

pub mod data;
pub mod error;
pub mod plot;
pub mod session;
pub mod stats;

pub use data::model::{Column, ColumnKind, Table, Value};
pub use data::split::{SplitConfig, TrainValidationSplit};
pub use error::{DoraError, Result};
pub use plot::FeaturePlot;
pub use session::{DataSource, Log, LogEntry, Mapper, Session, SessionState};
