//! # health-monitor
//!
//! Interactive patient health record monitor.
//!
//! [`HealthMonitor`] owns the shared [`PatientStore`](health_records::PatientStore)
//! and runs export, import and summary work in the background, handing back a
//! [`TaskHandle`] for each. [`Shell`] is the numbered-menu front end driven by
//! any async line source.

#![warn(missing_docs)]

mod error;
mod monitor;
mod shell;

pub use error::{MonitorError, MonitorResult};
pub use monitor::{HealthMonitor, SharedStore, TaskHandle};
pub use shell::{MenuChoice, Shell};
