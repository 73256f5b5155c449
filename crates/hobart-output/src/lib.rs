#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{CycleExport, ExportError, ExportFormat, Exporter, SelectionRow, TargetExport};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{CycleSummary, RunSummary};
