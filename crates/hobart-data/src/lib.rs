#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod error;
pub mod market;
pub mod panel;
pub mod screen;

pub use calendar::{Month, TradingCalendar};
pub use error::{DataError, Result};
pub use market::MarketIndex;
pub use panel::{CoarseRecord, PricePanel};
pub use screen::{CoarseScreen, CoarseScreenConfig};
