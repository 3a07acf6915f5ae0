//! Quota-governed incremental retrieval loop.
//!
//! The [`Cacher`] drives one pass at a time over the symbol universe:
//! skip tickers already recorded complete, fetch the missing components
//! of the rest through a [`ComponentProvider`], count every successful
//! call against the durable quota ledger, and checkpoint the completion
//! record once the whole universe is covered. Each pass returns a
//! [`PassSummary`] so callers (and tests) observe pass completion as an
//! event rather than a side effect buried in an infinite loop.
//!
//! [`ComponentProvider`]: stockpile_fetch::ComponentProvider

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockpile-rs/stockpile/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod cycle;
mod error;
mod planner;

pub use config::{Config, ConfigError};
pub use cycle::{Cacher, PassSummary};
pub use error::CacherError;
pub use planner::RetrievalPlanner;
