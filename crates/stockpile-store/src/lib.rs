//! Durable quota and completion state for the stockpile equity data cacher.
//!
//! Both state objects write through to disk on every mutation: after any
//! operation returns, the in-memory view and the durable view agree. An
//! external kill at any point leaves the files consistent with "work
//! completed up to the last recorded step".

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockpile-rs/stockpile/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod completion;
mod error;
mod ledger;

pub use completion::CompletionSet;
pub use error::{Result, StoreError};
pub use ledger::{DEFAULT_PACE_EVERY, DEFAULT_PACE_WAIT, QuotaLedger};
