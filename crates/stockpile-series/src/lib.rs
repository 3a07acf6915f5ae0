//! Typed monthly time-series records.
//!
//! A [`MonthlyTimeSeries`] is parsed once from a cached provider document
//! and is immutable afterwards; it is owned solely by the caller that
//! parsed it.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockpile-rs/stockpile/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod monthly;

pub use monthly::{MonthlyBar, MonthlyTimeSeries, SeriesError, SeriesMetaData};
