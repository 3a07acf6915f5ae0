//! Core types for the stockpile equity data cacher.
//!
//! This crate provides the fundamental data structures shared by the
//! stockpile workspace:
//!
//! - [`ComponentKind`] - One of the fixed categories of financial document
//!   fetched per ticker

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockpile-rs/stockpile/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod component;

pub use component::{ComponentKind, ComponentKindParseError};
