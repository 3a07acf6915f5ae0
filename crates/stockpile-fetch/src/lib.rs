//! Remote provider client and cache artifact layout.
//!
//! The retrieval loop talks to the remote data provider only through the
//! [`ComponentProvider`] trait; [`AlphaVantageClient`] is the production
//! implementation and tests substitute an in-memory mock.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockpile-rs/stockpile/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod artifact;
mod client;
mod provider;
pub mod url;

pub use artifact::{ArtifactError, component_exists, component_path, store_component};
pub use client::{AlphaVantageClient, ClientConfig, FetchError};
pub use provider::ComponentProvider;
