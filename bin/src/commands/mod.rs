//! CLI command implementations.

pub(crate) mod plan;
pub(crate) mod run;
pub(crate) mod series;
pub(crate) mod status;
pub(crate) mod verify;
