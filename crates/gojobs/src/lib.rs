//! Matching core for the GoJobs marketplace.
//!
//! The [`marketplace`] module holds the typed records and the scorers that rank
//! jobs for candidates and jobs against each other. Binaries wire it up through
//! [`config`], [`telemetry`] and [`error`].

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
