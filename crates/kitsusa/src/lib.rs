//! Occupational 3K (kitsui, kitanai, kiken) risk scoring.
//!
//! The [`evaluation`] module holds the scoring engine. [`config`] and
//! [`telemetry`] carry the environment-driven settings and tracing setup shared
//! by the command-line front end.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod telemetry;
