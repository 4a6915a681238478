//! Options strings for solver runs.
//!
//! Each backend publishes a recommended options string ("0.5% gap,
//! 300 second time limit" by convention) used when the caller does not
//! supply one. Custom strings are forwarded verbatim as
//! whitespace-separated `key=value` pairs; the adapter never imposes
//! limits of its own.

use crate::domain::{SolverBackend, SolverOptions};

pub fn recommended_options(backend: SolverBackend) -> &'static str {
    match backend {
        SolverBackend::CoinCbc => "ratioGap=0.005 seconds=300",
        SolverBackend::Auto | SolverBackend::Highs => "mip_rel_gap=0.005 time_limit=300",
    }
}

/// Resolve the options protocol for a backend: recommended defaults,
/// nothing at all, or the caller's string as-is.
pub fn effective_options(options: &SolverOptions, backend: SolverBackend) -> Option<String> {
    match options {
        SolverOptions::Recommended => Some(recommended_options(backend).to_string()),
        SolverOptions::None => None,
        SolverOptions::Custom(s) => Some(s.clone()),
    }
}

/// Split an options string into `(key, value)` pairs. Entries without
/// `=` yield an empty value and are left to the backend to reject.
pub fn split_options(options: &str) -> Vec<(&str, &str)> {
    options
        .split_whitespace()
        .map(|entry| entry.split_once('=').unwrap_or((entry, "")))
        .collect()
}
