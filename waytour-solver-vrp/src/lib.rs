//! Routing engine for waytour backed by `vrp-core`.
//!
//! [`VrpEngine`] implements [`RoutingEngine`](waytour_core::RoutingEngine).
//! Each request is modelled as a single-vehicle problem whose vehicle starts
//! and ends at the depot, with one job per remaining node. Arc costs are read
//! once through the request's transit callback into a dense matrix before the
//! `vrp-core` evolutionary search runs.
//!
//! `vrp-core` has its own construction heuristics and metaheuristic
//! portfolio, so the strategy selectors in
//! [`SearchParameters`](waytour_core::SearchParameters) are logged but not
//! enforced. The time limit is honoured and, unless a generation cap is
//! configured, is the only stopping condition. Search progress is logged at
//! debug level under the `vrp_core` target.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod vrp;

pub use engine::{VrpEngine, VrpEngineConfig};
