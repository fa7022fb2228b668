//! Boundary to the external routing engine.
//!
//! The combinatorial search lives outside this crate. An engine receives the
//! node count, the vehicle count, the depot, a transit-cost callback and a
//! [`SearchParameters`] value, and answers with an [`EngineTour`] or an
//! [`EngineFailure`]. Engines must be stateless between calls: one call solves
//! exactly one problem.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Strategy used to build the first feasible tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FirstSolutionStrategy {
    /// Let the engine choose.
    #[default]
    Automatic,
    /// Repeatedly extend the route along the cheapest outgoing arc.
    PathCheapestArc,
}

/// Improvement strategy applied after the first tour is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Metaheuristic {
    /// Let the engine choose.
    Automatic,
    /// Accept improving moves only and stop at the first local optimum.
    GreedyDescent,
    /// Escape local optima by penalising frequently used costly arcs.
    #[default]
    GuidedLocalSearch,
}

/// Returned when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownStrategy {
    kind: &'static str,
    value: String,
}

macro_rules! kebab_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// The kebab-case name accepted by [`FromStr`].
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownStrategy;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(UnknownStrategy {
                        kind: $kind,
                        value: value.to_owned(),
                    }),
                }
            }
        }
    };
}

kebab_names!(FirstSolutionStrategy, "first solution strategy", {
    Automatic => "automatic",
    PathCheapestArc => "path-cheapest-arc",
});

kebab_names!(Metaheuristic, "metaheuristic", {
    Automatic => "automatic",
    GreedyDescent => "greedy-descent",
    GuidedLocalSearch => "guided-local-search",
});

/// Search configuration handed to the engine.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use waytour_core::{Metaheuristic, SearchParameters};
///
/// let params = SearchParameters::default();
/// assert_eq!(params.metaheuristic, Metaheuristic::GuidedLocalSearch);
/// assert_eq!(params.time_limit, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParameters {
    /// Construction strategy for the first tour.
    pub first_solution: FirstSolutionStrategy,
    /// Improvement strategy.
    pub metaheuristic: Metaheuristic,
    /// Wall-clock budget for the whole search.
    pub time_limit: Duration,
}

impl SearchParameters {
    /// Default wall-clock budget.
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);

    /// Replace the time budget.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Replace the metaheuristic.
    #[must_use]
    pub const fn with_metaheuristic(mut self, metaheuristic: Metaheuristic) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }

    /// Replace the first solution strategy.
    #[must_use]
    pub const fn with_first_solution(mut self, first_solution: FirstSolutionStrategy) -> Self {
        self.first_solution = first_solution;
        self
    }
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            first_solution: FirstSolutionStrategy::default(),
            metaheuristic: Metaheuristic::default(),
            time_limit: Self::DEFAULT_TIME_LIMIT,
        }
    }
}

/// Pure function returning the cost of the arc `from -> to`.
pub type TransitCallback<'a> = &'a (dyn Fn(usize, usize) -> u64 + Sync);

/// Everything an engine needs to solve one problem.
#[derive(Clone, Copy)]
pub struct RoutingRequest<'a> {
    /// Number of nodes, indexed `0..node_count`.
    pub node_count: usize,
    /// Number of vehicles.
    pub vehicle_count: usize,
    /// Start and end node of every vehicle.
    pub depot: usize,
    /// Arc cost lookup, defined for every pair in `0..node_count`.
    pub transit: TransitCallback<'a>,
    /// Search configuration.
    pub parameters: &'a SearchParameters,
}

impl RoutingRequest<'_> {
    /// Evaluate the transit callback.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        (self.transit)(from, to)
    }
}

impl fmt::Debug for RoutingRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingRequest")
            .field("node_count", &self.node_count)
            .field("vehicle_count", &self.vehicle_count)
            .field("depot", &self.depot)
            .field("parameters", self.parameters)
            .finish_non_exhaustive()
    }
}

/// A tour produced by an engine.
///
/// `sequence` starts at the depot and is implicitly closed back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineTour {
    /// Visit order as node indices.
    pub sequence: Vec<usize>,
    /// Objective value reported by the engine.
    pub objective: u64,
}

/// The engine found no feasible tour within its budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineFailure {
    /// Free-form diagnostic from the engine.
    pub message: String,
}

impl EngineFailure {
    /// Construct a failure carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A routing engine able to find a closed tour through every node.
///
/// Calls may block for up to `parameters.time_limit`. Engines must return
/// their best feasible tour once the budget is spent rather than abort
/// mid-search. Engines must be `Send + Sync` so one instance can be shared.
pub trait RoutingEngine: Send + Sync {
    /// Solve `request`, producing a tour or a failure.
    fn route(&self, request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure>;
}

impl<E: RoutingEngine + ?Sized> RoutingEngine for Box<E> {
    fn route(&self, request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure> {
        (**self).route(request)
    }
}

impl<E: RoutingEngine + ?Sized> RoutingEngine for &E {
    fn route(&self, request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure> {
        (**self).route(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("guided-local-search", Metaheuristic::GuidedLocalSearch)]
    #[case("greedy-descent", Metaheuristic::GreedyDescent)]
    #[case("automatic", Metaheuristic::Automatic)]
    fn metaheuristic_round_trips_names(#[case] name: &str, #[case] expected: Metaheuristic) {
        let parsed: Metaheuristic = name.parse().expect("known name");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), name);
    }

    #[rstest]
    fn unknown_strategy_is_reported() {
        let err = "tabu".parse::<Metaheuristic>().expect_err("unknown name");
        assert_eq!(err.to_string(), "unknown metaheuristic \"tabu\"");
    }

    #[rstest]
    fn first_solution_parses_path_cheapest_arc() {
        let parsed: FirstSolutionStrategy = "path-cheapest-arc".parse().expect("known name");
        assert_eq!(parsed, FirstSolutionStrategy::PathCheapestArc);
    }

    #[rstest]
    fn builders_replace_fields() {
        let params = SearchParameters::default()
            .with_time_limit(Duration::from_secs(2))
            .with_metaheuristic(Metaheuristic::GreedyDescent)
            .with_first_solution(FirstSolutionStrategy::PathCheapestArc);
        assert_eq!(params.time_limit, Duration::from_secs(2));
        assert_eq!(params.metaheuristic, Metaheuristic::GreedyDescent);
        assert_eq!(params.first_solution, FirstSolutionStrategy::PathCheapestArc);
    }

    #[rstest]
    fn request_evaluates_callback() {
        let transit = |from: usize, to: usize| (from * 10 + to) as u64;
        let params = SearchParameters::default();
        let request = RoutingRequest {
            node_count: 3,
            vehicle_count: 1,
            depot: 0,
            transit: &transit,
            parameters: &params,
        };
        assert_eq!(request.cost(2, 1), 21);
    }
}
