//! Solve command implementation for the waytour CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waytour_core::{
    ArrowStyle, DistanceScale, FirstSolutionStrategy, Metaheuristic, PlannedTour, PlannerConfig,
    RoutingEngine, SearchParameters, TourPlanner, render_arrow_chain, render_original_route,
    render_polyline,
};
use waytour_solver_vrp::{VrpEngine, VrpEngineConfig};

use crate::files::file_is_file;
use crate::input::load_places;
use crate::{
    ARG_SOLVE_FIRST_SOLUTION, ARG_SOLVE_FORMAT, ARG_SOLVE_INPUT, ARG_SOLVE_MAX_GENERATIONS,
    ARG_SOLVE_METAHEURISTIC, ARG_SOLVE_NO_ACTIVITIES, ARG_SOLVE_SCALE, ARG_SOLVE_TIME_LIMIT,
    CliError, ENV_SOLVE_INPUT,
};

/// How the solved tour is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum OutputFormat {
    /// `A (coffee) -> B (museum) -> A`.
    #[default]
    Arrows,
    /// One `{lat: .., lng: ..}, // Name` line per stop.
    Polyline,
    /// A JSON array of `{lat, lng, name}` records.
    Json,
}

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve the shortest closed tour through the places listed \
                 in a CSV file with the columns Place, Activity, Lat and \
                 Long. The first row is the start and end of the tour. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Solve a closed tour through a list of places"
)]
#[ortho_config(prefix = "WAYTOUR")]
pub(crate) struct SolveArgs {
    /// Path to the CSV file listing the places.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Output format: arrows, polyline or json.
    #[arg(long = ARG_SOLVE_FORMAT, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Multiplier applied to coordinate differences before truncation.
    #[arg(long = ARG_SOLVE_SCALE, value_name = "factor")]
    #[serde(default)]
    pub(crate) scale: Option<f64>,
    /// Search time budget in whole seconds.
    #[arg(long = ARG_SOLVE_TIME_LIMIT, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_limit_secs: Option<u64>,
    /// Local search metaheuristic.
    #[arg(long = ARG_SOLVE_METAHEURISTIC, value_name = "name")]
    #[serde(default)]
    pub(crate) metaheuristic: Option<Metaheuristic>,
    /// Strategy for the first solution.
    #[arg(long = ARG_SOLVE_FIRST_SOLUTION, value_name = "name")]
    #[serde(default)]
    pub(crate) first_solution: Option<FirstSolutionStrategy>,
    /// Print place names only, without activities.
    #[arg(long = ARG_SOLVE_NO_ACTIVITIES)]
    #[serde(default)]
    pub(crate) no_activities: bool,
    /// Optional cap on engine generations; the time limit applies either way.
    #[arg(long = ARG_SOLVE_MAX_GENERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_generations: Option<usize>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SolveConfig {
    /// Path to the places CSV.
    pub(crate) input: Utf8PathBuf,
    /// Output format.
    pub(crate) format: OutputFormat,
    /// Scale and search parameters.
    pub(crate) planner: PlannerConfig,
    /// Arrow chain formatting.
    pub(crate) style: ArrowStyle,
    /// Engine tuning.
    pub(crate) engine: VrpEngineConfig,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.input, ARG_SOLVE_INPUT)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_INPUT,
            env: ENV_SOLVE_INPUT,
        })?;

        let scale = args
            .scale
            .map_or(Ok(DistanceScale::DEFAULT), DistanceScale::new)
            .map_err(CliError::InvalidScale)?;
        let time_limit = match args.time_limit_secs {
            Some(0) => return Err(CliError::ZeroTimeLimit),
            Some(secs) => Duration::from_secs(secs),
            None => SearchParameters::DEFAULT_TIME_LIMIT,
        };
        let defaults = SearchParameters::default();
        let search = defaults
            .with_time_limit(time_limit)
            .with_metaheuristic(args.metaheuristic.unwrap_or(defaults.metaheuristic))
            .with_first_solution(args.first_solution.unwrap_or(defaults.first_solution));
        let engine = VrpEngineConfig {
            max_generations: args.max_generations,
        };

        Ok(Self {
            input,
            format: args.format.unwrap_or_default(),
            planner: PlannerConfig { scale, search },
            style: ArrowStyle {
                with_activities: !args.no_activities,
            },
            engine,
        })
    }
}

/// Builds the routing engine for the current solve invocation.
pub(super) trait EngineBuilder {
    fn build(&self, config: &SolveConfig) -> Box<dyn RoutingEngine>;
}

pub(super) struct DefaultEngineBuilder;

impl EngineBuilder for DefaultEngineBuilder {
    fn build(&self, config: &SolveConfig) -> Box<dyn RoutingEngine> {
        Box::new(VrpEngine::with_config(config.engine))
    }
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_solve_with(args, &DefaultEngineBuilder, &mut stdout)
}

pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn EngineBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_solve_config(args)?;
    let planned = execute_solve(&config, builder)?;
    write_tour(writer, &planned, &config)
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn execute_solve(config: &SolveConfig, builder: &dyn EngineBuilder) -> Result<PlannedTour, CliError> {
    let places = load_places(&config.input)?;
    log::info!("loaded {} places from {}", places.len(), config.input);
    for place in &places {
        log::debug!(
            "  {} | {} | {} {}",
            place.name,
            place.activity,
            place.latitude(),
            place.longitude()
        );
    }
    log::info!(
        "original route: {}",
        render_original_route(&places, config.style)
    );

    let planner = TourPlanner::new(builder.build(config), config.planner);
    let planned = planner.plan(places)?;
    log::info!("optimised route costs {}", planned.tour.total_cost());
    Ok(planned)
}

fn write_tour(
    writer: &mut dyn Write,
    planned: &PlannedTour,
    config: &SolveConfig,
) -> Result<(), CliError> {
    match config.format {
        OutputFormat::Arrows => {
            let chain = render_arrow_chain(&planned.model, &planned.tour, config.style)?;
            writeln!(writer, "{chain}").map_err(CliError::WriteOutput)?;
        }
        OutputFormat::Polyline => {
            for point in render_polyline(&planned.model, &planned.tour)? {
                writeln!(writer, "{point}").map_err(CliError::WriteOutput)?;
            }
        }
        OutputFormat::Json => {
            let points = render_polyline(&planned.model, &planned.tour)?;
            let payload =
                serde_json::to_string_pretty(&points).map_err(CliError::SerializeOutput)?;
            writeln!(writer, "{payload}").map_err(CliError::WriteOutput)?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
