use crate::infra::{load_catalog, load_engine, read_request};
use crate::render::{
    render_matrix_statistics, render_outcome, render_outcome_json, render_standards,
    render_validation, render_work_time,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use kitsusa::config::AppConfig;
use kitsusa::error::AppError;
use kitsusa::evaluation::{
    validate_evaluation_data, EvaluationError, FactorKind, InvalidCoordinateError,
};
use kitsusa::telemetry;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "kitsusa",
    about = "Score occupational 3K risk (physical, mental, environmental, hazard) from evaluation forms",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score an evaluation request and print the final 3K index
    Evaluate(EvaluateArgs),
    /// Check an evaluation request without scoring it
    Validate(InputArgs),
    /// Inspect the risk matrices
    Matrix {
        #[command(subcommand)]
        command: MatrixCommand,
    },
    /// Show the work-time class and multiplier for daily working hours
    WorkTime(WorkTimeArgs),
    /// List the loaded standards versions
    Standards(StandardsArgs),
}

#[derive(Subcommand, Debug)]
enum MatrixCommand {
    /// Print cell statistics for one factor's matrix
    Stats(MatrixArgs),
    /// Write one factor's matrix as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// Evaluation request JSON file
    #[arg(long)]
    pub(crate) input: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    #[command(flatten)]
    pub(crate) request: InputArgs,
    /// Score with the threshold formulas only
    #[arg(long)]
    pub(crate) no_matrix: bool,
    /// Use the standards version in force on this date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the full outcome as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MatrixArgs {
    /// Factor: physical, mental, environmental or hazard
    #[arg(value_parser = crate::infra::parse_factor)]
    pub(crate) factor: FactorKind,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) matrix: MatrixArgs,
    /// Destination file (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct WorkTimeArgs {
    /// Daily hours spent on the task
    #[arg(value_parser = crate::infra::parse_hours)]
    pub(crate) hours: f64,
    /// Use the standards version in force on this date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct StandardsArgs {
    /// Highlight the version in force on this date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Evaluate(args) => run_evaluate(&config, args),
        Command::Validate(args) => run_validate(&config, args),
        Command::Matrix { command } => match command {
            MatrixCommand::Stats(args) => run_matrix_stats(&config, args),
            MatrixCommand::Export(args) => run_matrix_export(&config, args),
        },
        Command::WorkTime(args) => run_work_time(&config, args),
        Command::Standards(args) => run_standards(&config, args),
    }
}

fn run_evaluate(config: &AppConfig, args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        request,
        no_matrix,
        as_of,
        json,
    } = args;

    let mut options = config.scoring.engine_options();
    if no_matrix {
        options.use_matrix = false;
    }
    let engine = load_engine(config, as_of, options)?;
    let request = read_request(&request.input)?;

    info!(
        evaluation_id = %request.evaluation_id,
        standards_version = %engine.standards().version,
        use_matrix = options.use_matrix,
        "evaluating request"
    );
    let outcome = engine.evaluate(&request)?;

    if json {
        render_outcome_json(&outcome)?;
    } else {
        render_outcome(&outcome, engine.standards());
    }
    Ok(())
}

fn run_validate(config: &AppConfig, args: InputArgs) -> Result<(), AppError> {
    let catalog = load_catalog(config)?;
    let standards = catalog.select(config.scoring.standards_as_of)?;
    let request = read_request(&args.input)?;

    let report = validate_evaluation_data(&request, &standards);
    render_validation(&request, &report);

    if report.is_valid {
        Ok(())
    } else {
        Err(EvaluationError::Invalid(report).into())
    }
}

fn run_matrix_stats(config: &AppConfig, args: MatrixArgs) -> Result<(), AppError> {
    let engine = load_engine(config, None, config.scoring.engine_options())?;
    let information = engine
        .matrix_information(args.factor)
        .ok_or(EvaluationError::Matrix(
            InvalidCoordinateError::MatrixUnavailable(args.factor),
        ))?;
    render_matrix_statistics(&information);
    Ok(())
}

fn run_matrix_export(config: &AppConfig, args: ExportArgs) -> Result<(), AppError> {
    let engine = load_engine(config, None, config.scoring.engine_options())?;
    let csv = engine.export_matrix(args.matrix.factor)?;

    match args.output {
        Some(path) => {
            fs::write(&path, csv)?;
            info!(factor = %args.matrix.factor, path = %path.display(), "matrix exported");
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn run_work_time(config: &AppConfig, args: WorkTimeArgs) -> Result<(), AppError> {
    let catalog = load_catalog(config)?;
    let standards = catalog.select(args.as_of.or(config.scoring.standards_as_of))?;
    let category = standards.work_time_factor(args.hours);
    render_work_time(args.hours, &category, &standards);
    Ok(())
}

fn run_standards(config: &AppConfig, args: StandardsArgs) -> Result<(), AppError> {
    let catalog = load_catalog(config)?;
    let selected = catalog.select(args.as_of.or(config.scoring.standards_as_of))?;
    render_standards(&catalog, &selected);
    Ok(())
}
