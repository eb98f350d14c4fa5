use std::io;
use std::path::PathBuf;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;

use school_placements::config::AppConfig;
use school_placements::domain::normalize::{RuralScaling, ScalingTable};
use school_placements::domain::solve::solve_placements;
use school_placements::error::PlacementError;
use school_placements::loader::load_input;
use school_placements::report::{print_outcome, save_csv};
use school_placements::server::{backend_for, json_config, routes, AppState};

#[derive(Parser)]
#[command(
    name = "placements",
    about = "Assign students to Year 4 and Year 5 schools and a pathway",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one cohort from CSV files and print the assignment
    Solve(SolveArgs),
    /// Serve the placement HTTP API
    Serve,
}

#[derive(Args)]
struct SolveArgs {
    /// Schools: id,capacity,region or id,year4_capacity,year5_capacity,region
    schools: PathBuf,
    /// Pathways: id,capacity
    pathways: PathBuf,
    /// Students: id, year 4 ranks, year 5 ranks, pathway ranks, 3 scale indicators
    students: PathBuf,
    /// Solver backend (defaults to SOLVER or glpk)
    #[arg(long)]
    solver: Option<String>,
    /// Also write the assignment to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Preference scaling table, e.g. 1,1.2,1.5
    #[arg(long)]
    scaling: Option<String>,
    /// Uniform multiplier for one dimension, e.g. year5:0.8
    #[arg(long)]
    rural_scaling: Option<String>,
}

fn to_io(err: PlacementError) -> io::Error {
    io::Error::other(err.to_string())
}

fn run_solve(mut config: AppConfig, args: SolveArgs) -> Result<(), PlacementError> {
    if let Some(raw) = &args.scaling {
        config.normalizer.scaling = ScalingTable::parse(raw)?;
    }
    if let Some(raw) = &args.rural_scaling {
        config.normalizer.rural_scaling = Some(RuralScaling::parse(raw)?);
    }
    let solver = args.solver.unwrap_or(config.solver);

    let input = load_input(&args.schools, &args.pathways, &args.students)?;
    let mut backend = backend_for(&solver)?;
    let outcome = solve_placements(backend.as_mut(), &input, &config.normalizer)?;

    print_outcome(&mut io::stdout().lock(), &outcome)?;
    if let Some(path) = args.output {
        save_csv(path, &outcome)?;
    }
    Ok(())
}

async fn run_server(config: AppConfig) -> io::Result<()> {
    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let port = config.port;
    let json_limit = config.json_limit;
    let state = web::Data::new(AppState::new(config));

    log::info!("Starting server on http://127.0.0.1:{}", port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(sentry_actix::Sentry::new())
            .app_data(state.clone())
            .app_data(json_config(json_limit))
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().map_err(to_io)?;

    match cli.command {
        Commands::Solve(args) => run_solve(config, args).map_err(|err| {
            log::error!("{}", err);
            to_io(err)
        }),
        Commands::Serve => run_server(config).await,
    }
}
