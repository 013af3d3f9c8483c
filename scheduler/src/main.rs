#![forbid(unsafe_code)]
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, error};

mod commands;
mod export;

#[derive(Debug, Parser)]
#[command(version)]
/// GRASP scheduler for resource-constrained projects
struct App {
    #[command(flatten)]
    verbose: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a graphviz notation for specific psp lib problem
    Graph(Graph),
    /// Create a schedule for a given psp lib problem
    Schedule(Schedule),
    /// Schedule every psp lib problem of a folder and write the makespans
    Benchmark(Benchmark),
}

#[derive(Args, Debug)]
pub struct Graph {
    #[arg(required = true)]
    pub psp_problem_file: PathBuf,
    #[arg(required = true)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct Schedule {
    #[arg(required = true)]
    pub path: PathBuf,

    #[command(flatten)]
    pub grasp: GraspArgs,

    /// Print the parsed problem before scheduling
    #[arg(long)]
    pub print_problem: bool,

    /// Print the resource occupancy of the best schedule
    #[arg(long)]
    pub print_table: bool,

    /// Write a gnuplot script of the resource occupancy to FILE
    #[arg(long, value_name = "FILE")]
    pub gnuplot: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct Benchmark {
    #[arg(required = true)]
    pub psp_problem_file_folder: PathBuf,
    #[arg(required = true)]
    pub output: PathBuf,

    #[command(flatten)]
    pub grasp: GraspArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GraspArgs {
    /// Number of independent GRASP constructions
    #[arg(short, long, default_value_t = 100)]
    pub population_size: usize,

    /// 0 always picks the best ranked task, 1 picks any eligible task
    #[arg(short, long, default_value_t = 0.25)]
    pub alpha: f64,

    /// Base random seed, 0 seeds from the current time
    #[arg(long, default_value_t = 0)]
    pub random_seed: u64,

    /// Run the constructions on the calling thread
    #[arg(long)]
    pub sequential: bool,

    /// Number of worker threads, defaults to the number of cpus
    #[arg(long)]
    pub workers: Option<usize>,
}

fn main() {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    if let Err(err) = match args.command {
        Commands::Graph(graph) => commands::graph(graph),
        Commands::Schedule(schedule) => commands::schedule(schedule),
        Commands::Benchmark(benchmark) => commands::benchmark(benchmark),
    } {
        error!("An error occurred: {:#}", err);
        std::process::exit(1);
    }
}
