use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use log::{info, trace};
use psp_lib_parser::parse_psp_lib;
use rcpsp::{problem::Problem, scheduler::SchedulerOptions};

use crate::GraspArgs;

mod benchmark;
mod graph;
mod schedule;

pub use benchmark::benchmark;
pub use graph::graph;
pub use schedule::schedule;

/// Reads and converts a psp lib instance.
pub(crate) fn load_problem(path: &Path) -> Result<Problem> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    trace!("input file contents: {contents}");

    let psp = parse_psp_lib(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    trace!("parsed psp: {psp:#?}");

    Problem::try_from(&psp).with_context(|| format!("unsupported instance {}", path.display()))
}

impl GraspArgs {
    pub(crate) fn options(&self) -> SchedulerOptions {
        let random_seed = if self.random_seed == 0 {
            let seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or(1);
            info!("random seed: {seed}");
            seed
        } else {
            self.random_seed
        };

        SchedulerOptions {
            population_size: self.population_size,
            alpha: self.alpha,
            random_seed,
            parallel: !self.sequential,
            workers: self.workers,
        }
    }
}
