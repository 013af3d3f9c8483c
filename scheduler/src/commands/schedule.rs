use std::fs;

use anyhow::{Context, Result};
use log::{debug, info};
use rcpsp::scheduler;

use crate::{export, Schedule};

pub fn schedule(args: Schedule) -> Result<()> {
    let problem = super::load_problem(&args.path)?;
    debug!(
        "{} jobs on {} resources",
        problem.number_of_jobs(),
        problem.number_of_resources()
    );

    if args.print_problem {
        println!("{problem}");
    }

    let options = args.grasp.options();
    let best = scheduler(&problem, &options)?;

    let sequence: Vec<String> = best
        .schedule
        .sequence()
        .iter()
        .map(|job| (job + 1).to_string())
        .collect();

    println!("Best solution: {}", sequence.join(" "));
    println!("Best makespan: {}", best.duration());
    println!("Lower bound: {}", best.lower_bound);

    if args.print_table {
        print!("{}", export::Table(&best.schedule));
    }

    if let Some(path) = args.gnuplot {
        fs::write(&path, export::GnuplotScript(&best.schedule).to_string())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote gnuplot script to: {:?}", path);
    }

    Ok(())
}
