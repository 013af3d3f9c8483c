use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use crate::{
    dag::TaskGraph,
    error::{ScheduleError, ScheduleResult},
    problem::Problem,
    schedule::Schedule,
};

use super::{generation::generate_schedule, grasp::build_activity_list};
use super::{OptimizedSchedule, SchedulerOptions};

type Candidate = (usize, Schedule);

/// Seed of the random stream used by run `run`.
///
/// Only depends on the base seed and the run index, so a run draws the same numbers no matter
/// how many runs there are or which thread executes it.
pub fn run_seed(random_seed: u64, run: usize) -> u64 {
    // splitmix64 finaliser over the run index
    let mut z = random_seed
        .wrapping_add((run as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// One GRASP construction followed by serial schedule generation.
pub fn construct(graph: &TaskGraph, alpha: f64, seed: u64) -> ScheduleResult<Schedule> {
    let mut rng = StdRng::seed_from_u64(seed);
    let sequence = build_activity_list(graph, alpha, &mut rng)?;

    generate_schedule(graph, sequence)
}

/// Lower makespan wins, ties go to the earlier run so that the outcome does not depend on the
/// order in which runs complete.
fn fittest(a: Candidate, b: Candidate) -> Candidate {
    if (b.1.makespan(), b.0) < (a.1.makespan(), a.0) {
        b
    } else {
        a
    }
}

pub fn scheduler(problem: &Problem, options: &SchedulerOptions) -> ScheduleResult<OptimizedSchedule> {
    options.validate()?;
    let graph = TaskGraph::new(problem)?;

    schedule_population(&graph, options)
}

/// Runs `options.population_size` independent constructions over `graph` and keeps the one
/// with the smallest makespan.
pub fn schedule_population(
    graph: &TaskGraph,
    options: &SchedulerOptions,
) -> ScheduleResult<OptimizedSchedule> {
    options.validate()?;
    info!("options: {options:?}");

    let (lower_bound, critical_path) = graph.compute_lower_bound();
    info!("lower bound: {lower_bound}");
    debug!("critical path: {critical_path:?}");

    let run_op = |run: usize| -> ScheduleResult<Candidate> {
        let schedule = construct(graph, options.alpha, run_seed(options.random_seed, run))?;
        debug!("run {run}: makespan {}", schedule.makespan());

        Ok((run, schedule))
    };

    let best: Option<ScheduleResult<Candidate>> = if options.parallel {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.worker_count())
            .build()?;

        pool.install(|| {
            (0..options.population_size)
                .into_par_iter()
                .map(run_op)
                .try_reduce_with(|a, b| Ok(fittest(a, b)))
        })
    } else {
        (0..options.population_size)
            .map(run_op)
            .try_fold(
                None,
                |best: Option<Candidate>, candidate| -> ScheduleResult<Option<Candidate>> {
                    let candidate = candidate?;

                    Ok(Some(match best {
                        Some(best) => fittest(best, candidate),
                        None => candidate,
                    }))
                },
            )
            .transpose()
    };

    let (run, schedule) = best.ok_or_else(|| {
        ScheduleError::InvalidConfiguration("population size must be positive".to_owned())
    })??;

    info!("best_execution_schedule: {:?}", schedule.sequence());
    info!("best_execution_time: {} (run {run})", schedule.makespan());

    Ok(OptimizedSchedule {
        schedule,
        run,
        lower_bound,
    })
}
