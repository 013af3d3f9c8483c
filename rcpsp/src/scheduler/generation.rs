use log::{error, trace};

use crate::{
    dag::TaskGraph,
    error::{ScheduleError, ScheduleResult},
    schedule::{Schedule, ScheduledTask},
    sources_load::{SourcesLoad, TimeResolution},
};

/// Serial schedule generation: places the tasks one by one in the order of `sequence`, each at
/// the earliest time that satisfies its predecessors and leaves room on every resource.
///
/// Start times are never revisited once committed.
pub fn generate_schedule(graph: &TaskGraph, sequence: Vec<usize>) -> ScheduleResult<Schedule> {
    validate_activity_list(graph, &sequence)?;

    let mut sources_load = TimeResolution::new(graph.capacities(), graph.horizon());
    let mut times = vec![ScheduledTask { start: 0, finish: 0 }; graph.len()];

    for &job_id in &sequence {
        let task = graph.task(job_id);

        let earliest_precedence_start_time = task
            .predecessors
            .iter()
            .map(|&predecessor| times[predecessor].finish)
            .max()
            .unwrap_or(0);

        let start = sources_load
            .get_earliest_start_time(&task.demands, earliest_precedence_start_time, task.duration)
            .map_err(|resource| {
                let err = ScheduleError::InfeasibleWindow {
                    task: job_id,
                    resource,
                    from: earliest_precedence_start_time,
                    horizon: graph.horizon(),
                };
                error!("{err}");
                err
            })?;

        times[job_id] = ScheduledTask {
            start,
            finish: start + task.duration,
        };
        sources_load.add_activity(start, task.duration, &task.demands, job_id);

        trace!(
            "task {job_id}: precedence start {earliest_precedence_start_time}, placed at {start}"
        );
    }

    let schedule = Schedule::new(sequence, times, sources_load.into_timelines());
    debug_assert!(schedule.is_precedence_feasible(graph));

    Ok(schedule)
}

/// Checks that `sequence` is a permutation of the task ids in which every task comes after all
/// of its predecessors.
pub fn validate_activity_list(graph: &TaskGraph, sequence: &[usize]) -> ScheduleResult<()> {
    if sequence.len() != graph.len() {
        return Err(ScheduleError::MalformedGraph(format!(
            "activity list holds {} of {} tasks",
            sequence.len(),
            graph.len()
        )));
    }

    let mut placed = vec![false; graph.len()];

    for &job_id in sequence {
        if job_id >= graph.len() || placed[job_id] {
            return Err(ScheduleError::MalformedGraph(format!(
                "task {job_id} is out of range or listed twice"
            )));
        }

        if let Some(&predecessor) = graph
            .task(job_id)
            .predecessors
            .iter()
            .find(|&&predecessor| !placed[predecessor])
        {
            return Err(ScheduleError::MalformedGraph(format!(
                "task {job_id} is listed before its predecessor {predecessor}"
            )));
        }

        placed[job_id] = true;
    }

    Ok(())
}
