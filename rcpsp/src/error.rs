use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The precedence relation is unusable: a cycle, a dangling id or a broken activity list.
    #[error("malformed precedence graph: {0}")]
    MalformedGraph(String),
    /// The horizon was sized too small for a placement. This is an engine defect, never retried.
    #[error(
        "no window for task {task} on resource {resource} from time {from} within horizon {horizon}"
    )]
    InfeasibleWindow {
        task: usize,
        resource: usize,
        from: usize,
        horizon: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
