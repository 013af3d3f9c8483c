pub mod dag;
pub mod error;
pub mod problem;
pub mod schedule;
pub mod scheduler;
pub mod sources_load;

pub use crate::error::{ScheduleError, ScheduleResult};
pub use crate::scheduler::population::scheduler;
