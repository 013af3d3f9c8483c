pub mod generation;
pub mod grasp;
pub mod population;

use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::Schedule;

#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Number of independent GRASP constructions.
    pub population_size: usize,
    /// Greediness of the restricted candidate list, 0 is pure greedy and 1 pure random.
    pub alpha: f64,
    /// Base seed; run `i` draws from a stream derived from this seed and `i`.
    pub random_seed: u64,
    pub parallel: bool,
    /// Worker threads for parallel runs, capped at the available hardware parallelism.
    pub workers: Option<usize>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            population_size: 100,
            alpha: 0.25,
            random_seed: 0,
            parallel: true,
            workers: None,
        }
    }
}

impl SchedulerOptions {
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.population_size == 0 {
            return Err(ScheduleError::InvalidConfiguration(
                "population size must be positive".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "alpha must lie in [0, 1], got {}",
                self.alpha
            )));
        }
        if self.workers == Some(0) {
            return Err(ScheduleError::InvalidConfiguration(
                "worker count must be positive".to_owned(),
            ));
        }

        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        let available = num_cpus::get();

        self.workers
            .map_or(available, |workers| workers.min(available))
            .max(1)
    }
}

#[derive(Debug, Clone)]
pub struct OptimizedSchedule {
    pub schedule: Schedule,
    /// Index of the run that produced `schedule`.
    pub run: usize,
    /// Critical path length, no schedule can finish earlier.
    pub lower_bound: usize,
}

impl OptimizedSchedule {
    pub fn duration(&self) -> usize {
        self.schedule.makespan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        assert!(SchedulerOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_invalid_options() {
        let invalid = [
            SchedulerOptions {
                population_size: 0,
                ..Default::default()
            },
            SchedulerOptions {
                alpha: 1.5,
                ..Default::default()
            },
            SchedulerOptions {
                alpha: -0.1,
                ..Default::default()
            },
            SchedulerOptions {
                alpha: f64::NAN,
                ..Default::default()
            },
            SchedulerOptions {
                workers: Some(0),
                ..Default::default()
            },
        ];

        for options in invalid {
            assert!(matches!(
                options.validate(),
                Err(ScheduleError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn worker_count_is_capped() {
        let options = SchedulerOptions {
            workers: Some(usize::MAX),
            ..Default::default()
        };

        assert_eq!(options.worker_count(), num_cpus::get());
        assert_eq!(
            SchedulerOptions {
                workers: Some(1),
                ..Default::default()
            }
            .worker_count(),
            1
        );
    }
}
