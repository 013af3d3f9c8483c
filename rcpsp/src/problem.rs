use std::fmt;

use hashbrown::HashSet;
use psp_lib_parser::structs::PspLibProblem;

use crate::error::{ScheduleError, ScheduleResult};

/// Read-only description of a single-mode RCPSP instance with 0-based job ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    capacities: Vec<usize>,
    durations: Vec<usize>,
    demands: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl Problem {
    /// Validates the instance and derives the predecessor lists from `successors`.
    ///
    /// Duplicate edges are merged; the first occurrence keeps its position.
    pub fn new(
        capacities: Vec<usize>,
        durations: Vec<usize>,
        demands: Vec<Vec<usize>>,
        successors: Vec<Vec<usize>>,
    ) -> ScheduleResult<Self> {
        let jobs = durations.len();
        let resources = capacities.len();

        if jobs == 0 {
            return Err(ScheduleError::InvalidConfiguration(
                "a problem needs at least one job".to_owned(),
            ));
        }
        if resources == 0 {
            return Err(ScheduleError::InvalidConfiguration(
                "a problem needs at least one resource".to_owned(),
            ));
        }
        if demands.len() != jobs || successors.len() != jobs {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "{jobs} durations but {} demand rows and {} successor lists",
                demands.len(),
                successors.len()
            )));
        }
        if let Some(resource) = capacities.iter().position(|&capacity| capacity == 0) {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "resource {resource} has no capacity"
            )));
        }

        for (job, job_demands) in demands.iter().enumerate() {
            if job_demands.len() != resources {
                return Err(ScheduleError::InvalidConfiguration(format!(
                    "job {job} lists {} demands for {resources} resources",
                    job_demands.len()
                )));
            }

            for (resource, (&demand, &capacity)) in job_demands.iter().zip(&capacities).enumerate()
            {
                if demand > capacity {
                    return Err(ScheduleError::InvalidConfiguration(format!(
                        "job {job} demands {demand} units of resource {resource} with capacity {capacity}"
                    )));
                }
            }
        }

        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut unique_successors = vec![vec![]; jobs];
        let mut predecessors = vec![vec![]; jobs];

        for (job, job_successors) in successors.into_iter().enumerate() {
            for successor in job_successors {
                if successor >= jobs {
                    return Err(ScheduleError::MalformedGraph(format!(
                        "job {job} names successor {successor} outside 0..{jobs}"
                    )));
                }
                if successor == job {
                    return Err(ScheduleError::MalformedGraph(format!(
                        "job {job} precedes itself"
                    )));
                }

                if seen.insert((job, successor)) {
                    unique_successors[job].push(successor);
                    predecessors[successor].push(job);
                }
            }
        }

        Ok(Self {
            capacities,
            durations,
            demands,
            successors: unique_successors,
            predecessors,
        })
    }

    pub fn number_of_jobs(&self) -> usize {
        self.durations.len()
    }

    pub fn number_of_resources(&self) -> usize {
        self.capacities.len()
    }

    pub fn duration(&self, job: usize) -> usize {
        self.durations[job]
    }

    pub fn demand(&self, job: usize, resource: usize) -> usize {
        self.demands[job][resource]
    }

    pub fn demands(&self, job: usize) -> &[usize] {
        &self.demands[job]
    }

    pub fn capacity(&self, resource: usize) -> usize {
        self.capacities[resource]
    }

    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    pub fn successors(&self, job: usize) -> &[usize] {
        &self.successors[job]
    }

    pub fn predecessors(&self, job: usize) -> &[usize] {
        &self.predecessors[job]
    }

    /// Upper bound on any finish time: running every job back to back always fits.
    pub fn horizon(&self) -> usize {
        let sum: usize = self.durations.iter().sum();
        let max = self.durations.iter().copied().max().unwrap_or(0);

        sum.max(max)
    }
}

impl TryFrom<&PspLibProblem> for Problem {
    type Error = ScheduleError;

    fn try_from(psp: &PspLibProblem) -> Result<Self, Self::Error> {
        if psp.resources.nonrenewable > 0 || psp.resources.doubly_constrained > 0 {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "only renewable resources are supported, found {} nonrenewable and {} doubly constrained",
                psp.resources.nonrenewable, psp.resources.doubly_constrained
            )));
        }

        let jobs = psp.jobs;
        let renewable = psp.resources.renewable;

        // PSPLIB numbers jobs from 1
        let job_index = |job_number: usize| job_number.checked_sub(1).filter(|&job| job < jobs);
        let unknown_job = |job_number: usize| format!("job number {job_number} outside 1..={jobs}");

        let mut durations: Vec<Option<usize>> = vec![None; jobs];
        let mut demands = vec![vec![]; jobs];

        for request in &psp.request_durations {
            if request.mode != 1 {
                return Err(ScheduleError::InvalidConfiguration(format!(
                    "job {} has execution mode {}, only single mode instances are supported",
                    request.job_number, request.mode
                )));
            }

            let job = job_index(request.job_number).ok_or_else(|| {
                ScheduleError::InvalidConfiguration(unknown_job(request.job_number))
            })?;
            durations[job] = Some(request.duration);
            demands[job] = request.requests.iter().take(renewable).copied().collect();
        }

        let durations = durations
            .into_iter()
            .enumerate()
            .map(|(job, duration)| {
                duration.ok_or_else(|| {
                    ScheduleError::InvalidConfiguration(format!(
                        "job {} has no duration",
                        job + 1
                    ))
                })
            })
            .collect::<ScheduleResult<Vec<_>>>()?;

        let mut successors = vec![vec![]; jobs];
        for relation in &psp.precedence_relations {
            let job = job_index(relation.job_number)
                .ok_or_else(|| ScheduleError::MalformedGraph(unknown_job(relation.job_number)))?;
            successors[job] = relation
                .successors
                .iter()
                .map(|&successor| {
                    job_index(successor)
                        .ok_or_else(|| ScheduleError::MalformedGraph(unknown_job(successor)))
                })
                .collect::<ScheduleResult<Vec<_>>>()?;
        }

        let capacities = psp
            .resource_availabilities
            .iter()
            .take(renewable)
            .copied()
            .collect();

        Self::new(capacities, durations, demands, successors)
    }
}

fn join_ids(ids: &[usize], width: usize) -> String {
    ids.iter()
        .map(|id| format!(" {:>width$}", id + 1))
        .collect()
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.number_of_jobs().to_string().len();
        let max_successors = self.successors.iter().map(Vec::len).max().unwrap_or(0);

        writeln!(f, "#jobs = {}", self.number_of_jobs())?;
        writeln!(f, "#resources = {}", self.number_of_resources())?;
        write!(f, "Capacities:")?;
        for capacity in &self.capacities {
            write!(f, " {capacity}")?;
        }
        writeln!(f)?;

        for job in 0..self.number_of_jobs() {
            let demands: String = self.demands[job]
                .iter()
                .map(|demand| format!(" {demand:>width$}"))
                .collect();
            let padding = (width + 1) * (max_successors - self.successors[job].len());

            writeln!(
                f,
                "Job {:>width$} | Duration: {:>2} | Req:{} | Succ:{}{:padding$} | Pred:{}",
                job + 1,
                self.durations[job],
                demands,
                join_ids(&self.successors[job], width),
                "",
                join_ids(&self.predecessors[job], width),
            )?;
        }

        Ok(())
    }
}
