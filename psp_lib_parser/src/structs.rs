#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspLibProblem {
    // file metadata
    pub file_with_basedata: String,
    pub initial_rng: usize,
    // metadata
    pub projects: usize,
    pub jobs: usize,
    pub horizon: usize,
    pub resources: PspLibProblemResources,
    // project info
    pub project_info: Vec<PspLibProjectInformation>,
    // precedence relations
    pub precedence_relations: Vec<PspLibPrecedenceRelation>,
    // requests/duration
    pub request_durations: Vec<PspLibRequestDuration>,
    // resource availabilities
    pub resource_availabilities: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PspLibProblemResources {
    pub renewable: usize,
    pub nonrenewable: usize,
    pub doubly_constrained: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PspLibProjectInformation {
    pub number: usize,
    pub jobs: usize,
    pub relative_date: usize,
    pub due_date: usize,
    pub tard_cost: usize,
    pub mpm_time: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspLibPrecedenceRelation {
    pub job_number: usize,
    pub mode_count: usize,
    pub successor_count: usize,
    pub successors: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspLibRequestDuration {
    pub job_number: usize,
    pub mode: usize,
    pub duration: usize,
    /// One request per renewable resource, in the order of the file's `R 1 R 2 ...` header.
    pub requests: Vec<usize>,
}
