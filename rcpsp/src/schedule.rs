use crate::dag::TaskGraph;
use crate::sources_load::ResourceTimeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub start: usize,
    pub finish: usize,
}

/// A completed run: the construction order, the time placement of every task and the
/// resource occupancy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    sequence: Vec<usize>,
    times: Vec<ScheduledTask>,
    timelines: Vec<ResourceTimeline>,
    makespan: usize,
}

impl Schedule {
    pub(crate) fn new(
        sequence: Vec<usize>,
        times: Vec<ScheduledTask>,
        timelines: Vec<ResourceTimeline>,
    ) -> Self {
        let makespan = times.last().map(|task| task.finish).unwrap_or(0);

        Self {
            sequence,
            times,
            timelines,
            makespan,
        }
    }

    /// Task ids in the order they were placed.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    pub fn start(&self, task: usize) -> usize {
        self.times[task].start
    }

    pub fn finish(&self, task: usize) -> usize {
        self.times[task].finish
    }

    pub fn times(&self) -> &[ScheduledTask] {
        &self.times
    }

    pub fn timelines(&self) -> &[ResourceTimeline] {
        &self.timelines
    }

    pub fn timeline(&self, resource: usize) -> &ResourceTimeline {
        &self.timelines[resource]
    }

    /// Finish time of the sink.
    pub fn makespan(&self) -> usize {
        self.makespan
    }

    /// Every task starts no earlier than the finish of all of its predecessors.
    pub fn is_precedence_feasible(&self, graph: &TaskGraph) -> bool {
        graph.tasks().iter().all(|task| {
            task.predecessors
                .iter()
                .all(|&predecessor| self.start(task.id) >= self.finish(predecessor))
        })
    }

    /// No resource is over capacity in any slot, and the occupancy grid holds exactly the
    /// demand of every task while it runs.
    pub fn is_resource_feasible(&self, graph: &TaskGraph) -> bool {
        let horizon = self
            .timelines
            .first()
            .map(ResourceTimeline::horizon)
            .unwrap_or(0);

        (0..graph.number_of_resources()).all(|resource| {
            let timeline = &self.timelines[resource];

            let within_capacity = (0..horizon).all(|t| {
                let load: usize = graph
                    .tasks()
                    .iter()
                    .filter(|task| self.start(task.id) <= t && t < self.finish(task.id))
                    .map(|task| task.demands[resource])
                    .sum();

                load <= graph.capacity(resource)
            });

            let grid_matches = graph.tasks().iter().all(|task| {
                (0..horizon).all(|t| {
                    let running = self.start(task.id) <= t && t < self.finish(task.id);
                    let expected = if running { task.demands[resource] } else { 0 };

                    timeline.units_of(t, task.id) == expected
                })
            });

            within_capacity && grid_matches
        })
    }

    /// The sequence is a permutation in which every task follows all of its predecessors.
    pub fn is_topological(&self, graph: &TaskGraph) -> bool {
        let mut position = vec![usize::MAX; graph.len()];
        for (index, &task) in self.sequence.iter().enumerate() {
            match position.get_mut(task) {
                Some(slot) if *slot == usize::MAX => *slot = index,
                _ => return false,
            }
        }

        self.sequence.len() == graph.len()
            && graph.tasks().iter().all(|task| {
                task.predecessors
                    .iter()
                    .all(|&predecessor| position[predecessor] < position[task.id])
            })
    }
}
