use log::trace;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{ScheduleError, ScheduleResult};
use crate::problem::Problem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: usize,
    pub duration: usize,
    pub demands: Vec<usize>,
    pub predecessors: Vec<usize>,
    pub successors: Vec<usize>,
}

impl Task {
    /// Sum of the demands over all resources.
    pub fn total_demand(&self) -> usize {
        self.demands.iter().sum()
    }
}

/// Precedence DAG stored as an arena of tasks; edges are index lists into `tasks`.
///
/// The graph never changes after [`TaskGraph::new`], so one instance is shared by reference
/// between all scheduling runs.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    capacities: Vec<usize>,
    horizon: usize,
    topological_order: Vec<usize>,
}

impl TaskGraph {
    pub fn new(problem: &Problem) -> ScheduleResult<Self> {
        let jobs = problem.number_of_jobs();

        let tasks: Vec<Task> = (0..jobs)
            .map(|id| Task {
                id,
                duration: problem.duration(id),
                demands: problem.demands(id).to_vec(),
                predecessors: problem.predecessors(id).to_vec(),
                successors: problem.successors(id).to_vec(),
            })
            .collect();

        if let Some(source) = tasks.first() {
            if !source.predecessors.is_empty() {
                return Err(ScheduleError::MalformedGraph(format!(
                    "source task 0 has predecessors {:?}",
                    source.predecessors
                )));
            }
        }
        if let Some(sink) = tasks.last() {
            if !sink.successors.is_empty() {
                return Err(ScheduleError::MalformedGraph(format!(
                    "sink task {} has successors {:?}",
                    sink.id, sink.successors
                )));
            }
        }

        let mut graph = DiGraph::<usize, ()>::with_capacity(jobs, 0);
        for task in &tasks {
            graph.add_node(task.id);
        }
        for task in &tasks {
            for &successor in &task.successors {
                graph.add_edge(NodeIndex::new(task.id), NodeIndex::new(successor), ());
            }
        }

        let topological_order: Vec<usize> = algo::toposort(&graph, None)
            .map_err(|cycle| {
                ScheduleError::MalformedGraph(format!(
                    "precedence cycle through task {}",
                    graph[cycle.node_id()]
                ))
            })?
            .into_iter()
            .map(|node| graph[node])
            .collect();
        trace!("topological order: {topological_order:?}");

        // In a DAG this puts every task on a path from the source to the sink
        let sink = jobs.saturating_sub(1);
        for task in &tasks {
            if task.id != 0 && task.predecessors.is_empty() {
                return Err(ScheduleError::MalformedGraph(format!(
                    "task {} is not reachable from the source",
                    task.id
                )));
            }
            if task.id != sink && task.successors.is_empty() {
                return Err(ScheduleError::MalformedGraph(format!(
                    "task {} does not lead to the sink",
                    task.id
                )));
            }
        }

        Ok(Self {
            tasks,
            capacities: problem.capacities().to_vec(),
            horizon: problem.horizon(),
            topological_order,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: usize) -> &Task {
        &self.tasks[id]
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn source(&self) -> usize {
        0
    }

    pub fn sink(&self) -> usize {
        self.tasks.len() - 1
    }

    pub fn number_of_resources(&self) -> usize {
        self.capacities.len()
    }

    pub fn capacity(&self, resource: usize) -> usize {
        self.capacities[resource]
    }

    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Compute the upper bound of execution time by accumulating all durations
    pub fn compute_upper_bound(&self) -> usize {
        self.tasks.iter().map(|task| task.duration).sum()
    }

    /// Find the lower bound of execution time, based on the longest (critical) path in the
    /// graph. Returns the length and the tasks on the path, source first.
    pub fn compute_lower_bound(&self) -> (usize, Vec<usize>) {
        let mut earliest_finish = vec![0; self.tasks.len()];
        let mut critical_predecessor: Vec<Option<usize>> = vec![None; self.tasks.len()];

        for &id in &self.topological_order {
            let task = &self.tasks[id];
            let (start, predecessor) = task
                .predecessors
                .iter()
                .map(|&predecessor| (earliest_finish[predecessor], Some(predecessor)))
                .max()
                .unwrap_or((0, None));

            earliest_finish[id] = start + task.duration;
            critical_predecessor[id] = predecessor;
        }

        let Some((length, last)) = earliest_finish
            .iter()
            .enumerate()
            .map(|(id, &finish)| (finish, id))
            .max()
        else {
            return (0, vec![]);
        };

        let mut path = vec![last];
        let mut current = last;
        while let Some(predecessor) = critical_predecessor[current] {
            path.push(predecessor);
            current = predecessor;
        }
        path.reverse();

        (length, path)
    }
}
