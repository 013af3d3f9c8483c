use log::trace;
use rand::Rng;

use crate::{
    dag::{Task, TaskGraph},
    error::{ScheduleError, ScheduleResult},
};

/// Demand density of a task: its duration per unit of total resource demand.
///
/// Tasks without any demand count as demanding a single unit.
pub fn utility(task: &Task) -> f64 {
    task.duration as f64 / task.total_demand().max(1) as f64
}

/// Builds a precedence-feasible activity list with GRASP.
///
/// At every step the eligible tasks (unplaced, all predecessors placed) are ranked by
/// [`utility`]; the next task is drawn uniformly from the restricted candidate list, the ranked
/// prefix scoring at least `u_max - alpha * (u_max - u_min)`. `alpha = 0` keeps only the
/// best-scoring ties, `alpha = 1` admits every eligible task.
pub fn build_activity_list<R: Rng + ?Sized>(
    graph: &TaskGraph,
    alpha: f64,
    rng: &mut R,
) -> ScheduleResult<Vec<usize>> {
    let jobs = graph.len();
    let utilities: Vec<f64> = graph.tasks().iter().map(utility).collect();

    let mut sequence = Vec::with_capacity(jobs);
    let mut selected = vec![false; jobs];
    let mut is_eligible = vec![false; jobs];

    let mut eligible: Vec<usize> = graph
        .tasks()
        .iter()
        .filter(|task| task.predecessors.is_empty())
        .map(|task| task.id)
        .collect();
    for &job_id in &eligible {
        is_eligible[job_id] = true;
    }

    while sequence.len() < jobs {
        if eligible.is_empty() {
            return Err(ScheduleError::MalformedGraph(format!(
                "no eligible task left after placing {} of {jobs} tasks",
                sequence.len()
            )));
        }

        let candidates = restricted_candidate_list(&mut eligible, &utilities, alpha);
        let job_id = eligible.remove(rng.gen_range(0..candidates));
        trace!("selected task {job_id} among {candidates} candidates");

        selected[job_id] = true;
        is_eligible[job_id] = false;
        sequence.push(job_id);

        for &successor in &graph.task(job_id).successors {
            if selected[successor] || is_eligible[successor] {
                continue;
            }

            let has_only_selected_predecessors = graph
                .task(successor)
                .predecessors
                .iter()
                .all(|&predecessor| selected[predecessor]);

            if has_only_selected_predecessors {
                eligible.push(successor);
                is_eligible[successor] = true;
            }
        }
    }

    Ok(sequence)
}

/// Sorts `eligible` by utility, best first (ties by id), and returns the length of the
/// restricted candidate list prefix. Never returns 0 for a non-empty list.
fn restricted_candidate_list(eligible: &mut [usize], utilities: &[f64], alpha: f64) -> usize {
    eligible.sort_by(|&a, &b| {
        utilities[b]
            .total_cmp(&utilities[a])
            .then_with(|| a.cmp(&b))
    });

    let (Some(&best), Some(&worst)) = (eligible.first(), eligible.last()) else {
        return 0;
    };
    let u_max = utilities[best];
    let u_min = utilities[worst];
    // Never above u_max, exactly u_min at alpha = 1
    let limit = if alpha >= 1.0 {
        u_min
    } else {
        u_max - alpha * (u_max - u_min)
    };

    eligible
        .iter()
        .take_while(|&&job_id| utilities[job_id] >= limit)
        .count()
        .max(1)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::problem::{tests::parallel_pair, Problem};

    /// source -> {1, 2, 3} -> sink with utilities 1, 2 and 2.
    fn fan() -> TaskGraph {
        let problem = Problem::new(
            vec![4],
            vec![0, 2, 4, 2, 0],
            vec![vec![0], vec![2], vec![2], vec![1], vec![0]],
            vec![vec![1, 2, 3], vec![4], vec![4], vec![4], vec![]],
        )
        .unwrap();

        TaskGraph::new(&problem).unwrap()
    }

    #[test]
    fn utility_is_demand_density() {
        let graph = fan();

        assert_eq!(utility(graph.task(1)), 1.0);
        assert_eq!(utility(graph.task(2)), 2.0);
        assert_eq!(utility(graph.task(3)), 2.0);
        assert_eq!(utility(graph.task(0)), 0.0);
    }

    #[test]
    fn candidate_list_bounds() {
        let utilities = [0.0, 1.0, 2.0, 2.0, 0.5];

        let mut eligible = vec![1, 2, 3, 4];
        assert_eq!(restricted_candidate_list(&mut eligible, &utilities, 0.0), 2);
        assert_eq!(eligible, vec![2, 3, 1, 4]);

        let mut eligible = vec![1, 2, 3, 4];
        assert_eq!(restricted_candidate_list(&mut eligible, &utilities, 1.0), 4);

        let mut eligible = vec![1, 2, 3, 4];
        // limit = 2.0 - 0.5 * (2.0 - 0.5) = 1.25
        assert_eq!(restricted_candidate_list(&mut eligible, &utilities, 0.5), 2);

        let mut eligible = vec![4];
        assert_eq!(restricted_candidate_list(&mut eligible, &utilities, 0.0), 1);
    }

    #[test]
    fn tied_candidates_share_the_list_for_any_alpha() {
        let utilities = [0.0, 0.2, 0.2, 0.0];

        for alpha in [0.0, 0.1, 0.2, 0.3, 0.5, 0.7, 0.9, 1.0] {
            let mut eligible = vec![2, 1];
            assert_eq!(
                restricted_candidate_list(&mut eligible, &utilities, alpha),
                2,
                "alpha {alpha}"
            );
        }
    }

    #[test]
    fn tied_candidates_are_drawn_at_random() {
        // Both tasks score 1 / 5
        let problem = Problem::new(
            vec![5],
            vec![0, 1, 1, 0],
            vec![vec![0], vec![5], vec![5], vec![0]],
            vec![vec![1, 2], vec![3], vec![3], vec![]],
        )
        .unwrap();
        let graph = TaskGraph::new(&problem).unwrap();
        let mut first_choices = vec![];

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sequence = build_activity_list(&graph, 0.2, &mut rng).unwrap();
            first_choices.push(sequence[1]);
        }

        assert!(first_choices.contains(&1));
        assert!(first_choices.contains(&2));
    }

    #[test]
    fn activity_list_is_topological() {
        let graph = fan();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sequence = build_activity_list(&graph, 1.0, &mut rng).unwrap();

            assert_eq!(sequence.len(), graph.len());
            assert_eq!(sequence.first(), Some(&graph.source()));
            assert_eq!(sequence.last(), Some(&graph.sink()));

            let mut sorted = sequence.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn greedy_picks_only_best_ties() {
        let graph = fan();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sequence = build_activity_list(&graph, 0.0, &mut rng).unwrap();

            // Task 1 has the lowest density, so it is placed after both tied tasks
            assert_eq!(sequence[3], 1);
        }
    }

    #[test]
    fn random_choice_explores_all_orders() {
        let graph = TaskGraph::new(&parallel_pair(1)).unwrap();
        let mut first_choices = vec![];

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sequence = build_activity_list(&graph, 1.0, &mut rng).unwrap();
            first_choices.push(sequence[1]);
        }

        assert!(first_choices.contains(&1));
        assert!(first_choices.contains(&2));
    }

    #[test]
    fn same_seed_same_sequence() {
        let graph = fan();

        let first = build_activity_list(&graph, 0.5, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = build_activity_list(&graph, 0.5, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(first, second);
    }
}
