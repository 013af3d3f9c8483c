use proptest::prelude::*;
use rcpsp::dag::TaskGraph;
use rcpsp::problem::Problem;
use rcpsp::scheduler::population::{construct, schedule_population};
use rcpsp::scheduler::SchedulerOptions;

// Random single-mode instances between a source and a sink.
// Acyclicity comes from letting real task N depend only on real tasks 1..N-1.
fn problem_strategy(max_tasks: usize) -> impl Strategy<Value = Problem> {
    (1..=max_tasks, 1..=3usize)
        .prop_flat_map(|(real_tasks, resources)| {
            (
                proptest::collection::vec(1..=4usize, resources),
                proptest::collection::vec(0..=5usize, real_tasks),
                proptest::collection::vec(
                    proptest::collection::vec(any::<usize>(), resources),
                    real_tasks,
                ),
                proptest::collection::vec(
                    proptest::collection::vec(any::<usize>(), 0..3),
                    real_tasks,
                ),
            )
        })
        .prop_map(|(capacities, real_durations, raw_demands, raw_predecessors)| {
            let resources = capacities.len();
            let jobs = real_durations.len() + 2;
            let sink = jobs - 1;

            let mut durations = vec![0];
            durations.extend(real_durations);
            durations.push(0);

            // Sanitize demands: never above capacity
            let mut demands = vec![vec![0; resources]];
            for raw in raw_demands {
                demands.push(
                    raw.iter()
                        .zip(&capacities)
                        .map(|(demand, capacity)| demand % (capacity + 1))
                        .collect(),
                );
            }
            demands.push(vec![0; resources]);

            let mut successors = vec![vec![]; jobs];
            let mut has_predecessor = vec![false; jobs];
            for (index, raw) in raw_predecessors.into_iter().enumerate() {
                let task = index + 1;
                if task > 1 {
                    for predecessor in raw {
                        successors[1 + predecessor % (task - 1)].push(task);
                        has_predecessor[task] = true;
                    }
                }
            }
            for task in 1..sink {
                if !has_predecessor[task] {
                    successors[0].push(task);
                }
                if successors[task].is_empty() {
                    successors[task].push(sink);
                }
            }

            Problem::new(capacities, durations, demands, successors)
                .expect("generated problem is valid")
        })
}

proptest! {
    #[test]
    fn constructed_schedules_are_feasible(
        problem in problem_strategy(10),
        alpha in 0.0..=1.0f64,
        seed in any::<u64>(),
    ) {
        let graph = TaskGraph::new(&problem).unwrap();

        let schedule = construct(&graph, alpha, seed).unwrap();

        prop_assert!(schedule.is_topological(&graph));
        prop_assert_eq!(schedule.sequence().first(), Some(&graph.source()));
        prop_assert_eq!(schedule.sequence().last(), Some(&graph.sink()));
        prop_assert!(schedule.is_precedence_feasible(&graph));
        prop_assert!(schedule.is_resource_feasible(&graph));
        prop_assert!(schedule.makespan() >= graph.compute_lower_bound().0);
        prop_assert!(schedule.makespan() <= graph.horizon());
    }

    #[test]
    fn construction_is_reproducible(
        problem in problem_strategy(10),
        alpha in 0.0..=1.0f64,
        seed in any::<u64>(),
    ) {
        let graph = TaskGraph::new(&problem).unwrap();

        let first = construct(&graph, alpha, seed).unwrap();
        let second = construct(&graph, alpha, seed).unwrap();

        prop_assert_eq!(first, second);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn parallel_population_matches_serial(
        problem in problem_strategy(8),
        alpha in 0.0..=1.0f64,
        random_seed in any::<u64>(),
    ) {
        let graph = TaskGraph::new(&problem).unwrap();
        let serial_options = SchedulerOptions {
            population_size: 12,
            alpha,
            random_seed,
            parallel: false,
            workers: None,
        };
        let parallel_options = SchedulerOptions {
            parallel: true,
            workers: Some(4),
            ..serial_options.clone()
        };

        let serial = schedule_population(&graph, &serial_options).unwrap();
        let parallel = schedule_population(&graph, &parallel_options).unwrap();

        prop_assert_eq!(serial.run, parallel.run);
        prop_assert_eq!(serial.schedule, parallel.schedule);
    }
}
