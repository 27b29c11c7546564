// tests/property_precedence.rs

mod common;
use crate::common::{init_tracing, GraphBuilder, Recorder};

use std::collections::BTreeSet;

use flowdag::Flow;
use proptest::prelude::*;

// Random DAGs: task N may only depend on tasks 0..N-1, which rules out cycles.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, picks)| {
                    if i == 0 {
                        BTreeSet::new()
                    } else {
                        picks.into_iter().map(|p| p % i).collect()
                    }
                })
                .collect()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_edge_is_respected(
        deps in dag_strategy(12),
        workers in 1..5usize,
    ) {
        init_tracing();

        let recorder = Recorder::new();
        let mut builder = GraphBuilder::new(&recorder);
        for i in 0..deps.len() {
            builder = builder.task(&format!("task_{i}"));
        }
        for (i, before) in deps.iter().enumerate() {
            for dep in before {
                builder = builder.edge(&format!("task_{dep}"), &format!("task_{i}"));
            }
        }

        let mut flow = Flow::new(workers).map_err(|e| TestCaseError::fail(e.to_string()))?;
        builder.build_into(flow.graph_mut());
        flow.wait_for_all().map_err(|e| TestCaseError::fail(e.to_string()))?;

        for i in 0..deps.len() {
            prop_assert_eq!(recorder.starts(&format!("task_{i}")), 1);
        }
        for (i, before) in deps.iter().enumerate() {
            for dep in before {
                recorder.assert_precedes(&format!("task_{dep}"), &format!("task_{i}"));
            }
        }
    }

    #[test]
    fn repeated_dispatch_of_random_dags_runs_each_once(
        graphs in proptest::collection::vec(dag_strategy(6), 1..4),
    ) {
        init_tracing();

        let recorder = Recorder::new();
        let mut flow = Flow::new(3).map_err(|e| TestCaseError::fail(e.to_string()))?;

        for (g, deps) in graphs.iter().enumerate() {
            let mut builder = GraphBuilder::new(&recorder);
            for i in 0..deps.len() {
                builder = builder.task(&format!("g{g}_t{i}"));
            }
            for (i, before) in deps.iter().enumerate() {
                for dep in before {
                    builder = builder.edge(&format!("g{g}_t{dep}"), &format!("g{g}_t{i}"));
                }
            }
            builder.build_into(flow.graph_mut());
            flow.silent_dispatch().map_err(|e| TestCaseError::fail(e.to_string()))?;
        }

        flow.wait_for_topologies().map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(flow.num_topologies(), 0);

        for (g, deps) in graphs.iter().enumerate() {
            for i in 0..deps.len() {
                prop_assert_eq!(recorder.starts(&format!("g{g}_t{i}")), 1);
            }
        }
    }
}
