use proptest::prelude::*;

/// Topic labels `T00`, `T01`, ... in a random rank order.
pub fn arb_ranked_topics(max: usize) -> impl Strategy<Value = Vec<String>> {
    (2..=max).prop_flat_map(|n| {
        Just((0..n).map(|i| format!("T{i:02}")).collect::<Vec<_>>()).prop_shuffle()
    })
}

/// A random acyclic edge list: every edge points from a lower-ranked topic to
/// a higher-ranked one. May contain duplicates.
pub fn arb_dag_edges(max: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    arb_ranked_topics(max).prop_flat_map(|topics| {
        let n = topics.len();
        prop::collection::vec((0..n, 0..n), 0..n * 3).prop_map(move |pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (topics[a.min(b)].clone(), topics[a.max(b)].clone()))
                .collect()
        })
    })
}

/// An acyclic edge list plus one ring over at least two of its topics,
/// shuffled so the ring edges can land anywhere in the input.
pub fn arb_cyclic_edges(max: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    arb_dag_edges(max)
        .prop_flat_map(|dag| {
            let mut topics: Vec<String> = dag
                .iter()
                .flat_map(|(p, d)| [p.clone(), d.clone()])
                .collect();
            topics.sort();
            topics.dedup();
            if topics.len() < 2 {
                topics = vec!["R0".to_string(), "R1".to_string()];
            }
            let len = topics.len();
            (Just(dag), Just(topics).prop_shuffle(), 2..=len)
        })
        .prop_flat_map(|(dag, ring, size)| {
            let mut edges = dag;
            for i in 0..size {
                edges.push((ring[i].clone(), ring[(i + 1) % size].clone()));
            }
            Just(edges).prop_shuffle()
        })
}

/// A random subset of `topics`, used as a learner's known set.
pub fn arb_known(topics: Vec<String>) -> impl Strategy<Value = Vec<String>> {
    let n = topics.len();
    prop::collection::vec(any::<bool>(), n).prop_map(move |mask| {
        topics
            .iter()
            .zip(mask)
            .filter_map(|(t, keep)| keep.then(|| t.clone()))
            .collect()
    })
}
