//! Property tests for the matcher and the apply phase.

use std::collections::{BTreeSet, VecDeque};

use proptest::prelude::*;

use netform_engine::{Match, MatchStrategy, PatternMatcher, Transform, apply_matches};
use netform_foundation::{NetDef, NodeIndex, OperatorDef};
use netform_graph::Graph;

use crate::rules::Rules;

// =============================================================================
// Generators
// =============================================================================

/// Small random DAGs: op `i` writes `B{i + 1}` and reads earlier blobs.
fn arbitrary_graph() -> impl Strategy<Value = Graph> {
    prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 0..3), 1..9)
        .prop_map(|reads| {
            let mut net = NetDef::new("random");
            for (i, picks) in reads.into_iter().enumerate() {
                let inputs: Vec<String> = picks
                    .iter()
                    .map(|pick| format!("B{}", pick.index(i + 1)))
                    .collect();
                net = net.with_op(
                    OperatorDef::new("Op")
                        .with_inputs(inputs)
                        .with_outputs([format!("B{}", i + 1)]),
                );
            }
            Graph::from_net(&net)
        })
}

fn arbitrary_strategy() -> impl Strategy<Value = MatchStrategy> {
    prop::sample::select(MatchStrategy::ALL.to_vec())
}

/// A deterministic rule set: `allowed` nodes only, at most `max_len` of
/// them, valid at `min_len` or more.
fn rules(
    strategy: MatchStrategy,
    allowed: Vec<bool>,
    min_len: usize,
    max_len: usize,
) -> Rules {
    Rules::new(
        strategy,
        move |_, subgraph, candidate| {
            subgraph.len() < max_len && allowed.get(candidate).copied().unwrap_or(false)
        },
        move |_, subgraph| subgraph.len() >= min_len,
    )
}

fn find(graph: &Graph, rules: &Rules) -> Vec<Match> {
    PatternMatcher::default().find_matches(graph, rules).unwrap()
}

fn is_connected(graph: &Graph, nodes: &[NodeIndex]) -> bool {
    let members: BTreeSet<NodeIndex> = nodes.iter().copied().collect();
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<NodeIndex> = nodes.iter().take(1).copied().collect();
    while let Some(index) = queue.pop_front() {
        if !seen.insert(index) {
            continue;
        }
        let node = graph.node(index).unwrap();
        for neighbor in node.children.keys().chain(node.parents.keys()) {
            if members.contains(neighbor) && !seen.contains(neighbor) {
                queue.push_back(*neighbor);
            }
        }
    }
    seen == members
}

// =============================================================================
// Matcher Properties
// =============================================================================

proptest! {
    #[test]
    fn matches_are_distinct_disjoint_accepted_and_valid(
        graph in arbitrary_graph(),
        strategy in arbitrary_strategy(),
        allowed in prop::collection::vec(any::<bool>(), 9),
        min_len in 1usize..3,
        extra in 0usize..2,
    ) {
        let rules = rules(strategy, allowed, min_len, min_len + extra);
        let matches = find(&graph, &rules);

        let mut claimed = BTreeSet::new();
        for m in &matches {
            let nodes = m.nodes();
            let distinct: BTreeSet<_> = nodes.iter().collect();
            prop_assert_eq!(distinct.len(), nodes.len());

            for (k, &node) in nodes.iter().enumerate() {
                prop_assert!(rules.accept(&graph, &nodes[..k], node));
                prop_assert!(claimed.insert(node), "node {} claimed twice", node);
            }
            prop_assert!(rules.validate(&graph, nodes));
        }
    }

    #[test]
    fn connected_matches_are_connected(
        graph in arbitrary_graph(),
        allowed in prop::collection::vec(any::<bool>(), 9),
        max_len in 1usize..4,
    ) {
        let rules = rules(MatchStrategy::Connected, allowed, 1, max_len);
        for m in find(&graph, &rules) {
            prop_assert!(is_connected(&graph, m.nodes()), "{:?} is not connected", m);
        }
    }

    #[test]
    fn ordered_matches_are_increasing(
        graph in arbitrary_graph(),
        allowed in prop::collection::vec(any::<bool>(), 9),
        max_len in 1usize..4,
    ) {
        let rules = rules(MatchStrategy::OrderedByPosition, allowed, 1, max_len);
        for m in find(&graph, &rules) {
            prop_assert!(m.nodes().windows(2).all(|w| w[0] < w[1]), "{:?} not increasing", m);
        }
    }

    #[test]
    fn apply_never_rewrites_part_of_a_match(
        graph in arbitrary_graph(),
        strategy in arbitrary_strategy(),
        allowed in prop::collection::vec(any::<bool>(), 9),
        max_len in 1usize..3,
        victim in any::<prop::sample::Index>(),
    ) {
        let mut graph = graph;
        let mut rules = rules(strategy, allowed, 1, max_len);
        let matches = find(&graph, &rules);

        // The first match also knocks out one arbitrary node.
        if let Some(first) = matches.first() {
            let mut victims = first.nodes().to_vec();
            victims.push(victim.index(graph.size()));
            rules = rules.consuming(first.nodes().to_vec(), victims);
        }

        let before: Vec<bool> = (0..graph.size()).map(|i| graph.is_active(i)).collect();
        let report = apply_matches(&rules, &matches, &mut graph).unwrap();
        let rewritten = rules.rewritten();

        prop_assert_eq!(report.outcomes.len(), matches.len());
        prop_assert_eq!(rewritten.len(), report.applied_count());
        for outcome in &report.outcomes {
            if outcome.is_applied() {
                prop_assert!(outcome.nodes().iter().all(|&n| before[n]));
                prop_assert!(rewritten.iter().any(|r| r.as_slice() == outcome.nodes()));
            } else {
                prop_assert!(!rewritten.iter().any(|r| r.as_slice() == outcome.nodes()));
            }
        }
    }
}
