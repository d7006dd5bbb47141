//! Property-based tests for the pipeline's cross-cutting invariants:
//! edge uniqueness, reachability monotonicity, equivalence symmetry,
//! purge idempotence, value conservation, convergence under cap, and
//! ranking correctness.

use std::fs;
use std::io::Write;
use std::sync::atomic::AtomicBool;

use difftool::graph::method::Reachability;
use difftool::graph::{builder, equivalence, loader, purge, reachability, relax};
use proptest::prelude::*;
use tempfile::TempDir;

/// A small random DAG-ish call graph: `n` methods named `m0..mn`, each
/// with a 1/3 chance of being an entry point, plus up to `n` random
/// (possibly duplicate, possibly self-looping) direct invokes.
fn arb_graph_spec(max_methods: usize) -> impl Strategy<Value = (usize, Vec<bool>, Vec<(usize, usize)>)> {
    (2..=max_methods).prop_flat_map(|n| {
        let entry_flags = prop::collection::vec(prop::bool::weighted(0.3), n);
        let edges = prop::collection::vec((0..n, 0..n), 0..=n * 2);
        (Just(n), entry_flags, edges)
    })
}

fn write_graph(dir: &std::path::Path, n: usize, entry_flags: &[bool], edges: &[(usize, usize)]) {
    let mut methods = String::from("Id,Name,Type,Parameters,Return,Display,Flags,IsEntryPoint\n");
    for i in 0..n {
        methods.push_str(&format!(
            "{i},m{i},T{i},empty,void,T{i}.m{i},,{}\n",
            entry_flags[i]
        ));
    }

    let mut invokes = String::from("Id,MethodId,Bci,TargetId,IsDirect\n");
    let mut targets = String::from("InvokeId,TargetMethodId\n");
    for (invoke_id, &(src, dst)) in edges.iter().enumerate() {
        invokes.push_str(&format!("{invoke_id},{src},1,{dst},true\n"));
        targets.push_str(&format!("{invoke_id},{dst}\n"));
    }

    for (name, contents) in [
        ("call_tree_methods.csv", methods.as_str()),
        ("call_tree_invokes.csv", invokes.as_str()),
        ("call_tree_targets.csv", targets.as_str()),
    ] {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }
}

fn load_and_build(dir: &std::path::Path, name: &str) -> difftool::graph::CallGraph {
    let mut cg = loader::load(dir, name).unwrap();
    builder::build_edges(&mut cg);
    cg
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Invariant 1: edge uniqueness. No two edges in a built graph share
    /// the same `(source, target)` pair.
    #[test]
    fn edges_are_unique_per_source_target_pair((n, entries, edges) in arb_graph_spec(8)) {
        let tmp = TempDir::new().unwrap();
        write_graph(tmp.path(), n, &entries, &edges);
        let cg = load_and_build(tmp.path(), "sup");

        let mut seen = std::collections::HashSet::new();
        for &edge in cg.edge_order() {
            let pair = cg.edge_endpoints(edge);
            prop_assert!(seen.insert(pair), "duplicate edge {:?}", pair);
        }
    }

    /// Invariant 2: reachability only rises, and running the engine
    /// twice back-to-back is idempotent.
    #[test]
    fn reachability_is_monotonic_and_idempotent((n, entries, edges) in arb_graph_spec(8)) {
        let tmp = TempDir::new().unwrap();
        write_graph(tmp.path(), n, &entries, &edges);
        let mut cg = load_and_build(tmp.path(), "sup");

        let before: Vec<Reachability> = cg.methods().map(|(_, m)| m.reachability).collect();
        reachability::compute(&mut cg);
        let after_first: Vec<Reachability> = cg.methods().map(|(_, m)| m.reachability).collect();

        for (b, a) in before.iter().zip(after_first.iter()) {
            prop_assert!(a >= b);
        }

        reachability::compute(&mut cg);
        let after_second: Vec<Reachability> = cg.methods().map(|(_, m)| m.reachability).collect();
        prop_assert_eq!(after_first, after_second);
    }

    /// Invariant 3: equivalence links are symmetric and both sides share
    /// the same `qualified_name`.
    #[test]
    fn equivalence_links_are_symmetric((n, entries, edges) in arb_graph_spec(6)) {
        let tmp1 = TempDir::new().unwrap();
        write_graph(tmp1.path(), n, &entries, &edges);
        let tmp2 = TempDir::new().unwrap();
        write_graph(tmp2.path(), n, &entries, &edges);

        let mut g1 = load_and_build(tmp1.path(), "sup");
        let mut g2 = load_and_build(tmp2.path(), "sub");
        equivalence::link(&mut g1, &mut g2);

        for (idx1, m1) in g1.methods() {
            if let Some(idx2) = m1.equivalent {
                let m2 = g2.method(idx2);
                prop_assert_eq!(m2.equivalent, Some(idx1));
                prop_assert_eq!(&m1.qualified_name, &m2.qualified_name);
            }
        }
    }

    /// Invariant 4: both purges are idempotent — a second application
    /// leaves the edge count (and thus the graph) unchanged.
    #[test]
    fn purges_are_idempotent((n, entries, edges) in arb_graph_spec(8)) {
        let tmp_sup = TempDir::new().unwrap();
        write_graph(tmp_sup.path(), n, &entries, &edges);
        let tmp_sub = TempDir::new().unwrap();
        write_graph(tmp_sub.path(), n, &entries, &edges);

        let mut sup = load_and_build(tmp_sup.path(), "sup");
        reachability::compute(&mut sup);
        let mut sub = load_and_build(tmp_sub.path(), "sub");
        reachability::compute(&mut sub);
        equivalence::link(&mut sup, &mut sub);

        purge::purge_unreachable_sourced(&mut sup);
        let after_first = sup.edge_count();
        purge::purge_unreachable_sourced(&mut sup);
        prop_assert_eq!(sup.edge_count(), after_first);

        purge::purge_common(&mut sup, &sub);
        let after_common_first = sup.edge_count();
        purge::purge_common(&mut sup, &sub);
        prop_assert_eq!(sup.edge_count(), after_common_first);
    }

    /// Invariant 5: value conservation. Simulates a single relaxation
    /// pass by hand from the same edge order and compares the resulting
    /// per-method/per-edge values against the real implementation run
    /// with `max_iterations = 1`, within floating-point tolerance.
    #[test]
    fn single_pass_conserves_value_as_hand_simulated((n, entries, edges) in arb_graph_spec(8)) {
        let tmp_sup = TempDir::new().unwrap();
        write_graph(tmp_sup.path(), n, &entries, &edges);
        let tmp_sub = TempDir::new().unwrap();
        write_graph(tmp_sub.path(), 1, &[true], &[]);

        let mut sup = load_and_build(tmp_sup.path(), "sup");
        reachability::compute(&mut sup);
        let mut sub = load_and_build(tmp_sub.path(), "sub");
        reachability::compute(&mut sub);
        equivalence::link(&mut sup, &mut sub);
        purge::purge_unreachable_sourced(&mut sup);
        purge::purge_common(&mut sup, &sub);

        fn level(m: &difftool::graph::Method, other: &difftool::graph::CallGraph) -> f64 {
            match m.equivalent {
                Some(eq) if other.method(eq).reachability != Reachability::Unreachable => 0.0,
                _ => m.value,
            }
        }

        let mut expected_method_values: std::collections::HashMap<_, f64> =
            sup.methods().map(|(idx, m)| (idx, m.value)).collect();
        let mut expected_edge_values: std::collections::HashMap<_, f64> =
            sup.edge_order().iter().map(|&e| (e, sup.edge_data(e).value)).collect();

        for &edge in sup.edge_order() {
            let (source, target) = sup.edge_endpoints(edge);
            let source_method = difftool::graph::Method {
                value: expected_method_values[&source],
                ..sup.method(source).clone()
            };
            let target_method = difftool::graph::Method {
                value: expected_method_values[&target],
                ..sup.method(target).clone()
            };
            let l_s = level(&source_method, &sub);
            let l_t = level(&target_method, &sub);
            let delta = relax::ALPHA * (l_t - l_s);
            if delta > 0.0 {
                *expected_edge_values.get_mut(&edge).unwrap() += delta;
                *expected_method_values.get_mut(&target).unwrap() -= delta;
                *expected_method_values.get_mut(&source).unwrap() += delta;
            }
        }

        let cancel = AtomicBool::new(false);
        relax::run(&mut sup, &sub, 1, &cancel);

        for (&idx, &expected) in &expected_method_values {
            prop_assert!((sup.method(idx).value - expected).abs() < 1e-9);
        }
        for (&edge, &expected) in &expected_edge_values {
            prop_assert!((sup.edge_data(edge).value - expected).abs() < 1e-9);
        }
    }

    /// Invariant 6: relaxation always terminates within the configured
    /// cap, or with `max <= EPSILON`.
    #[test]
    fn relaxation_converges_or_hits_cap((n, entries, edges) in arb_graph_spec(8)) {
        let tmp_sup = TempDir::new().unwrap();
        write_graph(tmp_sup.path(), n, &entries, &edges);
        let tmp_sub = TempDir::new().unwrap();
        write_graph(tmp_sub.path(), 1, &[true], &[]);

        let mut sup = load_and_build(tmp_sup.path(), "sup");
        reachability::compute(&mut sup);
        let mut sub = load_and_build(tmp_sub.path(), "sub");
        reachability::compute(&mut sub);
        equivalence::link(&mut sup, &mut sub);
        purge::purge_unreachable_sourced(&mut sup);
        purge::purge_common(&mut sup, &sub);

        let cancel = AtomicBool::new(false);
        let outcome = relax::run(&mut sup, &sub, 200, &cancel);

        prop_assert!(outcome.iterations <= 200);
        if outcome.iterations < 200 {
            prop_assert!(outcome.max <= relax::EPSILON);
        }
    }

    /// Invariant 7: ranked edges are non-increasing by value and every
    /// one has a source with a non-null equivalent.
    #[test]
    fn ranking_is_sorted_and_sources_have_equivalents((n, entries, edges) in arb_graph_spec(8)) {
        let tmp_sup = TempDir::new().unwrap();
        write_graph(tmp_sup.path(), n, &entries, &edges);
        let tmp_sub = TempDir::new().unwrap();
        write_graph(tmp_sub.path(), n, &entries, &edges);

        let mut sup = load_and_build(tmp_sup.path(), "sup");
        reachability::compute(&mut sup);
        let mut sub = load_and_build(tmp_sub.path(), "sub");
        reachability::compute(&mut sub);
        equivalence::link(&mut sup, &mut sub);

        let ranked = difftool::graph::rank::top_n(&sup, n);
        for &edge in &ranked {
            let (source, _) = sup.edge_endpoints(edge);
            prop_assert!(sup.method(source).equivalent.is_some());
        }
        for pair in ranked.windows(2) {
            let va = sup.edge_data(pair[0]).value;
            let vb = sup.edge_data(pair[1]).value;
            prop_assert!(va >= vb);
        }
    }
}
