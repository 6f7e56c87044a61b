//! End-to-End Solver Scenarios
//!
//! Each test builds a small constraint system, solves it, and checks the
//! least-solution query against the membership set the constraints force.
//! Query results are compared order-insensitively: the engine guarantees
//! the set of constructed terms, not a traversal order.

use setra_core::{ConstraintError, ConstraintSystem, Inclusion, SetExpr, Variance, term};
use setra_solver::{EdgeLabel, Solver, SolverConfig, solve_system};

type Expr = SetExpr<&'static str, &'static str>;

fn var(v: &'static str) -> Expr {
    SetExpr::variable(v)
}

fn atom(c: &'static str) -> Expr {
    SetExpr::atom(c)
}

fn system(inclusions: Vec<Inclusion<&'static str, &'static str>>) -> ConstraintSystem<&'static str, &'static str> {
    ConstraintSystem::from_inclusions(inclusions)
}

/// Solve and query, returning the members sorted for set comparison.
fn members(
    system: &ConstraintSystem<&'static str, &'static str>,
    v: &'static str,
) -> Vec<Expr> {
    let solved = solve_system(system).unwrap();
    let mut out = solved.least_solution(&v).unwrap();
    out.sort();
    out
}

#[test]
fn test_direct_membership() {
    // { a ⊆ x }: a is the only member of x.
    let s = system(vec![Inclusion::new(atom("a"), var("x"))]);
    assert_eq!(members(&s, "x"), vec![atom("a")]);
}

#[test]
fn test_membership_flows_along_variable_inclusion() {
    // { a ⊆ x, x ⊆ y }: a reaches y through x, and stays in x.
    let s = system(vec![
        Inclusion::new(atom("a"), var("x")),
        Inclusion::new(var("x"), var("y")),
    ]);
    assert_eq!(members(&s, "y"), vec![atom("a")]);
    assert_eq!(members(&s, "x"), vec![atom("a")]);
}

#[test]
fn test_fan_in_merges_memberships() {
    // { a ⊆ x, b ⊆ y, x ⊆ z, y ⊆ z }: z collects both atoms.
    let s = system(vec![
        Inclusion::new(atom("a"), var("x")),
        Inclusion::new(atom("b"), var("y")),
        Inclusion::new(var("x"), var("z")),
        Inclusion::new(var("y"), var("z")),
    ]);
    assert_eq!(members(&s, "z"), vec![atom("a"), atom("b")]);
}

#[test]
fn test_universal_in_empty_is_unsolvable() {
    // { U ⊆ ∅ } fails at solve time.
    let s = system(vec![Inclusion::new(
        SetExpr::universal_set(),
        SetExpr::empty_set(),
    )]);
    assert!(matches!(
        solve_system(&s),
        Err(ConstraintError::NoSolution(_))
    ));
}

#[test]
fn test_covariant_term_decomposition_feeds_variable() {
    // { f(a) ⊆ f(y) } decomposes to a ⊆ y.
    let fa = term("f", [Variance::Covariant]).apply(vec![atom("a")]);
    let fy = term("f", [Variance::Covariant]).apply(vec![var("y")]);
    let s = system(vec![Inclusion::new(fa, fy)]);
    assert_eq!(members(&s, "y"), vec![atom("a")]);
}

#[test]
fn test_two_variable_cycle_collapses() {
    // { x ⊆ y, y ⊆ x, a ⊆ x }: x and y are equal, so y sees a.
    let s = system(vec![
        Inclusion::new(var("x"), var("y")),
        Inclusion::new(var("y"), var("x")),
        Inclusion::new(atom("a"), var("x")),
    ]);
    assert_eq!(members(&s, "y"), vec![atom("a")]);
    assert_eq!(members(&s, "x"), vec![atom("a")]);
}

#[test]
fn test_unsolvability_variants() {
    // Each of the four unsatisfiable shapes is caught.
    let fa = term("f", [Variance::Covariant]).apply(vec![atom("a")]);
    let cases = vec![
        Inclusion::new(SetExpr::universal_set(), SetExpr::empty_set()),
        Inclusion::new(SetExpr::universal_set(), fa.clone()),
        Inclusion::new(fa, SetExpr::empty_set()),
        Inclusion::new(atom("f"), atom("g")),
    ];
    for inclusion in cases {
        let s = system(vec![inclusion.clone()]);
        assert!(
            matches!(solve_system(&s), Err(ConstraintError::NoSolution(_))),
            "expected NoSolution for {inclusion:?}"
        );
    }
}

#[test]
fn test_contravariant_position_reverses_flow() {
    // { g(x) ⊆ g(y) } with g contravariant forces y ⊆ x, so members given
    // to y show up in x.
    let gx = term("g", [Variance::Contravariant]).apply(vec![var("x")]);
    let gy = term("g", [Variance::Contravariant]).apply(vec![var("y")]);
    let s = system(vec![
        Inclusion::new(gx, gy),
        Inclusion::new(atom("a"), var("y")),
    ]);
    assert_eq!(members(&s, "x"), vec![atom("a")]);
    assert_eq!(members(&s, "y"), vec![atom("a")]);
}

#[test]
fn test_long_chain_propagates_to_the_end() {
    let mut inclusions = vec![Inclusion::new(atom("a"), var("v00"))];
    let names = [
        "v00", "v01", "v02", "v03", "v04", "v05", "v06", "v07", "v08", "v09",
    ];
    for pair in names.windows(2) {
        inclusions.push(Inclusion::new(var(pair[0]), var(pair[1])));
    }
    let s = system(inclusions);
    assert_eq!(members(&s, "v09"), vec![atom("a")]);
}

#[test]
fn test_longer_cycle_collapses_to_one_representative() {
    // A three-variable cycle with one feeding atom.
    let s = system(vec![
        Inclusion::new(var("x"), var("y")),
        Inclusion::new(var("y"), var("z")),
        Inclusion::new(var("z"), var("x")),
        Inclusion::new(atom("a"), var("z")),
    ]);
    for v in ["x", "y", "z"] {
        assert_eq!(members(&s, v), vec![atom("a")], "query {v}");
    }
}

#[test]
fn test_cycle_elimination_does_not_change_solutions() {
    // The same system solved with and without cycle elimination agrees on
    // every variable.
    let s = system(vec![
        Inclusion::new(var("x"), var("y")),
        Inclusion::new(var("y"), var("z")),
        Inclusion::new(var("z"), var("x")),
        Inclusion::new(atom("a"), var("y")),
        Inclusion::new(atom("b"), var("z")),
        Inclusion::new(var("z"), var("w")),
    ]);
    let with = Solver::with_config(SolverConfig {
        remove_cycles: true,
        cycle_budget: None,
    })
    .solve(&s)
    .unwrap();
    let without = Solver::with_config(SolverConfig {
        remove_cycles: false,
        cycle_budget: None,
    })
    .solve(&s)
    .unwrap();

    for v in ["w", "x", "y", "z"] {
        let mut a = with.least_solution(&v).unwrap();
        let mut b = without.least_solution(&v).unwrap();
        a.sort();
        b.sort();
        assert_eq!(a, b, "query {v}");
    }
    assert!(with.stats().cycles_collapsed > 0);
    assert_eq!(without.stats().cycles_collapsed, 0);
}

#[test]
fn test_saturation_closure_law() {
    // For every Pred edge p→x and Succ edge x→r of the solved graph, the
    // composed inclusion is either trivial (p = r), present as a direct
    // edge, or simplified into something else entirely.
    let fa = term("f", [Variance::Covariant]).apply(vec![atom("a")]);
    let fv = term("f", [Variance::Covariant]).apply(vec![var("v")]);
    let s = system(vec![
        Inclusion::new(atom("a"), var("x")),
        Inclusion::new(var("x"), var("y")),
        Inclusion::new(var("z"), var("y")),
        Inclusion::new(atom("b"), var("z")),
        Inclusion::new(var("y"), var("w")),
        Inclusion::new(fa, var("p")),
        Inclusion::new(var("p"), fv),
    ]);
    let solved = solve_system(&s).unwrap();

    let (nodes, edges) = solved.graph_elems();
    let label_of: std::collections::HashMap<_, _> = nodes.into_iter().collect();
    let endpoint_pairs: std::collections::HashSet<_> =
        edges.iter().map(|&(src, dst, _)| (src, dst)).collect();

    for &(p, x, l1) in edges.iter().filter(|&&(_, _, l)| l == EdgeLabel::Pred) {
        for &(_, r, _) in edges
            .iter()
            .filter(|&&(src, _, l)| src == x && l == EdgeLabel::Succ)
        {
            if p == r || endpoint_pairs.contains(&(p, r)) {
                continue;
            }
            let induced = Inclusion::new((*label_of[&p]).clone(), (*label_of[&r]).clone());
            let atomic = setra_core::simplify_inclusion(&induced).unwrap();
            assert!(
                !atomic.contains(&induced),
                "missing composed edge for {induced:?} (pred {p}->{x}, succ {x}->{r}, label {l1})"
            );
        }
    }
}

#[test]
fn test_deterministic_across_solves() {
    let fa = term("f", [Variance::Covariant]).apply(vec![var("a1")]);
    let fb = term("f", [Variance::Covariant]).apply(vec![var("b1")]);
    let s = system(vec![
        Inclusion::new(atom("m"), var("a1")),
        Inclusion::new(fa, fb),
        Inclusion::new(var("b1"), var("c1")),
        Inclusion::new(var("c1"), var("b1")),
    ]);
    let first = solve_system(&s).unwrap();
    let second = solve_system(&s).unwrap();
    for v in ["a1", "b1", "c1"] {
        assert_eq!(
            first.least_solution(&v).unwrap(),
            second.least_solution(&v).unwrap(),
            "query {v}"
        );
    }
}

#[test]
fn test_empty_system_solves_to_empty_graph() {
    let s = system(vec![]);
    let solved = solve_system(&s).unwrap();
    let (nodes, edges) = solved.graph_elems();
    assert!(nodes.is_empty());
    assert!(edges.is_empty());
}

#[test]
fn test_solved_system_shared_across_threads() {
    let s = system(vec![
        Inclusion::new(atom("a"), var("x")),
        Inclusion::new(var("x"), var("y")),
    ]);
    let solved = std::sync::Arc::new(solve_system(&s).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let solved = std::sync::Arc::clone(&solved);
            std::thread::spawn(move || solved.least_solution(&"y").unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![atom("a")]);
    }
}
