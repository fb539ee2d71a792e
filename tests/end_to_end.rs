//! End-to-end scenarios: each builds a minimal trace-file fixture on disk
//! and drives it through the public `explore` entry point, exercising the
//! trace reader, decoder, constraint propagation, and one checker strategy
//! together.

use std::fs;
use std::io::Write;

use apisan_core::checkers::CheckerKind;
use apisan_core::config::model::Config;
use apisan_core::explorer::explore;

fn node(event: &str, children: &str) -> String {
    format!("<NODE>{event}{children}</NODE>")
}

fn call_event(call: &str, code: &str) -> String {
    format!("<EVENT><KIND>@LOG_CALL</KIND><CALL>{call}</CALL><CODE>{code}</CODE></EVENT>")
}

fn location_event(loc: &str, typ: &str, code: &str) -> String {
    format!("<EVENT><KIND>@LOG_LOCATION</KIND><LOC>{loc}</LOC><TYPE>{typ}</TYPE><CODE>{code}</CODE></EVENT>")
}

fn assume_event(cond: &str) -> String {
    format!("<EVENT><KIND>@LOG_ASSUME</KIND><COND>{cond}</COND></EVENT>")
}

fn eop_event() -> String {
    "<EVENT><KIND>@LOG_EOP</KIND></EVENT>".to_string()
}

fn eop_node() -> String {
    node(&eop_event(), "")
}

/// Writes `trees` (each a top-level `NODE` document) as the single block of
/// a fresh `.as` file under a new temp directory, and returns that directory.
fn fixture_dir(trees: &[String]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut file = fs::File::create(dir.path().join("trace.as")).unwrap();
    writeln!(file, "@SYM_EXEC_EXTRACTOR_BEGIN").unwrap();
    for tree in trees {
        writeln!(file, "{tree}").unwrap();
    }
    writeln!(file, "@SYM_EXEC_EXTRACTOR_END").unwrap();
    dir
}

fn explore_fixture(trees: &[String], checker: CheckerKind) -> Vec<apisan_core::model::BugReport> {
    let mut config = Config::default();
    config.parallel = false;
    let dir = fixture_dir(trees);
    explore(dir.path(), checker, &config)
}

#[test]
fn return_value_unconstrained_site_is_flagged() {
    let mut trees = Vec::new();
    for i in 0..8 {
        let leaf = node(&assume_event("foo() @= {[0,0]}"), &eop_node());
        trees.push(node(&call_event("foo()", &format!("foo()_{i}")), &leaf));
    }
    // Unconstrained site: an extra location node keeps the call from being
    // the path's penultimate node, so the wrapper heuristic does not apply.
    let unconstrained = node(
        &call_event("foo()", "foo()_unbound"),
        &node(&location_event("L", "stmt", "after foo"), &eop_node()),
    );
    trees.push(unconstrained);

    let bugs = explore_fixture(&trees, CheckerKind::RetVal);
    assert_eq!(bugs.len(), 1);
    assert_eq!(bugs[0].code, "foo()_unbound");
}

#[test]
fn return_value_wrapper_tail_is_exempt() {
    // An unconstrained call as the penultimate node of its path must never
    // be reported, regardless of how the rest of the population behaves.
    let mut trees = Vec::new();
    for i in 0..8 {
        let leaf = node(&assume_event("foo() @= {[0,0]}"), &eop_node());
        trees.push(node(&call_event("foo()", &format!("foo()_{i}")), &leaf));
    }
    trees.push(node(&call_event("foo()", "foo()_wrapper_tail"), &eop_node()));

    let bugs = explore_fixture(&trees, CheckerKind::RetVal);
    assert!(bugs.is_empty(), "wrapper-tail call must not be counted at all: {bugs:?}");
}

#[test]
fn memory_leak_missing_free_is_flagged() {
    let mut trees = Vec::new();
    for i in 0..8 {
        let leaf = node(&call_event("free_x(x)", &format!("free_x(x)_{i}")), &eop_node());
        trees.push(node(&call_event("alloc_x()", &format!("alloc_x()_{i}")), &leaf));
    }
    trees.push(node(&call_event("alloc_x()", "alloc_x()_leak"), &eop_node()));

    let bugs = explore_fixture(&trees, CheckerKind::Causality);
    assert_eq!(bugs.len(), 1);
    assert_eq!(bugs[0].code, "alloc_x()_leak");
    assert!(bugs[0].score >= 0.8 + 0.5 - 1e-9);
}

#[test]
fn missing_unlock_is_flagged() {
    let mut trees = Vec::new();
    for i in 0..8 {
        let leaf = node(&call_event("mutex_unlock(m)", &format!("mutex_unlock(m)_{i}")), &eop_node());
        trees.push(node(&call_event("mutex_lock()", &format!("mutex_lock()_{i}")), &leaf));
    }
    trees.push(node(&call_event("mutex_lock()", "mutex_lock()_stuck"), &eop_node()));

    let bugs = explore_fixture(&trees, CheckerKind::Causality);
    assert_eq!(bugs.len(), 1);
    assert_eq!(bugs[0].code, "mutex_lock()_stuck");
    assert!(bugs[0].score >= 0.8 + 0.5 - 1e-9);
}

#[test]
fn ssl_condition_pair_yields_two_symmetric_bugs() {
    let mut trees = Vec::new();
    for i in 0..8 {
        let y_call = node(&call_event("Y()", &format!("Y()_{i}")), &eop_node());
        let assume_y = node(&assume_event("Y() @= {[0,0]}"), &y_call);
        let assume_x = node(&assume_event("X() @= {[1,1]}"), &assume_y);
        trees.push(node(&call_event("X()", &format!("X()_{i}")), &assume_x));
    }
    // One path pairs X with an unrelated call instead of Y.
    let x_only_tail = node(&assume_event("X() @= {[1,1]}"), &eop_node());
    let z_call = node(&call_event("Z()", "Z()_a"), &x_only_tail);
    trees.push(node(&call_event("X()", "X()_onlyA"), &z_call));

    // The symmetric path: Y paired with an unrelated call instead of X.
    let y_only_tail = node(&assume_event("Y() @= {[0,0]}"), &eop_node());
    let w_call = node(&call_event("W()", "W()_b"), &y_only_tail);
    trees.push(node(&call_event("Y()", "Y()_onlyB"), &w_call));

    let bugs = explore_fixture(&trees, CheckerKind::Condition);
    assert_eq!(bugs.len(), 2);
    let codes: std::collections::HashSet<_> = bugs.iter().map(|b| b.code.as_str()).collect();
    assert!(codes.contains("X()_onlyA"));
    assert!(codes.contains("Y()_onlyB"));
}

#[test]
fn format_string_non_literal_argument_is_flagged() {
    let mut trees = Vec::new();
    for i in 0..8 {
        trees.push(node(&call_event(r#"printf("%s")"#, &format!("printf(fmt)_{i}")), &eop_node()));
    }
    trees.push(node(&call_event("printf(user_buf)", "printf(user_buf)"), &eop_node()));

    let bugs = explore_fixture(&trees, CheckerKind::Fsb);
    assert_eq!(bugs.len(), 1);
    assert_eq!(bugs[0].code, "printf(user_buf)");
    assert!(bugs[0].score >= 0.8 + 0.3 - 1e-9);
}

#[test]
fn argument_aliasing_unrelated_pair_is_flagged() {
    let mut trees = Vec::new();
    for i in 0..8 {
        trees.push(node(&call_event("g(h(p),p)", &format!("g(h(p),p)_{i}")), &eop_node()));
    }
    trees.push(node(&call_event("g(h(p),q)", "g(h(p),q)"), &eop_node()));

    let bugs = explore_fixture(&trees, CheckerKind::Args);
    assert_eq!(bugs.len(), 1);
    assert_eq!(bugs[0].code, "g(h(p),q)");
}

#[test]
fn integer_overflow_missing_bound_is_flagged() {
    let mut trees = Vec::new();
    for i in 0..8 {
        let leaf = node(&assume_event("x @= {[0,1073741823]}"), &eop_node());
        trees.push(node(&call_event("f(x*4)", &format!("f(x*4)_{i}")), &leaf));
    }
    trees.push(node(&call_event("f(x*4)", "f(x*4)_unbound"), &eop_node()));

    let bugs = explore_fixture(&trees, CheckerKind::IntOvfl);
    assert_eq!(bugs.len(), 1);
    assert_eq!(bugs[0].code, "f(x*4)_unbound");
}
