//! Literal scenarios with deterministic actor ordering, pinned to exact
//! expected output. Property-style coverage lives in `tests/properties.rs`.

use std::collections::BTreeSet;

use mvr_register::{ActorId, OpId, OpKind, Operation, Replica};

fn actor(s: &str) -> ActorId {
    ActorId::from(s)
}

/// Every id reachable backward from `r`'s current (possibly unresolved)
/// heads, walking `preds` and, for a `Restore`, its `anchor` too. Starting
/// from the raw heads (not `resolve()`'s terminal `Set` ids) matters: an
/// undo/redo's own `Restore` id never becomes anyone's `preds` until a
/// later op supersedes it, so a terminal-only walk would never discover
/// it and it would never get shipped to another replica.
fn reachable<V>(r: &Replica<V>) -> BTreeSet<OpId> {
    let mut stack: Vec<OpId> = r.heads().iter().cloned().collect();
    let mut visited: BTreeSet<OpId> = BTreeSet::new();
    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        if let Some(op) = r.operation(&id) {
            stack.extend(op.preds.iter().cloned());
            if let OpKind::Restore { anchor } = &op.kind {
                stack.push(anchor.clone());
            }
        }
    }
    visited
}

/// Delivers every op `from` has that `to` doesn't yet, one fixed-point
/// round at a time until both sides have everything.
fn exchange<V: Clone>(a: &mut Replica<V>, b: &mut Replica<V>) {
    loop {
        let a_ids = reachable(a);
        let b_ids = reachable(b);
        let mut changed = false;
        changed |= deliver_missing(a, b, &a_ids);
        changed |= deliver_missing(b, a, &b_ids);
        if !changed {
            break;
        }
    }
}

fn deliver_missing<V: Clone>(from: &Replica<V>, to: &mut Replica<V>, ids: &BTreeSet<OpId>) -> bool {
    let mut changed = false;
    for id in ids {
        if to.has_applied(id) {
            continue;
        }
        if let Some(op) = from.operation(id).cloned() {
            to.apply(op).unwrap();
            changed = true;
        }
    }
    changed
}

/// Three-way exchange, same fixed-point discipline as `exchange` — needed
/// once a third replica's ops must cross through to the other two.
fn exchange3<V: Clone>(a: &mut Replica<V>, b: &mut Replica<V>, c: &mut Replica<V>) {
    loop {
        let a_ids = reachable(a);
        let b_ids = reachable(b);
        let c_ids = reachable(c);
        let mut changed = false;
        changed |= deliver_missing(a, b, &a_ids);
        changed |= deliver_missing(a, c, &a_ids);
        changed |= deliver_missing(b, a, &b_ids);
        changed |= deliver_missing(b, c, &b_ids);
        changed |= deliver_missing(c, a, &c_ids);
        changed |= deliver_missing(c, b, &c_ids);
        if !changed {
            break;
        }
    }
}

fn fetch(r: &Replica<i32>, id: &OpId) -> Operation<i32> {
    r.operation(id).cloned().expect("op applied on its own replica")
}

/// S1 linear: a single actor sets three values, undoes twice, redoes once.
#[test]
fn s1_linear_undo_redo() {
    let mut a: Replica<i32> = Replica::create(actor("a"), true);
    a.set(1).unwrap();
    a.set(2).unwrap();
    a.set(3).unwrap();
    a.undo().unwrap();
    a.undo().unwrap();
    a.redo().unwrap();

    assert_eq!(a.get().unwrap(), vec![2]);
    assert_eq!(a.redo_stack().len(), 1);
}

/// S2 concurrent set: A ticks twice, B ticks once; exchange converges on
/// both replicas with A's higher-counter set sorting first.
#[test]
fn s2_concurrent_set() {
    let mut a: Replica<i32> = Replica::create(actor("a"), true);
    let mut b: Replica<i32> = Replica::create(actor("b"), true);

    a.set(1).unwrap();
    a.set(3).unwrap();
    b.set(2).unwrap();

    exchange(&mut a, &mut b);

    assert_eq!(a.get().unwrap(), vec![3, 2]);
    assert_eq!(b.get().unwrap(), vec![3, 2]);
}

/// S3 concurrent set + delete: a later merge resets both to a single
/// shared value.
#[test]
fn s3_concurrent_set_and_delete() {
    let mut a: Replica<i32> = Replica::create(actor("a"), true);
    let mut b: Replica<i32> = Replica::create(actor("b"), true);

    a.set(1).unwrap();
    a.delete().unwrap();
    b.set(2).unwrap();

    exchange(&mut a, &mut b);
    assert_eq!(a.get().unwrap(), vec![2]);
    assert_eq!(b.get().unwrap(), vec![2]);

    a.set(1).unwrap();
    exchange(&mut a, &mut b);
    assert_eq!(a.get().unwrap(), vec![1]);
    assert_eq!(b.get().unwrap(), vec![1]);
}

/// S4 deferred delivery: B receives A's three sets out of causal order.
#[test]
fn s4_deferred_delivery() {
    let mut a: Replica<i32> = Replica::create(actor("a"), true);
    let o1_id = a.set(1).unwrap();
    let o2_id = a.set(2).unwrap();
    let o3_id = a.set(3).unwrap();

    let o1 = fetch(&a, &o1_id);
    let o2 = fetch(&a, &o2_id);
    let o3 = fetch(&a, &o3_id);

    let mut b: Replica<i32> = Replica::create(actor("b"), true);
    b.apply(o2).unwrap();
    assert!(b.get().unwrap().is_empty());
    b.apply(o3).unwrap();
    assert!(b.get().unwrap().is_empty());
    b.apply(o1).unwrap();
    assert_eq!(b.get().unwrap(), vec![3]);
}

/// S5 undo then remote set then redo (paper figure 1, lower half): an
/// actor can undo its own edit even after a concurrent remote edit has
/// landed on top of it, and later redo back past that remote edit.
#[test]
fn s5_undo_remote_set_redo() {
    let mut a: Replica<&'static str> = Replica::create(actor("a"), true);
    let mut b: Replica<&'static str> = Replica::create(actor("b"), true);

    a.set("black").unwrap();
    a.set("red").unwrap();
    exchange(&mut a, &mut b);
    b.set("green").unwrap();
    exchange(&mut a, &mut b);

    assert_eq!(a.get().unwrap(), vec!["green"]);

    a.undo().unwrap();
    exchange(&mut a, &mut b);
    assert_eq!(a.get().unwrap(), vec!["black"]);
    assert_eq!(b.get().unwrap(), vec!["black"]);

    a.redo().unwrap();
    exchange(&mut a, &mut b);
    assert_eq!(a.get().unwrap(), vec!["green"]);
    assert_eq!(b.get().unwrap(), vec!["green"]);
}

/// S6 concurrent undo (paper figure 3, step 2): A and B each undo their
/// own last set without having synced the other's undo yet, so they
/// briefly disagree, then converge to a three-way result once both
/// undos cross. `s4x`/`s5` stand in for a third party's concurrent
/// branch and the merge that folds it in — built directly rather than
/// through a `Replica`, since neither A nor B authors them.
#[test]
fn s6_concurrent_undo() {
    let mut a: Replica<i32> = Replica::create(actor("a"), true);
    let mut b: Replica<i32> = Replica::create(actor("b"), true);

    let s2 = a.set(2).unwrap();
    let s3 = a.set(3).unwrap();
    b.apply(fetch(&a, &s2)).unwrap();
    b.apply(fetch(&a, &s3)).unwrap();

    let mut s4x_preds = BTreeSet::new();
    s4x_preds.insert(s2.clone());
    let s4x = Operation::new_set(OpId::new(1, actor("c")), s4x_preds, Some(4));
    a.apply(s4x.clone()).unwrap();
    b.apply(s4x.clone()).unwrap();

    let s4 = b.set(4).unwrap(); // B's own op; preds end up {s3, s4x}
    a.apply(fetch(&b, &s4)).unwrap();

    let mut s5_preds = BTreeSet::new();
    s5_preds.insert(s3.clone());
    s5_preds.insert(s4.clone());
    let s5 = Operation::new_set(OpId::new(4, actor("m")), s5_preds, Some(5));
    a.apply(s5.clone()).unwrap();
    b.apply(s5.clone()).unwrap();

    assert_eq!(a.get().unwrap(), vec![5]);
    assert_eq!(b.get().unwrap(), vec![5]);

    // concurrent undos, neither side has seen the other's yet
    a.undo().unwrap();
    assert_eq!(a.get().unwrap(), vec![2]);

    b.undo().unwrap();
    assert_eq!(b.get().unwrap(), vec![3, 4]);

    exchange(&mut a, &mut b);
    assert_eq!(a.get().unwrap(), vec![3, 4, 2]);
    assert_eq!(b.get().unwrap(), vec![3, 4, 2]);
}

/// S7 duplicate convergence (spec §9's MUST-NOT-dedup case): three
/// actors share a single set, then each mutates it on an independent
/// branch — one undoes and redoes back to the shared original, another
/// edits it twice, the third undoes its own edit back to the same
/// original. After a full exchange all three replicas see the same
/// value twice, proving the resolver never deduplicates by value.
#[test]
fn s7_duplicate_convergence() {
    let mut a: Replica<i32> = Replica::create(actor("a"), true);
    let mut b: Replica<i32> = Replica::create(actor("b"), true);
    let mut c: Replica<i32> = Replica::create(actor("c"), true);

    let s1 = a.set(1).unwrap();
    b.apply(fetch(&a, &s1)).unwrap();
    c.apply(fetch(&a, &s1)).unwrap();

    a.undo().unwrap();
    a.redo().unwrap();

    b.set(3).unwrap();
    b.set(4).unwrap();

    c.set(2).unwrap();
    c.undo().unwrap();

    exchange3(&mut a, &mut b, &mut c);

    let expected = vec![1, 4, 1];
    assert_eq!(a.get().unwrap(), expected);
    assert_eq!(b.get().unwrap(), expected);
    assert_eq!(c.get().unwrap(), expected);

    let a_trace: Vec<OpId> = a.resolve().unwrap().into_iter().map(|(id, _)| id).collect();
    let b_trace: Vec<OpId> = b.resolve().unwrap().into_iter().map(|(id, _)| id).collect();
    let c_trace: Vec<OpId> = c.resolve().unwrap().into_iter().map(|(id, _)| id).collect();
    assert_eq!(a_trace, b_trace);
    assert_eq!(b_trace, c_trace);
}
