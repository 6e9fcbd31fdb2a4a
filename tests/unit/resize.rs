//! Growth and shrink behavior across longer push/pop runs.

use super::common::{assert_well_formed, filled, recorded_with};
use guardstack::buffer::{grown_capacity, should_shrink, shrunk_capacity};
use guardstack::StackConfig;

/// Capacities seen while pushing `n` values onto a capacity-1 stack.
fn growth_trace(n: i32) -> Vec<usize> {
    let mut stack = filled(1, &[]);
    let mut seen = vec![stack.capacity()];
    for v in 0..n {
        stack.push(v).unwrap();
        if seen.last() != Some(&stack.capacity()) {
            seen.push(stack.capacity());
        }
    }
    seen
}

#[test]
fn test_growth_sequence() {
    assert_eq!(growth_trace(40), vec![1, 3, 7, 15, 31, 63]);
}

#[test]
fn test_growth_preserves_live_order() {
    let values: Vec<i32> = (0..50).collect();
    let stack = filled(1, &values);
    assert_eq!(stack.as_slice(), values.as_slice());
    assert_well_formed(&stack);
}

#[test]
fn test_shrink_happens_below_a_quarter() {
    let mut stack = filled(1, &(0..16).collect::<Vec<_>>());
    assert_eq!(stack.capacity(), 31);

    // 31 / 4 = 7.75: still 31 at size 8, halves when size hits 7
    while stack.size() > 8 {
        stack.pop().unwrap();
    }
    assert_eq!(stack.capacity(), 31);
    stack.pop().unwrap();
    assert_eq!((stack.size(), stack.capacity()), (7, 15));
    assert_eq!(stack.as_slice(), &[0, 1, 2, 3, 4, 5, 6]);
    assert_well_formed(&stack);
}

#[test]
fn test_drain_returns_to_small_capacity() {
    let mut stack = filled(1, &(0..100).collect::<Vec<_>>());
    while stack.pop().is_ok() {}
    assert!(stack.is_empty());
    assert!(stack.capacity() <= 1, "capacity {}", stack.capacity());
    assert_well_formed(&stack);
}

#[test]
fn test_oscillation_at_boundary_stays_valid() {
    let mut stack = filled(1, &[1, 2]);
    for _ in 0..10 {
        stack.push(3).unwrap();
        stack.push(4).unwrap();
        stack.pop().unwrap();
        stack.pop().unwrap();
        assert_well_formed(&stack);
    }
    assert_eq!(stack.as_slice(), &[1, 2]);
}

/// Raw slots after every pop of a full drain.
fn drain_trace(config: StackConfig) -> Vec<Vec<i32>> {
    let mut stack = recorded_with::<i32>(1, config);
    for v in 0..8 {
        stack.push(v).unwrap();
    }
    let mut trace = Vec::new();
    while stack.pop().is_ok() {
        trace.push(stack.raw_slots().to_vec());
        assert_well_formed(&stack);
    }
    trace
}

#[test]
fn test_repoison_flag_is_unobservable_through_the_stack() {
    // pop validates the tail first and poisons the slot it vacates, so the
    // retained tail is already clean when a shrink happens
    assert_eq!(
        drain_trace(StackConfig::default().with_repoison_on_shrink(false)),
        drain_trace(StackConfig::default())
    );
}

#[test]
fn test_policy_functions() {
    assert_eq!(grown_capacity(0), Some(1));
    assert_eq!(grown_capacity(7), Some(15));
    assert_eq!(grown_capacity(usize::MAX), None);
    assert_eq!(shrunk_capacity(3), 1);
    assert!(should_shrink(0, 3));
    assert!(!should_shrink(1, 3));
    assert!(!should_shrink(0, 0));
}
