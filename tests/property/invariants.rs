//! Model-based properties: the stack behaves like a `Vec` used as a stack and
//! stays well-formed after every operation.

use super::common::{assert_well_formed, recorded, Recorded};
use guardstack::{Sentinel, StackError, GUARD_MAGIC};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Pop,
    Peek(usize),
    Top,
}

// =============================================================================
// PROPERTY GENERATORS
// =============================================================================

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        3 => Just(Op::Pop),
        1 => (0usize..40).prop_map(Op::Peek),
        1 => Just(Op::Top),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..200)
}

/// Apply one op to both the stack and the model, checking they agree.
fn step(stack: &mut Recorded<i32>, model: &mut Vec<i32>, op: &Op) -> Result<(), TestCaseError> {
    match *op {
        Op::Push(v) => {
            prop_assert_eq!(stack.push(v), Ok(()));
            model.push(v);
        }
        Op::Pop => match model.pop() {
            Some(expected) => prop_assert_eq!(stack.pop(), Ok(expected)),
            None => prop_assert_eq!(stack.pop(), Err(StackError::Empty)),
        },
        Op::Peek(index) => match model.get(index) {
            Some(expected) => prop_assert_eq!(stack.peek(index), Ok(expected)),
            None => prop_assert_eq!(
                stack.peek(index),
                Err(StackError::OutOfBounds {
                    index,
                    size: model.len()
                })
            ),
        },
        Op::Top => match model.last() {
            Some(expected) => prop_assert_eq!(stack.top(), Ok(expected)),
            None => prop_assert_eq!(stack.top(), Err(StackError::Empty)),
        },
    }
    Ok(())
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The stack agrees with a `Vec` model on every result.
    #[test]
    fn prop_matches_vec_model(initial in 0usize..8, ops in ops_strategy()) {
        let mut stack = recorded::<i32>(initial);
        let mut model = Vec::new();
        for op in &ops {
            step(&mut stack, &mut model, op)?;
            prop_assert_eq!(stack.as_slice(), model.as_slice());
        }
    }

    /// Every structural invariant holds after every operation, including
    /// failed ones.
    #[test]
    fn prop_invariants_after_every_op(initial in 0usize..8, ops in ops_strategy()) {
        let mut stack = recorded::<i32>(initial);
        let mut model = Vec::new();
        for op in &ops {
            step(&mut stack, &mut model, op)?;
            assert_well_formed(&stack);
        }
    }

    /// Only misuse is ever reported on a healthy stack.
    #[test]
    fn prop_no_integrity_failures_without_corruption(ops in ops_strategy()) {
        let mut stack = recorded::<i32>(1);
        let mut model = Vec::new();
        for op in &ops {
            step(&mut stack, &mut model, op)?;
        }
        for err in stack.reporter().errors() {
            prop_assert!(
                matches!(err, StackError::Empty | StackError::OutOfBounds { .. }),
                "unexpected incident: {}",
                err
            );
        }
    }

    /// Guard words never change through normal use.
    #[test]
    fn prop_guards_untouched(ops in ops_strategy()) {
        let mut stack = recorded::<i32>(1);
        let mut model = Vec::new();
        for op in &ops {
            step(&mut stack, &mut model, op)?;
            prop_assert_eq!(stack.guards(), (GUARD_MAGIC, GUARD_MAGIC));
        }
    }

    /// LIFO: pushing a sequence then draining yields it reversed.
    #[test]
    fn prop_lifo(values in prop::collection::vec(any::<i64>(), 0..100)) {
        let mut stack = recorded::<i64>(1);
        for &v in &values {
            stack.push(v).unwrap();
        }
        let drained: Vec<i64> = std::iter::from_fn(|| stack.pop().ok()).collect();
        let mut expected = values.clone();
        expected.reverse();
        prop_assert_eq!(drained, expected);
    }

    /// Failed pops on an empty stack leave it exactly as it was.
    #[test]
    fn prop_empty_pop_changes_nothing(initial in 0usize..16, attempts in 1usize..5) {
        let mut stack = recorded::<i32>(initial);
        let before = (stack.size(), stack.capacity(), stack.checksum());
        for _ in 0..attempts {
            prop_assert_eq!(stack.pop(), Err(StackError::Empty));
        }
        prop_assert_eq!((stack.size(), stack.capacity(), stack.checksum()), before);
        prop_assert_eq!(stack.reporter().errors().len(), attempts);
    }

    /// Strings: popped slots go back to the empty-string sentinel.
    #[test]
    fn prop_string_poison_region(words in prop::collection::vec("[a-z]{1,6}", 0..30)) {
        let mut stack = recorded::<String>(1);
        for w in &words {
            stack.push(w.clone()).unwrap();
        }
        for _ in 0..words.len() / 2 {
            stack.pop().unwrap();
        }
        for slot in &stack.raw_slots()[stack.size()..] {
            prop_assert!(slot.is_poison());
        }
        assert_well_formed(&stack);
    }
}
