//! Fault injection: every simulated corruption is caught, reported, and
//! leaves the stack untouched.

use super::common::{assert_well_formed, filled, recorded_with, reported};
use guardstack::testing::{
    corrupt_back_guard, corrupt_front_guard, force_size, release_buffer, scribble, tamper_checksum,
};
use guardstack::{ChecksumPolicy, StackConfig, StackError, GUARD_MAGIC};

#[test]
fn test_front_guard_corruption_blocks_push() {
    let mut stack = filled(2, &[1]);
    corrupt_front_guard(&mut stack, 0xBAD);

    assert_eq!(
        stack.push(2),
        Err(StackError::GuardCorrupted {
            front: 0xBAD,
            back: GUARD_MAGIC
        })
    );
    assert_eq!(stack.as_slice(), &[1]);

    corrupt_front_guard(&mut stack, GUARD_MAGIC);
    stack.push(2).unwrap();
    assert_well_formed(&stack);
}

#[test]
fn test_back_guard_corruption_blocks_pop() {
    let mut stack = filled(2, &[1, 2]);
    corrupt_back_guard(&mut stack, 0);

    assert!(matches!(
        stack.pop(),
        Err(StackError::GuardCorrupted { back: 0, .. })
    ));
    assert_eq!(stack.size(), 2);
}

#[test]
fn test_guard_checked_before_empty() {
    let mut stack = filled(1, &[]);
    corrupt_back_guard(&mut stack, 7);
    assert!(matches!(
        stack.pop(),
        Err(StackError::GuardCorrupted { .. })
    ));
}

#[test]
fn test_write_past_top_is_caught() {
    let mut stack = filled(4, &[1, 2]);
    assert!(scribble(&mut stack, 3, 99));

    assert_eq!(
        stack.push(3),
        Err(StackError::PoisonRegionViolated { index: 3 })
    );
    assert_eq!(stack.validate(), Err(StackError::PoisonRegionViolated { index: 3 }));
    assert_eq!(reported(&stack).len(), 2);

    let dump = stack.describe().to_string();
    assert!(dump.contains("[3] = 99 (POISON VIOLATED)"));
}

#[test]
fn test_write_to_live_slot_is_not_a_violation() {
    let mut stack = filled(4, &[1, 2]);
    assert!(scribble(&mut stack, 0, -661));
    assert_eq!(stack.validate(), Ok(()));
}

#[test]
fn test_scribble_out_of_range_is_refused() {
    let mut stack = filled(1, &[1]);
    assert!(!scribble(&mut stack, 5, 0));
}

#[test]
fn test_checksum_tamper_blocks_by_default() {
    let mut stack = filled(2, &[1]);
    let real = stack.checksum();
    tamper_checksum(&mut stack, real + 1);

    assert_eq!(
        stack.push(2),
        Err(StackError::ChecksumMismatch {
            stored: real + 1,
            expected: real
        })
    );
    assert_eq!(stack.as_slice(), &[1]);
    // validation proper does not look at the checksum
    assert_eq!(stack.validate(), Ok(()));
}

#[test]
fn test_checksum_tamper_report_only_proceeds_and_reseals() {
    let config = StackConfig::default().with_checksum_policy(ChecksumPolicy::ReportOnly);
    let mut stack = recorded_with::<i32>(2, config);
    stack.push(1).unwrap();
    tamper_checksum(&mut stack, 0);

    assert_eq!(stack.push(2), Ok(()));
    assert_eq!(stack.as_slice(), &[1, 2]);
    assert!(matches!(
        reported(&stack).as_slice(),
        [StackError::ChecksumMismatch { stored: 0, .. }]
    ));
    assert_well_formed(&stack);
}

#[test]
fn test_size_beyond_capacity() {
    let mut stack = filled(2, &[1]);
    force_size(&mut stack, 3);
    assert_eq!(
        stack.pop(),
        Err(StackError::InvalidSize {
            size: 3,
            capacity: 2
        })
    );
    force_size(&mut stack, 1);
    assert_eq!(stack.pop(), Ok(1));
}

#[test]
fn test_released_buffer() {
    let mut stack = filled(2, &[]);
    release_buffer(&mut stack);
    assert_eq!(stack.push(1), Err(StackError::InvalidReference));
    assert_eq!(stack.peek(0), Err(StackError::InvalidReference));
    assert_eq!(stack.top(), Err(StackError::InvalidReference));
    assert_eq!(stack.pop(), Err(StackError::InvalidReference));
    assert!(!stack.is_destroyed());
    assert!(stack.describe().to_string().contains("data [released]"));
}

#[test]
fn test_incidents_carry_dumps() {
    let mut stack = filled(2, &[4]);
    corrupt_front_guard(&mut stack, 1);
    let _ = stack.validate();

    let incident = stack.reporter().last().unwrap();
    assert!(incident.dump.contains("(CORRUPTED)"));
    assert!(incident.dump.contains("[0] = 4"));
    assert!(incident.error.is_integrity_failure());
}
