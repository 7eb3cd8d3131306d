//! # Timestamp Tests
//!
//! Wrapping microsecond timestamps: narrowing from host clocks and deadline distance
//! across the 2^32 wrap.

use proptest::prelude::*;
use rstest::rstest;
use tamasim_core::common::Timestamp;

#[test]
fn test_from_micros_keeps_low_bits() {
    assert_eq!(Timestamp::from_micros(1_234), Timestamp(1_234));
    assert_eq!(Timestamp::from_micros(u64::from(u32::MAX) + 6), Timestamp(5));
}

#[test]
fn test_display_in_microseconds() {
    assert_eq!(Timestamp(42).to_string(), "42us");
}

#[rstest]
#[case::future(Timestamp(100), Timestamp(150), 50)]
#[case::past(Timestamp(150), Timestamp(100), -50)]
#[case::now(Timestamp(7), Timestamp(7), 0)]
#[case::across_wrap(Timestamp(u32::MAX - 9), Timestamp(10), 20)]
#[case::behind_wrap(Timestamp(10), Timestamp(u32::MAX - 9), -20)]
fn test_micros_until(#[case] now: Timestamp, #[case] deadline: Timestamp, #[case] expected: i32) {
    assert_eq!(now.micros_until(deadline), expected);
}

#[test]
fn test_has_reached_is_inclusive() {
    let t = Timestamp(500);
    assert!(t.has_reached(t));
    assert!(t.has_reached(Timestamp(499)));
    assert!(!t.has_reached(Timestamp(501)));
}

proptest! {
    #[test]
    fn prop_wrapping_add_then_distance(start in any::<u32>(), delta in 0u32..=i32::MAX as u32) {
        let now = Timestamp(start);
        let deadline = now.wrapping_add(delta);
        prop_assert_eq!(now.micros_until(deadline), delta as i32);
        prop_assert!(deadline.has_reached(deadline));
    }

    #[test]
    fn prop_narrowing_is_exact_modulo_wrap(micros in any::<u64>()) {
        let ts = Timestamp::from_micros(micros);
        prop_assert_eq!(u64::from(ts.as_micros()), micros % (1u64 << 32));
    }
}
