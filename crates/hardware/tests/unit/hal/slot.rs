//! # Slot Order Tests
//!
//! The slot order is an ABI contract; these tests pin it.

use rstest::rstest;
use tamasim_core::hal::Slot;

#[test]
fn test_slot_count() {
    assert_eq!(Slot::COUNT, 13);
    assert_eq!(Slot::ALL.len(), Slot::COUNT);
}

#[test]
fn test_all_is_in_index_order() {
    for (i, slot) in Slot::ALL.into_iter().enumerate() {
        assert_eq!(slot.index(), i, "{slot} out of order");
        assert_eq!(Slot::from_index(i), Some(slot));
    }
    assert_eq!(Slot::from_index(Slot::COUNT), None);
}

#[rstest]
#[case(Slot::Allocate, 0, "malloc")]
#[case(Slot::Release, 1, "free")]
#[case(Slot::Halt, 2, "halt")]
#[case(Slot::IsLogEnabled, 3, "is_log_enabled")]
#[case(Slot::Log, 4, "log")]
#[case(Slot::SleepUntil, 5, "sleep_until")]
#[case(Slot::Timestamp, 6, "get_timestamp")]
#[case(Slot::RefreshDisplay, 7, "update_screen")]
#[case(Slot::SetPixel, 8, "set_lcd_matrix")]
#[case(Slot::SetIndicator, 9, "set_lcd_icon")]
#[case(Slot::SetAudioFrequency, 10, "set_frequency")]
#[case(Slot::EnableAudio, 11, "play_frequency")]
#[case(Slot::PollInput, 12, "handler")]
fn test_slot_abi_position(#[case] slot: Slot, #[case] index: usize, #[case] c_name: &str) {
    assert_eq!(slot.index(), index);
    assert_eq!(slot.c_name(), c_name);
}

#[test]
fn test_only_sleep_until_may_block() {
    let blocking: Vec<Slot> = Slot::ALL.into_iter().filter(|s| s.may_block()).collect();
    assert_eq!(blocking, vec![Slot::SleepUntil]);
}

#[test]
fn test_display_uses_rust_name() {
    assert_eq!(Slot::RefreshDisplay.to_string(), "refresh_display");
    assert_eq!(Slot::PollInput.to_string(), "poll_input");
}
