//! # Input Tests

use tamasim_core::hal::PollStatus;
use tamasim_core::host::{InputSource, NoInput, QuitSignal};

#[test]
fn test_no_input_continues() {
    assert_eq!(NoInput.poll(), PollStatus::Continue);
}

#[test]
fn test_quit_signal_is_shared() {
    let signal = QuitSignal::new();
    let mut source = signal.clone();
    assert_eq!(source.poll(), PollStatus::Continue);

    std::thread::spawn(move || signal.request()).join().unwrap();
    assert!(source.is_requested());
    assert_eq!(source.poll(), PollStatus::Quit);
    assert_eq!(source.poll(), PollStatus::Quit, "quit is sticky");
}
