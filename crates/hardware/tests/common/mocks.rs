use mockall::mock;
use tamasim_core::common::Timestamp;
use tamasim_core::hal::PollStatus;
use tamasim_core::host::{Clock, FramePresenter, InputSource, LcdFrame};

mock! {
    pub HostClock {}
    impl Clock for HostClock {
        fn now(&self) -> Timestamp;
        fn sleep_until(&mut self, deadline: Timestamp);
    }
}

mock! {
    pub Keyboard {}
    impl InputSource for Keyboard {
        fn poll(&mut self) -> PollStatus;
    }
}

mock! {
    pub Screen {}
    impl FramePresenter for Screen {
        fn present(&mut self, frame: &LcdFrame);
    }
}
