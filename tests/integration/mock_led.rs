//! Recording LED writer for integration tests.
//!
//! Captures every colour the engine pushes to the hardware seam so tests
//! can assert on the full write history without real PWM channels.  The
//! log handle is cloneable: the engine owns the writer, the test keeps
//! the handle.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use envirolog::led::{Color, LedWriter, StatusLed};

#[derive(Clone, Default)]
pub struct WriteLog {
    writes: Arc<Mutex<Vec<Color>>>,
}

#[allow(dead_code)]
impl WriteLog {
    pub fn snapshot(&self) -> Vec<Color> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Color> {
        self.writes.lock().unwrap().last().copied()
    }

    pub fn len(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn count_of(&self, color: Color) -> usize {
        self.writes.lock().unwrap().iter().filter(|c| **c == color).count()
    }

    pub fn clear(&self) {
        self.writes.lock().unwrap().clear();
    }

    /// Poll until `pred` holds for the write history, or fail the test.
    pub fn wait_for(&self, what: &str, pred: impl Fn(&[Color]) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(3);
        loop {
            if pred(&self.writes.lock().unwrap()) {
                return;
            }
            assert!(Instant::now() < deadline, "timed out waiting for {}", what);
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

pub struct RecordingLed {
    log: WriteLog,
}

impl RecordingLed {
    pub fn from_log(log: &WriteLog) -> Self {
        Self { log: log.clone() }
    }
}

impl LedWriter for RecordingLed {
    fn write(&mut self, color: Color) {
        self.log.writes.lock().unwrap().push(color);
    }
}

/// An initialized engine plus the handle to its write history.
pub fn ready_led() -> (StatusLed<RecordingLed>, WriteLog) {
    let log = WriteLog::default();
    let led = StatusLed::new(RecordingLed { log: log.clone() });
    assert!(led.initialize(), "engine must come up on the host");
    (led, log)
}

/// Poll until the engine is back at the bare base entry.
pub fn wait_for_base(led: &StatusLed<RecordingLed>) {
    let deadline = Instant::now() + Duration::from_secs(3);
    while led.overlay_depth() > 0 {
        assert!(
            Instant::now() < deadline,
            "timed out waiting for the stack to drain"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}
