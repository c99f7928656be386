//! User button driver: momentary presses and long-hold increments.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up.  The GPIO fires on
//! both edges; the ISR (registered in `hw_init`) pushes a raw down/up
//! event into the lock-free queue, and the main loop feeds those edges
//! plus a periodic `poll()` into this state machine.
//!
//! ## Classification
//!
//! | Event              | Condition                                   |
//! |--------------------|---------------------------------------------|
//! | `MomentaryPress`   | released before 1 s, no increment reached   |
//! | `HeldIncrement(n)` | still held as the n-th increment elapses    |
//! | `Released(n)`      | released after ≥ 1 s or ≥ 1 increment       |
//!
//! Increments drive the reset escalation; a momentary press toggles the
//! settings session.  Everything here is pure state — no statics, no
//! hardware access — so the whole classifier runs under host tests.

/// Edge-to-edge presses shorter than this are switch bounce.
const DEBOUNCE_MS: u32 = 30;
/// Upper bound for a momentary press.
const MOMENTARY_MAX_MS: u32 = 1000;

/// Classified button activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Short tap: down and up within the momentary window.
    MomentaryPress,
    /// The n-th hold increment elapsed with the button still down
    /// (1-based).
    HeldIncrement(u16),
    /// Button released after a long hold; carries the increments reached
    /// (zero when released between the momentary window and the first
    /// increment).
    Released(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    Held { since_ms: u32, increments: u16 },
}

pub struct UserButton {
    increment_ms: u32,
    state: PressState,
}

impl UserButton {
    /// `press_increment_secs` is the hold time between successive
    /// [`ButtonEvent::HeldIncrement`]s (config default: 5 s).
    pub fn new(press_increment_secs: u16) -> Self {
        Self {
            increment_ms: u32::from(press_increment_secs) * 1000,
            state: PressState::Idle,
        }
    }

    /// Feed one ISR edge.  `pressed` is the debounced electrical sense
    /// (`true` = button down).
    pub fn on_edge(&mut self, pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        match (self.state, pressed) {
            (PressState::Idle, true) => {
                self.state = PressState::Held {
                    since_ms: now_ms,
                    increments: 0,
                };
                None
            }
            (PressState::Held { since_ms, increments }, false) => {
                self.state = PressState::Idle;
                let held_ms = now_ms.wrapping_sub(since_ms);
                if held_ms < DEBOUNCE_MS {
                    None
                } else if increments == 0 && held_ms < MOMENTARY_MAX_MS {
                    Some(ButtonEvent::MomentaryPress)
                } else {
                    Some(ButtonEvent::Released(increments))
                }
            }
            // Repeated same-sense edges are glitches; keep current state.
            _ => None,
        }
    }

    /// Call from the main loop every tick.  Emits at most one increment
    /// per call, so a slow loop catches up over successive ticks.
    pub fn poll(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let PressState::Held { since_ms, increments } = self.state else {
            return None;
        };
        let held_ms = now_ms.wrapping_sub(since_ms);
        let due = u32::from(increments)
            .saturating_add(1)
            .saturating_mul(self.increment_ms);
        if self.increment_ms > 0 && held_ms >= due {
            let reached = increments + 1;
            self.state = PressState::Held {
                since_ms,
                increments: reached,
            };
            return Some(ButtonEvent::HeldIncrement(reached));
        }
        None
    }

    pub fn is_held(&self) -> bool {
        matches!(self.state, PressState::Held { .. })
    }
}
