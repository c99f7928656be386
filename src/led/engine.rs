//! Cloneable engine handle and the mutex-guarded core behind it.
//!
//! One [`EngineCore`] holds the colour stack, the writer and the blink
//! bookkeeping.  Every mutation runs inside a single critical section and
//! leaves the LED showing the top of the stack before the lock is
//! released, so no caller or worker can observe a stale colour.
//!
//! Workers coordinate through `timer_epoch`: every structural change
//! (push, pop, retime, disable) bumps the epoch, and a blink fire that
//! slept through such a change carries a stale epoch and is discarded.
//! That replaces the stop/start timer dance of a classic software timer
//! and closes the gap where a pop could race a fire.

use core::cell::RefCell;
use std::sync::{Arc, Condvar, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{error, info, warn};

use super::stack::{ColorState, StatusStack};
use super::{Color, LedWriter, worker};

/// Flash-expiry queue depth.  Matches the stack: more outstanding expiry
/// tokens than stack slots cannot do useful work anyway.
pub(super) const EXPIRY_QUEUE_DEPTH: usize = super::STACK_DEPTH;

/// Token travelling from `flash()` to the expiry worker.  Carries no
/// payload — each token means "pop one overlay after the pulse window".
pub(super) struct ExpiryToken;

/// Drop counters, readable through [`StatusLed::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedStats {
    /// Pushes refused because the stack was full.
    pub overflow_drops: u32,
    /// Flashes rolled back because the expiry queue was full.
    pub expiry_drops: u32,
}

/// Everything the mutex guards.
struct EngineCore<W> {
    writer: W,
    stack: StatusStack,
    /// `true` while the blink shows the colour half of the cycle.
    blink_phase: bool,
    /// Bumped on every structural change; fences stale worker fires.
    timer_epoch: u32,
    initialized: bool,
    disabled: bool,
    last_render: Color,
    stats: LedStats,
}

impl<W: LedWriter> EngineCore<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            stack: StatusStack::new(),
            blink_phase: true,
            timer_epoch: 0,
            initialized: false,
            disabled: false,
            last_render: Color::BLACK,
            stats: LedStats::default(),
        }
    }

    /// Re-render the top entry and reset the blink cycle for it.  Returns
    /// whether the blink worker needs a wakeup (the new top blinks).
    fn retarget(&mut self) -> bool {
        self.blink_phase = true;
        self.timer_epoch = self.timer_epoch.wrapping_add(1);
        let top = self.stack.top();
        self.last_render = top.color;
        self.writer.write(top.color);
        top.is_blinking()
    }
}

/// Wakeup latch for the blink worker.  A notify is latched, so one that
/// lands while the worker is between waits ends the next wait
/// immediately instead of being lost.
pub(super) struct RearmLatch {
    flag: StdMutex<bool>,
    cv: Condvar,
}

impl RearmLatch {
    fn new() -> Self {
        Self {
            flag: StdMutex::new(false),
            cv: Condvar::new(),
        }
    }

    pub(super) fn notify(&self) {
        let mut flagged = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
        *flagged = true;
        self.cv.notify_one();
    }

    /// Park until notified.
    pub(super) fn wait(&self) {
        let mut flagged = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
        while !*flagged {
            flagged = self
                .cv
                .wait(flagged)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *flagged = false;
    }

    /// Park for at most `timeout`.  Returns `true` when a notify ended
    /// the wait early, `false` when the full timeout elapsed.
    pub(super) fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut flagged = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
        while !*flagged {
            let Some(left) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            flagged = self
                .cv
                .wait_timeout(flagged, left)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        *flagged = false;
        true
    }
}

/// State shared between API handles and the worker threads.
pub(super) struct EngineShared<W> {
    pub(super) core: Mutex<CriticalSectionRawMutex, RefCell<EngineCore<W>>>,
    pub(super) expiry: Channel<CriticalSectionRawMutex, ExpiryToken, EXPIRY_QUEUE_DEPTH>,
    pub(super) rearm: RearmLatch,
}

enum PushOutcome {
    NotReady,
    Full,
    Pushed,
}

/// Handle to the status LED engine.  Clones share one core; the handle is
/// what gets passed to subsystems that want to indicate something.
pub struct StatusLed<W> {
    shared: Arc<EngineShared<W>>,
}

impl<W> Clone for StatusLed<W> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<W: LedWriter> StatusLed<W> {
    /// Wrap a writer.  The engine stays inert until [`initialize`]
    /// succeeds.
    ///
    /// [`initialize`]: StatusLed::initialize
    pub fn new(writer: W) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                core: Mutex::new(RefCell::new(EngineCore::new(writer))),
                expiry: Channel::new(),
                rearm: RearmLatch::new(),
            }),
        }
    }

    fn with_core<R>(&self, f: impl FnOnce(&mut EngineCore<W>) -> R) -> R {
        self.shared.core.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub(super) fn shared(&self) -> &EngineShared<W> {
        &self.shared
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Spawn the blink and flash-expiry workers and render the base.
    /// Returns `false` if a worker could not be spawned; the engine is
    /// then permanently inert and every other operation is a no-op.
    pub fn initialize(&self) -> bool {
        if self.with_core(|core| core.initialized) {
            return true;
        }
        if let Err(err) = worker::spawn(self.clone()) {
            error!("status LED: worker spawn failed, engine inert: {err}");
            return false;
        }
        self.with_core(|core| {
            core.initialized = true;
            let _ = core.retarget();
        });
        info!("status LED: engine ready");
        true
    }

    pub fn initialized(&self) -> bool {
        self.with_core(|core| core.initialized)
    }

    // ── Indications ───────────────────────────────────────────

    /// Overlay a solid colour.  Returns `false` when the engine is not
    /// ready, disabled, or the stack is full (nothing changes then).
    pub fn on(&self, color: Color) -> bool {
        match self.push_overlay(color) {
            PushOutcome::NotReady => false,
            PushOutcome::Full => {
                warn!("status LED: stack full, on({color}) dropped");
                false
            }
            PushOutcome::Pushed => true,
        }
    }

    /// Pop the top overlay and restore whatever it covered.  At the base
    /// this is a no-op.
    pub fn off(&self) {
        let wake = self.with_core(|core| {
            if !core.initialized || core.disabled || !core.stack.pop() {
                return false;
            }
            core.retarget()
        });
        if wake {
            self.shared.rearm.notify();
        }
    }

    /// Set the top overlay's blink half-period.  Zero returns it to
    /// solid.  The base entry never blinks, so this is a no-op there.
    pub fn blink(&self, period_ms: u32) {
        let wake = self.with_core(|core| {
            if !core.initialized || core.disabled {
                return false;
            }
            let Some(top) = core.stack.top_overlay_mut() else {
                return false;
            };
            top.blink_period_ms = period_ms;
            core.retarget()
        });
        if wake {
            self.shared.rearm.notify();
        }
    }

    /// Overlay a colour and start it blinking in one call.  If the
    /// overlay cannot be pushed (stack full) the cadence applies to the
    /// current top instead, keeping the attention pattern visible.
    pub fn blink_color(&self, color: Color, period_ms: u32) {
        let _ = self.on(color);
        self.blink(period_ms);
    }

    /// Short transient overlay: pushes the colour now, and the expiry
    /// worker pops it again after [`FLASH_PULSE_MS`].  Cheap enough for
    /// hot paths; returns `false` when the overlay could not be placed.
    ///
    /// [`FLASH_PULSE_MS`]: super::FLASH_PULSE_MS
    pub fn flash(&self, color: Color) -> bool {
        match self.push_overlay(color) {
            PushOutcome::NotReady => false,
            PushOutcome::Full => {
                warn!("status LED: stack full, flash({color}) dropped");
                false
            }
            PushOutcome::Pushed => {
                if self.shared.expiry.try_send(ExpiryToken).is_ok() {
                    return true;
                }
                // More than a queue's worth of flashes inside one pulse
                // window.  Take the overlay straight back down instead of
                // leaking it on the stack.
                let wake = self.with_core(|core| {
                    core.stats.expiry_drops += 1;
                    if core.stack.pop() { core.retarget() } else { false }
                });
                if wake {
                    self.shared.rearm.notify();
                }
                warn!("status LED: expiry queue full, flash({color}) dropped");
                false
            }
        }
    }

    /// Cancel the top overlay's blink, leaving its colour solid.  With
    /// `turn_off` the overlay is popped as well, exactly like [`off`].
    ///
    /// [`off`]: StatusLed::off
    pub fn stop(&self, turn_off: bool) {
        if turn_off {
            self.off();
            return;
        }
        let _ = self.with_core(|core| {
            if !core.initialized || core.disabled {
                return false;
            }
            if let Some(top) = core.stack.top_overlay_mut() {
                top.blink_period_ms = 0;
            }
            core.retarget()
        });
    }

    // ── Enable / disable ──────────────────────────────────────

    /// Disable unwinds the stack to the base and blacks the LED out in
    /// one critical section; enable just lifts the gate again.
    /// Idempotent either way.
    pub fn set_disabled(&self, disable: bool) {
        self.with_core(|core| {
            if !core.initialized || core.disabled == disable {
                return;
            }
            core.disabled = disable;
            if disable {
                core.stack.unwind();
                let _ = core.retarget();
            }
        });
    }

    pub fn disabled(&self) -> bool {
        self.with_core(|core| core.disabled)
    }

    // ── Diagnostics ───────────────────────────────────────────

    /// Last colour actually written to the LED (black in the dark half
    /// of a blink cycle).
    pub fn rendered(&self) -> Color {
        self.with_core(|core| core.last_render)
    }

    /// Overlays above the permanent base.
    pub fn overlay_depth(&self) -> usize {
        self.with_core(|core| core.stack.overlay_depth())
    }

    pub fn is_blinking(&self) -> bool {
        self.with_core(|core| {
            core.initialized && !core.disabled && core.stack.top().is_blinking()
        })
    }

    pub fn stats(&self) -> LedStats {
        self.with_core(|core| core.stats)
    }

    // ── Internal ──────────────────────────────────────────────

    fn push_overlay(&self, color: Color) -> PushOutcome {
        self.with_core(|core| {
            if !core.initialized || core.disabled {
                PushOutcome::NotReady
            } else if core.stack.push(ColorState::solid(color)) {
                let _ = core.retarget();
                PushOutcome::Pushed
            } else {
                core.stats.overflow_drops += 1;
                PushOutcome::Full
            }
        })
    }

    /// Blink worker: current arming, or `None` when there is nothing to
    /// blink.  The returned epoch must accompany the matching
    /// [`blink_tick`](StatusLed::blink_tick).
    pub(super) fn armed_blink(&self) -> Option<(u32, u32)> {
        self.with_core(|core| {
            if !core.initialized || core.disabled {
                return None;
            }
            let top = core.stack.top();
            top.is_blinking()
                .then_some((top.blink_period_ms, core.timer_epoch))
        })
    }

    /// Blink worker: toggle the phase after sleeping one half-period.
    /// A stale epoch means the stack changed while the worker slept; the
    /// fire is discarded and the worker re-reads its arming.
    pub(super) fn blink_tick(&self, epoch: u32) {
        self.with_core(|core| {
            if core.timer_epoch != epoch {
                return;
            }
            let top = core.stack.top();
            if !top.is_blinking() {
                return;
            }
            core.blink_phase = !core.blink_phase;
            let shown = if core.blink_phase {
                top.color
            } else {
                Color::BLACK
            };
            core.last_render = shown;
            core.writer.write(shown);
        });
    }
}
