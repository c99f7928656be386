//! Bounded LIFO stack of colour states.
//!
//! The stack models the engine's layered indications: index 0 is a
//! permanent black base installed at construction, everything above it is
//! an overlay pushed by `on()` / `flash()`.  The base cannot be popped or
//! retimed, so the stack is never empty and the LED always has something
//! to show.

use heapless::Vec;

use super::Color;

/// Total stack capacity, base entry included.
pub const STACK_DEPTH: usize = 10;

const MAX_OVERLAYS: usize = STACK_DEPTH - 1;

/// One entry on the status stack: a colour plus its blink half-period.
/// A period of zero means solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorState {
    pub color: Color,
    pub blink_period_ms: u32,
}

impl ColorState {
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            blink_period_ms: 0,
        }
    }

    pub const fn is_blinking(&self) -> bool {
        self.blink_period_ms > 0
    }
}

/// Fixed-capacity colour stack.  Overlays live in a `heapless::Vec`; the
/// base entry is implicit and therefore structurally irremovable.
#[derive(Debug, Default)]
pub struct StatusStack {
    overlays: Vec<ColorState, MAX_OVERLAYS>,
}

impl StatusStack {
    /// The permanent bottom entry: black, solid.
    pub const BASE: ColorState = ColorState::solid(Color::BLACK);

    pub fn new() -> Self {
        Self {
            overlays: Vec::new(),
        }
    }

    /// The entry the LED should currently show.
    pub fn top(&self) -> ColorState {
        self.overlays.last().copied().unwrap_or(Self::BASE)
    }

    /// Mutable access to the top overlay, or `None` when only the base
    /// remains (the base is never retimed).
    pub fn top_overlay_mut(&mut self) -> Option<&mut ColorState> {
        self.overlays.last_mut()
    }

    /// Push an overlay.  Returns `false` when the stack is full; the
    /// stack is unchanged in that case.
    pub fn push(&mut self, state: ColorState) -> bool {
        self.overlays.push(state).is_ok()
    }

    /// Pop the top overlay.  Returns `false` at the base (nothing to pop).
    pub fn pop(&mut self) -> bool {
        self.overlays.pop().is_some()
    }

    /// Drop every overlay, leaving only the base.
    pub fn unwind(&mut self) {
        self.overlays.clear();
    }

    /// Number of overlays above the base.
    pub fn overlay_depth(&self) -> usize {
        self.overlays.len()
    }

    pub fn at_base(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.overlays.is_full()
    }
}
