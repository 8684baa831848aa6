use std::sync::Mutex;

/// Default lower HSV bound at startup.
pub const DEFAULT_LOWER: [u8; 3] = [100, 100, 100];

/// Default upper HSV bound at startup.
pub const DEFAULT_UPPER: [u8; 3] = [130, 255, 255];

/// The pair of HSV bounds currently in effect, read and written as one unit.
///
/// Component-wise ordering of `lower` and `upper` is not enforced; an
/// inverted range simply selects nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdState {
    /// Lower bound per channel (H in [0, 180], S and V in [0, 255]).
    pub lower: [u8; 3],
    /// Upper bound per channel (H in [0, 180], S and V in [0, 255]).
    pub upper: [u8; 3],
}

impl Default for ThresholdState {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
        }
    }
}

/// Shared store mediating concurrent access to the [`ThresholdState`].
///
/// The control panel writes on every slider change; the capture loop reads
/// one snapshot per iteration. The lock is held only across the copy of the
/// six bound values, so neither side blocks the other for longer than that.
#[derive(Debug, Default)]
pub struct ThresholdStore {
    state: Mutex<ThresholdState>,
}

impl ThresholdStore {
    /// Replace both bounds as a single atomic operation.
    pub fn set(&self, state: ThresholdState) {
        *self.state.lock().expect("threshold store lock poisoned") = state;
    }

    /// Return a consistent copy of both bounds.
    ///
    /// The copy always reflects a single `set` call, never a mix of two.
    pub fn snapshot(&self) -> ThresholdState {
        *self.state.lock().expect("threshold store lock poisoned")
    }

    /// Restore the default bounds.
    pub fn reset(&self) {
        self.set(ThresholdState::default());
    }
}
