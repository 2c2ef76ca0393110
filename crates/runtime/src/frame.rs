/// Deterministic frame metadata.
///
/// This is the primary timebase for the session: paint callbacks, overlay
/// transitions, and traceability events all reference a frame index rather
/// than wall-clock time, so a sequence of updates can be recorded and
/// replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self { index, dt_s }
    }

    /// Session time at the start of this frame (seconds).
    pub fn time_s(self) -> f64 {
        self.index as f64 * self.dt_s
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}
