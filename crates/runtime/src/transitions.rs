use std::collections::BTreeMap;

/// Lifecycle phase of a keyed transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Newly joined: animating from zero toward its first value.
    Entering,
    /// Present: animating between values (or settled).
    Active,
    /// Removed: animating toward zero, dropped once finished.
    Exiting,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Tween {
    from: f64,
    to: f64,
    start_s: f64,
    duration_s: f64,
}

impl Tween {
    fn value_at(&self, now_s: f64) -> f64 {
        let p = self.progress_at(now_s);
        self.from + (self.to - self.from) * p
    }

    fn progress_at(&self, now_s: f64) -> f64 {
        if self.duration_s <= 0.0 {
            return 1.0;
        }
        ((now_s - self.start_s) / self.duration_s).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Entry {
    phase: Phase,
    tween: Tween,
}

/// Deterministic keyed tween bookkeeping for enter/update/exit animation.
///
/// The clock advances only through `advance`, so a fixed update sequence
/// always produces the same values. Retargeting is idempotent: targeting a
/// key with the value it is already heading to does not restart the tween,
/// which keeps repeated paint callbacks from visibly changing state.
#[derive(Debug, Default)]
pub struct Transitions {
    now_s: f64,
    entries: BTreeMap<String, Entry>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_s(&self) -> f64 {
        self.now_s
    }

    /// Advances the clock and drops exits that have finished.
    pub fn advance(&mut self, dt_s: f64) {
        self.now_s += dt_s.max(0.0);
        let now = self.now_s;
        self.entries
            .retain(|_, e| !(e.phase == Phase::Exiting && e.tween.progress_at(now) >= 1.0));
    }

    /// Targets `key` at `value`, creating an entering tween for new keys.
    ///
    /// An exiting key that reappears re-enters from its current value.
    pub fn target(&mut self, key: &str, value: f64, duration_s: f64) {
        let now = self.now_s;
        match self.entries.get_mut(key) {
            None => {
                self.entries.insert(
                    key.to_string(),
                    Entry {
                        phase: Phase::Entering,
                        tween: Tween {
                            from: 0.0,
                            to: value,
                            start_s: now,
                            duration_s,
                        },
                    },
                );
            }
            Some(entry) => {
                if entry.phase != Phase::Exiting && entry.tween.to == value {
                    return;
                }
                let current = entry.tween.value_at(now);
                entry.phase = if entry.phase == Phase::Exiting {
                    Phase::Entering
                } else {
                    Phase::Active
                };
                entry.tween = Tween {
                    from: current,
                    to: value,
                    start_s: now,
                    duration_s,
                };
            }
        }
    }

    /// Starts an exit tween toward zero; the key is dropped once it lands.
    pub fn remove(&mut self, key: &str, duration_s: f64) {
        let now = self.now_s;
        if let Some(entry) = self.entries.get_mut(key) {
            if entry.phase == Phase::Exiting {
                return;
            }
            let current = entry.tween.value_at(now);
            entry.phase = Phase::Exiting;
            entry.tween = Tween {
                from: current,
                to: 0.0,
                start_s: now,
                duration_s,
            };
        }
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.entries.get(key).map(|e| e.tween.value_at(self.now_s))
    }

    pub fn phase(&self, key: &str) -> Option<Phase> {
        self.entries.get(key).map(|e| e.phase)
    }

    /// Progress of the key's current tween in `[0, 1]`.
    pub fn progress(&self, key: &str) -> Option<f64> {
        self.entries
            .get(key)
            .map(|e| e.tween.progress_at(self.now_s))
    }

    /// Keys in ascending order (stable across identical update sequences).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn is_idle(&self) -> bool {
        self.entries
            .values()
            .all(|e| e.phase != Phase::Exiting && e.tween.progress_at(self.now_s) >= 1.0)
    }
}
