//! Hold-to-commit recognition state machine.
//!
//! Turns a flickering per-frame candidate symbol into discrete commits.
//! Two regimes:
//!
//! * **AwaitingFirst** — the same candidate must be held continuously for
//!   `first` before it commits.  Any frame without a candidate restarts the
//!   hold from zero.
//! * **Steady** — entered after the first commit.  A present candidate
//!   commits on any frame at least `steady` after the previous commit, so a
//!   gesture held continuously repeats once per `steady` interval.
//!
//! The machine never reads a clock.  Callers pass a monotonic timestamp per
//! frame, which keeps [`RecognitionState::advance`] a pure function.

use std::time::Duration;

pub const FIRST_HOLD:  Duration = Duration::from_millis(2500);
pub const STEADY_HOLD: Duration = Duration::from_millis(1500);

// ════════════════════════════════════════════════════════════════════════════
// Mode / HoldTiming
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    AwaitingFirst,
    Steady,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::AwaitingFirst => "first",
            Mode::Steady        => "steady",
        }
    }
}

/// Hold thresholds for the two regimes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoldTiming {
    pub first:  Duration,
    pub steady: Duration,
}

impl Default for HoldTiming {
    fn default() -> Self {
        HoldTiming { first: FIRST_HOLD, steady: STEADY_HOLD }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RecognitionState
// ════════════════════════════════════════════════════════════════════════════

/// A candidate being held during `AwaitingFirst`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hold {
    pub symbol: String,
    pub since:  Duration,
}

/// Outcome of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Symbol to append to the transcript, if this frame fired.
    pub committed: Option<String>,
    /// Hold progress in `AwaitingFirst`, gate progress in `Steady` (0–1).
    pub progress:  f32,
}

impl Step {
    fn idle() -> Self { Step { committed: None, progress: 0.0 } }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecognitionState {
    mode:        Mode,
    hold:        Option<Hold>,
    last_commit: Option<Duration>,
}

impl RecognitionState {
    pub fn new() -> Self { Self::default() }

    pub fn mode(&self)        -> Mode             { self.mode }
    pub fn hold(&self)        -> Option<&Hold>    { self.hold.as_ref() }
    pub fn last_commit(&self) -> Option<Duration> { self.last_commit }

    /// Back to `AwaitingFirst` with no hold and no commit history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance by one frame.
    ///
    /// `candidate` is the symbol looked up for this frame (`None` for no
    /// hands or no table match); `now` is the frame timestamp.
    pub fn advance(
        mut self,
        candidate: Option<&str>,
        now:       Duration,
        timing:    &HoldTiming,
    ) -> (Self, Step) {
        let Some(symbol) = candidate else {
            // A broken hold never carries over.  Mode is untouched.
            self.hold = None;
            return (self, Step::idle());
        };

        match self.mode {
            Mode::AwaitingFirst => {
                let since = match &self.hold {
                    Some(h) if h.symbol == symbol => h.since,
                    _ => {
                        self.hold = Some(Hold { symbol: symbol.to_string(), since: now });
                        return (self, Step::idle());
                    }
                };

                let held     = now.saturating_sub(since);
                let progress = fraction(held, timing.first);
                if held < timing.first {
                    return (self, Step { committed: None, progress });
                }

                self.mode        = Mode::Steady;
                self.hold        = None;
                self.last_commit = Some(now);
                (self, Step { committed: Some(symbol.to_string()), progress })
            }

            Mode::Steady => {
                let elapsed = self.last_commit
                    .map_or(timing.steady, |t| now.saturating_sub(t));
                if elapsed < timing.steady {
                    let progress = fraction(elapsed, timing.steady);
                    return (self, Step { committed: None, progress });
                }

                self.last_commit = Some(now);
                (self, Step { committed: Some(symbol.to_string()), progress: 1.0 })
            }
        }
    }
}

/// `part / whole`, clamped to 0–1.  A zero `whole` counts as complete.
fn fraction(part: Duration, whole: Duration) -> f32 {
    if whole.is_zero() {
        return 1.0;
    }
    (part.as_secs_f32() / whole.as_secs_f32()).min(1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    /// Feed `symbol` every 100 ms over `[from, to]`; collect commit times.
    fn hold(
        mut state: RecognitionState,
        symbol:    Option<&str>,
        from:      u64,
        to:        u64,
    ) -> (RecognitionState, Vec<u64>) {
        let timing = HoldTiming::default();
        let mut commits = Vec::new();
        let mut t = from;
        while t <= to {
            let (next, step) = state.advance(symbol, ms(t), &timing);
            state = next;
            if step.committed.is_some() { commits.push(t); }
            t += 100;
        }
        (state, commits)
    }

    #[test]
    fn starts_awaiting_first() {
        let s = RecognitionState::new();
        assert_eq!(s.mode(), Mode::AwaitingFirst);
        assert!(s.hold().is_none());
        assert!(s.last_commit().is_none());
    }

    #[test]
    fn short_first_hold_never_commits() {
        let (s, commits) = hold(RecognitionState::new(), Some("A"), 0, 2400);
        assert!(commits.is_empty());
        assert_eq!(s.mode(), Mode::AwaitingFirst);
    }

    #[test]
    fn first_hold_commits_once_at_threshold() {
        let (s, commits) = hold(RecognitionState::new(), Some("A"), 0, 3000);
        assert_eq!(commits, vec![2500]);
        assert_eq!(s.mode(), Mode::Steady);
        assert_eq!(s.last_commit(), Some(ms(2500)));
        assert!(s.hold().is_none());
    }

    #[test]
    fn first_frame_reports_zero_progress() {
        let timing = HoldTiming::default();
        let (s, step) = RecognitionState::new().advance(Some("A"), ms(0), &timing);
        assert_eq!(step.progress, 0.0);
        let (_, step) = s.advance(Some("A"), ms(1250), &timing);
        assert!((step.progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn gap_restarts_first_hold() {
        let timing = HoldTiming::default();
        let (s, _) = hold(RecognitionState::new(), Some("A"), 0, 2000);
        // One empty frame …
        let (s, _) = s.advance(None, ms(2100), &timing);
        assert!(s.hold().is_none());
        // … then A again: needs another full 2.5 s from 2200.
        let (s, commits) = hold(s, Some("A"), 2200, 4600);
        assert!(commits.is_empty());
        let (_, commits) = hold(s, Some("A"), 4700, 4700);
        assert_eq!(commits, vec![4700]);
    }

    #[test]
    fn changing_symbol_restarts_first_hold() {
        let (s, _) = hold(RecognitionState::new(), Some("A"), 0, 2000);
        let (s, commits) = hold(s, Some("B"), 2100, 4500);
        assert!(commits.is_empty());
        assert_eq!(s.hold().map(|h| h.since), Some(ms(2100)));
    }

    #[test]
    fn steady_repeats_every_gate_interval() {
        let (s, first) = hold(RecognitionState::new(), Some("A"), 0, 2500);
        assert_eq!(first, vec![2500]);
        let (_, commits) = hold(s, Some("A"), 2600, 7000);
        assert_eq!(commits, vec![4000, 5500, 7000]);
    }

    #[test]
    fn steady_commits_never_closer_than_gate() {
        let timing = HoldTiming::default();
        let (mut s, _) = hold(RecognitionState::new(), Some("A"), 0, 2500);
        let symbols = ["B", "C", "B", "D"];
        let mut last = 2500u64;
        for i in 0..200u64 {
            let t = 2550 + i * 50;
            let sym = if i % 7 == 3 { None } else { Some(symbols[(i % 4) as usize]) };
            let (next, step) = s.advance(sym, ms(t), &timing);
            s = next;
            if step.committed.is_some() {
                assert!(t - last >= 1500, "commit at {} only {} ms after {}", t, t - last, last);
                last = t;
            }
        }
    }

    #[test]
    fn absence_keeps_steady_mode() {
        let (s, _) = hold(RecognitionState::new(), Some("A"), 0, 2500);
        let (s, commits) = hold(s, None, 2600, 9000);
        assert!(commits.is_empty());
        assert_eq!(s.mode(), Mode::Steady);
        // Gate long open: the next present frame fires immediately.
        let (_, commits) = hold(s, Some("K"), 9100, 9100);
        assert_eq!(commits, vec![9100]);
    }

    #[test]
    fn reset_requires_fresh_first_hold() {
        let (mut s, _) = hold(RecognitionState::new(), Some("A"), 0, 2500);
        s.reset();
        assert_eq!(s, RecognitionState::new());
        let (s, commits) = hold(s, Some("A"), 2600, 5000);
        assert!(commits.is_empty());
        let (_, commits) = hold(s, Some("A"), 5100, 5100);
        assert_eq!(commits, vec![5100]);
    }

    #[test]
    fn steady_progress_tracks_gate() {
        let timing = HoldTiming::default();
        let (s, _) = hold(RecognitionState::new(), Some("A"), 0, 2500);
        let (s, step) = s.advance(Some("A"), ms(3250), &timing);
        assert!((step.progress - 0.5).abs() < 1e-6);
        let (_, step) = s.advance(None, ms(3300), &timing);
        assert_eq!(step.progress, 0.0);
    }

    #[test]
    fn clock_going_backwards_does_not_panic() {
        let timing = HoldTiming::default();
        let (s, _) = RecognitionState::new().advance(Some("A"), ms(5000), &timing);
        let (s, step) = s.advance(Some("A"), ms(1000), &timing);
        assert!(step.committed.is_none());
        assert_eq!(s.mode(), Mode::AwaitingFirst);
    }

    #[test]
    fn custom_timing() {
        let timing = HoldTiming { first: ms(300), steady: ms(200) };
        let mut s = RecognitionState::new();
        let mut commits = Vec::new();
        for t in (0..=1000).step_by(100) {
            let (next, step) = s.advance(Some("Z"), ms(t), &timing);
            s = next;
            if step.committed.is_some() { commits.push(t); }
        }
        assert_eq!(commits, vec![300, 500, 700, 900]);
    }
}
