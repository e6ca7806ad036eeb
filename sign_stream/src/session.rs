//! A running recognition session.
//!
//! `Session` owns the table, the recognition state and the transcript, and
//! is the single mutator of both.  Frames arrive through [`Session::tick`];
//! user edits arrive between frames through [`Session::handle`].

use std::time::Duration;

use tracing::{debug, info};

use crate::encoder::{encode, HandObservation, PatternKey, KEY_PLACEHOLDER};
use crate::recognizer::{HoldTiming, Mode, RecognitionState};
use crate::table::PatternTable;
use crate::transcript::Transcript;

// ════════════════════════════════════════════════════════════════════════════
// UserAction / ActionOutcome
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserAction {
    InsertSpace,
    Clear,
    Speak,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The transcript was edited.
    Edited,
    /// Hand this text to the speech collaborator.
    Speak(String),
    /// Speak was requested on an empty transcript.
    NothingToSpeak,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameReport
// ════════════════════════════════════════════════════════════════════════════

/// Everything a renderer needs about the frame just processed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub key:       Option<PatternKey>,
    pub candidate: Option<String>,
    pub committed: Option<String>,
    pub mode:      Mode,
    pub progress:  f32,
}

impl FrameReport {
    /// The key, or the placeholder when the frame had none.
    pub fn key_label(&self) -> &str {
        self.key.as_ref().map_or(KEY_PLACEHOLDER, PatternKey::as_str)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Session {
    table:       PatternTable,
    timing:      HoldTiming,
    recognition: RecognitionState,
    transcript:  Transcript,
}

impl Session {
    pub fn new(table: PatternTable, timing: HoldTiming) -> Self {
        Session {
            table,
            timing,
            recognition: RecognitionState::new(),
            transcript:  Transcript::new(),
        }
    }

    /// Process one frame captured at `now`.
    pub fn tick(&mut self, hands: &[HandObservation], now: Duration) -> FrameReport {
        let key = encode(hands);
        let candidate = key.as_ref()
            .and_then(|k| self.table.lookup(k))
            .map(str::to_string);

        let state = std::mem::take(&mut self.recognition);
        let (state, step) = state.advance(candidate.as_deref(), now, &self.timing);
        self.recognition = state;

        if let Some(symbol) = &step.committed {
            self.transcript.commit(symbol);
            info!(symbol = %symbol, at_secs = now.as_secs_f32(), "committed");
        }
        debug!(
            hands = hands.len(),
            key = key.as_ref().map_or(KEY_PLACEHOLDER, PatternKey::as_str),
            candidate = candidate.as_deref().unwrap_or("-"),
            progress = step.progress,
            "frame"
        );

        FrameReport {
            key,
            candidate,
            committed: step.committed,
            mode:      self.recognition.mode(),
            progress:  step.progress,
        }
    }

    /// Apply a user action.  None of these commit a symbol.
    pub fn handle(&mut self, action: UserAction) -> ActionOutcome {
        match action {
            UserAction::InsertSpace => {
                self.transcript.insert_space();
                info!("space added");
                ActionOutcome::Edited
            }
            UserAction::Clear => {
                self.clear();
                ActionOutcome::Edited
            }
            UserAction::Speak => match self.transcript.speakable_text() {
                Some(text) => ActionOutcome::Speak(text),
                None => {
                    info!("nothing to speak");
                    ActionOutcome::NothingToSpeak
                }
            },
            UserAction::Quit => ActionOutcome::Quit,
        }
    }

    /// Empty the transcript and return to `AwaitingFirst`.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.recognition.reset();
        info!("sentence cleared");
    }

    pub fn transcript(&self)  -> &Transcript       { &self.transcript }
    pub fn recognition(&self) -> &RecognitionState { &self.recognition }
    pub fn mode(&self)        -> Mode              { self.recognition.mode() }
    pub fn timing(&self)      -> &HoldTiming       { &self.timing }
    pub fn table(&self)       -> &PatternTable     { &self.table }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(PatternTable::standard(), HoldTiming::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    fn one(p: &str) -> Vec<HandObservation> {
        vec![HandObservation::new(p.parse().unwrap(), 0.5, 0.5)]
    }

    fn run(session: &mut Session, hands: &[HandObservation], from: u64, to: u64) -> Vec<String> {
        let mut out = Vec::new();
        let mut t = from;
        while t <= to {
            if let Some(c) = session.tick(hands, ms(t)).committed { out.push(c); }
            t += 100;
        }
        out
    }

    #[test]
    fn report_for_unmatched_frame() {
        let mut s = Session::default();
        let r = s.tick(&one("11111"), ms(0));
        assert_eq!(r.key_label(), "11111");
        assert_eq!(r.candidate, None);
        assert_eq!(r.committed, None);

        let r = s.tick(&[], ms(100));
        assert_eq!(r.key_label(), KEY_PLACEHOLDER);
    }

    #[test]
    fn unmatched_pattern_breaks_hold() {
        let mut s = Session::default();
        run(&mut s, &one("00000"), 0, 2000);
        s.tick(&one("11111"), ms(2100));
        assert!(s.recognition().hold().is_none());
        assert!(run(&mut s, &one("00000"), 2200, 4600).is_empty());
    }

    #[test]
    fn commit_lands_in_transcript() {
        let mut s = Session::default();
        let commits = run(&mut s, &one("01011"), 0, 2500);
        assert_eq!(commits, ["L"]);
        assert_eq!(s.transcript().sentence(), "L ");
        assert_eq!(s.mode(), Mode::Steady);
    }

    #[test]
    fn space_and_clear_never_commit() {
        let mut s = Session::default();
        run(&mut s, &one("00000"), 0, 2000);
        assert_eq!(s.handle(UserAction::InsertSpace), ActionOutcome::Edited);
        assert_eq!(s.transcript().symbols(), [" "]);
        assert_eq!(s.handle(UserAction::Clear), ActionOutcome::Edited);
        assert!(s.transcript().is_empty());
        assert_eq!(s.mode(), Mode::AwaitingFirst);
    }

    #[test]
    fn clear_after_commit_needs_full_hold() {
        let mut s = Session::default();
        run(&mut s, &one("00000"), 0, 2500);
        s.handle(UserAction::Clear);
        assert_eq!(s.mode(), Mode::AwaitingFirst);
        assert!(run(&mut s, &one("00000"), 2600, 5000).is_empty());
        assert_eq!(run(&mut s, &one("00000"), 5100, 5100), ["A"]);
    }

    #[test]
    fn speak_outcomes() {
        let mut s = Session::default();
        assert_eq!(s.handle(UserAction::Speak), ActionOutcome::NothingToSpeak);
        run(&mut s, &one("00111"), 0, 2500);
        s.handle(UserAction::InsertSpace);
        assert_eq!(s.handle(UserAction::Speak), ActionOutcome::Speak("H  ".to_string()));
        assert_eq!(s.handle(UserAction::Quit), ActionOutcome::Quit);
    }
}
