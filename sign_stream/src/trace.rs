//! Plain-text frame traces for replaying a session without a camera.
//!
//! ```text
//! # seconds  hands (pattern@center-x) or an action
//! 0.0   00000@0.4
//! 0.1   11111@0.2 00000@0.8
//! 0.2
//! 3.0   space
//! 3.1   clear
//! ```
//!
//! A line with only a timestamp is a frame with no hands.  A hand without
//! `@x` sits at x = 0.5.

use std::fs;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::encoder::{Fingers, HandObservation};
use crate::session::{Session, UserAction};

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("cannot read trace: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    Frame  { at: Duration, hands: Vec<HandObservation> },
    Action { at: Duration, action: UserAction },
}

impl TraceEvent {
    pub fn at(&self) -> Duration {
        match self {
            TraceEvent::Frame  { at, .. } => *at,
            TraceEvent::Action { at, .. } => *at,
        }
    }
}

pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, TraceError> {
    let text = fs::read_to_string(path)?;
    parse_trace(&text)
}

pub fn parse_trace(text: &str) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() { continue; }
        let fail = |reason: String| TraceError::Parse { line: idx + 1, reason };

        let mut words = line.split_whitespace();
        let at = match words.next() {
            Some(w) => parse_seconds(w).map_err(fail)?,
            None    => continue,
        };
        let rest: Vec<&str> = words.collect();

        let action = match rest.as_slice() {
            ["space"] => Some(UserAction::InsertSpace),
            ["clear"] => Some(UserAction::Clear),
            ["speak"] => Some(UserAction::Speak),
            _         => None,
        };
        if let Some(action) = action {
            events.push(TraceEvent::Action { at, action });
            continue;
        }

        let hands = rest.iter()
            .map(|tok| parse_hand(tok))
            .collect::<Result<Vec<_>, _>>()
            .map_err(fail)?;
        events.push(TraceEvent::Frame { at, hands });
    }
    Ok(events)
}

/// Seconds rounded to the microsecond, so `1.5` and `3.0` compare exactly.
fn parse_seconds(word: &str) -> Result<Duration, String> {
    let secs: f64 = word.parse()
        .map_err(|_| format!("bad timestamp {:?}", word))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("timestamp {:?} must be a non-negative number", word));
    }
    Ok(Duration::from_micros((secs * 1_000_000.0).round() as u64))
}

fn parse_hand(tok: &str) -> Result<HandObservation, String> {
    let (pattern, x) = match tok.split_once('@') {
        Some((p, x)) => {
            let x: f32 = x.parse().map_err(|_| format!("bad center {:?}", x))?;
            (p, x)
        }
        None => (tok, 0.5),
    };
    let fingers: Fingers = pattern.parse().map_err(|e| format!("{}", e))?;
    Ok(HandObservation::new(fingers, x, 0.5))
}

/// One committed symbol during a replay.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayCommit {
    pub at:     Duration,
    pub symbol: String,
}

/// Drive `session` through `events` in order and collect the commits.
/// `speak` actions are ignored; replays have no speech collaborator.
pub fn replay(session: &mut Session, events: &[TraceEvent]) -> Vec<ReplayCommit> {
    let mut commits = Vec::new();
    for event in events {
        match event {
            TraceEvent::Frame { at, hands } => {
                if let Some(symbol) = session.tick(hands, *at).committed {
                    commits.push(ReplayCommit { at: *at, symbol });
                }
            }
            TraceEvent::Action { action: UserAction::Speak, .. } => {}
            TraceEvent::Action { action, .. } => { session.handle(*action); }
        }
    }
    commits
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_frames_and_actions() {
        let text = "\
            # header comment\n\
            0.0 00000@0.4\n\
            0.1 11111@0.2 00000@0.8   # two hands\n\
            \n\
            0.2\n\
            0.3 space\n\
            0.4 clear\n";
        let ev = parse_trace(text).unwrap();
        assert_eq!(ev.len(), 5);
        match &ev[1] {
            TraceEvent::Frame { at, hands } => {
                assert_eq!(*at, Duration::from_millis(100));
                assert_eq!(hands.len(), 2);
                assert_eq!(hands[0].fingers.to_string(), "11111");
                assert_eq!(hands[1].center.0, 0.8);
            }
            other => panic!("expected frame, got {:?}", other),
        }
        assert_eq!(ev[2], TraceEvent::Frame { at: Duration::from_millis(200), hands: vec![] });
        assert_eq!(ev[3], TraceEvent::Action { at: Duration::from_millis(300), action: UserAction::InsertSpace });
        assert_eq!(ev[4].at(), Duration::from_millis(400));
    }

    #[test]
    fn hand_without_center_defaults() {
        let ev = parse_trace("1 01010").unwrap();
        match &ev[0] {
            TraceEvent::Frame { hands, .. } => assert_eq!(hands[0].center.0, 0.5),
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn errors_name_the_line() {
        let err = parse_trace("0.0 00000\n0.1 0000x\n").unwrap_err();
        match err {
            TraceError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(parse_trace("-1 00000"), Err(TraceError::Parse { line: 1, .. })));
        assert!(matches!(parse_trace("abc"), Err(TraceError::Parse { line: 1, .. })));
        assert!(matches!(parse_trace("0 00000@left"), Err(TraceError::Parse { line: 1, .. })));
    }

    #[test]
    fn replay_collects_commits() {
        let mut text = String::new();
        for i in 0..=30 {
            text.push_str(&format!("{:.1} 00000\n", i as f64 * 0.1));
        }
        text.push_str("3.1 space\n3.2 speak\n");
        let events = parse_trace(&text).unwrap();
        let mut s = Session::default();
        let commits = replay(&mut s, &events);
        assert_eq!(commits, vec![ReplayCommit { at: Duration::from_millis(2500), symbol: "A".into() }]);
        assert_eq!(s.transcript().sentence(), "A  ");
    }
}
