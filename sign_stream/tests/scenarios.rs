//! End-to-end sessions driven by synthetic clocks.

use std::time::Duration;

use sign_stream::{
    parse_trace, replay, ActionOutcome, HandObservation, Mode, Session, UserAction,
};

fn ms(n: u64) -> Duration { Duration::from_millis(n) }

fn hand(pattern: &str, x: f32) -> HandObservation {
    HandObservation::new(pattern.parse().unwrap(), x, 0.5)
}

/// Tick `hands` every 100 ms over `[from, to]`, returning commit times.
fn hold(session: &mut Session, hands: &[HandObservation], from: u64, to: u64) -> Vec<(u64, String)> {
    let mut out = Vec::new();
    let mut t = from;
    while t <= to {
        if let Some(sym) = session.tick(hands, ms(t)).committed {
            out.push((t, sym));
        }
        t += 100;
    }
    out
}

#[test]
fn single_fist_held_three_seconds() {
    let mut s = Session::default();
    let commits = hold(&mut s, &[hand("00000", 0.5)], 0, 3000);
    assert_eq!(commits, vec![(2500, "A".to_string())]);
    assert_eq!(s.transcript().sentence(), "A ");
}

#[test]
fn two_hands_spell_bye() {
    let mut s = Session::default();
    // Detector lists the right-hand fist first; position decides the key.
    let hands = [hand("00000", 0.75), hand("11111", 0.25)];
    let report = s.tick(&hands, ms(0));
    assert_eq!(report.key_label(), "11111 00000");
    assert_eq!(report.candidate.as_deref(), Some("BYE"));

    let commits = hold(&mut s, &hands, 100, 2500);
    assert_eq!(commits, vec![(2500, "BYE".to_string())]);
}

#[test]
fn steady_hold_repeats_three_times() {
    let mut s = Session::default();
    let fist = [hand("00000", 0.5)];
    assert_eq!(hold(&mut s, &fist, 0, 2500).len(), 1);
    assert_eq!(s.mode(), Mode::Steady);

    let commits: Vec<u64> = hold(&mut s, &fist, 2600, 7000)
        .into_iter()
        .map(|(t, _)| t - 2500)
        .collect();
    assert_eq!(commits, vec![1500, 3000, 4500]);
    assert_eq!(s.transcript().sentence(), "A A A A ");
}

#[test]
fn nothing_to_speak_is_not_empty_success() {
    let mut s = Session::default();
    assert_eq!(s.handle(UserAction::Speak), ActionOutcome::NothingToSpeak);
    assert_eq!(s.transcript().speakable_text(), None);
}

#[test]
fn spelling_a_word_with_gaps() {
    let mut s = Session::default();
    let mut commits = Vec::new();
    commits.extend(hold(&mut s, &[hand("00111", 0.5)], 0, 2500));      // H
    commits.extend(hold(&mut s, &[], 2600, 4000));
    commits.extend(hold(&mut s, &[hand("01000", 0.5)], 4100, 4100));   // I, gate open
    s.handle(UserAction::InsertSpace);
    let pair = [hand("00000", 0.3), hand("00000", 0.7)];
    assert!(hold(&mut s, &pair, 4200, 5500).is_empty());
    commits.extend(hold(&mut s, &pair, 5600, 5600));                  // Hi

    let symbols: Vec<&str> = commits.iter().map(|(_, s)| s.as_str()).collect();
    assert_eq!(symbols, ["H", "I", "Hi"]);
    assert_eq!(s.transcript().sentence(), "H I  Hi ");
    assert_eq!(s.handle(UserAction::Speak), ActionOutcome::Speak("H I   Hi".into()));
}

#[test]
fn clear_mid_session_restarts_first_regime() {
    let mut s = Session::default();
    hold(&mut s, &[hand("00000", 0.5)], 0, 2500);
    s.handle(UserAction::Clear);
    assert!(s.transcript().is_empty());

    let commits = hold(&mut s, &[hand("00001", 0.5)], 2600, 5100);
    assert_eq!(commits, vec![(5100, "B".to_string())]);
}

#[test]
fn trace_replay_matches_direct_ticks() {
    let mut text = String::from("# fist, then a gap, then open-hand pair\n");
    for i in 0..=25 {
        text.push_str(&format!("{:.1} 00000@0.5\n", i as f64 / 10.0));
    }
    text.push_str("2.6\n");
    for i in 27..=45 {
        text.push_str(&format!("{:.1} 11111@0.2 11111@0.8\n", i as f64 / 10.0));
    }
    let events = parse_trace(&text).unwrap();
    let mut s = Session::default();
    let commits = replay(&mut s, &events);
    let got: Vec<(u128, &str)> = commits.iter()
        .map(|c| (c.at.as_millis(), c.symbol.as_str()))
        .collect();
    assert_eq!(got, vec![(2500, "A"), (4000, "How are you")]);
}
