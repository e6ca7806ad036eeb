//! Top-level application state machine.
//!
//! `AppState` owns the recognition `Session` and the `SpeechWorker`.  It
//! feeds hand frames into the session, applies keyboard actions, and builds
//! the [`Screen`] the visualizer draws each frame.

use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use sign_stream::{ActionOutcome, FrameReport, PatternTable, Session, UserAction};
use sign_voice::{open_speaker, Speaker, SpeechError, SpeechOutcome, SpeechWorker};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::hand::{spawn_hand_source, HandFrame, SimInput, SourceMessage};
use crate::visualizer::{Screen, Visualizer};

#[cfg(not(feature = "leap"))]
use crate::hand::SimHandSource;
#[cfg(feature = "leap")]
use crate::hand::LeapHandSource;

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── recognition ──────────────────────────────────────────────────────
    session:        Session,
    report:         FrameReport,
    hands:          HandFrame,

    // ── speech ───────────────────────────────────────────────────────────
    speech:         SpeechWorker,
    language:       String,

    // ── display ──────────────────────────────────────────────────────────
    sentence_chars: usize,
    pub status:     String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, table: PatternTable, speaker: Box<dyn Speaker>) -> Self {
        let status = format!(
            "Ready: {} patterns, first hold {:.1}s, then every {:.1}s",
            table.len(), cfg.first_hold_secs, cfg.steady_hold_secs
        );
        AppState {
            session:        Session::new(table, cfg.timing()),
            report:         FrameReport::default(),
            hands:          Vec::new(),
            speech:         SpeechWorker::spawn(speaker),
            language:       cfg.language.clone(),
            sentence_chars: cfg.sentence_chars,
            status,
        }
    }

    // ── process one hand frame ───────────────────────────────────────────

    /// Run one frame captured `now` after the session started.
    pub fn handle_frame(&mut self, hands: HandFrame, now: Duration) {
        let report = self.session.tick(&hands, now);
        if let Some(symbol) = &report.committed {
            self.status = format!("Added \"{}\"  ({})", symbol, report.key_label());
        }
        self.report = report;
        self.hands  = hands;
    }

    // ── process one keyboard action ──────────────────────────────────────

    /// Returns false when the app should quit.
    pub fn handle_action(&mut self, action: UserAction) -> bool {
        match self.session.handle(action) {
            ActionOutcome::Edited => {
                self.status = match action {
                    UserAction::Clear => {
                        self.report = FrameReport { mode: self.session.mode(), ..FrameReport::default() };
                        "Sentence cleared".to_string()
                    }
                    UserAction::InsertSpace => "Space added".to_string(),
                    UserAction::Speak | UserAction::Quit => "Sentence edited".to_string(),
                };
            }
            ActionOutcome::Speak(text) => {
                self.status = match self.speech.speak(&text, &self.language) {
                    Ok(())  => format!("Speaking: {}", text),
                    // Only manual spaces so far.
                    Err(SpeechError::NothingToSpeak) => "Nothing to speak".to_string(),
                    Err(e)  => {
                        warn!("cannot queue speech: {}", e);
                        format!("Speech failed: {}", e)
                    }
                };
            }
            ActionOutcome::NothingToSpeak => {
                self.status = "Nothing to speak".to_string();
            }
            ActionOutcome::Quit => return false,
        }
        true
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    pub fn tick(&mut self) {
        for outcome in self.speech.drain_outcomes() {
            self.status = match outcome {
                SpeechOutcome::Spoken { text }        => format!("Spoke: {}", text),
                SpeechOutcome::Failed { error, .. }   => format!("Speech failed: {}", error),
            };
        }
    }

    pub fn shutdown(&self) { self.speech.quit(); }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn session(&self) -> &Session     { &self.session }
    pub fn report(&self)  -> &FrameReport { &self.report }

    pub fn screen(&self) -> Screen<'_> {
        Screen {
            key:       self.report.key_label(),
            candidate: self.report.candidate.as_deref(),
            sentence:  self.session.transcript().render(self.sentence_chars),
            mode:      self.report.mode,
            progress:  self.report.progress,
            status:    &self.status,
            hands:     &self.hands,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the visualizer,
/// the hand source (simulation by default, hardware with `--features leap`),
/// the speech worker, and drives the frame/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let table = cfg.pattern_table()?;

    // ── Hand source ───────────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    #[cfg(not(feature = "leap"))]
    let hand_rx = spawn_hand_source(SimHandSource::new(sim_rx, cfg.frame_interval()));
    #[cfg(feature = "leap")]
    let hand_rx = {
        drop(sim_rx);
        spawn_hand_source(LeapHandSource)
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let speaker = open_speaker(&cfg.speech_program, &cfg.speech_args);
    let mut app = AppState::new(&cfg, table, speaker);
    let started = Instant::now();
    info!(language = %cfg.language, "session started");

    let result = drive(&mut vis, &mut app, &hand_rx, started);
    app.shutdown();
    info!(sentence = %app.session().transcript().sentence(), "session ended");
    result
}

fn drive(
    vis:     &mut Visualizer,
    app:     &mut AppState,
    hand_rx: &mpsc::Receiver<SourceMessage>,
    started: Instant,
) -> Result<(), AppError> {
    while vis.is_open() {
        // 1. Keyboard actions
        for action in vis.poll_input() {
            if !app.handle_action(action) { return Ok(()); }
        }

        // 2. Drain hand frames
        loop {
            match hand_rx.try_recv() {
                Ok(SourceMessage::Frame { hands, captured }) => {
                    app.handle_frame(hands, captured.saturating_duration_since(started));
                }
                Ok(SourceMessage::Failed(reason)) => return Err(AppError::Acquisition(reason)),
                Err(TryRecvError::Empty)          => break,
                Err(TryRecvError::Disconnected)   => {
                    return Err(AppError::Acquisition("hand source stopped".to_string()));
                }
            }
        }

        // 3. Speech outcomes
        app.tick();

        // 4. Render
        vis.render(&app.screen());
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
