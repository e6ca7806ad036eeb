//! Background speech thread.
//!
//! Requests are queued over a channel and spoken one after another.  The
//! caller never blocks on synthesis; it drains [`SpeechOutcome`]s when it is
//! ready for them.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::{Speaker, SpeechError};

// ════════════════════════════════════════════════════════════════════════════
// SpeechCommand — sent to the speech thread
// ════════════════════════════════════════════════════════════════════════════

pub enum SpeechCommand {
    Speak { text: String, language: String },
    /// Finish the queue up to here, then terminate the thread.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// SpeechOutcome — sent back for status reporting
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum SpeechOutcome {
    Spoken { text: String },
    Failed { text: String, error: SpeechError },
}

// ════════════════════════════════════════════════════════════════════════════
// SpeechWorker — handle to the speech thread
// ════════════════════════════════════════════════════════════════════════════

pub struct SpeechWorker {
    cmd_tx:     Sender<SpeechCommand>,
    outcome_rx: Receiver<SpeechOutcome>,
}

impl SpeechWorker {
    /// Spawn the speech thread around `speaker`.
    pub fn spawn(speaker: Box<dyn Speaker>) -> Self {
        let (cmd_tx, cmd_rx)         = mpsc::channel::<SpeechCommand>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<SpeechOutcome>();

        thread::spawn(move || speech_thread(speaker, cmd_rx, outcome_tx));

        SpeechWorker { cmd_tx, outcome_rx }
    }

    /// Queue `text` for speaking.  Returns immediately.
    pub fn speak(&self, text: &str, language: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::NothingToSpeak);
        }
        self.cmd_tx
            .send(SpeechCommand::Speak {
                text:     text.to_string(),
                language: language.to_string(),
            })
            .map_err(|_| SpeechError::WorkerGone)
    }

    pub fn quit(&self) { let _ = self.cmd_tx.send(SpeechCommand::Quit); }

    /// Drain any finished requests (non-blocking).
    pub fn drain_outcomes(&self) -> Vec<SpeechOutcome> {
        let mut out = Vec::new();
        while let Ok(o) = self.outcome_rx.try_recv() { out.push(o); }
        out
    }

    /// Wait up to `timeout` for the next finished request.
    pub fn next_outcome(&self, timeout: Duration) -> Option<SpeechOutcome> {
        self.outcome_rx.recv_timeout(timeout).ok()
    }
}

fn speech_thread(
    mut speaker: Box<dyn Speaker>,
    cmd_rx:      Receiver<SpeechCommand>,
    outcome_tx:  Sender<SpeechOutcome>,
) {
    for cmd in cmd_rx {
        let (text, language) = match cmd {
            SpeechCommand::Speak { text, language } => (text, language),
            SpeechCommand::Quit => return,
        };

        info!(backend = speaker.name(), "speaking: {}", text);
        let outcome = match speaker.speak(&text, &language) {
            Ok(()) => SpeechOutcome::Spoken { text },
            Err(error) => {
                warn!("speech failed: {}", error);
                SpeechOutcome::Failed { text, error }
            }
        };
        if outcome_tx.send(outcome).is_err() { return; }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
