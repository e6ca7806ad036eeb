//! # sign_voice
//!
//! Speech output for sign transcripts.
//!
//! Synthesis is delegated to an external program (`espeak-ng` by default,
//! anything with a `{text}` / `{lang}` argument template otherwise).  The
//! [`SpeechWorker`] runs it on its own thread so a frame loop never waits on
//! audio; results come back as [`SpeechOutcome`]s.
//!
//! ```rust,no_run
//! use sign_voice::{open_speaker, SpeechWorker, DEFAULT_PROGRAM, DEFAULT_ARGS};
//!
//! let args: Vec<String> = DEFAULT_ARGS.iter().map(|s| s.to_string()).collect();
//! let worker = SpeechWorker::spawn(open_speaker(DEFAULT_PROGRAM, &args));
//! worker.speak("H I", "en").unwrap();
//! ```

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{info, warn};

pub mod worker;

pub use worker::{SpeechCommand, SpeechOutcome, SpeechWorker};

pub const DEFAULT_PROGRAM: &str   = "espeak-ng";
pub const DEFAULT_ARGS:    [&str; 3] = ["-v", "{lang}", "{text}"];

// ════════════════════════════════════════════════════════════════════════════
// SpeechError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("nothing to speak")]
    NothingToSpeak,

    #[error("could not start speech program `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source:  io::Error,
    },

    #[error("speech program `{program}` failed ({status}): {stderr}")]
    Failed {
        program: String,
        status:  String,
        stderr:  String,
    },

    #[error("speech worker is no longer running")]
    WorkerGone,
}

// ════════════════════════════════════════════════════════════════════════════
// Speaker — abstraction over a real synthesizer / null (for testing)
// ════════════════════════════════════════════════════════════════════════════

/// Something that turns text into audible speech, blocking until done.
pub trait Speaker: Send {
    fn speak(&mut self, text: &str, language: &str) -> Result<(), SpeechError>;
    fn name(&self) -> &str;
}

// ── external program backend ──────────────────────────────────────────────

/// Runs `program` with `args`, where `{text}` and `{lang}` are substituted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpeaker {
    program: String,
    args:    Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: &str, args: &[String]) -> Self {
        CommandSpeaker { program: program.to_string(), args: args.to_vec() }
    }

    pub fn espeak() -> Self {
        let args: Vec<String> = DEFAULT_ARGS.iter().map(|s| s.to_string()).collect();
        CommandSpeaker::new(DEFAULT_PROGRAM, &args)
    }

    /// Argument list for one utterance.
    pub fn render_args(&self, text: &str, language: &str) -> Vec<String> {
        self.args.iter()
            .map(|a| a.replace("{lang}", language).replace("{text}", text))
            .collect()
    }

    /// True when the program exists, either as a path or on `PATH`.
    /// Nothing is run.
    pub fn is_available(&self) -> bool {
        find_program(&self.program).is_some()
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str, language: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::NothingToSpeak);
        }
        let output = Command::new(&self.program)
            .args(self.render_args(text, language))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SpeechError::Failed {
                program: self.program.clone(),
                status:  output.status.to_string(),
                stderr:  String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &str { &self.program }
}

/// Resolve `program` the way a shell would, without spawning it.
fn find_program(program: &str) -> Option<PathBuf> {
    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }
    let path = env::var_os("PATH")?;
    env::split_paths(&path).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let exe = candidate.with_extension("exe");
            if exe.is_file() { return Some(exe); }
        }
        None
    })
}

// ── null backend (used when no synthesizer is available) ──────────────────

/// Logs instead of speaking.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSpeaker;

impl Speaker for NullSpeaker {
    fn speak(&mut self, text: &str, language: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::NothingToSpeak);
        }
        info!(language, "no synthesizer, would speak: {}", text);
        Ok(())
    }

    fn name(&self) -> &str { "null" }
}

// ════════════════════════════════════════════════════════════════════════════
// open_speaker — pick the configured program or fall back
// ════════════════════════════════════════════════════════════════════════════

/// Use `program` if it can be started, otherwise `NullSpeaker` with a warning.
pub fn open_speaker(program: &str, args: &[String]) -> Box<dyn Speaker> {
    let speaker = CommandSpeaker::new(program, args);
    if speaker.is_available() {
        info!("speech via `{}`", program);
        Box::new(speaker)
    } else {
        warn!("speech program `{}` not found — speech will only be logged", program);
        warn!("install a synthesizer such as:");
        warn!("  • Linux: `espeak-ng` (apt install espeak-ng)");
        warn!("  • macOS: `say` (set speech_program to \"say\", args [\"{{text}}\"])");
        Box::new(NullSpeaker)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_args_substitutes_placeholders() {
        let sp = CommandSpeaker::espeak();
        assert_eq!(sp.render_args("THANK YOU", "en"), ["-v", "en", "THANK YOU"]);

        let custom = CommandSpeaker::new("say", &["--voice={lang}".into(), "{text}!".into()]);
        assert_eq!(custom.render_args("Hi", "fr"), ["--voice=fr", "Hi!"]);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let mut sp = CommandSpeaker::new("definitely-not-a-real-synth-binary", &[]);
        assert!(!sp.is_available());
        match sp.speak("A", "en") {
            Err(SpeechError::Spawn { program, .. }) => {
                assert_eq!(program, "definitely-not-a-real-synth-binary");
            }
            other => panic!("expected spawn error, got {:?}", other),
        }
    }

    #[test]
    fn blank_text_is_nothing_to_speak() {
        let mut sp = CommandSpeaker::espeak();
        assert!(matches!(sp.speak("   ", "en"), Err(SpeechError::NothingToSpeak)));
        assert!(matches!(NullSpeaker.speak("", "en"), Err(SpeechError::NothingToSpeak)));
    }

    #[test]
    fn null_speaker_succeeds() {
        assert!(NullSpeaker.speak("HELLO", "en").is_ok());
        assert_eq!(NullSpeaker.name(), "null");
    }

    #[test]
    fn open_speaker_falls_back_to_null() {
        let sp = open_speaker("definitely-not-a-real-synth-binary", &[]);
        assert_eq!(sp.name(), "null");
    }

    #[cfg(unix)]
    #[test]
    fn availability_is_a_path_lookup() {
        assert!(CommandSpeaker::new("sh", &[]).is_available());
        assert!(CommandSpeaker::new("/bin/sh", &[]).is_available());
        assert!(!CommandSpeaker::new("/bin/definitely-not-a-real-synth-binary", &[]).is_available());
        assert!(!CommandSpeaker::new("/bin", &[]).is_available());
    }

    /// A program that would speak its arguments must not be run by the
    /// availability check.
    #[cfg(unix)]
    #[test]
    fn availability_check_runs_nothing() {
        let dir = env::temp_dir().join(format!("sign_voice_avail_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let marker = dir.join("ran");
        let script = dir.join("fake-synth");
        std::fs::write(&script, format!("#!/bin/sh\necho \"$@\" > {}\n", marker.display())).unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let sp = CommandSpeaker::new(script.to_str().unwrap(), &["{text}".into()]);
        assert!(sp.is_available());
        assert!(!marker.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_status() {
        let mut sp = CommandSpeaker::new("false", &["{text}".into()]);
        assert!(matches!(sp.speak("A", "en"), Err(SpeechError::Failed { .. })));
    }
}
