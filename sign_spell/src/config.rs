//! Application configuration.
//!
//! Every field has a default; a JSON file only needs the fields it changes:
//!
//! ```json
//! { "first_hold_secs": 2.0, "language": "de",
//!   "patterns": { "00000": "A", "11111 11111": "HALLO" } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use sign_stream::{HoldTiming, PatternTable};
use sign_voice::{DEFAULT_ARGS, DEFAULT_PROGRAM};

use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Hold needed for the first commit of a session (seconds).
    pub first_hold_secs:  f64,
    /// Minimum gap between later commits (seconds).
    pub steady_hold_secs: f64,
    /// Language code handed to the synthesizer.
    pub language:         String,
    pub speech_program:   String,
    /// Argument template; `{text}` and `{lang}` are substituted.
    pub speech_args:      Vec<String>,
    /// Simulated hand frames per second.
    pub frame_rate:       u32,
    /// Characters of the sentence shown on screen.
    pub sentence_chars:   usize,
    /// Replaces the standard vocabulary when present.
    pub patterns:         Option<BTreeMap<String, String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            first_hold_secs:  2.5,
            steady_hold_secs: 1.5,
            language:         "en".to_string(),
            speech_program:   DEFAULT_PROGRAM.to_string(),
            speech_args:      DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
            frame_rate:       30,
            sentence_chars:   60,
            patterns:         None,
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: AppConfig = serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (name, secs) in [
            ("first_hold_secs",  self.first_hold_secs),
            ("steady_hold_secs", self.steady_hold_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(AppError::ConfigValue(format!(
                    "{} must be a positive number of seconds, got {}", name, secs
                )));
            }
        }
        if !(1..=240).contains(&self.frame_rate) {
            return Err(AppError::ConfigValue(format!(
                "frame_rate must be 1–240, got {}", self.frame_rate
            )));
        }
        if self.speech_program.trim().is_empty() {
            return Err(AppError::ConfigValue("speech_program is empty".to_string()));
        }
        if self.language.trim().is_empty() {
            return Err(AppError::ConfigValue("language is empty".to_string()));
        }
        Ok(())
    }

    pub fn timing(&self) -> HoldTiming {
        HoldTiming {
            first:  Duration::from_secs_f64(self.first_hold_secs),
            steady: Duration::from_secs_f64(self.steady_hold_secs),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    /// The standard table, or the configured replacement.
    pub fn pattern_table(&self) -> Result<PatternTable, AppError> {
        match &self.patterns {
            Some(entries) => Ok(PatternTable::from_entries(entries)?),
            None          => Ok(PatternTable::standard()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use sign_stream::{encode, HandObservation};

    #[test]
    fn defaults_match_standard_timing() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.timing(), HoldTiming::default());
        assert_eq!(cfg.frame_interval(), Duration::from_nanos(33_333_333));
        assert_eq!(cfg.pattern_table().unwrap(), PatternTable::standard());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{ "language": "de", "first_hold_secs": 2.0 }"#).unwrap();
        assert_eq!(cfg.language, "de");
        assert_eq!(cfg.timing().first, Duration::from_secs(2));
        assert_eq!(cfg.steady_hold_secs, 1.5);
        assert_eq!(cfg.speech_program, "espeak-ng");
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(serde_json::from_str::<AppConfig>(r#"{ "frist_hold_secs": 2.0 }"#).is_err());
    }

    #[test]
    fn non_positive_hold_rejected() {
        let cfg = AppConfig { steady_hold_secs: 0.0, ..AppConfig::default() };
        assert!(matches!(cfg.validate(), Err(AppError::ConfigValue(_))));
        let cfg = AppConfig { first_hold_secs: f64::NAN, ..AppConfig::default() };
        assert!(matches!(cfg.validate(), Err(AppError::ConfigValue(_))));
    }

    #[test]
    fn custom_patterns_replace_standard() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{ "patterns": { "11111 11111": "HALLO", "01000": "EINS" } }"#,
        ).unwrap();
        let table = cfg.pattern_table().unwrap();
        assert_eq!(table.len(), 2);
        let hands = [HandObservation::new("01000".parse().unwrap(), 0.5, 0.5)];
        assert_eq!(table.lookup(&encode(&hands).unwrap()), Some("EINS"));
    }

    #[test]
    fn bad_custom_pattern_is_table_error() {
        let cfg: AppConfig = serde_json::from_str(r#"{ "patterns": { "0101": "X" } }"#).unwrap();
        assert!(matches!(cfg.pattern_table(), Err(AppError::Table(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AppConfig::load("/nonexistent/sign_spell.json").unwrap_err();
        assert!(matches!(err, AppError::ConfigIo { .. }));
    }
}
