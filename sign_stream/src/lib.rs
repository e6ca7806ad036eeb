//! # sign_stream
//!
//! Turns a per-frame stream of finger patterns (one or two hands, five
//! fingers each) into a debounced transcript.
//!
//! ```text
//! hands ─► encode ─► PatternKey ─► PatternTable ─► candidate
//!                                                     │
//!                        RecognitionState::advance ◄──┘  (time passed in)
//!                                  │
//!                                  └─► commit ─► Transcript
//! ```
//!
//! ## Timing
//!
//! | Mode | Commit rule |
//! |---|---|
//! | `AwaitingFirst` | same symbol held continuously for `first` (2.5 s) |
//! | `Steady` | any present symbol, at least `steady` (1.5 s) after the previous commit |
//!
//! A frame with no candidate drops the current hold.  Only a manual clear
//! returns the session to `AwaitingFirst`.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use sign_stream::{HandObservation, Session};
//!
//! let mut session = Session::default();
//! let fist = [HandObservation::new("00000".parse().unwrap(), 0.5, 0.5)];
//! for i in 0..=30 {
//!     session.tick(&fist, Duration::from_millis(i * 100));
//! }
//! assert_eq!(session.transcript().sentence(), "A ");
//! ```

pub mod encoder;
pub mod recognizer;
pub mod session;
pub mod table;
pub mod trace;
pub mod transcript;

pub use encoder::{encode, Fingers, FingersParseError, HandObservation, PatternKey, FINGER_COUNT, KEY_PLACEHOLDER};
pub use recognizer::{Hold, HoldTiming, Mode, RecognitionState, Step, FIRST_HOLD, STEADY_HOLD};
pub use session::{ActionOutcome, FrameReport, Session, UserAction};
pub use table::{PatternTable, TableError};
pub use trace::{parse_trace, read_trace, replay, ReplayCommit, TraceError, TraceEvent};
pub use transcript::{Transcript, SPACE};
