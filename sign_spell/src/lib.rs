//! # sign_spell
//!
//! Finger-spelling desk.  Each frame the visible hands are reduced to a
//! five-digit finger pattern per hand, looked up in the pattern table, and
//! debounced into a sentence that can be spoken aloud.
//!
//! ## Pattern → Symbol
//!
//! | Hands | Key | Meaning |
//! |---|---|---|
//! | One | `01010` (thumb … pinky, `1` = extended) | A letter |
//! | Two | `00000 11111` (left hand first) | A whole word |
//!
//! The first symbol of a session needs a steady hold (2.5 s by default);
//! after that any recognised pattern commits again every 1.5 s.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the keyboard toggles simulated fingers.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Keyboard
//!
//! | Key | Action |
//! |---|---|
//! | `1`–`5` | Toggle hand A thumb … pinky (simulation) |
//! | `6`–`9`, `0` | Toggle hand B thumb … pinky (simulation) |
//! | `L` / `R` | Show or hide hand A / B (simulation) |
//! | `X` | Swap hand sides (simulation) |
//! | `Space` | Add a space |
//! | `C` | Clear the sentence |
//! | `S` | Speak the sentence |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod config;
pub mod error;
pub mod hand;
pub mod visualizer;
