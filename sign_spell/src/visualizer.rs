//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  SIGN SPELL                                     mode: first/steady │
//! ├──────────────┬─────────────────────────────────────────────────────┤
//! │  PATTERN     │  DETECTED  (green while a symbol is recognised)     │
//! ├──────────────┴─────────────────────────────────────────────────────┤
//! │  [hold / next-symbol progress bar ─────────────────────────]  64%  │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  SENTENCE                                                          │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  [hand schematics, left to right]                                  │
//! │  status bar                                                        │
//! │  key legend                                                        │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use sign_stream::{HandObservation, Mode, UserAction, FINGER_COUNT};
use tracing::debug;

use crate::error::AppError;
use crate::hand::{finger_for_digit, SimHand, SimInput};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 1000;
pub const WIN_H:     usize = 580;
const MARGIN:        usize = 12;
const HEADER_H:      usize = 56;
const CARD_Y:        usize = 72;
const CARD_H:        usize = 100;
const PATTERN_W:     usize = 320;
const BAR_Y:         usize = 184;
const BAR_H:         usize = 56;
const SENTENCE_Y:    usize = 252;
const SENTENCE_H:    usize = 84;
const HANDS_Y:       usize = 348;
const HANDS_H:       usize = 150;
const STATUS_Y:      usize = WIN_H - 72;
const LEGEND_Y:      usize = WIN_H - 26;

const BG_COLOR:      u32   = 0xFF1A1A2E;
const CARD_BG:       u32   = 0xFF16213E;
const TEXT_BG:       u32   = 0xFF0F3460;
const PRIMARY:       u32   = 0xFF64A0FF;
const SUCCESS:       u32   = 0xFF32C878;
const WARNING:       u32   = 0xFFFFB432;
const TEXT:          u32   = 0xFFEEEEEE;
const DIM:           u32   = 0xFF888899;

const PROMPT:        &str  = "START MAKING GESTURES...";
const LEGEND:        &str  =
    "1-5 HAND A  6-0 HAND B  L/R SHOW  X SWAP  SPACE=SPACE  C=CLEAR  S=SPEAK  Q=QUIT";

// ════════════════════════════════════════════════════════════════════════════
// Screen — one frame's worth of display state
// ════════════════════════════════════════════════════════════════════════════

/// Snapshot handed to [`Visualizer::render`] each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Screen<'a> {
    pub key:       &'a str,
    pub candidate: Option<&'a str>,
    /// Tail of the sentence; empty shows the prompt.
    pub sentence:  &'a str,
    pub mode:      Mode,
    pub progress:  f32,
    pub status:    &'a str,
    pub hands:     &'a [HandObservation],
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Sign Spell - finger pattern speller",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard input.  Finger/hand keys go to the simulator; the rest
    /// come back as actions for the session.
    pub fn poll_input(&mut self) -> Vec<UserAction> {
        if !self.window.is_open() { return vec![UserAction::Quit]; }

        let mut actions = Vec::new();
        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            let sim = match key {
                Key::Q | Key::Escape => { actions.push(UserAction::Quit);        continue; }
                Key::Space           => { actions.push(UserAction::InsertSpace); continue; }
                Key::C               => { actions.push(UserAction::Clear);       continue; }
                Key::S               => { actions.push(UserAction::Speak);       continue; }
                Key::L => SimInput::ToggleHand(SimHand::A),
                Key::R => SimInput::ToggleHand(SimHand::B),
                Key::X => SimInput::SwapSides,
                other  => match digit_key(other).and_then(finger_for_digit) {
                    Some((hand, finger)) => SimInput::ToggleFinger { hand, finger },
                    None                 => continue,
                },
            };
            // In hardware mode nobody listens; that's fine.
            let _ = self.sim_tx.send(sim);
        }
        actions
    }

    /// Render one frame.
    pub fn render(&mut self, screen: &Screen<'_>) {
        self.buf.fill(BG_COLOR);

        // ── Header ────────────────────────────────────────────────────────
        self.fill_rect(0, 0, WIN_W, HEADER_H, CARD_BG);
        self.draw_text("SIGN SPELL", MARGIN + 8, 13, 6, PRIMARY);
        let mode = format!("MODE: {}", screen.mode.label());
        self.draw_text(&mode, WIN_W - MARGIN - 8 - text_width(&mode, 3), 20, 3, DIM);

        // ── Pattern card ──────────────────────────────────────────────────
        self.fill_rect(MARGIN, CARD_Y, PATTERN_W, CARD_H, CARD_BG);
        self.draw_text("PATTERN", MARGIN + 14, CARD_Y + 12, 2, DIM);
        self.draw_text(screen.key, MARGIN + 14, CARD_Y + 44, 5, TEXT);

        // ── Detected card ─────────────────────────────────────────────────
        let det_x = MARGIN * 2 + PATTERN_W;
        let det_w = WIN_W - det_x - MARGIN;
        let (det_bg, det_text) = match screen.candidate {
            Some(symbol) => (SUCCESS, symbol),
            None         => (CARD_BG, "NONE"),
        };
        self.fill_rect(det_x, CARD_Y, det_w, CARD_H, det_bg);
        self.draw_text("DETECTED", det_x + 14, CARD_Y + 12, 2, TEXT);
        self.draw_text(det_text, det_x + 14, CARD_Y + 44, 5, TEXT);

        // ── Hold / cooldown bar ───────────────────────────────────────────
        self.draw_progress(screen.mode, screen.progress);

        // ── Sentence ──────────────────────────────────────────────────────
        self.fill_rect(MARGIN, SENTENCE_Y, WIN_W - 2 * MARGIN, SENTENCE_H, CARD_BG);
        self.draw_text("SENTENCE", MARGIN + 14, SENTENCE_Y + 10, 2, DIM);
        if screen.sentence.is_empty() {
            self.draw_text(PROMPT, MARGIN + 14, SENTENCE_Y + 40, 3, DIM);
        } else {
            self.draw_text(screen.sentence, MARGIN + 14, SENTENCE_Y + 40, 3, TEXT);
        }

        // ── Hands ─────────────────────────────────────────────────────────
        self.draw_hands(screen.hands);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, LEGEND_Y - STATUS_Y - 4, TEXT_BG);
        self.draw_text(screen.status, MARGIN, STATUS_Y + 14, 2, TEXT);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_text(LEGEND, MARGIN, LEGEND_Y + 6, 2, DIM);

        if let Err(e) = self.window.update_with_buffer(&self.buf, WIN_W, WIN_H) {
            debug!("window update failed: {}", e);
        }
    }

    // ── Progress bar ──────────────────────────────────────────────────────

    fn draw_progress(&mut self, mode: Mode, progress: f32) {
        if progress <= 0.0 { return; }
        let (label, color) = match mode {
            Mode::AwaitingFirst => ("HOLD GESTURE TO DETECT", WARNING),
            Mode::Steady        => ("NEXT SYMBOL",            PRIMARY),
        };
        let pct   = format!("{}%", (progress.clamp(0.0, 1.0) * 100.0).round() as u32);
        let bar_x = MARGIN;
        let bar_w = WIN_W - 2 * MARGIN - 80;
        let bar_y = BAR_Y + 24;

        self.draw_text(label, MARGIN + 2, BAR_Y + 2, 2, TEXT);
        self.fill_rect(bar_x, bar_y, bar_w, BAR_H - 28, CARD_BG);
        let filled = (bar_w as f32 * progress.clamp(0.0, 1.0)) as usize;
        self.fill_rect(bar_x, bar_y, filled, BAR_H - 28, color);
        self.draw_border(bar_x, bar_y, bar_w, BAR_H - 28, blend(color, BG_COLOR, 0.5));
        self.draw_text(&pct, bar_x + bar_w + 12, bar_y + 6, 3, TEXT);
    }

    // ── Hand schematics ───────────────────────────────────────────────────

    /// One palm per visible hand, ordered left to right as the key is.
    fn draw_hands(&mut self, hands: &[HandObservation]) {
        let mut ordered: Vec<&HandObservation> = hands.iter().collect();
        ordered.sort_by(|a, b| a.center.0.total_cmp(&b.center.0).then(a.fingers.cmp(&b.fingers)));

        if ordered.is_empty() {
            self.draw_text("NO HANDS", WIN_W / 2 - text_width("NO HANDS", 3) / 2,
                           HANDS_Y + HANDS_H / 2 - 8, 3, DIM);
            return;
        }

        let slot_w = (WIN_W - 2 * MARGIN) / ordered.len();
        for (i, hand) in ordered.iter().enumerate() {
            let cx = MARGIN + slot_w * i + slot_w / 2;
            self.draw_hand(cx, hand);
        }
    }

    fn draw_hand(&mut self, cx: usize, hand: &HandObservation) {
        const FINGER_W: usize = 16;
        const GAP:      usize = 6;
        const PALM_H:   usize = 46;
        const UP_H:     usize = 60;
        const DOWN_H:   usize = 18;

        let palm_w = FINGER_COUNT * FINGER_W + (FINGER_COUNT - 1) * GAP;
        let x0     = cx.saturating_sub(palm_w / 2);
        let palm_y = HANDS_Y + UP_H + 8;

        self.fill_rect(x0, palm_y, palm_w, PALM_H, TEXT_BG);
        for f in 0..FINGER_COUNT {
            let fx = x0 + f * (FINGER_W + GAP);
            if hand.fingers.is_extended(f) {
                self.fill_rect(fx, palm_y - UP_H, FINGER_W, UP_H, PRIMARY);
            } else {
                self.fill_rect(fx, palm_y - DOWN_H, FINGER_W, DOWN_H, DIM);
            }
        }

        let label = hand.fingers.to_string();
        self.draw_text(&label, cx.saturating_sub(text_width(&label, 2) / 2),
                       palm_y + PALM_H + 8, 2, TEXT);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            if y < WIN_H           { self.buf[y           * WIN_W + col] = color; }
            if y+h-1 < WIN_H       { self.buf[(y+h-1)     * WIN_W + col] = color; }
        }
        for row in y..(y+h).min(WIN_H) {
            if x < WIN_W           { self.buf[row * WIN_W + x    ] = color; }
            if x+w-1 < WIN_W       { self.buf[row * WIN_W + x+w-1] = color; }
        }
    }

    /// 3×5 bitmap font, each dot drawn as a `scale`×`scale` square.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + 3 * scale > WIN_W { break; }
            let glyph = char_glyph(ch).unwrap_or(FALLBACK);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
        }
    }
}

fn digit_key(key: Key) -> Option<u8> {
    match key {
        Key::Key0 => Some(0), Key::Key1 => Some(1), Key::Key2 => Some(2),
        Key::Key3 => Some(3), Key::Key4 => Some(4), Key::Key5 => Some(5),
        Key::Key6 => Some(6), Key::Key7 => Some(7), Key::Key8 => Some(8),
        Key::Key9 => Some(9),
        _ => None,
    }
}

fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * 4 * scale
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

const FALLBACK: [u8; 5] = [0b000, 0b000, 0b010, 0b000, 0b000];

fn char_glyph(c: char) -> Option<[u8; 5]> {
    let glyph = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '"' => [0b101, 0b101, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => return None,
    };
    Some(glyph)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
