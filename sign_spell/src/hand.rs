//! Hand acquisition — from LeapMotion hardware or keyboard simulation.
//!
//! The public interface is [`SourceMessage`] delivered over a `mpsc` channel,
//! one message per captured frame.  Consumers don't need to know whether
//! frames came from real hardware or the keyboard simulator.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use sign_stream::{Fingers, HandObservation, FINGER_COUNT};

/// All hands seen in one frame, in detector order.
pub type HandFrame = Vec<HandObservation>;

// ════════════════════════════════════════════════════════════════════════════
// SourceMessage
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SourceMessage {
    Frame { hands: HandFrame, captured: Instant },
    /// The source cannot continue; the session must end.
    Failed(String),
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver hand frames over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceMessage>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<H: HandSource>(source: H) -> Receiver<SourceMessage> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Each tracking frame becomes one [`HandFrame`]: a finger counts as
/// extended when its base-to-tip span is more than `EXTENDED` of a typical
/// finger length, and the center is the palm position in millimetres.
#[cfg(feature = "leap")]
pub struct LeapHandSource;

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<SourceMessage>) {
        use leaprs::*;

        const EXTENDED: f32 = 0.7;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(SourceMessage::Failed(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(SourceMessage::Failed(format!("LeapMotion device: {:?}", e)));
            return;
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: HandFrame = frame.hands()
                    .map(|hand| {
                        let mut state = [false; FINGER_COUNT];
                        for (slot, digit) in state.iter_mut().zip(hand.digits()) {
                            *slot = finger_extension(&digit) > EXTENDED;
                        }
                        let palm = hand.palm().position();
                        HandObservation::new(Fingers::new(state), palm.x, palm.y)
                    })
                    .collect();
                let msg = SourceMessage::Frame { hands, captured: Instant::now() };
                if tx.send(msg).is_err() { return; }
            }
        }
    }
}

#[cfg(feature = "leap")]
fn finger_extension(digit: &leaprs::Digit) -> f32 {
    // Ratio of (tip – metacarpal base) distance to full finger length.
    // 1.0 = fully extended, ~0.0 = fully curled.
    let base = digit.metacarpal().prev_joint();
    let tip  = digit.distal().next_joint();
    let dx   = tip.x - base.x;
    let dy   = tip.y - base.y;
    let dz   = tip.z - base.z;
    let dist = (dx*dx + dy*dy + dz*dz).sqrt();
    // Normalise to ~0–1 using typical finger length ≈ 80 mm
    (dist / 80.0).clamp(0.0, 1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Which simulated hand.  Hand A starts on the left, B on the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimHand { A, B }

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// Extend or fold one finger (0 = thumb … 4 = pinky).
    ToggleFinger { hand: SimHand, finger: usize },
    /// Show or hide a hand.
    ToggleHand(SimHand),
    /// Swap the horizontal positions of the two hands.
    SwapSides,
}

/// Current pose of the simulated hands.
#[derive(Clone, Debug, PartialEq)]
pub struct SimHands {
    pub a:       Fingers,
    pub b:       Fingers,
    pub a_shown: bool,
    pub b_shown: bool,
    /// When set, hand A sits on the right.
    pub swapped: bool,
}

const SIM_LEFT_X:  f32 = 0.3;
const SIM_RIGHT_X: f32 = 0.7;
const SIM_Y:       f32 = 0.5;

impl Default for SimHands {
    fn default() -> Self {
        SimHands {
            a:       Fingers::default(),
            b:       Fingers::default(),
            a_shown: true,
            b_shown: false,
            swapped: false,
        }
    }
}

impl SimHands {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::ToggleFinger { hand: SimHand::A, finger } => self.a.toggle(finger),
            SimInput::ToggleFinger { hand: SimHand::B, finger } => self.b.toggle(finger),
            SimInput::ToggleHand(SimHand::A) => self.a_shown = !self.a_shown,
            SimInput::ToggleHand(SimHand::B) => self.b_shown = !self.b_shown,
            SimInput::SwapSides => self.swapped = !self.swapped,
        }
    }

    /// The visible hands, listed B first so the recognizer can't rely on
    /// enumeration order.
    pub fn observations(&self) -> HandFrame {
        let (ax, bx) = if self.swapped {
            (SIM_RIGHT_X, SIM_LEFT_X)
        } else {
            (SIM_LEFT_X, SIM_RIGHT_X)
        };
        let mut frame = Vec::with_capacity(2);
        if self.b_shown { frame.push(HandObservation::new(self.b, bx, SIM_Y)); }
        if self.a_shown { frame.push(HandObservation::new(self.a, ax, SIM_Y)); }
        frame
    }
}

/// Hand source driven by [`SimInput`] events (from the visualizer's window).
///
/// Emits the current simulated pose every `frame_interval`, like a camera
/// would, until the input channel closes.
pub struct SimHandSource {
    pub rx:             Receiver<SimInput>,
    pub frame_interval: Duration,
    pub hands:          SimHands,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>, frame_interval: Duration) -> Self {
        SimHandSource { rx, frame_interval, hands: SimHands::default() }
    }
}

impl HandSource for SimHandSource {
    fn run(mut self: Box<Self>, tx: Sender<SourceMessage>) {
        loop {
            loop {
                match self.rx.try_recv() {
                    Ok(input)                       => self.hands.apply(input),
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
            let msg = SourceMessage::Frame {
                hands:    self.hands.observations(),
                captured: Instant::now(),
            };
            if tx.send(msg).is_err() { return; }
            thread::sleep(self.frame_interval);
        }
    }
}

/// Keyboard digit → (hand, finger).  `1`–`5` drive hand A thumb…pinky,
/// `6`–`9`,`0` drive hand B.
pub fn finger_for_digit(digit: u8) -> Option<(SimHand, usize)> {
    match digit {
        1..=5 => Some((SimHand::A, (digit - 1) as usize)),
        6..=9 => Some((SimHand::B, (digit - 6) as usize)),
        0     => Some((SimHand::B, FINGER_COUNT - 1)),
        _     => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
