//! JSON gesture scenarios.
//!
//! ```json
//! { "steps": [
//!     { "press": "button1" },
//!     { "idle": 5 },
//!     { "release": "button1" },
//!     { "turn": { "encoder": "encoder1", "detents": -2 } },
//!     { "bounce": { "button": "button2", "ticks": 6 } },
//!     { "raw": 305419896 }
//! ] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use control::{ControlConfig, TraceBuilder};
use platform::{Button, Encoder};
use serde::Deserialize;

/// Button names as written in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonName {
    Button1,
    Button2,
    EncoderButton1,
    EncoderButton2,
}

impl From<ButtonName> for Button {
    fn from(name: ButtonName) -> Self {
        match name {
            ButtonName::Button1 => Self::Button1,
            ButtonName::Button2 => Self::Button2,
            ButtonName::EncoderButton1 => Self::EncoderButton1,
            ButtonName::EncoderButton2 => Self::EncoderButton2,
        }
    }
}

/// Encoder names as written in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderName {
    Encoder1,
    Encoder2,
}

impl From<EncoderName> for Encoder {
    fn from(name: EncoderName) -> Self {
        match name {
            EncoderName::Encoder1 => Self::Encoder1,
            EncoderName::Encoder2 => Self::Encoder2,
        }
    }
}

/// One gesture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Close a switch and hold it long enough to debounce.
    Press(ButtonName),
    /// Open a switch and hold it long enough to debounce.
    Release(ButtonName),
    /// Rotate by whole detents, positive clockwise.
    Turn { encoder: EncoderName, detents: i32 },
    /// Contact bounce on a button for a number of ticks.
    Bounce { button: ButtonName, ticks: usize },
    /// Keep every pin where it is.
    Idle(usize),
    /// Replace the whole bank for one tick.
    Raw(u32),
}

/// A gesture script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Read a scenario from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// Parse a scenario from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid scenario JSON")
    }

    /// Built-in gesture tour used when no scenario file is given.
    pub fn demo() -> Self {
        use ButtonName as B;
        use EncoderName as E;

        Self {
            steps: vec![
                Step::Idle(5),
                Step::Press(B::Button1),
                Step::Idle(3),
                Step::Release(B::Button1),
                Step::Idle(2),
                Step::Turn {
                    encoder: E::Encoder1,
                    detents: 2,
                },
                Step::Idle(2),
                Step::Turn {
                    encoder: E::Encoder2,
                    detents: -1,
                },
                Step::Idle(2),
                Step::Press(B::EncoderButton1),
                Step::Release(B::EncoderButton1),
                Step::Bounce {
                    button: B::Button2,
                    ticks: 6,
                },
                Step::Idle(5),
            ],
        }
    }

    /// Expand the gestures into per-tick bank levels for `config`'s wiring.
    pub fn to_trace(&self, config: &ControlConfig) -> Vec<u32> {
        self.steps
            .iter()
            .fold(TraceBuilder::new(config), |trace, step| match *step {
                Step::Press(b) => trace.press(b.into()),
                Step::Release(b) => trace.release(b.into()),
                Step::Turn { encoder, detents } => trace.turn(encoder.into(), detents),
                Step::Bounce { button, ticks } => trace.bounce(button.into(), ticks),
                Step::Idle(ticks) => trace.idle(ticks),
                Step::Raw(bank) => trace.raw(bank),
            })
            .build()
    }
}
