//! JSONL event scripts for headless hosts.
//!
//! One step per line; blank lines and lines starting with `#` are skipped:
//!
//! ```text
//! # cover for the release post
//! {"type":"background","path":"shots/hero.png"}
//! {"type":"action","action":"fit_image"}
//! {"type":"field","field":"title_text","value":"Hello"}
//! {"type":"wheel","x":640,"y":360,"delta":-120}
//! {"type":"action","action":"download"}
//! ```

use std::path::PathBuf;

use coverforge_common::error::{CoverError, CoverResult};
use serde::{Deserialize, Serialize};

use crate::event::{Field, FormAction, InputEvent};

/// A single scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Declare the on-screen size pointer coordinates refer to.
    Resize { width: f64, height: f64 },

    PointerDown { x: i32, y: i32 },

    PointerMove { x: i32, y: i32 },

    PointerUp,

    Wheel { x: i32, y: i32, delta: f64 },

    Field { field: Field, value: String },

    Action { action: FormAction },

    /// Load a background image from disk; `null` clears it.
    /// Relative paths resolve against the script's directory.
    Background { path: Option<PathBuf> },
}

impl ScriptStep {
    /// Convert to an input event. Background steps need asynchronous
    /// decoding by the host and return `None`.
    pub fn to_event(&self) -> Option<InputEvent> {
        let event = match self {
            ScriptStep::Resize { width, height } => InputEvent::SurfaceResized {
                width: *width,
                height: *height,
            },
            ScriptStep::PointerDown { x, y } => InputEvent::PointerDown { x: *x, y: *y },
            ScriptStep::PointerMove { x, y } => InputEvent::PointerMove { x: *x, y: *y },
            ScriptStep::PointerUp => InputEvent::PointerUp,
            ScriptStep::Wheel { x, y, delta } => InputEvent::Wheel {
                x: *x,
                y: *y,
                delta: *delta,
            },
            ScriptStep::Field { field, value } => InputEvent::FieldChanged(*field, value.clone()),
            ScriptStep::Action { action } => InputEvent::Action(*action),
            ScriptStep::Background { .. } => return None,
        };
        Some(event)
    }

    pub fn is_download(&self) -> bool {
        matches!(
            self,
            ScriptStep::Action {
                action: FormAction::Download
            }
        )
    }
}

/// Parse a script from JSONL content. Errors carry the 1-based line number.
pub fn parse_script(jsonl: &str) -> CoverResult<Vec<ScriptStep>> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|e| CoverError::script(line_no, e.to_string()))
        })
        .collect()
}

/// Serialize steps to JSONL format.
pub fn serialize_script(steps: &[ScriptStep]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for step in steps {
        output.push_str(&serde_json::to_string(step)?);
        output.push('\n');
    }
    Ok(output)
}
