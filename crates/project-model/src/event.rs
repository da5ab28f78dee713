//! Input events consumed by the input mapper.
//!
//! Pointer coordinates are host pixels relative to the top-left corner of
//! the displayed preview, which may be shown at any on-screen size.

use serde::{Deserialize, Serialize};

use crate::params::BackgroundImage;

/// Form fields that carry a free-form value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TitleText,
    SuperText,
    ClearColor,
    ImageScale,
    ImageOffsetX,
    ImageOffsetY,
}

/// Buttons on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormAction {
    /// Scale the background so it fills the preview width.
    FitImage,
    ResetScale,
    ResetOffset,
    Download,
}

/// A single input to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown { x: i32, y: i32 },

    /// Pointer moved (pressed or not).
    PointerMove { x: i32, y: i32 },

    /// Primary button released, anywhere.
    PointerUp,

    /// Wheel scrolled over the preview. Positive `delta` zooms out.
    Wheel { x: i32, y: i32, delta: f64 },

    /// A form field was committed with a new value.
    FieldChanged(Field, String),

    /// A form button was pressed.
    Action(FormAction),

    /// Background image decoding finished. `None` clears the image,
    /// including after a failed decode.
    BackgroundImageChanged(Option<BackgroundImage>),

    /// The displayed preview changed its on-screen size.
    SurfaceResized { width: f64, height: f64 },
}

impl InputEvent {
    pub fn field(field: Field, value: impl Into<String>) -> Self {
        Self::FieldChanged(field, value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_snake_case() {
        let json = serde_json::to_string(&Field::ImageOffsetX).unwrap();
        assert_eq!(json, "\"image_offset_x\"");
        let action: FormAction = serde_json::from_str("\"fit_image\"").unwrap();
        assert_eq!(action, FormAction::FitImage);
    }
}
