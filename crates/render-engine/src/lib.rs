//! Coverforge Render Engine
//!
//! Composites render parameters into a high-resolution preview and exports
//! a downscaled WebP.
//!
//! # Pipeline Architecture
//!
//! ```text
//! clear color ─────┐
//!                  ├── Background (scale + offset)
//! background ──────┘         │
//!                            ├── Overlay gradient
//!                            │         │
//! title / subtitle ──────────┴─────────├── Text + break line
//!                                      │         │
//! logo ────────────────────────────────┴─────────├── Logo + drop shadow
//!                                                ▼
//!                                     preview (target × 2)
//!                                                │
//!                                                ▼
//!                                   resample → WebP → image.webp
//! ```

pub mod assets;
pub mod compositor;
pub mod export;
pub mod layout;
pub mod paint;
pub mod session;
pub mod text;

pub use compositor::Compositor;
pub use export::*;
pub use layout::DecorationLayout;
pub use session::Session;
pub use text::{GlyphTextRenderer, TextRenderer, TextRun};
