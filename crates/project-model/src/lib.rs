//! Coverforge Project Model
//!
//! Defines the core data contracts for the cover generator:
//! - **Parameters:** Title, subtitle, fill color, background image, pan/zoom
//! - **Store:** The single owner of the parameters plus a render request flag
//! - **Events:** Pointer, wheel, and form input consumed by the input mapper
//! - **Scripts:** JSONL event scripts replayed by headless hosts
//! - **Geometry:** Target and preview surface dimensions

pub mod color;
pub mod event;
pub mod geometry;
pub mod params;
pub mod script;
pub mod store;

pub use color::*;
pub use event::*;
pub use geometry::*;
pub use params::*;
pub use script::*;
pub use store::*;
