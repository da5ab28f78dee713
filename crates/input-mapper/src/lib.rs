//! Coverforge Input Mapper
//!
//! Turns raw host input into parameter updates:
//! - **Pan:** Drag the background with the pointer at a 1:1 visual speed
//! - **Zoom:** Wheel zoom that keeps the point under the cursor fixed
//! - **Fit:** Scale the background to fill the preview width
//! - **Dispatch:** One entry point for every [`InputEvent`]
//!
//! This crate is pure computation with no I/O or rendering.
//!
//! [`InputEvent`]: coverforge_project_model::event::InputEvent

pub mod fit;
pub mod mapper;
pub mod pan;
pub mod zoom;

pub use mapper::{DisplayMetrics, HostRequest, InputMapper};
pub use pan::DragState;
