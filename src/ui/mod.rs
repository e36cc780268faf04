//! Viewer widgets
//!
//! - `panel.rs` - an open image: zoomable, scrollable view with pixel readout

pub mod panel;
