//! Shell-side state
//!
//! Everything here belongs to the viewer window, not to the image model:
//! - Persisted preferences such as the last opened directory (preferences.rs)

pub mod preferences;

pub use preferences::{Preferences, PreferencesError};
