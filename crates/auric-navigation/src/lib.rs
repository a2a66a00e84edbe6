//! Screens, dialogs and the window that roots a focus tree.

pub mod screen;
pub mod window;

pub use screen::{Screen, ScreenAction};
pub use window::{Window, WindowAction};
