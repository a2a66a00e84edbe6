//! Focusable units built on `auric-core`: labels, buttons, check boxes,
//! toggles, grids, text fields, menus and menu bars.

pub mod grid;
pub mod leaf;
pub mod menu;
pub mod menubar;
pub mod textfield;

pub use grid::{Grid, GridAction};
pub use leaf::{Leaf, LeafAction, LeafKind};
pub use menu::{Menu, MenuAction, MenuOptions};
pub use menubar::{BarAction, BarState, MenuBar, MenuBarItem};
pub use textfield::{EditAction, Editor, TextField, TextFieldOptions};
