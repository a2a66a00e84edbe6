//! # Focus, input, and speech
//!
//! Auric builds non-visual interfaces: an application assembles a tree of
//! focusable units and the runtime keeps exactly one path through it live.
//! The leaf at the end of that path owns the keyboard and speaks for itself.
//!
//! The pieces, leaves first:
//!
//! - [`Chord`]: key identity, a symbol plus a modifier mask with lock bits
//!   stripped.
//! - [`Binding`]: a deferred call whose enum variant is the callable.
//! - [`Dispatcher`]: press, release, text and motion tables with held-key
//!   auto-repeat.
//! - [`Transitions`]: keyed children with one current child and guarded
//!   switching.
//! - [`Unit`]: the setup/update/exit contract every node implements.
//! - [`HandlerStack`]: the live dispatchers, root first.
//!
//! ## Entering a unit
//!
//! ```rust
//! use auric_core::*;
//!
//! let transcript = Transcript::new();
//! let mut harness = Harness::new(
//!     Box::new(transcript.clone()),
//!     Box::new(NoSound),
//!     Box::new(MemoryClipboard::new()),
//! );
//! let mut children = Transitions::new();
//! children.add("idle", Box::new(EmptyUnit::default())).unwrap();
//!
//! let t = children.change("idle", &mut harness.cx(), true).unwrap();
//! assert_eq!(t, Transition::Changed);
//! assert_eq!(children.current_key(), Some("idle"));
//! ```
//!
//! ## Collaborators
//!
//! Speech, sound and the clipboard are traits ([`SpeechBridge`],
//! [`SoundBridge`], [`ClipboardBridge`]) handed to units through
//! [`FocusCx`]. [`Transcript`], [`CueLog`] and [`MemoryClipboard`] record
//! what they are given.

pub mod binding;
pub mod bridge;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod handlers;
pub mod history;
pub mod input;
pub mod semantics;
pub mod timer;
pub mod transition;
pub mod unit;

pub use binding::*;
pub use bridge::*;
pub use config::*;
pub use context::*;
pub use dispatch::*;
pub use error::*;
pub use feedback::*;
pub use handlers::*;
pub use history::*;
pub use input::*;
pub use semantics::*;
pub use timer::*;
pub use transition::*;
pub use unit::*;
