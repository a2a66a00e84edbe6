//! Boundaries to the outside world: speech synthesis, sound playback and the
//! clipboard. The runtime never depends on what these do with the request.

use std::cell::RefCell;
use std::rc::Rc;

use crate::feedback::Utterance;

pub trait SpeechBridge {
    /// `interrupt` cancels any utterance in progress first.
    fn speak(&mut self, text: &str, interrupt: bool);
    fn silence(&mut self);
}

pub trait SoundBridge {
    /// Advisory; playback failures are the bridge's business.
    fn play(&mut self, effect: &str, wait: bool);
}

pub trait ClipboardBridge {
    fn copy(&mut self, text: &str);
    fn paste(&mut self) -> String;
}

pub struct NoSound;

impl SoundBridge for NoSound {
    fn play(&mut self, _effect: &str, _wait: bool) {}
}

#[derive(Default)]
struct TranscriptInner {
    lines: Vec<Utterance>,
    silenced: usize,
}

/// Speech bridge that records everything it is asked to say.
///
/// Clones share the same record, so a test can keep one handle and give the
/// other to the host.
#[derive(Clone, Default)]
pub struct Transcript(Rc<RefCell<TranscriptInner>>);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().lines.iter().map(|u| u.text.clone()).collect()
    }

    pub fn utterances(&self) -> Vec<Utterance> {
        self.0.borrow().lines.clone()
    }

    pub fn last(&self) -> Option<String> {
        self.0.borrow().lines.last().map(|u| u.text.clone())
    }

    /// All lines joined with `" | "`.
    pub fn joined(&self) -> String {
        self.lines().join(" | ")
    }

    pub fn silenced(&self) -> usize {
        self.0.borrow().silenced
    }

    pub fn clear(&self) {
        self.0.borrow_mut().lines.clear();
    }
}

impl SpeechBridge for Transcript {
    fn speak(&mut self, text: &str, interrupt: bool) {
        self.0.borrow_mut().lines.push(Utterance {
            text: text.to_owned(),
            interrupt,
        });
    }

    fn silence(&mut self) {
        self.0.borrow_mut().silenced += 1;
    }
}

/// Sound bridge that records effect ids.
#[derive(Clone, Default)]
pub struct CueLog(Rc<RefCell<Vec<String>>>);

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl SoundBridge for CueLog {
    fn play(&mut self, effect: &str, _wait: bool) {
        self.0.borrow_mut().push(effect.to_owned());
    }
}

/// In-process clipboard.
#[derive(Clone, Default)]
pub struct MemoryClipboard(Rc<RefCell<String>>);

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self(Rc::new(RefCell::new(text.to_owned())))
    }

    pub fn contents(&self) -> String {
        self.0.borrow().clone()
    }
}

impl ClipboardBridge for MemoryClipboard {
    fn copy(&mut self, text: &str) {
        *self.0.borrow_mut() = text.to_owned();
    }

    fn paste(&mut self) -> String {
        self.0.borrow().clone()
    }
}
