//! Host loop for Auric focus trees.
//!
//! [`Host`] owns a [`Window`] together with everything a unit borrows
//! through [`FocusCx`]: the handler stack, the caption, speech and the
//! sound and clipboard bridges. Feed it key events and frame ticks; it
//! routes each event down the handler stack, top first.

mod common;

pub use common::{FrameClock, LogSpeech, SystemClipboard};

use std::time::Duration;

use auric_core::*;
use auric_navigation::Window;

pub struct Host {
    window: Window,
    handlers: HandlerStack,
    caption: String,
    speech: Speech,
    sound: Box<dyn SoundBridge>,
    clipboard: Box<dyn ClipboardBridge>,
    config: RuntimeConfig,
    activation: Deferred<()>,
    open: bool,
}

impl Host {
    /// A host with no sound and an in-process clipboard.
    pub fn new(window: Window, speech: Box<dyn SpeechBridge>, config: RuntimeConfig) -> Self {
        Self {
            window,
            handlers: HandlerStack::new(),
            caption: String::new(),
            speech: Speech::new(speech, config.history_limit),
            sound: Box::new(NoSound),
            clipboard: Box::new(MemoryClipboard::new()),
            config,
            activation: Deferred::new(),
            open: false,
        }
    }

    pub fn with_sound(mut self, sound: Box<dyn SoundBridge>) -> Self {
        self.sound = sound;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardBridge>) -> Self {
        self.clipboard = clipboard;
        self
    }

    fn parts(&mut self) -> (&mut Window, FocusCx<'_>) {
        let Host {
            window,
            handlers,
            caption,
            speech,
            sound,
            clipboard,
            ..
        } = self;
        let cx = FocusCx {
            handlers,
            speech,
            sound: sound.as_mut(),
            clipboard: clipboard.as_mut(),
            caption,
        };
        (window, cx)
    }

    /// Runs `f` against the window with a live context, for application
    /// code that reacts to an outcome (opening a dialog, switching screens).
    pub fn with_cx<R>(&mut self, f: impl FnOnce(&mut Window, &mut FocusCx<'_>) -> R) -> R {
        let (window, mut cx) = self.parts();
        f(window, &mut cx)
    }

    pub fn open(&mut self) -> FocusResult<()> {
        if self.open {
            return Ok(());
        }
        let (window, mut cx) = self.parts();
        window.setup(&mut cx, true)?;
        self.open = true;
        log::info!("opened {:?}", self.caption);
        Ok(())
    }

    /// Hands `event` to the dispatchers on the stack, top first, and returns
    /// the first outcome that is not `Ignored`. Releases reach every
    /// dispatcher so none is left holding a repeating key. A `Quit` closes
    /// the host.
    pub fn handle(&mut self, event: InputEvent) -> FocusResult<Outcome> {
        if !self.open {
            return Ok(Outcome::Ignored);
        }
        let ids: Vec<DispatcherId> = self.handlers.as_slice().iter().rev().copied().collect();
        let broadcast = matches!(event, InputEvent::Release(_));
        let mut claimed = Outcome::Ignored;
        {
            let (window, mut cx) = self.parts();
            for id in ids {
                let outcome = window.dispatch(id, &event, &mut cx)?;
                if !outcome.is_handled() {
                    continue;
                }
                if !claimed.is_handled() {
                    claimed = outcome;
                }
                if !broadcast {
                    break;
                }
            }
        }
        log::trace!("{event:?} -> {claimed:?}");
        if claimed == Outcome::Quit {
            self.close()?;
        }
        Ok(claimed)
    }

    /// A key going down: the press itself, then the cursor motion or
    /// character it stands for if no dispatcher claimed the press.
    pub fn press(&mut self, chord: Chord) -> FocusResult<Outcome> {
        let outcome = self.handle(InputEvent::Press(chord))?;
        if outcome.is_handled() {
            return Ok(outcome);
        }
        if let Some(motion) = chord.motion() {
            let outcome = self.handle(InputEvent::Motion(motion))?;
            if outcome.is_handled() {
                return Ok(outcome);
            }
        }
        match chord.text() {
            Some(c) => self.handle(InputEvent::Text(c)),
            None => Ok(Outcome::Ignored),
        }
    }

    pub fn release(&mut self, chord: Chord) -> FocusResult<Outcome> {
        self.handle(InputEvent::Release(chord))
    }

    /// Press then release.
    pub fn tap(&mut self, chord: Chord) -> FocusResult<Outcome> {
        let outcome = self.press(chord)?;
        if self.open {
            self.release(chord)?;
        }
        Ok(outcome)
    }

    /// Advances the tree by `dt` and fires a due activation announcement.
    pub fn tick(&mut self, dt: Duration) -> FocusResult<()> {
        if !self.open {
            return Ok(());
        }
        let (window, mut cx) = self.parts();
        window.update(dt, &mut cx)?;
        if self.activation.tick(dt).is_some() {
            let name = self.window.focused_path_name();
            self.speech.announce(&name, true);
        }
        Ok(())
    }

    /// The window regained focus: re-announce the focused unit once
    /// `activation_delay` has passed.
    pub fn activate(&mut self) {
        self.activation.schedule(self.config.activation_delay(), ());
    }

    /// Exits the window. False if something in the tree vetoed.
    pub fn close(&mut self) -> FocusResult<bool> {
        if !self.open {
            return Ok(true);
        }
        let (window, mut cx) = self.parts();
        if !window.exit(&mut cx)? {
            return Ok(false);
        }
        if !self.handlers.is_empty() {
            log::warn!("{} dispatchers left on the stack after close", self.handlers.len());
            self.handlers.clear();
        }
        self.activation.cancel();
        self.speech.silence();
        self.open = false;
        log::info!("closed {:?}", self.caption);
        Ok(true)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn handlers(&self) -> &HandlerStack {
        &self.handlers
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn speech(&self) -> &Speech {
        &self.speech
    }

    pub fn speech_mut(&mut self) -> &mut Speech {
        &mut self.speech
    }
}
