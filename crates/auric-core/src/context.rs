use crate::bridge::{ClipboardBridge, SoundBridge};
use crate::dispatch::DispatcherId;
use crate::feedback::{Cue, Feedback, SoundSet};
use crate::handlers::HandlerStack;
use crate::history::Speech;

/// Everything a unit may touch while it is being entered, ticked, left or
/// handed an event. Built by the host for the duration of one call.
pub struct FocusCx<'a> {
    pub handlers: &'a mut HandlerStack,
    pub speech: &'a mut Speech,
    pub sound: &'a mut dyn SoundBridge,
    pub clipboard: &'a mut dyn ClipboardBridge,
    pub caption: &'a mut String,
}

impl FocusCx<'_> {
    /// Speaks and logs to the history.
    pub fn speak(&mut self, text: &str, interrupt: bool) {
        self.speech.announce(text, interrupt);
    }

    /// Speaks without logging.
    pub fn say(&mut self, text: &str, interrupt: bool) {
        self.speech.say(text, interrupt);
    }

    /// Plays the effect mapped to `cue`. False when none is mapped.
    pub fn cue(&mut self, sounds: &SoundSet, cue: Cue) -> bool {
        match sounds.effect(cue) {
            Some(effect) => {
                self.sound.play(effect, false);
                true
            }
            None => false,
        }
    }

    pub fn emit(&mut self, feedback: &Feedback, sounds: &SoundSet) {
        if let Some(cue) = feedback.cue {
            self.cue(sounds, cue);
        }
        for u in &feedback.speech {
            self.speech.announce(&u.text, u.interrupt);
        }
    }

    pub fn push_handler(&mut self, id: DispatcherId) {
        self.handlers.push(id);
    }

    pub fn pop_handler(&mut self, id: DispatcherId) {
        self.handlers.pop(id);
    }
}

/// Owns the pieces a [`FocusCx`] borrows. Handy for tests and small hosts.
pub struct Harness {
    pub handlers: HandlerStack,
    pub speech: Speech,
    pub sound: Box<dyn SoundBridge>,
    pub clipboard: Box<dyn ClipboardBridge>,
    pub caption: String,
}

impl Harness {
    pub fn new(
        speech: Box<dyn crate::bridge::SpeechBridge>,
        sound: Box<dyn SoundBridge>,
        clipboard: Box<dyn ClipboardBridge>,
    ) -> Self {
        Self {
            handlers: HandlerStack::new(),
            speech: Speech::new(speech, 0),
            sound,
            clipboard,
            caption: String::new(),
        }
    }

    pub fn cx(&mut self) -> FocusCx<'_> {
        FocusCx {
            handlers: &mut self.handlers,
            speech: &mut self.speech,
            sound: self.sound.as_mut(),
            clipboard: self.clipboard.as_mut(),
            caption: &mut self.caption,
        }
    }
}
