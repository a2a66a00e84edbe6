use std::time::Duration;

use auric_core::*;

use crate::screen::Screen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowAction {
    Escape,
    Quit,
}

/// Root of the focus tree: a captioned set of screens.
pub struct Window {
    key: String,
    caption: String,
    escapable: bool,
    screens: Transitions,
    position: usize,
    keys: Dispatcher<WindowAction>,
    startup: Deferred<()>,
    startup_delay: Duration,
}

impl Window {
    pub fn new(caption: impl Into<String>) -> Self {
        let mut keys = Dispatcher::new();
        keys.bind_press(Chord::new(Key::Escape), WindowAction::Escape);
        keys.bind_press(Chord::ctrl(Key::Character('w')), WindowAction::Quit);
        keys.bind_press(Chord::ctrl(Key::F(4)), WindowAction::Quit);
        Self {
            key: String::new(),
            caption: caption.into(),
            escapable: false,
            screens: Transitions::new(),
            position: 0,
            keys,
            startup: Deferred::new(),
            startup_delay: RuntimeConfig::default().startup_delay(),
        }
    }

    /// Escape quits instead of being swallowed.
    pub fn escapable(mut self, escapable: bool) -> Self {
        self.escapable = escapable;
        self
    }

    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        self.keys.set_repeat_interval(config.repeat_interval());
        self.with_startup_delay(config.startup_delay())
    }

    pub fn add_screen(&mut self, key: impl Into<String>, screen: Screen) -> Result<(), ConfigError> {
        self.screens.add(key, Box::new(screen))
    }

    pub fn with_screen(mut self, key: impl Into<String>, screen: Screen) -> Result<Self, ConfigError> {
        self.add_screen(key, screen)?;
        Ok(self)
    }

    pub fn screen_mut(&mut self, key: &str) -> Option<&mut Screen> {
        self.screens.get_as_mut(key)
    }

    /// The screen that currently has focus.
    pub fn current_screen_mut(&mut self) -> Option<&mut Screen> {
        self.screens.current_mut().downcast_mut()
    }

    pub fn screens(&self) -> &Transitions {
        &self.screens
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Takes effect on the next entry.
    pub fn caption_mut(&mut self) -> &mut String {
        &mut self.caption
    }

    /// Changes the caption now and speaks it.
    pub fn set_caption(&mut self, caption: impl Into<String>, cx: &mut FocusCx<'_>) {
        self.caption = caption.into();
        cx.caption.clone_from(&self.caption);
        cx.speak(&self.caption, true);
    }

    pub fn is_starting(&self) -> bool {
        self.startup.is_pending()
    }

    pub fn show(&mut self, key: &str, cx: &mut FocusCx<'_>) -> FocusResult<Transition> {
        self.startup.cancel();
        let t = self.screens.change(key, cx, true)?;
        if t == Transition::Changed {
            self.position = self.screens.position_of(key).unwrap_or_default();
        }
        Ok(t)
    }

    fn enter_position(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        if let Some(key) = self.screens.key_at(self.position).map(str::to_owned) {
            self.screens.change(&key, cx, false)?;
        }
        Ok(())
    }
}

impl Handler for Window {
    type Action = WindowAction;

    fn dispatcher(&mut self) -> &mut Dispatcher<WindowAction> {
        &mut self.keys
    }

    fn invoke(&mut self, call: Invocation<WindowAction>, _cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        Ok(match call.action {
            WindowAction::Escape if self.escapable => Outcome::Quit,
            WindowAction::Escape => Outcome::Handled,
            WindowAction::Quit => Outcome::Quit,
        })
    }
}

impl Unit for Window {
    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn label(&self) -> &str {
        &self.caption
    }

    fn role(&self) -> Role {
        Role::Window
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        cx.caption.clone_from(&self.caption);
        cx.speak(&self.caption, interrupt);
        cx.push_handler(self.keys.id());
        if self.startup_delay.is_zero() {
            self.enter_position(cx)?;
        } else {
            self.startup.schedule(self.startup_delay, ());
        }
        Ok(true)
    }

    fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        pump_repeats(self, dt, cx)?;
        if self.startup.tick(dt).is_some() {
            self.enter_position(cx)?;
        }
        self.screens.update(dt, cx)
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        if !self.screens.exit(cx)? {
            return Ok(false);
        }
        self.startup.cancel();
        cx.pop_handler(self.keys.id());
        Ok(true)
    }

    fn reset(&mut self) {
        self.position = 0;
        self.screens.reset_all();
    }

    fn dispatch(
        &mut self,
        target: DispatcherId,
        event: &InputEvent,
        cx: &mut FocusCx<'_>,
    ) -> FocusResult<Outcome> {
        if target == self.keys.id() {
            return deliver(self, event, cx);
        }
        match self.screens.dispatch(target, event, cx)? {
            Outcome::Goto(key) if self.screens.contains(&key) => {
                self.show(&key, cx)?;
                Ok(Outcome::Changed(self.position))
            }
            other => Ok(other),
        }
    }

    fn focused_path_name(&self) -> String {
        if self.screens.is_empty_current() {
            return self.caption.clone();
        }
        self.screens.current().focused_path_name()
    }
}
