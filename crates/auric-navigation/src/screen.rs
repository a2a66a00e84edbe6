use std::time::Duration;

use auric_core::*;
use auric_ui::MenuBar;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenAction {
    Next,
    Previous,
    Close,
    OpenMenuBar,
}

/// A dialog between `open_dialog` and its removal.
#[derive(Debug)]
struct DialogFlow {
    key: String,
    caption: String,
    back_to: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DialogStep {
    Enter,
    Leave,
}

/// Container of elements cycled with Tab and Shift+Tab.
///
/// A screen can host dialogs: [`Screen::open_dialog`] inserts one as a
/// sibling of the elements and enters it after `dialog_delay`; a `Close`
/// coming back from it restores the element that had focus. An optional
/// [`MenuBar`] opens on F10 and temporarily replaces the focused element.
pub struct Screen {
    key: String,
    title: String,
    role: Role,
    elements: Transitions,
    position: usize,
    keys: Dispatcher<ScreenAction>,
    menu_bar: Option<MenuBar>,
    bar_open: bool,
    bar_return: Option<String>,
    dialog: Option<DialogFlow>,
    stale_dialog: Option<String>,
    pending: Deferred<DialogStep>,
    dialog_delay: Duration,
    dialogs_opened: usize,
    saved_caption: Option<String>,
    sounds: SoundSet,
}

impl Screen {
    /// An empty title makes the screen silent on entry.
    pub fn new(title: impl Into<String>) -> Self {
        Self::build(title.into(), Role::Screen)
    }

    /// A screen that answers Escape with [`Outcome::Close`].
    pub fn dialog(title: impl Into<String>) -> Self {
        let mut screen = Self::build(title.into(), Role::Dialog);
        screen
            .keys
            .bind_press(Chord::new(Key::Escape), ScreenAction::Close);
        screen
    }

    fn build(title: String, role: Role) -> Self {
        let mut keys = Dispatcher::new();
        keys.bind_press(Chord::new(Key::Tab), ScreenAction::Next);
        keys.bind_press(Chord::shift(Key::Tab), ScreenAction::Previous);
        Self {
            key: String::new(),
            title,
            role,
            elements: Transitions::new(),
            position: 0,
            keys,
            menu_bar: None,
            bar_open: false,
            bar_return: None,
            dialog: None,
            stale_dialog: None,
            pending: Deferred::new(),
            dialog_delay: RuntimeConfig::default().dialog_delay(),
            dialogs_opened: 0,
            saved_caption: None,
            sounds: SoundSet::default(),
        }
    }

    pub fn with_menu_bar(mut self, bar: MenuBar) -> Self {
        self.keys
            .bind_press(Chord::new(Key::F(10)), ScreenAction::OpenMenuBar);
        self.menu_bar = Some(bar);
        self
    }

    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        self.dialog_delay = config.dialog_delay();
        self.keys.set_repeat_interval(config.repeat_interval());
        self
    }

    pub fn with_sounds(mut self, sounds: SoundSet) -> Self {
        self.sounds = sounds;
        self
    }

    pub fn add(&mut self, key: impl Into<String>, unit: Box<dyn Unit>) -> Result<(), ConfigError> {
        self.elements.add(key, unit)
    }

    /// Builder form of [`Screen::add`].
    pub fn with(mut self, key: impl Into<String>, unit: impl Unit) -> Result<Self, ConfigError> {
        self.add(key, Box::new(unit))?;
        Ok(self)
    }

    pub fn elements(&self) -> &Transitions {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Transitions {
        &mut self.elements
    }

    pub fn element_mut<T: Unit>(&mut self, key: &str) -> Option<&mut T> {
        self.elements.get_as_mut(key)
    }

    pub fn current_key(&self) -> Option<&str> {
        self.elements.current_key()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn menu_bar(&self) -> Option<&MenuBar> {
        self.menu_bar.as_ref()
    }

    pub fn is_menu_bar_open(&self) -> bool {
        self.bar_open
    }

    /// Key of the dialog in flight, entered or not.
    pub fn dialog_key(&self) -> Option<&str> {
        self.dialog.as_ref().map(|d| d.key.as_str())
    }

    pub fn dispatcher_id(&self) -> DispatcherId {
        self.keys.id()
    }

    /// Elements reachable with Tab; dialogs sit after them.
    fn navigable(&self) -> usize {
        let dialogs = usize::from(self.dialog.is_some()) + usize::from(self.stale_dialog.is_some());
        self.elements.len().saturating_sub(dialogs)
    }

    fn dialog_is_current(&self) -> bool {
        match (&self.dialog, self.elements.current_key()) {
            (Some(d), Some(current)) => d.key == current,
            _ => false,
        }
    }

    fn enter_position(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<()> {
        if let Some(key) = self.elements.key_at(self.position).map(str::to_owned) {
            self.elements.change(&key, cx, interrupt)?;
        }
        Ok(())
    }

    /// Changes focus to the element `key`. A no-op while the menu bar is open.
    pub fn goto(&mut self, key: &str, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        if self.bar_open || self.elements.change(key, cx, true)? != Transition::Changed {
            return Ok(Outcome::Handled);
        }
        self.position = self.elements.position_of(key).unwrap_or_default();
        Ok(Outcome::Changed(self.position))
    }

    fn step(&mut self, forward: bool, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        if self.bar_open {
            return Ok(Outcome::Handled);
        }
        let len = self.navigable();
        if len == 0 {
            return Ok(Outcome::Ignored);
        }
        let target = if forward {
            (self.position + 1) % len
        } else {
            (self.position + len - 1) % len
        };
        let Some(key) = self.elements.key_at(target).map(str::to_owned) else {
            return Ok(Outcome::Ignored);
        };
        cx.cue(&self.sounds, Cue::Scroll);
        self.goto(&key, cx)
    }

    /// Inserts `dialog` under a fresh key and schedules focus to move into
    /// it. A dialog that has not been entered yet is dropped in favour of
    /// this one.
    pub fn open_dialog(&mut self, dialog: Screen, caption: &str) -> Result<String, ConfigError> {
        self.dialogs_opened += 1;
        let key = format!("dialog-{caption}-{}", self.dialogs_opened);

        let back_to = match self.dialog.take() {
            Some(previous) if self.elements.current_key() == Some(previous.key.as_str()) => {
                self.stale_dialog = Some(previous.key);
                previous.back_to
            }
            Some(previous) => {
                self.elements.remove(&previous.key);
                previous.back_to
            }
            None => self.elements.current_key().map(str::to_owned),
        };

        self.elements.add(key.clone(), Box::new(dialog))?;
        log::debug!("dialog {key:?} opening over {back_to:?}");
        self.dialog = Some(DialogFlow {
            key: key.clone(),
            caption: caption.to_owned(),
            back_to,
        });
        self.pending.schedule(self.dialog_delay, DialogStep::Enter);
        Ok(key)
    }

    /// Resets the open dialog, puts the caption back, and schedules the
    /// return to the element it was opened over.
    pub fn close_dialog(&mut self, cx: &mut FocusCx<'_>) {
        if !self.dialog_is_current() {
            return;
        }
        self.elements.current_mut().reset();
        if let Some(caption) = self.saved_caption.take() {
            *cx.caption = caption;
        }
        self.pending.schedule(self.dialog_delay, DialogStep::Leave);
    }

    fn run_step(&mut self, step: DialogStep, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        let Some(flow) = self.dialog.as_ref() else {
            return Ok(());
        };
        match step {
            DialogStep::Enter => {
                let key = flow.key.clone();
                let caption = format!("{} dialog", flow.caption);
                if self.saved_caption.is_none() {
                    self.saved_caption = Some(cx.caption.clone());
                }
                *cx.caption = caption;
                if self.elements.change(&key, cx, true)? == Transition::Changed
                    && let Some(stale) = self.stale_dialog.take()
                {
                    self.elements.remove(&stale);
                }
            }
            DialogStep::Leave => {
                let key = flow.key.clone();
                let back_to = flow.back_to.clone();
                let left = match back_to.as_deref().filter(|k| self.elements.contains(k)) {
                    Some(back) => self.elements.change(back, cx, true)? == Transition::Changed,
                    None => self.elements.exit(cx)?,
                };
                if !left {
                    log::debug!("dialog {key:?} refused to close");
                    return Ok(());
                }
                self.elements.remove(&key);
                self.dialog = None;
                self.position = back_to
                    .and_then(|k| self.elements.position_of(&k))
                    .unwrap_or_default();
            }
        }
        Ok(())
    }

    fn open_menu_bar(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        if self.bar_open || self.menu_bar.is_none() {
            return Ok(Outcome::Ignored);
        }
        let back = self.elements.current_key().map(str::to_owned);
        if !self.elements.exit(cx)? {
            return Ok(Outcome::Handled);
        }
        if let Some(bar) = self.menu_bar.as_mut() {
            cx.cue(&self.sounds, Cue::Open);
            bar.setup(cx, true)?;
        }
        self.bar_return = back;
        self.bar_open = true;
        Ok(Outcome::Handled)
    }

    fn close_menu_bar(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        if let Some(bar) = self.menu_bar.as_mut()
            && !bar.exit(cx)?
        {
            return Ok(());
        }
        self.bar_open = false;
        match self.bar_return.take() {
            Some(key) => {
                self.elements.change(&key, cx, true)?;
            }
            None => self.enter_position(cx, true)?,
        }
        Ok(())
    }
}

impl Handler for Screen {
    type Action = ScreenAction;

    fn dispatcher(&mut self) -> &mut Dispatcher<ScreenAction> {
        &mut self.keys
    }

    fn invoke(&mut self, call: Invocation<ScreenAction>, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        match call.action {
            ScreenAction::Next => self.step(true, cx),
            ScreenAction::Previous => self.step(false, cx),
            ScreenAction::Close => Ok(Outcome::Close),
            ScreenAction::OpenMenuBar => self.open_menu_bar(cx),
        }
    }
}

impl Unit for Screen {
    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn role(&self) -> Role {
        self.role
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        let announced = !self.title.is_empty();
        if announced {
            cx.speak(&self.name(), interrupt);
        }
        cx.push_handler(self.keys.id());
        if self.position >= self.navigable() {
            self.position = 0;
        }
        self.enter_position(cx, interrupt && !announced)?;
        Ok(true)
    }

    fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        pump_repeats(self, dt, cx)?;
        if let Some(step) = self.pending.tick(dt) {
            self.run_step(step, cx)?;
        }
        match self.menu_bar.as_mut() {
            Some(bar) if self.bar_open => bar.update(dt, cx),
            _ => self.elements.update(dt, cx),
        }
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        let left = match self.menu_bar.as_mut() {
            Some(bar) if self.bar_open => bar.exit(cx)?,
            _ => self.elements.exit(cx)?,
        };
        if !left {
            return Ok(false);
        }
        if self.bar_open {
            self.bar_open = false;
            if let Some(key) = self.bar_return.take() {
                self.position = self.elements.position_of(&key).unwrap_or_default();
            }
        }
        cx.pop_handler(self.keys.id());
        Ok(true)
    }

    fn reset(&mut self) {
        self.position = 0;
        self.elements.reset_all();
        if let Some(bar) = self.menu_bar.as_mut() {
            bar.reset();
        }
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
        if self.bar_open
            && let Some(bar) = self.menu_bar.as_mut()
        {
            return match bar.dispatch(target, event, cx)? {
                Outcome::Close => {
                    self.close_menu_bar(cx)?;
                    Ok(Outcome::Handled)
                }
                Outcome::Submitted(key) => {
                    self.close_menu_bar(cx)?;
                    Ok(Outcome::Submitted(key))
                }
                other => Ok(other),
            };
        }
        match self.elements.dispatch(target, event, cx)? {
            Outcome::Close if self.dialog_is_current() => {
                self.close_dialog(cx);
                Ok(Outcome::Handled)
            }
            Outcome::Goto(key) if self.elements.contains(&key) => self.goto(&key, cx),
            other => Ok(other),
        }
    }

    fn focused_path_name(&self) -> String {
        if self.bar_open
            && let Some(bar) = self.menu_bar.as_ref()
        {
            return bar.focused_path_name();
        }
        if self.elements.is_empty_current() {
            return self.name();
        }
        self.elements.current().focused_path_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auric_ui::{Leaf, Menu};

    fn harness(transcript: &Transcript) -> Harness {
        Harness::new(
            Box::new(transcript.clone()),
            Box::new(NoSound),
            Box::new(MemoryClipboard::new()),
        )
    }

    fn route(screen: &mut Screen, h: &mut Harness, event: InputEvent) -> Outcome {
        let ids: Vec<_> = h.handlers.as_slice().iter().rev().copied().collect();
        for id in ids {
            let out = screen.dispatch(id, &event, &mut h.cx()).unwrap();
            if out.is_handled() {
                return out;
            }
        }
        Outcome::Ignored
    }

    fn tap(screen: &mut Screen, h: &mut Harness, chord: Chord) -> Outcome {
        let mut out = route(screen, h, InputEvent::Press(chord));
        if !out.is_handled()
            && let Some(m) = chord.motion()
        {
            out = route(screen, h, InputEvent::Motion(m));
        }
        route(screen, h, InputEvent::Release(chord));
        out
    }

    fn settings() -> Screen {
        Screen::new("Settings")
            .with("music", Leaf::checkbox("Music", true))
            .and_then(|s| s.with("back", Leaf::button("Back")))
            .and_then(|s| s.with("apply", Leaf::button("Apply")))
            .unwrap()
    }

    #[test]
    fn test_tab_cycles_elements_with_wrap() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        let mut screen = settings();
        screen.setup(&mut h.cx(), true).unwrap();

        tap(&mut screen, &mut h, Chord::shift(Key::Tab));
        assert_eq!(screen.current_key(), Some("apply"));
        tap(&mut screen, &mut h, Chord::new(Key::Tab));
        assert_eq!(screen.current_key(), Some("music"));
        assert_eq!(h.handlers.len(), 2);

        insta::assert_snapshot!(
            transcript.joined(),
            @"Settings screen | Music check box Checked | Apply button | Music check box Checked"
        );
    }

    #[test]
    fn test_goto_from_child_changes_sibling() {
        struct Jump {
            key: String,
            keys: Dispatcher<()>,
        }
        impl Handler for Jump {
            type Action = ();
            fn dispatcher(&mut self) -> &mut Dispatcher<()> {
                &mut self.keys
            }
            fn invoke(&mut self, _call: Invocation<()>, _cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
                Ok(Outcome::Goto("apply".into()))
            }
        }
        impl Unit for Jump {
            fn key(&self) -> &str {
                &self.key
            }
            fn set_key(&mut self, key: String) {
                self.key = key;
            }
            fn label(&self) -> &str {
                "Jump"
            }
            fn role(&self) -> Role {
                Role::Button
            }
            fn setup(&mut self, cx: &mut FocusCx<'_>, _interrupt: bool) -> FocusResult<bool> {
                cx.push_handler(self.keys.id());
                Ok(true)
            }
            fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
                cx.pop_handler(self.keys.id());
                Ok(true)
            }
            fn dispatch(&mut self, target: DispatcherId, event: &InputEvent, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
                if target == self.keys.id() {
                    return deliver(self, event, cx);
                }
                Ok(Outcome::Ignored)
            }
        }

        let mut keys = Dispatcher::new();
        keys.bind_press(Chord::new(Key::Enter), ());
        let mut h = harness(&Transcript::new());
        let mut screen = Screen::new("")
            .with("jump", Jump { key: String::new(), keys })
            .and_then(|s| s.with("other", Leaf::text("Other")))
            .and_then(|s| s.with("apply", Leaf::button("Apply")))
            .unwrap();
        screen.setup(&mut h.cx(), true).unwrap();

        let out = tap(&mut screen, &mut h, Chord::new(Key::Enter));
        assert_eq!(out, Outcome::Changed(2));
        assert_eq!(screen.current_key(), Some("apply"));
        assert_eq!(screen.position(), 2);
    }

    #[test]
    fn test_dialog_opens_after_delay_and_restores_focus() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        h.caption = "Game".into();
        let mut screen = settings();
        screen.setup(&mut h.cx(), true).unwrap();
        tap(&mut screen, &mut h, Chord::new(Key::Tab));

        let confirm = Screen::dialog("Quit?")
            .with("yes", Leaf::button("Yes"))
            .and_then(|s| s.with("no", Leaf::button("No")))
            .unwrap();
        let key = screen.open_dialog(confirm, "Confirm").unwrap();
        assert_eq!(key, "dialog-Confirm-1");
        assert_eq!(screen.current_key(), Some("back"));

        let delay = RuntimeConfig::default().dialog_delay();
        screen.update(delay, &mut h.cx()).unwrap();
        assert_eq!(screen.current_key(), Some("dialog-Confirm-1"));
        assert_eq!(h.caption, "Confirm dialog");
        assert_eq!(h.handlers.len(), 3);

        // Tab stays inside the dialog.
        tap(&mut screen, &mut h, Chord::new(Key::Tab));
        assert_eq!(screen.focused_path_name(), "No button");

        assert_eq!(tap(&mut screen, &mut h, Chord::new(Key::Escape)), Outcome::Handled);
        assert_eq!(h.caption, "Game");
        screen.update(delay, &mut h.cx()).unwrap();
        assert_eq!(screen.current_key(), Some("back"));
        assert_eq!(screen.position(), 1);
        assert_eq!(screen.dialog_key(), None);
        assert!(!screen.elements().contains(&key));
        assert_eq!(h.handlers.len(), 2);
    }

    #[test]
    fn test_second_dialog_replaces_pending_one() {
        let mut h = harness(&Transcript::new());
        let mut screen = settings();
        screen.setup(&mut h.cx(), true).unwrap();

        screen.open_dialog(Screen::dialog("One"), "One").unwrap();
        screen.open_dialog(Screen::dialog("Two"), "Two").unwrap();
        assert_eq!(screen.elements().len(), 4);
        assert_eq!(screen.dialog_key(), Some("dialog-Two-2"));

        screen.update(Duration::from_secs(1), &mut h.cx()).unwrap();
        assert_eq!(screen.current_key(), Some("dialog-Two-2"));
    }

    #[test]
    fn test_menu_bar_opens_on_f10_and_restores_element() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        let mut bar = MenuBar::new();
        bar.add_menu("game", "Game", Menu::with_items("", &[("new", "New game")]).unwrap())
            .unwrap();
        let mut screen = settings().with_menu_bar(bar);
        screen.setup(&mut h.cx(), true).unwrap();
        tap(&mut screen, &mut h, Chord::new(Key::Tab));

        tap(&mut screen, &mut h, Chord::new(Key::F(10)));
        assert!(screen.is_menu_bar_open());
        assert_eq!(screen.current_key(), None);
        assert_eq!(transcript.last().as_deref(), Some("Game submenu"));

        tap(&mut screen, &mut h, Chord::new(Key::ArrowDown));
        let out = tap(&mut screen, &mut h, Chord::new(Key::Enter));
        assert_eq!(out, Outcome::Submitted("new".into()));
        assert!(!screen.is_menu_bar_open());
        assert_eq!(screen.current_key(), Some("back"));
        assert_eq!(h.handlers.len(), 2);

        tap(&mut screen, &mut h, Chord::new(Key::F(10)));
        tap(&mut screen, &mut h, Chord::new(Key::Escape));
        assert!(!screen.is_menu_bar_open());
        assert_eq!(screen.current_key(), Some("back"));
    }

    #[test]
    fn test_tab_is_held_while_menu_bar_is_open() {
        let mut h = harness(&Transcript::new());
        let mut bar = MenuBar::new();
        bar.add_menu("game", "Game", Menu::with_items("", &[("new", "New game")]).unwrap())
            .unwrap();
        let mut screen = Screen::new("")
            .with("a", Leaf::button("A"))
            .and_then(|s| s.with("b", Leaf::button("B")))
            .unwrap()
            .with_menu_bar(bar);
        screen.setup(&mut h.cx(), true).unwrap();
        tap(&mut screen, &mut h, Chord::new(Key::F(10)));
        assert_eq!(h.handlers.len(), 2);

        assert_eq!(tap(&mut screen, &mut h, Chord::new(Key::Tab)), Outcome::Handled);
        assert_eq!(tap(&mut screen, &mut h, Chord::shift(Key::Tab)), Outcome::Handled);
        assert_eq!(screen.goto("b", &mut h.cx()).unwrap(), Outcome::Handled);
        assert!(screen.is_menu_bar_open());
        assert_eq!(screen.current_key(), None);
        assert_eq!(h.handlers.len(), 2);
        assert_eq!(screen.focused_path_name(), "Game submenu");

        tap(&mut screen, &mut h, Chord::new(Key::Escape));
        assert_eq!(screen.current_key(), Some("a"));
        tap(&mut screen, &mut h, Chord::new(Key::Tab));
        assert_eq!(screen.current_key(), Some("b"));
        assert_eq!(h.handlers.len(), 2);
    }
}
