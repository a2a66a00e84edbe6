//! Vertical lists of units with arrow, Home/End and first-letter navigation.
//!
//! A [`Menu`] owns its items through a [`Transitions`] engine, so moving the
//! highlight is always a guarded focus change: the old item exits, the new one
//! is set up and announces itself.

use std::time::Duration;

use auric_core::*;

use crate::leaf::Leaf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuOptions {
    /// Stop at the ends with a boundary cue instead of wrapping.
    pub has_border: bool,
    pub default_position: usize,
    /// Go back to `default_position` on every entry.
    pub reset_position_on_focus: bool,
    pub letter_navigation: bool,
    pub letter_debounce: Duration,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            has_border: false,
            default_position: 0,
            reset_position_on_focus: false,
            letter_navigation: true,
            letter_debounce: RuntimeConfig::default().letter_debounce(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Previous,
    Next,
    First,
    Last,
    Submit,
    Letter,
}

pub struct Menu {
    key: String,
    label: String,
    items: Transitions,
    position: usize,
    options: MenuOptions,
    keys: Dispatcher<MenuAction>,
    letters: Deferred<String>,
    sounds: SoundSet,
}

impl Menu {
    /// An empty label makes the menu silent on entry; only the item speaks.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_options(label, MenuOptions::default())
    }

    pub fn with_options(label: impl Into<String>, options: MenuOptions) -> Self {
        let mut keys = Dispatcher::new().with_motion_gate();
        keys.bind_motion(Motion::Up, MenuAction::Previous);
        keys.bind_motion(Motion::Down, MenuAction::Next);
        keys.bind_motion(Motion::Home, MenuAction::First);
        keys.bind_motion(Motion::End, MenuAction::Last);
        keys.bind_press(Chord::new(Key::Enter), MenuAction::Submit);
        if options.letter_navigation {
            keys.bind_text(MenuAction::Letter);
        }
        Self {
            key: String::new(),
            label: label.into(),
            items: Transitions::new(),
            position: options.default_position,
            options,
            keys,
            letters: Deferred::new(),
            sounds: SoundSet::default(),
        }
    }

    /// Builds a menu of plain labels. Keys must be present and unique.
    pub fn with_items(label: impl Into<String>, items: &[(&str, &str)]) -> Result<Self, ConfigError> {
        let mut menu = Self::new(label);
        for &(key, text) in items {
            menu.add_item(key, text)?;
        }
        Ok(menu)
    }

    pub fn with_sounds(mut self, sounds: SoundSet) -> Self {
        self.sounds = sounds;
        self
    }

    pub fn with_border(mut self, has_border: bool) -> Self {
        self.options.has_border = has_border;
        self
    }

    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        self.options.letter_debounce = config.letter_debounce();
        self.keys.set_repeat_interval(config.repeat_interval());
        self
    }

    pub fn add(&mut self, key: impl Into<String>, unit: Box<dyn Unit>) -> Result<(), ConfigError> {
        self.items.add(key, unit)
    }

    pub fn add_item(&mut self, key: &str, text: &str) -> Result<(), ConfigError> {
        self.add(key, Box::new(Leaf::text(text)))
    }

    pub fn items(&self) -> &Transitions {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Transitions {
        &mut self.items
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn options(&self) -> &MenuOptions {
        &self.options
    }

    pub fn current_item_key(&self) -> Option<&str> {
        self.items.current_key()
    }

    pub fn dispatcher_id(&self) -> DispatcherId {
        self.keys.id()
    }

    fn enter_position(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<Transition> {
        let Some(key) = self.items.key_at(self.position).map(str::to_owned) else {
            return Ok(Transition::Changed);
        };
        self.items.change(&key, cx, interrupt)
    }

    /// Pushes the dispatcher and enters the item at `position`.
    fn enter(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        cx.push_handler(self.keys.id());
        if self.options.reset_position_on_focus {
            self.position = self.options.default_position;
        }
        if self.position >= self.items.len() {
            self.position = 0;
        }
        self.enter_position(cx, interrupt)?;
        Ok(true)
    }

    /// Entry without announcing the menu's own name, for a header that has
    /// already spoken for it.
    pub fn setup_quietly(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        self.enter(cx, false)
    }

    /// Changes to the item at `index`; the position follows only if the
    /// change went through.
    pub fn move_to(&mut self, index: usize, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        let Some(key) = self.items.key_at(index).map(str::to_owned) else {
            return Ok(Outcome::Ignored);
        };
        cx.cue(&self.sounds, Cue::Scroll);
        match self.items.change(&key, cx, true)? {
            Transition::Changed => {
                self.position = index;
                Ok(Outcome::Changed(index))
            }
            Transition::ExitVetoed | Transition::EntryVetoed => Ok(Outcome::Handled),
        }
    }

    fn boundary(&mut self, cx: &mut FocusCx<'_>) -> Outcome {
        cx.cue(&self.sounds, Cue::Boundary);
        Outcome::Boundary
    }

    pub fn next(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        let len = self.items.len();
        if len == 0 {
            return Ok(self.boundary(cx));
        }
        let target = if self.position + 1 < len {
            self.position + 1
        } else if len == 1 {
            0
        } else if self.options.has_border {
            return Ok(self.boundary(cx));
        } else {
            0
        };
        self.move_to(target, cx)
    }

    pub fn previous(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        let len = self.items.len();
        if len == 0 {
            return Ok(self.boundary(cx));
        }
        let target = if self.position > 0 {
            self.position - 1
        } else if len == 1 {
            0
        } else if self.options.has_border {
            return Ok(self.boundary(cx));
        } else {
            len - 1
        };
        self.move_to(target, cx)
    }

    fn first(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        if self.position == 0 || self.items.is_empty() {
            return Ok(Outcome::Handled);
        }
        self.move_to(0, cx)
    }

    fn last(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        let Some(last) = self.items.len().checked_sub(1) else {
            return Ok(Outcome::Handled);
        };
        if self.position == last {
            return Ok(Outcome::Handled);
        }
        self.move_to(last, cx)
    }

    fn letter(&mut self, c: char) -> Outcome {
        if !c.is_alphanumeric() {
            return Outcome::Ignored;
        }
        let mut buffer = self.letters.cancel().unwrap_or_default();
        buffer.push(c);
        self.letters.schedule(self.options.letter_debounce, buffer);
        Outcome::Handled
    }

    /// Index the letter buffer points at, if any item matches.
    fn match_letters(&self, buffer: &str) -> Option<usize> {
        let wanted: Vec<char> = buffer.to_lowercase().chars().collect();
        let first = *wanted.first()?;
        let labels: Vec<String> = self.items.units().map(|u| u.label().to_lowercase()).collect();
        let len = labels.len();

        if wanted.iter().all(|&c| c == first) {
            // One letter repeated: step through items with that initial.
            let mut index = self.position;
            for _ in 0..wanted.len() {
                index = (1..=len)
                    .map(|step| (index + step) % len)
                    .find(|&i| labels[i].starts_with(first))?;
            }
            return Some(index);
        }
        let prefix: String = wanted.into_iter().collect();
        labels.iter().position(|l| l.starts_with(&prefix))
    }

    fn resolve_letters(&mut self, buffer: &str, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        match self.match_letters(buffer) {
            Some(index) => {
                self.move_to(index, cx)?;
            }
            None => {
                log::debug!("no item matches {buffer:?}");
                cx.cue(&self.sounds, Cue::Boundary);
            }
        }
        Ok(())
    }
}

impl Handler for Menu {
    type Action = MenuAction;

    fn dispatcher(&mut self) -> &mut Dispatcher<MenuAction> {
        &mut self.keys
    }

    fn invoke(&mut self, call: Invocation<MenuAction>, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        match call.action {
            MenuAction::Previous => self.previous(cx),
            MenuAction::Next => self.next(cx),
            MenuAction::First => self.first(cx),
            MenuAction::Last => self.last(cx),
            MenuAction::Submit => Ok(match self.items.current_key() {
                Some(key) => {
                    let key = key.to_owned();
                    cx.cue(&self.sounds, Cue::Submit);
                    Outcome::Submitted(key)
                }
                None => Outcome::Ignored,
            }),
            MenuAction::Letter => Ok(call.char().map_or(Outcome::Ignored, |c| self.letter(c))),
        }
    }
}

impl Unit for Menu {
    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn role(&self) -> Role {
        Role::Menu
    }

    fn value(&self) -> String {
        self.items.current().value()
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        let announced = !self.label.is_empty();
        if announced {
            cx.speak(&self.name(), interrupt);
        }
        self.enter(cx, interrupt && !announced)
    }

    fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        pump_repeats(self, dt, cx)?;
        if let Some(buffer) = self.letters.tick(dt) {
            self.resolve_letters(&buffer, cx)?;
        }
        self.items.update(dt, cx)
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        if !self.items.exit(cx)? {
            return Ok(false);
        }
        self.letters.cancel();
        cx.pop_handler(self.keys.id());
        Ok(true)
    }

    fn reset(&mut self) {
        self.position = self.options.default_position;
        self.letters.cancel();
        self.items.reset_all();
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
        self.items.dispatch(target, event, cx)
    }

    fn focused_path_name(&self) -> String {
        if self.items.is_empty_current() {
            return self.name();
        }
        self.items.current().focused_path_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness(transcript: &Transcript) -> Harness {
        Harness::new(
            Box::new(transcript.clone()),
            Box::new(NoSound),
            Box::new(MemoryClipboard::new()),
        )
    }

    fn fruit() -> Menu {
        Menu::with_items(
            "Fruit",
            &[
                ("apple", "Apple"),
                ("banana", "Banana"),
                ("blueberry", "Blueberry"),
                ("cherry", "Cherry"),
            ],
        )
        .unwrap()
    }

    fn motion(menu: &mut Menu, h: &mut Harness, m: Motion) -> Outcome {
        let id = menu.dispatcher_id();
        let out = menu.dispatch(id, &InputEvent::Motion(m), &mut h.cx()).unwrap();
        menu.dispatch(id, &InputEvent::Release(Chord::new(Key::ArrowDown)), &mut h.cx())
            .unwrap();
        out
    }

    #[test]
    fn test_bordered_menu_stops_at_both_ends() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        let mut menu = fruit().with_border(true);
        menu.setup(&mut h.cx(), true).unwrap();
        assert_eq!(menu.position(), 0);

        assert_eq!(motion(&mut menu, &mut h, Motion::Up), Outcome::Boundary);
        assert_eq!(menu.position(), 0);
        for expected in 1..=3 {
            assert_eq!(motion(&mut menu, &mut h, Motion::Down), Outcome::Changed(expected));
        }
        assert_eq!(menu.position(), 3);
        assert_eq!(motion(&mut menu, &mut h, Motion::Down), Outcome::Boundary);
        assert_eq!(menu.current_item_key(), Some("cherry"));
    }

    #[test]
    fn test_borderless_menu_wraps_and_speaks_items() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        let mut menu = fruit();
        menu.setup(&mut h.cx(), true).unwrap();
        motion(&mut menu, &mut h, Motion::Up);
        assert_eq!(menu.position(), 3);
        motion(&mut menu, &mut h, Motion::Down);
        assert_eq!(menu.position(), 0);
        motion(&mut menu, &mut h, Motion::End);
        assert_eq!(motion(&mut menu, &mut h, Motion::End), Outcome::Handled);

        insta::assert_snapshot!(
            transcript.joined(),
            @"Fruit menu | Apple | Cherry | Apple | Cherry"
        );
    }

    #[test]
    fn test_gated_motion_is_not_read_twice() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        let mut menu = fruit();
        menu.setup(&mut h.cx(), true).unwrap();
        let id = menu.dispatcher_id();

        menu.dispatch(id, &InputEvent::Motion(Motion::Down), &mut h.cx()).unwrap();
        let again = menu.dispatch(id, &InputEvent::Motion(Motion::Down), &mut h.cx()).unwrap();
        assert_eq!(again, Outcome::Ignored);
        assert_eq!(menu.position(), 1);
    }

    #[test]
    fn test_repeated_letter_cycles_matching_items() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        let mut menu = fruit();
        menu.setup(&mut h.cx(), true).unwrap();
        let id = menu.dispatcher_id();
        let debounce = menu.options().letter_debounce;

        menu.dispatch(id, &InputEvent::Text('b'), &mut h.cx()).unwrap();
        menu.update(debounce, &mut h.cx()).unwrap();
        assert_eq!(menu.current_item_key(), Some("banana"));

        for _ in 0..2 {
            menu.dispatch(id, &InputEvent::Text('b'), &mut h.cx()).unwrap();
        }
        menu.update(Duration::from_millis(100), &mut h.cx()).unwrap();
        assert_eq!(menu.current_item_key(), Some("banana"));
        menu.update(debounce, &mut h.cx()).unwrap();
        assert_eq!(menu.current_item_key(), Some("banana"));

        menu.dispatch(id, &InputEvent::Text('B'), &mut h.cx()).unwrap();
        menu.update(debounce, &mut h.cx()).unwrap();
        assert_eq!(menu.current_item_key(), Some("blueberry"));
    }

    #[test]
    fn test_prefix_letters_and_misses() {
        let sounds = SoundSet {
            boundary: Some("wall".into()),
            ..SoundSet::default()
        };
        let cues = CueLog::new();
        let mut h = Harness::new(
            Box::new(Transcript::new()),
            Box::new(cues.clone()),
            Box::new(MemoryClipboard::new()),
        );
        let mut menu = fruit().with_sounds(sounds);
        menu.setup(&mut h.cx(), true).unwrap();
        let id = menu.dispatcher_id();
        let debounce = menu.options().letter_debounce;

        for c in "bl".chars() {
            menu.dispatch(id, &InputEvent::Text(c), &mut h.cx()).unwrap();
        }
        menu.update(debounce, &mut h.cx()).unwrap();
        assert_eq!(menu.current_item_key(), Some("blueberry"));

        menu.dispatch(id, &InputEvent::Text('z'), &mut h.cx()).unwrap();
        menu.update(debounce, &mut h.cx()).unwrap();
        assert_eq!(menu.current_item_key(), Some("blueberry"));
        assert_eq!(cues.played(), vec!["wall"]);
    }

    #[test]
    fn test_single_item_reannounces() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        let mut menu = Menu::with_items("", &[("only", "Only")]).unwrap();
        menu.setup(&mut h.cx(), true).unwrap();
        assert_eq!(motion(&mut menu, &mut h, Motion::Down), Outcome::Changed(0));
        assert_eq!(transcript.lines(), vec!["Only", "Only"]);
    }

    #[test]
    fn test_submit_and_exit_restore_stack() {
        let transcript = Transcript::new();
        let mut h = harness(&transcript);
        let mut menu = fruit();
        menu.setup(&mut h.cx(), true).unwrap();
        motion(&mut menu, &mut h, Motion::Down);

        let id = menu.dispatcher_id();
        let out = menu
            .dispatch(id, &InputEvent::Press(Chord::new(Key::Enter)), &mut h.cx())
            .unwrap();
        assert_eq!(out, Outcome::Submitted("banana".into()));
        assert_eq!(menu.focused_path_name(), "Banana");

        assert!(menu.exit(&mut h.cx()).unwrap());
        assert!(h.handlers.is_empty());
        menu.reset();
        assert_eq!(menu.position(), 0);
    }

    #[test]
    fn test_with_items_rejects_duplicates() {
        let err = Menu::with_items("Bad", &[("a", "A"), ("a", "B")]).err();
        assert!(matches!(err, Some(ConfigError::DuplicateKey(k)) if k == "a"));
        assert!(matches!(
            Menu::with_items("Bad", &[("", "A")]).err(),
            Some(ConfigError::MissingKey)
        ));
    }
}
