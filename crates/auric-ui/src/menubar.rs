use std::time::Duration;

use auric_core::*;

use crate::menu::Menu;

/// Where a menu bar is in its open/expand cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarState {
    #[default]
    Closed,
    /// Open; headers are announced but their menus stay shut.
    Collapsed,
    Expanded,
}

/// One header of a [`MenuBar`]. Collapsed it only speaks its name; expanded
/// it enters its menu.
pub struct MenuBarItem {
    key: String,
    label: String,
    menu: Menu,
    expanded: bool,
}

impl MenuBarItem {
    /// The menu's own label is ignored; the header speaks for it.
    pub fn new(label: impl Into<String>, menu: Menu) -> Self {
        Self {
            key: String::new(),
            label: label.into(),
            menu,
            expanded: false,
        }
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

impl Unit for MenuBarItem {
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
        Role::Submenu
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        cx.speak(&self.name(), interrupt);
        if self.expanded {
            return self.menu.setup_quietly(cx);
        }
        Ok(true)
    }

    fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        if self.expanded {
            self.menu.update(dt, cx)?;
        }
        Ok(())
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        if self.expanded {
            return self.menu.exit(cx);
        }
        Ok(true)
    }

    fn reset(&mut self) {
        self.expanded = false;
        self.menu.reset();
    }

    fn dispatch(
        &mut self,
        target: DispatcherId,
        event: &InputEvent,
        cx: &mut FocusCx<'_>,
    ) -> FocusResult<Outcome> {
        if !self.expanded {
            return Ok(Outcome::Ignored);
        }
        self.menu.dispatch(target, event, cx)
    }

    fn focused_path_name(&self) -> String {
        if self.expanded {
            self.menu.focused_path_name()
        } else {
            self.name()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarAction {
    Previous,
    Next,
    Expand,
    Escape,
}

/// Row of menu headers. Left/Right walk the headers with wrap, Up/Down
/// expand them, Escape collapses and then closes.
pub struct MenuBar {
    key: String,
    headers: Transitions,
    position: usize,
    state: BarState,
    keys: Dispatcher<BarAction>,
    sounds: SoundSet,
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuBar {
    pub fn new() -> Self {
        let mut keys = Dispatcher::new().with_motion_gate();
        keys.bind_motion(Motion::Left, BarAction::Previous);
        keys.bind_motion(Motion::Right, BarAction::Next);
        keys.bind_motion(Motion::Up, BarAction::Expand);
        keys.bind_motion(Motion::Down, BarAction::Expand);
        keys.bind_press(Chord::new(Key::Escape), BarAction::Escape);
        Self {
            key: String::new(),
            headers: Transitions::new(),
            position: 0,
            state: BarState::Closed,
            keys,
            sounds: SoundSet::default(),
        }
    }

    pub fn with_sounds(mut self, sounds: SoundSet) -> Self {
        self.sounds = sounds;
        self
    }

    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        self.keys.set_repeat_interval(config.repeat_interval());
        self
    }

    pub fn add_menu(&mut self, key: impl Into<String>, label: impl Into<String>, menu: Menu) -> Result<(), ConfigError> {
        self.headers.add(key, Box::new(MenuBarItem::new(label, menu)))
    }

    pub fn state(&self) -> BarState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn headers(&self) -> &Transitions {
        &self.headers
    }

    pub fn header_mut(&mut self, key: &str) -> Option<&mut MenuBarItem> {
        self.headers.get_as_mut(key)
    }

    pub fn dispatcher_id(&self) -> DispatcherId {
        self.keys.id()
    }

    fn enter_position(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<()> {
        if let Some(key) = self.headers.key_at(self.position).map(str::to_owned) {
            self.headers.change(&key, cx, interrupt)?;
        }
        Ok(())
    }

    fn set_expanded(&mut self, expanded: bool) {
        let keys: Vec<String> = self.headers.keys().map(str::to_owned).collect();
        for key in keys {
            if let Some(item) = self.headers.get_as_mut::<MenuBarItem>(&key) {
                item.expanded = expanded;
            }
        }
    }

    /// Leaves the current header, flips every header, and enters it again.
    fn refold(&mut self, state: BarState, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        if !self.headers.exit(cx)? {
            return Ok(Outcome::Handled);
        }
        self.set_expanded(state == BarState::Expanded);
        self.state = state;
        log::debug!("menu bar {state:?}");
        self.enter_position(cx, true)?;
        Ok(Outcome::Handled)
    }

    fn step(&mut self, forward: bool, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        let len = self.headers.len();
        if len == 0 {
            return Ok(Outcome::Ignored);
        }
        let target = if forward {
            (self.position + 1) % len
        } else {
            (self.position + len - 1) % len
        };
        let Some(key) = self.headers.key_at(target).map(str::to_owned) else {
            return Ok(Outcome::Ignored);
        };
        cx.cue(&self.sounds, Cue::Scroll);
        if self.headers.change(&key, cx, true)? == Transition::Changed {
            self.position = target;
        }
        Ok(Outcome::Changed(self.position))
    }
}

impl Handler for MenuBar {
    type Action = BarAction;

    fn dispatcher(&mut self) -> &mut Dispatcher<BarAction> {
        &mut self.keys
    }

    fn invoke(&mut self, call: Invocation<BarAction>, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        match call.action {
            BarAction::Previous => self.step(false, cx),
            BarAction::Next => self.step(true, cx),
            BarAction::Expand => match self.state {
                BarState::Collapsed => {
                    cx.cue(&self.sounds, Cue::Open);
                    self.refold(BarState::Expanded, cx)
                }
                BarState::Expanded | BarState::Closed => Ok(Outcome::Ignored),
            },
            BarAction::Escape => match self.state {
                BarState::Expanded => self.refold(BarState::Collapsed, cx),
                BarState::Collapsed | BarState::Closed => Ok(Outcome::Close),
            },
        }
    }
}

impl Unit for MenuBar {
    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn label(&self) -> &str {
        ""
    }

    fn role(&self) -> Role {
        Role::MenuBar
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        if self.headers.is_empty() {
            return Err(ConfigError::Empty("menu bar").into());
        }
        cx.speak(&self.name(), interrupt);
        cx.push_handler(self.keys.id());
        self.state = BarState::Collapsed;
        self.enter_position(cx, false)?;
        Ok(true)
    }

    fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        pump_repeats(self, dt, cx)?;
        self.headers.update(dt, cx)
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        if !self.headers.exit(cx)? {
            return Ok(false);
        }
        self.set_expanded(false);
        self.state = BarState::Closed;
        self.position = 0;
        cx.pop_handler(self.keys.id());
        Ok(true)
    }

    fn reset(&mut self) {
        self.position = 0;
        self.headers.reset_all();
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
        self.headers.dispatch(target, event, cx)
    }

    fn focused_path_name(&self) -> String {
        if self.headers.is_empty_current() {
            return self.name();
        }
        self.headers.current().focused_path_name()
    }
}
