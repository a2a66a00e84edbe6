use std::time::Duration;

use auric_core::*;

/// The closed set of simple leaf units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeafKind {
    Label,
    Button,
    Checkbox {
        checked: bool,
        default: bool,
    },
    Toggle {
        items: Vec<String>,
        position: usize,
        default: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafAction {
    Activate,
}

pub struct Leaf {
    key: String,
    label: String,
    kind: LeafKind,
    keys: Dispatcher<LeafAction>,
    sounds: SoundSet,
}

impl Leaf {
    fn build(label: impl Into<String>, kind: LeafKind) -> Self {
        let mut keys = Dispatcher::new();
        if kind != LeafKind::Label {
            keys.bind_press(Chord::new(Key::Enter), LeafAction::Activate);
            keys.bind_press(Chord::new(Key::Space), LeafAction::Activate);
        }
        Self {
            key: String::new(),
            label: label.into(),
            kind,
            keys,
            sounds: SoundSet::default(),
        }
    }

    /// Static text. Pushes no dispatcher.
    pub fn text(label: impl Into<String>) -> Self {
        Self::build(label, LeafKind::Label)
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::build(label, LeafKind::Button)
    }

    pub fn checkbox(label: impl Into<String>, checked: bool) -> Self {
        Self::build(
            label,
            LeafKind::Checkbox {
                checked,
                default: checked,
            },
        )
    }

    pub fn toggle<I, S>(label: impl Into<String>, items: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(ConfigError::Empty("toggle button"));
        }
        Ok(Self::build(
            label,
            LeafKind::Toggle {
                items,
                position: 0,
                default: 0,
            },
        ))
    }

    pub fn with_sounds(mut self, sounds: SoundSet) -> Self {
        self.sounds = sounds;
        self
    }

    /// Picks up the default auto-repeat for Enter and Space.
    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        self.keys.set_repeat_interval(config.repeat_interval());
        self
    }

    pub fn kind(&self) -> &LeafKind {
        &self.kind
    }

    pub fn is_checked(&self) -> Option<bool> {
        match self.kind {
            LeafKind::Checkbox { checked, .. } => Some(checked),
            _ => None,
        }
    }

    fn state_word(&self) -> Option<&str> {
        match &self.kind {
            LeafKind::Checkbox { checked: true, .. } => Some("Checked"),
            LeafKind::Checkbox { checked: false, .. } => Some("Unchecked"),
            LeafKind::Toggle {
                items, position, ..
            } => items.get(*position).map(String::as_str),
            LeafKind::Label | LeafKind::Button => None,
        }
    }

    fn activate(&mut self, cx: &mut FocusCx<'_>) -> Outcome {
        match &mut self.kind {
            LeafKind::Label => Outcome::Ignored,
            LeafKind::Button => {
                cx.cue(&self.sounds, Cue::Submit);
                Outcome::Submitted(self.key.clone())
            }
            LeafKind::Checkbox { checked, .. } => {
                *checked = !*checked;
                let index = usize::from(*checked);
                cx.cue(&self.sounds, Cue::Select);
                cx.say(self.state_word().unwrap_or_default(), true);
                Outcome::Changed(index)
            }
            LeafKind::Toggle {
                items, position, ..
            } => {
                *position = (*position + 1) % items.len();
                let index = *position;
                cx.cue(&self.sounds, Cue::Scroll);
                cx.say(self.state_word().unwrap_or_default(), true);
                Outcome::Changed(index)
            }
        }
    }
}

impl Handler for Leaf {
    type Action = LeafAction;

    fn dispatcher(&mut self) -> &mut Dispatcher<LeafAction> {
        &mut self.keys
    }

    fn invoke(&mut self, call: Invocation<LeafAction>, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        match call.action {
            LeafAction::Activate => Ok(self.activate(cx)),
        }
    }
}

impl Unit for Leaf {
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
        match self.kind {
            LeafKind::Label => Role::Label,
            LeafKind::Button => Role::Button,
            LeafKind::Checkbox { .. } => Role::Checkbox,
            LeafKind::Toggle { .. } => Role::Toggle,
        }
    }

    fn value(&self) -> String {
        self.state_word().unwrap_or(&self.label).to_owned()
    }

    fn name(&self) -> String {
        let name = spoken_name(&self.label, self.role());
        match self.state_word() {
            Some(state) => format!("{name} {state}"),
            None => name,
        }
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        cx.speak(&self.name(), interrupt);
        if self.keys.has_bindings() {
            cx.push_handler(self.keys.id());
        }
        Ok(true)
    }

    fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        pump_repeats(self, dt, cx)
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        if self.keys.has_bindings() {
            cx.pop_handler(self.keys.id());
        }
        Ok(true)
    }

    fn reset(&mut self) {
        match &mut self.kind {
            LeafKind::Checkbox { checked, default } => *checked = *default,
            LeafKind::Toggle {
                position, default, ..
            } => *position = *default,
            LeafKind::Label | LeafKind::Button => {}
        }
    }

    fn dispatch(
        &mut self,
        target: DispatcherId,
        event: &InputEvent,
        cx: &mut FocusCx<'_>,
    ) -> FocusResult<Outcome> {
        if target != self.keys.id() {
            return Ok(Outcome::Ignored);
        }
        deliver(self, event, cx)
    }
}
