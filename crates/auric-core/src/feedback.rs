use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    /// Cut off whatever is being spoken first.
    pub interrupt: bool,
}

/// Non-speech feedback a unit can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Open,
    Scroll,
    Boundary,
    Select,
    Typing,
    Delete,
    Submit,
}

/// What an operation wants said and played. Producing it has no side effects;
/// the unit hands it to the bridges through `FocusCx::emit`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feedback {
    pub speech: SmallVec<[Utterance; 2]>,
    pub cue: Option<Cue>,
}

impl Feedback {
    pub fn silent() -> Self {
        Self::default()
    }

    /// Interrupting utterance.
    pub fn say(text: impl Into<String>) -> Self {
        Self::silent().then(text, true)
    }

    /// Queued utterance.
    pub fn queue(text: impl Into<String>) -> Self {
        Self::silent().then(text, false)
    }

    pub fn then(mut self, text: impl Into<String>, interrupt: bool) -> Self {
        self.speech.push(Utterance {
            text: text.into(),
            interrupt,
        });
        self
    }

    pub fn with_cue(mut self, cue: Cue) -> Self {
        self.cue = Some(cue);
        self
    }

    /// Appends `other`'s speech; its cue wins only if this one has none.
    pub fn and(mut self, other: Feedback) -> Self {
        self.speech.extend(other.speech);
        self.cue = self.cue.or(other.cue);
        self
    }

    pub fn is_silent(&self) -> bool {
        self.speech.is_empty() && self.cue.is_none()
    }

    pub fn spoken(&self) -> Vec<&str> {
        self.speech.iter().map(|u| u.text.as_str()).collect()
    }
}

/// Effect ids for each cue. A cue without an id stays silent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSet {
    pub open: Option<String>,
    pub scroll: Option<String>,
    pub boundary: Option<String>,
    pub select: Option<String>,
    pub typing: Option<String>,
    pub delete: Option<String>,
    pub submit: Option<String>,
}

impl SoundSet {
    pub fn effect(&self, cue: Cue) -> Option<&str> {
        match cue {
            Cue::Open => self.open.as_deref(),
            Cue::Scroll => self.scroll.as_deref(),
            Cue::Boundary => self.boundary.as_deref(),
            Cue::Select => self.select.as_deref(),
            Cue::Typing => self.typing.as_deref(),
            Cue::Delete => self.delete.as_deref(),
            Cue::Submit => self.submit.as_deref(),
        }
    }
}
