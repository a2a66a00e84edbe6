use std::time::Duration;

use auric_core::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: usize = 80;
pub const DEFAULT_ALLOWED: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    " !@#$%^&*()_+-=`~[]{}\\;:'\",<.>/?",
);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFieldOptions {
    pub capacity: usize,
    /// Characters that may be typed; anything else is dropped.
    pub allowed: String,
    pub hidden: bool,
    pub echo_characters: bool,
    pub echo_words: bool,
    pub read_only: bool,
    /// Up/Down read back the whole value.
    pub read_on_vertical: bool,
}

impl Default for TextFieldOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            allowed: DEFAULT_ALLOWED.to_owned(),
            hidden: false,
            echo_characters: true,
            echo_words: true,
            read_only: false,
            read_on_vertical: true,
        }
    }
}

impl TextFieldOptions {
    pub fn allows(&self, c: char) -> bool {
        self.allowed.contains(c)
    }
}

/// Which end of the selection is moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Direction {
    #[default]
    None,
    Left,
    Right,
}

/// Character buffer with a cursor and a two-sided selection.
///
/// `position` is in `0..=len`; `len` is the empty trailing slot. The
/// selection is `[left, right)` and only exists while both ends are set and
/// `left < right`. Every operation returns the [`Feedback`] it wants spoken;
/// nothing here talks to a bridge.
#[derive(Clone, Debug)]
pub struct Editor {
    buffer: Vec<char>,
    position: usize,
    left: Option<usize>,
    right: Option<usize>,
    direction: Direction,
    options: TextFieldOptions,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(TextFieldOptions::default())
    }
}

impl Editor {
    pub fn new(options: TextFieldOptions) -> Self {
        Self {
            buffer: Vec::new(),
            position: 0,
            left: None,
            right: None,
            direction: Direction::None,
            options,
        }
    }

    pub fn options(&self) -> &TextFieldOptions {
        &self.options
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Replaces the buffer, truncated to capacity, with the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.chars().take(self.options.capacity).collect();
        self.position = self.buffer.len();
        self.collapse();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn left_index(&self) -> Option<usize> {
        self.left
    }

    pub fn right_index(&self) -> Option<usize> {
        self.right
    }

    pub fn selecting_left(&self) -> bool {
        self.direction == Direction::Left
    }

    pub fn selecting_right(&self) -> bool {
        self.direction == Direction::Right
    }

    pub fn is_selected(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub fn selected_text(&self) -> Option<String> {
        let (l, r) = self.left.zip(self.right)?;
        Some(self.buffer[l..r].iter().collect())
    }

    fn is_fully_selected(&self) -> bool {
        !self.buffer.is_empty() && self.left == Some(0) && self.right == Some(self.buffer.len())
    }

    fn describe(&self, c: char) -> String {
        if self.options.hidden {
            "star".to_owned()
        } else if c == ' ' {
            "space".to_owned()
        } else if c.is_uppercase() {
            format!("Cap {c}")
        } else {
            c.to_string()
        }
    }

    fn describe_at(&self, index: usize) -> String {
        self.buffer
            .get(index)
            .map_or_else(|| "blank".to_owned(), |&c| self.describe(c))
    }

    fn spell(&self, chars: &[char]) -> String {
        if self.options.hidden {
            vec!["star"; chars.len()].join(" ")
        } else {
            chars.iter().collect()
        }
    }

    fn spoken_value(&self) -> String {
        if self.buffer.is_empty() {
            "blank".to_owned()
        } else if self.options.hidden {
            format!("{} stars", self.buffer.len())
        } else {
            self.text()
        }
    }

    fn find_space_from(&self, from: usize) -> Option<usize> {
        self.buffer
            .get(from..)?
            .iter()
            .position(|&c| c == ' ')
            .map(|i| from + i)
    }

    fn rfind_space_before(&self, end: usize) -> Option<usize> {
        self.buffer[..end.min(self.buffer.len())]
            .iter()
            .rposition(|&c| c == ' ')
    }

    fn word_end(&self, start: usize) -> usize {
        self.find_space_from(start).unwrap_or(self.buffer.len())
    }

    /// Start of the word before `pos`, skipping one delimiter directly behind it.
    fn word_start_before(&self, pos: usize) -> usize {
        let mut end = pos;
        if end > 0 && self.buffer.get(end - 1) == Some(&' ') {
            end -= 1;
        }
        self.rfind_space_before(end).map_or(0, |i| i + 1)
    }

    fn spoken_word(&self, start: usize) -> String {
        let end = self.word_end(start);
        if end > start {
            return self.spell(&self.buffer[start..end]);
        }
        match self.buffer.get(start) {
            Some(' ') => "space".to_owned(),
            _ => "blank".to_owned(),
        }
    }

    fn collapse(&mut self) {
        self.left = None;
        self.right = None;
        self.direction = Direction::None;
    }

    /// Drops the selection, saying "Unselected" if it covered anything.
    pub fn clear_selection(&mut self) -> Feedback {
        let had_span = matches!((self.left, self.right), (Some(l), Some(r)) if l != r);
        self.collapse();
        if had_span {
            Feedback::queue("Unselected")
        } else {
            Feedback::silent()
        }
    }

    fn extend_right(&mut self, from: usize, to: usize) {
        match self.direction {
            Direction::None => {
                self.direction = Direction::Right;
                self.left = Some(from);
                self.right = Some(to);
            }
            Direction::Left => {
                self.left = Some(to);
                if self.left >= self.right {
                    self.collapse();
                }
            }
            Direction::Right => self.right = Some(to),
        }
    }

    fn extend_left(&mut self, to: usize, from: usize) {
        match self.direction {
            Direction::None => {
                self.direction = Direction::Left;
                self.left = Some(to);
                self.right = Some(from);
            }
            Direction::Left => self.left = Some(to),
            Direction::Right => {
                self.right = Some(to);
                if self.left >= self.right {
                    self.collapse();
                }
            }
        }
    }

    fn delete_selection(&mut self) {
        if let Some((l, r)) = self.left.zip(self.right) {
            self.buffer.drain(l..r);
            self.position = l;
        }
        self.collapse();
    }

    pub fn move_right(&mut self) -> Feedback {
        let len = self.buffer.len();
        let moved = if self.is_fully_selected() {
            self.position = len;
            Feedback::say("blank")
        } else if self.position >= len {
            Feedback::say("blank").with_cue(Cue::Boundary)
        } else {
            self.position += 1;
            Feedback::say(self.describe_at(self.position))
        };
        moved.and(self.clear_selection())
    }

    pub fn move_left(&mut self) -> Feedback {
        let moved = if self.is_fully_selected() {
            self.position = 0;
            Feedback::say(self.describe_at(0))
        } else if self.position == 0 {
            Feedback::say(self.describe_at(0)).with_cue(Cue::Boundary)
        } else {
            self.position -= 1;
            Feedback::say(self.describe_at(self.position))
        };
        moved.and(self.clear_selection())
    }

    pub fn move_home(&mut self) -> Feedback {
        self.position = 0;
        Feedback::say(self.describe_at(0)).and(self.clear_selection())
    }

    pub fn move_end(&mut self) -> Feedback {
        self.position = self.buffer.len();
        Feedback::say("blank").and(self.clear_selection())
    }

    /// Lands one past the next space, or at the end.
    pub fn move_word_right(&mut self) -> Feedback {
        let len = self.buffer.len();
        let moved = if self.position >= len {
            Feedback::say("blank").with_cue(Cue::Boundary)
        } else {
            match self.find_space_from(self.position) {
                Some(i) => {
                    self.position = i + 1;
                    Feedback::say(self.spoken_word(self.position))
                }
                None => {
                    self.position = len;
                    Feedback::say("blank")
                }
            }
        };
        moved.and(self.clear_selection())
    }

    /// Lands at the start of the previous word.
    pub fn move_word_left(&mut self) -> Feedback {
        let moved = if self.position == 0 {
            Feedback::say(self.spoken_word(0)).with_cue(Cue::Boundary)
        } else {
            self.position = self.word_start_before(self.position);
            Feedback::say(self.spoken_word(self.position))
        };
        moved.and(self.clear_selection())
    }

    fn state_word(&self, shrinking: Direction) -> &'static str {
        if self.direction == shrinking {
            "Unselected"
        } else {
            "Selected"
        }
    }

    pub fn select_right(&mut self) -> Feedback {
        if self.position >= self.buffer.len() {
            return Feedback::silent().with_cue(Cue::Boundary);
        }
        let state = self.state_word(Direction::Left);
        let crossed = self.describe_at(self.position);
        let from = self.position;
        self.position += 1;
        self.extend_right(from, self.position);
        Feedback::say(format!("{crossed} {state}"))
    }

    pub fn select_left(&mut self) -> Feedback {
        if self.position == 0 {
            return Feedback::silent().with_cue(Cue::Boundary);
        }
        let state = self.state_word(Direction::Right);
        let from = self.position;
        self.position -= 1;
        let crossed = self.describe_at(self.position);
        self.extend_left(self.position, from);
        Feedback::say(format!("{crossed} {state}"))
    }

    pub fn select_word_right(&mut self) -> Feedback {
        let len = self.buffer.len();
        if self.position >= len {
            return Feedback::silent().with_cue(Cue::Boundary);
        }
        let state = self.state_word(Direction::Left);
        let from = self.position;
        let crossed = self.spoken_word(from);
        let end = self.word_end(from);
        self.position = if end >= len { len } else { end + 1 };
        self.extend_right(from, self.position);
        Feedback::say(format!("{crossed} {state}"))
    }

    pub fn select_word_left(&mut self) -> Feedback {
        if self.position == 0 {
            return Feedback::silent().with_cue(Cue::Boundary);
        }
        let state = self.state_word(Direction::Right);
        let from = self.position;
        self.position = self.word_start_before(from);
        let crossed = self.spoken_word(self.position);
        self.extend_left(self.position, from);
        Feedback::say(format!("{crossed} {state}"))
    }

    /// No-op when the buffer is empty or already fully selected.
    pub fn select_all(&mut self) -> Feedback {
        let len = self.buffer.len();
        if len == 0 || self.is_fully_selected() {
            return Feedback::silent();
        }
        self.left = Some(0);
        self.right = Some(len);
        self.direction = Direction::Right;
        self.position = len;
        Feedback::say(format!("{} Selected", self.spoken_value()))
    }

    pub fn delete_backward(&mut self) -> Feedback {
        if self.buffer.is_empty() {
            return Feedback::say("blank");
        }
        if self.is_selected() {
            self.delete_selection();
            let before = match self.position {
                0 => "blank".to_owned(),
                p => self.describe_at(p - 1),
            };
            return Feedback::say(before).with_cue(Cue::Delete);
        }
        if self.position == 0 {
            return Feedback::say("blank");
        }
        self.position -= 1;
        let removed = self.buffer.remove(self.position);
        Feedback::say(self.describe(removed)).with_cue(Cue::Delete)
    }

    pub fn delete_forward(&mut self) -> Feedback {
        if self.buffer.is_empty() {
            return Feedback::say("blank");
        }
        if self.is_selected() {
            self.delete_selection();
            return Feedback::say(self.describe_at(self.position)).with_cue(Cue::Delete);
        }
        if self.position >= self.buffer.len() {
            return Feedback::say("blank");
        }
        self.buffer.remove(self.position);
        Feedback::say(self.describe_at(self.position)).with_cue(Cue::Delete)
    }

    /// `None` when `c` is not an allowed character.
    pub fn insert_char(&mut self, c: char) -> Option<Feedback> {
        if !self.options.allows(c) {
            log::debug!("rejected {c:?}: not allowed");
            return None;
        }
        if self.is_selected() {
            self.delete_selection();
        }
        if self.buffer.len() >= self.options.capacity {
            return Some(Feedback::silent().with_cue(Cue::Boundary));
        }
        self.buffer.insert(self.position, c);
        self.position += 1;

        let spoken = if self.options.hidden {
            self.options.echo_characters.then(|| "star".to_owned())
        } else if c == ' ' {
            Some(self.finished_word())
        } else {
            self.options.echo_characters.then(|| self.describe(c))
        };
        let typed = Feedback::silent().with_cue(Cue::Typing);
        Some(match spoken {
            Some(text) => typed.then(text, true),
            None => typed,
        })
    }

    /// The word ended by the space just typed at `position - 1`.
    fn finished_word(&self) -> String {
        if !self.options.echo_words {
            return "space".to_owned();
        }
        let end = self.position - 1;
        let start = self.rfind_space_before(end).map_or(0, |i| i + 1);
        if start == end {
            "space".to_owned()
        } else {
            self.buffer[start..end].iter().collect()
        }
    }

    /// All or nothing: refused if the result would exceed capacity.
    pub fn paste(&mut self, text: &str) -> Feedback {
        let incoming: Vec<char> = text.chars().collect();
        if incoming.is_empty() {
            return Feedback::silent();
        }
        if incoming.len() + self.buffer.len() > self.options.capacity {
            log::debug!("rejected paste of {} chars: over capacity", incoming.len());
            return Feedback::silent().with_cue(Cue::Boundary);
        }
        if self.is_selected() {
            self.delete_selection();
        }
        let count = incoming.len();
        self.buffer.splice(self.position..self.position, incoming);
        self.position += count;
        if self.options.hidden {
            Feedback::say("Pasted")
        } else {
            Feedback::say(format!("Pasted {text}"))
        }
    }

    /// The selected text, with the confirmation to speak.
    pub fn copy(&self) -> Option<(String, Feedback)> {
        let text = self.selected_text()?;
        Some((text, Feedback::say("Copied selection to clipboard")))
    }

    /// Copies the selection and deletes it.
    pub fn cut(&mut self) -> Option<(String, Feedback)> {
        let text = self.selected_text()?;
        self.delete_selection();
        Some((text, Feedback::say("Cut selection to clipboard").with_cue(Cue::Delete)))
    }

    pub fn read_value(&self) -> Feedback {
        Feedback::say(self.spoken_value())
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.position = 0;
        self.collapse();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    Type,
    Motion(Motion),
    SelectLeft,
    SelectRight,
    SelectWordLeft,
    SelectWordRight,
    SelectAll,
    Copy,
    Cut,
    Paste,
    Submit,
}

/// A labelled text entry unit wrapping an [`Editor`].
pub struct TextField {
    key: String,
    label: String,
    editor: Editor,
    keys: Dispatcher<EditAction>,
    sounds: SoundSet,
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_options(label, TextFieldOptions::default())
    }

    pub fn with_options(label: impl Into<String>, options: TextFieldOptions) -> Self {
        let keys = Self::bindings(&options);
        Self {
            key: String::new(),
            label: label.into(),
            editor: Editor::new(options),
            keys,
            sounds: SoundSet::default(),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.editor.set_text(text);
        self
    }

    pub fn with_sounds(mut self, sounds: SoundSet) -> Self {
        self.sounds = sounds;
        self
    }

    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        self.keys.set_repeat_interval(config.repeat_interval());
        self
    }

    fn bindings(options: &TextFieldOptions) -> Dispatcher<EditAction> {
        let mut keys = Dispatcher::new();
        let mut motions = vec![
            Motion::Left,
            Motion::Right,
            Motion::WordLeft,
            Motion::WordRight,
            Motion::Home,
            Motion::End,
        ];
        if options.read_on_vertical {
            motions.extend([Motion::Up, Motion::Down]);
        }
        if !options.read_only {
            motions.extend([Motion::Backspace, Motion::Delete]);
            keys.bind_text(EditAction::Type);
            keys.bind_press(Chord::ctrl(Key::Character('v')), EditAction::Paste);
            keys.bind_press(Chord::ctrl(Key::Character('x')), EditAction::Cut);
        }
        for m in motions {
            keys.bind_motion(m, EditAction::Motion(m));
        }

        let ctrl_shift = Modifiers::CTRL | Modifiers::SHIFT;
        keys.bind_press(Chord::shift(Key::ArrowLeft), EditAction::SelectLeft);
        keys.bind_press(Chord::shift(Key::ArrowRight), EditAction::SelectRight);
        keys.bind_press(Chord::with(Key::ArrowLeft, ctrl_shift), EditAction::SelectWordLeft);
        keys.bind_press(Chord::with(Key::ArrowRight, ctrl_shift), EditAction::SelectWordRight);
        keys.bind_press(Chord::ctrl(Key::Character('a')), EditAction::SelectAll);
        keys.bind_press(Chord::ctrl(Key::Character('c')), EditAction::Copy);
        keys.bind_press(Chord::new(Key::Enter), EditAction::Submit);
        keys
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn text(&self) -> String {
        self.editor.text()
    }

    fn motion(&mut self, motion: Motion) -> Option<Feedback> {
        Some(match motion {
            Motion::Left => self.editor.move_left(),
            Motion::Right => self.editor.move_right(),
            Motion::WordLeft => self.editor.move_word_left(),
            Motion::WordRight => self.editor.move_word_right(),
            Motion::Home => self.editor.move_home(),
            Motion::End => self.editor.move_end(),
            Motion::Up | Motion::Down => self.editor.read_value(),
            Motion::Backspace => self.editor.delete_backward(),
            Motion::Delete => self.editor.delete_forward(),
            Motion::PageUp | Motion::PageDown => return None,
        })
    }
}

impl Handler for TextField {
    type Action = EditAction;

    fn dispatcher(&mut self) -> &mut Dispatcher<EditAction> {
        &mut self.keys
    }

    fn invoke(&mut self, call: Invocation<EditAction>, cx: &mut FocusCx<'_>) -> FocusResult<Outcome> {
        let feedback = match call.action {
            EditAction::Type => match call.char().and_then(|c| self.editor.insert_char(c)) {
                Some(fb) => fb,
                None => return Ok(Outcome::Ignored),
            },
            EditAction::Motion(m) => match self.motion(m) {
                Some(fb) => fb,
                None => return Ok(Outcome::Ignored),
            },
            EditAction::SelectLeft => self.editor.select_left(),
            EditAction::SelectRight => self.editor.select_right(),
            EditAction::SelectWordLeft => self.editor.select_word_left(),
            EditAction::SelectWordRight => self.editor.select_word_right(),
            EditAction::SelectAll => self.editor.select_all(),
            EditAction::Copy => match self.editor.copy() {
                Some((text, fb)) => {
                    cx.clipboard.copy(&text);
                    fb
                }
                None => Feedback::silent(),
            },
            EditAction::Cut => match self.editor.cut() {
                Some((text, fb)) => {
                    cx.clipboard.copy(&text);
                    fb
                }
                None => Feedback::silent(),
            },
            EditAction::Paste => {
                let text = cx.clipboard.paste();
                self.editor.paste(&text)
            }
            EditAction::Submit => {
                cx.cue(&self.sounds, Cue::Submit);
                return Ok(Outcome::Submitted(self.key.clone()));
            }
        };
        cx.emit(&feedback, &self.sounds);
        Ok(Outcome::Handled)
    }
}

impl Unit for TextField {
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
        Role::TextField
    }

    fn value(&self) -> String {
        self.editor.text()
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool> {
        cx.speak(&self.name(), interrupt);
        let value = self.editor.spoken_value();
        if self.editor.options().read_only {
            cx.speak(&format!("Read only {value}"), false);
        } else {
            cx.speak(&value, false);
        }
        cx.push_handler(self.keys.id());
        Ok(true)
    }

    fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        pump_repeats(self, dt, cx)
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        self.editor.collapse();
        cx.pop_handler(self.keys.id());
        Ok(true)
    }

    fn reset(&mut self) {
        self.editor.reset();
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

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> Editor {
        let mut e = Editor::default();
        for c in text.chars() {
            e.insert_char(c).unwrap();
        }
        e
    }

    #[test]
    fn test_textfield_type_then_backspace_round_trip() {
        let mut e = typed("abc");
        assert_eq!(e.text(), "abc");
        assert_eq!(e.position(), 3);
        for _ in 0..3 {
            e.delete_backward();
        }
        assert!(e.is_empty());
        assert_eq!(e.position(), 0);
        assert_eq!(e.delete_backward().spoken(), vec!["blank"]);
    }

    #[test]
    fn test_textfield_select_all_and_clear() {
        let mut e = typed("hello");
        let fb = e.select_all();
        assert_eq!(fb.spoken(), vec!["hello Selected"]);
        assert_eq!(e.left_index(), Some(0));
        assert_eq!(e.right_index(), Some(5));
        assert!(e.is_selected());
        assert_eq!(e.position(), 5);
        assert!(e.select_all().is_silent());

        assert_eq!(e.clear_selection().spoken(), vec!["Unselected"]);
        assert_eq!(e.left_index(), None);
        assert_eq!(e.right_index(), None);
        assert!(!e.is_selected());
    }

    #[test]
    fn test_textfield_word_navigation() {
        let mut e = typed("the quick fox");
        e.move_home();
        assert_eq!(e.move_word_right().spoken(), vec!["quick"]);
        assert_eq!(e.position(), 4);
        assert_eq!(e.move_word_right().spoken(), vec!["fox"]);
        assert_eq!(e.position(), 10);
        assert_eq!(e.move_word_right().spoken(), vec!["blank"]);
        assert_eq!(e.position(), 13);
        assert_eq!(e.move_word_right().cue, Some(Cue::Boundary));

        e.move_word_left();
        assert_eq!(e.position(), 10);
        e.move_word_left();
        assert_eq!(e.position(), 4);
        assert_eq!(e.move_word_left().spoken(), vec!["the"]);
        assert_eq!(e.position(), 0);
    }

    #[test]
    fn test_textfield_paste_respects_capacity() {
        let mut e = Editor::new(TextFieldOptions {
            capacity: 5,
            ..TextFieldOptions::default()
        });
        e.paste("ab");
        let rejected = e.paste("cdefg");
        assert_eq!(rejected.cue, Some(Cue::Boundary));
        assert_eq!(e.text(), "ab");

        assert_eq!(e.paste("cde").spoken(), vec!["Pasted cde"]);
        assert_eq!(e.text(), "abcde");
        assert_eq!(e.position(), 5);
    }

    #[test]
    fn test_textfield_character_moves_and_boundaries() {
        let mut e = typed("Hi");
        assert_eq!(e.move_right().cue, Some(Cue::Boundary));
        assert_eq!(e.position(), 2);
        assert_eq!(e.move_left().spoken(), vec!["i"]);
        assert_eq!(e.move_left().spoken(), vec!["Cap H"]);
        let fb = e.move_left();
        assert_eq!(fb.cue, Some(Cue::Boundary));
        assert_eq!(e.position(), 0);
        assert_eq!(e.move_right().spoken(), vec!["i"]);
        assert_eq!(e.move_right().spoken(), vec!["blank"]);
    }

    #[test]
    fn test_textfield_selection_anchor_and_collapse() {
        let mut e = typed("abcd");
        e.move_home();
        assert_eq!(e.select_right().spoken(), vec!["a Selected"]);
        e.select_right();
        assert!(e.selecting_right());
        assert_eq!(e.selected_text().as_deref(), Some("ab"));

        assert_eq!(e.select_left().spoken(), vec!["b Unselected"]);
        assert_eq!(e.selected_text().as_deref(), Some("a"));
        e.select_left();
        assert!(!e.is_selected());
        assert!(!e.selecting_left() && !e.selecting_right());

        e.move_end();
        e.select_left();
        e.select_left();
        assert!(e.selecting_left());
        assert_eq!((e.left_index(), e.right_index()), (Some(2), Some(4)));
        e.select_right();
        assert_eq!((e.left_index(), e.right_index()), (Some(3), Some(4)));
    }

    #[test]
    fn test_textfield_word_selection() {
        let mut e = typed("one two");
        e.move_home();
        assert_eq!(e.select_word_right().spoken(), vec!["one Selected"]);
        assert_eq!(e.selected_text().as_deref(), Some("one "));
        e.select_word_right();
        assert_eq!(e.selected_text().as_deref(), Some("one two"));
        assert_eq!(e.select_word_right().cue, Some(Cue::Boundary));

        e.move_end();
        assert_eq!(e.select_word_left().spoken(), vec!["two Selected"]);
        assert_eq!(e.selected_text().as_deref(), Some("two"));
    }

    #[test]
    fn test_textfield_typing_replaces_selection_and_rejects() {
        let mut e = typed("hello");
        e.select_all();
        e.insert_char('J').unwrap();
        assert_eq!(e.text(), "J");
        assert!(e.insert_char('\u{e9}').is_none());
        assert!(e.insert_char('\t').is_none());
        assert_eq!(e.text(), "J");

        let mut small = Editor::new(TextFieldOptions {
            capacity: 1,
            ..TextFieldOptions::default()
        });
        small.insert_char('a');
        assert_eq!(small.insert_char('b').map(|f| f.cue), Some(Some(Cue::Boundary)));
        assert_eq!(small.text(), "a");
    }

    #[test]
    fn test_textfield_delete_selection_and_forward() {
        let mut e = typed("abcdef");
        e.move_home();
        e.move_right();
        e.select_right();
        e.select_right();
        let fb = e.delete_backward();
        assert_eq!(e.text(), "adef");
        assert_eq!(e.position(), 1);
        assert_eq!(fb.spoken(), vec!["a"]);
        assert!(!e.is_selected());

        assert_eq!(e.delete_forward().spoken(), vec!["e"]);
        assert_eq!(e.text(), "aef");
        e.move_end();
        assert_eq!(e.delete_forward().spoken(), vec!["blank"]);
        assert_eq!(e.text(), "aef");
        e.move_home();
        assert_eq!(e.delete_backward().spoken(), vec!["blank"]);
    }

    #[test]
    fn test_textfield_echo_words_and_hidden() {
        let mut e = typed("go");
        let fb = e.insert_char(' ').unwrap();
        assert_eq!(fb.spoken(), vec!["go"]);
        assert_eq!(e.insert_char(' ').unwrap().spoken(), vec!["space"]);

        let mut secret = Editor::new(TextFieldOptions {
            hidden: true,
            ..TextFieldOptions::default()
        });
        assert_eq!(secret.insert_char('p').unwrap().spoken(), vec!["star"]);
        secret.insert_char('w');
        assert_eq!(secret.select_all().spoken(), vec!["2 stars Selected"]);
        assert_eq!(secret.move_left().spoken(), vec!["star", "Unselected"]);
    }

    #[test]
    fn test_textfield_unit_copy_paste_through_clipboard() {
        let transcript = Transcript::new();
        let clipboard = MemoryClipboard::with_text("xyz");
        let mut h = Harness::new(
            Box::new(transcript.clone()),
            Box::new(NoSound),
            Box::new(clipboard.clone()),
        );
        let mut field = TextField::new("Name").with_text("ab");
        field.set_key("name".into());
        field.setup(&mut h.cx(), true).unwrap();
        let id = field.keys.id();

        let press = |field: &mut TextField, h: &mut Harness, chord: Chord| {
            let out = field.dispatch(id, &InputEvent::Press(chord), &mut h.cx()).unwrap();
            field.dispatch(id, &InputEvent::Release(chord), &mut h.cx()).unwrap();
            out
        };

        press(&mut field, &mut h, Chord::ctrl(Key::Character('v')));
        assert_eq!(field.text(), "abxyz");
        press(&mut field, &mut h, Chord::ctrl(Key::Character('a')));
        press(&mut field, &mut h, Chord::ctrl(Key::Character('c')));
        assert_eq!(clipboard.contents(), "abxyz");
        assert_eq!(
            press(&mut field, &mut h, Chord::new(Key::Enter)),
            Outcome::Submitted("name".into())
        );

        insta::assert_snapshot!(
            transcript.joined(),
            @"Name edit | ab | Pasted xyz | abxyz Selected | Copied selection to clipboard"
        );
    }

    #[test]
    fn test_textfield_unit_text_and_motion_events() {
        let transcript = Transcript::new();
        let mut h = Harness::new(
            Box::new(transcript.clone()),
            Box::new(NoSound),
            Box::new(MemoryClipboard::new()),
        );
        let mut field = TextField::new("Name");
        field.setup(&mut h.cx(), true).unwrap();
        let id = field.keys.id();

        let a = Chord::shift(Key::Character('a'));
        assert_eq!(field.dispatch(id, &InputEvent::Press(a), &mut h.cx()).unwrap(), Outcome::Ignored);
        field.dispatch(id, &InputEvent::Text('A'), &mut h.cx()).unwrap();
        field.dispatch(id, &InputEvent::Release(a), &mut h.cx()).unwrap();
        assert_eq!(field.text(), "A");
        assert_eq!(transcript.last().as_deref(), Some("Cap A"));

        field.dispatch(id, &InputEvent::Motion(Motion::Left), &mut h.cx()).unwrap();
        assert_eq!(field.editor().position(), 0);
        assert_eq!(
            field.dispatch(id, &InputEvent::Motion(Motion::PageUp), &mut h.cx()).unwrap(),
            Outcome::Ignored
        );
    }

    #[test]
    fn test_textfield_read_only_has_no_editing_bindings() {
        let transcript = Transcript::new();
        let mut h = Harness::new(
            Box::new(transcript.clone()),
            Box::new(NoSound),
            Box::new(MemoryClipboard::with_text("zzz")),
        );
        let mut field = TextField::with_options(
            "Serial",
            TextFieldOptions {
                read_only: true,
                ..TextFieldOptions::default()
            },
        )
        .with_text("42");
        field.setup(&mut h.cx(), true).unwrap();
        assert_eq!(transcript.lines(), vec!["Serial edit", "Read only 42"]);

        let id = field.keys.id();
        assert_eq!(field.dispatch(id, &InputEvent::Text('x'), &mut h.cx()).unwrap(), Outcome::Ignored);
        assert_eq!(
            field.dispatch(id, &InputEvent::Motion(Motion::Backspace), &mut h.cx()).unwrap(),
            Outcome::Ignored
        );
        field
            .dispatch(id, &InputEvent::Press(Chord::ctrl(Key::Character('v'))), &mut h.cx())
            .unwrap();
        assert_eq!(field.text(), "42");
    }

    #[test]
    fn test_textfield_options_from_json() {
        let opts: TextFieldOptions =
            serde_json::from_str(r#"{"capacity": 12, "hidden": true}"#).unwrap();
        assert_eq!(opts.capacity, 12);
        assert!(opts.hidden);
        assert!(opts.allows('Q'));
        assert!(opts.allows(' '));
        assert!(!opts.allows('\n'));
    }

    #[test]
    fn test_textfield_cut_removes_selection() {
        let mut e = typed("hello world");
        e.move_home();
        assert!(e.cut().is_none());
        for _ in 0..5 {
            e.select_right();
        }
        let (text, fb) = e.cut().unwrap();
        assert_eq!(text, "hello");
        assert_eq!(fb.spoken(), vec!["Cut selection to clipboard"]);
        assert_eq!(fb.cue, Some(Cue::Delete));
        assert_eq!(e.text(), " world");
        assert_eq!(e.position(), 0);
        assert!(!e.is_selected());
    }

    #[test]
    fn test_textfield_paste_replaces_selection() {
        let mut e = Editor::new(TextFieldOptions {
            capacity: 5,
            ..TextFieldOptions::default()
        });
        e.paste("abcd");
        e.select_left();
        e.select_left();
        assert_eq!(e.selected_text().as_deref(), Some("cd"));

        // The selected chars still count toward capacity.
        assert_eq!(e.paste("xy").cue, Some(Cue::Boundary));
        assert_eq!(e.text(), "abcd");
        assert!(e.is_selected());

        assert_eq!(e.paste("x").spoken(), vec!["Pasted x"]);
        assert_eq!(e.text(), "abx");
        assert_eq!(e.position(), 3);
        assert!(!e.is_selected());
    }
}
