use bitflags::bitflags;

bitflags! {
    /// Modifier mask carried by a key chord.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const SHIFT = 1;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const CAPSLOCK = 1 << 3;
        const META = 1 << 4; // Cmd on Mac
        const NUMLOCK = 1 << 5;
        const WINDOWS = 1 << 6;
        const FUNCTION = 1 << 7;
        const SCROLLLOCK = 1 << 8;
    }
}

impl Modifiers {
    /// Lock bits that never take part in chord identity.
    pub const LOCKS: Self = Self::CAPSLOCK.union(Self::NUMLOCK);

    pub fn normalized(self) -> Self {
        self.difference(Self::LOCKS)
    }
}

/// Physical key symbol. Character keys use their unshifted form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    F(u8), // F1-F24
}

/// Key identity: a symbol plus a normalized modifier mask.
///
/// Equality and hashing only see `(key, modifiers)` after lock bits are
/// stripped, so `Alt+D` with caps lock on matches a binding for `Alt+D`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chord {
    key: Key,
    modifiers: Modifiers,
}

impl Chord {
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers: modifiers.normalized(),
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self::with(key, Modifiers::CTRL)
    }

    pub fn shift(key: Key) -> Self {
        Self::with(key, Modifiers::SHIFT)
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Cursor motion this chord produces, if any. Shifted chords select
    /// instead of moving and produce none.
    pub fn motion(&self) -> Option<Motion> {
        if self.modifiers.contains(Modifiers::SHIFT) {
            return None;
        }
        let word = self.modifiers.contains(Modifiers::CTRL);
        Some(match self.key {
            Key::ArrowLeft if word => Motion::WordLeft,
            Key::ArrowRight if word => Motion::WordRight,
            Key::ArrowLeft => Motion::Left,
            Key::ArrowRight => Motion::Right,
            Key::ArrowUp => Motion::Up,
            Key::ArrowDown => Motion::Down,
            Key::Home => Motion::Home,
            Key::End => Motion::End,
            Key::PageUp => Motion::PageUp,
            Key::PageDown => Motion::PageDown,
            Key::Backspace => Motion::Backspace,
            Key::Delete => Motion::Delete,
            _ => return None,
        })
    }

    /// Literal character this chord types, if any.
    pub fn text(&self) -> Option<char> {
        if self
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META)
        {
            return None;
        }
        match self.key {
            Key::Space => Some(' '),
            Key::Character(c) if self.modifiers.contains(Modifiers::SHIFT) => {
                c.to_uppercase().next()
            }
            Key::Character(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Key> for Chord {
    fn from(key: Key) -> Self {
        Chord::new(key)
    }
}

/// Cursor-style input, delivered separately from key presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Press(Chord),
    Release(Chord),
    Text(char),
    Motion(Motion),
}
