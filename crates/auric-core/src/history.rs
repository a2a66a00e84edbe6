use std::collections::VecDeque;

use crate::bridge::SpeechBridge;

/// Logged utterances with a review cursor.
#[derive(Debug)]
pub struct SpeechHistory {
    entries: VecDeque<String>,
    cursor: usize,
    limit: usize,
}

impl SpeechHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Appends and moves the cursor to the newest entry.
    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push_back(text.into());
        if self.limit > 0 && self.entries.len() > self.limit {
            self.trim(self.entries.len() - self.limit);
        }
        self.last();
    }

    /// Drops the `count` oldest entries, always keeping the newest one.
    pub fn trim(&mut self, count: usize) {
        if self.entries.len() <= 1 {
            return;
        }
        let count = count.min(self.entries.len() - 1);
        self.entries.drain(..count);
        self.cursor = self.cursor.saturating_sub(count);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn previous(&mut self) -> Option<&str> {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    pub fn next(&mut self) -> Option<&str> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn first(&mut self) -> Option<&str> {
        self.cursor = 0;
        self.current()
    }

    pub fn last(&mut self) -> Option<&str> {
        self.cursor = self.entries.len().saturating_sub(1);
        self.current()
    }
}

/// Which way to walk the history when re-speaking an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Review {
    Previous,
    Next,
    First,
    Last,
}

/// The speech bridge plus its history.
pub struct Speech {
    bridge: Box<dyn SpeechBridge>,
    history: SpeechHistory,
}

impl Speech {
    pub fn new(bridge: Box<dyn SpeechBridge>, history_limit: usize) -> Self {
        Self {
            bridge,
            history: SpeechHistory::new(history_limit),
        }
    }

    /// Speaks and records the utterance in the history.
    pub fn announce(&mut self, text: &str, interrupt: bool) {
        if text.is_empty() {
            return;
        }
        log::debug!("announce: {text}");
        self.history.push(text);
        self.bridge.speak(text, interrupt);
    }

    /// Speaks without touching the history.
    pub fn say(&mut self, text: &str, interrupt: bool) {
        if text.is_empty() {
            return;
        }
        self.bridge.speak(text, interrupt);
    }

    pub fn silence(&mut self) {
        self.bridge.silence();
    }

    /// Re-speaks a history entry. Returns false when the history is empty.
    pub fn review(&mut self, step: Review) -> bool {
        let entry = match step {
            Review::Previous => self.history.previous(),
            Review::Next => self.history.next(),
            Review::First => self.history.first(),
            Review::Last => self.history.last(),
        };
        let Some(text) = entry.map(str::to_owned) else {
            return false;
        };
        self.bridge.speak(&text, true);
        true
    }

    pub fn history(&self) -> &SpeechHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut SpeechHistory {
        &mut self.history
    }
}
