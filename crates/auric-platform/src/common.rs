use std::time::Duration;

use auric_core::{ClipboardBridge, SpeechBridge};
use web_time::Instant;

/// Measures the time between host ticks.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Time since the previous call (or construction).
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        dt
    }
}

/// Speech bridge that writes every utterance to the log.
#[derive(Debug, Default)]
pub struct LogSpeech;

impl SpeechBridge for LogSpeech {
    fn speak(&mut self, text: &str, interrupt: bool) {
        if interrupt {
            log::info!("speak: {text}");
        } else {
            log::info!("speak (queued): {text}");
        }
    }

    fn silence(&mut self) {
        log::debug!("speech silenced");
    }
}

/// The desktop clipboard. Failures are logged and read as empty text.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("clipboard unavailable: {e}");
                None
            }
        };
        Self { inner }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }
}

impl ClipboardBridge for SystemClipboard {
    fn copy(&mut self, text: &str) {
        let Some(clipboard) = self.inner.as_mut() else {
            return;
        };
        if let Err(e) = clipboard.set_text(text) {
            log::warn!("clipboard copy failed: {e}");
        }
    }

    fn paste(&mut self) -> String {
        let Some(clipboard) = self.inner.as_mut() else {
            return String::new();
        };
        clipboard.get_text().unwrap_or_else(|e| {
            log::warn!("clipboard paste failed: {e}");
            String::new()
        })
    }
}
