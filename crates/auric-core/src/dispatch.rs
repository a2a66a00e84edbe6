use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use smallvec::SmallVec;

use crate::binding::{Binding, Invocation};
use crate::context::FocusCx;
use crate::error::FocusResult;
use crate::input::{Chord, InputEvent, Motion};
use crate::timer::Repeat;
use crate::unit::Outcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DispatcherId(u64);

impl DispatcherId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
struct Held {
    chord: Chord,
    repeat: Repeat,
}

/// Input routing for one unit.
///
/// Four tables: key press (with a per-binding repeat interval), key release,
/// text motion, and a single text binding. Each raw event produces at most one
/// [`Invocation`]; the owning unit runs it and reports back through
/// [`Dispatcher::settle`].
#[derive(Debug)]
pub struct Dispatcher<A> {
    id: DispatcherId,
    repeat_interval: Duration,
    presses: HashMap<Chord, (Binding<A>, Duration)>,
    releases: HashMap<Chord, Binding<A>>,
    motions: HashMap<Motion, Binding<A>>,
    text: Option<Binding<A>>,
    held: Option<Held>,
    handled: bool,
    motion_gate: bool,
}

impl<A: Clone> Default for Dispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone> Dispatcher<A> {
    pub fn new() -> Self {
        Self {
            id: DispatcherId::next(),
            repeat_interval: Duration::ZERO,
            presses: HashMap::new(),
            releases: HashMap::new(),
            motions: HashMap::new(),
            text: None,
            held: None,
            handled: false,
            motion_gate: false,
        }
    }

    /// Default auto-repeat for press bindings without their own interval.
    pub fn with_repeat_interval(mut self, interval: Duration) -> Self {
        self.repeat_interval = interval;
        self
    }

    pub fn set_repeat_interval(&mut self, interval: Duration) {
        self.repeat_interval = interval;
    }

    /// Motions only fire while the last press went unclaimed. Menus use this
    /// so an arrow key bound as a press is not also taken as a motion.
    pub fn with_motion_gate(mut self) -> Self {
        self.motion_gate = true;
        self
    }

    pub fn id(&self) -> DispatcherId {
        self.id
    }

    pub fn bind_press(&mut self, chord: Chord, action: A) {
        self.bind_press_repeating(chord, action, Duration::ZERO);
    }

    pub fn bind_press_repeating(&mut self, chord: Chord, action: A, interval: Duration) {
        self.presses.insert(chord, (Binding::new(action), interval));
    }

    pub fn bind_release(&mut self, chord: Chord, action: A) {
        self.releases.insert(chord, Binding::new(action));
    }

    pub fn bind_motion(&mut self, motion: Motion, action: A) {
        self.motions.insert(motion, Binding::new(action));
    }

    pub fn bind_text(&mut self, action: A) {
        self.text = Some(Binding::new(action));
    }

    pub fn unbind_press(&mut self, chord: Chord) -> bool {
        self.presses.remove(&chord).is_some()
    }

    /// Drops every binding that calls `action`, whatever its bound arguments.
    pub fn unbind_action(&mut self, action: &A) {
        self.presses.retain(|_, (b, _)| !b.calls(action));
        self.releases.retain(|_, b| !b.calls(action));
        self.motions.retain(|_, b| !b.calls(action));
        if self.text.as_ref().is_some_and(|b| b.calls(action)) {
            self.text = None;
        }
    }

    pub fn clear(&mut self) {
        self.presses.clear();
        self.releases.clear();
        self.motions.clear();
        self.text = None;
        self.held = None;
        self.handled = false;
    }

    pub fn has_bindings(&self) -> bool {
        !self.presses.is_empty()
            || !self.releases.is_empty()
            || !self.motions.is_empty()
            || self.text.is_some()
    }

    pub fn is_bound(&self, chord: Chord) -> bool {
        self.presses.contains_key(&chord)
    }

    pub fn held(&self) -> Option<Chord> {
        self.held.as_ref().map(|h| h.chord)
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Ignored while a repeating key is held. A bound key with a non-zero
    /// interval becomes the held key.
    pub fn press(&mut self, chord: Chord) -> Option<Invocation<A>> {
        if self.held.is_some() {
            return None;
        }
        let Some((binding, own)) = self.presses.get_mut(&chord) else {
            self.handled = false;
            return None;
        };
        let interval = if own.is_zero() {
            self.repeat_interval
        } else {
            *own
        };
        let call = binding.invocation();
        if !interval.is_zero() {
            self.held = Some(Held {
                chord,
                repeat: Repeat::new(interval),
            });
        }
        Some(call)
    }

    /// Records whether the press just invoked claimed the event.
    pub fn settle(&mut self, claimed: bool) {
        self.handled = claimed;
    }

    pub fn release(&mut self, chord: Chord) -> Option<Invocation<A>> {
        // Matched on symbol alone; modifiers may be released first.
        if self
            .held
            .as_ref()
            .is_some_and(|h| h.chord.key() == chord.key())
        {
            self.held = None;
        }
        self.handled = false;
        self.releases.get_mut(&chord).map(Binding::invocation)
    }

    /// Suppressed while the last press was claimed.
    pub fn text(&mut self, c: char) -> Option<Invocation<A>> {
        if self.handled {
            return None;
        }
        let binding = self.text.as_mut()?;
        binding.capture(c);
        Some(binding.invocation())
    }

    pub fn motion(&mut self, motion: Motion) -> Option<Invocation<A>> {
        if self.motion_gate && self.handled {
            return None;
        }
        let call = self.motions.get_mut(&motion).map(Binding::invocation)?;
        if self.motion_gate {
            self.handled = true;
        }
        Some(call)
    }

    /// Repeats due for the held key.
    pub fn tick(&mut self, dt: Duration) -> SmallVec<[Invocation<A>; 1]> {
        let Some(held) = self.held.as_mut() else {
            return SmallVec::new();
        };
        let fired = held.repeat.tick(dt);
        let Some((binding, _)) = self.presses.get_mut(&held.chord) else {
            return SmallVec::new();
        };
        (0..fired).map(|_| binding.invocation()).collect()
    }
}

/// A unit that owns a dispatcher and knows how to run its invocations.
pub trait Handler {
    type Action: Clone;

    fn dispatcher(&mut self) -> &mut Dispatcher<Self::Action>;

    fn invoke(
        &mut self,
        call: Invocation<Self::Action>,
        cx: &mut FocusCx<'_>,
    ) -> FocusResult<Outcome>;
}

/// Feeds one event through `unit`'s dispatcher and runs what it produces.
pub fn deliver<H: Handler + ?Sized>(
    unit: &mut H,
    event: &InputEvent,
    cx: &mut FocusCx<'_>,
) -> FocusResult<Outcome> {
    let call = match *event {
        InputEvent::Press(chord) => unit.dispatcher().press(chord),
        InputEvent::Release(chord) => unit.dispatcher().release(chord),
        InputEvent::Text(c) => unit.dispatcher().text(c),
        InputEvent::Motion(m) => unit.dispatcher().motion(m),
    };
    let Some(call) = call else {
        return Ok(Outcome::Ignored);
    };
    let outcome = unit.invoke(call, cx)?;
    if let InputEvent::Press(_) = event {
        unit.dispatcher().settle(outcome.is_handled());
    }
    Ok(outcome)
}

/// Runs the auto-repeats that came due during `dt`.
pub fn pump_repeats<H: Handler + ?Sized>(
    unit: &mut H,
    dt: Duration,
    cx: &mut FocusCx<'_>,
) -> FocusResult<()> {
    for call in unit.dispatcher().tick(dt) {
        unit.invoke(call, cx)?;
    }
    Ok(())
}
