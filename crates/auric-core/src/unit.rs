use std::any::Any;
use std::time::Duration;

use crate::context::FocusCx;
use crate::dispatch::DispatcherId;
use crate::error::FocusResult;
use crate::input::InputEvent;
use crate::semantics::{Role, spoken_name};

/// Result of handing an event (or a repeat) to a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Declined; the event goes on down the handler stack.
    Ignored,
    Handled,
    /// The active index or value changed.
    Changed(usize),
    /// Navigation hit the first or last item and did not move.
    Boundary,
    /// Activated; carries the key of what was submitted.
    Submitted(String),
    /// Asks the parent to change to the sibling with this key.
    Goto(String),
    /// Asks the parent to close this unit.
    Close,
    /// Asks the host to close the window.
    Quit,
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Outcome::Ignored)
    }
}

/// A node of the focus tree.
///
/// `setup` and `exit` may veto by returning `Ok(false)`. Composite units push
/// their dispatcher in `setup` before entering their active child, and leave
/// the child before popping it in `exit`.
pub trait Unit: Any {
    fn key(&self) -> &str;
    /// Called by the owning transition engine on insertion.
    fn set_key(&mut self, key: String);
    fn label(&self) -> &str;
    fn role(&self) -> Role;

    fn value(&self) -> String {
        self.label().to_owned()
    }

    fn name(&self) -> String {
        spoken_name(self.label(), self.role())
    }

    fn setup(&mut self, cx: &mut FocusCx<'_>, interrupt: bool) -> FocusResult<bool>;

    fn update(&mut self, _dt: Duration, _cx: &mut FocusCx<'_>) -> FocusResult<()> {
        Ok(())
    }

    fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool>;

    /// Back to construction-time state, without lifecycle calls.
    fn reset(&mut self) {}

    /// Routes `event` to the dispatcher `target`, which lives on this unit or
    /// along its active path.
    fn dispatch(
        &mut self,
        _target: DispatcherId,
        _event: &InputEvent,
        _cx: &mut FocusCx<'_>,
    ) -> FocusResult<Outcome> {
        Ok(Outcome::Ignored)
    }

    /// Name of the deepest active descendant.
    fn focused_path_name(&self) -> String {
        self.name()
    }
}

impl dyn Unit {
    pub fn downcast_ref<T: Unit>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref()
    }

    pub fn downcast_mut<T: Unit>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut()
    }
}

/// The no-op unit a transition engine points at before anything is entered.
#[derive(Debug, Default)]
pub struct EmptyUnit {
    key: String,
}

impl Unit for EmptyUnit {
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
        Role::Label
    }

    fn setup(&mut self, _cx: &mut FocusCx<'_>, _interrupt: bool) -> FocusResult<bool> {
        Ok(true)
    }

    fn exit(&mut self, _cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        Ok(true)
    }
}
