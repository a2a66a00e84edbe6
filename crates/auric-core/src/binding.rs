use std::mem::discriminant;

use smallvec::SmallVec;

/// A deferred call stored in a dispatch table.
///
/// The action value is the callable: its enum variant picks the operation and
/// the variant's fields are the bound arguments. Characters captured from text
/// events wait in `captured` until the binding is invoked.
#[derive(Clone, Debug)]
pub struct Binding<A> {
    action: A,
    captured: SmallVec<[char; 4]>,
}

impl<A: Clone> Binding<A> {
    pub fn new(action: A) -> Self {
        Self {
            action,
            captured: SmallVec::new(),
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn capture(&mut self, c: char) {
        self.captured.push(c);
    }

    pub fn captured(&self) -> &[char] {
        &self.captured
    }

    /// Hands out the call and clears the captured arguments.
    pub fn invocation(&mut self) -> Invocation<A> {
        Invocation {
            action: self.action.clone(),
            text: std::mem::take(&mut self.captured),
        }
    }

    /// True when `action` is the same callable, whatever its bound arguments.
    pub fn calls(&self, action: &A) -> bool {
        discriminant(&self.action) == discriminant(action)
    }
}

impl<A> PartialEq for Binding<A> {
    fn eq(&self, other: &Self) -> bool {
        discriminant(&self.action) == discriminant(&other.action)
    }
}

/// One call produced by a dispatcher, ready for the owning unit to run.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation<A> {
    pub action: A,
    pub text: SmallVec<[char; 4]>,
}

impl<A> Invocation<A> {
    pub fn char(&self) -> Option<char> {
        self.text.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Act {
        Jump(usize),
        Speak,
    }

    #[test]
    fn test_binding_identity_ignores_bound_args() {
        assert_eq!(Binding::new(Act::Jump(1)), Binding::new(Act::Jump(7)));
        assert_ne!(Binding::new(Act::Jump(1)), Binding::new(Act::Speak));
        assert!(Binding::new(Act::Jump(1)).calls(&Act::Jump(3)));
    }

    #[test]
    fn test_binding_captured_args_cleared_after_invocation() {
        let mut b = Binding::new(Act::Speak);
        b.capture('x');
        assert_eq!(b.captured(), &['x']);

        let call = b.invocation();
        assert_eq!(call.char(), Some('x'));
        assert!(b.captured().is_empty());
        assert_eq!(b.invocation().char(), None);
    }
}
