use crate::dispatch::DispatcherId;

/// Live dispatchers, root first. Composite units push on `setup` and pop on
/// `exit`, so the stack mirrors the active focus path.
#[derive(Debug, Default)]
pub struct HandlerStack {
    entries: Vec<DispatcherId>,
}

impl HandlerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: DispatcherId) {
        log::trace!("handler push {id:?} (depth {})", self.entries.len() + 1);
        self.entries.push(id);
    }

    /// Pops `id`. An entry that is not on top is removed where it sits.
    pub fn pop(&mut self, id: DispatcherId) -> bool {
        if self.entries.last() == Some(&id) {
            self.entries.pop();
            log::trace!("handler pop {id:?} (depth {})", self.entries.len());
            return true;
        }
        match self.entries.iter().rposition(|e| *e == id) {
            Some(index) => {
                log::warn!("handler {id:?} popped from depth {index}, not from the top");
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn top(&self) -> Option<DispatcherId> {
        self.entries.last().copied()
    }

    pub fn contains(&self, id: DispatcherId) -> bool {
        self.entries.contains(&id)
    }

    pub fn as_slice(&self) -> &[DispatcherId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
