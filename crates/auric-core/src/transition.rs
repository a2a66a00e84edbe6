use std::time::Duration;

use indexmap::IndexMap;

use crate::context::FocusCx;
use crate::dispatch::DispatcherId;
use crate::error::{ConfigError, FocusError, FocusResult};
use crate::input::InputEvent;
use crate::unit::{EmptyUnit, Outcome, Unit};

/// How a call to [`Transitions::change`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Changed,
    /// The current unit refused to exit; nothing else happened.
    ExitVetoed,
    /// The target refused entry; the old unit was entered again and is still current.
    EntryVetoed,
}

/// Keyed children of a composite unit with exactly one current child.
///
/// Before the first successful change (and after the current child is removed
/// or exits) the current unit is an [`EmptyUnit`] that accepts every
/// lifecycle call.
pub struct Transitions {
    units: IndexMap<String, Box<dyn Unit>>,
    current: Option<String>,
    empty: EmptyUnit,
}

impl Default for Transitions {
    fn default() -> Self {
        Self::new()
    }
}

impl Transitions {
    pub fn new() -> Self {
        Self {
            units: IndexMap::new(),
            current: None,
            empty: EmptyUnit::default(),
        }
    }

    pub fn add(&mut self, key: impl Into<String>, mut unit: Box<dyn Unit>) -> Result<(), ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::MissingKey);
        }
        if self.units.contains_key(&key) {
            return Err(ConfigError::DuplicateKey(key));
        }
        unit.set_key(key.clone());
        self.units.insert(key, unit);
        Ok(())
    }

    /// Detaches a unit. Removing the current one points current back at the
    /// empty unit without running any lifecycle.
    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Unit>> {
        if self.current.as_deref() == Some(key) {
            self.current = None;
        }
        self.units.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.units.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn units(&self) -> impl Iterator<Item = &(dyn Unit + 'static)> {
        self.units.values().map(|u| &**u)
    }

    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.units.get_index(index).map(|(k, _)| k.as_str())
    }

    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.units.get_index_of(key)
    }

    pub fn get(&self, key: &str) -> Option<&(dyn Unit + 'static)> {
        self.units.get(key).map(|u| &**u)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut (dyn Unit + 'static)> {
        self.units.get_mut(key).map(|u| &mut **u)
    }

    pub fn get_as_mut<T: Unit>(&mut self, key: &str) -> Option<&mut T> {
        self.get_mut(key)?.downcast_mut()
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_empty_current(&self) -> bool {
        self.current.is_none()
    }

    pub fn current(&self) -> &(dyn Unit + 'static) {
        match self.current.as_deref().and_then(|k| self.units.get(k)) {
            Some(unit) => &**unit,
            None => &self.empty,
        }
    }

    pub fn current_mut(&mut self) -> &mut (dyn Unit + 'static) {
        match self.current.as_deref().and_then(|k| self.units.get_mut(k)) {
            Some(unit) => &mut **unit,
            None => &mut self.empty,
        }
    }

    /// Guarded switch to `key`.
    ///
    /// 1. The current unit may veto its exit.
    /// 2. An unregistered `key` is an error.
    /// 3. The target may veto its entry; the old unit is then entered again
    ///    so the handler stack still matches the live path.
    pub fn change(
        &mut self,
        key: &str,
        cx: &mut FocusCx<'_>,
        interrupt: bool,
    ) -> FocusResult<Transition> {
        if !self.current_mut().exit(cx)? {
            log::debug!("exit from {:?} vetoed", self.current);
            return Ok(Transition::ExitVetoed);
        }
        let Some(next) = self.units.get_mut(key) else {
            return Err(FocusError::UnknownKey(key.to_owned()));
        };
        if next.setup(cx, interrupt)? {
            log::debug!("focus {:?} -> {key:?}", self.current);
            self.current = Some(key.to_owned());
            return Ok(Transition::Changed);
        }

        log::debug!("entry into {key:?} vetoed; re-entering {:?}", self.current);
        if self.current_mut().setup(cx, false)? {
            return Ok(Transition::EntryVetoed);
        }
        let from = self.current.take().unwrap_or_default();
        Err(FocusError::Stranded {
            from,
            to: key.to_owned(),
        })
    }

    pub fn update(&mut self, dt: Duration, cx: &mut FocusCx<'_>) -> FocusResult<()> {
        self.current_mut().update(dt, cx)
    }

    /// Forwards exit to the current unit. Once it agrees, current falls back
    /// to the empty unit so a later entry starts from a clean slate.
    pub fn exit(&mut self, cx: &mut FocusCx<'_>) -> FocusResult<bool> {
        if !self.current_mut().exit(cx)? {
            return Ok(false);
        }
        self.current = None;
        Ok(true)
    }

    pub fn dispatch(
        &mut self,
        target: DispatcherId,
        event: &InputEvent,
        cx: &mut FocusCx<'_>,
    ) -> FocusResult<Outcome> {
        self.current_mut().dispatch(target, event, cx)
    }

    /// Drops back to the empty unit without lifecycle calls.
    pub fn reset_to_empty(&mut self) {
        self.current = None;
    }

    pub fn reset_all(&mut self) {
        for unit in self.units.values_mut() {
            unit.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{MemoryClipboard, NoSound, Transcript};
    use crate::context::Harness;
    use crate::semantics::Role;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        key: String,
        allow_setup: bool,
        allow_exit: bool,
        log: Log,
    }

    impl Probe {
        fn boxed(log: &Log) -> Box<dyn Unit> {
            Box::new(Probe {
                key: String::new(),
                allow_setup: true,
                allow_exit: true,
                log: log.clone(),
            })
        }
    }

    impl Unit for Probe {
        fn key(&self) -> &str {
            &self.key
        }
        fn set_key(&mut self, key: String) {
            self.key = key;
        }
        fn label(&self) -> &str {
            &self.key
        }
        fn role(&self) -> Role {
            Role::Label
        }
        fn setup(&mut self, _cx: &mut FocusCx<'_>, _interrupt: bool) -> FocusResult<bool> {
            self.log.borrow_mut().push(format!("setup {}", self.key));
            Ok(self.allow_setup)
        }
        fn exit(&mut self, _cx: &mut FocusCx<'_>) -> FocusResult<bool> {
            self.log.borrow_mut().push(format!("exit {}", self.key));
            Ok(self.allow_exit)
        }
    }

    fn harness() -> Harness {
        Harness::new(
            Box::new(Transcript::new()),
            Box::new(NoSound),
            Box::new(MemoryClipboard::new()),
        )
    }

    #[test]
    fn test_add_remove_keeps_empty_current() {
        let log = Log::default();
        let mut t = Transitions::new();
        assert!(t.is_empty_current());
        t.add("a", Probe::boxed(&log)).unwrap();
        t.add("b", Probe::boxed(&log)).unwrap();
        assert!(t.remove("a").is_some());
        assert!(t.remove("a").is_none());
        assert!(t.is_empty_current());
        assert_eq!(t.current().key(), "");
        assert_eq!(t.get("b").map(|u| u.key()), Some("b"));
    }

    #[test]
    fn test_add_rejects_missing_and_duplicate_keys() {
        let log = Log::default();
        let mut t = Transitions::new();
        assert!(matches!(t.add("", Probe::boxed(&log)), Err(ConfigError::MissingKey)));
        t.add("a", Probe::boxed(&log)).unwrap();
        assert!(matches!(
            t.add("a", Probe::boxed(&log)),
            Err(ConfigError::DuplicateKey(k)) if k == "a"
        ));
    }

    #[test]
    fn test_change_runs_exit_then_setup() {
        let log = Log::default();
        let mut h = harness();
        let mut t = Transitions::new();
        t.add("a", Probe::boxed(&log)).unwrap();
        t.add("b", Probe::boxed(&log)).unwrap();

        assert_eq!(t.change("a", &mut h.cx(), true).unwrap(), Transition::Changed);
        assert_eq!(t.change("b", &mut h.cx(), true).unwrap(), Transition::Changed);
        assert_eq!(t.current_key(), Some("b"));
        assert_eq!(*log.borrow(), vec!["setup a", "exit a", "setup b"]);
    }

    #[test]
    fn test_exit_veto_blocks_change() {
        let log = Log::default();
        let mut h = harness();
        let mut t = Transitions::new();
        t.add("a", Probe::boxed(&log)).unwrap();
        t.add("b", Probe::boxed(&log)).unwrap();
        t.change("a", &mut h.cx(), true).unwrap();
        t.get_as_mut::<Probe>("a").unwrap().allow_exit = false;
        log.borrow_mut().clear();

        assert_eq!(t.change("b", &mut h.cx(), true).unwrap(), Transition::ExitVetoed);
        assert_eq!(t.current_key(), Some("a"));
        assert_eq!(*log.borrow(), vec!["exit a"]);
    }

    #[test]
    fn test_setup_veto_reenters_old_unit() {
        let log = Log::default();
        let mut h = harness();
        let mut t = Transitions::new();
        t.add("a", Probe::boxed(&log)).unwrap();
        t.add("b", Probe::boxed(&log)).unwrap();
        t.change("a", &mut h.cx(), true).unwrap();
        t.get_as_mut::<Probe>("b").unwrap().allow_setup = false;
        log.borrow_mut().clear();

        assert_eq!(t.change("b", &mut h.cx(), true).unwrap(), Transition::EntryVetoed);
        assert_eq!(t.current_key(), Some("a"));
        assert_eq!(*log.borrow(), vec!["exit a", "setup b", "setup a"]);
    }

    #[test]
    fn test_stranded_when_old_unit_refuses_reentry() {
        let log = Log::default();
        let mut h = harness();
        let mut t = Transitions::new();
        t.add("a", Probe::boxed(&log)).unwrap();
        t.add("b", Probe::boxed(&log)).unwrap();
        t.change("a", &mut h.cx(), true).unwrap();
        t.get_as_mut::<Probe>("a").unwrap().allow_setup = false;
        t.get_as_mut::<Probe>("b").unwrap().allow_setup = false;

        let err = t.change("b", &mut h.cx(), true).unwrap_err();
        assert!(matches!(err, FocusError::Stranded { ref from, ref to } if from == "a" && to == "b"));
        assert!(t.is_empty_current());
    }

    #[test]
    fn test_change_to_unknown_key_is_an_error() {
        let mut h = harness();
        let mut t = Transitions::new();
        let err = t.change("nope", &mut h.cx(), true).unwrap_err();
        assert!(matches!(err, FocusError::UnknownKey(k) if k == "nope"));
    }

    #[test]
    fn test_reset_to_empty_skips_lifecycle() {
        let log = Log::default();
        let mut h = harness();
        let mut t = Transitions::new();
        t.add("a", Probe::boxed(&log)).unwrap();
        t.change("a", &mut h.cx(), true).unwrap();
        log.borrow_mut().clear();

        t.reset_to_empty();
        assert!(t.is_empty_current());
        assert!(log.borrow().is_empty());
        assert_eq!(t.change("a", &mut h.cx(), true).unwrap(), Transition::Changed);
        assert_eq!(*log.borrow(), vec!["setup a"]);
    }

    #[test]
    fn test_exit_falls_back_to_empty() {
        let log = Log::default();
        let mut h = harness();
        let mut t = Transitions::new();
        t.add("a", Probe::boxed(&log)).unwrap();
        t.change("a", &mut h.cx(), true).unwrap();
        assert!(t.exit(&mut h.cx()).unwrap());
        assert!(t.is_empty_current());
        assert_eq!(t.position_of("a"), Some(0));
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["a"]);
    }
}
