//! Generic finite state machine over a shared per-entity context.
//!
//! An `Fsm` owns its context value, a set of states keyed by a hashable id,
//! and an ordered list of guarded transitions. Each `update`:
//!
//!   1. runs the current state's `update` hook,
//!   2. scans transitions in registration order and fires the first one whose
//!      `from` is the current state and whose guard accepts the context.
//!
//! Firing runs `on_exit` on the old state, moves the cursor, then runs
//! `on_enter` on the new state. At most one transition fires per update, and
//! the freshly entered state is not updated again in the same call.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::any::AsAny;

/// Lifecycle hooks of a single state. All hooks default to no-ops.
pub trait State<C>: AsAny {
    fn on_enter(&mut self, _context: &mut C) {}
    fn update(&mut self, _context: &mut C) {}
    fn on_exit(&mut self, _context: &mut C) {}
}

/// A guarded edge between two states.
pub struct Transition<Id, C> {
    from: Id,
    to: Id,
    guard: Box<dyn Fn(&C) -> bool>,
}

impl<Id, C> Transition<Id, C> {
    pub fn new(from: Id, to: Id, guard: impl Fn(&C) -> bool + 'static) -> Self {
        Self {
            from,
            to,
            guard: Box::new(guard),
        }
    }

    pub fn from(&self) -> &Id {
        &self.from
    }

    pub fn to(&self) -> &Id {
        &self.to
    }

    pub fn meets_condition(&self, context: &C) -> bool {
        (self.guard)(context)
    }
}

pub struct Fsm<Id, C> {
    context: C,
    states: HashMap<Id, Box<dyn State<C>>>,
    transitions: Vec<Transition<Id, C>>,
    current: Id,
}

impl<Id, C> Fsm<Id, C>
where
    Id: Clone + Eq + Hash + Debug,
    C: 'static,
{
    /// Build the machine and enter the initial state immediately.
    pub fn new(context: C, initial_id: Id, initial_state: Box<dyn State<C>>) -> Self {
        let mut states = HashMap::new();
        states.insert(initial_id.clone(), initial_state);
        let mut fsm = Self {
            context,
            states,
            transitions: Vec::new(),
            current: initial_id,
        };
        if let Some(state) = fsm.states.get_mut(&fsm.current) {
            state.on_enter(&mut fsm.context);
        }
        fsm
    }

    /// Register a state. An existing state with the same id is replaced and
    /// returned; if it was the current state, the replacement becomes current
    /// without an enter/exit pair.
    pub fn add_state(&mut self, id: Id, state: Box<dyn State<C>>) -> Option<Box<dyn State<C>>> {
        let previous = self.states.insert(id.clone(), state);
        if previous.is_some() {
            log::warn!("FSM state {:?} registered twice; last registration wins", id);
        }
        previous
    }

    pub fn add_transition(&mut self, transition: Transition<Id, C>) {
        self.transitions.push(transition);
    }

    /// Run one tick. Returns true when a transition fired.
    pub fn update(&mut self) -> bool {
        if let Some(state) = self.states.get_mut(&self.current) {
            state.update(&mut self.context);
        }

        let Some(target) = self
            .transitions
            .iter()
            .find(|t| t.from == self.current && t.meets_condition(&self.context))
            .map(|t| t.to.clone())
        else {
            return false;
        };

        assert!(
            self.states.contains_key(&target),
            "FSM transition from {:?} targets unregistered state {:?}",
            self.current,
            target
        );

        log::trace!("FSM transition {:?} -> {:?}", self.current, target);
        if let Some(old) = self.states.get_mut(&self.current) {
            old.on_exit(&mut self.context);
        }
        self.current = target;
        if let Some(new) = self.states.get_mut(&self.current) {
            new.on_enter(&mut self.context);
        }
        true
    }

    pub fn current(&self) -> &Id {
        &self.current
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn has_state(&self, id: &Id) -> bool {
        self.states.contains_key(id)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Downcast a registered state to its concrete type.
    pub fn state<T: State<C>>(&self, id: &Id) -> Option<&T> {
        self.states
            .get(id)
            .and_then(|s| (**s).as_any().downcast_ref::<T>())
    }

    pub fn state_mut<T: State<C>>(&mut self, id: &Id) -> Option<&mut T> {
        self.states
            .get_mut(id)
            .and_then(|s| (**s).as_any_mut().downcast_mut::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ctx {
        x: i32,
        log: Vec<String>,
    }

    /// Records every hook invocation into the context log.
    struct Recorder {
        name: &'static str,
        updates: u32,
    }

    impl Recorder {
        fn boxed(name: &'static str) -> Box<dyn State<Ctx>> {
            Box::new(Self { name, updates: 0 })
        }
    }

    impl State<Ctx> for Recorder {
        fn on_enter(&mut self, ctx: &mut Ctx) {
            ctx.log.push(format!("enter {}", self.name));
        }

        fn update(&mut self, ctx: &mut Ctx) {
            self.updates += 1;
            ctx.log.push(format!("update {}", self.name));
        }

        fn on_exit(&mut self, ctx: &mut Ctx) {
            ctx.log.push(format!("exit {}", self.name));
        }
    }

    fn threshold_machine() -> Fsm<&'static str, Ctx> {
        let mut fsm = Fsm::new(Ctx::default(), "a", Recorder::boxed("a"));
        fsm.add_state("b", Recorder::boxed("b"));
        fsm.add_transition(Transition::new("a", "b", |c: &Ctx| c.x > 0));
        fsm.add_transition(Transition::new("b", "a", |c: &Ctx| c.x <= 0));
        fsm
    }

    fn count(log: &[String], entry: &str) -> usize {
        log.iter().filter(|e| e.as_str() == entry).count()
    }

    #[test]
    fn initial_state_is_entered_on_construction() {
        let fsm = threshold_machine();
        assert_eq!(*fsm.current(), "a");
        assert_eq!(fsm.context().log, vec!["enter a".to_string()]);
    }

    #[test]
    fn stays_put_while_guard_is_false() {
        let mut fsm = threshold_machine();
        for _ in 0..5 {
            assert!(!fsm.update());
        }
        assert_eq!(*fsm.current(), "a");
        assert_eq!(count(&fsm.context().log, "update a"), 5);
        assert_eq!(count(&fsm.context().log, "exit a"), 0);
    }

    #[test]
    fn transitions_on_first_tick_guard_holds() {
        let mut fsm = threshold_machine();
        fsm.update();
        fsm.context_mut().x = 1;
        assert!(fsm.update());
        assert_eq!(*fsm.current(), "b");

        let log = &fsm.context().log;
        assert_eq!(count(log, "exit a"), 1);
        assert_eq!(count(log, "enter b"), 1);
        // Order within the firing tick: update old, exit old, enter new.
        let tail: Vec<&str> = log[log.len() - 3..].iter().map(String::as_str).collect();
        assert_eq!(tail, vec!["update a", "exit a", "enter b"]);
        assert_eq!(count(log, "update b"), 0);
    }

    #[test]
    fn oscillation_fires_exactly_one_transition_per_crossing() {
        let mut fsm = threshold_machine();
        let xs = [0, 1, 1, -1, 2, 0, 0, 3];
        let mut fired = Vec::new();
        for x in xs {
            fsm.context_mut().x = x;
            fired.push(fsm.update());
        }
        assert_eq!(
            fired,
            vec![false, true, false, true, true, true, false, true]
        );
        assert_eq!(*fsm.current(), "b");
        assert_eq!(count(&fsm.context().log, "enter b"), 3);
        assert_eq!(count(&fsm.context().log, "exit b"), 2);
    }

    #[test]
    fn first_matching_transition_wins() {
        let mut fsm = Fsm::new(Ctx::default(), "a", Recorder::boxed("a"));
        fsm.add_state("b", Recorder::boxed("b"));
        fsm.add_state("c", Recorder::boxed("c"));
        fsm.add_transition(Transition::new("a", "c", |_: &Ctx| true));
        fsm.add_transition(Transition::new("a", "b", |_: &Ctx| true));
        fsm.update();
        assert_eq!(*fsm.current(), "c");
    }

    #[test]
    fn only_one_transition_per_tick_even_when_chain_is_open() {
        let mut fsm = Fsm::new(Ctx::default(), "a", Recorder::boxed("a"));
        fsm.add_state("b", Recorder::boxed("b"));
        fsm.add_state("c", Recorder::boxed("c"));
        fsm.add_transition(Transition::new("a", "b", |_: &Ctx| true));
        fsm.add_transition(Transition::new("b", "c", |_: &Ctx| true));
        fsm.update();
        assert_eq!(*fsm.current(), "b");
        fsm.update();
        assert_eq!(*fsm.current(), "c");
    }

    #[test]
    fn duplicate_state_id_last_registration_wins() {
        let mut fsm = threshold_machine();
        let replaced = fsm.add_state("b", Recorder::boxed("b2"));
        assert!(replaced.is_some());
        assert_eq!(fsm.state_count(), 2);

        fsm.context_mut().x = 1;
        fsm.update();
        assert_eq!(count(&fsm.context().log, "enter b2"), 1);
        assert_eq!(count(&fsm.context().log, "enter b"), 0);
    }

    #[test]
    fn states_can_be_downcast() {
        let mut fsm = threshold_machine();
        fsm.update();
        fsm.update();
        let recorded = fsm.state::<Recorder>(&"a").expect("state a registered");
        assert_eq!(recorded.updates, 2);
        assert!(fsm.state::<Recorder>(&"missing").is_none());
    }

    #[test]
    #[should_panic(expected = "unregistered state")]
    fn transition_to_unregistered_state_panics() {
        let mut fsm = Fsm::new(Ctx::default(), "a", Recorder::boxed("a"));
        fsm.add_transition(Transition::new("a", "nowhere", |_: &Ctx| true));
        fsm.update();
    }
}
