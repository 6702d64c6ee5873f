use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::GameError;
use crate::renderer::Renderer;

/// Capability set of anything the state machine drives.
///
/// `C` is the shared context (world) the objects read and mutate.
pub trait GameObject<S, C> {
    fn update(&mut self, _ctx: &mut C, _now: f64) -> Result<(), GameError> {
        Ok(())
    }

    /// Draws the object. Must not change game state.
    fn render(&self, _ctx: &C, _renderer: &mut dyn Renderer, _now: f64) {}

    fn on_enter_state(
        &mut self,
        _ctx: &mut C,
        _previous: S,
        _next: S,
    ) -> Result<(), GameError> {
        Ok(())
    }
}

/// Context hook through which objects request a state change during update.
pub trait TransitionRequests<S> {
    fn take_requested_state(&mut self) -> Option<S>;
}

/// Index of an object registered with a [`StateMachine`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ObjectId(usize);

/// Generic finite-state dispatcher for game objects.
///
/// Every state owns an ordered list of game objects. Objects may appear in
/// several lists; they are stored once and referenced by [`ObjectId`].
#[derive(Debug)]
pub struct StateMachine<S, O> {
    current: S,
    objects: Vec<O>,
    states: HashMap<S, Vec<ObjectId>>,
}

impl<S, O> StateMachine<S, O>
where
    S: Copy + Eq + Hash + Debug,
{
    /// Creates a machine sitting in `initial` without running any hooks.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            objects: Vec::new(),
            states: HashMap::new(),
        }
    }

    pub fn add_object(&mut self, object: O) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Sets the ordered object list of `state`, replacing any earlier one.
    pub fn register_state(&mut self, state: S, objects: &[ObjectId]) {
        self.states.insert(state, objects.to_vec());
    }

    #[must_use]
    pub fn current_state(&self) -> S {
        self.current
    }

    fn active(&self, state: S) -> Result<Vec<ObjectId>, GameError> {
        self.states
            .get(&state)
            .cloned()
            .ok_or_else(|| GameError::UnregisteredState(format!("{state:?}")))
    }

    /// Switches to `next` and runs `on_enter_state` on each of its objects in order.
    pub fn change_state<C>(&mut self, ctx: &mut C, next: S) -> Result<(), GameError>
    where
        O: GameObject<S, C>,
    {
        let entering = self.active(next)?;
        let previous = self.current;
        self.current = next;
        tracing::debug!(?previous, ?next, "state change");

        for id in entering {
            self.objects[id.0].on_enter_state(ctx, previous, next)?;
        }
        Ok(())
    }

    /// Runs the update phase for the current state's objects.
    ///
    /// A transition requested by an object takes effect right after that
    /// object's update; the remaining objects of the list the tick started
    /// with are still updated.
    pub fn update<C>(&mut self, ctx: &mut C, now: f64) -> Result<(), GameError>
    where
        O: GameObject<S, C>,
        C: TransitionRequests<S>,
    {
        for id in self.active(self.current)? {
            self.objects[id.0].update(ctx, now)?;
            if let Some(next) = ctx.take_requested_state() {
                self.change_state(ctx, next)?;
            }
        }
        Ok(())
    }

    /// Runs the render phase for the current state's objects in list order.
    pub fn render<C>(
        &self,
        ctx: &C,
        renderer: &mut dyn Renderer,
        now: f64,
    ) -> Result<(), GameError>
    where
        O: GameObject<S, C>,
    {
        for id in self.active(self.current)? {
            self.objects[id.0].render(ctx, renderer, now);
        }
        Ok(())
    }

    /// One frame: every update, then every render.
    pub fn tick<C>(
        &mut self,
        ctx: &mut C,
        renderer: &mut dyn Renderer,
        now: f64,
    ) -> Result<(), GameError>
    where
        O: GameObject<S, C>,
        C: TransitionRequests<S>,
    {
        self.update(ctx, now)?;
        self.render(ctx, renderer, now)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::GameError;
    use crate::renderer::tests::{Draw, RecordingRenderer};
    use crate::renderer::{Overlay, Renderer};

    use super::{GameObject, StateMachine, TransitionRequests};

    #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
    enum Phase {
        Idle,
        Busy,
        Missing,
    }

    #[derive(Default)]
    struct Journal {
        lines: Vec<String>,
        request: Option<Phase>,
    }

    impl TransitionRequests<Phase> for Journal {
        fn take_requested_state(&mut self) -> Option<Phase> {
            self.request.take()
        }
    }

    struct Probe {
        name: &'static str,
        switch_to: Option<Phase>,
    }

    impl GameObject<Phase, Journal> for Probe {
        fn update(&mut self, ctx: &mut Journal, now: f64) -> Result<(), GameError> {
            ctx.lines.push(format!("update {} {now}", self.name));
            if let Some(next) = self.switch_to.take() {
                ctx.request = Some(next);
            }
            Ok(())
        }

        fn render(&self, _ctx: &Journal, renderer: &mut dyn Renderer, _now: f64) {
            renderer.draw_overlay(&Overlay::Message {
                title: self.name,
                lines: Vec::new(),
            });
        }

        fn on_enter_state(
            &mut self,
            ctx: &mut Journal,
            previous: Phase,
            next: Phase,
        ) -> Result<(), GameError> {
            ctx.lines
                .push(format!("enter {} {previous:?}->{next:?}", self.name));
            Ok(())
        }
    }

    fn probe(name: &'static str) -> Probe {
        Probe {
            name,
            switch_to: None,
        }
    }

    #[test]
    fn change_state_notifies_new_state_objects_in_order() {
        let mut machine = StateMachine::new(Phase::Idle);
        let a = machine.add_object(probe("a"));
        let b = machine.add_object(probe("b"));
        let c = machine.add_object(probe("c"));
        machine.register_state(Phase::Idle, &[a]);
        machine.register_state(Phase::Busy, &[c, b]);
        let mut journal = Journal::default();

        machine
            .change_state(&mut journal, Phase::Busy)
            .expect("Busy is registered");

        assert_eq!(machine.current_state(), Phase::Busy);
        assert_eq!(journal.lines, vec!["enter c Idle->Busy", "enter b Idle->Busy"]);
    }

    #[test]
    fn tick_updates_all_before_rendering_any() {
        let mut machine = StateMachine::new(Phase::Idle);
        let a = machine.add_object(probe("a"));
        let b = machine.add_object(probe("b"));
        machine.register_state(Phase::Idle, &[a, b]);
        let mut journal = Journal::default();
        let mut renderer = RecordingRenderer::default();

        machine
            .tick(&mut journal, &mut renderer, 16.0)
            .expect("Idle is registered");

        assert_eq!(journal.lines, vec!["update a 16", "update b 16"]);
        assert_eq!(
            renderer.draws,
            vec![Draw::Overlay("a".to_owned()), Draw::Overlay("b".to_owned())]
        );
    }

    #[test]
    fn requested_transition_applies_mid_update_and_render_uses_new_state() {
        let mut machine = StateMachine::new(Phase::Idle);
        let a = machine.add_object(Probe {
            name: "a",
            switch_to: Some(Phase::Busy),
        });
        let b = machine.add_object(probe("b"));
        let c = machine.add_object(probe("c"));
        machine.register_state(Phase::Idle, &[a, b]);
        machine.register_state(Phase::Busy, &[c]);
        let mut journal = Journal::default();
        let mut renderer = RecordingRenderer::default();

        machine
            .tick(&mut journal, &mut renderer, 1.0)
            .expect("states are registered");

        assert_eq!(
            journal.lines,
            vec!["update a 1", "enter c Idle->Busy", "update b 1"]
        );
        assert_eq!(renderer.draws, vec![Draw::Overlay("c".to_owned())]);
    }

    #[test]
    fn unregistered_state_is_a_configuration_error() {
        let mut machine: StateMachine<Phase, Probe> = StateMachine::new(Phase::Idle);
        let mut journal = Journal::default();

        let result = machine.change_state(&mut journal, Phase::Missing);

        assert!(matches!(result, Err(GameError::UnregisteredState(name)) if name == "Missing"));
        assert_eq!(machine.current_state(), Phase::Idle);
        assert!(machine.update(&mut journal, 0.0).is_err());
    }
}
