//=========================================================================
// Scene State Machine
//=========================================================================
//
// Registry of scenes with exactly one active scene at a time.
//
// States:
//   Uninitialized ──set/next/previous──► Active(id) ──shutdown──► Terminated
//                                          │    ▲
//                                          └────┘ set/next/previous/restart
//
// Transition protocol (always in this order):
//   1. outgoing cleanup()
//   2. ctx.audio.stop_all(0)
//   3. swap active, reset scene-entry timer
//   4. incoming startup()
//   5. observer(old, new)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;
use crate::core::input::Action;

use super::{Scene, SceneContext, SceneKey};

//=== MachineState ========================================================

/// Observable state of the [`StateMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState<S: SceneKey> {
    Uninitialized,
    Active(S),
    Terminated,
}

type Observer<S> = Box<dyn FnMut(Option<S>, S) + Send>;

//=== StateMachine ========================================================

/// Ordered scene registry with a single active scene.
///
/// Registration order is navigation order for `next_state` and
/// `previous_state`, which both wrap around.
pub struct StateMachine<S: SceneKey, A: Action> {
    scenes: Vec<(S, Box<dyn Scene<S, A>>)>,
    index: HashMap<S, usize>,
    active: Option<usize>,
    terminated: bool,
    observer: Option<Observer<S>>,
}

impl<S: SceneKey, A: Action> Default for StateMachine<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneKey, A: Action> StateMachine<S, A> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            scenes: Vec::new(),
            index: HashMap::new(),
            active: None,
            terminated: false,
            observer: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene under `key`.
    ///
    /// Re-registering a key replaces the scene but keeps its original
    /// position in the navigation order.
    pub fn add<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S, A> + 'static,
    {
        match self.index.get(&key) {
            Some(&slot) => {
                warn!(target: "scene", "Scene {:?} was already registered and has been replaced", key);
                self.scenes[slot].1 = Box::new(scene);
            }
            None => {
                self.index.insert(key, self.scenes.len());
                self.scenes.push((key, Box::new(scene)));
            }
        }
    }

    /// Installs a callback invoked after every completed transition.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(Option<S>, S) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> MachineState<S> {
        if self.terminated {
            return MachineState::Terminated;
        }
        match self.active_key() {
            Some(key) => MachineState::Active(key),
            None => MachineState::Uninitialized,
        }
    }

    pub fn active_key(&self) -> Option<S> {
        self.active.map(|slot| self.scenes[slot].0)
    }

    pub fn contains(&self, key: S) -> bool {
        self.index.contains_key(&key)
    }

    /// Scene keys in navigation order.
    pub fn keys(&self) -> impl Iterator<Item = S> + '_ {
        self.scenes.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub(crate) fn active_mut(&mut self) -> Option<(S, &mut dyn Scene<S, A>)> {
        let slot = self.active?;
        let (key, scene) = &mut self.scenes[slot];
        Some((*key, scene.as_mut()))
    }

    //--- Transitions ------------------------------------------------------

    /// Activates the scene registered under `key`.
    ///
    /// An unknown key returns [`EngineError::UnknownScene`] and leaves the
    /// machine untouched.
    pub fn set_state(&mut self, key: S, ctx: &mut SceneContext<S>) -> Result<(), EngineError> {
        self.ensure_running()?;
        let slot = *self
            .index
            .get(&key)
            .ok_or_else(|| EngineError::UnknownScene(format!("{:?}", key)))?;
        self.transition_to(slot, ctx)
    }

    /// Activates the scene after the active one, wrapping to the first.
    pub fn next_state(&mut self, ctx: &mut SceneContext<S>) -> Result<(), EngineError> {
        self.ensure_running()?;
        let len = self.non_empty_len()?;
        let slot = match self.active {
            Some(slot) => (slot + 1) % len,
            None => 0,
        };
        self.transition_to(slot, ctx)
    }

    /// Activates the scene before the active one, wrapping to the last.
    pub fn previous_state(&mut self, ctx: &mut SceneContext<S>) -> Result<(), EngineError> {
        self.ensure_running()?;
        let len = self.non_empty_len()?;
        let slot = match self.active {
            Some(slot) => (slot + len - 1) % len,
            None => len - 1,
        };
        self.transition_to(slot, ctx)
    }

    /// Re-enters the active scene through the full protocol.
    ///
    /// With nothing active yet this behaves like `next_state`.
    pub fn restart(&mut self, ctx: &mut SceneContext<S>) -> Result<(), EngineError> {
        self.ensure_running()?;
        match self.active {
            Some(slot) => self.transition_to(slot, ctx),
            None => self.next_state(ctx),
        }
    }

    /// Cleans up the active scene and enters `Terminated`.
    ///
    /// Idempotent. Audio is left to the caller's teardown.
    pub fn shutdown(&mut self, ctx: &mut SceneContext<S>) -> Result<(), EngineError> {
        if self.terminated {
            return Ok(());
        }
        self.terminated = true;

        let result = match self.active.take() {
            Some(slot) => {
                let (key, scene) = &mut self.scenes[slot];
                debug!(target: "scene", "Cleaning up {:?} for shutdown", key);
                scene.cleanup(ctx).map_err(|err| EngineError::scene(*key, err))
            }
            None => Ok(()),
        };
        ctx.leave_scene();

        info!(target: "scene", "Scene state machine terminated");
        result
    }

    //--- Internal ---------------------------------------------------------

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.terminated {
            Err(EngineError::Terminated)
        } else {
            Ok(())
        }
    }

    fn non_empty_len(&self) -> Result<usize, EngineError> {
        match self.scenes.len() {
            0 => Err(EngineError::NoScenes),
            len => Ok(len),
        }
    }

    /// Runs the transition protocol. The first hook error is returned once
    /// the incoming scene is fully active.
    fn transition_to(&mut self, slot: usize, ctx: &mut SceneContext<S>) -> Result<(), EngineError> {
        let previous = self.active_key();
        let mut failure = None;

        if let Some(old) = self.active {
            let (key, scene) = &mut self.scenes[old];
            if let Err(err) = scene.cleanup(ctx) {
                warn!(target: "scene", "Cleanup of {:?} failed: {}", key, err);
                failure = Some(EngineError::scene(*key, err));
            }
        }

        ctx.audio.stop_all(0);

        self.active = Some(slot);
        let (key, scene) = &mut self.scenes[slot];
        let key = *key;
        ctx.enter_scene(key);

        if let Err(err) = scene.startup(ctx) {
            warn!(target: "scene", "Startup of {:?} failed: {}", key, err);
            failure.get_or_insert(EngineError::scene(key, err));
        }

        if let Some(observer) = self.observer.as_mut() {
            observer(previous, key);
        }
        debug!(target: "scene", "Scene transition {:?} -> {:?}", previous, key);

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::error::SceneResult;
    use crate::core::render::RenderSurface;
    use crate::core::scene::test_support::{
        call_log, calls, spy_context, SpyScene, TestAction, TestScene,
    };

    type Machine = StateMachine<TestScene, TestAction>;

    fn machine_with(names: &[(TestScene, &'static str)], log: &Arc<Mutex<Vec<String>>>) -> Machine {
        let mut machine = Machine::new();
        for &(key, name) in names {
            machine.add(key, SpyScene::new(name, log));
        }
        machine
    }

    fn abc(log: &Arc<Mutex<Vec<String>>>) -> Machine {
        machine_with(
            &[(TestScene::A, "A"), (TestScene::B, "B"), (TestScene::C, "C")],
            log,
        )
    }

    struct BrokenStartup;

    impl Scene<TestScene, TestAction> for BrokenStartup {
        fn startup(&mut self, _ctx: &mut SceneContext<TestScene>) -> SceneResult {
            Err("missing font".into())
        }
        fn update(
            &mut self,
            _surface: &mut dyn RenderSurface,
            _dt: f32,
            _ctx: &mut SceneContext<TestScene>,
        ) -> SceneResult {
            Ok(())
        }
        fn render(
            &mut self,
            _surface: &mut dyn RenderSurface,
            _ctx: &SceneContext<TestScene>,
        ) -> SceneResult {
            Ok(())
        }
    }

    #[test]
    fn starts_uninitialized() {
        let log = call_log();
        let machine = abc(&log);
        assert_eq!(machine.state(), MachineState::Uninitialized);
        assert_eq!(machine.len(), 3);
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn next_state_wraps_in_registration_order() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = abc(&log);

        let mut visited = Vec::new();
        for _ in 0..4 {
            machine.next_state(&mut ctx).unwrap();
            visited.push(machine.active_key().unwrap());
        }

        assert_eq!(visited, vec![TestScene::A, TestScene::B, TestScene::C, TestScene::A]);
    }

    #[test]
    fn previous_state_wraps_backwards() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = abc(&log);

        machine.previous_state(&mut ctx).unwrap();
        assert_eq!(machine.state(), MachineState::Active(TestScene::C));

        machine.set_state(TestScene::A, &mut ctx).unwrap();
        machine.previous_state(&mut ctx).unwrap();
        assert_eq!(machine.state(), MachineState::Active(TestScene::C));
    }

    #[test]
    fn unknown_scene_leaves_machine_untouched() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = machine_with(&[(TestScene::A, "A"), (TestScene::B, "B")], &log);
        machine.set_state(TestScene::A, &mut ctx).unwrap();
        log.lock().unwrap().clear();

        let err = machine.set_state(TestScene::C, &mut ctx).unwrap_err();

        assert!(matches!(err, EngineError::UnknownScene(ref name) if name == "C"));
        assert_eq!(machine.state(), MachineState::Active(TestScene::A));
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn transition_runs_cleanup_then_audio_stop_then_startup() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = abc(&log);

        machine.set_state(TestScene::A, &mut ctx).unwrap();
        assert_eq!(calls(&log), vec!["audio.stop_all", "A.startup"]);

        log.lock().unwrap().clear();
        machine.set_state(TestScene::B, &mut ctx).unwrap();
        assert_eq!(calls(&log), vec!["A.cleanup", "audio.stop_all", "B.startup"]);
        assert_eq!(ctx.current_scene(), Some(TestScene::B));
    }

    #[test]
    fn restart_reruns_protocol_on_active_scene() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = abc(&log);
        machine.set_state(TestScene::B, &mut ctx).unwrap();
        log.lock().unwrap().clear();

        machine.restart(&mut ctx).unwrap();

        assert_eq!(calls(&log), vec!["B.cleanup", "audio.stop_all", "B.startup"]);
        assert_eq!(machine.active_key(), Some(TestScene::B));
    }

    #[test]
    fn observer_sees_every_transition() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = abc(&log);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        machine.set_observer(move |old, new| sink.lock().unwrap().push((old, new)));

        machine.set_state(TestScene::A, &mut ctx).unwrap();
        machine.next_state(&mut ctx).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(None, TestScene::A), (Some(TestScene::A), TestScene::B)]
        );
    }

    #[test]
    fn empty_registry_reports_no_scenes() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = Machine::new();

        assert!(matches!(machine.next_state(&mut ctx), Err(EngineError::NoScenes)));
        assert!(matches!(machine.previous_state(&mut ctx), Err(EngineError::NoScenes)));
        assert_eq!(machine.state(), MachineState::Uninitialized);
    }

    #[test]
    fn shutdown_cleans_up_and_terminates() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = abc(&log);
        machine.set_state(TestScene::C, &mut ctx).unwrap();
        log.lock().unwrap().clear();

        machine.shutdown(&mut ctx).unwrap();
        machine.shutdown(&mut ctx).unwrap();

        assert_eq!(calls(&log), vec!["C.cleanup"]);
        assert_eq!(machine.state(), MachineState::Terminated);
        assert_eq!(ctx.current_scene(), None);
        assert!(matches!(
            machine.set_state(TestScene::A, &mut ctx),
            Err(EngineError::Terminated)
        ));
    }

    #[test]
    fn failed_startup_still_activates_scene() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = Machine::new();
        machine.add(TestScene::A, SpyScene::new("A", &log));
        machine.add(TestScene::B, BrokenStartup);
        machine.set_state(TestScene::A, &mut ctx).unwrap();

        let err = machine.set_state(TestScene::B, &mut ctx).unwrap_err();

        assert!(matches!(err, EngineError::Scene { ref scene, .. } if scene == "B"));
        assert_eq!(machine.state(), MachineState::Active(TestScene::B));
    }

    #[test]
    fn re_registering_keeps_navigation_slot() {
        let log = call_log();
        let mut ctx = spy_context(&log);
        let mut machine = abc(&log);
        machine.add(TestScene::A, SpyScene::new("A2", &log));

        assert_eq!(machine.keys().collect::<Vec<_>>(), vec![TestScene::A, TestScene::B, TestScene::C]);

        machine.next_state(&mut ctx).unwrap();
        assert_eq!(calls(&log), vec!["audio.stop_all", "A2.startup"]);
    }
}
