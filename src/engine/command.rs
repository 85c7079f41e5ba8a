//=========================================================================
// Engine Commands
//=========================================================================
//
// Commands fired by the global action dispatcher.
//
// Built-in bindings (enabled by settings flags):
//   F11    → ToggleFullscreen   (can_fullscreen)
//   F2     → Screenshot         (can_take_screenshots)
//   Escape → Quit               (can_exit_via_escape)
//
// Admin bindings (admin mode only):
//   F3     → RestartScene
//   Right  → NextScene
//   Left   → PreviousScene
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::{Action, ActionDispatcher, KeyCode, Trigger};
use crate::core::settings::EngineConfig;

//=== EngineCommand =======================================================

/// What a global action asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand<A: Action> {
    ToggleFullscreen,
    Screenshot,
    Quit,
    RestartScene,
    NextScene,
    PreviousScene,
    /// Forwarded to the active scene's `on_action`.
    Game(A),
}

//=== Built-in Bindings ===================================================

pub(crate) const FULLSCREEN_ACTION: &str = "fullscreen";
pub(crate) const SCREENSHOT_ACTION: &str = "screenshot";
pub(crate) const EXIT_ACTION: &str = "exit";

pub(crate) const ADMIN_ACTIONS: [&str; 3] = ["admin.refresh", "admin.next", "admin.previous"];

/// Registers the global bindings the config enables.
pub(crate) fn install_defaults<A: Action>(
    dispatcher: &mut ActionDispatcher<EngineCommand<A>>,
    config: &EngineConfig,
) {
    if config.can_fullscreen {
        dispatcher.add_action(
            FULLSCREEN_ACTION,
            Trigger::key_pressed(KeyCode::F11),
            EngineCommand::ToggleFullscreen,
        );
    }
    if config.can_take_screenshots {
        dispatcher.add_action(
            SCREENSHOT_ACTION,
            Trigger::key_pressed(KeyCode::F2),
            EngineCommand::Screenshot,
        );
    }
    if config.can_exit_via_escape {
        dispatcher.add_action(EXIT_ACTION, Trigger::key_pressed(KeyCode::Escape), EngineCommand::Quit);
    }
    if config.admin {
        install_admin(dispatcher);
    }
}

/// Registers the scene navigation bindings.
pub(crate) fn install_admin<A: Action>(dispatcher: &mut ActionDispatcher<EngineCommand<A>>) {
    let [refresh, next, previous] = ADMIN_ACTIONS;
    dispatcher.add_action(refresh, Trigger::key_pressed(KeyCode::F3), EngineCommand::RestartScene);
    dispatcher.add_action(next, Trigger::key_pressed(KeyCode::ArrowRight), EngineCommand::NextScene);
    dispatcher.add_action(
        previous,
        Trigger::key_pressed(KeyCode::ArrowLeft),
        EngineCommand::PreviousScene,
    );
}

/// Removes the scene navigation bindings.
pub(crate) fn remove_admin<A: Action>(dispatcher: &mut ActionDispatcher<EngineCommand<A>>) {
    for name in ADMIN_ACTIONS {
        dispatcher.remove_action(name);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, NoAction};

    type Dispatcher = ActionDispatcher<EngineCommand<NoAction>>;

    #[test]
    fn defaults_follow_config_flags() {
        let mut dispatcher = Dispatcher::new();
        let config = EngineConfig {
            can_take_screenshots: false,
            ..EngineConfig::default()
        };

        install_defaults(&mut dispatcher, &config);

        assert!(dispatcher.contains(FULLSCREEN_ACTION));
        assert!(dispatcher.contains(EXIT_ACTION));
        assert!(!dispatcher.contains(SCREENSHOT_ACTION));
        assert!(!dispatcher.contains("admin.next"));
    }

    #[test]
    fn escape_fires_quit() {
        let mut dispatcher = Dispatcher::new();
        install_defaults(&mut dispatcher, &EngineConfig::default());

        let fired = dispatcher.update(&[InputEvent::key_down(KeyCode::Escape)], 0.016);

        assert_eq!(fired, vec![EngineCommand::Quit]);
    }

    #[test]
    fn admin_bindings_toggle() {
        let mut dispatcher = Dispatcher::new();
        install_admin(&mut dispatcher);
        let right = [InputEvent::key_down(KeyCode::ArrowRight)];
        assert_eq!(dispatcher.update(&right, 0.016), vec![EngineCommand::NextScene]);

        remove_admin(&mut dispatcher);

        assert!(dispatcher.update(&right, 0.016).is_empty());
        assert!(dispatcher.is_empty());
    }
}
