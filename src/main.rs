//=========================================================================
// Launchpad — demo shell
//
// Splash (shrinking, fading badge) → Menu.
//
//   F11 fullscreen · F2 screenshot · Esc quit
//   admin: F3 refresh · ←/→ previous/next scene
//
//=========================================================================

use std::process::ExitCode;

use launchpad_engine::core::settings::DEFAULT_SETTINGS_PATH;
use launchpad_engine::prelude::*;
use log::{error, info, warn};

//=== Scenes ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GameScene {
    Splash,
    Menu,
}

impl SceneKey for GameScene {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MenuAction {
    Select,
}

impl Action for MenuAction {}

//--- Splash --------------------------------------------------------------

struct Splash {
    base_ratio: f32,
    alpha: f32,
}

impl Splash {
    const FADE_SPEED: f32 = 50.0;
    const SHRINK_SPEED: f32 = 1.0;

    fn new() -> Self {
        Self {
            base_ratio: 4.0,
            alpha: 255.0,
        }
    }
}

impl Scene<GameScene, MenuAction> for Splash {
    fn startup(&mut self, ctx: &mut SceneContext<GameScene>) -> SceneResult {
        ctx.display.set_title("Splash");
        self.base_ratio = 4.0;
        self.alpha = 255.0;
        Ok(())
    }

    fn update(
        &mut self,
        _surface: &mut dyn RenderSurface,
        dt: f32,
        ctx: &mut SceneContext<GameScene>,
    ) -> SceneResult {
        self.alpha = (self.alpha - Self::FADE_SPEED * dt).clamp(0.0, 255.0);
        self.base_ratio += Self::SHRINK_SPEED * dt;

        if self.alpha <= 0.0 {
            ctx.switch_to(GameScene::Menu);
        }
        Ok(())
    }

    fn render(&mut self, surface: &mut dyn RenderSurface, ctx: &SceneContext<GameScene>) -> SceneResult {
        surface.clear(Color::PLATINUM);

        let side = ctx.size_dependent(self.base_ratio) as u32;
        let view = ctx.viewport();
        let x = (view.width / 2) as i32 - (side / 2) as i32;
        let y = (view.height / 2) as i32 - (side / 2) as i32;
        surface.fill_rect(
            Rect::new(x, y, side, side),
            Color::DARK_GREEN.with_alpha(self.alpha as u8),
        );
        Ok(())
    }
}

//--- Menu ----------------------------------------------------------------

struct Menu {
    selections: u32,
}

impl Scene<GameScene, MenuAction> for Menu {
    fn startup(&mut self, ctx: &mut SceneContext<GameScene>) -> SceneResult {
        ctx.display.set_title("Menu");
        ctx.audio.load("select", "assets/sounds/select.wav");
        Ok(())
    }

    fn on_action(&mut self, action: MenuAction, ctx: &mut SceneContext<GameScene>) -> SceneResult {
        match action {
            MenuAction::Select => {
                self.selections += 1;
                ctx.audio.play("select", 0, 0, None);
                info!(target: "scene", "Menu selection #{}", self.selections);
            }
        }
        Ok(())
    }

    fn update(
        &mut self,
        _surface: &mut dyn RenderSurface,
        _dt: f32,
        _ctx: &mut SceneContext<GameScene>,
    ) -> SceneResult {
        Ok(())
    }

    fn render(&mut self, surface: &mut dyn RenderSurface, _ctx: &SceneContext<GameScene>) -> SceneResult {
        surface.clear(Color::PLATINUM);
        Ok(())
    }
}

//=== Entry Point =========================================================

/// Default output device when built with the `rodio` feature, silence
/// otherwise or when no device is present.
#[cfg(feature = "rodio")]
fn with_audio(builder: EngineBuilder<GameScene, MenuAction>) -> EngineBuilder<GameScene, MenuAction> {
    match RodioBackend::open() {
        Ok(backend) => builder.with_audio_backend(backend),
        Err(err) => {
            warn!("Audio disabled: {}", err);
            builder
        }
    }
}

#[cfg(not(feature = "rodio"))]
fn with_audio(builder: EngineBuilder<GameScene, MenuAction>) -> EngineBuilder<GameScene, MenuAction> {
    warn!("Built without the `rodio` feature, audio is silent");
    builder
}

fn run() -> Result<(), EngineError> {
    let settings = Settings::load(DEFAULT_SETTINGS_PATH);

    let builder = EngineBuilder::<GameScene, MenuAction>::new()
        .with_settings(settings)
        .with_scene_fade(400.0);
    let mut engine = with_audio(builder).build()?;

    engine.register(GameScene::Splash, Splash::new());
    engine.register(GameScene::Menu, Menu { selections: 0 });
    engine.bind_action("select", Trigger::key_pressed(KeyCode::Enter), MenuAction::Select);
    engine.set_state(GameScene::Splash)?;

    engine.run_windowed()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
