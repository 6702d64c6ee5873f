use rand::rngs::StdRng;

use crate::error::GameError;
use crate::input::InputState;
use crate::level::LevelLoader;
use crate::objects::{
    GameOverScreen, LevelCompleteScreen, LevelObject, LevelStartScreen, MainMenu, SnakeObject,
    SnakeGameObject,
};
use crate::renderer::Renderer;
use crate::session::LevelSession;
use crate::sound::{SoundCue, SoundHandle, SoundPlayer};
use crate::state_machine::{StateMachine, TransitionRequests};

/// Discrete screens of the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum GameState {
    MainMenu,
    LevelStart,
    LevelRunning,
    LevelComplete,
    GameOver,
}

/// Everything game objects share: the session, input and sound output.
pub struct World {
    pub session: LevelSession,
    pub input: InputState,
    sound: Box<dyn SoundPlayer>,
    requested_state: Option<GameState>,
}

impl World {
    #[must_use]
    pub fn new(session: LevelSession, sound: Box<dyn SoundPlayer>) -> Self {
        Self {
            session,
            input: InputState::new(),
            sound,
            requested_state: None,
        }
    }

    /// Asks the state machine to switch state after the current object's update.
    pub fn request_state(&mut self, state: GameState) {
        self.requested_state = Some(state);
    }

    /// Plays a cue. Failures are logged and never interrupt the frame.
    pub fn play(&mut self, cue: SoundCue, looping: bool) -> Option<SoundHandle> {
        match self.sound.play(cue, looping) {
            Ok(handle) => Some(handle),
            Err(error) => {
                tracing::warn!(?cue, %error, "failed to play sound");
                None
            }
        }
    }

    pub fn stop_sound(&mut self, handle: SoundHandle) {
        if let Err(error) = self.sound.stop(handle) {
            tracing::warn!(handle = handle.0, %error, "failed to stop sound");
        }
    }
}

impl TransitionRequests<GameState> for World {
    fn take_requested_state(&mut self) -> Option<GameState> {
        self.requested_state.take()
    }
}

/// Wires the game objects into the five-state lifecycle.
pub struct SnakeGame {
    machine: StateMachine<GameState, SnakeGameObject>,
    world: World,
}

impl SnakeGame {
    /// Builds the game and enters the main menu.
    pub fn new(
        levels: Box<dyn LevelLoader>,
        sound: Box<dyn SoundPlayer>,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        let world = World::new(LevelSession::new(levels, rng), sound);
        let mut machine = StateMachine::new(GameState::MainMenu);

        let menu = machine.add_object(SnakeGameObject::MainMenu(MainMenu::new()));
        let level = machine.add_object(SnakeGameObject::Level(LevelObject::default()));
        let snake = machine.add_object(SnakeGameObject::Snake(SnakeObject));
        let level_start =
            machine.add_object(SnakeGameObject::LevelStart(LevelStartScreen::default()));
        let level_complete =
            machine.add_object(SnakeGameObject::LevelComplete(LevelCompleteScreen::default()));
        let game_over = machine.add_object(SnakeGameObject::GameOver(GameOverScreen));

        machine.register_state(GameState::MainMenu, &[menu]);
        machine.register_state(GameState::LevelStart, &[level, snake, level_start]);
        machine.register_state(GameState::LevelRunning, &[level, snake]);
        machine.register_state(GameState::LevelComplete, &[level, snake, level_complete]);
        machine.register_state(GameState::GameOver, &[level, snake, game_over]);

        let mut game = Self { machine, world };
        game.machine
            .change_state(&mut game.world, GameState::MainMenu)?;
        Ok(game)
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.machine.current_state()
    }

    /// Forces a state change, running the entry hooks of the new state.
    pub fn change_state(&mut self, state: GameState) -> Result<(), GameError> {
        self.machine.change_state(&mut self.world, state)
    }

    pub fn update(&mut self, now: f64) -> Result<(), GameError> {
        self.machine.update(&mut self.world, now)
    }

    pub fn render(&self, renderer: &mut dyn Renderer, now: f64) -> Result<(), GameError> {
        self.machine.render(&self.world, renderer, now)
    }

    /// Update then render one frame.
    pub fn tick(&mut self, renderer: &mut dyn Renderer, now: f64) -> Result<(), GameError> {
        self.machine.tick(&mut self.world, renderer, now)
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.world.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.world.input
    }

    #[must_use]
    pub fn session(&self) -> &LevelSession {
        &self.world.session
    }

    pub fn session_mut(&mut self) -> &mut LevelSession {
        &mut self.world.session
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::error::GameError;
    use crate::level::EmbeddedLevels;
    use crate::renderer::tests::{Draw, RecordingRenderer};
    use crate::sound::SilentSoundPlayer;

    use super::{GameState, SnakeGame};

    fn game() -> SnakeGame {
        SnakeGame::new(
            Box::new(EmbeddedLevels),
            Box::new(SilentSoundPlayer::default()),
            StdRng::seed_from_u64(3),
        )
        .expect("game should build")
    }

    #[test]
    fn game_starts_in_main_menu() {
        let mut game = game();
        let mut renderer = RecordingRenderer::default();

        game.tick(&mut renderer, 0.0).expect("frame should run");

        assert_eq!(game.state(), GameState::MainMenu);
        assert_eq!(renderer.overlays(), vec!["menu Start new game"]);
    }

    #[test]
    fn level_start_draws_board_then_snake_then_countdown() {
        let mut game = game();
        game.change_state(GameState::LevelStart)
            .expect("level should load");
        let mut renderer = RecordingRenderer::default();

        game.render(&mut renderer, 0.0).expect("frame should render");

        let first_segment = renderer
            .draws
            .iter()
            .position(|draw| matches!(draw, Draw::Segment(_)))
            .expect("snake is drawn");
        let hud = renderer
            .draws
            .iter()
            .position(|draw| matches!(draw, Draw::Hud(_)))
            .expect("hud is drawn");
        assert!(matches!(renderer.draws[0], Draw::Board(_)));
        assert!(hud < first_segment);
        assert!(matches!(renderer.draws.last(), Some(Draw::Overlay(text)) if text == "countdown 3"));
    }

    #[test]
    fn entering_an_unloadable_level_is_fatal() {
        struct Broken;
        impl crate::level::LevelLoader for Broken {
            fn level_count(&self) -> u32 {
                1
            }
            fn load(
                &self,
                number: u32,
            ) -> Result<crate::level::LevelData, crate::error::LevelError> {
                Err(crate::error::LevelError::NotFound { number })
            }
        }
        let mut game = SnakeGame::new(
            Box::new(Broken),
            Box::new(SilentSoundPlayer::default()),
            StdRng::seed_from_u64(3),
        )
        .expect("menu needs no level");

        assert!(matches!(
            game.change_state(GameState::LevelStart),
            Err(GameError::Level(_))
        ));
    }
}
