use crate::collision::Collision;
use crate::config::COUNTDOWN_SECONDS;
use crate::error::GameError;
use crate::game::{GameState, World};
use crate::input::KeyCode;
use crate::level::LevelBlockType;
use crate::renderer::{HudView, Overlay, Renderer};
use crate::snake::Controls;
use crate::sound::{SoundCue, SoundHandle};
use crate::state_machine::GameObject;

/// The game objects driven by the state machine, one per screen or actor.
pub enum SnakeGameObject {
    MainMenu(MainMenu),
    Level(LevelObject),
    Snake(SnakeObject),
    LevelStart(LevelStartScreen),
    LevelComplete(LevelCompleteScreen),
    GameOver(GameOverScreen),
}

impl SnakeGameObject {
    fn as_object(&self) -> &dyn GameObject<GameState, World> {
        match self {
            Self::MainMenu(object) => object,
            Self::Level(object) => object,
            Self::Snake(object) => object,
            Self::LevelStart(object) => object,
            Self::LevelComplete(object) => object,
            Self::GameOver(object) => object,
        }
    }

    fn as_object_mut(&mut self) -> &mut dyn GameObject<GameState, World> {
        match self {
            Self::MainMenu(object) => object,
            Self::Level(object) => object,
            Self::Snake(object) => object,
            Self::LevelStart(object) => object,
            Self::LevelComplete(object) => object,
            Self::GameOver(object) => object,
        }
    }
}

impl GameObject<GameState, World> for SnakeGameObject {
    fn update(&mut self, world: &mut World, now: f64) -> Result<(), GameError> {
        self.as_object_mut().update(world, now)
    }

    fn render(&self, world: &World, renderer: &mut dyn Renderer, now: f64) {
        self.as_object().render(world, renderer, now);
    }

    fn on_enter_state(
        &mut self,
        world: &mut World,
        previous: GameState,
        next: GameState,
    ) -> Result<(), GameError> {
        self.as_object_mut().on_enter_state(world, previous, next)
    }
}

/// What a main menu entry does when activated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MenuAction {
    StartNewGame,
    Credits,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

const CREDITS: &[&str] = &[
    "Maze Snake",
    "",
    "Eat the apples, avoid the walls",
    "and don't bite your own tail.",
];

/// Title screen with a small selectable menu.
#[derive(Debug, Clone)]
pub struct MainMenu {
    items: Vec<MenuItem>,
    selected: usize,
    show_credits: bool,
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenu {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: vec![
                MenuItem {
                    label: "Start new game",
                    action: MenuAction::StartNewGame,
                },
                MenuItem {
                    label: "Credits",
                    action: MenuAction::Credits,
                },
            ],
            selected: 0,
            show_credits: false,
        }
    }

    #[must_use]
    pub fn selected(&self) -> MenuItem {
        self.items[self.selected]
    }

    fn activate(&mut self, world: &mut World) {
        match self.selected().action {
            MenuAction::StartNewGame => {
                self.show_credits = false;
                world.request_state(GameState::LevelStart);
            }
            MenuAction::Credits => self.show_credits = !self.show_credits,
        }
    }
}

impl GameObject<GameState, World> for MainMenu {
    fn update(&mut self, world: &mut World, _now: f64) -> Result<(), GameError> {
        match world.input.last_pressed_key() {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(self.items.len() - 1),
            KeyCode::Enter => self.activate(world),
            _ => {}
        }
        world.input.reset_last_pressed_key();
        Ok(())
    }

    fn render(&self, _world: &World, renderer: &mut dyn Renderer, _now: f64) {
        renderer.draw_overlay(&Overlay::MainMenu {
            items: self.items.iter().map(|item| item.label).collect(),
            selected: self.selected,
        });
        if self.show_credits {
            renderer.draw_overlay(&Overlay::Message {
                title: " credits ",
                lines: CREDITS.iter().map(|line| (*line).to_owned()).collect(),
            });
        }
    }

    fn on_enter_state(
        &mut self,
        world: &mut World,
        _previous: GameState,
        next: GameState,
    ) -> Result<(), GameError> {
        if next == GameState::MainMenu {
            world.input.reset_last_pressed_key();
        }
        Ok(())
    }
}

/// The level: walls, apples, level clock, HUD and background music.
#[derive(Debug, Default)]
pub struct LevelObject {
    started: bool,
    music: Option<SoundHandle>,
}

impl LevelObject {
    fn stop_music(&mut self, world: &mut World) {
        if let Some(handle) = self.music.take() {
            world.stop_sound(handle);
        }
    }
}

impl GameObject<GameState, World> for LevelObject {
    fn update(&mut self, world: &mut World, now: f64) -> Result<(), GameError> {
        if !self.started {
            return Ok(());
        }
        if !world.session.timer.is_started() {
            world.session.timer.start(now);
        }
        if world.session.apples_left() <= 0 {
            world.session.timer.stop(now);
            self.started = false;
            world.request_state(GameState::LevelComplete);
        }
        Ok(())
    }

    fn render(&self, world: &World, renderer: &mut dyn Renderer, now: f64) {
        let session = &world.session;
        let Some(grid) = session.grid() else {
            return;
        };

        renderer.draw_board(grid.size());
        for block in grid.blocks().filter(|block| block.kind == LevelBlockType::Wall) {
            renderer.draw_block(block);
        }
        for block in grid.blocks().filter(|block| block.kind == LevelBlockType::Apple) {
            renderer.draw_block(block);
        }
        renderer.draw_hud(&HudView {
            level_number: session.level_number(),
            level_name: grid.name(),
            apples_left: session.apples_left(),
            score: session.score,
            elapsed_seconds: session.timer.elapsed_seconds(now),
            speed: session.snake.speed(),
        });
    }

    fn on_enter_state(
        &mut self,
        world: &mut World,
        previous: GameState,
        next: GameState,
    ) -> Result<(), GameError> {
        if previous == GameState::MainMenu {
            world.session.reset();
            self.started = false;
        }

        match next {
            GameState::LevelStart => world.session.begin_next_level()?,
            GameState::LevelRunning => {
                self.started = true;
                self.stop_music(world);
                self.music = world.play(SoundCue::LevelMusic, true);
            }
            GameState::GameOver => {
                self.started = false;
                self.stop_music(world);
                world.play(SoundCue::GameOver, false);
            }
            GameState::LevelComplete => {
                self.stop_music(world);
                world.play(SoundCue::LevelComplete, false);
            }
            GameState::MainMenu => {}
        }
        Ok(())
    }
}

/// The player's snake. Its state lives in the session.
#[derive(Debug, Default)]
pub struct SnakeObject;

impl GameObject<GameState, World> for SnakeObject {
    fn update(&mut self, world: &mut World, now: f64) -> Result<(), GameError> {
        let controls = Controls {
            turn: world.input.last_pressed_key().direction(),
            accelerate: world.input.is_pressed(KeyCode::A),
            decelerate: world.input.is_pressed(KeyCode::Z),
        };

        let Some(collision) = world.session.advance_snake(now, controls)? else {
            return Ok(());
        };
        if collision.is_fatal() {
            world.request_state(GameState::GameOver);
        } else if matches!(collision, Collision::Apple(_)) {
            world.play(SoundCue::AppleEaten, false);
        }
        Ok(())
    }

    fn render(&self, world: &World, renderer: &mut dyn Renderer, _now: f64) {
        for segment in world.session.snake.segments() {
            renderer.draw_segment(segment);
        }
    }

    fn on_enter_state(
        &mut self,
        world: &mut World,
        _previous: GameState,
        next: GameState,
    ) -> Result<(), GameError> {
        match next {
            GameState::LevelRunning => world.session.snake.start(),
            GameState::LevelComplete | GameState::GameOver => world.session.snake.stop(),
            GameState::MainMenu | GameState::LevelStart => {}
        }
        Ok(())
    }
}

/// "Get ready" countdown before a level runs.
#[derive(Debug, Clone, Copy)]
pub struct LevelStartScreen {
    started_at: Option<f64>,
    seconds_left: i64,
}

impl Default for LevelStartScreen {
    fn default() -> Self {
        Self {
            started_at: None,
            seconds_left: i64::from(COUNTDOWN_SECONDS),
        }
    }
}

impl GameObject<GameState, World> for LevelStartScreen {
    fn update(&mut self, world: &mut World, now: f64) -> Result<(), GameError> {
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed_seconds = ((now - started_at).max(0.0) / 1000.0) as i64;
        self.seconds_left = i64::from(COUNTDOWN_SECONDS) - elapsed_seconds;

        if self.seconds_left < 0 {
            world.request_state(GameState::LevelRunning);
        }
        Ok(())
    }

    fn render(&self, _world: &World, renderer: &mut dyn Renderer, _now: f64) {
        renderer.draw_overlay(&Overlay::Countdown {
            seconds_left: self.seconds_left,
        });
    }

    fn on_enter_state(
        &mut self,
        world: &mut World,
        _previous: GameState,
        next: GameState,
    ) -> Result<(), GameError> {
        if next == GameState::LevelStart {
            *self = Self::default();
            world.input.reset_last_pressed_key();
            world.play(SoundCue::Countdown, false);
        }
        Ok(())
    }
}

/// Shows the time bonus and waits for Enter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelCompleteScreen {
    bonus: u32,
}

impl GameObject<GameState, World> for LevelCompleteScreen {
    fn update(&mut self, world: &mut World, now: f64) -> Result<(), GameError> {
        self.bonus = world.session.time_bonus(now);

        if world.input.last_pressed_key() == KeyCode::Enter {
            world.session.score += self.bonus;
            world.request_state(GameState::LevelStart);
        }
        Ok(())
    }

    fn render(&self, _world: &World, renderer: &mut dyn Renderer, _now: f64) {
        renderer.draw_overlay(&Overlay::LevelComplete { bonus: self.bonus });
    }

    fn on_enter_state(
        &mut self,
        world: &mut World,
        _previous: GameState,
        next: GameState,
    ) -> Result<(), GameError> {
        if next == GameState::LevelComplete {
            self.bonus = 0;
            world.input.reset_last_pressed_key();
        }
        Ok(())
    }
}

/// Shows the final score and waits for Enter.
#[derive(Debug, Default)]
pub struct GameOverScreen;

impl GameObject<GameState, World> for GameOverScreen {
    fn update(&mut self, world: &mut World, _now: f64) -> Result<(), GameError> {
        if world.input.last_pressed_key() == KeyCode::Enter {
            world.request_state(GameState::MainMenu);
        }
        Ok(())
    }

    fn render(&self, world: &World, renderer: &mut dyn Renderer, _now: f64) {
        renderer.draw_overlay(&Overlay::GameOver {
            score: world.session.score,
        });
    }

    fn on_enter_state(
        &mut self,
        world: &mut World,
        _previous: GameState,
        next: GameState,
    ) -> Result<(), GameError> {
        if next == GameState::GameOver {
            world.input.reset_last_pressed_key();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::error::{LevelError, SoundError};
    use crate::game::{GameState, World};
    use crate::input::KeyCode;
    use crate::level::{EmbeddedLevels, LevelData, LevelLoader};
    use crate::renderer::tests::RecordingRenderer;
    use crate::session::LevelSession;
    use crate::sound::{SilentSoundPlayer, SoundCue, SoundHandle, SoundPlayer};
    use crate::state_machine::{GameObject, TransitionRequests};

    use super::{LevelCompleteScreen, LevelObject, LevelStartScreen, MainMenu};

    /// Records cue traffic into a shared log.
    struct RecordingSound {
        log: Rc<RefCell<Vec<String>>>,
        next_handle: u32,
    }

    impl SoundPlayer for RecordingSound {
        fn play(&mut self, cue: SoundCue, looping: bool) -> Result<SoundHandle, SoundError> {
            self.next_handle += 1;
            self.log
                .borrow_mut()
                .push(format!("play {cue:?} looping={looping}"));
            Ok(SoundHandle(self.next_handle))
        }

        fn stop(&mut self, handle: SoundHandle) -> Result<(), SoundError> {
            self.log.borrow_mut().push(format!("stop {}", handle.0));
            Ok(())
        }
    }

    /// A level that is already won: no apples required.
    struct NothingToEat;

    impl LevelLoader for NothingToEat {
        fn level_count(&self) -> u32 {
            1
        }

        fn load(&self, _number: u32) -> Result<LevelData, LevelError> {
            let mut data = vec![vec![0; 6]; 5];
            data[0] = vec![1; 6];
            Ok(LevelData {
                name: "Empty".to_owned(),
                apple_count: 0,
                time_bonus_until: 5,
                start_x: 3,
                start_y: 2,
                data,
            })
        }
    }

    fn world() -> World {
        World::new(
            LevelSession::new(Box::new(EmbeddedLevels), StdRng::seed_from_u64(9)),
            Box::new(SilentSoundPlayer::default()),
        )
    }

    #[test]
    fn menu_selection_is_clamped_and_credits_toggle() {
        let mut world = world();
        let mut menu = MainMenu::new();

        for key in [KeyCode::Down, KeyCode::Down, KeyCode::Enter] {
            world.input.press(key, 0.0);
            menu.update(&mut world, 0.0).expect("menu update");
            assert_eq!(world.input.last_pressed_key(), KeyCode::None);
        }
        assert_eq!(menu.selected().label, "Credits");
        assert_eq!(world.take_requested_state(), None);

        let mut renderer = RecordingRenderer::default();
        menu.render(&world, &mut renderer, 0.0);
        assert_eq!(renderer.overlays(), vec!["menu Credits", " credits "]);

        world.input.press(KeyCode::Up, 0.0);
        menu.update(&mut world, 0.0).expect("menu update");
        world.input.press(KeyCode::Up, 0.0);
        menu.update(&mut world, 0.0).expect("menu update");
        world.input.press(KeyCode::Enter, 0.0);
        menu.update(&mut world, 0.0).expect("menu update");

        assert_eq!(world.take_requested_state(), Some(GameState::LevelStart));
        let mut renderer = RecordingRenderer::default();
        menu.render(&world, &mut renderer, 0.0);
        assert_eq!(renderer.overlays(), vec!["menu Start new game"]);
    }

    #[test]
    fn countdown_runs_from_first_update_and_ends_below_zero() {
        let mut world = world();
        let mut screen = LevelStartScreen::default();
        screen
            .on_enter_state(&mut world, GameState::MainMenu, GameState::LevelStart)
            .expect("enter");

        let mut shown = Vec::new();
        for now in [10_000.0, 11_500.0, 12_999.0, 13_500.0] {
            screen.update(&mut world, now).expect("update");
            shown.push(screen.seconds_left);
        }
        assert_eq!(shown, vec![3, 2, 1, 0]);
        assert_eq!(world.take_requested_state(), None);

        screen.update(&mut world, 14_001.0).expect("update");
        assert_eq!(screen.seconds_left, -1);
        assert_eq!(world.take_requested_state(), Some(GameState::LevelRunning));

        // Re-entering starts a fresh countdown.
        screen
            .on_enter_state(&mut world, GameState::LevelComplete, GameState::LevelStart)
            .expect("enter");
        screen.update(&mut world, 50_000.0).expect("update");
        assert_eq!(screen.seconds_left, 3);
    }

    #[test]
    fn time_bonus_is_shown_then_banked_on_enter() {
        let mut world = world();
        world.session.begin_next_level().expect("level 1 loads");
        world.session.score = 100;
        world.session.timer.start(0.0);
        world.session.timer.stop(5_000.0);
        let mut screen = LevelCompleteScreen::default();
        screen
            .on_enter_state(&mut world, GameState::LevelRunning, GameState::LevelComplete)
            .expect("enter");

        screen.update(&mut world, 9_000.0).expect("update");
        assert_eq!(screen.bonus, 550);
        assert_eq!(world.session.score, 100);
        assert_eq!(world.take_requested_state(), None);

        world.input.press(KeyCode::Enter, 9_000.0);
        screen.update(&mut world, 9_100.0).expect("update");
        assert_eq!(world.session.score, 650);
        assert_eq!(world.take_requested_state(), Some(GameState::LevelStart));
    }

    #[test]
    fn level_music_stops_before_game_over_cue() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new(
            LevelSession::new(Box::new(NothingToEat), StdRng::seed_from_u64(1)),
            Box::new(RecordingSound {
                log: Rc::clone(&log),
                next_handle: 0,
            }),
        );
        let mut level = LevelObject::default();

        level
            .on_enter_state(&mut world, GameState::MainMenu, GameState::LevelStart)
            .expect("level loads");
        level
            .on_enter_state(&mut world, GameState::LevelStart, GameState::LevelRunning)
            .expect("enter running");
        level
            .on_enter_state(&mut world, GameState::LevelRunning, GameState::GameOver)
            .expect("enter game over");

        assert_eq!(
            *log.borrow(),
            vec![
                "play LevelMusic looping=true",
                "stop 1",
                "play GameOver looping=false"
            ]
        );
    }

    #[test]
    fn level_with_no_apples_left_completes_and_freezes_clock() {
        let mut world = World::new(
            LevelSession::new(Box::new(NothingToEat), StdRng::seed_from_u64(1)),
            Box::new(SilentSoundPlayer::default()),
        );
        let mut level = LevelObject::default();
        level
            .on_enter_state(&mut world, GameState::MainMenu, GameState::LevelStart)
            .expect("level loads");

        level.update(&mut world, 100.0).expect("update");
        assert_eq!(world.take_requested_state(), None);

        level
            .on_enter_state(&mut world, GameState::LevelStart, GameState::LevelRunning)
            .expect("enter running");
        level.update(&mut world, 1_000.0).expect("update");

        assert_eq!(world.take_requested_state(), Some(GameState::LevelComplete));
        assert!(world.session.timer.is_started());
        assert_eq!(world.session.timer.elapsed_seconds(60_000.0), 0);

        level.update(&mut world, 2_000.0).expect("update");
        assert_eq!(world.take_requested_state(), None);
    }
}
