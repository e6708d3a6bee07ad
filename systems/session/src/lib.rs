#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mode state machine that ties levels, enemies, replays and the editor together.
//!
//! The [`Session`] never sleeps. Every delay becomes a [`TimerToken`] handed to
//! the host's [`Timer`]; the host passes the token back through
//! [`Session::on_timer`] once it is due. Tokens carry the epoch that scheduled
//! them and are dropped when the session has since moved on.

mod buttons;
mod scoreboard;

use std::path::PathBuf;

use labyrinth_core::{
    ContentError, Direction, EnemyId, Event, GameConfig, Input, LayoutSymbol, LevelRef,
    Liveness, LoadError, Mode, PauseKind, Position, Timer, TimerToken, GAME_TITLE,
};
use labyrinth_system_editor::{EditorOutcome, LevelEditor};
use labyrinth_system_enemy_ai::{EnemyAi, TickOutcome};
use labyrinth_system_replay::{Replay, ReplayKind, ReplayStep};
use labyrinth_world::{built_in_levels, GameLevel, MazeFile, MazeLayout, Player, Steering};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use buttons::{Button, ButtonAction};
pub use scoreboard::{Notice, Scoreboard};

/// Message shown once the victory replay has walked back to the spawn.
pub const VICTORY_MESSAGE: &str = "Bravo!";

const CUSTOM_LEVEL_NAME: &str = "Custom Level";

/// Failures raised while switching modes. The session recovers from all of
/// them by returning to the menu.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The maze cannot be played.
    #[error(transparent)]
    Content(#[from] ContentError),
    /// The maze source could not be read.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// A built-in level index outside the campaign.
    #[error("level {0} does not exist")]
    UnknownLevel(usize),
    /// Custom play was requested before a custom level existed.
    #[error("no custom level has been authored")]
    MissingCustomLevel,
}

/// File the host asks the session to play as a custom level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CustomSource {
    /// In-game layout text (`. X T E S F P`).
    Layout(PathBuf),
    /// Raw maze file (`. # x X`).
    Maze(PathBuf),
}

/// Stage of a running level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayPhase {
    /// Keyboard input moves the player and collisions are checked.
    Interactive,
    /// The recorded solution is being replayed.
    AutoSolving,
    /// Showing the finished auto-solve before resetting the player.
    AutoFinishPause,
    /// The player's moves are being walked back after reaching the end.
    VictoryReplay,
    /// Showing the victory message.
    VictoryMessage,
    /// The player was caught; waiting to return to the menu.
    Defeated,
}

impl PlayPhase {
    const fn accepts_buttons(self) -> bool {
        matches!(
            self,
            Self::Interactive | Self::AutoSolving | Self::AutoFinishPause
        )
    }
}

#[derive(Debug)]
struct ActivePlay {
    level: LevelRef,
    player: Player,
    phase: PlayPhase,
    replay: Option<Replay>,
}

enum FrameOutcome {
    Continue,
    Caught(EnemyId),
    ReachedEnd,
}

fn level_slot<'a>(
    levels: &'a mut [GameLevel],
    custom: &'a mut Option<GameLevel>,
    level: LevelRef,
) -> Result<&'a mut GameLevel, SessionError> {
    match level {
        LevelRef::BuiltIn(index) => levels
            .get_mut(index)
            .ok_or(SessionError::UnknownLevel(index)),
        LevelRef::Custom => custom.as_mut().ok_or(SessionError::MissingCustomLevel),
    }
}

/// The game: current mode, resident level and editor, and the UI around them.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    levels: Vec<GameLevel>,
    custom: Option<GameLevel>,
    editor: Option<LevelEditor>,
    ai: EnemyAi,
    mode: Mode,
    play: Option<ActivePlay>,
    buttons: Vec<Button>,
    scoreboard: Scoreboard,
    final_score: u32,
    notice: Option<Notice>,
    next_notice: u64,
    banner: Option<&'static str>,
    epoch: u64,
    victory_armed: bool,
    running: bool,
}

impl Session {
    /// Creates a session over the built-in campaign.
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        let levels = built_in_levels(&config)?;
        Ok(Self::with_levels(config, levels))
    }

    /// Creates a session over a caller-provided campaign.
    #[must_use]
    pub fn with_levels(config: GameConfig, levels: Vec<GameLevel>) -> Self {
        let ai = EnemyAi::new(config.rng_seed);
        Self {
            config,
            levels,
            custom: None,
            editor: None,
            ai,
            mode: Mode::Menu,
            play: None,
            buttons: buttons::menu_buttons(),
            scoreboard: Scoreboard::default(),
            final_score: 0,
            notice: None,
            next_notice: 0,
            banner: None,
            epoch: 0,
            victory_armed: false,
            running: true,
        }
    }

    /// Announces the initial menu.
    pub fn boot(&mut self, out: &mut Vec<Event>) {
        info!(title = GAME_TITLE, levels = self.levels.len(), "session started");
        out.push(Event::ModeChanged { mode: self.mode });
        out.push(Event::RedrawRequested);
    }

    /// Whether the session still accepts input.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Active mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Tunables in effect.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Built-in campaign.
    #[must_use]
    pub fn levels(&self) -> &[GameLevel] {
        &self.levels
    }

    /// Buttons of the active screen.
    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Score display.
    #[must_use]
    pub const fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Score reported on the victory screen.
    #[must_use]
    pub const fn final_score(&self) -> u32 {
        self.final_score
    }

    /// Visible transient message.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|notice| notice.text.as_str())
    }

    /// Message written over the level after the victory replay.
    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    /// Whether the victory screen accepts clicks yet.
    #[must_use]
    pub const fn victory_armed(&self) -> bool {
        self.victory_armed
    }

    /// Resident level editor, if in create mode.
    #[must_use]
    pub const fn editor(&self) -> Option<&LevelEditor> {
        self.editor.as_ref()
    }

    /// Stage of the running level.
    #[must_use]
    pub fn phase(&self) -> Option<PlayPhase> {
        self.play.as_ref().map(|play| play.phase)
    }

    /// Player of the running level.
    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.play.as_ref().map(|play| &play.player)
    }

    /// Level currently being played.
    #[must_use]
    pub fn active_level(&self) -> Option<&GameLevel> {
        let play = self.play.as_ref()?;
        match play.level {
            LevelRef::BuiltIn(index) => self.levels.get(index),
            LevelRef::Custom => self.custom.as_ref(),
        }
    }

    /// Routes one host input.
    pub fn handle(&mut self, input: Input, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        if !self.running {
            return;
        }
        match input {
            Input::Close => self.shutdown(out),
            Input::Key(direction) => self.handle_key(direction, timer, out),
            Input::Click(point) => self.handle_click(point, timer, out),
        }
    }

    /// Processes a timer token that came due.
    pub fn on_timer(&mut self, token: TimerToken, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        if !self.running {
            return;
        }
        match token {
            TimerToken::EnemyTick { epoch, enemy } if epoch == self.epoch => {
                self.tick_enemy(enemy, timer, out);
            }
            TimerToken::ReplayStep { epoch } if epoch == self.epoch => {
                self.step_replay(timer, out);
            }
            TimerToken::Pause { epoch, kind } if epoch == self.epoch => {
                self.finish_pause(kind, timer, out);
            }
            TimerToken::NoticeExpired { serial } => {
                if self.notice.as_ref().is_some_and(|notice| notice.serial == serial) {
                    self.notice = None;
                    out.push(Event::RedrawRequested);
                }
            }
            TimerToken::EnemyTick { .. }
            | TimerToken::ReplayStep { .. }
            | TimerToken::Pause { .. } => {
                debug!(?token, "dropping stale timer token");
            }
        }
    }

    /// Runs the per-frame checks of a level: treasure pickup, enemy contact,
    /// then the end marker. Nothing is checked while a replay steers.
    pub fn frame(&mut self, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        let epoch = self.epoch;
        let threshold = self.config.collision_distance;
        let Some(play) = self.play.as_mut() else {
            return;
        };
        if play.phase != PlayPhase::Interactive
            || play.player.steering() != Steering::Manual
            || play.player.liveness() == Liveness::Parked
        {
            return;
        }
        let Ok(level) = level_slot(&mut self.levels, &mut self.custom, play.level) else {
            return;
        };

        let position = play.player.position();
        for (treasure, gold) in level.collect_treasures(position, threshold) {
            play.player.add_gold(gold);
            self.scoreboard.record(play.player.gold());
            debug!(treasure = treasure.get(), gold = play.player.gold(), "treasure collected");
            out.push(Event::TreasureCollected {
                treasure,
                gold: play.player.gold(),
            });
            out.push(Event::RedrawRequested);
        }

        let outcome = if let Some(enemy) = level.enemy_touching(position, threshold) {
            FrameOutcome::Caught(enemy)
        } else if level.reached_end(position, threshold) {
            FrameOutcome::ReachedEnd
        } else {
            FrameOutcome::Continue
        };

        match outcome {
            FrameOutcome::Continue => {}
            FrameOutcome::Caught(enemy) => {
                info!(level = %level.name(), enemy = enemy.get(), "player caught");
                play.player.park();
                level.exit();
                play.phase = PlayPhase::Defeated;
                out.push(Event::PlayerCaught { enemy });
                out.push(Event::RedrawRequested);
                timer.after(
                    self.config.death_pause(),
                    TimerToken::Pause {
                        epoch,
                        kind: PauseKind::Defeat,
                    },
                );
            }
            FrameOutcome::ReachedEnd => {
                info!(level = %level.name(), moves = play.player.history().len(), "end reached");
                play.replay = Some(Replay::begin_reverse(&mut play.player));
                play.phase = PlayPhase::VictoryReplay;
                self.step_replay(timer, out);
            }
        }
    }

    /// Loads a maze file and plays it as the custom level.
    ///
    /// Failures are reported as a notice and leave the session in the menu.
    pub fn open_custom(
        &mut self,
        source: &CustomSource,
        timer: &mut dyn Timer,
        out: &mut Vec<Event>,
    ) {
        let layout = match source {
            CustomSource::Layout(path) => MazeLayout::load(path),
            CustomSource::Maze(path) => MazeFile::load(path).map(|maze| maze.to_layout()),
        };
        match layout {
            Ok(layout) => self.play_custom(layout, timer, out),
            Err(error) => self.recover(SessionError::from(error), timer, out),
        }
    }

    fn handle_key(&mut self, direction: Direction, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        let cell_size = self.config.cell_size;
        let Some(play) = self.play.as_mut() else {
            return;
        };
        if play.phase != PlayPhase::Interactive {
            return;
        }
        let Ok(level) = level_slot(&mut self.levels, &mut self.custom, play.level) else {
            return;
        };
        if play.player.try_move(direction, level.walls(), cell_size) {
            out.push(Event::RedrawRequested);
            self.frame(timer, out);
        }
    }

    fn handle_click(&mut self, point: Position, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        match self.mode {
            Mode::Create => self.handle_editor_click(point, timer, out),
            Mode::Victory if !self.victory_armed => {}
            _ => {
                if self
                    .play
                    .as_ref()
                    .is_some_and(|play| !play.phase.accepts_buttons())
                {
                    return;
                }
                if let Some(action) = buttons::hit(&self.buttons, point) {
                    self.apply(action, timer, out);
                }
            }
        }
    }

    fn apply(&mut self, action: ButtonAction, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        debug!(?action, mode = ?self.mode, "button pressed");
        match action {
            ButtonAction::PlayLevels => {
                self.transition(Mode::PlayLevel(LevelRef::BuiltIn(0)), timer, out);
            }
            ButtonAction::PlayBuiltIn(index) => {
                self.transition(Mode::PlayLevel(LevelRef::BuiltIn(index)), timer, out);
            }
            ButtonAction::CreateLevel => {
                let target = if self.mode == Mode::PlayLevel(LevelRef::Custom) {
                    Mode::Menu
                } else {
                    Mode::Create
                };
                self.transition(target, timer, out);
            }
            ButtonAction::SelectLevel => self.transition(Mode::Select, timer, out),
            ButtonAction::Menu | ButtonAction::Back | ButtonAction::MainMenu => {
                self.transition(Mode::Menu, timer, out);
            }
            ButtonAction::Auto => self.start_auto_solve(timer, out),
            ButtonAction::Quit => self.shutdown(out),
            ButtonAction::PlayMap | ButtonAction::ClearAll => {}
        }
    }

    fn handle_editor_click(
        &mut self,
        point: Position,
        timer: &mut dyn Timer,
        out: &mut Vec<Event>,
    ) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match editor.handle_click(point) {
            EditorOutcome::PlayRequested => {
                let layout = editor.export();
                if layout.contains(LayoutSymbol::Start) && layout.contains(LayoutSymbol::End) {
                    self.play_custom(layout, timer, out);
                } else {
                    let error = ContentError::MissingStartOrEnd;
                    warn!(%error, "custom level rejected");
                    self.show_notice(error.to_string(), self.config.content_notice(), timer, out);
                }
            }
            EditorOutcome::Rejected(reason) => {
                out.push(Event::PlacementRejected { reason });
                if let Some(message) = reason.message() {
                    self.show_notice(message.to_owned(), self.config.editor_notice(), timer, out);
                }
            }
            EditorOutcome::Cleared | EditorOutcome::Selected(_) | EditorOutcome::Placed(_) => {
                out.push(Event::RedrawRequested);
            }
            EditorOutcome::Ignored => {}
        }
    }

    fn play_custom(&mut self, layout: MazeLayout, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        match GameLevel::new(CUSTOM_LEVEL_NAME, layout, Vec::new(), &self.config) {
            Ok(level) => {
                self.custom = Some(level);
                self.transition(Mode::PlayLevel(LevelRef::Custom), timer, out);
            }
            Err(error) => self.recover(error.into(), timer, out),
        }
    }

    fn start_auto_solve(&mut self, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        let Some(play) = self.play.as_mut() else {
            return;
        };
        if play.phase != PlayPhase::Interactive {
            return;
        }
        let Ok(level) = level_slot(&mut self.levels, &mut self.custom, play.level) else {
            return;
        };
        let Some(spawn) = level.player_spawn() else {
            return;
        };
        if !level.has_auto_solution() {
            return;
        }
        play.replay = Some(Replay::begin_auto_solve(
            level.auto_solution(),
            &mut play.player,
            spawn,
        ));
        play.phase = PlayPhase::AutoSolving;
        self.step_replay(timer, out);
    }

    fn step_replay(&mut self, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        let epoch = self.epoch;
        let Some(play) = self.play.as_mut() else {
            return;
        };
        let Some(replay) = play.replay.as_mut() else {
            return;
        };
        let kind = replay.kind();

        match replay.advance(&mut play.player, self.config.cell_size) {
            ReplayStep::Moved(_) => {
                let delay = match kind {
                    ReplayKind::AutoSolve => self.config.auto_step(),
                    ReplayKind::Reverse => self.config.victory_step(),
                };
                timer.after(delay, TimerToken::ReplayStep { epoch });
            }
            ReplayStep::Finished => {
                play.replay = None;
                match kind {
                    ReplayKind::AutoSolve => {
                        play.phase = PlayPhase::AutoFinishPause;
                        timer.after(
                            self.config.auto_finish_pause(),
                            TimerToken::Pause {
                                epoch,
                                kind: PauseKind::AutoSolveFinished,
                            },
                        );
                    }
                    ReplayKind::Reverse => {
                        play.phase = PlayPhase::VictoryMessage;
                        self.banner = Some(VICTORY_MESSAGE);
                        out.push(Event::NoticeShown {
                            text: VICTORY_MESSAGE.to_owned(),
                        });
                        timer.after(
                            self.config.victory_message_pause(),
                            TimerToken::Pause {
                                epoch,
                                kind: PauseKind::VictoryMessage,
                            },
                        );
                    }
                }
            }
        }
        out.push(Event::RedrawRequested);
    }

    fn tick_enemy(&mut self, enemy: EnemyId, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        let Some(play) = self.play.as_mut() else {
            return;
        };
        let Ok(level) = level_slot(&mut self.levels, &mut self.custom, play.level) else {
            return;
        };
        match self
            .ai
            .tick(level, play.player.position(), enemy, &self.config)
        {
            TickOutcome::Reschedule => {
                timer.after(
                    self.config.enemy_step(),
                    TimerToken::EnemyTick {
                        epoch: self.epoch,
                        enemy,
                    },
                );
                out.push(Event::RedrawRequested);
                self.frame(timer, out);
            }
            TickOutcome::Stop => {}
        }
    }

    fn finish_pause(&mut self, kind: PauseKind, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        match kind {
            PauseKind::AutoSolveFinished => {
                let Some(play) = self.play.as_mut() else {
                    return;
                };
                if let Ok(level) = level_slot(&mut self.levels, &mut self.custom, play.level) {
                    if let Some(spawn) = level.player_spawn() {
                        play.player.reset_to(spawn);
                    }
                }
                play.phase = PlayPhase::Interactive;
                out.push(Event::RedrawRequested);
            }
            PauseKind::VictoryMessage => {
                let Some(level) = self.play.as_ref().map(|play| play.level) else {
                    return;
                };
                info!(?level, score = self.scoreboard.current(), "level completed");
                out.push(Event::LevelCompleted { level });
                let next = match level {
                    LevelRef::BuiltIn(index) if index + 1 < self.levels.len() => {
                        Mode::PlayLevel(LevelRef::BuiltIn(index + 1))
                    }
                    LevelRef::BuiltIn(_) => Mode::Victory,
                    LevelRef::Custom => Mode::Menu,
                };
                self.transition(next, timer, out);
            }
            PauseKind::Defeat => self.transition(Mode::Menu, timer, out),
            PauseKind::VictoryScreen => {
                if self.mode == Mode::Victory {
                    self.victory_armed = true;
                    out.push(Event::RedrawRequested);
                }
            }
        }
    }

    fn transition(&mut self, target: Mode, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        if let Err(error) = self.try_transition(target, timer, out) {
            self.recover(error, timer, out);
        }
    }

    fn recover(&mut self, error: SessionError, timer: &mut dyn Timer, out: &mut Vec<Event>) {
        warn!(%error, "returning to menu");
        self.show_notice(error.to_string(), self.config.content_notice(), timer, out);
        if self.running {
            self.enter_menu(out);
        }
    }

    fn try_transition(
        &mut self,
        target: Mode,
        timer: &mut dyn Timer,
        out: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        self.leave_level();
        self.epoch += 1;
        self.banner = None;

        match target {
            Mode::Menu => {
                self.editor = None;
                self.buttons = buttons::menu_buttons();
            }
            Mode::Create => {
                self.editor = Some(LevelEditor::new(&self.config));
                self.buttons = buttons::editor_buttons();
            }
            Mode::Select => {
                self.editor = None;
                self.buttons = buttons::select_buttons(self.levels.len());
            }
            Mode::Victory => {
                self.editor = None;
                self.final_score = self.scoreboard.current();
                self.victory_armed = false;
                self.buttons = buttons::victory_buttons();
                timer.after(
                    self.config.victory_click_delay(),
                    TimerToken::Pause {
                        epoch: self.epoch,
                        kind: PauseKind::VictoryScreen,
                    },
                );
            }
            Mode::PlayLevel(level) => {
                self.editor = None;
                self.enter_level(level, timer)?;
            }
        }

        self.mode = target;
        info!(mode = ?target, epoch = self.epoch, "mode changed");
        out.push(Event::ModeChanged { mode: target });
        out.push(Event::RedrawRequested);
        Ok(())
    }

    fn enter_level(
        &mut self,
        level_ref: LevelRef,
        timer: &mut dyn Timer,
    ) -> Result<(), SessionError> {
        let ai = &mut self.ai;
        let level = level_slot(&mut self.levels, &mut self.custom, level_ref)?;
        let player = level.enter(|| ai.random_heading())?;

        for enemy in level.active_enemy_ids() {
            timer.after(
                self.config.enemy_first_step(),
                TimerToken::EnemyTick {
                    epoch: self.epoch,
                    enemy,
                },
            );
        }
        self.buttons = buttons::play_buttons(level.has_auto_solution());
        self.scoreboard.reset_current();
        self.play = Some(ActivePlay {
            level: level_ref,
            player,
            phase: PlayPhase::Interactive,
            replay: None,
        });
        Ok(())
    }

    fn enter_menu(&mut self, out: &mut Vec<Event>) {
        self.leave_level();
        self.epoch += 1;
        self.banner = None;
        self.editor = None;
        self.buttons = buttons::menu_buttons();
        self.mode = Mode::Menu;
        out.push(Event::ModeChanged { mode: Mode::Menu });
        out.push(Event::RedrawRequested);
    }

    fn leave_level(&mut self) {
        if let Some(play) = self.play.take() {
            if let Ok(level) = level_slot(&mut self.levels, &mut self.custom, play.level) {
                level.exit();
            }
        }
    }

    fn show_notice(
        &mut self,
        text: String,
        lifetime: std::time::Duration,
        timer: &mut dyn Timer,
        out: &mut Vec<Event>,
    ) {
        self.next_notice += 1;
        let serial = self.next_notice;
        timer.after(lifetime, TimerToken::NoticeExpired { serial });
        out.push(Event::NoticeShown { text: text.clone() });
        out.push(Event::RedrawRequested);
        self.notice = Some(Notice { serial, text });
    }

    fn shutdown(&mut self, out: &mut Vec<Event>) {
        info!("shutdown requested");
        self.leave_level();
        self.running = false;
        out.push(Event::ShutdownRequested);
    }
}
