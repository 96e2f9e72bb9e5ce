#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game loop that drives a Rat Maze world.
//!
//! A [`Session`] owns the authoritative world together with the systems that
//! feed it. Hosts either call [`Session::advance`] with elapsed wall time, in
//! which case the internal [`Timeline`] fires ticks and the delayed reset, or
//! call [`Session::tick`] directly when they bring their own timer.

mod config;
mod timeline;

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use ratmaze_core::{
    Category, Command, Direction, Event, Outcome, PieceSnapshot, RESET_DELAY, TICK_INTERVAL,
};
use ratmaze_rendering::Scene;
use ratmaze_system_pursuit::{self as pursuit, Pursuit};
use ratmaze_system_spawning::{self as spawning, Spawning};
use ratmaze_world::{self as world, query, World};
use tracing::{debug, info};

pub use config::{ConfigError, SessionConfig, DEFAULT_SEED};
pub use timeline::{Job, Timeline};

/// Mixed into the session seed so wandering and placement draw from
/// independent streams.
const PURSUIT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Lifecycle stage of the current game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Pieces move every tick.
    Running,
    /// An outcome was reached; the end message is about to be shown.
    Ended,
    /// The end message is visible and the reset is pending.
    EndedShown,
    /// The world is being rebuilt.
    Resetting,
}

/// Cloneable handle used by input contexts to submit direction presses.
#[derive(Clone, Debug)]
pub struct PlayerInput {
    sender: Sender<Direction>,
}

impl PlayerInput {
    /// Submits a direction press; it reaches the world on the next tick.
    pub fn press(&self, direction: Direction) {
        if self.sender.send(direction).is_err() {
            debug!(?direction, "press dropped after the session closed");
        }
    }
}

/// Owns a world and advances it on a fixed cadence.
#[derive(Debug)]
pub struct Session {
    world: World,
    spawning: Spawning,
    pursuit: Pursuit,
    timeline: Timeline,
    phase: Phase,
    reset_scheduled: bool,
    input_tx: Sender<Direction>,
    input_rx: Receiver<Direction>,
    tick_count: u64,
}

impl Session {
    /// Creates a session on the board described by `config`.
    ///
    /// The board starts empty; the first tick populates it.
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        let board = config.board()?;
        Ok(Self::with_world(World::with_board(board), config.seed))
    }

    /// Creates a session around a prepared world.
    #[must_use]
    pub fn with_world(world: World, seed: u64) -> Self {
        let (input_tx, input_rx) = mpsc::channel();
        let mut timeline = Timeline::new();
        timeline.schedule(Job::Tick, TICK_INTERVAL);

        Self {
            world,
            spawning: Spawning::new(spawning::Config::new(spawning::Quotas::default(), seed)),
            pursuit: Pursuit::new(pursuit::Config::new(seed ^ PURSUIT_STREAM)),
            timeline,
            phase: Phase::Running,
            reset_scheduled: false,
            input_tx,
            input_rx,
            tick_count: 0,
        }
    }

    /// Handle for submitting player input from another context.
    #[must_use]
    pub fn input(&self) -> PlayerInput {
        PlayerInput {
            sender: self.input_tx.clone(),
        }
    }

    /// Moves the virtual clock forward and fires every job that became due.
    ///
    /// Returns the number of jobs fired. Each fired tick schedules the next
    /// one relative to the advanced clock, so a large `dt` runs one tick.
    pub fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> usize {
        self.timeline.advance(dt);

        let mut fired = 0;
        while let Some(job) = self.timeline.pop_due() {
            fired += 1;
            match job {
                Job::Tick => {
                    self.tick(out_events);
                    self.timeline.schedule(Job::Tick, TICK_INTERVAL);
                }
                Job::Reset => self.reset_game(out_events),
            }
        }
        fired
    }

    /// Runs one simulation step.
    ///
    /// The reset that follows an ended game is placed on the timeline, so it
    /// only fires through [`Session::advance`] unless the host calls
    /// [`Session::reset_game`] itself.
    pub fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_count += 1;
        let first_event = out_events.len();

        for direction in self.input_rx.try_iter() {
            world::apply(
                &mut self.world,
                Command::QueuePlayerOrder { direction },
                out_events,
            );
        }

        if self.phase == Phase::Running {
            self.move_adversaries(out_events);
        }
        self.observe_outcome();

        if self.phase == Phase::Running {
            world::apply(&mut self.world, Command::ApplyPlayerOrders, out_events);
        }
        self.observe_outcome();

        if self.is_ended() && !self.reset_scheduled {
            self.timeline.schedule(Job::Reset, RESET_DELAY);
            self.reset_scheduled = true;
            info!(
                delay_ms = u64::try_from(RESET_DELAY.as_millis()).unwrap_or(u64::MAX),
                "reset scheduled"
            );
        }

        self.maintain_population(out_events);

        debug!(
            tick = self.tick_count,
            phase = ?self.phase,
            events = out_events.len() - first_event,
            "tick complete"
        );
    }

    /// Discards the current game and starts over on an empty board.
    pub fn reset_game(&mut self, out_events: &mut Vec<Event>) {
        self.phase = Phase::Resetting;
        world::apply(&mut self.world, Command::ResetGame, out_events);

        let discarded = self.input_rx.try_iter().count();
        self.timeline.cancel(Job::Reset);
        self.reset_scheduled = false;
        self.phase = Phase::Running;
        info!(discarded_presses = discarded, "game reset");
    }

    /// Reports whether the current game was won.
    #[must_use]
    pub fn is_won(&self) -> bool {
        query::is_won(&self.world)
    }

    /// Reports whether the current game was lost.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        query::is_lost(&self.world)
    }

    /// Outcome of the current game, if one was reached.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        query::outcome(&self.world)
    }

    /// Current lifecycle stage.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Message displayed once a game has ended.
    #[must_use]
    pub fn end_message(&self) -> Option<&'static str> {
        match self.phase {
            Phase::EndedShown => self.outcome().map(Outcome::message),
            _ => None,
        }
    }

    /// Reports whether a reset is waiting on the timeline.
    #[must_use]
    pub const fn reset_scheduled(&self) -> bool {
        self.reset_scheduled
    }

    /// Pieces of one category in spawn order.
    #[must_use]
    pub fn pieces(&self, category: Category) -> Vec<PieceSnapshot> {
        query::pieces(&self.world, category)
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Scheduler driving ticks and resets.
    #[must_use]
    pub const fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Number of ticks run since the session started.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Captures the frame a renderer should present.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let pieces = Category::ALL
            .into_iter()
            .flat_map(|category| query::pieces(&self.world, category))
            .collect();
        Scene::new(self.outcome(), pieces)
    }

    fn is_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended | Phase::EndedShown)
    }

    fn move_adversaries(&mut self, out_events: &mut Vec<Event>) {
        for adversary in query::pieces(&self.world, Category::Adversary) {
            let Some(current) = query::piece(&self.world, adversary.id) else {
                continue;
            };
            let order = self
                .pursuit
                .decide(current.origin, &query::board_view(&self.world));
            world::apply(
                &mut self.world,
                Command::StepAdversary {
                    piece: adversary.id,
                    order,
                },
                out_events,
            );
        }
    }

    fn observe_outcome(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(outcome) = query::outcome(&self.world) else {
            return;
        };

        self.phase = Phase::Ended;
        info!(?outcome, tick = self.tick_count, "game concluded");
        self.phase = Phase::EndedShown;
        info!(message = outcome.message(), "end message shown");
    }

    fn maintain_population(&mut self, out_events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.spawning.handle(
            query::population(&self.world),
            &query::board_view(&self.world),
            &mut commands,
        );
        if commands.is_empty() {
            return;
        }

        debug!(requested = commands.len(), "topping up population");
        for command in commands {
            world::apply(&mut self.world, command, out_events);
        }
    }
}
