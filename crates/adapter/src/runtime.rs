//! Game runtime - one task owns the game, everything else sends commands.
//!
//! Inputs and clock ticks are serialized through a single bounded `mpsc`
//! channel into the game task, so no two mutations ever run concurrently.
//! The optional ticker is just another producer on that channel. Outcomes
//! that change something are pushed to an unbounded update channel.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use brickfall_core::{GameController, GameSnapshot, Side, StepOutcome, Versus};

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::types::GameAction;

/// Command delivered to the game task.
#[derive(Debug)]
pub enum Command {
    /// Apply an input; `side` is only meaningful in versus mode.
    Action {
        side: Option<Side>,
        action: GameAction,
    },
    /// Pump game time.
    Advance { ms: u32 },
    Snapshot {
        reply: oneshot::Sender<Vec<SideSnapshot>>,
    },
    /// Answered once every earlier command has published its updates.
    Sync { reply: oneshot::Sender<()> },
    Shutdown,
}

/// An outcome worth telling the client about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// `None` outside versus mode.
    pub side: Option<Side>,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideSnapshot {
    pub side: Option<Side>,
    pub snapshot: GameSnapshot,
}

/// The games one runtime drives.
#[derive(Debug)]
enum Session {
    Single(GameController),
    Versus(Versus),
}

impl Session {
    fn new(config: &RuntimeConfig) -> Self {
        if config.versus {
            Session::Versus(Versus::new(config.game))
        } else {
            Session::Single(GameController::new(config.game))
        }
    }

    fn apply(&mut self, side: Option<Side>, action: GameAction) -> Vec<Update> {
        match self {
            Session::Single(game) => vec![Update {
                side: None,
                outcome: game.apply(action),
            }],
            Session::Versus(versus) if action.is_piece_action() => {
                let side = side.unwrap_or(Side::Left);
                vec![Update {
                    side: Some(side),
                    outcome: versus.apply(side, action),
                }]
            }
            Session::Versus(versus) => both(versus.broadcast(action)),
        }
    }

    fn advance(&mut self, ms: u32) -> Vec<Update> {
        match self {
            Session::Single(game) => vec![Update {
                side: None,
                outcome: game.advance(ms),
            }],
            Session::Versus(versus) => both(versus.advance(ms)),
        }
    }

    fn snapshots(&self) -> Vec<SideSnapshot> {
        match self {
            Session::Single(game) => vec![SideSnapshot {
                side: None,
                snapshot: game.snapshot(),
            }],
            Session::Versus(versus) => [Side::Left, Side::Right]
                .into_iter()
                .map(|side| SideSnapshot {
                    side: Some(side),
                    snapshot: versus.side(side).snapshot(),
                })
                .collect(),
        }
    }
}

fn both((left, right): (StepOutcome, StepOutcome)) -> Vec<Update> {
    vec![
        Update {
            side: Some(Side::Left),
            outcome: left,
        },
        Update {
            side: Some(Side::Right),
            outcome: right,
        },
    ]
}

/// Running game task plus its channels.
pub struct GameRuntime {
    commands: mpsc::Sender<Command>,
    updates: mpsc::UnboundedReceiver<Update>,
    task: JoinHandle<()>,
    ticker: Option<JoinHandle<()>>,
}

impl GameRuntime {
    /// Spawn the game task (and the ticker when `tick_ms > 0`).
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(config: RuntimeConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(config.max_pending_commands.max(1));
        let (update_tx, update_rx) = mpsc::unbounded_channel::<Update>();

        let session = Session::new(&config);
        info!(
            versus = config.versus,
            difficulty = config.game.difficulty.as_str(),
            seed = config.game.seed,
            tick_ms = config.tick_ms,
            "game runtime started"
        );
        let task = tokio::spawn(run_game(session, cmd_rx, update_tx));
        let ticker = (config.tick_ms > 0)
            .then(|| tokio::spawn(run_ticker(config.tick_ms, cmd_tx.clone())));

        Self {
            commands: cmd_tx,
            updates: update_rx,
            task,
            ticker,
        }
    }

    /// Another producer for the command channel.
    pub fn sender(&self) -> mpsc::Sender<Command> {
        self.commands.clone()
    }

    pub async fn send(&self, command: Command) -> Result<(), RuntimeError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RuntimeError::Stopped)
    }

    pub async fn act(&self, side: Option<Side>, action: GameAction) -> Result<(), RuntimeError> {
        self.send(Command::Action { side, action }).await
    }

    pub async fn advance(&self, ms: u32) -> Result<(), RuntimeError> {
        self.send(Command::Advance { ms }).await
    }

    /// Current state of every board, taken between two commands.
    pub async fn snapshot(&self) -> Result<Vec<SideSnapshot>, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| RuntimeError::Stopped)
    }

    /// Wait until every command sent before this call has been applied.
    ///
    /// Afterwards [`GameRuntime::drain_updates`] returns all of their updates.
    pub async fn sync(&self) -> Result<(), RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Sync { reply }).await?;
        rx.await.map_err(|_| RuntimeError::Stopped)
    }

    /// Next update, `None` once the game task has exited.
    pub async fn next_update(&mut self) -> Option<Update> {
        self.updates.recv().await
    }

    /// Updates already published, without waiting.
    pub fn drain_updates(&mut self) -> Vec<Update> {
        let mut drained = Vec::new();
        while let Ok(update) = self.updates.try_recv() {
            drained.push(update);
        }
        drained
    }

    /// Stop the ticker and the game task, wait for the latter and return
    /// the updates it published that nobody has read yet.
    pub async fn shutdown(mut self) -> Result<Vec<Update>, RuntimeError> {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        // A closed channel means the task already exited
        let _ = self.commands.send(Command::Shutdown).await;
        (&mut self.task).await?;
        let remaining = self.drain_updates();
        info!(pending = remaining.len(), "game runtime stopped");
        Ok(remaining)
    }
}

async fn run_game(
    mut session: Session,
    mut commands: mpsc::Receiver<Command>,
    updates: mpsc::UnboundedSender<Update>,
) {
    while let Some(command) = commands.recv().await {
        let produced = match command {
            Command::Action { side, action } => {
                debug!(?side, action = action.as_str(), "action");
                session.apply(side, action)
            }
            Command::Advance { ms } => session.advance(ms),
            Command::Snapshot { reply } => {
                let _ = reply.send(session.snapshots());
                continue;
            }
            Command::Sync { reply } => {
                let _ = reply.send(());
                continue;
            }
            Command::Shutdown => break,
        };

        for update in produced {
            if !update.outcome.changed && update.outcome.events.is_empty() {
                continue;
            }
            if updates.send(update).is_err() {
                warn!("update receiver dropped; stopping game task");
                return;
            }
        }
    }
}

async fn run_ticker(tick_ms: u32, commands: mpsc::Sender<Command>) {
    let mut interval = time::interval(Duration::from_millis(u64::from(tick_ms)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;
    let mut last = Instant::now();

    loop {
        interval.tick().await;
        let now = Instant::now();
        let elapsed = u32::try_from(now.duration_since(last).as_millis()).unwrap_or(u32::MAX);
        last = now;
        if commands.send(Command::Advance { ms: elapsed }).await.is_err() {
            break;
        }
    }
}
