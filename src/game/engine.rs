//! The engine task: a single tokio task that owns the [`GameSession`].
//!
//! Callers hold an [`EngineHandle`] and submit lines over an unbounded mpsc
//! channel; each request carries a oneshot sender for its reply. Commands are
//! applied strictly one at a time, in arrival order.

use log::debug;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::dice::Dice;
use super::errors::GameError;
use super::leaderboard::LeaderboardEntry;
use super::session::{GameSession, Outcome};

enum EngineMessage {
    Opening {
        reply: oneshot::Sender<Outcome>,
    },
    Submit {
        line: String,
        reply: oneshot::Sender<Outcome>,
    },
    Leaderboard {
        reply: oneshot::Sender<Vec<LeaderboardEntry>>,
    },
    Shutdown,
}

/// Cloneable handle to a running engine task.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineMessage>,
}

impl EngineHandle {
    /// The opening screen (warnings plus welcome or name prompt).
    pub async fn opening(&self) -> Result<Outcome, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineMessage::Opening { reply })?;
        rx.await.map_err(|_| GameError::EngineClosed)
    }

    /// Run one line of player input and wait for its outcome.
    pub async fn submit(&self, line: impl Into<String>) -> Result<Outcome, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineMessage::Submit {
            line: line.into(),
            reply,
        })?;
        rx.await.map_err(|_| GameError::EngineClosed)
    }

    /// Snapshot of the in-memory leaderboard.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineMessage::Leaderboard { reply })?;
        rx.await.map_err(|_| GameError::EngineClosed)
    }

    /// Ask the task to stop after the commands already queued.
    pub fn shutdown(&self) {
        let _ = self.tx.send(EngineMessage::Shutdown);
    }

    fn send(&self, msg: EngineMessage) -> Result<(), GameError> {
        self.tx.send(msg).map_err(|_| GameError::EngineClosed)
    }
}

/// Move `session` into a new task and return a handle to it. The task ends on
/// [`EngineHandle::shutdown`] or when every handle is dropped.
pub fn spawn_engine<D>(mut session: GameSession<D>) -> (EngineHandle, JoinHandle<()>)
where
    D: Dice + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<EngineMessage>();
    let task = tokio::spawn(async move {
        debug!("engine started");
        while let Some(msg) = rx.recv().await {
            match msg {
                EngineMessage::Opening { reply } => {
                    let _ = reply.send(session.opening());
                }
                EngineMessage::Submit { line, reply } => {
                    let outcome = session.handle(&line);
                    if reply.send(outcome).is_err() {
                        debug!("engine: caller went away before the reply");
                    }
                }
                EngineMessage::Leaderboard { reply } => {
                    let _ = reply.send(session.leaderboard().entries().to_vec());
                }
                EngineMessage::Shutdown => break,
            }
        }
        debug!("engine stopped");
    });
    (EngineHandle { tx }, task)
}
