//! Session runtime.
//!
//! Bridges the tick-driven session with async callers.

use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::core::{Session, SessionEvent, SessionSnapshot};
use crate::store::KeyValueStore;
use crate::types::{DifficultyTier, Specimen, TICK_MS};

/// Command delivered to the session task.
#[derive(Debug)]
pub enum SessionCommand {
    Start(DifficultyTier),
    SubmitCells(Vec<usize>),
    SubmitSpecimens(Vec<Specimen>),
    Terminate,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Interval between countdown ticks.
    pub tick_ms: u32,
    /// Commands buffered before senders wait.
    pub command_capacity: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            command_capacity: 16,
        }
    }
}

/// Handle to a session running on its own task.
pub struct SessionHandle<K: KeyValueStore + 'static> {
    cmd_tx: mpsc::Sender<SessionCommand>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    task: JoinHandle<Session<K>>,
}

/// Move `session` onto a new tokio task and return a handle to it.
///
/// Must be called from within a tokio runtime.
pub fn spawn_session<K>(session: Session<K>, config: DriverConfig) -> SessionHandle<K>
where
    K: KeyValueStore + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_capacity.max(1));
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(drive(session, cmd_rx, event_tx, config.tick_ms.max(1)));

    SessionHandle {
        cmd_tx,
        event_rx,
        task,
    }
}

async fn drive<K: KeyValueStore>(
    mut session: Session<K>,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    tick_ms: u32,
) -> Session<K> {
    let period = Duration::from_millis(u64::from(tick_ms));
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(tick_ms, "session task started");

    loop {
        tokio::select! {
            biased;

            cmd = cmd_rx.recv() => match cmd {
                Some(SessionCommand::Shutdown) | None => break,
                Some(cmd) => apply(&mut session, cmd),
            },
            _ = ticker.tick() => {
                session.tick(tick_ms);
            }
        }

        forward(&mut session, &event_tx);
    }

    forward(&mut session, &event_tx);
    debug!(session_id = session.session_id(), "session task stopped");
    session
}

fn apply<K: KeyValueStore>(session: &mut Session<K>, cmd: SessionCommand) {
    match cmd {
        SessionCommand::Start(tier) => session.start(tier),
        SessionCommand::SubmitCells(cells) => {
            if session.submit_cells(&cells).is_none() {
                debug!("submission ignored, no round awaiting an answer");
            }
        }
        SessionCommand::SubmitSpecimens(specimens) => {
            if session.submit_selections(&specimens).is_none() {
                debug!("submission ignored, no round awaiting an answer");
            }
        }
        SessionCommand::Terminate => {
            session.terminate();
        }
        SessionCommand::Snapshot(reply) => {
            let _ = reply.send(session.snapshot());
        }
        SessionCommand::Shutdown => {}
    }
}

fn forward<K: KeyValueStore>(
    session: &mut Session<K>,
    event_tx: &mpsc::UnboundedSender<SessionEvent>,
) {
    for event in session.take_events() {
        if event_tx.send(event).is_err() {
            // Receiver gone; keep running so commands still apply.
            warn!("event receiver dropped");
            break;
        }
    }
}

impl<K: KeyValueStore + 'static> SessionHandle<K> {
    async fn send(&self, cmd: SessionCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| anyhow!("session task has stopped"))
    }

    pub async fn start(&self, tier: DifficultyTier) -> Result<()> {
        self.send(SessionCommand::Start(tier)).await
    }

    pub async fn submit_cells(&self, cells: Vec<usize>) -> Result<()> {
        self.send(SessionCommand::SubmitCells(cells)).await
    }

    pub async fn submit_specimens(&self, specimens: Vec<Specimen>) -> Result<()> {
        self.send(SessionCommand::SubmitSpecimens(specimens)).await
    }

    pub async fn terminate(&self) -> Result<()> {
        self.send(SessionCommand::Terminate).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| anyhow!("session task dropped snapshot request"))
    }

    /// Next event, or `None` once the task has stopped and all events are drained.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stop the task and take the session back.
    pub async fn shutdown(self) -> Result<Session<K>> {
        // A closed channel means the task is already on its way out.
        let _ = self.cmd_tx.send(SessionCommand::Shutdown).await;
        Ok(self.task.await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::SessionPhase;
    use crate::store::MemoryStore;

    fn handle(seed: u64) -> SessionHandle<MemoryStore> {
        let session = Session::new(seed, Arc::new(MemoryStore::new()));
        spawn_session(session, DriverConfig::default())
    }

    async fn wait_for<F>(h: &mut SessionHandle<MemoryStore>, pred: F) -> SessionEvent
    where
        F: Fn(&SessionEvent) -> bool,
    {
        loop {
            let event = h.next_event().await.expect("event stream closed");
            if pred(&event) {
                return event;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_emits_round_setup() {
        let mut h = handle(1);
        h.start(DifficultyTier::Novice).await.unwrap();

        assert!(matches!(
            h.next_event().await,
            Some(SessionEvent::GridRefreshed { .. })
        ));
        assert!(matches!(
            h.next_event().await,
            Some(SessionEvent::RiddleGenerated { .. })
        ));
        assert_eq!(
            h.next_event().await,
            Some(SessionEvent::TimeRemainingChanged {
                remaining_ms: 15_000
            })
        );

        let session = h.shutdown().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_runs_out() {
        let mut h = handle(2);
        h.start(DifficultyTier::Novice).await.unwrap();

        let started = Instant::now();
        let event = wait_for(&mut h, SessionEvent::is_terminal).await;
        assert_eq!(
            event,
            SessionEvent::SessionTerminated {
                final_score: 0,
                rounds_completed: 0,
                is_high_score: false,
            }
        );
        assert!(started.elapsed() >= Duration::from_millis(15_000));

        let snap = h.snapshot().await.unwrap();
        assert_eq!(snap.phase, SessionPhase::Terminated);
        assert_eq!(snap.remaining_ms, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_then_next_round() {
        let mut h = handle(3);
        h.start(DifficultyTier::Novice).await.unwrap();

        let event = wait_for(&mut h, |e| {
            matches!(e, SessionEvent::RiddleGenerated { .. })
        })
        .await;
        let SessionEvent::RiddleGenerated { riddle } = event else {
            unreachable!()
        };
        h.submit_cells(riddle.cells().to_vec()).await.unwrap();

        assert_eq!(
            wait_for(&mut h, |e| matches!(e, SessionEvent::ScoreChanged { .. })).await,
            SessionEvent::ScoreChanged { score: 10 }
        );

        // The pause ends and a fresh grid is dealt.
        wait_for(&mut h, |e| matches!(e, SessionEvent::GridRefreshed { .. })).await;
        let snap = h.snapshot().await.unwrap();
        assert!(snap.playable());
        assert_eq!(snap.rounds_completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_and_shutdown_returns_session() {
        let mut h = handle(4);
        h.start(DifficultyTier::Veteran).await.unwrap();
        h.terminate().await.unwrap();
        h.terminate().await.unwrap();

        wait_for(&mut h, SessionEvent::is_terminal).await;
        let session = h.shutdown().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Terminated);
        assert_eq!(
            session.results().results_for(DifficultyTier::Veteran).len(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_ignores_submissions() {
        let mut h = handle(5);
        h.submit_cells(vec![0, 1, 2]).await.unwrap();

        let snap = h.snapshot().await.unwrap();
        assert_eq!(snap.phase, SessionPhase::Idle);
        assert!(h.try_next_event().is_none());
    }
}
