use crate::state::{Command, ViewState};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// Immutable copy of the view state taken once per frame. Every view of a
/// frame reads the same snapshot.
#[derive(PartialEq, Copy, Clone, Debug, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub state: ViewState,
}

pub struct Controller {
    state: ViewState,
    frame: u64,
}

impl Controller {
    pub fn new(initial: ViewState) -> Self {
        Self {
            state: initial.sanitized(),
            frame: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dispatch(&mut self, command: Command) {
        let next = self.state.apply(command);
        tracing::debug!(?command, day = next.simulated_day, playing = next.playing, "command applied");
        self.state = next;
    }

    pub fn dispatch_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.dispatch(command);
        }
    }

    /// Advances playback by one frame and returns the snapshot all views of
    /// this frame must render from.
    pub fn advance_frame(&mut self) -> FrameSnapshot {
        self.state = self.state.tick();
        self.frame += 1;
        tracing::trace!(frame = self.frame, day = self.state.simulated_day, "frame advanced");
        self.snapshot()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            state: self.state,
        }
    }
}

/// Cancellation stops future ticks. It may be called any number of times,
/// before or after starting, and tears the ticker down exactly once.
#[derive(Default)]
pub struct FrameSchedule {
    ticker: Option<JoinHandle<()>>,
}

impl FrameSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, fps: u32) -> mpsc::Receiver<Instant> {
        self.cancel();

        let (tx, rx) = mpsc::channel(1);
        let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64).max(Duration::from_nanos(1));

        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                let at = ticks.tick().await;
                if tx.send(at).await.is_err() {
                    break;
                }
            }
        }));

        rx
    }

    /// Returns true when this call tore down a running ticker.
    pub fn cancel(&mut self) -> bool {
        match self.ticker.take() {
            Some(ticker) => {
                ticker.abort();
                tracing::debug!("frame schedule cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for FrameSchedule {
    fn drop(&mut self) {
        self.cancel();
    }
}
