//! One-second countdown driving [`QuizSession::tick`](super::QuizSession::tick).
//!
//! The countdown only emits messages; the owner of the session applies them.
//! Each message carries the epoch of the session run it was started for so
//! the owner can drop ticks that outlive their session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub epoch: u64,
}

/// Handle to a running countdown task. Dropping it stops the task.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Must be called from within a tokio runtime.
    pub fn start<T>(epoch: u64, sender: mpsc::UnboundedSender<T>) -> Self
    where
        T: From<CountdownTick> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval fires immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                if sender.send(CountdownTick { epoch }.into()).is_err() {
                    break;
                }
            }
        });

        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
