//! Event Loop: single dispatcher task draining resource-manager events and a
//! heartbeat tick, fanning each out to the registered listeners in order, and
//! publishing a lock-free snapshot of Job State after every event.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tracing::{info, warn};

use crate::domain::{DispatchEvent, JobState, JobStateSnapshot, RmEvent};
use crate::listener::Listener;

pub struct EventLoop {
    state: JobState,
    listeners: Vec<Box<dyn Listener>>,
    events: mpsc::Receiver<RmEvent>,
    heartbeat: Duration,
    snapshots: watch::Sender<JobStateSnapshot>,
}

impl EventLoop {
    /// `listeners` must be given in the order the spec requires: the
    /// lifecycle coordinator before the task manager, so a capability
    /// rejection short-circuits container requests within the same `on_init`
    /// fan-out.
    pub fn new(
        task_count: u32,
        listeners: Vec<Box<dyn Listener>>,
        events: mpsc::Receiver<RmEvent>,
        heartbeat: Duration,
    ) -> (Self, watch::Receiver<JobStateSnapshot>) {
        let state = JobState::new(task_count);
        let (tx, rx) = watch::channel(state.snapshot());
        (
            Self {
                state,
                listeners,
                events,
                heartbeat,
                snapshots: tx,
            },
            rx,
        )
    }

    fn publish(&self) {
        // Only fails if every receiver (the status surface, any test harness)
        // has been dropped; there is nothing useful to do about that here.
        let _ = self.snapshots.send(self.state.snapshot());
    }

    /// Runs until a listener observes `should_shutdown`, then issues
    /// `on_shutdown` to every listener once and returns.
    pub async fn run(&mut self) {
        let mut ticks = interval(self.heartbeat);
        ticks.tick().await; // first tick fires immediately; consume it

        for listener in &mut self.listeners {
            if let Err(err) = listener.on_init(&mut self.state).await {
                warn!(error = %err, "listener on_init returned an error");
            }
        }
        self.publish();

        loop {
            if self.state.should_shutdown() {
                break;
            }

            let event = tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => DispatchEvent::Rm(event),
                    None => break,
                },
                _ = ticks.tick() => DispatchEvent::Heartbeat,
            };

            self.dispatch(event).await;
            self.publish();
        }

        info!(status = ?self.state.status(), "shutting down");
        for listener in &mut self.listeners {
            if let Err(err) = listener.on_shutdown(&mut self.state).await {
                warn!(error = %err, "listener on_shutdown returned an error");
            }
        }
        self.publish();
    }

    async fn dispatch(&mut self, event: DispatchEvent) {
        match event {
            DispatchEvent::Heartbeat => {
                for listener in &mut self.listeners {
                    if let Err(err) = listener.on_heartbeat(&mut self.state).await {
                        warn!(error = %err, "listener on_heartbeat returned an error");
                    }
                }
            }
            DispatchEvent::Rm(RmEvent::Allocated(container)) => {
                for listener in &mut self.listeners {
                    if let Err(err) = listener
                        .on_container_allocated(&mut self.state, container.clone())
                        .await
                    {
                        warn!(error = %err, "listener on_container_allocated returned an error");
                    }
                }
            }
            DispatchEvent::Rm(RmEvent::Completed(completion)) => {
                for listener in &mut self.listeners {
                    if let Err(err) = listener
                        .on_container_completed(
                            &mut self.state,
                            completion.container_id.clone(),
                            completion.exit_status,
                        )
                        .await
                    {
                        warn!(error = %err, "listener on_container_completed returned an error");
                    }
                }
            }
            DispatchEvent::Rm(RmEvent::Released(container_id)) => {
                for listener in &mut self.listeners {
                    if let Err(err) = listener
                        .on_container_released(&mut self.state, container_id.clone())
                        .await
                    {
                        warn!(error = %err, "listener on_container_released returned an error");
                    }
                }
            }
            DispatchEvent::Rm(RmEvent::Reboot) => {
                for listener in &mut self.listeners {
                    if let Err(err) = listener.on_reboot(&mut self.state).await {
                        warn!(error = %err, "listener on_reboot returned an error");
                    }
                }
            }
            DispatchEvent::Rm(RmEvent::ShutdownRequest) => {
                self.state.request_shutdown();
            }
        }
    }
}
