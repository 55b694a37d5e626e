//! Single-threaded event loop around a [`Controller`].
//!
//! One thread owns the controller and multiplexes four sources with
//! `crossbeam_channel::select!`:
//!
//! | Source | Channel | Effect |
//! |--------|---------|--------|
//! | poll cadence | `tick(poll_interval)` | spawn a status request |
//! | auto-record | `tick(interval)` while running, `never()` otherwise | record a row |
//! | worker results | poll / reply channels | reconcile, report failures |
//! | user | action channel | [`Controller::handle`] |
//!
//! Requests run on short-lived worker threads and report back whenever they
//! finish. Nothing is cancelled and there is no backoff; results are applied in
//! the order they arrive.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{never, select, tick, unbounded, Receiver, Sender};
use log::{debug, info, warn};

use crate::client::{Backend, BackendConfig, ClientError, Command, CommandReply};
use crate::device::StatusReport;

use super::action::{Action, Event, Notice, Outcome};
use super::controller::Controller;

type Reply = (Command, Result<CommandReply, ClientError>);

/// Drives a [`Controller`] against a [`Backend`]
pub struct EventLoop {
    controller: Controller,
    backend: Arc<dyn Backend>,
    poll_interval: Duration,
    armed_interval: Option<Duration>,
    auto_ticker: Receiver<Instant>,
    poll_tx: Sender<Result<StatusReport, ClientError>>,
    poll_rx: Receiver<Result<StatusReport, ClientError>>,
    reply_tx: Sender<Reply>,
    reply_rx: Receiver<Reply>,
}

impl EventLoop {
    /// Event loop polling `backend` at the configured cadence
    pub fn new(controller: Controller, backend: Arc<dyn Backend>, config: &BackendConfig) -> Self {
        let (poll_tx, poll_rx) = unbounded();
        let (reply_tx, reply_rx) = unbounded();
        Self {
            controller,
            backend,
            poll_interval: config.poll_interval,
            armed_interval: None,
            auto_ticker: never(),
            poll_tx,
            poll_rx,
            reply_tx,
            reply_rx,
        }
    }

    /// The controller being driven
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Run until `actions` disconnects or delivers [`Action::Quit`]; returns the
    /// final controller state. In-flight requests are abandoned.
    ///
    /// Events for the front end go to `events`; a dropped receiver is ignored.
    pub fn run(mut self, actions: Receiver<Action>, events: Sender<Event>) -> Controller {
        info!("Session started, polling every {:?}", self.poll_interval);
        let poll_ticker = tick(self.poll_interval);
        self.spawn_poll();

        loop {
            let auto_ticker = self.auto_ticker.clone();
            let poll_rx = self.poll_rx.clone();
            let reply_rx = self.reply_rx.clone();

            select! {
                recv(poll_ticker) -> _ => {
                    self.spawn_poll();
                    continue;
                }
                recv(auto_ticker) -> _ => {
                    if let Some(row) = self.controller.auto_tick(Instant::now()) {
                        let _ = events.send(Event::Notice(Notice::RowRecorded(row)));
                    }
                }
                recv(poll_rx) -> result => {
                    if let Ok(result) = result {
                        self.controller.apply_poll(result);
                    }
                }
                recv(reply_rx) -> reply => {
                    if let Ok((command, result)) = reply {
                        if let Err(e) = self.controller.command_finished(&command, result) {
                            let _ = events.send(Event::Alert(e));
                        }
                    }
                }
                recv(actions) -> action => {
                    let action = match action {
                        Ok(action) => action,
                        Err(_) => break,
                    };
                    match self.controller.handle(action, Instant::now()) {
                        Ok(Outcome::Quit) => break,
                        Ok(Outcome::Send(command)) => self.spawn_command(command),
                        Ok(Outcome::Notice(notice)) => {
                            let _ = events.send(Event::Notice(notice));
                        }
                        Ok(Outcome::Updated) => {}
                        Err(e) => {
                            warn!("{}", e);
                            let _ = events.send(Event::Alert(e));
                        }
                    }
                    self.arm_auto_ticker();
                }
            }

            let _ = events.send(Event::Refreshed(Box::new(self.controller.view())));
        }

        info!("Session ended with {} rows", self.controller.table().len());
        self.controller
    }

    fn arm_auto_ticker(&mut self) {
        let interval = self.controller.auto_interval();
        if interval == self.armed_interval {
            return;
        }
        self.auto_ticker = match interval {
            Some(period) => tick(period),
            None => never(),
        };
        self.armed_interval = interval;
    }

    fn spawn_poll(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.poll_tx.clone();
        let spawned = thread::Builder::new()
            .name("wheatstone-poll".to_string())
            .spawn(move || {
                let _ = tx.send(backend.status());
            });
        if let Err(e) = spawned {
            warn!("Failed to spawn poll worker: {}", e);
        }
    }

    fn spawn_command(&self, command: Command) {
        debug!("Dispatching {:?}", command);
        let backend = Arc::clone(&self.backend);
        let tx = self.reply_tx.clone();
        let job = command.clone();
        let spawned = thread::Builder::new()
            .name("wheatstone-command".to_string())
            .spawn(move || {
                let result = backend.send(&job);
                let _ = tx.send((job, result));
            });
        if let Err(e) = spawned {
            let error = ClientError::Transport(format!("Failed to spawn command worker: {}", e));
            let _ = self.reply_tx.send((command, Err(error)));
        }
    }
}
