//! # Measurement Session
//!
//! The application state of one experiment and the loop that drives it.
//!
//! - [`Controller`]: owns the device [`Reconciler`](crate::device::Reconciler),
//!   the [`MeasurementTable`](crate::table::MeasurementTable), the calibration
//!   offset, the auto-recorder and the chart. Every user [`Action`] goes through
//!   [`Controller::handle`]; backend commands come back out as
//!   [`Outcome::Send`].
//! - [`EventLoop`]: one thread multiplexing the poll cadence, the auto-record
//!   timer, request results and user actions.
//!
//! The controller is plain data and can be driven without a loop or a backend:
//!
//! ```rust
//! use std::time::Instant;
//! use wheatstone::session::{Action, Controller, Notice, Outcome, SessionConfig};
//!
//! let mut session = Controller::new(SessionConfig::default(), Instant::now());
//! let outcome = session.handle(Action::Record, Instant::now()).unwrap();
//! assert_eq!(outcome, Outcome::Notice(Notice::RowRecorded(0)));
//! assert_eq!(session.table().len(), 1);
//! ```

mod action;
mod config;
mod controller;
mod error;
mod event_loop;


pub use action::{Action, Event, Notice, Outcome};
pub use config::{SessionConfig, DEFAULT_AUTO_INTERVAL};
pub use controller::{Controller, View};
pub use error::SessionError;
pub use event_loop::EventLoop;
