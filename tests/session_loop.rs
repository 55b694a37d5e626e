//! End-to-end tests of the session event loop against a scripted backend.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver};

use wheatstone::client::{Backend, BackendConfig, ClientError, Command, CommandReply};
use wheatstone::device::{
    Device, LinkState, ResistanceBoxSnapshot, StatusReport, VoltmeterSnapshot,
};
use wheatstone::session::{
    Action, Controller, Event, EventLoop, Notice, SessionConfig, SessionError,
};

/// In-process backend: serves a fixed status document, answers commands from a
/// queue and records every command it receives.
#[derive(Clone, Default)]
struct ScriptedBackend {
    status: Arc<Mutex<Option<StatusReport>>>,
    replies: Arc<Mutex<VecDeque<Result<CommandReply, ClientError>>>>,
    sent: Arc<Mutex<Vec<Command>>>,
}

impl ScriptedBackend {
    fn serving(report: StatusReport) -> Self {
        let backend = Self::default();
        *backend.status.lock().unwrap() = Some(report);
        backend
    }

    fn queue_reply(&self, reply: Result<CommandReply, ClientError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn sent(&self) -> Vec<Command> {
        self.sent.lock().unwrap().clone()
    }
}

impl Backend for ScriptedBackend {
    fn status(&self) -> Result<StatusReport, ClientError> {
        self.status
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::Transport("connection refused".to_string()))
    }

    fn send(&self, command: &Command) -> Result<CommandReply, ClientError> {
        self.sent.lock().unwrap().push(command.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandReply::ok()))
    }
}

fn report(rb_connected: bool, vm_connected: bool, voltage: f64) -> StatusReport {
    StatusReport {
        resistance_box: ResistanceBoxSnapshot {
            connected: rb_connected,
            pins: BTreeMap::from([(5, true)]),
            ..Default::default()
        },
        voltmeter: VoltmeterSnapshot {
            connected: vm_connected,
            status_text: "ready".to_string(),
            voltage,
            is_measuring: true,
            range_idx: Some(0),
        },
    }
}

fn start_loop(
    backend: &ScriptedBackend,
) -> (
    crossbeam_channel::Sender<Action>,
    Receiver<Event>,
    thread::JoinHandle<Controller>,
) {
    let config = BackendConfig::default().poll_interval_ms(50);
    let controller = Controller::new(SessionConfig::default(), Instant::now());
    let event_loop = EventLoop::new(controller, Arc::new(backend.clone()), &config);

    let (action_tx, action_rx) = unbounded();
    let (event_tx, event_rx) = unbounded();
    let handle = thread::spawn(move || event_loop.run(action_rx, event_tx));
    (action_tx, event_rx, handle)
}

/// Wait until an event matching `pred` arrives
fn wait_for(events: &Receiver<Event>, pred: impl Fn(&Event) -> bool) -> Option<Event> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while let Some(left) = deadline.checked_duration_since(Instant::now()) {
        match events.recv_timeout(left) {
            Ok(event) if pred(&event) => return Some(event),
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
    None
}

#[test]
fn test_auto_record_takes_immediate_and_periodic_rows() {
    let backend = ScriptedBackend::serving(report(true, true, 0.01));
    let (actions, events, handle) = start_loop(&backend);

    // let the first poll land so rows carry the readings
    wait_for(&events, |e| {
        matches!(e, Event::Refreshed(view) if view.panel.voltmeter.link == LinkState::Connected)
    })
    .expect("first poll applied");

    actions.send(Action::StartAuto("0.5".to_string())).unwrap();
    thread::sleep(Duration::from_millis(1250));
    actions.send(Action::StopAuto).unwrap();
    thread::sleep(Duration::from_millis(600));
    actions.send(Action::Quit).unwrap();

    let controller = handle.join().unwrap();
    let table = controller.table();
    assert_eq!(table.len(), 3);
    assert!(!controller.recorder().is_running());
    for row in table.rows() {
        assert_eq!(row.cell(2), Some("400"));
        assert_eq!(row.cell(3), Some("8.0000"));
    }
    let times: Vec<f64> = table.rows().iter().map(|r| r.number(0).unwrap()).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_failed_connect_raises_alert_and_reverts() {
    let backend = ScriptedBackend::serving(report(false, false, 0.0));
    backend.queue_reply(Err(ClientError::Transport("timed out".to_string())));
    let (actions, events, handle) = start_loop(&backend);

    actions.send(Action::Connect(Device::ResistanceBox)).unwrap();
    let alert = wait_for(&events, |e| matches!(e, Event::Alert(_))).expect("alert");
    assert!(matches!(
        alert,
        Event::Alert(SessionError::Client(ClientError::Transport(_)))
    ));

    actions.send(Action::Quit).unwrap();
    let controller = handle.join().unwrap();
    let panel = &controller.panel().resistance_box;
    assert_eq!(panel.link, LinkState::Idle);
    assert!(panel.connect_enabled);
    assert_eq!(backend.sent(), vec![Command::ConnectResistanceBox]);
}

#[test]
fn test_rejected_set_resistance_is_reported() {
    let backend = ScriptedBackend::serving(report(true, false, 0.0));
    backend.queue_reply(Ok(CommandReply::error("invalid value")));
    let (actions, events, handle) = start_loop(&backend);

    wait_for(&events, |e| {
        matches!(e, Event::Refreshed(view) if view.panel.resistance_box.controls_enabled)
    })
    .expect("box connected");

    actions.send(Action::SetResistance("450".to_string())).unwrap();
    let alert = wait_for(&events, |e| matches!(e, Event::Alert(_))).expect("alert");
    match alert {
        Event::Alert(SessionError::Rejected { message, .. }) => {
            assert_eq!(message, "invalid value")
        }
        other => panic!("unexpected event {:?}", other),
    }

    actions.send(Action::Quit).unwrap();
    handle.join().unwrap();
    assert_eq!(backend.sent(), vec![Command::SetResistance(450)]);
}

#[test]
fn test_unreachable_backend_keeps_baseline() {
    let backend = ScriptedBackend::default();
    let (actions, events, handle) = start_loop(&backend);

    actions.send(Action::Record).unwrap();
    wait_for(&events, |e| matches!(e, Event::Notice(Notice::RowRecorded(0)))).expect("row");
    actions.send(Action::Quit).unwrap();

    let controller = handle.join().unwrap();
    assert_eq!(controller.panel().voltmeter.link, LinkState::Idle);
    assert_eq!(controller.panel().resistance_box.resistance_display, "0 Ω");
    assert_eq!(controller.table().row(0).unwrap().cell(2), Some("0"));
}

#[test]
fn test_dropped_action_channel_ends_session() {
    let backend = ScriptedBackend::serving(report(true, true, 0.0));
    let (actions, _events, handle) = start_loop(&backend);
    actions.send(Action::AddEmptyRow).unwrap();
    drop(actions);
    let controller = handle.join().unwrap();
    assert_eq!(controller.table().len(), 1);
}

#[test]
fn test_stale_poll_during_connect_keeps_connecting() {
    let mut controller = Controller::new(SessionConfig::default(), Instant::now());
    controller.apply_poll(Ok(report(false, false, 0.0)));

    let command = controller.connect(Device::Voltmeter).unwrap();
    assert_eq!(command, Command::ConnectVoltmeter);

    // the backend has not finished connecting yet
    controller.apply_poll(Ok(report(false, false, 0.0)));
    let panel = &controller.panel().voltmeter;
    assert_eq!(panel.link, LinkState::Connecting);
    assert!(!panel.connect_enabled);
    assert_eq!(panel.connect_label(), "Connecting...");

    controller.apply_poll(Ok(report(false, true, 0.002)));
    let panel = &controller.panel().voltmeter;
    assert_eq!(panel.link, LinkState::Connected);
    assert!(panel.stop_enabled);

    // a later disconnect is believed again
    controller.apply_poll(Ok(report(false, false, 0.0)));
    assert_eq!(controller.panel().voltmeter.link, LinkState::Idle);
}
