use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::calibration::CalibrationStore;
use crate::client::{ClientError, Command, CommandReply, VoltmeterCommand};
use crate::device::{is_known_pin, ControlPanel, Device, LinkState, Reconciler, StatusReport};
use crate::export::{export_to_dir, project, AxisSelection, PointSeries};
use crate::formula::{parse_integer, parse_number, resolve_excitation, BridgeReading};
use crate::table::{
    AutoRecordControls, AutoRecorder, ColumnKind, ColumnSpec, MeasurementTable, Row, Sample,
    TableError,
};

use super::action::{Action, Notice, Outcome};
use super::config::SessionConfig;
use super::error::SessionError;

/// Snapshot of everything the front end renders
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Device controls
    pub panel: ControlPanel,
    /// Live ΔR read-out
    pub live_delta: f64,
    /// Excitation voltage in effect
    pub excitation: f64,
    /// Cumulative calibration offset
    pub offset: f64,
    /// Auto-record control enablement
    pub auto: AutoRecordControls,
    /// Chart axis picker
    pub axes: AxisSelection,
    /// Column labels in order
    pub columns: Vec<String>,
    /// Table rows
    pub rows: Vec<Row>,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.panel)?;
        writeln!(
            f,
            "Us: {:.4} V   ΔR live: {:.4} Ω   offset: {:.4} Ω",
            self.excitation, self.live_delta, self.offset
        )?;
        write!(
            f,
            "Rows: {}   auto-record: {}",
            self.rows.len(),
            if self.auto.stop_enabled { "running" } else { "stopped" }
        )
    }
}

/// The application state of one measurement session.
///
/// Owns the device reconciler, the measurement table, the calibration offset,
/// the auto-recorder and the chart. Only the event loop thread touches it, so
/// table edits and samples never interleave.
#[derive(Debug, Clone)]
pub struct Controller {
    config: SessionConfig,
    reconciler: Reconciler,
    table: MeasurementTable,
    calibration: CalibrationStore,
    recorder: AutoRecorder,
    axes: AxisSelection,
    chart: Option<PointSeries>,
    excitation_input: String,
}

impl Controller {
    /// Fresh session with the default columns, starting at `now`
    pub fn new(config: SessionConfig, now: Instant) -> Self {
        let table = MeasurementTable::new(now);
        let axes = AxisSelection::from_schema(table.schema());
        Self {
            excitation_input: config.excitation.clone(),
            config,
            reconciler: Reconciler::new(),
            table,
            calibration: CalibrationStore::new(),
            recorder: AutoRecorder::new(),
            axes,
            chart: None,
        }
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The measurement table
    pub fn table(&self) -> &MeasurementTable {
        &self.table
    }

    /// Device state
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Device controls
    pub fn panel(&self) -> &ControlPanel {
        self.reconciler.panel()
    }

    /// Cumulative calibration offset
    pub fn offset(&self) -> f64 {
        self.calibration.offset()
    }

    /// Auto-record state machine
    pub fn recorder(&self) -> &AutoRecorder {
        &self.recorder
    }

    /// Active auto-record period
    pub fn auto_interval(&self) -> Option<Duration> {
        self.recorder.interval()
    }

    /// Chart axis picker
    pub fn axes(&self) -> &AxisSelection {
        &self.axes
    }

    /// Last drawn chart, if it is still valid
    pub fn chart(&self) -> Option<&PointSeries> {
        self.chart.as_ref()
    }

    /// Excitation voltage field text
    pub fn excitation_input(&self) -> &str {
        &self.excitation_input
    }

    /// Excitation voltage in effect
    pub fn excitation(&self) -> f64 {
        resolve_excitation(Some(&self.excitation_input))
    }

    /// Replace the excitation voltage field text
    pub fn set_excitation(&mut self, input: impl Into<String>) {
        self.excitation_input = input.into();
    }

    /// Live ΔR read-out from the latest readings
    pub fn live_delta(&self) -> f64 {
        let reading = BridgeReading::new(
            self.excitation(),
            self.reconciler.latest_voltage(),
            f64::from(self.reconciler.latest_resistance()),
        );
        self.calibration.live_readout(&reading)
    }

    /// Everything the front end renders
    pub fn view(&self) -> View {
        View {
            panel: self.panel().clone(),
            live_delta: self.live_delta(),
            excitation: self.excitation(),
            offset: self.offset(),
            auto: self.recorder.controls(),
            axes: self.axes.clone(),
            columns: self.table.schema().labels().map(str::to_string).collect(),
            rows: self.table.rows().to_vec(),
        }
    }

    // -- devices --------------------------------------------------------

    /// Fold in one poll result. A failed poll is logged and skipped.
    pub fn apply_poll(&mut self, result: Result<StatusReport, ClientError>) {
        match result {
            Ok(report) => self.reconciler.apply(&report),
            Err(e) => self.reconciler.poll_failed(&e),
        }
    }

    /// Press the connect button of `device`
    pub fn connect(&mut self, device: Device) -> Result<Command, SessionError> {
        if self.reconciler.link(device) == LinkState::Connecting {
            return Err(SessionError::Disabled("connect"));
        }
        self.reconciler.begin_connect(device);
        Ok(match device {
            Device::ResistanceBox => Command::ConnectResistanceBox,
            Device::Voltmeter => Command::ConnectVoltmeter,
        })
    }

    /// Issue a voltmeter command, gated on the panel's button state.
    ///
    /// START and STOP flip the panel immediately rather than waiting for the
    /// next poll.
    pub fn voltmeter_command(&mut self, command: VoltmeterCommand) -> Result<Command, SessionError> {
        let panel = &self.panel().voltmeter;
        let allowed = match command {
            VoltmeterCommand::Start => panel.start_enabled,
            VoltmeterCommand::Stop => panel.stop_enabled,
            VoltmeterCommand::Tare => panel.tare_enabled,
            VoltmeterCommand::SetRange(_) | VoltmeterCommand::SetFrequency(_) => {
                !panel.settings_locked
            }
        };
        if !allowed {
            return Err(SessionError::Disabled(command.name()));
        }

        match command {
            VoltmeterCommand::Start => self.reconciler.set_measuring(true),
            VoltmeterCommand::Stop => self.reconciler.set_measuring(false),
            _ => {}
        }
        Ok(Command::Voltmeter(command))
    }

    /// Parse a sampling frequency and issue `SET_FREQ`
    pub fn set_frequency(&mut self, input: &str) -> Result<Command, SessionError> {
        match parse_number(input) {
            Some(hz) if hz > 0.0 => self.voltmeter_command(VoltmeterCommand::SetFrequency(hz)),
            _ => Err(SessionError::Validation(format!(
                "Frequency must be a positive number (got '{}')",
                input
            ))),
        }
    }

    /// Parse a resistance and issue `set_resistance`; the backend decides
    /// whether the value is reachable
    pub fn set_resistance(&mut self, input: &str) -> Result<Command, SessionError> {
        if !self.panel().resistance_box.controls_enabled {
            return Err(SessionError::NotConnected(Device::ResistanceBox));
        }
        let ohms = parse_integer(input)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                SessionError::Validation(format!(
                    "Resistance must be a whole number of ohms (got '{}')",
                    input
                ))
            })?;
        Ok(Command::SetResistance(ohms))
    }

    /// Flip one of the known resistance-box pins
    pub fn toggle_pin(&mut self, pin: u8, on: bool) -> Result<Command, SessionError> {
        if !self.panel().resistance_box.controls_enabled {
            return Err(SessionError::NotConnected(Device::ResistanceBox));
        }
        if !is_known_pin(pin) {
            return Err(SessionError::Validation(format!("Unknown pin {}", pin)));
        }
        Ok(Command::TogglePin { pin, on })
    }

    /// Handle the backend's answer to a command.
    ///
    /// Failed connect attempts restore the disconnected baseline at once.
    /// Voltmeter connects have no reply contract, so only a failed request
    /// counts there.
    pub fn command_finished(
        &mut self,
        command: &Command,
        result: Result<CommandReply, ClientError>,
    ) -> Result<(), SessionError> {
        let failure = match result {
            Ok(reply) if reply.is_error() && *command != Command::ConnectVoltmeter => {
                SessionError::Rejected {
                    command: command.path().to_string(),
                    message: reply.msg.unwrap_or_default(),
                }
            }
            Ok(_) => return Ok(()),
            Err(e) => SessionError::Client(e),
        };

        warn!("{}", failure);
        match command {
            Command::ConnectResistanceBox => self.reconciler.connect_failed(Device::ResistanceBox),
            Command::ConnectVoltmeter => self.reconciler.connect_failed(Device::Voltmeter),
            _ => {}
        }
        Err(failure)
    }

    // -- table ----------------------------------------------------------

    /// Sample the latest readings into a new row; returns its index
    pub fn record_point(&mut self, now: Instant) -> usize {
        let sample = Sample::take(
            self.table.elapsed(now),
            self.excitation(),
            self.reconciler.latest_voltage(),
            self.reconciler.latest_resistance(),
            self.calibration.offset(),
        );
        self.table.record(&sample)
    }

    /// Append a row of empty cells; returns its index
    pub fn add_empty_row(&mut self) -> usize {
        self.table.add_empty_row()
    }

    /// Delete one row
    pub fn delete_row(&mut self, index: usize) -> Result<(), SessionError> {
        self.table.delete_row(index)?;
        Ok(())
    }

    /// Overwrite one cell
    pub fn edit_cell(
        &mut self,
        row: usize,
        column: usize,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        Ok(self.table.edit_cell(row, column, text)?)
    }

    /// Add a column and refresh the axis picker; returns its position
    pub fn insert_column(
        &mut self,
        kind: ColumnKind,
        label: Option<String>,
        position: Option<usize>,
    ) -> Result<usize, SessionError> {
        let spec = match label {
            Some(label) => ColumnSpec::new(kind, label),
            None => ColumnSpec::of_kind(kind),
        };
        let position = self.table.insert_column(spec, position)?;
        self.axes.refresh(self.table.schema());
        Ok(position)
    }

    /// Delete a column once confirmed. Returns `false` when the user declined.
    pub fn delete_column(&mut self, position: usize, confirmed: bool) -> Result<bool, SessionError> {
        if self.table.schema().get(position).is_none() {
            return Err(TableError::ColumnOutOfRange {
                position,
                len: self.table.schema().len(),
            }
            .into());
        }
        if !confirmed {
            return Ok(false);
        }
        let spec = self.table.delete_column(position)?;
        info!("Deleted column '{}'", spec.label);
        self.axes.refresh(self.table.schema());
        Ok(true)
    }

    /// Change a column's kind (its label resets to the kind's default)
    pub fn retype_column(&mut self, position: usize, kind: ColumnKind) -> Result<(), SessionError> {
        self.table.retype_column(position, kind)?;
        self.axes.refresh(self.table.schema());
        Ok(())
    }

    /// Change a column's label
    pub fn rename_column(
        &mut self,
        position: usize,
        label: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.table.rename_column(position, label)?;
        self.axes.refresh(self.table.schema());
        Ok(())
    }

    /// Clear rows, restart the clock, zero the offset and drop the chart, once
    /// confirmed. Returns `false` when the user declined.
    pub fn clear_table(&mut self, now: Instant, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.table.clear(now);
        self.calibration.reset();
        self.chart = None;
        info!("Table cleared");
        true
    }

    /// Tare the ΔR columns at the last row; returns the applied delta
    pub fn calibrate(&mut self) -> Result<f64, SessionError> {
        Ok(self.calibration.calibrate(&self.table)?)
    }

    /// Start auto-recording and take the first sample immediately. Returns the
    /// timer period and the first row's index.
    pub fn start_auto(&mut self, input: &str, now: Instant) -> Result<(Duration, usize), SessionError> {
        let interval = self.recorder.start(input)?;
        let row = self.record_point(now);
        Ok((interval, row))
    }

    /// Stop auto-recording; reports whether it was running
    pub fn stop_auto(&mut self) -> bool {
        self.recorder.stop()
    }

    /// Auto-record timer fired. Returns the new row, or `None` when the
    /// recorder has been stopped meanwhile.
    pub fn auto_tick(&mut self, now: Instant) -> Option<usize> {
        if self.recorder.is_running() {
            Some(self.record_point(now))
        } else {
            None
        }
    }

    /// Write the table to a timestamped CSV file in the export directory
    pub fn export_csv(&self, at: DateTime<Utc>) -> Result<PathBuf, SessionError> {
        Ok(export_to_dir(&self.table, &self.config.export_dir, at)?)
    }

    /// Project two columns into a new chart, replacing any previous one.
    /// Absent axes fall back to the picker's current selection.
    pub fn draw_chart(
        &mut self,
        x: Option<usize>,
        y: Option<usize>,
    ) -> Result<&PointSeries, SessionError> {
        let (x, y) = match (x.or(self.axes.x()), y.or(self.axes.y())) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(SessionError::Validation(
                    "Select an X and a Y column first".to_string(),
                ))
            }
        };
        let series = project(&self.table, x, y)?;
        self.axes.select(x, y);
        info!("Chart: {} ({} points)", series.label, series.points.len());
        Ok(self.chart.insert(series))
    }

    // -- dispatch -------------------------------------------------------

    /// Apply one user action at `now`
    pub fn handle(&mut self, action: Action, now: Instant) -> Result<Outcome, SessionError> {
        let outcome = match action {
            Action::Connect(device) => Outcome::Send(self.connect(device)?),
            Action::StartMeasuring => {
                Outcome::Send(self.voltmeter_command(VoltmeterCommand::Start)?)
            }
            Action::StopMeasuring => {
                Outcome::Send(self.voltmeter_command(VoltmeterCommand::Stop)?)
            }
            Action::Tare => Outcome::Send(self.voltmeter_command(VoltmeterCommand::Tare)?),
            Action::SetRange(range) => {
                Outcome::Send(self.voltmeter_command(VoltmeterCommand::SetRange(range))?)
            }
            Action::SetFrequency(input) => Outcome::Send(self.set_frequency(&input)?),
            Action::SetResistance(input) => Outcome::Send(self.set_resistance(&input)?),
            Action::TogglePin { pin, on } => Outcome::Send(self.toggle_pin(pin, on)?),
            Action::SetExcitation(input) => {
                self.set_excitation(input);
                Outcome::Updated
            }
            Action::Record => Outcome::Notice(Notice::RowRecorded(self.record_point(now))),
            Action::AddEmptyRow => Outcome::Notice(Notice::RowRecorded(self.add_empty_row())),
            Action::DeleteRow(index) => {
                self.delete_row(index)?;
                Outcome::Updated
            }
            Action::EditCell { row, column, text } => {
                self.edit_cell(row, column, text)?;
                Outcome::Updated
            }
            Action::InsertColumn {
                kind,
                label,
                position,
            } => {
                self.insert_column(kind, label, position)?;
                Outcome::Updated
            }
            Action::DeleteColumn {
                position,
                confirmed,
            } => confirmation(self.delete_column(position, confirmed)?, Outcome::Updated),
            Action::RetypeColumn { position, kind } => {
                self.retype_column(position, kind)?;
                Outcome::Updated
            }
            Action::RenameColumn { position, label } => {
                self.rename_column(position, label)?;
                Outcome::Updated
            }
            Action::ClearTable { confirmed } => confirmation(
                self.clear_table(now, confirmed),
                Outcome::Notice(Notice::TableCleared),
            ),
            Action::Calibrate => {
                let delta = self.calibrate()?;
                Outcome::Notice(Notice::Calibrated {
                    delta,
                    offset: self.offset(),
                })
            }
            Action::StartAuto(input) => {
                let (interval, row) = self.start_auto(&input, now)?;
                Outcome::Notice(Notice::AutoStarted { interval, row })
            }
            Action::StopAuto => {
                if self.stop_auto() {
                    Outcome::Notice(Notice::AutoStopped)
                } else {
                    Outcome::Updated
                }
            }
            Action::Export => Outcome::Notice(Notice::Exported(self.export_csv(Utc::now())?)),
            Action::DrawChart { x, y } => {
                Outcome::Notice(Notice::ChartDrawn(self.draw_chart(x, y)?.clone()))
            }
            Action::Quit => Outcome::Quit,
        };
        Ok(outcome)
    }
}

fn confirmation(confirmed: bool, outcome: Outcome) -> Outcome {
    if confirmed {
        outcome
    } else {
        Outcome::Notice(Notice::Declined)
    }
}
