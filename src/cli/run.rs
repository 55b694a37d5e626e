//! Interactive measurement session on stdin/stdout.
//!
//! The event loop runs on its own thread; this thread only turns typed lines
//! into [`Action`]s and asks for confirmation before destructive ones. Events
//! are printed by a third thread, which also keeps the latest [`View`] for the
//! `show` and `table` commands.

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use log::info;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use wheatstone::client::{BackendConfig, HttpBackend};
use wheatstone::device::Device;
use wheatstone::session::{Action, Controller, Event, EventLoop, Notice, SessionConfig, View};
use wheatstone::table::ColumnKind;

const HELP: &str = "\
Devices
  connect box|meter          connect the resistance box or the voltmeter
  start | stop | tare        voltmeter measurement control
  range N | freq HZ          voltmeter range index and sampling frequency
  res OHMS                   set the resistance box total
  pin N on|off               switch one pin (2-6)
  us VOLTS                   excitation voltage
Table (rows and columns are numbered from 1)
  record | r                 record a row from the latest readings
  add                        append an empty row
  del-row ROW                delete a row
  edit ROW COL TEXT          overwrite a cell
  col-add KIND [LABEL]       add a column (time, voltage, resistance, exact, linear, custom)
  col-del COL                delete a column and its data
  col-type COL KIND          change a column's kind
  col-name COL LABEL         rename a column
  clear                      clear the table and the calibration
  cal                        tare ΔR at the last row
  auto [SECONDS] | auto-stop auto-record
  export                     write the table to CSV
  chart [X Y]                project two columns into points
Other
  show | table | help | quit";

/// A parsed input line
#[derive(Debug, PartialEq)]
enum Input {
    Action(Action),
    Show,
    Table,
    Help,
    Quit,
    Empty,
}

/// Run an interactive session until `quit` or end of input
pub fn run(backend_config: BackendConfig, session: SessionConfig) -> Result<()> {
    let default_interval = session.auto_interval.clone();
    let backend = HttpBackend::new(backend_config.clone()).context("Invalid backend configuration")?;
    let controller = Controller::new(session, Instant::now());
    let event_loop = EventLoop::new(controller, Arc::new(backend), &backend_config);

    let (action_tx, action_rx) = unbounded();
    let (event_tx, event_rx) = unbounded::<Event>();
    let latest: Arc<Mutex<Option<View>>> = Arc::new(Mutex::new(None));

    let session_thread = thread::Builder::new()
        .name("wheatstone-session".to_string())
        .spawn(move || event_loop.run(action_rx, event_tx))
        .context("Failed to spawn session thread")?;

    let printer_view = Arc::clone(&latest);
    let printer = thread::Builder::new()
        .name("wheatstone-printer".to_string())
        .spawn(move || {
            for event in event_rx {
                match event {
                    Event::Notice(notice) => println!("{}", describe(&notice)),
                    Event::Alert(error) => eprintln!("{}", alert(&error.to_string())),
                    Event::Refreshed(view) => {
                        *printer_view.lock().unwrap_or_else(|e| e.into_inner()) = Some(*view);
                    }
                }
            }
        })
        .context("Failed to spawn output thread")?;

    println!("Connected to {} - type 'help' for commands", backend_config.base_url);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        let action = match parse_line(&line, &default_interval) {
            Ok(Input::Action(action)) => action,
            Ok(Input::Show) => {
                print_latest(&latest, false);
                continue;
            }
            Ok(Input::Table) => {
                print_latest(&latest, true);
                continue;
            }
            Ok(Input::Help) => {
                println!("{}", HELP);
                continue;
            }
            Ok(Input::Quit) => break,
            Ok(Input::Empty) => continue,
            Err(message) => {
                eprintln!("{}", alert(&message));
                continue;
            }
        };

        let action = match confirmation_prompt(&action) {
            Some(question) => {
                print!("{} [y/N] ", question);
                io::stdout().flush()?;
                let answer = lines.next().transpose()?.unwrap_or_default();
                confirm(action, matches!(answer.trim(), "y" | "Y" | "yes"))
            }
            None => action,
        };

        if action_tx.send(action).is_err() {
            break;
        }
    }

    let _ = action_tx.send(Action::Quit);
    let controller = session_thread
        .join()
        .map_err(|_| anyhow::anyhow!("Session thread panicked"))?;
    printer
        .join()
        .map_err(|_| anyhow::anyhow!("Output thread panicked"))?;

    info!("Session closed with {} rows", controller.table().len());
    Ok(())
}

fn parse_line(line: &str, default_interval: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some(command) => command,
        None => return Ok(Input::Empty),
    };
    let args: Vec<&str> = words.collect();
    let arg = |i: usize| {
        args.get(i)
            .copied()
            .ok_or_else(|| format!("'{}' needs more arguments (see 'help')", command))
    };
    let rest = |from: usize| args.get(from..).map(|a| a.join(" ")).unwrap_or_default();

    let action = match command {
        "connect" => Action::Connect(parse_device(arg(0)?)?),
        "start" => Action::StartMeasuring,
        "stop" => Action::StopMeasuring,
        "tare" => Action::Tare,
        "range" => {
            let word = arg(0)?;
            Action::SetRange(
                word.parse()
                    .map_err(|_| format!("Invalid range index '{}'", word))?,
            )
        }
        "freq" => Action::SetFrequency(arg(0)?.to_string()),
        "res" => Action::SetResistance(rest(0)),
        "pin" => Action::TogglePin {
            pin: {
                let word = arg(0)?;
                word.parse().map_err(|_| format!("Invalid pin '{}'", word))?
            },
            on: match arg(1)? {
                "on" | "1" => true,
                "off" | "0" => false,
                other => return Err(format!("Pin state must be on or off, not '{}'", other)),
            },
        },
        "us" => Action::SetExcitation(rest(0)),
        "record" | "r" => Action::Record,
        "add" => Action::AddEmptyRow,
        "del-row" => Action::DeleteRow(index(arg(0)?)?),
        "edit" => Action::EditCell {
            row: index(arg(0)?)?,
            column: index(arg(1)?)?,
            text: rest(2),
        },
        "col-add" => Action::InsertColumn {
            kind: parse_kind(arg(0)?)?,
            label: args.get(1).map(|_| rest(1)),
            position: None,
        },
        "col-del" => Action::DeleteColumn {
            position: index(arg(0)?)?,
            confirmed: false,
        },
        "col-type" => Action::RetypeColumn {
            position: index(arg(0)?)?,
            kind: parse_kind(arg(1)?)?,
        },
        "col-name" => Action::RenameColumn {
            position: index(arg(0)?)?,
            label: rest(1),
        },
        "clear" => Action::ClearTable { confirmed: false },
        "cal" | "calibrate" => Action::Calibrate,
        "auto" => Action::StartAuto(args.first().copied().unwrap_or(default_interval).to_string()),
        "auto-stop" => Action::StopAuto,
        "export" => Action::Export,
        "chart" => match args.len() {
            0 => Action::DrawChart { x: None, y: None },
            _ => Action::DrawChart {
                x: Some(index(arg(0)?)?),
                y: Some(index(arg(1)?)?),
            },
        },
        "show" => return Ok(Input::Show),
        "table" => return Ok(Input::Table),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" | "q" => return Ok(Input::Quit),
        other => return Err(format!("Unknown command '{}' (see 'help')", other)),
    };
    Ok(Input::Action(action))
}

fn parse_device(word: &str) -> Result<Device, String> {
    match word {
        "box" | "rb" | "resistance" => Ok(Device::ResistanceBox),
        "meter" | "vm" | "voltmeter" => Ok(Device::Voltmeter),
        other => Err(format!("Unknown device '{}' (box or meter)", other)),
    }
}

fn parse_kind(word: &str) -> Result<ColumnKind, String> {
    word.parse::<ColumnKind>().map_err(|e| e.to_string())
}

/// 1-based user index to 0-based position
fn index(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{}' is not a row or column number", word)),
    }
}

fn confirmation_prompt(action: &Action) -> Option<String> {
    match action {
        Action::DeleteColumn { position, .. } => Some(format!(
            "Delete column {} and all its data?",
            position + 1
        )),
        Action::ClearTable { .. } => Some("Clear all rows and the calibration?".to_string()),
        _ => None,
    }
}

fn confirm(action: Action, yes: bool) -> Action {
    match action {
        Action::DeleteColumn { position, .. } => Action::DeleteColumn {
            position,
            confirmed: yes,
        },
        Action::ClearTable { .. } => Action::ClearTable { confirmed: yes },
        other => other,
    }
}

fn describe(notice: &Notice) -> String {
    match notice {
        Notice::RowRecorded(row) => format!("Row {} recorded", row + 1),
        Notice::Calibrated { delta, offset } => format!(
            "Calibrated: applied {:.4} Ω, cumulative offset {:.4} Ω",
            delta, offset
        ),
        Notice::Exported(path) => format!("Exported to {}", path.display()),
        Notice::ChartDrawn(series) => series.to_string(),
        Notice::AutoStarted { interval, row } => format!(
            "Auto-record every {:.2} s, row {} recorded",
            interval.as_secs_f64(),
            row + 1
        ),
        Notice::AutoStopped => "Auto-record stopped".to_string(),
        Notice::TableCleared => "Table cleared".to_string(),
        Notice::Declined => "Cancelled".to_string(),
    }
}

fn alert(message: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        format!("{} {}", console::style("error:").red().bold(), message)
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        format!("error: {}", message)
    }
}

fn print_latest(latest: &Mutex<Option<View>>, as_table: bool) {
    let view = latest.lock().unwrap_or_else(|e| e.into_inner()).clone();
    match view {
        Some(view) if as_table => println!("{}", render_table(&view)),
        Some(view) => println!("{}", view),
        None => println!("Waiting for the first status poll"),
    }
}

fn render_table(view: &View) -> String {
    let mut widths: Vec<usize> = view.columns.iter().map(|c| c.chars().count()).collect();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = render_line("#", view.columns.iter().map(String::as_str), &widths);
    for (i, row) in view.rows.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_line(
            &(i + 1).to_string(),
            row.cells().iter().map(String::as_str),
            &widths,
        ));
    }
    out
}

fn render_line<'a>(number: &str, cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut out = format!("{:>4} ", number);
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        out.push_str(&format!("| {}{} ", cell, " ".repeat(pad)));
    }
    out.trim_end().to_string()
}
