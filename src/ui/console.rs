//! Terminal surface. The only one on Linux, opt-in elsewhere with `--console`.

use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use anyhow::{Result, anyhow, bail};

use crate::controller::{PickerEntry, Presenter, View};
use crate::model::{EventSink, MenuAction, TrayMode, UserEvent};
use crate::ui::menu::status_line;

pub const HELP: &str = "commands: start, pause, reset, apps, toggle <n>, relaunch, edit, status, quit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<MenuAction>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let action = match command.to_ascii_lowercase().as_str() {
        "start" => MenuAction::Start,
        "pause" => MenuAction::Pause,
        "reset" => MenuAction::Reset,
        "apps" | "refresh" => MenuAction::RefreshApps,
        "toggle" => {
            let raw = words.next().ok_or_else(|| anyhow!("usage: toggle <n>"))?;
            let number: usize = raw
                .parse()
                .map_err(|_| anyhow!("not an app number: {}", raw))?;
            if number == 0 {
                bail!("app numbers start at 1");
            }
            MenuAction::ToggleApp { index: number - 1 }
        }
        "relaunch" => MenuAction::ToggleRelaunch,
        "edit" => MenuAction::EditSettings,
        "status" => MenuAction::ShowStatus,
        "quit" | "exit" => MenuAction::Quit,
        other => bail!("unknown command: {}", other),
    };
    Ok(Some(action))
}

/// Forward stdin commands as menu actions. End of input quits.
pub fn spawn_stdin_reader(sink: Arc<dyn EventSink>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::error!("Failed to read stdin: {}", err);
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Some(action)) => {
                    if !sink.send_event(UserEvent::MenuAction(action)) {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => println!("{}\n{}", err, HELP),
            }
        }
        let _ = sink.send_event(UserEvent::MenuAction(MenuAction::Quit));
    })
}

fn format_picker(picker: &[PickerEntry]) -> String {
    if picker.is_empty() {
        return "  (no apps listed, type `apps`)".to_string();
    }
    picker
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mark = match (entry.selectable(), entry.selected) {
                (false, _) => "!",
                (true, true) => "x",
                (true, false) => " ",
            };
            format!("  [{}] {:>2}. {}", mark, i + 1, entry.app)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints changes only: mode switches, notices, a new picker, new messages.
#[derive(Default)]
pub struct ConsolePresenter {
    last_picker: Option<Vec<PickerEntry>>,
    last_message: Option<String>,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for ConsolePresenter {
    fn set_mode(&mut self, mode: TrayMode) {
        let label = match mode {
            TrayMode::Focus => "focus",
            TrayMode::Break => "break",
            TrayMode::Paused => "paused",
        };
        println!("-- {} --", label);
    }

    fn notify(&mut self, title: &str, body: &str) {
        println!("{}: {}", title, body);
        crate::notify::notify(title, body);
    }

    fn render(&mut self, view: &View) {
        if view.message != self.last_message {
            if let Some(message) = &view.message {
                println!("! {}", message);
            }
            self.last_message = view.message.clone();
        }
        if !view.inventory_loading && self.last_picker.as_ref() != Some(&view.picker) {
            // The first render only primes the cache.
            if self.last_picker.is_some() {
                println!("{}", format_picker(&view.picker));
            }
            self.last_picker = Some(view.picker.clone());
        }
    }

    fn show_status(&mut self, view: &View) {
        println!("{}", status_line(view));
        println!(
            "relaunch on break: {}",
            if view.relaunch_enabled { "on" } else { "off" }
        );
        println!("{}", format_picker(&view.picker));
        self.last_picker = Some(view.picker.clone());
    }
}
