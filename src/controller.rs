//! Drives the session from user and background events and carries out the
//! effects it asks for.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{debug, info, warn};

use crate::config::{Settings, save_settings_to};
use crate::control::relaunch_apps;
use crate::kill_list::KillList;
use crate::model::{AppDescriptor, MenuAction, TrayMode, UserEvent, WorkerCommand, display_order};
use crate::platform::ProcessControl;
use crate::session::{Durations, Effect, Phase, Session};
use crate::ticker::Ticker;
use crate::utils::open_in_editor;

/// The presentation-mode boundary. Implementations only display what they are
/// given; the latest call wins.
pub trait Presenter {
    fn set_mode(&mut self, mode: TrayMode);
    fn notify(&mut self, title: &str, body: &str);
    fn render(&mut self, view: &View);

    /// Explicit status request from the user.
    fn show_status(&mut self, view: &View) {
        self.render(view);
    }
}

/// One row of the distracting-apps picker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PickerEntry {
    pub app: AppDescriptor,
    pub selected: bool,
}

impl PickerEntry {
    pub fn selectable(&self) -> bool {
        !self.app.is_error()
    }
}

/// Snapshot handed to the presenter after every event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct View {
    pub phase: Phase,
    pub terminating: bool,
    /// The pending termination will start the session when it settles.
    pub starting: bool,
    pub remaining: u64,
    pub kill_list: Vec<AppDescriptor>,
    pub picker: Vec<PickerEntry>,
    pub relaunch_enabled: bool,
    pub inventory_loading: bool,
    pub message: Option<String>,
}

impl View {
    pub fn mode(&self) -> TrayMode {
        self.phase.tray_mode()
    }

    pub fn running(&self) -> bool {
        matches!(self.phase, Phase::FocusRunning | Phase::BreakRunning)
    }
}

pub struct Controller {
    settings: Settings,
    settings_path: PathBuf,
    kill_list: KillList,
    session: Session,
    ticker: Ticker,
    worker: Sender<WorkerCommand>,
    control: Arc<dyn ProcessControl>,
    presenter: Box<dyn Presenter>,
    inventory: Vec<AppDescriptor>,
    inventory_loading: bool,
    message: Option<String>,
}

impl Controller {
    pub fn new(
        settings: Settings,
        settings_path: PathBuf,
        ticker: Ticker,
        worker: Sender<WorkerCommand>,
        control: Arc<dyn ProcessControl>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let kill_list = KillList::new(settings.app_kill_list.clone());
        let session = Session::new(Durations::from(&settings), settings.relaunch_optional);
        Self {
            settings,
            settings_path,
            kill_list,
            session,
            ticker,
            worker,
            control,
            presenter,
            inventory: Vec::new(),
            inventory_loading: false,
            message: None,
        }
    }

    /// Show the initial paused state.
    pub fn present(&mut self) {
        self.presenter.set_mode(self.session.phase().tray_mode());
        let view = self.view();
        self.presenter.render(&view);
    }

    /// Handle one event. Returns false once the user asked to quit.
    pub fn handle(&mut self, event: UserEvent) -> bool {
        match event {
            UserEvent::MenuAction(action) => {
                if !self.handle_action(action) {
                    return false;
                }
            }
            UserEvent::Tick { generation } => {
                if !self.ticker.accepts(generation) {
                    debug!("Dropping stale tick from ticker {}", generation);
                    return true;
                }
                let effects = self.session.tick(self.kill_list.entries());
                self.apply(effects);
            }
            UserEvent::TerminationSettled(killed) => {
                let effects = self.session.termination_settled(killed);
                self.apply(effects);
            }
            UserEvent::InventoryReady(apps) => {
                self.inventory = apps;
                self.inventory_loading = false;
            }
            UserEvent::SettingsReloaded(settings) => self.reload_settings(settings),
            UserEvent::SettingsReloadFailed(message) => self.message = Some(message),
        }
        let view = self.view();
        self.presenter.render(&view);
        true
    }

    fn handle_action(&mut self, action: MenuAction) -> bool {
        debug!("Menu action: {:?}", action);
        let effects = match action {
            MenuAction::StartPause => self.session.toggle(self.kill_list.entries()),
            MenuAction::Start => self.session.start(self.kill_list.entries()),
            MenuAction::Pause => self.session.pause(),
            MenuAction::Reset => self.session.reset(),
            MenuAction::RefreshApps => {
                self.refresh_inventory();
                Vec::new()
            }
            MenuAction::ToggleApp { index } => {
                self.toggle_app(index);
                Vec::new()
            }
            MenuAction::ToggleRelaunch => {
                let enabled = !self.settings.relaunch_optional;
                self.settings.relaunch_optional = enabled;
                self.session.set_relaunch_enabled(enabled);
                info!("Relaunch on break {}", if enabled { "enabled" } else { "disabled" });
                self.persist();
                Vec::new()
            }
            MenuAction::EditSettings => {
                self.edit_settings();
                Vec::new()
            }
            MenuAction::ShowStatus => {
                let view = self.view();
                self.presenter.show_status(&view);
                Vec::new()
            }
            MenuAction::Quit => {
                self.ticker.stop();
                info!("Quitting");
                return false;
            }
        };
        self.apply(effects);
        true
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Terminate(targets) => {
                    let command = WorkerCommand::Terminate {
                        targets,
                        policy: self.settings.confirmation_policy,
                    };
                    if self.worker.send(command).is_err() {
                        warn!("Worker is gone, starting without silencing apps");
                        queue.extend(self.session.termination_settled(Vec::new()));
                    }
                }
                Effect::Relaunch(apps) => relaunch_apps(Arc::clone(&self.control), apps),
                Effect::StartTicking => {
                    self.ticker.start();
                }
                Effect::StopTicking => self.ticker.stop(),
                Effect::SetMode(mode) => self.presenter.set_mode(mode),
                Effect::Notify { title, body } => self.presenter.notify(&title, &body),
            }
        }
    }

    fn refresh_inventory(&mut self) {
        if self.inventory_loading {
            return;
        }
        if self.worker.send(WorkerCommand::ListApps).is_ok() {
            self.inventory_loading = true;
        } else {
            warn!("Worker is gone, cannot list apps");
        }
    }

    fn toggle_app(&mut self, index: usize) {
        let Some(entry) = self.picker().into_iter().nth(index) else {
            debug!("No picker entry at {}", index);
            return;
        };
        if !entry.selectable() {
            return;
        }
        self.kill_list.toggle(&entry.app);
        self.persist();
    }

    fn edit_settings(&mut self) {
        if !self.settings_path.exists() {
            self.persist();
        }
        if let Err(err) = open_in_editor(&self.settings_path) {
            warn!("Failed to open settings file: {}", err);
            self.message = Some(format!("Could not open {}", self.settings_path.display()));
        }
    }

    fn reload_settings(&mut self, settings: Settings) {
        // Our own saves come back through the watcher.
        if settings == self.settings {
            return;
        }
        info!("Settings reloaded");
        self.kill_list = KillList::new(settings.app_kill_list.clone());
        self.session.set_durations(Durations::from(&settings));
        self.session.set_relaunch_enabled(settings.relaunch_optional);
        self.settings = settings;
        self.message = None;
    }

    fn persist(&mut self) {
        self.settings.app_kill_list = self.kill_list.entries().to_vec();
        if !save_settings_to(&self.settings_path, &self.settings) {
            self.message = Some("Settings could not be saved".to_string());
        }
    }

    /// The inventory merged with selected apps that are not running right now.
    fn picker(&self) -> Vec<PickerEntry> {
        let mut apps = self.inventory.clone();
        for entry in self.kill_list.entries() {
            if !apps.iter().any(|a| a.same_target(entry)) {
                apps.push(entry.clone());
            }
        }
        apps.sort_by(display_order);
        apps.into_iter()
            .map(|app| PickerEntry {
                selected: self.kill_list.contains(&app),
                app,
            })
            .collect()
    }

    pub fn view(&self) -> View {
        View {
            phase: self.session.phase(),
            terminating: self.session.is_terminating(),
            starting: self.session.is_starting(),
            remaining: self.session.remaining(),
            kill_list: self.kill_list.entries().to_vec(),
            picker: self.picker(),
            relaunch_enabled: self.session.relaunch_enabled(),
            inventory_loading: self.inventory_loading,
            message: self.message.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn kill_list(&self) -> &KillList {
        &self.kill_list
    }

    pub fn tick_generation(&self) -> u64 {
        self.ticker.generation()
    }
}
