//! Focus/break session state machine.
//!
//! The machine never touches the OS or the clock. Each event method updates
//! the state and returns the effects the caller has to carry out, in order.
//! A fresh focus session is only marked running once the termination it
//! requested has been reported back through [`Session::termination_settled`].

use log::{debug, info, warn};

use crate::config::Settings;
use crate::model::{AppDescriptor, Mode, TrayMode};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    FocusRunning,
    FocusPaused,
    BreakRunning,
    BreakPaused,
}

impl Phase {
    pub fn tray_mode(self) -> TrayMode {
        match self {
            Phase::FocusRunning => TrayMode::Focus,
            Phase::BreakRunning => TrayMode::Break,
            Phase::FocusPaused | Phase::BreakPaused => TrayMode::Paused,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    /// Terminate these apps and report the confirmed ones back. Awaited.
    Terminate(Vec<AppDescriptor>),
    /// Relaunch these apps. Never awaited.
    Relaunch(Vec<AppDescriptor>),
    StartTicking,
    StopTicking,
    SetMode(TrayMode),
    Notify { title: String, body: String },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Durations {
    pub focus_secs: u64,
    pub break_secs: u64,
}

impl From<&Settings> for Durations {
    fn from(settings: &Settings) -> Self {
        Self {
            focus_secs: settings.focus_secs(),
            break_secs: settings.break_secs(),
        }
    }
}

/// What to do with the apps a pending termination confirms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AfterKill {
    /// Record them and start the focus session.
    Run,
    /// Record them, stay paused (paused while terminating).
    Hold,
    /// Give them back (reset while terminating).
    Release,
}

#[derive(Debug)]
pub struct Session {
    durations: Durations,
    relaunch_enabled: bool,
    mode: Mode,
    running: bool,
    remaining: u64,
    killed: Vec<AppDescriptor>,
    pending: Option<AfterKill>,
}

impl Session {
    pub fn new(durations: Durations, relaunch_enabled: bool) -> Self {
        Self {
            durations,
            relaunch_enabled,
            mode: Mode::Focus,
            running: false,
            remaining: durations.focus_secs,
            killed: Vec::new(),
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.mode, self.running) {
            (Mode::Focus, true) => Phase::FocusRunning,
            (Mode::Focus, false) => Phase::FocusPaused,
            (Mode::Break, true) => Phase::BreakRunning,
            (Mode::Break, false) => Phase::BreakPaused,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// A termination has been requested and has not settled yet.
    pub fn is_terminating(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending termination will start the session when it settles.
    pub fn is_starting(&self) -> bool {
        self.pending == Some(AfterKill::Run)
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Apps silenced for the current focus session.
    pub fn killed(&self) -> &[AppDescriptor] {
        &self.killed
    }

    pub fn relaunch_enabled(&self) -> bool {
        self.relaunch_enabled
    }

    pub fn full_duration(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Focus => self.durations.focus_secs,
            Mode::Break => self.durations.break_secs,
        }
    }

    fn is_fresh(&self) -> bool {
        self.remaining == self.full_duration(self.mode)
    }

    /// Start a fresh session or resume a paused one.
    pub fn start(&mut self, kill_list: &[AppDescriptor]) -> Vec<Effect> {
        if self.running {
            return Vec::new();
        }
        if let Some(intent) = self.pending.as_mut() {
            // The termination already in flight will start the session.
            *intent = AfterKill::Run;
            return Vec::new();
        }
        if self.mode == Mode::Focus && self.is_fresh() {
            return self.begin_focus(kill_list);
        }
        debug!("Resuming {} with {}s left", self.mode.label(), self.remaining);
        self.run()
    }

    pub fn pause(&mut self) -> Vec<Effect> {
        if let Some(intent) = self.pending.as_mut() {
            if *intent == AfterKill::Run {
                *intent = AfterKill::Hold;
                return vec![Effect::SetMode(TrayMode::Paused)];
            }
            return Vec::new();
        }
        if !self.running {
            return Vec::new();
        }
        self.running = false;
        vec![Effect::StopTicking, Effect::SetMode(TrayMode::Paused)]
    }

    /// Start/pause as a single user action.
    pub fn toggle(&mut self, kill_list: &[AppDescriptor]) -> Vec<Effect> {
        if self.running || self.is_starting() {
            self.pause()
        } else {
            self.start(kill_list)
        }
    }

    /// One elapsed second. Counting past zero ends the session.
    pub fn tick(&mut self, kill_list: &[AppDescriptor]) -> Vec<Effect> {
        if !self.running {
            return Vec::new();
        }
        if self.remaining == 0 {
            return self.switch(kill_list);
        }
        self.remaining -= 1;
        Vec::new()
    }

    /// Back to a paused, full-length focus session; silenced apps are given
    /// back.
    pub fn reset(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::StopTicking];
        self.mode = Mode::Focus;
        self.running = false;
        self.remaining = self.durations.focus_secs;
        if let Some(intent) = self.pending.as_mut() {
            *intent = AfterKill::Release;
        }
        effects.extend(self.flush_killed());
        effects.push(Effect::SetMode(TrayMode::Paused));
        info!("Session reset");
        effects
    }

    /// The termination requested by a `Terminate` effect has settled.
    pub fn termination_settled(&mut self, confirmed: Vec<AppDescriptor>) -> Vec<Effect> {
        let Some(intent) = self.pending.take() else {
            warn!("Ignoring termination result with nothing pending");
            return Vec::new();
        };
        match intent {
            AfterKill::Run => {
                self.record_killed(confirmed);
                info!("Focus session started, {} apps silenced", self.killed.len());
                self.run()
            }
            AfterKill::Hold => {
                self.record_killed(confirmed);
                Vec::new()
            }
            AfterKill::Release => {
                if self.relaunch_enabled && !confirmed.is_empty() {
                    vec![Effect::Relaunch(confirmed)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// New configured durations. A session that has not started yet follows
    /// them immediately; anything in progress keeps its remaining time.
    pub fn set_durations(&mut self, durations: Durations) {
        let untouched = !self.running && self.pending.is_none() && self.is_fresh();
        self.durations = durations;
        if untouched {
            self.remaining = self.full_duration(self.mode);
        }
    }

    pub fn set_relaunch_enabled(&mut self, enabled: bool) {
        self.relaunch_enabled = enabled;
    }

    fn run(&mut self) -> Vec<Effect> {
        self.running = true;
        vec![
            Effect::SetMode(self.phase().tray_mode()),
            Effect::StartTicking,
        ]
    }

    fn begin_focus(&mut self, kill_list: &[AppDescriptor]) -> Vec<Effect> {
        if kill_list.is_empty() {
            return self.run();
        }
        self.pending = Some(AfterKill::Run);
        vec![Effect::Terminate(kill_list.to_vec())]
    }

    fn switch(&mut self, kill_list: &[AppDescriptor]) -> Vec<Effect> {
        let ended = self.mode;
        self.running = false;
        self.mode = ended.flipped();
        self.remaining = self.full_duration(self.mode);
        info!("{} session ended, switching to {}", ended.label(), self.mode.label());

        let mut effects = vec![Effect::StopTicking, self.session_ended_notice(ended)];
        match self.mode {
            Mode::Break => {
                effects.extend(self.flush_killed());
                effects.extend(self.run());
            }
            Mode::Focus => {
                let focus = self.begin_focus(kill_list);
                // Out of break, not yet focused until the join settles.
                if self.is_terminating() {
                    effects.push(Effect::SetMode(TrayMode::Paused));
                }
                effects.extend(focus);
            }
        }
        effects
    }

    fn session_ended_notice(&self, ended: Mode) -> Effect {
        let minutes = self.remaining / 60;
        let body = match ended {
            Mode::Focus => format!("Time for a {} minute break.", minutes),
            Mode::Break => format!("Back to focus for {} minutes.", minutes),
        };
        Effect::Notify {
            title: format!("{} session ended", ended.label()),
            body,
        }
    }

    fn flush_killed(&mut self) -> Option<Effect> {
        let killed = std::mem::take(&mut self.killed);
        (self.relaunch_enabled && !killed.is_empty()).then_some(Effect::Relaunch(killed))
    }

    fn record_killed(&mut self, confirmed: Vec<AppDescriptor>) {
        for app in confirmed {
            if !self.killed.iter().any(|k| k.same_target(&app)) {
                self.killed.push(app);
            }
        }
    }
}
