use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ConfirmationPolicy, Settings};

/// A running application as seen by every platform strategy.
///
/// `id` is what the kill call targets, `display` is shown to the user and
/// `detail` is what a relaunch should open.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub id: String,
    pub display: String,
    pub detail: String,
}

pub const ERROR_ID: &str = "Error";

impl AppDescriptor {
    pub fn new(
        id: impl Into<String>,
        display: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
            detail: detail.into(),
        }
    }

    /// Same value for all three fields (Linux, and any name-only target).
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name.clone(), name)
    }

    /// Sentinel returned in place of an inventory when listing fails.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ERROR_ID, message.clone(), message)
    }

    pub fn is_error(&self) -> bool {
        self.id == ERROR_ID
    }

    /// Composite identity used for deduplication and selection.
    pub fn same_target(&self, other: &AppDescriptor) -> bool {
        self.id == other.id && self.detail == other.detail
    }
}

impl fmt::Display for AppDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display == self.id {
            write!(f, "{}", self.display)
        } else {
            write!(f, "{} ({})", self.display, self.id)
        }
    }
}

/// Ascending by display label, case-insensitive; exact label, id and detail
/// break ties so the order is total.
pub fn display_order(a: &AppDescriptor, b: &AppDescriptor) -> Ordering {
    a.display
        .to_lowercase()
        .cmp(&b.display.to_lowercase())
        .then_with(|| a.display.cmp(&b.display))
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.detail.cmp(&b.detail))
}

/// Sort by display and drop entries sharing `(id, detail)`, keeping the first.
pub fn sort_and_dedup(apps: &mut Vec<AppDescriptor>) {
    apps.sort_by(display_order);
    let mut kept: Vec<AppDescriptor> = Vec::with_capacity(apps.len());
    for app in apps.drain(..) {
        if !kept.iter().any(|k| k.same_target(&app)) {
            kept.push(app);
        }
    }
    *apps = kept;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    pub fn flipped(self) -> Self {
        match self {
            Mode::Focus => Mode::Break,
            Mode::Break => Mode::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::Break => "Break",
        }
    }
}

/// The three-valued signal consumed by the tray and the console.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrayMode {
    Focus,
    Break,
    Paused,
}

#[derive(Clone, Debug)]
pub enum UserEvent {
    MenuAction(MenuAction),
    Tick { generation: u64 },
    TerminationSettled(Vec<AppDescriptor>),
    InventoryReady(Vec<AppDescriptor>),
    SettingsReloaded(Settings),
    SettingsReloadFailed(String),
}

/// Where background threads deliver events for the control thread.
pub trait EventSink: Send + Sync {
    /// Returns false once the receiving side has gone away.
    fn send_event(&self, event: UserEvent) -> bool;
}

impl EventSink for crossbeam_channel::Sender<UserEvent> {
    fn send_event(&self, event: UserEvent) -> bool {
        self.send(event).is_ok()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MenuAction {
    StartPause,
    Start,
    Pause,
    Reset,
    RefreshApps,
    ToggleApp { index: usize },
    ToggleRelaunch,
    EditSettings,
    ShowStatus,
    Quit,
}

#[derive(Clone, Debug)]
pub enum WorkerCommand {
    Terminate {
        targets: Vec<AppDescriptor>,
        policy: ConfirmationPolicy,
    },
    ListApps,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KillOutcome {
    Success,
    NotFound,
    PermissionDenied,
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_order_ignores_case() {
        let a = AppDescriptor::named("slack");
        let b = AppDescriptor::named("Spotify");
        let c = AppDescriptor::named("Discord");
        let mut apps = vec![b.clone(), a.clone(), c.clone()];
        apps.sort_by(display_order);
        assert_eq!(apps, vec![c, a, b]);
    }

    #[test]
    fn dedup_uses_id_and_detail() {
        let mut apps = vec![
            AppDescriptor::new("Code.exe", "Code", r"C:\a\Code.exe"),
            AppDescriptor::new("Code.exe", "Code", r"C:\b\Code.exe"),
            AppDescriptor::new("Code.exe", "Code", r"C:\a\Code.exe"),
        ];
        sort_and_dedup(&mut apps);
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].detail, r"C:\a\Code.exe");
        assert_eq!(apps[1].detail, r"C:\b\Code.exe");
    }

    #[test]
    fn error_sentinel_carries_message() {
        let err = AppDescriptor::error("ps failed");
        assert!(err.is_error());
        assert_eq!(err.display, "ps failed");
        assert_eq!(err.detail, "ps failed");
    }
}
