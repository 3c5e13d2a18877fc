use crate::controller::View;
use crate::model::{MenuAction, TrayMode};
use crate::utils::format_remaining;

const MAX_TOOLTIP_ENTRIES: usize = 5;
const MENU_ID_START_PAUSE: &str = "start_pause";
const MENU_ID_RESET: &str = "reset";
const MENU_ID_REFRESH_APPS: &str = "refresh_apps";
const MENU_ID_RELAUNCH: &str = "relaunch";
const MENU_ID_EDIT_SETTINGS: &str = "edit_settings";
const MENU_ID_QUIT: &str = "quit";
const MENU_ID_APP_PREFIX: &str = "app_";

pub fn app_menu_id(index: usize) -> String {
    format!("{}{}", MENU_ID_APP_PREFIX, index)
}

pub fn parse_menu_id(raw: &str) -> Option<MenuAction> {
    match raw {
        MENU_ID_START_PAUSE => Some(MenuAction::StartPause),
        MENU_ID_RESET => Some(MenuAction::Reset),
        MENU_ID_REFRESH_APPS => Some(MenuAction::RefreshApps),
        MENU_ID_RELAUNCH => Some(MenuAction::ToggleRelaunch),
        MENU_ID_EDIT_SETTINGS => Some(MenuAction::EditSettings),
        MENU_ID_QUIT => Some(MenuAction::Quit),
        _ => {
            let index = raw.strip_prefix(MENU_ID_APP_PREFIX)?.parse::<usize>().ok()?;
            Some(MenuAction::ToggleApp { index })
        }
    }
}

fn start_pause_label(view: &View) -> &'static str {
    if view.running() || view.starting {
        "Pause"
    } else {
        "Start"
    }
}

fn checked(label: &str, on: bool) -> String {
    if on {
        format!("✓ {}", label)
    } else {
        label.to_string()
    }
}

/// Start/pause label, picker rows, relaunch flag, loading flag.
pub type MenuSignature = (String, Vec<(String, bool)>, bool, bool);

/// Everything the menu shows. The tray rebuilds its menu only when this
/// changes, not on every tick.
pub fn menu_signature(view: &View) -> MenuSignature {
    (
        start_pause_label(view).to_string(),
        view.picker
            .iter()
            .map(|e| (e.app.to_string(), e.selected))
            .collect(),
        view.relaunch_enabled,
        view.inventory_loading,
    )
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
pub fn build_menu(view: &View) -> anyhow::Result<tray_icon::menu::Menu> {
    use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem, Submenu};

    let menu = Menu::new();

    let start_pause = MenuItem::with_id(MENU_ID_START_PAUSE, start_pause_label(view), true, None);
    menu.append(&start_pause)?;
    let reset = MenuItem::with_id(MENU_ID_RESET, "Reset", true, None);
    menu.append(&reset)?;
    menu.append(&PredefinedMenuItem::separator())?;

    let picker = Submenu::with_id(
        "header_apps",
        format!("Distracting Apps · {}", view.kill_list.len()),
        true,
    );
    if view.picker.is_empty() {
        let label = if view.inventory_loading {
            "Loading…"
        } else {
            "No apps listed yet"
        };
        picker.append(&MenuItem::with_id("apps_empty", label, false, None))?;
    }
    for (index, entry) in view.picker.iter().enumerate() {
        let item = MenuItem::with_id(
            app_menu_id(index),
            checked(&entry.app.to_string(), entry.selected),
            entry.selectable(),
            None,
        );
        picker.append(&item)?;
    }
    picker.append(&PredefinedMenuItem::separator())?;
    let refresh = MenuItem::with_id(
        MENU_ID_REFRESH_APPS,
        "Refresh App List",
        !view.inventory_loading,
        None,
    );
    picker.append(&refresh)?;
    menu.append(&picker)?;

    let relaunch = MenuItem::with_id(
        MENU_ID_RELAUNCH,
        checked("Relaunch Apps on Break", view.relaunch_enabled),
        true,
        None,
    );
    menu.append(&relaunch)?;

    menu.append(&PredefinedMenuItem::separator())?;
    let edit_settings = MenuItem::with_id(MENU_ID_EDIT_SETTINGS, "Edit Settings...", true, None);
    menu.append(&edit_settings)?;
    let quit_item = MenuItem::with_id(MENU_ID_QUIT, "Quit", true, None);
    menu.append(&quit_item)?;
    Ok(menu)
}

pub fn status_line(view: &View) -> String {
    let mode = match view.mode() {
        TrayMode::Focus => "Focus",
        TrayMode::Break => "Break",
        TrayMode::Paused => "Paused",
    };
    if view.terminating {
        format!("{} · silencing apps…", mode)
    } else {
        format!("{} · {}", mode, format_remaining(view.remaining))
    }
}

pub fn build_tooltip(view: &View) -> String {
    let mut lines = vec![status_line(view)];
    if view.kill_list.is_empty() {
        lines.push("No distracting apps selected.".to_string());
    } else {
        lines.push(format!("Distracting apps: {}", view.kill_list.len()));
        for app in view.kill_list.iter().take(MAX_TOOLTIP_ENTRIES) {
            lines.push(format!("• {}", app.display));
        }
        if view.kill_list.len() > MAX_TOOLTIP_ENTRIES {
            lines.push(format!(
                "…and {} more",
                view.kill_list.len() - MAX_TOOLTIP_ENTRIES
            ));
        }
    }
    if let Some(message) = &view.message {
        lines.push(format!("⚠️ {}", message));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PickerEntry;
    use crate::model::AppDescriptor;
    use crate::session::Phase;

    fn view() -> View {
        View {
            phase: Phase::FocusPaused,
            terminating: false,
            starting: false,
            remaining: 1500,
            kill_list: Vec::new(),
            picker: Vec::new(),
            relaunch_enabled: true,
            inventory_loading: false,
            message: None,
        }
    }

    #[test]
    fn parse_simple_actions() {
        assert_eq!(parse_menu_id("start_pause"), Some(MenuAction::StartPause));
        assert_eq!(parse_menu_id("reset"), Some(MenuAction::Reset));
        assert_eq!(parse_menu_id("refresh_apps"), Some(MenuAction::RefreshApps));
        assert_eq!(parse_menu_id("relaunch"), Some(MenuAction::ToggleRelaunch));
        assert_eq!(parse_menu_id("edit_settings"), Some(MenuAction::EditSettings));
        assert_eq!(parse_menu_id("quit"), Some(MenuAction::Quit));
    }

    #[test]
    fn parse_app_actions() {
        assert_eq!(
            parse_menu_id(&app_menu_id(3)),
            Some(MenuAction::ToggleApp { index: 3 })
        );
        assert_eq!(parse_menu_id("app_x"), None);
        assert_eq!(parse_menu_id("header_apps"), None);
    }

    #[test]
    fn tooltip_lists_selected_apps() {
        let mut v = view();
        assert_eq!(
            build_tooltip(&v),
            "Paused · 25:00\nNo distracting apps selected."
        );

        v.phase = Phase::FocusRunning;
        v.remaining = 61;
        v.kill_list = (0..7)
            .map(|i| AppDescriptor::named(format!("app{}", i)))
            .collect();
        v.message = Some("bad settings".into());
        let tooltip = build_tooltip(&v);
        assert!(tooltip.starts_with("Focus · 01:01\nDistracting apps: 7"));
        assert!(tooltip.contains("…and 2 more"));
        assert!(tooltip.ends_with("⚠️ bad settings"));
    }

    #[test]
    fn signature_ignores_the_clock() {
        let mut v = view();
        v.phase = Phase::FocusRunning;
        let before = menu_signature(&v);
        v.remaining -= 1;
        assert_eq!(before, menu_signature(&v));

        v.picker.push(PickerEntry {
            app: AppDescriptor::named("Slack"),
            selected: true,
        });
        assert_ne!(before, menu_signature(&v));
    }

    #[test]
    fn start_label_follows_phase() {
        let mut v = view();
        assert_eq!(start_pause_label(&v), "Start");
        v.terminating = true;
        v.starting = true;
        assert_eq!(start_pause_label(&v), "Pause");
        v.starting = false;
        assert_eq!(start_pause_label(&v), "Start");
        v.terminating = false;
        v.phase = Phase::BreakRunning;
        assert_eq!(start_pause_label(&v), "Pause");
    }
}
