use anyhow::{Context, Result};
use log::error;
use tray_icon::menu::Menu;
use tray_icon::{TrayIcon, TrayIconBuilder};

use crate::controller::{Presenter, View};
use crate::model::TrayMode;
use crate::ui::icon::create_mode_icon;
use crate::ui::menu::{MenuSignature, build_menu, build_tooltip, menu_signature};
use crate::utils::format_remaining;

/// Menu bar / notification area surface.
pub struct TrayPresenter {
    tray_icon: TrayIcon,
    mode: TrayMode,
    menu_signature: Option<MenuSignature>,
}

impl TrayPresenter {
    /// Starts paused with an empty menu; the first `render` fills it in.
    pub fn new() -> Result<Self> {
        let mode = TrayMode::Paused;
        let icon = create_mode_icon(mode).context("failed to create tray icon image")?;
        let tray_icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_icon_as_template(true)
            .with_menu(Box::new(Menu::new()))
            .with_tooltip("focusguard")
            .build()
            .context("failed to create tray icon")?;
        tray_icon
            .set_visible(true)
            .context("failed to show tray icon")?;

        Ok(Self {
            tray_icon,
            mode,
            menu_signature: None,
        })
    }

    fn sync_menu(&mut self, view: &View) {
        let signature = menu_signature(view);
        if self.menu_signature.as_ref() == Some(&signature) {
            return;
        }
        match build_menu(view) {
            Ok(menu) => {
                self.tray_icon.set_menu(Some(Box::new(menu)));
                self.menu_signature = Some(signature);
            }
            Err(err) => error!("Failed to rebuild menu: {}", err),
        }
    }
}

impl Presenter for TrayPresenter {
    fn set_mode(&mut self, mode: TrayMode) {
        if mode == self.mode {
            return;
        }
        match create_mode_icon(mode) {
            Ok(icon) => {
                if let Err(err) = self.tray_icon.set_icon(Some(icon)) {
                    error!("Failed to update tray icon: {}", err);
                    return;
                }
                self.tray_icon.set_icon_as_template(true);
                self.mode = mode;
            }
            Err(err) => error!("Failed to load icon for {:?}: {}", mode, err),
        }
    }

    fn notify(&mut self, title: &str, body: &str) {
        crate::notify::notify(title, body);
    }

    fn render(&mut self, view: &View) {
        // Menu bar title; ignored on Windows.
        let title = view.running().then(|| format_remaining(view.remaining));
        self.tray_icon.set_title(title);

        let tooltip = build_tooltip(view);
        if let Err(err) = self.tray_icon.set_tooltip(Some(tooltip.as_str())) {
            error!("Failed to update tooltip: {}", err);
        }
        self.sync_menu(view);
    }
}
