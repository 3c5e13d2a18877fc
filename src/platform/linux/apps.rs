//! Linux app inventory using ps

use std::process::Command;

use anyhow::{Result, anyhow};

use crate::model::AppDescriptor;
use crate::platform::{finish_inventory, inventory_or_sentinel, listing_output, own_process_name};

const BLACKLIST: &[&str] = &[
    "systemd",
    "bash",
    "zsh",
    "fish",
    "dash",
    "sshd",
    "ssh-agent",
    "gpg-agent",
    "dbus-daemon",
    "dbus-broker",
    "pipewire",
    "pipewire-pulse",
    "wireplumber",
    "pulseaudio",
    "Xorg",
    "Xwayland",
    "gnome-shell",
    "gnome-session-binary",
    "plasmashell",
    "kwin_x11",
    "kwin_wayland",
    "xdg-desktop-portal",
    "xdg-document-portal",
    "xdg-permission-store",
    "at-spi-bus-launcher",
    "at-spi2-registryd",
    "gvfsd",
    "tmux",
    "screen",
    "ps",
    "setsid",
];

pub fn list_apps() -> Vec<AppDescriptor> {
    inventory_or_sentinel(collect())
}

fn collect() -> Result<Vec<AppDescriptor>> {
    let stdout = listing_output(Command::new("ps").args(["-x", "-o", "comm="]), "ps")?;
    let apps = parse_command_names(&stdout);
    if apps.is_empty() {
        return Err(anyhow!("ps returned no processes"));
    }
    let own = own_process_name();
    Ok(finish_inventory(apps, BLACKLIST, own.as_deref()))
}

pub fn parse_command_names(ps_output: &str) -> Vec<AppDescriptor> {
    ps_output
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        // Kernel threads and daemons show up bracketed or with a path-like tail.
        .filter(|name| !name.starts_with('[') && !name.contains('/'))
        .map(AppDescriptor::named)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_become_descriptors() {
        let out = "systemd\n  bash\nfirefox\n[kworker/0:1]\nslack\nfirefox\nsh\n\n";
        let apps = finish_inventory(parse_command_names(out), BLACKLIST, Some("focusguard"));
        assert_eq!(
            apps,
            vec![AppDescriptor::named("firefox"), AppDescriptor::named("slack")]
        );
    }
}
