//! macOS app inventory using ps

use std::process::Command;

use anyhow::{Result, anyhow};

use crate::model::AppDescriptor;
use crate::platform::{finish_inventory, inventory_or_sentinel, listing_output, own_process_name};

const BUNDLE_MARKER: &str = ".app/Contents/MacOS/";

// Bundles that live here are system agents, not things a user opened.
const SYSTEM_PREFIXES: &[&str] = &["/System/Library/", "/Library/", "/usr/"];

const BLACKLIST: &[&str] = &[
    "Finder",
    "Dock",
    "SystemUIServer",
    "ControlCenter",
    "NotificationCenter",
    "loginwindow",
    "WindowManager",
    "Spotlight",
    "TextInputMenuAgent",
    "CoreServicesUIAgent",
    "AirPlayUIAgent",
    "universalAccessAuthWarn",
];

pub fn list_apps() -> Vec<AppDescriptor> {
    inventory_or_sentinel(collect())
}

fn collect() -> Result<Vec<AppDescriptor>> {
    let stdout = listing_output(Command::new("ps").args(["-axo", "comm="]), "ps")?;
    if stdout.trim().is_empty() {
        return Err(anyhow!("ps returned no processes"));
    }
    let own = own_process_name();
    Ok(finish_inventory(
        parse_bundle_apps(&stdout),
        BLACKLIST,
        own.as_deref(),
    ))
}

/// Keep executables that sit directly in a top-level `.app` bundle.
///
/// `/Applications/Slack.app/Contents/MacOS/Slack` becomes
/// `{id: "Slack", display: "Slack", detail: "/Applications/Slack.app"}`;
/// helpers nested inside another bundle are skipped.
pub fn parse_bundle_apps(ps_output: &str) -> Vec<AppDescriptor> {
    let mut apps = Vec::new();
    for line in ps_output.lines() {
        let path = line.trim();
        let Some(idx) = path.find(BUNDLE_MARKER) else {
            continue;
        };
        if SYSTEM_PREFIXES.iter().any(|p| path.starts_with(p)) {
            continue;
        }

        let bundle_path = &path[..idx + ".app".len()];
        let parent = &bundle_path[..bundle_path.rfind('/').unwrap_or(0)];
        if parent.contains(".app/") || parent.ends_with(".app") {
            continue;
        }

        let exe = &path[idx + BUNDLE_MARKER.len()..];
        if exe.is_empty() || exe.contains('/') {
            continue;
        }

        let bundle_name = bundle_path
            .rsplit('/')
            .next()
            .unwrap_or(bundle_path)
            .trim_end_matches(".app");
        if bundle_name.is_empty() {
            continue;
        }

        apps.push(AppDescriptor::new(exe, bundle_name, bundle_path));
    }
    apps
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS_SAMPLE: &str = "\
/sbin/launchd
/usr/libexec/logd
/System/Library/CoreServices/Dock.app/Contents/MacOS/Dock
/System/Library/CoreServices/Finder.app/Contents/MacOS/Finder
/Applications/Slack.app/Contents/MacOS/Slack
/Applications/Slack.app/Contents/Frameworks/Slack Helper (Renderer).app/Contents/MacOS/Slack Helper (Renderer)
/Applications/Visual Studio Code.app/Contents/MacOS/Electron
/System/Applications/Music.app/Contents/MacOS/Music
/Applications/Slack.app/Contents/MacOS/Slack
";

    #[test]
    fn keeps_only_top_level_bundles() {
        let apps = parse_bundle_apps(PS_SAMPLE);
        assert_eq!(
            apps,
            vec![
                AppDescriptor::new("Slack", "Slack", "/Applications/Slack.app"),
                AppDescriptor::new(
                    "Electron",
                    "Visual Studio Code",
                    "/Applications/Visual Studio Code.app"
                ),
                AppDescriptor::new("Music", "Music", "/System/Applications/Music.app"),
                AppDescriptor::new("Slack", "Slack", "/Applications/Slack.app"),
            ]
        );
    }

    #[test]
    fn inventory_is_sorted_and_unique() {
        let apps = finish_inventory(parse_bundle_apps(PS_SAMPLE), BLACKLIST, None);
        let labels: Vec<&str> = apps.iter().map(|a| a.display.as_str()).collect();
        assert_eq!(labels, vec!["Music", "Slack", "Visual Studio Code"]);
    }
}
