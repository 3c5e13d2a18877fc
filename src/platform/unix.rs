//! Name-based SIGTERM delivery shared by macOS and Linux.

use std::process::Command;

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::model::KillOutcome;

/// Send a single SIGTERM to every process whose executable name is `name`.
pub fn terminate_by_name(name: &str) -> KillOutcome {
    let output = match Command::new("ps").args(["-A", "-o", "pid=", "-o", "comm="]).output() {
        Ok(out) if out.status.success() => out,
        Ok(out) => {
            return KillOutcome::Failed(format!(
                "ps failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            ));
        }
        Err(err) => return KillOutcome::Failed(format!("failed to execute ps: {}", err)),
    };

    let own_pid = std::process::id() as i32;
    let pids = pids_matching(&String::from_utf8_lossy(&output.stdout), name, own_pid);
    if pids.is_empty() {
        return KillOutcome::NotFound;
    }

    let mut delivered = false;
    let mut perm_denied = false;
    let mut last_err: Option<Errno> = None;

    for pid in pids {
        log::debug!("SIGTERM -> {} (PID {})", name, pid);
        match kill(Pid::from_raw(pid), Signal::SIGTERM) {
            Ok(()) => delivered = true,
            Err(Errno::ESRCH) => {}
            Err(Errno::EPERM) => perm_denied = true,
            Err(err) => last_err = Some(err),
        }
    }

    if delivered {
        KillOutcome::Success
    } else if perm_denied {
        KillOutcome::PermissionDenied
    } else if let Some(err) = last_err {
        KillOutcome::Failed(err.desc().to_string())
    } else {
        KillOutcome::NotFound
    }
}

// Lines look like "  412 /Applications/Slack.app/Contents/MacOS/Slack" on
// macOS and "  412 slack" on Linux; the basename of the command is compared.
pub(crate) fn pids_matching(ps_output: &str, name: &str, exclude: i32) -> Vec<i32> {
    ps_output
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let (pid, comm) = line.split_once(char::is_whitespace)?;
            let pid = pid.parse::<i32>().ok()?;
            let base = comm.trim().rsplit('/').next()?;
            (base == name && pid != exclude).then_some(pid)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::pids_matching;

    #[test]
    fn matches_basename_of_full_path() {
        let out = "    1 /sbin/launchd\n  412 /Applications/Slack.app/Contents/MacOS/Slack\n  413 /Applications/Slack.app/Contents/Frameworks/Slack Helper.app/Contents/MacOS/Slack Helper\n";
        assert_eq!(pids_matching(out, "Slack", 0), vec![412]);
        assert_eq!(pids_matching(out, "Slack Helper", 0), vec![413]);
    }

    #[test]
    fn matches_short_names_and_skips_self() {
        let out = "  100 firefox\n  101 firefox\n  102 bash\n garbage\n";
        assert_eq!(pids_matching(out, "firefox", 101), vec![100]);
        assert!(pids_matching(out, "slack", 0).is_empty());
    }
}
