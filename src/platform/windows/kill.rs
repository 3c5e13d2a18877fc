//! Windows process termination using taskkill

use crate::model::KillOutcome;
use crate::utils::hidden_command;

// taskkill exits with 128 when no process matches the image name.
const EXIT_NOT_FOUND: i32 = 128;

/// Ask every process with image name `image` to close. No `/F`: a single
/// close request, the app decides how to exit.
pub fn terminate_image(image: &str) -> KillOutcome {
    let output = match hidden_command("taskkill").args(["/IM", image]).output() {
        Ok(out) => out,
        Err(err) => return KillOutcome::Failed(format!("failed to execute taskkill: {}", err)),
    };

    if output.status.success() {
        return KillOutcome::Success;
    }
    let outcome = classify_failure(
        output.status.code(),
        &String::from_utf8_lossy(&output.stderr),
    );
    log::debug!("taskkill /IM {} -> {:?}", image, outcome);
    outcome
}

pub fn classify_failure(code: Option<i32>, stderr: &str) -> KillOutcome {
    let lower = stderr.to_lowercase();
    if code == Some(EXIT_NOT_FOUND) || lower.contains("not found") {
        KillOutcome::NotFound
    } else if lower.contains("access is denied") {
        KillOutcome::PermissionDenied
    } else {
        KillOutcome::Failed(stderr.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_taskkill_errors() {
        assert_eq!(
            classify_failure(Some(128), "ERROR: The process \"slack.exe\" not found."),
            KillOutcome::NotFound
        );
        assert_eq!(
            classify_failure(Some(1), "ERROR: The process with PID 42 could not be terminated.\nReason: Access is denied."),
            KillOutcome::PermissionDenied
        );
        assert_eq!(
            classify_failure(Some(1), "ERROR: The process with PID 42 could not be terminated.\nReason: This process can only be terminated forcefully (with /F option).\n"),
            KillOutcome::Failed(
                "ERROR: The process with PID 42 could not be terminated.\nReason: This process can only be terminated forcefully (with /F option).".to_string()
            )
        );
    }
}
