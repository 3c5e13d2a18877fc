//! Windows app inventory using PowerShell Get-Process

use anyhow::{Result, anyhow};

use crate::model::AppDescriptor;
use crate::platform::{finish_inventory, inventory_or_sentinel, listing_output, own_process_name};
use crate::utils::hidden_command;

// Processes that own a top-level window, with their image path.
const LIST_SCRIPT: &str = "Get-Process | Where-Object { $_.MainWindowHandle -ne 0 } | \
Select-Object ProcessName,Path | ConvertTo-Csv -NoTypeInformation";

const BLACKLIST: &[&str] = &[
    "explorer",
    "dwm",
    "csrss",
    "winlogon",
    "ShellExperienceHost",
    "StartMenuExperienceHost",
    "SearchHost",
    "SearchApp",
    "TextInputHost",
    "ApplicationFrameHost",
    "SystemSettings",
    "LockApp",
    "RuntimeBroker",
    "taskmgr",
    "powershell",
    "conhost",
];

pub fn list_apps() -> Vec<AppDescriptor> {
    inventory_or_sentinel(collect())
}

fn collect() -> Result<Vec<AppDescriptor>> {
    let stdout = listing_output(
        hidden_command("powershell").args(["-NoProfile", "-NonInteractive", "-Command", LIST_SCRIPT]),
        "powershell Get-Process",
    )?;
    let own = own_process_name();
    Ok(finish_inventory(
        parse_process_csv(&stdout)?,
        BLACKLIST,
        own.as_deref(),
    ))
}

/// Parse `ConvertTo-Csv` output with a `ProcessName,Path` header.
///
/// The image path is the relaunch target and, with the image name, the
/// identity; a blank path falls back to the image name.
pub fn parse_process_csv(output: &str) -> Result<Vec<AppDescriptor>> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines
        .next()
        .ok_or_else(|| anyhow!("Get-Process returned no output"))?;
    let columns = parse_csv_line(header);
    let name_col = column_index(&columns, "ProcessName")?;
    let path_col = column_index(&columns, "Path")?;

    let mut apps = Vec::new();
    for line in lines {
        let fields = parse_csv_line(line);
        let Some(name) = fields.get(name_col).map(|s| s.trim()) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let image = format!("{}.exe", name);
        let detail = match fields.get(path_col).map(|s| s.trim()) {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => image.clone(),
        };
        apps.push(AppDescriptor::new(image, name, detail));
    }
    Ok(apps)
}

fn column_index(columns: &[String], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| anyhow!("unexpected Get-Process header: missing {}", name))
}

/// Split one CSV record. Quoted fields may contain commas and `""` escapes.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(ch),
        }
    }
    fields.push(field);
    fields
}
