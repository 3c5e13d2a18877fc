//! Windows toast notifications using PowerShell

use crate::utils::hidden_command;

const APP_ID: &str = "FocusGuard.App";

pub fn notify(title: &str, body: &str) {
    let script = toast_script(title, body);
    // Fire and forget; hidden to prevent console flicker.
    let _ = hidden_command("powershell")
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-WindowStyle",
            "Hidden",
            "-Command",
            &script,
        ])
        .spawn();
}

fn escape(s: &str) -> String {
    s.replace('\'', "''")
        .replace('`', "``")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn toast_script(title: &str, body: &str) -> String {
    let title = escape(title);
    let body = escape(body);
    format!(
        r#"
$ErrorActionPreference = 'SilentlyContinue'
if (Get-Module -ListAvailable -Name BurntToast) {{
    Import-Module BurntToast
    New-BurntToastNotification -Text '{title}', '{body}'
}} else {{
    [Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null
    [Windows.Data.Xml.Dom.XmlDocument, Windows.Data.Xml.Dom.XmlDocument, ContentType = WindowsRuntime] | Out-Null
    $template = @'
<toast>
    <visual>
        <binding template="ToastGeneric">
            <text>{title}</text>
            <text>{body}</text>
        </binding>
    </visual>
</toast>
'@
    $xml = New-Object Windows.Data.Xml.Dom.XmlDocument
    $xml.LoadXml($template)
    $toast = [Windows.UI.Notifications.ToastNotification]::new($xml)
    [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{app_id}').Show($toast)
}}
"#,
        title = title,
        body = body,
        app_id = APP_ID,
    )
}
