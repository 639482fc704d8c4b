//! Spoken website and application names

use std::collections::HashMap;

/// Websites people name by voice
const WEBSITES: &[(&str, &str)] = &[
    ("chat gpt", "https://chat.openai.com"),
    ("chatgpt", "https://chat.openai.com"),
    ("open ai", "https://openai.com"),
    ("openai", "https://openai.com"),
    ("you tube", "https://www.youtube.com"),
    ("youtube", "https://www.youtube.com"),
    ("face book", "https://www.facebook.com"),
    ("facebook", "https://www.facebook.com"),
    ("linked in", "https://www.linkedin.com"),
    ("linkedin", "https://www.linkedin.com"),
    ("git hub", "https://github.com"),
    ("github", "https://github.com"),
    ("stack overflow", "https://stackoverflow.com"),
    ("google", "https://www.google.com"),
    ("gmail", "https://mail.google.com"),
    ("google mail", "https://mail.google.com"),
    ("google drive", "https://drive.google.com"),
    ("google docs", "https://docs.google.com"),
    ("whats app", "https://web.whatsapp.com"),
    ("whatsapp", "https://web.whatsapp.com"),
    ("twitter", "https://twitter.com"),
    ("x", "https://x.com"),
    ("instagram", "https://www.instagram.com"),
    ("reddit", "https://www.reddit.com"),
    ("amazon", "https://www.amazon.com"),
    ("netflix", "https://www.netflix.com"),
    ("spotify", "https://open.spotify.com"),
    ("twitch", "https://www.twitch.tv"),
    ("discord", "https://discord.com/app"),
    ("microsoft teams", "https://teams.microsoft.com"),
    ("teams", "https://teams.microsoft.com"),
    ("zoom", "https://zoom.us"),
    ("slack", "https://slack.com"),
    ("notion", "https://www.notion.so"),
    ("wikipedia", "https://www.wikipedia.org"),
    ("wiki", "https://www.wikipedia.org"),
];

/// Spoken application names mapped to launch commands
const APPS: &[(&str, &str)] = &[
    ("notepad", "gedit"),
    ("text editor", "gedit"),
    ("calculator", "gnome-calculator"),
    ("paint", "gimp"),
    ("word", "libreoffice --writer"),
    ("microsoft word", "libreoffice --writer"),
    ("excel", "libreoffice --calc"),
    ("microsoft excel", "libreoffice --calc"),
    ("powerpoint", "libreoffice --impress"),
    ("microsoft powerpoint", "libreoffice --impress"),
    ("chrome", "google-chrome"),
    ("google chrome", "google-chrome"),
    ("firefox", "firefox"),
    ("edge", "microsoft-edge"),
    ("microsoft edge", "microsoft-edge"),
    ("file explorer", "nautilus"),
    ("explorer", "nautilus"),
    ("files", "nautilus"),
    ("terminal", "x-terminal-emulator"),
    ("command prompt", "x-terminal-emulator"),
    ("task manager", "gnome-system-monitor"),
    ("system monitor", "gnome-system-monitor"),
    ("settings", "gnome-control-center"),
    ("control panel", "gnome-control-center"),
    ("vs code", "code"),
    ("visual studio code", "code"),
];

/// URL for a well-known site name
#[must_use]
pub fn known_website(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    WEBSITES
        .iter()
        .find(|(spoken, _)| *spoken == name)
        .map(|(_, url)| *url)
}

/// Best-effort URL for an unknown site name
#[must_use]
pub fn guess_website(name: &str) -> String {
    let host: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if host.contains('.') {
        format!("https://{host}")
    } else {
        format!("https://www.{host}.com")
    }
}

/// Google search URL for a query
#[must_use]
pub fn search_url(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(query.trim())
    )
}

/// Launch command for a spoken application name
///
/// Configured aliases win over built-ins; an unknown name is used as the
/// command itself with spaces removed.
#[must_use]
pub fn app_command(name: &str, configured: &HashMap<String, String>) -> String {
    let name = name.trim().to_lowercase();
    if let Some(command) = configured.get(&name) {
        return command.clone();
    }
    APPS.iter()
        .find(|(spoken, _)| *spoken == name)
        .map_or_else(|| name.replace(' ', ""), |(_, command)| (*command).to_string())
}
