//! Action catalog, requests and results

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Collaborator an action depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Pure computation or session state only
    Builtin,
    /// OS integration (volume, windows, processes, browser)
    Desktop,
    /// Notes and to-do files
    Storage,
    /// Workspace file system
    Files,
    /// Background task registry
    Scheduler,
    /// Weather provider
    Weather,
    /// Encyclopedia provider
    Encyclopedia,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Builtin => "builtin",
            Self::Desktop => "desktop",
            Self::Storage => "storage",
            Self::Files => "files",
            Self::Scheduler => "scheduler",
            Self::Weather => "weather",
            Self::Encyclopedia => "encyclopedia",
        };
        f.write_str(name)
    }
}

/// Every action the assistant can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Exit,
    Greet,
    CancelTimers,
    ListTimers,
    SetReminder,
    SetTimer,
    TellTime,
    Volume,
    Screenshot,
    LockScreen,
    SystemInfo,
    WifiProfiles,
    Calculate,
    ConvertUnits,
    ReadNotes,
    SaveNote,
    CreateFolder,
    SearchFiles,
    CreateFile,
    MinimizeWindows,
    SwitchWindow,
    CloseApp,
    OpenWebsite,
    WebSearch,
    Weather,
    Encyclopedia,
    GeneratePassword,
    SecurityCheck,
    PrivacyMode,
    AddTodo,
    ReadTodo,
    OpenApp,
    Help,
}

impl ActionName {
    /// Stable snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Greet => "greet",
            Self::CancelTimers => "cancel_timers",
            Self::ListTimers => "list_timers",
            Self::SetReminder => "set_reminder",
            Self::SetTimer => "set_timer",
            Self::TellTime => "tell_time",
            Self::Volume => "volume",
            Self::Screenshot => "screenshot",
            Self::LockScreen => "lock_screen",
            Self::SystemInfo => "system_info",
            Self::WifiProfiles => "wifi_profiles",
            Self::Calculate => "calculate",
            Self::ConvertUnits => "convert_units",
            Self::ReadNotes => "read_notes",
            Self::SaveNote => "save_note",
            Self::CreateFolder => "create_folder",
            Self::SearchFiles => "search_files",
            Self::CreateFile => "create_file",
            Self::MinimizeWindows => "minimize_windows",
            Self::SwitchWindow => "switch_window",
            Self::CloseApp => "close_app",
            Self::OpenWebsite => "open_website",
            Self::WebSearch => "web_search",
            Self::Weather => "weather",
            Self::Encyclopedia => "encyclopedia",
            Self::GeneratePassword => "generate_password",
            Self::SecurityCheck => "security_check",
            Self::PrivacyMode => "privacy_mode",
            Self::AddTodo => "add_todo",
            Self::ReadTodo => "read_todo",
            Self::OpenApp => "open_app",
            Self::Help => "help",
        }
    }

    /// Collaborator this action calls
    #[must_use]
    pub const fn capability(self) -> Capability {
        match self {
            Self::Exit
            | Self::Greet
            | Self::TellTime
            | Self::Calculate
            | Self::ConvertUnits
            | Self::GeneratePassword
            | Self::PrivacyMode
            | Self::Help => Capability::Builtin,
            Self::CancelTimers | Self::ListTimers | Self::SetReminder | Self::SetTimer => {
                Capability::Scheduler
            }
            Self::Volume
            | Self::Screenshot
            | Self::LockScreen
            | Self::SystemInfo
            | Self::WifiProfiles
            | Self::MinimizeWindows
            | Self::SwitchWindow
            | Self::CloseApp
            | Self::OpenWebsite
            | Self::WebSearch
            | Self::SecurityCheck
            | Self::OpenApp => Capability::Desktop,
            Self::ReadNotes | Self::SaveNote | Self::AddTodo | Self::ReadTodo => {
                Capability::Storage
            }
            Self::CreateFolder | Self::SearchFiles | Self::CreateFile => Capability::Files,
            Self::Weather => Capability::Weather,
            Self::Encyclopedia => Capability::Encyclopedia,
        }
    }

    /// Whether the action changes [`crate::SessionState`]
    #[must_use]
    pub const fn mutates_session(self) -> bool {
        matches!(self, Self::Exit | Self::PrivacyMode)
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed argument extracted by a rule binder
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Duration(Duration),
    Flag(bool),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Duration(d) => write!(f, "{}s", d.as_secs()),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Named arguments for an action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(HashMap<&'static str, ArgValue>);

impl Args {
    /// Insert an argument
    pub fn insert(&mut self, key: &'static str, value: ArgValue) {
        self.0.insert(key, value);
    }

    /// Text argument
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ArgValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer argument
    #[must_use]
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(ArgValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Number argument (integers widen)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(ArgValue::Number(n)) => Some(*n),
            Some(ArgValue::Integer(n)) => Some(*n as f64),
            _ => None,
        }
    }

    /// Duration argument
    #[must_use]
    pub fn duration(&self, key: &str) -> Option<Duration> {
        match self.0.get(key) {
            Some(ArgValue::Duration(d)) => Some(*d),
            _ => None,
        }
    }

    /// Flag argument
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(ArgValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// Number of arguments
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arguments sorted by key
    #[must_use]
    pub fn sorted(&self) -> Vec<(&'static str, &ArgValue)> {
        let mut pairs: Vec<_> = self.0.iter().map(|(k, v)| (*k, v)).collect();
        pairs.sort_by_key(|(k, _)| *k);
        pairs
    }
}

/// A resolved action with its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub action: ActionName,
    pub args: Args,
}

impl ActionRequest {
    /// Request with no arguments
    #[must_use]
    pub fn new(action: ActionName) -> Self {
        Self {
            action,
            args: Args::default(),
        }
    }

    /// Add a text argument
    #[must_use]
    pub fn text(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.args.insert(key, ArgValue::Text(value.into()));
        self
    }

    /// Add a text argument when present and non-empty
    #[must_use]
    pub fn maybe_text(self, key: &'static str, value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.text(key, v),
            _ => self,
        }
    }

    /// Add an integer argument
    #[must_use]
    pub fn integer(mut self, key: &'static str, value: i64) -> Self {
        self.args.insert(key, ArgValue::Integer(value));
        self
    }

    /// Add a number argument
    #[must_use]
    pub fn number(mut self, key: &'static str, value: f64) -> Self {
        self.args.insert(key, ArgValue::Number(value));
        self
    }

    /// Add a duration argument
    #[must_use]
    pub fn duration(mut self, key: &'static str, value: Duration) -> Self {
        self.args.insert(key, ArgValue::Duration(value));
        self
    }

    /// Add a flag argument
    #[must_use]
    pub fn flag(mut self, key: &'static str, value: bool) -> Self {
        self.args.insert(key, ArgValue::Flag(value));
        self
    }
}

/// Why an action did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The collaborator is missing or not configured; the message says so
    Unavailable(String),
    /// The collaborator failed; the user hears a generic apology
    Failed,
    /// The request could not be interpreted; the message tells the user how
    Invalid(String),
    /// The target does not exist
    NotFound(String),
}

/// Outcome of executing an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Success(String),
    Failure(FailureReason),
}

impl ActionResult {
    /// Successful result
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success(text.into())
    }

    /// Invalid-input failure with a user-facing hint
    #[must_use]
    pub fn invalid(text: impl Into<String>) -> Self {
        Self::Failure(FailureReason::Invalid(text.into()))
    }

    /// Not-found failure with a user-facing message
    #[must_use]
    pub fn not_found(text: impl Into<String>) -> Self {
        Self::Failure(FailureReason::NotFound(text.into()))
    }

    /// Unavailable failure with a user-facing message
    #[must_use]
    pub fn unavailable(text: impl Into<String>) -> Self {
        Self::Failure(FailureReason::Unavailable(text.into()))
    }

    /// Generic failure
    #[must_use]
    pub const fn failed() -> Self {
        Self::Failure(FailureReason::Failed)
    }

    /// Whether the action succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Text to render for this result
    #[must_use]
    pub fn into_phrase(self) -> String {
        match self {
            Self::Success(text)
            | Self::Failure(
                FailureReason::Unavailable(text)
                | FailureReason::Invalid(text)
                | FailureReason::NotFound(text),
            ) => text,
            Self::Failure(FailureReason::Failed) => {
                super::phrases::pick(super::phrases::ERRORS).to_string()
            }
        }
    }
}
