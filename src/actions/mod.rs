//! Action catalog and execution
//!
//! [`execute`] runs one [`ActionRequest`] against the collaborators in an
//! [`ActionContext`]. Collaborator faults never escape: each one becomes an
//! [`ActionResult::Failure`] whose phrase is safe to render.

mod control;
mod files;
mod info;
pub mod phrases;
mod productivity;
mod request;
mod system;

use std::collections::HashMap;
use std::sync::Arc;

pub use request::{
    ActionName, ActionRequest, ActionResult, ArgValue, Args, Capability, FailureReason,
};

use crate::scheduler::TaskRegistry;
use crate::tools::{Desktop, Encyclopedia, FileManager, NotesFile, TodoList, WeatherProvider};
use crate::voice::Screen;
use crate::{Error, SessionState};

/// Collaborators available to actions
#[derive(Clone)]
pub struct ActionContext {
    pub state: Arc<SessionState>,
    pub desktop: Arc<dyn Desktop>,
    /// `None` when no weather API key is configured
    pub weather: Option<Arc<dyn WeatherProvider>>,
    pub encyclopedia: Arc<dyn Encyclopedia>,
    pub notes: NotesFile,
    pub todo: TodoList,
    pub files: FileManager,
    pub scheduler: TaskRegistry,
    /// On-screen details that are not spoken
    pub screen: Arc<dyn Screen>,
    /// Extra spoken-name to command aliases for `open_app`
    pub apps: HashMap<String, String>,
}

/// Execute an action
pub async fn execute(request: ActionRequest, ctx: &ActionContext) -> ActionResult {
    let ActionRequest { action, args } = request;
    tracing::debug!(%action, capability = %action.capability(), args = args.len(), "executing action");

    let result = match action {
        ActionName::Exit => control::exit(ctx),
        ActionName::Greet => control::greet(),
        ActionName::PrivacyMode => control::privacy_mode(&args, ctx),
        ActionName::Help => control::help(ctx),

        ActionName::CancelTimers => productivity::cancel_timers(&args, ctx),
        ActionName::ListTimers => productivity::list_timers(ctx),
        ActionName::SetReminder => productivity::set_reminder(&args, ctx),
        ActionName::SetTimer => productivity::set_timer(&args, ctx),
        ActionName::TellTime => productivity::tell_time(),
        ActionName::Calculate => productivity::calculate(&args),
        ActionName::ConvertUnits => productivity::convert_units(&args),
        ActionName::ReadNotes => productivity::read_notes(ctx),
        ActionName::SaveNote => productivity::save_note(&args, ctx),
        ActionName::GeneratePassword => productivity::generate_password(&args, ctx),
        ActionName::AddTodo => productivity::add_todo(&args, ctx),
        ActionName::ReadTodo => productivity::read_todo(ctx),

        ActionName::CreateFolder => files::create_folder(&args, ctx),
        ActionName::SearchFiles => files::search_files(&args, ctx),
        ActionName::CreateFile => files::create_file(&args, ctx),

        ActionName::Volume => system::volume(&args, ctx).await,
        ActionName::Screenshot => system::screenshot(ctx).await,
        ActionName::LockScreen => system::lock_screen(ctx).await,
        ActionName::SystemInfo => system::system_info(ctx).await,
        ActionName::WifiProfiles => system::wifi_profiles(ctx).await,
        ActionName::MinimizeWindows => system::minimize_windows(ctx).await,
        ActionName::SwitchWindow => system::switch_window(&args, ctx).await,
        ActionName::CloseApp => system::close_app(&args, ctx).await,
        ActionName::OpenWebsite => system::open_website(&args, ctx).await,
        ActionName::WebSearch => system::web_search(&args, ctx).await,
        ActionName::SecurityCheck => system::security_check(ctx).await,
        ActionName::OpenApp => system::open_app(&args, ctx).await,

        ActionName::Weather => info::weather(&args, ctx).await,
        ActionName::Encyclopedia => info::encyclopedia(&args, ctx).await,
    };

    if let ActionResult::Failure(reason) = &result {
        tracing::debug!(%action, ?reason, "action did not succeed");
    }
    result
}

/// Convert a collaborator error into a user-facing failure
fn collaborator_failure(action: ActionName, error: &Error) -> ActionResult {
    match error {
        Error::Unavailable(what) => {
            tracing::info!(%action, reason = %what, "collaborator unavailable");
            ActionResult::unavailable(format!("Sorry, {what}."))
        }
        Error::InvalidInput(what) => ActionResult::invalid(format!("I can't do that: {what}.")),
        other => {
            tracing::warn!(%action, error = %other, "action failed");
            ActionResult::failed()
        }
    }
}

/// Join spoken items as "a, b and c"
fn spoken_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// Numbered items as "1: a. 2: b."
fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}: {item}.", i + 1))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_list() {
        assert_eq!(spoken_list(&[]), "");
        assert_eq!(spoken_list(&["a".to_string()]), "a");
        assert_eq!(
            spoken_list(&["a".to_string(), "b".to_string(), "c".to_string()]),
            "a, b and c"
        );
    }

    #[test]
    fn test_numbered() {
        assert_eq!(
            numbered(&["milk".to_string(), "eggs".to_string()]),
            "1: milk. 2: eggs."
        );
    }

    #[test]
    fn test_unavailable_keeps_reason() {
        let result = collaborator_failure(
            ActionName::Volume,
            &Error::Unavailable("volume control is not supported on this system".to_string()),
        );
        assert_eq!(
            result,
            ActionResult::unavailable("Sorry, volume control is not supported on this system.")
        );
    }

    #[test]
    fn test_other_errors_are_generic() {
        let result = collaborator_failure(ActionName::Screenshot, &Error::Audio("x".to_string()));
        assert_eq!(result, ActionResult::failed());
    }
}
