//! Desktop actions: volume, screen, windows, processes and the browser

use super::phrases;
use super::{ActionContext, ActionName, ActionResult, Args, collaborator_failure, spoken_list};
use crate::Error;
use crate::tools::web::sites;

/// CPU share above which a process is reported by the security check
const BUSY_CPU_PERCENT: f32 = 80.0;

/// WiFi profiles read aloud
const SPOKEN_PROFILES: usize = 3;

pub(super) async fn volume(args: &Args, ctx: &ActionContext) -> ActionResult {
    const ACTION: ActionName = ActionName::Volume;

    match args.text("mode") {
        Some("mute") => match ctx.desktop.set_mute(Some(true)).await {
            Ok(_) => ActionResult::success(phrases::confirm("Volume muted.")),
            Err(e) => collaborator_failure(ACTION, &e),
        },
        Some("unmute") => match ctx.desktop.set_mute(Some(false)).await {
            Ok(_) => ActionResult::success(phrases::confirm("Volume unmuted.")),
            Err(e) => collaborator_failure(ACTION, &e),
        },
        Some("query") => match ctx.desktop.volume().await {
            Ok(level) => ActionResult::success(format!("The current volume is {level} percent.")),
            Err(e @ Error::Unavailable(_)) => collaborator_failure(ACTION, &e),
            Err(e) => {
                tracing::warn!(error = %e, "volume query failed");
                ActionResult::unavailable("I couldn't check the volume level.")
            }
        },
        _ => {
            let Some(level) = args.integer("level") else {
                return ActionResult::invalid(
                    "Please specify a volume level, for example: volume 50 or set volume to 75.",
                );
            };
            let Some(level) = u8::try_from(level).ok().filter(|l| *l <= 100) else {
                return ActionResult::invalid("Please specify a volume between 0 and 100.");
            };

            match ctx.desktop.set_volume(level).await {
                Ok(()) => ActionResult::success(phrases::confirm(&format!(
                    "Volume set to {level} percent."
                ))),
                Err(e) => collaborator_failure(ACTION, &e),
            }
        }
    }
}

pub(super) async fn screenshot(ctx: &ActionContext) -> ActionResult {
    match ctx.desktop.screenshot(ctx.files.root()).await {
        Ok(path) => {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            ActionResult::success(phrases::complete(&format!("Screenshot saved as {name}.")))
        }
        Err(e) => collaborator_failure(ActionName::Screenshot, &e),
    }
}

pub(super) async fn lock_screen(ctx: &ActionContext) -> ActionResult {
    match ctx.desktop.lock_screen().await {
        Ok(()) => ActionResult::success(phrases::confirm("Locking the screen now.")),
        Err(e) => collaborator_failure(ActionName::LockScreen, &e),
    }
}

pub(super) async fn system_info(ctx: &ActionContext) -> ActionResult {
    let info = match ctx.desktop.system_info().await {
        Ok(info) => info,
        Err(e) => return collaborator_failure(ActionName::SystemInfo, &e),
    };

    let mut parts = vec![
        format!("CPU usage is at {:.0} percent", info.cpu_percent),
        format!("memory usage is at {:.0} percent", info.memory_percent),
    ];
    if let Some(battery) = info.battery_percent {
        parts.push(format!("battery is at {battery} percent"));
    }
    if let Some(disk) = info.disk_percent {
        parts.push(format!("disk usage is at {disk:.0} percent"));
    }

    ActionResult::success(format!(
        "Here's your system status: {}.",
        spoken_list(&parts)
    ))
}

pub(super) async fn wifi_profiles(ctx: &ActionContext) -> ActionResult {
    match ctx.desktop.wifi_profiles().await {
        Ok(profiles) if profiles.is_empty() => {
            ActionResult::not_found("I couldn't find any WiFi profiles.")
        }
        Ok(profiles) => {
            let spoken: Vec<String> = profiles.iter().take(SPOKEN_PROFILES).cloned().collect();
            ActionResult::success(format!(
                "I found {} WiFi profiles: {}.",
                profiles.len(),
                spoken.join(", ")
            ))
        }
        Err(e) => collaborator_failure(ActionName::WifiProfiles, &e),
    }
}

pub(super) async fn minimize_windows(ctx: &ActionContext) -> ActionResult {
    match ctx.desktop.minimize_windows().await {
        Ok(()) => ActionResult::success(phrases::complete("All windows minimized.")),
        Err(e) => collaborator_failure(ActionName::MinimizeWindows, &e),
    }
}

pub(super) async fn switch_window(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(app) = args.text("app") else {
        return ActionResult::invalid("Which window should I switch to?");
    };

    match ctx.desktop.switch_window(app).await {
        Ok(true) => ActionResult::success(phrases::confirm(&format!("Switched to {app}."))),
        Ok(false) => ActionResult::not_found(format!("I couldn't find {app}.")),
        Err(e) => collaborator_failure(ActionName::SwitchWindow, &e),
    }
}

pub(super) async fn close_app(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(app) = args.text("app") else {
        return ActionResult::invalid("Which application should I close?");
    };

    match ctx.desktop.close_app(app).await {
        Ok(true) => ActionResult::success(phrases::complete(&format!("{app} closed."))),
        Ok(false) => ActionResult::not_found(format!("I couldn't close {app}.")),
        Err(e) => collaborator_failure(ActionName::CloseApp, &e),
    }
}

pub(super) async fn open_website(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(site) = args.text("site") else {
        return ActionResult::invalid("Which website should I open?");
    };

    let (url, reply) = match sites::known_website(site) {
        Some(url) => (url.to_string(), format!("Opening {site}.")),
        None => (sites::guess_website(site), format!("Opening {site} website.")),
    };

    match ctx.desktop.open_url(&url).await {
        Ok(()) => {
            tracing::info!(url, "opened website");
            ActionResult::success(phrases::confirm(&reply))
        }
        Err(e) => collaborator_failure(ActionName::OpenWebsite, &e),
    }
}

pub(super) async fn web_search(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(query) = args.text("query") else {
        return ActionResult::invalid("What should I search for?");
    };

    match ctx.desktop.open_url(&sites::search_url(query)).await {
        Ok(()) => ActionResult::success(phrases::confirm(&format!("Searching Google for {query}."))),
        Err(e) => collaborator_failure(ActionName::WebSearch, &e),
    }
}

pub(super) async fn security_check(ctx: &ActionContext) -> ActionResult {
    match ctx.desktop.busy_processes(BUSY_CPU_PERCENT).await {
        Ok(busy) if busy.is_empty() => {
            ActionResult::success("Your system appears to be running normally.")
        }
        Ok(busy) => {
            for process in &busy {
                ctx.screen.show(&format!("  high CPU: {process}"));
            }
            let noun = if busy.len() == 1 { "process" } else { "processes" };
            ActionResult::success(format!("I found {} {noun} using high CPU.", busy.len()))
        }
        Err(e) => collaborator_failure(ActionName::SecurityCheck, &e),
    }
}

pub(super) async fn open_app(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(app) = args.text("app") else {
        return ActionResult::invalid("Which application should I open?");
    };

    let command = sites::app_command(app, &ctx.apps);
    match ctx.desktop.launch(&command).await {
        Ok(()) => {
            tracing::info!(app, command, "launched application");
            ActionResult::success(phrases::confirm(&format!("Opening {app}.")))
        }
        Err(Error::NotFound(_)) => {
            ActionResult::not_found(format!("I couldn't open {app}. It might not be installed."))
        }
        Err(e) => collaborator_failure(ActionName::OpenApp, &e),
    }
}
