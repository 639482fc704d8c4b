//! Session control: exit, greeting, privacy mode and help

use super::phrases::{self, GOODBYES, GREETINGS};
use super::{ActionContext, ActionResult, Args};

const SPOKEN_HELP: &str = "I can help you with system control like volume and screenshots, \
    productivity tools like calculator and timer, file management, web search, \
    opening applications, and much more. Check your screen for detailed examples.";

const HELP_TEXT: &str = "\
Here are some things I can help you with:

System Control:
  • \"Set volume to 50\" - Control system volume
  • \"Take a screenshot\" - Capture your screen
  • \"Lock screen\" - Lock your computer
  • \"System info\" - Get system performance data

Productivity:
  • \"Calculate 25 times 4\" - Math calculations
  • \"Convert 100 pounds to kilograms\" - Unit conversions
  • \"Set timer for 5 minutes\" - Background timers
  • \"Remind me in 10 minutes to stretch\" - Reminders
  • \"Note remember to call mom\" - Quick notes
  • \"Add milk to my to do list\" - To-do list

File Management:
  • \"Create folder Projects\" - Make new folders
  • \"Search for file report\" - Find files
  • \"Create file test.txt\" - Make new files

Web & Information:
  • \"Search Google for Rust tutorials\" - Web search
  • \"What is machine learning\" - Wikipedia search
  • \"Weather in New York\" - Weather information

Windows Control:
  • \"Minimize all windows\" - Window management
  • \"Switch to Firefox\" - Application switching
  • \"Close application gedit\" - Close programs

Security:
  • \"Generate password 16\" - Secure passwords
  • \"Security check\" - System monitoring
  • \"Privacy mode on\" - Toggle privacy mode

Say \"stop\" or \"goodbye\" to exit.";

pub(super) fn exit(ctx: &ActionContext) -> ActionResult {
    ctx.state.stop_listening();
    ActionResult::success(phrases::pick(GOODBYES))
}

pub(super) fn greet() -> ActionResult {
    ActionResult::success(phrases::pick(GREETINGS))
}

pub(super) fn privacy_mode(args: &Args, ctx: &ActionContext) -> ActionResult {
    match args.flag("enabled") {
        Some(true) => {
            ctx.state.set_privacy_mode(true);
            ActionResult::success("Privacy mode enabled. I'll use text input only.")
        }
        Some(false) => {
            ctx.state.set_privacy_mode(false);
            ActionResult::success("Privacy mode disabled. Voice interaction restored.")
        }
        None => {
            let enabled = ctx.state.toggle_privacy_mode();
            let status = if enabled { "enabled" } else { "disabled" };
            ActionResult::success(format!("Privacy mode {status}."))
        }
    }
}

pub(super) fn help(ctx: &ActionContext) -> ActionResult {
    ctx.screen.show(HELP_TEXT);
    ActionResult::success(SPOKEN_HELP)
}
