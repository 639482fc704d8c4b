//! Timers, reminders, calculator, notes, to-do list and passwords

use chrono::Local;

use super::phrases;
use super::{ActionContext, ActionName, ActionResult, Args, collaborator_failure, numbered};
use crate::scheduler::{TaskHandle, TaskKind};
use crate::tools::{calc, password, units};

const RECENT_NOTES: usize = 5;
const SPOKEN_TASKS: usize = 5;
const NO_TIMERS: &str = "You don't have any timers or reminders running.";

pub(super) fn set_timer(args: &Args, ctx: &ActionContext) -> ActionResult {
    let (Some(delay), Some(label)) = (args.duration("delay"), args.text("label")) else {
        return ActionResult::invalid(
            "Please tell me how long, for example: set a timer for 5 minutes.",
        );
    };

    let handle = ctx.scheduler.schedule(delay, format!("Timer for {label} is up!"));
    tracing::debug!(task = %handle, "timer set");
    ActionResult::success(phrases::confirm(&format!("Timer set for {label}.")))
}

pub(super) fn set_reminder(args: &Args, ctx: &ActionContext) -> ActionResult {
    let (Some(delay), Some(label)) = (args.duration("delay"), args.text("label")) else {
        return ActionResult::invalid(
            "Please tell me when, for example: remind me in 10 minutes to stretch.",
        );
    };
    let Some(message) = args.text("message") else {
        return ActionResult::invalid("What should I remind you about?");
    };

    ctx.scheduler
        .schedule_reminder(delay, format!("Reminder: {message}"));
    ActionResult::success(phrases::confirm(&format!(
        "I'll remind you in {label} to {message}."
    )))
}

pub(super) fn cancel_timers(args: &Args, ctx: &ActionContext) -> ActionResult {
    if let Some(number) = args.integer("task") {
        let cancelled = u64::try_from(number)
            .map(TaskHandle::from)
            .is_ok_and(|handle| ctx.scheduler.cancel(handle));
        return if cancelled {
            ActionResult::success(phrases::complete(&format!("Cancelled number {number}.")))
        } else {
            ActionResult::not_found(format!("I couldn't find a timer or reminder number {number}."))
        };
    }

    match ctx.scheduler.cancel_all() {
        0 => ActionResult::success(NO_TIMERS),
        1 => ActionResult::success(phrases::complete("Cancelled 1 timer.")),
        n => ActionResult::success(phrases::complete(&format!("Cancelled {n} timers."))),
    }
}

pub(super) fn list_timers(ctx: &ActionContext) -> ActionResult {
    let active = ctx.scheduler.active();
    if active.is_empty() {
        return ActionResult::success(NO_TIMERS);
    }

    let items: Vec<String> = active
        .iter()
        .map(|task| {
            let at = task.fire_at.format("%I:%M %p");
            match task.kind {
                TaskKind::Timer => format!("timer number {} at {at}", task.id.id()),
                TaskKind::Reminder => format!("reminder number {} at {at}", task.id.id()),
            }
        })
        .collect();

    ActionResult::success(format!(
        "You have {} pending: {}.",
        active.len(),
        super::spoken_list(&items)
    ))
}

pub(super) fn tell_time() -> ActionResult {
    let now = Local::now().format("%I:%M %p");
    ActionResult::success(phrases::confirm(&format!("The current time is {now}.")))
}

pub(super) fn calculate(args: &Args) -> ActionResult {
    let Some(expression) = args.text("expression") else {
        return ActionResult::invalid("What would you like me to calculate?");
    };

    match calc::evaluate(expression) {
        Ok(value) => ActionResult::success(format!("The result is {}.", calc::format_number(value))),
        Err(e) => {
            tracing::debug!(expression, error = %e, "calculation failed");
            ActionResult::invalid("I couldn't calculate that. Please check your expression.")
        }
    }
}

pub(super) fn convert_units(args: &Args) -> ActionResult {
    let (Some(value), Some(from), Some(to)) =
        (args.number("value"), args.text("from"), args.text("to"))
    else {
        return ActionResult::invalid("I couldn't understand the conversion. Please try again.");
    };

    units::convert(value, from, to).map_or_else(
        || ActionResult::invalid("I don't know how to convert those units."),
        |result| {
            ActionResult::success(format!(
                "{} {from} is {result:.2} {to}.",
                calc::format_number(value)
            ))
        },
    )
}

pub(super) fn read_notes(ctx: &ActionContext) -> ActionResult {
    match ctx.notes.recent(RECENT_NOTES) {
        Ok(Some(notes)) if !notes.is_empty() => {
            ActionResult::success(format!("Here are your recent notes: {}", numbered(&notes)))
        }
        Ok(_) => ActionResult::success("You don't have any notes yet."),
        Err(e) => collaborator_failure(ActionName::ReadNotes, &e),
    }
}

pub(super) fn save_note(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(content) = args.text("content") else {
        return ActionResult::invalid("What would you like me to note?");
    };

    match ctx.notes.append(content) {
        Ok(()) => ActionResult::success(phrases::confirm("Note saved.")),
        Err(e) => collaborator_failure(ActionName::SaveNote, &e),
    }
}

pub(super) fn generate_password(args: &Args, ctx: &ActionContext) -> ActionResult {
    let length = match args.integer("length") {
        Some(n) => match usize::try_from(n) {
            Ok(n) if password::LENGTH_RANGE.contains(&n) => n,
            _ => {
                return ActionResult::invalid(format!(
                    "Password length must be between {} and {}.",
                    password::LENGTH_RANGE.start(),
                    password::LENGTH_RANGE.end()
                ));
            }
        },
        None => password::DEFAULT_LENGTH,
    };

    match password::generate(length) {
        Ok(generated) => {
            ctx.screen.show(&format!("Generated password: {generated}"));
            ActionResult::success(format!(
                "I've generated a {length} character password. Check the screen for details."
            ))
        }
        Err(e) => collaborator_failure(ActionName::GeneratePassword, &e),
    }
}

pub(super) fn add_todo(args: &Args, ctx: &ActionContext) -> ActionResult {
    let Some(task) = args.text("task") else {
        return ActionResult::invalid("What should I add to your to-do list?");
    };

    match ctx.todo.add(task) {
        Ok(()) => ActionResult::success(phrases::confirm(&format!(
            "I've added '{task}' to your list."
        ))),
        Err(e) => collaborator_failure(ActionName::AddTodo, &e),
    }
}

pub(super) fn read_todo(ctx: &ActionContext) -> ActionResult {
    match ctx.todo.tasks() {
        Ok(None) => ActionResult::success("You don't have a to-do list yet."),
        Ok(Some(tasks)) if tasks.is_empty() => ActionResult::success("Your to-do list is empty!"),
        Ok(Some(tasks)) => {
            let shown: Vec<String> = tasks.into_iter().take(SPOKEN_TASKS).collect();
            ActionResult::success(format!("Here are your tasks: {}", numbered(&shown)))
        }
        Err(e) => collaborator_failure(ActionName::ReadTodo, &e),
    }
}
