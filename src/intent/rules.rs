//! Ordered rule table mapping utterances to actions
//!
//! Rules are evaluated in declaration order and the first rule whose
//! predicate holds wins. Order is part of the contract: more specific phrases
//! are declared before the broad keywords they overlap with, e.g. "timer"
//! before "time" and "open website" before "open".

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::{Utterance, extract};
use crate::actions::{ActionName, ActionRequest};

use Predicate::{All, Any, MaxWords, Pattern, Phrase, Word};

// A bare minus needs spaces around it; "2-3" is usually a name or a range
static ARITHMETIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d\s*(?:[+*/x]|times|over|divided by|multiplied by)\s*\(?\d|\d\s+-\s+\(?\d")
        .expect("valid regex")
});

/// Pure test over an utterance
#[derive(Debug)]
pub enum Predicate {
    /// Whole word present
    Word(&'static str),
    /// Substring present
    Phrase(&'static str),
    /// Regex matches
    Pattern(&'static LazyLock<Regex>),
    /// At most this many words
    MaxWords(usize),
    /// Every predicate holds
    All(Vec<Predicate>),
    /// Some predicate holds
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Evaluate against an utterance
    #[must_use]
    pub fn matches(&self, utterance: &Utterance) -> bool {
        match self {
            Self::Word(word) => utterance.has_word(word),
            Self::Phrase(phrase) => utterance.contains(phrase),
            Self::Pattern(re) => re.is_match(utterance.as_str()),
            Self::MaxWords(max) => utterance.word_count() <= *max,
            Self::All(preds) => preds.iter().all(|p| p.matches(utterance)),
            Self::Any(preds) => preds.iter().any(|p| p.matches(utterance)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => write!(f, "word:{w}"),
            Self::Phrase(p) => write!(f, "\"{p}\""),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
            Self::MaxWords(n) => write!(f, "words<={n}"),
            Self::All(preds) => write_joined(f, preds, "and"),
            Self::Any(preds) => write_joined(f, preds, "or"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, preds: &[Predicate], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, p) in preds.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{p}")?;
    }
    write!(f, ")")
}

/// Extracts arguments once a rule has matched
pub type Binder = fn(&Utterance) -> ActionRequest;

/// A predicate paired with the binder that builds the request
pub struct Rule {
    pub name: &'static str,
    pub predicate: Predicate,
    pub bind: Binder,
}

impl Rule {
    /// Build a rule
    #[must_use]
    pub const fn new(name: &'static str, predicate: Predicate, bind: Binder) -> Self {
        Self {
            name,
            predicate,
            bind,
        }
    }

    /// The action this rule binds to
    #[must_use]
    pub fn action(&self) -> ActionName {
        (self.bind)(&Utterance::new("")).action
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("predicate", &self.predicate)
            .finish_non_exhaustive()
    }
}

/// Outcome of resolving an utterance
#[derive(Debug)]
pub enum Resolution<'a> {
    Matched {
        rule: &'a Rule,
        request: ActionRequest,
    },
    NoMatch,
}

/// Immutable ordered rule table
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table from rules in priority order
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The assistant's built-in rules
    #[must_use]
    pub fn standard() -> Self {
        Self::new(standard_rules())
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Resolve an utterance to the first matching rule
    #[must_use]
    pub fn resolve(&self, utterance: &Utterance) -> Resolution<'_> {
        let mut matching = self.rules.iter().filter(|r| r.predicate.matches(utterance));

        let Some(rule) = matching.next() else {
            tracing::debug!(utterance = %utterance, "no rule matched");
            return Resolution::NoMatch;
        };

        let shadowed: Vec<&str> = matching.map(|r| r.name).collect();
        if shadowed.is_empty() {
            tracing::debug!(rule = rule.name, utterance = %utterance, "rule matched");
        } else {
            tracing::debug!(
                rule = rule.name,
                shadowed = ?shadowed,
                utterance = %utterance,
                "rule matched, overlapping rules shadowed"
            );
        }

        Resolution::Matched {
            rule,
            request: (rule.bind)(utterance),
        }
    }

    /// Every rule whose predicate holds, in evaluation order
    #[must_use]
    pub fn matching(&self, utterance: &Utterance) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.predicate.matches(utterance))
            .collect()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn todo_list() -> Predicate {
    Any(vec![
        Phrase("to do list"),
        Phrase("todo list"),
        Phrase("to-do list"),
    ])
}

#[allow(clippy::too_many_lines)]
fn standard_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "exit",
            Any(vec![
                Word("stop"),
                Word("exit"),
                Word("quit"),
                Word("goodbye"),
                Phrase("good bye"),
            ]),
            |_| ActionRequest::new(ActionName::Exit),
        ),
        Rule::new(
            "greet",
            All(vec![
                Any(vec![Word("hello"), Word("hi"), Word("hey")]),
                MaxWords(2),
            ]),
            |_| ActionRequest::new(ActionName::Greet),
        ),
        Rule::new(
            "cancel_timers",
            All(vec![
                Word("cancel"),
                Any(vec![Phrase("timer"), Phrase("reminder")]),
            ]),
            |u| {
                let request = ActionRequest::new(ActionName::CancelTimers);
                match extract::first_integer(u) {
                    Some(n) => request.integer("task", n),
                    None => request,
                }
            },
        ),
        Rule::new(
            "list_timers",
            All(vec![
                Any(vec![
                    Word("list"),
                    Word("show"),
                    Word("active"),
                    Word("pending"),
                    Phrase("what are my"),
                ]),
                Any(vec![Word("timers"), Word("reminders")]),
            ]),
            |_| ActionRequest::new(ActionName::ListTimers),
        ),
        Rule::new("set_reminder", Phrase("remind me"), |u| {
            let request = ActionRequest::new(ActionName::SetReminder)
                .maybe_text("message", extract::reminder_message(u));
            match extract::duration(u) {
                Some((delay, label)) => request.duration("delay", delay).text("label", label),
                None => request,
            }
        }),
        Rule::new("set_timer", Word("timer"), |u| {
            let request = ActionRequest::new(ActionName::SetTimer);
            match extract::duration(u) {
                Some((delay, label)) => request.duration("delay", delay).text("label", label),
                None => request,
            }
        }),
        Rule::new("tell_time", Word("time"), |_| {
            ActionRequest::new(ActionName::TellTime)
        }),
        Rule::new(
            "volume",
            Any(vec![Word("volume"), Word("mute"), Word("unmute")]),
            |u| {
                let request = ActionRequest::new(ActionName::Volume);
                if u.has_word("unmute") {
                    request.text("mode", "unmute")
                } else if u.has_word("mute") {
                    request.text("mode", "mute")
                } else if u.contains("what is the volume")
                    || u.contains("what's the volume")
                    || u.contains("current volume")
                {
                    request.text("mode", "query")
                } else {
                    let request = request.text("mode", "set");
                    match extract::first_integer(u) {
                        Some(level) => request.integer("level", level),
                        None => request,
                    }
                }
            },
        ),
        Rule::new(
            "screenshot",
            Any(vec![Word("screenshot"), Phrase("screen shot")]),
            |_| ActionRequest::new(ActionName::Screenshot),
        ),
        Rule::new(
            "lock_screen",
            Any(vec![
                Phrase("lock screen"),
                Phrase("lock the screen"),
                Phrase("lock computer"),
                Phrase("lock the computer"),
            ]),
            |_| ActionRequest::new(ActionName::LockScreen),
        ),
        Rule::new(
            "system_info",
            Any(vec![Phrase("system info"), Phrase("how is my computer")]),
            |_| ActionRequest::new(ActionName::SystemInfo),
        ),
        Rule::new(
            "wifi",
            Any(vec![Word("wifi"), Phrase("wi-fi")]),
            |_| ActionRequest::new(ActionName::WifiProfiles),
        ),
        Rule::new(
            "calculate",
            Any(vec![
                Word("calculate"),
                Word("math"),
                Word("plus"),
                Word("minus"),
                Word("multiply"),
                Word("divide"),
                Word("equals"),
                Pattern(&ARITHMETIC),
            ]),
            |u| {
                ActionRequest::new(ActionName::Calculate)
                    .maybe_text("expression", extract::math_expression(u))
            },
        ),
        Rule::new("convert", Word("convert"), |u| {
            let request = ActionRequest::new(ActionName::ConvertUnits);
            match extract::conversion(u) {
                Some((value, from, to)) => request
                    .number("value", value)
                    .text("from", from)
                    .text("to", to),
                None => request,
            }
        }),
        Rule::new(
            "read_notes",
            All(vec![
                Any(vec![Word("read"), Word("show"), Word("list")]),
                Word("notes"),
            ]),
            |_| ActionRequest::new(ActionName::ReadNotes),
        ),
        Rule::new(
            "save_note",
            Any(vec![Word("note"), Word("remember")]),
            |u| {
                ActionRequest::new(ActionName::SaveNote)
                    .maybe_text("content", extract::note_content(u))
            },
        ),
        Rule::new(
            "create_folder",
            Any(vec![
                Phrase("create folder"),
                Phrase("create a folder"),
                Phrase("make folder"),
                Phrase("make a folder"),
                Phrase("new folder"),
            ]),
            |u| {
                let name = extract::text_after(
                    u,
                    &[
                        "create a folder called",
                        "create a folder named",
                        "create a folder",
                        "create folder",
                        "make a folder",
                        "make folder",
                        "new folder",
                    ],
                );
                ActionRequest::new(ActionName::CreateFolder).maybe_text("name", name)
            },
        ),
        Rule::new(
            "search_files",
            Any(vec![Phrase("search for file"), Phrase("find file")]),
            |u| {
                let pattern = extract::text_after(
                    u,
                    &[
                        "search for files",
                        "search for file",
                        "find files",
                        "find file",
                    ],
                );
                ActionRequest::new(ActionName::SearchFiles).maybe_text("pattern", pattern)
            },
        ),
        Rule::new(
            "create_file",
            Any(vec![Phrase("create file"), Phrase("create a file")]),
            |u| {
                let name = extract::text_after(
                    u,
                    &[
                        "create a file called",
                        "create a file named",
                        "create a file",
                        "create file",
                    ],
                );
                ActionRequest::new(ActionName::CreateFile).maybe_text("name", name)
            },
        ),
        Rule::new(
            "minimize_windows",
            Any(vec![
                Phrase("minimize all windows"),
                Phrase("minimise all windows"),
                Phrase("minimize windows"),
                Phrase("minimise windows"),
            ]),
            |_| ActionRequest::new(ActionName::MinimizeWindows),
        ),
        Rule::new("switch_window", Phrase("switch to"), |u| {
            ActionRequest::new(ActionName::SwitchWindow)
                .maybe_text("app", extract::text_after(u, &["switch to the", "switch to"]))
        }),
        Rule::new(
            "close_app",
            All(vec![
                Word("close"),
                Any(vec![Word("application"), Word("app"), Word("program")]),
            ]),
            |u| {
                let app = extract::without_words(
                    u,
                    &["close", "application", "app", "program", "the"],
                );
                ActionRequest::new(ActionName::CloseApp).maybe_text("app", Some(app))
            },
        ),
        Rule::new("open_website", Phrase("open website"), |u| {
            ActionRequest::new(ActionName::OpenWebsite)
                .maybe_text("site", extract::text_after(u, &["open website"]))
        }),
        Rule::new(
            "web_search",
            Any(vec![Phrase("search google for"), Word("google")]),
            |u| {
                let query = extract::text_after(u, &["search google for", "google for", "google"]);
                ActionRequest::new(ActionName::WebSearch).maybe_text("query", query)
            },
        ),
        Rule::new("weather", Word("weather"), |u| {
            ActionRequest::new(ActionName::Weather).maybe_text("city", extract::city(u))
        }),
        Rule::new(
            "encyclopedia",
            Any(vec![
                Word("wikipedia"),
                Phrase("what is"),
                Phrase("who is"),
                Phrase("tell me about"),
            ]),
            |u| {
                let query = extract::text_after(
                    u,
                    &[
                        "search wikipedia for",
                        "wikipedia",
                        "what is",
                        "who is",
                        "tell me about",
                    ],
                );
                ActionRequest::new(ActionName::Encyclopedia).maybe_text("query", query)
            },
        ),
        Rule::new(
            "generate_password",
            Any(vec![
                Phrase("generate password"),
                Phrase("generate a password"),
            ]),
            |u| {
                let request = ActionRequest::new(ActionName::GeneratePassword);
                match extract::first_integer(u) {
                    Some(length) => request.integer("length", length),
                    None => request,
                }
            },
        ),
        Rule::new(
            "security_check",
            Any(vec![Phrase("security check"), Phrase("check security")]),
            |_| ActionRequest::new(ActionName::SecurityCheck),
        ),
        Rule::new("privacy_mode", Phrase("privacy mode"), |u| {
            let request = ActionRequest::new(ActionName::PrivacyMode);
            if u.has_word("on") || u.has_word("enable") {
                request.flag("enabled", true)
            } else if u.has_word("off") || u.has_word("disable") {
                request.flag("enabled", false)
            } else {
                request
            }
        }),
        Rule::new("add_todo", All(vec![Word("add"), todo_list()]), |u| {
            let task = extract::text_after(u, &["add"]).map(|rest| {
                let mut task = rest;
                for suffix in [
                    "to my to do list",
                    "to the to do list",
                    "to my todo list",
                    "to my to-do list",
                    "to do list",
                    "todo list",
                    "to-do list",
                ] {
                    task = task.replace(suffix, "");
                }
                extract::clean(&task)
            });
            ActionRequest::new(ActionName::AddTodo).maybe_text("task", task)
        }),
        Rule::new(
            "read_todo",
            All(vec![
                Any(vec![
                    Word("read"),
                    Word("show"),
                    Word("list"),
                    Phrase("what's on"),
                ]),
                todo_list(),
            ]),
            |_| ActionRequest::new(ActionName::ReadTodo),
        ),
        Rule::new("open_app", Word("open"), |u| {
            ActionRequest::new(ActionName::OpenApp)
                .maybe_text("app", extract::text_after(u, &["open the", "open"]))
        }),
        Rule::new("help", Any(vec![Word("help"), Word("commands")]), |_| {
            ActionRequest::new(ActionName::Help)
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Option<(&'static str, ActionRequest)> {
        let table = RuleTable::standard();
        match table.resolve(&Utterance::new(text)) {
            Resolution::Matched { rule, request } => Some((rule.name, request)),
            Resolution::NoMatch => None,
        }
    }

    fn rule_for(text: &str) -> &'static str {
        resolve(text).map_or("<none>", |(name, _)| name)
    }

    #[test]
    fn test_rule_names_are_unique() {
        let table = RuleTable::standard();
        let mut names: Vec<_> = table.rules().iter().map(|r| r.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_exit_phrases() {
        for text in ["stop", "goodbye", "Good bye!", "quit please", "exit"] {
            assert_eq!(rule_for(text), "exit", "{text}");
        }
    }

    #[test]
    fn test_greeting_requires_short_utterance() {
        assert_eq!(rule_for("hello"), "greet");
        assert_eq!(rule_for("hey there"), "greet");
        assert_ne!(rule_for("hey what is the weather in paris"), "greet");
    }

    #[test]
    fn test_short_keywords_match_whole_words() {
        assert_eq!(rule_for("this is nice"), "<none>");
        assert_eq!(rule_for("open desktop"), "open_app");
    }

    #[test]
    fn test_timer_before_time() {
        let (name, request) = resolve("timer for 2 minutes").unwrap();
        assert_eq!(name, "set_timer");
        assert_eq!(
            request.args.duration("delay"),
            Some(std::time::Duration::from_secs(120))
        );
        assert_eq!(request.args.text("label"), Some("2 minutes"));

        assert_eq!(rule_for("what time is it"), "tell_time");
    }

    #[test]
    fn test_volume_modes() {
        let (name, request) = resolve("set volume to 75").unwrap();
        assert_eq!(name, "volume");
        assert_eq!(request.args.text("mode"), Some("set"));
        assert_eq!(request.args.integer("level"), Some(75));

        let (_, request) = resolve("what is the volume").unwrap();
        assert_eq!(request.args.text("mode"), Some("query"));

        let (_, request) = resolve("unmute").unwrap();
        assert_eq!(request.args.text("mode"), Some("unmute"));
    }

    #[test]
    fn test_specific_phrases_win_over_broad_keywords() {
        assert_eq!(rule_for("open website github"), "open_website");
        assert_eq!(rule_for("open notepad"), "open_app");
        assert_eq!(rule_for("what is the weather in london"), "weather");
        assert_eq!(rule_for("what is machine learning"), "encyclopedia");
        assert_eq!(rule_for("what is 5 plus 3"), "calculate");
        assert_eq!(rule_for("read my notes"), "read_notes");
        assert_eq!(rule_for("cancel all timers"), "cancel_timers");
        assert_eq!(rule_for("list my timers"), "list_timers");
        assert_eq!(rule_for("remind me in 5 minutes to stretch"), "set_reminder");
        assert_eq!(rule_for("read my to do list"), "read_todo");
        assert_eq!(rule_for("create file report 2-3"), "create_file");
        assert_eq!(rule_for("create folder week 2-3"), "create_folder");
        assert_eq!(rule_for("what is 7 - 2"), "calculate");
    }

    #[test]
    fn test_note_binds_content() {
        let (name, request) = resolve("remember buy milk").unwrap();
        assert_eq!(name, "save_note");
        assert_eq!(request.args.text("content"), Some("buy milk"));
    }

    #[test]
    fn test_add_todo_strips_list_phrase() {
        let (name, request) = resolve("add buy eggs to my to do list").unwrap();
        assert_eq!(name, "add_todo");
        assert_eq!(request.args.text("task"), Some("buy eggs"));
    }

    #[test]
    fn test_privacy_mode_flags() {
        let (_, on) = resolve("privacy mode on").unwrap();
        assert_eq!(on.args.flag("enabled"), Some(true));
        let (_, off) = resolve("disable privacy mode").unwrap();
        assert_eq!(off.args.flag("enabled"), Some(false));
        let (_, toggle) = resolve("privacy mode").unwrap();
        assert_eq!(toggle.args.flag("enabled"), None);
    }

    #[test]
    fn test_close_app_binds_name() {
        let (name, request) = resolve("close application notepad").unwrap();
        assert_eq!(name, "close_app");
        assert_eq!(request.args.text("app"), Some("notepad"));
    }

    #[test]
    fn test_matching_reports_shadowed_rules() {
        let table = RuleTable::standard();
        let names: Vec<_> = table
            .matching(&Utterance::new("what is the time in tokyo"))
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["tell_time", "encyclopedia"]);
    }

    #[test]
    fn test_unknown_utterance() {
        assert!(resolve("sing me a song").is_none());
    }

    #[test]
    fn test_rule_actions() {
        let table = RuleTable::standard();
        let first = &table.rules()[0];
        assert_eq!(first.action(), ActionName::Exit);
        assert_eq!(table.rules().last().unwrap().action(), ActionName::Help);
    }
}
