//! Randomized response pools

use rand::seq::SliceRandom;

pub const GREETINGS: &[&str] = &[
    "Hi there! What can I do for you?",
    "Hello! How can I help you today?",
    "Hey! What's up?",
    "Hi! Ready to assist you!",
    "Hello there! What would you like me to do?",
    "Hey! How can I make your day better?",
];

pub const CONFIRMATIONS: &[&str] = &[
    "Of course!",
    "Absolutely!",
    "Sure thing!",
    "You got it!",
    "Right away!",
    "On it!",
    "No problem!",
];

pub const COMPLETIONS: &[&str] = &[
    "Done!",
    "All set!",
    "Task completed!",
    "There you go!",
    "Finished!",
    "Mission accomplished!",
];

pub const ERRORS: &[&str] = &[
    "Hmm, I'm having some trouble with that.",
    "Oops, something went wrong there.",
    "I ran into a little issue.",
    "Sorry, I couldn't complete that task.",
    "That didn't work as expected.",
];

pub const GOODBYES: &[&str] = &[
    "Goodbye! Have a great day!",
    "See you later!",
    "Take care!",
    "Until next time!",
    "Catch you later!",
    "Bye for now!",
];

pub const STARTUP: &[&str] = &[
    "Hello! herald is online and ready to help!",
    "Hi there! I'm herald, your voice assistant!",
    "Hey! herald here, ready to make your day more productive!",
];

pub const UNKNOWN: &[&str] = &[
    "I'm not sure how to help with that.",
    "Could you rephrase that?",
    "I didn't understand. Can you try again?",
    "That's not something I can do yet.",
    "I'm still learning. Could you try a different command?",
];

/// Rendered when an action panics
pub const APOLOGY: &str = "Sorry, something went wrong while doing that. Let's try something else.";

/// Rendered on interrupt or end of input
pub const FAREWELL: &str = "Goodbye! Thanks for using herald!";

/// Pick a random entry from a pool
#[must_use]
pub fn pick(pool: &'static [&'static str]) -> &'static str {
    pool.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

/// A confirmation followed by `text`
#[must_use]
pub fn confirm(text: &str) -> String {
    format!("{} {text}", pick(CONFIRMATIONS))
}

/// A completion followed by `text`
#[must_use]
pub fn complete(text: &str) -> String {
    format!("{} {text}", pick(COMPLETIONS))
}
