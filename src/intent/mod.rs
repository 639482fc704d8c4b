//! Intent resolution
//!
//! Turns a transcript into exactly one [`crate::actions::ActionRequest`]
//! through an ordered, first-match-wins [`RuleTable`].

pub mod extract;
mod rules;
mod utterance;

pub use rules::{Binder, Predicate, Resolution, Rule, RuleTable};
pub use utterance::Utterance;
