//! Proactive AI triggers: threshold rules over today's entities.
//!
//! Rules are data (`{id, predicate, prompt}`), evaluated against a
//! snapshot of today's state whenever a relevant event lands. Each rule
//! fires at most once per calendar day; the memory of what fired when
//! persists in the app-state store and resets by date-string inequality
//! at local midnight.

pub mod engine;
pub mod rules;

pub use engine::{FiredTrigger, TriggerEngine};
pub use rules::{HabitLevelUp, RuleScope, TodaySnapshot, TriggerRule, RULES};
