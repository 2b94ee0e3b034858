//! # LifeObserver Core Library
//!
//! Core business logic for LifeObserver, a personal tracking companion
//! (mood journal, habit tracker, quadrant planner, punch clock, AI chat).
//! All state lives in one embedded SQLite database; the CLI binary is a
//! thin shell over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: a generic keyed record store over SQLite plus one
//!   typed repository per collection
//! - **Scoring**: pure functions deriving mood indices, task scores and
//!   habit completion rates from the raw collections
//! - **Triggers**: a data-driven rule table firing proactive AI messages
//!   at most once per rule per day
//! - **Attendance**: a wall-clock punch-card state machine with
//!   deadline-based reminders, driven by a caller-side tick
//!
//! ## Key Components
//!
//! - [`Database`]: the keyed record store
//! - [`TriggerEngine`]: proactive rule evaluation
//! - [`AttendanceTracker`]: punch-clock state machine
//! - [`AiResponder`]: the external language-model capability

pub mod ai;
pub mod attendance;
pub mod chat;
pub mod clock;
pub mod error;
pub mod events;
pub mod export;
pub mod habit;
pub mod mood;
pub mod stats;
pub mod storage;
pub mod task;
pub mod triggers;

pub use ai::{AiResponder, HttpAiResponder};
pub use attendance::{
    AttendanceStatus, AttendanceTracker, PunchKind, PunchOutcome, PunchRecord, Reminder,
    WorkTimeRecord,
};
pub use chat::{ChatError, ChatMessage, ChatRole, ChatSession};
pub use error::{ConfigError, CoreError, StorageError, UpstreamError, ValidationError};
pub use events::Event;
pub use habit::{milestone_for, Habit, Milestone};
pub use mood::{MoodEntry, MoodEntryKind, NoteAttachment};
pub use storage::{
    AppState, ChatLog, Collection, Config, Database, HabitStore, MoodStore, PunchLog, TaskStore,
    WorkTimeLog,
};
pub use task::{Quadrant, Task};
pub use triggers::{FiredTrigger, TriggerEngine};
