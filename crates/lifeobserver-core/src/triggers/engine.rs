//! Trigger evaluation and the once-per-day memory.

use std::collections::HashMap;

use chrono::{DateTime, Local, Timelike};

use super::rules::{HabitLevelUp, RuleScope, TodaySnapshot, RULES};
use crate::ai::AiResponder;
use crate::chat::ChatMessage;
use crate::clock;
use crate::error::{StorageError, UpstreamError};
use crate::events::Event;
use crate::habit::milestone_for;
use crate::stats::{earned_score, mood_index_for_day};
use crate::storage::{AppState, ChatLog, Database, HabitStore, MoodStore, TaskStore};
use crate::task::Quadrant;

/// A rule that fired during one evaluation, with the responder's reply
/// (or why it failed -- a failed reply still counts as fired).
#[derive(Debug)]
pub struct FiredTrigger {
    pub rule_id: String,
    pub prompt: String,
    pub reply: Result<String, UpstreamError>,
}

/// Stateful rule evaluator.
///
/// `last_triggered` maps rule id to the calendar day it last fired; the
/// whole map is persisted on every trigger and reloaded at startup, so
/// the once-per-day guard survives restarts.
pub struct TriggerEngine {
    last_triggered: HashMap<String, String>,
    history_window: usize,
}

impl TriggerEngine {
    /// Load persisted trigger memory. A failed read starts with empty
    /// memory rather than blocking the event that got us here.
    pub fn load(db: &Database, history_window: usize) -> Self {
        let last_triggered = match AppState::new(db).trigger_memory() {
            Ok(memory) => memory,
            Err(err) => {
                tracing::warn!(%err, "trigger memory unreadable, starting empty");
                HashMap::new()
            }
        };
        Self {
            last_triggered,
            history_window,
        }
    }

    /// True unless the rule already fired on `today`.
    pub fn can_trigger(&self, rule_id: &str, today: &str) -> bool {
        self.last_triggered.get(rule_id).map(String::as_str) != Some(today)
    }

    /// Mark the rule fired on `today` and persist the whole map.
    pub fn record_trigger(
        &mut self,
        rule_id: &str,
        today: &str,
        db: &Database,
    ) -> Result<(), StorageError> {
        self.last_triggered
            .insert(rule_id.to_string(), today.to_string());
        AppState::new(db).set_trigger_memory(&self.last_triggered)
    }

    /// Re-read the relevant repository and build today's aggregates.
    ///
    /// Read failures degrade to an empty snapshot: a trigger that cannot
    /// see the data simply does not fire.
    pub fn snapshot_for(db: &Database, event: &Event, now: DateTime<Local>) -> TodaySnapshot {
        let today = clock::day_string(now);
        let mut snapshot = TodaySnapshot {
            today: today.clone(),
            hour: now.hour(),
            ..Default::default()
        };

        match event {
            Event::TaskStateChanged { .. } => {
                let tasks = TaskStore::new(db).for_day(&today).unwrap_or_else(|err| {
                    tracing::warn!(%err, "task snapshot read failed");
                    Vec::new()
                });
                snapshot.task_score = earned_score(&tasks);
                snapshot.uncompleted_important = tasks
                    .iter()
                    .filter(|t| {
                        !t.completed && matches!(t.quadrant, Quadrant::A | Quadrant::B)
                    })
                    .count();
            }
            Event::HabitCheckedIn { habit_id, .. } => {
                let habits = HabitStore::new(db).all().unwrap_or_else(|err| {
                    tracing::warn!(%err, "habit snapshot read failed");
                    Vec::new()
                });
                snapshot.completed_habits_today = habits
                    .iter()
                    .filter(|h| h.checked_in_on(&today))
                    .map(|h| h.name.clone())
                    .collect();

                if let Some(habit) = habits.iter().find(|h| h.id == *habit_id) {
                    let count = habit.check_in_count();
                    if count > 0 {
                        let before = milestone_for(count - 1);
                        let after = milestone_for(count);
                        if after.level > before.level {
                            snapshot.level_up = Some(HabitLevelUp {
                                habit_id: habit.id,
                                habit_name: habit.name.clone(),
                                level: after.level,
                                level_name: after.name,
                            });
                        }
                    }
                }
            }
            Event::MoodEntrySaved { .. } => {
                let entries = MoodStore::new(db).for_day(&today).unwrap_or_else(|err| {
                    tracing::warn!(%err, "mood snapshot read failed");
                    Vec::new()
                });
                snapshot.mood_entry_count = entries.len();
                snapshot.mood_average = mood_index_for_day(&entries, &today).map(|i| i.average);
            }
            Event::Punched { .. } => {}
        }

        snapshot
    }

    /// Evaluate every rule in the event's scope. Each satisfied rule
    /// fires independently; one rule's failure never blocks another.
    pub async fn evaluate(
        &mut self,
        db: &Database,
        event: &Event,
        responder: &dyn AiResponder,
        now: DateTime<Local>,
    ) -> Vec<FiredTrigger> {
        let scope = match event {
            Event::TaskStateChanged { .. } => RuleScope::Task,
            Event::HabitCheckedIn { .. } => RuleScope::Habit,
            Event::MoodEntrySaved { .. } => RuleScope::Mood,
            Event::Punched { .. } => return Vec::new(),
        };

        let snapshot = Self::snapshot_for(db, event, now);
        let today = snapshot.today.clone();
        let mut fired = Vec::new();

        for rule in RULES.iter().filter(|r| r.scope == scope) {
            if !(rule.predicate)(&snapshot) {
                continue;
            }
            let rule_id = (rule.id)(&snapshot);
            if !self.can_trigger(&rule_id, &today) {
                continue;
            }

            // Recorded before the responder runs: a slow or failing
            // upstream must not grant the rule a second shot today.
            if let Err(err) = self.record_trigger(&rule_id, &today, db) {
                tracing::warn!(%err, %rule_id, "failed to persist trigger memory");
            }

            let prompt = (rule.prompt)(&snapshot);
            tracing::info!(%rule_id, "proactive trigger fired");
            let reply = self.deliver(db, responder, &prompt).await;
            fired.push(FiredTrigger {
                rule_id,
                prompt,
                reply,
            });
        }

        fired
    }

    /// Hand the system instruction to the responder with recent chat
    /// context, logging the reply into the conversation.
    async fn deliver(
        &self,
        db: &Database,
        responder: &dyn AiResponder,
        prompt: &str,
    ) -> Result<String, UpstreamError> {
        let log = ChatLog::new(db);
        let history = log.recent(self.history_window).unwrap_or_else(|err| {
            tracing::warn!(%err, "chat history unreadable for trigger");
            Vec::new()
        });
        let reply = responder.respond(prompt, &history, None).await?;
        if let Err(err) = log.append(&ChatMessage::assistant(reply.clone())) {
            tracing::warn!(%err, "failed to log trigger reply");
        }
        Ok(reply)
    }
}
