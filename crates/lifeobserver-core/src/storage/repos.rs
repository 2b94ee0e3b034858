//! Typed repositories, one per collection.
//!
//! Each repository is a thin facade over [`Database`]: serialize with
//! serde, delegate, and validate the few fields that must never be empty
//! before any write. Nothing here enforces cross-entity constraints.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::database::{Collection, Database};
use crate::attendance::{PersistedAttendance, PunchRecord, WorkTimeRecord};
use crate::chat::ChatMessage;
use crate::error::{CoreError, StorageError, ValidationError};
use crate::habit::{CheckIn, Habit};
use crate::mood::MoodEntry;
use crate::task::Task;

fn encode<T: Serialize>(value: &T) -> Result<Value, CoreError> {
    Ok(serde_json::to_value(value)?)
}

/// Decode every record, skipping malformed ones with a warning.
///
/// Derived displays must degrade to "empty" rather than fail when a
/// single stored record is bad.
fn decode_all<T: DeserializeOwned>(collection: Collection, values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(
                    collection = collection.name(),
                    %err,
                    "skipping malformed record"
                );
                None
            }
        })
        .collect()
}

// ── Mood journal ─────────────────────────────────────────────────────

pub struct MoodStore<'a> {
    db: &'a Database,
}

impl<'a> MoodStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn save(&self, entry: &MoodEntry) -> Result<(), CoreError> {
        self.db.put(Collection::Moods, &encode(entry)?)?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Option<MoodEntry>, StorageError> {
        match self.db.get(Collection::Moods, &id.to_string())? {
            Some(value) => Ok(serde_json::from_value(value).ok()),
            None => Ok(None),
        }
    }

    pub fn all(&self) -> Result<Vec<MoodEntry>, StorageError> {
        Ok(decode_all(
            Collection::Moods,
            self.db.get_all(Collection::Moods)?,
        ))
    }

    pub fn for_day(&self, day: &str) -> Result<Vec<MoodEntry>, StorageError> {
        Ok(self.all()?.into_iter().filter(|e| e.date == day).collect())
    }

    pub fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.db.delete(Collection::Moods, &id.to_string())
    }

    pub fn replace_all(&self, entries: &[MoodEntry]) -> Result<(), CoreError> {
        let values = entries.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        self.db.replace_all(Collection::Moods, &values)?;
        Ok(())
    }
}

// ── Habits ───────────────────────────────────────────────────────────

/// Outcome of a repository-level check-in attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum HabitCheckIn {
    Recorded(Habit),
    AlreadyCheckedInToday(Habit),
    NotFound,
}

pub struct HabitStore<'a> {
    db: &'a Database,
}

impl<'a> HabitStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a habit. Fails with a validation error when the name is
    /// empty; nothing is written in that case.
    pub fn save(&self, habit: &Habit) -> Result<(), CoreError> {
        if habit.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" }.into());
        }
        self.db.put(Collection::Habits, &encode(habit)?)?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Option<Habit>, StorageError> {
        match self.db.get(Collection::Habits, &id.to_string())? {
            Some(value) => Ok(serde_json::from_value(value).ok()),
            None => Ok(None),
        }
    }

    pub fn all(&self) -> Result<Vec<Habit>, StorageError> {
        Ok(decode_all(
            Collection::Habits,
            self.db.get_all(Collection::Habits)?,
        ))
    }

    pub fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.db.delete(Collection::Habits, &id.to_string())
    }

    pub fn replace_all(&self, habits: &[Habit]) -> Result<(), CoreError> {
        let values = habits.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        self.db.replace_all(Collection::Habits, &values)?;
        Ok(())
    }

    /// Check the habit in for today. The second attempt on the same
    /// calendar day persists nothing and reports the condition.
    pub fn check_in(&self, id: i64, now_ms: i64) -> Result<HabitCheckIn, CoreError> {
        let Some(mut habit) = self.get(id)? else {
            return Ok(HabitCheckIn::NotFound);
        };
        match habit.check_in(now_ms) {
            CheckIn::Recorded => {
                self.save(&habit)?;
                Ok(HabitCheckIn::Recorded(habit))
            }
            CheckIn::AlreadyCheckedInToday => Ok(HabitCheckIn::AlreadyCheckedInToday(habit)),
        }
    }

    /// Remove today's check-in, if present.
    pub fn undo_check_in(&self, id: i64, today: &str) -> Result<Option<Habit>, CoreError> {
        let Some(mut habit) = self.get(id)? else {
            return Ok(None);
        };
        if habit.undo_check_in(today) {
            self.save(&habit)?;
        }
        Ok(Some(habit))
    }
}

// ── Tasks ────────────────────────────────────────────────────────────

pub struct TaskStore<'a> {
    db: &'a Database,
}

impl<'a> TaskStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a task. Empty content is rejected before any write; the
    /// quadrant is already constrained by its type.
    pub fn save(&self, task: &Task) -> Result<(), CoreError> {
        if task.content.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "content" }.into());
        }
        self.db.put(Collection::Tasks, &encode(task)?)?;
        Ok(())
    }

    pub fn save_batch(&self, tasks: &[Task]) -> Result<(), CoreError> {
        for task in tasks {
            self.save(task)?;
        }
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Option<Task>, StorageError> {
        match self.db.get(Collection::Tasks, &id.to_string())? {
            Some(value) => Ok(serde_json::from_value(value).ok()),
            None => Ok(None),
        }
    }

    pub fn all(&self) -> Result<Vec<Task>, StorageError> {
        Ok(decode_all(
            Collection::Tasks,
            self.db.get_all(Collection::Tasks)?,
        ))
    }

    /// Tasks for one calendar day, ordered by their 24-hour sort key.
    pub fn for_day(&self, day: &str) -> Result<Vec<Task>, StorageError> {
        let mut tasks: Vec<Task> = self.all()?.into_iter().filter(|t| t.date == day).collect();
        tasks.sort_by_key(|t| t.sort_key());
        Ok(tasks)
    }

    pub fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.db.delete(Collection::Tasks, &id.to_string())
    }

    pub fn replace_all(&self, tasks: &[Task]) -> Result<(), CoreError> {
        let values = tasks.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        self.db.replace_all(Collection::Tasks, &values)?;
        Ok(())
    }

    /// Flip the completed flag; returns the updated task when found.
    pub fn toggle_completed(&self, id: i64) -> Result<Option<Task>, CoreError> {
        let Some(mut task) = self.get(id)? else {
            return Ok(None);
        };
        task.completed = !task.completed;
        self.save(&task)?;
        Ok(Some(task))
    }
}

// ── Append-only logs ─────────────────────────────────────────────────

pub struct PunchLog<'a> {
    db: &'a Database,
}

impl<'a> PunchLog<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn append(&self, record: &PunchRecord) -> Result<(), CoreError> {
        self.db.put(Collection::PunchRecords, &encode(record)?)?;
        Ok(())
    }

    pub fn all(&self) -> Result<Vec<PunchRecord>, StorageError> {
        Ok(decode_all(
            Collection::PunchRecords,
            self.db.get_all(Collection::PunchRecords)?,
        ))
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.db.clear(Collection::PunchRecords)
    }
}

pub struct WorkTimeLog<'a> {
    db: &'a Database,
}

impl<'a> WorkTimeLog<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn append(&self, record: &WorkTimeRecord) -> Result<(), CoreError> {
        self.db.put(Collection::WorkTimeRecords, &encode(record)?)?;
        Ok(())
    }

    pub fn all(&self) -> Result<Vec<WorkTimeRecord>, StorageError> {
        Ok(decode_all(
            Collection::WorkTimeRecords,
            self.db.get_all(Collection::WorkTimeRecords)?,
        ))
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.db.clear(Collection::WorkTimeRecords)
    }
}

pub struct ChatLog<'a> {
    db: &'a Database,
}

impl<'a> ChatLog<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn append(&self, message: &ChatMessage) -> Result<(), CoreError> {
        self.db.put(Collection::ChatHistory, &encode(message)?)?;
        Ok(())
    }

    pub fn all(&self) -> Result<Vec<ChatMessage>, StorageError> {
        Ok(decode_all(
            Collection::ChatHistory,
            self.db.get_all(Collection::ChatHistory)?,
        ))
    }

    /// The most recent `window` messages, oldest first.
    pub fn recent(&self, window: usize) -> Result<Vec<ChatMessage>, StorageError> {
        let mut all = self.all()?;
        if all.len() > window {
            all.drain(..all.len() - window);
        }
        Ok(all)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.db.clear(Collection::ChatHistory)
    }
}

// ── App state ────────────────────────────────────────────────────────

const TRIGGER_MEMORY_KEY: &str = "proactiveAITriggers";
const ATTENDANCE_STATUS_KEY: &str = "attendanceStatus";
const PINNED_ENTRIES_KEY: &str = "pinnedEntryIds";

/// Generic `{key, value}` singleton store: settings, trigger memory,
/// current attendance status, pinned-note ordering. Values are
/// overwritten in place and only removed by an explicit clear.
pub struct AppState<'a> {
    db: &'a Database,
}

impl<'a> AppState<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self
            .db
            .get(Collection::AppState, key)?
            .and_then(|mut record| record.get_mut("value").map(Value::take)))
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.db
            .put(
                Collection::AppState,
                &serde_json::json!({ "key": key, "value": value }),
            )
            .map(|_| ())
    }

    pub fn trigger_memory(&self) -> Result<HashMap<String, String>, StorageError> {
        Ok(self
            .get(TRIGGER_MEMORY_KEY)?
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default())
    }

    pub fn set_trigger_memory(&self, memory: &HashMap<String, String>) -> Result<(), StorageError> {
        self.set(
            TRIGGER_MEMORY_KEY,
            serde_json::to_value(memory).unwrap_or_default(),
        )
    }

    pub fn attendance_status(&self) -> Result<Option<PersistedAttendance>, StorageError> {
        Ok(self
            .get(ATTENDANCE_STATUS_KEY)?
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    pub fn set_attendance_status(&self, status: &PersistedAttendance) -> Result<(), StorageError> {
        self.set(
            ATTENDANCE_STATUS_KEY,
            serde_json::to_value(status).unwrap_or_default(),
        )
    }

    pub fn pinned_entries(&self) -> Result<Vec<i64>, StorageError> {
        Ok(self
            .get(PINNED_ENTRIES_KEY)?
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default())
    }

    /// Pin or unpin a journal entry; returns true when now pinned.
    pub fn toggle_pinned(&self, entry_id: i64) -> Result<bool, StorageError> {
        let mut pinned = self.pinned_entries()?;
        let now_pinned = if let Some(pos) = pinned.iter().position(|id| *id == entry_id) {
            pinned.remove(pos);
            false
        } else {
            pinned.push(entry_id);
            true
        };
        self.set(
            PINNED_ENTRIES_KEY,
            serde_json::to_value(&pinned).unwrap_or_default(),
        )?;
        Ok(now_pinned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::MoodEntryKind;
    use crate::task::Quadrant;

    #[test]
    fn habit_store_rejects_empty_name() {
        let db = Database::open_memory().unwrap();
        let store = HabitStore::new(&db);
        let mut habit = Habit::new("x");
        habit.name = "  ".into();
        assert!(matches!(
            store.save(&habit),
            Err(CoreError::Validation(ValidationError::EmptyField { field: "name" }))
        ));
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn task_store_rejects_empty_content() {
        let db = Database::open_memory().unwrap();
        let store = TaskStore::new(&db);
        let task = Task::new("2026-08-06", "09:00 AM", "", Quadrant::A, 30);
        assert!(store.save(&task).is_err());
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn habit_check_in_twice_same_day() {
        let db = Database::open_memory().unwrap();
        let store = HabitStore::new(&db);
        let habit = Habit::new("meditate");
        let id = habit.id;
        store.save(&habit).unwrap();

        let now = crate::clock::now_ms();
        assert!(matches!(
            store.check_in(id, now).unwrap(),
            HabitCheckIn::Recorded(_)
        ));
        assert!(matches!(
            store.check_in(id, now + 1).unwrap(),
            HabitCheckIn::AlreadyCheckedInToday(_)
        ));
        assert_eq!(store.get(id).unwrap().unwrap().check_ins.len(), 1);
    }

    #[test]
    fn mood_entries_filter_by_day() {
        let db = Database::open_memory().unwrap();
        let store = MoodStore::new(&db);
        let mut a = MoodEntry::new(MoodEntryKind::Morning, vec!["happy".into()], "a");
        a.date = "2026-08-01".into();
        let mut b = MoodEntry::new(MoodEntryKind::Evening, vec![], "b");
        b.id = a.id + 1;
        b.date = "2026-08-02".into();
        store.save(&a).unwrap();
        store.save(&b).unwrap();

        let day = store.for_day("2026-08-02").unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].content, "b");
    }

    #[test]
    fn tasks_for_day_sort_by_24h_key() {
        let db = Database::open_memory().unwrap();
        let store = TaskStore::new(&db);
        let mut early = Task::new("2026-08-06", "09:00 AM", "stand-up", Quadrant::B, 15);
        let mut late = Task::new("2026-08-06", "01:00 PM", "review", Quadrant::A, 30);
        late.id = early.id + 1;
        store.save(&late).unwrap();
        store.save(&early).unwrap();

        let day = store.for_day("2026-08-06").unwrap();
        assert_eq!(day[0].content, "stand-up");
        assert_eq!(day[1].content, "review");
    }

    #[test]
    fn app_state_overwrites_in_place() {
        let db = Database::open_memory().unwrap();
        let state = AppState::new(&db);
        state.set("activeSection", serde_json::json!("habits")).unwrap();
        state.set("activeSection", serde_json::json!("tasks")).unwrap();
        assert_eq!(
            state.get("activeSection").unwrap(),
            Some(serde_json::json!("tasks"))
        );
        assert!(state.get("missing").unwrap().is_none());
    }

    #[test]
    fn pinned_entries_toggle() {
        let db = Database::open_memory().unwrap();
        let state = AppState::new(&db);
        assert!(state.toggle_pinned(7).unwrap());
        assert!(state.toggle_pinned(9).unwrap());
        assert_eq!(state.pinned_entries().unwrap(), vec![7, 9]);
        assert!(!state.toggle_pinned(7).unwrap());
        assert_eq!(state.pinned_entries().unwrap(), vec![9]);
    }

    #[test]
    fn chat_log_recent_window() {
        let db = Database::open_memory().unwrap();
        let log = ChatLog::new(&db);
        for i in 0..5 {
            log.append(&ChatMessage::user(format!("m{i}"))).unwrap();
        }
        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "m3");
        assert_eq!(recent[1].content, "m4");
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let db = Database::open_memory().unwrap();
        db.put(
            Collection::Habits,
            &serde_json::json!({"id": 1, "name": "ok", "checkIns": []}),
        )
        .unwrap();
        db.put(Collection::Habits, &serde_json::json!({"id": 2, "nope": true}))
            .unwrap();
        let habits = HabitStore::new(&db).all().unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].name, "ok");
    }
}
