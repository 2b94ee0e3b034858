//! Trigger scenarios across the real store: milestone level-ups and the
//! three-habits rule, end to end through the engine.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::sync::Mutex;

use lifeobserver_core::error::UpstreamError;
use lifeobserver_core::storage::HabitStore;
use lifeobserver_core::triggers::TriggerEngine;
use lifeobserver_core::{AiResponder, ChatMessage, Database, Event, Habit};

#[derive(Default)]
struct RecordingResponder {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl AiResponder for RecordingResponder {
    async fn respond(
        &self,
        system_prompt: &str,
        _history: &[ChatMessage],
        _attachment: Option<&lifeobserver_core::NoteAttachment>,
    ) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(system_prompt.to_string());
        Ok("congrats!".into())
    }
}

fn noon(d: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 8, d, 12, 0, 0).unwrap()
}

fn ms_on(d: u32, h: u32) -> i64 {
    Local
        .with_ymd_and_hms(2026, 8, d, h, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn checked_in_event(habit: &Habit) -> Event {
    Event::HabitCheckedIn {
        habit_id: habit.id,
        habit_name: habit.name.clone(),
        at: Utc::now(),
    }
}

#[tokio::test]
async fn tenth_check_in_fires_level_up_exactly_once() {
    let db = Database::open_memory().unwrap();
    let store = HabitStore::new(&db);

    // Nine check-ins on nine earlier days, created in July.
    let mut habit = Habit {
        id: ms_on(1, 8) - 30 * 86_400_000,
        name: "morning run".into(),
        check_ins: (1..=9).map(|d| ms_on(d, 7)).collect(),
    };
    store.save(&habit).unwrap();

    // A second habit to prove unrelated check-ins do not refire it.
    let other = Habit {
        id: habit.id + 1,
        name: "stretch".into(),
        check_ins: vec![],
    };
    store.save(&other).unwrap();

    let now = noon(10);
    habit.check_in(ms_on(10, 11));
    store.save(&habit).unwrap();

    let responder = RecordingResponder::default();
    let mut engine = TriggerEngine::load(&db, 10);

    let fired = engine
        .evaluate(&db, &checked_in_event(&habit), &responder, now)
        .await;
    let level_ups: Vec<_> = fired
        .iter()
        .filter(|f| f.rule_id == format!("habitLevelUp_{}", habit.id))
        .collect();
    assert_eq!(level_ups.len(), 1);
    assert!(level_ups[0].prompt.contains("morning run"));
    assert!(level_ups[0].prompt.contains("Sprout"));

    // Unrelated habit checked in the same day: no second level-up.
    let mut other = store.get(other.id).unwrap().unwrap();
    other.check_in(ms_on(10, 12));
    store.save(&other).unwrap();

    let fired = engine
        .evaluate(&db, &checked_in_event(&other), &responder, now)
        .await;
    assert!(fired
        .iter()
        .all(|f| f.rule_id != format!("habitLevelUp_{}", habit.id)));
}

#[tokio::test]
async fn third_habit_of_the_day_fires_milestone_rule() {
    let db = Database::open_memory().unwrap();
    let store = HabitStore::new(&db);
    let responder = RecordingResponder::default();
    let mut engine = TriggerEngine::load(&db, 10);
    let now = noon(6);

    let names = ["water", "stretch", "journal"];
    let mut fired_milestone = 0;
    for (i, name) in names.iter().enumerate() {
        let mut habit = Habit {
            id: ms_on(1, 8) + i as i64,
            name: (*name).into(),
            check_ins: vec![],
        };
        habit.check_in(ms_on(6, 9 + i as u32));
        store.save(&habit).unwrap();

        let fired = engine
            .evaluate(&db, &checked_in_event(&habit), &responder, now)
            .await;
        fired_milestone += fired
            .iter()
            .filter(|f| f.rule_id == "habitMilestone3")
            .count();
    }

    // Fires at the third check-in, not the first or second.
    assert_eq!(fired_milestone, 1);
    let prompts = responder.prompts.lock().unwrap();
    assert!(prompts.iter().any(|p| p.contains("\"journal\"")));
}

#[tokio::test]
async fn upstream_failure_still_consumes_the_daily_shot() {
    struct FailingResponder;

    #[async_trait]
    impl AiResponder for FailingResponder {
        async fn respond(
            &self,
            _system_prompt: &str,
            _history: &[ChatMessage],
            _attachment: Option<&lifeobserver_core::NoteAttachment>,
        ) -> Result<String, UpstreamError> {
            Err(UpstreamError::Http {
                status: 500,
                message: "overloaded".into(),
            })
        }
    }

    let db = Database::open_memory().unwrap();
    let store = HabitStore::new(&db);
    let mut habit = Habit {
        id: ms_on(1, 8),
        name: "run".into(),
        check_ins: (1..=9).map(|d| ms_on(d, 7)).collect(),
    };
    habit.check_in(ms_on(10, 11));
    store.save(&habit).unwrap();

    let mut engine = TriggerEngine::load(&db, 10);
    let fired = engine
        .evaluate(&db, &checked_in_event(&habit), &FailingResponder, noon(10))
        .await;
    assert_eq!(fired.len(), 1);
    assert!(fired[0].reply.is_err());

    // The rule stays spent for the day despite the failure.
    let fired = engine
        .evaluate(&db, &checked_in_event(&habit), &FailingResponder, noon(10))
        .await;
    assert!(fired.is_empty());
}
