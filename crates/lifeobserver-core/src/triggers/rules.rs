//! The trigger rule table.
//!
//! Each rule carries its stable id, a predicate over the day snapshot,
//! and a prompt builder producing the system instruction handed to the
//! AI responder. New rules slot into [`RULES`] as long as the id is
//! stable and unique -- the engine supplies the once-per-day guard.

/// Which event kind a rule listens to. A task event never re-reads the
/// mood journal, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Task,
    Habit,
    Mood,
}

/// A habit that just crossed a milestone boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitLevelUp {
    pub habit_id: i64,
    pub habit_name: String,
    pub level: u8,
    pub level_name: &'static str,
}

/// Today's derived aggregates, rebuilt from the repositories on every
/// evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodaySnapshot {
    /// Local calendar day, `YYYY-MM-DD`.
    pub today: String,
    /// Local hour of day, 0-23.
    pub hour: u32,
    /// Earned quadrant score over today's completed tasks.
    pub task_score: u32,
    /// Open A/B-quadrant tasks remaining today.
    pub uncompleted_important: usize,
    /// Names of distinct habits checked in today.
    pub completed_habits_today: Vec<String>,
    /// Set when the triggering check-in crossed a milestone boundary.
    pub level_up: Option<HabitLevelUp>,
    /// Number of mood entries written today.
    pub mood_entry_count: usize,
    /// Mean mood index for today, when any tags exist.
    pub mood_average: Option<f64>,
}

/// One trigger rule. Plain function pointers keep the table `const` and
/// each part unit-testable in isolation.
pub struct TriggerRule {
    pub scope: RuleScope,
    pub id: fn(&TodaySnapshot) -> String,
    pub predicate: fn(&TodaySnapshot) -> bool,
    pub prompt: fn(&TodaySnapshot) -> String,
}

// ── Task rules ───────────────────────────────────────────────────────

fn task_score_high_id(_: &TodaySnapshot) -> String {
    "taskScoreHigh20".into()
}

fn task_score_high_predicate(s: &TodaySnapshot) -> bool {
    s.task_score >= 20
}

fn task_score_high_prompt(s: &TodaySnapshot) -> String {
    format!(
        "[system] The user is having a highly productive day: their completed \
tasks add up to {} points. Congratulate them in an energetic tone and \
gently remind them to rest as well.",
        s.task_score
    )
}

fn task_remind_late_id(_: &TodaySnapshot) -> String {
    "taskRemindLate".into()
}

fn task_remind_late_predicate(s: &TodaySnapshot) -> bool {
    s.hour >= 19 && s.uncompleted_important > 2
}

fn task_remind_late_prompt(s: &TodaySnapshot) -> String {
    format!(
        "[system] It is already evening and the user still has {} important \
tasks unfinished today. Remind them in a gentle, supportive tone.",
        s.uncompleted_important
    )
}

// ── Habit rules ──────────────────────────────────────────────────────

fn habit_milestone3_id(_: &TodaySnapshot) -> String {
    "habitMilestone3".into()
}

fn habit_milestone3_predicate(s: &TodaySnapshot) -> bool {
    s.completed_habits_today.len() == 3
}

fn habit_milestone3_prompt(s: &TodaySnapshot) -> String {
    let names = s
        .completed_habits_today
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "[system] The user has shown real perseverance and completed 3 habits \
today: {names}. Praise them and encourage them to keep it up."
    )
}

fn habit_level_up_id(s: &TodaySnapshot) -> String {
    let habit_id = s.level_up.as_ref().map(|l| l.habit_id).unwrap_or_default();
    format!("habitLevelUp_{habit_id}")
}

fn habit_level_up_predicate(s: &TodaySnapshot) -> bool {
    s.level_up.is_some()
}

fn habit_level_up_prompt(s: &TodaySnapshot) -> String {
    match &s.level_up {
        Some(up) => format!(
            "[system] The user's habit \"{}\" just leveled up to Lv.{} - {}! \
Congratulate them on their effort and persistence.",
            up.habit_name, up.level, up.level_name
        ),
        None => String::new(),
    }
}

// ── Mood rules ───────────────────────────────────────────────────────

fn mood_high_id(_: &TodaySnapshot) -> String {
    "moodHigh".into()
}

fn mood_high_predicate(s: &TodaySnapshot) -> bool {
    s.mood_entry_count >= 2 && s.mood_average.is_some_and(|avg| avg >= 4.5)
}

fn mood_high_prompt(s: &TodaySnapshot) -> String {
    format!(
        "[system] The user's mood index today is a wonderful {:.1}. What a \
beautiful day -- share in their joy and congratulate them.",
        s.mood_average.unwrap_or_default()
    )
}

fn mood_low_id(_: &TodaySnapshot) -> String {
    "moodLow".into()
}

fn mood_low_predicate(s: &TodaySnapshot) -> bool {
    s.mood_entry_count >= 2 && s.mood_average.is_some_and(|avg| avg <= 2.0)
}

fn mood_low_prompt(s: &TodaySnapshot) -> String {
    format!(
        "[system] The user's mood index today is low, only {:.1}. Check in on \
them with a warm, supportive tone and offer a few calming suggestions \
(deep breathing, music, a short walk) without prying.",
        s.mood_average.unwrap_or_default()
    )
}

/// The fixed rule table.
pub const RULES: &[TriggerRule] = &[
    TriggerRule {
        scope: RuleScope::Task,
        id: task_score_high_id,
        predicate: task_score_high_predicate,
        prompt: task_score_high_prompt,
    },
    TriggerRule {
        scope: RuleScope::Task,
        id: task_remind_late_id,
        predicate: task_remind_late_predicate,
        prompt: task_remind_late_prompt,
    },
    TriggerRule {
        scope: RuleScope::Habit,
        id: habit_milestone3_id,
        predicate: habit_milestone3_predicate,
        prompt: habit_milestone3_prompt,
    },
    TriggerRule {
        scope: RuleScope::Habit,
        id: habit_level_up_id,
        predicate: habit_level_up_predicate,
        prompt: habit_level_up_prompt,
    },
    TriggerRule {
        scope: RuleScope::Mood,
        id: mood_high_id,
        predicate: mood_high_predicate,
        prompt: mood_high_prompt,
    },
    TriggerRule {
        scope: RuleScope::Mood,
        id: mood_low_id,
        predicate: mood_low_predicate,
        prompt: mood_low_prompt,
    },
];
