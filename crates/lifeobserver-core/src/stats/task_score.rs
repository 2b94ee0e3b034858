//! Quadrant-weighted task scoring and the monthly title ladder.

use serde::Serialize;

use crate::task::Task;

/// Earned and possible score for one day's (or any slice's) tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayScores {
    /// Sum of quadrant weights over completed tasks.
    pub earned: u32,
    /// Same sum over all tasks regardless of completion -- the
    /// denominator for a completion-quality ratio.
    pub possible: u32,
}

/// Sum of quadrant weights over completed tasks.
pub fn earned_score<'a, I>(tasks: I) -> u32
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|t| t.completed)
        .map(|t| t.quadrant.weight())
        .sum()
}

/// Sum of quadrant weights over all tasks.
pub fn possible_score<'a, I>(tasks: I) -> u32
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().map(|t| t.quadrant.weight()).sum()
}

/// Both scores for the tasks scheduled on one calendar day.
pub fn scores_for_day(tasks: &[Task], day: &str) -> DayScores {
    let on_day: Vec<&Task> = tasks.iter().filter(|t| t.date == day).collect();
    DayScores {
        earned: earned_score(on_day.iter().copied()),
        possible: possible_score(on_day.iter().copied()),
    }
}

/// Narrative title for a cumulative monthly score. Purely cosmetic;
/// thresholds compare descending.
pub fn monthly_title(score: u32) -> &'static str {
    if score >= 800 {
        "Very Good, Have Some Ice Cream"
    } else if score >= 551 {
        "Time-Stopping Steamroller"
    } else if score >= 381 {
        "Newly Minted Tycoon"
    } else if score >= 251 {
        "Time Management Master"
    } else if score >= 151 {
        "Willpower Ascetic"
    } else if score >= 80 {
        "Slowly Finding Your Light"
    } else {
        "Couch Potato"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Quadrant;

    fn task(day: &str, quadrant: Quadrant, completed: bool) -> Task {
        let mut t = Task::new(day, "09:00 AM", "t", quadrant, 30);
        t.completed = completed;
        t
    }

    #[test]
    fn earned_counts_only_completed() {
        let tasks = vec![
            task("2026-08-06", Quadrant::A, true),
            task("2026-08-06", Quadrant::B, false),
            task("2026-08-06", Quadrant::D, true),
        ];
        assert_eq!(earned_score(&tasks), 5);
        assert_eq!(possible_score(&tasks), 8);
    }

    #[test]
    fn score_is_idempotent_and_local() {
        let mut tasks = vec![
            task("2026-08-06", Quadrant::A, true),
            task("2026-08-06", Quadrant::C, false),
        ];
        let first = earned_score(&tasks);
        assert_eq!(earned_score(&tasks), first);

        // Toggling one task shifts the total by exactly its weight.
        tasks[1].completed = true;
        assert_eq!(earned_score(&tasks), first + Quadrant::C.weight());
    }

    #[test]
    fn day_filter_ignores_other_days() {
        let tasks = vec![
            task("2026-08-05", Quadrant::A, true),
            task("2026-08-06", Quadrant::B, true),
        ];
        let scores = scores_for_day(&tasks, "2026-08-06");
        assert_eq!(scores.earned, 3);
        assert_eq!(scores.possible, 3);
    }

    #[test]
    fn title_ladder_boundaries() {
        assert_eq!(monthly_title(0), "Couch Potato");
        assert_eq!(monthly_title(79), "Couch Potato");
        assert_eq!(monthly_title(80), "Slowly Finding Your Light");
        assert_eq!(monthly_title(151), "Willpower Ascetic");
        assert_eq!(monthly_title(251), "Time Management Master");
        assert_eq!(monthly_title(381), "Newly Minted Tycoon");
        assert_eq!(monthly_title(551), "Time-Stopping Steamroller");
        assert_eq!(monthly_title(800), "Very Good, Have Some Ice Cream");
    }
}
