//! Achievements and logging streaks
//!
//! Derived on demand from the drink log; nothing here is stored.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::drink::Drink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Earned when the total number of logged drinks reaches the count
    DrinkCount(usize),
    /// Earned on the last day of the first run of N consecutive logging days
    Streak(i64),
    /// Earned on the Nth logging day whose total stayed within the daily goal
    GoalDays(usize),
}

#[derive(Debug, Clone, Copy)]
struct AchievementDef {
    id: &'static str,
    rule: Rule,
}

const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef { id: "first_log", rule: Rule::DrinkCount(1) },
    AchievementDef { id: "10_drinks", rule: Rule::DrinkCount(10) },
    AchievementDef { id: "50_drinks", rule: Rule::DrinkCount(50) },
    AchievementDef { id: "100_drinks", rule: Rule::DrinkCount(100) },
    AchievementDef { id: "7_day_streak", rule: Rule::Streak(7) },
    AchievementDef { id: "30_day_streak", rule: Rule::Streak(30) },
    AchievementDef { id: "5_goal", rule: Rule::GoalDays(5) },
];

/// An earned achievement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub id: String,
    pub name_key: String,
    pub description_key: String,
    pub earned_date: String,
}

impl Achievement {
    fn earned(id: &str, date: NaiveDate) -> Self {
        Self {
            id: id.to_string(),
            name_key: format!("achievement_{}_name", id),
            description_key: format!("achievement_{}_desc", id),
            earned_date: date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Ids of every achievement that can be earned
pub fn achievement_ids() -> Vec<&'static str> {
    ACHIEVEMENTS.iter().map(|a| a.id).collect()
}

/// Achievements earned by a drink log. `drinks` must be sorted oldest first.
///
/// Goal achievements are judged against `daily_goal` as it stands now; no
/// goal means none can be earned.
pub fn earned_achievements(drinks: &[Drink], daily_goal: Option<f64>) -> Vec<Achievement> {
    let dates: Vec<NaiveDate> = drinks.iter().filter_map(Drink::date).collect();
    let mut logged_days = dates.clone();
    logged_days.dedup();

    ACHIEVEMENTS
        .iter()
        .filter_map(|def| {
            let date = match def.rule {
                Rule::DrinkCount(n) => dates.get(n - 1).copied(),
                Rule::Streak(days) => first_streak_end(&logged_days, days),
                Rule::GoalDays(n) => {
                    daily_goal.and_then(|goal| days_within_goal(drinks, goal).get(n - 1).copied())
                }
            };
            date.map(|d| Achievement::earned(def.id, d))
        })
        .collect()
}

/// Logging days whose summed grams did not exceed `goal`, oldest first
fn days_within_goal(drinks: &[Drink], goal: f64) -> Vec<NaiveDate> {
    let mut totals: Vec<(NaiveDate, f64)> = Vec::new();
    for drink in drinks {
        let Some(day) = drink.date() else { continue };
        match totals.last_mut() {
            Some((last, grams)) if *last == day => *grams += drink.alcohol_grams,
            _ => totals.push((day, drink.alcohol_grams)),
        }
    }
    totals
        .into_iter()
        .filter(|&(_, grams)| grams <= goal)
        .map(|(day, _)| day)
        .collect()
}

/// Last day of the first run of `length` consecutive dates
fn first_streak_end(days: &[NaiveDate], length: i64) -> Option<NaiveDate> {
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &day in days {
        run = match previous {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        if run >= length {
            return Some(day);
        }
        previous = Some(day);
    }
    None
}

/// Consecutive logging days ending today, or ending yesterday when nothing
/// has been logged yet today. `days` must be sorted ascending and distinct.
pub fn current_streak(days: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut expected = match days.last() {
        Some(&last) if last == today => today,
        Some(&last) if last == today - Duration::days(1) => last,
        _ => return 0,
    };

    let mut streak = 0;
    for &day in days.iter().rev() {
        if day != expected {
            break;
        }
        streak += 1;
        expected = day - Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::derive_alcohol_grams;
    use crate::models::DrinkSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn drink_on(day: NaiveDate) -> Drink {
        Drink {
            id: 0,
            drink_type: "wine".to_string(),
            volume_ml: 175.0,
            abv_percent: 13.0,
            alcohol_grams: derive_alcohol_grams(175.0, 13.0),
            timestamp: format!("{}T19:00:00Z", day.format("%Y-%m-%d")),
            source: DrinkSource::Manual,
            notes: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_no_drinks_no_achievements() {
        assert!(earned_achievements(&[], None).is_empty());
    }

    #[test]
    fn test_count_achievements() {
        let start = date(2026, 3, 1);
        // Ten drinks on alternating days: no streak longer than one day
        let drinks: Vec<Drink> = (0..10).map(|i| drink_on(start + Duration::days(i * 2))).collect();
        let earned = earned_achievements(&drinks, None);
        let ids: Vec<&str> = earned.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["first_log", "10_drinks"]);
        assert_eq!(earned[0].earned_date, "2026-03-01");
        assert_eq!(earned[1].earned_date, "2026-03-19");
        assert_eq!(earned[1].name_key, "achievement_10_drinks_name");
    }

    #[test]
    fn test_seven_day_streak() {
        let start = date(2026, 2, 25);
        let drinks: Vec<Drink> = (0..7).map(|i| drink_on(start + Duration::days(i))).collect();
        let earned = earned_achievements(&drinks, None);
        let streak = earned.iter().find(|a| a.id == "7_day_streak").unwrap();
        assert_eq!(streak.earned_date, "2026-03-03");
        assert!(earned.iter().all(|a| a.id != "30_day_streak"));
    }

    #[test]
    fn test_goal_days() {
        let start = date(2026, 4, 1);
        // Two wines (~35.9g) on the third day, one (~18g) on the others
        let mut drinks: Vec<Drink> = (0..6).map(|i| drink_on(start + Duration::days(i * 2))).collect();
        drinks.insert(3, drink_on(start + Duration::days(4)));

        let earned = earned_achievements(&drinks, Some(20.0));
        let goal = earned.iter().find(|a| a.id == "5_goal").unwrap();
        assert_eq!(goal.earned_date, "2026-04-11");

        assert!(earned_achievements(&drinks, Some(10.0)).iter().all(|a| a.id != "5_goal"));
        assert!(earned_achievements(&drinks, None).iter().all(|a| a.id != "5_goal"));
    }

    #[test]
    fn test_current_streak() {
        let today = date(2026, 5, 10);
        let days = vec![date(2026, 5, 5), date(2026, 5, 7), date(2026, 5, 8), date(2026, 5, 9)];
        assert_eq!(current_streak(&days, today), 3);

        let mut with_today = days.clone();
        with_today.push(today);
        assert_eq!(current_streak(&with_today, today), 4);

        assert_eq!(current_streak(&days[..2], today), 0);
        assert_eq!(current_streak(&[], today), 0);
    }
}
