//! Goal, Summary and Achievement MCP Tools

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::analysis::{Localizer, MessageCatalog};
use crate::db::Database;
use crate::models::{achievement_ids, current_streak, earned_achievements, parse_date, Drink, Settings};

#[derive(Debug, Serialize)]
pub struct DailyGoalResponse {
    pub goal_grams: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    pub date: String,
    pub drink_count: usize,
    pub total_alcohol_grams: f64,
    pub goal_grams: Option<f64>,
    /// Grams left before the goal is reached; zero once exceeded
    pub remaining_grams: Option<f64>,
    pub goal_exceeded: bool,
}

#[derive(Debug, Serialize)]
pub struct DayTotal {
    pub date: String,
    pub weekday: String,
    pub alcohol_grams: f64,
    pub drink_count: i64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyTotalsResponse {
    pub days: Vec<DayTotal>,
    pub total_alcohol_grams: f64,
}

#[derive(Debug, Serialize)]
pub struct AchievementDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub earned_date: String,
}

#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<AchievementDetail>,
    /// Ids not yet earned
    pub locked: Vec<&'static str>,
    pub total_drinks: usize,
    pub current_streak_days: i64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date {
        Some(d) => parse_date(d).ok_or_else(|| format!("Invalid date: '{}'. Use YYYY-MM-DD", d)),
        None => Ok(Utc::now().date_naive()),
    }
}

// ============================================================================
// Daily Goal
// ============================================================================

pub fn set_daily_goal(db: &Database, grams: f64) -> Result<DailyGoalResponse, String> {
    if !grams.is_finite() || grams <= 0.0 {
        return Err(format!("Goal must be a positive number of grams, got {}", grams));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Settings::set_daily_goal(&conn, grams).map_err(|e| format!("Failed to set goal: {}", e))?;

    tracing::info!(grams, "Daily goal set");
    Ok(DailyGoalResponse {
        goal_grams: Some(grams),
    })
}

pub fn get_daily_goal(db: &Database) -> Result<DailyGoalResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let goal_grams = Settings::daily_goal(&conn).map_err(|e| format!("Failed to read goal: {}", e))?;
    Ok(DailyGoalResponse { goal_grams })
}

pub fn clear_daily_goal(db: &Database) -> Result<DailyGoalResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Settings::clear_daily_goal(&conn).map_err(|e| format!("Failed to clear goal: {}", e))?;

    tracing::info!("Daily goal cleared");
    Ok(DailyGoalResponse { goal_grams: None })
}

// ============================================================================
// Summaries
// ============================================================================

/// Intake for one date measured against the daily goal
pub fn daily_summary(db: &Database, date: Option<&str>) -> Result<DailySummaryResponse, String> {
    let day = resolve_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let drinks = Drink::list_for_date(&conn, day)
        .map_err(|e| format!("Failed to load drinks: {}", e))?;
    let goal_grams = Settings::daily_goal(&conn).map_err(|e| format!("Failed to read goal: {}", e))?;

    let total = drinks.iter().fold(0.0, |acc, d| acc + d.alcohol_grams);

    Ok(DailySummaryResponse {
        date: day.format("%Y-%m-%d").to_string(),
        drink_count: drinks.len(),
        total_alcohol_grams: round1(total),
        goal_grams,
        remaining_grams: goal_grams.map(|g| round1((g - total).max(0.0))),
        goal_exceeded: goal_grams.map_or(false, |g| total > g),
    })
}

/// Grams per day for the seven days ending on `end_date` (default today)
pub fn weekly_totals(db: &Database, end_date: Option<&str>) -> Result<WeeklyTotalsResponse, String> {
    let end = resolve_date(end_date)?;
    let start = end
        .checked_sub_signed(Duration::days(6))
        .ok_or_else(|| format!("Invalid end_date: '{}'", end))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let logged = Drink::daily_totals(&conn, start, end)
        .map_err(|e| format!("Failed to load daily totals: {}", e))?;

    let days: Vec<DayTotal> = (0..7)
        .map(|offset| {
            let day = start + Duration::days(offset);
            let key = day.format("%Y-%m-%d").to_string();
            let found = logged.iter().find(|t| t.date == key);
            DayTotal {
                weekday: day.format("%a").to_string(),
                alcohol_grams: round1(found.map_or(0.0, |t| t.alcohol_grams)),
                drink_count: found.map_or(0, |t| t.drink_count),
                date: key,
            }
        })
        .collect();

    let total = round1(logged.iter().fold(0.0, |acc, t| acc + t.alcohol_grams));

    Ok(WeeklyTotalsResponse {
        days,
        total_alcohol_grams: total,
    })
}

// ============================================================================
// Achievements
// ============================================================================

pub fn get_achievements(db: &Database, language: Option<&str>) -> Result<AchievementsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let drinks = Drink::list_all(&conn).map_err(|e| format!("Failed to load drinks: {}", e))?;
    let dates = Drink::logged_dates(&conn).map_err(|e| format!("Failed to load dates: {}", e))?;
    let goal_grams = Settings::daily_goal(&conn).map_err(|e| format!("Failed to read goal: {}", e))?;

    let catalog = MessageCatalog::new(language.unwrap_or(crate::analysis::DEFAULT_LANGUAGE));

    let earned = earned_achievements(&drinks, goal_grams);
    let locked = achievement_ids()
        .into_iter()
        .filter(|id| earned.iter().all(|a| a.id != *id))
        .collect();

    let achievements = earned
        .into_iter()
        .map(|a| AchievementDetail {
            name: catalog.resolve(&a.name_key, &[]),
            description: catalog.resolve(&a.description_key, &[]),
            id: a.id,
            earned_date: a.earned_date,
        })
        .collect();

    Ok(AchievementsResponse {
        achievements,
        locked,
        total_drinks: drinks.len(),
        current_streak_days: current_streak(&dates, Utc::now().date_naive()),
    })
}
