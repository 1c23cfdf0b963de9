//! LumenDose Status Tool
//!
//! Provides runtime status information about the LumenDose service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Drink logging instructions for AI assistants
pub const DRINK_INSTRUCTIONS: &str = r#"
# LumenDose Drink Logging Instructions

LumenDose records drinks, derives the grams of pure alcohol in each one, and
shows an illustrative picture of how the day's intake relates to six brain
regions. It is an educational tool, not medical advice.

---

## Logging a Drink

Every drink needs three things:

| Field | Meaning | Example |
|-------|---------|---------|
| `drink_type` | Free text, stored lower-cased | "beer", "wine", "spirits" |
| `volume` | Amount poured, in `unit` (default ml) | 568 |
| `abv_percent` | Alcohol by volume, 0 to 100 | 4.5 |

Alcohol grams are always derived, never entered:

**grams = volume_ml × (abv_percent / 100) × 0.789**

A UK pint (568 ml) of 4.5% beer is about 20.2 g.

### Units

`ml` (default), `cl`, `l`, `fl_oz`, `uk_fl_oz`, `pint` (568 ml), `us_pint`,
`can` (330 ml), `shot` (25 ml). A container with its size in brackets also
works: `"can (440ml)"`, `"bottle (75cl)"`.

### Timestamps

Omit `timestamp` to log at the current time. Otherwise use RFC 3339, e.g.
`2026-01-09T21:30:00Z`. Offsets are converted to UTC.

---

## Quick Adds

`log_quick_add` logs a preset in one call. Built-in presets:

| preset | volume | ABV |
|--------|--------|-----|
| `pint_of_beer` | 568 ml | 4.5% |
| `large_wine` | 175 ml | 13% |
| `shot` | 25 ml | 40% |

Create personal presets with `add_quick_add`; log them by passing their id as
`preset`.

---

## Label Scans

When a label has been read by an image recognizer, pass its raw reply to
`log_scanned_drink`. The reply must contain a JSON object such as
`{"type": "beer", "volume": 330, "abv": 5.0}` (volume in ml). Anything else is
rejected and the drink should be logged manually.

---

## Brain Impact

`analyze_brain_impact` scores one calendar day (UTC, default today).
`analyze_brain_impact_range` scores any `[start, end)` window, useful for a
night out that crosses midnight.

Scores run from 0 to 5 per region:

| Score | Level |
|-------|-------|
| ≤ 1.5 | low |
| ≤ 3.5 | moderate |
| > 3.5 | high |

Always relay the disclaimer when presenting results.

---

## Goals and Progress

- `set_daily_goal` / `get_daily_goal` / `clear_daily_goal`: daily limit in grams
- `daily_summary`: one day's total against the goal
- `weekly_totals`: grams per day for the last seven days
- `list_achievements`: milestones earned and the current logging streak
"#;

/// Runtime status of the LumenDose service
#[derive(Debug, Serialize)]
pub struct LumenDoseStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: i32,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> LumenDoseStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        LumenDoseStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version: crate::db::migrations::SCHEMA_VERSION,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
