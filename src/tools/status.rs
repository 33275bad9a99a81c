//! BMT Status Tool
//!
//! Provides runtime status information about the BMT service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::warn;

use crate::build_info::BuildInfo;
use crate::db::{Database, DbResult};
use crate::models::{BmiRecord, UserProfile, WeightEntry};

/// BMI tracking instructions for AI assistants
pub const BMI_INSTRUCTIONS: &str = r#"
# BMT Body Metrics Instructions

This guide explains how to record body metrics and read BMI results using the
Body Metrics Tracker (BMT) tools.

## Overview

BMT stores one profile per user (weight, height, gender and the units they
were entered in). Every time a profile is saved or updated, BMT appends:
1. **Weight entry** - The weight in the unit it was entered in
2. **BMI record** - The computed BMI and its category

User ids are UUIDs issued by the sign-in provider.

---

## Input Rules

Weight and height are passed as text exactly as the user typed them.

| Field  | Unit   | Allowed range |
|--------|--------|---------------|
| Weight | kg     | 1 - 500       |
| Weight | lbs    | 2.2 - 1100    |
| Height | cm     | 50 - 250      |
| Height | inches | 20 - 100      |

Only digits and a single decimal point are accepted. No signs, no exponents,
no thousands separators. When a value is rejected the error is the message to
show the user, for example `"Weight must be between 1 and 500 kg"`.

---

## BMI Categories

| Category    | BMI         |
|-------------|-------------|
| Underweight | < 18.5      |
| Normal      | 18.5 - 24.9 |
| Overweight  | 25 - 29.9   |
| Obese       | ≥ 30        |

BMI = weight (kg) / height (m)². Pounds and inches are converted first
(1 lb = 0.453592 kg, 1 in = 2.54 cm).

The ideal weight range is BMI 18.5 to 24.9 at the user's height.

---

## Step-by-Step Workflows

### Saving a Profile

```
save_profile(
  user_id: "7f9c2ba4-e88f-4a7b-a1c3-0b2f5e6d9a10",
  weight: "154",
  weight_unit: "lbs",
  height: "69",
  height_unit: "inches",
  gender: "Female"
)
```

Saving replaces every field of an existing profile, units included.

### Updating a Profile

```
update_profile(
  user_id: "7f9c2ba4-e88f-4a7b-a1c3-0b2f5e6d9a10",
  weight: "150"
)
```

Updates read values in the units already stored on the profile. To change
units, call `save_profile` instead.

### Showing the Dashboard

```
get_dashboard(user_id: "7f9c2ba4-e88f-4a7b-a1c3-0b2f5e6d9a10")
```

Returns the latest BMI with its description, the formula breakdown, the ideal
weight range in the user's unit, weight history (last 7 days by default), BMI
history (last 30 days by default) and the category table.

### One-off Calculations

`calculate_bmi`, `ideal_weight_range` and `convert_measurement` never touch the
database. Use them for "what if" questions.

---

## Account Forms

The `validate_*` tools check sign-up, sign-in, password reset and change
password forms. Each returns `is_valid` and, when invalid, the single message
to show. Passwords need at least 8 characters, one letter and one number.
Sign-in only checks that a password was entered.

---

## Notes

- Timestamps are UTC in ISO 8601 format (`2026-01-20T08:30:00Z`)
- BMI values are stored unrounded; `bmi_display` is rounded to one decimal
"#;

#[derive(Debug, Clone, Serialize)]
pub struct RecordCounts {
    pub profiles: i64,
    pub weight_entries: i64,
    pub bmi_records: i64,
}

impl RecordCounts {
    fn load(db: &Database) -> DbResult<Self> {
        db.with_conn(|conn| {
            Ok(Self {
                profiles: UserProfile::count(conn)?,
                weight_entries: WeightEntry::count(conn)?,
                bmi_records: BmiRecord::count(conn)?,
            })
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BmtStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub records: Option<RecordCounts>,

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
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> BmtStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let records = match RecordCounts::load(db) {
            Ok(counts) => Some(counts),
            Err(e) => {
                warn!("Could not count records: {}", e);
                None
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        BmtStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            records,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
