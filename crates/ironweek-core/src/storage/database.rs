//! SQLite-backed challenge storage.
//!
//! One file holds the whole challenge: the roster, every logged workout, and
//! every goal. The workout log is the ground truth; the tier, counters, and
//! active flag on each participant row are snapshots the orchestrator derives
//! from it and rewrites wholesale.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::data_dir;
use super::migrations;
use crate::challenge::{Goal, Participant, Snapshot, WorkoutKind, WorkoutRecord};
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::orchestrator::ChallengeStore;
use crate::progression::Tier;

// === Helper Functions ===

/// Format workout kind for database storage
fn format_workout_kind(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Standard => "standard",
        WorkoutKind::Steps => "steps",
    }
}

/// Parse workout kind from database string
fn parse_workout_kind(kind_str: &str) -> WorkoutKind {
    match kind_str {
        "steps" => WorkoutKind::Steps,
        _ => WorkoutKind::Standard,
    }
}

/// Parse a tier column. The CHECK constraint keeps bad values out of the
/// table, so the fallback only matters for hand-edited databases.
fn parse_tier(value: i64) -> Tier {
    Tier::try_from(value).unwrap_or(Tier::Five)
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build a Participant from a database row
fn row_to_participant(row: &rusqlite::Row) -> Result<Participant, rusqlite::Error> {
    Ok(Participant {
        id: row.get(0)?,
        name: row.get(1)?,
        ceiling: parse_tier(row.get(2)?),
        tier: parse_tier(row.get(3)?),
        clean_weeks: row.get(4)?,
        missed_weeks: row.get(5)?,
        total_points: row.get(6)?,
        active: row.get(7)?,
        joined_at: parse_datetime_fallback(&row.get::<_, String>(8)?),
        updated_at: parse_datetime_fallback(&row.get::<_, String>(9)?),
        reactivation_checkpoint: row.get(10)?,
    })
}

/// Build a WorkoutRecord from a database row
fn row_to_workout(row: &rusqlite::Row) -> Result<WorkoutRecord, rusqlite::Error> {
    let kind_str: String = row.get(3)?;
    Ok(WorkoutRecord {
        participant_id: row.get(0)?,
        week: row.get(1)?,
        day: row.get(2)?,
        kind: parse_workout_kind(&kind_str),
        completed: row.get(4)?,
        logged_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
    })
}

/// Build a Goal from a database row
fn row_to_goal(row: &rusqlite::Row) -> Result<Goal, rusqlite::Error> {
    let completed_at: Option<String> = row.get(6)?;
    Ok(Goal {
        id: row.get(0)?,
        participant_id: row.get(1)?,
        title: row.get(2)?,
        category: row.get(3)?,
        completed: row.get(4)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
        completed_at: completed_at.as_deref().map(parse_datetime_fallback),
    })
}

const PARTICIPANT_COLUMNS: &str = "id, name, ceiling, tier, clean_weeks, missed_weeks, \
     total_points, active, joined_at, updated_at, reactivation_checkpoint";

/// SQLite database for challenge storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/ironweek/ironweek.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("ironweek.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path, creating the schema if needed.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        // Base tables (v1 schema) first
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS participants (
                    id           TEXT PRIMARY KEY,
                    name         TEXT NOT NULL UNIQUE,
                    ceiling      INTEGER NOT NULL CHECK (ceiling IN (3, 4, 5)),
                    tier         INTEGER NOT NULL CHECK (tier IN (3, 4, 5)),
                    clean_weeks  INTEGER NOT NULL DEFAULT 0,
                    missed_weeks INTEGER NOT NULL DEFAULT 0,
                    total_points INTEGER NOT NULL DEFAULT 0,
                    active       INTEGER NOT NULL DEFAULT 1,
                    joined_at    TEXT NOT NULL,
                    updated_at   TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS workouts (
                    id             INTEGER PRIMARY KEY AUTOINCREMENT,
                    participant_id TEXT NOT NULL,
                    week           INTEGER NOT NULL CHECK (week >= 1),
                    day            INTEGER NOT NULL CHECK (day BETWEEN 1 AND 7),
                    kind           TEXT NOT NULL DEFAULT 'standard',
                    completed      INTEGER NOT NULL DEFAULT 1,
                    logged_at      TEXT NOT NULL,
                    UNIQUE (participant_id, week, day)
                );

                CREATE TABLE IF NOT EXISTS goals (
                    id             TEXT PRIMARY KEY,
                    participant_id TEXT NOT NULL,
                    title          TEXT NOT NULL,
                    category       TEXT,
                    completed      INTEGER NOT NULL DEFAULT 0,
                    created_at     TEXT NOT NULL,
                    completed_at   TEXT
                );

                -- Indexes for replay and goal counting
                CREATE INDEX IF NOT EXISTS idx_workouts_participant_week
                    ON workouts(participant_id, week);
                CREATE INDEX IF NOT EXISTS idx_goals_participant
                    ON goals(participant_id);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        // Incremental migrations (v1 -> v2, etc.)
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        Ok(())
    }

    fn participant_by_id(&self, participant_id: &str) -> Result<Option<Participant>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?1"
        ))?;
        let participant = stmt
            .query_row(params![participant_id], row_to_participant)
            .optional()?;
        Ok(participant)
    }

    // === Participants ===

    /// Register a new participant. Names are unique per challenge.
    pub fn add_participant(&self, participant: &Participant) -> Result<()> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM participants WHERE name = ?1)",
            params![participant.name],
            |row| row.get(0),
        )?;
        if exists {
            return Err(ValidationError::InvalidValue {
                field: "name".to_string(),
                message: format!("participant '{}' already exists", participant.name),
            }
            .into());
        }

        self.conn.execute(
            "INSERT INTO participants (
                id, name, ceiling, tier, clean_weeks, missed_weeks, total_points,
                active, joined_at, updated_at, reactivation_checkpoint
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                participant.id,
                participant.name,
                u8::from(participant.ceiling),
                u8::from(participant.tier),
                participant.clean_weeks,
                participant.missed_weeks,
                participant.total_points,
                participant.active,
                participant.joined_at.to_rfc3339(),
                participant.updated_at.to_rfc3339(),
                participant.reactivation_checkpoint,
            ],
        )?;
        Ok(())
    }

    /// Look up a participant by id, falling back to name.
    pub fn resolve_participant(&self, key: &str) -> Result<Participant> {
        if let Some(participant) = self.participant_by_id(key)? {
            return Ok(participant);
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE name = ?1"
        ))?;
        let found = stmt.query_row(params![key], row_to_participant).optional()?;
        found.ok_or_else(|| CoreError::UnknownParticipant(key.to_string()))
    }

    /// The whole roster, active and eliminated, in signup order.
    pub fn list_participants(&self) -> Result<Vec<Participant>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants ORDER BY joined_at ASC, name ASC"
        ))?;
        let rows = stmt.query_map([], row_to_participant)?;
        let mut participants = Vec::new();
        for row in rows {
            participants.push(row?);
        }
        Ok(participants)
    }

    /// Correct a participant's signup ceiling.
    pub fn set_ceiling(&self, participant_id: &str, ceiling: Tier) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE participants SET ceiling = ?2, updated_at = ?3 WHERE id = ?1",
            params![
                participant_id,
                u8::from(ceiling),
                Utc::now().to_rfc3339()
            ],
        )?;
        if affected == 0 {
            return Err(CoreError::UnknownParticipant(participant_id.to_string()));
        }
        Ok(())
    }

    /// Let an eliminated participant back in. Misses in weeks before
    /// `checkpoint` stop counting toward elimination.
    pub fn reactivate(&self, participant_id: &str, checkpoint: u32) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE participants
             SET active = 1, reactivation_checkpoint = ?2, updated_at = ?3
             WHERE id = ?1",
            params![participant_id, checkpoint, Utc::now().to_rfc3339()],
        )?;
        if affected == 0 {
            return Err(CoreError::UnknownParticipant(participant_id.to_string()));
        }
        Ok(())
    }

    /// Delete a participant along with their workouts and goals.
    pub fn remove_participant(&self, participant_id: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM workouts WHERE participant_id = ?1",
            params![participant_id],
        )?;
        tx.execute(
            "DELETE FROM goals WHERE participant_id = ?1",
            params![participant_id],
        )?;
        let affected = tx.execute(
            "DELETE FROM participants WHERE id = ?1",
            params![participant_id],
        )?;
        if affected == 0 {
            return Err(CoreError::UnknownParticipant(participant_id.to_string()));
        }
        tx.commit()?;
        Ok(())
    }

    // === Workouts ===

    /// Record a workout. Logging the same (participant, week, day) again
    /// replaces the earlier record, so re-logging toggles state rather than
    /// stacking duplicates.
    pub fn log_workout(&self, record: &WorkoutRecord) -> Result<()> {
        if self.participant_by_id(&record.participant_id)?.is_none() {
            return Err(CoreError::UnknownParticipant(
                record.participant_id.clone(),
            ));
        }
        self.conn.execute(
            "INSERT OR REPLACE INTO workouts
                (participant_id, week, day, kind, completed, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.participant_id,
                record.week,
                record.day,
                format_workout_kind(record.kind),
                record.completed,
                record.logged_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Workout records for one week, in day order.
    pub fn workouts_for_week(&self, participant_id: &str, week: u32) -> Result<Vec<WorkoutRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT participant_id, week, day, kind, completed, logged_at
             FROM workouts
             WHERE participant_id = ?1 AND week = ?2
             ORDER BY day ASC",
        )?;
        let rows = stmt.query_map(params![participant_id, week], row_to_workout)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    // === Goals ===

    /// Add a personal goal.
    pub fn add_goal(&self, goal: &Goal) -> Result<()> {
        if self.participant_by_id(&goal.participant_id)?.is_none() {
            return Err(CoreError::UnknownParticipant(goal.participant_id.clone()));
        }
        self.conn.execute(
            "INSERT INTO goals (id, participant_id, title, category, completed, created_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.id,
                goal.participant_id,
                goal.title,
                goal.category,
                goal.completed,
                goal.created_at.to_rfc3339(),
                goal.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// A participant's goals in creation order.
    pub fn list_goals(&self, participant_id: &str) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, participant_id, title, category, completed, created_at, completed_at
             FROM goals
             WHERE participant_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![participant_id], row_to_goal)?;
        let mut goals = Vec::new();
        for row in rows {
            goals.push(row?);
        }
        Ok(goals)
    }

    /// Mark a goal completed. Completing an already-completed goal keeps the
    /// original completion time.
    pub fn complete_goal(&self, goal_id: &str) -> Result<Goal> {
        let affected = self.conn.execute(
            "UPDATE goals
             SET completed = 1, completed_at = COALESCE(completed_at, ?2)
             WHERE id = ?1",
            params![goal_id, Utc::now().to_rfc3339()],
        )?;
        if affected == 0 {
            return Err(CoreError::UnknownGoal(goal_id.to_string()));
        }
        self.get_goal(goal_id)
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        let mut stmt = self.conn.prepare(
            "SELECT id, participant_id, title, category, completed, created_at, completed_at
             FROM goals WHERE id = ?1",
        )?;
        let goal = stmt.query_row(params![goal_id], row_to_goal).optional()?;
        goal.ok_or_else(|| CoreError::UnknownGoal(goal_id.to_string()))
    }

    /// Delete a goal.
    pub fn remove_goal(&self, goal_id: &str) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1", params![goal_id])?;
        if affected == 0 {
            return Err(CoreError::UnknownGoal(goal_id.to_string()));
        }
        Ok(())
    }
}

impl ChallengeStore for Database {
    fn active_participants(&self) -> Result<Vec<Participant>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants
             WHERE active = 1 ORDER BY joined_at ASC, name ASC"
        ))?;
        let rows = stmt.query_map([], row_to_participant)?;
        let mut participants = Vec::new();
        for row in rows {
            participants.push(row?);
        }
        Ok(participants)
    }

    fn participant(&self, participant_id: &str) -> Result<Participant> {
        self.participant_by_id(participant_id)?
            .ok_or_else(|| CoreError::UnknownParticipant(participant_id.to_string()))
    }

    fn workout_history(
        &self,
        participant_id: &str,
        through_week: u32,
    ) -> Result<Vec<WorkoutRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT participant_id, week, day, kind, completed, logged_at
             FROM workouts
             WHERE participant_id = ?1 AND week <= ?2
             ORDER BY week ASC, day ASC",
        )?;
        let rows = stmt.query_map(params![participant_id, through_week], row_to_workout)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn completed_goal_count(&self, participant_id: &str) -> Result<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM goals WHERE participant_id = ?1 AND completed = 1",
            params![participant_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn apply_snapshot(&self, participant_id: &str, snapshot: &Snapshot) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE participants
             SET tier = ?2, clean_weeks = ?3, missed_weeks = ?4,
                 total_points = ?5, active = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                participant_id,
                u8::from(snapshot.tier),
                snapshot.clean_weeks,
                snapshot.missed_weeks,
                snapshot.total_points,
                snapshot.active,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if affected == 0 {
            return Err(CoreError::UnknownParticipant(participant_id.to_string()));
        }
        Ok(())
    }
}
