mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Hard cap on list results.
const LIST_CAP: usize = 500;

/// Sort column whitelist for [`Database::list_opportunities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Created,
    Updated,
}

impl SortField {
    /// Unknown tokens fall back to the default column (updated).
    pub fn parse(s: &str) -> Self {
        match s {
            "name" => Self::Name,
            "created" => Self::Created,
            _ => Self::Updated,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Created => "created_at",
            Self::Updated => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    /// Anything other than "asc" (case-insensitive) sorts descending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Shared handle to the SQLite store.
///
/// Opened once at startup and injected into the router; clones share the
/// underlying connection. Statement-level consistency (uniqueness, cascade,
/// foreign keys) is delegated to SQLite.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        // Cascade deletes and child-row integrity depend on this pragma.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "opptrack")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("opptrack.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    /// Cheap liveness probe for the health endpoint.
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))?;
        Ok(())
    }

    // ============================================================
    // Opportunity operations
    // ============================================================

    /// Search and sort opportunities, capped at 500 rows.
    ///
    /// An empty or whitespace query matches all rows; otherwise the query
    /// must appear (case-insensitively) in the name, tech owner, business
    /// owner, or tags.
    pub fn list_opportunities(
        &self,
        q: &str,
        sort: SortField,
        dir: SortDir,
    ) -> Result<Vec<Opportunity>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let q = q.trim();
        let pattern = if q.is_empty() {
            None
        } else {
            Some(format!("%{}%", q))
        };

        // Column and direction come from the whitelists above, never from
        // the request.
        let sql = format!(
            "SELECT id, name, technology_stack, tech_owner, business_owner, first_contact_date,
                    stage, status, priority, tags, next_step_summary, next_step_due_date,
                    created_at, updated_at
             FROM opportunities
             WHERE (?1 IS NULL OR name LIKE ?1 OR tech_owner LIKE ?1
                    OR business_owner LIKE ?1 OR tags LIKE ?1)
             ORDER BY {} {} LIMIT {}",
            sort.column(),
            dir.keyword(),
            LIST_CAP
        );

        let mut stmt = conn.prepare(&sql)?;
        let opportunities = stmt
            .query_map([&pattern], |row| {
                Ok(Opportunity {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    technology_stack: row.get(2)?,
                    tech_owner: row.get(3)?,
                    business_owner: row.get(4)?,
                    first_contact_date: row.get(5)?,
                    stage: row.get(6)?,
                    status: row.get(7)?,
                    priority: row.get(8)?,
                    tags: row.get(9)?,
                    next_step_summary: row.get(10)?,
                    next_step_due_date: row.get(11)?,
                    created_at: parse_datetime(row.get::<_, String>(12)?),
                    updated_at: parse_datetime(row.get::<_, String>(13)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(opportunities)
    }

    pub fn get_opportunity(&self, id: Uuid) -> Result<Option<Opportunity>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, technology_stack, tech_owner, business_owner, first_contact_date,
                    stage, status, priority, tags, next_step_summary, next_step_due_date,
                    created_at, updated_at
             FROM opportunities WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Opportunity {
                id: parse_uuid(row.get::<_, String>(0)?),
                name: row.get(1)?,
                technology_stack: row.get(2)?,
                tech_owner: row.get(3)?,
                business_owner: row.get(4)?,
                first_contact_date: row.get(5)?,
                stage: row.get(6)?,
                status: row.get(7)?,
                priority: row.get(8)?,
                tags: row.get(9)?,
                next_step_summary: row.get(10)?,
                next_step_due_date: row.get(11)?,
                created_at: parse_datetime(row.get::<_, String>(12)?),
                updated_at: parse_datetime(row.get::<_, String>(13)?),
            }))
        } else {
            Ok(None)
        }
    }

    /// The opportunity row plus its notes and next steps, or `None` when the
    /// id matches nothing.
    pub fn get_opportunity_detail(&self, id: Uuid) -> Result<Option<OpportunityDetail>> {
        let opportunity = match self.get_opportunity(id)? {
            Some(o) => o,
            None => return Ok(None),
        };

        let notes = self.get_notes(id)?;
        let next_steps = self.get_steps(id)?;

        Ok(Some(OpportunityDetail {
            opportunity,
            notes,
            next_steps,
        }))
    }

    pub fn create_opportunity(&self, input: &OpportunityInput) -> Result<Uuid> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO opportunities
                (id, name, technology_stack, tech_owner, business_owner, first_contact_date,
                 stage, status, priority, tags, next_step_summary, next_step_due_date,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                &input.name,
                &input.technology_stack,
                &input.tech_owner,
                &input.business_owner,
                &input.first_contact_date,
                &input.stage,
                &input.status,
                input.priority,
                &input.tags,
                &input.next_step_summary,
                &input.next_step_due_date,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(id)
    }

    /// Full replace of all mutable fields. Returns false when no row matched.
    pub fn update_opportunity(&self, id: Uuid, input: &OpportunityInput) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();

        let rows = conn.execute(
            "UPDATE opportunities SET
                name = ?,
                technology_stack = ?,
                tech_owner = ?,
                business_owner = ?,
                first_contact_date = ?,
                stage = ?,
                status = ?,
                priority = ?,
                tags = ?,
                next_step_summary = ?,
                next_step_due_date = ?,
                updated_at = ?
             WHERE id = ?",
            (
                &input.name,
                &input.technology_stack,
                &input.tech_owner,
                &input.business_owner,
                &input.first_contact_date,
                &input.stage,
                &input.status,
                input.priority,
                &input.tags,
                &input.next_step_summary,
                &input.next_step_due_date,
                now.to_rfc3339(),
                id.to_string(),
            ),
        )?;

        Ok(rows > 0)
    }

    /// Deletes the opportunity; notes and next steps cascade.
    pub fn delete_opportunity(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM opportunities WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Note operations
    // ============================================================

    pub fn get_notes(&self, opportunity_id: Uuid) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, opportunity_id, note_date, content, created_at
             FROM opportunity_notes WHERE opportunity_id = ?
             ORDER BY note_date DESC, created_at DESC",
        )?;

        let notes = stmt
            .query_map([opportunity_id.to_string()], |row| {
                Ok(Note {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    opportunity_id: parse_uuid(row.get::<_, String>(1)?),
                    note_date: row.get(2)?,
                    content: row.get(3)?,
                    created_at: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    /// Inserts a note. A nonexistent opportunity surfaces as the foreign-key
    /// violation, not a pre-check.
    pub fn add_note(&self, opportunity_id: Uuid, input: &NoteInput) -> Result<Uuid> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO opportunity_notes (id, opportunity_id, note_date, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                opportunity_id.to_string(),
                &input.note_date,
                &input.content,
                now.to_rfc3339(),
            ),
        )?;

        Ok(id)
    }

    pub fn delete_note(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM opportunity_notes WHERE id = ?",
            [id.to_string()],
        )?;
        Ok(rows > 0)
    }

    // ============================================================
    // Next-step operations
    // ============================================================

    /// Steps order incomplete before complete, then due date ascending
    /// (undated first), then creation descending.
    pub fn get_steps(&self, opportunity_id: Uuid) -> Result<Vec<NextStep>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, opportunity_id, title, due_date, is_done, created_at
             FROM opportunity_next_steps WHERE opportunity_id = ?
             ORDER BY is_done ASC, due_date ASC, created_at DESC",
        )?;

        let steps = stmt
            .query_map([opportunity_id.to_string()], |row| {
                Ok(NextStep {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    opportunity_id: parse_uuid(row.get::<_, String>(1)?),
                    title: row.get(2)?,
                    due_date: row.get(3)?,
                    is_done: row.get::<_, i32>(4)? != 0,
                    created_at: parse_datetime(row.get::<_, String>(5)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(steps)
    }

    /// Inserts a next step. A nonexistent opportunity surfaces as the
    /// foreign-key violation, not a pre-check.
    pub fn add_step(&self, opportunity_id: Uuid, input: &StepInput) -> Result<Uuid> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO opportunity_next_steps (id, opportunity_id, title, due_date, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                opportunity_id.to_string(),
                &input.title,
                &input.due_date,
                now.to_rfc3339(),
            ),
        )?;

        Ok(id)
    }

    pub fn set_step_done(&self, id: Uuid, is_done: bool) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "UPDATE opportunity_next_steps SET is_done = ? WHERE id = ?",
            (if is_done { 1 } else { 0 }, id.to_string()),
        )?;
        Ok(rows > 0)
    }

    pub fn delete_step(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM opportunity_next_steps WHERE id = ?",
            [id.to_string()],
        )?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
