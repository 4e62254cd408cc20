//! # Domain models for tasks, notes, and users
//!
//! Defines the entities held by the list stores and the mapping between them
//! and the raw [`crate::remote::Record`]s of the document store. These types
//! are `Serialize + Deserialize` so they can cross component boundaries.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Task`] | A to-do item: title, [`TaskStatus`], [`Priority`], owning user, creation timestamp. |
//! | [`Note`] | A quick note: optional title, content, pinned flag, owning user, creation timestamp. |
//! | [`UserInfo`] | The authenticated identity as exposed by the auth collaborator. |
//! | [`TaskPatch`] / [`NotePatch`] | Partial updates, convertible to the field map sent with a remote partial update. |
//!
//! ## Record mapping
//!
//! Field keys follow the wire names of the document store: `title`, `status`,
//! `completed`, `priority`, `content`, `isPinned`, `userId`, `createdAt`.
//! `from_record` backfills defaults for fields absent on older records: a
//! missing `priority` becomes [`Priority::Medium`], and a missing `status`
//! derives from the legacy `completed` boolean. The boolean itself is never
//! stored on the entity — `to_fields` re-derives it from the status so the
//! two can never disagree.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::list::Identified;
use crate::remote::Record;

/// Completion state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "todo")]
    NotStarted,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "todo" => Some(TaskStatus::NotStarted),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Legacy boolean view, derived at the record boundary only.
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// Task priority. Orders `High > Medium > Low` in list views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A task owned by a single user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned id, or a temporary timestamp id pending confirmation.
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Owning-user identifier; queries are always scoped by it.
    pub owner_id: String,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Map a raw record to a task, backfilling fields absent on older records.
    pub fn from_record(record: &Record) -> Task {
        let status = field_str(&record.fields, "status")
            .and_then(TaskStatus::parse)
            .unwrap_or_else(|| {
                if field_bool(&record.fields, "completed").unwrap_or(false) {
                    TaskStatus::Done
                } else {
                    TaskStatus::NotStarted
                }
            });
        Task {
            id: record.id.clone(),
            title: field_str(&record.fields, "title").unwrap_or_default().to_string(),
            status,
            priority: field_str(&record.fields, "priority")
                .and_then(Priority::parse)
                .unwrap_or(Priority::Medium),
            owner_id: field_str(&record.fields, "userId").unwrap_or_default().to_string(),
            created_at: field_i64(&record.fields, "createdAt").unwrap_or(0),
        }
    }

    /// Full field map for a remote create. Never includes the id.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".into(), Value::from(self.title.clone()));
        fields.insert("status".into(), Value::from(self.status.as_str()));
        fields.insert("completed".into(), Value::from(self.status.is_done()));
        fields.insert("priority".into(), Value::from(self.priority.as_str()));
        fields.insert("userId".into(), Value::from(self.owner_id.clone()));
        fields.insert("createdAt".into(), Value::from(self.created_at));
        fields
    }

    /// Priority descending, then creation time descending.
    pub fn compare(a: &Task, b: &Task) -> Ordering {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then(b.created_at.cmp(&a.created_at))
    }
}

impl Identified for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update to a task. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> TaskPatch {
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        }
    }

    pub fn priority(priority: Priority) -> TaskPatch {
        TaskPatch {
            priority: Some(priority),
            ..TaskPatch::default()
        }
    }

    /// Changed fields only, for a remote partial update. A status change also
    /// rewrites the legacy `completed` flag so old readers stay consistent.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(ref title) = self.title {
            fields.insert("title".into(), Value::from(title.clone()));
        }
        if let Some(status) = self.status {
            fields.insert("status".into(), Value::from(status.as_str()));
            fields.insert("completed".into(), Value::from(status.is_done()));
        }
        if let Some(priority) = self.priority {
            fields.insert("priority".into(), Value::from(priority.as_str()));
        }
        fields
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

/// A quick note owned by a single user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    /// Optional; a note needs at least one of title/content to be persisted.
    pub title: String,
    pub content: String,
    /// Pinned notes sort before unpinned ones.
    pub pinned: bool,
    pub owner_id: String,
    pub created_at: i64,
}

impl Note {
    pub fn from_record(record: &Record) -> Note {
        Note {
            id: record.id.clone(),
            title: field_str(&record.fields, "title").unwrap_or_default().to_string(),
            content: field_str(&record.fields, "content").unwrap_or_default().to_string(),
            pinned: field_bool(&record.fields, "isPinned").unwrap_or(false),
            owner_id: field_str(&record.fields, "userId").unwrap_or_default().to_string(),
            created_at: field_i64(&record.fields, "createdAt").unwrap_or(0),
        }
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".into(), Value::from(self.title.clone()));
        fields.insert("content".into(), Value::from(self.content.clone()));
        fields.insert("isPinned".into(), Value::from(self.pinned));
        fields.insert("userId".into(), Value::from(self.owner_id.clone()));
        fields.insert("createdAt".into(), Value::from(self.created_at));
        fields
    }

    /// Pinned first, then creation time descending.
    pub fn compare(a: &Note, b: &Note) -> Ordering {
        b.pinned
            .cmp(&a.pinned)
            .then(b.created_at.cmp(&a.created_at))
    }
}

impl Identified for Note {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update to a note.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: Option<bool>,
}

impl NotePatch {
    pub fn pinned(pinned: bool) -> NotePatch {
        NotePatch {
            pinned: Some(pinned),
            ..NotePatch::default()
        }
    }

    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(ref title) = self.title {
            fields.insert("title".into(), Value::from(title.clone()));
        }
        if let Some(ref content) = self.content {
            fields.insert("content".into(), Value::from(content.clone()));
        }
        if let Some(pinned) = self.pinned {
            fields.insert("isPinned".into(), Value::from(pinned));
        }
        fields
    }

    pub fn apply(&self, note: &mut Note) {
        if let Some(ref title) = self.title {
            note.title = title.clone();
        }
        if let Some(ref content) = self.content {
            note.content = content.clone();
        }
        if let Some(pinned) = self.pinned {
            note.pinned = pinned;
        }
    }
}

/// The authenticated user as exposed by the auth collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    /// `"local"` for email+password accounts, otherwise the federated
    /// provider name (e.g. `"google"`).
    pub provider: String,
}

impl UserInfo {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

fn field_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

fn field_bool(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    fields.get(key).and_then(Value::as_bool)
}

fn field_i64(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    fields.get(key).and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, fields: Map<String, Value>) -> Record {
        Record {
            id: id.to_string(),
            fields,
        }
    }

    #[test]
    fn test_task_backfill_from_legacy_record() {
        // Old records carry only the completed boolean and no priority.
        let mut fields = Map::new();
        fields.insert("title".into(), Value::from("ship it"));
        fields.insert("completed".into(), Value::from(true));
        fields.insert("userId".into(), Value::from("u1"));
        fields.insert("createdAt".into(), Value::from(42i64));

        let task = Task::from_record(&record("t1", fields));
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.priority, Priority::Medium);

        let mut fields = Map::new();
        fields.insert("completed".into(), Value::from(false));
        let task = Task::from_record(&record("t2", fields));
        assert_eq!(task.status, TaskStatus::NotStarted);
    }

    #[test]
    fn test_task_status_wins_over_legacy_flag() {
        let mut fields = Map::new();
        fields.insert("status".into(), Value::from("in-progress"));
        fields.insert("completed".into(), Value::from(true));

        let task = Task::from_record(&record("t1", fields));
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_task_fields_derive_completed() {
        let task = Task {
            id: "t1".into(),
            title: "x".into(),
            status: TaskStatus::Done,
            priority: Priority::High,
            owner_id: "u1".into(),
            created_at: 1,
        };
        let fields = task.to_fields();
        assert_eq!(fields.get("completed"), Some(&Value::from(true)));
        assert_eq!(fields.get("status"), Some(&Value::from("done")));
        assert!(fields.get("id").is_none());
    }

    #[test]
    fn test_task_ordering_priority_then_date() {
        let task = |p: Priority, at: i64| Task {
            id: format!("{}-{at}", p.as_str()),
            title: String::new(),
            status: TaskStatus::NotStarted,
            priority: p,
            owner_id: "u1".into(),
            created_at: at,
        };
        let mut tasks = vec![
            task(Priority::Low, 10),
            task(Priority::High, 10),
            task(Priority::Medium, 10),
            task(Priority::High, 20),
        ];
        tasks.sort_by(Task::compare);
        let order: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["high-20", "high-10", "medium-10", "low-10"]);
    }

    #[test]
    fn test_note_ordering_pinned_first() {
        let note = |id: &str, pinned: bool, at: i64| Note {
            id: id.into(),
            title: String::new(),
            content: String::new(),
            pinned,
            owner_id: "u1".into(),
            created_at: at,
        };
        let mut notes = vec![note("newer", false, 20), note("pinned", true, 10)];
        notes.sort_by(Note::compare);
        assert_eq!(notes[0].id, "pinned");
        assert_eq!(notes[1].id, "newer");
    }

    #[test]
    fn test_patch_fields_and_apply() {
        let patch = TaskPatch::status(TaskStatus::Done);
        let fields = patch.fields();
        assert_eq!(fields.get("status"), Some(&Value::from("done")));
        assert_eq!(fields.get("completed"), Some(&Value::from(true)));
        assert!(fields.get("priority").is_none());

        let mut task = Task {
            id: "t1".into(),
            title: "x".into(),
            status: TaskStatus::NotStarted,
            priority: Priority::Low,
            owner_id: "u1".into(),
            created_at: 1,
        };
        patch.apply(&mut task);
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.priority, Priority::Low);

        assert!(NotePatch::default().fields().is_empty());
    }
}
