//! # Resource gateways — optimistic mutation against the remote store
//!
//! [`TaskGateway`] and [`NoteGateway`] mediate between view-triggered intents
//! and the remote store for their entity kind. Both follow the same shape and
//! differ only in entity mapping and validation; each owns a
//! [`ListStore`] and reads the current identity from the shared
//! [`SessionState`].
//!
//! ## Operation pattern
//!
//! | Operation | Optimistic step | Remote call | Reconciliation |
//! |-----------|----------------|-------------|----------------|
//! | `fetch_all` | sets the loading flag | owner-scoped query | replaces the list wholesale |
//! | `add` | insert at front under a temporary id | create (fields only) | always, to pick up the store id or roll back |
//! | `update` | replace the local copy | partial field update | on failure only |
//! | `remove` | remove from the list | delete | on failure only |
//!
//! Every remote failure is caught, logged via `tracing`, and resolved by a
//! reconciliation fetch; no typed error reaches the caller. Validation
//! failures (blank required input, no authenticated user) decline silently
//! before any store mutation or remote call.
//!
//! ## Overlapping fetches
//!
//! Concurrent `fetch_all` calls for one gateway are ordered by a sequence
//! counter: a fetch that has been superseded by a newer one discards its
//! result instead of applying a stale list over a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::auth::SessionState;
use crate::list::ListStore;
use crate::models::{Note, NotePatch, Priority, Task, TaskPatch, TaskStatus};
use crate::remote::RemoteStore;

/// Current time in epoch milliseconds, platform-aware.
pub fn current_timestamp() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Gateway for the `tasks` collection.
#[derive(Clone)]
pub struct TaskGateway<R: RemoteStore> {
    remote: R,
    store: ListStore<Task>,
    session: SessionState,
    fetch_seq: Arc<AtomicU64>,
}

impl<R: RemoteStore> TaskGateway<R> {
    const COLLECTION: &'static str = "tasks";

    pub fn new(remote: R, session: SessionState) -> Self {
        TaskGateway {
            remote,
            store: ListStore::new(),
            session,
            fetch_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn store(&self) -> &ListStore<Task> {
        &self.store
    }

    /// Re-query the remote store and replace the list wholesale.
    /// No-op when nobody is signed in.
    pub async fn fetch_all(&self) {
        let Some(user) = self.session.current_user() else {
            return;
        };
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.set_loading(true);
        match self.remote.query_owned(Self::COLLECTION, &user.id).await {
            Ok(records) => {
                if self.fetch_seq.load(Ordering::SeqCst) != seq {
                    // Superseded by a newer fetch; drop the stale result.
                    return;
                }
                let mut tasks: Vec<Task> = records.iter().map(Task::from_record).collect();
                tasks.sort_by(Task::compare);
                self.store.replace_all(tasks);
                self.store.set_loading(false);
            }
            Err(err) => {
                tracing::error!("failed to fetch tasks: {err}");
                if self.fetch_seq.load(Ordering::SeqCst) == seq {
                    self.store.set_loading(false);
                }
            }
        }
    }

    /// Add a task optimistically, then reconcile to the authoritative list.
    /// Declines silently on a blank title or when nobody is signed in.
    pub async fn add(&self, title: &str, priority: Priority) {
        let Some(user) = self.session.current_user() else {
            return;
        };
        let title = title.trim();
        if title.is_empty() {
            return;
        }

        let now = current_timestamp();
        let task = Task {
            // Temporary id; replaced by the store-assigned one on reconcile.
            id: now.to_string(),
            title: title.to_string(),
            status: TaskStatus::NotStarted,
            priority,
            owner_id: user.id,
            created_at: now,
        };
        self.store.insert_front(task.clone());

        if let Err(err) = self.remote.create(Self::COLLECTION, task.to_fields()).await {
            tracing::error!("failed to create task: {err}");
        }
        self.fetch_all().await;
    }

    /// Apply a partial update optimistically. No-op when the id is unknown
    /// locally or the patch is empty; reconciles on remote failure.
    pub async fn update(&self, id: &str, patch: TaskPatch) {
        let Some(mut task) = self.store.get(id) else {
            return;
        };
        let fields = patch.fields();
        if fields.is_empty() {
            return;
        }
        patch.apply(&mut task);
        self.store.replace(task);

        if let Err(err) = self.remote.update(Self::COLLECTION, id, fields).await {
            tracing::error!("failed to update task {id}: {err}");
            self.fetch_all().await;
        }
    }

    /// Remove a task optimistically; reconciles on remote failure.
    pub async fn remove(&self, id: &str) {
        self.store.remove(id);
        if let Err(err) = self.remote.delete(Self::COLLECTION, id).await {
            tracing::error!("failed to delete task {id}: {err}");
            self.fetch_all().await;
        }
    }
}

/// Gateway for the `notes` collection.
#[derive(Clone)]
pub struct NoteGateway<R: RemoteStore> {
    remote: R,
    store: ListStore<Note>,
    session: SessionState,
    fetch_seq: Arc<AtomicU64>,
}

impl<R: RemoteStore> NoteGateway<R> {
    const COLLECTION: &'static str = "notes";

    pub fn new(remote: R, session: SessionState) -> Self {
        NoteGateway {
            remote,
            store: ListStore::new(),
            session,
            fetch_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn store(&self) -> &ListStore<Note> {
        &self.store
    }

    pub async fn fetch_all(&self) {
        let Some(user) = self.session.current_user() else {
            return;
        };
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.set_loading(true);
        match self.remote.query_owned(Self::COLLECTION, &user.id).await {
            Ok(records) => {
                if self.fetch_seq.load(Ordering::SeqCst) != seq {
                    return;
                }
                let mut notes: Vec<Note> = records.iter().map(Note::from_record).collect();
                notes.sort_by(Note::compare);
                self.store.replace_all(notes);
                self.store.set_loading(false);
            }
            Err(err) => {
                tracing::error!("failed to fetch notes: {err}");
                if self.fetch_seq.load(Ordering::SeqCst) == seq {
                    self.store.set_loading(false);
                }
            }
        }
    }

    /// Add a note optimistically. A note needs at least one of title/content
    /// to be non-blank; otherwise the call declines silently.
    pub async fn add(&self, title: &str, content: &str) {
        let Some(user) = self.session.current_user() else {
            return;
        };
        if title.trim().is_empty() && content.trim().is_empty() {
            return;
        }

        let now = current_timestamp();
        let note = Note {
            id: now.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            pinned: false,
            owner_id: user.id,
            created_at: now,
        };
        self.store.insert_front(note.clone());

        if let Err(err) = self.remote.create(Self::COLLECTION, note.to_fields()).await {
            tracing::error!("failed to create note: {err}");
        }
        self.fetch_all().await;
    }

    pub async fn update(&self, id: &str, patch: NotePatch) {
        let Some(mut note) = self.store.get(id) else {
            return;
        };
        let fields = patch.fields();
        if fields.is_empty() {
            return;
        }
        patch.apply(&mut note);
        self.store.replace(note);

        if let Err(err) = self.remote.update(Self::COLLECTION, id, fields).await {
            tracing::error!("failed to update note {id}: {err}");
            self.fetch_all().await;
        }
    }

    pub async fn remove(&self, id: &str) {
        self.store.remove(id);
        if let Err(err) = self.remote.delete(Self::COLLECTION, id).await {
            tracing::error!("failed to delete note {id}: {err}");
            self.fetch_all().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use futures::channel::oneshot;

    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::UserInfo;
    use crate::remote::{Record, RemoteError};

    fn signed_in_session() -> SessionState {
        let session = SessionState::new();
        session.set_user(Some(UserInfo {
            id: "u1".to_string(),
            email: "ana@example.com".to_string(),
            name: None,
            provider: "local".to_string(),
        }));
        session
    }

    fn task_gateway() -> (TaskGateway<MemoryStore>, MemoryStore) {
        let remote = MemoryStore::new();
        let gateway = TaskGateway::new(remote.clone(), signed_in_session());
        (gateway, remote)
    }

    fn note_gateway() -> (NoteGateway<MemoryStore>, MemoryStore) {
        let remote = MemoryStore::new();
        let gateway = NoteGateway::new(remote.clone(), signed_in_session());
        (gateway, remote)
    }

    async fn seed_task(
        remote: &MemoryStore,
        title: &str,
        priority: &str,
        created_at: i64,
    ) -> String {
        let mut fields = serde_json::Map::new();
        fields.insert("title".into(), serde_json::Value::from(title));
        fields.insert("status".into(), serde_json::Value::from("todo"));
        fields.insert("priority".into(), serde_json::Value::from(priority));
        fields.insert("userId".into(), serde_json::Value::from("u1"));
        fields.insert("createdAt".into(), serde_json::Value::from(created_at));
        remote.create("tasks", fields).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_creates_and_reconciles_id() {
        let (gateway, remote) = task_gateway();
        gateway.add("buy milk", Priority::High).await;

        let items = gateway.store().items();
        assert_eq!(items.len(), 1);
        let task = &items[0];
        assert_eq!(task.title, "buy milk");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.owner_id, "u1");
        // The temporary timestamp id was replaced by the store-assigned one.
        assert_eq!(task.id, "r1");
        assert_eq!(remote.len("tasks"), 1);
        assert!(!gateway.store().loading());
    }

    #[tokio::test]
    async fn test_add_is_visible_before_confirmation() {
        let (gateway, _remote) = task_gateway();
        let mut rx = gateway.store().subscribe();
        gateway.add("buy milk", Priority::Medium).await;

        // Some snapshot between insert and reconcile must carry the
        // temporary id.
        let mut saw_temporary = false;
        while let Ok(Some(snapshot)) = rx.try_next() {
            if snapshot.items.iter().any(|t| t.id != "r1" && !t.id.is_empty()) {
                saw_temporary = true;
            }
        }
        assert!(saw_temporary);
    }

    #[tokio::test]
    async fn test_add_blank_title_is_a_noop() {
        let (gateway, remote) = task_gateway();
        gateway.add("   ", Priority::Low).await;
        assert!(gateway.store().items().is_empty());
        assert_eq!(remote.call_count(), 0);
    }

    #[tokio::test]
    async fn test_add_without_user_is_a_noop() {
        let remote = MemoryStore::new();
        let gateway = TaskGateway::new(remote.clone(), SessionState::new());
        gateway.add("buy milk", Priority::Low).await;
        assert!(gateway.store().items().is_empty());
        assert_eq!(remote.call_count(), 0);
    }

    #[tokio::test]
    async fn test_add_failure_rolls_back_via_reconcile() {
        let (gateway, remote) = task_gateway();
        remote.fail_next(1);
        gateway.add("buy milk", Priority::Medium).await;
        assert!(gateway.store().items().is_empty());
        assert_eq!(remote.len("tasks"), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_orders_by_priority_then_date() {
        let (gateway, remote) = task_gateway();
        seed_task(&remote, "low", "low", 100).await;
        seed_task(&remote, "high", "high", 100).await;
        seed_task(&remote, "medium", "medium", 100).await;

        gateway.fetch_all().await;
        let titles: Vec<String> = gateway
            .store()
            .items()
            .iter()
            .map(|t| t.title.clone())
            .collect();
        assert_eq!(titles, vec!["high", "medium", "low"]);
    }

    #[tokio::test]
    async fn test_fetch_all_backfills_legacy_records() {
        let (gateway, remote) = task_gateway();
        let mut fields = serde_json::Map::new();
        fields.insert("title".into(), serde_json::Value::from("old"));
        fields.insert("completed".into(), serde_json::Value::from(true));
        fields.insert("userId".into(), serde_json::Value::from("u1"));
        fields.insert("createdAt".into(), serde_json::Value::from(5i64));
        remote.create("tasks", fields).await.unwrap();

        gateway.fetch_all().await;
        let items = gateway.store().items();
        assert_eq!(items[0].status, TaskStatus::Done);
        assert_eq!(items[0].priority, Priority::Medium);
    }

    #[tokio::test]
    async fn test_fetch_all_only_sees_own_records() {
        let (gateway, remote) = task_gateway();
        seed_task(&remote, "mine", "low", 1).await;
        let mut fields = serde_json::Map::new();
        fields.insert("title".into(), serde_json::Value::from("theirs"));
        fields.insert("userId".into(), serde_json::Value::from("u2"));
        remote.create("tasks", fields).await.unwrap();

        gateway.fetch_all().await;
        let items = gateway.store().items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "mine");
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_list() {
        let (gateway, remote) = task_gateway();
        seed_task(&remote, "keep", "low", 1).await;
        gateway.fetch_all().await;

        remote.fail_next(1);
        gateway.fetch_all().await;
        assert_eq!(gateway.store().items().len(), 1);
        assert!(!gateway.store().loading());
    }

    #[tokio::test]
    async fn test_update_applies_and_persists() {
        let (gateway, remote) = task_gateway();
        let id = seed_task(&remote, "task", "low", 1).await;
        gateway.fetch_all().await;

        gateway.update(&id, TaskPatch::status(TaskStatus::Done)).await;
        assert_eq!(gateway.store().get(&id).unwrap().status, TaskStatus::Done);

        let records = remote.query_owned("tasks", "u1").await.unwrap();
        assert_eq!(
            records[0].fields.get("status"),
            Some(&serde_json::Value::from("done")),
        );
        assert_eq!(
            records[0].fields.get("completed"),
            Some(&serde_json::Value::from(true)),
        );
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_a_noop() {
        let (gateway, remote) = task_gateway();
        gateway
            .update("missing", TaskPatch::status(TaskStatus::Done))
            .await;
        assert!(gateway.store().items().is_empty());
        assert_eq!(remote.call_count(), 0);
    }

    #[tokio::test]
    async fn test_update_failure_reverts_via_reconcile() {
        let (gateway, remote) = task_gateway();
        let id = seed_task(&remote, "task", "low", 1).await;
        gateway.fetch_all().await;

        remote.fail_next(1);
        gateway.update(&id, TaskPatch::priority(Priority::High)).await;
        assert_eq!(gateway.store().get(&id).unwrap().priority, Priority::Low);
    }

    #[tokio::test]
    async fn test_remove_is_immediate_and_persists() {
        let (gateway, remote) = task_gateway();
        let id = seed_task(&remote, "task", "low", 1).await;
        gateway.fetch_all().await;

        gateway.remove(&id).await;
        assert!(gateway.store().items().is_empty());
        assert_eq!(remote.len("tasks"), 0);
    }

    #[tokio::test]
    async fn test_remove_failure_restores_via_reconcile() {
        let (gateway, remote) = task_gateway();
        let id = seed_task(&remote, "task", "low", 1).await;
        gateway.fetch_all().await;

        remote.fail_next(1);
        gateway.remove(&id).await;
        assert_eq!(gateway.store().items().len(), 1);
        assert_eq!(gateway.store().items()[0].id, id);
    }

    #[tokio::test]
    async fn test_note_add_requires_title_or_content() {
        let (gateway, remote) = note_gateway();
        gateway.add("  ", "\t").await;
        assert!(gateway.store().items().is_empty());
        assert_eq!(remote.call_count(), 0);

        gateway.add("", "just content").await;
        assert_eq!(gateway.store().items().len(), 1);
        assert_eq!(gateway.store().items()[0].content, "just content");
        assert!(!gateway.store().items()[0].pinned);
    }

    #[tokio::test]
    async fn test_note_ordering_pinned_first() {
        let (gateway, remote) = note_gateway();
        let mut fields = serde_json::Map::new();
        fields.insert("title".into(), serde_json::Value::from("pinned early"));
        fields.insert("isPinned".into(), serde_json::Value::from(true));
        fields.insert("userId".into(), serde_json::Value::from("u1"));
        fields.insert("createdAt".into(), serde_json::Value::from(10i64));
        remote.create("notes", fields).await.unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("title".into(), serde_json::Value::from("unpinned late"));
        fields.insert("isPinned".into(), serde_json::Value::from(false));
        fields.insert("userId".into(), serde_json::Value::from("u1"));
        fields.insert("createdAt".into(), serde_json::Value::from(20i64));
        remote.create("notes", fields).await.unwrap();

        gateway.fetch_all().await;
        let items = gateway.store().items();
        assert_eq!(items[0].title, "pinned early");
        assert_eq!(items[1].title, "unpinned late");
    }

    /// Remote store returning canned query results, each released by a
    /// oneshot gate so tests control completion order.
    #[derive(Clone, Default)]
    struct ScriptedStore {
        queries: Arc<Mutex<VecDeque<(oneshot::Receiver<()>, Vec<Record>)>>>,
    }

    impl ScriptedStore {
        fn stage_query(&self, records: Vec<Record>) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.queries.lock().unwrap().push_back((rx, records));
            tx
        }
    }

    impl RemoteStore for ScriptedStore {
        async fn query_owned(
            &self,
            _collection: &str,
            _owner_id: &str,
        ) -> Result<Vec<Record>, RemoteError> {
            let staged = self.queries.lock().unwrap().pop_front();
            match staged {
                Some((gate, records)) => {
                    let _ = gate.await;
                    Ok(records)
                }
                None => Ok(Vec::new()),
            }
        }

        async fn create(
            &self,
            _collection: &str,
            _fields: serde_json::Map<String, serde_json::Value>,
        ) -> Result<String, RemoteError> {
            Err(RemoteError::Unavailable)
        }

        async fn update(
            &self,
            _collection: &str,
            _id: &str,
            _fields: serde_json::Map<String, serde_json::Value>,
        ) -> Result<(), RemoteError> {
            Err(RemoteError::Unavailable)
        }

        async fn delete(&self, _collection: &str, _id: &str) -> Result<(), RemoteError> {
            Err(RemoteError::Unavailable)
        }
    }

    fn task_record(id: &str, title: &str) -> Record {
        let mut fields = serde_json::Map::new();
        fields.insert("title".into(), serde_json::Value::from(title));
        fields.insert("userId".into(), serde_json::Value::from("u1"));
        fields.insert("createdAt".into(), serde_json::Value::from(1i64));
        Record {
            id: id.to_string(),
            fields,
        }
    }

    #[tokio::test]
    async fn test_superseded_fetch_discards_stale_result() {
        let remote = ScriptedStore::default();
        let gateway = TaskGateway::new(remote.clone(), signed_in_session());

        let release_stale = remote.stage_query(vec![task_record("r1", "stale")]);
        let release_fresh = remote.stage_query(vec![task_record("r2", "fresh")]);

        let first = tokio::spawn({
            let gateway = gateway.clone();
            async move { gateway.fetch_all().await }
        });
        // Let the first fetch claim its query before starting the second.
        tokio::task::yield_now().await;
        let second = tokio::spawn({
            let gateway = gateway.clone();
            async move { gateway.fetch_all().await }
        });
        tokio::task::yield_now().await;

        // The newer fetch completes first and applies its list.
        release_fresh.send(()).unwrap();
        second.await.unwrap();
        assert_eq!(gateway.store().items()[0].title, "fresh");

        // The slower, superseded fetch must not overwrite it.
        release_stale.send(()).unwrap();
        first.await.unwrap();

        let items = gateway.store().items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "fresh");
        assert!(!gateway.store().loading());
    }

    #[tokio::test]
    async fn test_note_pin_toggle_round_trip() {
        let (gateway, remote) = note_gateway();
        gateway.add("idea", "").await;
        let id = gateway.store().items()[0].id.clone();

        gateway.update(&id, NotePatch::pinned(true)).await;
        assert!(gateway.store().get(&id).unwrap().pinned);

        let records = remote.query_owned("notes", "u1").await.unwrap();
        assert_eq!(
            records[0].fields.get("isPinned"),
            Some(&serde_json::Value::from(true)),
        );
    }
}
