//! Screen, session and task-list state behind the UI.
//!
//! Task mutations are applied locally first. Each one hands back a
//! [`RemoteIntent`] for the caller to dispatch; the outcome is fed back
//! through [`Controller::settle`] and never rolls the local change back.

use tdlst_shared::{NewTask, Task, TaskId, TaskPatch, User};
use tracing::{debug, info, warn};

use crate::api::{self, IntentReport, RemoteIntent, RemoteOp, TaskApi};
use crate::filter::{StatusFilter, VisibleTasks};
use crate::storage::{KeyValueStore, PersistedStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Registration,
    Login,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} is already registered")]
    EmailTaken(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyText,

    #[error("no task with id {0}")]
    NotFound(TaskId),

    #[error("no signed-in author")]
    NotAuthenticated,

    #[error("the server did not accept the new task")]
    CreateFailed,
}

#[derive(Debug)]
pub struct Controller<S> {
    store: PersistedStore<S>,
    screen: Screen,
    current_user: Option<String>,
    users: Vec<User>,
    tasks: Vec<Task>,
    query: String,
    status: StatusFilter,
    revision: u64,
    next_seq: u64,
    pending: Vec<RemoteIntent>,
    failures: Vec<IntentReport>,
    visible: VisibleTasks,
}

impl<S: KeyValueStore> Controller<S> {
    /// Restores the signed-in email, the registered users and the task
    /// cache. A fresh controller always starts on the registration screen.
    ///
    /// Users live in memory from here on; the store is written through but
    /// never required, so a session works even when persistence fails.
    #[tracing::instrument(skip(store))]
    pub fn new(store: PersistedStore<S>) -> Self {
        let current_user = store.load_current_user();
        let users = store.load_users();
        let tasks = store.load_tasks();
        info!(
            cached_tasks = tasks.len(),
            users = users.len(),
            user = ?current_user,
            "restored persisted session"
        );

        Self {
            store,
            screen: Screen::Registration,
            current_user,
            users,
            tasks,
            query: String::new(),
            status: StatusFilter::Any,
            revision: 0,
            next_seq: 1,
            pending: vec![],
            failures: vec![],
            visible: VisibleTasks::default(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status
    }

    /// Bumped on every change to the task collection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending_intents(&self) -> &[RemoteIntent] {
        &self.pending
    }

    pub fn remote_failures(&self) -> &[IntentReport] {
        &self.failures
    }

    /// Hands over the recorded failures and clears the list.
    pub fn take_remote_failures(&mut self) -> Vec<IntentReport> {
        std::mem::take(&mut self.failures)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn store(&self) -> &PersistedStore<S> {
        &self.store
    }

    pub fn show_login(&mut self) {
        if self.screen == Screen::Registration {
            self.set_screen(Screen::Login);
        }
    }

    pub fn show_registration(&mut self) {
        if self.screen == Screen::Login {
            self.set_screen(Screen::Registration);
        }
    }

    #[tracing::instrument(skip(self, password))]
    pub fn register(&mut self, email: &str, password: &str) -> Result<(), RegisterError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(RegisterError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(RegisterError::MissingField("password"));
        }

        if self.users.iter().any(|u| u.email == email) {
            warn!("registration rejected: email already registered");
            return Err(RegisterError::EmailTaken(email.to_string()));
        }

        self.users.push(User::new(email, password));
        if let Err(err) = self.store.save_users(&self.users) {
            warn!(error = %err, "failed persisting users; kept for this session");
        }
        info!(registered = self.users.len(), "user registered");

        self.set_screen(Screen::Login);
        Ok(())
    }

    #[tracing::instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim();
        let Some(user) = self.users.iter().find(|u| u.matches(email, password)) else {
            warn!("login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let email = user.email.clone();
        if let Err(err) = self.store.save_current_user(Some(&email)) {
            warn!(error = %err, "failed persisting current user");
        }
        self.current_user = Some(email);
        info!("user signed in");

        self.set_screen(Screen::Authenticated);
        Ok(())
    }

    /// Signs out. The task collection is left as is.
    #[tracing::instrument(skip(self))]
    pub fn logout(&mut self) {
        self.current_user = None;
        if let Err(err) = self.store.save_current_user(None) {
            warn!(error = %err, "failed clearing current user");
        }
        info!("user signed out");
        self.set_screen(Screen::Login);
    }

    /// Issues one list call and replaces the whole collection with its
    /// result; a failed call yields an empty list.
    pub async fn initialize<A: TaskApi>(&mut self, api: &A) {
        let tasks = api::fetch_tasks(api).await;
        self.replace_tasks(tasks);
    }

    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.touch();
        info!("task collection replaced from remote list");
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.status = status;
    }

    pub fn visible_tasks(&mut self) -> &[Task] {
        self.visible
            .get(&self.tasks, self.revision, &self.query, self.status)
    }

    /// Builds the create payload. Nothing changes locally until the server
    /// echo is passed to [`Controller::accept_created`].
    pub fn prepare_task(&self, text: &str, author: &str) -> Result<NewTask, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        if author.trim().is_empty() {
            return Err(TaskError::NotAuthenticated);
        }
        Ok(NewTask::new(text, author))
    }

    #[tracing::instrument(skip(self, created))]
    pub fn accept_created(&mut self, created: Option<Task>) -> Result<&Task, TaskError> {
        let Some(task) = created else {
            warn!("task creation failed; collection unchanged");
            return Err(TaskError::CreateFailed);
        };

        debug!(id = %task.id, "prepending created task");
        self.tasks.insert(0, task);
        self.touch();
        Ok(&self.tasks[0])
    }

    pub async fn add_task<A: TaskApi>(
        &mut self,
        api: &A,
        text: &str,
        author: &str,
    ) -> Result<Task, TaskError> {
        let draft = self.prepare_task(text, author)?;
        let created = api::create_task(api, &draft).await;
        self.accept_created(created).cloned()
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle_task(&mut self, id: &TaskId) -> Result<RemoteIntent, TaskError> {
        let task = self.find_mut(id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        debug!(completed, "toggled task");

        self.touch();
        Ok(self.enqueue(id, RemoteOp::Update(TaskPatch::completed(completed))))
    }

    #[tracing::instrument(skip(self, text), fields(id = %id))]
    pub fn edit_task(&mut self, id: &TaskId, text: &str) -> Result<RemoteIntent, TaskError> {
        if text.trim().is_empty() {
            return Err(TaskError::EmptyText);
        }

        let task = self.find_mut(id)?;
        task.text = text.to_string();

        self.touch();
        Ok(self.enqueue(id, RemoteOp::Update(TaskPatch::text(text))))
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn delete_task(&mut self, id: &TaskId) -> Result<RemoteIntent, TaskError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;
        self.tasks.remove(idx);

        self.touch();
        Ok(self.enqueue(id, RemoteOp::Remove))
    }

    /// Drops the intent from the pending list. Failed reports are kept in
    /// [`Controller::remote_failures`]; local state is not touched.
    pub fn settle(&mut self, report: IntentReport) -> Option<RemoteIntent> {
        let settled = self
            .pending
            .iter()
            .position(|i| i.seq == report.seq)
            .map(|idx| self.pending.remove(idx));

        if settled.is_none() {
            debug!(seq = report.seq, "settled unknown intent");
        }
        if !report.is_ok() {
            self.failures.push(report);
        }
        settled
    }

    fn find_mut(&mut self, id: &TaskId) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| {
                warn!(id = %id, "no such task");
                TaskError::NotFound(id.clone())
            })
    }

    fn enqueue(&mut self, id: &TaskId, op: RemoteOp) -> RemoteIntent {
        let intent = RemoteIntent {
            seq: self.next_seq,
            task_id: id.clone(),
            op,
        };
        self.next_seq += 1;
        self.pending.push(intent.clone());
        intent
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        if let Err(err) = self.store.save_tasks(&self.tasks) {
            warn!(error = %err, "failed persisting task cache");
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        debug!(from = ?self.screen, to = ?screen, "screen transition");
        self.screen = screen;
    }
}
