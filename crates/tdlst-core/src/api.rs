//! Client for the remote task resource.
//!
//! [`TaskApi`] reports every failure as an [`ApiError`]. The free functions
//! below it are the fail-soft layer the UI calls: they log and fall back to a
//! neutral value so a dead backend never blocks the screen.

use reqwest::{Client, Url};
use tdlst_shared::{NewTask, Task, TaskId, TaskPatch};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("{url} answered HTTP {status}")]
    Status { status: u16, url: String },

    #[error("failed decoding response: {0}")]
    Decode(String),

    #[error("cannot build request url from {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait TaskApi {
    async fn list(&self) -> Result<Vec<Task>, ApiError>;

    /// Returns the task as stored by the server, identifier included.
    async fn create(&self, task: &NewTask) -> Result<Task, ApiError>;

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), ApiError>;

    async fn remove(&self, id: &TaskId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: Url,
}

impl HttpTaskApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn item_url(&self, id: &TaskId) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

impl TaskApi for HttpTaskApi {
    #[tracing::instrument(skip(self), fields(url = %self.base_url))]
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        let tasks = check_status(response)?.json::<Vec<Task>>().await?;
        debug!(total = tasks.len(), "listed remote tasks");
        Ok(tasks)
    }

    #[tracing::instrument(skip(self, task), fields(url = %self.base_url))]
    async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(self.base_url.clone())
            .json(task)
            .send()
            .await?;
        let created = check_status(response)?.json::<Task>().await?;
        debug!(id = %created.id, "created remote task");
        Ok(created)
    }

    #[tracing::instrument(skip(self, patch), fields(id = %id))]
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        let response = self.client.patch(url).json(patch).send().await?;
        check_status(response)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn remove(&self, id: &TaskId) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        let response = self.client.delete(url).send().await?;
        check_status(response)?;
        Ok(())
    }
}

/// Remote list, or an empty list when the call fails.
pub async fn fetch_tasks<A: TaskApi>(api: &A) -> Vec<Task> {
    match api.list().await {
        Ok(tasks) => tasks,
        Err(err) => {
            error!(error = %err, "failed fetching tasks");
            vec![]
        }
    }
}

/// Server echo of the created task, or `None` when the call fails.
pub async fn create_task<A: TaskApi>(api: &A, task: &NewTask) -> Option<Task> {
    match api.create(task).await {
        Ok(created) => Some(created),
        Err(err) => {
            error!(error = %err, "failed creating task");
            None
        }
    }
}

pub async fn update_task<A: TaskApi>(api: &A, id: &TaskId, patch: &TaskPatch) {
    if let Err(err) = api.update(id, patch).await {
        error!(error = %err, id = %id, "failed updating task");
    }
}

pub async fn remove_task<A: TaskApi>(api: &A, id: &TaskId) {
    if let Err(err) = api.remove(id).await {
        error!(error = %err, id = %id, "failed removing task");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOp {
    Update(TaskPatch),
    Remove,
}

/// One remote mutation queued behind an optimistic local change.
/// Sequence numbers grow in the order the local changes were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIntent {
    pub seq: u64,
    pub task_id: TaskId,
    pub op: RemoteOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentReport {
    pub seq: u64,
    pub task_id: TaskId,
    pub result: Result<(), ApiError>,
}

impl IntentReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[tracing::instrument(skip(api, intent), fields(seq = intent.seq, id = %intent.task_id))]
pub async fn dispatch<A: TaskApi>(api: &A, intent: &RemoteIntent) -> IntentReport {
    let result = match &intent.op {
        RemoteOp::Update(patch) => api.update(&intent.task_id, patch).await,
        RemoteOp::Remove => api.remove(&intent.task_id).await,
    };

    match &result {
        Ok(()) => info!("remote mutation applied"),
        Err(err) => warn!(error = %err, "remote mutation failed; local state kept"),
    }

    IntentReport {
        seq: intent.seq,
        task_id: intent.task_id.clone(),
        result,
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::{Cell, RefCell};

    use tdlst_shared::{NewTask, Task, TaskId, TaskPatch};

    use super::{ApiError, TaskApi};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        List,
        Create(NewTask),
        Update(TaskId, TaskPatch),
        Remove(TaskId),
    }

    /// In-memory stand-in for the remote service with canned answers.
    #[derive(Debug, Default)]
    pub struct ScriptedApi {
        pub listed: RefCell<Option<Result<Vec<Task>, ApiError>>>,
        pub created: RefCell<Option<Result<Task, ApiError>>>,
        pub fail_mutations: Cell<bool>,
        pub calls: RefCell<Vec<Call>>,
    }

    impl ScriptedApi {
        pub fn offline() -> ApiError {
            ApiError::Transport("connection refused".to_string())
        }

        fn mutation_result(&self) -> Result<(), ApiError> {
            if self.fail_mutations.get() {
                Err(Self::offline())
            } else {
                Ok(())
            }
        }
    }

    impl TaskApi for ScriptedApi {
        async fn list(&self) -> Result<Vec<Task>, ApiError> {
            self.calls.borrow_mut().push(Call::List);
            self.listed.borrow_mut().take().unwrap_or_else(|| Ok(vec![]))
        }

        async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
            self.calls.borrow_mut().push(Call::Create(task.clone()));
            self.created
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(Self::offline()))
        }

        async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), ApiError> {
            self.calls
                .borrow_mut()
                .push(Call::Update(id.clone(), patch.clone()));
            self.mutation_result()
        }

        async fn remove(&self, id: &TaskId) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(Call::Remove(id.clone()));
            self.mutation_result()
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Url;
    use tdlst_shared::{NewTask, Task, TaskId, TaskPatch};

    use super::fake::{Call, ScriptedApi};
    use super::{
        ApiError, HttpTaskApi, RemoteIntent, RemoteOp, create_task, dispatch, fetch_tasks,
        remove_task, update_task,
    };

    fn api_at(base: &str) -> HttpTaskApi {
        HttpTaskApi::new(Url::parse(base).expect("url"))
    }

    #[test]
    fn item_urls_append_one_segment() {
        let api = api_at("https://example.test/api/");
        assert_eq!(
            api.item_url(&TaskId::from(42)).expect("url").as_str(),
            "https://example.test/api/42"
        );

        let api = api_at("https://example.test/");
        assert_eq!(
            api.item_url(&TaskId::from("a b/c")).expect("url").as_str(),
            "https://example.test/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn fail_soft_wrappers_return_neutral_values() {
        let api = ScriptedApi::default();
        *api.listed.borrow_mut() = Some(Err(ScriptedApi::offline()));
        api.fail_mutations.set(true);

        assert!(fetch_tasks(&api).await.is_empty());
        assert_eq!(create_task(&api, &NewTask::new("x", "a@x.com")).await, None);
        update_task(&api, &TaskId::from(1), &TaskPatch::completed(true)).await;
        remove_task(&api, &TaskId::from(1)).await;

        assert_eq!(api.calls.borrow().len(), 4);
    }

    #[tokio::test]
    async fn create_passes_server_echo_through() {
        let api = ScriptedApi::default();
        let echoed = Task::new(42, "buy milk", "a@x.com");
        *api.created.borrow_mut() = Some(Ok(echoed.clone()));

        let created = create_task(&api, &NewTask::new("buy milk", "a@x.com")).await;
        assert_eq!(created, Some(echoed));
    }

    #[tokio::test]
    async fn dispatch_reports_outcome_per_intent() {
        let api = ScriptedApi::default();
        let update = RemoteIntent {
            seq: 1,
            task_id: TaskId::from(7),
            op: RemoteOp::Update(TaskPatch::text("renamed")),
        };
        let report = dispatch(&api, &update).await;
        assert!(report.is_ok());
        assert_eq!(report.seq, 1);

        api.fail_mutations.set(true);
        let remove = RemoteIntent {
            seq: 2,
            task_id: TaskId::from(7),
            op: RemoteOp::Remove,
        };
        let report = dispatch(&api, &remove).await;
        assert_eq!(report.result, Err(ScriptedApi::offline()));
        assert!(matches!(report.result, Err(ApiError::Transport(_))));

        assert_eq!(
            *api.calls.borrow(),
            vec![
                Call::Update(TaskId::from(7), TaskPatch::text("renamed")),
                Call::Remove(TaskId::from(7)),
            ]
        );
    }
}
