//! Job detail session.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;
use viewstate::{Session, StateContainer};

use super::models::Job;
use crate::common::{JobId, SessionError};
use crate::kernel::RemoteStore;

pub const INVALID_JOB_ID: &str = "Invalid job ID";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobDetailState {
    pub job: Option<Job>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobDetailEvent {
    Reload,
    ClearError,
}

pub struct JobDetailSession {
    container: StateContainer<JobDetailState>,
    store: Arc<dyn RemoteStore>,
    job_id: Option<JobId>,
}

impl JobDetailSession {
    /// Create the session and fetch the job. Without an ID the session
    /// reports "Invalid job ID" and never contacts the store.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn RemoteStore>, job_id: Option<JobId>) -> Self {
        let session = Self {
            container: StateContainer::named("job_detail", JobDetailState::default()),
            store,
            job_id,
        };
        session.dispatch(JobDetailEvent::Reload);
        session
    }

    /// Like [`new`](Self::new), from an ID taken off a route.
    pub fn from_route(store: Arc<dyn RemoteStore>, raw_id: Option<&str>) -> Self {
        Self::new(store, raw_id.and_then(|raw| JobId::parse(raw).ok()))
    }

    fn load(&self) {
        let Some(job_id) = self.job_id else {
            self.container.update(|s| s.fail(INVALID_JOB_ID));
            return;
        };

        self.container.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let store = Arc::clone(&self.store);
        self.container.run_supervised(move |state| async move {
            let job = store.fetch_job(job_id).await?;
            state.update(|s| {
                s.data.job = Some(job);
                s.loading = false;
            });
            Ok::<_, SessionError>(())
        });
    }
}

impl Session for JobDetailSession {
    type Event = JobDetailEvent;
    type State = JobDetailState;

    fn dispatch(&self, event: JobDetailEvent) {
        trace!(?event, "job detail event");
        match event {
            JobDetailEvent::Reload => self.load(),
            JobDetailEvent::ClearError => self.container.update(|s| s.clear_error()),
        }
    }

    fn container(&self) -> &StateContainer<JobDetailState> {
        &self.container
    }
}
