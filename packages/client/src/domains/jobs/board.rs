//! Job board session - the job list with search and type filter.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};
use viewstate::{Session, Snapshot, StateContainer};

use super::models::{Job, JobFilter, JobType};
use crate::common::SessionError;
use crate::domains::profile::UserRole;
use crate::kernel::RemoteStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobBoardState {
    /// Every job, newest posting first.
    pub jobs: Vec<Job>,
    pub filter: JobFilter,
    /// `jobs` narrowed by `filter`.
    pub visible: Vec<Job>,
    /// Role of the signed-in user, once known.
    pub viewer_role: Option<UserRole>,
}

impl JobBoardState {
    fn refilter(&mut self) {
        self.visible = self.filter.apply(&self.jobs).into_iter().cloned().collect();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobBoardEvent {
    LoadJobs,
    Search(String),
    FilterByType(Option<JobType>),
    ClearFilters,
    ClearError,
}

pub struct JobBoardSession {
    container: StateContainer<JobBoardState>,
    store: Arc<dyn RemoteStore>,
}

impl JobBoardSession {
    /// Create the session, load the jobs, and look up the viewer's role.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let session = Self {
            container: StateContainer::named("job_board", JobBoardState::default()),
            store,
        };
        session.load_viewer_role();
        session.dispatch(JobBoardEvent::LoadJobs);
        session
    }

    /// Only employers get the "post a job" action.
    pub fn can_post_jobs(&self) -> bool {
        self.container.snapshot().data.viewer_role == Some(UserRole::Employer)
    }

    fn load_jobs(&self) {
        self.container.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let store = Arc::clone(&self.store);
        self.container.run_supervised(move |state| async move {
            let jobs = store.fetch_jobs().await?;
            debug!(count = jobs.len(), "jobs loaded");
            state.update(|s| {
                s.data.jobs = jobs;
                s.data.refilter();
                s.loading = false;
            });
            Ok::<_, SessionError>(())
        });
    }

    fn load_viewer_role(&self) {
        let Some(user_id) = self.store.current_user_id() else {
            return;
        };
        let store = Arc::clone(&self.store);
        // A missing role only hides the post action; it is not worth an error
        self.container.run_supervised_with(
            |_: &mut Snapshot<JobBoardState>, _| {},
            move |state| async move {
                let profile = store.fetch_profile(user_id).await?;
                state.update(|s| s.data.viewer_role = Some(profile.role));
                Ok::<_, SessionError>(())
            },
        );
    }

    fn set_filter(&self, change: impl FnOnce(&mut JobFilter)) {
        self.container.update(|s| {
            change(&mut s.data.filter);
            s.data.refilter();
        });
    }
}

impl Session for JobBoardSession {
    type Event = JobBoardEvent;
    type State = JobBoardState;

    fn dispatch(&self, event: JobBoardEvent) {
        trace!(?event, "job board event");
        match event {
            JobBoardEvent::LoadJobs => self.load_jobs(),
            JobBoardEvent::Search(query) => self.set_filter(|f| f.query = query),
            JobBoardEvent::FilterByType(job_type) => self.set_filter(|f| f.job_type = job_type),
            JobBoardEvent::ClearFilters => self.set_filter(|f| *f = JobFilter::default()),
            JobBoardEvent::ClearError => self.container.update(|s| s.clear_error()),
        }
    }

    fn container(&self) -> &StateContainer<JobBoardState> {
        &self.container
    }
}
