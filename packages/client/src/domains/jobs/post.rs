//! Job post session - the "post a job" form.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, trace};
use viewstate::{Session, StateContainer};

use super::models::{Job, JobType};
use crate::common::{SessionError, SessionResult};
use crate::kernel::RemoteStore;

pub const REQUIRED_FIELDS: &str = "Please fill in all required fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPostField {
    Title,
    Company,
    Description,
    Location,
    Salary,
    /// Free text, one requirement per line.
    Requirements,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobPostState {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub salary: String,
    pub requirements: String,
    pub job_type: JobType,
    /// Set once the job was stored; the UI navigates back.
    pub posted: bool,
}

impl JobPostState {
    fn field_mut(&mut self, field: JobPostField) -> &mut String {
        match field {
            JobPostField::Title => &mut self.title,
            JobPostField::Company => &mut self.company,
            JobPostField::Description => &mut self.description,
            JobPostField::Location => &mut self.location,
            JobPostField::Salary => &mut self.salary,
            JobPostField::Requirements => &mut self.requirements,
        }
    }

    fn is_complete(&self) -> bool {
        [
            &self.title,
            &self.company,
            &self.description,
            &self.location,
            &self.salary,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPostEvent {
    Edit(JobPostField, String),
    SelectType(JobType),
    Submit,
    ClearError,
}

pub struct JobPostSession {
    container: StateContainer<JobPostState>,
    store: Arc<dyn RemoteStore>,
}

impl JobPostSession {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            container: StateContainer::named("job_post", JobPostState::default()),
            store,
        }
    }

    pub fn can_submit(&self) -> bool {
        let state = self.container.snapshot();
        !state.loading && state.data.is_complete()
    }

    fn build_job(&self, form: &JobPostState) -> SessionResult<Job> {
        if !form.is_complete() {
            return Err(SessionError::validation(REQUIRED_FIELDS));
        }
        let posted_by = self
            .store
            .current_user_id()
            .ok_or(SessionError::NotSignedIn)?;

        Ok(Job::builder()
            .title(form.title.trim())
            .company(form.company.trim())
            .description(form.description.trim())
            .location(form.location.trim())
            .salary(form.salary.trim())
            .requirements(Job::parse_requirements(&form.requirements))
            .posted_by(posted_by)
            .job_type(form.job_type)
            .build())
    }

    fn submit(&self) {
        let current = self.container.snapshot();
        if current.loading || current.data.posted {
            return;
        }
        let job = match self.build_job(&current.data) {
            Ok(job) => job,
            Err(e) => {
                self.container.update(|s| s.error = Some(e.to_string()));
                return;
            }
        };

        self.container.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let store = Arc::clone(&self.store);
        self.container.run_supervised(move |state| async move {
            store.post_job(&job).await?;
            info!(job_id = %job.id, title = %job.title, "job posted");
            state.update(|s| {
                s.data.posted = true;
                s.loading = false;
            });
            Ok::<_, SessionError>(())
        });
    }
}

impl Session for JobPostSession {
    type Event = JobPostEvent;
    type State = JobPostState;

    fn dispatch(&self, event: JobPostEvent) {
        trace!(?event, "job post event");
        match event {
            JobPostEvent::Edit(field, value) => {
                self.container.update(|s| *s.data.field_mut(field) = value)
            }
            JobPostEvent::SelectType(job_type) => {
                self.container.update(|s| s.data.job_type = job_type)
            }
            JobPostEvent::Submit => self.submit(),
            JobPostEvent::ClearError => self.container.update(|s| s.clear_error()),
        }
    }

    fn container(&self) -> &StateContainer<JobPostState> {
        &self.container
    }
}
