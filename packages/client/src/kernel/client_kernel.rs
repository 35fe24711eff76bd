// ClientKernel - the explicitly constructed dependency root
//
// Holds the RemoteStore every session talks to. Sessions are built from the
// kernel instead of reaching for a global store instance.

use std::sync::Arc;

use super::RemoteStore;
use crate::common::JobId;
use crate::domains::auth::{LoginSession, RegisterSession};
use crate::domains::chat::ChatSession;
use crate::domains::jobs::{JobBoardSession, JobDetailSession, JobPostSession};
use crate::domains::profile::ProfileSession;

#[derive(Clone)]
pub struct ClientKernel {
    pub store: Arc<dyn RemoteStore>,
}

impl ClientKernel {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn RemoteStore> {
        Arc::clone(&self.store)
    }

    pub fn login(&self) -> LoginSession {
        LoginSession::new(self.store())
    }

    pub fn register(&self) -> RegisterSession {
        RegisterSession::new(self.store())
    }

    pub fn job_board(&self) -> JobBoardSession {
        JobBoardSession::new(self.store())
    }

    pub fn job_detail(&self, job_id: Option<JobId>) -> JobDetailSession {
        JobDetailSession::new(self.store(), job_id)
    }

    pub fn job_post(&self) -> JobPostSession {
        JobPostSession::new(self.store())
    }

    pub fn chat(&self) -> ChatSession {
        ChatSession::new(self.store())
    }

    pub fn profile(&self) -> ProfileSession {
        ProfileSession::new(self.store())
    }
}
