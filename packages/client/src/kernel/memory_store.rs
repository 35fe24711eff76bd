//! In-memory RemoteStore.
//!
//! Backs the CLI and local development. Documents live in one map per
//! collection behind a tokio `RwLock`; every write bumps a change counter,
//! and live queries re-run on each bump.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock as StdRwLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use futures::stream::{self, StreamExt};
use sha2::{Digest, Sha256};
use tokio::sync::{watch, RwLock};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

use super::traits::{RemoteStore, StoreError, StoreResult, StoreStream};
use crate::common::{JobId, RoomId, UserId};
use crate::domains::chat::{sort_messages, sort_rooms, ChatMessage, ChatRoomSummary};
use crate::domains::jobs::{sort_jobs, Job, JobType};
use crate::domains::profile::{UserProfile, UserRole};

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Documents {
    /// Keyed by lowercased email.
    accounts: HashMap<String, Account>,
    profiles: HashMap<UserId, UserProfile>,
    jobs: HashMap<JobId, Job>,
    rooms: HashMap<RoomId, ChatRoomSummary>,
    messages: HashMap<RoomId, Vec<ChatMessage>>,
}

/// Credentials of the accounts created by [`MemoryStore::seed_demo`].
#[derive(Debug, Clone)]
pub struct DemoAccounts {
    pub seeker: UserProfile,
    pub employer: UserProfile,
    pub password: String,
    pub room_id: RoomId,
}

pub struct MemoryStore {
    documents: Arc<RwLock<Documents>>,
    session: StdRwLock<Option<UserId>>,
    changes: watch::Sender<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            documents: Arc::new(RwLock::new(Documents::default())),
            session: StdRwLock::new(None),
            changes,
        }
    }

    fn hash_password(user_id: UserId, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(user_id.as_uuid().as_bytes());
        hasher.update(b":");
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn set_session(&self, user_id: Option<UserId>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = user_id;
    }

    fn require_session(&self) -> StoreResult<UserId> {
        self.current_user_id().ok_or(StoreError::NotAuthenticated)
    }

    /// Wake every live query.
    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    /// Live query: emits `query(documents)` now and after every write.
    fn live<T, F>(&self, query: F) -> StoreStream<T>
    where
        T: Send + 'static,
        F: Fn(&Documents) -> T + Send + Sync + 'static,
    {
        let documents = Arc::clone(&self.documents);
        let query = Arc::new(query);
        WatchStream::new(self.changes.subscribe())
            .then(move |_| {
                let documents = Arc::clone(&documents);
                let query = Arc::clone(&query);
                async move { Ok::<T, StoreError>(query(&*documents.read().await)) }
            })
            .boxed()
    }

    /// Create a chat room between `participants`.
    pub async fn create_room(&self, participants: impl IntoIterator<Item = UserId>) -> RoomId {
        let room = ChatRoomSummary::new(RoomId::new(), participants);
        let room_id = room.id;
        {
            let mut docs = self.documents.write().await;
            docs.rooms.insert(room_id, room);
            docs.messages.entry(room_id).or_default();
        }
        self.notify();
        debug!(%room_id, "chat room created");
        room_id
    }

    /// Populate the store with a job seeker, an employer, a few jobs, and a
    /// conversation between the two. Leaves nobody signed in.
    pub async fn seed_demo(&self, seeker_email: &str, password: &str) -> DemoAccounts {
        let seeker = UserProfile {
            id: UserId::new(),
            email: seeker_email.to_string(),
            name: "Sam Seeker".to_string(),
            role: UserRole::JobSeeker,
        };
        let employer = UserProfile {
            id: UserId::new(),
            email: "hiring@ferrous.example".to_string(),
            name: "Erin Employer".to_string(),
            role: UserRole::Employer,
        };
        let now = Utc::now();

        let jobs = [
            ("Rust Engineer", "Ferrous Systems", "Berlin", JobType::FullTime, 30),
            ("Backend Contractor", "Crab Labs", "Remote", JobType::Contract, 20),
            ("Part-time Support", "Ferrous Systems", "Oslo", JobType::PartTime, 10),
        ];

        let room = ChatRoomSummary::new(RoomId::new(), [seeker.id, employer.id]);
        let room_id = room.id;
        let conversation = [
            (employer.id, seeker.id, "Thanks for applying! Are you free for a call?", 5),
            (seeker.id, employer.id, "Yes, tomorrow works for me.", 2),
        ];

        {
            let mut docs = self.documents.write().await;
            for profile in [&seeker, &employer] {
                docs.accounts.insert(
                    profile.email.to_lowercase(),
                    Account {
                        user_id: profile.id,
                        password_hash: Self::hash_password(profile.id, password),
                    },
                );
                docs.profiles.insert(profile.id, profile.clone());
            }

            for (title, company, location, job_type, minutes_ago) in jobs {
                let job = Job::builder()
                    .title(title)
                    .company(company)
                    .description(format!("{} at {}.", title, company))
                    .location(location)
                    .salary("Competitive")
                    .requirements(vec!["Rust".to_string(), "tokio".to_string()])
                    .posted_by(employer.id)
                    .posted_date(now - Duration::minutes(minutes_ago))
                    .job_type(job_type)
                    .build();
                docs.jobs.insert(job.id, job);
            }

            let mut room = room;
            let mut messages = Vec::new();
            for (sender, receiver, content, minutes_ago) in conversation {
                let mut message = ChatMessage::outgoing(room_id, sender, receiver, content);
                message.timestamp = now - Duration::minutes(minutes_ago);
                room.last_message_preview = message.content.clone();
                room.last_message_time = message.timestamp;
                messages.push(message);
            }
            docs.rooms.insert(room_id, room);
            docs.messages.insert(room_id, messages);
        }

        self.set_session(None);
        self.notify();
        info!(seeker = %seeker.email, employer = %employer.email, "demo data seeded");

        DemoAccounts {
            seeker,
            employer,
            password: password.to_string(),
            room_id,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<()> {
        let account = {
            let docs = self.documents.read().await;
            docs.accounts.get(&email.trim().to_lowercase()).cloned()
        };
        match account {
            Some(account) if account.password_hash == Self::hash_password(account.user_id, password) => {
                self.set_session(Some(account.user_id));
                debug!(user_id = %account.user_id, "signed in");
                Ok(())
            }
            _ => Err(StoreError::InvalidCredentials),
        }
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> StoreResult<()> {
        let email = email.trim();
        let key = email.to_lowercase();
        let user_id = UserId::new();
        {
            let mut docs = self.documents.write().await;
            if docs.accounts.contains_key(&key) {
                return Err(StoreError::EmailInUse {
                    email: email.to_string(),
                });
            }
            docs.accounts.insert(
                key,
                Account {
                    user_id,
                    password_hash: Self::hash_password(user_id, password),
                },
            );
            docs.profiles.insert(
                user_id,
                UserProfile {
                    id: user_id,
                    email: email.to_string(),
                    name: name.trim().to_string(),
                    role,
                },
            );
        }
        self.set_session(Some(user_id));
        info!(%user_id, %role, "account registered");
        Ok(())
    }

    fn current_user_id(&self) -> Option<UserId> {
        *self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    async fn sign_out(&self) {
        self.set_session(None);
        debug!("signed out");
    }

    async fn fetch_profile(&self, user_id: UserId) -> StoreResult<UserProfile> {
        self.require_session()?;
        let docs = self.documents.read().await;
        docs.profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("User", user_id))
    }

    async fn save_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        if self.require_session()? != profile.id {
            return Err(StoreError::PermissionDenied);
        }
        {
            let mut docs = self.documents.write().await;
            let previous = docs
                .profiles
                .get(&profile.id)
                .cloned()
                .ok_or_else(|| StoreError::not_found("User", profile.id))?;

            let old_key = previous.email.to_lowercase();
            let new_key = profile.email.trim().to_lowercase();
            if old_key != new_key {
                if docs.accounts.contains_key(&new_key) {
                    return Err(StoreError::EmailInUse {
                        email: profile.email.clone(),
                    });
                }
                if let Some(account) = docs.accounts.remove(&old_key) {
                    docs.accounts.insert(new_key, account);
                }
            }
            docs.profiles.insert(profile.id, profile.clone());
        }
        self.notify();
        debug!(user_id = %profile.id, "profile saved");
        Ok(())
    }

    async fn post_job(&self, job: &Job) -> StoreResult<()> {
        if self.require_session()? != job.posted_by {
            return Err(StoreError::PermissionDenied);
        }
        self.documents.write().await.jobs.insert(job.id, job.clone());
        self.notify();
        info!(job_id = %job.id, title = %job.title, "job posted");
        Ok(())
    }

    async fn fetch_jobs(&self) -> StoreResult<Vec<Job>> {
        self.require_session()?;
        let docs = self.documents.read().await;
        let mut jobs: Vec<Job> = docs.jobs.values().cloned().collect();
        sort_jobs(&mut jobs);
        Ok(jobs)
    }

    async fn fetch_job(&self, job_id: JobId) -> StoreResult<Job> {
        self.require_session()?;
        let docs = self.documents.read().await;
        docs.jobs
            .get(&job_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Job", job_id))
    }

    fn subscribe_rooms(&self, user_id: UserId) -> StoreStream<Vec<ChatRoomSummary>> {
        if let Err(e) = self.require_session() {
            return stream::once(async move { Err(e) }).boxed();
        }
        self.live(move |docs| {
            let mut rooms: Vec<ChatRoomSummary> = docs
                .rooms
                .values()
                .filter(|room| room.is_participant(user_id))
                .cloned()
                .collect();
            sort_rooms(&mut rooms);
            rooms
        })
    }

    fn subscribe_messages(&self, room_id: RoomId) -> StoreStream<Vec<ChatMessage>> {
        if let Err(e) = self.require_session() {
            return stream::once(async move { Err(e) }).boxed();
        }
        self.live(move |docs| {
            let mut messages = docs.messages.get(&room_id).cloned().unwrap_or_default();
            sort_messages(&mut messages);
            messages
        })
    }

    async fn send_message(&self, message: &ChatMessage) -> StoreResult<()> {
        if self.require_session()? != message.sender_id {
            return Err(StoreError::PermissionDenied);
        }
        {
            let mut docs = self.documents.write().await;
            let room = docs
                .rooms
                .get_mut(&message.room_id)
                .ok_or_else(|| StoreError::not_found("Chat room", message.room_id))?;
            if message.sender_id == message.receiver_id
                || !room.is_participant(message.sender_id)
                || !room.is_participant(message.receiver_id)
            {
                return Err(StoreError::PermissionDenied);
            }
            room.last_message_preview = message.content.clone();
            room.last_message_time = message.timestamp;
            docs.messages
                .entry(message.room_id)
                .or_default()
                .push(message.clone());
        }
        self.notify();
        debug!(room_id = %message.room_id, message_id = %message.id, "message sent");
        Ok(())
    }
}
