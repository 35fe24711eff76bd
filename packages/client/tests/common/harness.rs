//! Test harness: a signed-in user, a second user to talk to, and a mock store.

use std::sync::Arc;
use std::time::Duration;

use jobjet_client::domains::profile::{UserProfile, UserRole};
use jobjet_client::kernel::{MockRemoteStore, RemoteStore};
use test_context::AsyncTestContext;

use super::fixtures::profile;

pub struct TestHarness {
    pub store: Arc<MockRemoteStore>,
    /// The signed-in user.
    pub me: UserProfile,
    /// Someone `me` can chat with.
    pub other: UserProfile,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        init_tracing();

        let me = profile("Sam Seeker", "sam@jobjet.dev", UserRole::JobSeeker);
        let other = profile("Erin Employer", "erin@jobjet.dev", UserRole::Employer);
        let store = MockRemoteStore::new()
            .signed_in_as(me.id)
            .with_profile(me.clone())
            .with_profile(other.clone());

        Self {
            store: Arc::new(store),
            me,
            other,
        }
    }

    /// The mock as the trait object sessions take.
    pub fn remote(&self) -> Arc<dyn RemoteStore> {
        self.store.clone()
    }
}

/// Initialize a subscriber that respects RUST_LOG.
///
/// Run tests with: RUST_LOG=debug cargo test -- --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wait until `condition` holds, polling the store-side view of the world.
///
/// Cancellation is asynchronous; use this for assertions about it.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    let polled = tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(polled.is_ok(), "condition not reached within 2s");
}
