//! Client-side session: the signed-in identity plus the last fetched list of
//! interviews, both published through `watch` channels so views can react to
//! changes without owning any state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::error::Result;
use crate::models::identity::Identity;
use crate::models::interview::{Interview, InterviewOrder};
use crate::services::interview_service::InterviewService;

pub type InterviewSnapshot = Arc<Vec<Interview>>;

pub struct Session {
    identity: watch::Sender<Identity>,
    interviews: watch::Sender<InterviewSnapshot>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (identity, _) = watch::channel(Identity::anonymous());
        let (interviews, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            identity,
            interviews,
        }
    }

    /// Signing in with an empty identity is the same as signing out.
    pub fn sign_in(&self, identity: impl Into<Identity>) {
        let identity = identity.into();
        if !identity.is_authenticated() {
            self.sign_out();
            return;
        }
        info!(identity = %identity, "signed in");
        self.identity.send_replace(identity);
        self.interviews.send_replace(Arc::new(Vec::new()));
    }

    pub fn sign_out(&self) {
        let previous = self.identity.send_replace(Identity::anonymous());
        if previous.is_authenticated() {
            info!(identity = %previous, "signed out");
        }
        self.interviews.send_replace(Arc::new(Vec::new()));
    }

    pub fn identity(&self) -> Identity {
        self.identity.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.borrow().is_authenticated()
    }

    pub fn watch_identity(&self) -> watch::Receiver<Identity> {
        self.identity.subscribe()
    }

    pub fn watch_interviews(&self) -> watch::Receiver<InterviewSnapshot> {
        self.interviews.subscribe()
    }

    pub fn snapshot(&self) -> InterviewSnapshot {
        self.interviews.borrow().clone()
    }

    /// Lists the current identity's interviews, newest first, and publishes
    /// the result. A result that arrives after the identity changed is
    /// returned but not published.
    pub async fn refresh(&self, service: &InterviewService) -> Result<InterviewSnapshot> {
        let identity = self.identity();
        let mut items = service.list(&identity).await?;
        InterviewOrder::Newest.sort(&mut items);

        let snapshot = Arc::new(items);
        if *self.identity.borrow() == identity {
            self.interviews.send_replace(snapshot.clone());
        }
        Ok(snapshot)
    }
}
