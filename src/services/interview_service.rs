use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::identity::Identity;
use crate::models::interview::{
    Interview, InterviewDraft, InterviewPatch, Stage, INTERVIEWS_COLLECTION,
};
use crate::store::DocumentStore;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum InterviewEvent {
    Created { owner: Identity, interview: Interview },
    Updated { owner: Identity, interview: Interview },
    Removed { owner: Identity, id: Uuid },
}

impl InterviewEvent {
    pub fn owner(&self) -> &Identity {
        match self {
            InterviewEvent::Created { owner, .. }
            | InterviewEvent::Updated { owner, .. }
            | InterviewEvent::Removed { owner, .. } => owner,
        }
    }
}

/// Interview repository: every read and write goes through here, scoped to
/// the caller's identity.
#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn DocumentStore>,
    events: broadcast::Sender<InterviewEvent>,
}

impl InterviewService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    /// Receives one event per successful mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<InterviewEvent> {
        self.events.subscribe()
    }

    /// Interviews of `identity` in store order. Callers that need a stable
    /// order sort by `created_at`.
    pub async fn list(&self, identity: &Identity) -> Result<Vec<Interview>> {
        let owner = identity.require()?;
        let docs = self.store.get_all(owner, INTERVIEWS_COLLECTION).await?;
        let items = docs
            .into_iter()
            .map(Interview::from_document)
            .collect::<Result<Vec<_>>>()?;
        debug!(owner, count = items.len(), "listed interviews");
        Ok(items)
    }

    pub async fn get(&self, identity: &Identity, id: Uuid) -> Result<Interview> {
        let owner = identity.require()?;
        self.fetch(owner, id).await
    }

    pub async fn create(&self, identity: &Identity, draft: InterviewDraft) -> Result<Interview> {
        let owner = identity.require()?;
        draft.validate()?;

        let data = serde_json::to_value(&draft)?;
        let doc = self.store.create(owner, INTERVIEWS_COLLECTION, data).await?;
        let interview = Interview::from_document(doc)?;

        info!(
            owner,
            interview_id = %interview.id,
            company = %interview.details.company,
            "interview created"
        );
        self.publish(InterviewEvent::Created {
            owner: identity.clone(),
            interview: interview.clone(),
        });
        Ok(interview)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        patch: InterviewPatch,
    ) -> Result<Interview> {
        let owner = identity.require()?;
        let current = self.fetch(owner, id).await?;
        self.apply_patch(identity, current, patch).await
    }

    /// Fails with `NotFound` when nothing was deleted, including a repeated
    /// delete of the same id.
    pub async fn remove(&self, identity: &Identity, id: Uuid) -> Result<()> {
        let owner = identity.require()?;
        let deleted = self.store.delete(owner, INTERVIEWS_COLLECTION, id).await?;
        if !deleted {
            return Err(Error::interview_not_found(id));
        }

        info!(owner, interview_id = %id, "interview removed");
        self.publish(InterviewEvent::Removed {
            owner: identity.clone(),
            id,
        });
        Ok(())
    }

    pub async fn append_stage(
        &self,
        identity: &Identity,
        interview_id: Uuid,
        stage: Stage,
    ) -> Result<Interview> {
        let owner = identity.require()?;
        let current = self.fetch(owner, interview_id).await?;

        let mut stages = current.details.stages.clone();
        stages.push(stage);
        self.apply_patch(identity, current, InterviewPatch::stages(stages))
            .await
    }

    pub async fn update_stage(
        &self,
        identity: &Identity,
        interview_id: Uuid,
        index: usize,
        stage: Stage,
    ) -> Result<Interview> {
        let owner = identity.require()?;
        let current = self.fetch(owner, interview_id).await?;

        let mut stages = current.details.stages.clone();
        let slot = stages
            .get_mut(index)
            .ok_or_else(|| stage_not_found(interview_id, index))?;
        *slot = stage;
        self.apply_patch(identity, current, InterviewPatch::stages(stages))
            .await
    }

    pub async fn remove_stage(
        &self,
        identity: &Identity,
        interview_id: Uuid,
        index: usize,
    ) -> Result<Interview> {
        let owner = identity.require()?;
        let current = self.fetch(owner, interview_id).await?;

        let mut stages = current.details.stages.clone();
        if index >= stages.len() {
            return Err(stage_not_found(interview_id, index));
        }
        stages.remove(index);
        self.apply_patch(identity, current, InterviewPatch::stages(stages))
            .await
    }

    async fn fetch(&self, owner: &str, id: Uuid) -> Result<Interview> {
        let doc = self
            .store
            .get(owner, INTERVIEWS_COLLECTION, id)
            .await?
            .ok_or_else(|| Error::interview_not_found(id))?;
        Interview::from_document(doc)
    }

    /// Validates the merged record, then sends only the patched fields.
    async fn apply_patch(
        &self,
        identity: &Identity,
        current: Interview,
        patch: InterviewPatch,
    ) -> Result<Interview> {
        let owner = identity.require()?;
        patch.apply_to(&current.details).validate()?;
        if patch.is_empty() {
            return Ok(current);
        }

        let fields = patch.to_fields()?;
        let doc = self
            .store
            .patch(owner, INTERVIEWS_COLLECTION, current.id, fields)
            .await?
            // deleted between the read and the write
            .ok_or_else(|| Error::interview_not_found(current.id))?;
        let interview = Interview::from_document(doc)?;

        info!(
            owner,
            interview_id = %interview.id,
            stages = interview.details.stages.len(),
            "interview updated"
        );
        self.publish(InterviewEvent::Updated {
            owner: identity.clone(),
            interview: interview.clone(),
        });
        Ok(interview)
    }

    fn publish(&self, event: InterviewEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

fn stage_not_found(interview_id: Uuid, index: usize) -> Error {
    Error::NotFound(format!(
        "Stage {} not found on interview {}",
        index, interview_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, MockDocumentStore};
    use chrono::Utc;
    use serde_json::json;

    fn service(mock: MockDocumentStore) -> InterviewService {
        InterviewService::new(Arc::new(mock))
    }

    fn alice() -> Identity {
        Identity::from("alice")
    }

    #[tokio::test]
    async fn store_failures_surface_as_remote_unavailable() {
        let mut mock = MockDocumentStore::new();
        mock.expect_get_all()
            .returning(|_, _| Err(Error::RemoteUnavailable("connection refused".into())));
        mock.expect_create()
            .returning(|_, _, _| Err(Error::RemoteUnavailable("connection refused".into())));

        let svc = service(mock);
        let err = svc.list(&alice()).await.unwrap_err();
        assert!(matches!(err, Error::RemoteUnavailable(_)));

        let err = svc
            .create(&alice(), InterviewDraft::new("Acme"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn unauthenticated_calls_never_reach_the_store() {
        let mock = MockDocumentStore::new();
        let svc = service(mock);
        let anon = Identity::anonymous();

        assert!(matches!(svc.list(&anon).await, Err(Error::Unauthenticated)));
        assert!(matches!(
            svc.create(&anon, InterviewDraft::new("Acme")).await,
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            svc.remove(&anon, Uuid::new_v4()).await,
            Err(Error::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_the_store() {
        let svc = service(MockDocumentStore::new());
        let err = svc
            .create(&alice(), InterviewDraft::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn record_deleted_between_read_and_patch_is_not_found() {
        let id = Uuid::new_v4();
        let mut mock = MockDocumentStore::new();
        mock.expect_get().returning(move |_, _, id| {
            Ok(Some(Document {
                id,
                created_at: Utc::now(),
                data: json!({ "company": "Acme" }),
            }))
        });
        mock.expect_patch().returning(|_, _, _, _| Ok(None));

        let patch = InterviewPatch {
            company: Some("Globex".into()),
            ..InterviewPatch::default()
        };
        let err = service(mock).update(&alice(), id, patch).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_patch_returns_current_without_writing() {
        let id = Uuid::new_v4();
        let mut mock = MockDocumentStore::new();
        mock.expect_get().returning(move |_, _, id| {
            Ok(Some(Document {
                id,
                created_at: Utc::now(),
                data: json!({ "company": "Acme" }),
            }))
        });
        mock.expect_patch().never();

        let svc = service(mock);
        let mut events = svc.subscribe();
        let interview = svc
            .update(&alice(), id, InterviewPatch::default())
            .await
            .unwrap();
        assert_eq!(interview.details.company, "Acme");
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn stage_index_out_of_range_is_not_found() {
        let id = Uuid::new_v4();
        let mut mock = MockDocumentStore::new();
        mock.expect_get().returning(move |_, _, id| {
            Ok(Some(Document {
                id,
                created_at: Utc::now(),
                data: json!({ "company": "Acme", "stages": [] }),
            }))
        });

        let svc = service(mock);
        let err = svc.remove_stage(&alice(), id, 0).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
