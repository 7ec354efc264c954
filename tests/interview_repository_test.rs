use std::sync::Arc;

use chrono::{TimeZone, Utc};
use interview_tracker::error::Error;
use interview_tracker::models::identity::Identity;
use interview_tracker::models::interview::{InterviewDraft, InterviewPatch, Stage};
use interview_tracker::services::interview_service::{InterviewEvent, InterviewService};
use interview_tracker::store::MemoryDocumentStore;
use rust_decimal::Decimal;
use serde_json::json;

fn setup() -> (InterviewService, MemoryDocumentStore) {
    let store = MemoryDocumentStore::new();
    let service = InterviewService::new(Arc::new(store.clone()));
    (service, store)
}

fn stage(name: &str, day: u32) -> Stage {
    Stage {
        name: name.to_string(),
        date: Utc.with_ymd_and_hms(2024, 6, day, 9, 30, 0).unwrap(),
        description: Some(format!("{} notes", name)),
    }
}

fn full_draft() -> InterviewDraft {
    InterviewDraft {
        company: "Acme".into(),
        vacancy_link: Some("https://acme.example/jobs/rust".into()),
        hr_name: Some("Dana".into()),
        contact_telegram: Some("@dana".into()),
        contact_whatsapp: Some("+100200".into()),
        contact_phone: Some("+100300".into()),
        salary_from: Some(Decimal::from(1000)),
        salary_to: Some(Decimal::from(2000)),
        stages: vec![stage("Screening", 1)],
        result: None,
    }
}

#[tokio::test]
async fn interviews_are_invisible_to_other_identities() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let bob = Identity::from("bob");

    let created = service.create(&alice, full_draft()).await.unwrap();

    let bobs = service.list(&bob).await.unwrap();
    assert!(bobs.iter().all(|i| i.id != created.id));
    assert!(matches!(
        service.get(&bob, created.id).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service
            .update(&bob, created.id, InterviewPatch::default())
            .await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.remove(&bob, created.id).await,
        Err(Error::NotFound(_))
    ));
    assert_eq!(service.list(&alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_then_list_returns_draft_with_generated_metadata() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let draft = full_draft();
    let before = Utc::now();

    let created = service.create(&alice, draft.clone()).await.unwrap();
    let listed = service.list(&alice).await.unwrap();

    assert_eq!(listed.len(), 1);
    let found = &listed[0];
    assert_eq!(found.id, created.id);
    assert!(!found.id.is_nil());
    assert!(found.created_at >= before);
    assert_eq!(found.details, draft);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let created = service.create(&alice, full_draft()).await.unwrap();

    let patch = InterviewPatch {
        company: Some("X".into()),
        ..InterviewPatch::default()
    };
    let updated = service.update(&alice, created.id, patch).await.unwrap();

    let mut expected = created.details.clone();
    expected.company = "X".into();
    assert_eq!(updated.details, expected);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn append_stage_keeps_previous_order_as_prefix() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let mut draft = full_draft();
    draft.stages = vec![stage("Screening", 1), stage("Tech", 3)];
    let created = service.create(&alice, draft).await.unwrap();

    let updated = service
        .append_stage(&alice, created.id, stage("Final", 7))
        .await
        .unwrap();

    let prior = &created.details.stages;
    assert_eq!(updated.details.stages.len(), prior.len() + 1);
    assert_eq!(&updated.details.stages[..prior.len()], prior.as_slice());
    assert_eq!(updated.details.stages.last().unwrap().name, "Final");
}

#[tokio::test]
async fn update_and_remove_stage_by_index() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let mut draft = full_draft();
    draft.stages = vec![stage("Screening", 1), stage("Tech", 3), stage("Final", 7)];
    let created = service.create(&alice, draft).await.unwrap();

    let replaced = service
        .update_stage(&alice, created.id, 1, stage("Live coding", 4))
        .await
        .unwrap();
    let names: Vec<_> = replaced.details.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Screening", "Live coding", "Final"]);

    let trimmed = service.remove_stage(&alice, created.id, 0).await.unwrap();
    let names: Vec<_> = trimmed.details.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Live coding", "Final"]);

    assert!(matches!(
        service.update_stage(&alice, created.id, 5, stage("Extra", 9)).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn second_remove_fails_with_not_found() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let created = service.create(&alice, full_draft()).await.unwrap();

    service.remove(&alice, created.id).await.unwrap();
    let err = service.remove(&alice, created.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(service.list(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn salary_update_past_upper_bound_is_rejected() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let draft = InterviewDraft {
        salary_from: Some(Decimal::from(1000)),
        salary_to: Some(Decimal::from(2000)),
        ..InterviewDraft::new("Acme")
    };
    let created = service.create(&alice, draft).await.unwrap();

    let patch = InterviewPatch {
        salary_from: Some(Some(Decimal::from(3000))),
        ..InterviewPatch::default()
    };
    let err = service.update(&alice, created.id, patch).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let stored = service.get(&alice, created.id).await.unwrap();
    assert_eq!(stored.details.salary_from, Some(Decimal::from(1000)));
}

#[tokio::test]
async fn clearing_salary_to_lifts_the_upper_bound() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let created = service.create(&alice, full_draft()).await.unwrap();

    let patch = InterviewPatch {
        salary_from: Some(Some(Decimal::from(3000))),
        salary_to: Some(None),
        ..InterviewPatch::default()
    };
    let updated = service.update(&alice, created.id, patch).await.unwrap();
    assert_eq!(updated.details.salary_from, Some(Decimal::from(3000)));
    assert_eq!(updated.details.salary_to, None);

    let stored = service.get(&alice, created.id).await.unwrap();
    assert_eq!(stored.details, updated.details);
}

#[tokio::test]
async fn vacancy_link_can_be_cleared() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let created = service.create(&alice, full_draft()).await.unwrap();
    assert!(created.details.vacancy_link.is_some());

    let patch: InterviewPatch = serde_json::from_value(json!({ "vacancyLink": "" })).unwrap();
    let updated = service.update(&alice, created.id, patch).await.unwrap();
    assert_eq!(updated.details.vacancy_link, None);
    assert_eq!(updated.details.hr_name, created.details.hr_name);

    let draft: InterviewDraft =
        serde_json::from_value(json!({ "company": "Globex", "vacancyLink": "" })).unwrap();
    let plain = service.create(&alice, draft).await.unwrap();
    assert_eq!(plain.details.vacancy_link, None);
}

#[tokio::test]
async fn empty_identity_is_unauthenticated() {
    let (service, _) = setup();
    let err = service.list(&Identity::from("")).await.unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
}

#[tokio::test]
async fn blank_company_is_a_validation_error() {
    let (service, _) = setup();
    let err = service
        .create(&Identity::from("alice"), InterviewDraft::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn outage_surfaces_as_remote_unavailable() {
    let (service, store) = setup();
    let alice = Identity::from("alice");
    let created = service.create(&alice, full_draft()).await.unwrap();

    store.set_offline(true);
    assert!(matches!(
        service.list(&alice).await,
        Err(Error::RemoteUnavailable(_))
    ));
    assert!(matches!(
        service.remove(&alice, created.id).await,
        Err(Error::RemoteUnavailable(_))
    ));

    store.set_offline(false);
    assert_eq!(service.list(&alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn mutations_publish_events() {
    let (service, _) = setup();
    let alice = Identity::from("alice");
    let mut events = service.subscribe();

    let created = service.create(&alice, full_draft()).await.unwrap();
    service
        .append_stage(&alice, created.id, stage("Tech", 2))
        .await
        .unwrap();
    service.remove(&alice, created.id).await.unwrap();

    match events.recv().await.unwrap() {
        InterviewEvent::Created { owner, interview } => {
            assert_eq!(owner, alice);
            assert_eq!(interview.id, created.id);
        }
        other => panic!("unexpected event {:?}", other),
    }
    match events.recv().await.unwrap() {
        InterviewEvent::Updated { interview, .. } => {
            assert_eq!(interview.details.stages.len(), 2)
        }
        other => panic!("unexpected event {:?}", other),
    }
    let removed = events.recv().await.unwrap();
    assert_eq!(removed.owner(), &alice);
    assert_eq!(
        removed,
        InterviewEvent::Removed {
            owner: alice.clone(),
            id: created.id
        }
    );
}
