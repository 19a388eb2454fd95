use letterhouse::manager::sqlite::SqliteStorage;
use letterhouse::{
    ClientFilter, ClientId, ClientInput, CreateRequest, LetterhouseError, RequestFilter,
    RequestStatus, Storage, UpdateRequest, WorkerId, WorkerInput,
};
use sqlx::SqlitePool;

async fn add_worker(storage: &SqliteStorage, name: &str, active: bool) -> WorkerId {
    storage
        .create_worker(WorkerInput {
            name: name.to_string(),
            age: 19,
            active,
        })
        .await
        .expect("Failed to create worker")
        .id
}

async fn add_client(storage: &SqliteStorage, name: &str, city: &str) -> ClientId {
    storage
        .create_client(ClientInput {
            name: name.to_string(),
            city: city.to_string(),
            reason: "a letter to a loved one".to_string(),
            contact: format!("{name}@post"),
        })
        .await
        .expect("Failed to create client")
        .id
}

fn letter(client_id: ClientId, content: &str) -> CreateRequest {
    CreateRequest {
        client_id: Some(client_id),
        date: "2026-10-18".to_string(),
        content: content.to_string(),
    }
}

fn edit(status: &str, content: &str) -> UpdateRequest {
    UpdateRequest {
        status: status.to_string(),
        content: content.to_string(),
    }
}

#[sqlx::test]
async fn test_assignment_skips_full_worker(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    let client = add_client(&storage, "Ann", "Leiden").await;
    let w1 = add_worker(&storage, "Violet", true).await;
    let w2 = add_worker(&storage, "Erica", true).await;

    for i in 0..5 {
        let request = storage
            .create_request(letter(client, &format!("letter {i}")))
            .await
            .expect("Failed to create request");
        assert_eq!(request.worker_id, w1);
        assert_eq!(request.status, RequestStatus::Draft);
    }

    let sixth = storage
        .create_request(letter(client, "letter 5"))
        .await
        .expect("Failed to create request");
    assert_eq!(sixth.worker_id, w2);

    assert_eq!(storage.get_worker(w1).await.unwrap().lifetime_requests, 5);
    assert_eq!(storage.get_worker(w2).await.unwrap().lifetime_requests, 1);
}

#[sqlx::test]
async fn test_not_available_when_only_worker_is_full(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    let client = add_client(&storage, "Ann", "Leiden").await;
    let w1 = add_worker(&storage, "Violet", true).await;
    add_worker(&storage, "Benedict", false).await;

    for i in 0..5 {
        storage
            .create_request(letter(client, &format!("letter {i}")))
            .await
            .unwrap();
    }

    let err = storage
        .create_request(letter(client, "one too many"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, LetterhouseError::NotAvailable { capacity: 5 }),
        "Expected NotAvailable, got {err:?}"
    );
    assert_eq!(storage.get_worker(w1).await.unwrap().lifetime_requests, 5);
}

#[sqlx::test]
async fn test_sent_requests_release_capacity(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    let client = add_client(&storage, "Ann", "Leiden").await;
    let w1 = add_worker(&storage, "Violet", true).await;

    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(
            storage
                .create_request(letter(client, &format!("letter {i}")))
                .await
                .unwrap()
                .id,
        );
    }

    storage
        .update_request_status(ids[0], edit("reviewed", "reviewed letter"))
        .await
        .unwrap();
    // Still in flight
    assert!(storage.create_request(letter(client, "x")).await.is_err());

    storage
        .update_request_status(ids[0], edit("sent", "final letter"))
        .await
        .unwrap();
    let request = storage.create_request(letter(client, "x")).await.unwrap();
    assert_eq!(request.worker_id, w1);
    assert_eq!(
        storage
            .count_requests_for_worker(w1, &RequestStatus::IN_FLIGHT)
            .await
            .unwrap(),
        5
    );
}

#[sqlx::test]
async fn test_status_workflow_is_forward_only(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    let client = add_client(&storage, "Ann", "Leiden").await;
    add_worker(&storage, "Violet", true).await;
    let request = storage
        .create_request(letter(client, "Dear mother,"))
        .await
        .unwrap();

    let err = storage
        .update_request_status(request.id, edit("sent", "Dear mother,"))
        .await
        .unwrap_err();
    assert!(matches!(err, LetterhouseError::InvalidTransition { .. }));

    let err = storage
        .update_request_status(request.id, edit("draft", "Dear mother,"))
        .await
        .unwrap_err();
    assert!(matches!(err, LetterhouseError::InvalidTransition { .. }));

    let err = storage
        .update_request_status(request.id, edit("archived", "Dear mother,"))
        .await
        .unwrap_err();
    assert!(matches!(err, LetterhouseError::InvalidTransition { .. }));

    let reviewed = storage
        .update_request_status(request.id, edit("reviewed", "Dear mother, revised"))
        .await
        .unwrap();
    assert_eq!(reviewed.status, RequestStatus::Reviewed);

    let err = storage
        .update_request_status(request.id, edit("reviewed", "again"))
        .await
        .unwrap_err();
    assert!(matches!(err, LetterhouseError::InvalidTransition { .. }));

    storage
        .update_request_status(request.id, edit("sent", "Dear mother, final"))
        .await
        .unwrap();
    let err = storage
        .update_request_status(request.id, edit("reviewed", "back"))
        .await
        .unwrap_err();
    assert!(matches!(err, LetterhouseError::InvalidTransition { .. }));

    let stored = storage.get_request(request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Sent);
    assert_eq!(stored.content, "Dear mother, final");
    assert_eq!(stored.date, "2026-10-18");
}

#[sqlx::test]
async fn test_only_drafts_can_be_deleted(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    let client = add_client(&storage, "Ann", "Leiden").await;
    add_worker(&storage, "Violet", true).await;

    let draft = storage.create_request(letter(client, "a")).await.unwrap();
    let reviewed = storage.create_request(letter(client, "b")).await.unwrap();
    storage
        .update_request_status(reviewed.id, edit("reviewed", "b"))
        .await
        .unwrap();

    let err = storage.delete_request(reviewed.id).await.unwrap_err();
    assert!(matches!(
        err,
        LetterhouseError::DeleteNotAllowed {
            status: RequestStatus::Reviewed,
            ..
        }
    ));

    storage.delete_request(draft.id).await.unwrap();
    let err = storage.get_request(draft.id).await.unwrap_err();
    assert!(err.is_not_found());

    let err = storage.delete_request(draft.id).await.unwrap_err();
    assert!(matches!(err, LetterhouseError::RequestNotFound(_)));
}

#[sqlx::test]
async fn test_worker_crud_and_report(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    let ann = add_client(&storage, "Ann", "Leiden").await;
    let oscar = add_client(&storage, "Oscar", "Leiden").await;
    let w1 = add_worker(&storage, "Violet", true).await;

    let updated = storage
        .update_worker(
            w1,
            WorkerInput {
                name: "Violet Evergarden".to_string(),
                age: 20,
                active: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Violet Evergarden");
    assert_eq!(updated.age, 20);
    assert_eq!(updated.lifetime_requests, 0);

    storage.create_request(letter(ann, "1")).await.unwrap();
    storage.create_request(letter(ann, "2")).await.unwrap();
    storage.create_request(letter(oscar, "3")).await.unwrap();

    let report = storage.worker_report(w1).await.unwrap();
    assert_eq!(report.worker_id, w1);
    assert_eq!(report.name, "Violet Evergarden");
    assert_eq!(report.total_requests, 3);
    assert_eq!(report.distinct_clients, 2);

    storage.delete_worker(w1).await.unwrap();
    assert!(storage.list_workers().await.unwrap().is_empty());
    assert!(matches!(
        storage.worker_report(w1).await,
        Err(LetterhouseError::WorkerNotFound(_))
    ));
    assert!(matches!(
        storage.delete_worker(w1).await,
        Err(LetterhouseError::WorkerNotFound(_))
    ));
}

#[sqlx::test]
async fn test_client_listing_filters(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    add_client(&storage, "Ann Magnolia", "Leiden").await;
    add_client(&storage, "Oscar Webster", "Leiden").await;
    add_client(&storage, "Charlotte", "Drossel").await;

    let all = storage.list_clients(ClientFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let by_name = storage
        .list_clients(ClientFilter {
            name: Some("MAGNO".to_string()),
            city: None,
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Ann Magnolia");

    let by_city = storage
        .list_clients(ClientFilter {
            name: None,
            city: Some("leid".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(by_city.len(), 2);

    let both = storage
        .list_clients(ClientFilter {
            name: Some("oscar".to_string()),
            city: Some("drossel".to_string()),
        })
        .await
        .unwrap();
    assert!(both.is_empty());
}

#[sqlx::test]
async fn test_request_listing_filters(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    let ann = add_client(&storage, "Ann", "Leiden").await;
    let oscar = add_client(&storage, "Oscar", "Leiden").await;
    add_worker(&storage, "Violet", true).await;

    let first = storage.create_request(letter(ann, "a")).await.unwrap();
    storage.create_request(letter(ann, "b")).await.unwrap();
    storage.create_request(letter(oscar, "c")).await.unwrap();
    storage
        .update_request_status(first.id, edit("reviewed", "a2"))
        .await
        .unwrap();

    let anns = storage
        .list_requests(RequestFilter {
            client_id: Some(ann),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(anns.len(), 2);

    let ann_drafts = storage
        .list_requests(RequestFilter {
            client_id: Some(ann),
            status: Some(RequestStatus::Draft),
        })
        .await
        .unwrap();
    assert_eq!(ann_drafts.len(), 1);
    assert_eq!(ann_drafts[0].content, "b");
}

#[sqlx::test]
async fn test_unknown_client_is_rejected(pool: SqlitePool) {
    let storage = SqliteStorage::new(pool);
    let w1 = add_worker(&storage, "Violet", true).await;

    let err = storage
        .create_request(letter(ClientId(42), "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, LetterhouseError::ClientNotFound(ClientId(42))));
    assert_eq!(storage.get_worker(w1).await.unwrap().lifetime_requests, 0);
}

#[tokio::test]
async fn test_connect_runs_migrations() {
    let storage = SqliteStorage::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    assert!(storage.list_workers().await.unwrap().is_empty());
    assert!(
        storage
            .list_requests(RequestFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}
