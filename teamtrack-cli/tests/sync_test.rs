// Sync engine tests against a mock server: replay success, retry-next-pass
// failure handling, offline skip, and pull refresh semantics.

use chrono::NaiveDate;
use tempfile::tempdir;

use teamtrack_cli::api::ApiClient;
use teamtrack_cli::config::Config;
use teamtrack_cli::models::{Workout, WorkoutEntry};
use teamtrack_cli::storage::{EntityKind, MutationOp, Storage};
use teamtrack_cli::sync::SyncEngine;

fn test_storage() -> (Storage, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let storage = Storage::init_with_path(dir.path().to_path_buf()).unwrap();
    (storage, dir)
}

fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    let mut config = Config::default();
    config.api.base_url = server.url();
    config.set_tokens("test-access".to_string(), "test-refresh".to_string());
    ApiClient::new(config).unwrap()
}

fn local_workout() -> Workout {
    Workout::new(
        NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
        Some("tough one".to_string()),
        vec![WorkoutEntry {
            exercise_name: "Back Squat".to_string(),
            category: "strength".to_string(),
            sets: 3,
            reps: 5,
            weight_kg: Some(100.0),
            rpe: Some(8.0),
            duration_seconds: None,
        }],
    )
}

fn enqueue_workout_create(storage: &Storage, workout: &Workout) {
    storage.save_workout(workout).unwrap();
    storage
        .enqueue(
            EntityKind::Workout,
            MutationOp::Create,
            &workout.id,
            serde_json::json!({
                "date": workout.date,
                "notes": workout.notes,
                "entries": workout.entries,
            }),
        )
        .unwrap();
}

fn server_workout_json(id: &str) -> String {
    serde_json::json!({
        "id": id,
        "user_id": "5f6c9d7e-0000-0000-0000-000000000000",
        "date": "2025-04-12",
        "template_id": null,
        "notes": "tough one",
        "entries": [],
        "created_at": "2025-04-12T18:00:00Z",
        "updated_at": "2025-04-12T18:00:00Z"
    })
    .to_string()
}

async fn mock_health(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"healthy"}"#)
        .create_async()
        .await
}

async fn mock_empty_pulls(server: &mut mockito::ServerGuard) -> Vec<mockito::Mock> {
    let settings = server
        .mock("GET", "/api/team-settings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r##"{"name":"FC Example","motto":null,"logo_url":null,"primary_color":"#112233","secondary_color":"#445566","updated_at":"2025-01-01T00:00:00Z"}"##,
        )
        .create_async()
        .await;
    let workouts = server
        .mock("GET", "/api/workouts?limit=100")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let polls = server
        .mock("GET", "/api/polls")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let videos = server
        .mock("GET", "/api/videos")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    vec![settings, workouts, polls, videos]
}

#[tokio::test]
async fn offline_pass_is_skipped_not_failed() {
    let (storage, _dir) = test_storage();
    let server = mockito::Server::new_async().await;
    // No /health mock: the probe fails and the pass is skipped.
    let client = client_for(&server);

    enqueue_workout_create(&storage, &local_workout());

    let report = SyncEngine::new(&storage, &client).sync_pass().await.unwrap();

    assert!(report.offline);
    assert_eq!(report.pushed, 0);
    assert_eq!(storage.outbox_len().unwrap(), 1, "entry stays queued");
}

#[tokio::test]
async fn successful_replay_drains_outbox_and_adopts_server_id() {
    let (storage, _dir) = test_storage();
    let mut server = mockito::Server::new_async().await;

    let _health = mock_health(&mut server).await;
    let _pulls = mock_empty_pulls(&mut server).await;
    let create = server
        .mock("POST", "/api/workouts")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(server_workout_json("11111111-2222-3333-4444-555555555555"))
        .create_async()
        .await;

    let client = client_for(&server);
    let workout = local_workout();
    let local_id = workout.id.clone();
    enqueue_workout_create(&storage, &workout);

    let report = SyncEngine::new(&storage, &client).sync_pass().await.unwrap();

    create.assert_async().await;
    assert_eq!(report.pushed, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(storage.outbox_len().unwrap(), 0);

    // The local row was swapped over to the server-assigned id.
    assert!(storage.get_workout(&local_id).unwrap().is_none());
    assert!(storage.last_sync().unwrap().is_some());
}

#[tokio::test]
async fn failed_replay_is_kept_for_next_pass_and_pass_continues() {
    let (storage, _dir) = test_storage();
    let mut server = mockito::Server::new_async().await;

    let _health = mock_health(&mut server).await;
    let _pulls = mock_empty_pulls(&mut server).await;
    // First queued mutation hits a server error; the vote after it still runs.
    let create = server
        .mock("POST", "/api/workouts")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;
    let vote = server
        .mock("POST", "/api/polls/poll-1/vote")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = client_for(&server);
    enqueue_workout_create(&storage, &local_workout());
    storage
        .enqueue(
            EntityKind::PollVote,
            MutationOp::Create,
            "poll-1",
            serde_json::json!({ "choice": "yes" }),
        )
        .unwrap();

    let report = SyncEngine::new(&storage, &client).sync_pass().await.unwrap();

    create.assert_async().await;
    vote.assert_async().await;
    assert_eq!(report.pushed, 1);
    assert_eq!(report.failed, 1);

    let remaining = storage.outbox_entries().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].entity, EntityKind::Workout);
    assert_eq!(remaining[0].attempts, 1);
    assert!(remaining[0].last_error.is_some());
}

#[tokio::test]
async fn each_entry_is_tried_once_per_pass() {
    let (storage, _dir) = test_storage();
    let mut server = mockito::Server::new_async().await;

    let _health = mock_health(&mut server).await;
    let _pulls = mock_empty_pulls(&mut server).await;
    // expect(1): a second attempt within the same pass would fail the assert.
    let create = server
        .mock("POST", "/api/workouts")
        .with_status(503)
        .with_body("maintenance")
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    enqueue_workout_create(&storage, &local_workout());

    SyncEngine::new(&storage, &client).sync_pass().await.unwrap();

    create.assert_async().await;
}

#[tokio::test]
async fn pull_refreshes_mirror_but_keeps_dirty_rows() {
    let (storage, _dir) = test_storage();
    let mut server = mockito::Server::new_async().await;

    let _health = mock_health(&mut server).await;
    let server_id = "99999999-8888-7777-6666-555555555555";
    let _settings = server
        .mock("GET", "/api/team-settings")
        .with_status(200)
        .with_body(
            r##"{"name":"FC Example","motto":"onwards","logo_url":null,"primary_color":"#112233","secondary_color":"#445566","updated_at":"2025-01-01T00:00:00Z"}"##,
        )
        .create_async()
        .await;
    let _workouts = server
        .mock("GET", "/api/workouts?limit=100")
        .with_status(200)
        .with_body(format!("[{}]", server_workout_json(server_id)))
        .create_async()
        .await;
    let _polls = server
        .mock("GET", "/api/polls")
        .with_status(200)
        .with_body(
            r#"[{"id":"p1","question":"Training Friday?","options":["yes","no","maybe"],"event_date":null,"closes_at":null,"status":"open","created_by":"c1","created_at":"2025-01-01T00:00:00Z","updated_at":"2025-01-01T00:00:00Z"}]"#,
        )
        .create_async()
        .await;
    let _videos = server
        .mock("GET", "/api/videos")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    // The dirty local workout's queued create fails, keeping the row dirty.
    let _create = server
        .mock("POST", "/api/workouts")
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server);

    let dirty = local_workout();
    enqueue_workout_create(&storage, &dirty);

    let report = SyncEngine::new(&storage, &client).sync_pass().await.unwrap();

    assert_eq!(report.pulled, 4);
    assert_eq!(storage.get_branding().unwrap().unwrap().name, "FC Example");

    let workouts = storage.list_workouts().unwrap();
    assert_eq!(workouts.len(), 2);
    assert!(workouts.iter().any(|w| w.id == server_id && w.synced));
    assert!(workouts.iter().any(|w| w.id == dirty.id && !w.synced));

    let polls = storage.list_polls().unwrap();
    assert_eq!(polls.len(), 1);
    assert!(polls[0].is_open());
}
