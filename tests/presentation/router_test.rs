use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use voxsure::domain::{JobId, JobStatus};
use voxsure::presentation::{AppState, Settings, create_router};

use crate::helpers::{
    Harness, ProbeBehaviour, ProbeVoxelizer, cube_mesh, png_bytes, spawn_grid_harness,
    spawn_harness, wait_for_terminal,
};
use voxsure::infrastructure::voxelization::{ImpactSite, simulate_impact, write_stl_binary};

const BOUNDARY: &str = "voxsure-test-boundary";

fn create_test_app(harness: &Harness) -> Router {
    let state = AppState {
        job_service: harness.service.clone(),
        job_repository: harness.repository.clone(),
        gate: harness.gate.clone(),
        settings: Settings::default(),
    };
    create_router(state)
}

fn multipart_upload(uri: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn upload(app: &Router, filename: &str, data: &[u8]) -> JobId {
    let response = app
        .clone()
        .oneshot(multipart_upload("/upload?resolution=16", filename, data))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = json_body(response).await;
    JobId::parse(body["job_id"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn given_running_server_when_health_check_then_reports_gate_and_queue() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["queued"], 0);
    assert_eq!(body["processing"], 0);
    assert_eq!(body["available_permits"], 1);
}

#[tokio::test]
async fn given_stl_upload_when_polled_then_completes_and_serves_voxels() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);

    let id = upload(&app, "cube.stl", &write_stl_binary(&cube_mesh(1.0, 1))).await;
    wait_for_terminal(harness.repository.as_ref(), id).await;

    let status = app
        .clone()
        .oneshot(get(&format!("/status/{}", id)))
        .await
        .unwrap();
    assert_eq!(status.status(), StatusCode::OK);
    let status = json_body(status).await;
    assert_eq!(status["status"], "completed");
    assert_eq!(status["filename"], "cube.stl");
    assert!(status.get("error").is_none());

    let voxels = app
        .oneshot(get(&format!("/voxels/{}", id)))
        .await
        .unwrap();
    assert_eq!(voxels.status(), StatusCode::OK);
    let voxels = json_body(voxels).await;
    assert_eq!(voxels["type"], "3d");
    assert_eq!(voxels["count"], voxels["voxels"].as_array().unwrap().len());
    assert_eq!(voxels["voxels"][0]["color"], "#00f2ff");
    assert_eq!(voxels["voxels"][0]["pos"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn given_unsupported_extension_when_uploading_then_bad_request_and_no_job() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);

    let response = app
        .oneshot(multipart_upload("/upload", "notes.txt", b"hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("txt"));
    assert!(harness.repository.is_empty().await);
}

#[tokio::test]
async fn given_resolution_above_limit_when_uploading_then_bad_request() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);

    let response = app
        .oneshot(multipart_upload("/upload?resolution=4096", "cube.stl", b"x"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unknown_or_malformed_id_when_requesting_status_then_not_found() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);

    for uri in [
        format!("/status/{}", JobId::new()),
        "/status/not-a-job".to_string(),
        format!("/voxels/{}", JobId::new()),
    ] {
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert!(json_body(response).await["error"].is_string());
    }
}

#[tokio::test]
async fn given_queued_job_when_requesting_voxels_or_compare_then_bad_request() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);
    let png = png_bytes(2, 2, |_, _| [200, 200, 200]);

    let done = upload(&app, "done.png", &png).await;
    wait_for_terminal(harness.repository.as_ref(), done).await;

    let _held = harness.gate.try_admit().unwrap();
    let queued = upload(&app, "queued.png", &png).await;

    let voxels = app
        .clone()
        .oneshot(get(&format!("/voxels/{}", queued)))
        .await
        .unwrap();
    assert_eq!(voxels.status(), StatusCode::BAD_REQUEST);

    let compare = app
        .clone()
        .oneshot(get(&format!("/compare/{}/{}", queued, done)))
        .await
        .unwrap();
    assert_eq!(compare.status(), StatusCode::BAD_REQUEST);

    let health = json_body(app.oneshot(get("/health")).await.unwrap()).await;
    assert_eq!(health["queued"], 1);
    assert_eq!(health["available_permits"], 0);
}

#[tokio::test]
async fn given_unknown_job_when_comparing_then_not_found() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);

    let response = app
        .oneshot(get(&format!("/compare/{}/{}", JobId::new(), JobId::new())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_baseline_and_damaged_uploads_when_comparing_then_reports_lost_material() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);
    let baseline_mesh = cube_mesh(10.0, 10);
    let impact = simulate_impact(
        &baseline_mesh,
        &ImpactSite::near_corner(&baseline_mesh.bounds().unwrap()),
    );

    let baseline = upload(&app, "heli.stl", &write_stl_binary(&baseline_mesh)).await;
    let damaged = upload(&app, "heli_damaged.stl", &write_stl_binary(&impact.mesh)).await;
    wait_for_terminal(harness.repository.as_ref(), baseline).await;
    wait_for_terminal(harness.repository.as_ref(), damaged).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/compare/{}/{}", baseline, damaged)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["metrics"]["lost"].as_u64().unwrap() > 0);
    assert_eq!(body["metrics"]["added"], 0);

    let comparison_id = body["comparison_id"].as_str().unwrap();
    let status = json_body(
        app.clone()
            .oneshot(get(&format!("/status/{}", comparison_id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status["status"], "completed");

    let diff = json_body(
        app.oneshot(get(&format!("/voxels/{}", comparison_id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(diff["metrics"], body["metrics"]);
    let lost = diff["voxels"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|v| v["status"] == "lost")
        .count() as u64;
    assert_eq!(lost, body["metrics"]["lost"].as_u64().unwrap());
}

#[tokio::test]
async fn given_failing_voxelizer_when_polling_status_then_error_is_reported() {
    let harness = spawn_harness(std::sync::Arc::new(ProbeVoxelizer::new(
        Duration::ZERO,
        ProbeBehaviour::Fail,
    )));
    let app = create_test_app(&harness);

    let id = upload(&app, "broken.obj", b"not an obj").await;
    let job = wait_for_terminal(harness.repository.as_ref(), id).await;
    assert_eq!(job.status(), JobStatus::Failed);

    let status = json_body(
        app.oneshot(get(&format!("/status/{}", id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status["status"], "failed");
    assert!(status["error"].as_str().unwrap().contains("corrupt input"));
}

#[tokio::test]
async fn given_request_without_id_when_any_endpoint_then_response_contains_request_id() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn given_request_with_id_when_any_endpoint_then_response_echoes_request_id() {
    let harness = spawn_grid_harness();
    let app = create_test_app(&harness);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "test-request-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-request-123"
    );
}
