use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use voxsure::application::ports::JobRepository;
use voxsure::application::services::{JobServiceError, ResolutionLimits};
use voxsure::domain::{JobId, JobStatus, SourceKind, VoxelStatus};
use voxsure::infrastructure::voxelization::{
    GridVoxelizer, ImpactSite, parse_stl, simulate_impact, write_stl_binary,
};

use crate::helpers::{
    ProbeBehaviour, ProbeVoxelizer, TEST_RESOLUTION, cube_mesh, png_bytes, spawn_grid_harness,
    spawn_harness, spawn_harness_with, wait_for_terminal,
};

#[tokio::test]
async fn given_unsupported_extension_when_submitting_then_rejected_without_job() {
    let harness = spawn_grid_harness();

    let err = harness
        .service
        .submit("notes.txt", Bytes::from_static(b"hello"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, JobServiceError::UnsupportedFormat(_)));
    assert!(harness.repository.is_empty().await);
}

#[tokio::test]
async fn given_resolution_above_limit_when_submitting_then_rejected_without_job() {
    let harness = spawn_harness_with(
        Arc::new(GridVoxelizer),
        ResolutionLimits {
            default_resolution: 8,
            max_resolution: 32,
        },
        true,
    );

    let too_big = harness
        .service
        .submit("heli.stl", Bytes::from_static(b"x"), Some(33))
        .await
        .unwrap_err();
    let zero = harness
        .service
        .submit("heli.stl", Bytes::from_static(b"x"), Some(0))
        .await
        .unwrap_err();

    assert!(matches!(
        too_big,
        JobServiceError::ResolutionOutOfRange {
            requested: 33,
            max: 32
        }
    ));
    assert!(matches!(
        zero,
        JobServiceError::ResolutionOutOfRange { requested: 0, .. }
    ));
    assert!(harness.repository.is_empty().await);
}

#[tokio::test]
async fn given_valid_upload_when_submitting_then_returns_immediately_with_queued_job() {
    let slow = Arc::new(ProbeVoxelizer::new(
        Duration::from_millis(200),
        ProbeBehaviour::Succeed,
    ));
    let harness = spawn_harness(slow);

    let id = harness
        .service
        .submit("heli.stl", Bytes::from_static(b"mesh"), None)
        .await
        .unwrap();

    let job = harness.service.status(id).await.unwrap();
    assert!(matches!(
        job.status(),
        JobStatus::Queued | JobStatus::Processing
    ));
    assert_eq!(job.filename(), Some("heli.stl"));
}

#[tokio::test]
async fn given_unknown_id_when_querying_then_returns_not_found() {
    let harness = spawn_grid_harness();
    let id = JobId::new();

    assert!(matches!(
        harness.service.status(id).await,
        Err(JobServiceError::NotFound(missing)) if missing == id
    ));
    assert!(matches!(
        harness.service.result(id).await,
        Err(JobServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_queued_job_when_fetching_result_then_precondition_error() {
    let harness = spawn_grid_harness();
    let _held = harness.gate.try_admit().unwrap();

    let id = harness
        .service
        .submit("heli.stl", Bytes::from(write_stl_binary(&cube_mesh(1.0, 1))), None)
        .await
        .unwrap();

    let err = harness.service.result(id).await.unwrap_err();
    assert!(matches!(
        err,
        JobServiceError::NotCompleted {
            status: JobStatus::Queued,
            ..
        }
    ));
}

#[tokio::test]
async fn given_one_job_still_queued_when_comparing_then_precondition_error() {
    let harness = spawn_grid_harness();
    let stl = Bytes::from(write_stl_binary(&cube_mesh(1.0, 2)));

    let baseline = harness
        .service
        .submit("baseline.stl", stl.clone(), Some(8))
        .await
        .unwrap();
    wait_for_terminal(harness.repository.as_ref(), baseline).await;

    let held = harness.gate.try_admit().unwrap();
    let damaged = harness
        .service
        .submit("damaged.stl", stl, Some(8))
        .await
        .unwrap();

    let err = harness.service.compare(damaged, baseline).await.unwrap_err();
    assert!(matches!(
        err,
        JobServiceError::NotCompleted { id, .. } if id == damaged
    ));

    let comparison = JobId::for_comparison(damaged, baseline);
    assert!(harness.repository.get_by_id(comparison).await.unwrap().is_none());
    drop(held);
}

#[tokio::test]
async fn given_unknown_job_when_comparing_then_not_found_wins_over_precondition() {
    let harness = spawn_grid_harness();
    let _held = harness.gate.try_admit().unwrap();
    let queued = harness
        .service
        .submit("heli.stl", Bytes::from_static(b"x"), None)
        .await
        .unwrap();
    let missing = JobId::new();

    let err = harness.service.compare(queued, missing).await.unwrap_err();

    assert!(matches!(err, JobServiceError::NotFound(id) if id == missing));
}

#[tokio::test]
async fn given_baseline_and_impacted_mesh_when_comparing_then_only_material_is_lost() {
    let harness = spawn_grid_harness();
    let baseline_mesh = cube_mesh(10.0, 10);
    let site = ImpactSite::near_corner(&baseline_mesh.bounds().unwrap());
    let impact = simulate_impact(&baseline_mesh, &site);
    assert!(impact.removed_faces > 0);

    let baseline_stl = write_stl_binary(&baseline_mesh);
    let damaged_stl = write_stl_binary(&impact.mesh);
    assert_eq!(
        parse_stl(&damaged_stl).unwrap().bounds(),
        baseline_mesh.bounds()
    );

    let baseline = harness
        .service
        .submit("heli.stl", Bytes::from(baseline_stl), Some(TEST_RESOLUTION))
        .await
        .unwrap();
    let damaged = harness
        .service
        .submit("heli_damaged.stl", Bytes::from(damaged_stl), Some(TEST_RESOLUTION))
        .await
        .unwrap();
    assert_eq!(
        wait_for_terminal(harness.repository.as_ref(), baseline)
            .await
            .status(),
        JobStatus::Completed
    );
    assert_eq!(
        wait_for_terminal(harness.repository.as_ref(), damaged)
            .await
            .status(),
        JobStatus::Completed
    );

    let outcome = harness.service.compare(baseline, damaged).await.unwrap();

    assert!(outcome.metrics.lost > 0);
    assert_eq!(outcome.metrics.added, 0);
    assert!(outcome.metrics.matching > 0);

    let diff = harness.service.result(outcome.comparison_id).await.unwrap();
    assert_eq!(diff.kind(), SourceKind::Mesh);
    assert_eq!(diff.metrics(), Some(outcome.metrics));
    assert_eq!(
        diff.voxels()
            .iter()
            .filter(|v| v.status == Some(VoxelStatus::Lost))
            .count(),
        outcome.metrics.lost
    );
}

#[tokio::test]
async fn given_repeated_comparison_when_comparing_again_then_result_is_replaced() {
    let harness = spawn_grid_harness();
    let png = Bytes::from(png_bytes(4, 4, |x, _| if x < 2 { [255, 255, 255] } else { [0, 0, 0] }));

    let a = harness
        .service
        .submit("a.png", png.clone(), None)
        .await
        .unwrap();
    let b = harness.service.submit("b.png", png, None).await.unwrap();
    wait_for_terminal(harness.repository.as_ref(), a).await;
    wait_for_terminal(harness.repository.as_ref(), b).await;

    let first = harness.service.compare(a, b).await.unwrap();
    let jobs_after_first = harness.repository.len().await;
    let second = harness.service.compare(a, b).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(harness.repository.len().await, jobs_after_first);
    assert_eq!(first.metrics.lost, 0);
    assert_eq!(first.metrics.matching, 8 * 10);
}

#[tokio::test]
async fn given_stopped_worker_when_submitting_then_job_marked_failed_and_queue_unavailable() {
    let harness = spawn_grid_harness();
    harness.worker.abort();
    let _ = harness.worker.await;

    let err = harness
        .service
        .submit("heli.stl", Bytes::from_static(b"x"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, JobServiceError::QueueUnavailable));
    let failed = harness
        .repository
        .list_by_status(JobStatus::Failed)
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
}
