//! Inference task scenarios
//!
//! The fuzzy inference service behind the async task boundary, addressed by
//! RNTI the way a host RRC entity would use it.

use integration_tests::{init_test_logging, TestResult, TestUe};
use lteho_common::{CellId, Rnti, UeId};
use lteho_engine::task::DEFAULT_CHANNEL_CAPACITY;
use lteho_engine::{spawn_inference_task, FuzzyConfig, FuzzyInferenceService, InferenceHandle, TaskError};

async fn degrade(handle: &InferenceHandle, ue: &TestUe, rnti: Rnti) -> TestResult<Vec<u16>> {
    let mut targets = Vec::new();
    for (k, (serving, neighbour)) in [(12, 26), (10, 28), (8, 30)].into_iter().enumerate() {
        let t = ue.at(k as u64 + 1);
        handle
            .update_neighbour_measurements(t, rnti, CellId(2), 50, neighbour)
            .await?;
        handle
            .update_neighbour_measurements(t, rnti, CellId(3), 30, 10)
            .await?;
        targets.push(handle.evaluate_handover(t, rnti, 40, serving).await?);
    }
    Ok(targets)
}

/// Test Type-1 inference over the task channel
#[tokio::test]
async fn test_type1_task_selects_target() -> TestResult {
    init_test_logging();

    let service = FuzzyInferenceService::type1(&FuzzyConfig::default())?;
    let (handle, join) = spawn_inference_task(service, DEFAULT_CHANNEL_CAPACITY);
    let ue = TestUe::new(1, 1);

    handle
        .update_serving_cell_id(ue.at(0), ue.ue_id, ue.serving_cell, Rnti(100))
        .await?;
    let targets = degrade(&handle, &ue, Rnti(100)).await?;
    assert_eq!(targets.last(), Some(&2));

    handle.shutdown().await?;
    let service = join.await?;
    assert_eq!(service.ue_for(Rnti(100)), Some(ue.ue_id));
    Ok(())
}

/// Test Type-2 inference with several handles sharing the task
#[tokio::test]
async fn test_type2_task_shared_handles() -> TestResult {
    let service = FuzzyInferenceService::type2(&FuzzyConfig::default())?;
    let (handle, join) = spawn_inference_task(service, 4);

    let first = TestUe::new(1, 1);
    let second = TestUe::new(2, 2);
    let other = handle.clone();

    handle
        .update_serving_cell_id(first.at(0), first.ue_id, first.serving_cell, Rnti(100))
        .await?;
    other
        .update_serving_cell_id(second.at(0), second.ue_id, second.serving_cell, Rnti(101))
        .await?;

    let (a, b) = tokio::join!(
        degrade(&handle, &first, Rnti(100)),
        degrade(&other, &second, Rnti(101))
    );
    assert_eq!(a?.last(), Some(&2));
    // Cell 2 serves the second UE, cell 3 is too poor
    assert!(b?.iter().all(|&target| target == 0));

    drop(other);
    handle.shutdown().await?;
    join.await?;
    Ok(())
}

/// Test an unknown RNTI abstains and the handle reports a stopped task
#[tokio::test]
async fn test_unknown_rnti_and_closed_task() -> TestResult {
    let service = FuzzyInferenceService::type1(&FuzzyConfig::default())?;
    let (handle, join) = spawn_inference_task(service, 4);
    let ue = TestUe::new(1, 1);

    assert_eq!(handle.evaluate_handover(ue.at(1), Rnti(7), 40, 5).await?, 0);

    handle.shutdown().await?;
    let service = join.await?;
    assert_eq!(service.ue_for(Rnti(7)), None::<UeId>);
    assert_eq!(
        handle.evaluate_handover(ue.at(2), Rnti(7), 40, 5).await,
        Err(TaskError::Closed)
    );
    Ok(())
}
