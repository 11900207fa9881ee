//! Many readers predicting while the model is retrained and swapped.
//!
//! - predictions never fail while a retrain runs
//! - every prediction stays in range
//! - the swap is visible once the retrain returns

use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use ecosense::controller::AppState;

use super::super::common;

async fn hammer_predictions(state: AppState, clients: usize, rounds: usize) -> usize {
    let mut set = JoinSet::new();

    for client in 0..clients {
        let state = state.clone();
        set.spawn(async move {
            let mut served = 0;
            for round in 0..rounds {
                let hour = ((client + round) % 24) as u32;
                let day = (client % 7) as u32;
                let prediction = state.model.read().predict(hour, day, 22.0, 45.0).unwrap();
                assert!((0.0..=1.0).contains(&prediction.occupancy));
                served += 1;
                tokio::task::yield_now().await;
            }
            served
        });
    }

    let mut total = 0;
    while let Some(result) = set.join_next().await {
        total += result.unwrap();
    }
    total
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_predictions_during_retrain() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(dir.path());
    let before = state.model.read().trained_at();

    let retrain = {
        let state = state.clone();
        tokio::spawn(async move { state.retrain().await })
    };

    let served = hammer_predictions(state.clone(), 8, 50).await;
    assert_eq!(served, 8 * 50);

    let metrics = retrain.await.unwrap().unwrap();
    assert!((0.0..=100.0).contains(&metrics.accuracy));
    assert_ne!(state.model.read().trained_at(), before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_retrains_are_serialized() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(dir.path());

    let mut set = JoinSet::new();
    for _ in 0..3 {
        let state = state.clone();
        set.spawn(async move { state.retrain().await.map(|m| m.accuracy) });
    }

    while let Some(result) = set.join_next().await {
        assert!(result.unwrap().is_ok());
    }
    assert_eq!(state.model.read().training_samples(), 7 * 24);
    assert!(state.cfg.model.path.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn test_sustained_prediction_load() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(dir.path());

    let start = Instant::now();
    let served = hammer_predictions(state, 64, 500).await;
    let elapsed = start.elapsed();

    println!("served {served} predictions in {elapsed:?}");
    assert_eq!(served, 64 * 500);
    assert!(elapsed < Duration::from_secs(30));
}
