use std::sync::Arc;
use std::thread;

use reviewable_rust::{
    EntityReference, InMemoryReviewStore, ReviewEngine, ReviewRequest, ReviewStore,
    ReviewableConfig, ScaleSpec,
};

fn engine() -> Arc<ReviewEngine<InMemoryReviewStore>> {
    let config = ReviewableConfig::builder()
        .scale(ScaleSpec::range(1.0, 5.0))
        .accept_ip(true)
        .build()
        .unwrap();
    Arc::new(ReviewEngine::new(config, InMemoryReviewStore::new()))
}

#[test]
fn concurrent_upserts_for_one_identity_yield_one_review() {
    let engine = engine();
    let target = EntityReference::new("Post", "1");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let target = target.clone();
            thread::spawn(move || {
                let rating = (i % 5 + 1) as f64;
                engine
                    .review(&target, ReviewRequest::by("128.0.0.1").rating(rating))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.total_reviews(&target, true).unwrap(), 1);
    let review = engine.review_by(&target, "128.0.0.1").unwrap().unwrap();
    assert!(review.rating.is_some());
}

#[test]
fn concurrent_creates_keep_cache_counters_consistent() {
    let engine = engine();
    let target = EntityReference::new("Post", "1");
    engine.store().init_cache(&target).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let target = target.clone();
            thread::spawn(move || {
                let outcome = engine
                    .review(
                        &target,
                        ReviewRequest::by(format!("10.0.0.{}", i).as_str()).rating(3.0),
                    )
                    .unwrap();
                assert!(outcome.created);
                assert!(outcome.cache_error.is_none());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let cache = engine.store().cache_fields(&target).unwrap().unwrap();
    assert_eq!(cache.ratings_count, 16);
    assert_eq!(cache.ratings_total, 48.0);
    assert_eq!(engine.total_reviews(&target, false).unwrap(), 16);
    assert_eq!(engine.total_reviews(&target, true).unwrap(), 16);
    assert_eq!(
        engine.average_rating(&target, false).unwrap(),
        engine.average_rating(&target, true).unwrap()
    );
}

#[test]
fn interleaved_creates_and_destroys_settle_consistent() {
    let engine = engine();
    let target = EntityReference::new("Post", "1");
    engine.store().init_cache(&target).unwrap();

    // Half the identities review and immediately un-review; the rest stay.
    let handles: Vec<_> = (0..12)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let target = target.clone();
            thread::spawn(move || {
                let ip = format!("10.0.1.{}", i);
                engine
                    .review(&target, ReviewRequest::by(ip.as_str()).rating(4.0))
                    .unwrap();
                if i % 2 == 0 {
                    engine.unreview(&target, ip.as_str()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let cache = engine.store().cache_fields(&target).unwrap().unwrap();
    assert_eq!(cache.ratings_count, 6);
    assert_eq!(cache.ratings_total, 24.0);
    assert_eq!(engine.average_rating(&target, false).unwrap(), 4.0);
    assert_eq!(engine.average_rating(&target, true).unwrap(), 4.0);
}
