//! Vote tests.

use forumdb::domain::ThreadRef;
use forumdb::services::{ForumError, ForumService};
use futures::future::join_all;

use super::{harbor, unique, user};

pub async fn test_vote_upserts(service: &ForumService) {
    let spot = harbor(service).await;
    let by_slug = ThreadRef::Slug(spot.thread.slug.clone().unwrap());
    let by_id = ThreadRef::Id(spot.thread.id);

    let thread = service.vote(&by_slug, &spot.owner, 1).await.unwrap();
    assert_eq!(thread.votes, 1);

    let thread = service.vote(&by_id, &spot.crew, 1).await.unwrap();
    assert_eq!(thread.votes, 2);

    // Same voter, other case: replaces the earlier voice.
    let thread = service
        .vote(&by_id, &spot.owner.to_uppercase(), -1)
        .await
        .unwrap();
    assert_eq!(thread.votes, 0);

    let thread = service.vote(&by_id, &spot.owner, -1).await.unwrap();
    assert_eq!(thread.votes, 0, "repeating a voice changes nothing");

    assert_eq!(service.thread_info(spot.thread.id).await.unwrap().votes, 0);
}

pub async fn test_vote_total_matches_ledger(service: &ForumService) {
    let spot = harbor(service).await;
    let thread = ThreadRef::Id(spot.thread.id);

    let mut expected = 0;
    for i in 0..10 {
        let voter = unique("voter");
        service.create_user(user(&voter)).await.unwrap();
        let voice = if i % 3 == 0 { -1 } else { 1 };
        expected += i64::from(voice);
        let voted = service.vote(&thread, &voter, voice).await.unwrap();
        assert_eq!(voted.votes, expected);
    }
}

pub async fn test_concurrent_voters_all_count(service: &ForumService) {
    const VOTERS: i64 = 12;

    let spot = harbor(service).await;
    let thread = ThreadRef::Id(spot.thread.id);

    let mut voters = Vec::new();
    for _ in 0..VOTERS {
        let voter = unique("deckhand");
        service.create_user(user(&voter)).await.unwrap();
        voters.push(voter);
    }

    let results = join_all(voters.iter().map(|voter| service.vote(&thread, voter, 1))).await;
    for result in results {
        let votes = result.unwrap().votes;
        assert!((1..=VOTERS).contains(&votes), "partial total {} out of range", votes);
    }

    assert_eq!(service.thread_info(spot.thread.id).await.unwrap().votes, VOTERS);
}

pub async fn test_concurrent_revotes_keep_one_voice(service: &ForumService) {
    let spot = harbor(service).await;
    let thread = ThreadRef::Id(spot.thread.id);

    let results = join_all([
        service.vote(&thread, &spot.crew, 1),
        service.vote(&thread, &spot.crew, -1),
        service.vote(&thread, &spot.crew, 1),
        service.vote(&thread, &spot.crew, -1),
    ])
    .await;
    for result in results {
        result.unwrap();
    }

    let settled = service.thread_info(spot.thread.id).await.unwrap().votes;
    assert!(settled == 1 || settled == -1, "total {} is not one voice", settled);

    // Flipping the single recorded voice lands exactly on the new voice.
    let flipped = service.vote(&thread, &spot.crew, -settled as i32).await.unwrap();
    assert_eq!(flipped.votes, -settled);
}

pub async fn test_vote_rejects_bad_input(service: &ForumService) {
    let spot = harbor(service).await;
    let thread = ThreadRef::Id(spot.thread.id);

    let err = service.vote(&thread, &spot.owner, 0).await.unwrap_err();
    assert!(matches!(err, ForumError::InvalidInput(_)));

    let err = service.vote(&thread, &unique("ghost"), 1).await.unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "user", .. }));

    let err = service
        .vote(&ThreadRef::Slug(unique("missing")), &spot.owner, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "thread", .. }));
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all vote tests against a service.
#[macro_export]
macro_rules! run_vote_tests {
    ($service:expr) => {
        use $crate::storage::vote_tests::*;

        test_vote_upserts($service).await;
        println!("  test_vote_upserts: PASSED");

        test_vote_total_matches_ledger($service).await;
        println!("  test_vote_total_matches_ledger: PASSED");

        test_concurrent_voters_all_count($service).await;
        println!("  test_concurrent_voters_all_count: PASSED");

        test_concurrent_revotes_keep_one_voice($service).await;
        println!("  test_concurrent_revotes_keep_one_voice: PASSED");

        test_vote_rejects_bad_input($service).await;
        println!("  test_vote_rejects_bad_input: PASSED");
    };
}
