//! Forum tests: creation, counters and participant listing.

use forumdb::domain::{ThreadRef, UserPage};
use forumdb::services::{ForumError, ForumService};

use super::{harbor, new_forum, new_thread, post, unique, user};

// =============================================================================
// create_forum
// =============================================================================

pub async fn test_create_forum_canonical_owner(service: &ForumService) {
    let owner = unique("Norrington");
    service.create_user(user(&owner)).await.unwrap();
    let slug = unique("navy");

    let created = service
        .create_forum(new_forum(&slug, &owner.to_lowercase()))
        .await
        .unwrap();
    assert!(created.is_new());
    let forum = created.into_inner();
    assert_eq!(forum.owner, owner);
    assert_eq!(forum.post_count, 0);
    assert_eq!(forum.thread_count, 0);

    assert_eq!(service.get_forum(&slug).await.unwrap(), forum);
}

pub async fn test_create_forum_conflict_returns_stored(service: &ForumService) {
    let spot = harbor(service).await;

    let mut again = new_forum(&spot.forum, &spot.crew);
    again.title = "Imposter".to_string();
    let result = service.create_forum(again).await.unwrap();

    assert!(result.is_conflict());
    let existing = result.into_inner();
    assert_eq!(existing.owner, spot.owner);
    assert_eq!(existing.title, format!("Forum {}", spot.forum));
}

pub async fn test_create_forum_unknown_owner(service: &ForumService) {
    let err = service
        .create_forum(new_forum(&unique("lost"), &unique("ghost")))
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "user", .. }));

    let err = service.get_forum(&unique("lost")).await.unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "forum", .. }));
}

/// Racing creators of one slug: exactly one wins, the rest see its row.
pub async fn test_concurrent_create_forum_single_winner(service: &ForumService) {
    let owner = unique("racer");
    service.create_user(user(&owner)).await.unwrap();
    let slug = unique("race");

    let attempts = (0..8).map(|_| service.create_forum(new_forum(&slug, &owner)));
    let results = futures::future::join_all(attempts).await;

    let mut winners = 0;
    for result in results {
        let created = result.expect("racing create should not fail");
        if created.is_new() {
            winners += 1;
        }
        assert_eq!(created.into_inner().slug, slug);
    }
    assert_eq!(winners, 1, "exactly one creator wins");
}

// =============================================================================
// Counters and participants
// =============================================================================

pub async fn test_forum_counts_follow_writes(service: &ForumService) {
    let spot = harbor(service).await;
    service
        .create_thread(new_thread(&spot.forum, &spot.crew, None))
        .await
        .unwrap();
    service
        .append_posts(
            &ThreadRef::Id(spot.thread.id),
            vec![post(0, &spot.owner), post(0, &spot.crew), post(0, &spot.crew)],
        )
        .await
        .unwrap();

    let forum = service.get_forum(&spot.forum).await.unwrap();
    assert_eq!(forum.thread_count, 2);
    assert_eq!(forum.post_count, 3);
}

pub async fn test_forum_users_ordered_ignoring_case(service: &ForumService) {
    let spot = harbor(service).await;
    let tag = unique("");
    let low = format!("a{}", tag);
    let mid = format!("M{}", tag);
    let high = format!("z{}", tag);
    for nickname in [&low, &mid, &high] {
        service.create_user(user(nickname)).await.unwrap();
    }
    // Thread authors count as participants.
    service
        .create_thread(new_thread(&spot.forum, &high, None))
        .await
        .unwrap();
    service
        .append_posts(
            &ThreadRef::Id(spot.thread.id),
            vec![post(0, &low), post(0, &mid.to_lowercase())],
        )
        .await
        .unwrap();

    let users = service
        .forum_users(&spot.forum, UserPage::default())
        .await
        .unwrap();
    let nicknames: Vec<&str> = users.iter().map(|u| u.nickname.as_str()).collect();
    // The owner opened the seeded thread; the crew has not written yet.
    let mut expected = vec![low.as_str(), mid.as_str(), spot.owner.as_str(), high.as_str()];
    expected.sort_by_key(|n| n.to_lowercase());
    assert_eq!(nicknames, expected);

    let page = service
        .forum_users(
            &spot.forum,
            UserPage {
                limit: 1,
                since: Some(mid.to_uppercase()),
                desc: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].nickname, low, "since is exclusive");
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all forum tests against a service.
#[macro_export]
macro_rules! run_forum_tests {
    ($service:expr) => {
        use $crate::storage::forum_tests::*;

        test_create_forum_canonical_owner($service).await;
        println!("  test_create_forum_canonical_owner: PASSED");

        test_create_forum_conflict_returns_stored($service).await;
        println!("  test_create_forum_conflict_returns_stored: PASSED");

        test_create_forum_unknown_owner($service).await;
        println!("  test_create_forum_unknown_owner: PASSED");

        test_concurrent_create_forum_single_winner($service).await;
        println!("  test_concurrent_create_forum_single_winner: PASSED");

        test_forum_counts_follow_writes($service).await;
        println!("  test_forum_counts_follow_writes: PASSED");

        test_forum_users_ordered_ignoring_case($service).await;
        println!("  test_forum_users_ordered_ignoring_case: PASSED");
    };
}
