//! Thread tests: creation, lookup, update and forum listing.

use chrono::{Duration, TimeZone, Utc};

use forumdb::domain::{ThreadPage, ThreadRef, ThreadUpdate};
use forumdb::services::{ForumError, ForumService};

use super::{harbor, new_thread, unique};

pub async fn test_create_thread_canonical_keys(service: &ForumService) {
    let spot = harbor(service).await;

    let thread = service
        .create_thread(new_thread(&spot.forum, &spot.crew.to_uppercase(), None))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(thread.author, spot.crew);
    assert_eq!(thread.forum, spot.forum);
    assert_eq!(thread.slug, None);
    assert_eq!(thread.votes, 0);

    // Empty slugs are stored as absent, so two of them do not collide.
    let second = service
        .create_thread(new_thread(&spot.forum, &spot.crew, Some("")))
        .await
        .unwrap();
    assert!(second.is_new());
    assert_eq!(second.into_inner().slug, None);
}

pub async fn test_create_thread_slug_conflict(service: &ForumService) {
    let spot = harbor(service).await;
    let slug = spot.thread.slug.clone().expect("harbor thread has a slug");

    let mut again = new_thread(&spot.forum, &spot.crew, Some(&slug));
    again.title = "Mutiny".to_string();
    let result = service.create_thread(again).await.unwrap();

    assert_eq!(result.status_code(), 409);
    assert_eq!(result.into_inner(), spot.thread);
}

pub async fn test_create_thread_missing_references(service: &ForumService) {
    let spot = harbor(service).await;

    let err = service
        .create_thread(new_thread(&unique("nowhere"), &spot.owner, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "forum", .. }));

    let err = service
        .create_thread(new_thread(&spot.forum, &unique("ghost"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "user", .. }));
}

pub async fn test_resolve_by_slug_or_id(service: &ForumService) {
    let spot = harbor(service).await;
    let slug = spot.thread.slug.clone().unwrap();

    let by_slug = service.resolve_thread(&ThreadRef::parse(&slug)).await.unwrap();
    let by_id = service
        .resolve_thread(&ThreadRef::parse(&spot.thread.id.to_string()))
        .await
        .unwrap();
    assert_eq!(by_slug, spot.thread);
    assert_eq!(by_id, spot.thread);
    assert_eq!(service.thread_id(&slug).await.unwrap(), spot.thread.id);

    let err = service
        .resolve_thread(&ThreadRef::Slug(unique("missing")))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

pub async fn test_update_thread_merges(service: &ForumService) {
    let spot = harbor(service).await;

    let updated = service
        .update_thread(
            &ThreadRef::Id(spot.thread.id),
            ThreadUpdate {
                title: String::new(),
                message: "Change of plans".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, spot.thread.title);
    assert_eq!(updated.message, "Change of plans");

    let fetched = service.thread_info(spot.thread.id).await.unwrap();
    assert_eq!(fetched, updated);
}

pub async fn test_forum_threads_by_created(service: &ForumService) {
    let spot = harbor(service).await;
    let base = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();

    let mut ids = Vec::new();
    for hours in [1, 2, 3] {
        let mut thread = new_thread(&spot.forum, &spot.crew, None);
        thread.created = Some(base + Duration::hours(hours));
        let thread = service.create_thread(thread).await.unwrap().into_inner();
        assert_eq!(thread.created, base + Duration::hours(hours));
        ids.push(thread.id);
    }

    let page = service
        .forum_threads(
            &spot.forum,
            ThreadPage {
                limit: 2,
                since: Some(base + Duration::hours(2)),
                desc: false,
            },
        )
        .await
        .unwrap();
    let got: Vec<i64> = page.iter().map(|t| t.id).collect();
    assert_eq!(got, vec![ids[1], ids[2]], "since is inclusive");

    let page = service
        .forum_threads(
            &spot.forum,
            ThreadPage {
                limit: 0,
                since: Some(base + Duration::hours(2)),
                desc: true,
            },
        )
        .await
        .unwrap();
    let got: Vec<i64> = page.iter().map(|t| t.id).collect();
    assert_eq!(got, vec![ids[1], ids[0], spot.thread.id]);
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all thread tests against a service.
#[macro_export]
macro_rules! run_thread_tests {
    ($service:expr) => {
        use $crate::storage::thread_tests::*;

        test_create_thread_canonical_keys($service).await;
        println!("  test_create_thread_canonical_keys: PASSED");

        test_create_thread_slug_conflict($service).await;
        println!("  test_create_thread_slug_conflict: PASSED");

        test_create_thread_missing_references($service).await;
        println!("  test_create_thread_missing_references: PASSED");

        test_resolve_by_slug_or_id($service).await;
        println!("  test_resolve_by_slug_or_id: PASSED");

        test_update_thread_merges($service).await;
        println!("  test_update_thread_merges: PASSED");

        test_forum_threads_by_created($service).await;
        println!("  test_forum_threads_by_created: PASSED");
    };
}
