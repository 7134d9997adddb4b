//! Post tests: batch append, the three orderings and editing.

use forumdb::domain::{Post, PostQuery, Related, SortMode, ThreadRef};
use forumdb::services::{ForumError, ForumService};

use super::{harbor, new_thread, post, unique, Harbor};

fn ids(posts: &[Post]) -> Vec<i64> {
    posts.iter().map(|p| p.id).collect()
}

/// Ids of the forest built by [`forest`], in creation order.
pub struct Forest {
    pub spot: Harbor,
    pub thread: ThreadRef,
    pub a: i64,
    pub b: i64,
    pub c: i64,
    pub d: i64,
    pub e: i64,
    pub f: i64,
}

/// ```text
/// a
/// ├── c
/// │   └── e
/// └── d
/// b
/// └── f
/// ```
pub async fn forest(service: &ForumService) -> Forest {
    let spot = harbor(service).await;
    let thread = ThreadRef::Id(spot.thread.id);
    let owner = spot.owner.clone();
    let crew = spot.crew.clone();

    let mut ids = Vec::new();
    for batch in [
        vec![post(0, &owner), post(0, &crew)],
        vec![post(1, &crew), post(1, &owner)],
        vec![post(3, &owner)],
        vec![post(2, &crew)],
    ] {
        // Parents are given as 1-based positions among the posts created so far.
        let batch = batch
            .into_iter()
            .map(|mut p| {
                if p.parent > 0 {
                    p.parent = ids[(p.parent - 1) as usize];
                }
                p
            })
            .collect();
        let created = service.append_posts(&thread, batch).await.unwrap();
        ids.extend(created.iter().map(|p| p.id));
    }
    let [a, b, c, d, e, f] = ids[..] else {
        panic!("forest should hold six posts, got {:?}", ids);
    };

    Forest {
        spot,
        thread,
        a,
        b,
        c,
        d,
        e,
        f,
    }
}

async fn page(service: &ForumService, thread: &ThreadRef, query: PostQuery) -> Vec<i64> {
    ids(&service.thread_posts(thread, query).await.unwrap())
}

// =============================================================================
// append_posts
// =============================================================================

pub async fn test_append_stamps_batch(service: &ForumService) {
    let spot = harbor(service).await;
    let slug = spot.thread.slug.clone().unwrap();

    let posts = service
        .append_posts(
            &ThreadRef::Slug(slug),
            vec![post(0, &spot.owner), post(0, &spot.crew.to_lowercase())],
        )
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
    assert!(posts[0].id < posts[1].id);
    assert_eq!(posts[0].created, posts[1].created, "one timestamp per batch");
    assert_eq!(posts[1].author, spot.crew, "author stored canonically");
    for p in &posts {
        assert_eq!(p.forum, spot.forum);
        assert_eq!(p.thread, spot.thread.id);
        assert!(!p.is_edited);
        assert_eq!(p.path.ids(), &[p.id]);
    }
}

pub async fn test_append_paths_extend_parent(service: &ForumService) {
    let forest = forest(service).await;

    let all = service
        .thread_posts(&forest.thread, PostQuery::new(SortMode::Flat))
        .await
        .unwrap();
    assert_eq!(all.len(), 6);
    for p in &all {
        if p.parent == 0 {
            assert_eq!(p.path.ids(), &[p.id]);
        } else {
            let parent = all.iter().find(|q| q.id == p.parent).unwrap();
            assert_eq!(p.path, parent.path.child(p.id));
        }
    }
}

pub async fn test_append_all_or_nothing(service: &ForumService) {
    let spot = harbor(service).await;
    let thread = ThreadRef::Id(spot.thread.id);

    let elsewhere = service
        .create_thread(new_thread(&spot.forum, &spot.crew, None))
        .await
        .unwrap()
        .into_inner();
    let foreign = service
        .append_posts(&ThreadRef::Id(elsewhere.id), vec![post(0, &spot.crew)])
        .await
        .unwrap()[0]
        .id;
    let before = service.get_forum(&spot.forum).await.unwrap().post_count;

    let batch = vec![post(0, &spot.owner), post(foreign, &spot.owner)];
    let err = service.append_posts(&thread, batch).await.unwrap_err();
    assert!(matches!(err, ForumError::Conflict(_)), "got {:?}", err);

    let batch = vec![post(0, &spot.owner), post(0, &unique("ghost"))];
    let err = service.append_posts(&thread, batch).await.unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "user", .. }));

    assert!(page(service, &thread, PostQuery::new(SortMode::Flat)).await.is_empty());
    let after = service.get_forum(&spot.forum).await.unwrap().post_count;
    assert_eq!(after, before);
}

pub async fn test_append_empty_batch(service: &ForumService) {
    let spot = harbor(service).await;

    let posts = service
        .append_posts(&ThreadRef::Id(spot.thread.id), Vec::new())
        .await
        .unwrap();
    assert!(posts.is_empty());

    let err = service
        .append_posts(&ThreadRef::Slug(unique("missing")), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "thread", .. }));
}

pub async fn test_append_large_batch(service: &ForumService) {
    let spot = harbor(service).await;
    let thread = ThreadRef::Id(spot.thread.id);
    let batch: Vec<_> = (0..100).map(|_| post(0, &spot.crew)).collect();

    let posts = service.append_posts(&thread, batch).await.unwrap();
    assert_eq!(posts.len(), 100);
    assert!(posts.windows(2).all(|w| w[0].id < w[1].id));

    let forum = service.get_forum(&spot.forum).await.unwrap();
    assert_eq!(forum.post_count, 100);
}

// =============================================================================
// thread_posts
// =============================================================================

pub async fn test_flat_order(service: &ForumService) {
    let t = forest(service).await;

    let asc = page(service, &t.thread, PostQuery::new(SortMode::Flat).since(t.b).limit(3)).await;
    assert_eq!(asc, vec![t.c, t.d, t.e]);

    let desc = page(service, &t.thread, PostQuery::new(SortMode::Flat).since(t.e).desc(true)).await;
    assert_eq!(desc, vec![t.d, t.c, t.b, t.a]);
}

pub async fn test_tree_order(service: &ForumService) {
    let t = forest(service).await;

    let asc = page(service, &t.thread, PostQuery::new(SortMode::Tree)).await;
    assert_eq!(asc, vec![t.a, t.c, t.e, t.d, t.b, t.f]);

    let desc = page(service, &t.thread, PostQuery::new(SortMode::Tree).desc(true)).await;
    assert_eq!(desc, vec![t.f, t.b, t.d, t.e, t.c, t.a]);

    let after = page(service, &t.thread, PostQuery::new(SortMode::Tree).since(t.c).limit(2)).await;
    assert_eq!(after, vec![t.e, t.d]);

    let before = page(
        service,
        &t.thread,
        PostQuery::new(SortMode::Tree).since(t.b).desc(true),
    )
    .await;
    assert_eq!(before, vec![t.d, t.e, t.c, t.a]);
}

pub async fn test_parent_tree_order(service: &ForumService) {
    let t = forest(service).await;

    let first = page(service, &t.thread, PostQuery::new(SortMode::ParentTree).limit(1)).await;
    assert_eq!(first, vec![t.a, t.c, t.e, t.d]);

    // Any post of the first subtree works as the cursor.
    let next = page(
        service,
        &t.thread,
        PostQuery::new(SortMode::ParentTree).limit(1).since(t.e),
    )
    .await;
    assert_eq!(next, vec![t.b, t.f]);

    let desc = page(service, &t.thread, PostQuery::new(SortMode::ParentTree).desc(true)).await;
    assert_eq!(desc, vec![t.b, t.f, t.a, t.c, t.e, t.d]);

    let done = page(
        service,
        &t.thread,
        PostQuery::new(SortMode::ParentTree).since(t.f),
    )
    .await;
    assert!(done.is_empty());
}

pub async fn test_cursor_from_other_thread(service: &ForumService) {
    let t = forest(service).await;
    let other = forest(service).await;

    let found = page(
        service,
        &t.thread,
        PostQuery::new(SortMode::Tree).since(other.a),
    )
    .await;
    assert!(found.is_empty(), "cursor outside the thread yields nothing");
}

pub async fn test_query_posts_parses_sort(service: &ForumService) {
    let t = forest(service).await;

    let err = service
        .query_posts(&t.thread, 0, None, "sideways", false)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let posts = service
        .query_posts(&t.thread, 0, None, "parent_tree", true)
        .await
        .unwrap();
    assert_eq!(ids(&posts), vec![t.b, t.f, t.a, t.c, t.e, t.d]);
}

// =============================================================================
// get_post / edit_post
// =============================================================================

pub async fn test_get_post_related(service: &ForumService) {
    let t = forest(service).await;

    let full = service
        .get_post(t.c, &Related::parse("user,thread,forum"))
        .await
        .unwrap();
    assert_eq!(full.post.parent, t.a);
    assert_eq!(full.author.unwrap().nickname, t.spot.crew);
    assert_eq!(full.forum.unwrap().slug, t.spot.forum);
    assert_eq!(full.thread.unwrap().id, t.spot.thread.id);

    let err = service.get_post(t.f + 1_000_000, &Related::none()).await.unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "post", .. }));
}

pub async fn test_edit_post(service: &ForumService) {
    let t = forest(service).await;
    let original = service.get_post(t.d, &Related::none()).await.unwrap().post;

    let same = service.edit_post(t.d, &original.message).await.unwrap();
    assert_eq!(same, original, "unchanged message is a no-op");

    let edited = service.edit_post(t.d, "Hoist the colours").await.unwrap();
    assert!(edited.is_edited);
    assert_eq!(edited.message, "Hoist the colours");
    assert_eq!(edited.path, original.path);
    assert_eq!(edited.created, original.created);

    let empty = service.edit_post(t.d, "").await.unwrap();
    assert_eq!(empty, edited);
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all post tests against a service.
#[macro_export]
macro_rules! run_post_tests {
    ($service:expr) => {
        use $crate::storage::post_tests::*;

        // append
        test_append_stamps_batch($service).await;
        println!("  test_append_stamps_batch: PASSED");

        test_append_paths_extend_parent($service).await;
        println!("  test_append_paths_extend_parent: PASSED");

        test_append_all_or_nothing($service).await;
        println!("  test_append_all_or_nothing: PASSED");

        test_append_empty_batch($service).await;
        println!("  test_append_empty_batch: PASSED");

        test_append_large_batch($service).await;
        println!("  test_append_large_batch: PASSED");

        // ordering
        test_flat_order($service).await;
        println!("  test_flat_order: PASSED");

        test_tree_order($service).await;
        println!("  test_tree_order: PASSED");

        test_parent_tree_order($service).await;
        println!("  test_parent_tree_order: PASSED");

        test_cursor_from_other_thread($service).await;
        println!("  test_cursor_from_other_thread: PASSED");

        test_query_posts_parses_sort($service).await;
        println!("  test_query_posts_parses_sort: PASSED");

        // lookup and edit
        test_get_post_related($service).await;
        println!("  test_get_post_related: PASSED");

        test_edit_post($service).await;
        println!("  test_edit_post: PASSED");
    };
}
