//! User registration and profile tests.

use forumdb::domain::UserUpdate;
use forumdb::services::{ForumError, ForumService};

use super::{unique, user};

// =============================================================================
// create_user
// =============================================================================

pub async fn test_create_and_get_ignores_case(service: &ForumService) {
    let nickname = unique("Barbossa");
    let created = service.create_user(user(&nickname)).await.unwrap();
    assert!(created.is_new());

    let found = service
        .get_user(&nickname.to_uppercase())
        .await
        .expect("lookup ignores case");
    assert_eq!(found.nickname, nickname, "canonical spelling is kept");
}

pub async fn test_create_conflict_lists_every_match(service: &ForumService) {
    let first = unique("first");
    let second = unique("second");
    service.create_user(user(&first)).await.unwrap();
    service.create_user(user(&second)).await.unwrap();

    let mut clash = user(&first.to_uppercase());
    clash.email = user(&second).email;
    let result = service.create_user(clash).await.unwrap();

    assert_eq!(result.status_code(), 409);
    let mut nicknames: Vec<String> = result
        .existing()
        .expect("conflict carries existing users")
        .iter()
        .map(|u| u.nickname.clone())
        .collect();
    nicknames.sort();
    assert_eq!(nicknames, vec![first, second]);
}

pub async fn test_nickname_folding_is_ascii_only(service: &ForumService) {
    let capital = unique("Ösel");
    let small = capital.replacen('Ö', "ö", 1);

    let mut first = user(&capital);
    first.email = format!("{}@port.example", unique("capital"));
    let mut second = user(&small);
    second.email = format!("{}@port.example", unique("small"));
    assert!(service.create_user(first).await.unwrap().is_new());
    assert!(service.create_user(second).await.unwrap().is_new());

    let found = service.get_user(&capital.to_ascii_uppercase()).await.unwrap();
    assert_eq!(found.nickname, capital);
    let found = service.get_user(&small.to_ascii_uppercase()).await.unwrap();
    assert_eq!(found.nickname, small);
}

pub async fn test_get_missing_user(service: &ForumService) {
    let err = service.get_user(&unique("nobody")).await.unwrap_err();
    assert!(matches!(err, ForumError::NotFound { entity: "user", .. }));
}

// =============================================================================
// update_user
// =============================================================================

pub async fn test_update_merges_non_empty_fields(service: &ForumService) {
    let nickname = unique("gibbs");
    service.create_user(user(&nickname)).await.unwrap();

    let updated = service
        .update_user(
            &nickname.to_uppercase(),
            UserUpdate {
                about: "first mate".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.nickname, nickname);
    assert_eq!(updated.about, "first mate");
    assert_eq!(updated.full_name, format!("{} Turner", nickname));

    let unchanged = service
        .update_user(&nickname, UserUpdate::default())
        .await
        .unwrap();
    assert_eq!(unchanged, updated);
}

pub async fn test_update_email_conflict(service: &ForumService) {
    let first = unique("ragetti");
    let second = unique("pintel");
    service.create_user(user(&first)).await.unwrap();
    service.create_user(user(&second)).await.unwrap();

    let err = service
        .update_user(
            &first,
            UserUpdate {
                email: user(&second).email,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::Conflict(_)));

    let err = service
        .update_user(&unique("ghost"), UserUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all user tests against a service.
#[macro_export]
macro_rules! run_user_tests {
    ($service:expr) => {
        use $crate::storage::user_tests::*;

        test_create_and_get_ignores_case($service).await;
        println!("  test_create_and_get_ignores_case: PASSED");

        test_create_conflict_lists_every_match($service).await;
        println!("  test_create_conflict_lists_every_match: PASSED");

        test_nickname_folding_is_ascii_only($service).await;
        println!("  test_nickname_folding_is_ascii_only: PASSED");

        test_get_missing_user($service).await;
        println!("  test_get_missing_user: PASSED");

        test_update_merges_non_empty_fields($service).await;
        println!("  test_update_merges_non_empty_fields: PASSED");

        test_update_email_conflict($service).await;
        println!("  test_update_email_conflict: PASSED");
    };
}
