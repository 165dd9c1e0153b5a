use std::time::Duration;

use serde_json::json;

use crate::constants::{SEARCH_RESULT_LIMIT, USERS_COLLECTION};
use crate::core::errors::{ErrorKind, LinkorError};
use crate::core::models::{NewUser, SocialLinks, Theme, UserPreferences, UserProfile, UserSortField, UserUpdate};
use crate::infrastructure::store::{Document, DocumentStore, Query};
use crate::tests::create_test_repository;

fn new_user(email: &str, display_name: Option<&str>) -> NewUser {
    NewUser {
        email: email.to_string(),
        display_name: display_name.map(String::from),
        ..Default::default()
    }
}

async fn stored_count(store: &impl DocumentStore) -> usize {
    store.query(&Query::new(USERS_COLLECTION)).await.unwrap().len()
}

#[tokio::test]
async fn test_create_user_assigns_id_and_equal_timestamps() {
    let (repo, _) = create_test_repository();
    let user = repo
        .create_user(new_user("freelancer@linkor.uz", Some("Dilshod")))
        .await
        .unwrap();

    assert!(!user.id.is_empty());
    assert_eq!(user.created_at, user.updated_at);
    assert_eq!(user.email, "freelancer@linkor.uz");
    assert_eq!(user.display_name.as_deref(), Some("Dilshod"));
    assert!(!user.email_verified);
}

#[tokio::test]
async fn test_create_user_without_email_fails_without_writing() {
    let (repo, store) = create_test_repository();

    let err = repo.create_user(NewUser::default()).await.unwrap_err();
    assert_eq!(err, LinkorError::MissingEmail);
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = repo.create_user(new_user("   ", None)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(stored_count(&store).await, 0);
}

#[tokio::test]
async fn test_create_user_with_invalid_profile_fails() {
    let (repo, store) = create_test_repository();
    let data = NewUser {
        profile: Some(UserProfile {
            website: Some("not a url".into()),
            ..Default::default()
        }),
        ..NewUser::with_email("a@b.com")
    };
    let err = repo.create_user(data).await.unwrap_err();
    assert!(matches!(err, LinkorError::InvalidInput(ref field, _) if field == "website"));
    assert_eq!(stored_count(&store).await, 0);
}

#[tokio::test]
async fn test_get_user_by_unknown_id_is_none() {
    let (repo, _) = create_test_repository();
    assert_eq!(repo.get_user_by_id("never-issued").await.unwrap(), None);
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let (repo, _) = create_test_repository();
    let data = NewUser {
        email: "round@trip.com".into(),
        display_name: Some("Round Trip".into()),
        photo_url: Some("https://cdn.linkor.uz/p/1.png".into()),
        phone_number: Some("+998 90 000 00 00".into()),
        email_verified: true,
        profile: Some(UserProfile {
            first_name: Some("Round".into()),
            bio: Some("Backend developer".into()),
            social_links: Some(SocialLinks {
                linkedin: Some("https://linkedin.com/in/round".into()),
                ..Default::default()
            }),
            preferences: Some(UserPreferences {
                theme: Theme::Dark,
                language: "uz".into(),
                ..Default::default()
            }),
            ..Default::default()
        }),
    };

    let created = repo.create_user(data).await.unwrap();
    let fetched = repo.get_user_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_minimal_user_is_stored_sparsely() {
    let (repo, store) = create_test_repository();
    let user = repo
        .create_user(NewUser {
            email: "a@b.com".into(),
            email_verified: false,
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!user.id.is_empty());
    assert!(!user.email_verified);
    assert_eq!(user.profile, None);

    let raw = store.get(USERS_COLLECTION, &user.id).await.unwrap().unwrap();
    let mut keys: Vec<&str> = raw.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["createdAt", "email", "emailVerified", "updatedAt"]);
    assert!(raw.values().all(|v| !v.is_null()));
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let (repo, _) = create_test_repository();
    let before = repo
        .create_user(NewUser {
            phone_number: Some("+998901234567".into()),
            profile: Some(UserProfile {
                bio: Some("Designer".into()),
                ..Default::default()
            }),
            ..new_user("designer@linkor.uz", Some("Old Name"))
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(2)).await;
    let after = repo
        .update_user(
            &before.id,
            UserUpdate {
                display_name: Some("X".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(after.display_name.as_deref(), Some("X"));
    assert!(after.updated_at > before.updated_at);
    assert!(after.created_at <= after.updated_at);

    let expected = crate::core::models::User {
        display_name: Some("X".into()),
        updated_at: after.updated_at,
        ..before
    };
    assert_eq!(after, expected);
}

#[tokio::test]
async fn test_update_replaces_profile_as_a_whole() {
    let (repo, _) = create_test_repository();
    let user = repo
        .create_user(NewUser {
            profile: Some(UserProfile {
                bio: Some("Writer".into()),
                location: Some("Tashkent".into()),
                ..Default::default()
            }),
            ..NewUser::with_email("writer@linkor.uz")
        })
        .await
        .unwrap();

    let updated = repo
        .update_user(
            &user.id,
            UserUpdate {
                profile: Some(UserProfile {
                    location: Some("Samarkand".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let profile = updated.profile.unwrap();
    assert_eq!(profile.location.as_deref(), Some("Samarkand"));
    assert_eq!(profile.bio, None);
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found() {
    let (repo, store) = create_test_repository();
    let err = repo
        .update_user(
            "ghost",
            UserUpdate {
                email_verified: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, LinkorError::UserNotFound("ghost".into()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(stored_count(&store).await, 0);
}

#[tokio::test]
async fn test_update_with_invalid_email_is_rejected() {
    let (repo, _) = create_test_repository();
    let user = repo.create_user(NewUser::with_email("ok@linkor.uz")).await.unwrap();
    let err = repo
        .update_user(
            &user.id,
            UserUpdate {
                email: Some("nope".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let unchanged = repo.get_user_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(unchanged, user);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (repo, _) = create_test_repository();
    let user = repo.create_user(NewUser::with_email("gone@linkor.uz")).await.unwrap();

    repo.delete_user(&user.id).await.unwrap();
    repo.delete_user(&user.id).await.unwrap();
    repo.delete_user("never-existed").await.unwrap();

    assert_eq!(repo.get_user_by_id(&user.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_get_user_by_email() {
    let (repo, _) = create_test_repository();
    let user = repo.create_user(NewUser::with_email("find@me.com")).await.unwrap();
    repo.create_user(NewUser::with_email("other@me.com")).await.unwrap();

    assert_eq!(repo.get_user_by_email("find@me.com").await.unwrap(), Some(user));
    assert_eq!(repo.get_user_by_email("FIND@me.com").await.unwrap(), None);
    assert!(repo.user_exists_by_email("other@me.com").await.unwrap());
    assert!(!repo.user_exists_by_email("missing@me.com").await.unwrap());
}

#[tokio::test]
async fn test_get_user_by_email_returns_one_of_duplicates() {
    let (repo, _) = create_test_repository();
    let first = repo.create_user(NewUser::with_email("dup@me.com")).await.unwrap();
    let second = repo.create_user(NewUser::with_email("dup@me.com")).await.unwrap();

    let found = repo.get_user_by_email("dup@me.com").await.unwrap().unwrap();
    assert!(found == first || found == second);
}

#[tokio::test]
async fn test_register_user_rejects_known_email() {
    let (repo, store) = create_test_repository();
    repo.register_user(NewUser::with_email("taken@linkor.uz")).await.unwrap();

    let err = repo
        .register_user(NewUser::with_email("taken@linkor.uz"))
        .await
        .unwrap_err();
    assert_eq!(err, LinkorError::EmailAlreadyRegistered("taken@linkor.uz".into()));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(stored_count(&store).await, 1);
}

#[tokio::test]
async fn test_list_users_newest_first_with_limit() {
    let (repo, _) = create_test_repository();
    let mut created = Vec::new();
    for i in 0..5 {
        created.push(
            repo.create_user(NewUser::with_email(format!("user{}@linkor.uz", i)))
                .await
                .unwrap(),
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let listed = repo.list_users(3, UserSortField::CreatedAt).await.unwrap();
    let emails: Vec<&str> = listed.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["user4@linkor.uz", "user3@linkor.uz", "user2@linkor.uz"]);

    let all = repo.list_users(10, UserSortField::CreatedAt).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn test_list_users_by_display_name_skips_users_without_one() {
    let (repo, _) = create_test_repository();
    repo.create_user(new_user("a@linkor.uz", Some("Aziz"))).await.unwrap();
    repo.create_user(new_user("b@linkor.uz", Some("Bekzod"))).await.unwrap();
    repo.create_user(new_user("c@linkor.uz", None)).await.unwrap();

    let listed = repo.list_users(10, UserSortField::DisplayName).await.unwrap();
    let names: Vec<_> = listed.iter().filter_map(|u| u.display_name.as_deref()).collect();
    assert_eq!(names, vec!["Bekzod", "Aziz"]);
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn test_list_users_rejects_bad_limit() {
    let (repo, _) = create_test_repository();
    let err = repo.list_users(0, UserSortField::CreatedAt).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_search_by_display_name_prefix() {
    let (repo, _) = create_test_repository();
    for i in 0..25 {
        repo.create_user(new_user(&format!("al{}@linkor.uz", i), Some(format!("Al {:02}", i).as_str())))
            .await
            .unwrap();
    }
    for name in ["Alisher", "Bob", "al lowercase", "Xal", "A"] {
        repo.create_user(new_user(&format!("{}@linkor.uz", name.replace(' ', "")), Some(name)))
            .await
            .unwrap();
    }
    repo.create_user(NewUser::with_email("anon@linkor.uz")).await.unwrap();

    let hits = repo.search_users_by_display_name("Al").await.unwrap();
    assert_eq!(hits.len(), SEARCH_RESULT_LIMIT);
    for user in &hits {
        assert!(user.display_name.as_deref().unwrap().starts_with("Al"));
    }
    let names: Vec<_> = hits.iter().map(|u| u.display_name.clone().unwrap()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let hits = repo.search_users_by_display_name("Ali").await.unwrap();
    let names: Vec<_> = hits.iter().filter_map(|u| u.display_name.as_deref()).collect();
    assert_eq!(names, vec!["Alisher"]);

    assert!(repo.search_users_by_display_name("Zz").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_closed_store_surfaces_storage_errors() {
    let (repo, store) = create_test_repository();
    let user = repo.create_user(NewUser::with_email("before@close.com")).await.unwrap();
    store.close().await.unwrap();

    let errors = vec![
        repo.create_user(NewUser::with_email("after@close.com")).await.unwrap_err(),
        repo.get_user_by_id(&user.id).await.unwrap_err(),
        repo.get_user_by_email("before@close.com").await.unwrap_err(),
        repo.update_user(&user.id, UserUpdate::default()).await.unwrap_err(),
        repo.delete_user(&user.id).await.unwrap_err(),
        repo.list_users(10, UserSortField::CreatedAt).await.unwrap_err(),
        repo.search_users_by_display_name("b").await.unwrap_err(),
        repo.user_exists_by_email("before@close.com").await.unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind(), ErrorKind::Storage, "{:?}", err);
    }
}

#[tokio::test]
async fn test_malformed_stored_document_is_a_storage_error() {
    let (repo, store) = create_test_repository();
    let mut doc = Document::new();
    doc.insert("displayName".into(), json!("No Email"));
    let id = store.add(USERS_COLLECTION, doc).await.unwrap();

    let err = repo.get_user_by_id(&id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
}
