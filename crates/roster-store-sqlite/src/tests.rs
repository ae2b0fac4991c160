//! Integration tests for `SqliteStore` (and `UserService` on top of it)
//! against an in-memory database.

use roster_core::{
  Error as ServiceError, UserService,
  query::{PageRequest, SortField, SortSpec, UserFilter},
  store::{StoreError as _, UserStore},
  user::{NewUser, UserPatch},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(first: &str, last: &str, email: &str) -> NewUser {
  NewUser {
    email:      email.into(),
    first_name: first.into(),
    last_name:  last.into(),
  }
}

async fn seed(s: &SqliteStore, users: &[(&str, &str, &str)]) {
  for (first, last, email) in users {
    s.insert(new_user(first, last, email)).await.unwrap();
  }
}

fn filter(search: &str) -> UserFilter {
  UserFilter { search: Some(search.into()), active: None }
}

const DEFAULTS: (SortSpec, PageRequest) =
  (SortSpec { field: SortField::Id, descending: false }, PageRequest { page: 0, size: 20 });

// ─── Insert / fetch ──────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_roundtrip() {
  let s = store().await;

  let created = s
    .insert(new_user("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();
  assert!(created.active);
  assert_eq!(created.created_at, created.updated_at);

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(999).await.unwrap().is_none());
}

#[tokio::test]
async fn ids_are_assigned_monotonically() {
  let s = store().await;
  let a = s.insert(new_user("A", "A", "a@example.com")).await.unwrap();
  let b = s.insert(new_user("B", "B", "b@example.com")).await.unwrap();
  assert!(b.id > a.id);
}

#[tokio::test]
async fn find_by_email_is_exact_and_case_sensitive() {
  let s = store().await;
  seed(&s, &[("Alice", "Liddell", "alice@example.com")]).await;

  assert!(s.find_by_email("alice@example.com").await.unwrap().is_some());
  assert!(s.find_by_email("Alice@example.com").await.unwrap().is_none());
  assert!(s.find_by_email("lice@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn email_taken_honours_exclusion() {
  let s = store().await;
  let alice = s
    .insert(new_user("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();

  assert!(s.email_taken("alice@example.com", None).await.unwrap());
  assert!(!s.email_taken("alice@example.com", Some(alice.id)).await.unwrap());
  assert!(s.email_taken("alice@example.com", Some(alice.id + 1)).await.unwrap());
  assert!(!s.email_taken("bob@example.com", None).await.unwrap());
}

// ─── Unique index ────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_insert_is_a_unique_violation() {
  let s = store().await;
  seed(&s, &[("Alice", "Liddell", "alice@example.com")]).await;

  let err = s
    .insert(new_user("Other", "Alice", "alice@example.com"))
    .await
    .unwrap_err();
  assert!(err.is_unique_violation(), "got: {err}");
}

#[tokio::test]
async fn save_onto_taken_email_is_a_unique_violation() {
  let s = store().await;
  seed(&s, &[("Alice", "Liddell", "alice@example.com")]).await;
  let mut bob = s
    .insert(new_user("Bob", "Stone", "bob@example.com"))
    .await
    .unwrap();

  bob.email = "alice@example.com".into();
  let err = s.save(&bob).await.unwrap_err();
  assert!(err.is_unique_violation(), "got: {err}");
}

#[tokio::test]
async fn save_missing_row_errors() {
  let s = store().await;
  let mut ghost = s
    .insert(new_user("Ghost", "Gone", "ghost@example.com"))
    .await
    .unwrap();
  ghost.id += 100;

  let err = s.save(&ghost).await.unwrap_err();
  assert!(matches!(err, crate::Error::RowMissing(_)));
  assert!(!err.is_unique_violation());
}

// ─── List: pagination ────────────────────────────────────────────────────────

#[tokio::test]
async fn page_count_is_ceil_and_pages_concatenate() {
  let s = store().await;
  seed(&s, &[
    ("A", "One", "a@example.com"),
    ("B", "Two", "b@example.com"),
    ("C", "Three", "c@example.com"),
    ("D", "Four", "d@example.com"),
    ("E", "Five", "e@example.com"),
  ])
  .await;

  let (sort, _) = DEFAULTS;
  let mut seen = Vec::new();
  for page in 0..2 {
    let p = s
      .list(&UserFilter::default(), sort, PageRequest { page, size: 3 })
      .await
      .unwrap();
    assert_eq!(p.total_elements, 5);
    assert_eq!(p.total_pages(), 2);
    assert_eq!(p.number, page);
    seen.extend(p.content.into_iter().map(|u| u.id));
  }

  // Full sorted order, each row exactly once.
  assert_eq!(seen.len(), 5);
  let mut sorted = seen.clone();
  sorted.sort_unstable();
  sorted.dedup();
  assert_eq!(seen, sorted);
}

#[tokio::test]
async fn second_page_of_five_by_three_has_two_and_is_last() {
  let s = store().await;
  seed(&s, &[
    ("A", "One", "a@example.com"),
    ("B", "Two", "b@example.com"),
    ("C", "Three", "c@example.com"),
    ("D", "Four", "d@example.com"),
    ("E", "Five", "e@example.com"),
  ])
  .await;

  let (sort, _) = DEFAULTS;
  let p = s
    .list(&UserFilter::default(), sort, PageRequest { page: 1, size: 3 })
    .await
    .unwrap();

  assert_eq!(p.content.len(), 2);
  assert_eq!(p.total_pages(), 2);
  assert!(!p.is_first());
  assert!(p.is_last());
}

#[tokio::test]
async fn past_the_end_page_is_empty_but_keeps_totals() {
  let s = store().await;
  seed(&s, &[("A", "One", "a@example.com")]).await;

  let (sort, _) = DEFAULTS;
  let p = s
    .list(&UserFilter::default(), sort, PageRequest { page: 5, size: 3 })
    .await
    .unwrap();

  assert!(p.is_empty());
  assert_eq!(p.total_elements, 1);
  assert_eq!(p.total_pages(), 1);
}

#[tokio::test]
async fn astronomical_page_number_is_an_empty_page() {
  let s = store().await;
  seed(&s, &[
    ("A", "One", "a@example.com"),
    ("B", "Two", "b@example.com"),
  ])
  .await;

  // page * size would overflow u64; the offset saturates instead, so this
  // must not wrap around and serve page 0 again.
  let (sort, _) = DEFAULTS;
  let p = s
    .list(&UserFilter::default(), sort, PageRequest {
      page: u64::MAX / 2,
      size: 3,
    })
    .await
    .unwrap();

  assert!(p.is_empty());
  assert_eq!(p.total_elements, 2);
  assert_eq!(p.number, u64::MAX / 2);
  assert!(p.is_last());
}

#[tokio::test]
async fn sort_by_email_descending() {
  let s = store().await;
  seed(&s, &[
    ("A", "One", "a@example.com"),
    ("C", "Three", "c@example.com"),
    ("B", "Two", "b@example.com"),
  ])
  .await;

  let sort = SortSpec { field: SortField::Email, descending: true };
  let p = s
    .list(&UserFilter::default(), sort, PageRequest::default())
    .await
    .unwrap();

  let emails: Vec<_> = p.content.iter().map(|u| u.email.as_str()).collect();
  assert_eq!(emails, ["c@example.com", "b@example.com", "a@example.com"]);
}

// ─── List: filtering ─────────────────────────────────────────────────────────

#[tokio::test]
async fn search_matches_name_and_email_case_insensitively() {
  let s = store().await;
  seed(&s, &[
    ("Alice", "Liddell", "alice@example.com"),
    ("Bob", "Stone", "bob@example.com"),
    ("Charlie", "Alicesmith", "charlie@example.com"),
  ])
  .await;

  let (sort, page) = DEFAULTS;
  let p = s.list(&filter("ALICE"), sort, page).await.unwrap();
  let firsts: Vec<_> = p.content.iter().map(|u| u.first_name.as_str()).collect();
  assert_eq!(firsts, ["Alice", "Charlie"]);
  assert_eq!(p.total_elements, 2);
}

#[tokio::test]
async fn blank_search_matches_all() {
  let s = store().await;
  seed(&s, &[
    ("Alice", "Liddell", "alice@example.com"),
    ("Bob", "Stone", "bob@example.com"),
  ])
  .await;

  let (sort, page) = DEFAULTS;
  let p = s.list(&filter("   "), sort, page).await.unwrap();
  assert_eq!(p.total_elements, 2);
}

#[tokio::test]
async fn wildcard_search_matches_nothing_on_wildcard_free_data() {
  let s = store().await;
  seed(&s, &[
    ("Alice", "Liddell", "alice@example.com"),
    ("Bob", "Stone", "bob@example.com"),
    ("Charlie", "Underhill", "charlie@example.com"),
  ])
  .await;

  let (sort, page) = DEFAULTS;
  for term in ["%", "_", "%%", "a%b", "\\"] {
    let p = s.list(&filter(term), sort, page).await.unwrap();
    assert_eq!(p.total_elements, 0, "term {term:?} must match nothing");
  }

  let p = s.list(&filter("Alice"), sort, page).await.unwrap();
  assert_eq!(p.total_elements, 1);
}

#[tokio::test]
async fn literal_wildcard_in_a_field_is_still_findable() {
  let s = store().await;
  seed(&s, &[
    ("100%", "Sure", "sure@example.com"),
    ("Alice", "Liddell", "alice@example.com"),
  ])
  .await;

  let (sort, page) = DEFAULTS;
  let p = s.list(&filter("%"), sort, page).await.unwrap();
  assert_eq!(p.total_elements, 1);
  assert_eq!(p.content[0].first_name, "100%");
}

#[tokio::test]
async fn active_filter_and_search_combine_with_and() {
  let s = store().await;
  seed(&s, &[
    ("Alice", "Liddell", "alice@example.com"),
    ("Alina", "Stone", "alina@example.com"),
  ])
  .await;

  // Deactivate Alina.
  let mut alina = s.find_by_email("alina@example.com").await.unwrap().unwrap();
  alina.active = false;
  s.save(&alina).await.unwrap();

  let (sort, page) = DEFAULTS;

  let f = UserFilter { search: Some("ali".into()), active: Some(true) };
  let p = s.list(&f, sort, page).await.unwrap();
  assert_eq!(p.total_elements, 1);
  assert_eq!(p.content[0].first_name, "Alice");

  let f = UserFilter { search: None, active: Some(false) };
  let p = s.list(&f, sort, page).await.unwrap();
  assert_eq!(p.total_elements, 1);
  assert_eq!(p.content[0].first_name, "Alina");
}

// ─── Service: create ─────────────────────────────────────────────────────────

#[tokio::test]
async fn service_create_then_duplicate_conflicts() {
  let svc = UserService::new(store().await);

  let created = svc
    .create(new_user("Alice", "Liddell", "a@x.com"))
    .await
    .unwrap();
  assert!(created.active);

  let err = svc
    .create(new_user("Impostor", "Alice", "a@x.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::EmailTaken(ref e) if e == "a@x.com"));
}

#[tokio::test]
async fn service_get_missing_is_not_found() {
  let svc = UserService::new(store().await);
  let err = svc.get(42).await.unwrap_err();
  assert!(matches!(err, ServiceError::NotFound(42)));
}

#[tokio::test]
async fn service_get_by_email_keys_not_found_on_the_email() {
  let svc = UserService::new(store().await);
  let err = svc.get_by_email("nobody@example.com").await.unwrap_err();
  assert!(
    matches!(err, ServiceError::EmailNotFound(ref e) if e == "nobody@example.com")
  );
}

// ─── Service: partial update ─────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_only_present_fields() {
  let svc = UserService::new(store().await);
  let created = svc
    .create(new_user("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();

  let patch = UserPatch { first_name: Some("New".into()), ..Default::default() };
  let updated = svc.update(created.id, patch).await.unwrap();

  assert_eq!(updated.first_name, "New");
  assert_eq!(updated.last_name, created.last_name);
  assert_eq!(updated.email, created.email);
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at > created.updated_at);

  // Persisted, not just returned.
  let fetched = svc.get(created.id).await.unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_to_taken_email_conflicts() {
  let svc = UserService::new(store().await);
  svc.create(new_user("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();
  let bob = svc
    .create(new_user("Bob", "Stone", "bob@example.com"))
    .await
    .unwrap();

  let patch =
    UserPatch { email: Some("alice@example.com".into()), ..Default::default() };
  let err = svc.update(bob.id, patch).await.unwrap_err();
  assert!(matches!(err, ServiceError::EmailTaken(ref e) if e == "alice@example.com"));
}

#[tokio::test]
async fn update_to_own_email_is_not_a_conflict() {
  let svc = UserService::new(store().await);
  let alice = svc
    .create(new_user("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();

  let patch =
    UserPatch { email: Some("alice@example.com".into()), ..Default::default() };
  let updated = svc.update(alice.id, patch).await.unwrap();

  assert_eq!(updated.email, "alice@example.com");
  // Even a no-op email refreshes updated_at.
  assert!(updated.updated_at > alice.updated_at);
}

#[tokio::test]
async fn update_missing_user_is_not_found() {
  let svc = UserService::new(store().await);
  let err = svc.update(7, UserPatch::default()).await.unwrap_err();
  assert!(matches!(err, ServiceError::NotFound(7)));
}

#[tokio::test]
async fn update_can_reactivate() {
  let svc = UserService::new(store().await);
  let alice = svc
    .create(new_user("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();
  svc.soft_delete(alice.id).await.unwrap();

  let patch = UserPatch { active: Some(true), ..Default::default() };
  let updated = svc.update(alice.id, patch).await.unwrap();
  assert!(updated.active);
}

// ─── Service: soft delete ────────────────────────────────────────────────────

#[tokio::test]
async fn soft_delete_keeps_the_row_fetchable() {
  let svc = UserService::new(store().await);
  let alice = svc
    .create(new_user("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();

  svc.soft_delete(alice.id).await.unwrap();

  let fetched = svc.get(alice.id).await.unwrap();
  assert!(!fetched.active);
  assert_eq!(fetched.email, alice.email);

  // Still resolvable by email too.
  let by_email = svc.get_by_email("alice@example.com").await.unwrap();
  assert_eq!(by_email.id, alice.id);
}

#[tokio::test]
async fn soft_delete_is_idempotent_in_effect() {
  let svc = UserService::new(store().await);
  let alice = svc
    .create(new_user("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();

  svc.soft_delete(alice.id).await.unwrap();
  svc.soft_delete(alice.id).await.unwrap();

  assert!(!svc.get(alice.id).await.unwrap().active);

  let err = svc.soft_delete(alice.id + 1).await.unwrap_err();
  assert!(matches!(err, ServiceError::NotFound(_)));
}
