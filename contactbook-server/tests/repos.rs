//! Repository behavior against a real database

mod common;

use chrono::NaiveDate;

use contactbook_server::db::{ContactRepo, DbError, NoteRepo, TagRepo};
use contactbook_server::models::{
    ContactUpdate, NoteCreate, NoteStatusUpdate, NoteUpdate, Pagination, TagInput,
};

use common::{contact, pool, unique, user};

#[tokio::test]
#[ignore = "requires database"]
async fn create_contact_echoes_fields_and_owner() {
    let pool = pool().await;
    let owner = user(&pool).await;
    let email = format!("{}@example.com", unique("c"));

    let created = ContactRepo::new(&pool)
        .create(&contact(&email), Some(owner.id))
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.email, email);
    assert_eq!(created.user_id, Some(owner.id));
    assert_eq!(created.birthday.to_string(), "1990-05-17");
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_rows_are_none() {
    let pool = pool().await;

    assert!(ContactRepo::new(&pool).get(-1, None).await.unwrap().is_none());
    assert!(NoteRepo::new(&pool).get(-1).await.unwrap().is_none());
    assert!(TagRepo::new(&pool).get(-1).await.unwrap().is_none());
    assert!(TagRepo::new(&pool).delete(-1).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn foreign_owner_sees_nothing() {
    let pool = pool().await;
    let alice = user(&pool).await;
    let bob = user(&pool).await;
    let repo = ContactRepo::new(&pool);

    let email = format!("{}@example.com", unique("c"));
    let c = repo.create(&contact(&email), Some(alice.id)).await.unwrap();

    assert!(repo.get(c.id, Some(bob.id)).await.unwrap().is_none());
    assert!(repo.delete(c.id, Some(bob.id)).await.unwrap().is_none());
    assert!(repo.get(c.id, Some(alice.id)).await.unwrap().is_some());
}

#[tokio::test]
#[ignore = "requires database"]
async fn partial_update_keeps_other_fields() {
    let pool = pool().await;
    let repo = ContactRepo::new(&pool);
    let email = format!("{}@example.com", unique("c"));
    let c = repo.create(&contact(&email), None).await.unwrap();

    let update = ContactUpdate {
        phone: Some("555-0199".into()),
        ..Default::default()
    };
    let updated = repo.update(c.id, &update, None).await.unwrap().unwrap();

    assert_eq!(updated.phone, "555-0199");
    assert_eq!(updated.name, c.name);
    assert_eq!(updated.email, c.email);
    assert!(updated.updated_at >= c.updated_at);
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_matches_lastname_case_insensitively() {
    let pool = pool().await;
    let owner = user(&pool).await;
    let repo = ContactRepo::new(&pool);

    let mut body = contact(&format!("{}@example.com", unique("c")));
    body.lastname = unique("Zq");
    repo.create(&body, Some(owner.id)).await.unwrap();

    let found = repo
        .list(
            Pagination::new(10, 0),
            Some(owner.id),
            Some(&body.lastname.to_lowercase()),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].lastname, body.lastname);
}

#[tokio::test]
#[ignore = "requires database"]
async fn note_update_replaces_tag_set() {
    let pool = pool().await;
    let tags = TagRepo::new(&pool);
    let t1 = tags.create(&TagInput { name: unique("a") }).await.unwrap();
    let t2 = tags.create(&TagInput { name: unique("b") }).await.unwrap();
    let t3 = tags.create(&TagInput { name: unique("c") }).await.unwrap();

    let notes = NoteRepo::new(&pool);
    let note = notes
        .create(&NoteCreate {
            title: "groceries".into(),
            description: "milk".into(),
            tags: vec![t1.id, t2.id, -5],
        })
        .await
        .unwrap();
    // unknown id dropped silently
    assert_eq!(note.tags.len(), 2);
    assert!(!note.done);

    let updated = notes
        .update(
            note.id,
            &NoteUpdate {
                title: "groceries".into(),
                description: "milk, eggs".into(),
                done: false,
                tags: vec![t3.id],
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.tags, vec![t3.clone()]);

    let patched = notes
        .update_status(note.id, NoteStatusUpdate { done: true })
        .await
        .unwrap()
        .unwrap();
    assert!(patched.done);
    assert_eq!(patched.description, "milk, eggs");
    assert_eq!(patched.tags, vec![t3]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_contact_keeps_attached_notes() {
    let pool = pool().await;
    let contacts = ContactRepo::new(&pool);
    let notes = NoteRepo::new(&pool);

    let c = contacts
        .create(&contact(&format!("{}@example.com", unique("c"))), None)
        .await
        .unwrap();
    let note = notes
        .create(&NoteCreate {
            title: "call back".into(),
            description: "about the lease".into(),
            tags: vec![],
        })
        .await
        .unwrap();

    assert!(contacts.attach_note(c.id, note.id, None).await.unwrap());
    // idempotent
    assert!(contacts.attach_note(c.id, note.id, None).await.unwrap());
    assert!(!contacts.attach_note(c.id, -1, None).await.unwrap());
    assert_eq!(notes.list_for_contact(c.id).await.unwrap().len(), 1);

    contacts.delete(c.id, None).await.unwrap().unwrap();

    assert!(notes.get(note.id).await.unwrap().is_some());
    assert!(notes.list_for_contact(c.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicates_are_conflicts() {
    let pool = pool().await;

    let name = unique("dup");
    TagRepo::new(&pool)
        .create(&TagInput { name: name.clone() })
        .await
        .unwrap();
    let err = TagRepo::new(&pool)
        .create(&TagInput { name })
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict { ref constraint } if constraint == "tags_name_key"));

    let email = format!("{}@example.com", unique("c"));
    let contacts = ContactRepo::new(&pool);
    contacts.create(&contact(&email), None).await.unwrap();
    let err = contacts.create(&contact(&email), None).await.unwrap_err();
    assert!(
        matches!(err, DbError::Conflict { ref constraint } if constraint == "contacts_email_key")
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn confirm_and_avatar_round_trip() {
    let pool = pool().await;
    let u = user(&pool).await;
    let users = contactbook_server::db::UserRepo::new(&pool);

    assert!(!u.confirmed);
    assert!(u.avatar.as_deref().unwrap_or_default().starts_with("https://www.gravatar.com/avatar/"));

    assert!(users.confirm_email(&u.email).await.unwrap());
    assert!(users.get_by_email(&u.email).await.unwrap().unwrap().confirmed);

    let updated = users
        .update_avatar_url(&u.email, Some("https://res.cloudinary.com/x.png"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.avatar.as_deref(), Some("https://res.cloudinary.com/x.png"));

    users.update_token(u.id, Some("rt")).await.unwrap();
    let reloaded = users.get_by_email(&u.email).await.unwrap().unwrap();
    assert_eq!(reloaded.refresh_token.as_deref(), Some("rt"));
}

async fn born_on(contacts: &ContactRepo<'_>, owner: i32, birthday: NaiveDate) -> i32 {
    let mut body = contact(&format!("{}@example.com", unique("b")));
    body.birthday = birthday;
    contacts.create(&body, Some(owner)).await.unwrap().id
}

#[tokio::test]
#[ignore = "requires database"]
async fn upcoming_birthdays_in_window_for_owner() {
    let pool = pool().await;
    let owner = user(&pool).await;
    let other = user(&pool).await;
    let contacts = ContactRepo::new(&pool);

    let born = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let soon = born_on(&contacts, owner.id, born(1990, 3, 12)).await;
    let edge = born_on(&contacts, owner.id, born(1985, 3, 17)).await;
    born_on(&contacts, owner.id, born(1990, 3, 20)).await;
    born_on(&contacts, owner.id, born(1990, 4, 12)).await;
    born_on(&contacts, other.id, born(1991, 3, 11)).await;

    let today = born(2024, 3, 10);
    let found = contacts.upcoming_birthdays(Some(owner.id), today).await.unwrap();
    let ids: Vec<i32> = found.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![edge, soon]);

    // Window wraps past month end and matches nothing
    born_on(&contacts, owner.id, born(1990, 3, 30)).await;
    let late = contacts
        .upcoming_birthdays(Some(owner.id), born(2024, 3, 28))
        .await
        .unwrap();
    assert!(late.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_tag_detaches_it_from_notes() {
    let pool = pool().await;
    let tags = TagRepo::new(&pool);
    let notes = NoteRepo::new(&pool);

    let keep = tags.create(&TagInput { name: unique("keep") }).await.unwrap();
    let gone = tags.create(&TagInput { name: unique("gone") }).await.unwrap();
    let note = notes
        .create(&NoteCreate {
            title: "tagged".into(),
            description: "two tags".into(),
            tags: vec![keep.id, gone.id],
        })
        .await
        .unwrap();
    assert_eq!(note.tags.len(), 2);

    let deleted = tags.delete(gone.id).await.unwrap().unwrap();
    assert_eq!(deleted.id, gone.id);
    assert!(tags.get(gone.id).await.unwrap().is_none());

    let reloaded = notes.get(note.id).await.unwrap().unwrap();
    assert_eq!(reloaded.title, "tagged");
    assert_eq!(reloaded.tags, vec![keep]);
}
