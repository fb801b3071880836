mod common;

use ptrack_core::project::{self, model::ProjectChanges};
use ptrack_core::task::{self, model::TaskChanges};
use ptrack_core::{ErrorKind, TrackerError};

#[test]
fn non_owner_cannot_create_tasks() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let member = common::user(&pool, "member");
    let stranger = common::user(&pool, "stranger");

    let p = project::create_project(&pool, &owner, "Launch", "", &[member.id.clone()]).unwrap();
    let t = task::create_task(&pool, &owner, &p.id, "Done", "", &owner.id).unwrap();
    task::update_task_progress(&pool, &owner, &t.id, 100, Some(true)).unwrap();

    for who in [&member, &stranger] {
        let err = task::create_task(&pool, who, &p.id, "Sneaky", "", &who.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    let tasks = task::list_tasks(&pool, &owner, Some(&p.id)).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(project::get_project(&pool, &owner, &p.id).unwrap().progress, 100);
}

#[test]
fn only_assignee_updates_task() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let dev = common::user(&pool, "dev");

    let p = project::create_project(&pool, &owner, "Launch", "", &[dev.id.clone()]).unwrap();
    let t = task::create_task(&pool, &owner, &p.id, "Copy", "", &dev.id).unwrap();

    let err = task::update_task_progress(&pool, &owner, &t.id, 50, Some(false)).unwrap_err();
    assert!(matches!(err, TrackerError::Forbidden(_)));

    let err = task::update_task(
        &pool,
        &owner,
        &t.id,
        &TaskChanges {
            name: Some("Renamed".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, TrackerError::Forbidden(_)));

    let t = task::update_task_progress(&pool, &dev, &t.id, 50, Some(false)).unwrap();
    assert_eq!(t.progress, 50);
}

#[test]
fn authorization_is_checked_before_validation() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let dev = common::user(&pool, "dev");

    let p = project::create_project(&pool, &owner, "Launch", "", &[]).unwrap();
    let t = task::create_task(&pool, &owner, &p.id, "Copy", "", &dev.id).unwrap();

    let err = task::update_task_progress(&pool, &owner, &t.id, 150, Some(true)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[test]
fn membership_grants_view_but_not_modify() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let member = common::user(&pool, "member");
    let stranger = common::user(&pool, "stranger");

    let p = project::create_project(&pool, &owner, "Launch", "", &[]).unwrap();
    assert!(matches!(
        project::get_project(&pool, &member, &p.id).unwrap_err(),
        TrackerError::Forbidden(_)
    ));

    let p = project::add_member(&pool, &owner, &p.id, &member.id).unwrap();
    assert_eq!(p.members, vec![member.id.clone()]);
    assert!(project::get_project(&pool, &member, &p.id).is_ok());
    assert!(project::get_project(&pool, &owner, &p.id).is_ok());

    let err = project::add_member(&pool, &member, &p.id, &stranger.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = project::update_project(
        &pool,
        &member,
        &p.id,
        &ProjectChanges {
            name: Some("Mine now".into()),
            description: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert!(project::get_project(&pool, &stranger, &p.id).is_err());
}

#[test]
fn adding_a_member_twice_is_a_no_op() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let member = common::user(&pool, "member");

    let p = project::create_project(&pool, &owner, "Launch", "", &[member.id.clone()]).unwrap();
    let again = project::add_member(&pool, &owner, &p.id, &member.id).unwrap();
    assert_eq!(again.members, p.members);

    let removed = project::remove_member(&pool, &owner, &p.id, &member.id).unwrap();
    assert!(removed.members.is_empty());
    let removed_again = project::remove_member(&pool, &owner, &p.id, &member.id).unwrap();
    assert!(removed_again.members.is_empty());
}

#[test]
fn unknown_records_are_not_found() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let p = project::create_project(&pool, &owner, "Launch", "", &[]).unwrap();

    assert!(matches!(
        project::get_project(&pool, &owner, "missing").unwrap_err(),
        TrackerError::ProjectNotFound(_)
    ));
    assert!(matches!(
        task::get_task(&pool, &owner, "missing").unwrap_err(),
        TrackerError::TaskNotFound(_)
    ));
    assert!(matches!(
        project::add_member(&pool, &owner, &p.id, "ghost").unwrap_err(),
        TrackerError::UserNotFound(_)
    ));
    assert!(matches!(
        task::create_task(&pool, &owner, &p.id, "Copy", "", "ghost").unwrap_err(),
        TrackerError::UserNotFound(_)
    ));
    assert!(matches!(
        project::create_project(&pool, &owner, "Other", "", &["ghost".to_string()]).unwrap_err(),
        TrackerError::UserNotFound(_)
    ));
    assert_eq!(project::list_projects(&pool, &owner).unwrap().len(), 1);
}

#[test]
fn administrator_bypasses_ownership_and_membership() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let dev = common::user(&pool, "dev");
    let root = common::admin(&pool, "root");

    let p = project::create_project(&pool, &owner, "Launch", "", &[]).unwrap();
    assert!(project::get_project(&pool, &root, &p.id).is_ok());
    assert_eq!(project::list_projects(&pool, &root).unwrap().len(), 1);

    let p = project::add_member(&pool, &root, &p.id, &dev.id).unwrap();
    assert!(p.has_member(&dev.id));

    let t = task::create_task(&pool, &root, &p.id, "Copy", "", &dev.id).unwrap();
    let t = task::update_task_progress(&pool, &root, &t.id, 100, Some(true)).unwrap();
    assert!(t.completed);
    assert_eq!(task::list_tasks(&pool, &root, None).unwrap().len(), 1);

    let p = project::update_project(
        &pool,
        &root,
        &p.id,
        &ProjectChanges {
            name: Some("Renamed".into()),
            description: None,
        },
    )
    .unwrap();
    assert_eq!(p.name, "Renamed");
    assert_eq!(p.progress, 100);

    task::delete_task(&pool, &root, &t.id).unwrap();
    project::delete_project(&pool, &root, &p.id).unwrap();
    assert!(project::list_projects(&pool, &root).unwrap().is_empty());
}

#[test]
fn listings_only_show_visible_records() {
    let pool = common::pool();
    let alice = common::user(&pool, "alice");
    let bob = common::user(&pool, "bob");

    let mine = project::create_project(&pool, &alice, "Alice's", "", &[]).unwrap();
    let shared = project::create_project(&pool, &bob, "Shared", "", &[alice.id.clone()]).unwrap();
    let private = project::create_project(&pool, &bob, "Bob's", "", &[]).unwrap();

    task::create_task(&pool, &alice, &mine.id, "a", "", &alice.id).unwrap();
    task::create_task(&pool, &bob, &shared.id, "b", "", &bob.id).unwrap();
    task::create_task(&pool, &bob, &private.id, "c", "", &alice.id).unwrap();

    let visible: Vec<String> = project::list_projects(&pool, &alice)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(visible.len(), 2);
    assert!(!visible.contains(&private.id));

    let tasks = task::list_tasks(&pool, &alice, None).unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.project_id != private.id));

    let err = task::list_tasks(&pool, &alice, Some(&private.id)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[test]
fn only_owner_deletes_project() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let member = common::user(&pool, "member");

    let p = project::create_project(&pool, &owner, "Launch", "", &[member.id.clone()]).unwrap();
    task::create_task(&pool, &owner, &p.id, "Copy", "", &member.id).unwrap();

    assert_eq!(
        project::delete_project(&pool, &member, &p.id).unwrap_err().kind(),
        ErrorKind::Authorization
    );
    project::delete_project(&pool, &owner, &p.id).unwrap();
    assert!(task::list_tasks(&pool, &owner, None).unwrap().is_empty());
}

#[test]
fn assignee_cannot_delete_task() {
    let pool = common::pool();
    let owner = common::user(&pool, "owner");
    let dev = common::user(&pool, "dev");

    let p = project::create_project(&pool, &owner, "Launch", "", &[dev.id.clone()]).unwrap();
    let open = task::create_task(&pool, &owner, &p.id, "Copy", "", &dev.id).unwrap();
    let done = task::create_task(&pool, &owner, &p.id, "Logo", "", &dev.id).unwrap();
    task::update_task_progress(&pool, &dev, &done.id, 100, Some(true)).unwrap();

    let err = task::delete_task(&pool, &dev, &open.id).unwrap_err();
    assert!(matches!(err, TrackerError::Forbidden(_)));
    assert_eq!(project::get_project(&pool, &owner, &p.id).unwrap().progress, 50);

    task::delete_task(&pool, &owner, &open.id).unwrap();
    assert_eq!(project::get_project(&pool, &owner, &p.id).unwrap().progress, 100);
}
