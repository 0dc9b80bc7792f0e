//! Rejected operations: each one must leave the published state untouched

use peach_core::{
    ClientId, ClientPatch, DeskError, InternalStatus, LocationId, LocationPatch, RecordKind,
    Role, TaskId, UserId, UserPatch, ValidationError,
};
use peach_store::api::*;
use peach_test_utils::{
    empty_handle, sample_client, sample_location, sample_user, seeded_handle, task,
};
use std::sync::Arc;

fn assert_untouched(desk: &peach_store::DeskHandle, before: &Arc<peach_store::DeskState>) {
    assert!(Arc::ptr_eq(before, &desk.snapshot()));
}

#[test]
fn test_unknown_task_is_not_found() {
    let desk = seeded_handle();
    let before = desk.snapshot();

    let err = desk.mark_delivered(&TaskId::new("unknown-id")).unwrap_err();
    assert_eq!(err, DeskError::not_found(RecordKind::Task, "unknown-id"));
    assert_eq!(err.code(), "not_found");

    assert!(desk.start_writing(&TaskId::new("unknown-id")).unwrap_err().is_not_found());
    assert!(desk.save_draft(&TaskId::new("unknown-id"), "x").unwrap_err().is_not_found());
    assert!(desk
        .reassign_task(&TaskId::new("unknown-id"), &UserId::new("w1"))
        .unwrap_err()
        .is_not_found());

    assert_untouched(&desk, &before);
    assert_eq!(desk.global_activity().len(), before.global_activity.len());
}

#[test]
fn test_strict_policy_rejects_out_of_order_actions() {
    let desk = seeded_handle();
    let before = desk.snapshot();

    // t1 is New
    let err = desk.mark_delivered(&TaskId::new("t1")).unwrap_err();
    assert!(matches!(err, DeskError::InvalidTransition(ref e) if e.from == InternalStatus::New));
    assert!(matches!(
        desk.mark_written(&TaskId::new("t1")),
        Err(DeskError::InvalidTransition(_))
    ));

    // t3 is Written, t4 Delivered
    assert!(desk.start_writing(&TaskId::new("t3")).is_err());
    assert!(desk.mark_delivered(&TaskId::new("t4")).is_err());

    assert_untouched(&desk, &before);
}

#[test]
fn test_repeating_an_action_is_rejected() {
    let desk = seeded_handle();
    let id = TaskId::new("t6");
    desk.start_writing(&id).unwrap();
    let before = desk.snapshot();

    assert!(desk.start_writing(&id).is_err());
    assert_untouched(&desk, &before);
    assert_eq!(task(&desk.snapshot(), "t6").internal_status, InternalStatus::Writing);
}

#[test]
fn test_bad_password_keeps_the_session() {
    let desk = seeded_handle();
    desk.login_role(Role::Provider).unwrap();
    let before = desk.snapshot();

    let err = desk.login("admin@peachreviews.com", "hunter2").unwrap_err();
    assert_eq!(err.code(), "auth");
    assert!(desk.login("nobody@peachreviews.com", "password").is_err());
    assert!(desk.login("", "").is_err());

    assert_untouched(&desk, &before);
    assert_eq!(desk.current_user().unwrap().id, "p1");
}

#[test]
fn test_login_without_users_of_that_role() {
    let desk = empty_handle();
    let err = desk.login("writer@peachreviews.com", "password").unwrap_err();
    assert!(err.is_not_found());
    assert!(desk.current_user().is_none());
}

#[test]
fn test_blank_names_are_rejected() {
    let desk = seeded_handle();
    let before = desk.snapshot();

    let mut client = sample_client("c9");
    client.name = "   ".into();
    assert!(matches!(
        desk.add_client(client),
        Err(DeskError::Validation(ValidationError::Blank { .. }))
    ));

    let err = desk
        .update_location(&LocationId::new("l1"), LocationPatch::new().with_name(""))
        .unwrap_err();
    assert_eq!(err.code(), "validation");

    assert_untouched(&desk, &before);
}

#[test]
fn test_field_level_validation() {
    let desk = seeded_handle();
    let before = desk.snapshot();

    let mut user = sample_user("w9", Role::Writer);
    user.email = "not-an-email".into();
    assert!(matches!(
        desk.add_user(user),
        Err(DeskError::Validation(ValidationError::InvalidEmail(_)))
    ));

    assert!(matches!(
        desk.update_client(&ClientId::new("c1"), ClientPatch::new().with_mrr(-10.0)),
        Err(DeskError::Validation(ValidationError::InvalidMrr(_)))
    ));

    assert!(matches!(
        desk.update_location(&LocationId::new("l2"), LocationPatch::new().with_sla_hours(0)),
        Err(DeskError::Validation(ValidationError::ZeroSlaHours))
    ));

    assert!(matches!(
        desk.update_user(&UserId::new("w1"), UserPatch::new().with_email("alice")),
        Err(DeskError::Validation(ValidationError::InvalidEmail(_)))
    ));

    assert_untouched(&desk, &before);
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let desk = seeded_handle();
    let before = desk.snapshot();

    assert!(matches!(
        desk.add_client(sample_client("c1")),
        Err(DeskError::Validation(ValidationError::DuplicateId { .. }))
    ));
    assert!(desk.add_location(sample_location("l1", "c1")).is_err());
    assert!(desk.add_user(sample_user("w1", Role::Writer)).is_err());

    assert_untouched(&desk, &before);
}

#[test]
fn test_unknown_directory_ids_are_not_found() {
    let desk = seeded_handle();
    let before = desk.snapshot();

    let err = desk
        .update_client(&ClientId::new("c404"), ClientPatch::new().with_name("x"))
        .unwrap_err();
    assert_eq!(err, DeskError::not_found(RecordKind::Client, "c404"));

    assert!(desk.delete_client(&ClientId::new("c404")).unwrap_err().is_not_found());
    assert!(desk.delete_location(&LocationId::new("l404")).unwrap_err().is_not_found());
    assert!(desk.delete_user(&UserId::new("u404")).unwrap_err().is_not_found());
    assert!(desk
        .update_user(&UserId::new("u404"), UserPatch::new())
        .unwrap_err()
        .is_not_found());

    assert_untouched(&desk, &before);
}

#[test]
fn test_rejections_are_not_published() {
    let desk = seeded_handle();
    let rx = desk.subscribe();

    let _ = desk.mark_delivered(&TaskId::new("t1"));
    let _ = desk.add_client(sample_client("c1"));
    assert!(!rx.has_changed().unwrap());

    desk.start_writing(&TaskId::new("t1")).unwrap();
    assert!(rx.has_changed().unwrap());
}
