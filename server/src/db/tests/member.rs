use teamgate_misc::api::member::{MemberStatus, TeamMember};
use uuid::Uuid;

use super::*;
use crate::db::types::ValidationFailed;
use crate::db::Database;

fn member_input(team_id: &str, user_id: Option<&str>, email: Option<&str>) -> TeamMember {
    TeamMember {
        id: Uuid::new_v4().to_string(),
        team_id: team_id.to_string(),
        user_id: user_id.map(String::from),
        email: email.map(String::from),
        status: MemberStatus::Pending,
        create_time: 0,
        update_time: 0,
    }
}

#[test]
fn test_member_lifecycle() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");

        let member = create_test_member(tx, &team.id, Some("user1"), None, MemberStatus::Pending);
        let found = tx.get_member(&member.id)?.unwrap();
        assert_eq!(found.status, MemberStatus::Pending);
        assert_eq!(found.user_id.as_deref(), Some("user1"));
        assert!(found.email.is_none());

        tx.update_member_status(&member.id, MemberStatus::Active, 100)?;
        let found = tx.get_member(&member.id)?.unwrap();
        assert_eq!(found.status, MemberStatus::Active);
        assert_eq!(found.update_time, 100);

        tx.delete_member(&member.id)?;
        assert!(tx.get_member(&member.id)?.is_none());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_member_requires_exactly_one_identity() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");

        let err = tx
            .create_member(&member_input(&team.id, None, None))
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationFailed>().is_some());

        let err = tx
            .create_member(&member_input(
                &team.id,
                Some("user1"),
                Some("user1@example.com"),
            ))
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationFailed>().is_some());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_member_duplicate_user_rejected() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");
        let other = create_test_team(tx, &ws.id, "sales");

        create_test_member(tx, &team.id, Some("user1"), None, MemberStatus::Active);

        let err = tx
            .create_member(&member_input(&team.id, Some("user1"), None))
            .unwrap_err();
        let failed = err.downcast_ref::<ValidationFailed>().unwrap();
        assert_eq!(failed.field, "user_id");

        // The same user may belong to a different team.
        tx.create_member(&member_input(&other.id, Some("user1"), None))?;
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_member_duplicate_email_rejected() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");

        create_test_member(
            tx,
            &team.id,
            None,
            Some("invitee@example.com"),
            MemberStatus::Pending,
        );

        let err = tx
            .create_member(&member_input(&team.id, None, Some("invitee@example.com")))
            .unwrap_err();
        let failed = err.downcast_ref::<ValidationFailed>().unwrap();
        assert_eq!(failed.field, "email");
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_activate_member_binds_user() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");

        let invite = create_test_member(
            tx,
            &team.id,
            None,
            Some("invitee@example.com"),
            MemberStatus::Pending,
        );
        tx.activate_member(&invite, "user1", 100)?;

        let found = tx.get_member(&invite.id)?.unwrap();
        assert_eq!(found.status, MemberStatus::Active);
        assert_eq!(found.user_id.as_deref(), Some("user1"));
        assert_eq!(found.update_time, 100);

        // Accepting cannot create a duplicate (team_id, user_id) pair
        let other = create_test_member(
            tx,
            &team.id,
            None,
            Some("other@example.com"),
            MemberStatus::Pending,
        );
        let err = tx.activate_member(&other, "user1", 101).unwrap_err();
        assert!(err.downcast_ref::<ValidationFailed>().is_some());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_list_members() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");
        let other = create_test_team(tx, &ws.id, "sales");

        create_test_member(tx, &team.id, Some("user1"), None, MemberStatus::Active);
        create_test_member(
            tx,
            &team.id,
            None,
            Some("invitee@example.com"),
            MemberStatus::Pending,
        );
        create_test_member(tx, &other.id, Some("user2"), None, MemberStatus::Active);

        let members = tx.list_members(&team.id)?;
        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| m.team_id == team.id));
        Ok(())
    })
    .unwrap();
}
