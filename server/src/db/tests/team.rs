use teamgate_misc::api::member::MemberStatus;
use teamgate_misc::api::Query;

use super::*;
use crate::db::types::PatchTeamParams;
use crate::db::Database;

#[test]
fn test_team_crud() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");

        let found = tx.get_team(&team.id)?.unwrap();
        assert_eq!(found.slug, "eng");
        assert_eq!(found.workspace_id, ws.id);
        assert!(found.description.is_none());

        tx.update_team(PatchTeamParams {
            id: team.id.clone(),
            name: Some(String::from("Engineering")),
            description: Some(String::from("builds things")),
            update_time: 100,
        })?;
        let found = tx.get_team(&team.id)?.unwrap();
        assert_eq!(found.name, "Engineering");
        assert_eq!(found.description.as_deref(), Some("builds things"));
        assert_eq!(found.update_time, 100);

        tx.delete_team(&team.id)?;
        assert!(tx.get_team(&team.id)?.is_none());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_team_list_scoped_by_workspace() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws1 = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let ws2 = create_test_workspace(tx, "tenant1", "globex", "owner1");
        create_test_team(tx, &ws1.id, "eng");
        create_test_team(tx, &ws1.id, "sales");
        create_test_team(tx, &ws2.id, "eng");

        assert_eq!(tx.list_teams(&ws1.id, Query::default())?.len(), 2);
        assert_eq!(tx.count_teams(&ws2.id, Query::default())?, 1);

        assert!(tx.team_slug_exists(&ws1.id, "sales")?);
        assert!(!tx.team_slug_exists(&ws2.id, "sales")?);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_sync_team_permissions() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");
        let view = create_test_permission(tx, "tenant1", "teams:view");
        let update = create_test_permission(tx, "tenant1", "teams:update");
        let delete = create_test_permission(tx, "tenant1", "teams:delete");

        tx.sync_team_permissions(&team.id, &[view.id.clone(), update.id.clone()])?;
        let mut slugs: Vec<_> = tx
            .list_team_permissions(&team.id)?
            .into_iter()
            .map(|p| p.slug)
            .collect();
        slugs.sort();
        assert_eq!(slugs, vec!["teams:update", "teams:view"]);

        // Repeating with the same set is idempotent.
        tx.sync_team_permissions(&team.id, &[view.id.clone(), update.id.clone()])?;
        assert_eq!(tx.list_team_permissions(&team.id)?.len(), 2);

        // A sync replaces the set, it does not append.
        tx.sync_team_permissions(&team.id, &[delete.id.clone()])?;
        let perms = tx.list_team_permissions(&team.id)?;
        assert_eq!(perms.len(), 1);
        assert_eq!(perms[0].slug, "teams:delete");

        tx.sync_team_permissions(&team.id, &[])?;
        assert!(tx.list_team_permissions(&team.id)?.is_empty());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_team_delete_cascades() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");
        let member = create_test_member(tx, &team.id, Some("user1"), None, MemberStatus::Active);
        let perm = create_test_permission(tx, "tenant1", "teams:view");
        tx.sync_team_permissions(&team.id, &[perm.id.clone()])?;

        tx.delete_team(&team.id)?;

        assert!(tx.get_member(&member.id)?.is_none());
        assert!(tx.list_team_permissions(&team.id)?.is_empty());
        assert!(tx.get_workspace(&ws.id)?.is_some());
        assert!(tx.get_permission(&perm.id)?.is_some());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_permission_delete_detaches_links() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");
        let view = create_test_permission(tx, "tenant1", "teams:view");
        let update = create_test_permission(tx, "tenant1", "teams:update");
        tx.sync_team_permissions(&team.id, &[view.id.clone(), update.id.clone()])?;

        tx.delete_permission(&view.id)?;

        assert!(tx.get_permission(&view.id)?.is_none());
        let perms = tx.list_team_permissions(&team.id)?;
        assert_eq!(perms.len(), 1);
        assert_eq!(perms[0].id, update.id);
        Ok(())
    })
    .unwrap();
}
