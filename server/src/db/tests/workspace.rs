use teamgate_misc::api::member::MemberStatus;
use teamgate_misc::api::Query;

use super::*;
use crate::db::Database;

#[test]
fn test_workspace_crud() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");

        let found = tx.get_workspace(&ws.id)?.unwrap();
        assert_eq!(found.slug, "acme");
        assert_eq!(found.owner_user_id, "owner1");
        assert_eq!(found.tenant_id, "tenant1");

        tx.update_workspace(&ws.id, "Acme Corp", 100)?;
        let found = tx.get_workspace(&ws.id)?.unwrap();
        assert_eq!(found.name, "Acme Corp");
        assert_eq!(found.update_time, 100);

        tx.delete_workspace(&ws.id)?;
        assert!(tx.get_workspace(&ws.id)?.is_none());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_workspace_list_scoped_by_tenant() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        create_test_workspace(tx, "tenant1", "acme", "owner1");
        create_test_workspace(tx, "tenant1", "globex", "owner1");
        create_test_workspace(tx, "tenant2", "initech", "owner2");

        let list = tx.list_workspaces("tenant1", Query::default())?;
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|ws| ws.tenant_id == "tenant1"));

        assert_eq!(tx.count_workspaces("tenant1", Query::default())?, 2);
        assert_eq!(tx.count_workspaces("tenant2", Query::default())?, 1);
        assert_eq!(tx.count_workspaces("tenant3", Query::default())?, 0);

        let query = Query {
            search: Some(String::from("glo")),
            ..Default::default()
        };
        let list = tx.list_workspaces("tenant1", query)?;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].slug, "globex");
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_workspace_slug_exists() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        create_test_workspace(tx, "tenant1", "acme", "owner1");

        assert!(tx.workspace_slug_exists("tenant1", "acme")?);
        assert!(!tx.workspace_slug_exists("tenant1", "globex")?);
        // Slugs are unique per tenant, not globally.
        assert!(!tx.workspace_slug_exists("tenant2", "acme")?);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_workspace_delete_cascades() {
    let db = Database::new_test();
    db.with_transaction(|tx| {
        let ws = create_test_workspace(tx, "tenant1", "acme", "owner1");
        let team = create_test_team(tx, &ws.id, "eng");
        let member = create_test_member(tx, &team.id, Some("user1"), None, MemberStatus::Active);
        let perm = create_test_permission(tx, "tenant1", "teams:view");
        tx.sync_team_permissions(&team.id, &[perm.id.clone()])?;

        tx.delete_workspace(&ws.id)?;

        assert!(tx.get_team(&team.id)?.is_none());
        assert!(tx.get_member(&member.id)?.is_none());
        assert!(tx.list_team_permissions(&team.id)?.is_empty());
        // The permission itself belongs to the tenant, not the workspace.
        assert!(tx.get_permission(&perm.id)?.is_some());
        Ok(())
    })
    .unwrap();
}
