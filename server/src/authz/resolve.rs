use anyhow::Result;
use teamgate_misc::api::workspace::Workspace;

use crate::db::types::Transaction;

/// Decides whether a user holds a capability in a workspace.
///
/// Ownership is an absolute override: the owner passes without any store
/// lookup. Otherwise the user must be an *active* member of at least one
/// team in the workspace holding the permission slug; pending or removed
/// memberships never contribute. This is the single permission-check
/// implementation in the repo, every facade goes through it.
pub fn has_permission(
    tx: &dyn Transaction,
    user_id: &str,
    workspace: &Workspace,
    slug: &str,
) -> Result<bool> {
    if user_id == workspace.owner_user_id {
        return Ok(true);
    }

    tx.user_has_team_permission(&workspace.id, user_id, slug)
}
