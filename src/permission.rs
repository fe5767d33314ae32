//! Collection capability resolution.
//!
//! Every mutation of a link is gated on what the caller may do with the
//! link's collection. The resolver loads the collection's owner and member
//! rows once and reduces them to a [`Capability`].

use anyhow::Result;
use sqlx::SqlitePool;

use crate::db::{self, CollectionMember};

/// What a user may do with a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Owner,
    MemberWithUpdate,
    MemberReadOnly,
    NoAccess,
}

impl Capability {
    /// Owner or a member allowed to edit links.
    #[must_use]
    pub const fn can_update(self) -> bool {
        matches!(self, Self::Owner | Self::MemberWithUpdate)
    }

    /// Any relationship with the collection at all.
    #[must_use]
    pub const fn has_access(self) -> bool {
        !matches!(self, Self::NoAccess)
    }
}

/// Owner and member rows of a collection, as seen by one user.
#[derive(Debug, Clone)]
pub struct CollectionAccess {
    pub owner_id: i64,
    pub members: Vec<CollectionMember>,
    user_id: i64,
}

impl CollectionAccess {
    #[must_use]
    pub fn new(user_id: i64, owner_id: i64, members: Vec<CollectionMember>) -> Self {
        Self {
            owner_id,
            members,
            user_id,
        }
    }

    fn own_membership(&self) -> Option<&CollectionMember> {
        self.members.iter().find(|m| m.user_id == self.user_id)
    }

    #[must_use]
    pub fn capability(&self) -> Capability {
        if self.owner_id == self.user_id {
            return Capability::Owner;
        }
        match self.own_membership() {
            Some(m) if m.can_update => Capability::MemberWithUpdate,
            Some(_) => Capability::MemberReadOnly,
            None => Capability::NoAccess,
        }
    }

    /// Owner, or a member whose `can_delete` flag is set.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.owner_id == self.user_id || self.own_membership().is_some_and(|m| m.can_delete)
    }
}

/// Resolve the caller's access to a collection.
///
/// Returns `None` when the collection does not exist.
pub async fn resolve(
    pool: &SqlitePool,
    user_id: i64,
    collection_id: i64,
) -> Result<Option<CollectionAccess>> {
    let Some(collection) = db::get_collection(pool, collection_id).await? else {
        return Ok(None);
    };
    let members = db::get_collection_members(pool, collection_id).await?;

    Ok(Some(CollectionAccess::new(user_id, collection.owner_id, members)))
}

/// Resolve the caller's capability, treating a missing collection as no access.
pub async fn capability(pool: &SqlitePool, user_id: i64, collection_id: i64) -> Result<Capability> {
    Ok(resolve(pool, user_id, collection_id)
        .await?
        .map_or(Capability::NoAccess, |access| access.capability()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: i64, can_update: bool, can_delete: bool) -> CollectionMember {
        CollectionMember {
            user_id,
            collection_id: 1,
            can_create: false,
            can_update,
            can_delete,
        }
    }

    #[test]
    fn test_owner() {
        let access = CollectionAccess::new(7, 7, vec![member(8, false, false)]);
        assert_eq!(access.capability(), Capability::Owner);
        assert!(access.can_delete());
    }

    #[test]
    fn test_member_flags() {
        let members = vec![member(2, true, false), member(3, false, true)];

        let updater = CollectionAccess::new(2, 1, members.clone());
        assert_eq!(updater.capability(), Capability::MemberWithUpdate);
        assert!(!updater.can_delete());

        let deleter = CollectionAccess::new(3, 1, members);
        assert_eq!(deleter.capability(), Capability::MemberReadOnly);
        assert!(deleter.can_delete());
    }

    #[test]
    fn test_stranger() {
        let access = CollectionAccess::new(99, 1, vec![member(2, true, true)]);
        assert_eq!(access.capability(), Capability::NoAccess);
        assert!(!access.can_delete());
        assert!(!Capability::NoAccess.has_access());
        assert!(!Capability::MemberReadOnly.can_update());
        assert!(Capability::MemberWithUpdate.can_update());
    }
}
