//! Per-request visibility scope.
//!
//! Staff see only themselves, managers see their department, admins see
//! everyone. The scope is built once per request from the authenticated user
//! and handed to every query that filters by user.

use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Every user in the workspace.
    All,
    /// Members of one department.
    Department {
        department: String,
        members: Vec<DbId>,
    },
    /// Only the caller.
    SelfOnly(DbId),
}

impl AccessScope {
    /// Whether the scope covers `user_id`.
    pub fn permits(&self, user_id: DbId) -> bool {
        match self {
            AccessScope::All => true,
            AccessScope::Department { members, .. } => members.contains(&user_id),
            AccessScope::SelfOnly(own) => *own == user_id,
        }
    }

    /// Resolve the user filter for a query.
    ///
    /// `None` means "no user filter". An explicit request is intersected
    /// with the scope; ids outside the scope are dropped silently, so a
    /// request naming only foreign users yields an empty list.
    pub fn resolve(&self, requested: &[DbId]) -> Option<Vec<DbId>> {
        match self {
            AccessScope::All if requested.is_empty() => None,
            AccessScope::All => Some(dedup(requested.to_vec())),
            AccessScope::Department { members, .. } if requested.is_empty() => {
                Some(members.clone())
            }
            AccessScope::Department { members, .. } => Some(dedup(
                requested
                    .iter()
                    .copied()
                    .filter(|id| members.contains(id))
                    .collect(),
            )),
            AccessScope::SelfOnly(own) => Some(vec![*own]),
        }
    }

    /// Fail with `Forbidden` unless the scope covers `user_id`.
    pub fn ensure_permits(&self, user_id: DbId) -> Result<(), CoreError> {
        if self.permits(user_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "User {user_id} is outside your access scope"
            )))
        }
    }
}

fn dedup(mut ids: Vec<DbId>) -> Vec<DbId> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Parse a comma-separated id list (`"1,2, 3"`), ignoring blanks.
pub fn parse_id_list(raw: Option<&str>) -> Result<Vec<DbId>, CoreError> {
    let Some(raw) = raw else {
        return Ok(vec![]);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<DbId>()
                .map_err(|_| CoreError::Validation(format!("Invalid user id: '{s}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department() -> AccessScope {
        AccessScope::Department {
            department: "Ops".into(),
            members: vec![1, 2, 3],
        }
    }

    #[test]
    fn admin_without_request_is_unfiltered() {
        assert_eq!(AccessScope::All.resolve(&[]), None);
        assert_eq!(AccessScope::All.resolve(&[4, 4, 2]), Some(vec![2, 4]));
    }

    #[test]
    fn manager_sees_department() {
        assert_eq!(department().resolve(&[]), Some(vec![1, 2, 3]));
        assert_eq!(department().resolve(&[2, 9]), Some(vec![2]));
        assert_eq!(department().resolve(&[9]), Some(vec![]));
    }

    #[test]
    fn staff_sees_only_self() {
        let scope = AccessScope::SelfOnly(5);
        assert_eq!(scope.resolve(&[1, 2]), Some(vec![5]));
        assert!(scope.permits(5));
        assert!(!scope.permits(1));
        assert!(scope.ensure_permits(1).is_err());
    }

    #[test]
    fn id_list_parsing() {
        assert_eq!(parse_id_list(None).unwrap(), Vec::<DbId>::new());
        assert_eq!(parse_id_list(Some("1, 2,,3")).unwrap(), vec![1, 2, 3]);
        assert!(parse_id_list(Some("1,x")).is_err());
    }
}
