use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Roles assigned to a caller by the authentication gateway.
///
/// The gateway verifies the caller's identity and forwards the roles as
/// plain headers, so this service never inspects credentials itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Operator,
    Auditor,
    Admin,
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "OPERATOR" => Ok(Self::Operator),
            "AUDITOR" => Ok(Self::Auditor),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(()),
        }
    }
}

/// `Permission`s are the different kinds of actions that can be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageEvents,
    ManageRewards,
    RequestReward,
    ViewOwnRewardRequests,
    ViewAllRewardRequests,
    ProcessRewardRequests,
    ViewDeletedEvents,
}

impl Permission {
    /// The roles that grant this permission. `Admin` is implied for every
    /// permission and is not listed here.
    fn granting_roles(&self) -> &'static [Role] {
        match self {
            Self::ManageEvents => &[Role::Operator],
            Self::ManageRewards => &[Role::Operator],
            Self::RequestReward => &[Role::User],
            Self::ViewOwnRewardRequests => &[Role::User],
            Self::ViewAllRewardRequests => &[Role::Operator, Role::Auditor],
            Self::ProcessRewardRequests => &[Role::Operator],
            Self::ViewDeletedEvents => &[],
        }
    }
}

/// A `Policy` is derived from the caller's roles and decides which actions
/// they can and cannot take. Every `UseCase` contains a list of
/// `Permission`s that is required to execute it, if the caller's roles do
/// not grant all of them the request will be rejected.
#[derive(Debug, Default)]
pub struct Policy {
    roles: Vec<Role>,
}

impl Policy {
    pub fn new(roles: Vec<Role>) -> Self {
        Self { roles }
    }

    /// Checks that every `Permission` is granted by at least one of the
    /// caller's roles
    pub fn authorize(&self, permissions: &[Permission]) -> bool {
        if self.roles.contains(&Role::Admin) {
            return true;
        }

        permissions.iter().all(|permission| {
            permission
                .granting_roles()
                .iter()
                .any(|role| self.roles.contains(role))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_permission_list_is_always_authorized() {
        let policy = Policy::default();
        assert!(policy.authorize(&Vec::new()));

        let policy = Policy::new(vec![Role::User]);
        assert!(policy.authorize(&Vec::new()));
    }

    #[test]
    fn admin_is_granted_everything() {
        let policy = Policy::new(vec![Role::Admin]);
        assert!(policy.authorize(&[Permission::ManageEvents]));
        assert!(policy.authorize(&[Permission::RequestReward]));
        assert!(policy.authorize(&[Permission::ViewDeletedEvents]));
        assert!(policy.authorize(&[
            Permission::ManageEvents,
            Permission::ManageRewards,
            Permission::ProcessRewardRequests,
        ]));
    }

    #[test]
    fn operator_manages_but_does_not_claim() {
        let policy = Policy::new(vec![Role::Operator]);
        assert!(policy.authorize(&[Permission::ManageEvents]));
        assert!(policy.authorize(&[Permission::ManageRewards]));
        assert!(policy.authorize(&[Permission::ProcessRewardRequests]));
        assert!(policy.authorize(&[Permission::ViewAllRewardRequests]));
        assert!(!policy.authorize(&[Permission::RequestReward]));
        assert!(!policy.authorize(&[Permission::ViewDeletedEvents]));
    }

    #[test]
    fn auditor_only_reads() {
        let policy = Policy::new(vec![Role::Auditor]);
        assert!(policy.authorize(&[Permission::ViewAllRewardRequests]));
        assert!(!policy.authorize(&[Permission::ManageEvents]));
        assert!(!policy.authorize(&[Permission::ProcessRewardRequests]));
    }

    #[test]
    fn user_claims_rewards_only() {
        let policy = Policy::new(vec![Role::User]);
        assert!(policy.authorize(&[Permission::RequestReward]));
        assert!(policy.authorize(&[Permission::ViewOwnRewardRequests]));
        assert!(!policy.authorize(&[Permission::ManageEvents]));
        assert!(!policy.authorize(&[Permission::ViewAllRewardRequests]));
    }

    #[test]
    fn all_permissions_must_be_granted() {
        let policy = Policy::new(vec![Role::User, Role::Auditor]);
        assert!(policy.authorize(&[
            Permission::RequestReward,
            Permission::ViewAllRewardRequests
        ]));
        assert!(!policy.authorize(&[
            Permission::RequestReward,
            Permission::ManageEvents
        ]));
    }

    #[test]
    fn parses_gateway_role_names() {
        assert_eq!(Role::from_str("USER"), Ok(Role::User));
        assert_eq!(Role::from_str("OPERATOR"), Ok(Role::Operator));
        assert_eq!(Role::from_str("AUDITOR"), Ok(Role::Auditor));
        assert_eq!(Role::from_str("ADMIN"), Ok(Role::Admin));
        assert!(Role::from_str("SUPERUSER").is_err());
        assert!(Role::from_str("admin").is_err());
    }
}
