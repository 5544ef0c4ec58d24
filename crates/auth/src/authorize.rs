//! Role/permission policy.
//!
//! - No IO
//! - No panics
//! - Every predicate is `false` when there is no user.
//!
//! The branch order and the denial lists below mirror what the backend
//! enforces; change them only together with the server.

use serde::Serialize;

use crate::{Action, Permission, Resource, Role, User};

/// `(resource, action)` pairs an admin may not perform.
const ADMIN_DENIED: &[(&str, &str)] = &[("billing", "write"), ("users", "delete")];

const MANAGER_RESOURCES: &[&str] = &[
    "orders",
    "customers",
    "products",
    "communications",
    "analytics",
];

const AGENT_RESOURCES: &[&str] = &["orders", "customers"];

/// Whether the user holds `permission`.
///
/// Owners and admins hold every permission regardless of their explicit set.
pub fn has_permission(user: Option<&User>, permission: &Permission) -> bool {
    let Some(user) = user else {
        return false;
    };

    if user.role.is_privileged() {
        return true;
    }

    user.permissions.contains(permission)
}

/// Exact role match.
pub fn has_role(user: Option<&User>, role: &Role) -> bool {
    user.is_some_and(|u| &u.role == role)
}

/// Role membership in `roles`.
pub fn has_any_role(user: Option<&User>, roles: &[Role]) -> bool {
    user.is_some_and(|u| roles.contains(&u.role))
}

/// Whether the user may perform `action` on `resource`.
pub fn can_access(user: Option<&User>, resource: &Resource, action: &Action) -> bool {
    evaluate_access(user, resource, action).granted
}

/// Which rule decided an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    NoUser,
    OwnerUnrestricted,
    AdminDenyList,
    AdminDefault,
    ManagerResources,
    AgentResources,
    /// Read-only analytics for agents. Unreachable while "analytics" is not in
    /// the agent resource list; kept so the policy matches the server's.
    AgentAnalyticsReadOnly,
    ViewerReadOnly,
    UnknownRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub granted: bool,
    pub rule: AccessRule,
}

impl AccessDecision {
    fn new(granted: bool, rule: AccessRule) -> Self {
        Self { granted, rule }
    }
}

/// Evaluate an access check and report the deciding rule.
pub fn evaluate_access(
    user: Option<&User>,
    resource: &Resource,
    action: &Action,
) -> AccessDecision {
    let Some(user) = user else {
        return AccessDecision::new(false, AccessRule::NoUser);
    };

    let resource = resource.as_str();
    let action = action.as_str();

    match &user.role {
        Role::Owner => AccessDecision::new(true, AccessRule::OwnerUnrestricted),
        Role::Admin => {
            if ADMIN_DENIED.contains(&(resource, action)) {
                AccessDecision::new(false, AccessRule::AdminDenyList)
            } else {
                AccessDecision::new(true, AccessRule::AdminDefault)
            }
        }
        Role::Manager => AccessDecision::new(
            MANAGER_RESOURCES.contains(&resource),
            AccessRule::ManagerResources,
        ),
        Role::Agent => {
            if !AGENT_RESOURCES.contains(&resource) {
                return AccessDecision::new(false, AccessRule::AgentResources);
            }
            if resource == "analytics" && action != "read" {
                return AccessDecision::new(false, AccessRule::AgentAnalyticsReadOnly);
            }
            AccessDecision::new(true, AccessRule::AgentResources)
        }
        Role::Viewer => AccessDecision::new(action == "read", AccessRule::ViewerReadOnly),
        Role::Other(_) => AccessDecision::new(false, AccessRule::UnknownRole),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Human-readable account of an access decision, for audit logs and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub resource: String,
    pub action: String,
    pub role: Option<String>,
    pub granted: bool,
    pub rule: AccessRule,
    pub reason: String,
}

/// Explain why `user` may or may not perform `action` on `resource`.
pub fn explain_access(
    user: Option<&User>,
    resource: &Resource,
    action: &Action,
) -> AccessExplanation {
    let decision = evaluate_access(user, resource, action);

    let reason = match (decision.rule, decision.granted) {
        (AccessRule::NoUser, _) => "No authenticated user".to_string(),
        (AccessRule::OwnerUnrestricted, _) => "Owners can access everything".to_string(),
        (AccessRule::AdminDenyList, _) => {
            format!("Admins may not {action} {resource}")
        }
        (AccessRule::AdminDefault, _) => {
            "Admins can access everything outside the deny list".to_string()
        }
        (AccessRule::ManagerResources, true) => format!("Managers can access {resource}"),
        (AccessRule::ManagerResources, false) => format!(
            "Managers are limited to: {}",
            MANAGER_RESOURCES.join(", ")
        ),
        (AccessRule::AgentResources, true) => format!("Agents can access {resource}"),
        (AccessRule::AgentResources, false) => {
            format!("Agents are limited to: {}", AGENT_RESOURCES.join(", "))
        }
        (AccessRule::AgentAnalyticsReadOnly, _) => "Agents can only read analytics".to_string(),
        (AccessRule::ViewerReadOnly, true) => "Viewers can read any resource".to_string(),
        (AccessRule::ViewerReadOnly, false) => format!("Viewers cannot {action} anything"),
        (AccessRule::UnknownRole, _) => "Unknown role; access denied by default".to_string(),
    };

    AccessExplanation {
        resource: resource.to_string(),
        action: action.to_string(),
        role: user.map(|u| u.role.to_string()),
        granted: decision.granted,
        rule: decision.rule,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use deliveryhub_core::UserId;
    use proptest::prelude::*;

    const RESOURCES: &[&str] = &[
        "orders",
        "customers",
        "products",
        "delivery-providers",
        "communications",
        "automation",
        "analytics",
        "users",
        "settings",
        "billing",
    ];

    const ACTIONS: &[&str] = &["read", "write", "delete", "export"];

    fn user(role: Role) -> User {
        User::new(UserId::from(1), role)
    }

    /// The policy table written out independently of `evaluate_access`.
    fn expected(role: &Role, resource: &str, action: &str) -> bool {
        match role {
            Role::Owner => true,
            Role::Admin => !matches!(
                (resource, action),
                ("billing", "write") | ("users", "delete")
            ),
            Role::Manager => matches!(
                resource,
                "orders" | "customers" | "products" | "communications" | "analytics"
            ),
            Role::Agent => matches!(resource, "orders" | "customers"),
            Role::Viewer => action == "read",
            Role::Other(_) => false,
        }
    }

    #[test]
    fn access_matrix_matches_policy_table() {
        let roles = [
            Role::Owner,
            Role::Admin,
            Role::Manager,
            Role::Agent,
            Role::Viewer,
            Role::Other("auditor".into()),
        ];

        for role in &roles {
            let u = user(role.clone());
            for resource in RESOURCES {
                for action in ACTIONS {
                    assert_eq!(
                        can_access(Some(&u), &Resource::from(*resource), &Action::from(*action)),
                        expected(role, resource, action),
                        "role={role} resource={resource} action={action}"
                    );
                }
            }
        }
    }

    #[test]
    fn nothing_is_accessible_without_a_user() {
        for resource in RESOURCES {
            for action in ACTIONS {
                assert!(!can_access(None, &Resource::from(*resource), &Action::from(*action)));
            }
        }
        assert!(!has_permission(None, &Permission::from("orders.read")));
        assert!(!has_role(None, &Role::Owner));
        assert!(!has_any_role(None, &[Role::Owner, Role::Viewer]));
    }

    #[test]
    fn admin_deny_list_is_exact() {
        let admin = user(Role::Admin);
        assert!(!can_access(Some(&admin), &Resource::BILLING, &Action::WRITE));
        assert!(!can_access(Some(&admin), &Resource::USERS, &Action::DELETE));
        assert!(can_access(Some(&admin), &Resource::BILLING, &Action::READ));
        assert!(can_access(Some(&admin), &Resource::USERS, &Action::WRITE));
        assert!(can_access(Some(&admin), &Resource::BILLING, &Action::DELETE));
    }

    #[test]
    fn agent_analytics_carve_out_is_unreachable() {
        let agent = user(Role::Agent);
        let write = evaluate_access(Some(&agent), &Resource::ANALYTICS, &Action::WRITE);
        assert!(!write.granted);
        assert_eq!(write.rule, AccessRule::AgentResources);

        let read = evaluate_access(Some(&agent), &Resource::ANALYTICS, &Action::READ);
        assert!(!read.granted);
        assert_eq!(read.rule, AccessRule::AgentResources);
    }

    #[test]
    fn manager_access_ignores_action() {
        let manager = user(Role::Manager);
        assert!(can_access(Some(&manager), &Resource::ANALYTICS, &Action::DELETE));
        assert!(!can_access(Some(&manager), &Resource::USERS, &Action::READ));
    }

    #[test]
    fn explicit_permissions_apply_below_admin() {
        let agent = user(Role::Agent).with_permissions(["orders.export"]);
        assert!(has_permission(Some(&agent), &Permission::from("orders.export")));
        assert!(!has_permission(Some(&agent), &Permission::from("orders.delete")));
    }

    #[test]
    fn role_predicates() {
        let viewer = user(Role::Viewer);
        assert!(has_role(Some(&viewer), &Role::Viewer));
        assert!(!has_role(Some(&viewer), &Role::Agent));
        assert!(has_any_role(Some(&viewer), &[Role::Agent, Role::Viewer]));
        assert!(!has_any_role(Some(&viewer), &[]));
    }

    #[test]
    fn explanation_names_the_deciding_rule() {
        let admin = user(Role::Admin);
        let explained = explain_access(Some(&admin), &Resource::BILLING, &Action::WRITE);
        assert!(!explained.granted);
        assert_eq!(explained.rule, AccessRule::AdminDenyList);
        assert_eq!(explained.role.as_deref(), Some("admin"));
        assert_eq!(explained.reason, "Admins may not write billing");

        let anonymous = explain_access(None, &Resource::ORDERS, &Action::READ);
        assert_eq!(anonymous.rule, AccessRule::NoUser);
        assert!(anonymous.role.is_none());
    }

    fn unprivileged_role() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Manager),
            Just(Role::Agent),
            Just(Role::Viewer),
            "[a-z]{3,12}"
                .prop_map(Role::from)
                .prop_filter("owner and admin are covered above", |role| !role.is_privileged()),
        ]
    }

    proptest! {
        #[test]
        fn privileged_roles_hold_every_permission(
            name in "[a-z._:-]{0,24}",
            owner in any::<bool>(),
        ) {
            let role = if owner { Role::Owner } else { Role::Admin };
            let u = user(role);
            prop_assert!(has_permission(Some(&u), &Permission::from(name)));
        }

        #[test]
        fn unprivileged_roles_need_explicit_grant(
            role in unprivileged_role(),
            name in "[a-z._:-]{1,24}",
            granted in any::<bool>(),
        ) {
            let mut u = user(role);
            if granted {
                u = u.with_permissions([Permission::from(name.clone())]);
            }
            prop_assert_eq!(has_permission(Some(&u), &Permission::from(name)), granted);
        }
    }
}
