//! Dashboard sections and route gating.

use serde::Serialize;

use deliveryhub_auth::{Action, Resource, Session};

/// Top-level sections of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Dashboard,
    Orders,
    Customers,
    Products,
    DeliveryProviders,
    Communications,
    Automation,
    Analytics,
    Users,
    Settings,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::Dashboard,
        Section::Orders,
        Section::Customers,
        Section::Products,
        Section::DeliveryProviders,
        Section::Communications,
        Section::Automation,
        Section::Analytics,
        Section::Users,
        Section::Settings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Section::Dashboard => "/",
            Section::Orders => "/orders",
            Section::Customers => "/customers",
            Section::Products => "/products",
            Section::DeliveryProviders => "/delivery-providers",
            Section::Communications => "/communications",
            Section::Automation => "/automation",
            Section::Analytics => "/analytics",
            Section::Users => "/users",
            Section::Settings => "/settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Orders => "Orders",
            Section::Customers => "Customers",
            Section::Products => "Products",
            Section::DeliveryProviders => "Delivery Providers",
            Section::Communications => "Communications",
            Section::Automation => "Automation",
            Section::Analytics => "Analytics",
            Section::Users => "Users",
            Section::Settings => "Settings",
        }
    }

    /// Resource gating this section. The dashboard home has none: any
    /// authenticated user may see it.
    pub fn resource(self) -> Option<Resource> {
        match self {
            Section::Dashboard => None,
            Section::Orders => Some(Resource::ORDERS),
            Section::Customers => Some(Resource::CUSTOMERS),
            Section::Products => Some(Resource::PRODUCTS),
            Section::DeliveryProviders => Some(Resource::DELIVERY_PROVIDERS),
            Section::Communications => Some(Resource::COMMUNICATIONS),
            Section::Automation => Some(Resource::AUTOMATION),
            Section::Analytics => Some(Resource::ANALYTICS),
            Section::Users => Some(Resource::USERS),
            Section::Settings => Some(Resource::SETTINGS),
        }
    }

    /// Section owning `path`, including nested routes such as `/orders/42`.
    /// Auth pages and unknown paths belong to no section.
    pub fn for_path(path: &str) -> Option<Section> {
        let first = path.trim_start_matches('/').split(['/', '?', '#']).next().unwrap_or_default();
        if first.is_empty() {
            return Some(Section::Dashboard);
        }
        Section::ALL
            .into_iter()
            .find(|s| *s != Section::Dashboard && s.path().trim_start_matches('/') == first)
    }

    pub fn is_visible(self, session: &Session) -> bool {
        route_guard(session, self) == RouteDecision::Allow
    }
}

/// Outcome of navigating to a protected section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Session is still hydrating; show a spinner.
    Pending,
    RedirectToLogin,
    Forbidden,
    Allow,
}

pub fn route_guard(session: &Session, section: Section) -> RouteDecision {
    if session.is_loading() {
        return RouteDecision::Pending;
    }
    if !session.is_authenticated() {
        return RouteDecision::RedirectToLogin;
    }
    match section.resource() {
        Some(resource) if !session.can_access(&resource, &Action::READ) => RouteDecision::Forbidden,
        _ => RouteDecision::Allow,
    }
}

/// Sections to show in the navigation for this session.
pub fn visible_sections(session: &Session) -> Vec<Section> {
    Section::ALL.into_iter().filter(|s| s.is_visible(session)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use deliveryhub_auth::{Role, SessionEvent, Tenant, User};
    use deliveryhub_core::{TenantId, UserId};

    fn signed_in(role: Role) -> Session {
        Session::default().transition(SessionEvent::Established {
            user: User::new(UserId::from(1), role),
            tenant: Tenant::new(TenantId::from(1)),
        })
    }

    #[test]
    fn agent_sees_orders_and_customers_only() {
        assert_eq!(
            visible_sections(&signed_in(Role::Agent)),
            vec![Section::Dashboard, Section::Orders, Section::Customers]
        );
    }

    #[test]
    fn manager_sees_operational_sections() {
        assert_eq!(
            visible_sections(&signed_in(Role::Manager)),
            vec![
                Section::Dashboard,
                Section::Orders,
                Section::Customers,
                Section::Products,
                Section::Communications,
                Section::Analytics,
            ]
        );
    }

    #[test]
    fn owner_and_viewer_see_everything() {
        assert_eq!(visible_sections(&signed_in(Role::Owner)), Section::ALL.to_vec());
        assert_eq!(visible_sections(&signed_in(Role::Viewer)), Section::ALL.to_vec());
    }

    #[test]
    fn unknown_role_keeps_only_the_home_page() {
        let auditor = signed_in(Role::Other("auditor".into()));
        assert_eq!(visible_sections(&auditor), vec![Section::Dashboard]);
    }

    #[test]
    fn guard_outcomes() {
        assert_eq!(route_guard(&Session::Loading, Section::Orders), RouteDecision::Pending);
        assert_eq!(
            route_guard(&Session::Unauthenticated { error: None }, Section::Dashboard),
            RouteDecision::RedirectToLogin
        );
        assert_eq!(route_guard(&signed_in(Role::Agent), Section::Users), RouteDecision::Forbidden);
        assert_eq!(route_guard(&signed_in(Role::Agent), Section::Orders), RouteDecision::Allow);
        assert!(visible_sections(&Session::Unauthenticated { error: None }).is_empty());
    }

    #[test]
    fn paths_map_to_sections() {
        assert_eq!(Section::for_path("/"), Some(Section::Dashboard));
        assert_eq!(Section::for_path("/orders/42"), Some(Section::Orders));
        assert_eq!(Section::for_path("/orders/new"), Some(Section::Orders));
        assert_eq!(Section::for_path("/delivery-providers"), Some(Section::DeliveryProviders));
        assert_eq!(Section::for_path("/settings?tab=billing"), Some(Section::Settings));
        assert_eq!(Section::for_path("/auth/login"), None);
        assert_eq!(Section::for_path("/nope"), None);
    }
}
