//! Route table and access guards.

pub const PATH_HOME: &str = "/";
pub const PATH_ABOUT: &str = "/about";
pub const PATH_LOGIN: &str = "/login";
pub const PATH_ADMIN_LOGIN: &str = "/admin-login";
pub const PATH_REQUEST_FORM: &str = "/request-form";
pub const PATH_USER_DASHBOARD: &str = "/user-dashboard";
pub const PATH_USER_SETTINGS: &str = "/settings";
pub const PATH_EXPERT_DASHBOARD: &str = "/expert-dashboard";
pub const PATH_ADMIN_DASHBOARD: &str = "/admin-dashboard";

/// Who may see a page. Checked on render; the backend is the real gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    User,
    Admin,
}

/// Hard browser navigation, for places where no router handle is in reach
/// (callbacks shared across screens). Within a page, prefer `use_navigate`.
pub fn redirect_to(path: &str) {
    let _ = leptos::prelude::window().location().set_href(path);
}

/// Where to send a visitor who fails the access check, if anywhere.
pub fn guard_redirect(access: Access, has_token: bool, has_admin_key: bool) -> Option<&'static str> {
    let target = match access {
        Access::Public => None,
        Access::User if has_token => None,
        Access::User => Some(PATH_LOGIN),
        Access::Admin if has_admin_key => None,
        Access::Admin => Some(PATH_ADMIN_LOGIN),
    };
    if let Some(path) = target {
        leptos::logging::warn!("[router] access denied, redirecting to {}", path);
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_pages_never_redirect() {
        assert_eq!(guard_redirect(Access::Public, false, false), None);
        assert_eq!(guard_redirect(Access::Public, true, true), None);
    }

    #[test]
    fn user_pages_require_a_token() {
        assert_eq!(guard_redirect(Access::User, false, true), Some(PATH_LOGIN));
        assert_eq!(guard_redirect(Access::User, true, false), None);
    }

    #[test]
    fn admin_pages_require_the_admin_key() {
        assert_eq!(
            guard_redirect(Access::Admin, true, false),
            Some(PATH_ADMIN_LOGIN)
        );
        assert_eq!(guard_redirect(Access::Admin, false, true), None);
    }
}
