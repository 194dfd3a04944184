//! Session-gated access.
//!
//! Pages that show a user's own data are only reachable with a session.
//! Without one the caller is sent to the guard's redirect path.

use data_loader::UserId;

/// Where signed-out visitors are sent
pub const DEFAULT_REDIRECT: &str = "/";

/// The caller's authentication state.
///
/// A session either carries the signed-in user's id or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<UserId>,
}

impl Session {
    /// A session for `user_id`. An empty id is treated as signed out.
    pub fn signed_in(user_id: impl Into<UserId>) -> Self {
        let user_id = user_id.into();
        Self {
            user_id: (!user_id.is_empty()).then_some(user_id),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(String),
}

/// Allows signed-in sessions, redirects everyone else.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    redirect_to: String,
}

impl RouteGuard {
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
        }
    }

    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    pub fn check(&self, session: &Session) -> Access {
        if session.is_signed_in() {
            Access::Allow
        } else {
            Access::Redirect(self.redirect_to.clone())
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_REDIRECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_in_allowed() {
        let guard = RouteGuard::default();
        assert_eq!(guard.check(&Session::signed_in("alice")), Access::Allow);
    }

    #[test]
    fn test_signed_out_redirected() {
        let guard = RouteGuard::new("/login");
        assert_eq!(
            guard.check(&Session::signed_out()),
            Access::Redirect("/login".to_string())
        );
    }

    #[test]
    fn test_empty_user_id_is_signed_out() {
        let session = Session::signed_in("");
        assert!(!session.is_signed_in());
        assert_eq!(session.user_id(), None);
        assert_eq!(
            RouteGuard::default().check(&session),
            Access::Redirect(DEFAULT_REDIRECT.to_string())
        );
    }
}
