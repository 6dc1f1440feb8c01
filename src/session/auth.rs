//! Authentication collaborator consumed by the session before saving.

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Source of the current user.
pub trait AuthProvider {
    /// The signed-in user, or `None` when unauthenticated.
    fn current_user(&self) -> Option<User>;

    /// Ends the current sign-in, if any.
    fn sign_out(&mut self);
}

/// Auth provider holding a fixed, locally chosen user.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }

    fn sign_out(&mut self) {
        self.user = None;
    }
}
