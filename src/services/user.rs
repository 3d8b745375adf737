//! User service
//!
//! Registration and lookup. Callers of every other service pass the acting
//! user's email explicitly; this service is how that email gets registered.

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Email, User};
use crate::storage::Storage;

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new user.
    ///
    /// All problems are reported together: missing name, missing or malformed
    /// email, and an email that is already registered.
    pub fn register(&self, name: &str, email: &str) -> BudgetResult<User> {
        let user = User::new(Email::new(email), name);

        let mut errors = user.validate();
        if !user.email.is_empty() && self.storage.users.exists(&user.email)? {
            errors.push("An account with this email already exists".to_string());
        }
        if !errors.is_empty() {
            return Err(BudgetError::Validation(errors));
        }

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            &user.email,
            EntityType::User,
            user.email.as_str(),
            Some(user.name.clone()),
            &user,
        )?;

        Ok(user)
    }

    pub fn get(&self, email: &Email) -> BudgetResult<Option<User>> {
        self.storage.users.get(email)
    }

    /// Fetch a registered user or fail with `NotFound`
    pub fn require(&self, email: &Email) -> BudgetResult<User> {
        self.storage
            .users
            .get(email)?
            .ok_or_else(|| BudgetError::user_not_found(email.as_str()))
    }

    pub fn list(&self) -> BudgetResult<Vec<User>> {
        self.storage.users.get_all()
    }
}
