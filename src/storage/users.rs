//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Email, User};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence, keyed by normalized email
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<Email, User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for user in file_data.users {
            data.insert(user.email.clone(), user);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));

        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, email: &Email) -> Result<Option<User>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(email).cloned())
    }

    pub fn exists(&self, email: &Email) -> Result<bool, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.contains_key(email))
    }

    pub fn get_all(&self) -> Result<Vec<User>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    pub fn upsert(&self, user: User) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(user.email.clone(), user);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
