//! User Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{User, UserUpdate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id ("user:abc" or bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let key = strip_table_prefix(USER_TABLE, id);
        let user: Option<User> = self.base.db().select((USER_TABLE, key)).await?;
        Ok(user)
    }

    /// Find user by email (unique)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// The unique email index turns concurrent duplicate registrations into a
    /// storage error, surfaced as [`RepoError::Duplicate`].
    pub async fn create(&self, user: User) -> RepoResult<User> {
        let email = user.email.clone();
        let created: Option<User> = self
            .base
            .db()
            .create(USER_TABLE)
            .content(user)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("user_email_unique") {
                    RepoError::Duplicate(format!("User already exists with this email: {email}"))
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Partial update (name / role / isActive)
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let key = strip_table_prefix(USER_TABLE, id).to_string();

        let mut set_parts: Vec<&str> = vec!["updatedAt = $now"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.role.is_some() {
            set_parts.push("role = $role");
        }
        if data.is_active.is_some() {
            set_parts.push("isActive = $is_active");
        }

        let sql = format!(
            "UPDATE type::thing('user', $key) SET {} RETURN AFTER",
            set_parts.join(", ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("key", key))
            .bind(("now", Utc::now()));
        if let Some(name) = data.name {
            query = query.bind(("name", name));
        }
        if let Some(role) = data.role {
            query = query.bind(("role", role));
        }
        if let Some(is_active) = data.is_active {
            query = query.bind(("is_active", is_active));
        }

        let mut result = query.await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Set the seller-verification flag
    pub async fn set_verified(&self, id: &str, verified: bool) -> RepoResult<User> {
        let key = strip_table_prefix(USER_TABLE, id).to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing('user', $key) SET isVerified = $verified, updatedAt = $now RETURN AFTER",
            )
            .bind(("key", key))
            .bind(("verified", verified))
            .bind(("now", Utc::now()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Delete a user, returning whether it existed
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let key = strip_table_prefix(USER_TABLE, id);
        let deleted: Option<User> = self.base.db().delete((USER_TABLE, key)).await?;
        Ok(deleted.is_some())
    }
}
