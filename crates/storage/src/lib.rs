use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{User, UserId};

/// Outcome of a write guarded by the unique email index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWrite {
    Saved(User),
    EmailTaken,
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Lists every user in insertion order.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT id, name, email FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .context("failed to list users")?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    pub async fn find_user(&self, user_id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email FROM users WHERE id = ?")
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<UserWrite> {
        let inserted = sqlx::query(
            "INSERT INTO users (name, email) VALUES (?, ?)
             RETURNING id, name, email",
        )
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        match inserted {
            Ok(row) => Ok(UserWrite::Saved(user_from_row(&row))),
            Err(err) if is_unique_violation(&err) => Ok(UserWrite::EmailTaken),
            Err(err) => Err(err).with_context(|| format!("failed to insert user with email '{email}'")),
        }
    }

    /// Returns `None` when no user has the given id.
    pub async fn update_user(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
    ) -> Result<Option<UserWrite>> {
        let updated = sqlx::query(
            "UPDATE users SET name = ?, email = ? WHERE id = ?
             RETURNING id, name, email",
        )
        .bind(name)
        .bind(email)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await;
        match updated {
            Ok(row) => Ok(row.as_ref().map(|row| UserWrite::Saved(user_from_row(row)))),
            Err(err) if is_unique_violation(&err) => Ok(Some(UserWrite::EmailTaken)),
            Err(err) => Err(err).with_context(|| format!("failed to update user {}", user_id.0)),
        }
    }

    /// Returns whether a row was removed.
    pub async fn delete_user(&self, user_id: UserId) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete user {}", user_id.0))?
            .rows_affected();
        Ok(affected > 0)
    }

    pub async fn email_in_use(&self, email: &str, except: Option<UserId>) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
                .bind(email)
                .bind(except.map(|id| id.0).unwrap_or(-1))
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: UserId(row.get::<i64, _>(0)),
        name: row.get::<String, _>(1),
        email: row.get::<String, _>(2),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
