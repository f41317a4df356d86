//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Menu, NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use serde_json::json;

const USER_COLUMNS: &str = "id, username, email, password_hash, status, last_login_at, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: Option<String>,
    password_hash: String,
    status: String,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            username: r.username,
            email: r.email,
            password_hash: r.password_hash,
            status: r.status,
            last_login_at: r.last_login_at,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    description: Option<String>,
}

#[derive(sqlx::FromRow)]
struct MenuRow {
    id: i64,
    name: String,
    path: String,
    icon: Option<String>,
    parent_id: Option<i64>,
    sort_order: i32,
}

/// PostgreSQL repository for accounts, roles and menus.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
                .bind(username)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(User::from))
    }

    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<Role>, AppError> {
        let rows: Vec<RoleRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.name, r.description
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Role {
                id: r.id,
                name: r.name,
                description: r.description,
            })
            .collect())
    }

    async fn menus_for_user(&self, user_id: i64) -> Result<Vec<Menu>, AppError> {
        let rows: Vec<MenuRow> = sqlx::query_as(
            r#"
            SELECT DISTINCT m.id, m.name, m.path, m.icon, m.parent_id, m.sort_order
            FROM menus m
            JOIN role_menus rm ON rm.menu_id = m.id
            JOIN user_roles ur ON ur.role_id = rm.role_id
            WHERE ur.user_id = $1
            ORDER BY m.sort_order, m.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|m| Menu {
                id: m.id,
                name: m.name,
                path: m.path,
                icon: m.icon,
                parent_id: m.parent_id,
                sort_order: m.sort_order,
            })
            .collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn assign_role(&self, user_id: i64, role_name: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, id FROM roles WHERE name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role_name)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM roles WHERE name = $1)")
                    .bind(role_name)
                    .fetch_one(self.pool.as_ref())
                    .await?;

            if !exists {
                return Err(AppError::not_found(
                    "Role not found",
                    json!({"role": role_name}),
                ));
            }
        }

        Ok(())
    }

    async fn touch_last_login(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
