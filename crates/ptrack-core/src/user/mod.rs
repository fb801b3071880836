//! User directory: account records and authentication.

pub mod model;
mod password;

use std::sync::Arc;

use crate::authz::{self, ensure};
use crate::error::{OrNotFound, TrackerError, TrackerResult};
use crate::project::recompute_project_progress;
use crate::validation::{required_text, MAX_USERNAME_LEN};
use model::{Credentials, Identity, NewUser, User, UserChanges};
use ptrack_db::queries::tasks;
use ptrack_db::queries::users as queries;
use ptrack_db::queries::users::UserRow;
use ptrack_db::{Connection, DbPool};
use uuid::Uuid;

/// Resolves presented credentials to an [`Identity`].
pub trait UserDirectory: Send + Sync {
    fn authenticate(&self, credentials: &Credentials) -> TrackerResult<Identity>;
}

/// Directory backed by the `users` table.
#[derive(Clone)]
pub struct DbUserDirectory {
    pool: Arc<DbPool>,
}

impl DbUserDirectory {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl UserDirectory for DbUserDirectory {
    fn authenticate(&self, credentials: &Credentials) -> TrackerResult<Identity> {
        self.pool.read(|conn| {
            let row = queries::find_user_by_username(conn, &credentials.username)?
                .ok_or(TrackerError::AuthenticationFailed)?;
            if !password::verify_password(&credentials.password, &row.password_hash) {
                return Err(TrackerError::AuthenticationFailed);
            }
            Ok(User::from_row(row).identity())
        })
    }
}

fn check_password(password: &str) -> TrackerResult<()> {
    if password.is_empty() {
        return Err(TrackerError::validation("password is required"));
    }
    Ok(())
}

/// Trim an email address; empty is allowed, anything else needs an `@`.
fn check_email(email: &str) -> TrackerResult<String> {
    let email = email.trim();
    if !email.is_empty() && !email.contains('@') {
        return Err(TrackerError::validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(email.to_string())
}

fn ensure_username_free(conn: &Connection, username: &str) -> TrackerResult<()> {
    if queries::find_user_by_username(conn, username)?.is_some() {
        return Err(TrackerError::validation(format!(
            "username '{username}' is already taken"
        )));
    }
    Ok(())
}

/// Create a user without an acting identity (local operator bootstrap).
pub fn create_user(pool: &DbPool, new: &NewUser) -> TrackerResult<User> {
    let username = required_text("username", &new.username, MAX_USERNAME_LEN)?;
    check_password(&new.password)?;
    let email = check_email(&new.email)?;

    let row = UserRow {
        id: Uuid::new_v4().to_string(),
        username,
        email,
        first_name: new.first_name.trim().to_string(),
        last_name: new.last_name.trim().to_string(),
        password_hash: password::hash_password(&new.password),
        is_admin: new.is_administrator,
        date_joined: chrono::Utc::now().to_rfc3339(),
    };

    pool.transaction(|tx| {
        ensure_username_free(tx, &row.username)?;
        queries::insert_user(tx, &row)?;
        Ok(User::from_row(row.clone()))
    })
}

/// Create a user on behalf of an authenticated caller.
///
/// Only administrators may create administrator accounts.
pub fn register_user(pool: &DbPool, actor: &Identity, new: &NewUser) -> TrackerResult<User> {
    if !authz::can_create_user(actor, new.is_administrator) {
        return Err(TrackerError::forbidden(
            "only administrators may create administrator accounts",
        ));
    }
    create_user(pool, new)
}

/// Self-registration with no signed-in caller. Never creates administrators.
pub fn sign_up(pool: &DbPool, new: &NewUser) -> TrackerResult<User> {
    if new.is_administrator {
        return Err(TrackerError::forbidden(
            "only administrators may create administrator accounts",
        ));
    }
    create_user(pool, new)
}

/// Edit an account. Allowed to the account holder and administrators.
pub fn update_user(
    pool: &DbPool,
    actor: &Identity,
    id: &str,
    changes: &UserChanges,
) -> TrackerResult<User> {
    pool.transaction(|tx| {
        let mut row = queries::get_user(tx, id)
            .or_not_found(|| TrackerError::UserNotFound(id.to_string()))?;
        ensure(authz::can_modify_user(actor, &row.id), "edit this account")?;

        if let Some(username) = &changes.username {
            let username = required_text("username", username, MAX_USERNAME_LEN)?;
            if username != row.username {
                ensure_username_free(tx, &username)?;
                row.username = username;
            }
        }
        if let Some(password) = &changes.password {
            check_password(password)?;
            row.password_hash = password::hash_password(password);
        }
        if let Some(email) = &changes.email {
            row.email = check_email(email)?;
        }
        if let Some(first_name) = &changes.first_name {
            row.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = &changes.last_name {
            row.last_name = last_name.trim().to_string();
        }

        queries::update_user(tx, &row)?;
        Ok(User::from_row(row))
    })
}

/// Delete an account. Allowed to the account holder and administrators.
///
/// Projects the user owned go with it. Tasks assigned to the user in other
/// projects are removed too, and those projects' progress is recomputed in
/// the same transaction.
pub fn delete_user(pool: &DbPool, actor: &Identity, id: &str) -> TrackerResult<User> {
    pool.transaction(|tx| {
        let row = queries::get_user(tx, id)
            .or_not_found(|| TrackerError::UserNotFound(id.to_string()))?;
        ensure(authz::can_modify_user(actor, &row.id), "delete this account")?;

        let affected = tasks::projects_with_tasks_assigned_to(tx, id)?;
        queries::delete_user(tx, id)?;
        for project_id in &affected {
            recompute_project_progress(tx, project_id)?;
        }
        Ok(User::from_row(row))
    })
}

/// Get a user by ID.
pub fn get_user(pool: &DbPool, id: &str) -> TrackerResult<User> {
    pool.read(|conn| {
        let row = queries::get_user(conn, id)
            .or_not_found(|| TrackerError::UserNotFound(id.to_string()))?;
        Ok(User::from_row(row))
    })
}

/// Get a user by username.
pub fn find_user(pool: &DbPool, username: &str) -> TrackerResult<User> {
    pool.read(|conn| {
        queries::find_user_by_username(conn, username)?
            .map(User::from_row)
            .ok_or_else(|| TrackerError::UserNotFound(username.to_string()))
    })
}

/// List all users.
pub fn list_users(pool: &DbPool) -> TrackerResult<Vec<User>> {
    pool.read(|conn| {
        let rows = queries::list_users(conn)?;
        Ok(rows.into_iter().map(User::from_row).collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_authenticate() {
        let pool = Arc::new(DbPool::in_memory().unwrap());
        let user = create_user(&pool, &new_user("alice", "s3cret")).unwrap();

        let directory = DbUserDirectory::new(pool.clone());
        let identity = directory
            .authenticate(&Credentials {
                username: "alice".into(),
                password: "s3cret".into(),
            })
            .unwrap();
        assert_eq!(identity.id, user.id);
        assert!(!identity.is_administrator);

        let err = directory
            .authenticate(&Credentials {
                username: "alice".into(),
                password: "wrong".into(),
            })
            .unwrap_err();
        assert!(matches!(err, TrackerError::AuthenticationFailed));

        let err = directory
            .authenticate(&Credentials {
                username: "nobody".into(),
                password: "s3cret".into(),
            })
            .unwrap_err();
        assert!(matches!(err, TrackerError::AuthenticationFailed));
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        let pool = DbPool::in_memory().unwrap();
        create_user(&pool, &new_user("alice", "a")).unwrap();
        let err = create_user(&pool, &new_user("alice", "b")).unwrap_err();
        assert!(matches!(err, TrackerError::ValidationError(_)));
        assert_eq!(list_users(&pool).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let pool = DbPool::in_memory().unwrap();
        assert!(create_user(&pool, &new_user("", "pw")).is_err());
        assert!(create_user(&pool, &new_user("bob", "")).is_err());

        let mut bad_email = new_user("bob", "pw");
        bad_email.email = "not-an-email".into();
        assert!(matches!(
            create_user(&pool, &bad_email).unwrap_err(),
            TrackerError::ValidationError(_)
        ));
    }

    #[test]
    fn test_only_admins_register_admins() {
        let pool = DbPool::in_memory().unwrap();
        let member = create_user(&pool, &new_user("member", "pw")).unwrap().identity();

        let mut admin_request = new_user("root2", "pw");
        admin_request.is_administrator = true;
        let err = register_user(&pool, &member, &admin_request).unwrap_err();
        assert!(matches!(err, TrackerError::Forbidden(_)));

        let created = register_user(&pool, &member, &new_user("carol", "pw")).unwrap();
        assert_eq!(find_user(&pool, "carol").unwrap().id, created.id);
        assert!(matches!(
            get_user(&pool, "missing").unwrap_err(),
            TrackerError::UserNotFound(_)
        ));
    }

    #[test]
    fn test_sign_up_never_creates_admins() {
        let pool = DbPool::in_memory().unwrap();
        let mut request = new_user("mallory", "pw");
        request.is_administrator = true;
        assert!(matches!(
            sign_up(&pool, &request).unwrap_err(),
            TrackerError::Forbidden(_)
        ));
        assert!(list_users(&pool).unwrap().is_empty());

        let created = sign_up(&pool, &new_user("dana", "pw")).unwrap();
        assert!(!created.is_administrator);
    }

    #[test]
    fn test_update_user_is_self_or_admin() {
        let pool = Arc::new(DbPool::in_memory().unwrap());
        let alice = create_user(&pool, &new_user("alice", "pw")).unwrap().identity();
        let bob = create_user(&pool, &new_user("bob", "pw")).unwrap().identity();
        let mut root_request = new_user("root", "pw");
        root_request.is_administrator = true;
        let root = create_user(&pool, &root_request).unwrap().identity();

        let changes = UserChanges {
            first_name: Some(" Alice ".into()),
            password: Some("new-pw".into()),
            ..Default::default()
        };
        let err = update_user(&pool, &bob, &alice.id, &changes).unwrap_err();
        assert!(matches!(err, TrackerError::Forbidden(_)));

        let updated = update_user(&pool, &alice, &alice.id, &changes).unwrap();
        assert_eq!(updated.first_name, "Alice");
        let directory = DbUserDirectory::new(pool.clone());
        assert!(directory
            .authenticate(&Credentials {
                username: "alice".into(),
                password: "new-pw".into(),
            })
            .is_ok());

        let rename = UserChanges {
            username: Some("bob".into()),
            ..Default::default()
        };
        assert!(matches!(
            update_user(&pool, &root, &alice.id, &rename).unwrap_err(),
            TrackerError::ValidationError(_)
        ));
        let rename = UserChanges {
            username: Some("alicia".into()),
            ..Default::default()
        };
        assert_eq!(update_user(&pool, &root, &alice.id, &rename).unwrap().username, "alicia");
    }

    #[test]
    fn test_delete_user_is_self_or_admin() {
        let pool = DbPool::in_memory().unwrap();
        let alice = create_user(&pool, &new_user("alice", "pw")).unwrap().identity();
        let bob = create_user(&pool, &new_user("bob", "pw")).unwrap().identity();

        let err = delete_user(&pool, &bob, &alice.id).unwrap_err();
        assert!(matches!(err, TrackerError::Forbidden(_)));

        delete_user(&pool, &alice, &alice.id).unwrap();
        assert!(matches!(
            get_user(&pool, &alice.id).unwrap_err(),
            TrackerError::UserNotFound(_)
        ));
        assert!(matches!(
            delete_user(&pool, &bob, &alice.id).unwrap_err(),
            TrackerError::UserNotFound(_)
        ));
    }
}
