#![allow(dead_code)]

use ptrack_core::user::{self, model::NewUser};
use ptrack_core::Identity;
use ptrack_db::DbPool;

pub fn pool() -> DbPool {
    DbPool::in_memory().expect("in-memory database")
}

pub fn user(pool: &DbPool, username: &str) -> Identity {
    user::create_user(
        pool,
        &NewUser {
            username: username.to_string(),
            password: "pw".to_string(),
            ..Default::default()
        },
    )
    .expect("create user")
    .identity()
}

pub fn admin(pool: &DbPool, username: &str) -> Identity {
    user::create_user(
        pool,
        &NewUser {
            username: username.to_string(),
            password: "pw".to_string(),
            is_administrator: true,
            ..Default::default()
        },
    )
    .expect("create admin")
    .identity()
}
