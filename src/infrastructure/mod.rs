//! Infrastructure layer - Storage, tokens and logging

pub mod account;
pub mod auth;
pub mod logging;
pub mod storage;
