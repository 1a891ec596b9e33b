#![allow(dead_code)]

pub mod error;
pub mod multipart;
pub mod server;

pub static DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
