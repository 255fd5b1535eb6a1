//! HTTP handlers.
pub mod auth;
pub mod pages;

pub use auth::{login, login_form, logout, LoginForm};
pub use pages::{index, ping};
