pub mod auth;
pub mod core;
pub mod db;
pub mod http;
pub mod provider;
pub mod util;
