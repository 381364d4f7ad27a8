pub mod config;
pub mod db;
pub mod deadline;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod store;

pub use config::Config;
pub use db::DbPool;
