pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use db::Database;
