pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod paths;
pub mod seed;
pub mod state;
