#![forbid(unsafe_code)]

pub mod aggregate;
pub mod build;
pub mod cli;
pub mod client;
pub mod config;
pub mod emit;
pub mod error;
pub mod formats;
pub mod logging;
pub mod render;
pub mod search;
pub mod site_store;
pub mod source;
