#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod filter;
pub mod graph;
pub mod store;
pub mod util;
