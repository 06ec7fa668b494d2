pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod golang;
pub mod output;
pub mod process;
pub mod sanitize;
pub mod vcs;
pub mod walker;
pub mod workspace;
