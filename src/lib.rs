pub mod application;
pub mod commands;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
