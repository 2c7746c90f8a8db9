//! AWS-facing side of the deployment tasks.
//!
//! This crate owns the Lambda SDK adapter, the deploy-file configuration
//! layer, and the command-line surface. Task semantics live in
//! `lambda_deploy_core`.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod logging;
pub mod runner;
