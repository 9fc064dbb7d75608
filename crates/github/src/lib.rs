//! GitHub REST implementations of the `areas-core` platform traits.
//!
//! This crate provides:
//! - [`GithubClient`]: team lookup, PR file listing, label CRUD, and
//!   repository ruleset CRUD over the GitHub REST API
//! - [`CachingTeamResolver`]: a per-run decorator that resolves each
//!   distinct team slug at most once

pub mod cache;
pub mod client;

pub use cache::CachingTeamResolver;
pub use client::GithubClient;
