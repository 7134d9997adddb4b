//! forumdb - forum storage engine
//!
//! Users, forums, threads, nested posts and votes over a relational store.
//! Posts are kept as a forest of reply chains with materialized paths so that
//! a thread can be paged flat, depth-first, or by top-level subtree without
//! recursive queries.

pub mod config;
pub mod domain;
pub mod interfaces;
pub mod services;
pub mod storage;
pub mod utils;
