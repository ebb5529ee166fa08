#![forbid(unsafe_code)]

//! Varun daemon: HTTP surface over the feasibility calculator and an assessment store.

pub mod api;
pub mod config;
pub mod http;
pub mod store;
