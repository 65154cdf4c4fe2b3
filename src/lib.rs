//! tinylink - a small multi-user URL shortener
//!
//! Accounts own short links; anyone can follow a link, and every redirect is
//! counted per caller origin.
//!
//! # Architecture
//! - `domain`: identity store, code generator, link registry, visit tracker, access policy
//! - `services`: link and auth services combining the domain components
//! - `api`: HTTP handlers, session middleware and JSON envelopes
//! - `config`: static configuration and CLI arguments
//! - `runtime`: service wiring and the HTTP server
//! - `system`: logging setup

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
