//! # MDA Rust Backend
//!
//! Machine downtime analytics engine.
//!
//! This crate computes efficiency indicators from machine stop records:
//! it normalizes raw spreadsheet rows into validated stop events, groups
//! them by period and category, computes availability/efficiency/MTBF/MTTR
//! KPIs, ranks stop causes, classifies critical stops, and synthesizes
//! templated findings and recommendations. The optional HTTP feature
//! exposes the engine as a REST API via Axum.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: consolidated DTO surface for callers
//! - [`models`]: domain records and time parsing/formatting
//! - [`services`]: normalization, aggregation, KPIs, rankings, findings,
//!   orchestration, and the report cache
//! - [`config`]: analysis policy (machine table, thresholds, baseline)
//! - [`error`]: engine error taxonomy
//! - `http`: Axum-based REST server (feature `http-server`)
//!
//! ## Processing model
//!
//! Each request is one pure, synchronous computation over an immutable
//! dataset snapshot: no shared mutable state, no background tasks.
//! Repeated identical requests can be served from a content-hash report
//! cache.

pub mod api;

pub mod config;

pub mod error;

pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
