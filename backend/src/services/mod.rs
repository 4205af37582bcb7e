//! Service layer for the downtime analytics engine.
//!
//! Each module owns one stage of the pipeline: normalization, period and
//! category aggregation, KPI computation, ranking/classification, and
//! finding synthesis. `analysis` orchestrates them for a whole request;
//! `cache` memoizes finished reports by content hash.

pub mod aggregate;

pub mod analysis;

pub mod cache;

pub mod kpi;

pub mod normalizer;

pub mod ranking;

pub mod recommendations;


pub use analysis::run_analysis;
pub use cache::AnalysisCache;
pub use kpi::compute_kpis;
pub use normalizer::normalize;
