//! # IDV Rust Backend
//!
//! Interactive visualization engine for an India states/districts dataset.
//!
//! This crate provides a Rust backend for the India Data Visualization (IDV)
//! dashboard, offering dataset loading, schema inspection, filtering,
//! aggregation, chart construction, and image export. The backend exposes a
//! REST API via Axum for the browser frontend.
//!
//! ## Features
//!
//! - **Data Loading**: Parse the district dataset from CSV, cached once per process
//! - **Schema Inspection**: Derive selectable states and numeric measure columns
//! - **Filtering & Aggregation**: Scope filtering and group-by statistics
//! - **Chart Construction**: Five chart modes built through one exhaustive dispatch
//! - **Export**: Raster (PNG) serialization with SVG fallback
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Shared selection-parameter types and DTO re-exports
//! - [`data`]: Dataset store, table model, schema, filter, and aggregation
//! - [`services`]: Per-chart compute services and the chart dispatcher
//! - [`export`]: Chart-to-image serialization
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod data;

pub mod services;

pub mod export;

#[cfg(feature = "http-server")]
pub mod http;
