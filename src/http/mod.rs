//! HTTP server module for the IDV backend.
//!
//! This module provides an axum-based HTTP server that exposes the dataset
//! and chart services as a REST API. It reuses the core library's data
//! layer, chart services, and export adapter.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Chart dispatch and per-mode figure construction        │
//! │  - Data summary, image export                             │
//! └───────────────────┬──────────────────────────────────────┘
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Data Layer (data/)                                       │
//! │  - CSV loading, schema, scope filter, aggregation         │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
