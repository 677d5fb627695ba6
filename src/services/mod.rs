//! Chart and summary services.
//!
//! Each service computes the complete, serializable data for one chart mode
//! from the in-memory dataset; the dispatcher routes a request to the right
//! service and wraps the result in a [`Figure`](dispatch::Figure).

pub mod bar_chart;
pub mod boundaries;
pub mod choropleth;
pub mod dispatch;
pub mod geo_scatter;
pub mod scatter_plot;
pub mod summary;
pub mod trend;

pub use bar_chart::compute_bar_chart_data;
pub use choropleth::compute_choropleth_data;
pub use dispatch::build_chart;
pub use geo_scatter::compute_geo_scatter_data;
pub use scatter_plot::compute_scatter_plot_data;
pub use summary::compute_summary_data;
pub use trend::compute_trend_data;
