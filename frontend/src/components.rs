// navbar
pub mod navbar;

// plots
pub mod plot;
pub mod choropleth_engine;
pub mod heat_map_engine;
pub mod donut_engine;

// panels
pub mod metrics;
pub mod rankings;
