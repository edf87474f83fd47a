pub mod aggregate;
pub mod format;
pub mod models;
pub mod palette;
pub mod tiles;
