pub mod dashboard_page;
pub mod error_page;
pub mod info_page;
