pub mod config;
pub mod dashboard;
pub mod error;
pub mod funnel;
pub mod kpi;
pub mod range;
pub mod session;
pub mod store;
pub mod tenant;
pub mod user;
pub mod wishlist;
