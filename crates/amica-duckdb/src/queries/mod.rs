pub mod metrics;
pub mod sessions;
pub mod wishlist;
