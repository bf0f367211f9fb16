/// Re-export `Config` from `amica-core` for use within this crate.
///
/// All environment-variable parsing lives in `amica-core` so it can be
/// shared with integration tests without depending on the full server.
pub use amica_core::config::{BootstrapAdmin, Config};
