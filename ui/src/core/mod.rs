//! Platform-facing plumbing shared by the views: settings, HTTP transports,
//! platform detection.

pub mod platform;
pub mod settings;
pub mod transport;
