//! Shared UI crate for Bugsift. Components, submit handling and platform
//! plumbing used by both the web and desktop launchers.

pub mod core;
pub mod i18n;
pub mod predict;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::AppNavbar;
}
