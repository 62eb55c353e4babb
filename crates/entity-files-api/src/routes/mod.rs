//! API route modules.
//!
//! Each module registers its routes together with their [`RouteAccess`].

pub mod files;
pub mod health;

use entity_files_common::models::RouteAccess;

/// One registered route and the access it grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    /// `get()` routes also answer HEAD, so both are listed.
    pub methods: &'static [&'static str],
    /// Path relative to [`crate::API_PREFIX`].
    pub path: &'static str,
    pub access: RouteAccess,
}

/// Every route mounted by [`crate::build_router`].
pub fn registry() -> impl Iterator<Item = &'static RouteEntry> {
    files::ROUTES.iter().chain(health::ROUTES)
}
