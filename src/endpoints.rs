//! The API endpoints URIs.

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to search and create suppliers.
pub const SUPPLIERS: &str = "/api/suppliers";
/// The route for moving a session into the admin state.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to leave the admin state.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for checking whether the session is in the admin state.
pub const SESSION: &str = "/api/session";
/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
