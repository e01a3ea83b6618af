pub mod draft;
pub mod pending;
pub mod schema;
pub mod session;
