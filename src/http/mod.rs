pub mod routes;
pub mod routing;
pub mod session;
pub mod types;
pub mod views;
