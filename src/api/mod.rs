pub mod analytics;
pub mod extract;
pub mod health;
pub mod properties;
pub mod quarterly;
pub mod routes;
