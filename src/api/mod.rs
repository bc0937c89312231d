// JSON API and router

pub mod handlers;
pub mod models;
pub mod routes;
