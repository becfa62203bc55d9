// HTTP surface over the query pipeline

pub mod handlers;
pub mod models;
pub mod routes;
