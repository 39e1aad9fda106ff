pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod relative_time;
pub mod routes;
pub mod storage;

#[cfg(test)]
mod testing;
