pub mod db;
pub mod freshness;
pub mod models;

pub use rusqlite;
