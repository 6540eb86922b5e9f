/// Database configuration and connection management
pub mod database;

/// Catalog and admin seeding from config.toml
pub mod seed;
