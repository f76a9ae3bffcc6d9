//! # SchoolHub CLI
//!
//! Administrative tools and database seeding for SchoolHub development.
//!
//! ## Usage
//!
//! ```ignore
//! use schoolhub_cli::seeder::{seed_all, SeedConfig};
//!
//! seeder::seed_demo_classes(&pool).await?;
//! seed_all(&pool, SeedConfig::new(10, 200)).await?;
//! ```

pub mod admin;
pub mod seeder;
