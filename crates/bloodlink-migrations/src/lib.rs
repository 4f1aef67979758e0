//! Database migrations for the BloodLink application

pub use sea_orm_migration::prelude::*;

mod migration;

pub use migration::Migrator;
