pub use sea_orm_migration::prelude::*;

pub mod migrations;
pub mod migrator;

pub use migrator::Migrator;
