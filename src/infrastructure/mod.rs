pub mod database;
pub mod entities;
pub mod legacy;
pub mod repositories;
pub mod traits;
