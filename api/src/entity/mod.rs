//! SeaORM entities
//!
//! Table models for paid orders. Kept apart from the domain entities, which
//! also cover orders still in progress.

pub mod orders;
pub mod tickets;
