// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Person (bearer auth when security.require_auth is set)
// → Protected (bearer auth always)
pub mod person;
pub mod protected;
pub mod public;
