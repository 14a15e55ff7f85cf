// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (bearer token, optionally anonymous for reads)
pub mod public;
pub mod protected;
