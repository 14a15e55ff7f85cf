// handlers/public/mod.rs - Endpoints that never look at the Authorization header
pub mod profiles;
pub mod root;
