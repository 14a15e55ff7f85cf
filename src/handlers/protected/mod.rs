// handlers/protected/mod.rs - Handlers that resolve a bearer token
//
// Writes take `AuthUser` (401 without a valid token). Public reads take
// `MaybeAuthUser` so an anonymous caller still gets the listing.
pub mod availability;
pub mod collab;
pub mod contacts;
pub mod gigs;
pub mod notifications;
pub mod notify;
pub mod profile;
pub mod slate;
pub mod whoami;
