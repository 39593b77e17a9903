//! Concrete [`crate::store::Backend`] implementations.
//!
//! These are driver *adapters*: they bridge the store's get/put contract
//! to a concrete transport and must not interpret chunk contents. Only
//! [`memory`] and [`file`] are complete; `memcached` and `dns` are thin,
//! feature-gated sketches at the interface boundary, matching spec §1's
//! framing of drivers as external collaborators.

pub mod file;
pub mod memory;

#[cfg(feature = "memcached-driver")]
pub mod memcached;

#[cfg(feature = "dns-driver")]
pub mod dns;
