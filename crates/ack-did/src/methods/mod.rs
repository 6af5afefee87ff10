//! The supported DID methods.
pub mod key;
pub mod pkh;
pub mod web;
