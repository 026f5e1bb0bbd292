//! Inbound adapters translating transport requests into domain operations.

pub mod http;
