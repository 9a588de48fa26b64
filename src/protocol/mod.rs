// src/protocol/mod.rs
//! Inbound message schema from the transport layer

pub mod message;

pub use message::*;
