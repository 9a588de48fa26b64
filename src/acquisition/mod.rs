// src/acquisition/mod.rs
//! Sample buffering for incoming sensor streams

pub mod sample_buffer;
pub mod stream_buffers;

pub use sample_buffer::*;
pub use stream_buffers::*;
