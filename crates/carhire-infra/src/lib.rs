//! Infrastructure layer: table row codecs and file-backed repositories

pub mod codec;
pub mod persistence;

pub use codec::RowCodec;
pub use persistence::*;
