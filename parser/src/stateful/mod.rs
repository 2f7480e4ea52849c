//! Low level encoders and decoders which keep track of
//! the current encoding and stream position.

pub mod decode;
pub mod encode;
