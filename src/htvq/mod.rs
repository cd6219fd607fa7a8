pub mod decoder;
pub mod encoder;

pub use decoder::HtvqDecoder;
pub use encoder::{HtvqEncoder, Stage4Pairing};
