pub mod adjust;
pub mod channel;
pub mod source;
