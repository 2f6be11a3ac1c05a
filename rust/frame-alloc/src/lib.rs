//! Aligned off-heap byte buffers for native video frame callbacks, with
//! built-in support for arbitrary power-of-two alignment guarantees.

pub mod align;
pub mod buffer;
pub mod error;

pub use buffer::FrameBuffer;
pub use error::{Error, Result};
