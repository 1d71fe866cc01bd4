//! The colour cube and the nearest-unused-colour allocator built on it.

pub mod allocator;
pub mod axes;
pub mod cube;
pub mod echo;

pub use allocator::ColourAllocator;
pub use axes::AxisPermutation;
pub use cube::{CHANNEL_RANGE, CUBE_CAPACITY, ColourCube};
pub use echo::EchoQueue;
