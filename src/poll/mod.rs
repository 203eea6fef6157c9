pub mod poll;
pub mod registry;

pub use poll::{Poll, PollProvider, PollStatus};
pub use registry::PollRegistry;
