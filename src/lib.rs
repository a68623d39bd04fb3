pub mod error;
pub mod queue;
pub mod set;

pub use error::EnqueueError;
pub use queue::Queue;
pub use set::Set;

pub mod prelude {
    pub use crate::error::EnqueueError;
    pub use crate::queue::Queue;
    pub use crate::set::Set;
}
