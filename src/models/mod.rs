pub mod draw;
pub mod participant;
pub mod prize;
pub mod winner;

pub use draw::*;
pub use participant::*;
pub use prize::*;
pub use winner::*;
