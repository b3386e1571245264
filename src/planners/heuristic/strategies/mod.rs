pub mod key_priority;
pub mod planner;

pub use key_priority::KeyPriorityStrategy;
pub use planner::{Destination, OfferOutcome, PointOfInterest, SelectDestination};
