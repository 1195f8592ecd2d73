//! # Value Objects
//!
//! Immutable types compared by value rather than identity.

mod participant_pair;

pub use participant_pair::ParticipantPair;
