//! Challenge solver adapters.

mod channel_solver;

pub use channel_solver::{ChallengeRequest, ChannelChallengeSolver};
