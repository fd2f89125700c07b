//! Channel-backed challenge solver.
//!
//! The solver itself cannot show a challenge; it hands a [`ChallengeRequest`]
//! to whatever UI owns the receiving end and waits for the answer. Dropping
//! the request without answering counts as abandonment.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::ports::{ChallengeError, ChallengeSolver, ChallengeToken};

/// A pending challenge, handed to the UI.
#[derive(Debug)]
pub struct ChallengeRequest {
    responder: oneshot::Sender<ChallengeToken>,
}

impl ChallengeRequest {
    /// Answer the challenge with the token produced by the UI.
    pub fn solve(self, token: ChallengeToken) {
        if self.responder.send(token).is_err() {
            tracing::debug!("Challenge answered after the requester went away");
        }
    }

    /// The buyer dismissed the challenge.
    pub fn abandon(self) {
        drop(self.responder);
    }
}

/// Challenge solver that delegates to a UI over a channel.
#[derive(Clone)]
pub struct ChannelChallengeSolver {
    requests: mpsc::UnboundedSender<ChallengeRequest>,
}

impl ChannelChallengeSolver {
    /// Create the solver and the receiver the UI listens on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChallengeRequest>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (Self { requests }, receiver)
    }
}

#[async_trait]
impl ChallengeSolver for ChannelChallengeSolver {
    async fn solve(&self) -> Result<ChallengeToken, ChallengeError> {
        let (responder, answer) = oneshot::channel();
        self.requests
            .send(ChallengeRequest { responder })
            .map_err(|_| ChallengeError::Unavailable("no challenge UI attached".to_string()))?;

        answer.await.map_err(|_| ChallengeError::Abandoned)
    }
}
