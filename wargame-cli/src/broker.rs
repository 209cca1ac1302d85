//! Game broker client
//!
//! The broker is an HTTP service relaying moves between two processes.
//! GET returns the last posted move; POST publishes ours and echoes it back.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use wargame_core::{Coord, CoordPair, IllegalMove};

/// Delay between polls while waiting for the opponent's move
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("broker request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("broker returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("broker reported failure")]
    Rejected,

    #[error("broker echoed {got:?} instead of {sent:?}")]
    EchoMismatch {
        sent: BrokerMove,
        got: Option<BrokerMove>,
    },
}

/// Move as exchanged with the broker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerMove {
    pub from: Coord,
    pub to: Coord,
    pub turn: u32,
}

impl BrokerMove {
    pub fn new(mv: CoordPair, turn: u32) -> Self {
        Self {
            from: mv.src,
            to: mv.dst,
            turn,
        }
    }

    pub fn coords(&self) -> CoordPair {
        CoordPair::new(self.from, self.to)
    }
}

/// Body of every broker response
#[derive(Clone, Debug, Deserialize)]
pub struct BrokerResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<BrokerMove>,
}

impl BrokerResponse {
    /// The opponent's move, if the broker holds the one for the turn we expect
    pub fn accept(&self, turns_played: u32) -> Option<CoordPair> {
        if !self.success {
            return None;
        }
        self.data
            .filter(|data| data.turn == turns_played + 1)
            .map(|data| data.coords())
    }
}

pub struct BrokerClient {
    client: reqwest::Client,
    url: String,
}

impl BrokerClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch the opponent's move for the turn after `turns_played`
    pub async fn fetch_move(&self, turns_played: u32) -> Result<Option<CoordPair>, BrokerError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let body = Self::parse(response).await?;
        if !body.success {
            return Err(BrokerError::Rejected);
        }
        Ok(body.accept(turns_played))
    }

    /// Publish our move; `turn` is the number of turns played after it
    pub async fn post_move(&self, mv: CoordPair, turn: u32) -> Result<(), BrokerError> {
        let sent = BrokerMove::new(mv, turn);
        let response = self.client.post(&self.url).json(&sent).send().await?;
        let body = Self::parse(response).await?;
        if !body.success {
            return Err(BrokerError::Rejected);
        }
        if body.data != Some(sent) {
            return Err(BrokerError::EchoMismatch {
                sent,
                got: body.data,
            });
        }
        Ok(())
    }

    async fn parse(response: reqwest::Response) -> Result<BrokerResponse, BrokerError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BrokerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Poll until the broker delivers a move for this turn that `apply` accepts
    ///
    /// Errors and illegal moves are logged and retried.
    pub async fn wait_for_move<T>(
        &self,
        turns_played: u32,
        mut apply: impl FnMut(CoordPair) -> Result<T, IllegalMove>,
    ) -> (CoordPair, T) {
        loop {
            match self.fetch_move(turns_played).await {
                Ok(Some(mv)) => match apply(mv) {
                    Ok(applied) => {
                        tracing::info!(%mv, "got move from broker");
                        return (mv, applied);
                    }
                    Err(err) => tracing::warn!(%mv, %err, "broker move rejected"),
                },
                Ok(None) => {}
                Err(err) => tracing::warn!(%err, "broker error"),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
