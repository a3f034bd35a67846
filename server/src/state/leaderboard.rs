use tokio::sync::Mutex;

use super::list::{DetailSlot, LoadOutcome};
use crate::client::CommerceClient;
use crate::models::LeaderboardEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardState {
    pub entries: DetailSlot<Vec<LeaderboardEntry>>,
}

/// Top stores by trust score.
pub struct LeaderboardBoard {
    client: CommerceClient,
    state: Mutex<LeaderboardState>,
}

impl LeaderboardBoard {
    pub fn new(client: CommerceClient) -> Self {
        Self {
            client,
            state: Mutex::new(LeaderboardState::default()),
        }
    }

    pub async fn snapshot(&self) -> LeaderboardState {
        self.state.lock().await.clone()
    }

    pub async fn load(&self, limit: Option<u32>) -> LoadOutcome {
        let ticket = self.state.lock().await.entries.begin();
        let result = self.client.get_leaderboard(limit).await;
        self.state.lock().await.entries.settle(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeTransport;
    use crate::error::CommerceError;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn keeps_previous_board_on_failure() {
        let fake = FakeTransport::new();
        fake.respond(
            Method::GET,
            "/api/commerce/leaderboard",
            Ok(json!({ "entries": [{
                "rank": 1,
                "store_id": "sto_1",
                "store_name": "Lamps & Co",
                "trust_score": 91
            }] })),
        );
        fake.respond(
            Method::GET,
            "/api/commerce/leaderboard",
            Err(CommerceError::Api("Leaderboard unavailable".into())),
        );
        let board = LeaderboardBoard::new(CommerceClient::new(fake.clone()));

        assert_eq!(board.load(None).await, LoadOutcome::Loaded);
        assert_eq!(fake.last_call().unwrap().query_value("limit"), Some("10"));
        assert_eq!(board.load(Some(5)).await, LoadOutcome::Failed);

        let state = board.snapshot().await;
        let entries = state.entries.value.unwrap();
        assert_eq!(entries[0].trust_score, 91);
        assert_eq!(state.entries.error.as_deref(), Some("Leaderboard unavailable"));
    }
}
