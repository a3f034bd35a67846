use tokio::sync::Mutex;

use super::list::{load_page, ListState, LoadOutcome, PageRequest};
use crate::client::{CommerceClient, PageParams};
use crate::error::CommerceError;
use crate::models::ActivityEvent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFeedState {
    pub events: ListState<ActivityEvent>,
}

fn events(state: &mut ActivityFeedState) -> &mut ListState<ActivityEvent> {
    &mut state.events
}

/// Marketplace-wide activity, newest first.
pub struct ActivityFeed {
    client: CommerceClient,
    state: Mutex<ActivityFeedState>,
}

impl ActivityFeed {
    pub fn new(client: CommerceClient) -> Self {
        Self {
            client,
            state: Mutex::new(ActivityFeedState::default()),
        }
    }

    pub async fn snapshot(&self) -> ActivityFeedState {
        self.state.lock().await.clone()
    }

    pub async fn load(&self, reset: bool) -> LoadOutcome {
        self.fetch_page(PageRequest::from_reset(reset)).await
    }

    pub async fn load_more(&self) -> LoadOutcome {
        self.fetch_page(PageRequest::More).await
    }

    async fn fetch_page(&self, request: PageRequest) -> LoadOutcome {
        let client = &self.client;
        load_page(&self.state, events, request, |_| (), |offset, ()| async move {
            let page = client.get_activity(PageParams::starting_at(offset)).await?;
            Ok::<_, CommerceError>((page.data, page.pagination.has_more))
        })
        .await
    }
}
