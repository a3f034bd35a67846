use tokio::sync::Mutex;

use super::list::{load_page, write_failed, DetailSlot, ListState, LoadOutcome, PageRequest};
use crate::client::{CommerceClient, PageParams};
use crate::error::CommerceError;
use crate::models::{CreateStoreForm, Store, UpdateStorePoliciesForm};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreDirectoryState {
    pub stores: ListState<Store>,
    pub current: DetailSlot<Store>,
    pub write_error: Option<String>,
}

fn stores(state: &mut StoreDirectoryState) -> &mut ListState<Store> {
    &mut state.stores
}

/// Store browsing plus the merchant's store writes.
pub struct StoreDirectory {
    client: CommerceClient,
    state: Mutex<StoreDirectoryState>,
}

impl StoreDirectory {
    pub fn new(client: CommerceClient) -> Self {
        Self {
            client,
            state: Mutex::new(StoreDirectoryState::default()),
        }
    }

    pub async fn snapshot(&self) -> StoreDirectoryState {
        self.state.lock().await.clone()
    }

    pub async fn load_stores(&self, reset: bool) -> LoadOutcome {
        self.fetch_page(PageRequest::from_reset(reset)).await
    }

    pub async fn load_more(&self) -> LoadOutcome {
        self.fetch_page(PageRequest::More).await
    }

    async fn fetch_page(&self, request: PageRequest) -> LoadOutcome {
        let client = &self.client;
        load_page(&self.state, stores, request, |_| (), |offset, ()| async move {
            let page = client.get_stores(PageParams::starting_at(offset)).await?;
            Ok::<_, CommerceError>((page.data, page.pagination.has_more))
        })
        .await
    }

    pub async fn load_store(&self, id: &str) -> LoadOutcome {
        let ticket = self.state.lock().await.current.begin();
        let result = self.client.get_store(id).await;
        self.state.lock().await.current.settle(ticket, result)
    }

    pub async fn set_current(&self, store: Option<Store>) {
        self.state.lock().await.current.set(store);
    }

    pub async fn create_store(&self, form: &CreateStoreForm) -> Result<Store, CommerceError> {
        let result = self.client.create_store(form).await;
        let mut state = self.state.lock().await;
        match result {
            Ok(store) => {
                state.write_error = None;
                state.stores.prepend(store.clone());
                Ok(store)
            }
            Err(err) => Err(write_failed(&mut state.write_error, "create store", err)),
        }
    }

    pub async fn update_policies(&self, id: &str, form: &UpdateStorePoliciesForm) -> Result<Store, CommerceError> {
        let result = self.client.update_store_policies(id, form).await;
        let mut state = self.state.lock().await;
        match result {
            Ok(store) => {
                state.write_error = None;
                state.stores.replace(&store);
                state.current.replace(&store);
                Ok(store)
            }
            Err(err) => Err(write_failed(&mut state.write_error, "update store policies", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{self, FakeTransport};
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn directory(fake: &Arc<FakeTransport>) -> StoreDirectory {
        StoreDirectory::new(CommerceClient::new(fake.clone()))
    }

    #[tokio::test]
    async fn load_more_requests_next_offset() {
        let fake = FakeTransport::new();
        let first: Vec<_> = (0..3).map(|i| fake::store(&format!("sto_{i}"), None)).collect();
        fake.respond(Method::GET, "/api/commerce/stores", Ok(fake::page(first, true)));
        fake.respond(
            Method::GET,
            "/api/commerce/stores",
            Ok(fake::page(vec![fake::store("sto_9", None)], false)),
        );
        let directory = directory(&fake);

        assert_eq!(directory.load_stores(true).await, LoadOutcome::Loaded);
        assert_eq!(directory.load_more().await, LoadOutcome::Loaded);
        assert_eq!(fake.last_call().unwrap().query_value("offset"), Some("3"));

        let state = directory.snapshot().await;
        assert_eq!(state.stores.items.len(), 4);
        assert_eq!(state.stores.offset, 4);
        assert!(!state.stores.has_more);
        assert_eq!(directory.load_more().await, LoadOutcome::Skipped);
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn policy_update_patches_list_and_current() {
        let fake = FakeTransport::new();
        fake.respond(
            Method::GET,
            "/api/commerce/stores",
            Ok(fake::page(vec![fake::store("sto_1", None), fake::store("sto_2", None)], false)),
        );
        fake.respond(
            Method::PATCH,
            "/api/commerce/stores/sto_1/policies",
            Ok(json!({ "store": fake::store("sto_1", Some("Ships in 24h")) })),
        );
        let directory = directory(&fake);
        directory.load_stores(true).await;
        let current = directory.snapshot().await.stores.items[0].clone();
        directory.set_current(Some(current)).await;

        let form = UpdateStorePoliciesForm {
            shipping_policy: Some("Ships in 24h".to_string()),
            ..Default::default()
        };
        directory.update_policies("sto_1", &form).await.unwrap();

        let state = directory.snapshot().await;
        assert_eq!(state.stores.items[0].shipping_policy.as_deref(), Some("Ships in 24h"));
        assert_eq!(state.stores.items[1].shipping_policy, None);
        assert_eq!(
            state.current.value.unwrap().shipping_policy.as_deref(),
            Some("Ships in 24h")
        );
    }

    #[tokio::test]
    async fn failed_create_records_error_and_keeps_list() {
        let fake = FakeTransport::new();
        fake.respond(
            Method::POST,
            "/api/commerce/stores",
            Err(CommerceError::Api("Agent already owns a store".into())),
        );
        let directory = directory(&fake);

        let form = CreateStoreForm {
            store_name: "Lamps & Co".to_string(),
            ..Default::default()
        };
        let err = directory.create_store(&form).await.unwrap_err();
        assert_eq!(err.message(), "Agent already owns a store");

        let state = directory.snapshot().await;
        assert_eq!(state.write_error.as_deref(), Some("Agent already owns a store"));
        assert!(state.stores.items.is_empty());
    }
}
