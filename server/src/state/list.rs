//! Paginated list and detail slot primitives shared by every container.

use std::future::Future;

use tokio::sync::Mutex;
use tracing::warn;

use crate::error::CommerceError;
use crate::models::Identified;

/// What a `load` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Another load was running or there was nothing more to fetch.
    Skipped,
    Loaded,
    /// The response arrived after a reset and was dropped.
    Stale,
    Failed,
}

/// Accumulated pages for one filtered query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub has_more: bool,
    pub offset: u32,
    pub error: Option<String>,
    generation: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            has_more: true,
            offset: 0,
            error: None,
            generation: 0,
        }
    }
}

/// How a page load claims its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Start over at offset 0.
    Reset,
    /// Continue from the current offset.
    Next,
    /// Continue only while the list still reports more pages.
    More,
}

impl PageRequest {
    pub fn from_reset(reset: bool) -> Self {
        if reset {
            PageRequest::Reset
        } else {
            PageRequest::Next
        }
    }
}

/// Proof of a started load; only the ticket of the current generation may
/// write results back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    offset: u32,
    reset: bool,
}

impl LoadTicket {
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl<T> ListState<T> {
    /// Claims the list's single load slot. `None` while a load is running.
    pub fn begin(&mut self, reset: bool) -> Option<LoadTicket> {
        if self.is_loading {
            return None;
        }
        self.is_loading = true;
        self.error = None;
        Some(LoadTicket {
            generation: self.generation,
            offset: if reset { 0 } else { self.offset },
            reset,
        })
    }

    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.is_loading
    }

    /// Like [`begin`](Self::begin) for the next page, but also `None` once
    /// the list has no more pages.
    pub fn begin_more(&mut self) -> Option<LoadTicket> {
        if !self.has_more {
            return None;
        }
        self.begin(false)
    }

    pub fn claim(&mut self, request: PageRequest) -> Option<LoadTicket> {
        match request {
            PageRequest::Reset => self.begin(true),
            PageRequest::Next => self.begin(false),
            PageRequest::More => self.begin_more(),
        }
    }

    /// Applies a fetched page. Returns `false`, leaving the state alone, when
    /// the ticket belongs to an earlier generation.
    pub fn finish(&mut self, ticket: LoadTicket, items: Vec<T>, has_more: bool) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        let returned = items.len() as u32;
        if ticket.reset {
            self.items = items;
        } else {
            self.items.extend(items);
        }
        self.offset = ticket.offset + returned;
        self.has_more = has_more;
        self.is_loading = false;
        true
    }

    /// Records a failed load. Items already loaded are kept.
    pub fn fail(&mut self, ticket: LoadTicket, message: String) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.is_loading = false;
        self.error = Some(message);
        true
    }

    /// Empties the list and orphans any load still in flight.
    pub fn reset(&mut self) {
        self.items.clear();
        self.offset = 0;
        self.has_more = true;
        self.is_loading = false;
        self.error = None;
        self.generation += 1;
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }
}

impl<T: Identified + Clone> ListState<T> {
    /// Swaps in `item` wherever an entry with the same id is held.
    pub fn replace(&mut self, item: &T) -> bool {
        let mut found = false;
        for slot in self.items.iter_mut().filter(|held| held.id() == item.id()) {
            *slot = item.clone();
            found = true;
        }
        found
    }
}

/// A single `current*` entity with loading flags of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSlot<T> {
    pub value: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl<T> Default for DetailSlot<T> {
    fn default() -> Self {
        Self {
            value: None,
            is_loading: false,
            error: None,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket(u64);

impl<T> DetailSlot<T> {
    /// Starts a load. A newer load always supersedes an older one.
    pub fn begin(&mut self) -> DetailTicket {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        DetailTicket(self.generation)
    }

    pub fn settle(&mut self, ticket: DetailTicket, result: Result<T, CommerceError>) -> LoadOutcome {
        if ticket.0 != self.generation {
            return LoadOutcome::Stale;
        }
        self.is_loading = false;
        match result {
            Ok(value) => {
                self.value = Some(value);
                LoadOutcome::Loaded
            }
            Err(err) => {
                warn!(error = %err, "detail load failed");
                self.error = Some(err.message());
                LoadOutcome::Failed
            }
        }
    }

    /// Sets the slot directly, dropping any load in flight.
    pub fn set(&mut self, value: Option<T>) {
        self.generation += 1;
        self.value = value;
        self.is_loading = false;
        self.error = None;
    }
}

impl<T: Identified + Clone> DetailSlot<T> {
    pub fn replace(&mut self, item: &T) -> bool {
        match &mut self.value {
            Some(current) if current.id() == item.id() => {
                *current = item.clone();
                true
            }
            _ => false,
        }
    }
}

/// Runs one guarded page load against the list selected by `list`.
///
/// `context` is read under the same lock that claims the load slot, so the
/// fetch always sees the filters the ticket was issued for.
pub(crate) async fn load_page<S, T, C, F, Fut>(
    state: &Mutex<S>,
    list: fn(&mut S) -> &mut ListState<T>,
    request: PageRequest,
    context: impl FnOnce(&S) -> C,
    fetch: F,
) -> LoadOutcome
where
    F: FnOnce(u32, C) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, bool), CommerceError>>,
{
    let (ticket, context) = {
        let mut guard = state.lock().await;
        let Some(ticket) = list(&mut *guard).claim(request) else {
            return LoadOutcome::Skipped;
        };
        (ticket, context(&*guard))
    };

    let result = fetch(ticket.offset(), context).await;

    let mut guard = state.lock().await;
    let list = list(&mut *guard);
    match result {
        Ok((items, has_more)) => {
            if list.finish(ticket, items, has_more) {
                LoadOutcome::Loaded
            } else {
                LoadOutcome::Stale
            }
        }
        Err(err) => {
            warn!(error = %err, offset = ticket.offset(), "page load failed");
            if list.fail(ticket, err.message()) {
                LoadOutcome::Failed
            } else {
                LoadOutcome::Stale
            }
        }
    }
}

/// Logs a failed write, stores its message and hands the error back.
pub(crate) fn write_failed(slot: &mut Option<String>, action: &str, err: CommerceError) -> CommerceError {
    warn!(error = %err, action, "write failed");
    *slot = Some(err.message());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        label: &'static str,
    }

    impl Identified for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, label: &'static str) -> Item {
        Item {
            id: id.to_string(),
            label,
        }
    }

    #[test]
    fn single_flight_guard() {
        let mut list = ListState::<Item>::default();
        assert!(list.begin(true).is_some());
        assert!(list.begin(false).is_none());
        assert!(!list.can_load_more());
    }

    #[test]
    fn offset_advances_by_returned_count() {
        let mut list = ListState::default();
        let ticket = list.begin(true).unwrap();
        assert!(list.finish(ticket, vec![item("a", ""), item("b", "")], true));
        assert_eq!(list.offset, 2);

        let ticket = list.begin(false).unwrap();
        assert_eq!(ticket.offset(), 2);
        assert!(list.finish(ticket, vec![item("c", "")], false));
        assert_eq!(list.offset, 3);
        assert_eq!(list.items.len(), 3);
        assert!(!list.can_load_more());
    }

    #[test]
    fn more_is_refused_once_exhausted() {
        let mut list = ListState::default();
        let ticket = list.claim(PageRequest::Reset).unwrap();
        list.finish(ticket, vec![item("a", "")], false);

        assert!(list.claim(PageRequest::More).is_none());
        assert!(!list.is_loading);
        assert_eq!(list.offset, 1);

        let ticket = list.claim(PageRequest::Next).unwrap();
        assert_eq!(ticket.offset(), 1);
    }

    fn whole(list: &mut ListState<Item>) -> &mut ListState<Item> {
        list
    }

    #[tokio::test]
    async fn exhausted_list_skips_more_without_fetching() {
        let state = Mutex::new(ListState::default());
        {
            let mut list = state.lock().await;
            let ticket = list.begin(true).unwrap();
            list.finish(ticket, vec![item("a", "")], false);
        }

        let mut fetched = false;
        let outcome = load_page(&state, whole, PageRequest::More, |_| (), |_, ()| {
            fetched = true;
            async { Ok::<_, CommerceError>((Vec::<Item>::new(), false)) }
        })
        .await;

        assert_eq!(outcome, LoadOutcome::Skipped);
        assert!(!fetched);
        let list = state.lock().await;
        assert_eq!(list.items.len(), 1);
        assert!(!list.is_loading);
    }

    #[test]
    fn failure_keeps_items() {
        let mut list = ListState::default();
        let ticket = list.begin(true).unwrap();
        list.finish(ticket, vec![item("a", "")], true);

        let ticket = list.begin(false).unwrap();
        assert!(list.fail(ticket, "boom".to_string()));
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.error.as_deref(), Some("boom"));
        assert!(!list.is_loading);
    }

    #[test]
    fn reset_orphans_in_flight_ticket() {
        let mut list = ListState::default();
        let stale = list.begin(true).unwrap();
        list.reset();
        let fresh = list.begin(true).unwrap();

        assert!(!list.finish(stale, vec![item("old", "")], true));
        assert!(list.is_loading);
        assert!(list.items.is_empty());

        assert!(list.finish(fresh, vec![item("new", "")], false));
        assert_eq!(list.items[0].id, "new");
    }

    #[test]
    fn replace_by_identity() {
        let mut list = ListState::default();
        let ticket = list.begin(true).unwrap();
        list.finish(ticket, vec![item("a", "old"), item("b", "old")], false);

        assert!(list.replace(&item("b", "new")));
        assert_eq!(list.items[1].label, "new");
        assert!(!list.replace(&item("z", "new")));
    }

    #[test]
    fn detail_slot_drops_superseded_load() {
        let mut slot = DetailSlot::default();
        let first = slot.begin();
        let second = slot.begin();

        assert_eq!(slot.settle(first, Ok(item("a", ""))), LoadOutcome::Stale);
        assert_eq!(slot.settle(second, Ok(item("b", ""))), LoadOutcome::Loaded);
        assert_eq!(slot.value.as_ref().map(|i| i.id.as_str()), Some("b"));

        let third = slot.begin();
        let outcome = slot.settle(third, Err(CommerceError::Api("gone".into())));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(slot.error.as_deref(), Some("gone"));
        assert!(slot.value.is_some());
    }
}
