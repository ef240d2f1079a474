//! Scripted [`CatalogApi`] shared by the unit tests.

use crate::{CatalogApi, DetailRecord, Error, ItemId, ListItem, PAGE_SIZE, Page, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn item(id: u32, name: &str) -> ListItem {
    ListItem::new(name, format!("https://pokeapi.co/api/v2/pokemon/{id}/"))
}

fn scripted_failure(what: &str) -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        format!("scripted failure: {what}"),
    ))
}

/// In-memory catalog. Every call yields once before answering so concurrent
/// callers interleave the way they would around a real request.
#[derive(Default)]
pub struct MockApi {
    pages: Vec<Vec<ListItem>>,
    failing_pages: Mutex<HashSet<usize>>,
    failing_details: Mutex<HashSet<ItemId>>,
    types: Mutex<HashMap<ItemId, Vec<String>>>,
    page_requests: Mutex<Vec<usize>>,
    detail_calls: AtomicUsize,
}

impl MockApi {
    /// Catalog of `total` items named `mon-<n>`, ids `1..=total`.
    pub fn with_items(total: u32) -> Self {
        let items: Vec<ListItem> = (1..=total).map(|n| item(n, &format!("mon-{n}"))).collect();
        Self {
            pages: items.chunks(PAGE_SIZE).map(<[ListItem]>::to_vec).collect(),
            ..Self::default()
        }
    }

    pub fn fail_page(&self, index: usize) {
        self.failing_pages.lock().unwrap().insert(index);
    }

    pub fn heal_page(&self, index: usize) {
        self.failing_pages.lock().unwrap().remove(&index);
    }

    pub fn fail_detail(&self, id: u32) {
        self.failing_details.lock().unwrap().insert(ItemId::new(id));
    }

    pub fn set_types(&self, id: u32, types: &[&str]) {
        self.types.lock().unwrap().insert(
            ItemId::new(id),
            types.iter().map(ToString::to_string).collect(),
        );
    }

    pub fn page_calls(&self) -> usize {
        self.page_requests.lock().unwrap().len()
    }

    pub fn page_requests(&self) -> Vec<usize> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for MockApi {
    async fn fetch_page(&self, page_index: usize) -> Result<Page> {
        self.page_requests.lock().unwrap().push(page_index);
        tokio::task::yield_now().await;

        if self.failing_pages.lock().unwrap().contains(&page_index) {
            return Err(scripted_failure(&format!("page {page_index}")));
        }
        let items = self.pages.get(page_index).cloned().unwrap_or_default();
        Ok(Page {
            items,
            has_next: page_index + 1 < self.pages.len(),
            page_index,
        })
    }

    async fn fetch_detail(&self, url: &str) -> Result<DetailRecord> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let id = ItemId::from_url(url)?;
        if self.failing_details.lock().unwrap().contains(&id) {
            return Err(scripted_failure(&format!("detail {id}")));
        }
        let types = self
            .types
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| vec!["normal".to_string()]);
        Ok(DetailRecord {
            id,
            name: format!("mon-{id}"),
            types,
            stats: Vec::new(),
            moves: vec!["tackle".to_string()],
            height_decimeters: 7,
            weight_hectograms: 69,
        })
    }
}
