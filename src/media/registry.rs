use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use tracing::debug;

use crate::foundation::error::KeepsakeResult;

/// Unique, generator-assigned identifier for a registry item.
///
/// Ids are never reused within a registry, including across removals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaId(u64);

/// One user-supplied image awaiting registration.
#[derive(Clone, Debug)]
pub struct MediaSource {
    /// Raw file payload.
    pub bytes: Arc<Vec<u8>>,
    /// Host hint for the display handle (a file name or similar).
    pub suggested_name: Option<String>,
}

impl MediaSource {
    /// Wrap a raw payload with no display-handle hint.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            suggested_name: None,
        }
    }
}

/// One registered image: payload plus a host display handle.
#[derive(Clone, Debug)]
pub struct MediaItem {
    id: MediaId,
    url: String,
    bytes: Arc<Vec<u8>>,
}

impl MediaItem {
    /// The item's unique id.
    pub fn id(&self) -> MediaId {
        self.id
    }

    /// Display handle usable by the host to render the image.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw file payload.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }
}

/// Host hook that mints and releases display handles (object URLs or
/// equivalent).
///
/// `release` must free the handle synchronously; the registry calls it from
/// `remove` so removed items cannot leak host resources.
pub trait HandleAllocator {
    /// Mint a display handle for a payload.
    fn create(&mut self, source: &MediaSource) -> KeepsakeResult<String>;
    /// Release a previously minted handle.
    fn release(&mut self, url: &str);
}

/// In-memory [`HandleAllocator`] for tests and headless hosts.
///
/// Cloning shares the live-handle set, so a test can keep a clone and assert
/// on leaks after the session consumed the original.
#[derive(Clone, Debug, Default)]
pub struct InMemoryHandles {
    live: Rc<RefCell<HashSet<String>>>,
    minted: Rc<RefCell<u64>>,
}

impl InMemoryHandles {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently live (minted and not released).
    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }
}

impl HandleAllocator for InMemoryHandles {
    fn create(&mut self, source: &MediaSource) -> KeepsakeResult<String> {
        let n = {
            let mut minted = self.minted.borrow_mut();
            *minted += 1;
            *minted
        };
        let name = source.suggested_name.as_deref().unwrap_or("blob");
        let url = format!("mem://{name}/{n}");
        self.live.borrow_mut().insert(url.clone());
        Ok(url)
    }

    fn release(&mut self, url: &str) {
        self.live.borrow_mut().remove(url);
    }
}

/// Ordered collection of user-supplied images.
///
/// Insertion order is preserved; it drives gallery layout and per-item
/// explosion delays downstream. The registry is the sole owner of item
/// lifetimes: `remove` releases the display handle synchronously.
#[derive(Default)]
pub struct MediaRegistry {
    items: Vec<MediaItem>,
    next_id: u64,
}

impl MediaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every source, appending in input order.
    ///
    /// Each source gets a fresh unique id and a display handle from the
    /// allocator. Existing entries are never mutated. Returns the ids in the
    /// same order as `sources`.
    pub fn add(
        &mut self,
        sources: Vec<MediaSource>,
        alloc: &mut dyn HandleAllocator,
    ) -> KeepsakeResult<Vec<MediaId>> {
        let mut ids = Vec::with_capacity(sources.len());
        for source in sources {
            let url = alloc.create(&source)?;
            self.next_id += 1;
            let id = MediaId(self.next_id);
            debug!(id = id.0, url = %url, "media item registered");
            self.items.push(MediaItem {
                id,
                url,
                bytes: source.bytes,
            });
            ids.push(id);
        }
        Ok(ids)
    }

    /// Remove the item with matching id, releasing its display handle.
    ///
    /// A missing id is a no-op (not an error); removal is idempotent.
    /// Returns whether an item was removed.
    pub fn remove(&mut self, id: MediaId, alloc: &mut dyn HandleAllocator) -> bool {
        let Some(pos) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        let item = self.items.remove(pos);
        alloc.release(&item.url);
        debug!(id = id.0, "media item removed");
        true
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Return `true` when no items are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/registry.rs"]
mod tests;
