use serde::{Deserialize, Serialize};

/// One page of a server-paginated collection.
///
/// `offset` and `limit` are the page parameters echoed by the service. A
/// well-formed page never holds more than `limit` items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPage<T> {
    /// Address of the collection this page belongs to.
    #[serde(default)]
    pub href: String,
    /// Index of the first item on this page.
    #[serde(default)]
    pub offset: usize,
    /// Maximum page size the service applied.
    pub limit: usize,
    /// Items on this page, in service order.
    pub items: Vec<T>,
}

impl<T> CollectionPage<T> {
    /// Whether this page ends the collection.
    ///
    /// A page is the last one when it holds fewer items than `page_limit`,
    /// the limit reported by the first page. A full page means the next
    /// offset has to be probed, even if it turns out empty.
    #[must_use]
    pub fn is_last(&self, page_limit: usize) -> bool {
        self.items.len() < page_limit
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
