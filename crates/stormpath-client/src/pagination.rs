//! Paginated collection retrieval.
//!
//! Collections are paged by `offset`/`limit`. The first request carries no
//! offset and the service picks its default page size; every later request
//! advances the offset by that first `limit`. A page holding fewer items than
//! the limit ends the collection. A total that is an exact multiple of the
//! limit therefore costs one extra request, which comes back empty.
//!
//! Two entry points share this logic:
//! - [`fetch_all`] materializes the whole collection, all or nothing
//! - [`pages`] yields pages lazily as a [`Stream`]

use std::future::Future;

use futures::stream::{self, Stream};
use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;

use stormpath_common::CollectionPage;

use crate::dispatch::{Dispatcher, decode_json};
use crate::error::Result;

/// Fetch a single page of a collection.
///
/// `offset` of `None` leaves the parameter off and lets the service default it.
///
/// # Errors
///
/// Returns transport, service and decode errors unchanged.
pub async fn fetch_page<T: DeserializeOwned>(
    dispatcher: &Dispatcher,
    collection_href: &str,
    offset: Option<usize>,
) -> Result<CollectionPage<T>> {
    let response = match offset {
        None => {
            dispatcher
                .dispatch(Method::GET, collection_href, None)
                .await?
        }
        Some(offset) => {
            let offset = offset.to_string();
            dispatcher
                .dispatch_with_query(
                    Method::GET,
                    collection_href,
                    &[("offset", offset.as_str())],
                    None,
                )
                .await?
        }
    };

    decode_json(response).await
}

/// Fetch every item of a collection, in service order.
///
/// # Errors
///
/// Any failure on any page aborts the whole fetch; no partial result is
/// returned.
pub async fn fetch_all<T: DeserializeOwned>(
    dispatcher: &Dispatcher,
    collection_href: &str,
) -> Result<Vec<T>> {
    collect_pages(|offset| fetch_page(dispatcher, collection_href, offset)).await
}

/// Drive a page source to completion.
///
/// `fetch` is called with `None` for the first page and with successive
/// multiples of the first page's limit afterwards.
pub(crate) async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<usize>) -> Fut,
    Fut: Future<Output = Result<CollectionPage<T>>>,
{
    let first = fetch(None).await?;
    let limit = first.limit;

    // A zero limit can never produce a short page, so it has to stop here.
    if limit == 0 || first.is_last(limit) {
        debug!("Collection fits in one page ({} items)", first.len());
        return Ok(first.items);
    }

    // The first page was full, so at least one more request follows.
    let mut items = Vec::with_capacity(limit.saturating_mul(2));
    items.extend(first.items);

    let mut offset = limit;
    loop {
        let page = fetch(Some(offset)).await?;
        let last = page.is_last(limit);
        debug!("Fetched {} items at offset {offset}", page.len());
        items.extend(page.items);

        if last {
            break;
        }
        offset += limit;
    }

    Ok(items)
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Start,
    Next { offset: usize, limit: usize },
    Done,
}

/// Lazily stream the pages of a collection.
///
/// Requests are issued one at a time as the stream is polled, using the same
/// offsets as [`fetch_all`]. The stream ends after the first short page, or
/// after the first error. Calling this again starts over from the first page.
pub fn pages<'a, T>(
    dispatcher: &'a Dispatcher,
    collection_href: String,
) -> impl Stream<Item = Result<CollectionPage<T>>> + 'a
where
    T: DeserializeOwned + 'a,
{
    stream::try_unfold(Cursor::Start, move |cursor| {
        let collection_href = collection_href.clone();
        async move { next_page(dispatcher, &collection_href, cursor).await }
    })
}

async fn next_page<T: DeserializeOwned>(
    dispatcher: &Dispatcher,
    collection_href: &str,
    cursor: Cursor,
) -> Result<Option<(CollectionPage<T>, Cursor)>> {
    let (offset, known_limit) = match cursor {
        Cursor::Start => (None, None),
        Cursor::Next { offset, limit } => (Some(offset), Some(limit)),
        Cursor::Done => return Ok(None),
    };

    let page = fetch_page::<T>(dispatcher, collection_href, offset).await?;
    let limit = known_limit.unwrap_or(page.limit);

    let next = if limit == 0 || page.is_last(limit) {
        Cursor::Done
    } else {
        Cursor::Next {
            offset: offset.unwrap_or(0) + limit,
            limit,
        }
    };

    Ok(Some((page, next)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    use super::*;
    use crate::error::ClientError;
    use futures::TryStreamExt;
    use futures::executor::block_on;
    use proptest::prelude::*;
    use stormpath_common::{ApiKeyPair, Config};
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_of(data: &[u32], offset: Option<usize>, limit: usize) -> CollectionPage<u32> {
        let start = offset.unwrap_or(0).min(data.len());
        let end = (start + limit).min(data.len());
        CollectionPage {
            href: "memory".to_string(),
            offset: start,
            limit,
            items: data[start..end].to_vec(),
        }
    }

    fn run_in_memory(total: usize, limit: usize) -> (Vec<u32>, Vec<Option<usize>>) {
        let data: Vec<u32> = (0..u32::try_from(total).unwrap()).collect();
        let requested = RefCell::new(Vec::new());

        let items = block_on(collect_pages(|offset| {
            requested.borrow_mut().push(offset);
            std::future::ready(Ok(page_of(&data, offset, limit)))
        }))
        .unwrap();

        (items, requested.into_inner())
    }

    #[test]
    fn test_empty_collection_single_request() {
        let (items, requested) = run_in_memory(0, 25);
        assert!(items.is_empty());
        assert_eq!(requested, vec![None]);
    }

    #[test]
    fn test_short_collection_single_request() {
        let (items, requested) = run_in_memory(7, 25);
        assert_eq!(items, (0..7).collect::<Vec<_>>());
        assert_eq!(requested, vec![None]);
    }

    #[test]
    fn test_page_aligned_total_probes_empty_page() {
        let (items, requested) = run_in_memory(50, 25);
        assert_eq!(items.len(), 50);
        assert_eq!(requested, vec![None, Some(25), Some(50)]);
    }

    #[test]
    fn test_offsets_advance_by_first_limit() {
        let (items, requested) = run_in_memory(60, 25);
        assert_eq!(items, (0..60).collect::<Vec<_>>());
        assert_eq!(requested, vec![None, Some(25), Some(50)]);
    }

    #[test]
    fn test_zero_limit_stops_after_first_page() {
        let requests = Cell::new(0);
        let items: Vec<u32> = block_on(collect_pages(|_| {
            requests.set(requests.get() + 1);
            std::future::ready(Ok(CollectionPage {
                href: String::new(),
                offset: 0,
                limit: 0,
                items: Vec::new(),
            }))
        }))
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(requests.get(), 1);
    }

    #[test]
    fn test_error_mid_collection_discards_everything() {
        let data: Vec<u32> = (0..100).collect();
        let result = block_on(collect_pages(|offset| {
            std::future::ready(if offset == Some(50) {
                Err(ClientError::InvalidUrl("boom".to_string()))
            } else {
                Ok(page_of(&data, offset, 25))
            })
        }));

        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    proptest! {
        #[test]
        fn prop_fetch_all_returns_every_item_in_order(total in 0usize..300, limit in 1usize..40) {
            let (items, requested) = run_in_memory(total, limit);

            let expected: Vec<u32> = (0..u32::try_from(total).unwrap()).collect();
            prop_assert_eq!(items, expected);

            // ceil(total / limit), plus one probe when the total is page aligned.
            prop_assert_eq!(requested.len(), total / limit + 1);
        }
    }

    fn create_test_dispatcher(base_url: &str) -> Dispatcher {
        let config = Config::default().with_base_url(format!("{base_url}/v1"));
        Dispatcher::new(Arc::new(ApiKeyPair::new("test-id", "test-secret")), &config).unwrap()
    }

    fn items_json(range: std::ops::Range<usize>) -> Vec<serde_json::Value> {
        range
            .map(|i| serde_json::json!({ "name": format!("app-{i}") }))
            .collect()
    }

    fn page_json(offset: usize, limit: usize, items: Vec<serde_json::Value>) -> serde_json::Value {
        serde_json::json!({
            "href": "collection",
            "offset": offset,
            "limit": limit,
            "items": items
        })
    }

    async fn mount_page(
        mock_server: &MockServer,
        offset: Option<usize>,
        body: serde_json::Value,
    ) {
        let mock = Mock::given(method("GET")).and(path("/v1/tenants/abc/applications"));
        let mock = match offset {
            None => mock.and(query_param_is_missing("offset")),
            Some(offset) => mock.and(query_param("offset", offset.to_string())),
        };

        mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_all_over_http() {
        let mock_server = MockServer::start().await;

        mount_page(&mock_server, None, page_json(0, 2, items_json(0..2))).await;
        mount_page(&mock_server, Some(2), page_json(2, 2, items_json(2..4))).await;
        mount_page(&mock_server, Some(4), page_json(4, 2, items_json(4..5))).await;

        let dispatcher = create_test_dispatcher(&mock_server.uri());
        let items: Vec<serde_json::Value> = fetch_all(&dispatcher, "/tenants/abc/applications")
            .await
            .unwrap();

        let names: Vec<&str> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["app-0", "app-1", "app-2", "app-3", "app-4"]);
    }

    #[tokio::test]
    async fn test_fetch_all_decode_error_aborts() {
        let mock_server = MockServer::start().await;

        mount_page(&mock_server, None, page_json(0, 2, items_json(0..2))).await;
        Mock::given(method("GET"))
            .and(path("/v1/tenants/abc/applications"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dispatcher = create_test_dispatcher(&mock_server.uri());
        let result: Result<Vec<serde_json::Value>> =
            fetch_all(&dispatcher, "/tenants/abc/applications").await;

        assert!(matches!(result, Err(ClientError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_first_page_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/tenants/abc/applications"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(serde_json::json!({"error": "unavailable"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let dispatcher = create_test_dispatcher(&mock_server.uri());
        let result: Result<Vec<serde_json::Value>> =
            fetch_all(&dispatcher, "/tenants/abc/applications").await;

        assert!(matches!(result, Err(ClientError::HttpStatus { status: 503 })));
    }

    #[tokio::test]
    async fn test_fetch_all_server_error_mid_collection_aborts() {
        let mock_server = MockServer::start().await;

        mount_page(&mock_server, None, page_json(0, 2, items_json(0..2))).await;
        mount_page(&mock_server, Some(2), page_json(2, 2, items_json(2..4))).await;
        Mock::given(method("GET"))
            .and(path("/v1/tenants/abc/applications"))
            .and(query_param("offset", "4"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dispatcher = create_test_dispatcher(&mock_server.uri());
        let result: Result<Vec<serde_json::Value>> =
            fetch_all(&dispatcher, "/tenants/abc/applications").await;

        assert!(matches!(result, Err(ClientError::HttpStatus { status: 500 })));
    }

    #[tokio::test]
    async fn test_pages_stream_stops_at_failed_page() {
        let mock_server = MockServer::start().await;

        mount_page(&mock_server, None, page_json(0, 2, items_json(0..2))).await;
        Mock::given(method("GET"))
            .and(path("/v1/tenants/abc/applications"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dispatcher = create_test_dispatcher(&mock_server.uri());
        let result: Result<Vec<CollectionPage<serde_json::Value>>> =
            pages(&dispatcher, "/tenants/abc/applications".to_string())
                .try_collect()
                .await;

        assert!(matches!(result, Err(ClientError::HttpStatus { status: 403 })));
    }

    #[tokio::test]
    async fn test_pages_stream_matches_fetch_all_requests() {
        let mock_server = MockServer::start().await;

        mount_page(&mock_server, None, page_json(0, 3, items_json(0..3))).await;
        mount_page(&mock_server, Some(3), page_json(3, 3, items_json(3..6))).await;
        mount_page(&mock_server, Some(6), page_json(6, 3, Vec::new())).await;

        let dispatcher = create_test_dispatcher(&mock_server.uri());
        let collected: Vec<CollectionPage<serde_json::Value>> =
            pages(&dispatcher, "/tenants/abc/applications".to_string())
                .try_collect()
                .await
                .unwrap();

        assert_eq!(collected.len(), 3);
        assert_eq!(collected[1].offset, 3);
        assert!(collected[2].is_empty());
    }
}
