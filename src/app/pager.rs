//! Lazy paged record sequence over the catalog list endpoints
//!
//! Presents all pages matching a query as a single stream of records, so the
//! resolver never sees page boundaries. Pages are fetched strictly in
//! sequence and only on demand, which preserves both catalog order (the
//! first-match rule depends on it) and the short-circuit property: a match on
//! an early page means later pages are never requested.
//!
//! The stream is finite and not restartable; build a fresh one to re-iterate.

use std::collections::VecDeque;

use futures::stream::Stream;
use serde::de::DeserializeOwned;

use crate::app::client::CatalogClient;
use crate::app::query::Query;
use crate::errors::{ApiError, ApiResult};

struct PagerState {
    offset: u32,
    exhausted: bool,
}

/// Whether a fetched page is the last one for this query
fn page_is_last(page_len: usize, page_size: u32, next_offset: u32, total_results: u32) -> bool {
    (page_len as u32) < page_size || next_offset >= total_results
}

/// Stream of raw records for a query, fetched page by page
///
/// Yields records in catalog order across page boundaries. Any page-level
/// error terminates the stream with that error.
pub fn records<'a, T>(
    client: &'a CatalogClient,
    query: &'a Query,
) -> impl Stream<Item = ApiResult<T>> + 'a
where
    T: DeserializeOwned + 'a,
{
    let state = (
        PagerState {
            offset: 0,
            exhausted: false,
        },
        VecDeque::<T>::new(),
    );

    futures::stream::try_unfold(state, move |(mut state, mut buffered)| async move {
        loop {
            if let Some(record) = buffered.pop_front() {
                return Ok(Some((record, (state, buffered))));
            }
            if state.exhausted {
                return Ok::<_, ApiError>(None);
            }

            let page = client
                .fetch_page::<T>(
                    query.kind.endpoint(),
                    &query.filters,
                    query.page_size,
                    state.offset,
                )
                .await?;

            let page_len = page.results.len();
            state.offset += page_len as u32;
            state.exhausted = page_is_last(
                page_len,
                query.page_size,
                state.offset,
                page.number_of_total_results,
            );

            tracing::debug!(
                "Fetched page: {} records, offset now {}, exhausted: {}",
                page_len,
                state.offset,
                state.exhausted
            );

            buffered.extend(page.results);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_page_terminates() {
        // 40 records back from a 100-record request: no more pages
        assert!(page_is_last(40, 100, 40, 240));
    }

    #[test]
    fn test_full_page_continues_below_total() {
        assert!(!page_is_last(100, 100, 100, 240));
    }

    #[test]
    fn test_offset_reaching_total_terminates() {
        // Final full page: total reached exactly
        assert!(page_is_last(100, 100, 300, 300));
    }

    #[test]
    fn test_empty_page_terminates() {
        assert!(page_is_last(0, 100, 0, 0));
    }
}
