use std::future::Future;

use crate::error::AppResult;

/// Fetches offset-based pages until one comes back shorter than `page_size`.
/// Pages are concatenated in request order.
pub(crate) async fn collect_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> AppResult<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = AppResult<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut start_at = 0;

    loop {
        let page = fetch_page(start_at).await?;
        let fetched = page.len();
        items.extend(page);

        if fetched < page_size {
            return Ok(items);
        }
        start_at += page_size;
    }
}

/// Fetches pages that report whether they are the last one, advancing the
/// offset by the number of items received. An empty page also ends the loop.
pub(crate) async fn collect_until_last<T, F, Fut>(mut fetch_page: F) -> AppResult<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = AppResult<(Vec<T>, bool)>>,
{
    let mut items = Vec::new();
    let mut start_at = 0;

    loop {
        let (page, is_last) = fetch_page(start_at).await?;
        let fetched = page.len();
        items.extend(page);

        if is_last || fetched == 0 {
            return Ok(items);
        }
        start_at += fetched;
    }
}
