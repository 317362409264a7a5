use std::vec::IntoIter;

use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{
    models::{Challenge, Page},
    routes::Routes,
    Api, ApiError,
};

/// Lazily walks a paginated listing, yielding results in page order.
///
/// The first failed fetch is yielded once, after which the iterator is done.
pub(crate) struct Paginated<'a, A, T> {
    api: &'a A,
    next_page: Option<Url>,
    results: IntoIter<T>,
}

impl<'a, A: Api, T: DeserializeOwned> Paginated<'a, A, T> {
    pub(crate) fn new(api: &'a A, first_page: Url) -> Self {
        Self {
            api,
            next_page: Some(first_page),
            results: Vec::new().into_iter(),
        }
    }

    fn fetch(&mut self, url: Url) -> Result<(), ApiError> {
        let page: Page<T> = self.api.get(&url)?;
        log::debug!("Fetched {} results from {}", page.results.len(), url);
        // next may be absolute or relative to the page that linked it
        self.next_page = page
            .next
            .filter(|next| !next.trim().is_empty())
            .map(|next| url.join(&next))
            .transpose()?;
        self.results = page.results.into_iter();
        Ok(())
    }
}

impl<A: Api, T: DeserializeOwned> Iterator for Paginated<'_, A, T> {
    type Item = Result<T, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(result) = self.results.next() {
                return Some(Ok(result));
            }
            let url = self.next_page.take()?;
            if let Err(err) = self.fetch(url) {
                return Some(Err(err));
            }
        }
    }
}

pub(crate) fn challenge_ids<'a, A: Api>(
    api: &'a A,
    routes: &Routes,
) -> Result<impl Iterator<Item = Result<u64, ApiError>> + 'a, ApiError> {
    Ok(Paginated::<A, Challenge>::new(api, routes.challenges()?)
        .map(|challenge| challenge.map(|challenge| challenge.id)))
}
