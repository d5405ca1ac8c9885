//! Listing aggregation
//!
//! Fetches a bounded window of consecutive catalog pages through the
//! request executor and concatenates them into one logical page, plus the
//! non-paged category/genre catalogs.

use crate::{
    Result,
    portal::{Outcome, PortalClientGeneric},
    session::Notifier,
    types::{AggregatedListing, Category, ContentKind, Page, PortalAction, RequestSpec},
};
use tracing::{debug, warn};

/// Parameters for one ordered-list request
#[derive(Debug, Clone)]
pub struct ListingRequest {
    kind: ContentKind,
    category_id: Option<String>,
    search_term: Option<String>,
    favorites_only: bool,
}

impl ListingRequest {
    /// Create a listing request for the given content domain
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            category_id: None,
            search_term: None,
            favorites_only: false,
        }
    }

    /// Restrict the listing to one category or genre
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Filter by a search term. Blank terms are dropped entirely rather
    /// than sent as an empty filter.
    pub fn with_search_term(mut self, search_term: impl Into<String>) -> Self {
        self.search_term = Some(search_term.into());
        self
    }

    /// Restrict the listing to favorited content
    pub fn favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = favorites_only;
        self
    }

    /// Build the request spec for one upstream page
    fn to_spec(&self, page: u32) -> RequestSpec {
        let mut spec = RequestSpec::new(self.kind, PortalAction::GetOrderedList)
            .with_param("fav", if self.favorites_only { "1" } else { "0" })
            .with_param("sortby", "added")
            .with_param("hd", "0")
            .with_param("not_ended", "0")
            .with_param("p", page.to_string());
        if let Some(category_id) = &self.category_id {
            spec = spec.with_param("category", category_id);
        }
        if let Some(term) = &self.search_term {
            let term = term.trim();
            if !term.is_empty() {
                spec = spec.with_param("search", term);
            }
        }
        spec
    }
}

impl<N: Notifier> PortalClientGeneric<N> {
    /// Fetch up to `max_page_window` consecutive pages starting at
    /// `start_page` and merge them into one logical page.
    ///
    /// Records are concatenated strictly in page-fetch order. The window
    /// stops early when a page comes back empty, degraded, or once the
    /// reported total is reached. `total_items`/`page_size` reflect the
    /// last fetched page, mirroring upstream behaviour.
    pub fn get_listing(
        &mut self,
        request: &ListingRequest,
        start_page: u32,
    ) -> Result<AggregatedListing> {
        let window = self.settings().client.max_page_window.max(1);
        let mut listing = AggregatedListing::default();

        for offset in 0..window {
            let page_no = start_page + offset;
            match self.execute(&request.to_spec(page_no))? {
                Outcome::Ok(value) => {
                    let Some(js) = value.get(crate::types::RESULT_WRAPPER) else {
                        warn!(page = page_no, "Listing response missing result wrapper");
                        break;
                    };
                    let page: Page = serde_json::from_value(js.clone())?;
                    debug!(
                        page = page_no,
                        records = page.data.len(),
                        total = page.total_items,
                        "Fetched listing page"
                    );

                    let fetched = page.data.len();
                    listing.records.extend(page.data);
                    listing.total_items = page.total_items;
                    listing.page_size = page.max_page_items;

                    if fetched == 0 || listing.records.len() as u32 >= listing.total_items {
                        break;
                    }
                }
                Outcome::Degraded { status, .. } => {
                    warn!(page = page_no, status, "Listing page degraded, stopping window");
                    break;
                }
            }
        }

        Ok(listing)
    }

    /// Fetch the category catalog for a content domain.
    ///
    /// Catalog and series content expose `get_categories`; channels expose
    /// `get_genres`. A degraded response yields an empty catalog rather
    /// than an error.
    pub fn get_categories(&mut self, kind: ContentKind) -> Result<Vec<Category>> {
        let action = match kind {
            ContentKind::Channel => PortalAction::GetGenres,
            ContentKind::Catalog | ContentKind::Series => PortalAction::GetCategories,
            other => {
                return Err(crate::Error::internal(format!(
                    "content kind {} has no category catalog",
                    other
                )));
            }
        };

        match self.execute(&RequestSpec::new(kind, action))? {
            Outcome::Ok(value) => match value.get(crate::types::RESULT_WRAPPER) {
                Some(js) => Ok(serde_json::from_value(js.clone())?),
                None => {
                    warn!(r#type = %kind, "Category response missing result wrapper");
                    Ok(Vec::new())
                }
            },
            Outcome::Degraded { status, .. } => {
                warn!(r#type = %kind, status, "Category catalog degraded, returning empty");
                Ok(Vec::new())
            }
        }
    }
}
