//! Page browser: the current page of a list plus its navigation state.
//!
//! A [`PageBrowser`] owns a [`Navigator`] and the last page it loaded. Each
//! navigation asks the navigator for connection arguments and only calls the
//! loader when it produced some, so "next" on the last page never reaches
//! Shopify.

use std::future::Future;

use shopdesk_core::{Cursor, Direction, NavigationError, Navigator, Page, PageArgs, PageInfo};
use thiserror::Error;

use crate::shopify::admin::customers::list_customers;
use crate::shopify::admin::products::list_products;
use crate::shopify::{CustomerRecord, GraphQLTransport, LoadError, ProductRecord};

/// A record type that can be listed page by page.
pub trait Listing: Sized + Send + Sync + 'static {
    /// Resource name used in logs and cache keys.
    const RESOURCE: &'static str;

    /// Load the page described by `args`.
    fn load<T: GraphQLTransport>(
        api: &T,
        args: &PageArgs,
    ) -> impl Future<Output = Result<Page<Self>, LoadError>> + Send;
}

impl Listing for CustomerRecord {
    const RESOURCE: &'static str = "customers";

    fn load<T: GraphQLTransport>(
        api: &T,
        args: &PageArgs,
    ) -> impl Future<Output = Result<Page<Self>, LoadError>> + Send {
        list_customers(api, args)
    }
}

impl Listing for ProductRecord {
    const RESOURCE: &'static str = "products";

    fn load<T: GraphQLTransport>(
        api: &T,
        args: &PageArgs,
    ) -> impl Future<Output = Result<Page<Self>, LoadError>> + Send {
        list_products(api, args)
    }
}

/// Errors from a browser navigation.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// Another navigation is in flight.
    #[error(transparent)]
    Busy(#[from] NavigationError),

    /// The page could not be loaded; the previous page is kept.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Holds the current page of `R` and serializes navigation over it.
#[derive(Debug)]
pub struct PageBrowser<R> {
    navigator: Navigator,
    page: Option<Page<R>>,
}

impl<R: Listing> PageBrowser<R> {
    /// Create a browser with nothing loaded.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            navigator: Navigator::new(page_size),
            page: None,
        }
    }

    /// The last page successfully loaded.
    #[must_use]
    pub const fn page(&self) -> Option<&Page<R>> {
        self.page.as_ref()
    }

    /// Navigation state and cursors.
    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Records of the current page, for merging update results.
    pub fn records_mut(&mut self) -> &mut [R] {
        match self.page.as_mut() {
            Some(page) => &mut page.items,
            None => &mut [],
        }
    }

    /// Load the page at an explicit cursor (the first page for `None`).
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::Busy` if a load is in flight, or
    /// `BrowseError::Load` if the request fails.
    pub async fn jump<T: GraphQLTransport>(
        &mut self,
        api: &T,
        cursor: Option<Cursor>,
        direction: Direction,
    ) -> Result<(), BrowseError> {
        let args = self.navigator.jump(cursor, direction)?;
        self.run(api, args).await
    }

    /// Load the current page again, or the first page if none is loaded.
    ///
    /// # Errors
    ///
    /// Same as [`PageBrowser::jump`].
    pub async fn reload<T: GraphQLTransport>(&mut self, api: &T) -> Result<(), BrowseError> {
        let args = self.navigator.reload()?;
        self.run(api, args).await
    }

    /// Load the next page.
    ///
    /// Returns `Ok(false)` without a request when there is no next page.
    ///
    /// # Errors
    ///
    /// Same as [`PageBrowser::jump`].
    pub async fn next<T: GraphQLTransport>(&mut self, api: &T) -> Result<bool, BrowseError> {
        match self.navigator.next()? {
            Some(args) => self.run(api, args).await.map(|()| true),
            None => Ok(false),
        }
    }

    /// Load the previous page.
    ///
    /// Returns `Ok(false)` without a request when there is no previous page.
    ///
    /// # Errors
    ///
    /// Same as [`PageBrowser::jump`].
    pub async fn previous<T: GraphQLTransport>(&mut self, api: &T) -> Result<bool, BrowseError> {
        match self.navigator.previous()? {
            Some(args) => self.run(api, args).await.map(|()| true),
            None => Ok(false),
        }
    }

    async fn run<T: GraphQLTransport>(&mut self, api: &T, args: PageArgs) -> Result<(), BrowseError> {
        let pending = PendingLoad(Some(&mut self.navigator));

        match R::load(api, &args).await {
            Ok(page) => {
                pending.complete(page.page_info.clone());
                self.page = Some(page);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(resource = R::RESOURCE, error = %err, "Page load failed");
                Err(err.into())
            }
        }
    }
}

/// Returns the navigator to `Idle` if a load is dropped or fails.
struct PendingLoad<'a>(Option<&'a mut Navigator>);

impl PendingLoad<'_> {
    fn complete(mut self, page_info: PageInfo) {
        if let Some(navigator) = self.0.take() {
            navigator.complete(page_info);
        }
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if let Some(navigator) = self.0.take() {
            navigator.abort();
        }
    }
}
