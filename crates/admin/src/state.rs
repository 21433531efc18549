//! Application state shared across handlers.

use std::sync::Arc;

use shopdesk_core::{CustomerId, VariantId};

use crate::config::AdminConfig;
use crate::services::{BrowserRegistry, InFlight};
use crate::shopify::{AdminClient, AdminShopifyError, CustomerRecord, ProductRecord};

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    shopify: AdminClient,
    customers: BrowserRegistry<CustomerRecord>,
    products: BrowserRegistry<ProductRecord>,
    customer_edits: InFlight<CustomerId>,
    variant_edits: InFlight<VariantId>,
}

impl AppState {
    /// Build the state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, AdminShopifyError> {
        let shopify = AdminClient::new(&config.shopify)?;
        let customers = BrowserRegistry::new(config.pagination.customers);
        let products = BrowserRegistry::new(config.pagination.products);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                customers,
                products,
                customer_edits: InFlight::new(),
                variant_edits: InFlight::new(),
            }),
        })
    }

    /// Get the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Per-session customer list browsers.
    #[must_use]
    pub fn customers(&self) -> &BrowserRegistry<CustomerRecord> {
        &self.inner.customers
    }

    /// Per-session product list browsers.
    #[must_use]
    pub fn products(&self) -> &BrowserRegistry<ProductRecord> {
        &self.inner.products
    }

    /// Customers with a phone update in flight.
    #[must_use]
    pub fn customer_edits(&self) -> &InFlight<CustomerId> {
        &self.inner.customer_edits
    }

    /// Variants with a price update in flight.
    #[must_use]
    pub fn variant_edits(&self) -> &InFlight<VariantId> {
        &self.inner.variant_edits
    }
}
