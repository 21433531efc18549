//! GraphQL operation definitions for the Shopify Admin API.
//!
//! Each operation is a unit struct implementing `graphql_client::GraphQLQuery`,
//! with its `Variables` and `ResponseData` in a snake_case module of the same
//! name. Query documents live in `graphql/admin/queries/`.

use graphql_client::{GraphQLQuery, QueryBody};

// =============================================================================
// Custom scalar type aliases
// =============================================================================

/// ISO 8601 date-time string.
type DateTime = String;

/// Decimal number as string (preserves precision).
type Decimal = String;

/// Money amount as decimal string.
type Money = String;

/// URL string.
#[allow(clippy::upper_case_acronyms)]
type URL = String;

/// Unsigned 64-bit integer as string.
type UnsignedInt64 = String;

/// Implements `GraphQLQuery` for an operation whose types live in `$module`.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        #[doc = concat!("The `", stringify!($name), "` operation.")]
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// =============================================================================
// Customer operations
// =============================================================================

graphql_operation!(GetCustomers, get_customers);
graphql_operation!(CustomerUpdate, customer_update);

const CUSTOMERS_DOCUMENT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/admin/queries/customers.graphql"
));

pub mod get_customers {
    use serde::{Deserialize, Serialize};
    use shopdesk_core::{PageArgs, PageInfo};

    use super::{DateTime, UnsignedInt64};

    pub const OPERATION_NAME: &str = "GetCustomers";
    pub const QUERY: &str = super::CUSTOMERS_DOCUMENT;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        #[serde(flatten)]
        pub page: PageArgs,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customers: GetCustomersCustomers,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetCustomersCustomers {
        pub nodes: Vec<GetCustomersCustomersNodes>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetCustomersCustomersNodes {
        pub id: String,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub created_at: DateTime,
        pub updated_at: DateTime,
        pub number_of_orders: UnsignedInt64,
    }
}

pub mod customer_update {
    use serde::{Deserialize, Serialize};
    use shopdesk_core::UserError;

    pub const OPERATION_NAME: &str = "CustomerUpdate";
    pub const QUERY: &str = super::CUSTOMERS_DOCUMENT;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CustomerInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct CustomerInput {
        pub id: String,
        pub phone: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_update: Option<CustomerUpdateCustomerUpdate>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerUpdateCustomerUpdate {
        pub customer: Option<CustomerUpdateCustomerUpdateCustomer>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerUpdateCustomerUpdateCustomer {
        pub id: String,
        pub phone: Option<String>,
    }
}

// =============================================================================
// Product operations
// =============================================================================

graphql_operation!(GetProducts, get_products);
graphql_operation!(ProductVariantsBulkUpdate, product_variants_bulk_update);

const PRODUCTS_DOCUMENT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/admin/queries/products.graphql"
));

pub mod get_products {
    use serde::{Deserialize, Serialize};
    use shopdesk_core::{PageArgs, PageInfo};

    use super::{Decimal, Money, URL};

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = super::PRODUCTS_DOCUMENT;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        #[serde(flatten)]
        pub page: PageArgs,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: GetProductsProducts,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductsProducts {
        pub nodes: Vec<GetProductsProductsNodes>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductsProductsNodes {
        pub id: String,
        pub title: String,
        #[serde(rename = "priceRangeV2")]
        pub price_range_v2: GetProductsProductsNodesPriceRangeV2,
        pub variants: GetProductsProductsNodesVariants,
        pub media: GetProductsProductsNodesMedia,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductsProductsNodesPriceRangeV2 {
        pub min_variant_price: MoneyV2,
        pub max_variant_price: MoneyV2,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyV2 {
        pub amount: Decimal,
        pub currency_code: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductsProductsNodesVariants {
        pub nodes: Vec<GetProductsProductsNodesVariantsNodes>,
        #[serde(default)]
        pub page_info: Option<GetProductsProductsNodesVariantsPageInfo>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductsProductsNodesVariantsPageInfo {
        pub has_next_page: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductsProductsNodesVariantsNodes {
        pub id: String,
        pub price: Money,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductsProductsNodesMedia {
        pub nodes: Vec<GetProductsProductsNodesMediaNodes>,
    }

    /// A media node; only `MediaImage` nodes carry an image.
    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductsProductsNodesMediaNodes {
        #[serde(default)]
        pub image: Option<GetProductsProductsNodesMediaNodesImage>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductsProductsNodesMediaNodesImage {
        pub url: URL,
    }
}

pub mod product_variants_bulk_update {
    use serde::{Deserialize, Serialize};
    use shopdesk_core::UserError;

    use super::Money;

    pub const OPERATION_NAME: &str = "ProductVariantsBulkUpdate";
    pub const QUERY: &str = super::PRODUCTS_DOCUMENT;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<ProductVariantsBulkInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ProductVariantsBulkInput {
        pub id: String,
        pub price: Money,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_update: Option<ProductVariantsBulkUpdatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkUpdatePayload {
        pub product: Option<ProductVariantsBulkUpdateProduct>,
        pub product_variants: Option<Vec<ProductVariantsBulkUpdateProductVariants>>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductVariantsBulkUpdateProduct {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductVariantsBulkUpdateProductVariants {
        pub id: String,
        pub price: Money,
    }
}
