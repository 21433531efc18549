//! Customer list loading and phone updates for the Admin API.

use shopdesk_core::{Page, PageArgs, UpdateFailure, UpdateResult};
use tracing::instrument;

use super::{
    GraphQLTransport,
    conversions::{convert_customer_connection, convert_customer_update},
    queries::{CustomerUpdate, GetCustomers, customer_update, get_customers},
    reject_user_errors, transport_failure,
};
use crate::shopify::LoadError;
use crate::shopify::types::{CustomerPhoneUpdate, CustomerPhoneUpdated, CustomerRecord};

const NO_CUSTOMER_RETURNED: &str = "No customer returned from update";

/// Load one page of customers.
///
/// Nodes and page info are returned exactly as Shopify ordered them.
///
/// # Errors
///
/// Returns `LoadError` if the request fails or a node cannot be converted.
#[instrument(skip(api), fields(first = ?args.first, last = ?args.last))]
pub async fn list_customers<T: GraphQLTransport>(
    api: &T,
    args: &PageArgs,
) -> Result<Page<CustomerRecord>, LoadError> {
    let variables = get_customers::Variables { page: args.clone() };

    let response = api
        .execute::<GetCustomers>(variables)
        .await
        .map_err(LoadError::customers)?;

    let page = convert_customer_connection(response.customers).map_err(LoadError::customers)?;
    tracing::debug!(count = page.items.len(), "Loaded customers");
    Ok(page)
}

/// Set a customer's phone number.
///
/// # Errors
///
/// Returns a validation failure carrying Shopify's first user error, or a
/// transport failure if the request fails or returns no customer.
#[instrument(skip(api), fields(customer_id = %update.customer_id))]
pub async fn update_customer_phone<T: GraphQLTransport>(
    api: &T,
    update: &CustomerPhoneUpdate,
) -> UpdateResult<CustomerPhoneUpdated> {
    let variables = customer_update::Variables {
        input: customer_update::CustomerInput {
            id: update.customer_id.to_string(),
            phone: update.phone.clone(),
        },
    };

    let response = api
        .execute::<CustomerUpdate>(variables)
        .await
        .map_err(|e| transport_failure("customerUpdate", &e))?;

    let payload = response
        .customer_update
        .ok_or_else(|| UpdateFailure::transport(NO_CUSTOMER_RETURNED))?;

    reject_user_errors("customerUpdate", &payload.user_errors)?;

    let customer = payload
        .customer
        .ok_or_else(|| UpdateFailure::transport(NO_CUSTOMER_RETURNED))?;

    convert_customer_update(customer).map_err(|e| transport_failure("customerUpdate", &e))
}
