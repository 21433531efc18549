//! Customer type conversion functions.

use shopdesk_core::{CustomerId, Page};

use crate::shopify::AdminShopifyError;
use crate::shopify::types::{CustomerPhoneUpdated, CustomerRecord};

use super::super::queries::{customer_update, get_customers};
use super::{invalid_id, parse_datetime};

// =============================================================================
// GetCustomers conversions
// =============================================================================

fn convert_customer(
    node: get_customers::GetCustomersCustomersNodes,
) -> Result<CustomerRecord, AdminShopifyError> {
    let id = CustomerId::parse(&node.id).map_err(|e| invalid_id("customer.id", &e))?;
    let number_of_orders = node.number_of_orders.parse::<u64>().map_err(|e| {
        AdminShopifyError::InvalidData(format!(
            "customer.numberOfOrders {:?}: {e}",
            node.number_of_orders
        ))
    })?;

    Ok(CustomerRecord {
        id,
        first_name: node.first_name,
        last_name: node.last_name,
        email: node.email,
        phone: node.phone,
        created_at: parse_datetime("customer.createdAt", &node.created_at)?,
        updated_at: parse_datetime("customer.updatedAt", &node.updated_at)?,
        number_of_orders,
    })
}

/// Convert a customers connection, keeping node order and page info verbatim.
pub fn convert_customer_connection(
    connection: get_customers::GetCustomersCustomers,
) -> Result<Page<CustomerRecord>, AdminShopifyError> {
    let items = connection
        .nodes
        .into_iter()
        .map(convert_customer)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page::new(items, connection.page_info))
}

// =============================================================================
// CustomerUpdate conversions
// =============================================================================

pub fn convert_customer_update(
    customer: customer_update::CustomerUpdateCustomerUpdateCustomer,
) -> Result<CustomerPhoneUpdated, AdminShopifyError> {
    Ok(CustomerPhoneUpdated {
        id: CustomerId::parse(&customer.id).map_err(|e| invalid_id("customer.id", &e))?,
        phone: customer.phone,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn connection(nodes: serde_json::Value) -> get_customers::GetCustomersCustomers {
        serde_json::from_value(json!({
            "nodes": nodes,
            "pageInfo": {
                "hasNextPage": true,
                "hasPreviousPage": false,
                "startCursor": "s",
                "endCursor": "e"
            }
        }))
        .unwrap()
    }

    fn node(id: &str, orders: &str) -> serde_json::Value {
        json!({
            "id": id,
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com",
            "phone": null,
            "createdAt": "2024-01-02T03:04:05Z",
            "updatedAt": "2024-02-03T04:05:06Z",
            "numberOfOrders": orders
        })
    }

    #[test]
    fn test_convert_connection() {
        let page = convert_customer_connection(connection(json!([
            node("gid://shopify/Customer/1", "3"),
            node("gid://shopify/Customer/2", "0"),
        ])))
        .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id.as_str(), "gid://shopify/Customer/1");
        assert_eq!(page.items[0].number_of_orders, 3);
        assert_eq!(page.items[0].display_name(), "Grace Hopper");
        assert_eq!(page.items[1].phone, None);
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor.unwrap().as_str(), "e");
    }

    #[test]
    fn test_malformed_node_is_invalid_data() {
        let result = convert_customer_connection(connection(json!([node(
            "gid://shopify/Customer/1",
            "many"
        )])));
        assert!(matches!(result, Err(AdminShopifyError::InvalidData(_))));

        let result = convert_customer_connection(connection(json!([node(
            "gid://shopify/Order/1",
            "1"
        )])));
        assert!(matches!(result, Err(AdminShopifyError::InvalidData(_))));
    }
}
