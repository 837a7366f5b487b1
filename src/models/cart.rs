use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::ProductCard;

/// Query parameters for the cart endpoint. Mutations arrive as GET
/// parameters (`?action=remove&product=slug`), a shape inherited from the
/// storefront frontend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartQuery {
    pub action: Option<String>,
    pub product: Option<String>,
    /// Legacy alias for `product` with an implicit add action
    pub add: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub cart_items: Vec<ProductCard>,
    pub wishlist_items: Vec<ProductCard>,
    pub total_price: Decimal,
}
