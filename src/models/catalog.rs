use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Facet selections for a catalog listing, reconstructed from repeated
/// query-string keys (`?shape=round&shape=oval&price=1500-1999`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    #[serde(default)]
    pub brand: Vec<String>,
    #[serde(default)]
    pub shape: Vec<String>,
    #[serde(default)]
    pub frame_type: Vec<String>,
    #[serde(default)]
    pub gender: Vec<String>,
    #[serde(default)]
    pub material: Vec<String>,
    #[serde(default)]
    pub color: Vec<String>,
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(default)]
    pub weight_group: Vec<String>,
    #[serde(default)]
    pub price: Vec<String>,
    pub page: Option<u64>,
    /// Optional category constraint on the shape listing
    pub category: Option<String>,
}

/// A single enumerated filter choice (value + display label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandChoice {
    pub slug: String,
    pub name: String,
}

/// Filter choices offered to the UI, computed from the pre-narrowing base
/// set so no selection can lead to a dead end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetChoices {
    pub brands: Vec<BrandChoice>,
    pub shapes: Vec<Choice>,
    pub frame_types: Vec<Choice>,
    pub genders: Vec<Choice>,
    pub materials: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<Choice>,
    pub weight_groups: Vec<Choice>,
    pub price_buckets: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCard {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub brand: Option<String>,
    pub price: Decimal,
    pub primary_image: Option<String>,
    pub secondary_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub products: Vec<ProductCard>,
    pub page: u64,
    pub num_pages: u64,
    pub total_items: u64,
    pub filters: FacetChoices,
    pub selected: FacetSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListingResponse {
    pub category: CategoryOut,
    #[serde(flatten)]
    pub listing: ListingResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeListingResponse {
    pub page_title: String,
    pub shape: String,
    pub gender: String,
    pub category: Option<CategoryOut>,
    #[serde(flatten)]
    pub listing: ListingResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOut {
    pub slug: String,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerOut {
    pub title: String,
    pub banner_type: String,
    pub image: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub banners: Vec<BannerOut>,
    pub categories: Vec<CategoryOut>,
    pub trending_products: Vec<ProductCard>,
    pub premium_products: Vec<ProductCard>,
    pub exclusive_products: Vec<ProductCard>,
    pub coupon_banner: Option<BannerOut>,
    pub replacement_banner: Option<BannerOut>,
    pub buy1get1_banner: Option<BannerOut>,
    pub exclusive_banner: Option<BannerOut>,
    pub premium_banner: Option<BannerOut>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub brand: Option<String>,
    pub shape: Option<String>,
    pub gender: Option<String>,
    pub page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub products: Vec<ProductCard>,
    pub page: u64,
    pub num_pages: u64,
    pub total_items: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetailResponse {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub brand: Option<String>,
    pub category: Option<CategoryOut>,
    pub gender: String,
    pub shape: String,
    pub frame_type: String,
    pub frame_material: String,
    pub color: String,
    pub size: String,
    pub weight_group: String,
    pub price: Decimal,
    pub is_prescription_supported: bool,
    pub images: Vec<String>,
}
