//! Catalog entities and request payloads.
//!
//! Entities are plain serde structs held in the in-memory store. Payload
//! structs are what the handlers deserialize; creation payloads omit the
//! derived fields (slug, SKU, timestamps) which the store fills in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

fn default_low_stock() -> u32 {
    5
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub image: Option<String>,
    pub is_active: bool,
    pub display_order: u32,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CategoryPayload {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: u32,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub short_description: Option<String>,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub price: f64,
    pub compare_at_price: Option<f64>,
    pub cost_price: Option<f64>,
    pub stock_quantity: u32,
    pub low_stock_threshold: u32,
    pub track_inventory: bool,
    pub is_active: bool,
    pub is_featured: bool,
    pub average_rating: f64,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_in_stock(&self) -> bool {
        if !self.track_inventory {
            return true;
        }
        self.stock_quantity > 0
    }

    pub fn is_low_stock(&self) -> bool {
        if !self.track_inventory {
            return false;
        }
        self.stock_quantity > 0 && self.stock_quantity <= self.low_stock_threshold
    }

    /// Discount relative to the compare-at price, rounded to one decimal.
    /// Zero when there is no compare-at price or it is not higher.
    pub fn discount_percentage(&self) -> f64 {
        match self.compare_at_price {
            Some(compare_at) if compare_at > self.price => {
                let discount = (compare_at - self.price) / compare_at * 100.0;
                (discount * 10.0).round() / 10.0
            }
            _ => 0.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProductPayload {
    pub vendor_id: Option<Uuid>,
    pub name: String,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub short_description: Option<String>,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub price: f64,
    pub compare_at_price: Option<f64>,
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default = "default_low_stock")]
    pub low_stock_threshold: u32,
    #[serde(default = "default_true")]
    pub track_inventory: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub display_order: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProductImagePayload {
    pub image: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub display_order: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VariantType {
    Size,
    Color,
    Material,
    Style,
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_type: VariantType,
    pub variant_value: String,
    pub sku: String,
    pub price_adjustment: f64,
    pub stock_quantity: u32,
    pub low_stock_threshold: u32,
    pub is_active: bool,
    pub display_order: u32,
    pub created_at: DateTime<Utc>,
}

impl ProductVariant {
    /// Selling price of this variant: parent product price plus the
    /// (possibly negative) adjustment.
    pub fn final_price(&self, product_price: f64) -> f64 {
        product_price + self.price_adjustment
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity > 0 && self.stock_quantity <= self.low_stock_threshold
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProductVariantPayload {
    pub variant_type: VariantType,
    pub variant_value: String,
    pub sku: Option<String>,
    #[serde(default)]
    pub price_adjustment: f64,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default = "default_low_stock")]
    pub low_stock_threshold: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProductAttribute {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub value: String,
    pub display_order: u32,
    pub is_filterable: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProductAttributePayload {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub is_filterable: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VendorPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RatingPayload {
    pub rating: u8,
}
