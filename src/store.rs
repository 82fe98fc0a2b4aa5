//! In-memory catalog store.
//!
//! Flat maps keyed by id behind one `RwLock`. Write operations hold the
//! write lock across their whole check-then-insert sequence, so slug and
//! SKU uniqueness cannot race the way two concurrent requests could against
//! a store checked and written in separate steps.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Category, CategoryPayload, Product, ProductAttribute, ProductAttributePayload, ProductImage,
    ProductImagePayload, ProductPayload, ProductVariant, ProductVariantPayload, Vendor,
    VendorPayload,
};
use crate::slug::{resolve_sku, resolve_unique, slugify, variant_sku_candidate};

/// Vendor slug bases are truncated before suffixing so the suffix always fits.
const VENDOR_SLUG_BASE_LEN: usize = 240;

#[derive(Default)]
struct Catalog {
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, Product>,
    images: HashMap<Uuid, ProductImage>,
    variants: HashMap<Uuid, ProductVariant>,
    attributes: HashMap<Uuid, ProductAttribute>,
    vendors: HashMap<Uuid, Vendor>,
}

#[derive(Default)]
pub struct Store {
    inner: RwLock<Catalog>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub fn create_category(&self, payload: CategoryPayload) -> Result<Category, AppError> {
        let mut catalog = self.inner.write();

        if catalog.categories.values().any(|c| c.name == payload.name) {
            return Err(AppError::Conflict(format!(
                "category name '{}' already exists",
                payload.name
            )));
        }

        if let Some(parent_id) = payload.parent_id {
            if !catalog.categories.contains_key(&parent_id) {
                return Err(AppError::NotFound("parent category"));
            }
        }

        let candidate = match &payload.slug {
            Some(slug) if !slug.is_empty() => slug.clone(),
            _ => slugify(&payload.name),
        };
        if candidate.is_empty() {
            return Err(AppError::Validation(format!(
                "'{}' does not yield a usable slug",
                payload.name
            )));
        }
        let slug = resolve_unique(&candidate, |s| {
            catalog.categories.values().any(|c| c.slug == s)
        })?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: payload.name,
            slug,
            description: payload.description,
            parent_id: payload.parent_id,
            image: payload.image,
            is_active: payload.is_active,
            display_order: payload.display_order,
            meta_title: payload.meta_title,
            meta_description: payload.meta_description,
            meta_keywords: payload.meta_keywords,
            created_at: now,
            updated_at: now,
        };

        catalog.categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub fn update_category(
        &self,
        slug: &str,
        payload: CategoryPayload,
    ) -> Result<Category, AppError> {
        let mut catalog = self.inner.write();

        let id = catalog
            .categories
            .values()
            .find(|c| c.slug == slug)
            .map(|c| c.id)
            .ok_or(AppError::NotFound("category"))?;

        if catalog
            .categories
            .values()
            .any(|c| c.id != id && c.name == payload.name)
        {
            return Err(AppError::Conflict(format!(
                "category name '{}' already exists",
                payload.name
            )));
        }

        if let Some(parent_id) = payload.parent_id {
            validate_parent_chain(&catalog.categories, id, parent_id)?;
        }

        let category = catalog
            .categories
            .get_mut(&id)
            .ok_or(AppError::NotFound("category"))?;
        category.name = payload.name;
        category.description = payload.description;
        category.parent_id = payload.parent_id;
        category.image = payload.image;
        category.is_active = payload.is_active;
        category.display_order = payload.display_order;
        category.meta_title = payload.meta_title;
        category.meta_description = payload.meta_description;
        category.meta_keywords = payload.meta_keywords;
        category.updated_at = Utc::now();

        Ok(category.clone())
    }

    /// Delete a category and its whole subtree. Products referencing any
    /// deleted category keep existing with their category cleared.
    pub fn delete_category(&self, slug: &str) -> Result<(), AppError> {
        let mut catalog = self.inner.write();

        let root = catalog
            .categories
            .values()
            .find(|c| c.slug == slug)
            .map(|c| c.id)
            .ok_or(AppError::NotFound("category"))?;

        let mut doomed = vec![root];
        let mut frontier = vec![root];
        while let Some(id) = frontier.pop() {
            let children: Vec<Uuid> = catalog
                .categories
                .values()
                .filter(|c| c.parent_id == Some(id))
                .map(|c| c.id)
                .collect();
            doomed.extend(&children);
            frontier.extend(children);
        }

        for id in &doomed {
            catalog.categories.remove(id);
        }
        for product in catalog.products.values_mut() {
            if let Some(category_id) = product.category_id {
                if doomed.contains(&category_id) {
                    product.category_id = None;
                }
            }
        }

        Ok(())
    }

    pub fn get_category(&self, slug: &str) -> Result<Category, AppError> {
        self.inner
            .read()
            .categories
            .values()
            .find(|c| c.slug == slug && c.is_active)
            .cloned()
            .ok_or(AppError::NotFound("category"))
    }

    /// Active categories, optionally filtered to roots (`parent = None`) or
    /// to children of the category with the given slug.
    pub fn list_categories(
        &self,
        parent: Option<Option<&str>>,
    ) -> Result<Vec<Category>, AppError> {
        let catalog = self.inner.read();

        let parent_filter = match parent {
            None => None,
            Some(None) => Some(None),
            Some(Some(parent_slug)) => {
                let parent_id = catalog
                    .categories
                    .values()
                    .find(|c| c.slug == parent_slug)
                    .map(|c| c.id)
                    .ok_or(AppError::NotFound("parent category"))?;
                Some(Some(parent_id))
            }
        };

        let mut categories: Vec<Category> = catalog
            .categories
            .values()
            .filter(|c| c.is_active)
            .filter(|c| match parent_filter {
                None => true,
                Some(wanted) => c.parent_id == wanted,
            })
            .cloned()
            .collect();

        categories.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(categories)
    }

    pub fn active_categories(&self) -> Vec<Category> {
        self.inner
            .read()
            .categories
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub fn create_product(&self, payload: ProductPayload) -> Result<Product, AppError> {
        let mut catalog = self.inner.write();

        if let Some(vendor_id) = payload.vendor_id {
            if !catalog.vendors.contains_key(&vendor_id) {
                return Err(AppError::NotFound("vendor"));
            }
        }

        let category_name = match payload.category_id {
            Some(category_id) => Some(
                catalog
                    .categories
                    .get(&category_id)
                    .map(|c| c.name.clone())
                    .ok_or(AppError::NotFound("category"))?,
            ),
            None => None,
        };

        let candidate = match &payload.slug {
            Some(slug) if !slug.is_empty() => slug.clone(),
            _ => slugify(&payload.name),
        };
        if candidate.is_empty() {
            return Err(AppError::Validation(format!(
                "'{}' does not yield a usable slug",
                payload.name
            )));
        }
        let slug = resolve_unique(&candidate, |s| {
            catalog.products.values().any(|p| p.slug == s)
        })?;

        let sku = match &payload.sku {
            Some(sku) if !sku.is_empty() => {
                if catalog.products.values().any(|p| p.sku == *sku) {
                    return Err(AppError::Conflict(format!("SKU '{sku}' already exists")));
                }
                sku.clone()
            }
            _ => resolve_sku(category_name.as_deref(), |s| {
                catalog.products.values().any(|p| p.sku == s)
            })?,
        };

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            vendor_id: payload.vendor_id,
            name: payload.name,
            slug,
            sku,
            short_description: payload.short_description,
            description: payload.description,
            category_id: payload.category_id,
            price: payload.price,
            compare_at_price: payload.compare_at_price,
            cost_price: payload.cost_price,
            stock_quantity: payload.stock_quantity,
            low_stock_threshold: payload.low_stock_threshold,
            track_inventory: payload.track_inventory,
            is_active: payload.is_active,
            is_featured: payload.is_featured,
            average_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };

        catalog.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn update_product(&self, slug: &str, payload: ProductPayload) -> Result<Product, AppError> {
        let mut catalog = self.inner.write();

        let id = catalog
            .products
            .values()
            .find(|p| p.slug == slug)
            .map(|p| p.id)
            .ok_or(AppError::NotFound("product"))?;

        if let Some(vendor_id) = payload.vendor_id {
            if !catalog.vendors.contains_key(&vendor_id) {
                return Err(AppError::NotFound("vendor"));
            }
        }
        if let Some(category_id) = payload.category_id {
            if !catalog.categories.contains_key(&category_id) {
                return Err(AppError::NotFound("category"));
            }
        }

        let product = catalog
            .products
            .get_mut(&id)
            .ok_or(AppError::NotFound("product"))?;
        product.vendor_id = payload.vendor_id;
        product.name = payload.name;
        product.short_description = payload.short_description;
        product.description = payload.description;
        product.category_id = payload.category_id;
        product.price = payload.price;
        product.compare_at_price = payload.compare_at_price;
        product.cost_price = payload.cost_price;
        product.stock_quantity = payload.stock_quantity;
        product.low_stock_threshold = payload.low_stock_threshold;
        product.track_inventory = payload.track_inventory;
        product.is_active = payload.is_active;
        product.is_featured = payload.is_featured;
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    pub fn delete_product(&self, slug: &str) -> Result<(), AppError> {
        let mut catalog = self.inner.write();

        let id = catalog
            .products
            .values()
            .find(|p| p.slug == slug)
            .map(|p| p.id)
            .ok_or(AppError::NotFound("product"))?;

        catalog.products.remove(&id);
        catalog.images.retain(|_, i| i.product_id != id);
        catalog.variants.retain(|_, v| v.product_id != id);
        catalog.attributes.retain(|_, a| a.product_id != id);
        Ok(())
    }

    pub fn get_product(&self, slug: &str) -> Result<Product, AppError> {
        self.inner
            .read()
            .products
            .values()
            .find(|p| p.slug == slug && p.is_active)
            .cloned()
            .ok_or(AppError::NotFound("product"))
    }

    /// Active products, newest first, optionally flat-filtered by category
    /// slug (no descendant expansion).
    pub fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, AppError> {
        let catalog = self.inner.read();

        let category_id = match category {
            Some(category_slug) => Some(
                catalog
                    .categories
                    .values()
                    .find(|c| c.slug == category_slug)
                    .map(|c| c.id)
                    .ok_or(AppError::NotFound("category"))?,
            ),
            None => None,
        };

        let mut products: Vec<Product> = catalog
            .products
            .values()
            .filter(|p| p.is_active)
            .filter(|p| match category_id {
                Some(id) => p.category_id == Some(id),
                None => true,
            })
            .cloned()
            .collect();

        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    /// Fold one rating into the denormalized average and count.
    pub fn record_rating(&self, slug: &str, rating: u8) -> Result<Product, AppError> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(
                "rating must be between 1 and 5".to_string(),
            ));
        }

        let mut catalog = self.inner.write();
        let product = catalog
            .products
            .values_mut()
            .find(|p| p.slug == slug)
            .ok_or(AppError::NotFound("product"))?;

        let total = product.average_rating * f64::from(product.review_count) + f64::from(rating);
        product.review_count += 1;
        product.average_rating = total / f64::from(product.review_count);
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    // ------------------------------------------------------------------
    // Product images
    // ------------------------------------------------------------------

    pub fn add_image(
        &self,
        product_slug: &str,
        payload: ProductImagePayload,
    ) -> Result<ProductImage, AppError> {
        let mut catalog = self.inner.write();

        let product_id = catalog
            .products
            .values()
            .find(|p| p.slug == product_slug)
            .map(|p| p.id)
            .ok_or(AppError::NotFound("product"))?;

        let has_primary = catalog
            .images
            .values()
            .any(|i| i.product_id == product_id && i.is_primary);

        // Exactly one primary per product: a new primary demotes its
        // siblings, and the first image is promoted when none exists.
        let is_primary = payload.is_primary || !has_primary;
        if payload.is_primary {
            for image in catalog
                .images
                .values_mut()
                .filter(|i| i.product_id == product_id)
            {
                image.is_primary = false;
            }
        }

        let image = ProductImage {
            id: Uuid::new_v4(),
            product_id,
            image: payload.image,
            alt_text: payload.alt_text,
            is_primary,
            display_order: payload.display_order,
            created_at: Utc::now(),
        };

        catalog.images.insert(image.id, image.clone());
        Ok(image)
    }

    pub fn delete_image(&self, product_slug: &str, image_id: Uuid) -> Result<(), AppError> {
        let mut catalog = self.inner.write();

        let product_id = catalog
            .products
            .values()
            .find(|p| p.slug == product_slug)
            .map(|p| p.id)
            .ok_or(AppError::NotFound("product"))?;

        match catalog.images.get(&image_id) {
            Some(image) if image.product_id == product_id => {
                catalog.images.remove(&image_id);
                Ok(())
            }
            _ => Err(AppError::NotFound("image")),
        }
    }

    pub fn list_images(&self, product_slug: &str) -> Result<Vec<ProductImage>, AppError> {
        let catalog = self.inner.read();

        let product_id = catalog
            .products
            .values()
            .find(|p| p.slug == product_slug)
            .map(|p| p.id)
            .ok_or(AppError::NotFound("product"))?;

        let mut images: Vec<ProductImage> = catalog
            .images
            .values()
            .filter(|i| i.product_id == product_id)
            .cloned()
            .collect();
        images.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(images)
    }

    // ------------------------------------------------------------------
    // Product variants
    // ------------------------------------------------------------------

    pub fn add_variant(
        &self,
        product_slug: &str,
        payload: ProductVariantPayload,
    ) -> Result<ProductVariant, AppError> {
        let mut catalog = self.inner.write();

        let (product_id, product_sku) = catalog
            .products
            .values()
            .find(|p| p.slug == product_slug)
            .map(|p| (p.id, p.sku.clone()))
            .ok_or(AppError::NotFound("product"))?;

        let duplicate = catalog.variants.values().any(|v| {
            v.product_id == product_id
                && v.variant_type == payload.variant_type
                && v.variant_value == payload.variant_value
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "variant '{}' already exists for this product",
                payload.variant_value
            )));
        }

        let sku = match &payload.sku {
            Some(sku) if !sku.is_empty() => {
                if catalog.variants.values().any(|v| v.sku == *sku) {
                    return Err(AppError::Conflict(format!("SKU '{sku}' already exists")));
                }
                sku.clone()
            }
            _ => {
                let candidate = variant_sku_candidate(&product_sku, &payload.variant_value);
                resolve_unique(&candidate, |s| {
                    catalog.variants.values().any(|v| v.sku == s)
                })?
            }
        };

        let variant = ProductVariant {
            id: Uuid::new_v4(),
            product_id,
            variant_type: payload.variant_type,
            variant_value: payload.variant_value,
            sku,
            price_adjustment: payload.price_adjustment,
            stock_quantity: payload.stock_quantity,
            low_stock_threshold: payload.low_stock_threshold,
            is_active: payload.is_active,
            display_order: payload.display_order,
            created_at: Utc::now(),
        };

        catalog.variants.insert(variant.id, variant.clone());
        Ok(variant)
    }

    pub fn list_variants(&self, product_slug: &str) -> Result<Vec<ProductVariant>, AppError> {
        let catalog = self.inner.read();

        let product_id = catalog
            .products
            .values()
            .find(|p| p.slug == product_slug)
            .map(|p| p.id)
            .ok_or(AppError::NotFound("product"))?;

        let mut variants: Vec<ProductVariant> = catalog
            .variants
            .values()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect();
        variants.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.variant_value.cmp(&b.variant_value))
        });
        Ok(variants)
    }

    // ------------------------------------------------------------------
    // Product attributes
    // ------------------------------------------------------------------

    pub fn add_attribute(
        &self,
        product_slug: &str,
        payload: ProductAttributePayload,
    ) -> Result<ProductAttribute, AppError> {
        let mut catalog = self.inner.write();

        let product_id = catalog
            .products
            .values()
            .find(|p| p.slug == product_slug)
            .map(|p| p.id)
            .ok_or(AppError::NotFound("product"))?;

        let attribute = ProductAttribute {
            id: Uuid::new_v4(),
            product_id,
            name: payload.name,
            value: payload.value,
            display_order: payload.display_order,
            is_filterable: payload.is_filterable,
            created_at: Utc::now(),
        };

        catalog.attributes.insert(attribute.id, attribute.clone());
        Ok(attribute)
    }

    pub fn list_attributes(&self, product_slug: &str) -> Result<Vec<ProductAttribute>, AppError> {
        let catalog = self.inner.read();

        let product_id = catalog
            .products
            .values()
            .find(|p| p.slug == product_slug)
            .map(|p| p.id)
            .ok_or(AppError::NotFound("product"))?;

        let mut attributes: Vec<ProductAttribute> = catalog
            .attributes
            .values()
            .filter(|a| a.product_id == product_id)
            .cloned()
            .collect();
        attributes.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(attributes)
    }

    // ------------------------------------------------------------------
    // Vendors
    // ------------------------------------------------------------------

    pub fn create_vendor(&self, payload: VendorPayload) -> Result<Vendor, AppError> {
        let mut catalog = self.inner.write();

        let mut base = slugify(&payload.name);
        base.truncate(VENDOR_SLUG_BASE_LEN);
        if base.is_empty() {
            return Err(AppError::Validation(format!(
                "'{}' does not yield a usable slug",
                payload.name
            )));
        }
        let slug = resolve_unique(&base, |s| catalog.vendors.values().any(|v| v.slug == s))?;

        let now = Utc::now();
        let vendor = Vendor {
            id: Uuid::new_v4(),
            name: payload.name,
            slug,
            email: payload.email,
            phone: payload.phone,
            description: payload.description,
            is_active: payload.is_active,
            created_at: now,
            updated_at: now,
        };

        catalog.vendors.insert(vendor.id, vendor.clone());
        Ok(vendor)
    }

    pub fn update_vendor(&self, slug: &str, payload: VendorPayload) -> Result<Vendor, AppError> {
        let mut catalog = self.inner.write();

        let vendor = catalog
            .vendors
            .values_mut()
            .find(|v| v.slug == slug)
            .ok_or(AppError::NotFound("vendor"))?;

        vendor.name = payload.name;
        vendor.email = payload.email;
        vendor.phone = payload.phone;
        vendor.description = payload.description;
        vendor.is_active = payload.is_active;
        vendor.updated_at = Utc::now();

        Ok(vendor.clone())
    }

    /// Delete a vendor and everything it owns.
    pub fn delete_vendor(&self, slug: &str) -> Result<(), AppError> {
        let mut catalog = self.inner.write();

        let id = catalog
            .vendors
            .values()
            .find(|v| v.slug == slug)
            .map(|v| v.id)
            .ok_or(AppError::NotFound("vendor"))?;

        catalog.vendors.remove(&id);

        let doomed: Vec<Uuid> = catalog
            .products
            .values()
            .filter(|p| p.vendor_id == Some(id))
            .map(|p| p.id)
            .collect();
        for product_id in doomed {
            catalog.products.remove(&product_id);
            catalog.images.retain(|_, i| i.product_id != product_id);
            catalog.variants.retain(|_, v| v.product_id != product_id);
            catalog.attributes.retain(|_, a| a.product_id != product_id);
        }

        Ok(())
    }

    pub fn get_vendor(&self, slug: &str) -> Result<Vendor, AppError> {
        self.inner
            .read()
            .vendors
            .values()
            .find(|v| v.slug == slug && v.is_active)
            .cloned()
            .ok_or(AppError::NotFound("vendor"))
    }

    pub fn list_vendors(&self) -> Vec<Vendor> {
        let mut vendors: Vec<Vendor> = self
            .inner
            .read()
            .vendors
            .values()
            .filter(|v| v.is_active)
            .cloned()
            .collect();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        vendors
    }
}

/// Reject a parent assignment that would make `id` its own ancestor. Walks
/// the full chain upward, not just one level.
fn validate_parent_chain(
    categories: &HashMap<Uuid, Category>,
    id: Uuid,
    new_parent: Uuid,
) -> Result<(), AppError> {
    let mut current = Some(new_parent);

    while let Some(ancestor_id) = current {
        if ancestor_id == id {
            return Err(AppError::Validation(
                "category cannot be its own ancestor".to_string(),
            ));
        }
        let ancestor = categories
            .get(&ancestor_id)
            .ok_or(AppError::NotFound("parent category"))?;
        current = ancestor.parent_id;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VariantType;

    fn category_payload(name: &str, parent_id: Option<Uuid>) -> CategoryPayload {
        CategoryPayload {
            name: name.to_string(),
            slug: None,
            description: None,
            parent_id,
            image: None,
            is_active: true,
            display_order: 0,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
        }
    }

    fn product_payload(name: &str, category_id: Option<Uuid>) -> ProductPayload {
        ProductPayload {
            vendor_id: None,
            name: name.to_string(),
            slug: None,
            sku: None,
            short_description: None,
            description: "test product".to_string(),
            category_id,
            price: 10.0,
            compare_at_price: None,
            cost_price: None,
            stock_quantity: 3,
            low_stock_threshold: 5,
            track_inventory: true,
            is_active: true,
            is_featured: false,
        }
    }

    #[test]
    fn test_duplicate_name_gets_suffixed_slug() {
        let store = Store::new();
        let first = store.create_category(category_payload("Shoes", None)).unwrap();
        assert_eq!(first.slug, "shoes");

        // Different name, same derived slug.
        let second = store
            .create_category(category_payload("SHOES", None))
            .unwrap();
        assert_eq!(second.slug, "shoes-1");
    }

    #[test]
    fn test_duplicate_category_name_rejected() {
        let store = Store::new();
        store.create_category(category_payload("Shoes", None)).unwrap();
        let err = store
            .create_category(category_payload("Shoes", None))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_unsluggable_name_rejected() {
        let store = Store::new();

        let err = store
            .create_category(category_payload("!!!", None))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = store.create_product(product_payload("???", None)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = store
            .create_vendor(VendorPayload {
                name: "***".to_string(),
                email: None,
                phone: None,
                description: None,
                is_active: true,
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_missing_parent_rejected() {
        let store = Store::new();
        let err = store
            .create_category(category_payload("Orphan", Some(Uuid::new_v4())))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_deep_cycle_rejected_on_reparent() {
        let store = Store::new();
        let a = store.create_category(category_payload("A", None)).unwrap();
        let b = store
            .create_category(category_payload("B", Some(a.id)))
            .unwrap();
        let c = store
            .create_category(category_payload("C", Some(b.id)))
            .unwrap();

        // A -> B -> C, then pointing A at C closes a three-level cycle.
        let err = store
            .update_category(&a.slug, category_payload("A", Some(c.id)))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_self_parent_rejected() {
        let store = Store::new();
        let a = store.create_category(category_payload("A", None)).unwrap();
        let err = store
            .update_category(&a.slug, category_payload("A", Some(a.id)))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_delete_category_cascades_and_nulls_products() {
        let store = Store::new();
        let root = store.create_category(category_payload("Root", None)).unwrap();
        let child = store
            .create_category(category_payload("Child", Some(root.id)))
            .unwrap();
        let product = store
            .create_product(product_payload("Widget", Some(child.id)))
            .unwrap();

        store.delete_category(&root.slug).unwrap();

        assert!(store.list_categories(None).unwrap().is_empty());
        let product = store.get_product(&product.slug).unwrap();
        assert!(product.category_id.is_none());
    }

    #[test]
    fn test_list_categories_parent_filters() {
        let store = Store::new();
        let root = store.create_category(category_payload("Root", None)).unwrap();
        store
            .create_category(category_payload("Child", Some(root.id)))
            .unwrap();

        let roots = store.list_categories(Some(None)).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "Root");

        let children = store.list_categories(Some(Some("root"))).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "Child");

        assert_eq!(store.list_categories(None).unwrap().len(), 2);
    }

    #[test]
    fn test_generated_sku_uses_category_prefix() {
        let store = Store::new();
        let electronics = store
            .create_category(category_payload("Electronics", None))
            .unwrap();
        let product = store
            .create_product(product_payload("Phone", Some(electronics.id)))
            .unwrap();

        assert!(product.sku.starts_with("ELE-"));
        assert_eq!(product.sku.len(), "ELE-".len() + 8);
    }

    #[test]
    fn test_generated_sku_without_category() {
        let store = Store::new();
        let product = store.create_product(product_payload("Thing", None)).unwrap();
        assert!(product.sku.starts_with("PRO-"));
    }

    #[test]
    fn test_explicit_sku_conflict_rejected() {
        let store = Store::new();
        let mut payload = product_payload("One", None);
        payload.sku = Some("FIXED-1".to_string());
        store.create_product(payload).unwrap();

        let mut payload = product_payload("Two", None);
        payload.sku = Some("FIXED-1".to_string());
        let err = store.create_product(payload).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_first_image_auto_primary() {
        let store = Store::new();
        let product = store.create_product(product_payload("Widget", None)).unwrap();

        let image_payload = ProductImagePayload {
            image: "a.jpg".to_string(),
            alt_text: None,
            is_primary: false,
            display_order: 0,
        };
        let first = store.add_image(&product.slug, image_payload.clone()).unwrap();
        assert!(first.is_primary);

        let second = store.add_image(&product.slug, image_payload).unwrap();
        assert!(!second.is_primary);
    }

    #[test]
    fn test_new_primary_demotes_siblings() {
        let store = Store::new();
        let product = store.create_product(product_payload("Widget", None)).unwrap();

        let first = store
            .add_image(
                &product.slug,
                ProductImagePayload {
                    image: "a.jpg".to_string(),
                    alt_text: None,
                    is_primary: true,
                    display_order: 0,
                },
            )
            .unwrap();

        let second = store
            .add_image(
                &product.slug,
                ProductImagePayload {
                    image: "b.jpg".to_string(),
                    alt_text: None,
                    is_primary: true,
                    display_order: 1,
                },
            )
            .unwrap();
        assert!(second.is_primary);

        let images = store.list_images(&product.slug).unwrap();
        let first_now = images.iter().find(|i| i.id == first.id).unwrap();
        assert!(!first_now.is_primary);
        assert_eq!(images.iter().filter(|i| i.is_primary).count(), 1);
    }

    #[test]
    fn test_variant_uniqueness_and_sku() {
        let store = Store::new();
        let mut payload = product_payload("Shirt", None);
        payload.sku = Some("SHI-AAAA0001".to_string());
        let product = store.create_product(payload).unwrap();

        let variant_payload = ProductVariantPayload {
            variant_type: VariantType::Color,
            variant_value: "Red".to_string(),
            sku: None,
            price_adjustment: 0.0,
            stock_quantity: 1,
            low_stock_threshold: 5,
            is_active: true,
            display_order: 0,
        };

        let variant = store
            .add_variant(&product.slug, variant_payload.clone())
            .unwrap();
        assert_eq!(variant.sku, "SHI-AAAA0001-RED");

        let err = store.add_variant(&product.slug, variant_payload).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_variant_sku_collision_suffixed() {
        let store = Store::new();
        let mut payload = product_payload("Shirt", None);
        payload.sku = Some("SHI-AAAA0001".to_string());
        let product = store.create_product(payload).unwrap();

        let payload = |value: &str| ProductVariantPayload {
            variant_type: VariantType::Color,
            variant_value: value.to_string(),
            sku: None,
            price_adjustment: 0.0,
            stock_quantity: 1,
            low_stock_threshold: 5,
            is_active: true,
            display_order: 0,
        };

        // "Red" and "Redwood" derive the same fragment.
        let first = store.add_variant(&product.slug, payload("Red")).unwrap();
        let second = store.add_variant(&product.slug, payload("Redwood")).unwrap();
        assert_eq!(first.sku, "SHI-AAAA0001-RED");
        assert_eq!(second.sku, "SHI-AAAA0001-RED-1");
    }

    #[test]
    fn test_rating_recompute() {
        let store = Store::new();
        let product = store.create_product(product_payload("Widget", None)).unwrap();

        store.record_rating(&product.slug, 4).unwrap();
        let product = store.record_rating(&product.slug, 2).unwrap();

        assert_eq!(product.review_count, 2);
        assert!((product.average_rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rating_out_of_range() {
        let store = Store::new();
        let product = store.create_product(product_payload("Widget", None)).unwrap();
        let err = store.record_rating(&product.slug, 6).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_vendor_slug_and_cascade() {
        let store = Store::new();
        let vendor = store
            .create_vendor(VendorPayload {
                name: "Acme Corp".to_string(),
                email: None,
                phone: None,
                description: None,
                is_active: true,
            })
            .unwrap();
        assert_eq!(vendor.slug, "acme-corp");

        let mut payload = product_payload("Widget", None);
        payload.vendor_id = Some(vendor.id);
        let product = store.create_product(payload).unwrap();

        store.delete_vendor(&vendor.slug).unwrap();
        assert!(store.get_product(&product.slug).is_err());
    }

    #[test]
    fn test_inactive_product_hidden_from_reads() {
        let store = Store::new();
        let mut payload = product_payload("Ghost", None);
        payload.is_active = false;
        let product = store.create_product(payload).unwrap();

        assert!(store.get_product(&product.slug).is_err());
        assert!(store.list_products(None).unwrap().is_empty());
    }
}
