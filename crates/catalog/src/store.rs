//! Catalog storage.
//!
//! [`Catalog`] is the read-only seam consumed by the cart and the order
//! engine. [`InMemoryCatalog`] additionally carries the admin CRUD surface.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use joyville_core::{CategoryId, DomainError, DomainResult, ProductId};

use crate::category::{Category, NewCategory};
use crate::product::{NewProduct, Product, ProductPatch, Section};

/// Read-only product lookup.
///
/// Returns the product even when soft-deleted; callers decide whether an
/// inactive product is acceptable for their use (display yes, purchase no).
pub trait Catalog: Send + Sync {
    fn product(&self, id: ProductId) -> Option<Product>;
}

impl<C> Catalog for Arc<C>
where
    C: Catalog + ?Sized,
{
    fn product(&self, id: ProductId) -> Option<Product> {
        (**self).product(id)
    }
}

/// Listing filter for the public product browse/search endpoints.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub section: Option<Section>,
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring match against name and description.
    pub search: Option<String>,
}

/// In-memory catalog store.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&self, input: NewProduct) -> DomainResult<Product> {
        input.validate()?;

        let product = Product {
            id: ProductId::new(),
            name: input.name,
            description: input.description,
            price: input.price,
            image_urls: input.image_urls,
            category_id: input.category_id,
            inventory: input.inventory,
            section: input.section,
            is_new: input.is_new,
            is_bestseller: input.is_bestseller,
            is_active: true,
            created_at: Utc::now(),
        };

        let mut products = self.products.write().unwrap_or_else(|e| e.into_inner());
        products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn update_product(&self, id: ProductId, patch: ProductPatch) -> DomainResult<Product> {
        patch.validate()?;

        let mut products = self.products.write().unwrap_or_else(|e| e.into_inner());
        let product = products.get_mut(&id).ok_or(DomainError::NotFound)?;
        patch.apply(product);
        Ok(product.clone())
    }

    /// Soft-delete: the product disappears from listings and stops being
    /// purchasable, but stays resolvable for historical orders.
    pub fn deactivate_product(&self, id: ProductId) -> DomainResult<Product> {
        let mut products = self.products.write().unwrap_or_else(|e| e.into_inner());
        let product = products.get_mut(&id).ok_or(DomainError::NotFound)?;
        product.is_active = false;
        Ok(product.clone())
    }

    /// Active products matching the filter, newest first.
    pub fn list_products(&self, filter: &ProductFilter) -> Vec<Product> {
        let products = self.products.read().unwrap_or_else(|e| e.into_inner());

        let needle = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut out: Vec<Product> = products
            .values()
            .filter(|p| p.is_active)
            .filter(|p| filter.section.is_none_or(|s| p.section == s))
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == Some(c)))
            .filter(|p| match &needle {
                None => true,
                Some(q) => {
                    p.name.to_lowercase().contains(q)
                        || p.description
                            .as_ref()
                            .is_some_and(|d| d.to_lowercase().contains(q))
                }
            })
            .cloned()
            .collect();

        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.as_uuid().cmp(a.id.as_uuid())));
        out
    }

    /// Count of active products in a section (dashboard support).
    pub fn count_active(&self, section: Section) -> usize {
        let products = self.products.read().unwrap_or_else(|e| e.into_inner());
        products
            .values()
            .filter(|p| p.is_active && p.section == section)
            .count()
    }

    pub fn insert_category(&self, input: NewCategory) -> DomainResult<Category> {
        input.validate()?;

        let category = Category {
            id: CategoryId::new(),
            name: input.name,
            description: input.description,
            icon: input.icon,
            color: input.color,
        };

        let mut categories = self.categories.write().unwrap_or_else(|e| e.into_inner());
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    /// All categories, sorted by name.
    pub fn list_categories(&self) -> Vec<Category> {
        let categories = self.categories.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Category> = categories.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}

impl Catalog for InMemoryCatalog {
    fn product(&self, id: ProductId) -> Option<Product> {
        let products = self.products.read().unwrap_or_else(|e| e.into_inner());
        products.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_product(name: &str, section: Section, price: Decimal) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price,
            image_urls: vec![],
            category_id: None,
            inventory: 10,
            section,
            is_new: false,
            is_bestseller: false,
        }
    }

    #[test]
    fn insert_rejects_blank_name_and_negative_price() {
        let catalog = InMemoryCatalog::new();

        let err = catalog
            .insert_product(new_product("   ", Section::Retail, Decimal::ONE))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let err = catalog
            .insert_product(new_product("Teddy", Section::Retail, Decimal::NEGATIVE_ONE))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn deactivated_product_hidden_from_listings_but_still_resolves() {
        let catalog = InMemoryCatalog::new();
        let p = catalog
            .insert_product(new_product("Teddy", Section::Retail, Decimal::TEN))
            .unwrap();

        catalog.deactivate_product(p.id).unwrap();

        assert!(catalog.list_products(&ProductFilter::default()).is_empty());
        let resolved = catalog.product(p.id).unwrap();
        assert!(!resolved.is_purchasable());
    }

    #[test]
    fn listing_filters_by_section_and_search() {
        let catalog = InMemoryCatalog::new();
        catalog
            .insert_product(new_product("Teddy Bear", Section::Retail, Decimal::TEN))
            .unwrap();
        catalog
            .insert_product(new_product("Bulk Blocks", Section::Wholesale, Decimal::ONE))
            .unwrap();

        let retail = catalog.list_products(&ProductFilter {
            section: Some(Section::Retail),
            ..Default::default()
        });
        assert_eq!(retail.len(), 1);
        assert_eq!(retail[0].name, "Teddy Bear");

        let found = catalog.list_products(&ProductFilter {
            search: Some("teddy".to_string()),
            ..Default::default()
        });
        assert_eq!(found.len(), 1);

        let none = catalog.list_products(&ProductFilter {
            search: Some("rocket".to_string()),
            ..Default::default()
        });
        assert!(none.is_empty());
    }

    #[test]
    fn update_patches_only_provided_fields() {
        let catalog = InMemoryCatalog::new();
        let p = catalog
            .insert_product(new_product("Teddy", Section::Retail, Decimal::TEN))
            .unwrap();

        let updated = catalog
            .update_product(
                p.id,
                ProductPatch {
                    price: Some(Decimal::new(1250, 2)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.price, Decimal::new(1250, 2));
        assert_eq!(updated.name, "Teddy");

        let err = catalog
            .update_product(ProductId::new(), ProductPatch::default())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn categories_sorted_by_name() {
        let catalog = InMemoryCatalog::new();
        for name in ["Puzzles", "Dolls", "Vehicles"] {
            catalog
                .insert_category(NewCategory {
                    name: name.to_string(),
                    description: None,
                    icon: "toy".to_string(),
                    color: "mint".to_string(),
                })
                .unwrap();
        }

        let names: Vec<_> = catalog
            .list_categories()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Dolls", "Puzzles", "Vehicles"]);
    }
}
