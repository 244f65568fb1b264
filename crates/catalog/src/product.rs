//! Product model.

use chrono::{DateTime, Utc};
use core::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use joyville_core::{CategoryId, DomainError, ProductId};

/// Storefront section a product is sold in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Retail,
    Wholesale,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Retail => "retail",
            Section::Wholesale => "wholesale",
        }
    }
}

impl core::fmt::Display for Section {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retail" => Ok(Section::Retail),
            "wholesale" => Ok(Section::Wholesale),
            other => Err(DomainError::invalid_input(format!(
                "section must be retail or wholesale, got: {other}"
            ))),
        }
    }
}

/// A catalog product.
///
/// `is_active = false` marks a soft-deleted product: hidden from listings
/// and not purchasable, but still resolvable so historical orders and open
/// carts can display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_urls: Vec<String>,
    pub category_id: Option<CategoryId>,
    pub inventory: u32,
    pub section: Section,
    pub is_new: bool,
    pub is_bestseller: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can currently be added to a cart or checked out.
    pub fn is_purchasable(&self) -> bool {
        self.is_active
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub inventory: u32,
    pub section: Section,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_input("product name must not be blank"));
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::invalid_input("price must not be negative"));
        }
        Ok(())
    }
}

/// Partial update for a product; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub image_urls: Option<Vec<String>>,
    pub category_id: Option<Option<CategoryId>>,
    pub inventory: Option<u32>,
    pub section: Option<Section>,
    pub is_new: Option<bool>,
    pub is_bestseller: Option<bool>,
    pub is_active: Option<bool>,
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::invalid_input("product name must not be blank"));
            }
        }
        if let Some(price) = self.price {
            if price < Decimal::ZERO {
                return Err(DomainError::invalid_input("price must not be negative"));
            }
        }
        Ok(())
    }

    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image_urls) = self.image_urls {
            product.image_urls = image_urls;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(inventory) = self.inventory {
            product.inventory = inventory;
        }
        if let Some(section) = self.section {
            product.section = section;
        }
        if let Some(is_new) = self.is_new {
            product.is_new = is_new;
        }
        if let Some(is_bestseller) = self.is_bestseller {
            product.is_bestseller = is_bestseller;
        }
        if let Some(is_active) = self.is_active {
            product.is_active = is_active;
        }
    }
}
