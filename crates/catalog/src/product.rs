use serde::{Deserialize, Serialize};

use stockyard_core::field::{non_blank, present};
use stockyard_core::{DomainError, DomainResult, Entity, Id};

stockyard_core::id_newtype!(
    /// Product identifier. Caller-supplied at registration or generated.
    ProductId,
    "ProductId"
);

/// A catalog product.
///
/// Products are never updated in place; callers delete and re-register.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    price: f64,
}

impl Product {
    /// Build a product, enforcing the catalog invariants (non-blank text
    /// fields, finite non-negative price).
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> DomainResult<Self> {
        let name = name.into();
        let category = category.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if category.trim().is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        validate_price(price)?;
        Ok(Self {
            id,
            name,
            category,
            price,
        })
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() {
        return Err(DomainError::validation("price must be a finite number"));
    }
    if price < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(())
}

/// Command: RegisterProduct.
///
/// Every field is optional at the wire level so missing fields can be reported
/// together as one validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProduct {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
}

impl RegisterProduct {
    /// Validate the command and produce the product to insert.
    ///
    /// A blank or absent `id` gets a generated one.
    pub fn into_product(self) -> DomainResult<Product> {
        let name = present(self.name);
        let category = present(self.category);

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if category.is_none() {
            missing.push("category");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if let Some(err) = DomainError::missing_fields(&missing) {
            return Err(err);
        }

        let id = match non_blank(self.id) {
            Some(raw) => ProductId::new(Id::parse(&raw)?),
            None => ProductId::generate(),
        };

        Product::new(
            id,
            name.unwrap_or_default(),
            category.unwrap_or_default(),
            self.price.unwrap_or_default(),
        )
    }
}

/// Filter for product listings (`find_many` semantics: no match is an empty list).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
}

impl ProductFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match &self.category {
            Some(category) => product.category == *category,
            None => true,
        }
    }
}
