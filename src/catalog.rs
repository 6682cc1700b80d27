// 🗂️ Product Catalog - Immutable in-memory product table
//
// Loaded once at startup (built-in sample, JSON or CSV) and never mutated.
// Readers share it by reference; there are no writers.

use crate::error::{CatalogError, CatalogResult, QueryError};
use crate::product::{Product, ProductType, RiskLevel};
use crate::query::{ProductFilter, ProductQuery};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate ids
    pub fn new(products: Vec<Product>) -> CatalogResult<Self> {
        let mut seen = HashSet::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            if product.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if let Some(rate) = product.interest_rate.filter(|rate| !rate.is_finite()) {
                return Err(CatalogError::InvalidRate {
                    id: product.id.clone(),
                    value: rate.to_string(),
                });
            }
        }

        Ok(Catalog { products })
    }

    /// Load a catalog file, picking the format from the extension
    pub fn load<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Self::from_json_path(path),
            Some("csv") => Self::from_csv_path(path),
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Load a JSON array of products
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let products: Vec<Product> = serde_json::from_str(&content)?;
        Self::new(products)
    }

    /// Load a CSV export; `benefits` cells are `|`-separated
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let mut rdr = csv::Reader::from_path(path.as_ref())?;

        let mut products = Vec::new();
        for result in rdr.deserialize() {
            let row: CsvRow = result?;
            products.push(row.into_product()?);
        }

        Self::new(products)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Distinct categories in first-seen order (one listing tab each)
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Products matching every criterion of the filter, in catalog order
    pub fn query(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Validate a raw request and evaluate it
    pub fn evaluate(&self, query: &ProductQuery) -> Result<Vec<&Product>, QueryError> {
        let filter = query.parse()?;
        Ok(self.query(&filter))
    }
}

// ============================================================================
// CSV IMPORT
// ============================================================================

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    #[serde(rename = "type")]
    product_type: String,
    #[serde(rename = "interestRate", default)]
    interest_rate: String,
    category: String,
    #[serde(rename = "riskLevel", default)]
    risk_level: String,
    description: String,
    #[serde(default)]
    benefits: String,
}

impl CsvRow {
    fn into_product(self) -> CatalogResult<Product> {
        let interest_rate = match self.interest_rate.trim() {
            "" => None,
            raw => match raw.parse::<f64>() {
                Ok(rate) if rate.is_finite() => Some(rate),
                _ => {
                    return Err(CatalogError::InvalidRate {
                        id: self.id.clone(),
                        value: raw.to_string(),
                    })
                }
            },
        };

        let risk_level = match self.risk_level.trim() {
            "" => None,
            raw => Some(raw.parse::<RiskLevel>()?),
        };

        let benefits = self
            .benefits
            .split('|')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(String::from)
            .collect();

        Ok(Product {
            product_type: self.product_type.parse::<ProductType>()?,
            id: self.id,
            name: self.name,
            interest_rate,
            category: self.category,
            risk_level,
            description: self.description,
            benefits,
        })
    }
}

// ============================================================================
// BUILT-IN DATASET
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    product_type: ProductType,
    interest_rate: f64,
    category: &str,
    risk_level: RiskLevel,
    description: &str,
    benefits: [&str; 3],
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        product_type,
        interest_rate: Some(interest_rate),
        category: category.to_string(),
        risk_level: Some(risk_level),
        description: description.to_string(),
        benefits: benefits.iter().map(|b| b.to_string()).collect(),
    }
}

impl Catalog {
    /// The ten-product sample catalog served when no dataset file is given
    pub fn sample() -> Self {
        use ProductType::*;
        use RiskLevel::*;

        let products = vec![
            product(
                "1",
                "Cuenta Ahorro Plus",
                Account,
                1.5,
                "Cuentas",
                Low,
                "High-interest savings account with no maintenance fees.",
                [
                    "1.5% annual interest rate",
                    "No maintenance fees",
                    "Access to mobile and web banking",
                ],
            ),
            product(
                "2",
                "Tarjeta Platinum",
                Card,
                23.99,
                "Tarjetas",
                Medium,
                "Premium credit card with exclusive travel benefits.",
                [
                    "Double points on international purchases",
                    "Access to airport VIP lounges",
                    "Travel insurance included",
                ],
            ),
            product(
                "3",
                "Fondo de Inversión Global",
                Fund,
                7.2,
                "Fondos",
                High,
                "Diversified fund investing in high-performing international markets.",
                [
                    "Access to U.S., European, and Asian markets",
                    "Average return of 7.2%",
                    "Personalized advisory service",
                ],
            ),
            product(
                "4",
                "Cuenta Nómina Premium",
                Account,
                0.5,
                "Cuentas",
                Medium,
                "Payroll deposit account with exclusive benefits.",
                [
                    "Salary advance with no interest",
                    "Discounts at partner stores",
                    "Priority access to personal loans",
                ],
            ),
            product(
                "5",
                "Tarjeta Cashback Oro",
                Card,
                19.5,
                "Tarjetas",
                Low,
                "Credit card offering cash back on purchases.",
                [
                    "5% cashback at supermarkets",
                    "3% cashback at gas stations",
                    "Exclusive rewards program",
                ],
            ),
            product(
                "6",
                "Fondo Conservador Plus",
                Fund,
                3.8,
                "Fondos",
                Low,
                "Low-risk investment fund for conservative profiles.",
                [
                    "Capital protection",
                    "Weekly liquidity",
                    "Ideal for short-term goals",
                ],
            ),
            product(
                "7",
                "Depósito a Plazo Flexible",
                Account,
                2.2,
                "Cuentas",
                High,
                "Fixed-term deposit with partial withdrawal flexibility.",
                [
                    "Competitive interest rates",
                    "Flexible withdrawals",
                    "Ideal for scheduled savings",
                ],
            ),
            product(
                "8",
                "Tarjeta de Crédito Universitaria",
                Card,
                29.5,
                "Tarjetas",
                Medium,
                "Credit card designed for university students.",
                [
                    "Accessible credit limits",
                    "No annual fee for the first year",
                    "Exclusive promotions for students",
                ],
            ),
            product(
                "9",
                "Fondo Verde Sostenible",
                Fund,
                5.5,
                "Fondos",
                Medium,
                "Fund investing in sustainable projects and companies.",
                [
                    "Responsible investment with positive environmental impact",
                    "Competitive returns",
                    "Access to sustainability reports",
                ],
            ),
            product(
                "10",
                "Cuenta Digital Zero",
                Account,
                0.8,
                "Cuentas",
                Low,
                "100% digital bank account with no hidden costs.",
                [
                    "Open an account in minutes via the app",
                    "Unlimited free transfers",
                    "Free international debit card",
                ],
            ),
        ];

        Catalog { products }
    }
}
