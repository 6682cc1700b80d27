// 💳 Product Model - Financial products in the catalog
//
// A product is a plain value: identity is the `id` string, everything else is
// display data. Enumerated fields serialize with the catalog's own labels.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PRODUCT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    /// Bank account (savings, payroll, term deposits)
    #[serde(rename = "Cuenta")]
    Account,

    /// Credit or debit card
    #[serde(rename = "Tarjeta")]
    Card,

    /// Investment fund
    #[serde(rename = "Fondo")]
    Fund,

    /// Insurance product
    #[serde(rename = "Seguro")]
    Insurance,
}

impl ProductType {
    pub const ALL: [ProductType; 4] = [
        ProductType::Account,
        ProductType::Card,
        ProductType::Fund,
        ProductType::Insurance,
    ];

    /// Catalog label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Account => "Cuenta",
            ProductType::Card => "Tarjeta",
            ProductType::Fund => "Fondo",
            ProductType::Insurance => "Seguro",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownVariant {
                field: "type",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// RISK LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Bajo")]
    Low,
    #[serde(rename = "Medio")]
    Medium,
    #[serde(rename = "Alto")]
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Bajo",
            RiskLevel::Medium => "Medio",
            RiskLevel::High => "Alto",
        }
    }

    /// Position on the 0-100 risk axis of the risk vs. performance indicator
    pub fn score(&self) -> u16 {
        match self {
            RiskLevel::Low => 20,
            RiskLevel::Medium => 50,
            RiskLevel::High => 80,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskLevel {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownVariant {
                field: "riskLevel",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// PRODUCT
// ============================================================================

/// A financial product as exposed by the catalog and the query API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier, unique within a catalog
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub product_type: ProductType,

    /// Annual rate as a percentage (e.g. 7.2 means 7.2%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,

    /// Coarse grouping used for the listing tabs ("Cuentas", "Tarjetas", ...)
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,

    pub description: String,

    /// Display order is meaningful
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl Product {
    /// Rate formatted for display, e.g. "7.2%"
    pub fn display_rate(&self) -> String {
        match self.interest_rate {
            Some(rate) => format!("{}%", rate),
            None => "—".to_string(),
        }
    }

    pub fn risk_label(&self) -> &'static str {
        self.risk_level.map(|r| r.label()).unwrap_or("—")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fund() -> Product {
        Product {
            id: "3".to_string(),
            name: "Fondo de Inversión Global".to_string(),
            product_type: ProductType::Fund,
            interest_rate: Some(7.2),
            category: "Fondos".to_string(),
            risk_level: Some(RiskLevel::High),
            description: "Diversified fund".to_string(),
            benefits: vec!["Average return of 7.2%".to_string()],
        }
    }

    #[test]
    fn test_serializes_with_catalog_field_names() {
        let json = serde_json::to_value(fund()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "3",
                "name": "Fondo de Inversión Global",
                "type": "Fondo",
                "interestRate": 7.2,
                "category": "Fondos",
                "riskLevel": "Alto",
                "description": "Diversified fund",
                "benefits": ["Average return of 7.2%"],
            })
        );
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let mut product = fund();
        product.interest_rate = None;
        product.risk_level = None;

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("interestRate").is_none());
        assert!(json.get("riskLevel").is_none());
    }

    #[test]
    fn test_deserialize_without_optionals() {
        let product: Product = serde_json::from_str(
            r#"{"id":"x","name":"Seguro Hogar","type":"Seguro","category":"Seguros","description":"Home"}"#,
        )
        .unwrap();

        assert_eq!(product.product_type, ProductType::Insurance);
        assert_eq!(product.interest_rate, None);
        assert_eq!(product.risk_level, None);
        assert!(product.benefits.is_empty());
    }

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!("tarjeta".parse::<ProductType>().unwrap(), ProductType::Card);
        assert_eq!(" FONDO ".parse::<ProductType>().unwrap(), ProductType::Fund);
        assert_eq!("medio".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert!("Card".parse::<ProductType>().is_err());
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_risk_scores() {
        assert_eq!(RiskLevel::Low.score(), 20);
        assert_eq!(RiskLevel::Medium.score(), 50);
        assert_eq!(RiskLevel::High.score(), 80);
    }

    #[test]
    fn test_display_rate() {
        let mut product = fund();
        assert_eq!(product.display_rate(), "7.2%");
        product.interest_rate = None;
        assert_eq!(product.display_rate(), "—");
    }
}
