// 🔎 Query Evaluator - Optional, independently composable product criteria
//
// A raw `ProductQuery` (six optional strings, as they arrive from a query
// string or the command line) is validated into a typed `ProductFilter`.
// The filter is a conjunction of per-criterion predicates; an absent criterion
// matches everything.

use crate::error::QueryError;
use crate::product::Product;
use serde::{Deserialize, Serialize};

// ============================================================================
// RAW REQUEST
// ============================================================================

/// Filter request exactly as received. Empty values count as omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Exact product id
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Category label, case-insensitive (e.g. Tarjetas)
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Product type label, case-insensitive (Cuenta, Tarjeta, Fondo, Seguro)
    #[arg(long = "type")]
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    /// Risk level label, case-insensitive (Bajo, Medio, Alto)
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,

    /// Inclusive lower bound on the interest rate
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate_min: Option<String>,

    /// Inclusive upper bound on the interest rate
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate_max: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_bound(param: &'static str, value: Option<&str>) -> Result<Option<f64>, QueryError> {
    let Some(raw) = value else {
        return Ok(None);
    };

    match raw.trim().parse::<f64>() {
        Ok(bound) if bound.is_finite() => Ok(Some(bound)),
        _ => Err(QueryError::InvalidNumber {
            param,
            value: raw.to_string(),
        }),
    }
}

impl ProductQuery {
    /// Validate into typed criteria. Only the rate bounds can fail.
    pub fn parse(&self) -> Result<ProductFilter, QueryError> {
        let min = parse_bound("interestRateMin", present(&self.interest_rate_min))?;
        let max = parse_bound("interestRateMax", present(&self.interest_rate_max))?;

        let rate = if min.is_some() || max.is_some() {
            Some(RateRange { min, max })
        } else {
            None
        };

        Ok(ProductFilter {
            id: present(&self.id).map(String::from),
            category: present(&self.category).map(String::from),
            product_type: present(&self.product_type).map(String::from),
            risk_level: present(&self.risk_level).map(String::from),
            rate,
        })
    }

    /// Query-string form of the active criteria, e.g. `category=Tarjetas&riskLevel=Bajo`
    pub fn to_query_string(&self) -> String {
        [
            ("id", &self.id),
            ("category", &self.category),
            ("type", &self.product_type),
            ("riskLevel", &self.risk_level),
            ("interestRateMin", &self.interest_rate_min),
            ("interestRateMax", &self.interest_rate_max),
        ]
        .into_iter()
        .filter_map(|(key, value)| present(value).map(|v| format!("{}={}", key, urlencoding::encode(v))))
        .collect::<Vec<_>>()
        .join("&")
    }

    pub fn is_empty(&self) -> bool {
        self.to_query_string().is_empty()
    }
}

// ============================================================================
// TYPED CRITERIA
// ============================================================================

/// Interest rate window; a missing side is open
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RateRange {
    pub fn contains(&self, rate: f64) -> bool {
        self.min.map_or(true, |min| rate >= min) && self.max.map_or(true, |max| rate <= max)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub id: Option<String>,
    pub category: Option<String>,
    pub product_type: Option<String>,
    pub risk_level: Option<String>,
    pub rate: Option<RateRange>,
}

impl ProductFilter {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    pub fn with_risk_level(mut self, risk_level: impl Into<String>) -> Self {
        self.risk_level = Some(risk_level.into());
        self
    }

    /// No bounds on either side turns rate filtering off
    pub fn with_rate(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rate = if min.is_some() || max.is_some() {
            Some(RateRange { min, max })
        } else {
            None
        };
        self
    }

    pub fn matches_id(&self, product: &Product) -> bool {
        self.id.as_deref().map_or(true, |id| product.id == id)
    }

    pub fn matches_category(&self, product: &Product) -> bool {
        self.category
            .as_deref()
            .map_or(true, |c| product.category.to_lowercase() == c.to_lowercase())
    }

    pub fn matches_type(&self, product: &Product) -> bool {
        self.product_type
            .as_deref()
            .map_or(true, |t| product.product_type.label().to_lowercase() == t.to_lowercase())
    }

    /// Products without a risk level never match a supplied risk criterion
    pub fn matches_risk(&self, product: &Product) -> bool {
        match self.risk_level.as_deref() {
            None => true,
            Some(wanted) => product
                .risk_level
                .is_some_and(|r| r.label().to_lowercase() == wanted.to_lowercase()),
        }
    }

    /// Products with no rate, or a zero rate, never match a supplied rate window
    pub fn matches_rate(&self, product: &Product) -> bool {
        match self.rate {
            None => true,
            Some(range) => product
                .interest_rate
                .is_some_and(|rate| rate != 0.0 && range.contains(rate)),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.matches_id(product)
            && self.matches_category(product)
            && self.matches_type(product)
            && self.matches_risk(product)
            && self.matches_rate(product)
    }
}
