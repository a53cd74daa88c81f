//! Attribute schema
//!
//! Declares which columns a record carries, whether each is numeric or
//! categorical, and which column holds the training target. The coffee
//! schema mirrors the header of the historical sales CSV.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column holding the bean origin.
pub const BEAN_ORIGIN: &str = "Bean_Origin";
/// Column holding the roast level.
pub const ROAST_LEVEL: &str = "Roast_Level";
/// Column holding the flavor profile.
pub const FLAVOR_PROFILE: &str = "Flavor_Profile";
/// Column holding the customer rating.
pub const CUSTOMER_RATING: &str = "Customer_Rating";
/// Column holding the competitor price.
pub const COMPETITOR_PRICE: &str = "Competitor_Price_INR";
/// Column holding the bean cost per kilogram.
pub const BEAN_COST: &str = "Bean_Cost_INR";
/// Column holding the sale month.
pub const MONTH: &str = "Month";
/// Target column.
pub const PRICE: &str = "price";

/// Kind of value an attribute holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Real-valued attribute, standardized during encoding
    Numeric,
    /// Attribute drawn from a set of labels, one-hot encoded
    Categorical,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

/// One attribute column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Column name
    pub name: String,
    /// Value kind
    pub kind: AttributeKind,
}

impl AttributeSpec {
    /// Numeric attribute column.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// Categorical attribute column.
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Categorical,
        }
    }
}

/// Ordered attribute columns plus the target column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<AttributeSpec>,
    target: String,
}

impl Schema {
    /// Create a schema from attribute columns and a target column name.
    pub fn new(attributes: Vec<AttributeSpec>, target: impl Into<String>) -> Self {
        Self {
            attributes,
            target: target.into(),
        }
    }

    /// Schema of the historical coffee sales dataset.
    pub fn coffee() -> Self {
        Self::new(
            vec![
                AttributeSpec::categorical(BEAN_ORIGIN),
                AttributeSpec::categorical(ROAST_LEVEL),
                AttributeSpec::categorical(FLAVOR_PROFILE),
                AttributeSpec::numeric(CUSTOMER_RATING),
                AttributeSpec::numeric(COMPETITOR_PRICE),
                AttributeSpec::numeric(BEAN_COST),
                AttributeSpec::numeric(MONTH),
            ],
            PRICE,
        )
    }

    /// All attribute columns in declaration order.
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    /// Numeric attribute columns in declaration order.
    pub fn numeric(&self) -> impl Iterator<Item = &str> {
        self.of_kind(AttributeKind::Numeric)
    }

    /// Categorical attribute columns in declaration order.
    pub fn categorical(&self) -> impl Iterator<Item = &str> {
        self.of_kind(AttributeKind::Categorical)
    }

    /// Target column name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Kind of the named attribute, if the schema declares it.
    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.kind)
    }

    fn of_kind(&self, kind: AttributeKind) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(move |a| a.kind == kind)
            .map(|a| a.name.as_str())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::coffee()
    }
}
