//! Coffee attributes
//!
//! Typed form of a single inference request, with the value domains the
//! price form accepts. Converts into a [`Record`] keyed by the dataset's
//! column names.

use crate::error::{DataError, Result};
use crate::record::Record;
use crate::schema::{
    BEAN_COST, BEAN_ORIGIN, COMPETITOR_PRICE, CUSTOMER_RATING, FLAVOR_PROFILE, MONTH, ROAST_LEVEL,
};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Bean origins offered by the price form.
pub const BEAN_ORIGINS: [&str; 5] = ["Ethiopia", "Colombia", "Brazil", "Kenya", "Guatemala"];
/// Roast levels offered by the price form.
pub const ROAST_LEVELS: [&str; 3] = ["Light", "Medium", "Dark"];
/// Flavor profiles offered by the price form.
pub const FLAVOR_PROFILES: [&str; 5] = ["Fruity", "Nutty", "Chocolatey", "Caramel", "Floral"];

/// Accepted customer rating.
pub const RATING_RANGE: RangeInclusive<f64> = 1.0..=5.0;
/// Accepted competitor price (INR).
pub const COMPETITOR_PRICE_RANGE: RangeInclusive<f64> = 100.0..=600.0;
/// Accepted bean cost (INR per kg).
pub const BEAN_COST_RANGE: RangeInclusive<f64> = 50.0..=300.0;
/// Accepted sale month.
pub const MONTH_RANGE: RangeInclusive<u32> = 1..=12;

/// Attributes of one coffee product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoffeeAttributes {
    /// Country the beans come from
    pub bean_origin: String,
    /// Roast level
    pub roast_level: String,
    /// Dominant flavor profile
    pub flavor_profile: String,
    /// Average customer rating (1-5)
    pub customer_rating: f64,
    /// Competitor retail price (INR)
    pub competitor_price: f64,
    /// Bean cost (INR per kg)
    pub bean_cost: f64,
    /// Sale month (1-12)
    pub month: u32,
}

impl Default for CoffeeAttributes {
    fn default() -> Self {
        Self {
            bean_origin: BEAN_ORIGINS[0].to_string(),
            roast_level: ROAST_LEVELS[0].to_string(),
            flavor_profile: FLAVOR_PROFILES[0].to_string(),
            customer_rating: 4.0,
            competitor_price: 300.0,
            bean_cost: 130.0,
            month: 6,
        }
    }
}

impl CoffeeAttributes {
    /// Check every numeric attribute against its accepted domain.
    ///
    /// Category labels are not checked here: unknown labels are a defined
    /// input for the encoder.
    pub fn validate(&self) -> Result<()> {
        check_range(CUSTOMER_RATING, self.customer_rating, &RATING_RANGE)?;
        check_range(COMPETITOR_PRICE, self.competitor_price, &COMPETITOR_PRICE_RANGE)?;
        check_range(BEAN_COST, self.bean_cost, &BEAN_COST_RANGE)?;
        if !MONTH_RANGE.contains(&self.month) {
            return Err(DataError::OutOfRange {
                attribute: MONTH.to_string(),
                value: f64::from(self.month),
                min: f64::from(*MONTH_RANGE.start()),
                max: f64::from(*MONTH_RANGE.end()),
            });
        }
        Ok(())
    }

    /// Convert into a record keyed by dataset column names.
    pub fn to_record(&self) -> Record {
        Record::new()
            .with_category(BEAN_ORIGIN, self.bean_origin.as_str())
            .with_category(ROAST_LEVEL, self.roast_level.as_str())
            .with_category(FLAVOR_PROFILE, self.flavor_profile.as_str())
            .with_numeric(CUSTOMER_RATING, self.customer_rating)
            .with_numeric(COMPETITOR_PRICE, self.competitor_price)
            .with_numeric(BEAN_COST, self.bean_cost)
            .with_numeric(MONTH, f64::from(self.month))
    }
}

impl From<CoffeeAttributes> for Record {
    fn from(attrs: CoffeeAttributes) -> Self {
        attrs.to_record()
    }
}

fn check_range(attribute: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(DataError::OutOfRange {
            attribute: attribute.to_string(),
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
