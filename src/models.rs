use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names shared by raw and clean product records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Title,
    Price,
    Rating,
    Colors,
    Size,
    Gender,
    Timestamp,
}

impl Field {
    /// All fields in export column order
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Price,
        Field::Rating,
        Field::Colors,
        Field::Size,
        Field::Gender,
        Field::Timestamp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Price => "Price",
            Field::Rating => "Rating",
            Field::Colors => "Colors",
            Field::Size => "Size",
            Field::Gender => "Gender",
            Field::Timestamp => "Timestamp",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully extracted product card.
///
/// Text fields hold cleaned card text; `price` is already converted to the
/// local currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProduct {
    pub title: String,
    pub price: i64,
    pub rating: String,
    pub colors: String,
    pub size: String,
    pub gender: String,
    /// Capture time, not the page's own timestamp
    pub timestamp: DateTime<Utc>,
}

/// One card's extraction result.
///
/// A card either yields every field or nothing at all; `Placeholder` keeps the
/// card's position when extraction failed.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Product(RawProduct),
    Placeholder,
}

impl RawRecord {
    /// Text value of a field, `None` when the record does not carry it
    pub fn field(&self, field: Field) -> Option<String> {
        let product = match self {
            RawRecord::Product(p) => p,
            RawRecord::Placeholder => return None,
        };
        Some(match field {
            Field::Title => product.title.clone(),
            Field::Price => product.price.to_string(),
            Field::Rating => product.rating.clone(),
            Field::Colors => product.colors.clone(),
            Field::Size => product.size.clone(),
            Field::Gender => product.gender.clone(),
            Field::Timestamp => product.timestamp.to_rfc3339(),
        })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RawRecord::Placeholder)
    }

    /// True for placeholders and for products whose text fields are all blank
    pub fn is_blank(&self) -> bool {
        match self {
            RawRecord::Placeholder => true,
            RawRecord::Product(p) => [&p.title, &p.rating, &p.colors, &p.size, &p.gender]
                .iter()
                .all(|s| s.trim().is_empty()),
        }
    }
}

/// A normalized product row ready for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Price")]
    pub price: i64,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "Colors")]
    pub colors: String,
    #[serde(rename = "Size")]
    pub size: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl CleanRecord {
    /// Derive a clean record from a product with an already-coerced rating
    pub fn from_product(product: &RawProduct, rating: f64) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price,
            rating,
            colors: product.colors.clone(),
            size: product.size.clone(),
            gender: product.gender.clone(),
            timestamp: product.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawProduct {
        RawProduct {
            title: "T-shirt 2".to_string(),
            price: 1_600_000,
            rating: "3.9".to_string(),
            colors: "3".to_string(),
            size: "M".to_string(),
            gender: "Women".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_placeholder_has_no_fields() {
        for field in Field::ALL {
            assert_eq!(RawRecord::Placeholder.field(field), None);
        }
        assert!(RawRecord::Placeholder.is_blank());
    }

    #[test]
    fn test_product_field_lookup() {
        let record = RawRecord::Product(sample());
        assert_eq!(record.field(Field::Title).as_deref(), Some("T-shirt 2"));
        assert_eq!(record.field(Field::Price).as_deref(), Some("1600000"));
        assert_eq!(record.field(Field::Rating).as_deref(), Some("3.9"));
        assert!(!record.is_blank());
        assert!(!record.is_placeholder());
    }

    #[test]
    fn test_blank_product() {
        let mut product = sample();
        product.title = " ".to_string();
        product.rating.clear();
        product.colors.clear();
        product.size.clear();
        product.gender.clear();
        assert!(RawRecord::Product(product).is_blank());
    }

    #[test]
    fn test_field_display_matches_column() {
        let names: Vec<String> = Field::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(
            names,
            vec!["Title", "Price", "Rating", "Colors", "Size", "Gender", "Timestamp"]
        );
    }
}
