use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

use crate::cleaner::clean_text;
use crate::config::{CatalogLayout, Config};
use crate::models::{RawProduct, RawRecord};

/// Page-level parse failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid CSS selector '{0}': {1}")]
    InvalidSelector(String, String),

    #[error("Collection container not found in HTML")]
    MissingContainer,

    #[error("No product cards found in collection container")]
    NoCards,
}

/// Card-level extraction failures; these become placeholders, never page errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CardError {
    #[error("Card is missing its {0} element")]
    MissingElement(&'static str),

    #[error("Card has {0} detail paragraphs, expected at least 4")]
    MissingDetails(usize),

    #[error("Price '{0}' is not a valid amount")]
    InvalidPrice(String),
}

/// Extracts product records from catalog page HTML
#[derive(Debug, Clone)]
pub struct CardParser {
    container: Selector,
    card: Selector,
    title: Selector,
    price: Selector,
    detail: Selector,
    exchange_rate: i64,
}

fn compile(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector)
        .map_err(|e| ParseError::InvalidSelector(selector.to_string(), e.to_string()))
}

impl CardParser {
    /// Compile the layout's selectors
    pub fn new(layout: &CatalogLayout) -> Result<Self, ParseError> {
        Ok(Self {
            container: compile(&layout.container)?,
            card: compile(&layout.card)?,
            title: compile(&layout.title)?,
            price: compile(&layout.price)?,
            detail: compile(&layout.detail)?,
            exchange_rate: layout.exchange_rate,
        })
    }

    /// Parse a whole page into one record per card, in document order.
    ///
    /// A card that cannot be extracted still occupies its position as
    /// `RawRecord::Placeholder`.
    pub fn parse(&self, html: &str) -> Result<Vec<RawRecord>, ParseError> {
        let document = Html::parse_document(html);

        let container = document
            .select(&self.container)
            .next()
            .ok_or(ParseError::MissingContainer)?;

        let cards: Vec<ElementRef<'_>> = container.select(&self.card).collect();
        if cards.is_empty() {
            return Err(ParseError::NoCards);
        }

        let records = cards
            .into_iter()
            .enumerate()
            .map(|(index, card)| match self.extract_card(card) {
                Ok(product) => RawRecord::Product(product),
                Err(e) => {
                    tracing::warn!(card = index, error = %e, "Failed to extract card");
                    RawRecord::Placeholder
                }
            })
            .collect();

        Ok(records)
    }

    /// Extract a single card.
    ///
    /// Details are positional: rating, colors, size, gender. When a card has
    /// more than four detail paragraphs the first one is dropped.
    pub fn extract_card(&self, card: ElementRef<'_>) -> Result<RawProduct, CardError> {
        let title = card
            .select(&self.title)
            .next()
            .ok_or(CardError::MissingElement("title"))?;
        let price = card
            .select(&self.price)
            .next()
            .ok_or(CardError::MissingElement("price"))?;

        let mut details: Vec<ElementRef<'_>> = card.select(&self.detail).collect();
        if details.len() > Config::DETAIL_SLOTS {
            details.remove(0);
        }
        if details.len() < Config::DETAIL_SLOTS {
            return Err(CardError::MissingDetails(details.len()));
        }

        let price_text = clean_text(Some(price));
        let price = convert_price(&price_text, self.exchange_rate)?;

        Ok(RawProduct {
            title: clean_text(Some(title)),
            price,
            rating: clean_text(Some(details[0])),
            colors: clean_text(Some(details[1])),
            size: clean_text(Some(details[2])),
            gender: clean_text(Some(details[3])),
            timestamp: Utc::now(),
        })
    }
}

/// Convert a decimal price string to a rounded local-currency amount
pub fn convert_price(text: &str, exchange_rate: i64) -> Result<i64, CardError> {
    let amount: f64 = text
        .trim()
        .parse()
        .map_err(|_| CardError::InvalidPrice(text.to_string()))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(CardError::InvalidPrice(text.to_string()));
    }
    // `as i64` saturates, so out-of-range amounts must be rejected first
    let converted = (amount * exchange_rate as f64).round();
    if !converted.is_finite() || converted >= i64::MAX as f64 {
        return Err(CardError::InvalidPrice(text.to_string()));
    }
    Ok(converted as i64)
}
