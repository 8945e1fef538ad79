//! Field text cleaning for catalog cards.
//!
//! Card text carries decorative labels ("Rating: ", "Size: ", a star glyph,
//! a currency sign). These are stripped with one regex pass. Removal is purely
//! textual, so the same substrings inside real content are removed too.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::ElementRef;

/// Decorative substrings stripped from every field, in match priority order
pub const DECORATIONS: [&str; 8] = [
    "$",
    "Rating: ",
    "⭐ ",
    " / 5",
    "Colors: ",
    " Colors",
    "Size: ",
    "Gender: ",
];

lazy_static! {
    static ref DECORATION_PATTERN: Regex = {
        let alternation = DECORATIONS
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternation).expect("decoration pattern is a literal alternation")
    };
}

/// Visible text of an element with each text fragment trimmed and joined.
pub fn visible_text(node: ElementRef<'_>) -> String {
    node.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<String>()
}

/// Clean an optional element's text; an absent element yields an empty string.
pub fn clean_text(node: Option<ElementRef<'_>>) -> String {
    match node {
        Some(element) => clean_str(&visible_text(element)),
        None => String::new(),
    }
}

/// Strip decorations from already-extracted text
pub fn clean_str(text: &str) -> String {
    DECORATION_PATTERN.replace_all(text.trim(), "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_absent_node_is_empty() {
        assert_eq!(clean_text(None), "");
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(clean_str("Rating: ⭐ 4.8 / 5"), "4.8");
    }

    #[test]
    fn test_currency_symbol() {
        assert_eq!(clean_str("$ 100"), "100");
        assert_eq!(clean_str("$100.00"), "100.00");
    }

    #[test]
    fn test_colors_label_and_suffix() {
        assert_eq!(clean_str("Colors: Red, Blue"), "Red, Blue");
        assert_eq!(clean_str("3 Colors"), "3");
    }

    #[test]
    fn test_size_and_gender_labels() {
        assert_eq!(clean_str("Size: XL"), "XL");
        assert_eq!(clean_str("Gender: Unisex"), "Unisex");
    }

    #[test]
    fn test_decorations_inside_content_are_removed() {
        assert_eq!(clean_str("Pay $5 Colors"), "Pay 5");
    }

    #[test]
    fn test_clean_text_from_element() {
        let html = Html::parse_fragment(
            r#"<div class="price-container">
                 <span class="price">$120.50</span>
               </div>"#,
        );
        let selector = Selector::parse("div.price-container").unwrap();
        let node = html.select(&selector).next();
        assert_eq!(clean_text(node), "120.50");
    }

    #[test]
    fn test_visible_text_joins_fragments() {
        let html = Html::parse_fragment("<p> Rating: <b>⭐ 4.0</b> / 5 </p>");
        let selector = Selector::parse("p").unwrap();
        let node = html.select(&selector).next().unwrap();
        assert_eq!(visible_text(node), "Rating:⭐ 4.0/ 5");
    }
}
