//! Marketing copy for products uploaded without a description.
//!
//! A fixed plain-text template is filled from the row's attributes. The
//! function is pure: the same attributes always give the same text.

use crate::models::ResolvedColumns;

/// Hard cap on generated description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1400;

/// Appended when a description is cut at [`MAX_DESCRIPTION_CHARS`].
pub const TRUNCATION_MARKER: &str = "...";

/// Returned when the product name or category is blank.
pub const FALLBACK_DESCRIPTION: &str =
    "No comprehensive description generated due to missing product name or category.";

const DEFAULT_FABRIC: &str = "premium material";
const DEFAULT_BRAND: &str = "a trusted source";
const DEFAULT_SIZES: &str = "various sizes";

/// Attributes the template reads, borrowed from one product row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductAttributes<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub color: &'a str,
    pub fabric: &'a str,
    pub brand: &'a str,
    /// Raw variations cell, e.g. `"S,M, L"`.
    pub sizes: &'a str,
}

impl<'a> ProductAttributes<'a> {
    /// Read the attributes out of a row using resolved column positions.
    /// Columns the table lacks read as blank.
    pub fn from_row(row: &'a [String], cols: &ResolvedColumns) -> Self {
        let get = |idx: Option<usize>| -> &'a str {
            idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
        };

        Self {
            name: get(cols.product_name),
            category: get(cols.category),
            color: get(Some(cols.color)),
            fabric: get(cols.fabric),
            brand: get(cols.brand),
            sizes: get(Some(cols.variations)),
        }
    }
}

/// Generate a description for `attrs`.
///
/// Never fails: a blank name or category yields [`FALLBACK_DESCRIPTION`].
/// The result is at most [`MAX_DESCRIPTION_CHARS`] characters long.
pub fn synthesize(attrs: &ProductAttributes<'_>) -> String {
    let name = attrs.name.trim();
    let category = attrs.category.trim();
    if name.is_empty() || category.is_empty() {
        return FALLBACK_DESCRIPTION.to_string();
    }

    let fabric = or_default(attrs.fabric, DEFAULT_FABRIC);
    let brand = or_default(attrs.brand, DEFAULT_BRAND);
    let color = attrs.color.trim();
    let sizes = display_sizes(attrs.sizes);

    let shade = if color.is_empty() {
        "Its versatile shade".to_string()
    } else {
        format!("The {color} shade")
    };

    let text = format!(
        "Discover the {name}, a standout addition to our {category} collection from {brand}. \
         Crafted from {fabric}, this piece pairs everyday comfort with lasting durability. \
         {shade} is easy to style for casual outings, work days and festive occasions alike. \
         Available in {sizes}, it is cut to give a reliable fit across body types. \
         Careful stitching and quality checks at every stage make it a dependable choice \
         for your wardrobe. ({keywords})",
        keywords = keyword_clause(name, category, fabric, color),
    );

    truncate(text)
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

/// `"S,M, L"` -> `"S, M, L"`; blank -> `"various sizes"`.
fn display_sizes(raw: &str) -> String {
    let sizes: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sizes.is_empty() {
        DEFAULT_SIZES.to_string()
    } else {
        sizes.join(", ")
    }
}

/// Search keywords: the product name split on spaces and hyphens, then
/// category, fabric and color.
fn keyword_clause(name: &str, category: &str, fabric: &str, color: &str) -> String {
    let mut parts = vec![name.replace([' ', '-'], ","), category.to_string(), fabric.to_string()];
    if !color.is_empty() {
        parts.push(color.to_string());
    }
    parts.join(", ")
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text;
    }

    let keep = MAX_DESCRIPTION_CHARS - TRUNCATION_MARKER.len();
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tee() -> ProductAttributes<'static> {
        ProductAttributes {
            name: "Premium Cotton Tee",
            category: "T-Shirts",
            color: "Red",
            fabric: "Cotton",
            brand: "Globalite",
            sizes: "S,M,L",
        }
    }

    #[test]
    fn test_template_mentions_attributes() {
        let text = synthesize(&tee());
        assert!(text.starts_with("Discover the Premium Cotton Tee"));
        assert!(text.contains("our T-Shirts collection from Globalite."));
        assert!(text.contains("Crafted from Cotton"));
        assert!(text.contains("The Red shade"));
        assert!(text.contains("Available in S, M, L,"));
    }

    #[test]
    fn test_keyword_clause() {
        let text = synthesize(&tee());
        assert!(text.ends_with("(Premium,Cotton,Tee, T-Shirts, Cotton, Red)"));

        let attrs = ProductAttributes {
            name: "Anti-Fit Jogger",
            ..tee()
        };
        assert!(synthesize(&attrs).contains("(Anti,Fit,Jogger, T-Shirts"));
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let attrs = ProductAttributes {
            fabric: "  ",
            brand: "",
            sizes: " , ",
            ..tee()
        };
        let text = synthesize(&attrs);
        assert!(text.contains("from a trusted source."));
        assert!(text.contains("Crafted from premium material"));
        assert!(text.contains("Available in various sizes"));
    }

    #[test]
    fn test_fallback_on_missing_name_or_category() {
        let no_name = ProductAttributes { name: " ", ..tee() };
        assert_eq!(synthesize(&no_name), FALLBACK_DESCRIPTION);

        let no_category = ProductAttributes {
            category: "",
            ..tee()
        };
        assert_eq!(synthesize(&no_category), FALLBACK_DESCRIPTION);
    }

    #[test]
    fn test_plain_text_only() {
        let text = synthesize(&tee());
        for marker in ['*', '#', '<', '>', '\n'] {
            assert!(!text.contains(marker), "unexpected {marker:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(synthesize(&tee()), synthesize(&tee()));
    }

    #[test]
    fn test_length_cap() {
        let long_name = "Extra Long ".repeat(200);
        let attrs = ProductAttributes {
            name: &long_name,
            ..tee()
        };
        let text = synthesize(&attrs);
        assert_eq!(text.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_length_cap_counts_characters() {
        let long_name = "Ñandú ".repeat(300);
        let attrs = ProductAttributes {
            name: &long_name,
            ..tee()
        };
        let text = synthesize(&attrs);
        assert_eq!(text.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_short_text_untouched() {
        let text = synthesize(&tee());
        assert!(text.chars().count() < MAX_DESCRIPTION_CHARS);
        assert!(!text.ends_with("..."));
    }

    #[test]
    fn test_from_row() {
        let cols = ResolvedColumns {
            sku: 0,
            variations: 1,
            color: 2,
            group: 3,
            description: 4,
            product_name: Some(5),
            category: None,
            fabric: None,
            brand: None,
        };
        let row: Vec<String> = ["TS-01", "S,M", "Red", "G1", "", "Tee"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let attrs = ProductAttributes::from_row(&row, &cols);
        assert_eq!(attrs.name, "Tee");
        assert_eq!(attrs.sizes, "S,M");
        assert_eq!(attrs.category, "");
    }
}
