//! Domain models for the listing expansion pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`FieldRole`] - Columns the engine reads or rewrites
//! - [`FieldSpec`] - One column of the product sheet (name, mandatory flag, sample)
//! - [`ListingSchema`] - Ordered set of recognised columns
//! - [`ResolvedColumns`] - Header positions of every role, resolved once per table
//! - [`Table`] - Ordered header row plus string rows
//! - [`channel`] - Marketplace catalogue used to name downloads

pub mod channel;

use serde::{Deserialize, Serialize};

use crate::error::{ExpandError, ExpandResult};

pub use channel::{Channel, ChannelCategory};

/// Marker appended to mandatory column names when rendering headers.
pub const MANDATORY_MARKER: char = '*';

// =============================================================================
// Field Roles
// =============================================================================

/// Semantic role of a column the pipeline reads or rewrites.
///
/// Columns without a role (MRP, HSN, image URLs...) are carried through
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    ProductName,
    Variations,
    Color,
    GroupName,
    Fabric,
    SkuCode,
    Brand,
    Category,
    Description,
}

impl FieldRole {
    /// Human label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProductName => "product name",
            Self::Variations => "size variations",
            Self::Color => "product color",
            Self::GroupName => "group name",
            Self::Fabric => "fabric",
            Self::SkuCode => "SKU code",
            Self::Brand => "brand",
            Self::Category => "product category",
            Self::Description => "product description",
        }
    }
}

// =============================================================================
// Field Spec
// =============================================================================

/// One recognised column of the product sheet.
///
/// The canonical name and the mandatory flag are kept apart; the `*` suffix
/// only exists in the rendered [`FieldSpec::header`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Canonical column name, without marker.
    pub name: String,
    /// Whether the column must be present in every uploaded sheet.
    pub mandatory: bool,
    /// Role the pipeline gives this column, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FieldRole>,
    /// Example cell used by the sample template.
    #[serde(default)]
    pub sample: String,
}

impl FieldSpec {
    pub fn mandatory(name: impl Into<String>, sample: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: true,
            role: None,
            sample: sample.into(),
        }
    }

    pub fn optional(name: impl Into<String>, sample: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: false,
            role: None,
            sample: sample.into(),
        }
    }

    pub fn with_role(mut self, role: FieldRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Header as it appears in the CSV (`Brand*` for mandatory fields).
    pub fn header(&self) -> String {
        if self.mandatory {
            format!("{}{}", self.name, MANDATORY_MARKER)
        } else {
            self.name.clone()
        }
    }
}

// =============================================================================
// Listing Schema
// =============================================================================

/// Ordered set of recognised columns.
///
/// The order only matters for the sample template and for which missing
/// column gets reported first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSchema {
    pub fields: Vec<FieldSpec>,
}

impl ListingSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// The marketplace product-sheet layout: 18 mandatory columns followed by
    /// four optional secondary image URLs.
    pub fn marketplace() -> Self {
        use FieldRole::*;

        Self::new(vec![
            FieldSpec::mandatory("Product Name", "Premium Cotton Tee").with_role(ProductName),
            FieldSpec::mandatory("Variations (comma separated)", "S, M, L, XL")
                .with_role(Variations),
            FieldSpec::mandatory("Product Color", "Red").with_role(Color),
            FieldSpec::mandatory("Group Name", "TSHIRT-BASICS").with_role(GroupName),
            FieldSpec::mandatory("Fabric Type", "Cotton").with_role(Fabric),
            FieldSpec::mandatory("SKU Code", "TS-01").with_role(SkuCode),
            FieldSpec::mandatory("MRP", "999"),
            FieldSpec::mandatory("Selling Price", "599"),
            FieldSpec::mandatory("Brand", "Globalite").with_role(Brand),
            FieldSpec::mandatory("HSN", "6109"),
            FieldSpec::mandatory("GST Rate", "5"),
            FieldSpec::mandatory("Weight", "200"),
            FieldSpec::mandatory("Inventory", "50"),
            FieldSpec::mandatory("Country Of Origin", "India"),
            FieldSpec::mandatory("Pack of", "1"),
            FieldSpec::mandatory("Product Category", "T-Shirts").with_role(Category),
            FieldSpec::mandatory("Main Image", "https://cdn.example.com/ts-01/main.jpg"),
            FieldSpec::mandatory("Product Description", "").with_role(Description),
            FieldSpec::optional("Image 2", "https://cdn.example.com/ts-01/2.jpg"),
            FieldSpec::optional("Image 3", ""),
            FieldSpec::optional("Image 4", ""),
            FieldSpec::optional("Image 5", ""),
        ])
    }

    /// Rendered headers of every recognised column, in schema order.
    pub fn headers(&self) -> Vec<String> {
        self.fields.iter().map(FieldSpec::header).collect()
    }

    /// Rendered headers of mandatory columns, in schema order.
    pub fn mandatory_headers(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.mandatory)
            .map(FieldSpec::header)
            .collect()
    }

    /// Rendered header of the column carrying `role`.
    pub fn header_for(&self, role: FieldRole) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.role == Some(role))
            .map(FieldSpec::header)
    }

    /// First mandatory header (in schema order) absent from `headers`.
    pub fn first_missing(&self, headers: &[String]) -> Option<String> {
        self.mandatory_headers()
            .into_iter()
            .find(|h| !headers.contains(h))
    }

    /// Check `headers` against the schema and locate every role.
    ///
    /// Fails with the first missing mandatory column. Roles the engine cannot
    /// work without (variations, color, group, SKU, description) must also be
    /// present when the schema declares them optional.
    pub fn resolve(&self, headers: &[String]) -> ExpandResult<ResolvedColumns> {
        if let Some(missing) = self.first_missing(headers) {
            return Err(ExpandError::MissingColumn(missing));
        }

        let locate = |role: FieldRole| -> Option<usize> {
            let header = self.header_for(role)?;
            headers.iter().position(|h| *h == header)
        };
        let require = |role: FieldRole| -> ExpandResult<usize> {
            let header = self
                .header_for(role)
                .ok_or(ExpandError::IncompleteSchema(role.label()))?;
            headers
                .iter()
                .position(|h| *h == header)
                .ok_or(ExpandError::MissingColumn(header))
        };

        Ok(ResolvedColumns {
            sku: require(FieldRole::SkuCode)?,
            variations: require(FieldRole::Variations)?,
            color: require(FieldRole::Color)?,
            group: require(FieldRole::GroupName)?,
            description: require(FieldRole::Description)?,
            product_name: locate(FieldRole::ProductName),
            category: locate(FieldRole::Category),
            fabric: locate(FieldRole::Fabric),
            brand: locate(FieldRole::Brand),
        })
    }
}

impl Default for ListingSchema {
    fn default() -> Self {
        Self::marketplace()
    }
}

// =============================================================================
// Resolved Columns
// =============================================================================

/// Column positions for one table, resolved against a [`ListingSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub sku: usize,
    pub variations: usize,
    pub color: usize,
    pub group: usize,
    pub description: usize,
    pub product_name: Option<usize>,
    pub category: Option<usize>,
    pub fabric: Option<usize>,
    pub brand: Option<usize>,
}

// =============================================================================
// Table
// =============================================================================

/// In-memory product sheet: ordered headers and rows of string cells.
///
/// Rows added through [`Table::push_row`] hold exactly one cell per header.
/// Rows pushed onto `rows` directly may be ragged; readers treat missing
/// cells as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with blanks or dropping surplus cells so it
    /// matches the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn with_rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            self.push_row(row.into_iter().map(Into::into).collect());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell of `row` under `header`, if both exist.
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let col = self.column_index(header)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// All cells under `header`, top to bottom.
    pub fn column(&self, header: &str) -> Vec<&str> {
        match self.column_index(header) {
            Some(col) => self
                .rows
                .iter()
                .map(|r| r.get(col).map_or("", String::as_str))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Copy of the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marketplace_schema_shape() {
        let schema = ListingSchema::marketplace();
        assert_eq!(schema.fields.len(), 22);
        assert_eq!(schema.mandatory_headers().len(), 18);
        assert_eq!(schema.mandatory_headers()[1], "Variations (comma separated)*");
        assert!(schema.headers().contains(&"Image 2".to_string()));
    }

    #[test]
    fn test_header_marker_is_derived() {
        let field = FieldSpec::mandatory("Brand", "");
        assert_eq!(field.name, "Brand");
        assert_eq!(field.header(), "Brand*");
        assert_eq!(FieldSpec::optional("Image 3", "").header(), "Image 3");
    }

    #[test]
    fn test_first_missing_follows_schema_order() {
        let schema = ListingSchema::marketplace();
        let headers: Vec<String> = schema
            .headers()
            .into_iter()
            .filter(|h| h != "Group Name*" && h != "Brand*")
            .collect();
        assert_eq!(schema.first_missing(&headers), Some("Group Name*".to_string()));
    }

    #[test]
    fn test_resolve_locates_roles() {
        let schema = ListingSchema::marketplace();
        let mut headers = schema.headers();
        headers.reverse();
        let cols = schema.resolve(&headers).unwrap();
        assert_eq!(headers[cols.sku], "SKU Code*");
        assert_eq!(headers[cols.variations], "Variations (comma separated)*");
        assert_eq!(headers[cols.group], "Group Name*");
        assert_eq!(cols.brand.map(|i| headers[i].as_str()), Some("Brand*"));
    }

    #[test]
    fn test_resolve_optional_engine_column_still_required() {
        let schema = ListingSchema::new(vec![
            FieldSpec::mandatory("SKU", "").with_role(FieldRole::SkuCode),
            FieldSpec::mandatory("Sizes", "").with_role(FieldRole::Variations),
            FieldSpec::mandatory("Color", "").with_role(FieldRole::Color),
            FieldSpec::mandatory("Group", "").with_role(FieldRole::GroupName),
            FieldSpec::optional("Description", "").with_role(FieldRole::Description),
        ]);
        let headers: Vec<String> = ["SKU*", "Sizes*", "Color*", "Group*"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            schema.resolve(&headers),
            Err(ExpandError::MissingColumn("Description".into()))
        );
    }

    #[test]
    fn test_resolve_incomplete_schema() {
        let schema = ListingSchema::new(vec![FieldSpec::mandatory("SKU", "")]);
        let headers = vec!["SKU*".to_string()];
        assert!(matches!(
            schema.resolve(&headers),
            Err(ExpandError::IncompleteSchema(_))
        ));
    }

    #[test]
    fn test_table_push_row_normalizes_width() {
        let table = Table::new(vec!["a".into(), "b".into()])
            .with_rows(vec![vec!["1"], vec!["1", "2", "3"]]);
        assert_eq!(table.rows[0], vec!["1", ""]);
        assert_eq!(table.rows[1], vec!["1", "2"]);
        assert_eq!(table.column("b"), vec!["", "2"]);
        assert_eq!(table.cell(1, "a"), Some("1"));
        assert_eq!(table.cell(2, "a"), None);
    }

    #[test]
    fn test_table_reads_ragged_rows_as_blank() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.rows.push(vec!["1".into()]);
        assert_eq!(table.column("b"), vec![""]);
        assert_eq!(table.cell(0, "b"), None);
        assert_eq!(table.cell(0, "a"), Some("1"));
    }

    #[test]
    fn test_schema_serialization_omits_missing_role() {
        let json = serde_json::to_string(&FieldSpec::optional("Image 2", "")).unwrap();
        assert!(!json.contains("role"));
    }
}
