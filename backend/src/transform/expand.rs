//! Row expansion: one product row in, one listing row per size out.
//!
//! # Architecture
//!
//! ```text
//! Input (one row per product)              Output (one row per SKU)
//! ┌──────────────────────────────┐        ┌──────────────┬──────┬───────┐
//! │ SKU: TS-01  Sizes: "S, M"    │        │ TS-01--RED--S│ S    │ Red   │
//! │ Color: Red  Group: G2        │   →    │ TS-01--RED--M│ M    │ Red   │
//! └──────────────────────────────┘        └──────────────┴──────┴───────┘
//! ```
//!
//! Steps, in order:
//!
//! 1. Check the header row: every mandatory column present, no existing `Size`
//! 2. Fill blank descriptions from [`super::description::synthesize`]
//! 3. Normalize the variations cell and drop rows without tokens
//! 4. Emit one row per token, with the composite SKU in the SKU column
//! 5. Stable sort by Group Name
//! 6. Move SKU, Size and Color to the front
//!
//! Repeated tokens are not deduplicated: `"S,S,M"` gives two `S` rows with the
//! same composite SKU.

use crate::error::{ExpandError, ExpandResult};
use crate::models::{ListingSchema, ResolvedColumns, Table};

use super::description::{synthesize, ProductAttributes};

/// Joins base SKU, color and size in a composite SKU.
pub const SKU_SEPARATOR: &str = "--";

/// Header given to the variations column after expansion.
pub const SIZE_HEADER: &str = "Size";

/// Result of expanding one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandOutcome {
    /// Expanded listing rows.
    pub table: Table,
    /// Product rows in the input.
    pub input_rows: usize,
    /// 1-based data-row numbers dropped because their variations were blank.
    pub excluded_rows: Vec<usize>,
    /// Surviving product rows whose description was generated.
    pub descriptions_generated: usize,
}

impl ExpandOutcome {
    pub fn output_rows(&self) -> usize {
        self.table.len()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded_rows.len()
    }
}

/// Split a variations cell into size tokens.
///
/// All whitespace is removed, the text is uppercased and split on commas;
/// empty tokens are dropped. Duplicates are kept.
pub fn normalize_variations(raw: &str) -> Vec<String> {
    compact_upper(raw)
        .split(',')
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Color as it appears inside a composite SKU: no whitespace, uppercase.
pub fn normalize_color(raw: &str) -> String {
    compact_upper(raw)
}

fn compact_upper(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// `TS-01`, `RED`, `M` -> `TS-01--RED--M`.
pub fn composite_sku(base: &str, color: &str, size: &str) -> String {
    format!("{base}{SKU_SEPARATOR}{color}{SKU_SEPARATOR}{size}")
}

/// Expand `table` into per-size listing rows.
///
/// Fails when a mandatory column is missing, or when a pass-through column
/// is already called `Size`; nothing is produced in either case. Rows shorter
/// than the header read as blank in the missing cells.
pub fn expand(table: &Table, schema: &ListingSchema) -> ExpandResult<ExpandOutcome> {
    let cols = schema.resolve(&table.headers)?;
    if let Some(clash) = table
        .headers
        .iter()
        .enumerate()
        .find(|(i, h)| *i != cols.variations && h.as_str() == SIZE_HEADER)
    {
        return Err(ExpandError::HeaderConflict(clash.1.clone()));
    }

    let mut exploded: Vec<Vec<String>> = Vec::new();
    let mut excluded_rows = Vec::new();
    let mut descriptions_generated = 0;

    let width = table.headers.len();
    for (idx, row) in table.rows.iter().enumerate() {
        let sizes = normalize_variations(cell(row, cols.variations));
        if sizes.is_empty() {
            excluded_rows.push(idx + 1);
            continue;
        }

        let current = cell(row, cols.description);
        let description = if current.trim().is_empty() {
            descriptions_generated += 1;
            synthesize(&ProductAttributes::from_row(row, &cols))
        } else {
            current.to_string()
        };
        let base_sku = cell(row, cols.sku);
        let color = normalize_color(cell(row, cols.color));

        for size in sizes {
            // Rows built by hand may be ragged; listings are always full width
            let mut out = row.clone();
            out.resize(width, String::new());
            out[cols.sku] = composite_sku(base_sku, &color, &size);
            out[cols.variations] = size;
            out[cols.description] = description.clone();
            exploded.push(out);
        }
    }

    // Vec::sort_by is stable, rows with equal groups keep their order.
    exploded.sort_by(|a, b| a[cols.group].cmp(&b[cols.group]));

    let mut headers = table.headers.clone();
    headers[cols.variations] = SIZE_HEADER.to_string();

    Ok(ExpandOutcome {
        table: reorder_columns(headers, exploded, &cols),
        input_rows: table.len(),
        excluded_rows,
        descriptions_generated,
    })
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map_or("", String::as_str)
}

/// SKU first, Size second, Color third, everything else after in its
/// original relative order.
fn reorder_columns(headers: Vec<String>, rows: Vec<Vec<String>>, cols: &ResolvedColumns) -> Table {
    let leading = [cols.sku, cols.variations, cols.color];
    let order: Vec<usize> = leading
        .iter()
        .copied()
        .chain((0..headers.len()).filter(|i| !leading.contains(i)))
        .collect();

    let permute = |source: &[String]| -> Vec<String> {
        order.iter().map(|&i| source[i].clone()).collect()
    };

    Table {
        headers: permute(headers.as_slice()),
        rows: rows.iter().map(|r| permute(r.as_slice())).collect(),
    }
}
