//! Multi-column grid layout for the provider catalog.
//!
//! Entries are emitted as `[index] name`, three per row, in catalog order.
//! The first two entries of a row are padded to a fixed column width measured
//! in codepoints of the name; the third ends the row. A final partial row is
//! closed with a line break but never back-filled.

use super::output::{StyleOutput, Tone};
use crate::models::ProviderCatalog;

/// Entries per grid row.
pub const GRID_COLUMNS: usize = 3;

/// Column width the name is padded to.
pub const NAME_COLUMN_WIDTH: usize = 20;

/// Catalogs at or above this size keep unpadded indices.
const INDEX_PAD_LIMIT: usize = 100;

/// Renders the provider catalog as a grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderCatalogRenderer;

impl ProviderCatalogRenderer {
    /// Formats the bracketed index token for entry `index`.
    #[must_use]
    pub fn index_token(index: usize, catalog_len: usize) -> String {
        if catalog_len < INDEX_PAD_LIMIT && index < 10 {
            format!("[ {index}] ")
        } else {
            format!("[{index}] ")
        }
    }

    /// Number of rows the grid occupies.
    #[must_use]
    pub const fn row_count(catalog_len: usize) -> usize {
        catalog_len.div_ceil(GRID_COLUMNS)
    }

    /// Emits the grid for `catalog` into `out`.
    pub fn render(catalog: &ProviderCatalog, out: &mut dyn StyleOutput) {
        let len = catalog.len();

        for (index, provider) in catalog.iter().enumerate() {
            out.write(Tone::Accent, &Self::index_token(index, len));
            out.write(Tone::Emphasis, provider.display_name());

            let ends_row = index % GRID_COLUMNS == GRID_COLUMNS - 1;
            let is_last = index + 1 == len;

            if ends_row || is_last {
                out.newline();
            } else {
                let width = provider.display_name().chars().count();
                let pad = NAME_COLUMN_WIDTH.saturating_sub(width);
                out.write(Tone::Plain, &" ".repeat(pad));
            }
        }
    }
}
