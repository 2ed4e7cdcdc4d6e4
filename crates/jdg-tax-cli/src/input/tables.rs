use std::borrow::Cow;

use jdg_tax_core::tables::{self, TaxTables};

use super::file;

/// The published tables, or a validated replacement read from `path`.
pub fn load(path: Option<&str>) -> Result<Cow<'static, TaxTables>, Box<dyn std::error::Error>> {
    match path {
        None => Ok(Cow::Borrowed(tables::published()?)),
        Some(path) => {
            let json = file::read_to_string(path)?;
            let custom = tables::from_json(&json)?;
            tracing::warn!(
                path,
                tax_year = custom.tax_year,
                "using a replacement tax table set"
            );
            Ok(Cow::Owned(custom))
        }
    }
}
