use crate::config::ColumnCatalog;
use crate::error::Result;
use crate::report::Row;

/// Serialize rows to CSV bytes: one header line of column descriptions, then
/// one record per row. Every field is quoted (embedded quotes doubled), null
/// cells become empty strings, lines end with CRLF.
pub fn build_csv(
    rows: &[Row],
    columns: &[String],
    catalog: &ColumnCatalog,
    delimiter: u8,
) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| catalog.describe(c)))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| row.raw(c)))?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| e.into_error().into())
}
