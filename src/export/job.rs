use chrono::NaiveDate;

use crate::config::ColumnCatalog;
use crate::error::Result;
use crate::export::csv::build_csv;
use crate::export::xlsx::XlsxJob;
use crate::report::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// One event from an export job: progress in percent or the terminal step
/// carrying the serialized file bytes.
#[derive(Debug)]
pub enum ExportStep {
    Progress(u8),
    Finished(Vec<u8>),
}

/// File name pattern `<base>_<YYYY-MM-DD>.<ext>`
pub fn export_filename(base: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        base,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// A running export: a finite sequence of progress events ending in exactly
/// one `Finished` step. An empty row array produces an empty sequence, so an
/// export over nothing is an observable no-op. Dropping the job before the
/// terminal step cancels the export; no bytes exist outside that step, so no
/// partial file can ever be written.
pub enum ExportJob<'a> {
    Csv(CsvJob<'a>),
    Xlsx(XlsxJob<'a>),
}

impl<'a> ExportJob<'a> {
    pub fn csv(
        rows: &'a [Row],
        columns: &'a [String],
        catalog: &'a ColumnCatalog,
        delimiter: u8,
    ) -> ExportJob<'a> {
        ExportJob::Csv(CsvJob {
            rows,
            columns,
            catalog,
            delimiter,
            done: false,
        })
    }

    pub fn xlsx(
        rows: &'a [Row],
        columns: &'a [String],
        catalog: &'a ColumnCatalog,
        sheet_name: &'a str,
    ) -> ExportJob<'a> {
        ExportJob::Xlsx(XlsxJob::new(rows, columns, catalog, sheet_name))
    }
}

impl Iterator for ExportJob<'_> {
    type Item = Result<ExportStep>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ExportJob::Csv(job) => job.next(),
            ExportJob::Xlsx(job) => job.next(),
        }
    }
}

/// CSV serialization is a single step; there is no chunking to report on.
pub struct CsvJob<'a> {
    rows: &'a [Row],
    columns: &'a [String],
    catalog: &'a ColumnCatalog,
    delimiter: u8,
    done: bool,
}

impl Iterator for CsvJob<'_> {
    type Item = Result<ExportStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.rows.is_empty() {
            return None;
        }
        self.done = true;
        Some(
            build_csv(self.rows, self.columns, self.catalog, self.delimiter)
                .map(ExportStep::Finished),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Value;

    #[test]
    fn filenames_stamp_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        assert_eq!(
            export_filename("reporte_anexos", ExportFormat::Csv, date),
            "reporte_anexos_2024-04-15.csv"
        );
        assert_eq!(
            export_filename("reporte_anexos", ExportFormat::Xlsx, date),
            "reporte_anexos_2024-04-15.xlsx"
        );
    }

    #[test]
    fn empty_rows_make_an_empty_sequence() {
        let rows: Vec<Row> = Vec::new();
        let columns = vec!["ter_nit".to_string()];
        let catalog = ColumnCatalog::default();

        let mut csv = ExportJob::csv(&rows, &columns, &catalog, b',');
        assert!(csv.next().is_none());

        let mut xlsx = ExportJob::xlsx(&rows, &columns, &catalog, "Report");
        assert!(xlsx.next().is_none());
    }

    #[test]
    fn csv_job_is_a_single_terminal_step() {
        let rows = vec![Row::from_pairs(vec![(
            "ter_nit".to_string(),
            Value::Text("900".to_string()),
        )])];
        let columns = vec!["ter_nit".to_string()];
        let catalog = ColumnCatalog::default();

        let mut job = ExportJob::csv(&rows, &columns, &catalog, b',');
        let step = job.next().unwrap().unwrap();
        assert!(matches!(step, ExportStep::Finished(bytes) if !bytes.is_empty()));
        assert!(job.next().is_none());
    }
}
