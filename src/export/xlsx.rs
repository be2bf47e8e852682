use rust_xlsxwriter::{Workbook, Worksheet};

use crate::config::ColumnCatalog;
use crate::error::Result;
use crate::export::job::ExportStep;
use crate::report::{Row, Value};

/// Rows written to the worksheet per chunk.
pub const CHUNK_SIZE: usize = 5000;
/// Chunks processed before control returns to the caller.
const CHUNKS_PER_POLL: usize = 3;
/// Fixed display width for every column.
const COLUMN_WIDTH: f64 = 15.0;

enum Phase {
    Chunks,
    Widths,
    Finish,
    Done,
}

/// Incremental XLSX build over a row array. Each poll writes up to three
/// chunks and reports progress scaled to 90%; a 98% step follows for layout,
/// then the terminal step carries the compressed workbook bytes. Dropping
/// the job mid-flight discards all of it.
pub struct XlsxJob<'a> {
    rows: &'a [Row],
    columns: &'a [String],
    catalog: &'a ColumnCatalog,
    sheet_name: &'a str,
    worksheet: Option<Worksheet>,
    chunks_done: usize,
    total_chunks: usize,
    phase: Phase,
}

impl<'a> XlsxJob<'a> {
    pub fn new(
        rows: &'a [Row],
        columns: &'a [String],
        catalog: &'a ColumnCatalog,
        sheet_name: &'a str,
    ) -> XlsxJob<'a> {
        XlsxJob {
            rows,
            columns,
            catalog,
            sheet_name,
            worksheet: Some(Worksheet::new()),
            chunks_done: 0,
            total_chunks: rows.len().div_ceil(CHUNK_SIZE),
            phase: Phase::Chunks,
        }
    }

    fn write_chunk(&mut self) -> Result<()> {
        let worksheet = self
            .worksheet
            .as_mut()
            .expect("worksheet taken before chunks finished");

        if self.chunks_done == 0 {
            worksheet.set_name(self.sheet_name)?;
            for (col, key) in self.columns.iter().enumerate() {
                worksheet.write_string(0, col as u16, self.catalog.describe(key))?;
            }
        }

        let start = self.chunks_done * CHUNK_SIZE;
        let end = (start + CHUNK_SIZE).min(self.rows.len());

        for (offset, row) in self.rows[start..end].iter().enumerate() {
            let sheet_row = (start + offset + 1) as u32; // row 0 is the header
            for (col, key) in self.columns.iter().enumerate() {
                let col = col as u16;
                match row.get(key) {
                    Some(Value::Number(n)) => {
                        worksheet.write_number(sheet_row, col, *n)?;
                    }
                    Some(Value::Null) | None => {
                        worksheet.write_string(sheet_row, col, "")?;
                    }
                    Some(value) => {
                        worksheet.write_string(sheet_row, col, value.raw())?;
                    }
                }
            }
        }

        self.chunks_done += 1;
        Ok(())
    }

    fn chunk_progress(&self) -> u8 {
        ((self.chunks_done as f64 / self.total_chunks as f64) * 90.0).round() as u8
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let worksheet = self
            .worksheet
            .take()
            .expect("worksheet taken before finish");
        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        Ok(workbook.save_to_buffer()?)
    }
}

impl Iterator for XlsxJob<'_> {
    type Item = Result<ExportStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rows.is_empty() {
            return None;
        }

        match self.phase {
            Phase::Chunks => {
                for _ in 0..CHUNKS_PER_POLL {
                    if self.chunks_done == self.total_chunks {
                        break;
                    }
                    if let Err(e) = self.write_chunk() {
                        self.phase = Phase::Done;
                        return Some(Err(e));
                    }
                }
                if self.chunks_done == self.total_chunks {
                    self.phase = Phase::Widths;
                }
                Some(Ok(ExportStep::Progress(self.chunk_progress())))
            }
            Phase::Widths => {
                let worksheet = self
                    .worksheet
                    .as_mut()
                    .expect("worksheet taken before widths");
                for col in 0..self.columns.len() {
                    if let Err(e) = worksheet.set_column_width(col as u16, COLUMN_WIDTH) {
                        self.phase = Phase::Done;
                        return Some(Err(e.into()));
                    }
                }
                self.phase = Phase::Finish;
                Some(Ok(ExportStep::Progress(98)))
            }
            Phase::Finish => {
                self.phase = Phase::Done;
                match self.finish() {
                    Ok(bytes) => Some(Ok(ExportStep::Finished(bytes))),
                    Err(e) => Some(Err(e)),
                }
            }
            Phase::Done => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnCatalog;

    fn columns() -> Vec<String> {
        vec!["ter_nit".to_string(), "sal_can".to_string()]
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                Row::from_pairs(vec![
                    ("ter_nit".to_string(), Value::Text(format!("nit-{i}"))),
                    ("sal_can".to_string(), Value::Number(i as f64)),
                ])
            })
            .collect()
    }

    fn drain(job: XlsxJob) -> Vec<ExportStep> {
        job.map(|step| step.unwrap()).collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        let rows: Vec<Row> = Vec::new();
        let cols = columns();
        let catalog = ColumnCatalog::default();
        let mut job = XlsxJob::new(&rows, &cols, &catalog, "Report");
        assert!(job.next().is_none());
    }

    #[test]
    fn progress_climbs_to_a_single_terminal_step() {
        let data = rows(12_000); // 3 chunks
        let cols = columns();
        let catalog = ColumnCatalog::default();
        let steps = drain(XlsxJob::new(&data, &cols, &catalog, "Report"));

        let mut finished = 0;
        let mut last_progress = 0u8;
        for step in &steps {
            match step {
                ExportStep::Progress(p) => {
                    assert!(*p >= last_progress, "progress went backwards");
                    last_progress = *p;
                }
                ExportStep::Finished(bytes) => {
                    finished += 1;
                    // xlsx containers are zip files
                    assert_eq!(&bytes[..2], b"PK");
                }
            }
        }
        assert_eq!(finished, 1);
        assert_eq!(last_progress, 98);
        assert!(matches!(steps.last(), Some(ExportStep::Finished(_))));
    }

    #[test]
    fn small_exports_finish_in_three_polls() {
        let data = rows(5);
        let cols = columns();
        let catalog = ColumnCatalog::default();
        let steps = drain(XlsxJob::new(&data, &cols, &catalog, "Report"));

        assert_eq!(steps.len(), 3); // 90, 98, bytes
        assert!(matches!(steps[0], ExportStep::Progress(90)));
        assert!(matches!(steps[1], ExportStep::Progress(98)));
    }
}
