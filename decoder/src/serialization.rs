use std::io::Write;

use csv::WriterBuilder;

use crate::error::ParseError;
use crate::extract::BankExtract;

const EXTRACT_HEADERS: [&str; 5] = ["date", "narrative", "debit", "credit", "running_balance"];

impl BankExtract {
    /// Записывает строки выписки в CSV: заголовок и по строке на проводку.
    ///
    /// Даты в ISO (`YYYY-MM-DD`), суммы с `.` как разделителем.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ParseError> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

        wtr.write_record(EXTRACT_HEADERS)?;

        for row in &self.rows {
            wtr.write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.narrative.clone(),
                row.debit.to_string(),
                row.credit.to_string(),
                row.running_balance.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
