use std::io::Error;
use std::path::Path;

/// Writes an expense CSV with the standard header and the given rows.
pub fn write_expenses(path: &Path, rows: &[[&str; 4]]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["description", "amount", "payer", "participants"])?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
