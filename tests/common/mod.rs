use std::fs::File;
use std::io::Error;
use std::path::Path;

/// Writes `rows` charges of 1 point each, spread round-robin over `users`.
pub fn generate_commands_csv(path: &Path, users: i64, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["type", "user", "amount"])?;

    for i in 0..rows {
        let user = (i as i64 % users) + 1;
        wtr.write_record(["charge", &user.to_string(), "1"])?;
    }

    wtr.flush()?;
    Ok(())
}
