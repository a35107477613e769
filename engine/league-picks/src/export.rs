//! CSV sheet writing shared by every output table

use anyhow::{Context, Result};
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

/// Placeholder for values that were not available upstream
pub const NOT_AVAILABLE: &str = "-";

/// Render an optional value, `-` when absent
pub fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

/// Write a header row followed by `records` into any writer
pub fn write_sheet<W, H, R>(writer: W, headers: H, records: R) -> Result<()>
where
    W: Write,
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    R: IntoIterator<Item = Vec<String>>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(headers).context("Failed to write CSV header")?;
    for record in records {
        csv_writer.write_record(&record).context("Failed to write CSV record")?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write a sheet to `path`, creating parent directories
pub fn write_sheet_file<H, R>(path: &Path, headers: H, records: R) -> Result<()>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    R: IntoIterator<Item = Vec<String>>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    write_sheet(std::io::BufWriter::new(file), headers, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(7)), "7");
        assert_eq!(or_dash(None::<u32>), "-");
        assert_eq!(yes_no(true), "Yes");
        assert_eq!(yes_no(false), "No");
    }

    #[test]
    fn test_header_only_sheet() {
        let mut out = Vec::new();
        write_sheet(&mut out, ["Manager Name", "Gameweek"], Vec::<Vec<String>>::new()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Manager Name,Gameweek\n");
    }
}
