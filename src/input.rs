use anyhow::Context;
use core_types::Record;
use std::path::Path;

/// Reads and validates a JSON array of records.
///
/// A single bad record fails the whole file; the error names the offending value.
pub fn load_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&contents)
        .with_context(|| format!("invalid records in {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = records.len(), "Loaded records.");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn file_with(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_records() {
        let file = file_with(
            r#"[{"date":"2024-01-01","revenue":1000,"expense":600},
                {"date":"2024-02-01","revenue":"1500.50","expense":700}]"#,
        );
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].revenue(), dec!(1500.50));
    }

    #[test]
    fn rejects_negative_amounts() {
        let file = file_with(r#"[{"date":"2024-01-01","revenue":10,"expense":-1}]"#);
        let err = load_records(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("expense must be non-negative"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_records(Path::new("/no/such/records.json")).unwrap_err();
        assert!(err.to_string().contains("/no/such/records.json"));
    }
}
