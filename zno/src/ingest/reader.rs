use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, error};
use zno_config::shared::IngestConfig;

use crate::error::{ErrorKind, ZnoResult};
use crate::types::SourceRecord;
use crate::{bail, zno_error};

/// Header names of the export, in the order of [`crate::types::SOURCE_COLUMNS`].
const EXPECTED_HEADERS: [&str; 25] = [
    "OUTID",
    "Birth",
    "SexTypeName",
    "RegName",
    "AREANAME",
    "TERNAME",
    "RegTypeName",
    "TerTypeName",
    "ClassProfileNAME",
    "ClassLangName",
    "EONAME",
    "EOTypeName",
    "EORegName",
    "EOAreaName",
    "EOTerName",
    "EOParent",
    "UkrTest",
    "UkrTestStatus",
    "UkrBall100",
    "UkrBall12",
    "UkrBall",
    "UkrPTName",
    "UkrPTRegName",
    "UkrPTAreaName",
    "UkrPTTerName",
];

/// Records parsed from an export.
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    pub records: Vec<SourceRecord>,
    /// Rows dropped because they could not be parsed.
    pub skipped: usize,
}

/// Reads the semicolon separated export into [`SourceRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct CsvReader {
    delimiter: u8,
    row_limit: Option<usize>,
}

/// Strips the byte order mark and stray quoting the export leaves on its first header.
fn normalize_header(header: &str) -> &str {
    header
        .trim_start_matches('\u{feff}')
        .trim_matches('"')
        .trim()
}

impl CsvReader {
    pub fn new(config: &IngestConfig) -> ZnoResult<Self> {
        let Ok(delimiter) = u8::try_from(config.delimiter) else {
            bail!(
                ErrorKind::ConfigError,
                "CSV delimiter must be a single byte",
                config.delimiter
            );
        };

        Ok(Self {
            delimiter,
            row_limit: config.row_limit,
        })
    }

    pub fn read_path(&self, path: &Path) -> ZnoResult<ParsedRecords> {
        let file = File::open(path).map_err(|err| {
            zno_error!(
                ErrorKind::IoError,
                "Opening the CSV export failed",
                path.display(),
                source: err
            )
        })?;

        self.read(file)
    }

    /// Parses rows until the input ends or the row limit is reached.
    ///
    /// Only successfully parsed rows count towards the limit. A malformed row is logged and
    /// skipped; a missing column in the header or an I/O failure aborts the read.
    pub fn read<R>(&self, input: R) -> ZnoResult<ParsedRecords>
    where
        R: io::Read,
    {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(input);

        let headers: StringRecord = reader.headers()?.iter().map(normalize_header).collect();
        let missing: Vec<_> = EXPECTED_HEADERS
            .iter()
            .filter(|expected| !headers.iter().any(|header| header == **expected))
            .copied()
            .collect();
        if !missing.is_empty() {
            bail!(
                ErrorKind::MalformedSourceRecord,
                "CSV header is missing columns",
                missing.join(", ")
            );
        }
        reader.set_headers(headers);

        let mut parsed = ParsedRecords::default();
        for result in reader.deserialize::<SourceRecord>() {
            if self
                .row_limit
                .is_some_and(|limit| parsed.records.len() >= limit)
            {
                debug!(limit = ?self.row_limit, "row limit reached");
                break;
            }

            match result {
                Ok(record) => parsed.records.push(record),
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    let line = err.position().map(|position| position.line());
                    error!(?line, error = %err, "skipping malformed csv row");
                    parsed.skipped += 1;
                }
            }
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_line() -> String {
        EXPECTED_HEADERS.join(";")
    }

    fn row(out_id: &str) -> String {
        let mut fields = vec![out_id.to_string()];
        fields.extend((1..EXPECTED_HEADERS.len()).map(|i| format!("v{i}")));
        fields.join(";")
    }

    fn reader(row_limit: Option<usize>) -> CsvReader {
        CsvReader::new(&IngestConfig {
            delimiter: ';',
            row_limit,
        })
        .unwrap()
    }

    #[test]
    fn bom_and_quoted_first_header_are_tolerated() {
        let mut headers = EXPECTED_HEADERS.map(str::to_string);
        headers[0] = "\u{feff}\"OUTID\"".to_string();
        let input = format!("{}\n{}\n", headers.join(";"), row("X1"));

        let parsed = reader(None).read(input.as_bytes()).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].out_id, "X1");
        assert_eq!(parsed.records[0].birth, "v1");
        assert_eq!(parsed.records[0].ukr_pt_ter_name, "v24");
    }

    #[test]
    fn row_limit_stops_reading() {
        let input = format!(
            "{}\n{}\n{}\n{}\n",
            header_line(),
            row("X1"),
            row("X2"),
            row("X3")
        );

        let parsed = reader(Some(2)).read(input.as_bytes()).unwrap();

        let ids: Vec<_> = parsed.records.iter().map(|r| r.out_id.as_str()).collect();
        assert_eq!(ids, vec!["X1", "X2"]);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let input = format!(
            "{}\n{}\nX2;too;short\n{}\n",
            header_line(),
            row("X1"),
            row("X3")
        );

        let parsed = reader(None).read(input.as_bytes()).unwrap();

        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].out_id, "X3");
    }

    #[test]
    fn missing_header_column_is_fatal() {
        let input = format!("{}\n", EXPECTED_HEADERS[1..].join(";"));

        let err = reader(None).read(input.as_bytes()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedSourceRecord);
        assert_eq!(err.detail(), Some("OUTID"));
    }

    #[test]
    fn empty_fields_stay_empty() {
        let empty_row = ";".repeat(EXPECTED_HEADERS.len() - 1);
        let input = format!("{}\n{}\n", header_line(), empty_row);

        let parsed = reader(None).read(input.as_bytes()).unwrap();

        assert_eq!(parsed.records, vec![SourceRecord::default()]);
    }
}
