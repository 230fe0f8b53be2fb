use crate::models::{Dataset, Record};
use std::{env, fmt, path::PathBuf};
use tokio::fs;
use tracing::info;

const COUNTRY_COLUMN: &str = "Country";
const REGION_COLUMN: &str = "Region";
const CASES_COLUMN: &str = "Total Cases";
const DEATHS_COLUMN: &str = "Total Deaths";

/// Where the CSV comes from. `COVID_DATA_URL` wins over `COVID_DATA_PATH`.
#[derive(Debug, Clone)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub fn resolve_source() -> DataSource {
    if let Ok(url) = env::var("COVID_DATA_URL") {
        return DataSource::Url(url);
    }
    if let Ok(path) = env::var("COVID_DATA_PATH") {
        return DataSource::File(PathBuf::from(path));
    }
    DataSource::File(PathBuf::from("data/covid.csv"))
}

#[derive(Debug)]
pub enum LoadError {
    Fetch(String),
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    BadMeasure {
        row: usize,
        column: &'static str,
        value: String,
    },
    EmptyDataset,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch(err) => write!(f, "fetch failed: {err}"),
            LoadError::Io(err) => write!(f, "read failed: {err}"),
            LoadError::Csv(err) => write!(f, "csv parse failed: {err}"),
            LoadError::MissingColumn(name) => write!(f, "missing column '{name}'"),
            LoadError::BadMeasure { row, column, value } => {
                write!(f, "row {row}: '{column}' is not a number: '{value}'")
            }
            LoadError::EmptyDataset => write!(f, "no data rows"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv(err)
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::Fetch(err.to_string())
    }
}

/// Fetches and parses the dataset exactly once, at startup.
pub async fn load(source: &DataSource) -> Result<Dataset, LoadError> {
    let bytes = match source {
        DataSource::Url(url) => {
            let response = reqwest::get(url).await?.error_for_status()?;
            response.bytes().await?.to_vec()
        }
        DataSource::File(path) => fs::read(path).await?,
    };
    let dataset = parse(&bytes)?;
    info!("loaded {} records from {source}", dataset.len());
    Ok(dataset)
}

/// Parses CSV bytes into records, rejecting malformed measures instead of
/// letting them propagate as zeros into sorts and sums.
pub fn parse(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let country_at = column_index(&headers, COUNTRY_COLUMN)?;
    let region_at = column_index(&headers, REGION_COLUMN)?;
    let cases_at = column_index(&headers, CASES_COLUMN)?;
    let deaths_at = column_index(&headers, DEATHS_COLUMN)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1, first data row is line 2.
        let line = index + 2;
        records.push(Record {
            country: row.get(country_at).unwrap_or_default().to_string(),
            region: row.get(region_at).unwrap_or_default().to_string(),
            total_cases: parse_measure(row.get(cases_at), line, CASES_COLUMN)?,
            total_deaths: parse_measure(row.get(deaths_at), line, DEATHS_COLUMN)?,
        });
    }

    if records.is_empty() {
        return Err(LoadError::EmptyDataset);
    }
    Ok(Dataset::new(records))
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or(LoadError::MissingColumn(name))
}

/// Measures arrive as text, sometimes with thousands separators.
fn parse_measure(
    field: Option<&str>,
    row: usize,
    column: &'static str,
) -> Result<u64, LoadError> {
    let raw = field.unwrap_or_default();
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    digits.parse().map_err(|_| LoadError::BadMeasure {
        row,
        column,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Country,Region,Total Cases,Total Deaths
USA,Americas,\"94,152,573\",\"1,040,506\"
India,Asia,44516479,528250
";

    #[test]
    fn parse_reads_all_rows() {
        let dataset = parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].country, "USA");
        assert_eq!(dataset.records[0].region, "Americas");
        assert_eq!(dataset.records[1].total_deaths, 528250);
    }

    #[test]
    fn parse_coerces_separated_numbers() {
        let dataset = parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.records[0].total_cases, 94152573);
        assert_eq!(dataset.records[0].total_deaths, 1040506);
    }

    #[test]
    fn parse_rejects_non_numeric_measure() {
        let csv = "Country,Region,Total Cases,Total Deaths\nUSA,Americas,N/A,12\n";
        let err = parse(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::BadMeasure { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Total Cases");
                assert_eq!(value, "N/A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_missing_column() {
        let csv = "Country,Total Cases,Total Deaths\nUSA,1,2\n";
        let err = parse(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Region")));
    }

    #[test]
    fn parse_rejects_empty_input() {
        let csv = "Country,Region,Total Cases,Total Deaths\n";
        assert!(matches!(
            parse(csv.as_bytes()),
            Err(LoadError::EmptyDataset)
        ));
    }
}
