//! Tabular inputs: the per-day price history and the per-flight summary.

use crate::util::{lenient_days, lenient_f32};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::{fs::File, io, path::Path};

pub const PRICE_HISTORY_FILE: &str = "flights_by_day_to_departure.csv";
pub const FLIGHT_INFO_FILE: &str = "flight_info.csv";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One observed price of one flight at a given lead time.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub flight_id: String,
    pub price: f32,
    pub days_to_departure: u32,
    pub departure: DateTime<Utc>,
}

/// Per-flight aggregate feeding the brush area chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub departure: DateTime<Utc>,
    pub arrival: Option<DateTime<Utc>>,
    pub departure_rounded: Option<DateTime<Utc>>,
    pub mean_price: f32,
    pub median_price: f32,
    pub sum_price: f32,
    pub sd_price: f32,
    pub end_price: f32,
}

#[derive(Deserialize)]
struct PriceRecord {
    #[serde(rename = "flightIdUnique")]
    flight_id: String,
    #[serde(rename = "timeToDepartureDays", deserialize_with = "de_days")]
    days_to_departure: u32,
    #[serde(rename = "price", deserialize_with = "de_f32")]
    price: f32,
    #[serde(rename = "departure", deserialize_with = "de_timestamp")]
    departure: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct SummaryRecord {
    #[serde(rename = "departure", deserialize_with = "de_timestamp")]
    departure: Option<DateTime<Utc>>,
    #[serde(rename = "arrival", default, deserialize_with = "de_timestamp")]
    arrival: Option<DateTime<Utc>>,
    #[serde(rename = "departureRounded", default, deserialize_with = "de_timestamp")]
    departure_rounded: Option<DateTime<Utc>>,
    #[serde(rename = "meanPrice", default, deserialize_with = "de_f32")]
    mean_price: f32,
    #[serde(rename = "medianPrice", default, deserialize_with = "de_f32")]
    median_price: f32,
    #[serde(rename = "sumPrice", default, deserialize_with = "de_f32")]
    sum_price: f32,
    #[serde(rename = "sdPrice", default, deserialize_with = "de_f32")]
    sd_price: f32,
    #[serde(rename = "endPrice", default, deserialize_with = "de_f32")]
    end_price: f32,
}

fn de_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(lenient_f32(&raw))
}

fn de_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(lenient_days(&raw))
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_timestamp(&raw))
}

/// Accepts `YYYY-MM-DDTHH:MM:SSZ`, then any RFC 3339 timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

fn csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(dir: &Path, file: &str) -> Result<File, LoadError> {
    let path = dir.join(file);
    File::open(&path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_price_points<R: io::Read>(reader: R) -> Result<Vec<PricePoint>, LoadError> {
    let mut points = Vec::new();
    let mut skipped = 0usize;

    for record in csv_reader(reader).deserialize::<PriceRecord>() {
        let record = record?;

        let Some(departure) = record.departure else {
            skipped += 1;
            continue;
        };

        points.push(PricePoint {
            flight_id: record.flight_id,
            price: record.price.max(0.0),
            days_to_departure: record.days_to_departure,
            departure,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} price rows without a parseable departure");
    }

    Ok(points)
}

pub fn read_summary_rows<R: io::Read>(reader: R) -> Result<Vec<SummaryRow>, LoadError> {
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in csv_reader(reader).deserialize::<SummaryRecord>() {
        let record = record?;

        let Some(departure) = record.departure else {
            skipped += 1;
            continue;
        };

        rows.push(SummaryRow {
            departure,
            arrival: record.arrival,
            departure_rounded: record.departure_rounded,
            mean_price: record.mean_price,
            median_price: record.median_price,
            sum_price: record.sum_price,
            sd_price: record.sd_price,
            end_price: record.end_price,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} summary rows without a parseable departure");
    }

    Ok(rows)
}

pub fn load_price_points(dir: &Path) -> Result<Vec<PricePoint>, LoadError> {
    let points = read_price_points(open(dir, PRICE_HISTORY_FILE)?)?;
    log::info!("Read {} price points from {PRICE_HISTORY_FILE}", points.len());
    Ok(points)
}

pub fn load_summary_rows(dir: &Path) -> Result<Vec<SummaryRow>, LoadError> {
    let rows = read_summary_rows(open(dir, FLIGHT_INFO_FILE)?)?;
    log::info!("Read {} summary rows from {FLIGHT_INFO_FILE}", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn price_rows_coerce_bad_numbers() {
        let csv = "\
flightIdUnique,timeToDepartureDays,price,departure
LH400-0601,3,250.5,2019-06-01T10:30:00Z
LH400-0601,abc,,2019-06-01T10:30:00Z
LH400-0601,1,-12,2019-06-01T10:30:00Z
";
        let points = read_price_points(csv.as_bytes()).expect("valid csv");

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].price, 250.5);
        assert_eq!(points[0].days_to_departure, 3);
        assert_eq!(points[1].price, 0.0);
        assert_eq!(points[1].days_to_departure, 0);
        assert_eq!(points[2].price, 0.0);
        assert_eq!(
            points[0].departure,
            Utc.with_ymd_and_hms(2019, 6, 1, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn rows_without_departure_are_skipped() {
        let csv = "\
flightIdUnique,timeToDepartureDays,price,departure
A,1,100,not-a-date
B,1,120,2019-06-02T08:00:00Z
";
        let points = read_price_points(csv.as_bytes()).expect("valid csv");

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].flight_id, "B");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv = "\
flightIdUnique,price,departure
A,100,2019-06-01T08:00:00Z
";
        assert!(matches!(
            read_price_points(csv.as_bytes()),
            Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn summary_optional_columns_default() {
        let csv = "\
departure,arrival,endPrice,meanPrice
2019-06-01T06:00:00Z,2019-06-01T08:10:00Z,NaN,210.25
2019-06-02T06:00:00Z,,180,
";
        let rows = read_summary_rows(csv.as_bytes()).expect("valid csv");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].end_price, 0.0);
        assert_eq!(rows[0].mean_price, 210.25);
        assert_eq!(rows[0].sd_price, 0.0);
        assert!(rows[0].arrival.is_some());
        assert!(rows[0].departure_rounded.is_none());
        assert_eq!(rows[1].end_price, 180.0);
        assert!(rows[1].arrival.is_none());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_price_points(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains(PRICE_HISTORY_FILE));
    }

    #[test]
    fn rfc3339_offsets_are_accepted() {
        let parsed = parse_timestamp("2019-06-01T12:00:00+02:00");
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2019, 6, 1, 10, 0, 0).unwrap()));
    }
}
