use crate::analysis::sla::{is_breach, SlaPolicy};
use crate::error::LoadError;
use crate::models::dataset::LoadedDataset;
use crate::models::ticket::{RawTicket, Ticket, REQUIRED_COLUMNS};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Load and normalize the ticket file at `path`
pub fn load_tickets(path: &Path, policy: &SlaPolicy) -> Result<LoadedDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_tickets(file, path, policy)?;
    log::info!(
        "Loaded {} tickets from {} ({} of {} rows dropped)",
        dataset.tickets.len(),
        path.display(),
        dataset.rows_dropped,
        dataset.rows_read
    );
    Ok(dataset)
}

/// Normalize ticket rows from any CSV source; `path` is only used for errors
pub fn read_tickets<R: Read>(
    input: R,
    path: &Path,
    policy: &SlaPolicy,
) -> Result<LoadedDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| record_error(path, e))?
        .clone();

    if headers.is_empty() {
        return Err(LoadError::malformed(path, "missing header row"));
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::malformed(
            path,
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    let mut tickets = Vec::new();
    let mut rows_read = 0;

    for record in reader.deserialize::<RawTicket>() {
        let raw = record.map_err(|e| record_error(path, e))?;
        rows_read += 1;

        let ticket_id = raw.ticket_id.clone();
        match normalize_ticket(raw, policy) {
            Some(ticket) => tickets.push(ticket),
            None => log::debug!(
                "Dropping ticket {} without a non-negative resolution time",
                ticket_id.as_deref().unwrap_or("<no id>")
            ),
        }
    }

    Ok(LoadedDataset {
        path: path.to_path_buf(),
        rows_dropped: rows_read - tickets.len(),
        rows_read,
        tickets,
    })
}

/// Derive timing and SLA fields. Returns `None` for rows the dataset drops.
pub fn normalize_ticket(raw: RawTicket, policy: &SlaPolicy) -> Option<Ticket> {
    let purchased_at = raw.date_of_purchase.as_deref().and_then(parse_timestamp);
    let first_response_at = raw.first_response_time.as_deref().and_then(parse_timestamp);
    let resolved_at = raw.time_to_resolution.as_deref().and_then(parse_timestamp);

    let resolution_after_response_hrs = elapsed_hours(first_response_at, resolved_at)?;
    if resolution_after_response_hrs < 0 {
        return None;
    }

    let priority = clean(raw.priority);
    let sla_threshold_hrs = policy.threshold_for(priority.as_deref());

    Some(Ticket {
        ticket_id: clean(raw.ticket_id).unwrap_or_default(),
        customer_name: clean(raw.customer_name),
        channel: clean(raw.channel),
        priority,
        ticket_type: clean(raw.ticket_type),
        subject: clean(raw.subject),
        product: clean(raw.product),
        status: clean(raw.status),
        purchased_at,
        first_response_at,
        resolved_at,
        satisfaction_rating: raw.satisfaction_rating.as_deref().and_then(parse_rating),
        created_at: purchased_at,
        response_after_creation_hrs: elapsed_hours(purchased_at, first_response_at),
        resolution_after_response_hrs,
        sla_threshold_hrs,
        sla_breach: is_breach(resolution_after_response_hrs, sla_threshold_hrs),
    })
}

/// Parse a timestamp cell; unrecognized text is treated as missing
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Whole hours between two timestamps, truncated toward zero
pub fn elapsed_hours(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Option<i64> {
    let delta = to? - from?;
    Some(delta.num_seconds() / 3600)
}

/// Ratings are whole numbers 1–5; "4" and "4.0" are both accepted
pub fn parse_rating(value: &str) -> Option<u8> {
    let rating: f64 = value.trim().parse().ok()?;
    if !(1.0..=5.0).contains(&rating) || rating.fract() != 0.0 {
        return None;
    }
    Some(rating as u8)
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn record_error(path: &Path, err: csv::Error) -> LoadError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => LoadError::malformed(path, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Ticket ID,Customer Name,Customer Email,Ticket Channel,Ticket Priority,Ticket Type,Ticket Subject,Product Purchased,Ticket Status,Date of Purchase,First Response Time,Time to Resolution,Customer Satisfaction Rating";

    fn row(id: u32, priority: &str, first: &str, resolved: &str, rating: &str) -> String {
        format!(
            "{id},Jane Doe,jane@example.com,Email,{priority},Technical issue,Network problem,GoPro Hero,Closed,2023-06-01,{first},{resolved},{rating}"
        )
    }

    fn parse(rows: &[String]) -> Result<LoadedDataset, LoadError> {
        let mut csv = String::from(HEADER);
        for r in rows {
            csv.push('\n');
            csv.push_str(r);
        }
        read_tickets(csv.as_bytes(), Path::new("tickets.csv"), &SlaPolicy::default())
    }

    #[test]
    fn derives_elapsed_hours_and_breach() {
        let data = parse(&[row(1, "Critical", "2023-06-01 10:00:00", "2023-06-01 15:30:00", "4.0")])
            .expect("parse tickets");

        let ticket = &data.tickets[0];
        assert_eq!(ticket.response_after_creation_hrs, Some(10));
        assert_eq!(ticket.resolution_after_response_hrs, 5);
        assert_eq!(ticket.sla_threshold_hrs, 4);
        assert!(ticket.sla_breach);
        assert_eq!(ticket.satisfaction_rating, Some(4));
        assert_eq!(ticket.created_at, ticket.purchased_at);
    }

    #[test]
    fn drops_negative_and_missing_resolution_rows() {
        let data = parse(&[
            row(1, "High", "2023-06-01 10:00:00", "2023-06-01 09:00:00", ""),
            row(2, "High", "not a date", "2023-06-01 09:00:00", ""),
            row(3, "High", "2023-06-01 10:00:00", "", ""),
            row(4, "High", "2023-06-01 10:00:00", "2023-06-02 12:00:00", "2"),
        ])
        .expect("parse tickets");

        assert_eq!(data.rows_read, 4);
        assert_eq!(data.rows_dropped, 3);
        assert_eq!(data.tickets.len(), 1);
        assert_eq!(data.tickets[0].ticket_id, "4");
        assert!(data.tickets.iter().all(|t| t.resolution_after_response_hrs >= 0));
    }

    #[test]
    fn sub_hour_negative_durations_truncate_to_zero() {
        let data = parse(&[row(1, "Low", "2023-06-01 10:30:00", "2023-06-01 10:00:00", "")])
            .expect("parse tickets");
        assert_eq!(data.tickets.len(), 1);
        assert_eq!(data.tickets[0].resolution_after_response_hrs, 0);
    }

    #[test]
    fn missing_purchase_date_leaves_created_fields_missing() {
        let raw = RawTicket {
            ticket_id: Some("9".into()),
            first_response_time: Some("2023-06-01 10:00:00".into()),
            time_to_resolution: Some("2023-06-01 20:00:00".into()),
            date_of_purchase: Some("??".into()),
            ..RawTicket::default()
        };
        let ticket = normalize_ticket(raw, &SlaPolicy::default()).expect("kept");
        assert_eq!(ticket.created_at, None);
        assert_eq!(ticket.response_after_creation_hrs, None);
        assert_eq!(ticket.sla_threshold_hrs, 72);
        assert!(!ticket.sla_breach);
    }

    #[test]
    fn parses_common_timestamp_forms() {
        assert!(parse_timestamp("2023-06-01 12:15:36").is_some());
        assert!(parse_timestamp("2023-06-01T12:15:36.250").is_some());
        assert!(parse_timestamp("2023-06-01 12:15").is_some());
        assert!(parse_timestamp("06/01/2023 12:15").is_some());
        assert!(parse_timestamp("2023-06-01T12:15:36+02:00").is_some());
        assert_eq!(
            parse_timestamp("2021-03-22"),
            NaiveDate::from_ymd_opt(2021, 3, 22).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn rejects_ratings_outside_whole_one_to_five() {
        assert_eq!(parse_rating("5"), Some(5));
        assert_eq!(parse_rating(" 3.0 "), Some(3));
        assert_eq!(parse_rating("0"), None);
        assert_eq!(parse_rating("6"), None);
        assert_eq!(parse_rating("2.5"), None);
        assert_eq!(parse_rating("great"), None);
    }

    #[test]
    fn wrong_delimiter_is_malformed() {
        let csv = HEADER.replace(',', ";");
        let err = read_tickets(csv.as_bytes(), Path::new("t.csv"), &SlaPolicy::default())
            .expect_err("semicolon header");
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert!(err.to_string().contains("missing required columns"));
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = read_tickets("".as_bytes(), Path::new("t.csv"), &SlaPolicy::default())
            .expect_err("no header");
        assert!(err.to_string().contains("missing header row"));
    }

    #[test]
    fn ragged_record_is_malformed() {
        let csv = format!("{HEADER}\n1,Jane,Email");
        let err = read_tickets(csv.as_bytes(), Path::new("t.csv"), &SlaPolicy::default())
            .expect_err("short record");
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_tickets(Path::new("/definitely/not/here.csv"), &SlaPolicy::default())
            .expect_err("missing file");
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
