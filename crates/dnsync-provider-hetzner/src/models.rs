//! Wire types for the Hetzner DNS API v1

use chrono::{DateTime, NaiveDateTime, Utc};
use dnsync_core::traits::{NewRecord, ProviderRecord, Zone};
use serde::{Deserialize, Deserializer, Serialize};

/// `GET /zones`
#[derive(Debug, Deserialize)]
pub(crate) struct ZonesResponse {
    #[serde(default)]
    pub zones: Vec<ApiZone>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// `GET /records`
#[derive(Debug, Deserialize)]
pub(crate) struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<ApiRecord>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// `POST /records`
#[derive(Debug, Deserialize)]
pub(crate) struct RecordResponse {
    pub record: ApiRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub last_page: u32,
}

/// Error envelope, e.g. `{"error": {"message": "record not found", "code": 404}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiZone {
    pub id: String,
    pub name: String,
}

impl From<ApiZone> for Zone {
    fn from(zone: ApiZone) -> Self {
        Zone::new(zone.id, zone.name)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRecord {
    pub id: String,
    #[serde(default)]
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub modified: Option<DateTime<Utc>>,
}

impl From<ApiRecord> for ProviderRecord {
    fn from(record: ApiRecord) -> Self {
        ProviderRecord {
            id: record.id,
            zone_id: record.zone_id,
            record_type: record.record_type,
            name: record.name,
            value: record.value,
            ttl: record.ttl,
            created: record.created,
            modified: record.modified,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordRequest<'a> {
    pub zone_id: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl<'a> From<&'a NewRecord> for CreateRecordRequest<'a> {
    fn from(record: &'a NewRecord) -> Self {
        Self {
            zone_id: &record.zone_id,
            record_type: &record.record_type,
            name: &record.name,
            value: &record.value,
            ttl: record.ttl,
        }
    }
}

/// Parse a timestamp in RFC 3339 or Hetzner's `2020-08-25 12:00:00.000 +0000 UTC` form
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let trimmed = raw.trim_end_matches(" UTC");
    if let Ok(ts) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f %z") {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_hetzner_timestamp() {
        let ts = parse_timestamp("2020-08-25 12:34:56.789 +0000 UTC").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2020, 8, 25));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (12, 34, 56));
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let ts = parse_timestamp("2021-01-02T03:04:05Z").unwrap();
        assert_eq!(ts.year(), 2021);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_record_without_ttl_or_timestamps() {
        let record: ApiRecord = serde_json::from_str(
            r#"{"id": "r1", "type": "A", "name": "@", "value": "1.2.3.4", "zone_id": "z1", "created": ""}"#,
        )
        .unwrap();
        let record = ProviderRecord::from(record);

        assert_eq!(record.ttl, None);
        assert_eq!(record.created, None);
        assert_eq!(record.name, "@");
    }

    #[test]
    fn test_create_request_omits_missing_ttl() {
        let new_record = NewRecord {
            zone_id: "z1".to_string(),
            record_type: "TXT".to_string(),
            name: "@".to_string(),
            value: "hello".to_string(),
            ttl: None,
        };

        let body = serde_json::to_value(CreateRecordRequest::from(&new_record)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"zone_id": "z1", "type": "TXT", "name": "@", "value": "hello"})
        );
    }
}
