//! Field deserializers for documents coming back from the store.
//!
//! Forms and imports write blank strings for fields left empty, and some
//! store backends widen calendar dates to full timestamps. Records accept
//! both shapes and always serialize back to the canonical form.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

/// Reads an optional text field, treating blank strings as absent.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Reads an optional calendar date.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp (the date is taken in the
/// timestamp's own offset) or a naive `YYYY-MM-DDTHH:MM:SS` timestamp.
/// Blank strings and `null` are absent.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unrecognized date `{raw}`"))),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::entity::{School, User};

    fn user(json: &str) -> User {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_blank_text_fields_are_absent() {
        assert!(user(r#"{"firstName":"Ada","email":""}"#).email.is_none());
        assert!(user(r#"{"firstName":"Ada","email":null}"#).email.is_none());

        let school: School = serde_json::from_str(r#"{"name":"Riverside","address":" "}"#).unwrap();
        assert!(school.address.is_none());
    }

    #[test]
    fn test_text_field_is_kept_verbatim() {
        let ada = user(r#"{"firstName":"Ada","email":" ada@example.org"}"#);
        assert_eq!(ada.email.as_deref(), Some(" ada@example.org"));
    }

    #[test]
    fn test_birthday_formats() {
        let expected = NaiveDate::from_ymd_opt(2012, 9, 30);

        for raw in [
            "2012-09-30",
            "2012-09-30T00:00:00Z",
            "2012-09-30T23:30:00-05:00",
            "2012-09-30T08:15:00",
            "2012-09-30T08:15:00.250",
        ] {
            let json = format!(r#"{{"firstName":"Ada","birthday":"{raw}"}}"#);
            assert_eq!(user(&json).birthday, expected, "{raw}");
        }
    }

    #[test]
    fn test_birthday_serializes_as_plain_date() {
        let ada = user(r#"{"firstName":"Ada","birthday":"2012-09-30T10:00:00Z"}"#);
        let json = serde_json::to_value(&ada).unwrap();
        assert_eq!(json["birthday"], "2012-09-30");
    }

    #[test]
    fn test_blank_birthday_is_absent() {
        assert!(user(r#"{"firstName":"Ada","birthday":""}"#).birthday.is_none());
    }

    #[test]
    fn test_unrecognized_birthday_is_rejected() {
        let result: Result<User, _> =
            serde_json::from_str(r#"{"firstName":"Ada","birthday":"30.09.2012"}"#);
        assert!(result.unwrap_err().to_string().contains("30.09.2012"));
    }
}
