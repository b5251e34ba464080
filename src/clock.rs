//! Wall-clock time in the configured timezone

use crate::error::{NordplugError, Result};
use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| NordplugError::validation("timezone", format!("Unknown timezone: {}", name)))
}

/// Current local date and time in `timezone`, or process local time when unset
pub fn wall_clock_now(timezone: Option<&str>) -> Result<NaiveDateTime> {
    match timezone {
        Some(name) => {
            let tz = parse_timezone(name)?;
            Ok(Utc::now().with_timezone(&tz).naive_local())
        }
        None => Ok(Local::now().naive_local()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iana_names() {
        assert!(parse_timezone("Europe/Tallinn").is_ok());
        assert!(parse_timezone("UTC").is_ok());
        assert!(parse_timezone("Nowhere/Special").is_err());
    }

    #[test]
    fn utc_wall_clock_matches_utc_now() {
        let before = Utc::now().naive_utc();
        let now = wall_clock_now(Some("UTC")).unwrap();
        let after = Utc::now().naive_utc();
        assert!(now >= before && now <= after);
    }
}
