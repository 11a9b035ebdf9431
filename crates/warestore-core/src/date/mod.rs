pub mod filename;

use chrono::{DateTime, Local, NaiveDate};

/// Date format WhatsApp encodes into exported file names.
pub const TOKEN_FORMAT: &str = "%Y%m%d";

/// Pick the timestamp to restore: the existing modified time when its
/// calendar date already matches `token`, otherwise midday local time on the
/// date the token names. `None` means the token is not a valid date.
pub fn resolve(token: &str, modified: Option<DateTime<Local>>) -> Option<DateTime<Local>> {
    if let Some(mtime) = modified {
        if mtime.format(TOKEN_FORMAT).to_string() == token {
            return Some(mtime);
        }
    }
    midday_on(token)
}

/// Filename dates carry no time of day; the restored stamp lands at noon.
fn midday_on(token: &str) -> Option<DateTime<Local>> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(token, TOKEN_FORMAT).ok()?;
    date.and_hms_opt(12, 0, 0)?
        .and_local_timezone(Local)
        .single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_matching_mtime_kept_verbatim() {
        let mtime = Local.with_ymd_and_hms(2019, 1, 5, 18, 33, 27).unwrap();
        assert_eq!(resolve("20190105", Some(mtime)), Some(mtime));
    }

    #[test]
    fn test_mismatching_mtime_falls_back_to_noon() {
        let mtime = Local.with_ymd_and_hms(2021, 1, 1, 8, 0, 0).unwrap();
        let noon = Local.with_ymd_and_hms(2020, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(resolve("20200615", Some(mtime)), Some(noon));
    }

    #[test]
    fn test_missing_mtime_falls_back_to_noon() {
        let noon = Local.with_ymd_and_hms(2020, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(resolve("20200615", None), Some(noon));
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(resolve("2020615", None), None);
        assert_eq!(resolve("202006155", None), None);
        assert_eq!(resolve("20201315", None), None); // month 13
        assert_eq!(resolve("20200230", None), None); // Feb 30
        assert_eq!(resolve("2020a615", None), None);
        assert_eq!(resolve("", None), None);
    }

    #[test]
    fn test_restoring_twice_is_a_no_op() {
        let first = resolve("20200615", None).unwrap();
        assert_eq!(resolve("20200615", Some(first)), Some(first));
    }
}
