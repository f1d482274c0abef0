use chrono::{Local, NaiveTime, Timelike};

/// Returns the current local time as a short `HH:MM` string.
#[inline]
pub fn short_timestamp() -> String {
    format_short(Local::now().time())
}

fn format_short(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_short() {
        let time = NaiveTime::from_hms_opt(9, 5, 59).unwrap();
        assert_eq!(format_short(time), "09:05");
        let time = NaiveTime::from_hms_opt(23, 40, 0).unwrap();
        assert_eq!(format_short(time), "23:40");
    }

    #[test]
    fn test_short_timestamp_shape() {
        let ts = short_timestamp();
        assert_eq!(ts.len(), 5);
        assert_eq!(ts.as_bytes()[2], b':');
        assert!(ts.chars().filter(|c| *c != ':').all(|c| c.is_ascii_digit()));
    }
}
