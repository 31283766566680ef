use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One holiday observance: a country, a holiday name, and a month-day.
/// Holidays carry no year; the same calendar applies every year.
#[derive(Debug, Clone)]
struct HolidayEntry {
    country: String,
    holiday: String,
    month: u32,
    day: u32,
}

/// Company holiday calendar, loaded once at startup from a CSV export
/// with columns Country, Holiday, Date (Date as "Weekday, Month Day").
/// Blank country cells inherit the previous row's country; rows whose
/// date fails to parse are dropped.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    entries: Vec<HolidayEntry>,
}

impl HolidayCalendar {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Holiday(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut current_country = String::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_csv_line(line);
            if fields.len() < 3 {
                continue;
            }

            // Forward-fill the country column.
            if !fields[0].trim().is_empty() {
                current_country = fields[0].trim().to_string();
            }

            // Dropping unparsable dates also drops the header row.
            let Some((month, day)) = parse_month_day(fields[2].trim()) else {
                continue;
            };

            entries.push(HolidayEntry {
                country: current_country.clone(),
                holiday: fields[1].trim().to_string(),
                month,
                day,
            });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Holidays whose month-day falls within the range, formatted as
    /// `"<Month Day> | <Holiday> (<countries>), ..."` and sorted by month
    /// then day. Only month and day are compared; when the from month-day
    /// is greater than the to month-day the range wraps across the year
    /// boundary (e.g. Oct 01 .. Feb 15).
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<String> {
        let from_md = (from.month(), from.day());
        let to_md = (to.month(), to.day());
        let wraps = from_md > to_md;

        let mut selected: Vec<&HolidayEntry> = self
            .entries
            .iter()
            .filter(|e| {
                let md = (e.month, e.day);
                if wraps {
                    md >= from_md || md <= to_md
                } else {
                    md >= from_md && md <= to_md
                }
            })
            .collect();
        selected.sort_by_key(|e| (e.month, e.day));

        // Merge same-date entries: holiday name -> countries, preserving
        // first-seen holiday order within the date.
        let mut lines: Vec<String> = Vec::new();
        let mut i = 0;
        while i < selected.len() {
            let (month, day) = (selected[i].month, selected[i].day);
            let mut holidays: Vec<(String, Vec<String>)> = Vec::new();
            while i < selected.len() && (selected[i].month, selected[i].day) == (month, day) {
                let entry = selected[i];
                match holidays.iter_mut().find(|(name, _)| *name == entry.holiday) {
                    Some((_, countries)) => countries.push(entry.country.clone()),
                    None => holidays.push((entry.holiday.clone(), vec![entry.country.clone()])),
                }
                i += 1;
            }

            let parts: Vec<String> = holidays
                .into_iter()
                .map(|(name, mut countries)| {
                    countries.sort();
                    countries.dedup();
                    format!("{name} ({})", countries.join(", "))
                })
                .collect();
            lines.push(format!(
                "{} {day:02} | {}",
                MONTH_NAMES[(month - 1) as usize],
                parts.join(", ")
            ));
        }
        lines
    }
}

/// Parse a "Weekday, Month Day" cell into (month, day). The weekday is
/// decorative and ignored.
fn parse_month_day(s: &str) -> Option<(u32, u32)> {
    let after_weekday = s.split_once(',').map(|(_, rest)| rest).unwrap_or(s);
    let mut words = after_weekday.split_whitespace();
    let month_name = words.next()?;
    let day: u32 = words.next()?.parse().ok()?;

    let month = MONTH_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(month_name))?
        as u32
        + 1;

    // Validate against a leap year so Feb 29 stays legal.
    NaiveDate::from_ymd_opt(2000, month, day)?;
    Some((month, day))
}

/// Split one CSV line, honoring double-quoted fields (the Date column
/// contains a comma).
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Country,Holiday,Date
United States,New Year's Day,\"Monday, January 01\"
,Independence Day,\"Thursday, July 04\"
,Christmas Day,\"Wednesday, December 25\"
United Kingdom,New Year's Day,\"Monday, January 01\"
,Boxing Day,\"Thursday, December 26\"
France,New Year's Day,\"Monday, January 01\"
India,Republic Day,\"Friday, January 26\"
,Diwali,\"Friday, November 01\"
";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_skips_header_and_forward_fills_country() {
        let cal = HolidayCalendar::parse(SAMPLE).unwrap();
        assert_eq!(cal.len(), 8);
        // The blank-country rows inherited "United States".
        let july = cal.between(date("2024-07-01"), date("2024-07-31"));
        assert_eq!(july, vec!["July 04 | Independence Day (United States)"]);
    }

    #[test]
    fn test_same_date_holidays_merge_countries_sorted() {
        let cal = HolidayCalendar::parse(SAMPLE).unwrap();
        let jan = cal.between(date("2024-01-01"), date("2024-01-15"));
        assert_eq!(
            jan,
            vec!["January 01 | New Year's Day (France, United Kingdom, United States)"]
        );
    }

    #[test]
    fn test_distinct_holidays_on_same_date_stay_separate_entries() {
        let extra = "Country,Holiday,Date\n\
            Spain,Epiphany,\"Monday, January 06\"\n\
            Germany,Three Kings Day,\"Monday, January 06\"\n";
        let cal = HolidayCalendar::parse(extra).unwrap();
        let out = cal.between(date("2024-01-06"), date("2024-01-06"));
        assert_eq!(
            out,
            vec!["January 06 | Epiphany (Spain), Three Kings Day (Germany)"]
        );
    }

    #[test]
    fn test_range_wraps_across_year_boundary() {
        let cal = HolidayCalendar::parse(SAMPLE).unwrap();
        // Oct 01 .. Feb 15 wraps: includes November, December, and January
        // entries but not July.
        let out = cal.between(date("2024-10-01"), date("2025-02-15"));
        let joined = out.join("\n");
        assert!(joined.contains("November 01 | Diwali (India)"));
        assert!(joined.contains("December 25 | Christmas Day (United States)"));
        assert!(joined.contains("December 26 | Boxing Day (United States)"));
        assert!(joined.contains("January 01 | New Year's Day"));
        assert!(joined.contains("January 26 | Republic Day (India)"));
        assert!(!joined.contains("July"));
        // Sorted by month then day, not by position in the wrapped window.
        assert!(out[0].starts_with("January 01"));
    }

    #[test]
    fn test_empty_range_returns_no_entries() {
        let cal = HolidayCalendar::parse(SAMPLE).unwrap();
        let out = cal.between(date("2024-03-01"), date("2024-03-31"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unparsable_dates_are_dropped() {
        let text = "Country,Holiday,Date\nUS,Floating Holiday,TBD\nUS,Fixed,\"Friday, March 08\"\n";
        let cal = HolidayCalendar::parse(text).unwrap();
        assert_eq!(cal.len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let cal = HolidayCalendar::load(file.path()).unwrap();
        assert_eq!(cal.len(), 8);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = HolidayCalendar::load(Path::new("/does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, Error::Holiday(_)));
    }

    #[test]
    fn test_split_csv_line_quotes() {
        assert_eq!(
            split_csv_line("US,\"Washington's Birthday\",\"Monday, February 19\""),
            vec!["US", "Washington's Birthday", "Monday, February 19"]
        );
        assert_eq!(split_csv_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_leap_day_parses() {
        assert_eq!(parse_month_day("Thursday, February 29"), Some((2, 29)));
        assert_eq!(parse_month_day("Thursday, February 30"), None);
    }
}
