//! Console date format, `DD/MM/YYYY`.

use jiff::civil::Date;

const CONSOLE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parses a console date such as `01/04/1977`.
pub fn parse_date(input: &str) -> Result<Date, String> {
    Date::strptime(CONSOLE_DATE_FORMAT, input.trim())
        .map_err(|_| format!("`{input}` is not a valid date, expected DD/MM/YYYY"))
}

/// Formats a date for the console.
pub fn format_date(date: Date) -> String {
    date.strftime(CONSOLE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn reads_day_first() {
        assert_eq!(parse_date("01/04/1977"), Ok(date(1977, 4, 1)));
        assert_eq!(parse_date(" 19/01/1983 "), Ok(date(1983, 1, 19)));
    }

    #[test]
    fn rejects_other_layouts_and_impossible_days() {
        assert!(parse_date("1977-04-01").is_err());
        assert!(parse_date("31/02/2001").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn pads_day_and_month() {
        assert_eq!(format_date(date(1977, 4, 1)), "01/04/1977");
    }
}
