//! Date line formatting
//!
//! The date line reads `"<Wkd> <d> <Mon>"`, e.g. `"TUE 5 MAR"`. Every part is a
//! fixed-width field: two characters for the day of the month, three for the
//! weekday and month abbreviations.

use chrono::Datelike;
use heapless::String;

/// Day of month, at most two characters
pub type DayField = String<2>;
/// Weekday or month abbreviation, at most three characters
pub type Abbrev = String<3>;
/// Full date line
pub type DateText = String<15>;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Day of month without a leading zero.
///
/// The day is rendered zero-padded to two digits first, then leading zeros are
/// dropped: 5 gives `"5"`, 15 gives `"15"` and 0 gives an empty field.
pub fn day_of_month(day: u32) -> DayField {
    let mut buf = [0u8; 2];
    let padded = format_no_std::show(&mut buf, format_args!("{:02}", day % 100)).unwrap_or("");

    let mut field = DayField::new();
    // Cannot overflow, the padded form is two characters
    let _ = field.push_str(padded.trim_start_matches('0'));
    field
}

/// Stylize an abbreviation by subtracting 32 from its second and third byte.
///
/// For lower case ASCII letters this is the upper case letter, so `"Mon"`
/// becomes `"MON"`. Other bytes are shifted just the same; bytes below 32 are
/// left alone so the field stays ASCII. Input beyond three characters is cut.
pub fn stylize(abbrev: &str) -> Abbrev {
    let mut field = Abbrev::new();
    for (i, c) in abbrev.chars().take(3).enumerate() {
        let c = match (i, u8::try_from(c)) {
            (1 | 2, Ok(b)) if (32..128).contains(&b) => char::from(b - 32),
            _ => c,
        };
        if field.push(c).is_err() {
            break;
        }
    }
    field
}

/// Stylized weekday abbreviation
pub fn weekday<D: Datelike>(date: &D) -> Abbrev {
    stylize(WEEKDAYS[date.weekday().num_days_from_monday() as usize])
}

/// Stylized month abbreviation
pub fn month<D: Datelike>(date: &D) -> Abbrev {
    stylize(MONTHS[date.month0() as usize % 12])
}

/// Full date line for `date`
pub fn date_text<D: Datelike>(date: &D) -> DateText {
    let mut text = DateText::new();
    // 3 + 1 + 2 + 1 + 3 characters always fit
    let _ = text.push_str(&weekday(date));
    let _ = text.push(' ');
    let _ = text.push_str(&day_of_month(date.day()));
    let _ = text.push(' ');
    let _ = text.push_str(&month(date));
    text
}
