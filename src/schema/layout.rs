//! Time layouts for time-like fields.
//!
//! Layouts are written the way Go writes them: as the reference instant
//! `Mon Jan 2 15:04:05 MST 2006` rendered in the wanted format. They are
//! translated once into chrono format items.

use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed};
use chrono::{DateTime, FixedOffset, NaiveTime, Offset, Utc};

pub const RFC3339: &str = "2006-01-02T15:04:05Z07:00";

/// Named standard layouts accepted in place of a layout string.
pub static LAYOUTS: &[(&str, &str)] = &[
    ("ANSIC", "Mon Jan _2 15:04:05 2006"),
    ("UnixDate", "Mon Jan _2 15:04:05 MST 2006"),
    ("RubyDate", "Mon Jan 02 15:04:05 -0700 2006"),
    ("RFC822", "02 Jan 06 15:04 MST"),
    ("RFC822Z", "02 Jan 06 15:04 -0700"),
    ("RFC850", "Monday, 02-Jan-06 15:04:05 MST"),
    ("RFC1123", "Mon, 02 Jan 2006 15:04:05 MST"),
    ("RFC1123Z", "Mon, 02 Jan 2006 15:04:05 -0700"),
    ("RFC3339", RFC3339),
    ("RFC3339Nano", "2006-01-02T15:04:05.999999999Z07:00"),
    ("Kitchen", "3:04PM"),
    ("Stamp", "Jan _2 15:04:05"),
    ("StampMilli", "Jan _2 15:04:05.000"),
    ("StampMicro", "Jan _2 15:04:05.000000"),
    ("StampNano", "Jan _2 15:04:05.000000000"),
    ("DateTime", "2006-01-02 15:04:05"),
    ("DateOnly", "2006-01-02"),
    ("TimeOnly", "15:04:05"),
];

/// Reference elements, longest first where one is a prefix of another.
static CHUNKS: &[(&str, Item<'static>)] = &[
    ("January", Item::Fixed(Fixed::LongMonthName)),
    ("Jan", Item::Fixed(Fixed::ShortMonthName)),
    ("Monday", Item::Fixed(Fixed::LongWeekdayName)),
    ("Mon", Item::Fixed(Fixed::ShortWeekdayName)),
    ("MST", Item::Fixed(Fixed::TimezoneName)),
    ("2006", Item::Numeric(Numeric::Year, Pad::Zero)),
    ("002", Item::Numeric(Numeric::Ordinal, Pad::Zero)),
    ("01", Item::Numeric(Numeric::Month, Pad::Zero)),
    ("02", Item::Numeric(Numeric::Day, Pad::Zero)),
    ("03", Item::Numeric(Numeric::Hour12, Pad::Zero)),
    ("04", Item::Numeric(Numeric::Minute, Pad::Zero)),
    ("05", Item::Numeric(Numeric::Second, Pad::Zero)),
    ("06", Item::Numeric(Numeric::YearMod100, Pad::Zero)),
    ("_2", Item::Numeric(Numeric::Day, Pad::Space)),
    ("15", Item::Numeric(Numeric::Hour, Pad::Zero)),
    ("1", Item::Numeric(Numeric::Month, Pad::None)),
    ("2", Item::Numeric(Numeric::Day, Pad::None)),
    ("3", Item::Numeric(Numeric::Hour12, Pad::None)),
    ("4", Item::Numeric(Numeric::Minute, Pad::None)),
    ("5", Item::Numeric(Numeric::Second, Pad::None)),
    ("PM", Item::Fixed(Fixed::UpperAmPm)),
    ("pm", Item::Fixed(Fixed::LowerAmPm)),
    ("Z07:00", Item::Fixed(Fixed::TimezoneOffsetColonZ)),
    ("Z0700", Item::Fixed(Fixed::TimezoneOffsetZ)),
    ("Z07", Item::Fixed(Fixed::TimezoneOffsetZ)),
    ("-07:00", Item::Fixed(Fixed::TimezoneOffsetColon)),
    ("-0700", Item::Fixed(Fixed::TimezoneOffset)),
    ("-07", Item::Fixed(Fixed::TimezoneOffset)),
];

const REFERENCE: &str = "2006-01-02T15:04:05.123456789-07:00";

/// A translated, self-validated layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    source: String,
    items: Vec<Item<'static>>,
}

impl Layout {
    /// Resolves a named layout or takes `layout` literally, then checks that
    /// the reference instant rendered with it parses back.
    pub fn new(layout: &str) -> Result<Self, String> {
        let source = LAYOUTS
            .iter()
            .find(|(name, _)| *name == layout)
            .map_or(layout, |&(_, l)| l)
            .to_string();
        let items = translate(&source);

        if !items
            .iter()
            .any(|item| matches!(item, Item::Numeric(..) | Item::Fixed(..)))
        {
            return Err(format!("layout {:?} has no date or time element", source));
        }

        let reference = DateTime::parse_from_rfc3339(REFERENCE).map_err(|e| e.to_string())?;
        let sample = reference.format_with_items(items.iter()).to_string();
        let layout = Layout { source, items };
        layout
            .parse(&sample)
            .map_err(|e| format!("layout {:?} is not parsable: {}", layout.source, e))?;
        Ok(layout)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parses a value. Elements missing from the layout take Go's zero
    /// values: year 0, January, day 1, midnight, UTC.
    pub fn parse(&self, value: &str) -> Result<DateTime<FixedOffset>, format::ParseError> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, value, self.items.iter())?;

        if let Ok(dt) = parsed.to_datetime() {
            return Ok(dt);
        }
        if parsed.to_naive_date().is_err() {
            // already-set elements refuse a different value; that is fine
            let _ = parsed.set_year(0);
            let _ = parsed.set_month(1);
            let _ = parsed.set_day(1);
        }
        let date = parsed.to_naive_date()?;
        let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);
        if let Ok(dt) = parsed.to_datetime() {
            return Ok(dt);
        }
        Ok(DateTime::from_naive_utc_and_offset(
            date.and_time(time),
            Utc.fix(),
        ))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            source: RFC3339.to_string(),
            items: translate(RFC3339),
        }
    }
}

fn translate(layout: &str) -> Vec<Item<'static>> {
    let mut items = vec![];
    let mut literal = String::new();
    let mut rest = layout;

    while let Some(ch) = rest.chars().next() {
        if let Some((item, len)) = std_chunk(rest) {
            flush_literal(&mut literal, &mut items);
            items.push(item);
            rest = &rest[len..];
        } else {
            literal.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    flush_literal(&mut literal, &mut items);
    items
}

fn std_chunk(s: &str) -> Option<(Item<'static>, usize)> {
    if let Some(chunk) = fractional_seconds(s) {
        return Some(chunk);
    }
    CHUNKS
        .iter()
        .find(|(prefix, _)| s.starts_with(prefix))
        .map(|(prefix, item)| (item.clone(), prefix.len()))
}

/// `.000` is a fixed number of digits, `.999` trims trailing zeros.
fn fractional_seconds(s: &str) -> Option<(Item<'static>, usize)> {
    let digits = s.strip_prefix('.')?;
    let first = digits.chars().next().filter(|c| *c == '0' || *c == '9')?;
    let run = digits.chars().take_while(|c| *c == first).count();
    if digits[run..].starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let fixed = match (first, run) {
        ('0', 3) => Fixed::Nanosecond3,
        ('0', 6) => Fixed::Nanosecond6,
        ('0', 9) => Fixed::Nanosecond9,
        _ => Fixed::Nanosecond,
    };
    Some((Item::Fixed(fixed), run + 1))
}

fn flush_literal(literal: &mut String, items: &mut Vec<Item<'static>>) {
    let mut run = String::new();
    let mut in_space = false;
    for ch in literal.drain(..) {
        if ch.is_whitespace() != in_space && !run.is_empty() {
            items.push(literal_item(std::mem::take(&mut run), in_space));
        }
        in_space = ch.is_whitespace();
        run.push(ch);
    }
    if !run.is_empty() {
        items.push(literal_item(run, in_space));
    }
}

fn literal_item(run: String, space: bool) -> Item<'static> {
    if space {
        Item::OwnedSpace(run.into_boxed_str())
    } else {
        Item::OwnedLiteral(run.into_boxed_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_translate_rfc3339() {
        let items = translate(RFC3339);
        assert_eq!(items[0], Item::Numeric(Numeric::Year, Pad::Zero));
        assert_eq!(items[1], Item::OwnedLiteral("-".into()));
        assert_eq!(items.last(), Some(&Item::Fixed(Fixed::TimezoneOffsetColonZ)));
    }

    #[test]
    fn test_named_layouts_are_valid() {
        for (name, _) in LAYOUTS {
            assert!(Layout::new(name).is_ok(), "layout {} should be valid", name);
        }
    }

    #[test]
    fn test_layout_without_elements_is_rejected() {
        assert!(Layout::new("invalid_layout").is_err());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let layout = Layout::new("RFC3339").unwrap();
        let t = layout.parse("2021-03-04T05:06:07+02:00").unwrap();
        assert_eq!(t.year(), 2021);
        assert_eq!(t.hour(), 5);
        assert_eq!(t.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_parse_date_only_defaults_to_midnight_utc() {
        let layout = Layout::new("2006-01-02").unwrap();
        let t = layout.parse("2020-12-31").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2020, 12, 31));
        assert_eq!(t.hour(), 0);
        assert_eq!(t.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_kitchen() {
        let layout = Layout::new("Kitchen").unwrap();
        let t = layout.parse("9:30PM").unwrap();
        assert_eq!((t.hour(), t.minute()), (21, 30));
    }
}
