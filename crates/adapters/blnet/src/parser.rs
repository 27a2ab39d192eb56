//! Parsing of BL-NET web interface pages.
//!
//! The gateway renders each telemetry page as table-ish HTML; after
//! stripping markup a data row collapses to one line per point:
//!
//! ```text
//! 1: T.Kollektor 78,3 °C
//! 2: Drehzahl S1 1200 rpm
//! 3: Pumpe Solar AUTO/EIN
//! ```
//!
//! Measuring domains carry a decimal-comma numeric and an optional
//! unit; digital outputs carry the combined `MODE/VALUE` field the
//! device reports. Lines that do not match a row format (navigation,
//! headers) are ignored.

use std::sync::LazyLock;

use regex::Regex;

use heliohub_domain::mode::OutputMode;
use heliohub_domain::record::SensorRecord;
use heliohub_domain::telemetry::TelemetryDomain;
use heliohub_domain::value::{SensorValue, SignalLevel};

use crate::error::ParseError;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

// Greedy name capture, so the value is always the *last* numeric on
// the row — names like "Drehzahl S1" keep their trailing digits.
static MEASURE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<id>\d+):(?: (?P<name>.*))? (?P<value>-?\d+(?:,\d+)?)(?: (?P<unit>\S+))?$")
        .expect("measure row pattern is valid")
});

static DIGITAL_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<id>\d+):(?: (?P<name>.*))? (?P<mode>[A-Z]+)/(?P<value>[A-Z]+)$")
        .expect("digital row pattern is valid")
});

/// Detect the login form the gateway serves to unauthenticated sessions.
#[must_use]
pub fn is_login_page(html: &str) -> bool {
    html.contains("name=\"blP\"") || html.contains("Passwort:")
}

/// Parse one telemetry page into `(raw id, record)` pairs.
///
/// # Errors
///
/// Returns [`ParseError::NotAuthenticated`] when the gateway served the
/// login form instead of a data page.
pub fn parse_page(
    domain: TelemetryDomain,
    html: &str,
) -> Result<Vec<(String, SensorRecord)>, ParseError> {
    if is_login_page(html) {
        return Err(ParseError::NotAuthenticated);
    }

    let mut rows = Vec::new();
    for line in flatten(html) {
        let parsed = if domain.is_digital() {
            parse_digital(&line)
        } else {
            parse_measure(&line)
        };
        if let Some((raw_id, record)) = parsed {
            rows.push((raw_id, record));
        }
    }
    Ok(rows)
}

/// Strip tags, decode entities, and normalise whitespace, one line per
/// former element.
fn flatten(html: &str) -> Vec<String> {
    TAG.replace_all(html, "\n")
        .lines()
        .map(|line| WHITESPACE.replace_all(&decode_entities(line), " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Decode the handful of entities the gateway emits.
fn decode_entities(line: &str) -> String {
    line.replace("&nbsp;", " ")
        .replace("&deg;", "°")
        .replace("&auml;", "ä")
        .replace("&ouml;", "ö")
        .replace("&uuml;", "ü")
        .replace("&szlig;", "ß")
        .replace("&amp;", "&")
}

fn parse_measure(line: &str) -> Option<(String, SensorRecord)> {
    let caps = MEASURE_ROW.captures(line)?;
    let value: f64 = caps["value"].replace(',', ".").parse().ok()?;
    let record = SensorRecord {
        value: SensorValue::Numeric(value),
        unit: caps.name("unit").map(|m| m.as_str().to_string()),
        display_name: caps.name("name").and_then(|m| nonempty(m.as_str())),
        mode: None,
    };
    Some((caps["id"].to_string(), record))
}

fn parse_digital(line: &str) -> Option<(String, SensorRecord)> {
    let caps = DIGITAL_ROW.captures(line)?;
    let record = SensorRecord {
        value: SensorValue::Signal(SignalLevel::parse(&caps["value"])),
        unit: None,
        display_name: caps.name("name").and_then(|m| nonempty(m.as_str())),
        mode: Some(OutputMode::parse(&caps["mode"])),
    };
    Some((caps["id"].to_string(), record))
}

fn nonempty(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALOG_PAGE: &str = "\
        <html><body><div class=\"menu\">MENU Analogwerte</div>\
        <div class=\"row\">1:&nbsp;T.Kollektor&nbsp;78,3 &deg;C</div>\
        <div class=\"row\">2:&nbsp;T.Speicher&nbsp;-3,5 &deg;C</div>\
        <div class=\"row\">5:&nbsp;&nbsp;21,0 &deg;C</div>\
        <div class=\"foot\">Seite 1/2</div></body></html>";

    const DIGITAL_PAGE: &str = "\
        <html><body><div class=\"menu\">MENU Ausg&auml;nge</div>\
        <div class=\"row\">1:&nbsp;Pumpe Solar&nbsp;AUTO/EIN</div>\
        <div class=\"row\">2:&nbsp;Pumpe Heizkreis&nbsp;HAND/AUS</div>\
        <div class=\"row\">4:&nbsp;Ventil&nbsp;ZEIT/STOER</div>\
        </body></html>";

    const LOGIN_PAGE: &str = "\
        <html><body><form method=\"post\">Passwort:\
        <input type=\"password\" name=\"blP\"></form></body></html>";

    #[test]
    fn should_parse_analog_rows_with_decimal_comma_and_unit() {
        let rows = parse_page(TelemetryDomain::Analog, ANALOG_PAGE).unwrap();
        assert_eq!(rows.len(), 3);

        let (raw_id, record) = &rows[0];
        assert_eq!(raw_id, "1");
        assert_eq!(record.value, SensorValue::Numeric(78.3));
        assert_eq!(record.unit.as_deref(), Some("°C"));
        assert_eq!(record.display_name.as_deref(), Some("T.Kollektor"));
    }

    #[test]
    fn should_parse_negative_readings() {
        let rows = parse_page(TelemetryDomain::Analog, ANALOG_PAGE).unwrap();
        assert_eq!(rows[1].1.value, SensorValue::Numeric(-3.5));
    }

    #[test]
    fn should_leave_display_name_absent_for_unnamed_rows() {
        let rows = parse_page(TelemetryDomain::Analog, ANALOG_PAGE).unwrap();
        let (raw_id, record) = &rows[2];
        assert_eq!(raw_id, "5");
        assert_eq!(record.display_name, None);
        assert_eq!(record.value, SensorValue::Numeric(21.0));
    }

    #[test]
    fn should_ignore_navigation_and_footer_lines() {
        let rows = parse_page(TelemetryDomain::Analog, ANALOG_PAGE).unwrap();
        assert!(rows.iter().all(|(id, _)| ["1", "2", "5"].contains(&id.as_str())));
    }

    #[test]
    fn should_parse_digital_rows_into_signal_and_mode() {
        let rows = parse_page(TelemetryDomain::Digital, DIGITAL_PAGE).unwrap();
        assert_eq!(rows.len(), 3);

        let (raw_id, record) = &rows[0];
        assert_eq!(raw_id, "1");
        assert_eq!(record.signal(), Some(&SignalLevel::Ein));
        assert_eq!(record.mode, Some(OutputMode::Auto));
        assert_eq!(record.display_name.as_deref(), Some("Pumpe Solar"));

        let (_, second) = &rows[1];
        assert_eq!(second.signal(), Some(&SignalLevel::Aus));
        assert_eq!(second.mode, Some(OutputMode::Hand));
    }

    #[test]
    fn should_keep_unknown_digital_tokens_verbatim() {
        let rows = parse_page(TelemetryDomain::Digital, DIGITAL_PAGE).unwrap();
        let (_, record) = &rows[2];
        assert_eq!(
            record.signal(),
            Some(&SignalLevel::Other("STOER".to_string()))
        );
        assert_eq!(record.mode, Some(OutputMode::Other("ZEIT".to_string())));
    }

    #[test]
    fn should_parse_speed_rows_without_unit() {
        let page = "<div>3:&nbsp;Drehzahl S1&nbsp;1200</div>";
        let rows = parse_page(TelemetryDomain::Speed, page).unwrap();
        let (raw_id, record) = &rows[0];
        assert_eq!(raw_id, "3");
        assert_eq!(record.value, SensorValue::Numeric(1200.0));
        assert_eq!(record.unit, None);
        // Trailing digits belong to the name, not the reading.
        assert_eq!(record.display_name.as_deref(), Some("Drehzahl S1"));
    }

    #[test]
    fn should_decode_german_umlauts_in_names() {
        let page = "<div>7:&nbsp;W&auml;rmepumpe&nbsp;1,5 kW</div>";
        let rows = parse_page(TelemetryDomain::Power, page).unwrap();
        assert_eq!(rows[0].1.display_name.as_deref(), Some("Wärmepumpe"));
    }

    #[test]
    fn should_detect_login_page() {
        let result = parse_page(TelemetryDomain::Analog, LOGIN_PAGE);
        assert!(matches!(result, Err(ParseError::NotAuthenticated)));
    }

    #[test]
    fn should_return_empty_for_pages_without_data_rows() {
        let rows = parse_page(TelemetryDomain::Energy, "<html><body>Keine Daten</body></html>")
            .unwrap();
        assert!(rows.is_empty());
    }
}
