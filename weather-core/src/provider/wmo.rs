//! WMO weather interpretation codes, as reported by Open-Meteo, mapped onto
//! OpenWeather-style descriptions and icon codes.

use crate::model::{DEFAULT_DESCRIPTION, DEFAULT_ICON};

/// Human-readable description and OpenWeather icon number for a WMO code.
pub fn describe(code: u16) -> Option<(&'static str, &'static str)> {
    let entry = match code {
        0 => ("Clear sky", "01"),
        1 => ("Mainly clear", "02"),
        2 => ("Partly cloudy", "03"),
        3 => ("Overcast", "04"),
        45 | 48 => ("Fog", "50"),
        51 | 53 | 55 => ("Drizzle", "09"),
        56 | 57 => ("Freezing drizzle", "09"),
        61 | 63 | 65 => ("Rain", "10"),
        66 | 67 => ("Freezing rain", "13"),
        71 | 73 | 75 => ("Snow", "13"),
        77 => ("Snow grains", "13"),
        80..=82 => ("Rain showers", "09"),
        85 | 86 => ("Snow showers", "13"),
        95 => ("Thunderstorm", "11"),
        96 | 99 => ("Thunderstorm with hail", "11"),
        _ => return None,
    };

    Some(entry)
}

/// Description and full icon code (`04d`, `10n`, ...). Unknown or absent codes
/// fall back to the defaults.
pub fn condition(code: Option<u16>, is_day: bool) -> (&'static str, String) {
    match code.and_then(describe) {
        Some((description, icon)) => {
            let suffix = if is_day { 'd' } else { 'n' };
            (description, format!("{icon}{suffix}"))
        }
        None => (DEFAULT_DESCRIPTION, DEFAULT_ICON.to_string()),
    }
}
