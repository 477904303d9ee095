use std::fmt;

/// Description used when the API omits the condition name.
pub const DEFAULT_DESCRIPTION: &str = "Unknown";

/// OpenWeather icon code used when the API omits one ("clear sky, day").
pub const DEFAULT_ICON: &str = "01d";

/// Separator between the fields of a serialized snapshot.
pub const FIELD_SEPARATOR: char = '|';

/// Number of positional fields in a serialized snapshot.
pub const FIELD_COUNT: usize = 6;

/// Current conditions at the configured location, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub description: String,
    pub temperature_c: i64,
    /// Local wall-clock time, `HH:MM:SS`.
    pub sunrise: String,
    /// Local wall-clock time, `HH:MM:SS`.
    pub sunset: String,
    pub humidity_pct: u8,
    pub icon: String,
}

/// Serializes as `description|temp|sunrise|sunset|humidity|icon`.
impl fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        let description = self.description.replace(sep, "/");
        write!(
            f,
            "{description}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.temperature_c, self.sunrise, self.sunset, self.humidity_pct, self.icon
        )
    }
}

/// Positional view over a serialized snapshot.
///
/// Parsing never fails: missing trailing fields read as empty strings and
/// anything past the sixth field is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotFields<'a> {
    fields: [&'a str; FIELD_COUNT],
}

impl<'a> SnapshotFields<'a> {
    pub fn parse(data: &'a str) -> Self {
        let mut fields = [""; FIELD_COUNT];
        for (slot, value) in fields.iter_mut().zip(data.split(FIELD_SEPARATOR)) {
            *slot = value;
        }

        Self { fields }
    }

    pub fn description(&self) -> &'a str {
        self.fields[0]
    }

    pub fn temperature(&self) -> &'a str {
        self.fields[1]
    }

    pub fn sunrise(&self) -> &'a str {
        self.fields[2]
    }

    pub fn sunset(&self) -> &'a str {
        self.fields[3]
    }

    pub fn humidity(&self) -> &'a str {
        self.fields[4]
    }

    pub fn icon(&self) -> &'a str {
        self.fields[5]
    }
}
