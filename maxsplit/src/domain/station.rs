//! Station types.

use std::fmt;

/// UIC country prefix for stations located in France.
///
/// See <https://en.wikipedia.org/wiki/List_of_UIC_country_codes>.
const FRANCE_UIC_PREFIX: &str = "87";

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid 5-letter booking-system station code.
///
/// These are the codes the booking API keys its stations by, e.g. `FRPAR`
/// for the Paris all-stations aggregate or `FRMPL` for Montpellier. This
/// type guarantees that any `StationCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use maxsplit::domain::StationCode;
///
/// let paris = StationCode::parse("FRPAR").unwrap();
/// assert_eq!(paris.as_str(), "FRPAR");
///
/// // Lowercase is rejected
/// assert!(StationCode::parse("frpar").is_err());
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("FRPA").is_err());
/// assert!(StationCode::parse("FRPARI").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationCode([u8; 5]);

impl StationCode {
    /// Parse a station code from a string.
    ///
    /// The input must be exactly 5 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 {
            return Err(InvalidStationCode {
                reason: "must be exactly 5 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidStationCode {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(StationCode([bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]]))
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store valid ASCII uppercase letters
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A train station as used by a search.
///
/// `code` is the booking-system code required to query segment availability;
/// `identifier` is the numeric, country-prefixed id used by the
/// direct-destination graph. Either may be absent until resolved; a search
/// must not be issued for a station whose relevant field is unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Official station name, as given by the user or a directory.
    pub name: String,

    /// Shortened name used for display.
    pub display_name: String,

    /// Booking-system station code, once resolved.
    pub code: Option<StationCode>,

    /// Country-prefixed numeric identifier in the external rail directory,
    /// once resolved (e.g. "8796001" for Paris).
    pub identifier: Option<String>,
}

impl Station {
    /// Create a station from a name, with no resolved code or identifier.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let display_name = display_name(&name);
        Self {
            name,
            display_name,
            code: None,
            identifier: None,
        }
    }

    /// Attach a resolved booking code.
    pub fn with_code(mut self, code: StationCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a resolved directory identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Whether the station is located in France, judged by the UIC country
    /// prefix of its resolved identifier.
    ///
    /// Returns `false` when the identifier is unresolved: a station whose
    /// country is unknown must not be used as a split point, because the
    /// booking API only composes journeys between domestic stations.
    pub fn is_domestic(&self) -> bool {
        self.identifier
            .as_deref()
            .is_some_and(|id| id.starts_with(FRANCE_UIC_PREFIX))
    }
}

/// Shorten a station name for display.
///
/// A handful of official names are too long for one-line output; the
/// shortening rules come from the stations that actually overflow.
fn display_name(name: &str) -> String {
    match name {
        "Montpellier Sud De France" => "Montpellier TGV (SdF)".to_string(),
        _ => name
            .trim_end_matches(" 1 Et 2")
            .trim_end_matches(" Rhone-Alpes Sud")
            .to_string(),
    }
}
