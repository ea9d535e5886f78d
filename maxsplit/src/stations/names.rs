//! Station name normalization.
//!
//! The two external directories disagree on a handful of names: the rail
//! directory keeps legacy names ("Saumur Rive Droit") that the booking
//! site no longer recognizes, and multi-station cities need an aggregate
//! code. The rules form an ordered decision table evaluated top to
//! bottom; the first match wins, and anything unmatched falls through to
//! the generic external lookup.

use crate::domain::StationCode;

/// Booking code for the Paris all-stations aggregate.
const PARIS_CODE: &str = "FRPAR";

/// Canonical label for the Paris aggregate.
const PARIS_LABEL: &str = "Paris (toutes gares intramuros)";

/// Stations whose directory name no longer matches the booking site:
/// (directory name, booking code, canonical label).
const RENAMED: &[(&str, &str, &str)] = &[
    (
        "Aeroport Paris-Charles de Gaulle TGV",
        "FRMLW",
        "Paris Aéroport Roissy Charles-de-Gaulle",
    ),
    ("Massy", "FRDJU", "Massy Gare TGV"),
    ("Le Creusot Montceau", "FRMLW", "Le Creusot - Montceau TGV"),
    ("Montpellier", "FRMPL", "Montpellier"),
    ("Nice", "FRNIC", "Nice"),
    ("Vierzon Ville", "FRXVZ", "Vierzon"),
    ("Vendôme Villiers sur Loire", "FRAFM", "Vendôme"),
    ("Moulins-sur-Allier", "FRXMU", "Moulins"),
    ("Saumur Rive Droit", "FRACN", "Saumur"),
    ("Orange(Avignon)", "FRXOG", "Orange"),
];

/// Outcome of normalizing a station name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The table knows the code; no external lookup needed.
    Fixed {
        code: StationCode,
        label: &'static str,
    },

    /// Rewritten query for the external fuzzy lookup.
    Query(String),
}

/// Normalize a station name against the decision table.
pub fn normalize(name: &str) -> Normalized {
    // Any Paris station maps to the intramuros aggregate
    if name.starts_with("Paris") {
        if let Ok(code) = StationCode::parse(PARIS_CODE) {
            return Normalized::Fixed {
                code,
                label: PARIS_LABEL,
            };
        }
    }

    if let Some((_, code, label)) = RENAMED.iter().find(|(n, _, _)| *n == name) {
        if let Ok(code) = StationCode::parse(code) {
            return Normalized::Fixed { code, label };
        }
    }

    // "Hbf" is the German suffix for a central station; "Ville" is the
    // French one. Both confuse the booking site's fuzzy matcher. Suffix
    // only: "Montauban-Ville-Bourbon" must stay intact.
    let query = name
        .strip_suffix("Ville")
        .or_else(|| name.strip_suffix("Hbf"))
        .map(str::trim_end)
        .unwrap_or(name);

    Normalized::Query(query.to_lowercase())
}
