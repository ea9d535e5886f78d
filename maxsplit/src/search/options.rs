//! Search policy options.

/// Policy for one multi-day search, fixed at startup from the CLI.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Force this station as the only split candidate.
    pub via: Option<String>,

    /// Only show night-train proposals that still have berths.
    pub berth_only: bool,

    /// Include transporter and train number in output lines.
    pub long_display: bool,

    /// Skip the split search entirely.
    pub direct_only: bool,

    /// Seed for the duration high-water mark: the longest free direct
    /// ride seen so far, in minutes. Threaded through every filter call
    /// of a day's search.
    pub max_duration_minutes: i64,
}
