//! Plain-text rendering of search results.
//!
//! One line per proposal, fixed-width station columns so a day's results
//! line up. Rendering is pure string building; printing is the binary's
//! job.

use crate::domain::{MORE_THAN_THRESHOLD, Proposal};
use crate::search::JointProposal;

/// Column width for a station name.
const STATION_WIDTH: usize = 23;

/// Whether a proposal should be shown under the berth-only policy.
///
/// The policy only constrains night trains: a night train without berths
/// is hidden, everything else passes.
pub fn should_display(proposal: &Proposal, berth_only: bool) -> bool {
    !berth_only || !proposal.is_night_train() || proposal.has_berths()
}

/// Whether a joint proposal should be shown under the berth-only policy.
/// Both legs have to pass.
pub fn should_display_joint(joint: &JointProposal, berth_only: bool) -> bool {
    should_display(&joint.first, berth_only) && should_display(&joint.second, berth_only)
}

/// Remaining-places summary, e.g. "3 seats remaining" or
/// "+10 berths and 2 seats remaining".
pub fn seat_summary(proposal: &Proposal) -> String {
    if proposal.metadata.remaining_seats.is_empty() {
        return "no places remaining".to_string();
    }

    let parts: Vec<String> = proposal
        .metadata
        .remaining_seats
        .iter()
        .map(|(space, &count)| {
            if count >= MORE_THAN_THRESHOLD {
                format!("+10 {space}")
            } else {
                format!("{count} {space}")
            }
        })
        .collect();

    format!("{} remaining", parts.join(" and "))
}

/// One line for a direct proposal.
pub fn proposal_line(proposal: &Proposal, long: bool) -> String {
    let mut line = format!(
        "{:^width$} ({}) → {:^width$} ({})",
        proposal.origin.display_name,
        proposal.departure.format("%H:%M"),
        proposal.destination.display_name,
        proposal.arrival.format("%H:%M"),
        width = STATION_WIDTH,
    );

    if long {
        line.push_str(&format!(
            " {} {}",
            proposal.metadata.transporter, proposal.metadata.vehicle_number
        ));
    }

    line.push_str(&format!(" | {}", seat_summary(proposal)));
    line
}

/// One line for a two-leg connection.
///
/// When both legs use the same connection station its name is printed
/// once; distinct stations (e.g. a city's two separate stations) are both
/// named. The seat summary shown is the scarcer leg's.
pub fn joint_line(joint: &JointProposal, long: bool) -> String {
    let first = &joint.first;
    let second = &joint.second;

    let mut line = format!(
        "{:^width$} ({}) →",
        first.origin.display_name,
        first.departure.format("%H:%M"),
        width = STATION_WIDTH,
    );

    if first.destination.display_name == second.origin.display_name {
        line.push_str(&format!(
            " {:^width$} ({} ⏲ {}) →",
            first.destination.display_name,
            first.arrival.format("%H:%M"),
            second.departure.format("%H:%M"),
            width = STATION_WIDTH,
        ));
    } else {
        line.push_str(&format!(
            " {:^width$} ({}) ⭾ {:^width$} ({}) →",
            first.destination.display_name,
            first.arrival.format("%H:%M"),
            second.origin.display_name,
            second.departure.format("%H:%M"),
            width = STATION_WIDTH,
        ));
    }

    line.push_str(&format!(
        " {:^width$} ({})",
        second.destination.display_name,
        second.arrival.format("%H:%M"),
        width = STATION_WIDTH,
    ));

    if long {
        line.push_str(&format!(
            " {} {} + {} {}",
            first.metadata.transporter,
            first.metadata.vehicle_number,
            second.metadata.transporter,
            second.metadata.vehicle_number
        ));
    }

    line.push_str(&format!(" | {}", seat_summary(joint.scarcer_leg())));
    line
}
