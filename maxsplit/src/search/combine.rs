//! Pairing compatible legs into connections.

use crate::domain::Proposal;

/// A two-leg connection through an intermediate station.
#[derive(Debug, Clone, PartialEq)]
pub struct JointProposal {
    /// Leg from the journey origin to the connection station.
    pub first: Proposal,

    /// Leg from the connection station to the journey destination.
    pub second: Proposal,
}

impl JointProposal {
    /// The leg with fewer remaining places.
    ///
    /// Connection viability is bounded by the scarcer leg; the display
    /// layer shows its availability for the whole pair.
    pub fn scarcer_leg(&self) -> &Proposal {
        if self.second.remaining_seat_count() < self.first.remaining_seat_count() {
            &self.second
        } else {
            &self.first
        }
    }
}

/// Pair every first leg with every second leg that departs strictly after
/// the first leg arrives.
///
/// A same-minute connection is not viable, so equality is excluded. Output
/// order is first-leg-major: all pairs for the earliest first leg, then the
/// next, with second legs in their input order within each group.
pub fn combine(first_legs: &[Proposal], second_legs: &[Proposal]) -> Vec<JointProposal> {
    let mut joint = Vec::new();

    for first in first_legs {
        for second in second_legs {
            if second.departure > first.arrival {
                joint.push(JointProposal {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
    }

    joint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProposalMetadata, SeatSpace, Station};
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 12, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn leg(origin: &str, destination: &str, dep: NaiveDateTime, arr: NaiveDateTime) -> Proposal {
        leg_with_seats(origin, destination, dep, arr, 8)
    }

    fn leg_with_seats(
        origin: &str,
        destination: &str,
        dep: NaiveDateTime,
        arr: NaiveDateTime,
        seats: u32,
    ) -> Proposal {
        Proposal {
            duration_minutes: (arr - dep).num_minutes(),
            departure: dep,
            arrival: arr,
            origin: Station::new(origin),
            destination: Station::new(destination),
            metadata: ProposalMetadata {
                transporter: "TGV INOUI".to_string(),
                vehicle_number: "6603".to_string(),
                remaining_seats: BTreeMap::from([(SeatSpace::Seats, seats)]),
                min_price: 0.0,
            },
        }
    }

    #[test]
    fn strictly_later_departure_connects() {
        let first = vec![leg("Paris", "Lyon", dt(7, 17), dt(9, 23))];
        let second = vec![
            leg("Lyon", "Marseille", dt(9, 20), dt(11, 0)),
            leg("Lyon", "Marseille", dt(9, 30), dt(11, 10)),
        ];

        let joint = combine(&first, &second);
        assert_eq!(joint.len(), 1);
        assert_eq!(joint[0].second.departure, dt(9, 30));
    }

    #[test]
    fn same_minute_connection_is_excluded() {
        let first = vec![leg("Paris", "Lyon", dt(7, 17), dt(9, 23))];
        let second = vec![leg("Lyon", "Marseille", dt(9, 23), dt(11, 0))];

        assert!(combine(&first, &second).is_empty());
    }

    #[test]
    fn disjoint_windows_yield_nothing() {
        let first = vec![leg("Paris", "Lyon", dt(18, 0), dt(20, 0))];
        let second = vec![
            leg("Lyon", "Marseille", dt(8, 0), dt(10, 0)),
            leg("Lyon", "Marseille", dt(12, 0), dt(14, 0)),
        ];

        assert!(combine(&first, &second).is_empty());
    }

    #[test]
    fn order_is_first_leg_major() {
        let first = vec![
            leg("Paris", "Lyon", dt(7, 0), dt(9, 0)),
            leg("Paris", "Lyon", dt(8, 0), dt(10, 0)),
        ];
        let second = vec![
            leg("Lyon", "Marseille", dt(10, 30), dt(12, 0)),
            leg("Lyon", "Marseille", dt(11, 30), dt(13, 0)),
        ];

        let joint = combine(&first, &second);
        let pairs: Vec<_> = joint
            .iter()
            .map(|j| (j.first.departure, j.second.departure))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (dt(7, 0), dt(10, 30)),
                (dt(7, 0), dt(11, 30)),
                (dt(8, 0), dt(10, 30)),
                (dt(8, 0), dt(11, 30)),
            ]
        );
    }

    #[test]
    fn scarcer_leg_picks_fewer_places() {
        let first = leg_with_seats("Paris", "Lyon", dt(7, 0), dt(9, 0), 8);
        let second = leg_with_seats("Lyon", "Marseille", dt(10, 0), dt(12, 0), 2);

        let joint = JointProposal {
            first: first.clone(),
            second: second.clone(),
        };
        assert_eq!(joint.scarcer_leg(), &second);

        // Ties go to the first leg
        let tied = JointProposal {
            first: first.clone(),
            second: leg_with_seats("Lyon", "Marseille", dt(10, 0), dt(12, 0), 8),
        };
        assert_eq!(tied.scarcer_leg(), &first);
    }

    proptest! {
        #[test]
        fn cardinality_bounded_and_pairs_compatible(
            first_times in proptest::collection::vec((0u32..22, 0u32..60), 0..6),
            second_times in proptest::collection::vec((0u32..22, 0u32..60), 0..6),
        ) {
            let first: Vec<_> = first_times
                .iter()
                .map(|&(h, m)| leg("Paris", "Lyon", dt(h, m), dt(h + 1, m)))
                .collect();
            let second: Vec<_> = second_times
                .iter()
                .map(|&(h, m)| leg("Lyon", "Marseille", dt(h, m), dt(h + 1, m)))
                .collect();

            let joint = combine(&first, &second);
            prop_assert!(joint.len() <= first.len() * second.len());
            for pair in &joint {
                prop_assert!(pair.second.departure > pair.first.arrival);
            }
        }
    }
}
