//! Paginated day fetcher.
//!
//! Drives the booking API across result pages for one
//! origin/destination/date triple, accumulating filtered proposals until
//! the day boundary.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::connect::{
    ConnectClient, ConnectError, FilterOptions, ItineraryPage, anchor_timestamp, filter_page,
};
use crate::domain::{Proposal, StationCode, remove_duplicates};

use super::pacing::Pacing;

/// Error from a day's search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A page fetch failed. Fatal for a direct search; for a split leg
    /// the caller downgrades it to "this leg has zero proposals".
    #[error("search unavailable for {origin} -> {destination}: {source}")]
    Unavailable {
        origin: StationCode,
        destination: StationCode,
        #[source]
        source: ConnectError,
    },
}

/// Source of itinerary-search pages.
///
/// This abstraction allows the fetch loop and the composer to be tested
/// with scripted pages instead of a live client.
pub trait JourneySearch {
    /// Fetch one page of results, anchored at `departure`.
    fn fetch_next_page(
        &self,
        origin: &StationCode,
        destination: &StationCode,
        departure: NaiveDateTime,
    ) -> impl Future<Output = Result<ItineraryPage, ConnectError>>;
}

impl JourneySearch for ConnectClient {
    async fn fetch_next_page(
        &self,
        origin: &StationCode,
        destination: &StationCode,
        departure: NaiveDateTime,
    ) -> Result<ItineraryPage, ConnectError> {
        ConnectClient::fetch_next_page(self, origin, destination, departure).await
    }
}

/// Result of one day's search for one station pair.
#[derive(Debug, Clone)]
pub struct DayProposals {
    /// Filtered, de-duplicated proposals in departure order.
    pub proposals: Vec<Proposal>,

    /// Updated duration high-water mark.
    pub max_duration_minutes: i64,

    /// Malformed records skipped across all pages.
    pub skipped: usize,

    /// Duplicates dropped by the final de-duplication pass.
    pub duplicates_removed: usize,
}

/// Fetches and filters all of one day's pages for a station pair.
#[derive(Debug, Clone)]
pub struct DayFetcher<'a, S: JourneySearch> {
    source: &'a S,
    pacing: &'a Pacing,
    filter: FilterOptions,
}

impl<'a, S: JourneySearch> DayFetcher<'a, S> {
    /// Create a fetcher over a page source.
    pub fn new(source: &'a S, pacing: &'a Pacing, filter: FilterOptions) -> Self {
        Self {
            source,
            pacing,
            filter,
        }
    }

    /// Fetch every page of `day` and return the filtered, de-duplicated
    /// proposals.
    ///
    /// The first page is anchored at the day's start; every following
    /// page at the previous page's last departure, until the response
    /// signals a day change or runs out of results. Every page request,
    /// the first included, is preceded by the politeness pause, so
    /// consecutive day searches and leg searches never hit the API
    /// back-to-back. The duration high-water mark threads through all
    /// pages. A failed fetch on any page aborts the day's search; the
    /// fetcher never retries.
    pub async fn fetch_day(
        &self,
        origin: &StationCode,
        destination: &StationCode,
        day: NaiveDate,
        max_duration_minutes: i64,
    ) -> Result<DayProposals, SearchError> {
        let unavailable = |source| SearchError::Unavailable {
            origin: *origin,
            destination: *destination,
            source,
        };

        let mut anchor = day.and_time(NaiveTime::MIN);
        self.pacing.pause().await;
        let mut page = self
            .source
            .fetch_next_page(origin, destination, anchor)
            .await
            .map_err(unavailable)?;

        let mut accumulated = Vec::new();
        let mut max_duration_minutes = max_duration_minutes;
        let mut skipped = 0;
        let mut page_count = 1;

        loop {
            let raw = page.travel_proposals.as_deref().unwrap_or_default();
            let outcome = filter_page(raw, max_duration_minutes, self.filter);
            accumulated.extend(outcome.proposals);
            max_duration_minutes = outcome.max_duration_minutes;
            skipped += outcome.skipped;

            if !page.has_more_same_day() {
                break;
            }

            // Anchor the next page at the last ride of this one
            match raw.iter().rev().find_map(anchor_timestamp) {
                Some(next_anchor) => anchor = next_anchor,
                None => break,
            }

            self.pacing.pause().await;
            debug!(%origin, %destination, page = page_count + 1, %anchor, "fetching next page");
            page = self
                .source
                .fetch_next_page(origin, destination, anchor)
                .await
                .map_err(unavailable)?;
            page_count += 1;
        }

        let (proposals, duplicates_removed) = remove_duplicates(accumulated);
        debug!(
            %origin,
            %destination,
            pages = page_count,
            kept = proposals.len(),
            duplicates_removed,
            skipped,
            "day search complete"
        );

        Ok(DayProposals {
            proposals,
            max_duration_minutes,
            skipped,
            duplicates_removed,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Scripted page source for tests.
    ///
    /// Serves pages in order per (origin, destination) pair and records
    /// every request it sees.
    pub(crate) struct ScriptedSearch {
        pages: RefCell<std::collections::HashMap<(String, String), VecDeque<PageResult>>>,
        pub(crate) requests: RefCell<Vec<(String, String, NaiveDateTime)>>,
    }

    pub(crate) enum PageResult {
        Page(ItineraryPage),
        Error(ConnectError),
    }

    impl ScriptedSearch {
        pub(crate) fn new() -> Self {
            Self {
                pages: RefCell::new(std::collections::HashMap::new()),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn script(&self, origin: &str, destination: &str, page: &str) {
            self.pages
                .borrow_mut()
                .entry((origin.to_string(), destination.to_string()))
                .or_default()
                .push_back(PageResult::Page(serde_json::from_str(page).unwrap()));
        }

        pub(crate) fn script_error(&self, origin: &str, destination: &str) {
            self.pages
                .borrow_mut()
                .entry((origin.to_string(), destination.to_string()))
                .or_default()
                .push_back(PageResult::Error(ConnectError::RateLimited));
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl JourneySearch for ScriptedSearch {
        async fn fetch_next_page(
            &self,
            origin: &StationCode,
            destination: &StationCode,
            departure: NaiveDateTime,
        ) -> Result<ItineraryPage, ConnectError> {
            self.requests.borrow_mut().push((
                origin.as_str().to_string(),
                destination.as_str().to_string(),
                departure,
            ));

            let result = self
                .pages
                .borrow_mut()
                .get_mut(&(origin.as_str().to_string(), destination.as_str().to_string()))
                .and_then(|queue| queue.pop_front());

            match result {
                Some(PageResult::Page(page)) => Ok(page),
                Some(PageResult::Error(error)) => Err(error),
                // Ran out of script: no results at all
                None => Ok(ItineraryPage {
                    travel_proposals: None,
                    next_pagination: None,
                }),
            }
        }
    }

    pub(crate) fn ride_record(departure: &str, arrival_time: &str, price: &str) -> String {
        format!(
            r#"{{
                "travelId": "{departure}_x",
                "durationLabel": "2h01",
                "bestPriceLabel": "{price}",
                "status": {{"isBookable": true}},
                "departure": {{"timeLabel": "{dep_time}", "originStationLabel": "Paris Gare De Lyon"}},
                "arrival": {{"timeLabel": "{arrival_time}", "destinationStationLabel": "Lyon Part Dieu"}},
                "timeline": {{"segments": [{{"transporter": {{"description": "TGV INOUI", "number": "6603"}}}}]}}
            }}"#,
            dep_time = &departure[11..16],
        )
    }

    pub(crate) fn page(records: &[String], pagination: Option<&str>) -> String {
        let proposals = records.join(",");
        match pagination {
            Some(kind) => format!(
                r#"{{"travelProposals": [{proposals}], "nextPagination": {{"type": "{kind}"}}}}"#
            ),
            None => format!(r#"{{"travelProposals": [{proposals}]}}"#),
        }
    }

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 12, 1).unwrap()
    }

    #[tokio::test]
    async fn single_page_day() {
        let source = ScriptedSearch::new();
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T07:17", "09:23", "0 €")],
                Some("NEXT_DAY"),
            ),
        );

        let pacing = Pacing::none();
        let fetcher = DayFetcher::new(&source, &pacing, FilterOptions::default());
        let result = fetcher
            .fetch_day(&code("FRPAR"), &code("FRLYS"), day(), 0)
            .await
            .unwrap();

        assert_eq!(result.proposals.len(), 1);
        assert_eq!(result.max_duration_minutes, 121);
        assert_eq!(source.request_count(), 1);

        // First page is anchored at the day's start
        let requests = source.requests.borrow();
        assert_eq!(requests[0].2, day().and_time(NaiveTime::MIN));
    }

    #[tokio::test]
    async fn paginates_until_day_boundary() {
        let source = ScriptedSearch::new();
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T07:17", "09:23", "0 €")],
                Some("NEXT"),
            ),
        );
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T10:00", "12:04", "0 €")],
                Some("NEXT_DAY"),
            ),
        );

        let pacing = Pacing::none();
        let fetcher = DayFetcher::new(&source, &pacing, FilterOptions::default());
        let result = fetcher
            .fetch_day(&code("FRPAR"), &code("FRLYS"), day(), 0)
            .await
            .unwrap();

        assert_eq!(result.proposals.len(), 2);
        assert_eq!(source.request_count(), 2);

        // Second page anchored at the first page's last departure
        let requests = source.requests.borrow();
        assert_eq!(
            requests[1].2,
            day().and_hms_opt(7, 17, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn page_boundary_duplicates_are_removed() {
        let source = ScriptedSearch::new();
        // The anchor ride reappears on the next page
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T07:17", "09:23", "0 €")],
                Some("NEXT"),
            ),
        );
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[
                    ride_record("2021-12-01T07:17", "09:23", "0 €"),
                    ride_record("2021-12-01T10:00", "12:04", "0 €"),
                ],
                Some("NEXT_DAY"),
            ),
        );

        let pacing = Pacing::none();
        let fetcher = DayFetcher::new(&source, &pacing, FilterOptions::default());
        let result = fetcher
            .fetch_day(&code("FRPAR"), &code("FRLYS"), day(), 0)
            .await
            .unwrap();

        assert_eq!(result.proposals.len(), 2);
        assert_eq!(result.duplicates_removed, 1);
    }

    #[tokio::test]
    async fn empty_first_page_is_empty_day() {
        let source = ScriptedSearch::new();
        source.script("FRPAR", "FRLYS", "{}");

        let pacing = Pacing::none();
        let fetcher = DayFetcher::new(&source, &pacing, FilterOptions::default());
        let result = fetcher
            .fetch_day(&code("FRPAR"), &code("FRLYS"), day(), 45)
            .await
            .unwrap();

        assert!(result.proposals.is_empty());
        // The high-water mark passes through untouched
        assert_eq!(result.max_duration_minutes, 45);
    }

    #[tokio::test]
    async fn first_page_failure_is_unavailable() {
        let source = ScriptedSearch::new();
        source.script_error("FRPAR", "FRLYS");

        let pacing = Pacing::none();
        let fetcher = DayFetcher::new(&source, &pacing, FilterOptions::default());
        let result = fetcher
            .fetch_day(&code("FRPAR"), &code("FRLYS"), day(), 0)
            .await;

        assert!(matches!(result, Err(SearchError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn later_page_failure_also_propagates() {
        let source = ScriptedSearch::new();
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T07:17", "09:23", "0 €")],
                Some("NEXT"),
            ),
        );
        source.script_error("FRPAR", "FRLYS");

        let pacing = Pacing::none();
        let fetcher = DayFetcher::new(&source, &pacing, FilterOptions::default());
        let result = fetcher
            .fetch_day(&code("FRPAR"), &code("FRLYS"), day(), 0)
            .await;

        assert!(matches!(result, Err(SearchError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn every_page_fetch_is_paced() {
        let source = ScriptedSearch::new();
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T07:17", "09:23", "0 €")],
                Some("NEXT"),
            ),
        );
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T10:00", "12:04", "0 €")],
                Some("NEXT_DAY"),
            ),
        );

        let pacing = Pacing::millis(20..=25);
        let fetcher = DayFetcher::new(&source, &pacing, FilterOptions::default());
        let start = std::time::Instant::now();
        fetcher
            .fetch_day(&code("FRPAR"), &code("FRLYS"), day(), 0)
            .await
            .unwrap();

        // One pause per page, the first page included, so two searches
        // in a row can never hit the API back-to-back
        assert_eq!(source.request_count(), 2);
        assert!(start.elapsed() >= std::time::Duration::from_millis(40));
    }

    #[tokio::test]
    async fn high_water_mark_threads_across_pages() {
        let source = ScriptedSearch::new();
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T07:17", "09:23", "0 €")],
                Some("NEXT"),
            ),
        );
        source.script(
            "FRPAR",
            "FRLYS",
            &page(
                &[ride_record("2021-12-01T10:00", "12:04", "99999 €")],
                Some("NEXT_DAY"),
            ),
        );

        let pacing = Pacing::none();
        let fetcher = DayFetcher::new(&source, &pacing, FilterOptions::default());
        let result = fetcher
            .fetch_day(&code("FRPAR"), &code("FRLYS"), day(), 0)
            .await
            .unwrap();

        // Only the eligible ride qualifies and only it moves the mark
        assert_eq!(result.proposals.len(), 1);
        assert_eq!(result.max_duration_minutes, 121);
    }
}
