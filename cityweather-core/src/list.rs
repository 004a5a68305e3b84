use std::collections::BTreeSet;

use crate::{
    catalog::{CityCatalog, PAGE_SIZE},
    error::FetchError,
    model::CityRecord,
    route::Route,
};

/// How many quick suggestions are surfaced while a search is active.
pub const SUGGESTION_LIMIT: usize = 5;

/// Fixed candidate list for the country filter menu. Not derived from the
/// data: these are the labels the filter dropdown offers.
pub const COUNTRY_FILTER_CHOICES: &[&str] = &["Germany", "Afghanistan"];

/// Command to fetch one catalog window.
///
/// Trigger methods on [`CityListController`] hand one of these to the caller
/// instead of performing I/O themselves; the outcome comes back through
/// [`CityListController::on_page_result`]. The serial identifies the fetch so
/// a completion that outlives its trigger can be told apart and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFetch {
    pub serial: u64,
    pub offset: u64,
    pub limit: u64,
}

/// State container for the city list view.
///
/// Owns the accumulated collection, the filter state, the page cursor and the
/// loading flag. All mutation goes through the methods below, in arrival
/// order; visible rows and suggestions are derived on demand and never
/// stored.
#[derive(Debug)]
pub struct CityListController {
    cities: Vec<CityRecord>,
    search_text: String,
    selected_countries: BTreeSet<String>,
    page: u64,
    fetch_serial: u64,
    in_flight: Option<PageFetch>,
    exhausted: bool,
    suggestions_visible: bool,
}

impl Default for CityListController {
    fn default() -> Self {
        Self::new()
    }
}

impl CityListController {
    pub fn new() -> Self {
        Self {
            cities: Vec::new(),
            search_text: String::new(),
            selected_countries: BTreeSet::new(),
            page: 1,
            fetch_serial: 0,
            in_flight: None,
            exhausted: false,
            suggestions_visible: false,
        }
    }

    /// Initial trigger: start the first page fetch.
    pub fn on_mount(&mut self) -> Option<PageFetch> {
        self.begin_fetch()
    }

    /// Viewport-intersection signal for the last rendered row. The sole
    /// pagination trigger: advances the page counter and starts the next
    /// fetch, unless one is already in flight or the catalog is exhausted.
    pub fn on_last_row_visible(&mut self) -> Option<PageFetch> {
        let fetch = self.begin_fetch()?;
        self.page += 1;
        Some(fetch)
    }

    fn begin_fetch(&mut self) -> Option<PageFetch> {
        if self.in_flight.is_some() || self.exhausted {
            return None;
        }

        self.fetch_serial += 1;
        let fetch = PageFetch {
            serial: self.fetch_serial,
            // Next unseen window, so repeated triggers never refetch rows
            // the collection already holds.
            offset: self.cities.len() as u64,
            limit: PAGE_SIZE,
        };
        self.in_flight = Some(fetch);
        Some(fetch)
    }

    /// Apply the outcome of a page fetch.
    ///
    /// Success appends the records in response order; failure leaves the
    /// collection untouched (no retry here; the next trigger simply tries
    /// again). Either way the loading flag clears. A result whose serial is
    /// not the one in flight belongs to an abandoned fetch and is discarded
    /// without touching any state.
    pub fn on_page_result(
        &mut self,
        fetch: PageFetch,
        result: Result<Vec<CityRecord>, FetchError>,
    ) {
        match self.in_flight {
            Some(current) if current.serial == fetch.serial => {}
            _ => {
                tracing::debug!(serial = fetch.serial, "discarding stale page result");
                return;
            }
        }
        self.in_flight = None;

        match result {
            Ok(records) => {
                if (records.len() as u64) < fetch.limit {
                    self.exhausted = true;
                }
                self.cities.extend(records);
            }
            Err(err) => {
                tracing::error!(error = %err, offset = fetch.offset, "city page fetch failed");
            }
        }
    }

    /// Store the search text verbatim (no trimming). Suggestions show
    /// whenever the text is non-empty.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.suggestions_visible = !self.search_text.is_empty();
    }

    /// Add the country to the selection if absent, remove it if present.
    pub fn toggle_country(&mut self, label: &str) {
        if !self.selected_countries.remove(label) {
            self.selected_countries.insert(label.to_string());
        }
    }

    /// The accumulated collection filtered by search text (case-insensitive
    /// substring on the name) and, when any country is selected, by country
    /// membership. Recomputed on every call.
    pub fn visible_rows(&self) -> Vec<&CityRecord> {
        let needle = self.search_text.to_lowercase();
        self.cities
            .iter()
            .filter(|city| city.name.to_lowercase().contains(&needle))
            .filter(|city| {
                self.selected_countries.is_empty()
                    || self.selected_countries.contains(&city.country)
            })
            .collect()
    }

    /// First five visible rows, shown only while a search is active.
    pub fn suggestions(&self) -> Vec<&CityRecord> {
        if !self.suggestions_visible {
            return Vec::new();
        }
        self.visible_rows().into_iter().take(SUGGESTION_LIMIT).collect()
    }

    /// Take the nth suggestion as the search text and hide the suggestion
    /// list. Returns false when the index is out of range.
    pub fn accept_suggestion(&mut self, index: usize) -> bool {
        let Some(name) = self.suggestions().get(index).map(|c| c.name.clone()) else {
            return false;
        };
        self.search_text = name;
        self.suggestions_visible = false;
        true
    }

    /// Navigation target for a row's detail view.
    pub fn detail_route(record: &CityRecord) -> String {
        Route::CityWeather { city: record.name.clone() }.to_path()
    }

    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected_countries(&self) -> &BTreeSet<String> {
        &self.selected_countries
    }

    pub fn suggestions_visible(&self) -> bool {
        self.suggestions_visible
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn page(&self) -> u64 {
        self.page
    }
}

/// Glue between the pure controller and a catalog: executes the fetch
/// commands the controller hands out and feeds the outcomes back.
#[derive(Debug)]
pub struct CityListSession {
    controller: CityListController,
    catalog: Box<dyn CityCatalog>,
}

impl CityListSession {
    pub fn new(catalog: Box<dyn CityCatalog>) -> Self {
        Self {
            controller: CityListController::new(),
            catalog,
        }
    }

    /// Load the first page.
    pub async fn mount(&mut self) {
        let fetch = self.controller.on_mount();
        self.run(fetch).await;
    }

    /// Deliver the scroll signal and load the next page if one is due.
    pub async fn load_more(&mut self) {
        let fetch = self.controller.on_last_row_visible();
        self.run(fetch).await;
    }

    async fn run(&mut self, fetch: Option<PageFetch>) {
        let Some(fetch) = fetch else { return };
        let result = self.catalog.fetch_page(fetch.offset, fetch.limit).await;
        self.controller.on_page_result(fetch, result);
    }

    pub fn controller(&self) -> &CityListController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CityListController {
        &mut self.controller
    }
}
