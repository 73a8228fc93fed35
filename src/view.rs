// src/view.rs

use crate::client::SearchBackend;
use crate::config::AppConfig;
use crate::error::FoodTruckError;
use crate::food_truck::{format_distance, FoodTruckRecord};
use crate::geolocation::{resolve_initial_position, Geolocator};
use crate::geopoint::{Coordinate, SearchRadius};
use crate::notification::{Notification, NotificationQueue};

use chrono::Utc;
use serde::Serialize;

pub const INITIAL_ZOOM: f64 = 13.0;
pub const FLY_TO_ZOOM: f64 = 14.0;
pub const MAP_STYLE: &str = "mapbox://styles/mapbox/streets-v12";

pub const USER_MARKER_COLOR: &str = "#03A9F4";
pub const USER_MARKER_SIZE: u32 = 32;
pub const TRUCK_MARKER_COLOR: &str = "#FF5722";
pub const TRUCK_MARKER_SIZE: u32 = 20;

pub const INVALID_COORDINATES_MESSAGE: &str = "Please enter a valid latitude and longitude";
pub const INVALID_RADIUS_MESSAGE: &str = "Please enter a positive search radius";
pub const NO_RESULTS_MESSAGE: &str = "No food trucks found nearby :(";
pub const SEARCH_FAILED_MESSAGE: &str = "Error fetching nearby food trucks";

/// Where the view is in its search lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// No search coordinates known yet.
    Idle,
    Ready,
    Searching,
}

/// Detail callout shown on the map for the hovered or selected location.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PopupInfo {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub description: String,
    pub address: String,
    pub distance: f64,
}

impl PopupInfo {
    pub fn for_user_location(coordinate: Coordinate) -> Self {
        PopupInfo {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            title: "You are here".to_string(),
            description: String::new(),
            address: String::new(),
            distance: 0.0,
        }
    }

    pub fn distance_label(&self) -> String {
        format_distance(self.distance)
    }
}

impl From<&FoodTruckRecord> for PopupInfo {
    fn from(record: &FoodTruckRecord) -> Self {
        PopupInfo {
            latitude: record.latitude,
            longitude: record.longitude,
            title: record.applicant.clone().unwrap_or_default(),
            description: record.food_items.clone().unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
            distance: record.distance,
        }
    }
}

/// Commands for the map widget.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum MapCommand {
    /// Pan and zoom to `center`.
    FlyTo { center: Coordinate, zoom: f64 },
}

/// Side effects for the host UI to carry out, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEffect {
    Notify(Notification),
    Map(MapCommand),
}

/// Initial camera for the map.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MapViewState {
    pub center: Coordinate,
    pub zoom: f64,
    pub style: &'static str,
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    User,
    FoodTruck { location_id: i64 },
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub coordinate: Coordinate,
    pub color: &'static str,
    pub size: u32,
}

/// One entry of the result list.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ResultCard {
    pub location_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub distance_label: String,
}

/// Proof that a search was started, handed back to [`SearchView::complete_search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTicket {
    generation: u64,
    pub coordinate: Coordinate,
    pub radius: SearchRadius,
}

/// Headless state of the food truck search page.
///
/// The view owns the search form inputs, the result list, the loading flag and the single
/// active popup. It talks to the outside world only through a [`SearchBackend`], a
/// [`Geolocator`], and the [`ViewEffect`]s it queues for the host UI.
///
/// Responses are tagged with a generation number: when searches overlap, only the most
/// recently started one may update the results or clear the loading flag.
#[derive(Debug)]
pub struct SearchView {
    config: AppConfig,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: f64,
    is_loading: bool,
    food_trucks: Vec<FoodTruckRecord>,
    popup: Option<PopupInfo>,
    generation: u64,
    geolocation_requested: bool,
    notifications: NotificationQueue,
    effects: Vec<ViewEffect>,
}

impl SearchView {
    pub fn new(config: AppConfig) -> Self {
        let radius = config.default_search_radius.km();
        SearchView {
            config,
            latitude: None,
            longitude: None,
            radius,
            is_loading: false,
            food_trucks: Vec::new(),
            popup: None,
            generation: 0,
            geolocation_requested: false,
            notifications: NotificationQueue::new(),
            effects: Vec::new(),
        }
    }

    /// Seeds the search coordinates from the device position.
    ///
    /// Does nothing if coordinates are already known or the geolocator was already asked.
    /// On failure both coordinates are set to the configured default center.
    pub async fn initialize<G: Geolocator>(&mut self, geolocator: &G) {
        if self.geolocation_requested || self.latitude.is_some() || self.longitude.is_some() {
            return;
        }
        self.geolocation_requested = true;

        let position = resolve_initial_position(geolocator, self.config.default_center).await;
        self.latitude = Some(position.latitude);
        self.longitude = Some(position.longitude);
    }

    // Form inputs

    /// Empty or non-numeric text clears the latitude.
    pub fn set_latitude_input(&mut self, value: &str) {
        self.latitude = parse_coordinate_input(value);
    }

    /// Empty or non-numeric text clears the longitude.
    pub fn set_longitude_input(&mut self, value: &str) {
        self.longitude = parse_coordinate_input(value);
    }

    pub fn set_latitude(&mut self, latitude: Option<f64>) {
        self.latitude = latitude;
    }

    pub fn set_longitude(&mut self, longitude: Option<f64>) {
        self.longitude = longitude;
    }

    /// Unparseable text is kept as NaN and rejected when searching.
    pub fn set_radius_input(&mut self, value: &str) {
        self.radius = value.trim().parse().unwrap_or(f64::NAN);
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The search coordinate, if both inputs hold an in-range value.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).ok(),
            _ => None,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        if self.latitude.is_none() || self.longitude.is_none() {
            ViewPhase::Idle
        } else if self.is_loading {
            ViewPhase::Searching
        } else {
            ViewPhase::Ready
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn food_trucks(&self) -> &[FoodTruckRecord] {
        &self.food_trucks
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // Search

    /// Runs one search against `backend`.
    ///
    /// Returns `true` if the outcome was applied to the view. Invalid input, and responses
    /// overtaken by a newer search, return `false`.
    pub async fn search<B: SearchBackend>(&mut self, backend: &B) -> bool {
        let Some(ticket) = self.begin_search() else {
            return false;
        };
        let result = backend.search(ticket.coordinate, ticket.radius).await;
        self.complete_search(ticket, result)
    }

    /// Validates the form and marks a search as in flight.
    ///
    /// Returns `None`, after notifying the user, when the inputs are not searchable.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        let Some(coordinate) = self.coordinate() else {
            log::debug!(
                "Rejecting search: latitude={:?} longitude={:?}",
                self.latitude,
                self.longitude
            );
            self.notify(INVALID_COORDINATES_MESSAGE, true);
            return None;
        };
        let radius = match SearchRadius::new(self.radius) {
            Ok(radius) => radius,
            Err(e) => {
                log::debug!("Rejecting search: {}", e);
                self.notify(INVALID_RADIUS_MESSAGE, true);
                return None;
            }
        };

        self.generation += 1;
        self.is_loading = true;
        self.popup = None;

        log::debug!(
            "Search #{} started around {} within {} km",
            self.generation,
            coordinate,
            radius
        );

        Some(SearchTicket {
            generation: self.generation,
            coordinate,
            radius,
        })
    }

    /// Applies the outcome of the search identified by `ticket`.
    ///
    /// Returns `false` and leaves the view untouched if a newer search has started since.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<FoodTruckRecord>, FoodTruckError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale response for search #{} (latest is #{})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(food_trucks) => {
                if food_trucks.is_empty() {
                    self.notify(NO_RESULTS_MESSAGE, true);
                }
                self.food_trucks = food_trucks;
            }
            Err(e) => {
                log::error!("Error fetching nearby food trucks: {}", e);
                self.notify(SEARCH_FAILED_MESSAGE, true);
            }
        }
        self.is_loading = false;
        true
    }

    // Selection

    /// List item pressed: show its popup and fly the map to it.
    pub fn select_result(&mut self, location_id: i64) {
        let Some(record) = self.find(location_id) else {
            log::debug!("select_result: unknown location_id {}", location_id);
            return;
        };
        let popup = PopupInfo::from(record);
        let center = record.coordinate();
        self.popup = Some(popup);
        self.effects.push(ViewEffect::Map(MapCommand::FlyTo {
            center,
            zoom: FLY_TO_ZOOM,
        }));
    }

    /// Pointer entered a food truck marker.
    pub fn hover_marker(&mut self, location_id: i64) {
        match self.find(location_id).map(PopupInfo::from) {
            Some(popup) => self.popup = Some(popup),
            None => log::debug!("hover_marker: unknown location_id {}", location_id),
        }
    }

    /// Pointer entered the user's own marker.
    pub fn hover_user_marker(&mut self) {
        if let Some(coordinate) = self.coordinate() {
            self.popup = Some(PopupInfo::for_user_location(coordinate));
        }
    }

    /// Pointer left a list item or marker, or the popup was closed.
    pub fn clear_popup(&mut self) {
        self.popup = None;
    }

    pub fn popup(&self) -> Option<&PopupInfo> {
        self.popup.as_ref()
    }

    // Rendering

    /// Initial camera, or `None` while the position is still unknown.
    pub fn map_view(&self) -> Option<MapViewState> {
        self.coordinate().map(|center| MapViewState {
            center,
            zoom: INITIAL_ZOOM,
            style: MAP_STYLE,
            access_token: self.config.map_access_token.clone(),
        })
    }

    /// The user's marker first, then one marker per result in list order.
    pub fn markers(&self) -> Vec<MapMarker> {
        let user = self.coordinate().map(|coordinate| MapMarker {
            kind: MarkerKind::User,
            coordinate,
            color: USER_MARKER_COLOR,
            size: USER_MARKER_SIZE,
        });
        user.into_iter()
            .chain(self.food_trucks.iter().map(|record| MapMarker {
                kind: MarkerKind::FoodTruck {
                    location_id: record.location_id,
                },
                coordinate: record.coordinate(),
                color: TRUCK_MARKER_COLOR,
                size: TRUCK_MARKER_SIZE,
            }))
            .collect()
    }

    pub fn result_cards(&self) -> Vec<ResultCard> {
        self.food_trucks
            .iter()
            .map(|record| ResultCard {
                location_id: record.location_id,
                title: non_empty(&record.applicant),
                description: non_empty(&record.food_items),
                address: non_empty(&record.address),
                distance_label: record.distance_label(),
            })
            .collect()
    }

    /// Notifications still on screen.
    pub fn notifications(&self) -> Vec<&Notification> {
        self.notifications.visible(Utc::now())
    }

    /// Takes the side effects queued since the last call.
    pub fn drain_effects(&mut self) -> Vec<ViewEffect> {
        std::mem::take(&mut self.effects)
    }

    fn find(&self, location_id: i64) -> Option<&FoodTruckRecord> {
        self.food_trucks
            .iter()
            .find(|record| record.location_id == location_id)
    }

    fn notify(&mut self, message: &str, is_error: bool) {
        if let Some(notification) = self.notifications.enqueue(message, is_error, Utc::now()) {
            self.effects.push(ViewEffect::Notify(notification));
        }
    }
}

fn parse_coordinate_input(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_inputs_parse_trimmed_numbers() {
        assert_eq!(parse_coordinate_input(" 37.76 "), Some(37.76));
        assert_eq!(parse_coordinate_input("-122.41"), Some(-122.41));
        assert_eq!(parse_coordinate_input("0"), Some(0.0));
        assert_eq!(parse_coordinate_input(""), None);
        assert_eq!(parse_coordinate_input("   "), None);
        assert_eq!(parse_coordinate_input("abc"), None);
        assert_eq!(parse_coordinate_input("NaN"), None);
    }

    #[test]
    fn phase_follows_inputs() {
        let mut view = SearchView::new(AppConfig::default());
        assert_eq!(view.phase(), ViewPhase::Idle);
        view.set_latitude_input("37.7");
        assert_eq!(view.phase(), ViewPhase::Idle);
        view.set_longitude_input("-122.4");
        assert_eq!(view.phase(), ViewPhase::Ready);

        let ticket = view.begin_search().unwrap();
        assert_eq!(view.phase(), ViewPhase::Searching);
        assert!(view.complete_search(ticket, Ok(Vec::new())));
        assert_eq!(view.phase(), ViewPhase::Ready);
    }

    #[test]
    fn radius_input_defaults_from_config() {
        let config =
            AppConfig::default().with_default_search_radius(SearchRadius::new(2.0).unwrap());
        let mut view = SearchView::new(config);
        assert_eq!(view.radius(), 2.0);
        view.set_radius_input("7.5");
        assert_eq!(view.radius(), 7.5);
        view.set_radius_input("far");
        assert!(view.radius().is_nan());
    }
}
