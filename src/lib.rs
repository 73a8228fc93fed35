pub mod client;
pub mod config;
pub mod error;
pub mod food_truck;
pub mod geolocation;
pub mod geopoint;
pub mod notification;
mod requests;
pub mod view;

pub use client::{FoodTruckClient, SearchBackend};
pub use config::AppConfig;
pub use error::FoodTruckError;
pub use food_truck::FoodTruckRecord;
pub use geolocation::{EnvGeolocator, FixedGeolocator, Geolocator, UnsupportedGeolocator};
pub use geopoint::{Coordinate, SearchRadius};
pub use notification::{Notification, NotificationQueue};
pub use view::{MapCommand, PopupInfo, SearchView, ViewEffect, ViewPhase};
