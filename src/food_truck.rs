// src/food_truck.rs

use crate::geopoint::{deserialize_latitude, deserialize_longitude, Coordinate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A single search result: one permitted food truck location and its distance from the query point.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodTruckRecord {
    pub location_id: i64,

    /// Vendor name.
    #[serde(default)]
    pub applicant: Option<String>,

    /// Free-text description of the food on offer.
    #[serde(default)]
    pub food_items: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(deserialize_with = "deserialize_latitude")]
    pub latitude: f64,
    #[serde(deserialize_with = "deserialize_longitude")]
    pub longitude: f64,

    /// Kilometres from the searched coordinate, as computed by the backend.
    pub distance: f64,

    #[serde(default)]
    pub facility_type: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub location_description: Option<String>,

    #[serde(default)]
    pub days_hours: Option<String>,

    #[serde(default)]
    pub permit: Option<String>,

    // Catch all for other fields
    #[serde(flatten)]
    pub other_fields: HashMap<String, Value>,
}

impl FoodTruckRecord {
    /// The record's position. Latitude and longitude are range-checked when the record is
    /// deserialized, so records from the search API always yield a valid coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Human readable distance, e.g. `"1.23 km away"`.
    pub fn distance_label(&self) -> String {
        format_distance(self.distance)
    }
}

pub(crate) fn format_distance(km: f64) -> String {
    format!("{:.2} km away", km)
}

/// Wrapper the search endpoint puts around its results: `{"data": [...], "error": null}`.
#[derive(Deserialize, Debug)]
pub(crate) struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<FoodTruckRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<FoodTruckRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<FoodTruckRecord>>::deserialize(deserializer)?.unwrap_or_default())
}
