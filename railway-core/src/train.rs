use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

pub const STANDARD_CLASS: &str = "Standard Class";
pub const FIRST_CLASS: &str = "First Class";

/// Seats held back from the first-class allotment.
const FIRST_CLASS_SEAT_OFFSET: i32 = 50;

/// A train as stored by the backend and served by `/api/trains`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainRecord {
    pub id: String,
    pub name: String,
    pub number: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
    pub total_seats: i32,
    pub available_seats: i32,
}

impl TrainRecord {
    pub fn from_request(req: &TrainRequest) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            name: req.name.clone(),
            number: req.number.clone(),
            source: req.source.clone(),
            destination: req.destination.clone(),
            departure_time: req.departure_time.clone(),
            arrival_time: req.arrival_time.clone(),
            price: req.price,
            total_seats: req.total_seats,
            available_seats: req.total_seats,
        }
    }

    /// Overwrites the descriptive fields. Availability never exceeds the new total.
    pub fn apply_update(&mut self, req: &TrainRequest) {
        self.name = req.name.clone();
        self.number = req.number.clone();
        self.source = req.source.clone();
        self.destination = req.destination.clone();
        self.departure_time = req.departure_time.clone();
        self.arrival_time = req.arrival_time.clone();
        self.price = req.price;
        self.total_seats = req.total_seats;
        self.available_seats = self.available_seats.min(req.total_seats);
    }

    /// Case-insensitive route match on trimmed station names.
    pub fn serves(&self, source: &str, destination: &str) -> bool {
        self.source.trim().eq_ignore_ascii_case(source.trim())
            && self.destination.trim().eq_ignore_ascii_case(destination.trim())
    }

    /// Per-seat fare in whole currency units.
    pub fn unit_price(&self) -> i64 {
        self.price.round() as i64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub name: String,
    pub number: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
    pub total_seats: i32,
}

impl TrainRequest {
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() || self.number.trim().is_empty() {
            return Err(CoreError::ValidationError("Train name and number are required".into()));
        }
        if self.source.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(CoreError::ValidationError("Source and destination are required".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CoreError::ValidationError("Price must be a non-negative amount".into()));
        }
        if self.total_seats < 0 {
            return Err(CoreError::ValidationError("Total seats cannot be negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FareClass {
    #[serde(rename = "type")]
    pub class_type: String,
    pub price: i64,
    pub available: i32,
}

/// The bookable view of a train: one entry per fare class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Train {
    pub id: String,
    pub number: String,
    pub name: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub classes: Vec<FareClass>,
    pub days: Vec<String>,
}

impl Train {
    pub fn fare_class(&self, class_type: &str) -> Option<&FareClass> {
        self.classes.iter().find(|c| c.class_type == class_type)
    }
}

impl From<&TrainRecord> for Train {
    fn from(record: &TrainRecord) -> Self {
        let unit_price = record.unit_price();
        Self {
            id: record.id.clone(),
            number: record.number.clone(),
            name: record.name.clone(),
            from: record.source.clone(),
            to: record.destination.clone(),
            departure: record.departure_time.clone(),
            arrival: record.arrival_time.clone(),
            duration: journey_duration(&record.departure_time, &record.arrival_time)
                .unwrap_or_else(|| "N/A".to_string()),
            classes: vec![
                FareClass {
                    class_type: STANDARD_CLASS.to_string(),
                    price: unit_price,
                    available: record.available_seats,
                },
                FareClass {
                    class_type: FIRST_CLASS.to_string(),
                    price: unit_price * 2,
                    available: (record.available_seats - FIRST_CLASS_SEAT_OFFSET).max(0),
                },
            ],
            days: vec!["Daily".to_string()],
        }
    }
}

/// Travel time between two `HH:MM` times, wrapping past midnight.
pub fn journey_duration(departure: &str, arrival: &str) -> Option<String> {
    let dep = NaiveTime::parse_from_str(departure.trim(), "%H:%M").ok()?;
    let arr = NaiveTime::parse_from_str(arrival.trim(), "%H:%M").ok()?;

    let mut minutes = (arr - dep).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    Some(format!("{}h {:02}m", minutes / 60, minutes % 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn podi_menike() -> TrainRecord {
        TrainRecord {
            id: "t1".into(),
            name: "Podi Menike".into(),
            number: "1005".into(),
            source: "Colombo".into(),
            destination: "Badulla".into(),
            departure_time: "05:55".into(),
            arrival_time: "16:00".into(),
            price: 1200.0,
            total_seats: 500,
            available_seats: 80,
        }
    }

    #[test]
    fn test_fare_classes_derived_from_record() {
        let train = Train::from(&podi_menike());

        assert_eq!(train.classes.len(), 2);
        assert_eq!(train.fare_class(STANDARD_CLASS).unwrap().price, 1200);
        assert_eq!(train.fare_class(STANDARD_CLASS).unwrap().available, 80);
        assert_eq!(train.fare_class(FIRST_CLASS).unwrap().price, 2400);
        assert_eq!(train.fare_class(FIRST_CLASS).unwrap().available, 30);
        assert_eq!(train.days, vec!["Daily".to_string()]);
        assert_eq!(train.duration, "10h 05m");
    }

    #[test]
    fn test_first_class_availability_never_negative() {
        let mut record = podi_menike();
        record.available_seats = 12;
        let train = Train::from(&record);
        assert_eq!(train.fare_class(FIRST_CLASS).unwrap().available, 0);
    }

    #[test]
    fn test_overnight_duration() {
        assert_eq!(journey_duration("20:00", "07:00").as_deref(), Some("11h 00m"));
        assert_eq!(journey_duration("late", "07:00"), None);
    }

    #[test]
    fn test_route_match_ignores_case_and_whitespace() {
        let record = podi_menike();
        assert!(record.serves(" colombo", "BADULLA "));
        assert!(!record.serves("Badulla", "Colombo"));
    }

    #[test]
    fn test_update_clamps_availability() {
        let mut record = podi_menike();
        let req = TrainRequest {
            name: "Podi Menike".into(),
            number: "1005".into(),
            source: "Colombo".into(),
            destination: "Badulla".into(),
            departure_time: "06:00".into(),
            arrival_time: "16:10".into(),
            price: 1300.0,
            total_seats: 50,
        };
        record.apply_update(&req);
        assert_eq!(record.total_seats, 50);
        assert_eq!(record.available_seats, 50);
        assert_eq!(record.departure_time, "06:00");
    }

    #[test]
    fn test_record_wire_shape_is_camel_case() {
        let json = serde_json::to_value(podi_menike()).unwrap();
        assert_eq!(json["departureTime"], "05:55");
        assert_eq!(json["availableSeats"], 80);
    }
}
