//! Real South Indian locations for realistic test fixtures.

use ev_trip_planner::geo::Coordinate;
use ev_trip_planner::station::Station;

pub const BENGALURU: Coordinate = Coordinate::new(12.9716, 77.5946);
pub const MYSURU: Coordinate = Coordinate::new(12.2958, 76.6394);
pub const CHENNAI: Coordinate = Coordinate::new(13.0827, 80.2707);
pub const VISAKHAPATNAM: Coordinate = Coordinate::new(17.6868, 83.2185);

/// A named public charger.
#[derive(Debug, Clone, Copy)]
pub struct KnownStation {
    pub id: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub connector: &'static str,
}

impl KnownStation {
    pub fn to_station(&self) -> Station {
        Station {
            id: self.id.to_string(),
            name: self.name.to_string(),
            state: "Andhra Pradesh".to_string(),
            city: "Visakhapatnam".to_string(),
            address: self.address.to_string(),
            latitude: self.lat,
            longitude: self.lng,
            connector_type: self.connector.to_string(),
        }
    }
}

pub const VIZAG_STATIONS: &[KnownStation] = &[
    KnownStation { id: "19", name: "ChargeZone Fast Charger", address: "Anandapuram", lat: 17.8991, lng: 83.3860, connector: "DC Fast Charger" },
    KnownStation { id: "20", name: "ChargeZone Fast Charger", address: "10-28-3, Uplands", lat: 17.7210, lng: 83.3121, connector: "DC Fast Charger" },
    KnownStation { id: "21", name: "IndianOil EV Station", address: "IOCL Hanumanthawaka", lat: 17.6832, lng: 83.1909, connector: "DC Fast Charger" },
    KnownStation { id: "23", name: "Jio-bp pulse", address: "Road No 5", lat: 17.8285, lng: 83.3585, connector: "DC Fast Charger" },
    KnownStation { id: "24", name: "OLA EV Station", address: "Nad Junction", lat: 17.7447, lng: 83.2318, connector: "DC Fast Charger" },
    KnownStation { id: "28", name: "Zeon Charging", address: "48-8-17, 1st Floor", lat: 17.7267, lng: 83.3070, connector: "AC Charger" },
    KnownStation { id: "29", name: "Ather Grid", address: "NH16, Beside Varun Motors", lat: 17.8184, lng: 83.3444, connector: "DC Fast Charger" },
    KnownStation { id: "30", name: "FreshBus Station", address: "Ambedkar Colony", lat: 17.8150, lng: 83.3490, connector: "AC Charger" },
];

pub fn vizag_stations() -> Vec<Station> {
    VIZAG_STATIONS.iter().map(KnownStation::to_station).collect()
}
