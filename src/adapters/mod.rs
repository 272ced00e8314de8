// Adapters layer: concrete implementations for external systems (the HTTP
// API and the leaflet image output). Config and storage live under src/config.

pub mod http;
pub mod leaflet;
