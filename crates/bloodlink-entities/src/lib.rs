//! SeaORM entities for the BloodLink schema

pub mod blood_requests;
pub mod donors;
pub mod mail;
