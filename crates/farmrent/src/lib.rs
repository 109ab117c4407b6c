//! FarmRent core: marketplace workflows matching farmer interest to landlord
//! land posts, plus the configuration, telemetry, and error plumbing shared by
//! the API service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
