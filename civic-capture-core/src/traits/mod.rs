pub mod capture_delegate;
pub mod capture_provider;
pub mod capture_session;
pub mod geolocation;
pub mod storage;
