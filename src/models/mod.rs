pub mod app_config;
pub mod entry;
pub mod hydro;
pub mod kegel;
pub mod resource;
pub mod uro;

pub use app_config::AppConfig;
pub use entry::LogEntry;
pub use hydro::HydroLogEntry;
pub use kegel::KegelLogEntry;
pub use resource::CustomResource;
pub use uro::UroLogEntry;
