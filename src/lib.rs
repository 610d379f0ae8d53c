// Library interface for racepace
// This allows integration tests to access internal modules

pub mod config;
pub mod dashboard;
pub mod dispatcher;
pub mod errors;
pub mod fetch;
pub mod form;
pub mod mapper;
pub mod prediction;
pub mod shell;

// Re-export commonly used types
pub use dashboard::Dashboard;
pub use errors::{DISPLAY_FAILURE_MESSAGE, RacePaceError};
pub use fetch::{FetchSlot, FetchState};
pub use form::{FormField, PredictionForm, Violation};
pub use mapper::{LapPredictionView, RacePaceView};
pub use prediction::{ApiRequest, Compound, HttpPredictionClient, PredictionBackend, RequestParameters};
pub use shell::View;
