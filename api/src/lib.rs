//! Admin backend for the investment platform: wallet administration, plan
//! catalog, deposit review and the scheduled daily ROI job.

pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{AppError, AppResult};
pub use routes::router;
pub use state::AppState;
