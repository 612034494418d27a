pub mod admission;
pub mod algorithms;
pub mod config;
pub mod config_validator;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod mode;
pub mod mode_store;
pub mod response;
pub mod server;
pub mod token_bucket;
pub mod validation;

pub use admission::AdmissionController;
pub use algorithms::{AdmissionStrategy, StrategyKind, Verdict};
pub use config::Config;
pub use error::{ThrottlerError, ThrottlerResult};
pub use mode::{Intensity, OperatingMode};
pub use mode_store::ModeStore;
pub use server::create_app;
