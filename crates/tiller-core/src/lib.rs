pub mod config;
pub mod error;
pub mod matrix;
pub mod persist;
pub mod types;

pub use config::{DEFAULT_NUM_BUILDS, MatrixDocument, TillerSettings, validate_bucket_count};
pub use error::{TillerError, TillerResult};
pub use matrix::{EnvVar, MatrixEntry, TEST_SUITE_KEY, parse_ignore_set};
pub use types::*;
