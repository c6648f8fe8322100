pub mod collate;
pub mod error;
pub use error::AppError;
