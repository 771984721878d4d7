pub mod error;
pub mod formats;
pub mod model;

pub use error::AppError;
pub use formats::build_format_list;
pub use model::{DownloadSession, FormatDescriptor};
