pub mod use_cases;

pub use use_cases::uploader::{FileInfo, Uploader, UploaderView};
