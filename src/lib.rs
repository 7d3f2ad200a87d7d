
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod reader;
pub mod template;
pub mod workbook;

pub type Result<T> = std::result::Result<T, error::TemplateError>;
