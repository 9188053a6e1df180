pub mod export;
mod parser;
pub mod scraper;
pub mod throttle;
pub mod traversal;
pub mod types;
pub mod utils;

pub use export::{ExportError, ExportFormat};
pub use parser::ParseError;
pub use scraper::{ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://genealogy.math.ndsu.nodak.edu";
