pub mod enrichment;
pub mod fetcher;
pub mod generator;
pub mod openai_client;
pub mod tech_detector;

pub use enrichment::*;
pub use fetcher::*;
pub use generator::*;
pub use openai_client::*;
pub use tech_detector::*;
