pub mod audit;
pub mod company;
pub mod contact;
pub mod extractor;
pub mod narrative;
pub mod scraped_document;
pub mod service;
pub mod tech_stack;
