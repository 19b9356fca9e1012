pub mod dataset;
pub mod duration;
pub mod output;
pub mod parser;
pub mod queries;
pub mod records;
