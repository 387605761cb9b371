pub mod cli;
pub mod config;
pub mod data_models;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod output;
pub mod pipeline;
pub mod query;
