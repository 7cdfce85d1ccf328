pub mod api;
pub mod config;
pub mod data_models;
pub mod db;
pub mod gemini;
pub mod normalizer;
pub mod resolver;
pub mod service;
pub mod store;
