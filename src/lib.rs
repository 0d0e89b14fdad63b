pub mod agent;
pub mod app_state;
pub mod config;
pub mod db;
pub mod entities;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod repositories;
pub mod search;
pub mod summarizer;
pub mod telemetry;
pub mod web;
