mod common;
mod scoring;
mod trend;
