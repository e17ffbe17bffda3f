mod app_jobs;
mod config;
mod registry;
mod worker;

pub use {
    config::WorkerConfig,
    registry::WorkerJob,
    worker::Worker,
};
