// Library for tests to access modules

pub mod cloudwatch_repo;
pub mod collector;
pub mod config;
pub mod ec2_repo;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod report;
pub mod throttle;
pub mod version;
