pub mod generator;
pub mod rate_limit;
pub mod storage;
pub mod telemetry;
