pub mod capture_sink;
pub mod shared_sink;
