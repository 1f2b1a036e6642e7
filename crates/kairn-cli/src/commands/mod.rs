pub mod audit;
pub mod dispatch;
pub mod export;
pub mod shared;
pub mod sidecar;
pub mod unit;
pub mod version;
