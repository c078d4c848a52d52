pub mod clock;
pub mod config;
pub mod coordinator;
pub mod dataset;
pub mod geometry;
pub mod headless;
pub mod noise;
pub mod param;
pub mod result;
pub mod sampler;
pub mod state;
pub mod timeline;
pub mod transfer;
