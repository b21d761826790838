pub mod application;
pub mod candidate;
pub mod job;
pub mod technical_test;
