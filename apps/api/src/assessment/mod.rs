pub mod generator;
pub mod grading;
pub mod handlers;
