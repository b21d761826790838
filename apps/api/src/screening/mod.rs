pub mod handlers;
pub mod scoring;
pub mod skills;
pub mod status;
