pub mod insight;
pub mod job;
pub mod report;
