/// Background jobs
pub mod report_sweeper;
