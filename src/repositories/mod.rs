pub mod report;

pub use report::ReportRepository;
