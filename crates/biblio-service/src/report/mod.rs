//! Read-only reporting services.

pub mod service;

pub use service::{
    DailySummary, DashboardStats, GenrePopularityReport, MonthlyTrend, MonthlyTrendReport,
    ReportService, UserStatistics,
};
