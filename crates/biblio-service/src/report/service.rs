//! Reporting aggregation over the checkout and activity ledgers.
//!
//! All queries here are plain reads: no row locks, so reports never block
//! circulation. Each public method retries once on infrastructure errors.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use biblio_core::config::circulation::CirculationConfig;
use biblio_core::result::AppResult;
use biblio_database::repositories::activity::ActivityRepository;
use biblio_database::repositories::book::BookRepository;
use biblio_database::repositories::checkout::CheckoutRepository;
use biblio_database::repositories::user::UserRepository;
use biblio_database::retry::retry_read;
use biblio_entity::activity::ActivityType;
use biblio_entity::report::{DailyCheckoutCount, GenreCount, PopularBook};

/// Ranking size for the dashboard's popular-books list.
const TOP_BOOKS: i64 = 5;
/// Days covered by the dashboard's checkout trend.
const TREND_DAYS: i64 = 7;

/// Builds aggregate reports for members and admins.
#[derive(Debug, Clone)]
pub struct ReportService {
    /// Book repository.
    book_repo: Arc<BookRepository>,
    /// Checkout repository.
    checkout_repo: Arc<CheckoutRepository>,
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Activity ledger repository.
    activity_repo: Arc<ActivityRepository>,
    /// Reporting windows.
    config: CirculationConfig,
}

/// Checkout counts per genre, most borrowed first.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GenrePopularityReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Per-genre checkout counts, descending. Genres nobody has borrowed
    /// appear with a zero count.
    pub genres: Vec<GenreCount>,
}

/// What happened today (UTC calendar day).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DailySummary {
    /// The day being summarized.
    pub day: NaiveDate,
    /// Checkouts recorded today.
    pub checkouts: i64,
    /// Check-ins recorded today.
    pub checkins: i64,
    /// Logins recorded today.
    pub logins: i64,
    /// Signups recorded today.
    pub signups: i64,
    /// Distinct members who borrowed something today.
    pub active_borrowers: i64,
}

/// Checkout volume for one month of the trend window.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MonthlyTrend {
    /// Month key, formatted `YYYY-MM`.
    pub month: String,
    /// All checkouts during the month.
    pub total_checkouts: i64,
    /// Per-genre breakdown, most borrowed first.
    pub genres: Vec<GenreCount>,
}

/// Checkouts per month and genre over the trailing window.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MonthlyTrendReport {
    /// One entry per month, oldest first. Months without checkouts are
    /// present with zero totals.
    pub months: Vec<MonthlyTrend>,
}

/// One member's borrowing profile.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserStatistics {
    /// The member.
    pub user_id: String,
    /// Lifetime checkouts.
    pub total_checkouts: i64,
    /// Checkouts currently open.
    pub open_checkouts: i64,
    /// The genre the member borrows most; ties keep the first genre
    /// encountered scanning counts in descending order.
    pub favorite_genre: Option<String>,
    /// Days between the member's first and most recent checkout within
    /// the streak window.
    pub reading_streak_days: i64,
}

/// The admin landing-page aggregate.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DashboardStats {
    /// Titles in the catalog.
    pub total_books: i64,
    /// Copies owned across all titles.
    pub total_copies: i64,
    /// Copies currently out.
    pub copies_on_loan: i64,
    /// Registered users.
    pub total_members: i64,
    /// Today's activity.
    pub today: DailySummary,
    /// Most borrowed titles by copies currently out.
    pub popular_books: Vec<PopularBook>,
    /// Daily checkout counts for the trailing week, zero-filled.
    pub checkout_trend: Vec<DailyCheckoutCount>,
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(
        book_repo: Arc<BookRepository>,
        checkout_repo: Arc<CheckoutRepository>,
        user_repo: Arc<UserRepository>,
        activity_repo: Arc<ActivityRepository>,
        config: CirculationConfig,
    ) -> Self {
        Self {
            book_repo,
            checkout_repo,
            user_repo,
            activity_repo,
            config,
        }
    }

    /// Checkout counts per genre across the whole catalog.
    pub async fn genre_popularity(&self) -> AppResult<GenrePopularityReport> {
        let genres = retry_read(|| self.checkout_repo.genre_counts()).await?;
        Ok(GenrePopularityReport {
            generated_at: Utc::now(),
            genres,
        })
    }

    /// Today's checkouts, check-ins, logins, and signups.
    pub async fn daily_summary(&self) -> AppResult<DailySummary> {
        retry_read(|| self.compute_daily_summary()).await
    }

    /// Checkouts per month and genre over the configured trailing window.
    pub async fn monthly_trends(&self) -> AppResult<MonthlyTrendReport> {
        retry_read(|| self.compute_monthly_trends()).await
    }

    /// One member's borrowing profile.
    pub async fn user_statistics(&self, user_id: &str) -> AppResult<UserStatistics> {
        retry_read(|| self.compute_user_statistics(user_id)).await
    }

    /// The admin dashboard aggregate.
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        retry_read(|| self.compute_dashboard()).await
    }

    async fn compute_daily_summary(&self) -> AppResult<DailySummary> {
        let now = Utc::now();
        let since = day_start(now);

        let checkouts = self.checkout_repo.count_checkouts_since(since).await?;
        let checkins = self.checkout_repo.count_checkins_since(since).await?;
        let logins = self
            .activity_repo
            .count_since(ActivityType::Login, since)
            .await?;
        let signups = self
            .activity_repo
            .count_since(ActivityType::Signup, since)
            .await?;
        let active_borrowers = self.checkout_repo.distinct_borrowers_since(since).await?;

        Ok(DailySummary {
            day: now.date_naive(),
            checkouts,
            checkins,
            logins,
            signups,
            active_borrowers,
        })
    }

    async fn compute_monthly_trends(&self) -> AppResult<MonthlyTrendReport> {
        let today = Utc::now().date_naive();
        let months = self.config.trend_window_months;
        let since = window_start(today, months);

        let rows = self.checkout_repo.monthly_counts(since).await?;

        let mut by_month: HashMap<String, Vec<GenreCount>> = HashMap::new();
        for row in rows {
            by_month
                .entry(row.month)
                .or_default()
                .push(GenreCount {
                    genre: row.genre,
                    checkout_count: row.checkout_count,
                });
        }

        let months = month_window(today, months)
            .into_iter()
            .map(|month| {
                let genres = by_month.remove(&month).unwrap_or_default();
                let total_checkouts = genres.iter().map(|g| g.checkout_count).sum();
                MonthlyTrend {
                    month,
                    total_checkouts,
                    genres,
                }
            })
            .collect();

        Ok(MonthlyTrendReport { months })
    }

    async fn compute_user_statistics(&self, user_id: &str) -> AppResult<UserStatistics> {
        let (total_checkouts, open_checkouts) = self.checkout_repo.user_totals(user_id).await?;
        let genre_counts = self.checkout_repo.genre_counts_for_user(user_id).await?;

        let streak_since = Utc::now() - Duration::days(self.config.streak_window_days);
        let span = self.checkout_repo.checkout_span(user_id, streak_since).await?;

        Ok(UserStatistics {
            user_id: user_id.to_string(),
            total_checkouts,
            open_checkouts,
            favorite_genre: favorite_genre(&genre_counts),
            reading_streak_days: streak_days(span),
        })
    }

    async fn compute_dashboard(&self) -> AppResult<DashboardStats> {
        let total_books = self.book_repo.count().await?;
        let (total_copies, copies_on_loan) = self.book_repo.copy_totals().await?;
        let total_members = self.user_repo.count().await?;

        let today = self.compute_daily_summary().await?;
        let popular_books = self.checkout_repo.top_books(TOP_BOOKS).await?;

        let trend_start = Utc::now().date_naive() - Duration::days(TREND_DAYS - 1);
        let raw_trend = self
            .checkout_repo
            .daily_counts_since(trend_start.and_time(NaiveTime::MIN).and_utc())
            .await?;

        Ok(DashboardStats {
            total_books,
            total_copies,
            copies_on_loan,
            total_members,
            today,
            popular_books,
            checkout_trend: zero_filled_trend(trend_start, TREND_DAYS, &raw_trend),
        })
    }
}

/// Midnight UTC of the given instant's calendar day.
fn day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// First day of the month `date` belongs to.
fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `YYYY-MM` keys for the trailing window ending in `today`'s month,
/// oldest first.
fn month_window(today: NaiveDate, months: u32) -> Vec<String> {
    let mut first = month_start(today);
    let mut keys = Vec::with_capacity(months as usize);
    for _ in 0..months.max(1) {
        keys.push(first.format("%Y-%m").to_string());
        let prev_month_end = first.pred_opt().unwrap_or(first);
        first = month_start(prev_month_end);
    }
    keys.reverse();
    keys
}

/// Midnight UTC of the first day of the oldest month in the window.
fn window_start(today: NaiveDate, months: u32) -> DateTime<Utc> {
    let mut first = month_start(today);
    for _ in 1..months.max(1) {
        let prev_month_end = first.pred_opt().unwrap_or(first);
        first = month_start(prev_month_end);
    }
    first.and_time(NaiveTime::MIN).and_utc()
}

/// The most borrowed genre; ties keep the earliest row.
fn favorite_genre(counts: &[GenreCount]) -> Option<String> {
    counts
        .iter()
        .fold(None::<&GenreCount>, |best, row| match best {
            Some(b) if b.checkout_count >= row.checkout_count => Some(b),
            _ => Some(row),
        })
        .map(|g| g.genre.clone())
}

/// Day span between the first and most recent checkout of the window;
/// zero when the window is empty or holds a single day.
fn streak_days(span: Option<(DateTime<Utc>, DateTime<Utc>)>) -> i64 {
    span.map(|(first, last)| (last.date_naive() - first.date_naive()).num_days())
        .unwrap_or(0)
}

/// Expand sparse per-day counts into a dense window starting at `start`.
fn zero_filled_trend(
    start: NaiveDate,
    days: i64,
    counts: &[DailyCheckoutCount],
) -> Vec<DailyCheckoutCount> {
    let by_day: HashMap<NaiveDate, i64> = counts
        .iter()
        .map(|c| (c.day, c.checkout_count))
        .collect();

    (0..days)
        .map(|offset| {
            let day = start + Duration::days(offset);
            DailyCheckoutCount {
                day,
                checkout_count: by_day.get(&day).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn genre(name: &str, count: i64) -> GenreCount {
        GenreCount {
            genre: name.to_string(),
            checkout_count: count,
        }
    }

    #[test]
    fn test_month_window_wraps_year() {
        let keys = month_window(date(2024, 1, 15), 3);
        assert_eq!(keys, vec!["2023-11", "2023-12", "2024-01"]);
    }

    #[test]
    fn test_window_start_is_first_of_oldest_month() {
        let start = window_start(date(2024, 3, 31), 6);
        assert_eq!(start.date_naive(), date(2023, 10, 1));
    }

    #[test]
    fn test_favorite_genre_tie_keeps_first() {
        let counts = vec![genre("Mystery", 4), genre("Fantasy", 4), genre("Poetry", 1)];
        assert_eq!(favorite_genre(&counts).as_deref(), Some("Mystery"));
        assert_eq!(favorite_genre(&[]), None);
    }

    #[test]
    fn test_streak_is_first_to_latest_day_span() {
        let first = date(2024, 5, 1).and_hms_opt(9, 0, 0).unwrap().and_utc();
        let last = date(2024, 5, 8).and_hms_opt(21, 30, 0).unwrap().and_utc();
        assert_eq!(streak_days(Some((first, last))), 7);
        assert_eq!(streak_days(Some((first, first))), 0);
        assert_eq!(streak_days(None), 0);
    }

    #[test]
    fn test_zero_filled_trend_covers_every_day() {
        let counts = vec![DailyCheckoutCount {
            day: date(2024, 5, 3),
            checkout_count: 2,
        }];
        let trend = zero_filled_trend(date(2024, 5, 1), 4, &counts);
        assert_eq!(trend.len(), 4);
        assert_eq!(trend[0].checkout_count, 0);
        assert_eq!(trend[2].checkout_count, 2);
        assert_eq!(trend[3].day, date(2024, 5, 4));
    }
}
