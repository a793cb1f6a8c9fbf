//! Course dashboard analytics.
//!
//! Everything here is a client-side rollup over raw enrollment and view
//! rows; nothing is persisted. Revenue is the course price times its paid
//! enrollments inside the selected window.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use jconnect_models::{Course, CourseView, Enrollment};
use jconnect_supabase::{CourseRepository, EnrollmentRepository, SupabaseClient};

use crate::error::AppResult;

/// Time window the dashboard can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticsRange {
    Days7,
    #[default]
    Days30,
    Days90,
    OneYear,
}

impl AnalyticsRange {
    /// Length of the window.
    pub fn duration(&self) -> Duration {
        match self {
            AnalyticsRange::Days7 => Duration::days(7),
            AnalyticsRange::Days30 => Duration::days(30),
            AnalyticsRange::Days90 => Duration::days(90),
            AnalyticsRange::OneYear => Duration::days(365),
        }
    }

    /// Oldest timestamp inside the window, as of `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    /// Label shown on the range picker.
    pub fn label(&self) -> &'static str {
        match self {
            AnalyticsRange::Days7 => "Last 7 days",
            AnalyticsRange::Days30 => "Last 30 days",
            AnalyticsRange::Days90 => "Last 90 days",
            AnalyticsRange::OneYear => "Last year",
        }
    }
}

/// Rollup line for a single course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseStats {
    pub course_id: String,
    pub title: String,
    pub enrollments: usize,
    pub paid_enrollments: usize,
    pub views: usize,
    /// Course price times paid enrollments, in rupees.
    pub revenue: i64,
}

impl CourseStats {
    /// Enrollments per view; zero when the course has no views yet.
    pub fn engagement(&self) -> f64 {
        if self.views == 0 {
            0.0
        } else {
            self.enrollments as f64 / self.views as f64
        }
    }
}

/// Dashboard rollup across an employer's courses.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseAnalytics {
    pub range: AnalyticsRange,
    pub per_course: Vec<CourseStats>,
    pub total_enrollments: usize,
    pub total_views: usize,
    pub total_revenue: i64,
}

impl CourseAnalytics {
    /// Compute the rollup from raw rows.
    ///
    /// Only rows created inside the window count; the course list itself is
    /// not windowed, so older courses still show lines (possibly at zero).
    pub fn compute(
        courses: &[Course],
        enrollments: &[Enrollment],
        views: &[CourseView],
        range: AnalyticsRange,
        now: DateTime<Utc>,
    ) -> Self {
        let cutoff = range.cutoff(now);
        let mut per_course = Vec::with_capacity(courses.len());
        let mut total_enrollments = 0;
        let mut total_views = 0;
        let mut total_revenue = 0;

        for course in courses {
            let course_id = course.id.as_str();

            let mut enrolled = 0;
            let mut paid = 0;
            for enrollment in enrollments {
                if enrollment.course_id == course_id && enrollment.created_at >= cutoff {
                    enrolled += 1;
                    if enrollment.paid {
                        paid += 1;
                    }
                }
            }
            let view_count = views
                .iter()
                .filter(|v| v.course_id == course_id && v.created_at >= cutoff)
                .count();
            let revenue = course.effective_price() * paid as i64;

            total_enrollments += enrolled;
            total_views += view_count;
            total_revenue += revenue;

            per_course.push(CourseStats {
                course_id: course_id.to_string(),
                title: course.title.clone(),
                enrollments: enrolled,
                paid_enrollments: paid,
                views: view_count,
                revenue,
            });
        }

        debug!(
            courses = courses.len(),
            total_enrollments, total_views, total_revenue, "Analytics computed"
        );
        Self {
            range,
            per_course,
            total_enrollments,
            total_views,
            total_revenue,
        }
    }

    /// Fetch an employer's rows and compute the rollup.
    ///
    /// Enrollments and views load concurrently once the course list is in.
    pub async fn load(
        client: &SupabaseClient,
        employer_id: &str,
        range: AnalyticsRange,
    ) -> AppResult<Self> {
        let courses_repo = CourseRepository::new(client.clone());
        let enrollments_repo = EnrollmentRepository::new(client.clone());

        let courses = courses_repo.list_for_employer(employer_id).await?;
        let ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        let (enrollments, views) = tokio::try_join!(
            enrollments_repo.list_for_courses(&ids),
            enrollments_repo.list_views_for_courses(&ids),
        )?;

        Ok(Self::compute(
            &courses,
            &enrollments,
            &views,
            range,
            Utc::now(),
        ))
    }

    /// Engagement across every course: total enrollments per total view.
    pub fn overall_engagement(&self) -> f64 {
        if self.total_views == 0 {
            0.0
        } else {
            self.total_enrollments as f64 / self.total_views as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jconnect_models::{CourseId, CourseStatus};

    fn course(id: &str, title: &str, is_free: bool, price: Option<i64>) -> Course {
        let now = Utc::now();
        Course {
            id: CourseId(id.to_string()),
            employer_id: "emp-1".to_string(),
            title: title.to_string(),
            category: None,
            description: String::new(),
            cover_photo_url: None,
            price,
            is_free,
            course_link: None,
            redirect_link: None,
            manual_approval: false,
            status: CourseStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }

    fn enrollment(course_id: &str, paid: bool, days_ago: i64) -> Enrollment {
        let mut e = Enrollment::new(course_id, "user-x", paid);
        e.created_at = Utc::now() - Duration::days(days_ago);
        e
    }

    fn view(course_id: &str, days_ago: i64) -> CourseView {
        let mut v = CourseView::new(course_id, Some("user-x".to_string()));
        v.created_at = Utc::now() - Duration::days(days_ago);
        v
    }

    #[test]
    fn test_revenue_is_price_times_paid_enrollments() {
        let courses = vec![
            course("c1", "Excel", false, Some(499)),
            course("c2", "English", true, None),
        ];
        let enrollments = vec![
            enrollment("c1", true, 1),
            enrollment("c1", true, 2),
            enrollment("c1", false, 3),
            enrollment("c2", false, 1),
        ];
        let stats =
            CourseAnalytics::compute(&courses, &enrollments, &[], AnalyticsRange::Days30, Utc::now());

        assert_eq!(stats.per_course[0].revenue, 998);
        assert_eq!(stats.per_course[0].enrollments, 3);
        assert_eq!(stats.per_course[0].paid_enrollments, 2);
        // Free course never produces revenue
        assert_eq!(stats.per_course[1].revenue, 0);
        assert_eq!(stats.total_revenue, 998);
        assert_eq!(stats.total_enrollments, 4);
    }

    #[test]
    fn test_window_excludes_older_rows() {
        let courses = vec![course("c1", "Excel", false, Some(100))];
        let enrollments = vec![
            enrollment("c1", true, 2),
            enrollment("c1", true, 10), // outside a 7-day window
        ];
        let views = vec![view("c1", 1), view("c1", 40)];

        let week =
            CourseAnalytics::compute(&courses, &enrollments, &views, AnalyticsRange::Days7, Utc::now());
        assert_eq!(week.per_course[0].enrollments, 1);
        assert_eq!(week.per_course[0].views, 1);
        assert_eq!(week.total_revenue, 100);

        let month = CourseAnalytics::compute(
            &courses,
            &enrollments,
            &views,
            AnalyticsRange::Days30,
            Utc::now(),
        );
        assert_eq!(month.per_course[0].enrollments, 2);
        assert_eq!(month.per_course[0].views, 1);
        assert_eq!(month.total_revenue, 200);

        let year = CourseAnalytics::compute(
            &courses,
            &enrollments,
            &views,
            AnalyticsRange::OneYear,
            Utc::now(),
        );
        assert_eq!(year.per_course[0].views, 2);
    }

    #[test]
    fn test_engagement_ratio() {
        let stats = CourseStats {
            course_id: "c1".to_string(),
            title: "Excel".to_string(),
            enrollments: 3,
            paid_enrollments: 0,
            views: 12,
            revenue: 0,
        };
        assert!((stats.engagement() - 0.25).abs() < f64::EPSILON);

        let unseen = CourseStats { views: 0, ..stats };
        assert_eq!(unseen.engagement(), 0.0);
    }

    #[test]
    fn test_courses_without_activity_still_get_lines() {
        let courses = vec![course("c1", "Excel", false, Some(100))];
        let stats = CourseAnalytics::compute(&courses, &[], &[], AnalyticsRange::Days30, Utc::now());
        assert_eq!(stats.per_course.len(), 1);
        assert_eq!(stats.per_course[0].enrollments, 0);
        assert_eq!(stats.overall_engagement(), 0.0);
    }
}
