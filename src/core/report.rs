//! Weekly usage reporting.
//!
//! Produces the "3/5 this week" badges shown next to templates and tags, and a
//! plain-text summary of one week. All functions return structured data or
//! strings and leave presentation to the caller.

use super::{
    accountant::WeeklyUsageAccountant,
    usage,
    week::WeekKey,
};
use crate::errors::Result;
use sea_orm::ConnectionTrait;
use serde::Serialize;

/// Usage of one template in a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateUsage {
    /// Template id
    pub template_id: i64,
    /// Template name
    pub name: String,
    /// Completed uses in the week
    pub used: usize,
    /// Hard weekly limit, if any
    pub weekly_limit: Option<i32>,
}

impl TemplateUsage {
    /// Whether another completed use would be blocked.
    #[must_use]
    pub fn limit_reached(&self) -> bool {
        reached(self.used, self.weekly_limit)
    }
}

/// Usage of one tag (with its descendants) in a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagUsage {
    /// Tag id
    pub tag_id: i64,
    /// User-facing label
    pub display_name: String,
    /// Completed uses in the week
    pub used: usize,
    /// Soft weekly suggestion, if any
    pub weekly_suggestion: Option<i32>,
}

impl TagUsage {
    /// Whether another use would trigger a warning.
    #[must_use]
    pub fn suggestion_reached(&self) -> bool {
        reached(self.used, self.weekly_suggestion)
    }
}

/// Usage of the whole catalog in one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    /// The reported week
    pub week: WeekKey,
    /// Every template, sorted by name
    pub templates: Vec<TemplateUsage>,
    /// Tags with a suggestion or non-zero usage, sorted by display name
    pub tags: Vec<TagUsage>,
}

fn reached(used: usize, cap: Option<i32>) -> bool {
    cap.and_then(|cap| usize::try_from(cap).ok())
        .is_some_and(|cap| used >= cap)
}

/// Builds the report for `week` from an already loaded accountant.
///
/// Each tag counts only its own subtree, so a looping or dangling parent
/// chain elsewhere in the hierarchy does not make the report fail.
pub fn build_weekly_report(
    accountant: &WeeklyUsageAccountant,
    week: WeekKey,
) -> Result<WeeklyReport> {
    let mut templates: Vec<TemplateUsage> = accountant
        .templates()
        .map(|template| TemplateUsage {
            template_id: template.id,
            name: template.name.clone(),
            used: accountant.count_for_template(template.id, week),
            weekly_limit: template.weekly_limit,
        })
        .collect();
    templates.sort_by(|a, b| a.name.cmp(&b.name));

    let mut tags = Vec::new();
    for tag in accountant.tags() {
        let used = accountant.count_for_tag(tag.id, week)?;
        if used > 0 || tag.weekly_suggestion.is_some() {
            tags.push(TagUsage {
                tag_id: tag.id,
                display_name: tag.display_name.clone(),
                used,
                weekly_suggestion: tag.weekly_suggestion,
            });
        }
    }
    tags.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    Ok(WeeklyReport {
        week,
        templates,
        tags,
    })
}

/// Loads the store and builds the report for `week`.
pub async fn generate_weekly_report<C: ConnectionTrait>(db: &C, week: WeekKey) -> Result<WeeklyReport> {
    let accountant = usage::load_accountant(db, week).await?;
    build_weekly_report(&accountant, week)
}

/// Formats a usage badge.
///
/// # Returns
/// `"3/5 this week"` when a cap is set, `"3 this week"` otherwise.
#[must_use]
pub fn format_usage_badge(used: usize, cap: Option<i32>) -> String {
    cap.map_or_else(
        || format!("{used} this week"),
        |cap| format!("{used}/{cap} this week"),
    )
}

/// Renders a report as multi-line text.
#[must_use]
pub fn format_weekly_summary(report: &WeeklyReport) -> String {
    let iso = report.week.iso_week();
    let mut summary = format!(
        "Week of {} ({}-W{:02})\n",
        report.week,
        iso.year(),
        iso.week()
    );

    summary.push_str("Templates:\n");
    if report.templates.is_empty() {
        summary.push_str("  (none)\n");
    }
    for template in &report.templates {
        let marker = if template.limit_reached() {
            " [limit reached]"
        } else {
            ""
        };
        summary.push_str(&format!(
            "  {}: {}{marker}\n",
            template.name,
            format_usage_badge(template.used, template.weekly_limit)
        ));
    }

    if !report.tags.is_empty() {
        summary.push_str("Tags:\n");
        for tag in &report.tags {
            let marker = if tag.suggestion_reached() {
                " [suggestion reached]"
            } else {
                ""
            };
            summary.push_str(&format!(
                "  {}: {}{marker}\n",
                tag.display_name,
                format_usage_badge(tag.used, tag.weekly_suggestion)
            ));
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::week::week_key,
        test_utils::{
            create_test_option, create_test_tag, create_test_template, log_completed, plan_entry,
            setup_test_db,
        },
    };
    use chrono::NaiveDate;

    #[test]
    fn test_format_usage_badge() {
        assert_eq!(format_usage_badge(3, Some(5)), "3/5 this week");
        assert_eq!(format_usage_badge(3, None), "3 this week");
        assert_eq!(format_usage_badge(0, Some(0)), "0/0 this week");
    }

    #[test]
    fn test_reached_thresholds() {
        assert!(reached(2, Some(2)));
        assert!(!reached(1, Some(2)));
        assert!(reached(0, Some(0)));
        assert!(!reached(10, None));
        assert!(!reached(10, Some(-1)));
    }

    #[test]
    fn test_format_empty_summary() {
        let report = WeeklyReport {
            week: week_key(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
            templates: vec![],
            tags: vec![],
        };
        assert_eq!(
            format_weekly_summary(&report),
            "Week of 2024-12-30 (2025-W01)\nTemplates:\n  (none)\n"
        );
    }

    #[tokio::test]
    async fn test_report_survives_looping_tag_chain() -> Result<()> {
        use crate::entities::tag;
        use sea_orm::{ActiveModelTrait, Set};

        let db = setup_test_db().await?;
        let pizza = create_test_tag(&db, "pizza", Some(1), None).await?;
        let lievitati = create_test_tag(&db, "lievitati", None, Some(pizza.id)).await?;
        let mut active: tag::ActiveModel = pizza.clone().into();
        active.parent_tag_id = Set(Some(lievitati.id));
        active.update(&db).await?;

        let template = create_test_template(&db, "Pizza", None).await?;
        let option = create_test_option(&db, template.id, "margherita", &[pizza.id]).await?;
        let monday = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
        log_completed(&db, option.id, monday).await?;

        let report = generate_weekly_report(&db, week_key(monday)).await?;
        assert_eq!(report.templates[0].used, 1);
        assert!(report.tags.iter().all(|t| t.used == 1));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_weekly_report_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let pasta_tag = create_test_tag(&db, "pasta", Some(2), None).await?;
        let integrale = create_test_tag(&db, "pasta_integrale", None, Some(pasta_tag.id)).await?;
        create_test_tag(&db, "funghi", None, None).await?;
        let pasta = create_test_template(&db, "Pasta", Some(2)).await?;
        let yogurt = create_test_template(&db, "Yogurt", None).await?;
        let option = create_test_option(&db, pasta.id, "integrale", &[integrale.id]).await?;
        let greco = create_test_option(&db, yogurt.id, "greco", &[]).await?;

        let monday = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
        log_completed(&db, option.id, monday).await?;
        log_completed(&db, option.id, monday.succ_opt().unwrap()).await?;
        log_completed(&db, greco.id, monday).await?;
        plan_entry(&db, greco.id, monday).await?;

        let report = generate_weekly_report(&db, week_key(monday)).await?;
        assert_eq!(report.templates.len(), 2);
        assert_eq!(report.templates[0].name, "Pasta");
        assert_eq!(report.templates[0].used, 2);
        assert!(report.templates[0].limit_reached());
        assert_eq!(report.templates[1].used, 1);
        assert!(!report.templates[1].limit_reached());

        // "funghi" has neither usage nor a suggestion.
        let tag_names: Vec<&str> = report.tags.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(tag_names, vec!["pasta", "pasta_integrale"]);
        assert_eq!(report.tags[0].used, 2);
        assert!(report.tags[0].suggestion_reached());

        let summary = format_weekly_summary(&report);
        assert!(summary.starts_with("Week of 2024-11-04 (2024-W45)\n"));
        assert!(summary.contains("  Pasta: 2/2 this week [limit reached]\n"));
        assert!(summary.contains("  Yogurt: 1 this week\n"));
        assert!(summary.contains("  pasta: 2/2 this week [suggestion reached]\n"));

        let next_week = generate_weekly_report(&db, week_key(monday).next()).await?;
        assert!(next_week.templates.iter().all(|t| t.used == 0));
        Ok(())
    }
}
