//! Weekly usage accounting and limit evaluation.
//!
//! [`WeeklyUsageAccountant`] works on a snapshot of templates, options (with
//! their tag ids), tags and entries that has already been fetched from the
//! store, so every method here is synchronous and free of I/O. Counts are
//! recomputed from the entries on every call; nothing is cached.
//!
//! Evaluation reads "before" counts only. Two callers evaluating at the same
//! time can both pass a limit that their combined inserts exceed; callers that
//! need a stricter guarantee must evaluate and insert inside one database
//! transaction (see [`crate::core::entry::log_entry`]).

use super::{
    entry::NewMealEntry,
    week::{WeekKey, week_key},
};
use crate::{
    entities::{meal_entry, meal_option, meal_template, tag},
    errors::{EntityKind, Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// An option together with the ids of the tags applied to it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedOption {
    /// The option record
    pub option: meal_option::Model,
    /// Directly applied tags (ancestors are not listed)
    pub tag_ids: Vec<i64>,
}

/// Outcome of evaluating a prospective entry.
///
/// `block_reasons` are hard stops (the entry must not be saved), `warnings`
/// are dismissible notices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether a hard limit forbids the entry
    pub blocked: bool,
    /// One line per violated hard limit
    pub block_reasons: Vec<String>,
    /// One line per reached soft suggestion
    pub warnings: Vec<String>,
}

impl Verdict {
    /// `true` when no hard limit was reached.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        !self.blocked
    }

    /// `true` when at least one soft suggestion was reached.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn block(&mut self, reason: String) {
        self.blocked = true;
        self.block_reasons.push(reason);
    }
}

/// In-memory view of the data needed to count weekly usage.
#[derive(Debug, Clone, Default)]
pub struct WeeklyUsageAccountant {
    templates: HashMap<i64, meal_template::Model>,
    options: HashMap<i64, TaggedOption>,
    tags: HashMap<i64, tag::Model>,
    entries: Vec<meal_entry::Model>,
}

impl WeeklyUsageAccountant {
    /// Builds an accountant from already-fetched records.
    ///
    /// `entries` may span several weeks and include planned entries; both
    /// are filtered per query.
    pub fn new(
        templates: impl IntoIterator<Item = meal_template::Model>,
        options: impl IntoIterator<Item = TaggedOption>,
        tags: impl IntoIterator<Item = tag::Model>,
        entries: impl IntoIterator<Item = meal_entry::Model>,
    ) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id, t)).collect(),
            options: options.into_iter().map(|o| (o.option.id, o)).collect(),
            tags: tags.into_iter().map(|t| (t.id, t)).collect(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Known templates, in no particular order.
    pub fn templates(&self) -> impl Iterator<Item = &meal_template::Model> {
        self.templates.values()
    }

    /// Known tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &tag::Model> {
        self.tags.values()
    }

    /// Looks up a template.
    pub fn template(&self, id: i64) -> Result<&meal_template::Model> {
        self.templates
            .get(&id)
            .ok_or_else(|| Error::not_found(EntityKind::Template, id))
    }

    /// Looks up an option with its tags.
    pub fn option(&self, id: i64) -> Result<&TaggedOption> {
        self.options
            .get(&id)
            .ok_or_else(|| Error::not_found(EntityKind::Option, id))
    }

    /// Looks up a tag.
    pub fn tag(&self, id: i64) -> Result<&tag::Model> {
        self.tags.get(&id).ok_or_else(|| Error::not_found(EntityKind::Tag, id))
    }

    fn completed_in(&self, week: WeekKey) -> impl Iterator<Item = &meal_entry::Model> {
        self.entries
            .iter()
            .filter(move |entry| entry.completed && week.contains(entry.date))
    }

    /// Completed entries of `option_id` in `week`.
    #[must_use]
    pub fn count_for_option(&self, option_id: i64, week: WeekKey) -> usize {
        self.completed_in(week)
            .filter(|entry| entry.meal_option_id == option_id)
            .count()
    }

    /// Sum of [`Self::count_for_option`] over every option of `template_id`.
    #[must_use]
    pub fn count_for_template(&self, template_id: i64, week: WeekKey) -> usize {
        self.options
            .values()
            .filter(|tagged| tagged.option.template_id == template_id)
            .map(|tagged| self.count_for_option(tagged.option.id, week))
            .sum()
    }

    /// Completed entries in `week` whose option carries `tag_id` or one of its descendants.
    ///
    /// Each entry counts at most once, however many of its tags roll up to `tag_id`.
    /// Only the subtree below `tag_id` is inspected, so damaged hierarchies
    /// elsewhere do not affect the count. Entries whose option is unknown carry
    /// no tags and are skipped.
    pub fn count_for_tag(&self, tag_id: i64, week: WeekKey) -> Result<usize> {
        let subtree = self.descendants_inclusive(tag_id)?;
        Ok(self
            .completed_in(week)
            .filter(|entry| {
                self.options.get(&entry.meal_option_id).is_some_and(|tagged| {
                    tagged.tag_ids.iter().any(|id| subtree.contains(id))
                })
            })
            .count())
    }

    /// `tag_id` and every tag below it, found by walking child links downward.
    pub fn descendants_inclusive(&self, tag_id: i64) -> Result<HashSet<i64>> {
        self.tag(tag_id)?;
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        for tag in self.tags.values() {
            if let Some(parent_id) = tag.parent_tag_id {
                children.entry(parent_id).or_default().push(tag.id);
            }
        }

        let mut subtree = HashSet::from([tag_id]);
        let mut pending = vec![tag_id];
        while let Some(current) = pending.pop() {
            for &child in children.get(&current).into_iter().flatten() {
                if subtree.insert(child) {
                    pending.push(child);
                }
            }
        }
        Ok(subtree)
    }

    /// Ancestors of `tag_id`, nearest parent first.
    ///
    /// Fails with [`Error::DataIntegrity`] if the parent chain loops and with
    /// [`Error::NotFound`] if it points at an unknown tag.
    pub fn ancestors(&self, tag_id: i64) -> Result<Vec<&tag::Model>> {
        let mut visited = HashSet::from([tag_id]);
        let mut chain = Vec::new();
        let mut next = self.tag(tag_id)?.parent_tag_id;
        while let Some(parent_id) = next {
            if !visited.insert(parent_id) {
                return Err(Error::DataIntegrity {
                    detail: format!("tag hierarchy above tag {tag_id} loops back to tag {parent_id}"),
                });
            }
            let parent = self.tag(parent_id)?;
            chain.push(parent);
            next = parent.parent_tag_id;
        }
        Ok(chain)
    }

    /// The option's own tags followed by their ancestors, each id once.
    pub fn rolled_up_tags(&self, option: &TaggedOption) -> Result<Vec<i64>> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for &tag_id in &option.tag_ids {
            let lineage =
                std::iter::once(tag_id).chain(self.ancestors(tag_id)?.into_iter().map(|t| t.id));
            for id in lineage {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// Checks `candidate` against the template's hard limit and the soft
    /// suggestions of every tag it rolls up to.
    ///
    /// Only entries already in the snapshot are counted; the candidate's own
    /// `completed` flag is ignored.
    pub fn evaluate(&self, candidate: &NewMealEntry) -> Result<Verdict> {
        let week = week_key(candidate.date);
        let option = self.option(candidate.meal_option_id)?;
        let template = self.template(option.option.template_id)?;
        let mut verdict = Verdict::default();

        if let Some(limit) = template.weekly_limit {
            let used = self.count_for_template(template.id, week);
            if used >= stored_cap(limit, "weekly_limit", template.id)? {
                verdict.block(format!(
                    "Weekly limit reached for '{}': {used}/{limit} uses in the week of {week}",
                    template.name
                ));
            }
        }

        for tag_id in self.rolled_up_tags(option)? {
            let tag = self.tag(tag_id)?;
            let Some(suggestion) = tag.weekly_suggestion else {
                continue;
            };
            let used = self.count_for_tag(tag_id, week)?;
            if used >= stored_cap(suggestion, "weekly_suggestion", tag.id)? {
                verdict.warnings.push(if suggestion == 0 {
                    format!(
                        "'{}' is suggested to be avoided (0 per week); {used} uses in the week of {week}",
                        tag.display_name
                    )
                } else {
                    format!(
                        "Suggested frequency reached for '{}': {used}/{suggestion} uses in the week of {week}",
                        tag.display_name
                    )
                });
            }
        }

        debug!(
            option_id = candidate.meal_option_id,
            %week,
            blocked = verdict.blocked,
            warnings = verdict.warnings.len(),
            "Evaluated candidate entry"
        );
        Ok(verdict)
    }
}

fn stored_cap(value: i32, column: &str, id: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::DataIntegrity {
        detail: format!("negative {column} {value} on record {id}"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{LocationType, SlotType, TagCategory};
    use chrono::{NaiveDate, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(id: i64, name: &str, weekly_limit: Option<i32>) -> meal_template::Model {
        meal_template::Model {
            id,
            name: name.to_string(),
            description: None,
            compatible_slots: "breakfast,lunch,dinner".to_string(),
            location_type: LocationType::Any,
            weekly_limit,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn option(id: i64, template_id: i64, tag_ids: &[i64]) -> TaggedOption {
        TaggedOption {
            option: meal_option::Model {
                id,
                template_id,
                name: format!("option {id}"),
                description: None,
                nutritional_notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            tag_ids: tag_ids.to_vec(),
        }
    }

    fn tag(id: i64, name: &str, suggestion: Option<i32>, parent: Option<i64>) -> tag::Model {
        tag::Model {
            id,
            name: name.to_string(),
            display_name: name.to_string(),
            category: TagCategory::Ingredient,
            weekly_suggestion: suggestion,
            parent_tag_id: parent,
            created_at: Utc::now(),
        }
    }

    fn entry(id: i64, option_id: i64, day: NaiveDate, completed: bool) -> meal_entry::Model {
        meal_entry::Model {
            id,
            meal_option_id: option_id,
            date: day,
            slot_type: SlotType::Lunch,
            location: LocationType::Home,
            servings: 1.0,
            notes: None,
            completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn candidate(option_id: i64, day: NaiveDate) -> NewMealEntry {
        NewMealEntry::new(option_id, day, SlotType::Lunch)
    }

    /// Template 1 ("Pasta", limit 2) with options 10 (tagged child 101) and 11 (tagged parent 100);
    /// template 2 (no limit) with option 20 (untagged).
    fn pasta_accountant(entries: Vec<meal_entry::Model>) -> WeeklyUsageAccountant {
        WeeklyUsageAccountant::new(
            vec![template(1, "Pasta", Some(2)), template(2, "Yogurt", None)],
            vec![option(10, 1, &[101]), option(11, 1, &[100]), option(20, 2, &[])],
            vec![
                tag(100, "pasta", Some(3), None),
                tag(101, "pasta_integrale", None, Some(100)),
            ],
            entries,
        )
    }

    #[test]
    fn test_count_for_option_uses_week_and_completed() {
        let monday = date(2024, 11, 4);
        let acc = pasta_accountant(vec![
            entry(1, 10, monday, true),
            entry(2, 10, date(2024, 11, 10), true), // Sunday, same week
            entry(3, 10, date(2024, 11, 11), true), // next Monday
            entry(4, 10, date(2024, 11, 5), false), // planned
        ]);
        let week = week_key(monday);
        assert_eq!(acc.count_for_option(10, week), 2);
        assert_eq!(acc.count_for_option(10, week.next()), 1);
        assert_eq!(acc.count_for_option(11, week), 0);
    }

    #[test]
    fn test_template_count_is_sum_of_option_counts() {
        let monday = date(2024, 11, 4);
        let acc = pasta_accountant(vec![
            entry(1, 10, monday, true),
            entry(2, 11, date(2024, 11, 6), true),
            entry(3, 11, date(2024, 11, 7), true),
            entry(4, 20, date(2024, 11, 7), true),
        ]);
        let week = week_key(monday);
        for template_id in [1, 2, 99] {
            let sum: usize = acc
                .options
                .values()
                .filter(|o| o.option.template_id == template_id)
                .map(|o| acc.count_for_option(o.option.id, week))
                .sum();
            assert_eq!(acc.count_for_template(template_id, week), sum);
        }
        assert_eq!(acc.count_for_template(1, week), 3);
        assert_eq!(acc.count_for_template(2, week), 1);
    }

    #[test]
    fn test_tag_roll_up_flows_from_child_to_parent() {
        let monday = date(2024, 11, 4);
        let week = week_key(monday);

        let acc = pasta_accountant(vec![entry(1, 10, monday, true)]);
        assert_eq!(acc.count_for_tag(101, week).unwrap(), 1);
        assert_eq!(acc.count_for_tag(100, week).unwrap(), 1);

        // An option tagged only with the parent does not count toward the child.
        let acc = pasta_accountant(vec![
            entry(1, 10, monday, true),
            entry(2, 11, date(2024, 11, 5), true),
        ]);
        assert_eq!(acc.count_for_tag(101, week).unwrap(), 1);
        assert_eq!(acc.count_for_tag(100, week).unwrap(), 2);
    }

    #[test]
    fn test_entry_counts_once_per_tag_even_with_parent_and_child() {
        let monday = date(2024, 11, 4);
        let acc = WeeklyUsageAccountant::new(
            vec![template(1, "Pasta", None)],
            vec![option(10, 1, &[101, 100])],
            vec![
                tag(100, "pasta", Some(3), None),
                tag(101, "pasta_integrale", None, Some(100)),
            ],
            vec![entry(1, 10, monday, true)],
        );
        assert_eq!(acc.count_for_tag(100, week_key(monday)).unwrap(), 1);
    }

    #[test]
    fn test_count_for_unknown_tag_is_not_found() {
        let acc = pasta_accountant(vec![]);
        let err = acc.count_for_tag(555, week_key(date(2024, 11, 4))).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                entity: EntityKind::Tag,
                id: 555
            }
        ));
    }

    #[test]
    fn test_broken_unrelated_hierarchy_does_not_affect_evaluation() {
        let monday = date(2024, 11, 4);
        let acc = WeeklyUsageAccountant::new(
            vec![template(1, "Pasta", Some(3)), template(2, "Pizza", None)],
            vec![option(10, 1, &[1]), option(20, 2, &[2])],
            vec![
                tag(1, "pasta", Some(5), None),
                tag(2, "pizza", None, Some(3)),
                tag(3, "lievitati", None, Some(2)),
            ],
            vec![entry(1, 20, monday, true), entry(2, 10, monday, true)],
        );

        let verdict = acc.evaluate(&candidate(10, date(2024, 11, 5))).unwrap();
        assert!(verdict.is_allowed());
        assert!(!verdict.has_warnings());
        assert_eq!(acc.count_for_tag(1, week_key(monday)).unwrap(), 1);

        // The looping chain itself is still reported when a candidate uses it.
        assert!(matches!(
            acc.evaluate(&candidate(20, monday)),
            Err(Error::DataIntegrity { .. })
        ));
    }

    #[test]
    fn test_descendants_inclusive() {
        let acc = WeeklyUsageAccountant::new(
            vec![],
            vec![],
            vec![
                tag(1, "carbs", None, None),
                tag(2, "pasta", None, Some(1)),
                tag(3, "pasta_integrale", None, Some(2)),
                tag(4, "legumi", None, None),
            ],
            vec![],
        );
        assert_eq!(acc.descendants_inclusive(1).unwrap(), HashSet::from([1, 2, 3]));
        assert_eq!(acc.descendants_inclusive(3).unwrap(), HashSet::from([3]));
        assert!(acc.descendants_inclusive(99).is_err());
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let acc = WeeklyUsageAccountant::new(
            vec![],
            vec![],
            vec![
                tag(1, "carbs", None, None),
                tag(2, "pasta", None, Some(1)),
                tag(3, "pasta_integrale", None, Some(2)),
            ],
            vec![],
        );
        let ids: Vec<i64> = acc.ancestors(3).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(acc.ancestors(1).unwrap().is_empty());
    }

    #[test]
    fn test_ancestor_cycle_is_data_integrity_error() {
        let acc = WeeklyUsageAccountant::new(
            vec![],
            vec![],
            vec![
                tag(1, "a", None, Some(3)),
                tag(2, "b", None, Some(1)),
                tag(3, "c", None, Some(2)),
            ],
            vec![],
        );
        assert!(matches!(
            acc.ancestors(2),
            Err(Error::DataIntegrity { .. })
        ));
    }

    #[test]
    fn test_dangling_parent_is_not_found() {
        let acc = WeeklyUsageAccountant::new(vec![], vec![], vec![tag(1, "a", None, Some(9))], vec![]);
        assert!(matches!(
            acc.ancestors(1),
            Err(Error::NotFound {
                entity: EntityKind::Tag,
                id: 9
            })
        ));
    }

    #[test]
    fn test_hard_limit_blocks_at_limit() {
        let monday = date(2024, 11, 4);
        let acc = pasta_accountant(vec![
            entry(1, 10, monday, true),
            entry(2, 11, date(2024, 11, 5), true),
        ]);
        // Any option of the template is blocked once the template total reaches the limit.
        for option_id in [10, 11] {
            let verdict = acc.evaluate(&candidate(option_id, date(2024, 11, 6))).unwrap();
            assert!(verdict.blocked);
            assert!(!verdict.is_allowed());
            assert_eq!(verdict.block_reasons.len(), 1);
            assert!(verdict.block_reasons[0].contains("'Pasta'"));
            assert!(verdict.block_reasons[0].contains("2/2"));
        }
    }

    #[test]
    fn test_hard_limit_allows_below_limit() {
        let monday = date(2024, 11, 4);
        let acc = pasta_accountant(vec![entry(1, 10, monday, true)]);
        let verdict = acc.evaluate(&candidate(11, date(2024, 11, 6))).unwrap();
        assert!(!verdict.blocked);
        assert!(verdict.block_reasons.is_empty());
    }

    #[test]
    fn test_limit_applies_per_week() {
        let acc = pasta_accountant(vec![
            entry(1, 10, date(2024, 11, 4), true),
            entry(2, 10, date(2024, 11, 5), true),
        ]);
        let verdict = acc.evaluate(&candidate(10, date(2024, 11, 11))).unwrap();
        assert!(!verdict.blocked);
    }

    #[test]
    fn test_planned_entries_never_count() {
        let acc = WeeklyUsageAccountant::new(
            vec![template(1, "Pizza", Some(1))],
            vec![option(10, 1, &[])],
            vec![],
            (0..5).map(|i| entry(i, 10, date(2024, 11, 4), false)),
        );
        let verdict = acc.evaluate(&candidate(10, date(2024, 11, 5))).unwrap();
        assert!(!verdict.blocked);
        assert_eq!(acc.count_for_template(1, week_key(date(2024, 11, 4))), 0);
    }

    #[test]
    fn test_zero_suggestion_warns_on_first_use() {
        let acc = WeeklyUsageAccountant::new(
            vec![template(1, "Pizza", None)],
            vec![option(10, 1, &[7])],
            vec![tag(7, "pizza", Some(0), None)],
            vec![],
        );
        let verdict = acc.evaluate(&candidate(10, date(2024, 11, 4))).unwrap();
        assert!(!verdict.blocked);
        assert_eq!(verdict.warnings.len(), 1);
        assert!(verdict.warnings[0].contains("avoided"));
    }

    #[test]
    fn test_suggestion_warns_through_ancestor() {
        let monday = date(2024, 11, 4);
        let acc = WeeklyUsageAccountant::new(
            vec![template(1, "Pasta", None)],
            vec![option(10, 1, &[101]), option(11, 1, &[100])],
            vec![
                tag(100, "pasta", Some(2), None),
                tag(101, "pasta_integrale", None, Some(100)),
            ],
            vec![
                entry(1, 11, monday, true),
                entry(2, 11, date(2024, 11, 5), true),
            ],
        );
        // Candidate is tagged only with the child; the parent's suggestion is reached.
        let verdict = acc.evaluate(&candidate(10, date(2024, 11, 6))).unwrap();
        assert!(!verdict.blocked);
        assert_eq!(verdict.warnings.len(), 1);
        assert!(verdict.warnings[0].contains("'pasta'"));
        assert!(verdict.warnings[0].contains("2/2"));
    }

    #[test]
    fn test_suggestion_below_threshold_is_silent() {
        let monday = date(2024, 11, 4);
        let acc = pasta_accountant(vec![entry(1, 10, monday, true)]);
        let verdict = acc.evaluate(&candidate(10, monday)).unwrap();
        assert!(!verdict.has_warnings());
    }

    #[test]
    fn test_shared_ancestor_warns_once() {
        let acc = WeeklyUsageAccountant::new(
            vec![template(1, "Pasta", None)],
            vec![option(10, 1, &[101, 102])],
            vec![
                tag(100, "pasta", Some(0), None),
                tag(101, "pasta_integrale", None, Some(100)),
                tag(102, "pasta_fresca", None, Some(100)),
            ],
            vec![],
        );
        let verdict = acc.evaluate(&candidate(10, date(2024, 11, 4))).unwrap();
        assert_eq!(verdict.warnings.len(), 1);
    }

    #[test]
    fn test_candidate_completed_flag_is_ignored() {
        let monday = date(2024, 11, 4);
        let acc = pasta_accountant(vec![
            entry(1, 10, monday, true),
            entry(2, 10, monday, true),
        ]);
        let mut planned = candidate(10, monday);
        planned.completed = Some(false);
        let mut eaten = candidate(10, monday);
        eaten.completed = Some(true);
        assert_eq!(acc.evaluate(&planned).unwrap(), acc.evaluate(&eaten).unwrap());
    }

    #[test]
    fn test_changed_limit_only_affects_later_evaluations() {
        let monday = date(2024, 11, 4);
        let entries = vec![entry(1, 10, monday, true), entry(2, 10, monday, true)];
        let before = pasta_accountant(entries.clone());
        assert!(before.evaluate(&candidate(10, monday)).unwrap().blocked);

        let after = WeeklyUsageAccountant::new(
            vec![template(1, "Pasta", Some(5))],
            vec![option(10, 1, &[101])],
            vec![
                tag(100, "pasta", Some(3), None),
                tag(101, "pasta_integrale", None, Some(100)),
            ],
            entries.clone(),
        );
        assert!(!after.evaluate(&candidate(10, monday)).unwrap().blocked);
        // Existing entries are untouched by the new limit.
        assert_eq!(after.entries, entries);
    }

    #[test]
    fn test_evaluate_dangling_references() {
        let acc = pasta_accountant(vec![]);
        assert!(matches!(
            acc.evaluate(&candidate(999, date(2024, 11, 4))),
            Err(Error::NotFound {
                entity: EntityKind::Option,
                id: 999
            })
        ));

        let orphan = WeeklyUsageAccountant::new(vec![], vec![option(10, 5, &[])], vec![], vec![]);
        assert!(matches!(
            orphan.evaluate(&candidate(10, date(2024, 11, 4))),
            Err(Error::NotFound {
                entity: EntityKind::Template,
                id: 5
            })
        ));

        let missing_tag = WeeklyUsageAccountant::new(
            vec![template(1, "Pasta", None)],
            vec![option(10, 1, &[42])],
            vec![],
            vec![],
        );
        assert!(matches!(
            missing_tag.evaluate(&candidate(10, date(2024, 11, 4))),
            Err(Error::NotFound {
                entity: EntityKind::Tag,
                id: 42
            })
        ));
    }
}
