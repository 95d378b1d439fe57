//! Common-core assigner.
//!
//! Places pairs of blocks while at least two hours remain and the subject
//! allows two a day, falling back to single blocks. A subject never appears
//! twice on the same day.

use super::{remaining_hours, report_shortfall};
use crate::scheduler::engine::{Engine, Tuple};
use crate::scheduler::rules::SlotRequest;
use crate::scheduler::search::find_best_day;

pub(super) fn assign(engine: &mut Engine, tuple: Tuple) {
    let Some(mut remaining) = remaining_hours(engine, tuple) else {
        return;
    };
    let req = SlotRequest::new(tuple.teacher, tuple.group, Some(tuple.subject));
    let mode = engine.search_mode();
    let cap = engine.subjects[tuple.subject].max_hours_per_day();

    while remaining > 0 {
        let placement = if remaining >= 2 && cap >= 2 {
            find_best_day(engine, &req, 2, mode).or_else(|| find_best_day(engine, &req, 1, mode))
        } else {
            find_best_day(engine, &req, 1, mode)
        };
        let Some(placement) = placement else {
            break;
        };
        engine.place(placement.day, placement.blocks, req);
        remaining -= placement.blocks.len();
    }

    report_shortfall(engine, tuple);
}

#[cfg(test)]
mod tests {
    use crate::models::{Day, EngineConfig, Group, IssueKind, Subject, Teacher};
    use crate::scheduler::Engine;

    fn config() -> EngineConfig {
        EngineConfig::new(8, 7).with_shift_boundary(8)
    }

    #[test]
    fn test_odd_hours_end_with_single_block() {
        let mut engine = Engine::new(
            config(),
            vec![Subject::common_core("HIS1", 5).with_semester(1)],
            vec![Group::morning("101A", 1)],
            vec![Teacher::new("Ana", 5).with_subject("HIS1", &["101A"])],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let stats = &report.group("101A").unwrap().stats;
        assert_eq!(stats.total_hours, 5);
        assert_eq!(stats.hours_per_day[&Day::Monday], 2);
        assert_eq!(stats.hours_per_day[&Day::Tuesday], 2);
        assert_eq!(stats.hours_per_day[&Day::Wednesday], 1);
    }

    #[test]
    fn test_two_hour_subject_uses_single_blocks() {
        let mut engine = Engine::new(
            config(),
            vec![Subject::common_core("ETH1", 2).with_semester(1)],
            vec![Group::morning("101A", 1)],
            vec![Teacher::new("Ana", 2).with_subject("ETH1", &["101A"])],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let stats = &report.group("101A").unwrap().stats;
        assert_eq!(stats.hours_per_day[&Day::Monday], 1);
        assert_eq!(stats.hours_per_day[&Day::Tuesday], 1);
    }

    #[test]
    fn test_more_hours_than_days_is_a_shortfall() {
        // Cap 2 and no same-day repeat: at most one pair per day.
        let mut engine = Engine::new(
            config(),
            vec![Subject::common_core("LAB1", 12).with_semester(1)],
            vec![Group::morning("101A", 1)],
            vec![Teacher::new("Ana", 12).with_subject("LAB1", &["101A"])],
        )
        .unwrap();
        let report = engine.run().unwrap();

        let shortfall: Vec<_> = report.issues_of(IssueKind::Shortfall).collect();
        assert_eq!(shortfall.len(), 1);
        assert_eq!(shortfall[0].placed, 10);
        assert_eq!(shortfall[0].missing(), 2);
    }
}
