//! Professional module assigner.
//!
//! Walks the subject's block plan in order (e.g. `[4, 4, 4, 5]` for a
//! 17-hour module). Each size is clamped to the hours still missing and
//! placed on the best day. The first size that does not fit ends the tuple.

use tracing::debug;

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

    for size in engine.subjects[tuple.subject].block_plan() {
        if remaining == 0 {
            break;
        }
        let length = size.min(remaining);
        match find_best_day(engine, &req, length, mode) {
            Some(placement) => {
                engine.place(placement.day, placement.blocks, req);
                remaining -= length;
            }
            None => {
                debug!(
                    subject = %engine.subjects[tuple.subject].id,
                    group = %engine.groups[tuple.group].nomenclature,
                    length,
                    "no window for module block"
                );
                break;
            }
        }
    }

    report_shortfall(engine, tuple);
}
