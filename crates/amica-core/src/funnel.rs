//! Booking funnel: how far each conversation got before it ended.

use serde::Serialize;

use crate::session::{DropOffStage, FinalStatus, FunnelRow};

/// Per-stage session counts, ordered from first to last step.
///
/// Always satisfies `started >= service_selected >= staff_selected >=
/// time_selected >= done`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FunnelStages {
    pub started: i64,
    pub service_selected: i64,
    pub staff_selected: i64,
    pub time_selected: i64,
    pub done: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelStep {
    pub stage: &'static str,
    pub count: i64,
    /// Share of `started` that reached this stage, 0–100.
    pub percent_of_started: f64,
}

impl FunnelStages {
    /// Stages in funnel order with their share of started sessions.
    ///
    /// Zero started sessions means no data: every share is `0.0`.
    pub fn steps(&self) -> Vec<FunnelStep> {
        let stages = [
            ("started", self.started),
            ("service_selected", self.service_selected),
            ("staff_selected", self.staff_selected),
            ("time_selected", self.time_selected),
            ("done", self.done),
        ];
        stages
            .into_iter()
            .map(|(stage, count)| FunnelStep {
                stage,
                count,
                percent_of_started: if self.started > 0 {
                    (count as f64 / self.started as f64 * 1000.0).round() / 10.0
                } else {
                    0.0
                },
            })
            .collect()
    }

    fn record(&mut self, row: &FunnelRow) {
        self.started += 1;
        let drop = DropOffStage::from_meta(&row.meta);
        // A session without a recorded drop-off counts as completed.
        if row.final_status == FinalStatus::Done || drop.is_none() {
            self.service_selected += 1;
            self.staff_selected += 1;
            self.time_selected += 1;
            self.done += 1;
            return;
        }
        match drop {
            Some(DropOffStage::TimeSelection) => {
                self.service_selected += 1;
                self.staff_selected += 1;
            }
            Some(DropOffStage::StaffSelection) => {
                self.service_selected += 1;
            }
            _ => {}
        }
    }
}

/// Bucket sessions into funnel stages. Order of `rows` does not matter.
pub fn aggregate_funnel<'a, I>(rows: I) -> FunnelStages
where
    I: IntoIterator<Item = &'a FunnelRow>,
{
    let mut stages = FunnelStages::default();
    for row in rows {
        stages.record(row);
    }
    stages
}
