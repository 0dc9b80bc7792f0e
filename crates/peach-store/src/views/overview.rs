//! Admin overview KPIs

use super::client_name;
use crate::state::DeskState;
use chrono::{DateTime, Datelike, Utc};
use peach_core::{ClientStatus, InternalStatus, LocationId, Task};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRiskLocation {
    pub id: LocationId,
    pub name: String,
    pub city: String,
    pub client_name: String,
    pub pending_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Written or delivered, with `written_at` in the current month
    pub written_this_month: usize,
    /// New, Writing or Written
    pub pending: usize,
    pub delivered_this_month: usize,
    /// Sum over active clients
    pub mrr: f64,
    pub annual_revenue: f64,
    /// Non-zero buckets only, in status order
    pub client_status: Vec<(ClientStatus, usize)>,
    /// Locations with at least `threshold` pending tasks, busiest first
    pub at_risk: Vec<AtRiskLocation>,
    pub overdue: usize,
}

fn same_month(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    at.is_some_and(|at| at.year() == now.year() && at.month() == now.month())
}

fn is_pending(task: &Task) -> bool {
    task.internal_status.is_pending()
}

pub fn overview(state: &DeskState, now: DateTime<Utc>, threshold: usize) -> Overview {
    let written_this_month = state
        .tasks
        .iter()
        .filter(|t| {
            matches!(
                t.internal_status,
                InternalStatus::Written | InternalStatus::Delivered
            ) && same_month(t.written_at, now)
        })
        .count();

    let delivered_this_month = state
        .tasks
        .iter()
        .filter(|t| {
            t.internal_status == InternalStatus::Delivered && same_month(t.delivered_at, now)
        })
        .count();

    let mrr: f64 = state
        .clients
        .iter()
        .filter(|c| c.status == ClientStatus::Active)
        .map(|c| c.mrr)
        .sum();

    let client_status = ClientStatus::ALL
        .into_iter()
        .map(|status| {
            let count = state.clients.iter().filter(|c| c.status == status).count();
            (status, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    let mut pending_by_location: HashMap<&LocationId, usize> = HashMap::new();
    for task in state.tasks.iter().filter(|t| is_pending(t)) {
        *pending_by_location.entry(&task.location_id).or_default() += 1;
    }
    let mut at_risk: Vec<AtRiskLocation> = state
        .locations
        .iter()
        .filter_map(|loc| {
            let pending_count = pending_by_location.get(&loc.id).copied().unwrap_or(0);
            (pending_count >= threshold).then(|| AtRiskLocation {
                id: loc.id.clone(),
                name: loc.name.clone(),
                city: loc.city.clone(),
                client_name: client_name(state, &loc.client_id).to_string(),
                pending_count,
            })
        })
        .collect();
    at_risk.sort_by(|a, b| b.pending_count.cmp(&a.pending_count));

    let report = Overview {
        written_this_month,
        pending: state.tasks.iter().filter(|t| is_pending(t)).count(),
        delivered_this_month,
        mrr,
        annual_revenue: mrr * 12.0,
        client_status,
        at_risk,
        overdue: state.tasks.iter().filter(|t| t.is_overdue(now)).count(),
    };
    tracing::debug!(pending = report.pending, at_risk = report.at_risk.len(), "built overview");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;
    use chrono::TimeZone;

    #[test]
    fn seed_overview_counts() {
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap();
        let state = DeskState::from_seed(&Seed::demo_at(now));
        let report = overview(&state, now, 3);

        assert_eq!(report.pending, 8);
        assert_eq!(report.mrr, 2450.0);
        assert_eq!(report.annual_revenue, 29400.0);
        assert_eq!(
            report.client_status,
            vec![
                (ClientStatus::Active, 2),
                (ClientStatus::Paused, 1),
                (ClientStatus::Cancelled, 1)
            ]
        );
        // t5 and t7 are past due; t4 and t9 are delivered
        assert_eq!(report.overdue, 2);
        assert_eq!(report.at_risk.len(), 1);
        assert_eq!(report.at_risk[0].id, "l1");
    }

    #[test]
    fn lower_threshold_surfaces_busy_locations() {
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap();
        let state = DeskState::from_seed(&Seed::demo_at(now));
        let report = overview(&state, now, 2);

        let ids: Vec<&str> = report.at_risk.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids[0], "l1");
        assert_eq!(report.at_risk[0].pending_count, 3);
        assert_eq!(report.at_risk[0].client_name, "Harbor Dental Group");
        assert!(ids.contains(&"l4"));
    }

    #[test]
    fn month_boundaries_use_calendar_month() {
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap();
        let state = DeskState::from_seed(&Seed::demo_at(now));
        let report = overview(&state, now, 3);
        // t3, t4, t8 and t9 were all written earlier in March
        assert_eq!(report.written_this_month, 4);
        assert_eq!(report.delivered_this_month, 2);
    }
}
