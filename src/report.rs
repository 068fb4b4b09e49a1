use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{Client, HealthFlag};
use crate::pipeline::{self, ClientQuery, SortKey};
use crate::progress::{phase_for_day, progress_percent};

#[derive(Debug, Clone)]
pub struct HealthSummary {
    pub health: HealthFlag,
    pub count: usize,
    pub avg_progress: f64,
}

pub fn summarize_by_health(clients: &[Client]) -> Vec<HealthSummary> {
    let mut map: std::collections::HashMap<HealthFlag, (usize, i64)> =
        std::collections::HashMap::new();

    for client in clients {
        let percent = progress_percent(client.current_weight, client.start_weight, client.goal_weight);
        let entry = map.entry(client.health).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += i64::from(percent);
    }

    let mut summaries: Vec<HealthSummary> = map
        .into_iter()
        .map(|(health, (count, total_percent))| HealthSummary {
            health,
            count,
            avg_progress: if count == 0 {
                0.0
            } else {
                total_percent as f64 / count as f64
            },
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn build_report(today: NaiveDate, clients: &[Client]) -> String {
    let summaries = summarize_by_health(clients);
    let mut output = String::new();

    let _ = writeln!(output, "# Client Tracker Report");
    let _ = writeln!(output, "Generated {} for {} clients", today, clients.len());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Roster Health Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No clients on the roster.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} clients (avg progress {:.0}%)",
                summary.health.as_str(),
                summary.count,
                summary.avg_progress
            );
        }
    }

    let at_risk = pipeline::filter_and_sort(
        clients,
        &ClientQuery {
            health: Some(HealthFlag::AtRisk),
            ..ClientQuery::default()
        },
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## At-Risk Clients");

    if at_risk.is_empty() {
        let _ = writeln!(output, "No at-risk clients today.");
    } else {
        for client in at_risk.iter() {
            let phase = phase_for_day(client.current_day);
            let silent_days = (today - client.last_contact).num_days();
            let _ = writeln!(
                output,
                "- {} ({}) day {} [{}], last contact {} days ago: {}",
                client.name,
                client.email,
                client.current_day,
                phase.label,
                silent_days,
                client.notes
            );
        }
    }

    let by_progress = pipeline::filter_and_sort(
        clients,
        &ClientQuery {
            sort: SortKey::Progress,
            ..ClientQuery::default()
        },
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Progress");

    if by_progress.is_empty() {
        let _ = writeln!(output, "No clients on the roster.");
    } else {
        for client in by_progress.iter().take(5) {
            let percent =
                progress_percent(client.current_weight, client.start_weight, client.goal_weight);
            let _ = writeln!(
                output,
                "- {}: {}% to goal ({:.1} lost, {:.1}/week)",
                client.name, percent, client.total_lost, client.weekly_avg
            );
        }
    }

    let mut recent = clients.to_vec();
    recent.sort_by(|a, b| b.last_weigh_in.cmp(&a.last_weigh_in));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Weigh-Ins");

    if recent.is_empty() {
        let _ = writeln!(output, "No weigh-ins recorded.");
    } else {
        for client in recent.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} on {}: {:.1} (started {:.1}, goal {:.1})",
                client.name,
                client.last_weigh_in,
                client.current_weight,
                client.start_weight,
                client.goal_weight
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_clients;

    #[test]
    fn report_covers_the_roster_sections() {
        let clients = seed_clients().expect("seed roster");
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).expect("valid date");
        let report = build_report(today, &clients);

        assert!(report.contains("# Client Tracker Report"));
        assert!(report.contains("## Roster Health Mix"));
        assert!(report.contains("## At-Risk Clients"));
        assert!(report.contains("Marcus Webb"));
        assert!(report.contains("## Top Progress"));
        assert!(report.contains("## Recent Weigh-Ins"));
    }

    #[test]
    fn health_mix_counts_every_client_once() {
        let clients = seed_clients().expect("seed roster");
        let summaries = summarize_by_health(&clients);
        let total: usize = summaries.iter().map(|s| s.count).sum();
        assert_eq!(total, clients.len());
    }
}
