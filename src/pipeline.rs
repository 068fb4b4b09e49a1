use crate::models::{Client, ClientStatus, HealthFlag};
use crate::progress::progress_percent;

/// Roster ordering choices. `NextAction` is the dashboard default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    NextAction,
    Day,
    Name,
    Progress,
}

/// Selectors for one roster view. `None` filters mean "all".
#[derive(Debug, Clone)]
pub struct ClientQuery {
    pub status: Option<ClientStatus>,
    pub health: Option<HealthFlag>,
    pub search: String,
    pub sort: SortKey,
}

impl Default for ClientQuery {
    fn default() -> Self {
        Self {
            status: None,
            health: None,
            search: String::new(),
            sort: SortKey::NextAction,
        }
    }
}

/// Narrow and order the roster. Pure: the source slice is never mutated,
/// and the same inputs always produce the same sequence. All sorts are
/// stable, so ties keep their input order.
pub fn filter_and_sort(clients: &[Client], query: &ClientQuery) -> Vec<Client> {
    let needle = query.search.trim().to_lowercase();

    let mut selected: Vec<Client> = clients
        .iter()
        .filter(|client| {
            query.status.map_or(true, |status| client.status == status)
                && query.health.map_or(true, |health| client.health == health)
                && matches_search(client, &needle)
        })
        .cloned()
        .collect();

    match query.sort {
        SortKey::NextAction => {
            selected.sort_by_key(|client| match client.health {
                HealthFlag::AtRisk => 0,
                _ => 1,
            });
        }
        SortKey::Day => selected.sort_by_key(|client| client.current_day),
        SortKey::Name => {
            selected.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortKey::Progress => {
            selected.sort_by_key(|client| {
                -progress_percent(client.current_weight, client.start_weight, client.goal_weight)
            });
        }
    }

    selected
}

fn matches_search(client: &Client, needle: &str) -> bool {
    needle.is_empty()
        || client.name.to_lowercase().contains(needle)
        || client.email.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_clients;

    fn roster() -> Vec<Client> {
        seed_clients().expect("seed roster")
    }

    #[test]
    fn default_query_keeps_everyone() {
        let clients = roster();
        let listed = filter_and_sort(&clients, &ClientQuery::default());
        assert_eq!(listed.len(), clients.len());
    }

    #[test]
    fn status_and_health_filters_and_combine() {
        let clients = roster();
        let query = ClientQuery {
            status: Some(ClientStatus::Active),
            health: Some(HealthFlag::AtRisk),
            ..ClientQuery::default()
        };
        let listed = filter_and_sort(&clients, &query);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, ClientStatus::Active);
        assert_eq!(listed[0].health, HealthFlag::AtRisk);
    }

    #[test]
    fn filters_commute() {
        let clients = roster();
        let status_first = filter_and_sort(
            &filter_and_sort(
                &clients,
                &ClientQuery {
                    status: Some(ClientStatus::Active),
                    ..ClientQuery::default()
                },
            ),
            &ClientQuery {
                health: Some(HealthFlag::OnTrack),
                ..ClientQuery::default()
            },
        );
        let health_first = filter_and_sort(
            &filter_and_sort(
                &clients,
                &ClientQuery {
                    health: Some(HealthFlag::OnTrack),
                    ..ClientQuery::default()
                },
            ),
            &ClientQuery {
                status: Some(ClientStatus::Active),
                ..ClientQuery::default()
            },
        );
        assert_eq!(status_first, health_first);
    }

    #[test]
    fn search_matches_name_or_email_case_insensitively() {
        let clients = roster();
        let by_name = filter_and_sort(
            &clients,
            &ClientQuery {
                search: "SARAH".to_string(),
                ..ClientQuery::default()
            },
        );
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Sarah Mitchell");

        let by_email = filter_and_sort(
            &clients,
            &ClientQuery {
                search: "webb@".to_string(),
                ..ClientQuery::default()
            },
        );
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].email, "marcus.webb@example.com");
    }

    #[test]
    fn search_miss_yields_empty_list() {
        let clients = roster();
        let listed = filter_and_sort(
            &clients,
            &ClientQuery {
                search: "zzz-nobody".to_string(),
                ..ClientQuery::default()
            },
        );
        assert!(listed.is_empty());
    }

    #[test]
    fn next_action_puts_at_risk_first_and_keeps_input_order_otherwise() {
        let clients = roster();
        let listed = filter_and_sort(&clients, &ClientQuery::default());

        let first_other = listed
            .iter()
            .position(|c| c.health != HealthFlag::AtRisk)
            .expect("roster has non-at-risk clients");
        assert!(listed[..first_other]
            .iter()
            .all(|c| c.health == HealthFlag::AtRisk));
        assert!(listed[first_other..]
            .iter()
            .all(|c| c.health != HealthFlag::AtRisk));

        // Ties keep roster order: ids stay ascending within each priority band.
        let other_ids: Vec<i64> = listed[first_other..].iter().map(|c| c.id).collect();
        let mut sorted_ids = other_ids.clone();
        sorted_ids.sort_unstable();
        assert_eq!(other_ids, sorted_ids);
    }

    #[test]
    fn day_sort_ascends() {
        let clients = roster();
        let listed = filter_and_sort(
            &clients,
            &ClientQuery {
                sort: SortKey::Day,
                ..ClientQuery::default()
            },
        );
        for pair in listed.windows(2) {
            assert!(pair[0].current_day <= pair[1].current_day);
        }
    }

    #[test]
    fn name_sort_ascends_case_insensitively() {
        let clients = roster();
        let listed = filter_and_sort(
            &clients,
            &ClientQuery {
                sort: SortKey::Name,
                ..ClientQuery::default()
            },
        );
        for pair in listed.windows(2) {
            assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
        }
    }

    #[test]
    fn progress_sort_descends() {
        let clients = roster();
        let listed = filter_and_sort(
            &clients,
            &ClientQuery {
                sort: SortKey::Progress,
                ..ClientQuery::default()
            },
        );
        for pair in listed.windows(2) {
            let a = progress_percent(pair[0].current_weight, pair[0].start_weight, pair[0].goal_weight);
            let b = progress_percent(pair[1].current_weight, pair[1].start_weight, pair[1].goal_weight);
            assert!(a >= b);
        }
    }

    #[test]
    fn source_slice_is_untouched() {
        let clients = roster();
        let before = clients.clone();
        let _ = filter_and_sort(
            &clients,
            &ClientQuery {
                sort: SortKey::Progress,
                search: "a".to_string(),
                ..ClientQuery::default()
            },
        );
        assert_eq!(clients, before);
    }
}
