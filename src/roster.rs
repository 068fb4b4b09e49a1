use chrono::NaiveDate;

use crate::error::InputError;
use crate::models::{Client, TouchpointKind};
use crate::progress::round1;

/// The one owned copy of the client collection. Mutations go through the
/// two recorders below; reads hand out slices for the pure pipeline.
#[derive(Debug, Clone)]
pub struct ClientRoster {
    clients: Vec<Client>,
}

impl ClientRoster {
    pub fn new(clients: Vec<Client>) -> Self {
        Self { clients }
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn get(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    /// Log a weigh-in from free-text input. Rejects anything that is not a
    /// positive finite number and leaves the roster untouched on error.
    /// On success the client's current weight, stored totals, and
    /// last_weigh_in are updated in one step; every other client is
    /// unchanged.
    pub fn record_weigh_in(
        &mut self,
        id: i64,
        raw_weight: &str,
        today: NaiveDate,
    ) -> Result<&Client, InputError> {
        let weight = parse_weight(raw_weight)?;
        let client = self.find_mut(id)?;

        client.current_weight = weight;
        client.total_lost = round1(client.start_weight - weight);
        client.weekly_avg = weekly_average(client.total_lost, client.current_day);
        client.last_weigh_in = today;
        Ok(client)
    }

    /// Mark today's morning or evening touchpoint complete and stamp
    /// last_contact.
    pub fn record_touchpoint(
        &mut self,
        id: i64,
        kind: TouchpointKind,
        today: NaiveDate,
    ) -> Result<&Client, InputError> {
        let client = self.find_mut(id)?;

        match kind {
            TouchpointKind::Morning => client.today_morning = true,
            TouchpointKind::Evening => client.today_evening = true,
        }
        client.last_contact = today;
        Ok(client)
    }

    fn find_mut(&mut self, id: i64) -> Result<&mut Client, InputError> {
        self.clients
            .iter_mut()
            .find(|client| client.id == id)
            .ok_or(InputError::UnknownClient(id))
    }
}

fn parse_weight(raw: &str) -> Result<f64, InputError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| InputError::InvalidWeight(raw.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(InputError::InvalidWeight(raw.to_string()));
    }
    Ok(value)
}

/// Stored per-week pace: total lost over weeks elapsed, weeks floored at
/// one so week-1 clients report their full loss as the weekly figure.
pub fn weekly_average(total_lost: f64, current_day: i32) -> f64 {
    let weeks = (f64::from(current_day) / 7.0).max(1.0);
    round1(total_lost / weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_clients;

    fn roster() -> ClientRoster {
        ClientRoster::new(seed_clients().expect("seed roster"))
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn weigh_in_updates_weight_totals_and_date() {
        let mut roster = roster();
        let today = day(2026, 8, 6);

        let updated = roster
            .record_weigh_in(3, "159", today)
            .expect("weigh-in applies");
        assert_eq!(updated.current_weight, 159.0);
        assert_eq!(updated.total_lost, 6.0);
        assert_eq!(updated.last_weigh_in, today);
    }

    #[test]
    fn weigh_in_leaves_other_clients_untouched() {
        let mut roster = roster();
        let before: Vec<Client> = roster.clients().to_vec();

        roster
            .record_weigh_in(3, " 159.5 ", day(2026, 8, 6))
            .expect("weigh-in applies");

        for (was, now) in before.iter().zip(roster.clients()) {
            if was.id == 3 {
                assert_ne!(was, now);
            } else {
                assert_eq!(was, now);
            }
        }
    }

    #[test]
    fn weigh_in_rejects_bad_input_without_mutating() {
        let mut roster = roster();
        let before: Vec<Client> = roster.clients().to_vec();

        for raw in ["", "   ", "abc", "12lbs", "-3", "0", "NaN", "inf"] {
            let err = roster
                .record_weigh_in(3, raw, day(2026, 8, 6))
                .expect_err("bad weight must be rejected");
            assert_eq!(err, InputError::InvalidWeight(raw.to_string()));
        }
        assert_eq!(roster.clients(), &before[..]);
    }

    #[test]
    fn weigh_in_unknown_client_is_an_error() {
        let mut roster = roster();
        let err = roster
            .record_weigh_in(999, "150", day(2026, 8, 6))
            .expect_err("unknown id");
        assert_eq!(err, InputError::UnknownClient(999));
    }

    #[test]
    fn touchpoints_flip_their_flag_and_stamp_contact() {
        let mut roster = roster();
        let today = day(2026, 8, 6);

        let updated = roster
            .record_touchpoint(1, TouchpointKind::Morning, today)
            .expect("touchpoint applies");
        assert!(updated.today_morning);
        assert!(!updated.today_evening);
        assert_eq!(updated.last_contact, today);

        let updated = roster
            .record_touchpoint(1, TouchpointKind::Evening, today)
            .expect("touchpoint applies");
        assert!(updated.today_morning);
        assert!(updated.today_evening);
    }

    #[test]
    fn touchpoint_unknown_client_is_an_error() {
        let mut roster = roster();
        let err = roster
            .record_touchpoint(42, TouchpointKind::Morning, day(2026, 8, 6))
            .expect_err("unknown id");
        assert_eq!(err, InputError::UnknownClient(42));
    }

    #[test]
    fn weekly_average_floors_weeks_at_one() {
        assert_eq!(weekly_average(4.2, 3), 4.2);
        assert_eq!(weekly_average(4.2, 7), 4.2);
        assert_eq!(weekly_average(8.4, 42), 1.4);
    }
}
