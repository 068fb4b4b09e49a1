/// Display metadata for the phase a client is in, keyed by program day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramPhase {
    pub label: &'static str,
    pub color_token: &'static str,
    pub description: &'static str,
}

/// Map a program day to its phase. First matching upper bound wins;
/// callers guarantee day >= 1.
pub fn phase_for_day(current_day: i32) -> ProgramPhase {
    match current_day {
        d if d <= 3 => ProgramPhase {
            label: "Critical Phase",
            color_token: "red",
            description: "Extra support needed",
        },
        d if d <= 7 => ProgramPhase {
            label: "Week 1",
            color_token: "orange",
            description: "Building habits",
        },
        d if d <= 14 => ProgramPhase {
            label: "Week 2",
            color_token: "amber",
            description: "Finding rhythm",
        },
        d if d <= 21 => ProgramPhase {
            label: "Week 3",
            color_token: "blue",
            description: "Habit formation",
        },
        d if d <= 30 => ProgramPhase {
            label: "Week 4",
            color_token: "violet",
            description: "Strong finish",
        },
        d if d <= 60 => ProgramPhase {
            label: "Month 2",
            color_token: "teal",
            description: "Momentum building",
        },
        d if d <= 90 => ProgramPhase {
            label: "Month 3",
            color_token: "green",
            description: "Transformation",
        },
        _ => ProgramPhase {
            label: "Maintenance",
            color_token: "slate",
            description: "Lifestyle phase",
        },
    }
}

/// Percent of the start->goal journey covered, rounded to the nearest
/// integer and clamped above at 100. Weights carry one decimal, so the
/// ratio is rounded to a tenth before the final rounding. A client who has
/// gained since start reports a negative percent; no lower clamp. A client
/// enrolled at goal counts as 100.
pub fn progress_percent(current: f64, start: f64, goal: f64) -> i32 {
    let to_lose = start - goal;
    if to_lose.abs() < f64::EPSILON {
        return 100;
    }
    let lost = start - current;
    let percent = round1((lost / to_lose) * 100.0);
    percent.min(100.0).round() as i32
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_ladder_matches_day_buckets() {
        assert_eq!(phase_for_day(1).label, "Critical Phase");
        assert_eq!(phase_for_day(3).label, "Critical Phase");
        assert_eq!(phase_for_day(4).label, "Week 1");
        assert_eq!(phase_for_day(7).label, "Week 1");
        assert_eq!(phase_for_day(8).label, "Week 2");
        assert_eq!(phase_for_day(14).label, "Week 2");
        assert_eq!(phase_for_day(15).label, "Week 3");
        assert_eq!(phase_for_day(21).label, "Week 3");
        assert_eq!(phase_for_day(22).label, "Week 4");
        assert_eq!(phase_for_day(30).label, "Week 4");
        assert_eq!(phase_for_day(31).label, "Month 2");
        assert_eq!(phase_for_day(60).label, "Month 2");
        assert_eq!(phase_for_day(61).label, "Month 3");
        assert_eq!(phase_for_day(90).label, "Month 3");
        assert_eq!(phase_for_day(91).label, "Maintenance");
        assert_eq!(phase_for_day(365).label, "Maintenance");
    }

    #[test]
    fn phase_is_total_over_the_first_year() {
        for day in 1..=365 {
            let phase = phase_for_day(day);
            assert!(!phase.label.is_empty(), "day {day} has no phase");
        }
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(progress_percent(180.8, 185.0, 145.0), 11);
        assert_eq!(progress_percent(165.0, 185.0, 145.0), 50);
    }

    #[test]
    fn progress_is_zero_with_no_loss() {
        assert_eq!(progress_percent(185.0, 185.0, 145.0), 0);
    }

    #[test]
    fn progress_clamps_overshoot_at_100() {
        assert_eq!(progress_percent(140.0, 185.0, 145.0), 100);
        assert_eq!(progress_percent(145.0, 185.0, 145.0), 100);
    }

    #[test]
    fn progress_goes_negative_on_gain() {
        assert_eq!(progress_percent(190.0, 185.0, 145.0), -13);
    }

    #[test]
    fn progress_treats_enrolled_at_goal_as_complete() {
        assert_eq!(progress_percent(150.0, 150.0, 150.0), 100);
        assert_eq!(progress_percent(152.0, 150.0, 150.0), 100);
    }

    #[test]
    fn round1_keeps_one_decimal() {
        assert_eq!(round1(6.0), 6.0);
        assert_eq!(round1(4.25), 4.3);
        assert_eq!(round1(165.0 - 159.0), 6.0);
        assert_eq!(round1(185.0 - 180.8), 4.2);
    }
}
