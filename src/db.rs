use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Client, ClientStatus, HealthFlag, NextTouchpoint};
use crate::progress::round1;
use crate::roster::weekly_average;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Demo roster used by `seed` and by the unit tests: seven clients, exactly
/// one of them active and at-risk.
pub fn seed_clients() -> anyhow::Result<Vec<Client>> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).context("invalid date");

    Ok(vec![
        Client {
            id: 1,
            name: "Sarah Mitchell".to_string(),
            phone: "555-0141".to_string(),
            email: "sarah.mitchell@example.com".to_string(),
            start_date: date(2026, 8, 3)?,
            current_day: 3,
            status: ClientStatus::Active,
            health: HealthFlag::New,
            start_weight: 185.0,
            current_weight: 180.8,
            goal_weight: 145.0,
            total_lost: 4.2,
            weekly_avg: 4.2,
            last_contact: date(2026, 8, 5)?,
            last_weigh_in: date(2026, 8, 5)?,
            next_touchpoint: NextTouchpoint {
                kind: "morning-text".to_string(),
                time_label: "8:00 AM".to_string(),
                day: 4,
            },
            today_morning: true,
            today_evening: false,
            notes: "First week jitters, very motivated".to_string(),
            coach_prospect: false,
            prospect_id: None,
        },
        Client {
            id: 2,
            name: "Jen Alvarez".to_string(),
            phone: "555-0178".to_string(),
            email: "jen.alvarez@example.com".to_string(),
            start_date: date(2026, 7, 29)?,
            current_day: 8,
            status: ClientStatus::Active,
            health: HealthFlag::OnTrack,
            start_weight: 172.0,
            current_weight: 169.4,
            goal_weight: 150.0,
            total_lost: 2.6,
            weekly_avg: 2.3,
            last_contact: date(2026, 8, 5)?,
            last_weigh_in: date(2026, 8, 4)?,
            next_touchpoint: NextTouchpoint {
                kind: "evening-check-in".to_string(),
                time_label: "7:30 PM".to_string(),
                day: 8,
            },
            today_morning: true,
            today_evening: false,
            notes: "Asked about swapping fuelings on travel days".to_string(),
            coach_prospect: false,
            prospect_id: None,
        },
        Client {
            id: 3,
            name: "Marcus Webb".to_string(),
            phone: "555-0112".to_string(),
            email: "marcus.webb@example.com".to_string(),
            start_date: date(2026, 7, 25)?,
            current_day: 12,
            status: ClientStatus::Active,
            health: HealthFlag::AtRisk,
            start_weight: 165.0,
            current_weight: 163.0,
            goal_weight: 150.0,
            total_lost: 2.0,
            weekly_avg: 1.2,
            last_contact: date(2026, 7, 31)?,
            last_weigh_in: date(2026, 7, 30)?,
            next_touchpoint: NextTouchpoint {
                kind: "celebration-call".to_string(),
                time_label: "12:00 PM".to_string(),
                day: 12,
            },
            today_morning: false,
            today_evening: false,
            notes: "Missed two check-ins, travel for work".to_string(),
            coach_prospect: false,
            prospect_id: None,
        },
        Client {
            id: 4,
            name: "Dana Kowalski".to_string(),
            phone: "555-0163".to_string(),
            email: "dana.kowalski@example.com".to_string(),
            start_date: date(2026, 7, 12)?,
            current_day: 25,
            status: ClientStatus::Active,
            health: HealthFlag::CrushingIt,
            start_weight: 210.0,
            current_weight: 196.5,
            goal_weight: 170.0,
            total_lost: 13.5,
            weekly_avg: 3.8,
            last_contact: date(2026, 8, 6)?,
            last_weigh_in: date(2026, 8, 6)?,
            next_touchpoint: NextTouchpoint {
                kind: "morning-text".to_string(),
                time_label: "8:00 AM".to_string(),
                day: 26,
            },
            today_morning: true,
            today_evening: true,
            notes: "Interested in coaching herself, intro call booked".to_string(),
            coach_prospect: true,
            prospect_id: Some(Uuid::parse_str("7b1d3c52-88ab-4c4e-9a6e-2f30a4d0c9e1")?),
        },
        Client {
            id: 5,
            name: "Priya Raman".to_string(),
            phone: "555-0194".to_string(),
            email: "priya.raman@example.com".to_string(),
            start_date: date(2026, 6, 22)?,
            current_day: 45,
            status: ClientStatus::Active,
            health: HealthFlag::OnTrack,
            start_weight: 158.0,
            current_weight: 149.6,
            goal_weight: 138.0,
            total_lost: 8.4,
            weekly_avg: 1.3,
            last_contact: date(2026, 8, 4)?,
            last_weigh_in: date(2026, 8, 3)?,
            next_touchpoint: NextTouchpoint {
                kind: "evening-check-in".to_string(),
                time_label: "8:30 PM".to_string(),
                day: 45,
            },
            today_morning: false,
            today_evening: false,
            notes: "Steady, plateau talk scheduled for week 7".to_string(),
            coach_prospect: false,
            prospect_id: None,
        },
        Client {
            id: 6,
            name: "Tom Eriksen".to_string(),
            phone: "555-0127".to_string(),
            email: "tom.eriksen@example.com".to_string(),
            start_date: date(2026, 7, 19)?,
            current_day: 18,
            status: ClientStatus::Paused,
            health: HealthFlag::Paused,
            start_weight: 199.0,
            current_weight: 194.8,
            goal_weight: 175.0,
            total_lost: 4.2,
            weekly_avg: 1.6,
            last_contact: date(2026, 7, 28)?,
            last_weigh_in: date(2026, 7, 27)?,
            next_touchpoint: NextTouchpoint {
                kind: "restart-call".to_string(),
                time_label: "10:00 AM".to_string(),
                day: 18,
            },
            today_morning: false,
            today_evening: false,
            notes: "Paused for surgery recovery, restart mid-August".to_string(),
            coach_prospect: false,
            prospect_id: None,
        },
        Client {
            id: 7,
            name: "Elaine Brooks".to_string(),
            phone: "555-0156".to_string(),
            email: "elaine.brooks@example.com".to_string(),
            start_date: date(2026, 5, 3)?,
            current_day: 95,
            status: ClientStatus::Completed,
            health: HealthFlag::CrushingIt,
            start_weight: 176.0,
            current_weight: 150.2,
            goal_weight: 150.0,
            total_lost: 25.8,
            weekly_avg: 1.9,
            last_contact: date(2026, 8, 1)?,
            last_weigh_in: date(2026, 8, 1)?,
            next_touchpoint: NextTouchpoint {
                kind: "celebration-call".to_string(),
                time_label: "11:00 AM".to_string(),
                day: 95,
            },
            today_morning: false,
            today_evening: false,
            notes: "Goal reached, moving to maintenance plan".to_string(),
            coach_prospect: true,
            prospect_id: None,
        },
    ])
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    for client in seed_clients()? {
        upsert_client(pool, &client).await?;
    }
    Ok(())
}

async fn upsert_client(pool: &PgPool, client: &Client) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO coach_tools.clients
        (id, name, phone, email, start_date, current_day, status, health,
         start_weight, current_weight, goal_weight, total_lost, weekly_avg,
         last_contact, last_weigh_in,
         next_touchpoint_kind, next_touchpoint_time, next_touchpoint_day,
         today_morning, today_evening, notes, coach_prospect, prospect_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
        ON CONFLICT (email) DO UPDATE
        SET name = EXCLUDED.name,
            phone = EXCLUDED.phone,
            current_day = EXCLUDED.current_day,
            status = EXCLUDED.status,
            health = EXCLUDED.health,
            current_weight = EXCLUDED.current_weight,
            total_lost = EXCLUDED.total_lost,
            weekly_avg = EXCLUDED.weekly_avg,
            last_contact = EXCLUDED.last_contact,
            last_weigh_in = EXCLUDED.last_weigh_in,
            notes = EXCLUDED.notes
        "#,
    )
    .bind(client.id)
    .bind(&client.name)
    .bind(&client.phone)
    .bind(&client.email)
    .bind(client.start_date)
    .bind(client.current_day)
    .bind(client.status.as_str())
    .bind(client.health.as_str())
    .bind(client.start_weight)
    .bind(client.current_weight)
    .bind(client.goal_weight)
    .bind(client.total_lost)
    .bind(client.weekly_avg)
    .bind(client.last_contact)
    .bind(client.last_weigh_in)
    .bind(&client.next_touchpoint.kind)
    .bind(&client.next_touchpoint.time_label)
    .bind(client.next_touchpoint.day)
    .bind(client.today_morning)
    .bind(client.today_evening)
    .bind(&client.notes)
    .bind(client.coach_prospect)
    .bind(client.prospect_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_clients(pool: &PgPool) -> anyhow::Result<Vec<Client>> {
    let rows = sqlx::query(
        "SELECT id, name, phone, email, start_date, current_day, status, health, \
         start_weight, current_weight, goal_weight, total_lost, weekly_avg, \
         last_contact, last_weigh_in, \
         next_touchpoint_kind, next_touchpoint_time, next_touchpoint_day, \
         today_morning, today_evening, notes, coach_prospect, prospect_id \
         FROM coach_tools.clients ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut clients = Vec::new();
    for row in rows {
        let status: String = row.get("status");
        let health: String = row.get("health");
        clients.push(Client {
            id: row.get("id"),
            name: row.get("name"),
            phone: row.get("phone"),
            email: row.get("email"),
            start_date: row.get("start_date"),
            current_day: row.get("current_day"),
            status: status.parse()?,
            health: health.parse()?,
            start_weight: row.get("start_weight"),
            current_weight: row.get("current_weight"),
            goal_weight: row.get("goal_weight"),
            total_lost: row.get("total_lost"),
            weekly_avg: row.get("weekly_avg"),
            last_contact: row.get("last_contact"),
            last_weigh_in: row.get("last_weigh_in"),
            next_touchpoint: NextTouchpoint {
                kind: row.get("next_touchpoint_kind"),
                time_label: row.get("next_touchpoint_time"),
                day: row.get("next_touchpoint_day"),
            },
            today_morning: row.get("today_morning"),
            today_evening: row.get("today_evening"),
            notes: row.get("notes"),
            coach_prospect: row.get("coach_prospect"),
            prospect_id: row.get("prospect_id"),
        });
    }

    tracing::debug!(count = clients.len(), "loaded client roster");
    Ok(clients)
}

/// Write one client's mutable fields back by id.
pub async fn save_client(pool: &PgPool, client: &Client) -> anyhow::Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE coach_tools.clients
        SET current_day = $2,
            status = $3,
            health = $4,
            current_weight = $5,
            total_lost = $6,
            weekly_avg = $7,
            last_contact = $8,
            last_weigh_in = $9,
            today_morning = $10,
            today_evening = $11,
            notes = $12
        WHERE id = $1
        "#,
    )
    .bind(client.id)
    .bind(client.current_day)
    .bind(client.status.as_str())
    .bind(client.health.as_str())
    .bind(client.current_weight)
    .bind(client.total_lost)
    .bind(client.weekly_avg)
    .bind(client.last_contact)
    .bind(client.last_weigh_in)
    .bind(client.today_morning)
    .bind(client.today_evening)
    .bind(&client.notes)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("client {} not found in store", client.id);
    }
    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        name: String,
        phone: String,
        email: String,
        start_date: NaiveDate,
        current_day: i32,
        status: ClientStatus,
        health: HealthFlag,
        start_weight: f64,
        current_weight: f64,
        goal_weight: f64,
        notes: Option<String>,
        coach_prospect: Option<bool>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut imported = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let total_lost = round1(row.start_weight - row.current_weight);
        let weekly_avg = weekly_average(total_lost, row.current_day);

        sqlx::query(
            r#"
            INSERT INTO coach_tools.clients
            (name, phone, email, start_date, current_day, status, health,
             start_weight, current_weight, goal_weight, total_lost, weekly_avg,
             last_contact, last_weigh_in, next_touchpoint_day, notes, coach_prospect)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17)
            ON CONFLICT (email) DO UPDATE
            SET name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                current_day = EXCLUDED.current_day,
                status = EXCLUDED.status,
                health = EXCLUDED.health,
                current_weight = EXCLUDED.current_weight,
                total_lost = EXCLUDED.total_lost,
                weekly_avg = EXCLUDED.weekly_avg,
                notes = EXCLUDED.notes
            "#,
        )
        .bind(&row.name)
        .bind(&row.phone)
        .bind(&row.email)
        .bind(row.start_date)
        .bind(row.current_day)
        .bind(row.status.as_str())
        .bind(row.health.as_str())
        .bind(row.start_weight)
        .bind(row.current_weight)
        .bind(row.goal_weight)
        .bind(total_lost)
        .bind(weekly_avg)
        .bind(row.start_date)
        .bind(row.start_date)
        .bind(row.current_day)
        .bind(row.notes.unwrap_or_default())
        .bind(row.coach_prospect.unwrap_or(false))
        .execute(pool)
        .await?;

        imported += 1;
    }

    tracing::info!(imported, path = %csv_path.display(), "csv import finished");
    Ok(imported)
}
