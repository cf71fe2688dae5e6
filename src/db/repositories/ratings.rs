use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::db::{
    connection::Database,
    models::{HappinessRating, WriteOutcome, MAX_HAPPINESS, MIN_HAPPINESS},
    records::{self, Scope},
};

impl Database {
    /// Rate a calendar day. The time-of-day component of `date` is
    /// discarded; a second write to the same day rewrites the existing
    /// record in place instead of inserting a duplicate. Happiness is
    /// clamped to the [-2, 2] scale.
    pub async fn upsert_rating(
        &self,
        date: DateTime<Utc>,
        happiness: i8,
    ) -> Result<WriteOutcome> {
        self.execute(move |conn| {
            let day = date.date_naive();
            let happiness = happiness.clamp(MIN_HAPPINESS, MAX_HAPPINESS);
            let now = Utc::now();

            let mut ratings: Vec<HappinessRating> =
                records::load(conn, Scope::Durable, records::RATINGS)?;

            let outcome = match ratings.iter_mut().find(|r| r.date == day) {
                Some(existing) => {
                    existing.happiness = happiness;
                    existing.updated_at = Some(now);
                    WriteOutcome::Updated
                }
                None => {
                    ratings.push(HappinessRating {
                        date: day,
                        happiness,
                        created_at: now,
                        updated_at: None,
                    });
                    WriteOutcome::Created
                }
            };

            records::save(conn, Scope::Durable, records::RATINGS, &ratings)?;
            Ok(outcome)
        })
        .await
    }

    /// Remove the rating for a day. Does nothing if the day was never rated.
    pub async fn delete_rating(&self, date: NaiveDate) -> Result<()> {
        self.execute(move |conn| {
            let mut ratings: Vec<HappinessRating> =
                records::load(conn, Scope::Durable, records::RATINGS)?;
            ratings.retain(|r| r.date != date);
            records::save(conn, Scope::Durable, records::RATINGS, &ratings)?;
            Ok(())
        })
        .await
    }

    /// All ratings in storage order; callers sort as needed.
    pub async fn list_ratings(&self) -> Result<Vec<HappinessRating>> {
        self.execute(|conn| records::load(conn, Scope::Durable, records::RATINGS))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_database;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn second_upsert_for_a_day_updates_in_place() {
        let db = temp_database();

        let first = db.upsert_rating(at(2024, 10, 20, 9), 1).await.unwrap();
        assert_eq!(first, WriteOutcome::Created);

        // Different time of day, same calendar day.
        let second = db.upsert_rating(at(2024, 10, 20, 22), -1).await.unwrap();
        assert_eq!(second, WriteOutcome::Updated);

        let ratings = db.list_ratings().await.unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].happiness, -1);
        assert!(ratings[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn happiness_is_clamped_to_scale() {
        let db = temp_database();
        db.upsert_rating(at(2024, 10, 20, 12), 7).await.unwrap();
        db.upsert_rating(at(2024, 10, 21, 12), -9).await.unwrap();

        let ratings = db.list_ratings().await.unwrap();
        let by_day: Vec<i8> = ratings.iter().map(|r| r.happiness).collect();
        assert_eq!(by_day, vec![2, -2]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let db = temp_database();
        db.upsert_rating(at(2024, 10, 20, 12), 0).await.unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 10, 20).unwrap();
        db.delete_rating(day).await.unwrap();
        db.delete_rating(day).await.unwrap();

        assert!(db.list_ratings().await.unwrap().is_empty());
    }
}
