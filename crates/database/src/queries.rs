//! Database query functions

use crate::models::*;
use crate::schema::Database;
use crate::Result;
use tracing::debug;

impl Database {
    // ==================== Precipitation ====================

    /// Get precipitation readings inside a window, oldest first
    pub async fn get_precipitation(
        &self,
        window: &ObservationWindow,
    ) -> Result<Vec<PrecipitationReading>> {
        let (start, end) = window.bounds();
        let rows = sqlx::query_as::<_, PrecipitationReading>(
            "SELECT date, prcp
             FROM measurement
             WHERE date >= ? AND date <= ?
             ORDER BY date ASC",
        )
        .bind(&start)
        .bind(&end)
        .fetch_all(self.pool())
        .await?;

        debug!(start = %start, end = %end, rows = rows.len(), "Fetched precipitation");
        Ok(rows)
    }

    // ==================== Stations ====================

    /// Get measurement counts per station, most active first
    pub async fn get_station_activity(&self) -> Result<Vec<StationActivity>> {
        let rows = sqlx::query_as::<_, StationActivity>(
            "SELECT station, COUNT(station) as observations
             FROM measurement
             GROUP BY station
             ORDER BY observations DESC, station ASC",
        )
        .fetch_all(self.pool())
        .await?;

        debug!(rows = rows.len(), "Fetched station activity");
        Ok(rows)
    }

    /// Get all station metadata
    pub async fn get_stations(&self) -> Result<Vec<Station>> {
        let rows = sqlx::query_as::<_, Station>(
            "SELECT id, station, name, latitude, longitude, elevation
             FROM station ORDER BY station",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Get the most recent measurements recorded by a station, newest first
    pub async fn get_recent_measurements(
        &self,
        station: &str,
        limit: i64,
    ) -> Result<Vec<Measurement>> {
        let rows = sqlx::query_as::<_, Measurement>(
            "SELECT id, station, date, prcp, tobs
             FROM measurement
             WHERE station = ?
             ORDER BY date DESC
             LIMIT ?",
        )
        .bind(station)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    // ==================== Temperature ====================

    /// Get temperature observations of one station inside a window, oldest first
    pub async fn get_station_temperatures(
        &self,
        station: &str,
        window: &ObservationWindow,
    ) -> Result<Vec<TemperatureObservation>> {
        let (start, end) = window.bounds();
        let rows = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT station, date, tobs
             FROM measurement
             WHERE station = ?
             AND date >= ? AND date <= ?
             ORDER BY date ASC",
        )
        .bind(station)
        .bind(&start)
        .bind(&end)
        .fetch_all(self.pool())
        .await?;

        debug!(station = station, rows = rows.len(), "Fetched station temperatures");
        Ok(rows)
    }

    /// Get per-date temperature aggregates from `start` onwards, or up to
    /// `end` inclusive when given
    ///
    /// Dates are compared as text, so neither bound is validated.
    pub async fn get_temperature_summaries(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<TemperatureSummary>> {
        let rows = match end {
            Some(end) => {
                sqlx::query_as::<_, TemperatureSummary>(
                    "SELECT date, MIN(tobs) as min_tobs, MAX(tobs) as max_tobs,
                            AVG(tobs) as avg_tobs
                     FROM measurement
                     WHERE date >= ? AND date <= ?
                     GROUP BY date
                     ORDER BY date ASC",
                )
                .bind(start)
                .bind(end)
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, TemperatureSummary>(
                    "SELECT date, MIN(tobs) as min_tobs, MAX(tobs) as max_tobs,
                            AVG(tobs) as avg_tobs
                     FROM measurement
                     WHERE date >= ?
                     GROUP BY date
                     ORDER BY date ASC",
                )
                .bind(start)
                .fetch_all(self.pool())
                .await?
            }
        };

        debug!(start = start, end = ?end, rows = rows.len(), "Fetched temperature summaries");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn insert_measurement(
        db: &Database,
        station: &str,
        date: &str,
        prcp: Option<f64>,
        tobs: Option<f64>,
    ) {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(station)
            .bind(date)
            .bind(prcp)
            .bind(tobs)
            .execute(db.pool())
            .await
            .unwrap();
    }

    fn window(start: (i32, u32, u32), end: (i32, u32, u32)) -> ObservationWindow {
        ObservationWindow::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_precipitation_is_bounded_and_ordered() {
        let db = Database::in_memory().await.unwrap();

        insert_measurement(&db, "A", "2016-08-22", Some(9.0), Some(70.0)).await;
        insert_measurement(&db, "A", "2017-01-05", Some(0.2), Some(70.0)).await;
        insert_measurement(&db, "B", "2016-08-23", Some(0.1), Some(70.0)).await;
        insert_measurement(&db, "B", "2017-01-05", None, Some(70.0)).await;
        insert_measurement(&db, "A", "2017-08-23", Some(0.4), Some(70.0)).await;
        insert_measurement(&db, "A", "2017-08-24", Some(5.0), Some(70.0)).await;

        let rows = db.get_precipitation(&ObservationWindow::default()).await.unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();

        assert_eq!(dates, vec!["2016-08-23", "2017-01-05", "2017-01-05", "2017-08-23"]);
        assert!(rows.iter().any(|r| r.prcp.is_none()));
    }

    #[tokio::test]
    async fn test_station_activity_ranking() {
        let db = Database::in_memory().await.unwrap();

        for day in 1..=3 {
            insert_measurement(&db, "BUSY", &format!("2017-01-0{}", day), None, None).await;
        }
        insert_measurement(&db, "QUIET", "2017-01-01", None, None).await;
        insert_measurement(&db, "MID", "2017-01-01", None, None).await;
        insert_measurement(&db, "MID", "2017-01-02", None, None).await;

        let rows = db.get_station_activity().await.unwrap();
        let ranking: Vec<(&str, i64)> = rows
            .iter()
            .map(|r| (r.station.as_str(), r.observations))
            .collect();

        assert_eq!(ranking, vec![("BUSY", 3), ("MID", 2), ("QUIET", 1)]);
    }

    #[tokio::test]
    async fn test_station_activity_ties_ordered_by_station() {
        let db = Database::in_memory().await.unwrap();

        insert_measurement(&db, "ZULU", "2017-01-01", None, None).await;
        insert_measurement(&db, "ZULU", "2017-01-02", None, None).await;
        insert_measurement(&db, "ALPHA", "2017-01-01", None, None).await;
        insert_measurement(&db, "ALPHA", "2017-01-02", None, None).await;
        insert_measurement(&db, "MIKE", "2017-01-01", None, None).await;
        insert_measurement(&db, "BRAVO", "2017-01-01", None, None).await;

        let rows = db.get_station_activity().await.unwrap();
        let ranking: Vec<(&str, i64)> = rows
            .iter()
            .map(|r| (r.station.as_str(), r.observations))
            .collect();

        assert_eq!(
            ranking,
            vec![("ALPHA", 2), ("ZULU", 2), ("BRAVO", 1), ("MIKE", 1)]
        );
    }

    #[tokio::test]
    async fn test_station_temperatures_filters_station_and_window() {
        let db = Database::in_memory().await.unwrap();

        insert_measurement(&db, "USC00519281", "2017-03-02", None, Some(72.0)).await;
        insert_measurement(&db, "USC00519281", "2017-03-01", None, Some(71.0)).await;
        insert_measurement(&db, "USC00519281", "2015-03-01", None, Some(60.0)).await;
        insert_measurement(&db, "OTHER", "2017-03-01", None, Some(80.0)).await;

        let rows = db
            .get_station_temperatures("USC00519281", &window((2017, 1, 1), (2017, 12, 31)))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.station == "USC00519281"));
        assert_eq!(rows[0].date, "2017-03-01");
        assert_eq!(rows[0].tobs, Some(71.0));
        assert_eq!(rows[1].tobs, Some(72.0));
    }

    #[tokio::test]
    async fn test_temperature_summaries_group_by_date() {
        let db = Database::in_memory().await.unwrap();

        insert_measurement(&db, "A", "2017-01-01", None, Some(70.0)).await;
        insert_measurement(&db, "B", "2017-01-01", None, Some(75.0)).await;
        insert_measurement(&db, "A", "2017-01-02", None, Some(80.0)).await;
        insert_measurement(&db, "A", "2017-01-03", None, Some(90.0)).await;

        let rows = db
            .get_temperature_summaries("2017-01-01", Some("2017-01-02"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2017-01-01");
        assert_eq!(rows[0].min_tobs, Some(70.0));
        assert_eq!(rows[0].max_tobs, Some(75.0));
        assert_eq!(rows[0].avg_tobs, Some(72.5));
        assert_eq!(rows[1].avg_tobs, Some(80.0));

        let open = db.get_temperature_summaries("2017-01-02", None).await.unwrap();
        let dates: Vec<&str> = open.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2017-01-02", "2017-01-03"]);
    }

    #[tokio::test]
    async fn test_temperature_summaries_with_null_observations() {
        let db = Database::in_memory().await.unwrap();

        insert_measurement(&db, "A", "2017-01-01", Some(0.5), None).await;

        let rows = db.get_temperature_summaries("2017-01-01", None).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].min_tobs.is_none());
        assert!(rows[0].avg_tobs.is_none());
    }

    #[tokio::test]
    async fn test_recent_measurements_newest_first() {
        let db = Database::in_memory().await.unwrap();

        insert_measurement(&db, "A", "2017-01-01", Some(0.1), Some(70.0)).await;
        insert_measurement(&db, "A", "2017-01-03", Some(0.3), Some(72.0)).await;
        insert_measurement(&db, "A", "2017-01-02", Some(0.2), Some(71.0)).await;
        insert_measurement(&db, "B", "2017-01-04", None, None).await;

        let rows = db.get_recent_measurements("A", 2).await.unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();

        assert_eq!(dates, vec!["2017-01-03", "2017-01-02"]);
        assert_eq!(rows[0].prcp, Some(0.3));
    }

    #[tokio::test]
    async fn test_get_stations() {
        let db = Database::in_memory().await.unwrap();

        sqlx::query(
            "INSERT INTO station (station, name, latitude, longitude, elevation)
             VALUES ('USC00519397', 'WAIKIKI 717.2, HI US', 21.2716, -157.8168, 3.0)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let stations = db.get_stations().await.unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "WAIKIKI 717.2, HI US");
        assert_eq!(stations[0].elevation, Some(3.0));
    }
}
