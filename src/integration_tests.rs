//! End-to-end tests across the full pipeline

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::client::{MockSearchProvider, SearchHit};
    use crate::engine::{EngineOptions, PricingEngine};
    use crate::ml::PriceModel;
    use crate::types::PricingRequest;

    fn request(from: &str, to: &str, location: Option<&str>) -> PricingRequest {
        PricingRequest {
            hotel_id: 3,
            room_type_code: "DLX-QUEEN".to_string(),
            from_date: from.to_string(),
            to_date: to.to_string(),
            location: location.map(|s| s.to_string()),
        }
    }

    #[tokio::test]
    async fn test_full_pipeline_with_data_events_and_model() {
        let data_dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();

        // PMS export: rates plus operational metrics for part of the window
        let mut body = String::from("date,adr,occupancy,pickup_24h\n");
        for day in 1..=30 {
            let rate = 120.0 + (day % 7) as f64 * 5.0;
            body.push_str(&format!("2025-11-{day:02},{rate},0.7,2\n"));
        }
        fs::write(data_dir.path().join("november.csv"), &body).unwrap();
        // history to train on
        let mut history = String::from("date,adr\n");
        for day in 1..=28 {
            history.push_str(&format!("2024-11-{day:02},{}\n", 110.0 + day as f64));
        }
        fs::write(data_dir.path().join("history.csv"), &history).unwrap();

        let model = PriceModel::train_from_data_dir(data_dir.path(), cache_dir.path());
        assert!(model.is_some());
        // engine loads the artifact the way a service would at startup
        let loaded = PriceModel::load(cache_dir.path());
        assert!(loaded.is_some());

        let mut provider = MockSearchProvider::new();
        provider.expect_search().times(1).returning(|_, _| {
            Ok(vec![SearchHit {
                title: "Stadium concert Nov 12-14, 2025".to_string(),
                url: "https://example.com/concert".to_string(),
            }])
        });

        let engine = PricingEngine::new(data_dir.path(), cache_dir.path(), Some(Box::new(provider)))
            .with_model(loaded);

        let (items, meta) = engine
            .score_dates(
                &request("2025-11-01", "2025-11-30", Some("Dublin, Ireland")),
                &EngineOptions::default(),
            )
            .await
            .unwrap();

        // every date exactly once, ascending
        assert_eq!(items.len(), 30);
        for pair in items.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        // strict bands everywhere
        for item in &items {
            assert!(item.price_min >= 0.0);
            assert!(item.price_min < item.price_rec);
            assert!(item.price_rec < item.price_max);
        }
        // the dated event reached the priced days
        let concert_day = items.iter().find(|i| i.date == "2025-11-12").unwrap();
        assert!(concert_day.drivers.contains(&"Event impact".to_string()));
        // ML blended everywhere
        assert!(items.iter().all(|i| i.drivers.contains(&"ML model".to_string())));
        assert!(meta.ml_loaded);
        assert_eq!(meta.sources.len(), 1);
        assert_eq!(meta.baseline_days, 58);
    }

    #[tokio::test]
    async fn test_pipeline_degrades_without_any_collaborators() {
        let data_dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        let engine = PricingEngine::new(data_dir.path(), cache_dir.path(), None);

        let (items, meta) = engine
            .score_dates(&request("2025-03-01", "2025-03-07", Some("Dublin")), &EngineOptions::default())
            .await
            .unwrap();

        assert_eq!(items.len(), 7);
        assert!(!meta.ml_loaded);
        assert!(meta.sources.is_empty());
        assert_eq!(meta.baseline_days, 0);
        // heuristics still produce explainable prices
        assert!(items.iter().all(|i| i.price_rec > 0.0));
    }

    #[tokio::test]
    async fn test_second_run_reuses_cache() {
        let data_dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        let mut provider = MockSearchProvider::new();
        provider.expect_search().times(1).returning(|_, _| {
            Ok(vec![SearchHit {
                title: "Festival Nov 8, 2025".to_string(),
                url: "https://example.com/festival".to_string(),
            }])
        });

        let engine = PricingEngine::new(data_dir.path(), cache_dir.path(), Some(Box::new(provider)));
        let req = request("2025-11-01", "2025-11-15", Some("Dublin"));

        let (first, _) = engine.score_dates(&req, &EngineOptions::default()).await.unwrap();
        let (second, _) = engine.score_dates(&req, &EngineOptions::default()).await.unwrap();
        assert_eq!(first, second);
    }
}
