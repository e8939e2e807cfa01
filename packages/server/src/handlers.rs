//! HTTP handler functions for the crime risk API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use crime_risk_analytics::config::PipelineConfig;
use crime_risk_analytics_models::RiskReport;
use crime_risk_crime_models::RawIncident;
use crime_risk_server_models::{ApiHealth, ApiRiskResponse, RiskRequest};

use crate::{AppState, ServerError};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/risk`
///
/// Downloads `crimeDataUrl`, runs the pipeline, and filters to `pincode`
/// when given.
pub async fn risk(state: web::Data<AppState>, body: web::Json<RiskRequest>) -> HttpResponse {
    let request = body.into_inner();
    let filter = request.pincode.as_ref().map(|p| p.as_filter());

    let result = match crime_risk_ingest::fetch_csv(&request.crime_data_url).await {
        Ok(records) => process(Arc::clone(&state.config), records, filter).await,
        Err(e) => Err(ServerError::from(e)),
    };

    match result {
        Ok(report) => HttpResponse::Ok().json(ApiRiskResponse::success(report)),
        Err(e) => {
            log::error!("Failed to process crime data from {}: {e}", request.crime_data_url);
            HttpResponse::InternalServerError().json(ApiRiskResponse::failure())
        }
    }
}

/// Runs the pipeline over `records` on actix's blocking thread pool.
///
/// # Errors
///
/// Returns [`ServerError::Pipeline`] if any stage fails and
/// [`ServerError::Blocking`] if the worker is lost.
pub async fn process(
    config: Arc<PipelineConfig>,
    records: Vec<RawIncident>,
    filter: Option<String>,
) -> Result<RiskReport, ServerError> {
    let report = web::block(move || {
        crime_risk_analytics::run(records, filter.as_deref(), &config)
    })
    .await
    .map_err(|e| ServerError::Blocking(e.to_string()))??;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use crime_risk_analytics::PipelineError;
    use crime_risk_analytics::config::ClassifierConfig;
    use crime_risk_server_models::{ApiRiskResponse, GENERIC_ERROR_MESSAGE};

    use super::*;
    use crate::configure;

    fn config() -> Arc<PipelineConfig> {
        Arc::new(PipelineConfig {
            classifier: ClassifierConfig {
                n_estimators: 10,
                ..ClassifierConfig::default()
            },
            ..PipelineConfig::default()
        })
    }

    fn records() -> Vec<RawIncident> {
        [
            ("85001", "MURDER"),
            ("85001", "AGGRAVATED ASSAULT"),
            ("85002", "BURGLARY"),
            ("85002", "LARCENY"),
            ("85002", "LARCENY"),
            ("90210", "LARCENY"),
        ]
        .into_iter()
        .map(|(zip, cat)| RawIncident::new(zip, cat))
        .collect()
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn unreachable_source_returns_generic_failure() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState { config: config() }))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/risk")
            .set_json(serde_json::json!({ "crimeDataUrl": "http://127.0.0.1:1/crimes.csv" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);

        let body: ApiRiskResponse = test::read_body_json(resp).await;
        assert_eq!(body.status, 500);
        assert!(body.data.is_none());
        assert_eq!(body.error.as_deref(), Some(GENERIC_ERROR_MESSAGE));
    }

    #[actix_web::test]
    async fn unparseable_body_returns_generic_failure() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState { config: config() }))
                .configure(configure),
        )
        .await;

        for body in [
            serde_json::json!({ "pincode": "85001" }),
            serde_json::json!({
                "crimeDataUrl": "http://127.0.0.1:1/crimes.csv",
                "pincode": 85001.5
            }),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/risk")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 500);

            let body: ApiRiskResponse = test::read_body_json(resp).await;
            assert_eq!(body, ApiRiskResponse::failure());
        }
    }

    #[actix_web::test]
    async fn process_runs_pipeline_and_filters() {
        let report = process(config(), records(), None).await.unwrap();
        assert_eq!(report.area_counts.len(), 2);
        assert_eq!(report.predictions.len(), 2);

        let only = process(config(), records(), Some("85002".to_string()))
            .await
            .unwrap();
        assert_eq!(only.area_counts.len(), 1);
        assert_eq!(only.area_counts[0].total_incidents, 3);
        assert_eq!(only.predictions.len(), 1);
    }

    #[actix_web::test]
    async fn process_surfaces_pipeline_errors() {
        let err = process(config(), vec![RawIncident::new("90210", "RAPE")], None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServerError::Pipeline(PipelineError::InsufficientData { .. })
        ));
    }
}
