//! HTTP handler functions for the screening map API.

use actix_web::{HttpResponse, web};
use screening_map_analytics::{AnalyticsError, SpatialError, pipeline};
use screening_map_server_models::{AnalyzeForm, ApiAnalysis, ApiError, ApiHealth, ApiPeriod};
use screening_map_source::SourceError;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/periods`
///
/// Lists the configured periods and whether each has data.
pub async fn periods(state: web::Data<AppState>) -> HttpResponse {
    let periods: Vec<ApiPeriod> = state
        .source
        .available_periods()
        .into_iter()
        .map(|p| ApiPeriod {
            name: p.period.to_string(),
            available: p.available,
        })
        .collect();

    HttpResponse::Ok().json(periods)
}

/// `GET /api/periods/{period}/analysis`
pub async fn period_analysis(
    state: web::Data<AppState>,
    period: web::Path<String>,
) -> HttpResponse {
    analysis_response(&state, &period)
}

/// `POST /api/analyze`
///
/// Form-based variant of the analysis endpoint.
pub async fn analyze(state: web::Data<AppState>, form: web::Form<AnalyzeForm>) -> HttpResponse {
    match form.period.as_deref().map(str::trim) {
        Some(period) if !period.is_empty() => analysis_response(&state, period),
        _ => HttpResponse::BadRequest().json(ApiError::new("no_period", "No period selected.")),
    }
}

/// Loads and analyzes a period, mapping every failure to a distinct error
/// response.
fn analysis_response(state: &AppState, name: &str) -> HttpResponse {
    let result = state
        .source
        .resolve(name)
        .and_then(|period| state.source.load(period).map(|records| (period, records)));

    let (period, records) = match result {
        Ok(loaded) => loaded,
        Err(e) => return source_error_response(&e),
    };

    match pipeline::analyze_period(records, &state.map_builder) {
        Ok(analysis) => HttpResponse::Ok().json(ApiAnalysis::new(
            period.to_string(),
            analysis,
            state.map_config.clone(),
        )),
        Err(e) => analytics_error_response(&e),
    }
}

fn source_error_response(e: &SourceError) -> HttpResponse {
    match e {
        SourceError::UnknownPeriod { .. } => {
            HttpResponse::NotFound().json(ApiError::new("unknown_period", e.to_string()))
        }
        SourceError::NotCollected { .. } => {
            HttpResponse::NotFound().json(ApiError::new("not_collected", "Data Not Yet Collected."))
        }
        SourceError::Io(_) | SourceError::Csv { .. } => {
            log::error!("Failed to load period data: {e}");
            HttpResponse::InternalServerError()
                .json(ApiError::new("source_error", "Failed to read period data"))
        }
    }
}

fn analytics_error_response(e: &AnalyticsError) -> HttpResponse {
    let kind = match e {
        AnalyticsError::MalformedCoordinate { .. } => "malformed_coordinate",
        AnalyticsError::EmptyDataset => "empty_dataset",
        AnalyticsError::Spatial(SpatialError::InsufficientSites { .. }) => "insufficient_sites",
        AnalyticsError::ZeroVariance { .. } => "zero_variance",
        AnalyticsError::DegenerateVariance { .. } => "degenerate_variance",
        AnalyticsError::ValueCountMismatch { .. } => {
            log::error!("Analysis failed: {e}");
            return HttpResponse::InternalServerError()
                .json(ApiError::new("internal", "Analysis failed"));
        }
    };

    log::warn!("Period cannot be analyzed: {e}");
    HttpResponse::UnprocessableEntity().json(ApiError::new(kind, e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use actix_web::{App, http::StatusCode, test};
    use screening_map_map_models::MapConfig;
    use screening_map_source::{PeriodSource, SourceConfig};

    use crate::{AppState, configure};

    const PERIOD_ONE: &str = "\
Organization,Address,coordinates,Screening Level
Alpha Clinic,1 Main St,\"40.810,-73.950\",8
Beta Health,3 Oak Ave,\"40.800,-73.940\",2
Alpha Clinic,1 Main St,\"40.810,-73.950\",6
Alpha Clinic,2 Main St,\"40.811,-73.949\",5
Beta Health,4 Oak Ave,\"40.801,-73.941\",1
Beta Health,4 Oak Ave,\"40.801,-73.941\",2
";

    const PERIOD_TWO: &str = "\
Organization,Address,coordinates,Screening Level
Alpha Clinic,1 Main St,\"40.810,-73.950\",8
";

    const PERIOD_THREE: &str = "\
Organization,Address,coordinates,Screening Level
Alpha Clinic,1 Main St,\"40.810,-73.950\",7
Beta Health,3 Oak Ave,\"40.800,-73.940\",2
";

    fn data_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "screening_map_server_{}_{name}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Period1.csv"), PERIOD_ONE).unwrap();
        std::fs::write(dir.join("Period2.csv"), PERIOD_TWO).unwrap();
        std::fs::write(dir.join("Period3.csv"), PERIOD_THREE).unwrap();
        dir
    }

    fn state(dir: &Path) -> actix_web::web::Data<AppState> {
        let source = PeriodSource::new(SourceConfig {
            data_dir: dir.to_path_buf(),
            period_count: 8,
        });
        actix_web::web::Data::new(AppState::new(source, MapConfig::default()).unwrap())
    }

    #[actix_web::test]
    async fn analyzes_period() {
        let dir = data_dir("analysis");
        let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/periods/Period1/analysis")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["period"], "Period1");
        assert_eq!(body["sites"].as_array().unwrap().len(), 4);
        assert_eq!(body["periodAverage"], 4.0);
        assert!((body["moran"]["i"].as_f64().unwrap() - -0.184_210_526).abs() < 1e-6);
        assert_eq!(body["map"]["features"]["type"], "FeatureCollection");
        assert_eq!(body["map"]["view"]["tiles"], "cartodbpositron");
    }

    #[actix_web::test]
    async fn lists_periods() {
        let dir = data_dir("periods");
        let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/periods").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let periods = body.as_array().unwrap();
        assert_eq!(periods.len(), 8);
        assert_eq!(periods[0]["name"], "Period1");
        assert_eq!(periods[0]["available"], true);
        assert_eq!(periods[2]["available"], true);
        assert_eq!(periods[3]["available"], false);
    }

    #[actix_web::test]
    async fn distinguishes_failures() {
        let dir = data_dir("failures");
        let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

        let cases = [
            ("/api/periods/Period4/analysis", StatusCode::NOT_FOUND, "not_collected"),
            ("/api/periods/Period42/analysis", StatusCode::NOT_FOUND, "unknown_period"),
            (
                "/api/periods/Period2/analysis",
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_sites",
            ),
            (
                "/api/periods/Period3/analysis",
                StatusCode::UNPROCESSABLE_ENTITY,
                "degenerate_variance",
            ),
        ];

        for (uri, status, kind) in cases {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status, "{uri}");
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["kind"], kind, "{uri}");
        }
    }

    #[actix_web::test]
    async fn analyze_form_requires_period() {
        let dir = data_dir("form");
        let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_form([("period", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_form([("period", "Period1")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
