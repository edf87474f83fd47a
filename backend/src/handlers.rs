use crate::AppState;
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    Json,
};
use common::aggregate::{classify_growth_decline, MIGRATION_THRESHOLD};
use common::models::*;
use tracing::debug;

fn parse_year(year: &str) -> Result<i32, AppError> {
    Ok(year.trim().parse::<i32>()?)
}

/// Return every year in the table, most recent first. The first one is what the
/// dashboard shows by default.

pub async fn years(State(state): State<AppState>) -> Json<Vec<i32>> {
    Json(state.table.years())
}

/// Return the colour palettes the frontend can offer.

pub async fn palettes() -> Json<Vec<Palette>> {
    Json(Palette::ALL.to_vec())
}

/// Return each state's population in the given year and its change since the
/// year before, largest increase first.

pub async fn changes(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Vec<PopulationChangeRecord>>, AppError> {
    let year = parse_year(&year)?;
    let changes = state.table.compute_change(year);
    if let (Some(top), Some(bottom)) = (changes.first(), changes.last()) {
        let migration = classify_growth_decline(&changes, MIGRATION_THRESHOLD);
        debug!(
            year,
            top = %top.state_code,
            bottom = %bottom.state_code,
            growing = migration.growth_count,
            declining = migration.decline_count,
            "computed population change"
        );
    }
    Ok(Json(changes))
}

/// Return each state's population in the given year, most populous first. This
/// feeds both the rankings table and the choropleth.

pub async fn populations(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Vec<StatePopulation>>, AppError> {
    let year = parse_year(&year)?;
    Ok(Json(state.table.rank_states(year)))
}

/// Return every (year, state) cell of the heat map.

pub async fn heat_map(State(state): State<AppState>) -> Json<Vec<HeatCell>> {
    Json(state.table.heat_map())
}

/// Return the metric cards and migration percentages for the given year.

pub async fn metrics(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<MetricsResponse>, AppError> {
    let year = parse_year(&year)?;
    Ok(Json(state.table.summarize(year)))
}

#[cfg(test)]
mod tests {
    use crate::{router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use common::aggregate::PopulationTable;
    use common::models::*;
    use pretty_assertions::assert_eq;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn record(year: i32, name: &str, code: &str, population: i64) -> PopulationRecord {
        PopulationRecord {
            year,
            state_name: name.to_string(),
            state_code: code.to_string(),
            id: None,
            population,
        }
    }

    fn app(static_dir: &std::path::Path) -> Router {
        let table = PopulationTable::new(vec![
            record(2010, "Alpha", "AA", 100_000),
            record(2010, "Beta", "BB", 50_000),
            record(2011, "Alpha", "AA", 160_000),
            record(2011, "Beta", "BB", 40_000),
        ])
        .unwrap();
        router(AppState { table: Arc::new(table) }, static_dir)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(app: Router, uri: &str) -> T {
        let (status, body) = get(app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn years_descend() {
        let dir = tempfile::tempdir().unwrap();
        let years: Vec<i32> = get_json(app(dir.path()), "/api/years").await;
        assert_eq!(years, vec![2011, 2010]);
    }

    #[tokio::test]
    async fn palettes_are_listed_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let palettes: Vec<String> = get_json(app(dir.path()), "/api/palettes").await;
        assert_eq!(palettes, vec!["blues", "greens", "reds", "purples", "oranges", "greys"]);
    }

    #[tokio::test]
    async fn changes_for_year() {
        let dir = tempfile::tempdir().unwrap();
        let changes: Vec<PopulationChangeRecord> = get_json(app(dir.path()), "/api/changes/2011").await;
        let deltas = changes.iter().map(|c| (c.state_code.as_str(), c.population_change)).collect::<Vec<_>>();
        assert_eq!(deltas, vec![("AA", 60_000), ("BB", -10_000)]);
    }

    #[tokio::test]
    async fn unknown_year_is_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let changes: Vec<PopulationChangeRecord> = get_json(app(dir.path()), "/api/changes/1999").await;
        assert!(changes.is_empty());
        let populations: Vec<StatePopulation> = get_json(app(dir.path()), "/api/populations/1999").await;
        assert!(populations.is_empty());
        let metrics: MetricsResponse = get_json(app(dir.path()), "/api/metrics/1999").await;
        assert_eq!(metrics.top, StateMetric::placeholder());
    }

    #[tokio::test]
    async fn smallest_year_is_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let changes: Vec<PopulationChangeRecord> = get_json(app(dir.path()), "/api/changes/-2147483648").await;
        assert!(changes.is_empty());
        let metrics: MetricsResponse = get_json(app(dir.path()), "/api/metrics/-2147483648").await;
        assert_eq!(metrics.bottom, StateMetric::placeholder());
    }

    #[tokio::test]
    async fn bad_year_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app(dir.path()), "/api/metrics/twenty").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().starts_with("invalid year"));
    }

    #[tokio::test]
    async fn populations_are_ranked() {
        let dir = tempfile::tempdir().unwrap();
        let populations: Vec<StatePopulation> = get_json(app(dir.path()), "/api/populations/2010").await;
        assert_eq!(populations[0].state_code, "AA");
        assert_eq!(populations[1].population, 50_000);
    }

    #[tokio::test]
    async fn metrics_for_year() {
        let dir = tempfile::tempdir().unwrap();
        let metrics: MetricsResponse = get_json(app(dir.path()), "/api/metrics/2011").await;
        assert_eq!(metrics.top.label, "Alpha");
        assert_eq!(metrics.top.delta, "60 K");
        assert_eq!(metrics.bottom.delta, "-10 K");
        assert_eq!(metrics.migration.growth_percentage, 50);
        assert_eq!(metrics.migration.decline_percentage, 0);
    }

    #[tokio::test]
    async fn heat_map_covers_every_cell() {
        let dir = tempfile::tempdir().unwrap();
        let cells: Vec<HeatCell> = get_json(app(dir.path()), "/api/heatmap").await;
        assert_eq!(cells.len(), 4);
    }

    #[tokio::test]
    async fn unknown_paths_serve_the_frontend() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>dashboard</html>").unwrap();
        let (status, body) = get(app(dir.path()), "/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<html>dashboard</html>".to_vec());
    }
}
