// Variance Ledger - REST API
// JSON routes over the ledger's query/command surface (Axum)

use crate::entities::{CategoryId, LineItemDraft, LineItemId};
use crate::error::{LedgerError, ValidationError};
use crate::ledger::{Ledger, RowView, TotalsRow, WindowView};
use crate::pagination::{PageWindow, ViewKind};
use crate::period::Period;
use crate::snapshot::LedgerSnapshot;
use crate::sort::SortState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<Mutex<Ledger>>,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        // a panicked handler cannot leave the tree half-mutated
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationError>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: Vec::new(),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Ledger(LedgerError),
    BadRequest(String),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::Ledger(err) => {
                let status = match &err {
                    LedgerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    LedgerError::UnknownCategory(_) | LedgerError::UnknownLineItem { .. } => {
                        StatusCode::NOT_FOUND
                    }
                    LedgerError::InvalidPageSize { .. } => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string(), err.validation_errors().to_vec())
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, Vec::new()),
        };

        warn!(status = status.as_u16(), error = %message, "request failed");
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
            details,
        };
        (status, Json(body)).into_response()
    }
}

fn parse_period(raw: &str) -> Result<Period, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

fn parse_view(raw: &str) -> Result<ViewKind, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct NewCategory {
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValueUpdate {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageSizeRequest {
    pub page_size: usize,
}

/// Category listing entry
#[derive(Debug, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub label: String,
    pub item_count: usize,
    pub sort: SortState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SortResponse {
    pub sort: SortState,
}

#[derive(Debug, Serialize)]
pub struct AddedItem {
    pub row: RowView,
    pub compact: PageWindow,
}

#[derive(Debug, Serialize)]
pub struct UpdatedValue {
    pub stored: f64,
    pub row: RowView,
    pub totals: TotalsRow,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/categories
async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategorySummary>> {
    let ledger = state.ledger();
    let mut summaries = Vec::new();
    for category in ledger.categories() {
        summaries.push(CategorySummary {
            id: category.id.clone(),
            label: category.label.clone(),
            item_count: category.len(),
            sort: ledger.table(&category.id)?.sort,
        });
    }
    ok(summaries)
}

/// POST /api/categories
async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<NewCategory>,
) -> Result<(StatusCode, Json<ApiResponse<CategorySummary>>), ApiError> {
    let mut ledger = state.ledger();
    let category = ledger.add_category(&body.label)?;
    let summary = CategorySummary {
        id: category.id.clone(),
        label: category.label.clone(),
        item_count: 0,
        sort: SortState::None,
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(summary))))
}

/// GET /api/categories/:id/items - rows in stored order
async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<RowView>> {
    let ledger = state.ledger();
    let items = ledger.line_items(&CategoryId::from(id))?;
    ok(items.iter().map(RowView::of).collect())
}

/// POST /api/categories/:id/items
async fn create_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<LineItemDraft>,
) -> Result<(StatusCode, Json<ApiResponse<AddedItem>>), ApiError> {
    let id = CategoryId::from(id);
    let mut ledger = state.ledger();
    let row = RowView::of(ledger.add_line_item(&id, &draft)?);
    let compact = ledger.table(&id)?.pages.window(ViewKind::Compact);
    debug!(category_id = %id, item_id = %row.id, "item created via api");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(AddedItem { row, compact }))))
}

/// PUT /api/categories/:id/items/:item/values/:period
async fn update_value(
    State(state): State<AppState>,
    Path((id, item, period)): Path<(String, String, String)>,
    Json(body): Json<ValueUpdate>,
) -> ApiResult<UpdatedValue> {
    let period = parse_period(&period)?;
    let (id, item) = (CategoryId::from(id), LineItemId::from(item));

    let mut ledger = state.ledger();
    let stored = ledger.update_value(&id, &item, period, &body.value)?;
    let row = RowView::of(
        ledger
            .line_items(&id)?
            .iter()
            .find(|i| i.id == item)
            .ok_or_else(|| LedgerError::UnknownLineItem {
                category_id: id.to_string(),
                item_id: item.to_string(),
            })?,
    );
    let totals = TotalsRow::of(ledger.category(&id)?);
    ok(UpdatedValue { stored, row, totals })
}

/// GET /api/categories/:id/totals
async fn get_totals(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<TotalsRow> {
    let ledger = state.ledger();
    ok(TotalsRow::of(ledger.category(&CategoryId::from(id))?))
}

/// GET /api/categories/:id/window/:view
async fn get_window(
    State(state): State<AppState>,
    Path((id, view)): Path<(String, String)>,
) -> ApiResult<WindowView> {
    let view = parse_view(&view)?;
    let ledger = state.ledger();
    ok(ledger.sorted_window(&CategoryId::from(id), view)?)
}

/// POST /api/categories/:id/sort - advance the sort toggle
async fn toggle_sort(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<SortResponse> {
    let mut ledger = state.ledger();
    let sort = ledger.toggle_sort(&CategoryId::from(id))?;
    ok(SortResponse { sort })
}

/// PUT /api/categories/:id/window/:view/page
async fn set_page(
    State(state): State<AppState>,
    Path((id, view)): Path<(String, String)>,
    Json(body): Json<PageRequest>,
) -> ApiResult<PageWindow> {
    let view = parse_view(&view)?;
    let mut ledger = state.ledger();
    ok(ledger.set_page(&CategoryId::from(id), view, body.page)?)
}

/// PUT /api/categories/:id/page-size - compact view only
async fn set_page_size(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PageSizeRequest>,
) -> ApiResult<PageWindow> {
    let mut ledger = state.ledger();
    ok(ledger.set_page_size(&CategoryId::from(id), body.page_size)?)
}

/// GET /api/snapshot - the full tree as JSON
async fn get_snapshot(State(state): State<AppState>) -> ApiResult<LedgerSnapshot> {
    ok(state.ledger().snapshot())
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id/items", get(list_items).post(create_item))
        .route("/categories/:id/items/:item/values/:period", put(update_value))
        .route("/categories/:id/totals", get(get_totals))
        .route("/categories/:id/window/:view", get(get_window))
        .route("/categories/:id/window/:view/page", put(set_page))
        .route("/categories/:id/sort", post(toggle_sort))
        .route("/categories/:id/page-size", put(set_page_size))
        .route("/snapshot", get(get_snapshot))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
