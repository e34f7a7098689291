use crate::{error::AppError, AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use calculator::CalculationResult;
use core_types::{Alert, EducationalContent, Product, SortOrder};
use database::{EducationalFilter, ProductFilter, SortSpec};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

type JsonBody<T> = WithRejection<Json<T>, AppError>;
type QueryParams<T> = WithRejection<Query<T>, AppError>;

/// Query string accepted by `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub bank: Option<String>,
    pub min_apy: Option<Decimal>,
    pub state: Option<String>,
    pub product_type: Option<String>,
    pub term: Option<i32>,
    pub min_deposit: Option<Decimal>,
    pub sort_by: Option<String>,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

fn default_sort_order() -> String {
    "desc".to_string()
}

impl ProductQuery {
    fn into_parts(self) -> (ProductFilter, Option<SortSpec>) {
        let order = SortOrder::from_label(&self.sort_order);
        let sort = self
            .sort_by
            .filter(|field| !field.is_empty())
            .map(|field| SortSpec::new(field, order));
        let filter = ProductFilter {
            bank: self.bank,
            min_apy: self.min_apy,
            state: self.state,
            product_type: self.product_type,
            term: self.term,
            min_deposit: self.min_deposit,
        };
        (filter, sort)
    }
}

#[derive(Debug, Deserialize)]
pub struct EducationalQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalculatorRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub apy: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub term_years: Decimal,
    #[serde(default = "default_compounding")]
    pub compounding: String,
}

fn default_compounding() -> String {
    "daily".to_string()
}

/// Body returned by every write endpoint.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
    pub id: String,
}

/// # GET /
pub async fn root() -> Json<JsonValue> {
    Json(json!({ "message": "APYTracker API is running" }))
}

/// # GET /products
/// Lists products matching every supplied filter, optionally sorted by any field.
///
/// Example: `/products?bank=Chase&min_apy=4.5&state=CA&sort_by=apy&sort_order=desc`
pub async fn get_products(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): QueryParams<ProductQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let (filter, sort) = query.into_parts();
    let products = state.db_repo.get_products(&filter, sort.as_ref()).await?;
    Ok(Json(products))
}

/// # POST /products
pub async fn add_product(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(product), _): JsonBody<Product>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let id = state.db_repo.add_product(product).await?;
    Ok((StatusCode::CREATED, Json(Created { message: "Product added", id })))
}

/// # POST /alerts
/// Records an email alert; delivery happens elsewhere.
pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(alert), _): JsonBody<Alert>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let id = state.db_repo.save_alert(alert).await?;
    Ok((StatusCode::CREATED, Json(Created { message: "Alert saved", id })))
}

/// # GET /educational
pub async fn get_educational_content(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): QueryParams<EducationalQuery>,
) -> Result<Json<Vec<EducationalContent>>, AppError> {
    let filter = EducationalFilter { topic: query.topic };
    let content = state.db_repo.get_educational_content(&filter).await?;
    Ok(Json(content))
}

/// # POST /educational
pub async fn add_educational_content(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(content), _): JsonBody<EducationalContent>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let id = state.db_repo.add_educational_content(content).await?;
    Ok((StatusCode::CREATED, Json(Created { message: "Educational content added", id })))
}

/// # POST /calculator
/// Compares simple and compound earnings for a deposit.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): JsonBody<CalculatorRequest>,
) -> Result<Json<CalculationResult>, AppError> {
    let result = state.calculator.calculate(
        request.principal,
        request.apy,
        request.term_years,
        &request.compounding,
    )?;
    Ok(Json(result))
}

/// # POST /chat
/// Placeholder for an assistant integration: echoes the question back.
pub async fn chat(
    WithRejection(Json(body), _): JsonBody<JsonValue>,
) -> Result<Json<JsonValue>, AppError> {
    let fields = body
        .as_object()
        .ok_or_else(|| AppError::validation("Request body must be a JSON object"))?;
    let question = match fields.get("question") {
        None => String::new(),
        Some(JsonValue::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    Ok(Json(json!({
        "answer": format!("You asked: {question} (AI response coming soon)")
    })))
}
