use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::Extension,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use quotecraft_core::DomainError;
use quotecraft_quote::{ItemDraft, LineItemLedger, QuoteHeader, TaxMode};
use quotecraft_render::{
    FontResolution, FontSource, FontStyles, PDF_CONTENT_TYPE, render_quote, suggested_filename,
};

/// One user's in-progress quote. Explicit state handed to both the ledger
/// operations and the renderer; single-writer, single-reader per session.
#[derive(Debug)]
pub struct QuoteSession {
    pub header: QuoteHeader,
    pub tax_mode: TaxMode,
    pub styles: FontStyles,
    pub ledger: LineItemLedger,
}

impl QuoteSession {
    fn new(today: NaiveDate) -> Self {
        Self {
            header: QuoteHeader::empty(today),
            tax_mode: TaxMode::TaxExcluded,
            styles: FontStyles::default(),
            ledger: LineItemLedger::new(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<QuoteSession>>,
    font: Arc<FontSource>,
}

/// Build the router. The session starts empty, dated today.
pub fn build_app(font: FontSource) -> Router {
    let state = AppState {
        session: Arc::new(Mutex::new(QuoteSession::new(Utc::now().date_naive()))),
        font: Arc::new(font),
    };

    Router::new()
        .route("/health", get(health))
        .route(
            "/quote/items",
            get(list_items).post(append_item).delete(clear_items),
        )
        .route("/quote/header", put(update_header))
        .route("/quote/pdf", get(download_pdf))
        .layer(Extension(state))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_items(Extension(state): Extension<AppState>) -> Response {
    let session = state.session.lock().unwrap();
    Json(serde_json::json!({
        "items": session.ledger.items(),
        "subtotal": session.ledger.subtotal(),
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct AppendItemRequest {
    name: String,
    unit_price: u64,
    quantity: u32,
}

async fn append_item(
    Extension(state): Extension<AppState>,
    Json(body): Json<AppendItemRequest>,
) -> Response {
    let draft = ItemDraft {
        name: body.name,
        unit_price: body.unit_price,
        quantity: body.quantity,
    };

    let mut session = state.session.lock().unwrap();
    match session.ledger.append(draft) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "count": session.ledger.len(),
                "subtotal": session.ledger.subtotal(),
            })),
        )
            .into_response(),
        Err(e) => domain_error_to_response(e),
    }
}

async fn clear_items(Extension(state): Extension<AppState>) -> Response {
    state.session.lock().unwrap().ledger.clear();
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Deserialize)]
struct UpdateHeaderRequest {
    title: String,
    company: String,
    tax_id: String,
    phone: String,
    email: String,
    date: NaiveDate,
    tax_mode: TaxMode,
    #[serde(default)]
    title_size: Option<f32>,
    #[serde(default)]
    body_size: Option<f32>,
}

async fn update_header(
    Extension(state): Extension<AppState>,
    Json(body): Json<UpdateHeaderRequest>,
) -> Response {
    let defaults = FontStyles::default();
    let styles = match FontStyles::new(
        body.title_size.unwrap_or(defaults.title_size()),
        body.body_size.unwrap_or(defaults.body_size()),
    ) {
        Ok(s) => s,
        Err(e) => return domain_error_to_response(e),
    };

    let mut session = state.session.lock().unwrap();
    session.header = QuoteHeader {
        title: body.title,
        company: body.company,
        tax_id: body.tax_id,
        phone: body.phone,
        email: body.email,
        date: body.date,
    };
    session.tax_mode = body.tax_mode;
    session.styles = styles;

    StatusCode::NO_CONTENT.into_response()
}

async fn download_pdf(Extension(state): Extension<AppState>) -> Response {
    // Snapshot the session so the render call holds no lock.
    let (quote_header, items, tax_mode, styles) = {
        let session = state.session.lock().unwrap();
        (
            session.header.clone(),
            session.ledger.items().to_vec(),
            session.tax_mode,
            session.styles,
        )
    };

    let rendered = match render_quote(&quote_header, &items, tax_mode, &styles, &state.font) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "quote render failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "render_failed",
                "quote could not be rendered",
            );
        }
    };

    let filename = suggested_filename(quote_header.date);
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PDF_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        );
    if let FontResolution::FallbackUsed { reason } = &rendered.font {
        builder = builder.header("x-font-fallback", header_safe(reason));
    }

    match builder.body(Body::from(rendered.bytes)) {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "response assembly failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "render_failed",
                "quote could not be rendered",
            )
        }
    }
}

fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Header values must be visible ASCII; anything else is replaced.
fn header_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(FontSource::Builtin);
        let resp = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn append_then_list_reports_subtotal() {
        let app = build_app(FontSource::Builtin);

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/quote/items",
                r#"{"name":"Design work","unit_price":1500,"quantity":2}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = app
            .oneshot(empty_request("GET", "/quote/items"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["subtotal"], 3000);
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
        assert_eq!(json["items"][0]["amount"], 3000);
    }

    #[tokio::test]
    async fn empty_name_is_rejected_and_ledger_unchanged() {
        let app = build_app(FontSource::Builtin);

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/quote/items",
                r#"{"name":"","unit_price":100,"quantity":1}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "validation_error");

        let resp = app
            .oneshot(empty_request("GET", "/quote/items"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["items"].as_array().unwrap().len(), 0);
        assert_eq!(json["subtotal"], 0);
    }

    #[tokio::test]
    async fn clear_resets_subtotal_to_zero() {
        let app = build_app(FontSource::Builtin);

        app.clone()
            .oneshot(json_request(
                "POST",
                "/quote/items",
                r#"{"name":"A","unit_price":10,"quantity":1}"#,
            ))
            .await
            .unwrap();

        let resp = app
            .clone()
            .oneshot(empty_request("DELETE", "/quote/items"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app
            .oneshot(empty_request("GET", "/quote/items"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["subtotal"], 0);
    }

    #[tokio::test]
    async fn pdf_download_has_content_type_and_filename() {
        let app = build_app(FontSource::Builtin);

        app.clone()
            .oneshot(json_request(
                "PUT",
                "/quote/header",
                r#"{
                    "title": "Quotation",
                    "company": "Acme Consulting Ltd.",
                    "tax_id": "50992265",
                    "phone": "02-2601-1575",
                    "email": "quotes@acme.example",
                    "date": "2026-08-27",
                    "tax_mode": "tax_excluded"
                }"#,
            ))
            .await
            .unwrap();

        let resp = app
            .oneshot(empty_request("GET", "/quote/pdf"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"quote_2026-08-27.pdf\""
        );
        assert!(resp.headers().get("x-font-fallback").is_none());

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn missing_font_asset_sets_fallback_warning_header() {
        let app = build_app(FontSource::Path("/no/such/font.ttf".into()));

        let resp = app
            .oneshot(empty_request("GET", "/quote/pdf"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("x-font-fallback").is_some());
    }

    #[tokio::test]
    async fn out_of_range_font_size_is_rejected() {
        let app = build_app(FontSource::Builtin);

        let resp = app
            .oneshot(json_request(
                "PUT",
                "/quote/header",
                r#"{
                    "title": "Q",
                    "company": "C",
                    "tax_id": "T",
                    "phone": "P",
                    "email": "E",
                    "date": "2026-08-27",
                    "tax_mode": "tax_included",
                    "title_size": 99
                }"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
