//! Integration test — build the router against mock LLM and rate upstreams
//! and drive it with `oneshot`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use asesor_api::config::ApiConfig;
use asesor_api::services::chat::{APOLOGY, ChatService, GREETING};
use asesor_api::{AppState, router};
use asesor_core::llm::{CompletionClient, LlmConfig};
use asesor_core::profile::ProfileSource;
use asesor_core::rates::{RateService, RateSettings};
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Captured request bodies plus the canned reply of the mock LLM.
#[derive(Clone)]
struct MockLlm {
    reply: Option<&'static str>,
    seen: Arc<Mutex<Vec<Value>>>,
}

async fn completions(
    State(mock): State<MockLlm>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    mock.seen.lock().unwrap().push(body);
    match mock.reply {
        Some(text) => Ok(Json(json!({
            "id": "chatcmpl-test",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": text } }]
        }))),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock upstream");
    });
    format!("http://{addr}")
}

struct Harness {
    app: Router,
    seen: Arc<Mutex<Vec<Value>>>,
}

struct Options {
    reply: Option<&'static str>,
    api_key: Option<&'static str>,
    with_rate_source: bool,
    profile: ProfileSource,
    config: ApiConfig,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            reply: Some("¡Hola! Con gusto le ayudo."),
            api_key: Some("gsk-test"),
            with_rate_source: false,
            profile: ProfileSource::default(),
            config: ApiConfig::default(),
        }
    }
}

async fn harness(opts: Options) -> Harness {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let llm_base = spawn(
        Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(MockLlm {
                reply: opts.reply,
                seen: seen.clone(),
            }),
    )
    .await;

    let sources = if opts.with_rate_source {
        let base = spawn(Router::new().route(
            "/oficial",
            get(|| async { Json(json!({ "fuente": "oficial", "promedio": 36.71 })) }),
        ))
        .await;
        vec![format!("{base}/oficial")]
    } else {
        vec![]
    };

    let rates = RateService::new(RateSettings {
        sources,
        ttl: Duration::from_secs(300),
        fallback: 54.5,
        request_timeout: Duration::from_secs(2),
    })
    .unwrap();
    let llm = CompletionClient::new(LlmConfig {
        api_key: opts.api_key.map(str::to_string),
        api_base: format!("{llm_base}/v1"),
        ..LlmConfig::default()
    })
    .unwrap();

    let state = AppState::new(opts.config, ChatService::new(rates, llm, opts.profile));
    Harness {
        app: router(state),
        seen,
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&body).expect("parse JSON");
    (status, json)
}

fn post_chat(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn chat_forwards_prompt_with_live_rate_and_flags_cta() {
    let h = harness(Options {
        reply: Some(
            "Son $450, aproximadamente 16.519,50 Bs. Para concretar el pago, haga clic en el botón de WhatsApp que aparecerá abajo.",
        ),
        with_rate_source: true,
        ..Options::default()
    })
    .await;

    let body = json!({
        "mensaje": "¿Cuánto cuesta el Smart TV?",
        "historial": [
            { "role": "user", "content": "Hola" },
            { "role": "assistant", "content": "¡Hola! Soy Javier." }
        ]
    });
    let (status, json) = send(&h.app, post_chat(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["respuesta"].as_str().unwrap().starts_with("Son $450"));
    assert_eq!(json["mostrar_whatsapp"], true);
    assert_eq!(json["whatsapp_url"], "https://wa.me/584140000000");

    let seen = h.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let sent = &seen[0];
    assert_eq!(sent["model"], "llama-3.3-70b-versatile");
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    let system = messages[0]["content"].as_str().unwrap();
    assert!(system.contains("La tasa oficial BCV de hoy es: 36,71 Bs/USD."));
    assert!(system.contains("Smart TV 55\" Samsung: $450"));
    assert_eq!(messages[3]["content"], "¿Cuánto cuesta el Smart TV?");
}

#[tokio::test]
async fn english_field_names_are_accepted() {
    let h = harness(Options::default()).await;
    let body = json!({ "message": "hola", "history": [] });
    let (status, json) = send(&h.app, post_chat(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["respuesta"], "¡Hola! Con gusto le ayudo.");
    assert_eq!(json["mostrar_whatsapp"], false);
}

#[tokio::test]
async fn price_answer_with_disclaimer_keeps_button_hidden() {
    let h = harness(Options {
        reply: Some(
            "La Licuadora Oster cuesta $65, que equivalen aproximadamente a 3.542,50 Bs. \
             Los precios publicados son base. El monto exacto con IVA y céntimos se confirma \
             en su presupuesto formal al finalizar la compra.",
        ),
        ..Options::default()
    })
    .await;
    let body = json!({ "mensaje": "¿Cuánto cuesta la licuadora?" });
    let (status, json) = send(&h.app, post_chat(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mostrar_whatsapp"], false);
}

#[tokio::test]
async fn upstream_failure_becomes_apology() {
    let h = harness(Options {
        reply: None,
        ..Options::default()
    })
    .await;
    let (status, json) = send(&h.app, post_chat(json!({ "mensaje": "hola" }).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["respuesta"], APOLOGY);
    assert_eq!(json["mostrar_whatsapp"], true);
}

#[tokio::test]
async fn missing_api_key_becomes_apology_without_calling_upstream() {
    let h = harness(Options {
        api_key: None,
        ..Options::default()
    })
    .await;
    let (status, json) = send(&h.app, post_chat(json!({ "mensaje": "hola" }).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["respuesta"], APOLOGY);
    assert!(h.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_still_answers_200() {
    let h = harness(Options::default()).await;
    let (status, json) = send(&h.app, post_chat("{not json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["respuesta"], APOLOGY);
    assert_eq!(json["mostrar_whatsapp"], true);
}

#[tokio::test]
async fn empty_message_gets_greeting_without_llm_call() {
    let h = harness(Options::default()).await;
    let (status, json) = send(&h.app, post_chat(json!({ "mensaje": "   " }).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["respuesta"], GREETING);
    assert_eq!(json["mostrar_whatsapp"], false);
    assert!(h.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn broken_profile_file_becomes_apology_on_chat() {
    let h = harness(Options {
        profile: ProfileSource::File(PathBuf::from("/nonexistent/asesor/profile.json")),
        ..Options::default()
    })
    .await;
    let (status, json) = send(&h.app, post_chat(json!({ "mensaje": "hola" }).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["respuesta"], APOLOGY);
    assert!(json.get("whatsapp_url").is_none());
}

#[tokio::test]
async fn home_reports_status_and_fallback_rate() {
    let h = harness(Options::default()).await;
    let (status, json) = send(&h.app, get_req("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Javier activo");
    assert_eq!(json["tasa_actual"], 54.5);
}

#[tokio::test]
async fn health_reports_version() {
    let h = harness(Options::default()).await;
    let (status, json) = send(&h.app, get_req("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], asesor_core::version());
}

#[tokio::test]
async fn config_exposes_store_and_rate() {
    let h = harness(Options {
        profile: ProfileSource::Json(
            r#"{"storeName": "Tienda Sol", "advisorName": "Ana", "products": [{"name": "Ventilador", "priceUsd": 30}]}"#
                .into(),
        ),
        with_rate_source: true,
        ..Options::default()
    })
    .await;
    let (status, json) = send(&h.app, get_req("/config")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["storeName"], "Tienda Sol");
    assert_eq!(json["advisorName"], "Ana");
    assert_eq!(json["products"][0]["priceUsd"], 30.0);
    assert_eq!(json["rate"]["value"], 36.71);
    assert_eq!(json["rate"]["origin"]["kind"], "live");
}

#[tokio::test]
async fn config_with_invalid_profile_is_500() {
    let h = harness(Options {
        profile: ProfileSource::Json(r#"{"advisorName": ""}"#.into()),
        ..Options::default()
    })
    .await;
    let (status, json) = send(&h.app, get_req("/config")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "config_unavailable");
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let h = harness(Options::default()).await;
    let (status, json) = send(&h.app, get_req("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn cors_echoes_only_allowed_origins() {
    let h = harness(Options {
        config: ApiConfig {
            allowed_origins: vec!["https://tienda.example".into()],
            ..ApiConfig::default()
        },
        ..Options::default()
    })
    .await;

    let allowed = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://tienda.example")
        .body(Body::empty())
        .unwrap();
    let resp = h.app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("https://tienda.example")
    );

    let denied = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let resp = h.app.clone().oneshot(denied).await.unwrap();
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
