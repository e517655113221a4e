use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use ewaste_ai::{Classifier, ClassifyError, ImageTensor, UnavailableClassifier};
use ewaste_api::app::{build_app, services::AppServices};
use ewaste_core::{KnowledgeBase, LabelIndex};
use ewaste_infra::{AppConfig, Assets};
use image::{ImageFormat, Rgb, RgbImage};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

/// Scores in class-index order: 0 = battery, 5 = pcb.
struct FixedScores(Vec<f32>);

impl Classifier for FixedScores {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, _input: &ImageTensor) -> Result<Vec<f32>, ClassifyError> {
        Ok(self.0.clone())
    }
}

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(classifier: Arc<dyn Classifier>) -> Self {
        Self::spawn_with(classifier, AppConfig::default()).await
    }

    async fn spawn_with(classifier: Arc<dyn Classifier>, config: AppConfig) -> Self {
        let config = AppConfig {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data")),
            ..config
        };
        let kb = KnowledgeBase::load(config.rules_path()).expect("shipped rules load");
        let labels = LabelIndex::load(config.class_index_path()).expect("shipped labels load");
        let assets = Assets::new(kb, labels, classifier);

        // Same router as prod, bound to an ephemeral port.
        let app = build_app(AppServices::new(&assets, &config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn confident_battery() -> Self {
        let mut scores = vec![0.01; 10];
        scores[0] = 0.91;
        Self::spawn(Arc::new(FixedScores(scores))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn analyze(&self, form: Form) -> (StatusCode, Value) {
        let res = self
            .client
            .post(self.url("/analyze"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn chat(&self, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(self.url("/chat"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn png() -> Vec<u8> {
    let img = RgbImage::from_pixel(32, 24, Rgb([40, 160, 90]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn image_form(bytes: Vec<u8>) -> Form {
    Form::new().part(
        "image",
        Part::bytes(bytes)
            .file_name("item.png")
            .mime_str("image/png")
            .unwrap(),
    )
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::confident_battery().await;
    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn analyze_returns_full_contract() {
    let server = TestServer::confident_battery().await;
    let (status, body) = server.analyze(image_form(png())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_class"], "battery");
    assert_eq!(body["product_name"], "Battery");
    assert_eq!(body["category"], "Hazardous");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((confidence - 0.91).abs() < 1e-6);
    assert_eq!(body["disposal_steps"].as_array().unwrap().len(), 4);
    assert!(body["hazards"].as_str().unwrap().contains("leak acid"));
    assert!(body["tips"].as_str().unwrap().contains("drop-off"));
    assert_eq!(
        body["nearest_recycling_link"],
        "https://www.google.com/maps/search/?api=1&query=Battery%20recycling%20centre%20near%20me"
    );
}

#[tokio::test]
async fn analyze_with_coordinates_links_to_location() {
    let server = TestServer::confident_battery().await;
    let form = image_form(png()).text("lat", "12.97").text("lng", "77.59");
    let (status, body) = server.analyze(form).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["nearest_recycling_link"],
        "https://www.google.com/maps/search/e-waste+recycling+centre/@12.97,77.59,14z"
    );
}

#[tokio::test]
async fn unparsable_coordinates_are_ignored() {
    let server = TestServer::confident_battery().await;
    let form = image_form(png()).text("lat", "north").text("lng", "77.59");
    let (status, body) = server.analyze(form).await;

    assert_eq!(status, StatusCode::OK);
    assert!(
        body["nearest_recycling_link"]
            .as_str()
            .unwrap()
            .contains("query=Battery")
    );
}

#[tokio::test]
async fn analyze_without_image_is_bad_request() {
    let server = TestServer::confident_battery().await;
    let (status, body) = server.analyze(Form::new().text("lat", "1.0")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "missing_image");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn analyze_with_empty_image_is_bad_request() {
    let server = TestServer::confident_battery().await;
    let (status, body) = server.analyze(image_form(Vec::new())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "missing_image");
}

#[tokio::test]
async fn upload_over_the_body_limit_is_rejected() {
    let mut scores = vec![0.01; 10];
    scores[0] = 0.91;
    let config = AppConfig {
        max_upload_bytes: 1024,
        ..AppConfig::default()
    };
    let server = TestServer::spawn_with(Arc::new(FixedScores(scores)), config).await;

    let (status, body) = server.analyze(image_form(vec![7u8; 50 * 1024])).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["kind"], "invalid_multipart");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn non_multipart_body_is_missing_image() {
    let server = TestServer::confident_battery().await;
    let res = server
        .client
        .post(server.url("/analyze"))
        .header("content-type", "text/plain")
        .body("just some text")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "missing_image");
}

#[tokio::test]
async fn chat_greets_by_name_without_a_known_class() {
    let server = TestServer::confident_battery().await;
    let (status, body) = server
        .chat(json!({ "message": "hello", "last_class": null, "last_name": "Battery" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().unwrap().contains("<b>Battery</b>"));
}

#[tokio::test]
async fn undecodable_image_is_unprocessable() {
    let server = TestServer::confident_battery().await;
    let (status, body) = server.analyze(image_form(b"definitely not a png".to_vec())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_image");
}

#[tokio::test]
async fn missing_model_is_service_unavailable_but_chat_works() {
    let server = TestServer::spawn(Arc::new(UnavailableClassifier::new("model not found"))).await;

    let (status, body) = server.analyze(image_form(png())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "classifier_unavailable");

    let (status, body) = server.chat(json!({ "message": "hello" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].is_string());
}

#[tokio::test]
async fn low_confidence_returns_generic_guidance() {
    let server = TestServer::spawn(Arc::new(FixedScores(vec![0.1; 10]))).await;
    let (status, body) = server.analyze(image_form(png())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_class"], "battery");
    assert_eq!(body["product_name"], "Uncertain item");
    assert_eq!(body["category"], "Possibly E-waste");
}

#[tokio::test]
async fn repeated_uploads_get_identical_responses() {
    let server = TestServer::confident_battery().await;
    let bytes = png();
    let (_, first) = server.analyze(image_form(bytes.clone())).await;
    let (_, second) = server.analyze(image_form(bytes)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn chat_without_context_asks_for_a_photo() {
    let server = TestServer::confident_battery().await;
    let (status, body) = server
        .chat(json!({ "message": "how do I dispose of this?" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().unwrap().contains("upload a photo"));
}

#[tokio::test]
async fn chat_uses_last_classification() {
    let server = TestServer::confident_battery().await;
    let (status, body) = server
        .chat(json!({
            "message": "Is it dangerous? What are the hazards?",
            "last_class": "battery",
            "last_name": "Battery"
        }))
        .await;

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("<b>Battery</b>"));
    assert!(reply.contains("leak acid"));
}

#[tokio::test]
async fn chat_escapes_client_supplied_name() {
    let server = TestServer::confident_battery().await;
    let (_, body) = server
        .chat(json!({
            "message": "what are the hazards",
            "last_class": "battery",
            "last_name": "<script>x</script>"
        }))
        .await;

    let reply = body["reply"].as_str().unwrap();
    assert!(!reply.contains("<script>"));
    assert!(reply.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn blank_chat_message_is_rejected() {
    let server = TestServer::confident_battery().await;
    for body in [json!({ "message": "   " }), json!({})] {
        let (status, body) = server.chat(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "empty_message");
    }
}

#[tokio::test]
async fn malformed_chat_body_is_rejected() {
    let server = TestServer::confident_battery().await;
    let res = server
        .client
        .post(server.url("/chat"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_body");
}
