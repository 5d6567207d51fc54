//! Axum route handlers for the Refinement API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::content::{classify, extract_upload, Modality};
use crate::errors::AppError;
use crate::refinement::aggregator::aggregate;
use crate::refinement::models::RefineOutcome;
use crate::refinement::pipeline::run_refinement;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

/// The multipart form as received. Lives for one request only.
#[derive(Debug, Default)]
pub struct RawInput {
    pub text: String,
    pub file: Option<Upload>,
}

async fn read_raw_input(mut multipart: Multipart, max_bytes: usize) -> Result<RawInput, AppError> {
    let multipart_err = move |e: MultipartError| AppError::from_multipart(e, max_bytes);
    let mut input = RawInput::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("text") => input.text = field.text().await.map_err(multipart_err)?,
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(multipart_err)?;
                // Browsers send an empty part when no file was chosen
                if !filename.is_empty() || !bytes.is_empty() {
                    input.file = Some(Upload { filename, bytes });
                }
            }
            other => debug!("Ignoring unknown form field {:?}", other),
        }
    }

    Ok(input)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /refine
///
/// Multipart form: `text` (optional) and `file` (optional image/PDF/DOCX).
/// Always 200 for a well-formed request; the body is either the refined
/// record or `{"status": "rejected", "reason": ...}`.
pub async fn handle_refine(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RefineOutcome>, AppError> {
    let span = info_span!("refine", request_id = %Uuid::new_v4());

    async move {
        let raw = read_raw_input(multipart, state.config.max_upload_bytes).await?;

        let (modality, extracted) = match &raw.file {
            Some(upload) => extract_file(&state, upload).await?,
            None => (None, String::new()),
        };

        let input = aggregate(&raw.text, &extracted, modality);
        info!(
            text = input.flags.text,
            image = input.flags.image,
            document = input.flags.document,
            chars = input.text.len(),
            "Aggregated input"
        );

        let outcome = run_refinement(&input, state.llm.as_ref()).await;
        Ok(Json(outcome))
    }
    .instrument(span)
    .await
}

async fn extract_file(
    state: &AppState,
    upload: &Upload,
) -> Result<(Option<Modality>, String), AppError> {
    let kind = classify(&upload.filename);
    let Some(modality) = kind.modality() else {
        info!("Ignoring upload with unsupported extension: {}", upload.filename);
        return Ok((None, String::new()));
    };

    let text = extract_upload(
        state.extractor.as_ref(),
        kind,
        &upload.bytes,
        state.config.upload_dir.as_ref(),
    )
    .await?;
    debug!("Extracted {} chars from {}", text.len(), upload.filename);

    Ok((Some(modality), text))
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::content::{ContentError, ContentExtractor, FileKind};
    use crate::llm_client::{CompletionClient, LlmError};
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "refiner-test-boundary";

    const ACCEPTED_REPLY: &str = r#"```json
{"product_intent": "Doctor appointment booking app", "target_user": "",
 "core_features": ["Search doctors", "Book slots"], "technical_constraints": [],
 "expected_outputs": []}
```"#;

    struct RecordingModel {
        reply: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionClient for RecordingModel {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    struct FixedExtractor {
        text: &'static str,
        kinds: Mutex<Vec<FileKind>>,
    }

    #[async_trait]
    impl ContentExtractor for FixedExtractor {
        async fn extract(&self, kind: FileKind, path: &Path) -> Result<String, ContentError> {
            assert!(path.exists(), "scratch file must exist during extraction");
            self.kinds.lock().unwrap().push(kind);
            Ok(self.text.to_string())
        }
    }

    struct Harness {
        router: Router,
        model: Arc<RecordingModel>,
        extractor: Arc<FixedExtractor>,
    }

    fn harness(reply: &'static str, extracted: &'static str) -> Harness {
        harness_with_limit(reply, extracted, 1024 * 1024)
    }

    fn harness_with_limit(
        reply: &'static str,
        extracted: &'static str,
        max_upload_bytes: usize,
    ) -> Harness {
        let model = Arc::new(RecordingModel {
            reply,
            prompts: Mutex::new(Vec::new()),
        });
        let extractor = Arc::new(FixedExtractor {
            text: extracted,
            kinds: Mutex::new(Vec::new()),
        });
        let state = AppState {
            llm: model.clone(),
            extractor: extractor.clone(),
            config: Config {
                anthropic_api_key: "test-key".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                max_upload_bytes,
                upload_dir: None,
            },
        };
        Harness {
            router: build_router(state),
            model,
            extractor,
        }
    }

    fn multipart_body(text: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(text) = text {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\n{text}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_refine(router: Router, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/refine")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_text_only_request_accepted() {
        let h = harness(ACCEPTED_REPLY, "");
        let (status, body) =
            post_refine(h.router, multipart_body(Some("i want docter app"), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product_intent"], "Doctor appointment booking app");
        assert_eq!(body["target_user"], "Not specified");
        assert_eq!(body["input_sources"]["text"], true);
        assert_eq!(body["input_sources"]["image"], false);
        assert_eq!(body["assumptions"][0], "Target user assumed as general users");
        assert_eq!(body["missing_information"][0], "Expected outputs not specified");
        assert_eq!(body["confidence_score"], 0.7);
        assert!(body["refined_prompt"]
            .as_str()
            .unwrap()
            .contains("- Book slots"));
        assert!(body.get("status").is_none());
        assert!(h.extractor.kinds.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_jpg_upload_sets_image_flag_even_without_text() {
        let h = harness(ACCEPTED_REPLY, "");
        let (_, body) = post_refine(
            h.router,
            multipart_body(Some("booking app"), Some(("mockup.jpg", b"\xff\xd8\xff"))),
        )
        .await;

        assert_eq!(body["input_sources"]["image"], true);
        assert_eq!(body["input_sources"]["document"], false);
        assert_eq!(
            *h.extractor.kinds.lock().unwrap(),
            vec![FileKind::Image("image/jpeg")]
        );
    }

    #[tokio::test]
    async fn test_extracted_text_follows_manual_text() {
        let h = harness(ACCEPTED_REPLY, "Book Now  Find a Doctor");
        post_refine(
            h.router,
            multipart_body(Some("clinic app"), Some(("brief.pdf", b"%PDF-1.4"))),
        )
        .await;

        let prompts = h.model.prompts.lock().unwrap();
        assert!(prompts[0].contains("clinic app\nBook Now  Find a Doctor"));
    }

    #[tokio::test]
    async fn test_docx_upload_sets_document_flag() {
        let h = harness(ACCEPTED_REPLY, "Requirements");
        let (_, body) =
            post_refine(h.router, multipart_body(None, Some(("spec.docx", b"PK\x03\x04")))).await;

        assert_eq!(body["input_sources"]["document"], true);
        assert_eq!(body["input_sources"]["image"], false);
        assert_eq!(body["input_sources"]["text"], false);
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_ignored() {
        let h = harness(ACCEPTED_REPLY, "never used");
        let (_, body) = post_refine(
            h.router,
            multipart_body(Some("idea"), Some(("notes.txt", b"secret plans"))),
        )
        .await;

        assert!(h.extractor.kinds.lock().unwrap().is_empty());
        assert_eq!(body["input_sources"]["document"], false);
        assert_eq!(body["input_sources"]["image"], false);
        let prompts = h.model.prompts.lock().unwrap();
        assert!(!prompts[0].contains("secret plans"));
    }

    #[tokio::test]
    async fn test_model_rejection_is_200_rejection() {
        let h = harness(r#"{"status":"rejected","reason":"No product intent"}"#, "");
        let (status, body) = post_refine(h.router, multipart_body(Some("lorem"), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"status": "rejected", "reason": "No product intent"})
        );
    }

    #[tokio::test]
    async fn test_validation_failure_is_rejection() {
        let h = harness(r#"{"product_intent": "Chat app", "core_features": []}"#, "");
        let (_, body) = post_refine(h.router, multipart_body(Some("chat"), None)).await;

        assert_eq!(body["status"], "rejected");
        assert_eq!(body["reason"], "No features specified");
    }

    #[tokio::test]
    async fn test_empty_form_rejected_without_model_call() {
        let h = harness(ACCEPTED_REPLY, "");
        let (status, body) = post_refine(h.router, multipart_body(None, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reason"], "No input provided");
        assert!(h.model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_413_with_limit_message() {
        let h = harness_with_limit(ACCEPTED_REPLY, "", 256);
        let big_file = vec![b'x'; 4096];
        let (status, body) = post_refine(
            h.router,
            multipart_body(Some("idea"), Some(("brief.pdf", big_file.as_slice()))),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(body["error"]["message"], "Upload exceeds the 256-byte limit");
        assert!(h.model.prompts.lock().unwrap().is_empty());
        assert!(h.extractor.kinds.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_client_error() {
        let h = harness(ACCEPTED_REPLY, "");
        let request = Request::builder()
            .method("POST")
            .uri("/refine")
            .header("content-type", "application/json")
            .body(Body::from("{\"text\": \"idea\"}"))
            .unwrap();
        let response = h.router.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let h = harness(ACCEPTED_REPLY, "");
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = h.router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
