use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};

use crate::{
    form::FormSubmission,
    sink::DocumentSink,
    template::{is_generated_name, SkeletonSource},
};

use self::pages::{IndexPage, SuccessPage};

pub mod pages;

#[derive(Clone)]
pub struct AppState {
    pub skeleton: SkeletonSource,
    pub sink: Arc<dyn DocumentSink>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page).post(submit))
        .route("/success/{filename}", get(success_page))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub async fn serve(listen: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("could not bind {listen}"))?;
    tracing::info!(addr = %listener.local_addr()?, "Listening.");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index_page() -> Result<Html<String>, ServeError> {
    let page = IndexPage {
        errors: Vec::new(),
        values: FormSubmission::default(),
    };
    Ok(Html(page.render()?))
}

#[tracing::instrument(level = "debug", skip_all)]
async fn submit(
    State(state): State<AppState>,
    Form(submission): Form<FormSubmission>,
) -> Result<Response, ServeError> {
    let record = match submission.validate() {
        Ok(record) => record,
        Err(errors) => {
            tracing::debug!(?errors, "Submission failed validation.");
            let page = IndexPage {
                errors,
                values: submission,
            };
            return Ok(Html(page.render()?).into_response());
        },
    };

    let skeleton = state.skeleton.get().await?;
    let document = skeleton.materialize(&record);
    state
        .sink
        .store(document.filename(), &document.to_bytes())
        .await
        .context("failed to store generated document")?;

    tracing::info!(filename = %document.filename(), "Generated document stored.");

    Ok(Redirect::to(&format!("/success/{}", document.filename()))
        .into_response())
}

async fn success_page(
    Path(filename): Path<String>,
) -> Result<Response, ServeError> {
    if !is_generated_name(&filename) {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }
    let page = SuccessPage {
        filename: &filename,
    };
    Ok(Html(page.render()?).into_response())
}

/// Internal failures map onto an opaque 500; the cause chain goes to the
/// log, not to the client.
pub struct ServeError(anyhow::Error);

impl<E> From<E> for ServeError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "Request failed.");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sink::LocalDirSink,
        template::Skeleton,
    };

    const TEST_SKELETON: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../assets/arm_template.json"
    ));

    const VALID_FORM: &[(&str, &str)] = &[
        ("app_name", "billing"),
        ("long_app_name", "Billing Service"),
        ("environment", "prod"),
        ("hardware_specs", "high"),
        ("data_classification", "high"),
        ("compliance_pci", "true"),
        ("business_owner", "jane"),
        ("criticality", "high"),
        ("admin_pass", "hunter2"),
    ];

    struct FailingSink;

    #[async_trait::async_trait]
    impl DocumentSink for FailingSink {
        async fn store(&self, _: &str, _: &[u8]) -> anyhow::Result<()> {
            anyhow::bail!("storage unreachable")
        }
    }

    async fn spawn_app(sink: Arc<dyn DocumentSink>) -> SocketAddr {
        let skeleton =
            Arc::new(Skeleton::parse(TEST_SKELETON).expect("parse skeleton"));
        let state = AppState {
            skeleton: SkeletonSource::Cached(skeleton),
            sink,
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.expect("serve app")
        });
        addr
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build client")
    }

    #[tokio::test]
    async fn form_page_renders() {
        let addr = spawn_app(Arc::new(FailingSink)).await;

        let res = client()
            .get(format!("http://{addr}/"))
            .send()
            .await
            .expect("get form page");
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let body = res.text().await.expect("body");
        assert!(body.contains("<form"));
        assert!(body.contains("name=\"app_name\""));
        assert!(body.contains("name=\"compliance_gdpr\""));
    }

    #[tokio::test]
    async fn healthz_responds() {
        let addr = spawn_app(Arc::new(FailingSink)).await;

        let res = client()
            .get(format!("http://{addr}/healthz"))
            .send()
            .await
            .expect("get healthz");
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert_eq!(res.text().await.expect("body"), "ok");
    }

    #[tokio::test]
    async fn submit_stores_document_and_redirects() {
        let dir = tempfile::tempdir().expect("tempdir");
        let addr =
            spawn_app(Arc::new(LocalDirSink::new(dir.path()))).await;

        let res = client()
            .post(format!("http://{addr}/"))
            .form(VALID_FORM)
            .send()
            .await
            .expect("post form");
        assert_eq!(res.status(), reqwest::StatusCode::SEE_OTHER);

        let location = res
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .expect("location header");
        let filename =
            location.strip_prefix("/success/").expect("success redirect");
        assert!(is_generated_name(filename));

        let body =
            tokio::fs::read_to_string(dir.path().join(filename))
                .await
                .expect("stored document");
        let doc: serde_json::Value =
            serde_json::from_str(&body).expect("stored document json");
        assert_eq!(doc["parameters"]["appName"]["value"], "billing");
        assert_eq!(doc["parameters"]["compliancePCI"]["value"], true);
        assert_eq!(doc["parameters"]["complianceGDPR"]["value"], false);
        assert!(!body.contains("hunter2"));

        let res = client()
            .get(format!("http://{addr}{location}"))
            .send()
            .await
            .expect("get success page");
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert!(res.text().await.expect("body").contains(filename));
    }

    #[tokio::test]
    async fn submit_rerenders_on_validation_failure() {
        let addr = spawn_app(Arc::new(FailingSink)).await;

        let res = client()
            .post(format!("http://{addr}/"))
            .form(&[("app_name", "billing"), ("environment", "staging")])
            .send()
            .await
            .expect("post form");
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert!(res.headers().get("location").is_none());

        let body = res.text().await.expect("body");
        assert!(body.contains("Admin password is required."));
        assert!(body.contains("Environment must be one of: dev, prod."));
        // The offending value survives the re-render.
        assert!(body.contains("value=\"billing\""));
    }

    #[tokio::test]
    async fn sink_failure_is_a_500() {
        let addr = spawn_app(Arc::new(FailingSink)).await;

        let res = client()
            .post(format!("http://{addr}/"))
            .form(VALID_FORM)
            .send()
            .await
            .expect("post form");
        assert_eq!(
            res.status(),
            reqwest::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(res.headers().get("location").is_none());
    }

    #[tokio::test]
    async fn success_page_rejects_foreign_names() {
        let addr = spawn_app(Arc::new(FailingSink)).await;

        let res = client()
            .get(format!("http://{addr}/success/notafile.json"))
            .send()
            .await
            .expect("get success page");
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

        let res = client()
            .get(format!(
                "http://{addr}/success/2026_03_01_ARM_0a1b2c3.json"
            ))
            .send()
            .await
            .expect("get success page");
        assert_eq!(res.status(), reqwest::StatusCode::OK);
    }
}
