use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::cache::SolveCache;
use crate::config::AppConfig;
use crate::domain::normalize::{NormalizerConfig, ScalingTable};
use crate::domain::solve::solve_placements;
use crate::domain::solver::SolverBackend;
use crate::domain::solver_factory::{create_solver, SolverType};
use crate::error::{PlacementError, Result};
use crate::models::{PlacementOutcome, PlacementRequest};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Creates a fresh backend for a solver name
pub type BackendFactory = Arc<dyn Fn(&str) -> Result<Box<dyn SolverBackend>> + Send + Sync>;

pub struct AppState {
    pub config: AppConfig,
    pub backends: BackendFactory,
    pub cache: SolveCache,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_backends(config, Arc::new(backend_for))
    }

    pub fn with_backends(config: AppConfig, backends: BackendFactory) -> Self {
        let cache = SolveCache::new(config.cache_capacity);
        AppState {
            config,
            backends,
            cache,
        }
    }
}

/// Resolve a solver name to a fresh backend from the factory
pub fn backend_for(name: &str) -> Result<Box<dyn SolverBackend>> {
    SolverType::from_str(name).map(create_solver).ok_or_else(|| {
        PlacementError::Configuration(format!(
            "Unknown solver '{}', available: {}",
            name,
            SolverType::available().join(", ")
        ))
    })
}

/// Register every route on an app or test service
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root_redirect))
        .route("/placements", web::post().to(placements))
        .route("/health", web::get().to(health_check))
        .route("/docs", web::get().to(docs));
}

/// JSON extractor config answering malformed bodies with `400 {"error": ...}`
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _| {
            let err_string = err.to_string();
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({ "error": err_string })),
            )
            .into()
        })
}

pub fn error_response(err: &PlacementError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        PlacementError::MalformedRecord(_)
        | PlacementError::Configuration(_)
        | PlacementError::Capacity(_) => HttpResponse::BadRequest().json(body),
        PlacementError::NoFeasibleAssignment(_) => HttpResponse::UnprocessableEntity().json(body),
        PlacementError::ModelExtraction(_) | PlacementError::Backend(_) | PlacementError::Io(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn authorized(state: &AppState, http: &HttpRequest) -> bool {
    match &state.config.api_key {
        None => true,
        Some(expected) => http
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|provided| provided == expected)
            .unwrap_or(false),
    }
}

fn run_request(state: &AppState, request: &PlacementRequest) -> Result<PlacementOutcome> {
    let defaults = &state.config.normalizer;
    let normalizer = NormalizerConfig {
        scaling: match &request.scaling {
            Some(multipliers) => ScalingTable::new(multipliers.clone())?,
            None => defaults.scaling.clone(),
        },
        rural_scaling: request.rural_scaling.or(defaults.rural_scaling),
    };
    let solver = request.solver.as_deref().unwrap_or(&state.config.solver);

    let mut backend = (state.backends)(solver)?;
    solve_placements(backend.as_mut(), &request.input, &normalizer)
}

// ---------- Route handlers ----------

/// POST /placements
pub async fn placements(
    state: web::Data<AppState>,
    http: HttpRequest,
    req: web::Json<PlacementRequest>,
) -> impl Responder {
    if !authorized(&state, &http) {
        return HttpResponse::Unauthorized()
            .json(serde_json::json!({ "error": "Missing or invalid API key" }));
    }

    let request = req.into_inner();
    let key = SolveCache::key(&request);
    if let Some(hit) = key.as_deref().and_then(|k| state.cache.get(k)) {
        log::debug!("Serving cached placement result");
        return HttpResponse::Ok().json(hit);
    }

    // Solving blocks, keep it off the async workers
    let worker_state = state.clone();
    let result = web::block(move || run_request(&worker_state, &request)).await;

    match result {
        Ok(Ok(outcome)) => {
            if let Some(key) = key {
                state.cache.put(key, outcome.clone());
            }
            HttpResponse::Ok().json(outcome)
        }
        Ok(Err(err)) => {
            log::warn!("Placement request failed: {}", err);
            error_response(&err)
        }
        Err(err) => error_response(&PlacementError::Backend(err.to_string())),
    }
}

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// GET /docs
pub async fn docs() -> impl Responder {
    let docs_html = include_str!("../static/docs.html");
    HttpResponse::Ok()
        .content_type("text/html")
        .body(docs_html)
}

/// GET / - Redirect to docs
pub async fn root_redirect() -> impl Responder {
    HttpResponse::Found()
        .append_header(("Location", "/docs"))
        .finish()
}
