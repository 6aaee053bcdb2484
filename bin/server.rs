// Meal Arena - REST API server

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use meal_arena::{catalog, leaderboard, ArenaError, BattleArena, Difficulty, SortKey, SqliteStore};

/// Shared application state: store and arena behind one lock so catalog
/// writes, staging, and battles serialize.
#[derive(Clone)]
struct AppState {
    inner: Arc<Mutex<ArenaState>>,
}

struct ArenaState {
    store: SqliteStore,
    arena: BattleArena,
}

fn success(mut body: serde_json::Value) -> Json<serde_json::Value> {
    body["status"] = json!("success");
    Json(body)
}

fn failure(err: ArenaError) -> Response {
    let code = match &err {
        ArenaError::NotFound(_) => StatusCode::NOT_FOUND,
        ArenaError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        code,
        Json(json!({ "status": "error", "error": err.to_string() })),
    )
        .into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

#[derive(Deserialize)]
struct CreateMealRequest {
    meal: String,
    cuisine: String,
    price: f64,
    difficulty: String,
}

#[derive(Deserialize)]
struct PrepCombatantRequest {
    meal: String,
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    #[serde(default = "default_sort")]
    sort: String,
}

fn default_sort() -> String {
    "wins".to_string()
}

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// POST /api/create-meal
async fn create_meal_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateMealRequest>,
) -> Response {
    let difficulty = match req.difficulty.parse::<Difficulty>() {
        Ok(difficulty) => difficulty,
        Err(err) => return failure(err),
    };

    let mut guard = state.inner.lock().unwrap();
    match catalog::create_meal(&mut guard.store, &req.meal, &req.cuisine, req.price, difficulty) {
        Ok(meal) => (
            StatusCode::CREATED,
            success(json!({ "meal": meal })),
        )
            .into_response(),
        Err(err) => failure(err),
    }
}

/// DELETE /api/delete-meal/:id
async fn delete_meal_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let mut guard = state.inner.lock().unwrap();
    match catalog::delete_meal(&mut guard.store, id) {
        Ok(()) => success(json!({ "deleted": id })).into_response(),
        Err(err) => failure(err),
    }
}

/// GET /api/get-meal-by-id/:id
async fn get_meal_by_id_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let guard = state.inner.lock().unwrap();
    match catalog::get_meal_by_id(&guard.store, id) {
        Ok(meal) => success(json!({ "meal": meal })).into_response(),
        Err(err) => failure(err),
    }
}

/// GET /api/get-meal-by-name/:name
async fn get_meal_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    let guard = state.inner.lock().unwrap();
    match catalog::get_meal_by_name(&guard.store, &name) {
        Ok(meal) => success(json!({ "meal": meal })).into_response(),
        Err(err) => failure(err),
    }
}

/// DELETE /api/clear-meals
async fn clear_meals_handler(State(state): State<AppState>) -> Response {
    let mut guard = state.inner.lock().unwrap();
    let ArenaState { store, arena } = &mut *guard;
    match catalog::clear_meals(store) {
        Ok(()) => {
            // staged ids point at nothing once the catalog is gone
            arena.clear_combatants();
            success(json!({})).into_response()
        }
        Err(err) => failure(err),
    }
}

/// POST /api/prep-combatant (stages by name, matching the public API shape)
async fn prep_combatant_handler(
    State(state): State<AppState>,
    Json(req): Json<PrepCombatantRequest>,
) -> Response {
    let mut guard = state.inner.lock().unwrap();
    let ArenaState { store, arena } = &mut *guard;

    let meal = match catalog::get_meal_by_name(store, &req.meal) {
        Ok(meal) => meal,
        Err(err) => return failure(err),
    };

    match arena.prep_combatant(store, meal.id) {
        Ok(staged) => success(json!({ "combatant": staged })).into_response(),
        Err(err) => failure(err),
    }
}

/// GET /api/get-combatants
async fn get_combatants_handler(State(state): State<AppState>) -> Response {
    let guard = state.inner.lock().unwrap();
    match guard.arena.combatants(&guard.store) {
        Ok(combatants) => success(json!({ "combatants": combatants })).into_response(),
        Err(err) => failure(err),
    }
}

/// POST /api/clear-combatants
async fn clear_combatants_handler(State(state): State<AppState>) -> Response {
    let mut guard = state.inner.lock().unwrap();
    guard.arena.clear_combatants();
    success(json!({})).into_response()
}

/// GET /api/battle
async fn battle_handler(State(state): State<AppState>) -> Response {
    let mut guard = state.inner.lock().unwrap();
    let ArenaState { store, arena } = &mut *guard;

    let mut rng = rand::thread_rng();
    match arena.battle(store, &mut rng) {
        Ok(outcome) => success(json!({
            "winner": outcome.winner.name,
            "loser": outcome.loser.name,
            "winner_score": outcome.winner_score,
            "loser_score": outcome.loser_score,
            "win_probability": outcome.win_probability,
            "fought_at": outcome.fought_at,
        }))
        .into_response(),
        Err(err) => failure(err),
    }
}

/// GET /api/leaderboard?sort=wins|win_ratio|battles_fought
async fn leaderboard_handler(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Response {
    let key = match query.sort.parse::<SortKey>() {
        Ok(key) => key,
        Err(err) => return failure(err),
    };

    let guard = state.inner.lock().unwrap();
    match leaderboard::rank(&guard.store, key) {
        Ok(entries) => success(json!({ "leaderboard": entries })).into_response(),
        Err(err) => failure(err),
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let db_path =
        std::env::var("MEAL_ARENA_DB").unwrap_or_else(|_| "meal_arena.db".to_string());
    let store = SqliteStore::open(&db_path).expect("Failed to open database");
    println!("✓ Database opened: {}", db_path);

    let state = AppState {
        inner: Arc::new(Mutex::new(ArenaState {
            store,
            arena: BattleArena::new(),
        })),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/create-meal", post(create_meal_handler))
        .route("/delete-meal/:id", delete(delete_meal_handler))
        .route("/get-meal-by-id/:id", get(get_meal_by_id_handler))
        .route("/get-meal-by-name/:name", get(get_meal_by_name_handler))
        .route("/clear-meals", delete(clear_meals_handler))
        .route("/prep-combatant", post(prep_combatant_handler))
        .route("/get-combatants", get(get_combatants_handler))
        .route("/clear-combatants", post(clear_combatants_handler))
        .route("/battle", get(battle_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("🚀 Server running on http://localhost:3000");
    println!("   Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
