//! Single binary web server exposing the tournament commands as a REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! PLAYERS_CSV imports a `name,department` roster at boot; RNG_SEED fixes pairing shuffles.

use actix_web::{
    delete, get, patch, post,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fs::File;
use std::sync::Mutex;
use swiss_knockout_web::config::Config;
use swiss_knockout_web::{
    advance_knockout_round, advance_swiss_round, delete_match, import_players, record_result,
    register_player, remove_player, start_knockout, start_swiss, DepartmentId, ErrorKind,
    KnockoutProgress, KnockoutStart, MatchId, MemoryStore, PlayerId, SwissProgress, Tournament,
    TournamentError,
};

/// The one tournament plus the random source used for pairing shuffles.
struct AppState {
    tournament: Tournament<MemoryStore>,
    rng: Mutex<StdRng>,
}

type State = Data<AppState>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    department: DepartmentId,
}

#[derive(Deserialize)]
struct RecordResultBody {
    winner_id: PlayerId,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

/// Map a tournament error to a JSON error response with a matching status.
fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match (e.kind(), &e) {
        (_, TournamentError::MatchNotFound(_) | TournamentError::UnknownPlayer(_)) => {
            HttpResponse::NotFound().json(body)
        }
        (ErrorKind::Precondition | ErrorKind::InvalidInput, _) => {
            HttpResponse::BadRequest().json(body)
        }
        (ErrorKind::Conflict, _) => HttpResponse::Conflict().json(body),
        (ErrorKind::Consistency, _) => {
            log::error!("Consistency fault: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-knockout-web",
    })
}

#[get("/api/players")]
async fn api_list_players(state: State) -> HttpResponse {
    match state.tournament.players() {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(e),
    }
}

#[post("/api/players")]
async fn api_add_player(state: State, body: Json<AddPlayerBody>) -> HttpResponse {
    match register_player(&state.tournament, &body.name, body.department) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(e),
    }
}

/// Import a `name,department` CSV roster sent as the raw request body.
#[post("/api/players/import")]
async fn api_import_players(state: State, body: Bytes) -> HttpResponse {
    match import_players(&state.tournament, body.as_ref()) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(e),
    }
}

#[delete("/api/players/{id}")]
async fn api_remove_player(state: State, path: Path<PlayerPath>) -> HttpResponse {
    match remove_player(&state.tournament, path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

#[get("/api/matches")]
async fn api_list_matches(state: State) -> HttpResponse {
    match state.tournament.matches() {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(e),
    }
}

/// Record or correct a match winner; may generate the next round.
#[patch("/api/matches/{id}")]
async fn api_record_result(
    state: State,
    path: Path<MatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let mut rng = match state.rng.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match record_result(&state.tournament, path.id, body.winner_id, &mut *rng) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(e),
    }
}

/// Delete a match, rolling back its Swiss result.
#[delete("/api/matches/{id}")]
async fn api_delete_match(state: State, path: Path<MatchPath>) -> HttpResponse {
    match delete_match(&state.tournament, path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

/// Reset standings, clear matches, and pair Swiss round 1.
#[post("/api/swiss/start")]
async fn api_start_swiss(state: State) -> HttpResponse {
    let mut rng = match state.rng.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match start_swiss(&state.tournament, &mut *rng) {
        Ok(matches) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Swiss round 1 started",
            "matches": matches,
        })),
        Err(e) => error_response(e),
    }
}

#[post("/api/swiss/next")]
async fn api_next_swiss_round(state: State) -> HttpResponse {
    let mut rng = match state.rng.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = match advance_swiss_round(&state.tournament, &mut *rng) {
        Ok(SwissProgress::Created { round, matches }) => {
            serde_json::json!({ "success": true, "round": round, "matches": matches })
        }
        Ok(SwissProgress::AlreadyExists { round }) => {
            serde_json::json!({ "success": true, "round": round, "message": "Round already exists" })
        }
        Ok(SwissProgress::RoundOpen) => {
            serde_json::json!({ "success": true, "message": "Current Swiss round is not finished" })
        }
        Ok(SwissProgress::StageComplete) => {
            serde_json::json!({ "success": true, "message": "Swiss stage finished" })
        }
        Err(e) => return error_response(e),
    };
    HttpResponse::Ok().json(body)
}

#[post("/api/knockout/start")]
async fn api_start_knockout(state: State) -> HttpResponse {
    let body = match start_knockout(&state.tournament) {
        Ok(KnockoutStart::LastChance {
            bracket_size,
            matches,
        }) => serde_json::json!({
            "success": true,
            "stage": "LAST_CHANCE",
            "bracket_size": bracket_size,
            "matches": matches,
        }),
        Ok(KnockoutStart::Bracket {
            bracket_size,
            matches,
        }) => serde_json::json!({
            "success": true,
            "stage": "KNOCKOUT",
            "bracket_size": bracket_size,
            "matches": matches,
        }),
        Err(e) => return error_response(e),
    };
    HttpResponse::Ok().json(body)
}

#[post("/api/knockout/next")]
async fn api_next_knockout_round(state: State) -> HttpResponse {
    let body = match advance_knockout_round(&state.tournament) {
        Ok(KnockoutProgress::Created { round, matches }) => {
            serde_json::json!({ "success": true, "round": round, "matches": matches })
        }
        Ok(KnockoutProgress::AlreadyExists { round }) => {
            serde_json::json!({ "success": true, "round": round, "message": "Round already exists" })
        }
        Ok(KnockoutProgress::RoundOpen) => {
            serde_json::json!({ "success": true, "message": "Current knockout round is not finished" })
        }
        Ok(KnockoutProgress::NotStarted) => {
            serde_json::json!({ "success": true, "message": "Knockout not started" })
        }
        Ok(KnockoutProgress::Champion(id)) => {
            serde_json::json!({ "success": true, "champion": id })
        }
        Err(e) => return error_response(e),
    };
    HttpResponse::Ok().json(body)
}

#[get("/api/phase")]
async fn api_phase(state: State) -> HttpResponse {
    match state.tournament.current_phase() {
        Ok(phase) => HttpResponse::Ok().json(serde_json::json!({ "phase": phase })),
        Err(e) => error_response(e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let tournament = Tournament::new(MemoryStore::new());

    if let Some(path) = &config.players_csv {
        let file = File::open(path)?;
        match import_players(&tournament, file) {
            Ok(players) => log::info!("Loaded {} players from {}", players.len(), path.display()),
            Err(e) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    e.to_string(),
                ))
            }
        }
    }

    let rng = match config.rng_seed {
        Some(seed) => {
            log::info!("Using fixed pairing seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let state = Data::new(AppState {
        tournament,
        rng: Mutex::new(rng),
    });

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_players)
            .service(api_import_players)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_list_matches)
            .service(api_record_result)
            .service(api_delete_match)
            .service(api_start_swiss)
            .service(api_next_swiss_round)
            .service(api_start_knockout)
            .service(api_next_knockout_round)
            .service(api_phase)
    })
    .bind(bind)?
    .run()
    .await
}
