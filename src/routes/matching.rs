use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use validator::Validate;
use crate::core::Matcher;
use crate::error::{parse_id, MatchError};
use crate::models::{
    ClubRecommendationQuery, ClubRecommendationsResponse, CreateClubRequest, ErrorResponse,
    HealthResponse, LimitQuery, MeetingRecommendationsResponse, NewClub, RecommendationStrategy,
    SimilarUsersResponse,
};
use crate::services::MatchStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub store: Arc<dyn MatchStore>,
    pub default_limit: u16,
    pub max_limit: u16,
}

impl AppState {
    pub fn new(store: Arc<dyn MatchStore>, matcher: Matcher, default_limit: u16, max_limit: u16) -> Self {
        Self {
            matcher,
            store,
            default_limit,
            max_limit,
        }
    }

    /// Requested limit, or the default, capped at `max_limit`
    fn limit(&self, requested: Option<u16>) -> usize {
        let limit = requested.filter(|l| *l > 0).unwrap_or(self.default_limit);
        limit.min(self.max_limit) as usize
    }
}

impl ResponseError for MatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            MatchError::ProfileNotFound(_)
            | MatchError::NoClubsAvailable(_)
            | MatchError::NoSimilarUsers(_) => StatusCode::NOT_FOUND,
            MatchError::NoAnswers(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MatchError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            MatchError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/users/{id}/scores", web::post().to(compute_scores))
        .route("/users/{id}/profile", web::get().to(analyze_profile))
        .route("/users/{id}/similar", web::get().to(similar_users))
        .route("/users/{id}/clubs", web::get().to(recommend_clubs))
        .route("/users/{id}/meetings", web::get().to(recommend_meetings))
        .route("/users/{id}/auto-match", web::post().to(auto_match))
        .route("/users/{id}/auto-match-group", web::post().to(auto_match_group))
        .route("/match-all", web::post().to(match_all))
        .route("/clubs", web::post().to(create_club));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = state.store.health_check().await.unwrap_or(false);
    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recompute and store a user's profile from their survey answers
///
/// POST /api/v1/users/{id}/scores
async fn compute_scores(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let user_id = parse_id(&path)?;
    let profile = state.matcher.compute_scores(user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Personality analysis with suggested clubs, meetings and similar users
///
/// GET /api/v1/users/{id}/profile
async fn analyze_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let user_id = parse_id(&path)?;
    let analysis = state.matcher.analyze(user_id).await?;
    Ok(HttpResponse::Ok().json(analysis))
}

/// GET /api/v1/users/{id}/similar?limit=
async fn similar_users(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, MatchError> {
    let user_id = parse_id(&path)?;
    let limit = state.limit(query.limit);

    let similar_users = state.matcher.find_similar_users(user_id, limit).await?;

    Ok(HttpResponse::Ok().json(SimilarUsersResponse {
        user_id,
        count: similar_users.len(),
        similar_users,
    }))
}

/// GET /api/v1/users/{id}/clubs?strategy=preference|similar_members&limit=
async fn recommend_clubs(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ClubRecommendationQuery>,
) -> Result<HttpResponse, MatchError> {
    let user_id = parse_id(&path)?;
    let limit = state.limit(query.limit);

    let clubs = match query.strategy {
        RecommendationStrategy::Preference => state.matcher.recommend_clubs(user_id, limit).await?,
        RecommendationStrategy::SimilarMembers => {
            state
                .matcher
                .recommend_clubs_by_similar_members(user_id, limit)
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(ClubRecommendationsResponse {
        user_id,
        strategy: query.strategy,
        clubs,
    }))
}

/// GET /api/v1/users/{id}/meetings?limit=
async fn recommend_meetings(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, MatchError> {
    let user_id = parse_id(&path)?;
    let limit = state.limit(query.limit);

    let meetings = state.matcher.recommend_meetings(user_id, limit).await?;

    Ok(HttpResponse::Ok().json(MeetingRecommendationsResponse { user_id, meetings }))
}

/// Join the user to a random selection of recommended clubs
///
/// POST /api/v1/users/{id}/auto-match
async fn auto_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let user_id = parse_id(&path)?;
    let mut rng = StdRng::from_entropy();

    let report = state.matcher.auto_match_single(user_id, &mut rng).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Join the user and a few similar users to a random selection of clubs
///
/// POST /api/v1/users/{id}/auto-match-group
async fn auto_match_group(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let user_id = parse_id(&path)?;
    let mut rng = StdRng::from_entropy();

    let report = state.matcher.auto_match_group(user_id, &mut rng).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Cluster all users and assign each group to a club
///
/// POST /api/v1/match-all
async fn match_all(state: web::Data<AppState>) -> Result<HttpResponse, MatchError> {
    let report = state.matcher.run_global_matching().await?;
    Ok(HttpResponse::Ok().json(report))
}

/// POST /api/v1/clubs
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "vibe": "energetic|cozy|deep|casual|chill",
///   "maxMembers": 12
/// }
/// ```
async fn create_club(
    state: web::Data<AppState>,
    req: web::Json<CreateClubRequest>,
) -> Result<HttpResponse, MatchError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_club request: {:?}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let club = state
        .store
        .create_club(&NewClub::from(req.into_inner()))
        .await?;

    tracing::info!("Created club {} ({})", club.id, club.name);

    Ok(HttpResponse::Created().json(club))
}
