use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Pixel Quiz Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::content::search,
        crate::routes::content::details,
        crate::routes::quiz::generate_quiz,
        crate::routes::session::start_session,
        crate::routes::session::get_session,
        crate::routes::session::submit_answer,
        crate::routes::session::advance_session,
        crate::routes::session::reset_session,
        crate::routes::session::session_results,
        crate::routes::session::submit_guess,
        crate::routes::session::session_hint,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::content::ContentItem,
            crate::dto::content::MediaType,
            crate::dto::content::Source,
            crate::dto::quiz::QuizRequest,
            crate::dto::session::StartSessionRequest,
            crate::dto::session::AnswerRequest,
            crate::dto::session::AnswerView,
            crate::dto::session::SessionView,
            crate::dto::session::SessionPhaseDto,
            crate::dto::session::QuestionView,
            crate::dto::session::ResultsSummary,
            crate::dto::session::GuessRequest,
            crate::dto::session::GuessView,
            crate::dto::session::HintView,
            crate::quiz::QuizState,
            crate::quiz::QuestionMap,
            crate::quiz::Question,
            crate::quiz::Difficulty,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "content", description = "Content search and detail lookups"),
        (name = "quiz", description = "AI quiz generation"),
        (name = "session", description = "Gameplay session lifecycle"),
    )
)]
pub struct ApiDoc;
