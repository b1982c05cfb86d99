//! HTTP server and request routing
//!
//! hyper http1 over TokioIo, one spawned task per connection. Requests
//! under /api/ are routed to per-group dispatchers that own their own
//! preflight and method handling; everything else is handled here.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};

use crate::auth::JwtValidator;
use crate::config::Args;
use crate::db::schemas::{
    ActivityDoc, AssessmentDoc, HelplineDoc, JournalEntryDoc, QuoteDoc, UserDoc,
    ACTIVITY_COLLECTION, ASSESSMENT_COLLECTION, HELPLINE_COLLECTION, JOURNAL_COLLECTION,
    QUOTE_COLLECTION, USER_COLLECTION,
};
use crate::db::{MongoClient, MongoCollection};
use crate::routes;
use crate::routes::helpers::{cors_preflight, json_response, BoxBody, ErrorResponse};
use crate::types::SteadfastError;

/// State shared by every request handler
pub struct AppState {
    pub args: Args,
    /// JWT validator shared by every authenticated route
    pub jwt: JwtValidator,
    /// MongoDB client, kept for health pings
    pub mongo: MongoClient,
    pub users: MongoCollection<UserDoc>,
    pub journal: MongoCollection<JournalEntryDoc>,
    pub activities: MongoCollection<ActivityDoc>,
    pub assessments: MongoCollection<AssessmentDoc>,
    pub helplines: MongoCollection<HelplineDoc>,
    pub quotes: MongoCollection<QuoteDoc>,
}

impl AppState {
    /// Connect to MongoDB and build the shared application state.
    ///
    /// Fails when the store is unreachable or the JWT secret is missing;
    /// the caller decides whether that is fatal.
    pub async fn init(args: Args) -> Result<Self, SteadfastError> {
        let jwt = args.jwt_validator()?;

        let mongo = MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await?;

        // Typed collections; index creation happens inside collection()
        let users = mongo.collection::<UserDoc>(USER_COLLECTION).await?;
        let journal = mongo
            .collection::<JournalEntryDoc>(JOURNAL_COLLECTION)
            .await?;
        let activities = mongo.collection::<ActivityDoc>(ACTIVITY_COLLECTION).await?;
        let assessments = mongo
            .collection::<AssessmentDoc>(ASSESSMENT_COLLECTION)
            .await?;
        let helplines = mongo.collection::<HelplineDoc>(HELPLINE_COLLECTION).await?;
        let quotes = mongo.collection::<QuoteDoc>(QUOTE_COLLECTION).await?;

        Ok(Self {
            args,
            jwt,
            mongo,
            users,
            journal,
            activities,
            assessments,
            helplines,
            quotes,
        })
    }
}

/// Run the HTTP accept loop until the process is stopped
pub async fn run(state: Arc<AppState>) -> Result<(), SteadfastError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Steadfast listening on {}", state.args.listen);

    if state.args.dev_mode {
        warn!("Development mode enabled - using the built-in JWT secret");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                tokio::spawn(serve_connection(Arc::clone(&state), stream, addr));
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Serve one client connection until it closes
async fn serve_connection(state: Arc<AppState>, stream: TcpStream, addr: SocketAddr) {
    let io = TokioIo::new(stream);

    let service = service_fn(move |req| {
        let state = Arc::clone(&state);
        async move { handle_request(state, addr, req).await }
    });

    if let Err(err) = http1::Builder::new()
        .preserve_header_case(true)
        .title_case_headers(true)
        .serve_connection(io, service)
        .await
    {
        error!("Error serving connection from {}: {:?}", addr, err);
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let path = req.uri().path().to_string();

    info!("{} {} from {}", req.method(), path, addr);

    // The group dispatchers consume the request, so pick the group from
    // the path segment and let that one dispatcher handle it end to end
    if path.starts_with("/api/") {
        let handled = match path.split('/').nth(2) {
            Some("users") => routes::handle_user_request(req, Arc::clone(&state)).await,
            Some("journal") => routes::handle_journal_request(req, Arc::clone(&state)).await,
            Some("dashboard") => routes::handle_dashboard_request(req, Arc::clone(&state)).await,
            Some("activity") => routes::handle_activity_request(req, Arc::clone(&state)).await,
            Some("assessment") => routes::handle_assessment_request(req, Arc::clone(&state)).await,
            Some("resources") => routes::handle_resources_request(req, Arc::clone(&state)).await,
            _ => None,
        };

        return Ok(handled.unwrap_or_else(|| not_found(&path)));
    }

    let response = match (req.method(), path.as_str()) {
        (&Method::GET, "/health") | (&Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state)).await
        }

        (&Method::GET, "/version") => routes::version_info(),

        (&Method::OPTIONS, _) => cors_preflight(),

        _ => not_found(&path),
    };

    Ok(response)
}

fn not_found(path: &str) -> Response<BoxBody> {
    json_response(
        StatusCode::NOT_FOUND,
        &ErrorResponse::new(format!("No route for {}", path), "NOT_FOUND"),
    )
}
