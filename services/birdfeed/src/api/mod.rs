use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use rocket::shield::{NoSniff, Shield};
use rocket::{catch, catchers, get, options, routes, Build, Request, Response, Rocket};

use crate::context::AppContext;
use crate::scheduler;

pub mod add;
pub mod feed;

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ServerVersion {
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorMessageResponse {
    pub error: String,
    pub message: String,
}

struct Cors;

#[get("/robots.txt")]
async fn robots() -> &'static str {
    "# Hello!\n\n# Feeds may be crawled\nUser-agent: *\nAllow: /id/\nDisallow: /add/"
}

#[get("/_health")]
async fn health() -> Json<ServerVersion> {
    Json(ServerVersion {
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

#[catch(default)]
async fn default_catcher(status: Status, _request: &Request<'_>) -> status::Custom<Json<ErrorMessageResponse>> {
    let error = match status.code {
        400 => "BadRequest",
        404 => "NotFound",
        422 => "InvalidRequest",
        500 => "InternalServerError",
        503 => "ServiceUnavailable",
        _ => "Error",
    };
    let message = match status.code {
        500 => "Internal error.".to_string(),
        _ => status.reason().unwrap_or("Unknown error.").to_string(),
    };
    status::Custom(
        status,
        Json(ErrorMessageResponse {
            error: error.to_string(),
            message,
        }),
    )
}

/// Catches all OPTIONS requests so the CORS fairing can answer preflights.
#[options("/<_..>")]
async fn all_options() {}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, POST, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

pub fn build_rocket(figment: Figment, context: AppContext) -> Rocket<Build> {
    let shield = Shield::default().enable(NoSniff::Enable);

    rocket::custom(figment)
        .mount(
            "/",
            routes![
                feed::feed_by_id,
                feed::feed_by_name,
                add::add_by_id,
                add::add_by_id_post,
                add::add_by_name,
                robots,
                health,
                all_options
            ],
        )
        .register("/", catchers![default_catcher])
        .attach(shield)
        .attach(Cors)
        .attach(scheduler::fairing())
        .manage(context)
}
