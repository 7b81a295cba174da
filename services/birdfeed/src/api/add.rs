use rocket::response::Redirect;
use rocket::State;

use crate::context::AppContext;
use crate::error::Result;
use crate::model::AuthorId;

async fn track(author_id: AuthorId, context: &AppContext) -> Result<Redirect> {
    context.membership.track_author(author_id).await?;
    Ok(Redirect::found(context.urls.feed(author_id)))
}

#[rocket::get("/add/id/<author_id>")]
pub async fn add_by_id(author_id: AuthorId, context: &State<AppContext>) -> Result<Redirect> {
    track(author_id, context).await
}

#[rocket::post("/add/id/<author_id>")]
pub async fn add_by_id_post(author_id: AuthorId, context: &State<AppContext>) -> Result<Redirect> {
    track(author_id, context).await
}

#[rocket::get("/add/name/<handle>")]
pub async fn add_by_name(handle: &str, context: &State<AppContext>) -> Result<Redirect> {
    let author_id = context.membership.resolve_author_id(handle).await?;
    Ok(Redirect::found(context.urls.add(author_id)))
}
