use rocket::http::ContentType;
use rocket::response::Redirect;
use rocket::State;

use crate::context::AppContext;
use crate::error::Result;
use crate::feed::AtomFeed;
use crate::model::AuthorId;

#[rocket::get("/id/<author_id>")]
pub async fn feed_by_id(author_id: AuthorId, context: &State<AppContext>) -> Result<(ContentType, String)> {
    let feed = context.renderer.render(author_id).await?;
    let (top, sub) = AtomFeed::MEDIA_TYPE;
    Ok((ContentType::new(top, sub), AtomFeed::new(&feed).to_xml()?))
}

#[rocket::get("/name/<handle>")]
pub async fn feed_by_name(handle: &str, context: &State<AppContext>) -> Result<Redirect> {
    let author_id = context.membership.resolve_author_id(handle).await?;
    Ok(Redirect::found(context.urls.feed(author_id)))
}
