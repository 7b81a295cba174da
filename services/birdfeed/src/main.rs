#![deny(unsafe_code)]
#![warn(
    clippy::cognitive_complexity,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_link_with_quotes,
    clippy::doc_markdown,
    clippy::empty_line_after_outer_attr,
    clippy::empty_structs_with_brackets,
    clippy::float_cmp,
    clippy::float_cmp_const,
    clippy::float_equality_without_abs,
    keyword_idents,
    clippy::missing_const_for_fn,
    missing_copy_implementations,
    missing_debug_implementations,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::mod_module_files,
    non_ascii_idents,
    noop_method_call,
    clippy::option_if_let_else,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::semicolon_if_nothing_returned,
    clippy::unseparated_literal_suffix,
    clippy::shadow_unrelated,
    clippy::similar_names,
    clippy::suspicious_operation_groupings,
    unused_crate_dependencies,
    unused_extern_crates,
    unused_import_braces,
    clippy::unused_self,
    clippy::use_debug,
    clippy::used_underscore_binding,
    clippy::useless_let_if_seq,
    clippy::wildcard_dependencies,
    clippy::wildcard_imports
)]

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{BirdfeedConfig, StorageBackend};
use crate::context::AppContext;
use crate::notify::WebSubHub;
use crate::storage::{CursorStore, MemoryCursorStore, MemoryRecordStore, RecordStore, SurrealStore};
use crate::upstream::TwitterClient;

mod api;
mod config;
mod context;
mod error;
mod feed;
mod handle;
mod membership;
mod model;
mod notify;
mod scheduler;
mod storage;
mod sync;
mod upstream;

#[cfg(test)]
mod test_util;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("birdfeed=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn init_storage(config: &BirdfeedConfig) -> Result<(Arc<dyn CursorStore>, Arc<dyn RecordStore>)> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, nothing survives a restart");
            Ok((Arc::new(MemoryCursorStore::new()), Arc::new(MemoryRecordStore::new())))
        }
        StorageBackend::Surreal => {
            let database = config
                .database
                .as_ref()
                .context("storage = \"surreal\" needs a [database] section")?;
            let store = SurrealStore::new(database.create_pool()?);
            store.migrate().await?;
            tracing::info!(url = %database.url, ns = %database.ns, db = %database.db, "connected to surrealdb");
            let store = Arc::new(store);
            Ok((store.clone(), store))
        }
    }
}

pub async fn init() -> Result<rocket::Rocket<rocket::Build>> {
    let figment = BirdfeedConfig::figment();
    let config: BirdfeedConfig = figment.extract().context("invalid birdfeed configuration")?;

    let (cursors, records) = init_storage(&config).await?;
    let source = TwitterClient::new(&config.twitter.api_url, config.twitter.credentials.clone())?;
    let hub = WebSubHub::new(&config.hub_publish_url, config.urls())?;
    let context = AppContext::new(&config, Arc::new(source), cursors, records, Arc::new(hub));

    tracing::info!(list = %config.list_name, public_url = %config.public_url, "birdfeed configured");
    Ok(api::build_rocket(figment, context))
}

#[rocket::main]
async fn main() -> Result<()> {
    init_tracing();

    let rocket = init().await?;

    rocket.launch().await?;

    Ok(())
}
