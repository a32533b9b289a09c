//! `conduitd` — the Conduit demo binary.
//!
//! Usage:
//!   conduitd [--listen <addr>]
//!
//! Starts the in-memory API server with seed data, then replays a short
//! scripted session through the state layer, logging every state change.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use conduit_client::{ConduitClient, UserUpdate};
use conduit_flux::Flux;

use conduit_app::handlers::{register_handlers, ConduitContext};
use conduit_app::request::*;
use conduit_app::server::jwt::JwtService;
use conduit_app::server::routes::{api_router, ServerStateInner};
use conduit_app::server::store::ConduitStore;
use conduit_app::session::MemorySession;
use conduit_app::state::{ArticleListState, ListTab, TagsState};

/// Conduit demo server.
#[derive(Parser, Debug)]
#[command(name = "conduitd", about = "Conduit demo server")]
struct Cli {
    /// Listen address.
    #[arg(long = "listen", default_value = "127.0.0.1:3000")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let state = Arc::new(ServerStateInner {
        store: ConduitStore::new(),
        jwt: JwtService::demo(),
    });
    seed_data(&state.store)?;

    let app = api_router(state);
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    let addr = listener.local_addr()?;
    info!("Conduit API listening on http://{}/api", addr);

    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    run_demo(&format!("http://{}/api", addr)).await;

    info!("Demo finished; the API stays up until Ctrl-C.");
    server.await??;
    Ok(())
}

// ── Seed data ──

fn seed_data(store: &ConduitStore) -> anyhow::Result<()> {
    // ── Users ──
    let users = vec![
        ("alice", "Writes about practical Rust. Maintains a parser generator nobody asked for."),
        ("bob", "Backend engineer. Strong opinions about databases, loosely held."),
        ("carol", "Learning in public. Expect beginner questions."),
    ];
    for &(username, bio) in &users {
        store.register(
            username,
            &format!("{}@conduit.dev", username),
            &format!("{}-pass", username),
        )?;
        store.update_user(
            username,
            &UserUpdate {
                bio: Some(bio.to_string()),
                ..UserUpdate::default()
            },
        )?;
    }

    // ── Articles (insertion order is publication order) ──
    let articles: Vec<(&str, &str, &str, &str, &[&str])> = vec![
        (
            "alice",
            "Error handling without the boilerplate",
            "thiserror for libraries, anyhow for binaries",
            "Start from the caller: what can they actually do about the failure? \
             Model that, and the error enum writes itself.",
            &["rust", "patterns"],
        ),
        (
            "bob",
            "Postgres indexes you are probably missing",
            "Partial and covering indexes in practice",
            "EXPLAIN ANALYZE does not lie. If the planner ignores your index, \
             the index is wrong, not the planner.",
            &["databases", "tooling"],
        ),
        (
            "alice",
            "Borrow checker myths",
            "The compiler is not fighting you",
            "Every lifetime error I have ever hit was the compiler catching a \
             bug I was about to ship.",
            &["rust", "beginners"],
        ),
        (
            "carol",
            "My first month with Rust",
            "Notes from a beginner",
            "Things that confused me, in order: modules, strings, lifetimes, \
             and why everyone keeps saying it gets better. It does.",
            &["rust", "beginners"],
        ),
        (
            "bob",
            "Connection pools explained",
            "Why your service falls over at 100 rps",
            "A pool of 10 connections and a query that takes 200ms gives you \
             50 requests per second. The math is the whole story.",
            &["databases", "patterns"],
        ),
        (
            "alice",
            "Writing a parser by hand",
            "Recursive descent is enough",
            "One function per grammar rule, a peek method, and a good error \
             type. You do not need a generator for a config format.",
            &["rust", "tooling"],
        ),
    ];
    let mut slugs = Vec::new();
    for &(author, title, description, body, tags) in &articles {
        let tag_list: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        let article = store.create_article(author, title, description, body, &tag_list)?;
        slugs.push(article.slug);
    }

    // ── Follows ──
    let follows = vec![
        ("bob", "alice"),
        ("carol", "alice"),
        ("carol", "bob"),
        ("alice", "carol"),
    ];
    for &(follower, followee) in &follows {
        store.set_following(follower, followee, true)?;
    }

    // ── Favorites ──
    let favorites = vec![("bob", 0), ("carol", 0), ("carol", 2), ("alice", 3)];
    for &(username, idx) in &favorites {
        store.set_favorited(username, &slugs[idx], true)?;
    }

    // ── Comments ──
    let comments = vec![
        ("bob", 0, "The thiserror/anyhow split finally clicked for me. Thanks!"),
        ("carol", 2, "This is the post I needed three weeks ago."),
        ("alice", 3, "Keep going, the module system clicks around month two."),
    ];
    for &(author, idx, body) in &comments {
        store.add_comment(author, &slugs[idx], body)?;
    }

    info!(
        "Seeded: {} users, {} articles, {} comments, {} follows, {} favorites",
        users.len(),
        articles.len(),
        comments.len(),
        follows.len(),
        favorites.len()
    );
    Ok(())
}

// ── Scripted session ──

/// Drive a short session through the state layer the way a UI would:
/// every mutation below is a request emit, every effect a state change.
async fn run_demo(base_url: &str) {
    let api = Arc::new(ConduitClient::new(base_url));
    let session = Arc::new(MemorySession::new());
    let flux = Flux::new();
    register_handlers(&flux, Arc::new(ConduitContext::new(api, session)));

    flux.subscribe("#", |path, _| info!("state changed: {}", path));

    info!("App start, no stored session:");
    flux.emit(AppLoadReq::PATH, AppLoadReq { token: None }).await;

    info!("Sign up as demo:");
    flux.emit(
        RegisterReq::PATH,
        RegisterReq {
            username: "demo".to_string(),
            email: "demo@conduit.dev".to_string(),
            password: "demo-pass".to_string(),
        },
    )
    .await;
    flux.emit(ClearRedirectReq::PATH, ClearRedirectReq).await;

    info!("Load the tag cloud:");
    flux.emit(LoadTagsReq::PATH, LoadTagsReq).await;
    if let Some(tags) = flux.get_cloned::<TagsState>(TagsState::PATH) {
        info!("Popular tags: {}", tags.tags.join(", "));
    }

    info!("Publish an article through the editor:");
    flux.emit(EditorLoadReq::PATH, EditorLoadReq { slug: None }).await;
    for (field, value) in [
        ("title", "Hello from conduitd"),
        ("description", "A scripted session"),
        ("body", "Every line in this log was driven by a state request."),
    ] {
        flux.emit(
            EditorUpdateReq::PATH,
            EditorUpdateReq {
                field: field.to_string(),
                value: value.to_string(),
            },
        )
        .await;
    }
    flux.emit(
        EditorAddTagReq::PATH,
        EditorAddTagReq {
            tag: "demo".to_string(),
        },
    )
    .await;
    flux.emit(EditorSubmitReq::PATH, EditorSubmitReq).await;
    flux.emit(ClearRedirectReq::PATH, ClearRedirectReq).await;

    info!("Browse the global feed, favorite and discuss the top article:");
    flux.emit(LoadArticlesReq::PATH, LoadArticlesReq { page: None })
        .await;
    if let Some(listing) = flux.get_cloned::<ArticleListState>(ArticleListState::PATH) {
        info!("Global feed: {} articles", listing.articles_count);
        if let Some(top) = listing.articles.first() {
            info!("Top article: \"{}\" by {}", top.title, top.author.username);
            let slug = top.slug.clone();
            flux.emit(FavoriteReq::PATH, FavoriteReq { slug: slug.clone() })
                .await;
            flux.emit(LoadCommentsReq::PATH, LoadCommentsReq { slug: slug.clone() })
                .await;
            flux.emit(
                AddCommentReq::PATH,
                AddCommentReq {
                    slug,
                    body: "Enjoyed this one.".to_string(),
                },
            )
            .await;
        }
    }

    info!("Follow alice, switch to the personal feed:");
    flux.emit(
        FollowReq::PATH,
        FollowReq {
            username: "alice".to_string(),
        },
    )
    .await;
    flux.emit(ChangeTabReq::PATH, ChangeTabReq { tab: ListTab::Feed })
        .await;
    if let Some(listing) = flux.get_cloned::<ArticleListState>(ArticleListState::PATH) {
        info!(
            "Personal feed: {} articles from followed authors",
            listing.articles_count
        );
    }

    info!("Sign out:");
    flux.emit(LogoutReq::PATH, LogoutReq).await;
}
