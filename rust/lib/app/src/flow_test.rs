//! End-to-end flow tests — drive the app purely through `Flux::emit`
//! against a live in-process server, then assert on the state slices.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use conduit_client::{Comment, ConduitClient};
    use conduit_flux::Flux;

    use crate::handlers::{register_handlers, ConduitContext};
    use crate::request::*;
    use crate::server::jwt::JwtService;
    use crate::server::routes::{api_router, ServerStateInner};
    use crate::server::store::ConduitStore;
    use crate::session::{MemorySession, SessionStore};
    use crate::state::*;

    // =====================================================================
    // Test app setup
    // =====================================================================

    struct TestApp {
        flux: Flux,
        session: Arc<MemorySession>,
    }

    async fn start_server() -> String {
        let state = Arc::new(ServerStateInner {
            store: ConduitStore::new(),
            jwt: JwtService::demo(),
        });
        let app = api_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for the server to be ready.
        let probe = ConduitClient::new(&base_url);
        for _ in 0..50 {
            if probe.tags().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        }

        base_url
    }

    /// Wire a fresh Flux instance to an already-running server.
    fn attach_app(base_url: &str) -> TestApp {
        let api = Arc::new(ConduitClient::new(base_url));
        let session = Arc::new(MemorySession::new());
        let flux = Flux::new();
        register_handlers(&flux, Arc::new(ConduitContext::new(api, session.clone())));
        TestApp { flux, session }
    }

    async fn start_app() -> (TestApp, String) {
        let base_url = start_server().await;
        (attach_app(&base_url), base_url)
    }

    fn auth(app: &TestApp) -> AuthState {
        app.flux
            .get_cloned(AuthState::PATH)
            .unwrap_or_else(AuthState::initial)
    }

    fn shell(app: &TestApp) -> AppState {
        app.flux
            .get_cloned(AppState::PATH)
            .unwrap_or_else(AppState::initial)
    }

    fn list(app: &TestApp) -> ArticleListState {
        app.flux
            .get_cloned(ArticleListState::PATH)
            .unwrap_or_else(ArticleListState::initial)
    }

    fn comment_items(app: &TestApp) -> Vec<Comment> {
        app.flux
            .scan(CommentsState::ITEMS)
            .iter()
            .filter_map(|(_, v)| v.downcast_ref::<Comment>().cloned())
            .collect()
    }

    /// Register `username` and clear the post-signup redirect.
    async fn sign_up(app: &TestApp, username: &str) {
        app.flux
            .emit(
                RegisterReq::PATH,
                RegisterReq {
                    username: username.to_string(),
                    email: format!("{}@test.dev", username),
                    password: format!("pw-{}", username),
                },
            )
            .await;
        assert!(auth(app).is_authenticated(), "registration should sign in");
        app.flux.emit(ClearRedirectReq::PATH, ClearRedirectReq).await;
    }

    /// Publish an article through the editor flow, returning its slug.
    async fn publish(app: &TestApp, title: &str, tags: &[&str]) -> String {
        app.flux
            .emit(EditorLoadReq::PATH, EditorLoadReq { slug: None })
            .await;
        for (field, value) in [
            ("title", title),
            ("description", "How it works"),
            ("body", "Body text"),
        ] {
            app.flux
                .emit(
                    EditorUpdateReq::PATH,
                    EditorUpdateReq {
                        field: field.to_string(),
                        value: value.to_string(),
                    },
                )
                .await;
        }
        for tag in tags {
            app.flux
                .emit(EditorAddTagReq::PATH, EditorAddTagReq { tag: tag.to_string() })
                .await;
        }
        app.flux.emit(EditorSubmitReq::PATH, EditorSubmitReq).await;
        app.flux.emit(ClearRedirectReq::PATH, ClearRedirectReq).await;

        let article: ArticleState = app.flux.get_cloned(ArticleState::PATH).unwrap();
        article.article.expect("publish should succeed").slug
    }

    // =====================================================================
    // App load
    // =====================================================================

    #[tokio::test]
    async fn app_load_marks_loaded() {
        let (app, _) = start_app().await;
        assert!(!shell(&app).loaded);

        app.flux
            .emit(AppLoadReq::PATH, AppLoadReq { token: None })
            .await;

        let state = shell(&app);
        assert!(state.loaded);
        assert!(!auth(&app).is_authenticated());
    }

    #[tokio::test]
    async fn app_load_restores_session() {
        let (app, base_url) = start_app().await;
        sign_up(&app, "jake").await;
        let token = app.session.load().await.unwrap();
        assert!(token.is_some(), "signup should persist the token");

        // Fresh process: new Flux, same server, restored token.
        let restored = attach_app(&base_url);
        restored
            .flux
            .emit(AppLoadReq::PATH, AppLoadReq { token })
            .await;

        let state = auth(&restored);
        assert!(state.is_authenticated());
        assert_eq!(state.username().as_deref(), Some("jake"));
        assert!(shell(&restored).loaded);
    }

    #[tokio::test]
    async fn app_load_with_dead_token_stays_anonymous() {
        let (app, _) = start_app().await;

        app.flux
            .emit(
                AppLoadReq::PATH,
                AppLoadReq {
                    token: Some("not.a.jwt".to_string()),
                },
            )
            .await;

        assert!(!auth(&app).is_authenticated());
        assert!(shell(&app).loaded, "a dead token must not block startup");
    }

    // =====================================================================
    // Auth lifecycle
    // =====================================================================

    #[tokio::test]
    async fn register_login_logout_lifecycle() {
        let (app, _) = start_app().await;

        app.flux
            .emit(
                RegisterReq::PATH,
                RegisterReq {
                    username: "jake".to_string(),
                    email: "jake@test.dev".to_string(),
                    password: "jakejake".to_string(),
                },
            )
            .await;

        let state = auth(&app);
        assert_eq!(state.status, RequestStatus::Success);
        assert!(state.is_authenticated());
        assert_eq!(state.username().as_deref(), Some("jake"));
        assert_eq!(shell(&app).redirect_to.as_deref(), Some("/"));
        assert!(app.session.load().await.unwrap().is_some());

        app.flux.emit(ClearRedirectReq::PATH, ClearRedirectReq).await;
        assert_eq!(shell(&app).redirect_to, None);

        app.flux.emit(LogoutReq::PATH, LogoutReq).await;
        let state = auth(&app);
        assert!(!state.is_authenticated());
        assert_eq!(state.status, RequestStatus::Idle);
        assert_eq!(app.session.load().await.unwrap(), None);
        assert_eq!(shell(&app).redirect_to.as_deref(), Some("/"));

        // Same account, fresh login.
        app.flux
            .emit(
                LoginReq::PATH,
                LoginReq {
                    email: "jake@test.dev".to_string(),
                    password: "jakejake".to_string(),
                },
            )
            .await;
        assert!(auth(&app).is_authenticated());
    }

    #[tokio::test]
    async fn login_failure_carries_field_errors() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;
        app.flux.emit(LogoutReq::PATH, LogoutReq).await;

        app.flux
            .emit(
                LoginReq::PATH,
                LoginReq {
                    email: "jake@test.dev".to_string(),
                    password: "wrong".to_string(),
                },
            )
            .await;

        let state = auth(&app);
        assert_eq!(state.status, RequestStatus::Failure);
        assert!(!state.is_authenticated());
        let errors = state.errors.expect("failure should carry errors");
        assert_eq!(errors.0["email or password"], vec!["is invalid"]);
    }

    #[tokio::test]
    async fn settings_update_and_rename() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;

        app.flux
            .emit(
                UpdateUserReq::PATH,
                UpdateUserReq {
                    bio: Some("I work at statefarm".to_string()),
                    ..UpdateUserReq::default()
                },
            )
            .await;

        let state = auth(&app);
        assert_eq!(state.status, RequestStatus::Success);
        let user = state.user.unwrap();
        assert_eq!(user.bio.as_deref(), Some("I work at statefarm"));
        assert_eq!(shell(&app).redirect_to.as_deref(), Some("/"));

        // Rename: the fresh token must keep the session alive.
        app.flux
            .emit(
                UpdateUserReq::PATH,
                UpdateUserReq {
                    username: Some("jacob".to_string()),
                    ..UpdateUserReq::default()
                },
            )
            .await;
        assert_eq!(auth(&app).username().as_deref(), Some("jacob"));

        app.flux.emit(LoadUserReq::PATH, LoadUserReq).await;
        let state = auth(&app);
        assert!(state.is_authenticated(), "renamed account should stay signed in");
        assert_eq!(state.username().as_deref(), Some("jacob"));
    }

    // =====================================================================
    // Home: article list, tabs, dedupe
    // =====================================================================

    #[tokio::test]
    async fn home_list_and_tabs() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;
        for i in 0..3 {
            publish(&app, &format!("Post {}", i), &[]).await;
        }

        app.flux
            .emit(LoadArticlesReq::PATH, LoadArticlesReq { page: None })
            .await;
        let state = list(&app);
        assert_eq!(state.status, RequestStatus::Success);
        assert_eq!(state.articles_count, 3);
        assert_eq!(state.articles[0].slug, "post-2", "newest first");
        assert!(!state.show_pagination(), "3 of 10 per page fits one page");

        // Feed tab: nobody followed yet.
        app.flux
            .emit(ChangeTabReq::PATH, ChangeTabReq { tab: ListTab::Feed })
            .await;
        let state = list(&app);
        assert_eq!(state.tab, Some(ListTab::Feed));
        assert_eq!(state.articles_count, 0);

        // Back to the global tab.
        app.flux
            .emit(ChangeTabReq::PATH, ChangeTabReq { tab: ListTab::All })
            .await;
        let state = list(&app);
        assert_eq!(state.tab, Some(ListTab::All));
        assert_eq!(state.articles_count, 3);
        assert_eq!(state.current_page, 0);
    }

    #[tokio::test]
    async fn loading_list_ignores_reload() {
        let (app, _) = start_app().await;
        app.flux.store().set(
            ArticleListState::PATH,
            ArticleListState {
                status: RequestStatus::Loading,
                ..ArticleListState::initial()
            },
        );

        app.flux
            .emit(LoadArticlesReq::PATH, LoadArticlesReq { page: None })
            .await;

        let state = list(&app);
        assert_eq!(state.status, RequestStatus::Loading, "in-flight load wins");
        assert!(state.articles.is_empty());
    }

    // =====================================================================
    // Tags
    // =====================================================================

    #[tokio::test]
    async fn tag_cloud_and_tag_filter() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;
        publish(&app, "Rusty", &["rust", "web"]).await;
        publish(&app, "Rustier", &["rust"]).await;

        app.flux.emit(LoadTagsReq::PATH, LoadTagsReq).await;
        let tags: TagsState = app.flux.get_cloned(TagsState::PATH).unwrap();
        assert_eq!(tags.status, RequestStatus::Success);
        assert_eq!(tags.tags[0], "rust", "most used tag first");

        app.flux
            .emit(
                LoadByTagReq::PATH,
                LoadByTagReq {
                    tag: "web".to_string(),
                },
            )
            .await;
        let state = list(&app);
        assert_eq!(state.tag.as_deref(), Some("web"));
        assert_eq!(state.articles_count, 1);
        assert_eq!(state.articles[0].slug, "rusty");
        assert_eq!(state.tab, None, "tag filter replaces the tab view");
    }

    // =====================================================================
    // Editor
    // =====================================================================

    #[tokio::test]
    async fn editor_create_edit_delete() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;

        // Create through the editor, field by field.
        app.flux
            .emit(EditorLoadReq::PATH, EditorLoadReq { slug: None })
            .await;
        for (field, value) in [
            ("title", "Hello World"),
            ("description", "greeting"),
            ("body", "hi"),
        ] {
            app.flux
                .emit(
                    EditorUpdateReq::PATH,
                    EditorUpdateReq {
                        field: field.to_string(),
                        value: value.to_string(),
                    },
                )
                .await;
        }
        app.flux.emit(EditorSubmitReq::PATH, EditorSubmitReq).await;

        assert_eq!(
            shell(&app).redirect_to.as_deref(),
            Some("/article/hello-world")
        );
        let article: ArticleState = app.flux.get_cloned(ArticleState::PATH).unwrap();
        assert_eq!(article.article.unwrap().title, "Hello World");
        let editor: EditorState = app.flux.get_cloned(EditorState::PATH).unwrap();
        assert_eq!(editor.title, "", "editor resets after publish");

        // Edit: slug survives the title change.
        app.flux
            .emit(
                EditorLoadReq::PATH,
                EditorLoadReq {
                    slug: Some("hello-world".to_string()),
                },
            )
            .await;
        let editor: EditorState = app.flux.get_cloned(EditorState::PATH).unwrap();
        assert_eq!(editor.title, "Hello World");
        assert_eq!(editor.slug.as_deref(), Some("hello-world"));

        app.flux
            .emit(
                EditorUpdateReq::PATH,
                EditorUpdateReq {
                    field: "title".to_string(),
                    value: "Hello Rust".to_string(),
                },
            )
            .await;
        app.flux.emit(EditorSubmitReq::PATH, EditorSubmitReq).await;

        let article: ArticleState = app.flux.get_cloned(ArticleState::PATH).unwrap();
        let article = article.article.unwrap();
        assert_eq!(article.title, "Hello Rust");
        assert_eq!(article.slug, "hello-world");

        // Delete from the article page.
        app.flux
            .emit(
                DeleteArticleReq::PATH,
                DeleteArticleReq {
                    slug: "hello-world".to_string(),
                },
            )
            .await;
        let article: ArticleState = app.flux.get_cloned(ArticleState::PATH).unwrap();
        assert!(article.article.is_none());
        assert_eq!(shell(&app).redirect_to.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn editor_submit_blank_rejected() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;

        app.flux
            .emit(EditorLoadReq::PATH, EditorLoadReq { slug: None })
            .await;
        app.flux.emit(EditorSubmitReq::PATH, EditorSubmitReq).await;

        let editor: EditorState = app.flux.get_cloned(EditorState::PATH).unwrap();
        assert_eq!(editor.status, RequestStatus::Failure);
        let errors = editor.errors.expect("blank draft should fail validation");
        assert_eq!(errors.0["title"], vec!["can't be blank"]);
        assert_eq!(shell(&app).redirect_to, None, "no redirect on failure");
    }

    // =====================================================================
    // Comments
    // =====================================================================

    #[tokio::test]
    async fn comment_add_and_delete() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;
        let slug = publish(&app, "Discuss", &[]).await;

        app.flux
            .emit(LoadCommentsReq::PATH, LoadCommentsReq { slug: slug.clone() })
            .await;
        assert!(comment_items(&app).is_empty());

        app.flux
            .emit(
                AddCommentReq::PATH,
                AddCommentReq {
                    slug: slug.clone(),
                    body: "First!".to_string(),
                },
            )
            .await;

        let items = comment_items(&app);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].body, "First!");
        assert!(items[0].id > 0, "optimistic id must be replaced by the server id");
        assert_eq!(items[0].author.username, "jake");

        app.flux
            .emit(
                DeleteCommentReq::PATH,
                DeleteCommentReq {
                    slug,
                    id: items[0].id,
                },
            )
            .await;
        assert!(comment_items(&app).is_empty());
        let comments: CommentsState = app.flux.get_cloned(CommentsState::PATH).unwrap();
        assert_eq!(comments.status, RequestStatus::Success);
    }

    #[tokio::test]
    async fn comment_rollback_on_server_error() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;

        // No such article: the optimistic row must not survive.
        app.flux
            .emit(
                AddCommentReq::PATH,
                AddCommentReq {
                    slug: "no-such-article".to_string(),
                    body: "lost words".to_string(),
                },
            )
            .await;

        assert!(comment_items(&app).is_empty(), "optimistic comment rolled back");
        let comments: CommentsState = app.flux.get_cloned(CommentsState::PATH).unwrap();
        assert_eq!(comments.status, RequestStatus::Failure);
        assert!(comments.errors.is_some());
    }

    // =====================================================================
    // Favorites
    // =====================================================================

    #[tokio::test]
    async fn favorite_updates_only_list_flags() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;
        let slug = publish(&app, "Fav me", &[]).await;

        app.flux
            .emit(LoadArticlesReq::PATH, LoadArticlesReq { page: None })
            .await;
        let before = list(&app);
        assert!(!before.articles[0].favorited);

        app.flux
            .emit(FavoriteReq::PATH, FavoriteReq { slug: slug.clone() })
            .await;
        let state = list(&app);
        assert!(state.articles[0].favorited);
        assert_eq!(state.articles[0].favorites_count, 1);
        assert_eq!(state.articles[0].title, before.articles[0].title);
        assert_eq!(state.articles_count, before.articles_count);

        app.flux
            .emit(UnfavoriteReq::PATH, UnfavoriteReq { slug })
            .await;
        let state = list(&app);
        assert!(!state.articles[0].favorited);
        assert_eq!(state.articles[0].favorites_count, 0);
    }

    // =====================================================================
    // Profiles
    // =====================================================================

    #[tokio::test]
    async fn profile_follow_and_filters() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;
        let slug = publish(&app, "By Jake", &[]).await;
        app.flux.emit(LogoutReq::PATH, LogoutReq).await;
        sign_up(&app, "anah").await;

        app.flux
            .emit(
                LoadProfileReq::PATH,
                LoadProfileReq {
                    username: "jake".to_string(),
                },
            )
            .await;
        let profile: ProfileState = app.flux.get_cloned(ProfileState::PATH).unwrap();
        assert_eq!(profile.status, RequestStatus::Success);
        let viewed = profile.profile.unwrap();
        assert_eq!(viewed.username, "jake");
        assert!(!viewed.following);

        app.flux
            .emit(
                FollowReq::PATH,
                FollowReq {
                    username: "jake".to_string(),
                },
            )
            .await;
        let profile: ProfileState = app.flux.get_cloned(ProfileState::PATH).unwrap();
        assert!(profile.profile.unwrap().following);

        // The profile page lists the author's articles.
        app.flux
            .emit(
                LoadByAuthorReq::PATH,
                LoadByAuthorReq {
                    username: "jake".to_string(),
                },
            )
            .await;
        let state = list(&app);
        assert_eq!(state.author.as_deref(), Some("jake"));
        assert_eq!(state.articles_count, 1);
        assert_eq!(state.articles_per_page, 5);

        // Favorited tab starts empty, fills after a favorite.
        app.flux
            .emit(
                LoadFavoritesReq::PATH,
                LoadFavoritesReq {
                    username: "anah".to_string(),
                },
            )
            .await;
        assert_eq!(list(&app).articles_count, 0);

        app.flux
            .emit(FavoriteReq::PATH, FavoriteReq { slug })
            .await;
        app.flux
            .emit(
                LoadFavoritesReq::PATH,
                LoadFavoritesReq {
                    username: "anah".to_string(),
                },
            )
            .await;
        let state = list(&app);
        assert_eq!(state.favorited.as_deref(), Some("anah"));
        assert_eq!(state.articles_count, 1);

        app.flux
            .emit(
                UnfollowReq::PATH,
                UnfollowReq {
                    username: "jake".to_string(),
                },
            )
            .await;
        let profile: ProfileState = app.flux.get_cloned(ProfileState::PATH).unwrap();
        assert!(!profile.profile.unwrap().following);
    }

    // =====================================================================
    // Unloads
    // =====================================================================

    #[tokio::test]
    async fn unloads_reset_slices_and_bump_counter() {
        let (app, _) = start_app().await;
        sign_up(&app, "jake").await;
        let slug = publish(&app, "Leaving soon", &[]).await;

        app.flux
            .emit(LoadArticleReq::PATH, LoadArticleReq { slug: slug.clone() })
            .await;
        app.flux
            .emit(LoadCommentsReq::PATH, LoadCommentsReq { slug: slug.clone() })
            .await;
        app.flux
            .emit(
                AddCommentReq::PATH,
                AddCommentReq {
                    slug,
                    body: "bye".to_string(),
                },
            )
            .await;
        assert_eq!(comment_items(&app).len(), 1);
        let counter_before = shell(&app).view_change_counter;

        app.flux
            .emit(ArticleUnloadReq::PATH, ArticleUnloadReq)
            .await;
        let article: ArticleState = app.flux.get_cloned(ArticleState::PATH).unwrap();
        assert!(article.article.is_none());
        assert_eq!(article.status, RequestStatus::Idle);
        assert!(comment_items(&app).is_empty(), "leaving the page drops comments");
        assert_eq!(shell(&app).view_change_counter, counter_before + 1);

        // Home unload resets the list slice.
        app.flux
            .emit(LoadArticlesReq::PATH, LoadArticlesReq { page: None })
            .await;
        assert_eq!(list(&app).articles_count, 1);
        app.flux.emit(HomeUnloadReq::PATH, HomeUnloadReq).await;
        let state = list(&app);
        assert_eq!(state.status, RequestStatus::Idle);
        assert!(state.articles.is_empty());
        assert_eq!(shell(&app).view_change_counter, counter_before + 2);
    }
}
