//! BFF handler implementations and Flux wiring.
//!
//! `register_handlers` connects every request path to its handler.
//! Each registration downcasts the typed payload and hands the slice
//! handler the store plus whatever context it needs. The downcast
//! cannot fail: `emit` stores the payload under the same type the
//! `PATH` const belongs to.

pub mod global;

use std::sync::Arc;
use std::sync::atomic::AtomicI64;

use conduit_client::ConduitClient;
use conduit_flux::{Flux, StateStore};

use crate::request::*;
use crate::session::SessionStore;

use self::global::{
    app_handlers, article_handlers, article_list_handlers, auth_handlers, comment_handlers,
    editor_handlers, profile_handlers, tag_handlers,
};

/// Handler context — the API client, the session store, and the
/// counter that mints temp ids for optimistic comments.
pub struct ConduitContext {
    pub api: Arc<ConduitClient>,
    pub session: Arc<dyn SessionStore>,
    pub comment_seq: AtomicI64,
}

impl ConduitContext {
    pub fn new(api: Arc<ConduitClient>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            session,
            // fetch_sub returns the previous value, so ids run -1, -2, ...
            comment_seq: AtomicI64::new(-1),
        }
    }
}

/// Register all handlers with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: Arc<ConduitContext>) {
    // app/load
    {
        let ctx = ctx.clone();
        flux.on(AppLoadReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<AppLoadReq>().unwrap();
                app_handlers::handle_load(req, &store, &ctx.api).await;
            }
        });
    }

    // app/clear-redirect
    flux.on(ClearRedirectReq::PATH, |_, _, store: Arc<StateStore>| async move {
        app_handlers::handle_clear_redirect(&store).await;
    });

    // auth/login
    {
        let ctx = ctx.clone();
        flux.on(LoginReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<LoginReq>().unwrap();
                auth_handlers::handle_login(req, &store, &ctx.api, ctx.session.as_ref()).await;
            }
        });
    }

    // auth/register
    {
        let ctx = ctx.clone();
        flux.on(RegisterReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<RegisterReq>().unwrap();
                auth_handlers::handle_register(req, &store, &ctx.api, ctx.session.as_ref()).await;
            }
        });
    }

    // auth/load-user
    {
        let ctx = ctx.clone();
        flux.on(LoadUserReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                auth_handlers::handle_load_user(&store, &ctx.api).await;
            }
        });
    }

    // auth/update-user
    {
        let ctx = ctx.clone();
        flux.on(UpdateUserReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<UpdateUserReq>().unwrap();
                auth_handlers::handle_update_user(req, &store, &ctx.api, ctx.session.as_ref())
                    .await;
            }
        });
    }

    // auth/logout
    {
        let ctx = ctx.clone();
        flux.on(LogoutReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                auth_handlers::handle_logout(&store, &ctx.api, ctx.session.as_ref()).await;
            }
        });
    }

    // articles/load
    {
        let ctx = ctx.clone();
        flux.on(LoadArticlesReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<LoadArticlesReq>().unwrap();
                article_list_handlers::handle_load(req, &store, &ctx.api).await;
            }
        });
    }

    // articles/change-tab
    {
        let ctx = ctx.clone();
        flux.on(ChangeTabReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<ChangeTabReq>().unwrap();
                article_list_handlers::handle_change_tab(req, &store, &ctx.api).await;
            }
        });
    }

    // articles/by-tag
    {
        let ctx = ctx.clone();
        flux.on(LoadByTagReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<LoadByTagReq>().unwrap();
                article_list_handlers::handle_by_tag(req, &store, &ctx.api).await;
            }
        });
    }

    // articles/by-author
    {
        let ctx = ctx.clone();
        flux.on(LoadByAuthorReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<LoadByAuthorReq>().unwrap();
                article_list_handlers::handle_by_author(req, &store, &ctx.api).await;
            }
        });
    }

    // articles/favorites
    {
        let ctx = ctx.clone();
        flux.on(LoadFavoritesReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<LoadFavoritesReq>().unwrap();
                article_list_handlers::handle_favorites(req, &store, &ctx.api).await;
            }
        });
    }

    // articles/favorite
    {
        let ctx = ctx.clone();
        flux.on(FavoriteReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<FavoriteReq>().unwrap();
                article_list_handlers::handle_favorite(req, &store, &ctx.api).await;
            }
        });
    }

    // articles/unfavorite
    {
        let ctx = ctx.clone();
        flux.on(UnfavoriteReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<UnfavoriteReq>().unwrap();
                article_list_handlers::handle_unfavorite(req, &store, &ctx.api).await;
            }
        });
    }

    // home/unload
    flux.on(HomeUnloadReq::PATH, |_, _, store: Arc<StateStore>| async move {
        article_list_handlers::handle_home_unload(&store).await;
    });

    // article/load
    {
        let ctx = ctx.clone();
        flux.on(LoadArticleReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<LoadArticleReq>().unwrap();
                article_handlers::handle_load(req, &store, &ctx.api).await;
            }
        });
    }

    // article/delete
    {
        let ctx = ctx.clone();
        flux.on(DeleteArticleReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<DeleteArticleReq>().unwrap();
                article_handlers::handle_delete(req, &store, &ctx.api).await;
            }
        });
    }

    // article/unload
    flux.on(ArticleUnloadReq::PATH, |_, _, store: Arc<StateStore>| async move {
        article_handlers::handle_unload(&store).await;
    });

    // editor/load
    {
        let ctx = ctx.clone();
        flux.on(EditorLoadReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<EditorLoadReq>().unwrap();
                editor_handlers::handle_load(req, &store, &ctx.api).await;
            }
        });
    }

    // editor/update-field
    flux.on(EditorUpdateReq::PATH, |_, payload, store: Arc<StateStore>| async move {
        let req = payload.downcast_ref::<EditorUpdateReq>().unwrap();
        editor_handlers::handle_update_field(req, &store).await;
    });

    // editor/add-tag
    flux.on(EditorAddTagReq::PATH, |_, payload, store: Arc<StateStore>| async move {
        let req = payload.downcast_ref::<EditorAddTagReq>().unwrap();
        editor_handlers::handle_add_tag(req, &store).await;
    });

    // editor/remove-tag
    flux.on(EditorRemoveTagReq::PATH, |_, payload, store: Arc<StateStore>| async move {
        let req = payload.downcast_ref::<EditorRemoveTagReq>().unwrap();
        editor_handlers::handle_remove_tag(req, &store).await;
    });

    // editor/submit
    {
        let ctx = ctx.clone();
        flux.on(EditorSubmitReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                editor_handlers::handle_submit(&store, &ctx.api).await;
            }
        });
    }

    // comments/load
    {
        let ctx = ctx.clone();
        flux.on(LoadCommentsReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<LoadCommentsReq>().unwrap();
                comment_handlers::handle_load(req, &store, &ctx.api).await;
            }
        });
    }

    // comments/add
    {
        let ctx = ctx.clone();
        flux.on(AddCommentReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<AddCommentReq>().unwrap();
                comment_handlers::handle_add(req, &store, &ctx.api, &ctx.comment_seq).await;
            }
        });
    }

    // comments/delete
    {
        let ctx = ctx.clone();
        flux.on(DeleteCommentReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<DeleteCommentReq>().unwrap();
                comment_handlers::handle_delete(req, &store, &ctx.api).await;
            }
        });
    }

    // profile/load
    {
        let ctx = ctx.clone();
        flux.on(LoadProfileReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<LoadProfileReq>().unwrap();
                profile_handlers::handle_load(req, &store, &ctx.api).await;
            }
        });
    }

    // profile/follow
    {
        let ctx = ctx.clone();
        flux.on(FollowReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<FollowReq>().unwrap();
                profile_handlers::handle_follow(req, &store, &ctx.api).await;
            }
        });
    }

    // profile/unfollow
    {
        let ctx = ctx.clone();
        flux.on(UnfollowReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let req = payload.downcast_ref::<UnfollowReq>().unwrap();
                profile_handlers::handle_unfollow(req, &store, &ctx.api).await;
            }
        });
    }

    // profile/unload
    flux.on(ProfileUnloadReq::PATH, |_, _, store: Arc<StateStore>| async move {
        profile_handlers::handle_unload(&store).await;
    });

    // tags/load
    {
        let ctx = ctx.clone();
        flux.on(LoadTagsReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                tag_handlers::handle_load(&store, &ctx.api).await;
            }
        });
    }
}
