//! In-memory backing store for the test server.
//!
//! One `RwLock` over all tables. Records keep the server-side fields
//! (passwords, author keys); the public methods return the wire types
//! from `conduit_client`, with `favorited`/`following` computed for
//! the viewing user.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use conduit_client::{Article, ArticlesResponse, Comment, FieldErrors, Profile, UserUpdate};
use serde::Deserialize;
use thiserror::Error;

/// Why an operation was refused. The routes map these onto statuses:
/// 401, 403, 404, 422, 500 in variant order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("validation: {0}")]
    Validation(FieldErrors),
    #[error("internal: {0}")]
    Internal(String),
}

/// A registered account. `password` never leaves the store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: i64,
    pub slug: String,
    pub body: String,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Filters for the list endpoints. Doubles as the query extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleFilter {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Default)]
struct Inner {
    /// Accounts keyed by username.
    users: BTreeMap<String, UserRecord>,
    /// Insertion order is publication order; listings iterate reversed.
    articles: Vec<ArticleRecord>,
    comments: Vec<CommentRecord>,
    /// (username, slug)
    favorites: HashSet<(String, String)>,
    /// (follower, followee)
    follows: HashSet<(String, String)>,
    next_comment_id: i64,
}

/// Everything the demo server knows, behind one lock.
#[derive(Default)]
pub struct ConduitStore {
    inner: RwLock<Inner>,
}

/// Lowercase alphanumeric runs joined by `-`.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl Inner {
    fn profile(&self, viewer: Option<&str>, username: &str) -> Option<Profile> {
        let user = self.users.get(username)?;
        let following = viewer
            .map(|v| self.follows.contains(&(v.to_string(), username.to_string())))
            .unwrap_or(false);
        Some(Profile {
            username: user.username.clone(),
            bio: user.bio.clone(),
            image: user.image.clone(),
            following,
        })
    }

    fn article(&self, viewer: Option<&str>, record: &ArticleRecord) -> Article {
        let favorited = viewer
            .map(|v| self.favorites.contains(&(v.to_string(), record.slug.clone())))
            .unwrap_or(false);
        let favorites_count = self
            .favorites
            .iter()
            .filter(|(_, slug)| *slug == record.slug)
            .count() as u64;
        let author = self.profile(viewer, &record.author).unwrap_or(Profile {
            username: record.author.clone(),
            bio: None,
            image: None,
            following: false,
        });
        Article {
            slug: record.slug.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            body: record.body.clone(),
            tag_list: record.tag_list.clone(),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
            favorited,
            favorites_count,
            author,
        }
    }

    fn comment(&self, viewer: Option<&str>, record: &CommentRecord) -> Comment {
        let author = self.profile(viewer, &record.author).unwrap_or(Profile {
            username: record.author.clone(),
            bio: None,
            image: None,
            following: false,
        });
        Comment {
            id: record.id,
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
            body: record.body.clone(),
            author,
        }
    }

    fn unique_slug(&self, title: &str) -> String {
        let mut base = slugify(title);
        if base.is_empty() {
            base = "article".into();
        }
        if !self.articles.iter().any(|a| a.slug == base) {
            return base;
        }
        let suffix = uuid::Uuid::new_v4().to_string().replace('-', "");
        format!("{}-{}", base, &suffix[..8])
    }
}

impl ConduitStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Users ──

    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, ServiceError> {
        let mut inner = self.inner.write().unwrap();

        let mut errors = FieldErrors::default();
        if username.is_empty() {
            errors.add("username", "can't be blank");
        } else if inner.users.contains_key(username) {
            errors.add("username", "has already been taken");
        }
        if email.is_empty() {
            errors.add("email", "can't be blank");
        } else if inner.users.values().any(|u| u.email == email) {
            errors.add("email", "has already been taken");
        }
        if password.is_empty() {
            errors.add("password", "can't be blank");
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let record = UserRecord {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            bio: None,
            image: None,
        };
        inner.users.insert(username.to_string(), record.clone());
        Ok(record)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<UserRecord, ServiceError> {
        let inner = self.inner.read().unwrap();
        inner
            .users
            .values()
            .find(|u| u.email == email && u.password == password)
            .cloned()
            .ok_or_else(|| {
                ServiceError::Validation(FieldErrors::single("email or password", "is invalid"))
            })
    }

    pub fn user(&self, username: &str) -> Option<UserRecord> {
        self.inner.read().unwrap().users.get(username).cloned()
    }

    /// Apply a settings update. A username change re-keys the account
    /// and rewrites every reference to the old name.
    pub fn update_user(
        &self,
        username: &str,
        update: &UserUpdate,
    ) -> Result<UserRecord, ServiceError> {
        let mut inner = self.inner.write().unwrap();
        let Some(current) = inner.users.get(username) else {
            return Err(ServiceError::NotFound);
        };
        let mut record = current.clone();

        let mut errors = FieldErrors::default();
        if let Some(ref new_username) = update.username {
            if new_username.is_empty() {
                errors.add("username", "can't be blank");
            } else if new_username != username && inner.users.contains_key(new_username) {
                errors.add("username", "has already been taken");
            }
        }
        if let Some(ref new_email) = update.email {
            if new_email.is_empty() {
                errors.add("email", "can't be blank");
            } else if inner
                .users
                .values()
                .any(|u| u.username != username && u.email == *new_email)
            {
                errors.add("email", "has already been taken");
            }
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        if let Some(ref v) = update.email {
            record.email = v.clone();
        }
        if let Some(ref v) = update.username {
            record.username = v.clone();
        }
        if let Some(ref v) = update.bio {
            record.bio = (!v.is_empty()).then(|| v.clone());
        }
        if let Some(ref v) = update.image {
            record.image = (!v.is_empty()).then(|| v.clone());
        }
        if let Some(ref v) = update.password {
            record.password = v.clone();
        }

        if record.username != username {
            inner.users.remove(username);
            rename_user(&mut inner, username, &record.username);
        }
        inner
            .users
            .insert(record.username.clone(), record.clone());
        Ok(record)
    }

    // ── Profiles ──

    pub fn profile(&self, viewer: Option<&str>, username: &str) -> Result<Profile, ServiceError> {
        self.inner
            .read()
            .unwrap()
            .profile(viewer, username)
            .ok_or(ServiceError::NotFound)
    }

    pub fn set_following(
        &self,
        follower: &str,
        followee: &str,
        following: bool,
    ) -> Result<Profile, ServiceError> {
        let mut inner = self.inner.write().unwrap();
        if !inner.users.contains_key(followee) {
            return Err(ServiceError::NotFound);
        }
        let pair = (follower.to_string(), followee.to_string());
        if following {
            inner.follows.insert(pair);
        } else {
            inner.follows.remove(&pair);
        }
        inner
            .profile(Some(follower), followee)
            .ok_or(ServiceError::NotFound)
    }

    // ── Articles ──

    pub fn create_article(
        &self,
        author: &str,
        title: &str,
        description: &str,
        body: &str,
        tag_list: &[String],
    ) -> Result<Article, ServiceError> {
        let mut inner = self.inner.write().unwrap();

        let mut errors = FieldErrors::default();
        if title.is_empty() {
            errors.add("title", "can't be blank");
        }
        if description.is_empty() {
            errors.add("description", "can't be blank");
        }
        if body.is_empty() {
            errors.add("body", "can't be blank");
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let now = now_rfc3339();
        let record = ArticleRecord {
            slug: inner.unique_slug(title),
            title: title.to_string(),
            description: description.to_string(),
            body: body.to_string(),
            tag_list: tag_list.to_vec(),
            author: author.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        let article = inner.article(Some(author), &record);
        inner.articles.push(record);
        Ok(article)
    }

    /// Update an article in place. The slug stays stable so open pages
    /// and comment references keep working.
    pub fn update_article(
        &self,
        author: &str,
        slug: &str,
        title: &str,
        description: &str,
        body: &str,
        tag_list: &[String],
    ) -> Result<Article, ServiceError> {
        let mut inner = self.inner.write().unwrap();

        let Some(index) = inner.articles.iter().position(|a| a.slug == slug) else {
            return Err(ServiceError::NotFound);
        };
        if inner.articles[index].author != author {
            return Err(ServiceError::Forbidden);
        }

        let mut errors = FieldErrors::default();
        if title.is_empty() {
            errors.add("title", "can't be blank");
        }
        if description.is_empty() {
            errors.add("description", "can't be blank");
        }
        if body.is_empty() {
            errors.add("body", "can't be blank");
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let record = &mut inner.articles[index];
        record.title = title.to_string();
        record.description = description.to_string();
        record.body = body.to_string();
        record.tag_list = tag_list.to_vec();
        record.updated_at = now_rfc3339();

        let record = inner.articles[index].clone();
        Ok(inner.article(Some(author), &record))
    }

    pub fn delete_article(&self, author: &str, slug: &str) -> Result<(), ServiceError> {
        let mut inner = self.inner.write().unwrap();
        let Some(index) = inner.articles.iter().position(|a| a.slug == slug) else {
            return Err(ServiceError::NotFound);
        };
        if inner.articles[index].author != author {
            return Err(ServiceError::Forbidden);
        }
        inner.articles.remove(index);
        inner.comments.retain(|c| c.slug != slug);
        inner.favorites.retain(|(_, s)| s != slug);
        Ok(())
    }

    pub fn article(&self, viewer: Option<&str>, slug: &str) -> Result<Article, ServiceError> {
        let inner = self.inner.read().unwrap();
        let record = inner
            .articles
            .iter()
            .find(|a| a.slug == slug)
            .ok_or(ServiceError::NotFound)?;
        Ok(inner.article(viewer, record))
    }

    /// Global listing, newest first, `articlesCount` before pagination.
    pub fn list_articles(&self, viewer: Option<&str>, filter: &ArticleFilter) -> ArticlesResponse {
        let inner = self.inner.read().unwrap();
        let matching: Vec<&ArticleRecord> = inner
            .articles
            .iter()
            .rev()
            .filter(|a| match filter.tag {
                Some(ref tag) => a.tag_list.contains(tag),
                None => true,
            })
            .filter(|a| match filter.author {
                Some(ref author) => a.author == *author,
                None => true,
            })
            .filter(|a| match filter.favorited {
                Some(ref user) => inner
                    .favorites
                    .contains(&(user.clone(), a.slug.clone())),
                None => true,
            })
            .collect();
        paginate(&inner, viewer, matching, filter)
    }

    /// Articles by authors the viewer follows, newest first.
    pub fn feed(&self, viewer: &str, filter: &ArticleFilter) -> ArticlesResponse {
        let inner = self.inner.read().unwrap();
        let matching: Vec<&ArticleRecord> = inner
            .articles
            .iter()
            .rev()
            .filter(|a| {
                inner
                    .follows
                    .contains(&(viewer.to_string(), a.author.clone()))
            })
            .collect();
        paginate(&inner, Some(viewer), matching, filter)
    }

    pub fn set_favorited(
        &self,
        viewer: &str,
        slug: &str,
        favorited: bool,
    ) -> Result<Article, ServiceError> {
        let mut inner = self.inner.write().unwrap();
        let Some(index) = inner.articles.iter().position(|a| a.slug == slug) else {
            return Err(ServiceError::NotFound);
        };
        let pair = (viewer.to_string(), slug.to_string());
        if favorited {
            inner.favorites.insert(pair);
        } else {
            inner.favorites.remove(&pair);
        }
        let record = inner.articles[index].clone();
        Ok(inner.article(Some(viewer), &record))
    }

    // ── Comments ──

    pub fn comments(&self, viewer: Option<&str>, slug: &str) -> Result<Vec<Comment>, ServiceError> {
        let inner = self.inner.read().unwrap();
        if !inner.articles.iter().any(|a| a.slug == slug) {
            return Err(ServiceError::NotFound);
        }
        Ok(inner
            .comments
            .iter()
            .filter(|c| c.slug == slug)
            .map(|c| inner.comment(viewer, c))
            .collect())
    }

    pub fn add_comment(
        &self,
        author: &str,
        slug: &str,
        body: &str,
    ) -> Result<Comment, ServiceError> {
        let mut inner = self.inner.write().unwrap();
        if !inner.articles.iter().any(|a| a.slug == slug) {
            return Err(ServiceError::NotFound);
        }
        if body.is_empty() {
            return Err(ServiceError::Validation(FieldErrors::single(
                "body",
                "can't be blank",
            )));
        }

        inner.next_comment_id += 1;
        let now = now_rfc3339();
        let record = CommentRecord {
            id: inner.next_comment_id,
            slug: slug.to_string(),
            body: body.to_string(),
            author: author.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        let comment = inner.comment(Some(author), &record);
        inner.comments.push(record);
        Ok(comment)
    }

    pub fn delete_comment(&self, author: &str, slug: &str, id: i64) -> Result<(), ServiceError> {
        let mut inner = self.inner.write().unwrap();
        let Some(index) = inner
            .comments
            .iter()
            .position(|c| c.slug == slug && c.id == id)
        else {
            return Err(ServiceError::NotFound);
        };
        if inner.comments[index].author != author {
            return Err(ServiceError::Forbidden);
        }
        inner.comments.remove(index);
        Ok(())
    }

    // ── Tags ──

    /// Distinct tags, most used first, ties alphabetical.
    pub fn tags(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for article in &inner.articles {
            for tag in &article.tag_list {
                *counts.entry(tag).or_default() += 1;
            }
        }
        let mut tags: Vec<(&str, usize)> = counts.into_iter().collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tags.into_iter().map(|(tag, _)| tag.to_string()).collect()
    }
}

fn paginate(
    inner: &Inner,
    viewer: Option<&str>,
    matching: Vec<&ArticleRecord>,
    filter: &ArticleFilter,
) -> ArticlesResponse {
    let articles_count = matching.len() as u64;
    let offset = filter.offset.unwrap_or(0) as usize;
    let limit = filter.limit.unwrap_or(20) as usize;
    let articles = matching
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|record| inner.article(viewer, record))
        .collect();
    ArticlesResponse {
        articles,
        articles_count,
    }
}

fn rename_user(inner: &mut Inner, old: &str, new: &str) {
    for article in &mut inner.articles {
        if article.author == old {
            article.author = new.to_string();
        }
    }
    for comment in &mut inner.comments {
        if comment.author == old {
            comment.author = new.to_string();
        }
    }
    let follows = std::mem::take(&mut inner.follows);
    inner.follows = follows
        .into_iter()
        .map(|(a, b)| {
            (
                if a == old { new.to_string() } else { a },
                if b == old { new.to_string() } else { b },
            )
        })
        .collect();
    let favorites = std::mem::take(&mut inner.favorites);
    inner.favorites = favorites
        .into_iter()
        .map(|(user, slug)| {
            (
                if user == old { new.to_string() } else { user },
                slug,
            )
        })
        .collect();
}
