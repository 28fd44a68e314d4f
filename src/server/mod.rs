//! HTTP server: home page, bilingual blog, and sitemap

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tera::Context;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{BlogPost, Locale, PostStore, StorageResolver};
use crate::error::SiteError;
use crate::i18n::I18n;
use crate::render::{self, LanguageLink, PostCard, PostView};
use crate::seo::{self, PageMetadata};
use crate::sitemap;
use crate::templates::{SiteData, TemplateRenderer};
use crate::Site;

/// Shared, read-only state for every request
pub struct AppState<S> {
    pub config: SiteConfig,
    pub store: S,
    storage: StorageResolver,
    templates: TemplateRenderer,
    strings: HashMap<Locale, serde_json::Value>,
    i18n: I18n,
    public_dir: PathBuf,
}

/// `?lang=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl<S: PostStore> AppState<S> {
    /// Build the state for a site folder
    pub fn new(site: &Site, store: S) -> Result<Self> {
        let mut i18n = I18n::builtin()?;
        i18n.load_languages(&site.languages_dir)?;

        let strings = Locale::ALL
            .iter()
            .map(|&l| (l, i18n.strings_for(l)))
            .collect();

        Ok(Self {
            storage: StorageResolver::new(&site.config.firebase.storage_bucket),
            config: site.config.clone(),
            store,
            templates: TemplateRenderer::new()?,
            strings,
            i18n,
            public_dir: site.public_dir.clone(),
        })
    }

    fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Context shared by every page
    fn context(&self, locale: Locale, meta: &PageMetadata) -> Context {
        let mut ctx = Context::new();
        ctx.insert("site", &SiteData::new(&self.config, locale));
        ctx.insert("t", &self.strings[&locale]);
        ctx.insert("head", &meta.head_html());
        ctx
    }

    fn render(&self, template: &str, ctx: &Context) -> Result<Html<String>, SiteError> {
        Ok(Html(self.templates.render(template, ctx)?))
    }

    /// Card for a post with its image resolved to a public URL
    fn card(&self, post: &BlogPost, locale: Locale) -> PostCard {
        let mut post = post.clone();
        self.storage.resolve_post(&mut post);
        PostCard::build(&post, locale)
    }

    /// Error page, falling back to plain text if the page cannot render
    fn error_page(&self, locale: Locale, err: SiteError) -> Response {
        let status = err.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("{}", err);
        } else {
            tracing::error!("Request failed: {}", err);
        }

        let (title_key, text_key) = if status == StatusCode::NOT_FOUND {
            ("error.not_found_title", "error.not_found_text")
        } else {
            ("error.server_title", "error.server_text")
        };
        let title = self.i18n.get(locale, title_key);

        let meta = PageMetadata {
            title: self.config.page_title(&title),
            ..Default::default()
        };
        let mut ctx = self.context(locale, &meta);
        ctx.insert("status", &status.as_u16());
        ctx.insert("title", &title);
        ctx.insert("message", &self.i18n.get(locale, text_key));

        match self.templates.render("error.html", &ctx) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                err.into_response()
            }
        }
    }
}

/// Build the router for a state
pub fn router<S: PostStore>(state: Arc<AppState<S>>) -> Router {
    let mut app = Router::new()
        .route("/", get(home::<S>))
        .route("/blog", get(blog_list::<S>))
        .route("/blog/:slug", get(post_redirect))
        .route("/blog/:slug/:lang", get(post_page::<S>))
        .route("/sitemap.xml", get(sitemap_xml::<S>));

    // Static sections live on the home page
    for section in sitemap::STATIC_PATHS.iter().filter(|p| !p.is_empty()) {
        let target = format!("/#{}", section);
        app = app.route(
            &format!("/{}", section),
            get(move || async move { Redirect::temporary(&target) }),
        );
    }

    app.fallback(fallback::<S>)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start<S: PostStore>(site: &Site, store: S, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(site, store)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn accept_language(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
}

/// Home page with the newest posts
async fn home<S: PostStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<LangQuery>,
    headers: HeaderMap,
) -> Response {
    let locale = Locale::resolve(query.lang.as_deref(), accept_language(&headers));

    // The blog section is optional on the landing page
    let recent: Vec<PostCard> = match state.store.list_posts().await {
        Ok(posts) => render::recent_posts(&posts, locale, state.config.home_recent_posts)
            .into_iter()
            .map(|p| state.card(p, locale))
            .collect(),
        Err(e) => {
            tracing::warn!("Could not load recent posts for home page: {}", e);
            Vec::new()
        }
    };

    let meta = seo::site_metadata(&state.config, None, "/", locale);
    let mut ctx = state.context(locale, &meta);
    ctx.insert("recent", &recent);
    ctx.insert("instagram", &state.config.instagram_posts);
    ctx.insert("products", &state.config.products);

    match state.render("home.html", &ctx) {
        Ok(html) => html.into_response(),
        Err(e) => state.error_page(locale, e),
    }
}

/// Blog index for the locale in `?lang=`
async fn blog_list<S: PostStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<LangQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(locale) = query.lang.as_deref().and_then(Locale::from_code) else {
        let detected = Locale::from_accept_language(accept_language(&headers).unwrap_or(""));
        return (
            [(header::VARY, "Accept-Language")],
            Redirect::temporary(&format!("/blog?lang={}", detected.code())),
        )
            .into_response();
    };

    match render_blog_list(&state, locale).await {
        Ok(html) => html.into_response(),
        Err(e) => state.error_page(locale, e),
    }
}

async fn render_blog_list<S: PostStore>(
    state: &AppState<S>,
    locale: Locale,
) -> Result<Html<String>, SiteError> {
    let mut posts = state.store.list_posts().await?;
    render::sort_by_date(&mut posts, locale);
    let cards: Vec<PostCard> = posts.iter().map(|p| state.card(p, locale)).collect();

    let languages: Vec<LanguageLink> = Locale::ALL
        .iter()
        .map(|&l| LanguageLink {
            code: l.code(),
            name: l.native_name(),
            href: format!("/blog?lang={}", l.code()),
            active: l == locale,
        })
        .collect();

    let heading = state.i18n.get(locale, "blog.heading");
    let path = format!("/blog?lang={}", locale.code());
    let meta = seo::site_metadata(&state.config, Some(&heading), &path, locale);

    let mut ctx = state.context(locale, &meta);
    ctx.insert("posts", &cards);
    ctx.insert("languages", &languages);
    state.render("blog_list.html", &ctx)
}

/// `/blog/{slug}` picks a language from the request and redirects
async fn post_redirect(Path(slug): Path<String>, headers: HeaderMap) -> Response {
    let locale = Locale::from_accept_language(accept_language(&headers).unwrap_or(""));
    let target = crate::content::post_path(&slug, locale);
    (
        [(header::VARY, "Accept-Language")],
        Redirect::temporary(&target),
    )
        .into_response()
}

/// Canonical localized post page
async fn post_page<S: PostStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((slug, lang)): Path<(String, String)>,
) -> Response {
    let Some(locale) = Locale::from_code(&lang) else {
        let err = SiteError::NotFound(format!("/blog/{}/{}", slug, lang));
        return state.error_page(Locale::DEFAULT, err);
    };

    match render_post_page(&state, &slug, locale).await {
        Ok(html) => html.into_response(),
        Err(e) => state.error_page(locale, e),
    }
}

async fn render_post_page<S: PostStore>(
    state: &AppState<S>,
    slug: &str,
    locale: Locale,
) -> Result<Html<String>, SiteError> {
    let mut post = state
        .store
        .get_post(slug)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("/blog/{}/{}", slug, locale)))?;
    state.storage.resolve_post(&mut post);

    let all = state.store.list_posts().await?;
    let suggestions: Vec<PostCard> =
        render::next_posts(&all, slug, locale, state.config.suggested_posts)
            .into_iter()
            .map(|p| state.card(p, locale))
            .collect();

    let view = PostView::build(&post, locale, state.base_url());
    let meta = seo::synthesize(&post, locale, state.base_url());

    let mut ctx = state.context(locale, &meta);
    ctx.insert("post", &view);
    ctx.insert("suggestions", &suggestions);
    state.render("post.html", &ctx)
}

/// sitemap.xml; falls back to static paths when posts cannot be listed
async fn sitemap_xml<S: PostStore>(State(state): State<Arc<AppState<S>>>) -> Response {
    let xml = sitemap::generate(&state.store, state.base_url()).await;
    (
        [
            (header::CONTENT_TYPE, sitemap::CONTENT_TYPE),
            (header::CACHE_CONTROL, sitemap::CACHE_CONTROL),
        ],
        xml,
    )
        .into_response()
}

/// Static files from the public directory, otherwise the 404 page
async fn fallback<S: PostStore>(
    State(state): State<Arc<AppState<S>>>,
    request: Request<Body>,
) -> Response {
    let locale = Locale::from_accept_language(accept_language(request.headers()).unwrap_or(""));
    let path = request.uri().path().to_string();

    if state.public_dir.is_dir() {
        let mut service = ServeDir::new(&state.public_dir);
        match service.try_call(request).await {
            Ok(response) if response.status() != StatusCode::NOT_FOUND => {
                return response.into_response();
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to serve {}: {}", path, e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
            }
        }
    }

    state.error_page(locale, SiteError::NotFound(path))
}
