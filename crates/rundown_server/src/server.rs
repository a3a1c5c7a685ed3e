//! HTTP server.
//!
//! hyper http1 connections on tokio; each request body is collected, then the
//! synchronous handler runs on the blocking pool because mutations write the
//! dataset file while holding the repository lock.

use crate::auth::{Credentials, CHALLENGE};
use crate::routes::{episode_path, Route, StoryRef};
use crate::views;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use log::{debug, error, info, warn};
use rundown_core::{RepoError, RundownRepository, RundownService, StoryDraft};
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug, Default, Deserialize)]
struct EpisodeForm {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct StoryFormData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    presenter: String,
    #[serde(default)]
    segment: String,
}

impl StoryFormData {
    fn into_parts(self) -> (StoryDraft, String) {
        (
            StoryDraft::new(self.title, self.notes, self.presenter),
            self.segment,
        )
    }
}

/// Shared application state.
pub struct App<R: RundownRepository> {
    service: RundownService<R>,
    credentials: Credentials,
}

impl<R: RundownRepository> App<R> {
    pub fn new(service: RundownService<R>, credentials: Credentials) -> Self {
        Self {
            service,
            credentials,
        }
    }

    /// Handles one fully-read request.
    pub fn handle(
        &self,
        method: &Method,
        path: &str,
        authorization: Option<&str>,
        body: &[u8],
    ) -> Response<Full<Bytes>> {
        if !self.credentials.accepts(authorization) {
            return unauthorized();
        }

        let Some(route) = Route::resolve(method, path) else {
            return not_found();
        };
        debug!("event=route module=server status=ok route={route:?}");

        match route {
            Route::ListEpisodes => html(views::index(&self.service.episode_list())),
            Route::CreateEpisode => self.create_episode(body),
            Route::ShowEpisode(slug) => self.show_episode(&slug),
            Route::AddStory(slug) => self.add_story(&slug, body),
            Route::EditStory(target) => self.edit_story(&target),
            Route::UpdateStory(target) => self.update_story(&target, body),
            Route::DeleteStory(target) => self.delete_story(&target),
        }
    }

    fn create_episode(&self, body: &[u8]) -> Response<Full<Bytes>> {
        let Ok(form) = serde_urlencoded::from_bytes::<EpisodeForm>(body) else {
            return bad_request("malformed form body");
        };
        if form.title.trim().is_empty() {
            return bad_request("episode title is required");
        }
        match self.service.add_episode(&form.title) {
            Ok(episode) => redirect(StatusCode::FOUND, &episode_path(&episode.slug)),
            Err(err) => repo_failure(err),
        }
    }

    fn show_episode(&self, slug: &str) -> Response<Full<Bytes>> {
        match self.service.episode_with_presenters(slug) {
            Ok((episode, presenters)) => html(views::episode_details(&episode, &presenters)),
            Err(err) => repo_failure(err),
        }
    }

    fn add_story(&self, slug: &str, body: &[u8]) -> Response<Full<Bytes>> {
        let Ok(form) = serde_urlencoded::from_bytes::<StoryFormData>(body) else {
            return bad_request("malformed form body");
        };
        let (draft, segment) = form.into_parts();
        // Redirect so a browser refresh repeats the GET, not the POST.
        match self.service.add_story(slug, &segment, draft) {
            Ok(_) => redirect(StatusCode::SEE_OTHER, &episode_path(slug)),
            Err(err) => repo_failure(err),
        }
    }

    fn edit_story(&self, target: &StoryRef) -> Response<Full<Bytes>> {
        let found = self.service.read(|repo| {
            let story = repo
                .story(&target.slug, target.segment_index, target.story_id)?
                .clone();
            Ok::<_, RepoError>((story, repo.presenter_names().to_vec()))
        });
        match found {
            Ok((story, presenters)) => html(views::edit_story(
                &target.slug,
                target.segment_index,
                &story,
                &presenters,
            )),
            Err(err) => repo_failure(err),
        }
    }

    fn update_story(&self, target: &StoryRef, body: &[u8]) -> Response<Full<Bytes>> {
        let Ok(form) = serde_urlencoded::from_bytes::<StoryFormData>(body) else {
            return bad_request("malformed form body");
        };
        // A story cannot move between segments; the segment field is ignored.
        let (draft, _) = form.into_parts();
        match self.service.update_story(
            &target.slug,
            target.segment_index,
            target.story_id,
            draft,
        ) {
            Ok(_) => redirect(StatusCode::SEE_OTHER, &episode_path(&target.slug)),
            Err(err) => repo_failure(err),
        }
    }

    fn delete_story(&self, target: &StoryRef) -> Response<Full<Bytes>> {
        match self
            .service
            .delete_story(&target.slug, target.segment_index, target.story_id)
        {
            Ok(_) => redirect(StatusCode::SEE_OTHER, &episode_path(&target.slug)),
            Err(err) => repo_failure(err),
        }
    }
}

/// Accepts connections until the process exits.
pub async fn run<R>(app: Arc<App<R>>, addr: SocketAddr) -> std::io::Result<()>
where
    R: RundownRepository + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("event=server_start module=server status=ok addr={addr}");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                error!("event=accept module=server status=error error={err}");
                continue;
            }
        };

        let app = Arc::clone(&app);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let app = Arc::clone(&app);
                async move { Ok::<_, Infallible>(dispatch(app, peer, req).await) }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!("event=connection module=server status=error peer={peer} error={err}");
            }
        });
    }
}

async fn dispatch<R>(
    app: Arc<App<R>>,
    peer: SocketAddr,
    req: Request<Incoming>,
) -> Response<Full<Bytes>>
where
    R: RundownRepository + Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            warn!("event=request_body module=server status=error peer={peer} error={err}");
            return bad_request("unreadable request body");
        }
    };

    let method = parts.method;
    let path = parts.uri.path().to_string();
    let authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let handled = {
        let method = method.clone();
        let path = path.clone();
        tokio::task::spawn_blocking(move || {
            app.handle(&method, &path, authorization.as_deref(), &body)
        })
        .await
    };

    let response = handled.unwrap_or_else(|err| {
        error!("event=request module=server status=error path={path} error={err}");
        internal_error()
    });
    info!(
        "event=request module=server status=ok peer={peer} method={method} path={path} code={}",
        response.status().as_u16()
    );
    response
}

fn repo_failure(err: RepoError) -> Response<Full<Bytes>> {
    if err.is_not_found() {
        debug!("event=lookup module=server status=not_found error={err}");
        return not_found();
    }
    error!("event=repo module=server status=error error={err}");
    internal_error()
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn html(body: String) -> Response<Full<Bytes>> {
    respond(StatusCode::OK, "text/html; charset=utf-8", body)
}

fn text(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    respond(status, "text/plain; charset=utf-8", format!("{message}\n"))
}

fn redirect(status: StatusCode, location: &str) -> Response<Full<Bytes>> {
    let Ok(value) = HeaderValue::from_str(location) else {
        error!("event=redirect module=server status=error location={location}");
        return internal_error();
    };
    let mut response = text(status, location);
    response.headers_mut().insert(header::LOCATION, value);
    response
}

fn unauthorized() -> Response<Full<Bytes>> {
    let mut response = text(StatusCode::UNAUTHORIZED, "Unauthorized");
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}

fn not_found() -> Response<Full<Bytes>> {
    text(StatusCode::NOT_FOUND, "404 page not found")
}

fn bad_request(message: &str) -> Response<Full<Bytes>> {
    text(StatusCode::BAD_REQUEST, message)
}

fn internal_error() -> Response<Full<Bytes>> {
    text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
