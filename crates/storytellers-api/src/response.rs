//! Exit classes of a gateway request.

use axum::Json;
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storytellers_core::identity::{StoryId, UserId};
use storytellers_core::notice::{Notice, Reply};

/// A safe page to send the caller to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// The home page.
    Home,
    /// The login page.
    Login,
    /// The user list.
    Users,
    /// A user's wall.
    Wall(UserId),
    /// The story list.
    Stories,
    /// A single story.
    Story(StoryId),
    /// The caller's drafts.
    Drafts,
    /// First step of the authoring flow.
    RollStep,
    /// The editor.
    Compose,
}

impl RedirectTarget {
    /// The gateway path of this target.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login => "/login".into(),
            Self::Users => "/users".into(),
            Self::Wall(user_id) => format!("/users/{user_id}"),
            Self::Stories => "/stories".into(),
            Self::Story(story_id) => format!("/stories/{story_id}"),
            Self::Drafts => "/stories/drafts".into(),
            Self::RollStep => "/stories/new/settings".into(),
            Self::Compose => "/stories/new/write".into(),
        }
    }
}

/// A successful gateway answer.
#[derive(Debug)]
pub enum GatewayResponse<T> {
    /// A view with the notices produced while building it.
    Rendered {
        /// The view.
        view: T,
        /// Notices to display.
        notices: Vec<Notice>,
    },
    /// Send the caller elsewhere.
    RedirectTo {
        /// Where to go.
        target: RedirectTarget,
        /// Why.
        reason: String,
        /// Notices to display on arrival.
        notices: Vec<Notice>,
    },
}

impl<T> GatewayResponse<T> {
    /// Renders a view without notices.
    pub fn rendered(view: T) -> Self {
        Self::Rendered {
            view,
            notices: Vec::new(),
        }
    }

    /// Redirects with a reason.
    pub fn redirect(target: RedirectTarget, reason: impl Into<String>, notices: Vec<Notice>) -> Self {
        Self::RedirectTo {
            target,
            reason: reason.into(),
            notices,
        }
    }
}

impl<T> From<Reply<T>> for GatewayResponse<T> {
    fn from(reply: Reply<T>) -> Self {
        Self::Rendered {
            view: reply.value,
            notices: reply.notices,
        }
    }
}

#[derive(Serialize)]
struct RenderedBody<T> {
    view: T,
    notices: Vec<Notice>,
}

#[derive(Serialize)]
struct RedirectBody {
    redirect: String,
    reason: String,
    notices: Vec<Notice>,
}

/// A 303 pointing at `location`, with `body` as JSON.
pub(crate) fn see_other<B: Serialize>(location: &str, body: B) -> Response {
    let mut response = (StatusCode::SEE_OTHER, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}

impl<T: Serialize> IntoResponse for GatewayResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Rendered { view, notices } => {
                (StatusCode::OK, Json(RenderedBody { view, notices })).into_response()
            }
            Self::RedirectTo {
                target,
                reason,
                notices,
            } => {
                let location = target.path();
                see_other(
                    &location,
                    RedirectBody {
                        redirect: location.clone(),
                        reason,
                        notices,
                    },
                )
            }
        }
    }
}
