//! Page controllers. Each one owns its document and turns a user action into
//! a single API request.

use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::dom::Node;
use crate::messages::{invalid_data, message, Action};
use crate::transport::{ApiRequest, Flash, Transport};

pub mod account;
pub mod links;
pub mod login;
pub mod new_user;
pub mod signup;
pub mod users;

pub use account::AccountPage;
pub use links::{DeleteStrategy, LinksPage};
pub use login::LoginPage;
pub use new_user::NewUserPage;
pub use signup::SignupPage;
pub use users::{Permission, UsersPage};

pub const MANAGE_OUTPUT : &str = "manage-output";
pub const MANAGE_TABLE : &str = "manage-table";

pub trait Page {
    fn title(&self) -> &'static str;
    fn document(&self) -> &Node;
}

/// Asks before anything is deleted.
pub trait Confirm {
    fn confirm(&self, question : &str) -> bool;
}

impl<F : Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, question : &str) -> bool {
        (self)(question)
    }
}

pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _ : &str) -> bool {
        true
    }
}

/// How a form the server answers with a redirect turned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Accepted, the browser would now navigate here.
    Redirect(String),
    /// Nothing changed, the page's output element says why.
    Rejected,
}

impl FormOutcome {
    pub fn is_redirect(&self) -> bool {
        matches!(self, FormOutcome::Redirect(_))
    }
}

/// What one request came back with, already turned into display text.
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    pub ok :       bool,
    pub status :   Option<StatusCode>,
    pub location : Option<String>,
    pub flash :    Option<Flash>,
    pub message :  String,
}

pub(crate) async fn submit<T : Transport>(
    transport : &T,
    req : ApiRequest,
    action : Action,
) -> Reply {
    let path = req.path.clone();

    match transport.send(req).await {
        Ok(res) => {
            if !res.is_ok() {
                tracing::info!(%path, status = res.status.as_u16(), ?action, "request refused");
            }

            Reply {
                ok :       res.is_ok(),
                status :   Some(res.status),
                location : res.location,
                flash :    res.flash,
                message :  message(action, res.status).into_owned(),
            }
        },
        Err(err) => {
            tracing::warn!(%path, error = %err, "request failed");

            Reply {
                ok :       false,
                status :   None,
                location : None,
                flash :    None,
                message :  invalid_data(&err),
            }
        },
    }
}

/// Reads the answer to a redirecting form post, returning the outcome and
/// the text to show. A flash notice decides when there is one. Otherwise a
/// redirect (or a plain 200) is success, except a bare bounce to the login
/// page, which is how the server turns away a missing session.
pub(crate) fn landing(reply : Reply, action : Action) -> (FormOutcome, String) {
    if let Some(flash) = reply.flash {
        return if flash.is_success() {
            let to = reply.location.unwrap_or_else(|| "/".to_string());
            (FormOutcome::Redirect(to), flash.message)
        } else {
            (FormOutcome::Rejected, flash.message)
        };
    }

    let redirected = reply.status.map_or(false, |s| s.is_redirection());

    match reply.location {
        Some(to) if redirected && action != Action::Logout && to.ends_with("/login") => {
            (
                FormOutcome::Rejected,
                message(action, StatusCode::UNAUTHORIZED).into_owned(),
            )
        },
        Some(to) if redirected => (
            FormOutcome::Redirect(to),
            message(action, StatusCode::OK).into_owned(),
        ),
        _ if reply.ok => (
            FormOutcome::Redirect("/".to_string()),
            message(action, StatusCode::OK).into_owned(),
        ),
        _ => (FormOutcome::Rejected, reply.message),
    }
}

/// Fetches a JSON array. The error is the text shown in place of the table.
pub(crate) async fn fetch_list<T, R>(
    transport : &T,
    path : &str,
    action : Action,
) -> Result<Vec<R>, String>
where
    T : Transport,
    R : DeserializeOwned,
{
    let res = transport
        .send(ApiRequest::get(path))
        .await
        .map_err(|err| invalid_data(&err))?;

    if !res.is_ok() {
        return Err(message(action, res.status).into_owned());
    }

    res.json().map_err(|err| invalid_data(&err))
}

pub(crate) fn input_value(doc : &Node, id : &str) -> String {
    doc.find(id)
        .map(|el| el.value().to_string())
        .unwrap_or_default()
}

pub(crate) fn set_input(doc : &mut Node, id : &str, value : &str) {
    match doc.find_mut(id) {
        Some(el) => el.set_value(value),
        None => tracing::warn!(%id, "no such input"),
    }
}
