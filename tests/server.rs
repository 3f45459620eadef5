//! Drives the page controllers against a small in-process API server.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use hyper::service::{make_service_fn, service_fn};
use hyper::{header, Body, Method, Request, Response, Server, StatusCode};
use serde_json::json;

use linkr_admin::edit::{Click, RowEditState};
use linkr_admin::models::RowKey;
use linkr_admin::page::{
    AccountPage, AlwaysConfirm, FormOutcome, LinksPage, LoginPage, NewUserPage, Permission,
    SignupPage, UsersPage,
};
use linkr_admin::routes::Layout;
use linkr_admin::transport::{ApiRequest, HttpTransport, Transport};

const SESSION : &str = "session=s3cr3t";
const PASSWORD : &str = "pw";

#[derive(Default)]
struct State {
    links :   Vec<(i64, String, String)>,
    users :   Vec<(i64, String, bool, bool, bool)>,
    next_id : i64,
}

type Shared = Arc<Mutex<State>>;

fn respond(status : u16, body : impl Into<Body>) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(body.into())
        .unwrap()
}

fn authed(req : &Request<Body>) -> bool {
    req.headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.split("; ").any(|c| c == SESSION))
}

/// A redirect that leaves a flash notice behind, plus any extra cookies.
fn flash(location : &str, kind : &str, message : &str, cookies : &[&str]) -> Response<Body> {
    let value = format!("{}:{}{}", kind.len(), kind, message)
        .replace(':', "%3A")
        .replace(' ', "%20");

    let mut res = Response::builder()
        .status(303)
        .header(header::LOCATION, location)
        .header(header::SET_COOKIE, format!("_flash={}; Path=/", value));

    for cookie in cookies {
        res = res.header(header::SET_COOKIE, *cookie);
    }

    res.body(Body::empty()).unwrap()
}

const SESSION_COOKIE : &str = "session=s3cr3t; Path=/; HttpOnly";
const CLEARED : &str = "session=; Path=/; Max-Age=0";

async fn form(req : Request<Body>) -> HashMap<String, String> {
    let body = hyper::body::to_bytes(req.into_body()).await.unwrap();
    serde_urlencoded::from_bytes(&body).unwrap()
}

async fn handle(state : Shared, req : Request<Body>) -> Result<Response<Body>, Infallible> {
    let path = req.uri().path().to_string();

    if (req.method(), path.as_str()) == (&Method::POST, "/api/users/new/") {
        let admin = authed(&req);
        let fields = form(req).await;
        let mut state = state.lock().unwrap();

        if !admin && !state.users.is_empty() {
            return Ok(respond(401, ""));
        }

        let failure_to = if admin { "/new_user" } else { "/setup" };
        if state.users.iter().any(|u| u.1 == fields["username"]) {
            return Ok(flash(failure_to, "error", "Username already taken", &[]));
        }

        let flag = |name : &str| fields.get(name).map_or(false, |v| v == "true");
        state.next_id += 1;
        let id = state.next_id;
        state.users.push((
            id,
            fields["username"].clone(),
            flag("manage_links"),
            flag("manage_users"),
            false,
        ));

        let message = format!("Account created: {}", fields["username"]);
        return Ok(if admin {
            flash("/new_user", "success", &message, &[])
        } else {
            flash("/", "success", &message, &[SESSION_COOKIE])
        });
    }

    if (req.method(), path.as_str()) == (&Method::POST, "/api/users/login/") {
        let fields = form(req).await;
        let state = state.lock().unwrap();

        return Ok(match state.users.iter().find(|u| u.1 == fields["username"]) {
            Some(user) if user.4 => flash("/login", "error", "That user is disabled", &[]),
            Some(_) if fields["password"] == PASSWORD => {
                flash("/", "success", "Logged in", &[SESSION_COOKIE])
            },
            _ => flash("/login", "error", "Invalid username/password", &[]),
        });
    }

    if (req.method(), path.as_str()) == (&Method::GET, "/api/users/logout/") {
        return Ok(Response::builder()
            .status(303)
            .header(header::LOCATION, "/login")
            .header(header::SET_COOKIE, CLEARED)
            .body(Body::empty())
            .unwrap());
    }

    if !authed(&req) {
        return Ok(Response::builder()
            .status(303)
            .header(header::LOCATION, "/login")
            .body(Body::empty())
            .unwrap());
    }

    let res = match (req.method().clone(), path.as_str()) {
        (Method::GET, "/api/links/all/") => {
            let state = state.lock().unwrap();
            let links : Vec<_> = state
                .links
                .iter()
                .map(|(id, short, long)| json!({ "id": id, "short": short, "long": long }))
                .collect();
            respond(200, serde_json::to_vec(&links).unwrap())
        },
        (Method::GET, "/api/users/all/") => {
            let state = state.lock().unwrap();
            let users : Vec<_> = state
                .users
                .iter()
                .map(|(id, name, links, users, disabled)| {
                    json!({
                        "id": id,
                        "username": name,
                        "manage_links": links,
                        "manage_users": users,
                        "disabled": disabled,
                        "orig": *id == 1,
                    })
                })
                .collect();
            respond(200, serde_json::to_vec(&users).unwrap())
        },
        (Method::POST, "/api/links/") => {
            let fields = form(req).await;
            let mut state = state.lock().unwrap();

            if state.links.iter().any(|l| l.1 == fields["short"]) {
                respond(409, "")
            } else {
                state.next_id += 1;
                let id = state.next_id;
                state
                    .links
                    .push((id, fields["short"].clone(), fields["long"].clone()));
                respond(200, "")
            }
        },
        (Method::POST, "/api/links/delete/") => {
            let fields = form(req).await;
            let id : i64 = fields["id"].parse().unwrap();
            let mut state = state.lock().unwrap();
            let before = state.links.len();
            state.links.retain(|l| l.0 != id);

            if state.links.len() == before {
                respond(404, "")
            } else {
                respond(200, "")
            }
        },
        (Method::POST, "/api/links/update/") => {
            let fields = form(req).await;
            let id : i64 = fields["id"].parse().unwrap();
            let mut state = state.lock().unwrap();

            match state.links.iter_mut().find(|l| l.0 == id) {
                Some(link) => {
                    link.2 = fields["long"].clone();
                    respond(200, "")
                },
                None => respond(404, ""),
            }
        },
        (Method::POST, "/api/users/update/permissions") => {
            let fields = form(req).await;
            let id : i64 = fields["user_id"].parse().unwrap();

            if id == 1 {
                respond(405, "")
            } else {
                let mut state = state.lock().unwrap();
                match state.users.iter_mut().find(|u| u.0 == id) {
                    Some(user) => {
                        user.2 = fields["manage_links"] == "true";
                        user.3 = fields["manage_users"] == "true";
                        respond(200, "")
                    },
                    None => respond(404, ""),
                }
            }
        },
        (Method::POST, "/api/users/disable/") => {
            let fields = form(req).await;
            let id : i64 = fields["id"].parse().unwrap();
            let mut state = state.lock().unwrap();

            match state.users.iter_mut().find(|u| u.0 == id) {
                Some(_) if id == 1 => respond(405, ""),
                Some(user) => {
                    user.4 = true;
                    respond(200, "")
                },
                None => respond(404, ""),
            }
        },
        (Method::POST, "/api/users/update/password") => {
            let fields = form(req).await;

            if fields["current_pw"] != PASSWORD {
                flash("/manage_account", "error", "Incorrect current password", &[])
            } else {
                flash("/login", "success", "Password changed!", &[CLEARED])
            }
        },
        _ => respond(404, ""),
    };

    Ok(res)
}

async fn serve(state : State) -> (SocketAddr, Shared) {
    let state = Arc::new(Mutex::new(state));
    let shared = state.clone();

    let make_svc = make_service_fn(move |_| {
        let state = state.clone();
        async move { Ok::<_, Infallible>(service_fn(move |req| handle(state.clone(), req))) }
    });

    let server = Server::bind(&([127, 0, 0, 1], 0).into()).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);

    (addr, shared)
}

fn seeded() -> State {
    State {
        links :   vec![
            (1, "a".into(), "http://a.example".into()),
            (2, "b".into(), "http://b.example".into()),
        ],
        users :   vec![
            (1, "root".into(), true, true, false),
            (2, "bob".into(), false, false, false),
        ],
        next_id : 2,
    }
}

fn client(addr : SocketAddr) -> HttpTransport {
    HttpTransport::new(&format!("http://{}", addr))
        .unwrap()
        .with_session(SESSION)
        .unwrap()
}

#[tokio::test]
async fn missing_session_is_refused() {
    let (addr, _) = serve(seeded()).await;
    let transport = HttpTransport::new(&format!("http://{}", addr)).unwrap();

    let res = transport
        .send(ApiRequest::get("/api/links/all/"))
        .await
        .unwrap();
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location.as_deref(), Some("/login"));

    let mut page = LinksPage::new(transport, Layout::Current);
    page.load().await;
    assert!(page.keys().is_empty());
}

#[tokio::test]
async fn create_then_list() {
    let (addr, state) = serve(seeded()).await;
    let mut page = LinksPage::new(client(addr), Layout::Current);
    page.load().await;

    assert!(page.create("c", "http://c.example").await);
    assert_eq!(page.new_output(), "Shortcut created!");
    assert_eq!(page.keys(), vec![RowKey::Id(1), RowKey::Id(2), RowKey::Id(3)]);
    assert_eq!(state.lock().unwrap().links.len(), 3);

    assert!(!page.create("c", "http://other.example").await);
    assert_eq!(page.new_output(), "That short is already in use.");
}

#[tokio::test]
async fn delete_removes_the_row() {
    let (addr, state) = serve(seeded()).await;
    let mut page = LinksPage::new(client(addr), Layout::Current);
    page.load().await;

    assert!(page.delete(&RowKey::Id(1), &AlwaysConfirm).await);
    assert_eq!(page.manage_output(), "Shortcut deleted!");
    assert_eq!(page.keys(), vec![RowKey::Id(2)]);
    assert_eq!(state.lock().unwrap().links.len(), 1);

    assert!(!page.delete(&RowKey::Id(1), &AlwaysConfirm).await);
    assert_eq!(page.manage_output(), "That link does not exist.");
}

#[tokio::test]
async fn edit_and_save_a_link() {
    let (addr, state) = serve(seeded()).await;
    let mut page = LinksPage::new(client(addr), Layout::Current);
    page.load().await;

    let key = RowKey::Id(2);
    assert_matches!(page.press_update(&key).await, Some(Click::Began));
    assert!(page.type_long(&key, "http://new.example"));
    assert_matches!(page.press_update(&key).await, Some(Click::Save(long)) if long == "http://new.example");

    let row = page.row(&key).unwrap();
    assert_eq!(row.state(), RowEditState::Display);
    assert_eq!(row.value(), "http://new.example");
    assert_eq!(page.manage_output(), "Shortcut updated!");
    assert_eq!(state.lock().unwrap().links[1].2, "http://new.example");
}

#[tokio::test]
async fn signup_keeps_the_session() {
    let (addr, _) = serve(State::default()).await;
    let transport = HttpTransport::new(&format!("http://{}", addr)).unwrap();
    let mut signup = SignupPage::new(transport);

    assert_eq!(signup.signup("alice", "pw").await, FormOutcome::Redirect("/".into()));
    assert_eq!(signup.notice(), "Account created: alice");
    assert_eq!(signup.transport().session().await.as_deref(), Some(SESSION));

    let mut again = SignupPage::new(HttpTransport::new(&format!("http://{}", addr)).unwrap());
    assert_matches!(again.signup("bob", "pw").await, FormOutcome::Rejected);
    assert_eq!(again.error_text(), "An error has occurred (code 401).");
}

#[tokio::test]
async fn login_then_use_the_session() {
    let (addr, _) = serve(seeded()).await;
    let mut login = LoginPage::new(HttpTransport::new(&format!("http://{}", addr)).unwrap());

    assert_matches!(login.login("root", "wrong").await, FormOutcome::Rejected);
    assert_eq!(login.output(), "Invalid username/password");
    assert_eq!(login.transport().session().await, None);

    assert_eq!(login.login("root", PASSWORD).await, FormOutcome::Redirect("/".into()));
    assert_eq!(login.output(), "Logged in");

    let session = login.transport().session().await.unwrap();
    let transport = HttpTransport::new(&format!("http://{}", addr))
        .unwrap()
        .with_session(&session)
        .unwrap();
    let mut links = LinksPage::new(transport, Layout::Current);
    links.load().await;
    assert_eq!(links.keys().len(), 2);
}

#[tokio::test]
async fn logout_clears_the_jar() {
    let (addr, _) = serve(seeded()).await;
    let mut account = AccountPage::new(client(addr));

    assert_eq!(account.logout().await, FormOutcome::Redirect("/login".into()));
    assert_eq!(account.transport().session().await, None);

    assert_matches!(account.rename("robert").await, FormOutcome::Rejected);
    assert_eq!(account.output(), "Not logged in.");
}

#[tokio::test]
async fn password_change_ends_the_session() {
    let (addr, _) = serve(seeded()).await;
    let mut account = AccountPage::new(client(addr));

    assert_matches!(account.change_password("bad", "new").await, FormOutcome::Rejected);
    assert_eq!(account.output(), "Incorrect current password");
    assert!(account.transport().session().await.is_some());

    assert!(account.change_password(PASSWORD, "new").await.is_redirect());
    assert_eq!(account.output(), "Password changed!");
    assert_eq!(account.transport().session().await, None);
}

#[tokio::test]
async fn admin_creates_a_user_with_permissions() {
    let (addr, state) = serve(seeded()).await;
    let mut page = NewUserPage::new(client(addr));

    assert_eq!(
        page.create("carol", "pw", true, false).await,
        FormOutcome::Redirect("/new_user".into())
    );
    assert_eq!(page.output(), "Account created: carol");
    assert_eq!(state.lock().unwrap().users[2], (3, "carol".to_string(), true, false, false));

    assert_matches!(page.create("carol", "pw", false, false).await, FormOutcome::Rejected);
    assert_eq!(page.output(), "Username already taken");
}

#[tokio::test]
async fn primary_user_permissions_are_reverted() {
    let (addr, _) = serve(seeded()).await;
    let mut page = UsersPage::new(client(addr));
    page.load().await;

    assert!(!page.click_permission(1, Permission::ManageUsers).await);
    assert_eq!(page.permission(1, Permission::ManageUsers), Some(true));
    assert_eq!(page.manage_output(), "Cannot edit the primary user's permissions.");

    assert!(page.click_permission(2, Permission::ManageLinks).await);
    assert_eq!(page.permission(2, Permission::ManageLinks), Some(true));
    assert_eq!(page.manage_output(), "Permissions updated!");
}

#[tokio::test]
async fn disabling_a_user() {
    let (addr, state) = serve(seeded()).await;
    let mut page = UsersPage::new(client(addr));
    page.load().await;

    assert!(page.press_disable(2).await);
    assert_eq!(page.manage_output(), "User disabled!");
    assert!(state.lock().unwrap().users[1].4);

    assert!(!page.set_disabled(1, true).await);
    assert_eq!(page.manage_output(), "You cannot disable yourself here.");
}
