use std::fmt;

use quick_from::QuickFrom;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(QuickFrom, Debug)]
pub enum Error {
    InvalidBaseUrl(String),
    InvalidCookie(String),

    #[quick_from]
    Url(url::ParseError),

    #[quick_from]
    Http(http::Error),

    #[quick_from]
    Hyper(hyper::Error),

    #[quick_from]
    Json(serde_json::Error),

    #[quick_from]
    Form(serde_urlencoded::ser::Error),

    #[quick_from]
    Template(handlebars::TemplateError),

    #[quick_from]
    Render(handlebars::RenderError),

    #[quick_from]
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            InvalidBaseUrl(s) => write!(f, "invalid base url: {}", s),
            InvalidCookie(s) => write!(f, "invalid session cookie: {}", s),
            Url(err) => write!(f, "{}", err),
            Http(err) => write!(f, "{}", err),
            Hyper(err) => write!(f, "{}", err),
            Json(err) => write!(f, "{}", err),
            Form(err) => write!(f, "{}", err),
            Template(err) => write!(f, "{}", err),
            Render(err) => write!(f, "{}", err),
            Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}
