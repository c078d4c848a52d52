use std::fmt::{Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    IOError(std::io::Error),
    JSONError(serde_json::Error),
    WindowError(three_d::WindowError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IOError(err) => write!(f, "I/O error: {}", err),
            Error::JSONError(err) => write!(f, "invalid settings: {}", err),
            Error::WindowError(err) => write!(f, "window error: {:?}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IOError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JSONError(err)
    }
}

impl From<three_d::WindowError> for Error {
    fn from(err: three_d::WindowError) -> Error {
        Error::WindowError(err)
    }
}
