use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Change notification stream closed")]
    StreamClosed,
}

pub type Result<T> = std::result::Result<T, WatchError>;
