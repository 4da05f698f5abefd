use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("at least 2 philosophers are needed, got {0}")]
    TooFewPhilosophers(usize),

    #[error("failed to register signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("philosopher {0} panicked")]
    ActorPanicked(usize),

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
