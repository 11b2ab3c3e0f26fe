use derive_more::From;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
    CliUsage(String),

    // -- Configuration
    InvalidWorkerCount(usize),
    EmptyAlphabet,
    DuplicateSymbol(char),
    ZeroLength,
    CandidateTooLong {
        length: usize,
        max: usize,
    },
    KeyspaceOverflow {
        alphabet: usize,
        length: usize,
    },
    EmptyTargets,
    InvalidTarget(String),
    EmptyWordlist,

    // -- Search invariants
    PartitionGap {
        expected: u64,
        found: u64,
    },
    PartitionOutOfRange {
        worker: usize,
        end: u64,
        len: u64,
    },
    IndexOutOfRange {
        index: u64,
        len: u64,
    },
    MissingWorkers {
        expected: usize,
        reported: usize,
    },
    ReportChannelClosed,

    // -- Externals
    #[from]
    File(std::io::Error),

    #[from]
    Json(serde_json::Error),

    #[from]
    Fmt(std::fmt::Error),

    #[from]
    SystemTime(std::time::SystemTimeError),

    #[from]
    ThreadPool(rayon::ThreadPoolBuildError),

    #[from]
    Http(ureq::Error),
}

impl Error {
    /// Broken coordinator invariants, as opposed to bad input or I/O.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Error::PartitionGap { .. }
                | Error::PartitionOutOfRange { .. }
                | Error::IndexOutOfRange { .. }
                | Error::MissingWorkers { .. }
                | Error::ReportChannelClosed
        )
    }
}

// region:    --- Error Boilerplate

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate
