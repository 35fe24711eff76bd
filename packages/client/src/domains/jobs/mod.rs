//! Jobs domain - the job board, job details, and posting new jobs.

pub mod board;
pub mod detail;
pub mod models;
pub mod post;

pub use board::{JobBoardEvent, JobBoardSession, JobBoardState};
pub use detail::{JobDetailEvent, JobDetailSession, JobDetailState};
pub use models::*;
pub use post::{JobPostEvent, JobPostField, JobPostSession, JobPostState};
