//! JobJet command-line client
//!
//! Drives the screen sessions against an in-memory store seeded with demo
//! data and prints each screen's state as JSON.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jobjet_client::common::JobId;
use jobjet_client::domains::auth::LoginEvent;
use jobjet_client::domains::chat::ChatEvent;
use jobjet_client::domains::jobs::{JobBoardEvent, JobPostEvent, JobPostField, JobType};
use jobjet_client::domains::profile::ProfileEvent;
use jobjet_client::kernel::{ClientKernel, MemoryStore};
use jobjet_client::Config;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use viewstate::{Session, Snapshot};

const WAIT: Duration = Duration::from_secs(5);
const DEMO_SEEKER_EMAIL: &str = "sam@jobjet.dev";

#[derive(Parser)]
#[command(name = "jobjet")]
#[command(about = "JobJet client: browse jobs, chat, and manage your profile")]
struct Cli {
    /// Sign in as this user instead of JOBJET_EMAIL
    #[arg(long, global = true)]
    email: Option<String>,

    /// Password for --email
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs, optionally searched and filtered by type
    Jobs {
        #[arg(long)]
        query: Option<String>,
        /// FULL_TIME, PART_TIME, CONTRACT or FREELANCE
        #[arg(long = "type")]
        job_type: Option<String>,
    },

    /// Show one job
    Job { id: String },

    /// Post a job (employers)
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        salary: String,
        #[arg(long = "requirement")]
        requirements: Vec<String>,
        #[arg(long = "type", default_value = "FULL_TIME")]
        job_type: String,
    },

    /// List chat rooms, open one, and optionally send a message
    Chat {
        /// Index into the room list
        #[arg(long)]
        room: Option<usize>,
        #[arg(long)]
        send: Option<String>,
    },

    /// Show the profile, optionally renaming it
    Profile {
        #[arg(long)]
        name: Option<String>,
    },
}

/// Wait until `done` holds for the session state, failing on a surfaced error.
async fn wait_until<S, F>(session: &S, mut done: F) -> Result<Snapshot<S::State>>
where
    S: Session,
    S::State: Debug,
    F: FnMut(&Snapshot<S::State>) -> bool,
{
    let mut rx = session.state();
    let state = tokio::time::timeout(WAIT, async {
        rx.wait_for(|s| s.error.is_some() || done(s))
            .await
            .map(|s| s.clone())
    })
    .await
    .context("timed out waiting for the session")?
    .context("session closed")?;

    if let Some(error) = &state.error {
        anyhow::bail!("{}", error);
    }
    Ok(state)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn sign_in(kernel: &ClientKernel, email: String, password: String) -> Result<()> {
    let login = kernel.login();
    login.dispatch(LoginEvent::UpdateEmail(email));
    login.dispatch(LoginEvent::UpdatePassword(password));
    login.dispatch(LoginEvent::Submit);
    wait_until(&login, |s| s.data.signed_in)
        .await
        .context("sign-in failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = Arc::new(MemoryStore::new());
    if config.seed_demo {
        store.seed_demo(DEMO_SEEKER_EMAIL, &config.password).await;
    }
    let kernel = ClientKernel::new(store);

    sign_in(
        &kernel,
        cli.email.unwrap_or(config.email),
        cli.password.unwrap_or(config.password),
    )
    .await?;

    match cli.command {
        Commands::Jobs { query, job_type } => {
            let board = kernel.job_board();
            if let Some(query) = query {
                board.dispatch(JobBoardEvent::Search(query));
            }
            if let Some(job_type) = job_type {
                board.dispatch(JobBoardEvent::FilterByType(Some(job_type.parse()?)));
            }
            let state = wait_until(&board, |s| !s.loading).await?;
            print_json(&state)?;
        }
        Commands::Job { id } => {
            let job_id = JobId::parse(&id).ok();
            let detail = kernel.job_detail(job_id);
            let state = wait_until(&detail, |s| s.data.job.is_some()).await?;
            print_json(&state)?;
        }
        Commands::Post {
            title,
            company,
            description,
            location,
            salary,
            requirements,
            job_type,
        } => {
            let job_type: JobType = job_type.parse()?;
            let post = kernel.job_post();
            for (field, value) in [
                (JobPostField::Title, title),
                (JobPostField::Company, company),
                (JobPostField::Description, description),
                (JobPostField::Location, location),
                (JobPostField::Salary, salary),
                (JobPostField::Requirements, requirements.join("\n")),
            ] {
                post.dispatch(JobPostEvent::Edit(field, value));
            }
            post.dispatch(JobPostEvent::SelectType(job_type));
            post.dispatch(JobPostEvent::Submit);
            let state = wait_until(&post, |s| s.data.posted).await?;
            print_json(&state)?;
        }
        Commands::Chat { room, send } => {
            let chat = kernel.chat();
            let state = wait_until(&chat, |s| !s.loading).await?;

            let Some(index) = room else {
                print_json(&state.data.rooms)?;
                return Ok(());
            };
            let selected = state
                .data
                .rooms
                .get(index)
                .cloned()
                .with_context(|| format!("no chat room at index {}", index))?;

            chat.dispatch(ChatEvent::SelectRoom(selected));
            let mut state = wait_until(&chat, |s| !s.loading).await?;

            if let Some(text) = send {
                chat.dispatch(ChatEvent::UpdateDraft(text.clone()));
                chat.dispatch(ChatEvent::SendMessage);
                state = wait_until(&chat, |s| {
                    !s.data.sending && s.data.messages.iter().any(|m| m.content == text.trim())
                })
                .await?;
            }
            print_json(&state)?;
        }
        Commands::Profile { name } => {
            let profile = kernel.profile();
            let mut state = wait_until(&profile, |s| !s.loading).await?;

            if let Some(name) = name {
                profile.dispatch(ProfileEvent::ToggleEditMode(true));
                profile.dispatch(ProfileEvent::UpdateName(name));
                profile.dispatch(ProfileEvent::SaveProfile);
                state = wait_until(&profile, |s| !s.loading && !s.data.editing).await?;
            }
            print_json(&state)?;
        }
    }

    Ok(())
}
