//! Command implementations and shared guards.

pub mod account;
pub mod dashboard;
pub mod exchange;
pub mod init;
pub mod notifications;
pub mod quiz;
pub mod results;
pub mod take;

use std::path::Path;

use anyhow::{bail, Context, Result};

use quizbuilder_core::model::{Role, Session};
use quizbuilder_store::Store;

pub fn open_store(data_dir: &Path) -> Store {
    Store::open(data_dir)
}

/// The signed-in session, or an instruction to sign in first.
pub fn require_session(store: &Store) -> Result<Session> {
    store
        .session()?
        .context("not signed in, run `quizbuilder login` first")
}

pub fn require_teacher(store: &Store) -> Result<Session> {
    let session = require_session(store)?;
    if session.role != Role::Teacher {
        bail!("this command is only available to teachers");
    }
    Ok(session)
}
