//! Account and session commands.

use anyhow::{bail, Result};
use uuid::Uuid;

use quizbuilder_core::model::{Role, Session, User};
use quizbuilder_store::Store;

pub fn register(
    store: &Store,
    name: String,
    email: String,
    password: String,
    role: &str,
) -> Result<()> {
    let role: Role = role.parse().map_err(|e: String| anyhow::anyhow!("{e}"))?;

    let mut users = store.users()?;
    if users.iter().any(|user| user.email == email) {
        bail!("an account with email {email} already exists");
    }

    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password,
        role,
    };
    users.push(user.clone());
    store.save_users(&users)?;
    store.set_session(&Session::for_user(&user))?;

    println!("Registered {} as {} and signed in", user.email, user.role);
    Ok(())
}

pub fn login(store: &Store, email: &str, password: &str, token: Option<String>) -> Result<()> {
    let users = store.users()?;
    let Some(user) = users
        .iter()
        .find(|user| user.email == email && user.password == password)
    else {
        bail!("invalid email or password");
    };

    let mut session = Session::for_user(user);
    session.token = token;
    store.set_session(&session)?;

    println!("Signed in as {} ({})", session.name, session.role);
    Ok(())
}

pub fn logout(store: &Store) -> Result<()> {
    store.clear_session()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(store: &Store) -> Result<()> {
    match store.session()? {
        Some(session) => println!("{} <{}> ({})", session.name, session.email, session.role),
        None => println!("Not signed in"),
    }
    Ok(())
}
