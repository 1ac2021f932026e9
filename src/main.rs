use anyhow::{anyhow, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spinsocial::app::spin::RandomWheel;
use spinsocial::config::AppConfig;
use spinsocial::domain::user::ImageSlot;
use spinsocial::infra::device::FixedImagePicker;
use spinsocial::AppState;

const USAGE: &str = "usage: spinsocial <command> [args]

commands:
  users                        list registered users
  search <query>               search users by username or handle
  login <user|email> <pass>    start a session
  logout                       end the session
  whoami                       show the session user
  post <text>                  publish a post as the session user
  posts [user_id]              list posts (default: session user)
  like <post_id>               toggle a like as the session user
  set-avatar <uri>             use the image at <uri> as the profile picture
  spin                         spin the wheel and keep the winner
  spin-bin                     list won posts
  clear-spin-bin               empty the spin bin
  keys                         list stored document keys";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::open(&config).await?;
    tracing::debug!(backend = ?config.store_backend, path = %config.store_path.display(), "store opened");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");
    let rest = &args[args.len().min(1)..];

    match command {
        "users" => print_json(&state.users().list_users().await?)?,
        "search" => {
            let query = rest.join(" ");
            print_json(&state.search().search_users(&query).await?)?;
        }
        "login" => {
            let [identifier, password] = rest else {
                return Err(anyhow!("login takes <user|email> <password>"));
            };
            let session = state.auth().login(identifier, password).await?;
            println!("Welcome, {}", session.user.username);
        }
        "logout" => state.auth().logout().await?,
        "whoami" => match state.auth().current_session().await? {
            Some(session) => print_json(&session.user)?,
            None => println!("not logged in"),
        },
        "post" => {
            let session = state.auth().require_session("post").await?;
            let posts = state.posts();
            let mut draft = posts.draft();
            if !draft.set_content(&rest.join(" ")) {
                return Err(anyhow!(
                    "post is longer than {} characters",
                    state.post_max_chars
                ));
            }
            print_json(&posts.create_post(&session, &mut draft).await?)?;
        }
        "posts" => {
            let user_id = match rest.first() {
                Some(id) => id.clone(),
                None => state.auth().require_session("list your posts").await?.user.id,
            };
            print_json(&state.posts().list_by_user(&user_id).await?)?;
        }
        "like" => {
            let [post_id] = rest else {
                return Err(anyhow!("like takes <post_id>"));
            };
            let session = state.auth().require_session("like posts").await?;
            print_json(&state.engagement().toggle_like(&session, post_id).await?)?;
        }
        "set-avatar" => {
            let [uri] = rest else {
                return Err(anyhow!("set-avatar takes <uri>"));
            };
            let session = state.auth().require_session("change your picture").await?;
            let users = state
                .clone()
                .with_image_picker(Arc::new(FixedImagePicker::selecting(uri.as_str())))
                .users();
            if let Some(session) = users.pick_image(&session, ImageSlot::Profile).await? {
                print_json(&session.user)?;
            }
        }
        "spin" => {
            let session = state.auth().require_session("spin").await?;
            match state.spin().spin(&session, &RandomWheel).await? {
                Some(entry) => print_json(&entry)?,
                None => println!("nothing to spin: no posts from you or your friends"),
            }
        }
        "spin-bin" => print_json(&state.spin().list().await?)?,
        "clear-spin-bin" => state.spin().clear().await?,
        "keys" => {
            for key in state.store.keys().await? {
                println!("{}", key);
            }
        }
        "help" | "-h" | "--help" => println!("{}", USAGE),
        other => return Err(anyhow!("unknown command: {}\n\n{}", other, USAGE)),
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
