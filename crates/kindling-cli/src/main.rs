use anyhow::Context;
use clap::{Parser, Subcommand};

use kindling_client::{ApiClient, Session, Story, StoryDraft, User};

/// Public instance the client talks to unless overridden.
const DEFAULT_API_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";

#[derive(Parser)]
#[command(name = "kindling", about = "Submit and favorite news stories from the terminal")]
struct Cli {
    /// API base URL; falls back to KINDLING_API_URL, then the public
    /// instance.
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the story feed, newest first
    Stories,
    /// Create an account and print its session token
    Signup { username: String, name: String },
    /// Log in and print a session token for KINDLING_TOKEN
    Login { username: String },
    /// Show the current profile, favorites, and submissions
    Profile,
    /// Submit a new story
    Submit {
        title: String,
        author: String,
        url: String,
    },
    /// Delete one of your stories
    Delete { story_id: String },
    /// Flip a story's favorite star
    Fav { story_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kindling=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let base = cli
        .api_url
        .or_else(|| std::env::var("KINDLING_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.into());
    let base_url =
        url::Url::parse(&base).with_context(|| format!("invalid API base URL: {base}"))?;
    let client = ApiClient::new(base_url)?;

    match cli.command {
        Command::Stories => {
            let session = Session::start(client).await?;
            if session.stories().is_empty() {
                println!("no stories yet");
            }
            for story in session.stories() {
                println!("{}", story_line(story));
            }
        }
        Command::Signup { username, name } => {
            let password = password_from_env()?;
            let user = User::signup(&client, &username, &password, &name).await?;
            print_token_hint(&user);
        }
        Command::Login { username } => {
            let password = password_from_env()?;
            let user = User::login(&client, &username, &password).await?;
            print_token_hint(&user);
        }
        Command::Profile => {
            let session = restored_session(client).await?;
            let user = session.current_user().expect("restored session has a user");
            println!("{} ({}), joined {}", user.name, user.username, user.created_at.date_naive());
            println!("favorites:");
            for story in &user.favorites {
                println!("  {}", story_line(story));
            }
            println!("submissions:");
            for story in &user.own_stories {
                println!("  {}", story_line(story));
            }
        }
        Command::Submit { title, author, url } => {
            let mut session = restored_session(client).await?;
            let story = session
                .submit_story(StoryDraft { title, author, url })
                .await?;
            println!("submitted {}", story_line(&story));
        }
        Command::Delete { story_id } => {
            let mut session = restored_session(client).await?;
            session.delete_story(&story_id).await?;
            println!("deleted {story_id}");
        }
        Command::Fav { story_id } => {
            let mut session = restored_session(client).await?;
            if session.toggle_favorite(&story_id).await? {
                println!("favorited {story_id}");
            } else {
                println!("unfavorited {story_id}");
            }
        }
    }

    Ok(())
}

/// Build a session from KINDLING_TOKEN / KINDLING_USERNAME, refusing to
/// continue if the stored credentials are no longer honored.
async fn restored_session(client: ApiClient) -> anyhow::Result<Session> {
    let token = std::env::var("KINDLING_TOKEN")
        .context("KINDLING_TOKEN is not set; run `kindling login` first")?;
    let username =
        std::env::var("KINDLING_USERNAME").context("KINDLING_USERNAME is not set")?;
    let session = Session::restore(client, &token, &username).await?;
    if !session.is_authenticated() {
        anyhow::bail!("stored credentials were rejected; run `kindling login` again");
    }
    Ok(session)
}

fn password_from_env() -> anyhow::Result<String> {
    std::env::var("KINDLING_PASSWORD").context("KINDLING_PASSWORD is not set")
}

fn print_token_hint(user: &User) {
    println!("logged in as {}", user.username);
    println!("export KINDLING_TOKEN={}", user.token());
    println!("export KINDLING_USERNAME={}", user.username);
}

fn story_line(story: &Story) -> String {
    let host = story
        .host_name()
        .unwrap_or_else(|_| story.url.clone());
    format!(
        "[{}] {} ({}) by {} — posted by {}",
        story.story_id, story.title, host, story.author, story.username
    )
}
