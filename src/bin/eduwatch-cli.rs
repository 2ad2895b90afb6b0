use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use time::OffsetDateTime;

use eduwatch::api::{ApiClient, Video};
use eduwatch::filters::{self, SortMode};
use eduwatch::forms::{EditForm, UploadForm};
use eduwatch::identity::{Identity, author_label};
use eduwatch::logging;
use eduwatch::player::CommentThread;
use eduwatch::prefs::PrefsStore;
use eduwatch::ui::utils::format_time_ago;

#[derive(Parser, Debug)]
#[command(about = "Drive the EduWatch API from the terminal")]
struct Args {
    /// API base URL (overrides EDUWATCH_API_BASE and prefs)
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Act as this user id instead of the saved identity
    #[arg(long, value_name = "ID", global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save an identity the same way the splash screen does
    Login { first: String, last: String },
    /// Forget the saved identity
    Logout,
    /// Print the active identity
    Whoami,
    /// List your videos
    List {
        #[arg(long, default_value = "")]
        query: String,
        /// newest, oldest or title
        #[arg(long, default_value_t = SortMode::Newest)]
        sort: SortMode,
    },
    /// Show one video
    Show { video_id: String },
    /// Create a video
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        url: String,
    },
    /// Change a video's title and/or description
    Edit {
        video_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List comments on a video
    Comments { video_id: String },
    /// Post a comment on a video
    Comment { video_id: String, content: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let store = PrefsStore::default_location().context("locating prefs file")?;
    let prefs = store.load();
    let base_url = args.base_url.clone().unwrap_or_else(|| prefs.api_base_url());
    let client = ApiClient::new(base_url);
    let identity = match args.user.as_deref() {
        Some(raw) => Identity::from_stored(raw),
        None => prefs.identity(),
    };

    match args.command {
        Command::Login { first, last } => {
            let identity = Identity::from_name(&first, &last)?;
            let saved = store
                .remember_identity(&identity)
                .with_context(|| format!("writing {}", store.path().display()))?;
            match saved.identity() {
                Some(current) if current != identity => {
                    println!("Already signed in as {current}; run logout first.");
                }
                _ => println!("Signed in as {identity}"),
            }
        }
        Command::Logout => {
            store.clear().context("removing prefs file")?;
            println!("Signed out.");
        }
        Command::Whoami => match identity {
            Some(identity) => println!("{} ({identity})", identity.display_name()),
            None => println!("Not signed in."),
        },
        Command::List { query, sort } => {
            let identity = require_identity(identity)?;
            let videos = client
                .list_user_videos(identity.as_str())
                .await
                .context("loading videos")?;
            let visible = filters::apply_view(&videos, &query, sort);
            if visible.is_empty() {
                println!("No videos found.");
            }
            let now = OffsetDateTime::now_utc();
            for video in &visible {
                println!(
                    "{:<12} {:<40} {}",
                    video.id,
                    video.title,
                    format_time_ago(&video.created_at, now)
                );
            }
        }
        Command::Show { video_id } => {
            let video = client
                .get_video(&video_id)
                .await
                .with_context(|| format!("loading video {video_id}"))?;
            print_video(&video);
        }
        Command::Upload {
            title,
            description,
            url,
        } => {
            let identity = require_identity(identity)?;
            let form = UploadForm {
                title,
                description,
                video_url: url,
                ..Default::default()
            };
            let payload = form.validate(&identity)?;
            client
                .create_video(&payload)
                .await
                .context("uploading video")?;
            println!("Video uploaded successfully!");
        }
        Command::Edit {
            video_id,
            title,
            description,
        } => {
            let video = client
                .get_video(&video_id)
                .await
                .with_context(|| format!("loading video {video_id}"))?;
            let mut form = EditForm::new(&video);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            let update = form.validate()?;
            client
                .update_video(&update)
                .await
                .context("updating video")?;
            println!("Video updated successfully!");
        }
        Command::Comments { video_id } => {
            let comments = client
                .list_comments(&video_id)
                .await
                .with_context(|| format!("loading comments for {video_id}"))?;
            let now = OffsetDateTime::now_utc();
            for comment in &comments {
                println!(
                    "{} ({}): {}",
                    author_label(comment.user_id.as_deref()),
                    format_time_ago(&comment.created_at, now),
                    comment.content
                );
            }
            if comments.is_empty() {
                println!("No comments yet.");
            }
        }
        Command::Comment { video_id, content } => {
            let identity = require_identity(identity)?;
            let mut thread = CommentThread::default();
            thread.begin_load(&video_id);
            thread.draft = content;
            let pending = thread.begin_submit(&identity, OffsetDateTime::now_utc())?;
            client
                .create_comment(&pending.request)
                .await
                .context("posting comment")?;
            println!("Comment added!");
        }
    }

    Ok(())
}

fn require_identity(identity: Option<Identity>) -> anyhow::Result<Identity> {
    identity.ok_or_else(|| anyhow!("no identity saved; run `login <first> <last>` or pass --user"))
}

fn print_video(video: &Video) {
    println!("{}", video.title);
    println!("  id:          {}", video.id);
    println!("  owner:       {}", video.user_id);
    println!("  url:         {}", video.video_url);
    if let Some(thumb) = video.thumbnail() {
        println!("  thumbnail:   {thumb}");
    }
    println!("  created:     {}", video.created_at);
    if video.description.trim().is_empty() {
        return;
    }
    println!();
    println!("{}", video.description);
}
