//! NexStep CLI - command-line front end for the NexStep career-roadmap client.
//!
//! Each invocation restores the persisted session and onboarding selection,
//! runs one command against the store and the cached API, and exits.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nexstep_core::api::{ApiClient, Backend, CachedApi};
use nexstep_core::cache::{CacheManager, SWEEP_INTERVAL};
use nexstep_core::config::Config;
use nexstep_core::models::{
    DashboardStats, Progress, ProgressStatus, SkillLevel, ToastKind, DEFAULT_TOAST_DURATION,
};
use nexstep_core::storage::FileStorage;
use nexstep_core::store::Store;

// ============================================================================
// Constants
// ============================================================================

/// Activities shown when no limit is given
const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

const USAGE: &str = "\
Usage: nexstep <command> [args]

Commands:
  status                      Show session, selection and progress
  login <email> <password>    Sign in and persist the session
  logout                      Sign out and forget the session
  goals [--refresh]           List available goals
  select <goal-id> <level>    Pick a goal and skill level (beginner|intermediate|advanced)
  start                       Start a roadmap for the selected goal
  stats [--refresh]           Show dashboard statistics
  activities [limit]          Show recent activity
  profile [--refresh]         Show the signed-in profile
  rename <name>               Change the profile display name
  progress [<roadmap-id> <percent>]
                              Show progress, or record progress for a roadmap";

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr, and additionally to a daily rolling file when a log
/// directory is configured. The returned guard must be held until exit.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "nexstep.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Everything a command needs, wired from the configuration.
struct Cli {
    config: Config,
    client: ApiClient,
    store: Store,
    api: CachedApi,
}

impl Cli {
    fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(config.api_url(), config.timeout())?;
        let backend: Arc<dyn Backend> = Arc::new(client.clone());

        let storage_dir = config.storage_dir()?;
        let storage = FileStorage::new(storage_dir.clone())
            .with_context(|| format!("Could not open storage at {}", storage_dir.display()))?;
        let store = Store::new(backend.clone(), Arc::new(storage));

        let cache = CacheManager::new();
        cache.spawn_sweeper(SWEEP_INTERVAL);
        let api = CachedApi::new(backend, cache);

        store.restore();
        client.set_token(store.state().token().map(str::to_string));

        Ok(Self {
            config,
            client,
            store,
            api,
        })
    }

    fn require_login(&self) -> Result<()> {
        if !self.store.is_authenticated() {
            bail!("Not logged in. Run `nexstep login <email> <password>` first.");
        }
        Ok(())
    }

    /// Print and dismiss any toasts raised by the command.
    fn flush_toasts(&self) {
        for toast in self.store.state().toasts {
            let label = match toast.kind {
                ToastKind::Success => "ok",
                ToastKind::Error => "error",
                ToastKind::Warning => "warning",
                ToastKind::Info => "info",
            };
            eprintln!("[{}] {}", label, toast.message);
            self.store.dismiss_toast(&toast.id);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let _log_guard = init_tracing(config.log_dir.as_deref());
    info!("NexStep CLI starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[1..];
    let refresh = rest.iter().any(|a| a == "--refresh");

    let mut ctx = Cli::new(config)?;
    let result = match command.as_str() {
        "status" => status(&ctx),
        "login" => login(&mut ctx, rest).await,
        "logout" => logout(&ctx),
        "goals" => goals(&ctx, refresh).await,
        "select" => select(&ctx, rest).await,
        "start" => start(&ctx).await,
        "stats" => stats(&ctx, refresh).await,
        "activities" => activities(&ctx, rest).await,
        "profile" => profile(&ctx, refresh).await,
        "rename" => rename(&ctx, rest).await,
        "progress" => progress(&ctx, rest),
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => Err(anyhow!("Unknown command: {}\n\n{}", other, USAGE)),
    };

    ctx.flush_toasts();
    result
}

// ============================================================================
// Commands
// ============================================================================

fn status(ctx: &Cli) -> Result<()> {
    let state = ctx.store.state();
    match state.user() {
        Some(user) => println!("Logged in as {} <{}> ({:?})", user.name, user.email, user.role),
        None => println!("Not logged in"),
    }
    println!("Backend: {}", ctx.client.base_url());

    if let Some(goal) = &state.selected_goal {
        println!("Selected goal: {} ({})", goal.title, goal.id);
        println!("  Requires: {}", goal.required_difficulty.display_name());
    }
    if let Some(level) = state.selected_skill_level {
        println!("Skill level: {}", level.display_name());
    }

    if state.user_progress.is_empty() {
        println!("No roadmap progress recorded");
    } else {
        for (roadmap_id, progress) in &state.user_progress {
            println!("  {}: {:.0}% ({:?})", roadmap_id, progress.overall_progress, progress.status);
        }
    }
    Ok(())
}

async fn login(ctx: &mut Cli, args: &[String]) -> Result<()> {
    let (email, password) = match args {
        [email, password, ..] => (email.as_str(), password.as_str()),
        [password] => {
            let email = ctx
                .config
                .last_email
                .clone()
                .ok_or_else(|| anyhow!("Usage: nexstep login <email> <password>"))?;
            return login_as(ctx, &email, password).await;
        }
        _ => bail!("Usage: nexstep login <email> <password>"),
    };
    login_as(ctx, email, password).await
}

async fn login_as(ctx: &mut Cli, email: &str, password: &str) -> Result<()> {
    let session = match ctx.client.login(email, password).await {
        Ok(session) => session,
        Err(e) => {
            ctx.store
                .show_toast(ToastKind::Error, e.user_message("Login failed"), DEFAULT_TOAST_DURATION);
            return Err(e.into());
        }
    };

    ctx.client.set_token(Some(session.token.clone()));
    ctx.api.clear();
    ctx.store.login(session.user, session.token);

    ctx.config.last_email = Some(email.to_string());
    if let Err(e) = ctx.config.save() {
        tracing::warn!(error = %e, "Failed to save config");
    }

    ctx.store.show_toast(ToastKind::Success, "Logged in", DEFAULT_TOAST_DURATION);
    Ok(())
}

fn logout(ctx: &Cli) -> Result<()> {
    ctx.store.logout();
    ctx.client.set_token(None);
    ctx.api.clear();
    ctx.store.show_toast(ToastKind::Info, "Logged out", DEFAULT_TOAST_DURATION);
    Ok(())
}

async fn goals(ctx: &Cli, refresh: bool) -> Result<()> {
    let goals = ctx.api.goals(refresh).await?;
    if goals.stale {
        eprintln!("(showing cached goals; backend unavailable)");
    }
    for goal in &goals.data {
        println!("{:<24} {:<32} {}", goal.id, goal.title, goal.required_difficulty.display_name());
    }
    Ok(())
}

async fn select(ctx: &Cli, args: &[String]) -> Result<()> {
    let [goal_id, level, ..] = args else {
        bail!("Usage: nexstep select <goal-id> <beginner|intermediate|advanced>");
    };
    let level: SkillLevel = level.parse().map_err(|e: String| anyhow!(e))?;

    let goal = ctx.client.fetch_goal(goal_id).await?;
    ctx.store.select_goal(goal);
    ctx.store.select_skill_level(level);

    if let Some(validation) = ctx.store.validate_skill_level(level) {
        let kind = if validation.is_success() {
            ToastKind::Success
        } else {
            ToastKind::Warning
        };
        ctx.store.show_toast(kind, validation.text, DEFAULT_TOAST_DURATION);
    }
    Ok(())
}

async fn start(ctx: &Cli) -> Result<()> {
    ctx.require_login()?;
    let state = ctx.store.state();
    let (Some(goal), Some(level)) = (state.selected_goal, state.selected_skill_level) else {
        bail!("Select a goal and skill level first: nexstep select <goal-id> <level>");
    };

    ctx.store.open_roadmap_modal();
    match ctx.store.start_roadmap(&goal.id, level).await {
        Ok(started) => {
            ctx.api.cache().invalidate_pattern("^dashboard_");
            ctx.store.show_toast(
                ToastKind::Success,
                format!("Started roadmap for {}", goal.title),
                DEFAULT_TOAST_DURATION,
            );
            println!("{}", serde_json::to_string_pretty(&started.roadmap)?);
            Ok(())
        }
        Err(e) => {
            let message = ctx.store.state().error.unwrap_or_else(|| e.to_string());
            ctx.store.show_toast(ToastKind::Error, message, Duration::ZERO);
            Err(e.into())
        }
    }
}

async fn stats(ctx: &Cli, refresh: bool) -> Result<()> {
    ctx.require_login()?;
    let stats = ctx.api.dashboard_stats(refresh).await?;
    if stats.stale {
        eprintln!("(showing cached stats; backend unavailable)");
    }
    print!("{}", format_stats(&stats.data));
    if let Some(age) = ctx.api.dashboard_age() {
        println!("Updated:      {}", age);
    }
    Ok(())
}

fn format_stats(stats: &DashboardStats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Roadmaps:     {} total, {} completed, {} in progress\n",
        stats.total_roadmaps, stats.completed_roadmaps, stats.in_progress_roadmaps
    ));
    out.push_str(&format!("Completion:   {}%\n", stats.completion_rate()));
    out.push_str(&format!("Avg progress: {:.0}%\n", stats.average_progress));
    out.push_str(&format!("Time spent:   {} min\n", stats.total_time_spent));
    out
}

async fn activities(ctx: &Cli, args: &[String]) -> Result<()> {
    ctx.require_login()?;
    let limit = match args.first().filter(|a| !a.starts_with("--")) {
        Some(raw) => raw.parse().with_context(|| format!("Invalid limit: {}", raw))?,
        None => DEFAULT_ACTIVITY_LIMIT,
    };
    let refresh = args.iter().any(|a| a == "--refresh");
    let activities = ctx.api.activities(limit, refresh).await?;
    for activity in &activities.data {
        let when = activity
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{:<17} {:<12} {}", when, activity.activity_type, activity.title);
    }
    Ok(())
}

async fn profile(ctx: &Cli, refresh: bool) -> Result<()> {
    ctx.require_login()?;
    let profile = ctx.api.profile(refresh).await?;
    println!("{}", serde_json::to_string_pretty(&profile.data)?);
    Ok(())
}

async fn rename(ctx: &Cli, args: &[String]) -> Result<()> {
    ctx.require_login()?;
    if args.is_empty() {
        bail!("Usage: nexstep rename <name>");
    }
    let update = nexstep_core::models::ProfileUpdate {
        name: Some(args.join(" ")),
        email: None,
    };
    let profile = ctx.api.update_profile(&update).await?;

    // Keep the persisted session in step with the new profile
    if let Some(token) = ctx.store.state().token() {
        ctx.store.login(profile.clone(), token);
    }
    ctx.store.show_toast(
        ToastKind::Success,
        format!("Profile updated: {}", profile.name),
        DEFAULT_TOAST_DURATION,
    );
    Ok(())
}

fn progress(ctx: &Cli, args: &[String]) -> Result<()> {
    match args {
        [] => status(ctx),
        [roadmap_id, percent, ..] => {
            let percent: f64 = percent
                .trim_end_matches('%')
                .parse()
                .with_context(|| format!("Invalid percentage: {}", percent))?;
            if !(0.0..=100.0).contains(&percent) {
                bail!("Percentage must be between 0 and 100");
            }
            let status = if percent >= 100.0 {
                ProgressStatus::Completed
            } else if percent > 0.0 {
                ProgressStatus::InProgress
            } else {
                ProgressStatus::NotStarted
            };
            let mut progress = ctx
                .store
                .state()
                .progress_for(roadmap_id)
                .cloned()
                .unwrap_or_else(Progress::default);
            progress.overall_progress = percent;
            progress.status = status;
            ctx.store.update_user_progress(roadmap_id.clone(), progress);
            Ok(())
        }
        [_] => bail!("Usage: nexstep progress <roadmap-id> <percent>"),
    }
}
