// src/main.rs
// =============================================================================
// Entry point of the mylink CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and load the session (auth token, theme)
// 3. Dispatch to the subcommand handler, which drives the editor core
// 4. Exit with a proper code (0 = success, 1 = refused/failed save or
//    lookup, 2 = unexpected error)
//
// Rust concepts:
// - #[tokio::main]: the async runtime for the whole program
// - anyhow::Result: any error bubbles up to main as exit code 2
// - Trait objects (Arc<dyn BusinessApi>): the editor does not know it talks HTTP
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, EditArgs, LoginStep};
use mylink::api::{sanitize_path, ApiError, BusinessApi, HttpApi, Profile};
use mylink::auth::{canonical_phone, format_local, COUNTRY_CODE};
use mylink::editor::{
    BusinessEditor, LinkField, PathChecker, PathStatus, SaveError, MIN_CANDIDATE_LEN,
};
use mylink::preview::Preview;
use mylink::session::{Session, Theme};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Everything a handler needs, built once from the global flags
struct App {
    api: HttpApi,
    session: Session,
    session_path: PathBuf,
}

impl App {
    fn shared_api(&self) -> Arc<dyn BusinessApi> {
        Arc::new(self.api.clone())
    }
}

// The application logic
// Returns:
//   Ok(0) = done
//   Ok(1) = the server refused or there was nothing to find
//   Err = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let session_path = cli.session.clone().unwrap_or_else(Session::default_path);
    let session = Session::load(&session_path)?;
    debug!(path = %session_path.display(), logged_in = session.is_logged_in(), "session loaded");

    let api = HttpApi::new(&cli.api_url, &session).context("Failed to set up the API client")?;
    let ctx = App {
        api,
        session,
        session_path,
    };

    match cli.command {
        Commands::Login { step } => handle_login(ctx, step).await,
        Commands::Logout => handle_logout(ctx),
        Commands::List => handle_list(&ctx).await,
        Commands::CheckPath { path } => handle_check_path(&ctx, &path).await,
        Commands::New { path, edits } => handle_new(&ctx, &path, &edits).await,
        Commands::Edit {
            path,
            new_path,
            edits,
        } => handle_edit(&ctx, &path, new_path.as_deref(), &edits).await,
        Commands::View { path } => handle_view(&ctx, &path).await,
        Commands::Theme { theme } => handle_theme(ctx, theme),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so they never mix with --json output on stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn handle_login(mut ctx: App, step: LoginStep) -> Result<i32> {
    match step {
        LoginStep::Request { phone } => {
            let phone = canonical_phone(&phone)?;
            ctx.api.request_login_code(&phone).await?;
            // Canonical form is "+998" followed by the local digits
            let local = &phone[1 + COUNTRY_CODE.len()..];
            println!("📨 A login code was sent to +{} {}", COUNTRY_CODE, format_local(local));
            println!("   Finish with: mylink login verify {} <code>", phone);
            Ok(0)
        }
        LoginStep::Verify { phone, code } => {
            let phone = canonical_phone(&phone)?;
            match ctx.api.verify_login_code(&phone, code.trim()).await {
                Ok(token) => {
                    ctx.session.token = Some(token);
                    ctx.session.save(&ctx.session_path)?;
                    println!("✅ Logged in as {}", phone);
                    Ok(0)
                }
                Err(ApiError::Validation(_)) | Err(ApiError::Unauthorized) => {
                    println!("❌ Wrong or expired code");
                    Ok(1)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

fn handle_logout(mut ctx: App) -> Result<i32> {
    ctx.session.token = None;
    ctx.session.save(&ctx.session_path)?;
    println!("👋 Logged out");
    Ok(0)
}

async fn handle_list(ctx: &App) -> Result<i32> {
    let businesses = match ctx.api.list_businesses().await {
        Ok(businesses) => businesses,
        Err(ApiError::Unauthorized) => return Ok(report_unauthorized()),
        Err(e) => return Err(e.into()),
    };

    if businesses.is_empty() {
        println!("No businesses yet. Create one with: mylink new <path> --name <name>");
        return Ok(0);
    }

    println!("{:<30} {:<35} {:>6}", "PATH", "NAME", "LINKS");
    println!("{}", "=".repeat(73));
    for business in &businesses {
        println!(
            "{:<30} {:<35} {:>6}",
            business.path,
            business.name,
            business.links.len()
        );
    }
    Ok(0)
}

// Handles 'check-path': one availability check, waited for
// Parameters:
//   raw: the path as typed; sanitized the same way the editor does it
async fn handle_check_path(ctx: &App, raw: &str) -> Result<i32> {
    let candidate = sanitize_path(raw);
    let mut checker = PathChecker::new(ctx.shared_api());
    checker.input(&candidate);

    match checker.settle().await {
        Some(PathStatus::Available) => {
            println!("✅ mylink.asia/{} is available", candidate);
            Ok(0)
        }
        Some(PathStatus::Taken) => {
            println!("❌ mylink.asia/{} is taken", candidate);
            Ok(1)
        }
        // Short candidates are never probed
        Some(PathStatus::Checking) | None if candidate.chars().count() < MIN_CANDIDATE_LEN => {
            println!("⚠️  '{}' is too short for a path", candidate);
            Ok(1)
        }
        Some(PathStatus::Checking) | None => {
            println!("⚠️  Could not tell whether '{}' is available", candidate);
            Ok(1)
        }
    }
}

async fn handle_new(ctx: &App, path: &str, edits: &EditArgs) -> Result<i32> {
    let mut editor = BusinessEditor::new_business(ctx.shared_api());
    editor.set_path(path);
    apply_edits(&mut editor, edits).await?;

    // Only advisory: the save itself has the final word
    if editor.settle_path_check().await == Some(PathStatus::Taken) {
        println!("⚠️  mylink.asia/{} looks taken already", editor.path());
    }

    finish(&mut editor, edits, ctx.session.theme).await
}

async fn handle_edit(
    ctx: &App,
    path: &str,
    new_path: Option<&str>,
    edits: &EditArgs,
) -> Result<i32> {
    let mut editor = match BusinessEditor::open(ctx.shared_api(), &sanitize_path(path)).await {
        Ok(editor) => editor,
        Err(ApiError::NotFound) => {
            println!("❌ You have no business at mylink.asia/{}", path);
            return Ok(1);
        }
        Err(ApiError::Unauthorized) => return Ok(report_unauthorized()),
        Err(e) => return Err(e.into()),
    };

    if let Some(new_path) = new_path {
        editor.set_path(new_path);
        if editor.settle_path_check().await == Some(PathStatus::Taken) {
            println!("⚠️  mylink.asia/{} looks taken already", editor.path());
        }
    }
    apply_edits(&mut editor, edits).await?;

    finish(&mut editor, edits, ctx.session.theme).await
}

async fn handle_view(ctx: &App, path: &str) -> Result<i32> {
    match ctx.api.public_business(&sanitize_path(path)).await {
        Ok(profile) => {
            print!("{}", Preview::from_profile(&profile).render(ctx.session.theme));
            Ok(0)
        }
        Err(ApiError::NotFound) => {
            println!("❌ Nothing is published at mylink.asia/{}", path);
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_theme(mut ctx: App, theme: Option<Theme>) -> Result<i32> {
    match theme {
        Some(theme) => {
            ctx.session.theme = theme;
            ctx.session.save(&ctx.session_path)?;
            println!("🎨 Theme set to {:?}", theme);
        }
        None => println!("🎨 Current theme: {:?}", ctx.session.theme),
    }
    Ok(0)
}

// Applies the command-line edits in a fixed order: scalars, field changes,
// removals (highest number first so the others keep their numbers), moves,
// new links, logo.
//
// Parameters:
//   editor: the open editor, new or existing
//   edits: what was asked for on the command line (positions already 0-based)
async fn apply_edits(editor: &mut BusinessEditor, edits: &EditArgs) -> Result<()> {
    if let Some(name) = &edits.name {
        editor.set_name(name);
    }
    if let Some(description) = &edits.description {
        editor.set_description(description);
    }

    for (position, title) in &edits.set_title {
        if !editor.links_mut().update_field(*position, LinkField::Title, title) {
            println!("⚠️  There is no link #{}", position + 1);
        }
    }
    for (position, url) in &edits.set_url {
        if !editor.links_mut().update_field(*position, LinkField::Url, url) {
            println!("⚠️  There is no link #{}", position + 1);
        }
    }

    let mut removals = edits.remove.clone();
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for position in removals {
        if editor.links_mut().remove_at(position).is_none() {
            println!("⚠️  There is no link #{}", position + 1);
        }
    }

    for (from, to) in &edits.moves {
        editor.links_mut().reorder(*from, *to);
    }

    for (title, url) in &edits.links {
        let links = editor.links_mut();
        links.append();
        let position = links.len() - 1;
        links.update_field(position, LinkField::Title, title);
        links.update_field(position, LinkField::Url, url);
    }

    if let Some(logo) = &edits.logo {
        editor.set_logo_file(logo).await?;
    }
    if edits.remove_logo {
        editor.remove_logo();
    }

    Ok(())
}

// Either prints the preview (--dry-run) or saves and reports
// Returns: Ok(0) when saved, Ok(1) when the server refused the save
async fn finish(editor: &mut BusinessEditor, edits: &EditArgs, theme: Theme) -> Result<i32> {
    if edits.dry_run {
        print!("{}", editor.preview().render(theme));
        println!("(dry run, nothing was saved)");
        return Ok(0);
    }

    match editor.save().await {
        Ok(profile) => {
            print_saved(&profile, edits.json, theme)?;
            Ok(0)
        }
        Err(SaveError::PathConflict { path, .. }) => {
            println!("❌ The path '{}' is taken. Choose another one.", path);
            Ok(1)
        }
        Err(e @ SaveError::PartialSave { .. }) => {
            println!("⚠️  {}", e);
            println!("   Run the command again to retry the logo.");
            Ok(1)
        }
        Err(e @ SaveError::InvalidPath(_)) | Err(e @ SaveError::Validation(_)) => {
            println!("❌ {}", e);
            Ok(1)
        }
        Err(SaveError::Unauthorized) => Ok(report_unauthorized()),
        Err(e) => Err(e.into()),
    }
}

fn print_saved(profile: &Profile, json: bool, theme: Theme) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(profile)?);
    } else {
        println!("✅ Saved mylink.asia/{}", profile.path);
        print!("{}", Preview::from_profile(profile).render(theme));
    }
    Ok(())
}

fn report_unauthorized() -> i32 {
    println!("🔒 Not logged in. Run: mylink login request <phone>");
    1
}
