// src/cli.rs
// =============================================================================
// The command-line interface, defined with clap's derive API.
//
// Link positions on the command line are 1-based ("link #1"), the way they
// are numbered in the editor; they are converted to 0-based indexes before
// they reach the LinkCollection.
//
// Rust concepts:
// - clap derive: structs and enums become the argument parser
// - value_parser: custom functions turn "3:1" into (2, 0)
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use mylink::api::DEFAULT_BASE_URL;
use mylink::session::Theme;

#[derive(Parser, Debug)]
#[command(
    name = "mylink",
    version,
    about = "Build and publish link-in-bio pages for your business",
    long_about = "mylink edits business pages on mylink.asia: a name, a description, a logo \
                  and an ordered list of links, published at mylink.asia/<path>."
)]
pub struct Cli {
    /// Base URL of the API
    #[arg(long, env = "MYLINK_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Session file (auth token and theme); defaults to the user config dir
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    /// Log requests and decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with a code sent by SMS
    Login {
        #[command(subcommand)]
        step: LoginStep,
    },

    /// Forget the stored auth token
    Logout,

    /// List your businesses
    List,

    /// Check whether a path is still free
    CheckPath {
        path: String,
    },

    /// Create a new business page
    ///
    /// Example: mylink new coffee --name "Coffee Corner" --link "Channel=t.me/coffee"
    New {
        /// Path of the page (mylink.asia/<path>)
        path: String,

        #[command(flatten)]
        edits: EditArgs,
    },

    /// Change an existing business page
    ///
    /// Example: mylink edit coffee --move 3:1 --remove 2 --logo logo.png
    Edit {
        /// Current path of the page
        path: String,

        /// Move the page to a new path
        #[arg(long = "path", value_name = "NEW_PATH")]
        new_path: Option<String>,

        #[command(flatten)]
        edits: EditArgs,
    },

    /// Show a published page the way visitors see it
    View {
        path: String,
    },

    /// Show or set the display theme
    Theme {
        theme: Option<Theme>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LoginStep {
    /// Send a login code to a phone number
    Request {
        /// Phone number, e.g. "94 351 19 10" or "+998943511910"
        phone: String,
    },

    /// Finish logging in with the code from the SMS
    Verify {
        phone: String,
        code: String,
    },
}

/// Edits shared by `new` and `edit`. They are applied in this order:
/// scalar fields, title/url changes, removals, moves, new links, logo.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Change a link's title: N=TITLE
    #[arg(long = "set-title", value_name = "N=TITLE", value_parser = parse_position_value)]
    pub set_title: Vec<(usize, String)>,

    /// Change a link's URL: N=URL
    #[arg(long = "set-url", value_name = "N=URL", value_parser = parse_position_value)]
    pub set_url: Vec<(usize, String)>,

    /// Remove link N
    #[arg(long = "remove", value_name = "N", value_parser = parse_position)]
    pub remove: Vec<usize>,

    /// Move link FROM to position TO
    #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
    pub moves: Vec<(usize, usize)>,

    /// Append a link: TITLE=URL
    #[arg(long = "link", value_name = "TITLE=URL", value_parser = parse_new_link)]
    pub links: Vec<(String, String)>,

    /// Upload a new logo image
    #[arg(long, conflicts_with = "remove_logo")]
    pub logo: Option<PathBuf>,

    /// Remove the current logo
    #[arg(long)]
    pub remove_logo: bool,

    /// Print the preview without saving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the saved business as JSON
    #[arg(long)]
    pub json: bool,
}

// "3" -> 2
fn parse_position(value: &str) -> Result<usize, String> {
    let position: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a link number", value))?;
    if position == 0 {
        return Err("link numbers start at 1".to_string());
    }
    Ok(position - 1)
}

// "2=New title" -> (1, "New title")
fn parse_position_value(value: &str) -> Result<(usize, String), String> {
    let (position, rest) = value
        .split_once('=')
        .ok_or_else(|| format!("expected N=VALUE, got '{}'", value))?;
    Ok((parse_position(position)?, rest.to_string()))
}

// "3:1" -> (2, 0)
fn parse_move(value: &str) -> Result<(usize, usize), String> {
    let (from, to) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{}'", value))?;
    Ok((parse_position(from)?, parse_position(to)?))
}

// "Channel=t.me/coffee" -> ("Channel", "t.me/coffee")
// A value without '=' is taken as a URL with no title.
fn parse_new_link(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((title, url)) => Ok((title.trim().to_string(), url.trim().to_string())),
        None => Ok((String::new(), value.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit_command() {
        let cli = Cli::try_parse_from([
            "mylink",
            "edit",
            "coffee",
            "--path",
            "coffee-house",
            "--move",
            "3:1",
            "--remove",
            "2",
            "--link",
            "Channel=t.me/coffee",
            "--set-url",
            "1=instagram.com/coffee",
        ])
        .unwrap();

        match cli.command {
            Commands::Edit { path, new_path, edits } => {
                assert_eq!(path, "coffee");
                assert_eq!(new_path.as_deref(), Some("coffee-house"));
                assert_eq!(edits.moves, vec![(2, 0)]);
                assert_eq!(edits.remove, vec![1]);
                assert_eq!(edits.links, vec![("Channel".to_string(), "t.me/coffee".to_string())]);
                assert_eq!(edits.set_url, vec![(0, "instagram.com/coffee".to_string())]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_link_number_zero_is_rejected() {
        assert!(parse_position("0").is_err());
        assert!(parse_move("1-2").is_err());
        assert_eq!(parse_new_link("wa.me/998901234567").unwrap().0, "");
    }

    #[test]
    fn test_logo_flags_conflict() {
        let result = Cli::try_parse_from([
            "mylink", "edit", "coffee", "--logo", "a.png", "--remove-logo",
        ]);
        assert!(result.is_err());
    }
}
