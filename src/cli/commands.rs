use clap::{Parser, Subcommand};

/// `moltgate` - Mode-gated moltbook access for a supervised agent.
#[derive(Parser, Debug)]
#[command(name = "moltgate")]
#[command(version)]
#[command(
    about = "Reads the moltbook feed with content scanning; outbound actions obey the permission mode and posts always wait for human approval.",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store moltbook credentials (key is verified, then saved with mode lurk)
    Register {
        /// API key; prompted with hidden input when omitted
        #[arg(long)]
        api_key: Option<String>,

        /// Agent identifier to store alongside the key
        #[arg(long)]
        agent_id: Option<String>,
    },

    /// Show the stored identity (key always redacted) and current mode
    Status,

    /// Read the frontpage feed
    Feed {
        /// Sort order: hot, new, or top
        #[arg(long, default_value = "hot")]
        sort: String,

        /// Maximum number of posts
        #[arg(long, default_value = "25")]
        limit: u32,
    },

    /// Read one submolt's posts
    Submolt {
        /// Submolt name, without the m/ prefix
        name: String,

        /// Maximum number of posts
        #[arg(long, default_value = "25")]
        limit: u32,
    },

    /// View one post by id, or create one with --submolt and --title
    Post {
        /// Post id to view
        #[arg(conflicts_with_all = ["submolt", "title", "content", "url"])]
        id: Option<String>,

        /// Submolt to post into (switches to create; always needs approval)
        #[arg(long, requires = "title")]
        submolt: Option<String>,

        /// Title of the new post
        #[arg(long, requires = "submolt")]
        title: Option<String>,

        /// Body text of the new post
        #[arg(long, requires = "submolt")]
        content: Option<String>,

        /// Link for a link post
        #[arg(long, requires = "submolt")]
        url: Option<String>,
    },

    /// Upvote a post
    Upvote {
        /// Post id
        id: String,
    },

    /// Comment on a post (drafted for approval when the mode requires it)
    Comment {
        /// Post id
        id: String,

        /// Comment text
        text: String,
    },

    /// Show the permission mode, or change it after confirmation
    Mode {
        /// New mode: lurk, engage, or active; omit to show the current one
        new_mode: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn post_view_and_create_shapes_parse() {
        let view = Cli::try_parse_from(["moltgate", "post", "p123"]).unwrap();
        assert!(matches!(
            view.command,
            Commands::Post { id: Some(_), submolt: None, .. }
        ));

        let create = Cli::try_parse_from([
            "moltgate", "post", "--submolt", "rustdev", "--title", "Hello", "--content", "body",
        ])
        .unwrap();
        assert!(matches!(
            create.command,
            Commands::Post { id: None, submolt: Some(_), title: Some(_), .. }
        ));
    }

    #[test]
    fn post_id_conflicts_with_create_flags() {
        let err = Cli::try_parse_from(["moltgate", "post", "p123", "--submolt", "rustdev"]);
        assert!(err.is_err());
    }

    #[test]
    fn create_title_requires_submolt() {
        let err = Cli::try_parse_from(["moltgate", "post", "--title", "Hello"]);
        assert!(err.is_err());
    }

    #[test]
    fn comment_takes_id_and_text() {
        let cli = Cli::try_parse_from(["moltgate", "comment", "p1", "nice write-up"]).unwrap();
        match cli.command {
            Commands::Comment { id, text } => {
                assert_eq!(id, "p1");
                assert_eq!(text, "nice write-up");
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn mode_argument_is_optional() {
        let show = Cli::try_parse_from(["moltgate", "mode"]).unwrap();
        assert!(matches!(show.command, Commands::Mode { new_mode: None }));

        let change = Cli::try_parse_from(["moltgate", "mode", "engage"]).unwrap();
        assert!(matches!(
            change.command,
            Commands::Mode { new_mode: Some(ref m) } if m == "engage"
        ));
    }
}
