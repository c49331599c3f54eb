use clap::Parser;

/// GitHub e-mail getter: probes the users API, the public profile page and
/// the most recent repository activity of an account, in that order, and
/// prints every distinct address it finds.
#[derive(Parser, Debug, Clone)]
#[clap(
    author,
    version,
    about,
    long_about = "A concurrent CLI tool that discovers the public email address of a GitHub \
user. Each lookup falls back from the users API to the profile page to recent commit \
activity, and can optionally be repeated for every account on one page of the user's \
followers or following list."
)]
pub struct Args {
    /// Username to execute the query.
    pub username: String,

    /// Also look up the accounts following this user.
    #[clap(long)]
    pub followers: bool,

    /// Also look up the accounts this user follows.
    /// When both flags are given, --following wins.
    #[clap(long)]
    pub following: bool,

    /// Print the usernames encountered instead of resolving emails.
    #[clap(long = "no-emails")]
    pub no_emails: bool,

    /// Page of the followers/following listing to fetch.
    /// Page 1 is the unsuffixed listing URL.
    #[clap(short = 'p', long, default_value = "1", value_name = "NUM")]
    pub page: u32,

    /// Maximum number of concurrent lookups.
    #[clap(short = 'c', long, default_value = "8")]
    pub concurrency: usize,

    /// Base URL of the platform. Mostly useful for pointing the tool at a
    /// local stand-in server.
    #[clap(long, default_value = "https://github.com", value_name = "URL")]
    pub base_url: String,
}

/// The social-graph relation selected on the command line, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Followers,
    Following,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Followers => "followers",
            Relation::Following => "following",
        }
    }
}

impl Args {
    /// Relation to expand. `--following` takes precedence over `--followers`
    /// when both are set, matching the historical behaviour of the tool.
    pub fn relation(&self) -> Option<Relation> {
        if self.following {
            Some(Relation::Following)
        } else if self.followers {
            Some(Relation::Followers)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn following_wins_over_followers() {
        let args = Args::parse_from(["getter", "octocat", "--followers", "--following"]);
        assert_eq!(args.relation(), Some(Relation::Following));
    }

    #[test]
    fn no_relation_by_default() {
        let args = Args::parse_from(["getter", "octocat"]);
        assert_eq!(args.relation(), None);
        assert_eq!(args.page, 1);
        assert!(!args.no_emails);
    }

    #[test]
    fn username_is_required() {
        assert!(Args::try_parse_from(["getter"]).is_err());
    }
}
