use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pvc_sdk::ObjectKind;

#[derive(Parser)]
#[command(
    name = "pvc",
    about = "PVC: a minimal content-addressed version control store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Worktree of the repository to operate on (default: search upward
    /// from the current directory)
    #[arg(short = 'C', long = "repo", global = true)]
    pub repo: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Object type as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    Blob,
    Tree,
    Commit,
}

impl From<KindArg> for ObjectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Blob => ObjectKind::Blob,
            KindArg::Tree => ObjectKind::Tree,
            KindArg::Commit => ObjectKind::Commit,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new, empty repository
    Init(InitArgs),
    /// Print the content of a repository object
    CatFile(CatFileArgs),
    /// Compute an object id, optionally storing the object
    HashObject(HashObjectArgs),
    /// List the contents of a tree
    LsTree(LsTreeArgs),
    /// Write a commit's or tree's files into an empty directory
    Checkout(CheckoutArgs),
    /// List references
    ShowRef(ShowRefArgs),
    /// Resolve a name to an object id
    RevParse(RevParseArgs),
    /// Show commit history
    Log(LogArgs),
}

impl Command {
    /// Name under which the command is registered.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::CatFile(_) => "cat-file",
            Self::HashObject(_) => "hash-object",
            Self::LsTree(_) => "ls-tree",
            Self::Checkout(_) => "checkout",
            Self::ShowRef(_) => "show-ref",
            Self::RevParse(_) => "rev-parse",
            Self::Log(_) => "log",
        }
    }
}

#[derive(Args)]
pub struct InitArgs {
    /// Where to create the repository
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Expected type; commits are followed to their tree for `tree`
    #[arg(value_enum)]
    pub kind: KindArg,
    /// The object to display
    pub object: String,
}

#[derive(Args)]
pub struct HashObjectArgs {
    #[arg(short = 't', long = "type", value_enum, default_value = "blob")]
    pub kind: KindArg,
    /// Actually write the object into the database
    #[arg(short, long)]
    pub write: bool,
    /// Read object from this file
    pub path: PathBuf,
}

#[derive(Args)]
pub struct LsTreeArgs {
    /// Recurse into subtrees
    #[arg(short, long)]
    pub recursive: bool,
    /// A tree-ish object
    pub tree: String,
}

#[derive(Args)]
pub struct CheckoutArgs {
    /// The commit or tree to check out
    pub commit: String,
    /// The empty directory to check out into
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ShowRefArgs {}

#[derive(Args)]
pub struct RevParseArgs {
    /// Peel the result to this type
    #[arg(long = "type", value_enum)]
    pub kind: Option<KindArg>,
    pub name: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Commit to start at
    #[arg(default_value = "HEAD")]
    pub commit: String,
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(long, conflicts_with = "dot")]
    pub oneline: bool,
    /// Emit a Graphviz digraph of the history
    #[arg(long)]
    pub dot: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_default_path() {
        let cli = Cli::try_parse_from(["pvc", "init"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("."));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_cat_file() {
        let cli = Cli::try_parse_from(["pvc", "cat-file", "tree", "HEAD"]).unwrap();
        if let Command::CatFile(args) = cli.command {
            assert_eq!(args.kind, KindArg::Tree);
            assert_eq!(args.object, "HEAD");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn cat_file_rejects_unknown_type() {
        assert!(Cli::try_parse_from(["pvc", "cat-file", "tag", "HEAD"]).is_err());
    }

    #[test]
    fn parse_hash_object() {
        let cli = Cli::try_parse_from(["pvc", "hash-object", "-w", "-t", "tree", "file"]).unwrap();
        if let Command::HashObject(args) = cli.command {
            assert!(args.write);
            assert_eq!(args.kind, KindArg::Tree);
            assert_eq!(args.path, PathBuf::from("file"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn hash_object_defaults_to_blob() {
        let cli = Cli::try_parse_from(["pvc", "hash-object", "file"]).unwrap();
        if let Command::HashObject(args) = cli.command {
            assert!(!args.write);
            assert_eq!(ObjectKind::from(args.kind), ObjectKind::Blob);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_ls_tree_recursive() {
        let cli = Cli::try_parse_from(["pvc", "ls-tree", "-r", "master"]).unwrap();
        if let Command::LsTree(args) = cli.command {
            assert!(args.recursive);
            assert_eq!(args.tree, "master");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_checkout() {
        let cli = Cli::try_parse_from(["pvc", "checkout", "HEAD", "out"]).unwrap();
        if let Command::Checkout(args) = cli.command {
            assert_eq!(args.commit, "HEAD");
            assert_eq!(args.path, PathBuf::from("out"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn checkout_requires_path() {
        assert!(Cli::try_parse_from(["pvc", "checkout", "HEAD"]).is_err());
    }

    #[test]
    fn parse_rev_parse_with_type() {
        let cli = Cli::try_parse_from(["pvc", "rev-parse", "--type", "tree", "HEAD"]).unwrap();
        if let Command::RevParse(args) = cli.command {
            assert_eq!(args.kind, Some(KindArg::Tree));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_log_defaults() {
        let cli = Cli::try_parse_from(["pvc", "log"]).unwrap();
        if let Command::Log(args) = cli.command {
            assert_eq!(args.commit, "HEAD");
            assert_eq!(args.limit, None);
            assert!(!args.oneline && !args.dot);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_log_oneline_limit() {
        let cli = Cli::try_parse_from(["pvc", "log", "--oneline", "-n", "5", "master"]).unwrap();
        if let Command::Log(args) = cli.command {
            assert!(args.oneline);
            assert_eq!(args.limit, Some(5));
            assert_eq!(args.commit, "master");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn log_oneline_conflicts_with_dot() {
        assert!(Cli::try_parse_from(["pvc", "log", "--oneline", "--dot"]).is_err());
    }

    #[test]
    fn global_flags() {
        let cli = Cli::try_parse_from([
            "pvc", "show-ref", "--format", "json", "-v", "-C", "/tmp/repo",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp/repo")));
        assert_eq!(cli.command.name(), "show-ref");
    }
}
