use std::fs::File;
use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use pvc_sdk::{ObjectKind, Repository};
use serde::Serialize;

use crate::cli::*;
use crate::registry::{CommandRegistry, Handler};

/// Registry holding every built-in subcommand.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry
        .register("init", Handler::Bare(cmd_init))
        .register("cat-file", Handler::Repo(cmd_cat_file))
        .register("hash-object", Handler::Repo(cmd_hash_object))
        .register("ls-tree", Handler::Repo(cmd_ls_tree))
        .register("checkout", Handler::Repo(cmd_checkout))
        .register("show-ref", Handler::Repo(cmd_show_ref))
        .register("rev-parse", Handler::Repo(cmd_rev_parse))
        .register("log", Handler::Repo(cmd_log));
    registry
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    builtin_registry().dispatch(&cli.command, cli.repo.as_deref(), cli.format)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn wrong_command(expected: &str, got: &Command) -> anyhow::Error {
    anyhow::anyhow!("handler for '{expected}' invoked with '{}'", got.name())
}

fn cmd_init(command: &Command, format: OutputFormat) -> anyhow::Result<()> {
    let Command::Init(args) = command else {
        return Err(wrong_command("init", command));
    };
    let repo = Repository::init(&args.path)
        .with_context(|| format!("cannot initialize repository in {}", args.path.display()))?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": repo.pvc_dir().display().to_string(),
            "branch": pvc_sdk::DEFAULT_BRANCH,
        })),
        OutputFormat::Text => {
            println!(
                "{} Initialized empty PVC repository in {}",
                "✓".green().bold(),
                repo.pvc_dir().display().to_string().bold()
            );
            println!("  Branch: {}", pvc_sdk::DEFAULT_BRANCH.yellow());
            Ok(())
        }
    }
}

fn cmd_cat_file(repo: &Repository, command: &Command, format: OutputFormat) -> anyhow::Result<()> {
    let Command::CatFile(args) = command else {
        return Err(wrong_command("cat-file", command));
    };
    let (kind, payload) = repo
        .cat_file(&args.object, Some(args.kind.into()))
        .with_context(|| format!("cannot read {}", args.object))?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "type": kind,
            "size": payload.len(),
            "content": String::from_utf8_lossy(&payload),
        })),
        OutputFormat::Text => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&payload)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn cmd_hash_object(repo: &Repository, command: &Command, format: OutputFormat) -> anyhow::Result<()> {
    let Command::HashObject(args) = command else {
        return Err(wrong_command("hash-object", command));
    };
    let file = File::open(&args.path).with_context(|| format!("cannot open {}", args.path.display()))?;
    let kind: ObjectKind = args.kind.into();
    let id = repo
        .hash_object(file, kind, args.write)
        .with_context(|| format!("cannot hash {} as {kind}", args.path.display()))?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "id": id,
            "type": kind,
            "written": args.write,
        })),
        OutputFormat::Text => {
            println!("{id}");
            Ok(())
        }
    }
}

fn cmd_ls_tree(repo: &Repository, command: &Command, format: OutputFormat) -> anyhow::Result<()> {
    let Command::LsTree(args) = command else {
        return Err(wrong_command("ls-tree", command));
    };
    let rows = repo
        .ls_tree(&args.tree, args.recursive)
        .with_context(|| format!("cannot list {}", args.tree))?;

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Text => {
            for row in &rows {
                println!("{row}");
            }
            Ok(())
        }
    }
}

fn cmd_checkout(repo: &Repository, command: &Command, format: OutputFormat) -> anyhow::Result<()> {
    let Command::Checkout(args) = command else {
        return Err(wrong_command("checkout", command));
    };
    let report = repo
        .checkout(&args.commit, &args.path)
        .with_context(|| format!("cannot check out {} into {}", args.commit, args.path.display()))?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!(
                "{} Checked out {} into {}",
                "✓".green().bold(),
                args.commit.yellow(),
                args.path.display().to_string().bold()
            );
            println!(
                "  {} files, {} directories, {} bytes",
                report.files_written, report.dirs_created, report.bytes_written
            );
            if report.skipped > 0 {
                println!("  {} {} submodule entries skipped", "!".yellow(), report.skipped);
            }
            Ok(())
        }
    }
}

fn cmd_show_ref(repo: &Repository, command: &Command, format: OutputFormat) -> anyhow::Result<()> {
    let Command::ShowRef(_) = command else {
        return Err(wrong_command("show-ref", command));
    };
    let refs = repo.show_ref().context("cannot list references")?;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = refs
                .iter()
                .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
                .collect();
            print_json(&entries)
        }
        OutputFormat::Text => {
            for (id, name) in &refs {
                println!("{} {}", id.to_string().yellow(), name);
            }
            Ok(())
        }
    }
}

fn cmd_rev_parse(repo: &Repository, command: &Command, format: OutputFormat) -> anyhow::Result<()> {
    let Command::RevParse(args) = command else {
        return Err(wrong_command("rev-parse", command));
    };
    let id = repo
        .rev_parse(&args.name, args.kind.map(ObjectKind::from))
        .with_context(|| format!("cannot resolve {}", args.name))?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "name": args.name, "id": id })),
        OutputFormat::Text => {
            println!("{id}");
            Ok(())
        }
    }
}

fn cmd_log(repo: &Repository, command: &Command, format: OutputFormat) -> anyhow::Result<()> {
    let Command::Log(args) = command else {
        return Err(wrong_command("log", command));
    };
    let history = repo
        .log(&args.commit)
        .with_context(|| format!("cannot read history of {}", args.commit))?;

    if args.dot {
        print!("{}", history.to_dot());
        return Ok(());
    }

    let commits = history.linear_history(args.limit);
    match format {
        OutputFormat::Json => print_json(&commits),
        OutputFormat::Text if args.oneline => {
            for commit in commits {
                println!("{} {}", commit.short.yellow(), commit.summary);
            }
            Ok(())
        }
        OutputFormat::Text => {
            for commit in commits {
                println!("{} {}", "commit".yellow(), commit.id.to_string().yellow());
                if commit.parents.len() > 1 {
                    let parents: Vec<String> = commit.parents.iter().map(|p| p.short_hex()).collect();
                    println!("Merge:  {}", parents.join(" "));
                }
                if let Some(author) = &commit.author {
                    println!("Author: {author}");
                }
                println!("\n    {}\n", commit.summary);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run(args: &[&str]) -> anyhow::Result<()> {
        run_command(Cli::try_parse_from(args)?)
    }

    #[test]
    fn registry_covers_every_command() {
        let registry = builtin_registry();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "cat-file",
                "checkout",
                "hash-object",
                "init",
                "log",
                "ls-tree",
                "rev-parse",
                "show-ref"
            ]
        );
    }

    #[test]
    fn init_hash_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        run(&["pvc", "init", root]).unwrap();

        let file = dir.path().join("hello.txt");
        std::fs::write(&file, "hello\n").unwrap();
        run(&["pvc", "-C", root, "hash-object", "-w", file.to_str().unwrap()]).unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        assert_eq!(
            repo.rev_parse("ce01362", None).unwrap().to_hex(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
        run(&["pvc", "-C", root, "cat-file", "blob", "ce01362"]).unwrap();
        run(&["pvc", "-C", root, "--format", "json", "show-ref"]).unwrap();
    }

    #[test]
    fn log_on_empty_repository_fails_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        run(&["pvc", "init", root]).unwrap();
        let err = run(&["pvc", "-C", root, "log"]).unwrap_err();
        assert!(err.to_string().contains("cannot read history of HEAD"));
    }

    #[test]
    fn commands_outside_repository_fail() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        assert!(run(&["pvc", "-C", root, "show-ref"]).is_err());
    }

    #[test]
    fn handler_rejects_mismatched_command() {
        let err = cmd_init(&Command::ShowRef(ShowRefArgs {}), OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("show-ref"));
    }
}
