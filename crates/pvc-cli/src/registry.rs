//! Name -> handler table for the `pvc` subcommands.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use pvc_sdk::Repository;
use tracing::debug;

use crate::cli::{Command, OutputFormat};

/// Handler for a command that works without a repository.
pub type BareHandler = fn(&Command, OutputFormat) -> anyhow::Result<()>;

/// Handler for a command that operates on an opened repository.
pub type RepoHandler = fn(&Repository, &Command, OutputFormat) -> anyhow::Result<()>;

#[derive(Clone, Copy)]
pub enum Handler {
    Bare(BareHandler),
    Repo(RepoHandler),
}

/// Commands known to the binary, keyed by their command-line name.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<&'static str, Handler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, handler: Handler) -> &mut Self {
        self.handlers.insert(name, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Run `command`. Repository commands open the repository at `repo`, or
    /// the nearest one above the current directory when `repo` is `None`.
    pub fn dispatch(&self, command: &Command, repo: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
        let name = command.name();
        let handler = self
            .get(name)
            .with_context(|| {
                let known: Vec<_> = self.names().collect();
                format!("no handler registered for '{name}' (known: {})", known.join(", "))
            })?;
        debug!(command = name, "dispatching");

        match handler {
            Handler::Bare(run) => run(command, format),
            Handler::Repo(run) => {
                let repository = match repo {
                    Some(path) => Repository::open(path)
                        .with_context(|| format!("cannot open repository at {}", path.display()))?,
                    None => Repository::find(".").context("cannot find a repository")?,
                };
                run(&repository, command, format)
            }
        }
    }
}
