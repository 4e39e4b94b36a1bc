use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use pvc_dag::HistoryGraph;
use pvc_refs::{FsRefStore, RefStore};
use pvc_store::{FsObjectStore, Object, ObjectStore};
use pvc_types::{ObjectId, ObjectKind};
use pvc_worktree::{CheckoutReport, TreeRow};
use tracing::{debug, info};

use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};
use crate::name;

/// Name of the metadata directory inside a worktree.
pub const REPO_DIR: &str = ".pvc";

/// Branch that `HEAD` points at in a fresh repository.
pub const DEFAULT_BRANCH: &str = "master";

const DESCRIPTION: &str = "Unnamed repository; edit this file 'description' to name the repository.\n";

/// Handle to an on-disk repository: a worktree plus its `.pvc` directory.
///
/// Opening a repository is explicit; nothing here searches the filesystem
/// unless asked to via [`Repository::find`].
#[derive(Debug)]
pub struct Repository {
    worktree: PathBuf,
    pvc_dir: PathBuf,
    config: RepoConfig,
    objects: FsObjectStore,
    refs: FsRefStore,
}

impl Repository {
    // ---- Lifecycle ----

    /// Create a new repository at `path`.
    ///
    /// `path` may be missing or an existing directory without a `.pvc`
    /// entry. Lays out `objects/`, `refs/heads/`, `refs/tags/`, `branches/`,
    /// `HEAD`, `description` and `config`.
    pub fn init(path: impl AsRef<Path>) -> SdkResult<Self> {
        let worktree = path.as_ref().to_path_buf();
        if worktree.exists() && !worktree.is_dir() {
            return Err(SdkError::InvalidWorktree {
                path: worktree,
                reason: "not a directory".into(),
            });
        }
        let pvc_dir = worktree.join(REPO_DIR);
        if pvc_dir.exists() {
            return Err(SdkError::AlreadyInitialized(pvc_dir));
        }

        for dir in ["objects", "refs/heads", "refs/tags", "branches"] {
            fs::create_dir_all(pvc_dir.join(dir))?;
        }
        fs::write(pvc_dir.join("description"), DESCRIPTION)?;

        let config = RepoConfig::default();
        config.save(&pvc_dir.join("config"))?;

        let repo = Self::assemble(worktree, pvc_dir, config);
        repo.refs
            .write_symbolic("HEAD", &format!("refs/heads/{DEFAULT_BRANCH}"))?;

        info!(path = %repo.pvc_dir.display(), "initialized repository");
        Ok(repo)
    }

    /// Open the repository whose worktree is `path`.
    pub fn open(path: impl AsRef<Path>) -> SdkResult<Self> {
        let worktree = path.as_ref().to_path_buf();
        let pvc_dir = worktree.join(REPO_DIR);
        if !pvc_dir.is_dir() {
            return Err(SdkError::NotARepository(worktree));
        }

        let config = RepoConfig::load(&pvc_dir.join("config"))?;
        config.check_version()?;

        debug!(path = %pvc_dir.display(), "opened repository");
        Ok(Self::assemble(worktree, pvc_dir, config))
    }

    /// Open the nearest repository at or above `start`.
    pub fn find(start: impl AsRef<Path>) -> SdkResult<Self> {
        let start = start.as_ref();
        let absolute = if start.is_absolute() {
            start.to_path_buf()
        } else {
            std::env::current_dir()?.join(start)
        };
        let mut current = Some(absolute.as_path());
        while let Some(dir) = current {
            if dir.join(REPO_DIR).is_dir() {
                return Self::open(dir);
            }
            current = dir.parent();
        }
        Err(SdkError::NotARepository(absolute))
    }

    fn assemble(worktree: PathBuf, pvc_dir: PathBuf, config: RepoConfig) -> Self {
        let objects = FsObjectStore::with_compression(pvc_dir.join("objects"), config.core.compression);
        let refs = FsRefStore::new(&pvc_dir);
        Self {
            worktree,
            pvc_dir,
            config,
            objects,
            refs,
        }
    }

    // ---- Accessors ----

    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn pvc_dir(&self) -> &Path {
        &self.pvc_dir
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn objects(&self) -> &FsObjectStore {
        &self.objects
    }

    pub fn refs(&self) -> &FsRefStore {
        &self.refs
    }

    // ---- Object operations ----

    /// Hash the bytes from `reader` as an object of `kind`, storing it when
    /// `write` is set.
    ///
    /// Tree and commit payloads must parse; blobs are taken as-is.
    pub fn hash_object(&self, mut reader: impl Read, kind: ObjectKind, write: bool) -> SdkResult<ObjectId> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Object::deserialize(kind, &data)?.validate()?;
        Ok(self.objects.write_raw(kind, &data, write)?)
    }

    /// Resolve a name (see [`crate::name`]) and, with `kind`, peel it.
    pub fn rev_parse(&self, name: &str, kind: Option<ObjectKind>) -> SdkResult<ObjectId> {
        name::find_object(&self.objects, &self.refs, name, kind)
    }

    /// Kind and payload of the named object, peeled to `kind` if given.
    pub fn cat_file(&self, name: &str, kind: Option<ObjectKind>) -> SdkResult<(ObjectKind, Vec<u8>)> {
        let id = self.rev_parse(name, kind)?;
        Ok(self.objects.read_raw(&id)?)
    }

    /// List the tree named by `name` (a commit lists its root tree).
    pub fn ls_tree(&self, name: &str, recursive: bool) -> SdkResult<Vec<TreeRow>> {
        let tree = self.rev_parse(name, Some(ObjectKind::Tree))?;
        Ok(pvc_worktree::ls_tree(&self.objects, tree, recursive)?)
    }

    /// Materialise the tree named by `name` into `dest`.
    pub fn checkout(&self, name: &str, dest: impl AsRef<Path>) -> SdkResult<CheckoutReport> {
        let tree = self.rev_parse(name, Some(ObjectKind::Tree))?;
        Ok(pvc_worktree::checkout(&self.objects, tree, dest.as_ref())?)
    }

    /// History reachable from the commit named by `name`.
    pub fn log(&self, name: &str) -> SdkResult<HistoryGraph> {
        let head = self.rev_parse(name, Some(ObjectKind::Commit))?;
        Ok(HistoryGraph::build(&self.objects, head)?)
    }

    // ---- Ref operations ----

    /// Every ref under `refs/` with its resolved target.
    pub fn show_ref(&self) -> SdkResult<Vec<(ObjectId, String)>> {
        Ok(self.refs.show_ref()?)
    }

    /// Move a branch to `target`, creating it if needed.
    pub fn set_branch(&self, branch: &str, target: ObjectId) -> SdkResult<()> {
        self.refs.write_ref(&format!("refs/heads/{branch}"), target)?;
        Ok(())
    }
}
