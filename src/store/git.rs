//! store::git
//!
//! Revision store backed by a git working copy, via git2.
//!
//! # Architecture
//!
//! This is the only module that imports `git2`. Git errors are normalized
//! into [`StoreError`] variants at this boundary.
//!
//! - The document listing comes from the git index, which carries size,
//!   ctime and mtime for every tracked file.
//! - A document's history is a first-parent walk from `HEAD`, keeping the
//!   commits whose blob for the document differs from their parent's.
//!
//! # History cache
//!
//! Walking the log is the expensive part, so each document keeps the
//! revisions discovered so far plus the commit where the walk stopped.
//! A later `take` that needs more resumes from that commit instead of
//! replaying from `HEAD`.
//!
//! A stream is pinned to the `HEAD` it was created at. When `HEAD` moves,
//! new streams start a fresh walk from the new tip, while streams already
//! open keep their own walk alive and continue from where they stopped.
//!
//! Each walk has its own lock, so a deep walk of one document does not
//! block readers of another document's cached revisions. The number of
//! documents kept is capped; the least recently used walk is evicted.
//!
//! # Example
//!
//! ```ignore
//! use revbrowse::store::{GitStore, RevisionStore};
//! use std::path::Path;
//!
//! let store = GitStore::open(Path::new("."))?;
//! for doc in store.document_list()? {
//!     println!("{} ({} bytes)", doc.path, doc.size);
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use super::{HistoryStream, HistoryTake, RevisionRecord, RevisionStore, StoreError};
use crate::core::canonical::canonicalize;
use crate::core::types::{DocPath, RevisionId};
use crate::index::DocumentRecord;

/// Index entry flag bits holding the merge stage.
const INDEX_STAGE_MASK: u16 = 0x3000;

/// Number of documents whose history walks are kept by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

impl StoreError {
    /// Create a StoreError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => StoreError::ObjectNotFound {
                oid: context.to_string(),
            },
            git2::ErrorCode::Locked => StoreError::Unavailable {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => StoreError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for StoreError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => StoreError::ObjectNotFound {
                oid: err.message().to_string(),
            },
            _ => StoreError::Internal {
                message: err.message().to_string(),
            },
        }
    }
}

/// Information about the opened repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// Path to .git directory
    pub git_dir: PathBuf,
    /// Path to working directory
    pub work_dir: PathBuf,
}

/// Walk state of one document's history.
#[derive(Debug)]
struct CachedHistory {
    /// Tip the walk started from
    head: git2::Oid,
    /// Revisions found so far, newest first
    revisions: Vec<RevisionRecord>,
    /// Next commit to examine; `None` once the root has been passed
    next: Option<git2::Oid>,
}

impl CachedHistory {
    fn new(head: git2::Oid) -> Self {
        Self {
            head,
            revisions: Vec::new(),
            next: Some(head),
        }
    }

    fn complete(&self) -> bool {
        self.next.is_none()
    }
}

type SharedWalk = Arc<Mutex<CachedHistory>>;

#[derive(Debug)]
struct CacheSlot {
    /// Tip of `walk`, readable without taking the walk's lock
    head: git2::Oid,
    walk: SharedWalk,
    last_used: u64,
}

/// Latest walk per document, bounded by `capacity`.
#[derive(Debug)]
struct HistoryCache {
    slots: HashMap<String, CacheSlot>,
    capacity: usize,
    clock: u64,
}

impl HistoryCache {
    fn new(capacity: usize) -> Self {
        Self {
            slots: HashMap::new(),
            capacity,
            clock: 0,
        }
    }

    /// Walk of `file` from `head`, shared with other streams on the same tip.
    fn walk(&mut self, file: &str, head: git2::Oid) -> SharedWalk {
        self.clock += 1;
        let now = self.clock;

        if let Some(slot) = self.slots.get_mut(file) {
            slot.last_used = now;
            if slot.head != head {
                debug!(file, "HEAD moved, starting a new history walk");
                slot.head = head;
                slot.walk = Arc::new(Mutex::new(CachedHistory::new(head)));
            }
            return Arc::clone(&slot.walk);
        }

        let walk = Arc::new(Mutex::new(CachedHistory::new(head)));
        if self.capacity == 0 {
            return walk;
        }
        while self.slots.len() >= self.capacity {
            self.evict_oldest();
        }
        self.slots.insert(
            file.to_string(),
            CacheSlot {
                head,
                walk: Arc::clone(&walk),
                last_used: now,
            },
        );
        walk
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(file, _)| file.clone());
        if let Some(file) = oldest {
            debug!(file = %file, "evicting cached history walk");
            self.slots.remove(&file);
        }
    }
}

/// Revision store over a git working copy.
///
/// The repository handle, the history cache and each cached walk are
/// guarded by their own mutex, so a `GitStore` can be shared across
/// threads. Locks are taken in the order walk, then repository; the cache
/// lock is never held while waiting on either.
pub struct GitStore {
    repo: Mutex<git2::Repository>,
    info: RepoInfo,
    /// Only files with this extension are documents (stripped from names)
    extension: Option<String>,
    /// Keyed by the stored file path
    cache: Mutex<HistoryCache>,
}

impl std::fmt::Debug for GitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitStore")
            .field("info", &self.info)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl GitStore {
    /// Open the repository containing `path`.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the working copy.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotARepo`] if no repository is found
    /// - [`StoreError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let repo = git2::Repository::discover(path).map_err(|_| StoreError::NotARepo {
            path: path.to_path_buf(),
        })?;

        let work_dir = repo.workdir().ok_or(StoreError::BareRepo)?.to_path_buf();
        let info = RepoInfo {
            git_dir: repo.path().to_path_buf(),
            work_dir,
        };
        debug!(git_dir = %info.git_dir.display(), "opened git store");

        Ok(Self {
            repo: Mutex::new(repo),
            info,
            extension: None,
            cache: Mutex::new(HistoryCache::new(DEFAULT_CACHE_CAPACITY)),
        })
    }

    /// Treat only files ending in `.{extension}` as documents.
    ///
    /// Document names then omit the extension, and history lookups add it
    /// back.
    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.map(|ext| ext.trim_start_matches('.').to_string());
        self
    }

    /// Keep history walks for at most `capacity` documents.
    ///
    /// Zero disables caching between streams.
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = HistoryCache::new(capacity);
        }
        self
    }

    /// Repository paths.
    pub fn info(&self) -> &RepoInfo {
        &self.info
    }

    /// Number of revisions of `doc` discovered so far by the current walk.
    pub fn discovered(&self, doc: &DocPath) -> usize {
        let file = self.stored_path(doc);
        let walk = self
            .cache
            .lock()
            .ok()
            .and_then(|cache| cache.slots.get(&file).map(|slot| Arc::clone(&slot.walk)));
        walk.and_then(|walk| walk.lock().ok().map(|w| w.revisions.len()))
            .unwrap_or(0)
    }

    /// Number of documents with a cached history walk.
    pub fn cached_documents(&self) -> usize {
        self.cache.lock().map(|cache| cache.slots.len()).unwrap_or(0)
    }

    fn repo(&self) -> Result<MutexGuard<'_, git2::Repository>, StoreError> {
        self.repo.lock().map_err(|_| StoreError::Unavailable {
            message: "repository lock poisoned".into(),
        })
    }

    fn cache(&self) -> Result<MutexGuard<'_, HistoryCache>, StoreError> {
        self.cache.lock().map_err(|_| StoreError::Unavailable {
            message: "history cache lock poisoned".into(),
        })
    }

    /// File path in the repository for a document.
    fn stored_path(&self, doc: &DocPath) -> String {
        match &self.extension {
            Some(ext) => format!("{doc}.{ext}"),
            None => doc.to_string(),
        }
    }

    /// Document name for a stored file, or `None` if it is not a document.
    fn document_name(&self, file: &str) -> Option<String> {
        match &self.extension {
            Some(ext) => file
                .strip_suffix(ext.as_str())
                .and_then(|stem| stem.strip_suffix('.'))
                .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
                .map(str::to_string),
            None => Some(file.to_string()),
        }
    }
}

impl RevisionStore for GitStore {
    fn document_list(&self) -> Result<Vec<DocumentRecord>, StoreError> {
        let repo = self.repo()?;
        let mut index = repo.index().map_err(|e| StoreError::from_git2(e, "index"))?;
        // Pick up changes written by other processes since the last read
        index
            .read(false)
            .map_err(|e| StoreError::from_git2(e, "index"))?;

        let mut records = Vec::new();
        for entry in index.iter() {
            // Conflicted files appear once per stage; list stage 0 only
            if entry.flags & INDEX_STAGE_MASK != 0 {
                continue;
            }
            let Ok(file) = String::from_utf8(entry.path) else {
                warn!("skipping index entry with a non-UTF-8 path");
                continue;
            };
            let Some(name) = self.document_name(&file) else {
                continue;
            };
            // History lookups canonicalize the name, so only canonical names
            // can be found again
            if canonicalize(&name).ok().as_deref() != Some(name.as_str()) {
                warn!(file = %file, "skipping index entry with a non-canonical name");
                continue;
            }
            records.push(DocumentRecord::new(
                name,
                u64::from(entry.file_size),
                i64::from(entry.ctime.seconds()),
                i64::from(entry.mtime.seconds()),
            ));
        }

        debug!(documents = records.len(), "listed documents from index");
        Ok(records)
    }

    fn document_history<'a>(
        &'a self,
        path: &DocPath,
    ) -> Result<Box<dyn HistoryStream + 'a>, StoreError> {
        let file = self.stored_path(path);
        let head = head_commit(&*self.repo()?)?;
        let walk = match head {
            Some(head) => Some(self.cache()?.walk(&file, head)),
            None => None,
        };

        Ok(Box::new(GitHistory {
            store: self,
            file,
            walk,
            position: 0,
        }))
    }
}

/// Cursor over one document's history as of the `HEAD` it was opened at.
struct GitHistory<'a> {
    store: &'a GitStore,
    file: String,
    /// `None` for a repository without commits
    walk: Option<SharedWalk>,
    position: usize,
}

impl HistoryStream for GitHistory<'_> {
    fn take(&mut self, n: usize) -> Result<HistoryTake, StoreError> {
        let Some(walk) = self.walk.clone() else {
            return Ok(HistoryTake {
                revisions: Vec::new(),
                scanned: 0,
                complete: true,
            });
        };
        let mut cached = walk.lock().map_err(|_| StoreError::Unavailable {
            message: "history walk lock poisoned".into(),
        })?;

        let wanted = self.position.saturating_add(n);
        let mut examined = 0usize;
        if cached.revisions.len() < wanted && !cached.complete() {
            let repo = self.store.repo()?;
            while cached.revisions.len() < wanted && !cached.complete() {
                step(&repo, &mut cached, Path::new(&self.file))?;
                examined += 1;
            }
        }
        if examined > 0 {
            debug!(
                file = %self.file,
                examined,
                found = cached.revisions.len(),
                complete = cached.complete(),
                "extended history walk"
            );
        }

        let end = wanted.min(cached.revisions.len());
        let start = self.position.min(end);
        let revisions = cached.revisions[start..end].to_vec();
        self.position = end;

        Ok(HistoryTake {
            revisions,
            scanned: cached.revisions.len(),
            complete: cached.complete(),
        })
    }
}

/// Commit `HEAD` points at, or `None` for a repository with no commits.
fn head_commit(repo: &git2::Repository) -> Result<Option<git2::Oid>, StoreError> {
    match repo.head() {
        Ok(reference) => {
            let commit = reference
                .peel_to_commit()
                .map_err(|e| StoreError::from_git2(e, "HEAD"))?;
            Ok(Some(commit.id()))
        }
        Err(e) if matches!(e.code(), git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound) => {
            Ok(None)
        }
        Err(e) => Err(StoreError::from_git2(e, "HEAD")),
    }
}

/// Examine the next commit of a walk, recording it if it changed `file`.
fn step(
    repo: &git2::Repository,
    cached: &mut CachedHistory,
    file: &Path,
) -> Result<(), StoreError> {
    let Some(oid) = cached.next else {
        return Ok(());
    };
    let commit = repo
        .find_commit(oid)
        .map_err(|e| StoreError::from_git2(e, &oid.to_string()))?;

    let parent = if commit.parent_count() > 0 {
        Some(commit.parent(0)?)
    } else {
        None
    };

    let current = blob_at(&commit, file)?;
    let previous = match &parent {
        Some(parent) => blob_at(parent, file)?,
        None => None,
    };

    if current.is_some() && current != previous {
        cached.revisions.push(revision_record(&commit)?);
    }
    cached.next = parent.map(|p| p.id());
    Ok(())
}

/// Blob id of `file` in a commit's tree, if present.
fn blob_at(commit: &git2::Commit<'_>, file: &Path) -> Result<Option<git2::Oid>, StoreError> {
    let tree = commit.tree()?;
    match tree.get_path(file) {
        Ok(entry) => Ok(Some(entry.id())),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(StoreError::from_git2(e, &file.display().to_string())),
    }
}

fn revision_record(commit: &git2::Commit<'_>) -> Result<RevisionRecord, StoreError> {
    let author = commit.author();
    let committer = commit.committer();

    let mut extra = BTreeMap::new();
    extra.insert(
        "message".to_string(),
        commit.message().unwrap_or("").trim_end().to_string(),
    );
    extra.insert(
        "committer_email".to_string(),
        committer.email().unwrap_or("").to_string(),
    );

    Ok(RevisionRecord {
        revision_id: RevisionId::new(commit.id().to_string())?,
        author_name: author.name().unwrap_or("").to_string(),
        author_email: author.email().unwrap_or("").to_string(),
        timestamp: author.when().seconds(),
        summary: commit.summary().unwrap_or("").to_string(),
        extra,
    })
}
