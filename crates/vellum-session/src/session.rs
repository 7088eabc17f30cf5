use vellum_frontmatter::{parse, serialize, Document, FieldValue, Frontmatter};
use vellum_mutate::MutationEngine;
use vellum_store::with_read_retry;
use vellum_types::{ContentHash, VaultPath};

use crate::error::{SessionError, SessionResult};

/// One open document under edit.
///
/// The session is a transient projection: it holds the parsed document and
/// the hash the bytes were read at, and every write it issues is
/// preconditioned on that hash. Other writers advancing the document turn
/// the next save into a `Conflict`, at which point the session's local view
/// is left untouched so the caller can [`reload`](Self::reload) and decide.
pub struct EditSession {
    engine: MutationEngine,
    path: VaultPath,
    hash: ContentHash,
    document: Document,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("path", &self.path)
            .field("hash", &self.hash)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl EditSession {
    /// Open the document at `path`: read it and parse its frontmatter.
    pub async fn open(engine: MutationEngine, path: VaultPath) -> SessionResult<Self> {
        let blob = with_read_retry(|| engine.store().get(&path)).await?;
        let text = blob
            .text()
            .ok_or_else(|| SessionError::NotText(path.clone()))?;
        let document = parse(text);
        tracing::debug!(path = %path, hash = %blob.hash.short_hex(), "opened session");
        Ok(Self {
            engine,
            path,
            hash: blob.hash,
            document,
        })
    }

    pub fn path(&self) -> &VaultPath {
        &self.path
    }

    /// The hash the session's view corresponds to.
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn body(&self) -> &str {
        &self.document.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.document.body = body.into();
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.document.frontmatter.get(key)
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: FieldValue) {
        self.document.frontmatter.insert(key, value);
    }

    pub fn remove_field(&mut self, key: &str) -> Option<FieldValue> {
        self.document.frontmatter.remove(key)
    }

    /// Replace the frontmatter mapping wholesale — not merged.
    pub fn replace_frontmatter(&mut self, fields: Frontmatter) {
        self.document.frontmatter = fields;
    }

    /// Serialize and write the document, preconditioned on the session's
    /// hash. On success the session adopts the new hash and the normalized
    /// (re-parsed) document, staying open and consistent with the store.
    pub async fn save(&mut self) -> SessionResult<()> {
        let raw = serialize(&self.document);
        let new_hash = self
            .engine
            .update(&self.path, raw.clone().into_bytes(), &self.hash)
            .await?;
        self.hash = new_hash;
        self.document = parse(&raw);
        Ok(())
    }

    /// Discard the local view and re-read the document from the store.
    pub async fn reload(&mut self) -> SessionResult<()> {
        let fresh = Self::open(self.engine.clone(), self.path.clone()).await?;
        self.hash = fresh.hash;
        self.document = fresh.document;
        Ok(())
    }

    /// Rename the open document in place; the session follows the new path.
    /// The content is unchanged, so the session's hash stays valid.
    pub async fn rename(&mut self, new_name: &str) -> SessionResult<()> {
        self.engine.rename(&self.path, new_name).await?;
        // rename() validated new_name as a single segment.
        let parent = self.path.parent().expect("open sessions are never rooted at /");
        self.path = parent.join(new_name).map_err(vellum_mutate::MutateError::from)?;
        Ok(())
    }

    /// Delete the open document, authorized by the session's hash, and
    /// consume the session.
    pub async fn delete(self) -> SessionResult<()> {
        self.engine.store().delete(&self.path, &self.hash).await?;
        tracing::debug!(path = %self.path, "deleted open document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vellum_store::{ContentStore, MemoryStore, StoreError};

    use super::*;

    fn p(s: &str) -> VaultPath {
        VaultPath::new(s).unwrap()
    }

    async fn setup(path: &str, raw: &str) -> (Arc<MemoryStore>, MutationEngine) {
        let store = Arc::new(MemoryStore::new());
        store
            .put(&p(path), raw.as_bytes().to_vec(), None)
            .await
            .unwrap();
        let engine = MutationEngine::new(store.clone());
        (store, engine)
    }

    // -----------------------------------------------------------------------
    // Open and read
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn open_parses_frontmatter_and_body() {
        let (_, engine) = setup(
            "posts/hello.md",
            "---\ntitle: Hi\ntags: [a, b]\n---\n\nBody text",
        )
        .await;
        let session = EditSession::open(engine, p("posts/hello.md")).await.unwrap();

        assert_eq!(session.field("title"), Some(&FieldValue::scalar("Hi")));
        assert_eq!(session.field("tags"), Some(&FieldValue::list(["a", "b"])));
        assert_eq!(session.body(), "Body text");
    }

    #[tokio::test]
    async fn open_missing_document_fails() {
        let store = Arc::new(MemoryStore::new());
        let engine = MutationEngine::new(store);
        let err = EditSession::open(engine, p("gone.md")).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn open_binary_document_fails() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(&p("img.png"), vec![0xff, 0xd8], None)
            .await
            .unwrap();
        let engine = MutationEngine::new(store);
        let err = EditSession::open(engine, p("img.png")).await.unwrap_err();
        assert!(matches!(err, SessionError::NotText(_)));
    }

    // -----------------------------------------------------------------------
    // Edit and save
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn replace_frontmatter_and_save() {
        let (store, engine) = setup(
            "posts/hello.md",
            "---\ntitle: Hi\ntags: [a, b]\n---\n\nBody text",
        )
        .await;
        let mut session = EditSession::open(engine, p("posts/hello.md")).await.unwrap();

        let mut fields = Frontmatter::new();
        fields.insert("title", FieldValue::scalar("Hi2"));
        session.replace_frontmatter(fields);
        session.save().await.unwrap();

        let stored = store.get(&p("posts/hello.md")).await.unwrap();
        assert_eq!(stored.content, b"---\ntitle: Hi2\n---\n\nBody text");
        // Session stays consistent with the store.
        assert_eq!(session.hash(), &stored.hash);
    }

    #[tokio::test]
    async fn set_field_and_body_round_trip_through_save() {
        let (store, engine) = setup("a.md", "---\ntitle: Old\n---\n\nold body").await;
        let mut session = EditSession::open(engine.clone(), p("a.md")).await.unwrap();

        session.set_field("title", FieldValue::scalar("New"));
        session.set_field("draft", FieldValue::scalar("true"));
        session.set_body("new body");
        session.save().await.unwrap();

        let stored = store.get(&p("a.md")).await.unwrap();
        assert_eq!(
            stored.content,
            b"---\ntitle: New\ndraft: true\n---\n\nnew body"
        );

        let reopened = EditSession::open(engine, p("a.md")).await.unwrap();
        assert_eq!(reopened.document(), session.document());
    }

    #[tokio::test]
    async fn remove_field_drops_the_entry() {
        let (store, engine) = setup("a.md", "---\na: 1\nb: 2\n---\n\nx").await;
        let mut session = EditSession::open(engine, p("a.md")).await.unwrap();
        assert_eq!(session.remove_field("a"), Some(FieldValue::scalar("1")));
        session.save().await.unwrap();
        let stored = store.get(&p("a.md")).await.unwrap();
        assert_eq!(stored.content, b"---\nb: 2\n---\n\nx");
    }

    #[tokio::test]
    async fn consecutive_saves_from_one_session() {
        let (store, engine) = setup("a.md", "body").await;
        let mut session = EditSession::open(engine, p("a.md")).await.unwrap();

        session.set_body("first edit");
        session.save().await.unwrap();
        session.set_body("second edit");
        session.save().await.unwrap();

        let stored = store.get(&p("a.md")).await.unwrap();
        assert_eq!(stored.content, b"second edit");
    }

    // -----------------------------------------------------------------------
    // Conflicts
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn conflicting_save_leaves_view_untouched_until_reload() {
        let (store, engine) = setup("a.md", "---\nt: 1\n---\n\noriginal").await;
        let mut session = EditSession::open(engine, p("a.md")).await.unwrap();

        // Another writer advances the document.
        let current = store.get(&p("a.md")).await.unwrap();
        store
            .put(
                &p("a.md"),
                b"---\nt: 1\n---\n\nsomeone else".to_vec(),
                Some(&current.hash),
            )
            .await
            .unwrap();

        session.set_body("my edit");
        let err = session.save().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Mutate(vellum_mutate::MutateError::Store(StoreError::Conflict { .. }))
        ));
        // Local view untouched; store content untouched.
        assert_eq!(session.body(), "my edit");
        assert_eq!(
            store.get(&p("a.md")).await.unwrap().content,
            b"---\nt: 1\n---\n\nsomeone else"
        );

        // After a reload the session tracks the new content and can save.
        session.reload().await.unwrap();
        assert_eq!(session.body(), "someone else");
        session.set_body("my edit, rebased");
        session.save().await.unwrap();
        assert_eq!(
            store.get(&p("a.md")).await.unwrap().content,
            b"---\nt: 1\n---\n\nmy edit, rebased"
        );
    }

    #[tokio::test]
    async fn delete_with_stale_session_conflicts() {
        let (store, engine) = setup("a.md", "v1").await;
        let session = EditSession::open(engine, p("a.md")).await.unwrap();

        let current = store.get(&p("a.md")).await.unwrap();
        store
            .put(&p("a.md"), b"v2".to_vec(), Some(&current.hash))
            .await
            .unwrap();

        let err = session.delete().await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::Conflict { .. })));
        assert_eq!(store.get(&p("a.md")).await.unwrap().content, b"v2");
    }

    // -----------------------------------------------------------------------
    // Rename and delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn rename_follows_the_document() {
        let (store, engine) = setup("posts/old.md", "---\nt: 1\n---\n\nbody").await;
        let mut session = EditSession::open(engine, p("posts/old.md")).await.unwrap();

        session.rename("new.md").await.unwrap();
        assert_eq!(session.path(), &p("posts/new.md"));

        // Content moved; the session can still save at the new path.
        session.set_body("after rename");
        session.save().await.unwrap();
        assert_eq!(
            store.get(&p("posts/new.md")).await.unwrap().content,
            b"---\nt: 1\n---\n\nafter rename"
        );
        assert!(matches!(
            store.get(&p("posts/old.md")).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_consumes_the_session() {
        let (store, engine) = setup("a.md", "x").await;
        let session = EditSession::open(engine, p("a.md")).await.unwrap();
        session.delete().await.unwrap();
        assert!(store.is_empty());
    }
}
