use crate::{
    domain::{
        Board, BoardId, Card, CardId, CardImage, ImageId, List, ListId, Membership, OrderUpdate,
        Organization, OrganizationId, UserId,
    },
    error::Result,
    storage::{tables::Tables, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};

/// File-based storage: one JSON snapshot of all tables
///
/// A write is applied to a copy of the tables, the copy is written to a
/// temporary file and renamed over the snapshot, and only then swapped in.
/// A failed write leaves both the file and the in-memory tables unchanged.
pub struct FileStorage {
    root_path: PathBuf,
    tables: Mutex<Tables>,
}

impl FileStorage {
    const KANBAN_DIR: &'static str = ".kanban";
    const STORE_FILE: &'static str = "store.json";
    const TEMP_FILE: &'static str = "store.json.tmp";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::KANBAN_DIR),
            tables: Mutex::new(Tables::default()),
        }
    }

    fn store_file(&self) -> PathBuf {
        self.root_path.join(Self::STORE_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    async fn persist(&self, tables: &Tables) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(tables)?;
        let temp_path = self.root_path.join(Self::TEMP_FILE);
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, self.store_file()).await?;
        Ok(())
    }

    async fn mutate<T, F>(&self, apply: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut Tables) -> Result<T> + Send,
    {
        let mut guard = self.tables.lock().await;
        let mut next = guard.clone();
        let out = apply(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let store_file = self.store_file();
        let mut guard = self.tables.lock().await;
        if store_file.exists() {
            let contents = fs::read_to_string(&store_file).await?;
            *guard = serde_json::from_str(&contents)?;
            log::info!("Loaded kanban store from {}", store_file.display());
        } else {
            self.persist(&guard).await?;
            log::info!("Created kanban store at {}", store_file.display());
        }

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Temporary snapshots\n*.tmp\n").await?;
        }

        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.store_file().exists()
    }

    async fn create_organization(&self, org: &Organization) -> Result<()> {
        self.mutate(|t| t.create_organization(org)).await
    }

    async fn add_member(&self, membership: &Membership) -> Result<()> {
        self.mutate(|t| t.add_member(membership)).await
    }

    async fn is_member(&self, org: &OrganizationId, user: &UserId) -> Result<bool> {
        Ok(self.tables.lock().await.is_member(org, user))
    }

    async fn create_board(&self, board: &Board) -> Result<()> {
        self.mutate(|t| t.create_board(board)).await
    }

    async fn find_board(&self, id: &BoardId) -> Result<Option<Board>> {
        Ok(self.tables.lock().await.find_board(id))
    }

    async fn delete_board(&self, id: &BoardId) -> Result<()> {
        self.mutate(|t| t.delete_board(id)).await
    }

    async fn insert_list(&self, list: &List) -> Result<()> {
        self.mutate(|t| t.insert_list(list)).await
    }

    async fn find_list(&self, id: &ListId) -> Result<Option<List>> {
        Ok(self.tables.lock().await.find_list(id))
    }

    async fn lists_by_board(&self, board: &BoardId) -> Result<Vec<List>> {
        Ok(self.tables.lock().await.lists_by_board(board))
    }

    async fn delete_list(&self, id: &ListId) -> Result<()> {
        self.mutate(|t| t.delete_list(id)).await
    }

    async fn set_list_orders(&self, updates: &[OrderUpdate<ListId>]) -> Result<()> {
        self.mutate(|t| t.set_list_orders(updates)).await
    }

    async fn next_list_order(&self, board: &BoardId) -> Result<i64> {
        self.tables.lock().await.next_list_order(board)
    }

    async fn insert_card(&self, card: &Card) -> Result<()> {
        self.mutate(|t| t.insert_card(card)).await
    }

    async fn find_card(&self, id: &CardId) -> Result<Option<Card>> {
        Ok(self.tables.lock().await.find_card(id))
    }

    async fn cards_by_list(&self, list: &ListId) -> Result<Vec<Card>> {
        Ok(self.tables.lock().await.cards_by_list(list))
    }

    async fn delete_card(&self, id: &CardId) -> Result<()> {
        self.mutate(|t| t.delete_card(id)).await
    }

    async fn set_card_orders(&self, updates: &[OrderUpdate<CardId>]) -> Result<()> {
        self.mutate(|t| t.set_card_orders(updates)).await
    }

    async fn move_card(&self, id: &CardId, list: &ListId, order: i64) -> Result<Card> {
        self.mutate(|t| t.move_card(id, list, order)).await
    }

    async fn next_card_order(&self, list: &ListId) -> Result<i64> {
        self.tables.lock().await.next_card_order(list)
    }

    async fn insert_image(&self, image: &CardImage) -> Result<()> {
        self.mutate(|t| t.insert_image(image)).await
    }

    async fn find_image(&self, id: &ImageId) -> Result<Option<CardImage>> {
        Ok(self.tables.lock().await.find_image(id))
    }

    async fn images_by_card(&self, card: &CardId) -> Result<Vec<CardImage>> {
        Ok(self.tables.lock().await.images_by_card(card))
    }

    async fn set_image_orders(&self, updates: &[OrderUpdate<ImageId>]) -> Result<()> {
        self.mutate(|t| t.set_image_orders(updates)).await
    }

    async fn next_image_order(&self, card: &CardId) -> Result<i64> {
        self.tables.lock().await.next_image_order(card)
    }
}
