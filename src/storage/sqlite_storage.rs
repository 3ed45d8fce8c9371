use crate::{
    domain::{
        next_order, Board, BoardId, Card, CardId, CardImage, ImageId, List, ListId, Membership,
        OrderUpdate, Organization, OrganizationId, UserId,
    },
    error::{KanbanError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::Mutex;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS organizations (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS memberships (
        organization_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        role TEXT NOT NULL,
        PRIMARY KEY (organization_id, user_id)
    );
    CREATE TABLE IF NOT EXISTS boards (
        id TEXT PRIMARY KEY,
        organization_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS lists (
        id TEXT PRIMARY KEY,
        board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        position INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_lists_board ON lists(board_id, position);
    CREATE TABLE IF NOT EXISTS cards (
        id TEXT PRIMARY KEY,
        list_id TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        position INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_cards_list ON cards(list_id, position);
    CREATE TABLE IF NOT EXISTS card_images (
        id TEXT PRIMARY KEY,
        card_id TEXT NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
        url TEXT NOT NULL,
        position INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_card_images_card ON card_images(card_id, position);
";

const LIST_COLUMNS: &str = "id, board_id, title, position, created_at, updated_at";
const CARD_COLUMNS: &str = "id, list_id, title, description, position, created_at, updated_at";
const IMAGE_COLUMNS: &str = "id, card_id, url, position, created_at, updated_at";

/// SQLite-based storage backend; batch writes run in a single transaction
pub struct SqliteStorage {
    connection: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) a database file
    pub fn open(database_path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(database_path)?)
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn board_from_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: BoardId::from(row.get::<_, String>(0)?),
        organization_id: OrganizationId::from(row.get::<_, String>(1)?),
        title: row.get(2)?,
        created_at: parse_timestamp(3, row.get(3)?)?,
        updated_at: parse_timestamp(4, row.get(4)?)?,
    })
}

fn list_from_row(row: &Row<'_>) -> rusqlite::Result<List> {
    Ok(List {
        id: ListId::from(row.get::<_, String>(0)?),
        board_id: BoardId::from(row.get::<_, String>(1)?),
        title: row.get(2)?,
        order: row.get(3)?,
        created_at: parse_timestamp(4, row.get(4)?)?,
        updated_at: parse_timestamp(5, row.get(5)?)?,
    })
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: CardId::from(row.get::<_, String>(0)?),
        list_id: ListId::from(row.get::<_, String>(1)?),
        title: row.get(2)?,
        description: row.get(3)?,
        order: row.get(4)?,
        created_at: parse_timestamp(5, row.get(5)?)?,
        updated_at: parse_timestamp(6, row.get(6)?)?,
    })
}

fn image_from_row(row: &Row<'_>) -> rusqlite::Result<CardImage> {
    Ok(CardImage {
        id: ImageId::from(row.get::<_, String>(0)?),
        card_id: CardId::from(row.get::<_, String>(1)?),
        url: row.get(2)?,
        order: row.get(3)?,
        created_at: parse_timestamp(4, row.get(4)?)?,
        updated_at: parse_timestamp(5, row.get(5)?)?,
    })
}

fn exists(conn: &Connection, table: &str, id: &str) -> Result<bool> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?1", table);
    let found = conn
        .query_row(&sql, params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn find_list(conn: &Connection, id: &ListId) -> Result<Option<List>> {
    let sql = format!("SELECT {} FROM lists WHERE id = ?1", LIST_COLUMNS);
    Ok(conn
        .query_row(&sql, params![id.as_str()], list_from_row)
        .optional()?)
}

fn find_card(conn: &Connection, id: &CardId) -> Result<Option<Card>> {
    let sql = format!("SELECT {} FROM cards WHERE id = ?1", CARD_COLUMNS);
    Ok(conn
        .query_row(&sql, params![id.as_str()], card_from_row)
        .optional()?)
}

fn lists_by_board(conn: &Connection, board: &BoardId) -> Result<Vec<List>> {
    let sql = format!(
        "SELECT {} FROM lists WHERE board_id = ?1 ORDER BY position, id",
        LIST_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let lists = stmt
        .query_map(params![board.as_str()], list_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(lists)
}

fn cards_by_list(conn: &Connection, list: &ListId) -> Result<Vec<Card>> {
    let sql = format!(
        "SELECT {} FROM cards WHERE list_id = ?1 ORDER BY position, id",
        CARD_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let cards = stmt
        .query_map(params![list.as_str()], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

fn next_position(conn: &Connection, table: &str, parent_column: &str, parent: &str) -> Result<i64> {
    let sql = format!(
        "SELECT MAX(position) FROM {} WHERE {} = ?1",
        table, parent_column
    );
    let max: Option<i64> = conn.query_row(&sql, params![parent], |row| row.get(0))?;
    next_order(max)
}

/// Applies all updates in one transaction; any unknown id rolls everything back
fn set_positions<I: AsRef<str>>(
    conn: &mut Connection,
    table: &str,
    updates: &[OrderUpdate<I>],
    not_found: impl Fn(&str) -> KanbanError,
) -> Result<()> {
    let tx = conn.transaction()?;
    {
        let sql = format!(
            "UPDATE {} SET position = ?1, updated_at = ?2 WHERE id = ?3",
            table
        );
        let mut stmt = tx.prepare(&sql)?;
        let now = Utc::now().to_rfc3339();
        for update in updates {
            let changed = stmt.execute(params![update.order, now, update.id.as_ref()])?;
            if changed == 0 {
                return Err(not_found(update.id.as_ref()));
            }
        }
    }
    tx.commit()?;
    Ok(())
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        let conn = self.connection.lock().await;
        conn.execute_batch(SCHEMA)?;
        log::info!("SQLite schema ready");
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        let conn = self.connection.lock().await;
        exists_table(&conn, "card_images").unwrap_or(false)
    }

    async fn create_organization(&self, org: &Organization) -> Result<()> {
        let conn = self.connection.lock().await;
        conn.execute(
            "INSERT INTO organizations (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![org.id.as_str(), org.name],
        )?;
        Ok(())
    }

    async fn add_member(&self, membership: &Membership) -> Result<()> {
        let conn = self.connection.lock().await;
        if !exists(&conn, "organizations", membership.organization_id.as_str())? {
            return Err(KanbanError::NotFound(format!(
                "Organization {}",
                membership.organization_id
            )));
        }
        conn.execute(
            "INSERT INTO memberships (organization_id, user_id, role) VALUES (?1, ?2, ?3)
             ON CONFLICT(organization_id, user_id) DO UPDATE SET role = excluded.role",
            params![
                membership.organization_id.as_str(),
                membership.user_id.as_str(),
                membership.role.as_str()
            ],
        )?;
        Ok(())
    }

    async fn is_member(&self, org: &OrganizationId, user: &UserId) -> Result<bool> {
        let conn = self.connection.lock().await;
        let found = conn
            .query_row(
                "SELECT 1 FROM memberships WHERE organization_id = ?1 AND user_id = ?2",
                params![org.as_str(), user.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    async fn create_board(&self, board: &Board) -> Result<()> {
        let conn = self.connection.lock().await;
        if !exists(&conn, "organizations", board.organization_id.as_str())? {
            return Err(KanbanError::NotFound(format!(
                "Organization {}",
                board.organization_id
            )));
        }
        conn.execute(
            "INSERT INTO boards (id, organization_id, title, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                board.id.as_str(),
                board.organization_id.as_str(),
                board.title,
                board.created_at.to_rfc3339(),
                board.updated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    async fn find_board(&self, id: &BoardId) -> Result<Option<Board>> {
        let conn = self.connection.lock().await;
        Ok(conn
            .query_row(
                "SELECT id, organization_id, title, created_at, updated_at FROM boards WHERE id = ?1",
                params![id.as_str()],
                board_from_row,
            )
            .optional()?)
    }

    async fn delete_board(&self, id: &BoardId) -> Result<()> {
        let conn = self.connection.lock().await;
        let removed = conn.execute("DELETE FROM boards WHERE id = ?1", params![id.as_str()])?;
        if removed == 0 {
            return Err(KanbanError::board_not_found(id));
        }
        Ok(())
    }

    async fn insert_list(&self, list: &List) -> Result<()> {
        let conn = self.connection.lock().await;
        if !exists(&conn, "boards", list.board_id.as_str())? {
            return Err(KanbanError::board_not_found(&list.board_id));
        }
        conn.execute(
            "INSERT INTO lists (id, board_id, title, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                list.id.as_str(),
                list.board_id.as_str(),
                list.title,
                list.order,
                list.created_at.to_rfc3339(),
                list.updated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    async fn find_list(&self, id: &ListId) -> Result<Option<List>> {
        let conn = self.connection.lock().await;
        find_list(&conn, id)
    }

    async fn lists_by_board(&self, board: &BoardId) -> Result<Vec<List>> {
        let conn = self.connection.lock().await;
        lists_by_board(&conn, board)
    }

    async fn delete_list(&self, id: &ListId) -> Result<()> {
        let conn = self.connection.lock().await;
        let removed = conn.execute("DELETE FROM lists WHERE id = ?1", params![id.as_str()])?;
        if removed == 0 {
            return Err(KanbanError::list_not_found(id));
        }
        Ok(())
    }

    async fn set_list_orders(&self, updates: &[OrderUpdate<ListId>]) -> Result<()> {
        let mut conn = self.connection.lock().await;
        set_positions(&mut conn, "lists", updates, |id| KanbanError::list_not_found(id))
    }

    async fn next_list_order(&self, board: &BoardId) -> Result<i64> {
        let conn = self.connection.lock().await;
        next_position(&conn, "lists", "board_id", board.as_str())
    }

    async fn insert_card(&self, card: &Card) -> Result<()> {
        let conn = self.connection.lock().await;
        if !exists(&conn, "lists", card.list_id.as_str())? {
            return Err(KanbanError::list_not_found(&card.list_id));
        }
        conn.execute(
            "INSERT INTO cards (id, list_id, title, description, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                card.id.as_str(),
                card.list_id.as_str(),
                card.title,
                card.description,
                card.order,
                card.created_at.to_rfc3339(),
                card.updated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    async fn find_card(&self, id: &CardId) -> Result<Option<Card>> {
        let conn = self.connection.lock().await;
        find_card(&conn, id)
    }

    async fn cards_by_list(&self, list: &ListId) -> Result<Vec<Card>> {
        let conn = self.connection.lock().await;
        cards_by_list(&conn, list)
    }

    async fn delete_card(&self, id: &CardId) -> Result<()> {
        let conn = self.connection.lock().await;
        let removed = conn.execute("DELETE FROM cards WHERE id = ?1", params![id.as_str()])?;
        if removed == 0 {
            return Err(KanbanError::card_not_found(id));
        }
        Ok(())
    }

    async fn set_card_orders(&self, updates: &[OrderUpdate<CardId>]) -> Result<()> {
        let mut conn = self.connection.lock().await;
        set_positions(&mut conn, "cards", updates, |id| KanbanError::card_not_found(id))
    }

    async fn move_card(&self, id: &CardId, list: &ListId, order: i64) -> Result<Card> {
        let conn = self.connection.lock().await;
        if !exists(&conn, "lists", list.as_str())? {
            return Err(KanbanError::list_not_found(list));
        }
        let changed = conn.execute(
            "UPDATE cards SET list_id = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
            params![list.as_str(), order, Utc::now().to_rfc3339(), id.as_str()],
        )?;
        if changed == 0 {
            return Err(KanbanError::card_not_found(id));
        }
        find_card(&conn, id)?.ok_or_else(|| KanbanError::card_not_found(id))
    }

    async fn next_card_order(&self, list: &ListId) -> Result<i64> {
        let conn = self.connection.lock().await;
        next_position(&conn, "cards", "list_id", list.as_str())
    }

    async fn insert_image(&self, image: &CardImage) -> Result<()> {
        let conn = self.connection.lock().await;
        if !exists(&conn, "cards", image.card_id.as_str())? {
            return Err(KanbanError::card_not_found(&image.card_id));
        }
        conn.execute(
            "INSERT INTO card_images (id, card_id, url, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                image.id.as_str(),
                image.card_id.as_str(),
                image.url,
                image.order,
                image.created_at.to_rfc3339(),
                image.updated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    async fn find_image(&self, id: &ImageId) -> Result<Option<CardImage>> {
        let conn = self.connection.lock().await;
        let sql = format!("SELECT {} FROM card_images WHERE id = ?1", IMAGE_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id.as_str()], image_from_row)
            .optional()?)
    }

    async fn images_by_card(&self, card: &CardId) -> Result<Vec<CardImage>> {
        let conn = self.connection.lock().await;
        let sql = format!(
            "SELECT {} FROM card_images WHERE card_id = ?1 ORDER BY position, id",
            IMAGE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let images = stmt
            .query_map(params![card.as_str()], image_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(images)
    }

    async fn set_image_orders(&self, updates: &[OrderUpdate<ImageId>]) -> Result<()> {
        let mut conn = self.connection.lock().await;
        set_positions(&mut conn, "card_images", updates, |id| {
            KanbanError::image_not_found(id)
        })
    }

    async fn next_image_order(&self, card: &CardId) -> Result<i64> {
        let conn = self.connection.lock().await;
        next_position(&conn, "card_images", "card_id", card.as_str())
    }
}

fn exists_table(conn: &Connection, name: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
