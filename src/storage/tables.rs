//! In-process tables shared by the memory and file backends.
//!
//! Every mutating method validates its whole input before touching any row,
//! so a failed call leaves the tables exactly as they were.

use crate::{
    domain::{
        next_order, sort_by_order, Board, BoardId, Card, CardId, CardImage, ImageId, List, ListId,
        Membership, OrderUpdate, Organization, OrganizationId, UserId,
    },
    error::{KanbanError, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    organizations: BTreeMap<OrganizationId, Organization>,
    #[serde(default)]
    memberships: Vec<Membership>,
    #[serde(default)]
    boards: BTreeMap<BoardId, Board>,
    #[serde(default)]
    lists: BTreeMap<ListId, List>,
    #[serde(default)]
    cards: BTreeMap<CardId, Card>,
    #[serde(default)]
    images: BTreeMap<ImageId, CardImage>,
}

impl Tables {
    pub fn create_organization(&mut self, org: &Organization) -> Result<()> {
        self.organizations.insert(org.id.clone(), org.clone());
        Ok(())
    }

    pub fn add_member(&mut self, membership: &Membership) -> Result<()> {
        if !self.organizations.contains_key(&membership.organization_id) {
            return Err(KanbanError::NotFound(format!(
                "Organization {}",
                membership.organization_id
            )));
        }
        match self.memberships.iter_mut().find(|m| {
            m.organization_id == membership.organization_id && m.user_id == membership.user_id
        }) {
            Some(existing) => existing.role = membership.role,
            None => self.memberships.push(membership.clone()),
        }
        Ok(())
    }

    pub fn is_member(&self, org: &OrganizationId, user: &UserId) -> bool {
        self.memberships
            .iter()
            .any(|m| &m.organization_id == org && &m.user_id == user)
    }

    pub fn create_board(&mut self, board: &Board) -> Result<()> {
        if !self.organizations.contains_key(&board.organization_id) {
            return Err(KanbanError::NotFound(format!(
                "Organization {}",
                board.organization_id
            )));
        }
        self.boards.insert(board.id.clone(), board.clone());
        Ok(())
    }

    pub fn find_board(&self, id: &BoardId) -> Option<Board> {
        self.boards.get(id).cloned()
    }

    pub fn delete_board(&mut self, id: &BoardId) -> Result<()> {
        if self.boards.remove(id).is_none() {
            return Err(KanbanError::board_not_found(id));
        }
        let list_ids: Vec<ListId> = self
            .lists
            .values()
            .filter(|l| &l.board_id == id)
            .map(|l| l.id.clone())
            .collect();
        for list_id in list_ids {
            self.remove_list_cascade(&list_id);
        }
        Ok(())
    }

    pub fn insert_list(&mut self, list: &List) -> Result<()> {
        if !self.boards.contains_key(&list.board_id) {
            return Err(KanbanError::board_not_found(&list.board_id));
        }
        self.lists.insert(list.id.clone(), list.clone());
        Ok(())
    }

    pub fn find_list(&self, id: &ListId) -> Option<List> {
        self.lists.get(id).cloned()
    }

    pub fn lists_by_board(&self, board: &BoardId) -> Vec<List> {
        let mut lists: Vec<List> = self
            .lists
            .values()
            .filter(|l| &l.board_id == board)
            .cloned()
            .collect();
        sort_by_order(&mut lists);
        lists
    }

    pub fn delete_list(&mut self, id: &ListId) -> Result<()> {
        if !self.lists.contains_key(id) {
            return Err(KanbanError::list_not_found(id));
        }
        self.remove_list_cascade(id);
        Ok(())
    }

    fn remove_list_cascade(&mut self, id: &ListId) {
        self.lists.remove(id);
        self.cards.retain(|_, card| &card.list_id != id);
        let cards = &self.cards;
        self.images.retain(|_, image| cards.contains_key(&image.card_id));
    }

    pub fn set_list_orders(&mut self, updates: &[OrderUpdate<ListId>]) -> Result<()> {
        if let Some(missing) = updates.iter().find(|u| !self.lists.contains_key(&u.id)) {
            return Err(KanbanError::list_not_found(&missing.id));
        }
        for update in updates {
            if let Some(list) = self.lists.get_mut(&update.id) {
                list.set_order(update.order);
            }
        }
        Ok(())
    }

    pub fn next_list_order(&self, board: &BoardId) -> Result<i64> {
        next_order(
            self.lists
                .values()
                .filter(|l| &l.board_id == board)
                .map(|l| l.order),
        )
    }

    pub fn insert_card(&mut self, card: &Card) -> Result<()> {
        if !self.lists.contains_key(&card.list_id) {
            return Err(KanbanError::list_not_found(&card.list_id));
        }
        self.cards.insert(card.id.clone(), card.clone());
        Ok(())
    }

    pub fn find_card(&self, id: &CardId) -> Option<Card> {
        self.cards.get(id).cloned()
    }

    pub fn cards_by_list(&self, list: &ListId) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .values()
            .filter(|c| &c.list_id == list)
            .cloned()
            .collect();
        sort_by_order(&mut cards);
        cards
    }

    pub fn delete_card(&mut self, id: &CardId) -> Result<()> {
        if self.cards.remove(id).is_none() {
            return Err(KanbanError::card_not_found(id));
        }
        self.images.retain(|_, image| &image.card_id != id);
        Ok(())
    }

    pub fn set_card_orders(&mut self, updates: &[OrderUpdate<CardId>]) -> Result<()> {
        if let Some(missing) = updates.iter().find(|u| !self.cards.contains_key(&u.id)) {
            return Err(KanbanError::card_not_found(&missing.id));
        }
        for update in updates {
            if let Some(card) = self.cards.get_mut(&update.id) {
                card.set_order(update.order);
            }
        }
        Ok(())
    }

    pub fn move_card(&mut self, id: &CardId, list: &ListId, order: i64) -> Result<Card> {
        if !self.lists.contains_key(list) {
            return Err(KanbanError::list_not_found(list));
        }
        let card = self
            .cards
            .get_mut(id)
            .ok_or_else(|| KanbanError::card_not_found(id))?;
        card.move_to(list.clone(), order);
        Ok(card.clone())
    }

    pub fn next_card_order(&self, list: &ListId) -> Result<i64> {
        next_order(
            self.cards
                .values()
                .filter(|c| &c.list_id == list)
                .map(|c| c.order),
        )
    }

    pub fn insert_image(&mut self, image: &CardImage) -> Result<()> {
        if !self.cards.contains_key(&image.card_id) {
            return Err(KanbanError::card_not_found(&image.card_id));
        }
        self.images.insert(image.id.clone(), image.clone());
        Ok(())
    }

    pub fn find_image(&self, id: &ImageId) -> Option<CardImage> {
        self.images.get(id).cloned()
    }

    pub fn images_by_card(&self, card: &CardId) -> Vec<CardImage> {
        let mut images: Vec<CardImage> = self
            .images
            .values()
            .filter(|i| &i.card_id == card)
            .cloned()
            .collect();
        sort_by_order(&mut images);
        images
    }

    pub fn set_image_orders(&mut self, updates: &[OrderUpdate<ImageId>]) -> Result<()> {
        if let Some(missing) = updates.iter().find(|u| !self.images.contains_key(&u.id)) {
            return Err(KanbanError::image_not_found(&missing.id));
        }
        for update in updates {
            if let Some(image) = self.images.get_mut(&update.id) {
                image.set_order(update.order);
            }
        }
        Ok(())
    }

    pub fn next_image_order(&self, card: &CardId) -> Result<i64> {
        next_order(
            self.images
                .values()
                .filter(|i| &i.card_id == card)
                .map(|i| i.order),
        )
    }
}
