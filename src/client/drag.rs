//! Drag-and-drop state for one board view.
//!
//! A drag starts with a snapshot of every list, tracks what is hovered while
//! the pointer moves, and on drop applies the move to the local lists
//! immediately. The returned [`DropOutcome`] carries the persistence calls to
//! issue and the pre-drag snapshot for an optional rollback.

use crate::domain::{
    array_move, renumber, BoardId, BoardWithLists, Card, CardId, List, ListId, ListWithCards,
    OrderUpdate,
};

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    Card(CardId),
    List(ListId),
}

/// What the pointer is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Card(CardId),
    List(ListId),
}

/// Hover position of a dragged card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hover {
    pub list: Option<ListId>,
    pub card: Option<CardId>,
}

impl Hover {
    fn clear(&mut self) {
        self.list = None;
        self.card = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        item: DragItem,
        snapshot: Vec<ListWithCards>,
        hover: Hover,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// Dropped outside any target; the snapshot was restored
    Invalid,
    SameList,
    CrossList,
    ListReordered,
    /// Nothing to do
    Unchanged,
}

/// A server call produced by a drop, issued in sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistCall {
    /// Re-parent without an explicit order; the server appends
    MoveCard { card: CardId, list: ListId },
    ReorderCards(Vec<OrderUpdate<CardId>>),
    ReorderLists {
        board: BoardId,
        lists: Vec<OrderUpdate<ListId>>,
    },
}

#[derive(Debug, Clone)]
pub struct DropOutcome {
    pub kind: DropKind,
    pub calls: Vec<PersistCall>,
    /// Lists as they were when the drag started
    pub previous: Vec<ListWithCards>,
}

impl DropOutcome {
    fn new(kind: DropKind, calls: Vec<PersistCall>, previous: Vec<ListWithCards>) -> Self {
        Self {
            kind,
            calls,
            previous,
        }
    }

    fn unchanged(previous: Vec<ListWithCards>) -> Self {
        Self::new(DropKind::Unchanged, Vec::new(), previous)
    }
}

/// Local, optimistically updated copy of one board
#[derive(Debug, Clone)]
pub struct BoardView {
    board_id: BoardId,
    lists: Vec<ListWithCards>,
    drag: DragState,
}

impl From<BoardWithLists> for BoardView {
    fn from(board: BoardWithLists) -> Self {
        Self::new(board.board.id, board.lists)
    }
}

impl BoardView {
    pub fn new(board_id: BoardId, lists: Vec<ListWithCards>) -> Self {
        Self {
            board_id,
            lists,
            drag: DragState::Idle,
        }
    }

    pub fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    pub fn lists(&self) -> &[ListWithCards] {
        &self.lists
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Index of the list holding `card_id`
    fn list_of_card(&self, card_id: &CardId) -> Option<usize> {
        self.lists.iter().position(|l| l.contains_card(card_id))
    }

    fn list_index(&self, list_id: &ListId) -> Option<usize> {
        self.lists.iter().position(|l| l.id() == list_id)
    }

    /// Begins a drag; returns `false` if already dragging or the item is unknown
    pub fn start(&mut self, item: DragItem) -> bool {
        if self.is_dragging() {
            return false;
        }
        let known = match &item {
            DragItem::Card(id) => self.list_of_card(id).is_some(),
            DragItem::List(id) => self.list_index(id).is_some(),
        };
        if !known {
            log::debug!("Ignoring drag of unknown item {:?}", item);
            return false;
        }

        self.drag = DragState::Dragging {
            item,
            snapshot: self.lists.clone(),
            hover: Hover::default(),
        };
        true
    }

    /// Tracks the hovered target while dragging
    pub fn over(&mut self, target: Option<DropTarget>) {
        let parent = match &target {
            Some(DropTarget::Card(card)) => self.list_of_card(card).map(|i| self.lists[i].id().clone()),
            _ => None,
        };

        let DragState::Dragging { item, hover, .. } = &mut self.drag else {
            return;
        };
        match (item, target) {
            (DragItem::Card(_), Some(DropTarget::List(list))) => {
                hover.list = Some(list);
                hover.card = None;
            }
            (DragItem::Card(_), Some(DropTarget::Card(card))) => {
                hover.list = parent;
                hover.card = Some(card);
            }
            _ => hover.clear(),
        }
    }

    /// Finishes the drag and applies the drop locally
    pub fn end(&mut self, target: Option<DropTarget>) -> DropOutcome {
        let DragState::Dragging {
            item,
            snapshot,
            hover,
        } = std::mem::take(&mut self.drag)
        else {
            return DropOutcome::unchanged(self.lists.clone());
        };

        let Some(target) = target else {
            self.lists = snapshot.clone();
            return DropOutcome::new(DropKind::Invalid, Vec::new(), snapshot);
        };

        match item {
            DragItem::Card(card) => self.drop_card(card, target, hover, snapshot),
            DragItem::List(list) => self.drop_list(list, target, snapshot),
        }
    }

    fn drop_card(
        &mut self,
        card_id: CardId,
        target: DropTarget,
        hover: Hover,
        snapshot: Vec<ListWithCards>,
    ) -> DropOutcome {
        let Some(from) = self.list_of_card(&card_id) else {
            return DropOutcome::unchanged(snapshot);
        };

        // dropped onto another card of the same list
        if let DropTarget::Card(over) = &target {
            if *over != card_id && self.list_of_card(over) == Some(from) {
                let list = &mut self.lists[from];
                let (Some(old), Some(new)) = (list.card_index(&card_id), list.card_index(over))
                else {
                    return DropOutcome::unchanged(snapshot);
                };
                array_move(&mut list.cards, old, new);
                let call = PersistCall::ReorderCards(renumber_cards(list));
                return DropOutcome::new(DropKind::SameList, vec![call], snapshot);
            }
        }

        let from_id = self.lists[from].id().clone();
        let Some(hovered) = hover.list else {
            return DropOutcome::unchanged(snapshot);
        };

        // dropped onto its own list: goes to the end. A card dropped on itself
        // lands here too, since hovering it set the hovered list to its own.
        if hovered == from_id {
            let list = &mut self.lists[from];
            let last = list.cards.len() - 1;
            let Some(old) = list.card_index(&card_id).filter(|&i| i != last) else {
                return DropOutcome::unchanged(snapshot);
            };
            array_move(&mut list.cards, old, last);
            let call = PersistCall::ReorderCards(renumber_cards(list));
            return DropOutcome::new(DropKind::SameList, vec![call], snapshot);
        }

        let Some(to) = self.list_index(&hovered) else {
            return DropOutcome::unchanged(snapshot);
        };
        let Some(mut card) = self.take_card(from, &card_id) else {
            return DropOutcome::unchanged(snapshot);
        };
        card.list_id = hovered.clone();

        let dest = &mut self.lists[to];
        let index = match &hover.card {
            Some(over) => dest.card_index(over).unwrap_or(0),
            None => dest.cards.len(),
        };
        dest.cards.insert(index, card);

        let calls = vec![
            PersistCall::MoveCard {
                card: card_id,
                list: hovered,
            },
            PersistCall::ReorderCards(renumber_cards(dest)),
        ];
        DropOutcome::new(DropKind::CrossList, calls, snapshot)
    }

    fn drop_list(
        &mut self,
        list_id: ListId,
        target: DropTarget,
        snapshot: Vec<ListWithCards>,
    ) -> DropOutcome {
        let DropTarget::List(over) = target else {
            return DropOutcome::unchanged(snapshot);
        };
        let (Some(old), Some(new)) = (self.list_index(&list_id), self.list_index(&over)) else {
            return DropOutcome::unchanged(snapshot);
        };
        if old == new {
            return DropOutcome::unchanged(snapshot);
        }

        array_move(&mut self.lists, old, new);
        let updates = renumber(&self.lists);
        for (list, update) in self.lists.iter_mut().zip(&updates) {
            list.list.order = update.order;
        }
        let call = PersistCall::ReorderLists {
            board: self.board_id.clone(),
            lists: updates,
        };
        DropOutcome::new(DropKind::ListReordered, vec![call], snapshot)
    }

    fn take_card(&mut self, list: usize, card_id: &CardId) -> Option<Card> {
        let list = &mut self.lists[list];
        let index = list.card_index(card_id)?;
        Some(list.cards.remove(index))
    }

    /// Restores a snapshot and drops any drag in progress
    pub fn revert(&mut self, previous: Vec<ListWithCards>) {
        self.lists = previous;
        self.drag = DragState::Idle;
    }

    /// Appends a newly created list
    pub fn insert_list(&mut self, list: List) {
        self.lists.push(ListWithCards::new(list, Vec::new()));
    }

    /// Appends a newly created card to its list; `false` when the list isn't shown
    pub fn insert_card(&mut self, card: Card) -> bool {
        match self.list_index(&card.list_id) {
            Some(index) => {
                self.lists[index].cards.push(card);
                true
            }
            None => false,
        }
    }

    pub fn remove_card(&mut self, card_id: &CardId) -> Option<Card> {
        let list = self.list_of_card(card_id)?;
        self.take_card(list, card_id)
    }

    pub fn remove_list(&mut self, list_id: &ListId) -> Option<ListWithCards> {
        let index = self.list_index(list_id)?;
        Some(self.lists.remove(index))
    }
}

/// Rewrites the local card orders to `1..=n` and returns the matching updates
fn renumber_cards(list: &mut ListWithCards) -> Vec<OrderUpdate<CardId>> {
    let updates = renumber(&list.cards);
    for (card, update) in list.cards.iter_mut().zip(&updates) {
        card.order = update.order;
    }
    updates
}
