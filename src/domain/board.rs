use crate::domain::color::{self, Gradient, Hsl};
use std::fmt;
use uuid::Uuid;

/// In-memory handle for a live item. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// In-memory handle for a live tier. Tier names may repeat, so the
/// handle is what drag sessions and mutations refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TierId(Uuid);

impl TierId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier-{}", self.0)
    }
}

/// A place items can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Pool,
    Tier(TierId),
}

/// Trims `text`, returning `None` when nothing is left
fn normalized(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A labeled card that can be ranked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    label: String,
}

impl Item {
    /// Creates an item from a label, trimming it. Blank labels yield `None`.
    pub fn new(label: &str) -> Option<Self> {
        normalized(label).map(|label| Self {
            id: ItemId::new(),
            label,
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn accent(&self) -> Hsl {
        color::item_accent_color(&self.label)
    }
}

/// A named, ordered ranking row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    id: TierId,
    name: String,
    items: Vec<Item>,
}

impl Tier {
    fn new(name: String) -> Self {
        Self {
            id: TierId::new(),
            name,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> TierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn accent(&self) -> Hsl {
        color::accent_color(self.color_seed())
    }

    pub fn background(&self) -> Gradient {
        color::background_gradient(self.color_seed())
    }

    fn color_seed(&self) -> &str {
        if self.name.is_empty() {
            "tier"
        } else {
            &self.name
        }
    }
}

/// Tier list board: a title, ordered tiers and the pool of unranked items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    title: String,
    tiers: Vec<Tier>,
    pool: Vec<Item>,
}

impl Board {
    /// Creates an empty board with no tiers. The title is trimmed.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            tiers: Vec::new(),
            pool: Vec::new(),
        }
    }

    /// Creates a board with one empty tier per name, in order
    pub fn with_default_tiers<S: AsRef<str>>(title: impl Into<String>, names: &[S]) -> Self {
        let mut board = Self::new(title);
        for name in names {
            board.add_tier(name.as_ref());
        }
        board
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn pool(&self) -> &[Item] {
        &self.pool
    }

    /// Total number of items across every tier and the pool
    pub fn item_count(&self) -> usize {
        self.pool.len() + self.tiers.iter().map(|tier| tier.items.len()).sum::<usize>()
    }

    /// Commits a new title. Blank text falls back to `fallback`.
    pub fn set_title(&mut self, text: &str, fallback: &str) {
        self.title = normalized(text).unwrap_or_else(|| fallback.to_string());
    }

    /// Appends a new item to the pool. Blank labels are ignored.
    pub fn add_item(&mut self, label: &str) -> Option<ItemId> {
        let item = Item::new(label)?;
        let id = item.id;
        self.pool.push(item);
        Some(id)
    }

    /// Renames an item in place. Returns false for blank labels or unknown items.
    pub fn rename_item(&mut self, id: ItemId, label: &str) -> bool {
        let Some(label) = normalized(label) else {
            return false;
        };
        match self.item_mut(id) {
            Some(item) => {
                item.label = label;
                true
            }
            None => false,
        }
    }

    /// Removes an item from wherever it lives
    pub fn delete_item(&mut self, id: ItemId) -> Option<Item> {
        let (container, index) = self.locate_item(id)?;
        self.items_mut(container).map(|items| items.remove(index))
    }

    /// Removes every item from every tier and the pool, returning how many went
    pub fn clear_items(&mut self) -> usize {
        let removed = self.item_count();
        self.pool.clear();
        for tier in &mut self.tiers {
            tier.items.clear();
        }
        removed
    }

    /// Appends a new empty tier. Blank names are ignored.
    pub fn add_tier(&mut self, name: &str) -> Option<TierId> {
        let tier = Tier::new(normalized(name)?);
        let id = tier.id;
        self.tiers.push(tier);
        Some(id)
    }

    /// Renames a tier. Returns false for blank names or unknown tiers.
    pub fn rename_tier(&mut self, id: TierId, name: &str) -> bool {
        let Some(name) = normalized(name) else {
            return false;
        };
        match self.tiers.iter_mut().find(|tier| tier.id == id) {
            Some(tier) => {
                tier.name = name;
                true
            }
            None => false,
        }
    }

    /// Deletes a tier after moving its items, in order, to the end of the pool
    pub fn delete_tier(&mut self, id: TierId) -> bool {
        let Some(index) = self.tier_index(id) else {
            return false;
        };
        let mut tier = self.tiers.remove(index);
        self.pool.append(&mut tier.items);
        true
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.pool
            .iter()
            .chain(self.tiers.iter().flat_map(|tier| tier.items.iter()))
            .find(|item| item.id == id)
    }

    pub fn tier(&self, id: TierId) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.id == id)
    }

    /// Position of a tier in the tier sequence
    pub fn tier_index(&self, id: TierId) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.id == id)
    }

    /// Finds the container holding an item and its index within it
    pub fn locate_item(&self, id: ItemId) -> Option<(Container, usize)> {
        if let Some(index) = self.pool.iter().position(|item| item.id == id) {
            return Some((Container::Pool, index));
        }
        self.tiers.iter().find_map(|tier| {
            tier.items
                .iter()
                .position(|item| item.id == id)
                .map(|index| (Container::Tier(tier.id), index))
        })
    }

    /// Items held by a container, or `None` if the tier no longer exists
    pub fn items_in(&self, container: Container) -> Option<&[Item]> {
        match container {
            Container::Pool => Some(&self.pool),
            Container::Tier(id) => self.tier(id).map(|tier| tier.items.as_slice()),
        }
    }

    /// Moves an item to the end of `to`
    pub fn move_item(&mut self, id: ItemId, to: Container) -> bool {
        self.move_item_to(id, to, usize::MAX)
    }

    /// Moves an item into `to` at `index`, clamped to the container's length.
    /// Nothing changes if either the item or the target is missing.
    pub fn move_item_to(&mut self, id: ItemId, to: Container, index: usize) -> bool {
        if self.items_in(to).is_none() {
            return false;
        }
        let Some((from, from_index)) = self.locate_item(id) else {
            return false;
        };
        let Some(item) = self.items_mut(from).map(|items| items.remove(from_index)) else {
            return false;
        };
        match self.items_mut(to) {
            Some(items) => {
                let index = index.min(items.len());
                items.insert(index, item);
                true
            }
            None => false,
        }
    }

    /// Moves a tier to `index` in the tier sequence, clamped to the end.
    /// Returns true only when the order actually changed.
    pub fn move_tier(&mut self, id: TierId, index: usize) -> bool {
        let Some(from) = self.tier_index(id) else {
            return false;
        };
        let tier = self.tiers.remove(from);
        let index = index.min(self.tiers.len());
        self.tiers.insert(index, tier);
        from != index
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.pool
            .iter_mut()
            .chain(self.tiers.iter_mut().flat_map(|tier| tier.items.iter_mut()))
            .find(|item| item.id == id)
    }

    fn items_mut(&mut self, container: Container) -> Option<&mut Vec<Item>> {
        match container {
            Container::Pool => Some(&mut self.pool),
            Container::Tier(id) => self
                .tiers
                .iter_mut()
                .find(|tier| tier.id == id)
                .map(|tier| &mut tier.items),
        }
    }

    /// Rebuilds a board from trusted parts; used by snapshot restore
    pub(crate) fn from_parts(
        title: String,
        tiers: Vec<(String, Vec<String>)>,
        pool: Vec<String>,
    ) -> Self {
        let mut board = Self::new(title);
        for (name, labels) in tiers {
            let mut tier = Tier::new(name);
            tier.items = labels.iter().filter_map(|label| Item::new(label)).collect();
            board.tiers.push(tier);
        }
        board.pool = pool.iter().filter_map(|label| Item::new(label)).collect();
        board
    }
}
