//! Bingo items and the content pool boards are drawn from

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BingoError, BingoResult};

/// Index of an item inside its [`ContentPool`]
pub type ItemId = usize;

/// A single bingo item (one square's content)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Display text, unique within a pool
    pub text: String,
    /// Icon shown above the text (usually an emoji)
    #[serde(default)]
    pub icon: String,
    /// The free space item
    #[serde(default, alias = "isFree", alias = "isFreeSpace")]
    pub is_free: bool,
}

impl Item {
    /// Create a regular (callable) item
    pub fn new(text: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: icon.into(),
            is_free: false,
        }
    }

    /// Create the free space item
    pub fn free(text: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: icon.into(),
            is_free: true,
        }
    }
}

/// Validated list of items with exactly one free item
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPool {
    items: Vec<Item>,
    free_id: ItemId,
}

impl ContentPool {
    /// Build a pool, rejecting duplicate texts and anything but one free item
    pub fn new(items: Vec<Item>) -> BingoResult<Self> {
        {
            let mut seen = HashSet::with_capacity(items.len());
            for item in &items {
                if !seen.insert(item.text.as_str()) {
                    return Err(BingoError::DuplicateItem(item.text.clone()));
                }
            }
        }

        let free: Vec<ItemId> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_free)
            .map(|(id, _)| id)
            .collect();
        if free.len() != 1 {
            return Err(BingoError::FreeItemCount(free.len()));
        }

        Ok(Self {
            items,
            free_id: free[0],
        })
    }

    /// Built-in party pool: 30 callable items plus the free space
    pub fn standard() -> Self {
        let items = vec![
            Item::new("Someone Laughs Too Loud", "😂"),
            Item::new("Spilled Drink", "🥤"),
            Item::new("Dog Begs for Food", "🐶"),
            Item::new("Phone Rings", "📱"),
            Item::new("Burnt Toast", "🍞"),
            Item::new("Grandma Tells a Story", "👵"),
            Item::new("Dance Break", "💃"),
            Item::new("Lost Remote", "📺"),
            Item::new("Cake Appears", "🎂"),
            Item::new("Someone Sings Along", "🎤"),
            Item::new("Board Game Argument", "🎲"),
            Item::new("Group Photo", "📸"),
            Item::new("Doorbell Rings", "🔔"),
            Item::new("Baby Cries", "👶"),
            Item::new("Coffee Refill", "☕"),
            Item::new("Pizza Delivery", "🍕"),
            Item::new("Someone Falls Asleep", "😴"),
            Item::new("Inside Joke", "🤫"),
            Item::new("Power Nap", "🛋️"),
            Item::new("Bad Pun", "🙄"),
            Item::new("Someone Cries Happy Tears", "🥲"),
            Item::new("Cat Knocks Something Over", "🐱"),
            Item::new("Music Too Loud", "🔊"),
            Item::new("Dishes Pile Up", "🍽️"),
            Item::new("Surprise Guest", "🎉"),
            Item::new("Card Trick", "🃏"),
            Item::new("Rain Outside", "🌧️"),
            Item::new("Leftovers Packed", "🥡"),
            Item::new("Hug Goodbye", "🤗"),
            Item::new("Late Night Snack", "🌮"),
            Item::free("FREE", "⭐"),
        ];
        // The literal above has unique texts and a single free item.
        let free_id = items.len() - 1;
        Self { items, free_id }
    }

    /// Parse a pool from a JSON array of items
    pub fn from_json_str(json: &str) -> BingoResult<Self> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// Parse a pool from a YAML list of items
    pub fn from_yaml_str(yaml: &str) -> BingoResult<Self> {
        let items: Vec<Item> = serde_yml::from_str(yaml)?;
        Self::new(items)
    }

    /// Load a pool from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> BingoResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let pool = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            _ => {
                return Err(BingoError::Config(format!(
                    "Unsupported content pool format: {}",
                    path.display()
                )));
            }
        };
        log::info!(
            "Loaded content pool from {} ({} callable items)",
            path.display(),
            pool.callable_count()
        );
        Ok(pool)
    }

    /// Get item by ID
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// ID of the free item
    pub fn free_id(&self) -> ItemId {
        self.free_id
    }

    /// The free item
    pub fn free_item(&self) -> &Item {
        &self.items[self.free_id]
    }

    /// IDs of all callable (non-free) items, in pool order
    pub fn callable_ids(&self) -> Vec<ItemId> {
        (0..self.items.len()).filter(|&id| id != self.free_id).collect()
    }

    /// Number of callable items
    pub fn callable_count(&self) -> usize {
        self.items.len() - 1
    }

    /// Total items including the free one
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a validated pool
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in pool order
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

impl Default for ContentPool {
    fn default() -> Self {
        Self::standard()
    }
}
