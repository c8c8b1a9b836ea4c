use hashbrown::HashMap;
use indicatif::ProgressBar;
use itertools::Itertools;

use anyhow::Result;

use crate::io::{self, InteractionRecord, ItemIndex, UserPos};

const PROGRESS_THRESHOLD: usize = 10_000;

/// Bidirectional mapping between item labels and dense indices.
///
/// Indices are assigned in strict first-appearance order and never reused.
#[derive(Debug, Default, Clone)]
pub struct ItemCatalog {
    labels: Vec<String>,
    label_to_index: HashMap<String, ItemIndex>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        ItemCatalog::default()
    }

    /// Returns the dense index for `label`, assigning the next unused index
    /// when the label has not been seen before. Amortized O(1) per call.
    pub fn resolve(&mut self, label: &str) -> ItemIndex {
        if let Some(&index) = self.label_to_index.get(label) {
            return index;
        }
        let index = self.labels.len();
        self.labels.push(label.to_string());
        self.label_to_index.insert(label.to_string(), index);
        index
    }

    pub fn index_of(&self, label: &str) -> Option<ItemIndex> {
        self.label_to_index.get(label).copied()
    }

    pub fn label(&self, index: ItemIndex) -> &str {
        &self.labels[index]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Accumulates interaction records into the utility matrix. The result type
/// is only handed out once construction finished, so no caller can observe a
/// half-built index.
pub struct UtilityIndexBuilder {
    catalog: ItemCatalog,
    user_ids: Vec<String>,
    item_sets: Vec<Vec<ItemIndex>>,
}

impl Default for UtilityIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UtilityIndexBuilder {
    pub fn new() -> Self {
        UtilityIndexBuilder {
            catalog: ItemCatalog::new(),
            user_ids: Vec::new(),
            item_sets: Vec::new(),
        }
    }

    /// Appends one user at the next position. Duplicate items within the
    /// record collapse to a single membership; the stored set is sorted.
    pub fn add_record(&mut self, record: &InteractionRecord) {
        let item_set: Vec<ItemIndex> = record
            .items
            .iter()
            .map(|label| self.catalog.resolve(label))
            .sorted()
            .dedup()
            .collect();

        self.user_ids.push(record.user_id.clone());
        self.item_sets.push(item_set);
    }

    pub fn build(self) -> UtilityIndex {
        UtilityIndex {
            catalog: self.catalog,
            user_ids: self.user_ids,
            item_sets: self.item_sets,
        }
    }
}

/// The finished utility matrix: per user position the sorted set of item
/// indices, plus both directions of the item mapping. Read-only after build.
pub struct UtilityIndex {
    catalog: ItemCatalog,
    user_ids: Vec<String>,
    item_sets: Vec<Vec<ItemIndex>>,
}

impl UtilityIndex {
    pub fn from_records(records: &[InteractionRecord]) -> Self {
        let progress = if records.len() > PROGRESS_THRESHOLD {
            Some(ProgressBar::new(records.len() as u64))
        } else {
            None
        };

        let mut builder = UtilityIndexBuilder::new();
        for record in records {
            builder.add_record(record);
            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }
        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }

        builder.build()
    }

    pub fn new_from_csv(path: &str) -> Result<Self> {
        let records = io::read_interaction_records(path)?;
        Ok(UtilityIndex::from_records(&records))
    }

    pub fn num_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn num_items(&self) -> usize {
        self.catalog.len()
    }

    /// Sorted, duplicate-free item indices for the user at `position`.
    pub fn items_for_user(&self, position: UserPos) -> &[ItemIndex] {
        &self.item_sets[position]
    }

    pub fn user_id(&self, position: UserPos) -> &str {
        &self.user_ids[position]
    }

    pub fn item_label(&self, index: ItemIndex) -> &str {
        self.catalog.label(index)
    }

    pub fn lookup_item(&self, label: &str) -> Option<ItemIndex> {
        self.catalog.index_of(label)
    }
}
