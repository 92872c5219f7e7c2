use crate::models::{Entry, InventoryRecord, RecordId};

/// Ordered records in insertion order, each tagged with a stable id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryCollection {
    entries: Vec<Entry>,
    next_id: u64,
}

impl InventoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap freshly loaded records, handing out ids in file order
    pub fn from_records(records: Vec<InventoryRecord>) -> Self {
        let mut collection = Self::new();
        for record in records {
            collection.push(record);
        }
        collection
    }

    /// Append a record and return its id
    pub fn push(&mut self, record: InventoryRecord) -> RecordId {
        self.next_id += 1;
        let id = RecordId(self.next_id);
        self.entries.push(Entry { id, record });
        id
    }

    /// Swap the record behind `id` wholesale; the old value comes back.
    /// Unknown ids leave the collection untouched.
    pub fn replace(&mut self, id: RecordId, record: InventoryRecord) -> Option<InventoryRecord> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| std::mem::replace(&mut e.record, record))
    }

    /// Remove the record behind `id`. Unknown ids are a silent no-op.
    pub fn remove(&mut self, id: RecordId) -> Option<InventoryRecord> {
        let position = self.position(id)?;
        Some(self.entries.remove(position).record)
    }

    pub fn get(&self, id: RecordId) -> Option<&InventoryRecord> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.record)
    }

    /// Where `id` currently sits in storage order
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Id of the record at a storage position
    pub fn id_at(&self, position: usize) -> Option<RecordId> {
        self.entries.get(position).map(|e| e.id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Plain records in order, ready to be written out
    pub fn to_records(&self) -> Vec<InventoryRecord> {
        self.records().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
