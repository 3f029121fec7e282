//! Session-scoped override state: the predefined layer loaded at start and
//! the decisions recorded along the way. Resolvers receive this explicitly
//! instead of threading two maps through every call.

use std::collections::HashMap;

use crate::data::{OverrideRecord, OverrideStore};

#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    predefined: OverrideStore,
    newly_chosen: HashMap<String, OverrideRecord>,
}

impl ResolutionContext {
    pub fn new(predefined: OverrideStore) -> Self {
        Self {
            predefined,
            newly_chosen: HashMap::new(),
        }
    }

    pub fn predefined(&self, species_id: &str) -> Option<&OverrideRecord> {
        self.predefined.get(species_id)
    }

    /// Weight for the output record: from the predefined layer, else 1.
    pub fn weight(&self, species_id: &str) -> u32 {
        self.predefined.weight(species_id)
    }

    /// Records a fast-move decision. The record is created on first touch;
    /// a charged decision for the same id lands in the same record.
    pub fn record_fast(&mut self, species_id: &str, move_code: String) {
        self.newly_chosen
            .entry(species_id.to_string())
            .or_insert_with(|| OverrideRecord::new(species_id))
            .fast_move = Some(move_code);
    }

    /// Records a charged-moves decision, full replacement.
    pub fn record_charged(&mut self, species_id: &str, moves: Vec<String>) {
        self.newly_chosen
            .entry(species_id.to_string())
            .or_insert_with(|| OverrideRecord::new(species_id))
            .charged_moves = Some(moves);
    }

    pub fn newly_chosen(&self) -> &HashMap<String, OverrideRecord> {
        &self.newly_chosen
    }

    pub fn has_new_choices(&self) -> bool {
        !self.newly_chosen.is_empty()
    }

    /// The merged record list to persist: predefined overwritten per whole
    /// record by the newly chosen layer, sorted by species id.
    pub fn merged_records(&self) -> Vec<OverrideRecord> {
        self.predefined.merge(&self.newly_chosen)
    }
}
