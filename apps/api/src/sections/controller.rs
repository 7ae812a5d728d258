use std::collections::HashSet;
use std::marker::PhantomData;

use tracing::{debug, error, info, warn};

use super::{FieldValue, SectionContext, SectionError, SectionSchema, SectionStatus, Violation};
use crate::codec;
use crate::llm_client::{LlmError, TextGenerator};

/// An outstanding text generation for one entry. Hand it back to
/// [`ListSectionController::finish_generation`] with the generator's result.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub index: usize,
    pub field: &'static str,
    pub prompt: String,
    epoch: u64,
}

/// Edit state for one list-of-record section.
///
/// Hydrates from the shared document once, then owns its section: every
/// local edit is merged back into the document, and `save` persists the
/// section's column alone.
pub struct ListSectionController<S: SectionSchema> {
    ctx: SectionContext,
    entries: Vec<S::Entry>,
    initialized: bool,
    mounted: bool,
    status: SectionStatus,
    generating: HashSet<usize>,
    /// Gate state when the current batch of generations began.
    gate_was_open: bool,
    epoch: u64,
    _schema: PhantomData<S>,
}

impl<S: SectionSchema> ListSectionController<S> {
    /// Creates the controller and hydrates it from the shared document.
    pub fn mount(ctx: SectionContext) -> Self {
        let mut controller = Self {
            ctx,
            entries: Vec::new(),
            initialized: false,
            mounted: true,
            status: SectionStatus::Clean,
            generating: HashSet::new(),
            gate_was_open: false,
            epoch: 0,
            _schema: PhantomData,
        };
        controller.initialize();
        controller
    }

    /// Adopts the document's entries, or seeds one blank entry. Runs once.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        let stored = self.ctx.document.with(|doc| S::stored(doc).to_vec());
        self.entries = if stored.is_empty() {
            vec![S::Entry::default()]
        } else {
            stored.into_iter().map(S::to_display).collect()
        };
        self.initialized = true;
        self.sync();
        debug!(section = S::KIND, entries = self.entries.len(), "Section initialized");
    }

    pub fn entries(&self) -> &[S::Entry] {
        &self.entries
    }

    pub fn status(&self) -> SectionStatus {
        self.status
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_generating(&self, index: usize) -> bool {
        self.generating.contains(&index)
    }

    pub fn update_field(
        &mut self,
        index: usize,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), SectionError> {
        self.ensure_mounted()?;
        let mut candidate = self.entry(index)?.clone();
        S::set_field(&mut candidate, field, value.into())?;
        if let Some(value) = S::conflicts(&self.entries, index, &candidate) {
            return Err(SectionError::DuplicateValue { value });
        }
        self.entries[index] = candidate;
        self.touch();
        Ok(())
    }

    pub fn add_entry(&mut self) -> Result<(), SectionError> {
        self.ensure_mounted()?;
        self.entries.push(S::Entry::default());
        self.touch();
        Ok(())
    }

    /// Removes an entry. The last remaining entry cannot be removed.
    pub fn remove_entry(&mut self, index: usize) -> Result<(), SectionError> {
        self.ensure_mounted()?;
        self.entry(index)?;
        if self.entries.len() == 1 {
            warn!(section = S::KIND, "Refused to remove the last entry");
            return Err(SectionError::LastEntry { noun: S::NOUN });
        }
        // Indices shift on removal; outstanding tickets would land on the wrong entry.
        if !self.generating.is_empty() {
            return Err(SectionError::Busy);
        }
        self.entries.remove(index);
        self.touch();
        Ok(())
    }

    /// Validates the request and marks `index` as generating.
    pub fn begin_generation(
        &mut self,
        index: usize,
        field: &str,
    ) -> Result<GenerationTicket, SectionError> {
        self.ensure_mounted()?;
        let entry = self.entry(index)?;
        let assisted = S::ASSISTED_FIELD
            .filter(|assisted| *assisted == field)
            .ok_or_else(|| SectionError::NotAssisted {
                field: field.to_string(),
            })?;
        if self.generating.contains(&index) {
            return Err(SectionError::GenerationInFlight { index });
        }
        let prompt = S::assist_prompt(entry)?;

        if self.generating.is_empty() {
            self.gate_was_open = self.ctx.gate.is_open();
        }
        self.generating.insert(index);
        self.ctx.gate.close();
        debug!(section = S::KIND, index, field = assisted, "Generation started");

        Ok(GenerationTicket {
            index,
            field: assisted,
            prompt,
            epoch: self.epoch,
        })
    }

    /// Applies a generation result. Results for an unmounted controller are
    /// discarded. On failure the field keeps its prior value.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<String, LlmError>,
    ) -> Result<(), SectionError> {
        if !self.mounted || ticket.epoch != self.epoch {
            debug!(section = S::KIND, index = ticket.index, "Discarded generation result");
            return Err(SectionError::Unmounted);
        }
        self.generating.remove(&ticket.index);

        let text = result.and_then(|text| {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(LlmError::EmptyContent);
            }
            Ok(text)
        });

        match text {
            Ok(text) => {
                let entry = self
                    .entries
                    .get_mut(ticket.index)
                    .ok_or(SectionError::NoSuchEntry {
                        section: S::KIND,
                        index: ticket.index,
                    })?;
                S::set_field(entry, ticket.field, FieldValue::Text(text))?;
                self.touch();
                info!(section = S::KIND, index = ticket.index, "Generated {}", ticket.field);
                Ok(())
            }
            Err(e) => {
                warn!(section = S::KIND, index = ticket.index, "Text generation failed: {e}");
                // The failure itself never blocks navigation.
                if self.gate_was_open
                    && self.status != SectionStatus::Dirty
                    && self.generating.is_empty()
                {
                    self.ctx.gate.open();
                }
                Err(SectionError::Generation(e))
            }
        }
    }

    /// Generates `field` for the entry at `index` and writes the trimmed text.
    pub async fn generate_assisted(
        &mut self,
        index: usize,
        field: &str,
        generator: &dyn TextGenerator,
    ) -> Result<(), SectionError> {
        let ticket = self.begin_generation(index, field)?;
        let result = generator.generate(&ticket.prompt).await;
        self.finish_generation(ticket, result)
    }

    /// Every empty required field, entry by entry.
    pub fn validate(&self) -> Vec<Violation> {
        self.entries
            .iter()
            .enumerate()
            .flat_map(|(index, entry)| {
                S::missing_fields(entry).into_iter().map(move |field| Violation {
                    index: Some(index),
                    field,
                })
            })
            .collect()
    }

    /// Validates, then writes this section's column to the store.
    pub async fn save(&mut self) -> Result<(), SectionError> {
        self.ensure_mounted()?;
        if !self.generating.is_empty() {
            return Err(SectionError::SaveBlocked);
        }
        self.ctx.gate.close();

        if let Some(violation) = self.validate().into_iter().next() {
            warn!(section = S::KIND, "Save rejected: {violation}");
            return Err(SectionError::Validation(violation));
        }

        let stored: Vec<S::Entry> = self.entries.iter().map(S::to_storage).collect();
        let patch = S::store_patch(codec::encode(&stored)?);

        match self.ctx.store.update_fields(self.ctx.document_id, &patch).await {
            Ok(()) => {
                self.status = SectionStatus::Saved;
                self.ctx.gate.open();
                info!(section = S::KIND, document_id = %self.ctx.document_id, "Section saved");
                Ok(())
            }
            Err(e) => {
                self.status = SectionStatus::Dirty;
                error!(section = S::KIND, document_id = %self.ctx.document_id, "Failed to save section: {e}");
                Err(e.into())
            }
        }
    }

    /// Detaches the controller. Outstanding generation results are discarded.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.epoch += 1;
        self.generating.clear();
    }

    fn entry(&self, index: usize) -> Result<&S::Entry, SectionError> {
        self.entries.get(index).ok_or(SectionError::NoSuchEntry {
            section: S::KIND,
            index,
        })
    }

    fn ensure_mounted(&self) -> Result<(), SectionError> {
        if self.mounted {
            Ok(())
        } else {
            Err(SectionError::Unmounted)
        }
    }

    fn touch(&mut self) {
        self.status = SectionStatus::Dirty;
        self.ctx.gate.close();
        self.sync();
    }

    /// Pushes the storage form of the local list into the shared document.
    fn sync(&self) -> bool {
        let stored = self.entries.iter().map(S::to_storage).collect();
        self.ctx.document.merge(S::patch(stored))
    }
}
