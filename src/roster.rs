use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{EngineError, EngineResult},
    pet::{Pet, PetId, Stats},
};

/// Every pet the player owns, in adoption order, plus the selected one.
///
/// The selection is `None` only while the roster is empty; pets are never
/// removed, so once something is selected it stays valid.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Roster {
    pets: Vec<Pet>,
    selected: Option<PetId>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pet> {
        self.pets.iter()
    }

    pub fn selected(&self) -> Option<PetId> {
        self.selected
    }

    pub fn get(&self, id: PetId) -> EngineResult<&Pet> {
        self.pets
            .iter()
            .find(|p| p.id() == id)
            .ok_or(EngineError::PetNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: PetId) -> EngineResult<&mut Pet> {
        self.pets
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(EngineError::PetNotFound(id))
    }

    /// Swaps in an updated copy of a pet that already exists on the roster
    pub(crate) fn replace(&mut self, pet: Pet) -> EngineResult<()> {
        let slot = self.get_mut(pet.id())?;
        *slot = pet;
        Ok(())
    }

    pub fn has_template(&self, template: &str) -> bool {
        self.pets.iter().any(|p| p.template() == Some(template))
    }

    /// Adds a new pet with a fresh id, selecting it if nothing was selected
    pub(crate) fn add(&mut self, name: String, stats: Stats, template: Option<String>) -> PetId {
        let id = PetId(self.next_id);
        self.next_id += 1;
        trace!("Adding {} as {}", name, id);
        self.pets.push(Pet::new(id, name, stats, template));
        if self.selected.is_none() {
            self.selected = Some(id);
        }
        id
    }

    pub fn select(&mut self, id: PetId) -> EngineResult<()> {
        self.get(id)?;
        self.selected = Some(id);
        Ok(())
    }

    /// Moves the selection forwards through the roster, wrapping around
    pub fn select_next(&mut self) -> Option<PetId> {
        self.step_selection(1)
    }

    pub fn select_previous(&mut self) -> Option<PetId> {
        self.step_selection(self.pets.len().saturating_sub(1))
    }

    fn step_selection(&mut self, offset: usize) -> Option<PetId> {
        let n = self.pets.len();
        if n == 0 {
            return None;
        }
        let i = self
            .selected
            .and_then(|id| self.pets.iter().position(|p| p.id() == id))
            .unwrap_or(0);
        let id = self.pets[(i + offset) % n].id();
        self.selected = Some(id);
        Some(id)
    }
}

impl std::fmt::Display for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, p) in self.pets.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let marker = if Some(p.id()) == self.selected {
                '▶'
            } else {
                ' '
            };
            write!(f, "{} {}", marker, p)?;
        }
        Ok(())
    }
}
