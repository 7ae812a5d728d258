//! The eight-step edit wizard.
//!
//! `next` is allowed only once the current section has been saved since its
//! last edit; `prev` is always allowed and leaves the previous section
//! passable without a re-save. `next` from the last section hands off to the
//! preview.

use std::fmt;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::sections::NavGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardSection {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    HobbiesLanguages,
}

impl WizardSection {
    pub const ALL: [WizardSection; 8] = [
        WizardSection::Personal,
        WizardSection::Summary,
        WizardSection::Experience,
        WizardSection::Education,
        WizardSection::Skills,
        WizardSection::Projects,
        WizardSection::Certifications,
        WizardSection::HobbiesLanguages,
    ];

    /// 1-based position.
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map_or(1, |i| i + 1)
    }

    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardSection::Personal => "Personal Details",
            WizardSection::Summary => "Summary",
            WizardSection::Experience => "Professional Experience",
            WizardSection::Education => "Education",
            WizardSection::Skills => "Skills",
            WizardSection::Projects => "Projects",
            WizardSection::Certifications => "Certifications",
            WizardSection::HobbiesLanguages => "Hobbies & Languages",
        }
    }
}

impl fmt::Display for WizardSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Where a successful `next` lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Section(WizardSection),
    Preview { document_id: Uuid },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("Save this section before moving on")]
    NotSaved,

    #[error("Already at the first section")]
    AtFirstSection,
}

pub struct Wizard {
    document_id: Uuid,
    current: WizardSection,
    gate: NavGate,
}

impl Wizard {
    pub fn new(document_id: Uuid, gate: NavGate) -> Self {
        Self {
            document_id,
            current: WizardSection::Personal,
            gate,
        }
    }

    pub fn current(&self) -> WizardSection {
        self.current
    }

    pub fn can_advance(&self) -> bool {
        self.gate.is_open()
    }

    pub fn next(&mut self) -> Result<Step, NavError> {
        if !self.gate.is_open() {
            return Err(NavError::NotSaved);
        }
        match WizardSection::from_number(self.current.number() + 1) {
            Some(section) => {
                self.current = section;
                self.gate.close();
                debug!(document_id = %self.document_id, "Wizard moved to {section}");
                Ok(Step::Section(section))
            }
            None => Ok(Step::Preview {
                document_id: self.document_id,
            }),
        }
    }

    pub fn prev(&mut self) -> Result<WizardSection, NavError> {
        let section = self
            .current
            .number()
            .checked_sub(1)
            .and_then(WizardSection::from_number)
            .ok_or(NavError::AtFirstSection)?;
        self.current = section;
        self.gate.open();
        debug!(document_id = %self.document_id, "Wizard moved back to {section}");
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> (Wizard, NavGate) {
        let gate = NavGate::new();
        (Wizard::new(Uuid::new_v4(), gate.clone()), gate)
    }

    #[test]
    fn test_starts_at_first_section_closed() {
        let (wizard, _) = wizard();
        assert_eq!(wizard.current(), WizardSection::Personal);
        assert!(!wizard.can_advance());
    }

    #[test]
    fn test_next_blocked_until_saved() {
        let (mut wizard, gate) = wizard();
        assert_eq!(wizard.next(), Err(NavError::NotSaved));
        gate.open();
        assert_eq!(wizard.next(), Ok(Step::Section(WizardSection::Summary)));
        assert!(!gate.is_open());
        assert_eq!(wizard.next(), Err(NavError::NotSaved));
    }

    #[test]
    fn test_prev_is_lenient() {
        let (mut wizard, gate) = wizard();
        assert_eq!(wizard.prev(), Err(NavError::AtFirstSection));
        gate.open();
        wizard.next().unwrap();
        assert_eq!(wizard.prev(), Ok(WizardSection::Personal));
        assert!(wizard.can_advance());
        assert_eq!(wizard.next(), Ok(Step::Section(WizardSection::Summary)));
    }

    #[test]
    fn test_next_from_last_section_hands_off_to_preview() {
        let (mut wizard, gate) = wizard();
        for _ in 1..8 {
            gate.open();
            wizard.next().unwrap();
        }
        assert_eq!(wizard.current(), WizardSection::HobbiesLanguages);
        gate.open();
        let id = wizard.document_id;
        assert_eq!(wizard.next(), Ok(Step::Preview { document_id: id }));
        assert_eq!(wizard.current(), WizardSection::HobbiesLanguages);
    }

    #[test]
    fn test_section_numbering() {
        assert_eq!(WizardSection::Personal.number(), 1);
        assert_eq!(WizardSection::HobbiesLanguages.number(), 8);
        assert_eq!(WizardSection::from_number(0), None);
        assert_eq!(WizardSection::from_number(9), None);
        assert_eq!(WizardSection::Skills.to_string(), "5. Skills");
    }
}
