//! The canonical in-memory document of one editing session.
//!
//! Backed by a `tokio::sync::watch` channel: the store owns the only sender, so
//! there is exactly one writer, and hands out any number of [`DocumentReader`]s.
//! Updates are applied synchronously; readers always observe a whole document,
//! never a half-applied edit. No history is kept.

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::models::resume::{BlockKind, Education, Project, ResumeDocument, WorkExperience};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{section} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        section: &'static str,
        index: usize,
        len: usize,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Update vocabulary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalField {
    Firstname,
    Lastname,
    Email,
    Phone,
    Linkedin,
    Github,
    City,
    Country,
    Summary,
}

/// Edit applied to one of the ordered list sections.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListEdit<T> {
    Push { record: T },
    Replace { index: usize, record: T },
    Remove { index: usize },
    Move { from: usize, to: usize },
}

impl<T> ListEdit<T> {
    fn apply(self, section: &'static str, items: &mut Vec<T>) -> Result<(), StoreError> {
        let len = items.len();
        let check = |index: usize| {
            if index < len {
                Ok(())
            } else {
                Err(StoreError::IndexOutOfRange {
                    section,
                    index,
                    len,
                })
            }
        };

        match self {
            ListEdit::Push { record } => items.push(record),
            ListEdit::Replace { index, record } => {
                check(index)?;
                items[index] = record;
            }
            ListEdit::Remove { index } => {
                check(index)?;
                items.remove(index);
            }
            ListEdit::Move { from, to } => {
                check(from)?;
                check(to)?;
                let item = items.remove(from);
                items.insert(to, item);
            }
        }
        Ok(())
    }
}

/// A single field-level mutation coming from the form layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum DocumentUpdate {
    Personal {
        field: PersonalField,
        value: String,
    },
    WorkExperiences {
        edit: ListEdit<WorkExperience>,
    },
    Education {
        edit: ListEdit<Education>,
    },
    Projects {
        edit: ListEdit<Project>,
    },
    Block {
        section: BlockKind,
        description: String,
    },
    ReplaceAll {
        document: Box<ResumeDocument>,
    },
}

impl DocumentUpdate {
    fn apply_to(self, doc: &mut ResumeDocument) -> Result<(), StoreError> {
        match self {
            DocumentUpdate::Personal { field, value } => {
                let info = &mut doc.personal_info;
                let slot = match field {
                    PersonalField::Firstname => &mut info.firstname,
                    PersonalField::Lastname => &mut info.lastname,
                    PersonalField::Email => &mut info.email,
                    PersonalField::Phone => &mut info.phone,
                    PersonalField::Linkedin => &mut info.socials.linkedin,
                    PersonalField::Github => &mut info.socials.github,
                    PersonalField::City => &mut info.city,
                    PersonalField::Country => &mut info.country,
                    PersonalField::Summary => &mut info.summary,
                };
                *slot = value;
                Ok(())
            }
            DocumentUpdate::WorkExperiences { edit } => {
                edit.apply("workExperiences", &mut doc.work_experiences)
            }
            DocumentUpdate::Education { edit } => edit.apply("education", &mut doc.education),
            DocumentUpdate::Projects { edit } => edit.apply("projects", &mut doc.projects),
            DocumentUpdate::Block {
                section,
                description,
            } => {
                doc.block_mut(section).description = description;
                Ok(())
            }
            DocumentUpdate::ReplaceAll { document } => {
                *doc = *document;
                Ok(())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store and readers
// ────────────────────────────────────────────────────────────────────────────

pub struct ResumeDataStore {
    tx: watch::Sender<ResumeDocument>,
}

impl ResumeDataStore {
    pub fn new(initial: ResumeDocument) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Applies one update. On error the document is left untouched and readers
    /// are not notified.
    pub fn apply(&self, update: DocumentUpdate) -> Result<(), StoreError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|doc| {
            let mut next = doc.clone();
            match update.apply_to(&mut next) {
                Ok(()) if next != *doc => {
                    *doc = next;
                    true
                }
                Ok(()) => false,
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            }
        });
        outcome
    }

    pub fn replace(&self, document: ResumeDocument) {
        self.tx.send_replace(document);
    }

    pub fn snapshot(&self) -> ResumeDocument {
        self.tx.borrow().clone()
    }

    pub fn reader(&self) -> DocumentReader {
        DocumentReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only handle on the store.
#[derive(Clone)]
pub struct DocumentReader {
    rx: watch::Receiver<ResumeDocument>,
}

impl DocumentReader {
    /// Owned copy of the document as of now; later edits do not affect it.
    pub fn snapshot(&self) -> ResumeDocument {
        self.rx.borrow().clone()
    }

    /// Waits for the next edit. Returns `false` once the store is gone.
    #[cfg(test)]
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
