//! Keyword catalogue and File tagging use-cases.
//!
//! # Invariants
//! - Attaching checks the File's current associations first; an existing
//!   association is reported, never duplicated.
//! - Keyword and person input is trimmed on every operation; blank input is
//!   rejected.

use crate::model::tag::{Keyword, TagKind};
use crate::repo::GrievanceRepository;
use crate::service::{required, ArchiveService, FormField, ServiceResult};
use log::info;
use serde::Serialize;

/// Result of an attach request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachOutcome {
    Attached,
    /// The File already carried this keyword/person; nothing was written.
    AlreadyPresent,
}

impl<R: GrievanceRepository> ArchiveService<R> {
    pub fn list_keywords(&self) -> ServiceResult<Vec<Keyword>> {
        Ok(self.repo.list_keywords()?)
    }

    /// Creates a keyword; fails with `DuplicateKeyword` if it exists.
    pub fn add_keyword(&mut self, keyword: &str) -> ServiceResult<Keyword> {
        let keyword = required(FormField::Keyword, keyword)?;
        let id = self.repo.add_keyword(keyword)?;
        info!(
            "event=keyword_add module=service status=ok id={} keyword={}",
            id, keyword
        );
        Ok(Keyword {
            id,
            keyword: keyword.to_string(),
        })
    }

    /// Deletes a keyword no File uses; fails with `KeywordInUse` otherwise.
    pub fn delete_keyword(&mut self, keyword: &str) -> ServiceResult<()> {
        let keyword = required(FormField::Keyword, keyword)?;
        self.repo.delete_keyword(keyword)?;
        info!(
            "event=keyword_delete module=service status=ok keyword={}",
            keyword
        );
        Ok(())
    }

    pub fn attach_keyword(
        &mut self,
        filename: &str,
        keyword: &str,
    ) -> ServiceResult<AttachOutcome> {
        let keyword = required(FormField::Keyword, keyword)?;
        let current = self.repo.keywords_for_file(filename)?;
        if current.iter().any(|attached| attached == keyword) {
            return Ok(log_already_present(TagKind::Keyword, filename, keyword));
        }

        self.repo.attach_keyword(filename, keyword)?;
        Ok(log_attached(TagKind::Keyword, filename, keyword))
    }

    pub fn attach_person(
        &mut self,
        filename: &str,
        person: &str,
    ) -> ServiceResult<AttachOutcome> {
        let person = required(FormField::Person, person)?;
        let current = self.repo.persons_for_file(filename)?;
        if current.iter().any(|attached| attached == person) {
            return Ok(log_already_present(TagKind::Person, filename, person));
        }

        self.repo.attach_person(filename, person)?;
        Ok(log_attached(TagKind::Person, filename, person))
    }

    pub fn detach_keyword(&mut self, filename: &str, keyword: &str) -> ServiceResult<()> {
        let keyword = required(FormField::Keyword, keyword)?;
        self.repo.detach_keyword(filename, keyword)?;
        info!(
            "event=tag_detach module=service status=ok kind=keyword filename={}",
            filename
        );
        Ok(())
    }

    pub fn detach_person(&mut self, filename: &str, person: &str) -> ServiceResult<()> {
        let person = required(FormField::Person, person)?;
        self.repo.detach_person(filename, person)?;
        info!(
            "event=tag_detach module=service status=ok kind=person filename={}",
            filename
        );
        Ok(())
    }
}

fn log_attached(kind: TagKind, filename: &str, name: &str) -> AttachOutcome {
    info!(
        "event=tag_attach module=service status=ok kind={} filename={} name={}",
        kind.as_str(),
        filename,
        name
    );
    AttachOutcome::Attached
}

fn log_already_present(kind: TagKind, filename: &str, name: &str) -> AttachOutcome {
    info!(
        "event=tag_attach module=service status=skipped kind={} filename={} name={}",
        kind.as_str(),
        filename,
        name
    );
    AttachOutcome::AlreadyPresent
}
