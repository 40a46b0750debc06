//! The resume document: canonical, template-agnostic content edited by one session.
//!
//! Field names follow the form layer's JSON contract (camelCase). Every section
//! defaults to empty so a partial payload from the initializer still deserializes.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub work_experiences: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub skills: RichTextSection,
    pub languages: RichTextSection,
    pub volunteer: RichTextSection,
    pub interests: RichTextSection,
    pub awards: RichTextSection,
    pub references: RichTextSection,
}

impl ResumeDocument {
    pub fn block(&self, kind: BlockKind) -> &RichTextSection {
        match kind {
            BlockKind::Skills => &self.skills,
            BlockKind::Languages => &self.languages,
            BlockKind::Volunteer => &self.volunteer,
            BlockKind::Interests => &self.interests,
            BlockKind::Awards => &self.awards,
            BlockKind::References => &self.references,
        }
    }

    pub fn block_mut(&mut self, kind: BlockKind) -> &mut RichTextSection {
        match kind {
            BlockKind::Skills => &mut self.skills,
            BlockKind::Languages => &mut self.languages,
            BlockKind::Volunteer => &mut self.volunteer,
            BlockKind::Interests => &mut self.interests,
            BlockKind::Awards => &mut self.awards,
            BlockKind::References => &mut self.references,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub socials: Socials,
    pub city: String,
    pub country: String,
    /// Plain text; line breaks are kept when rendered.
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socials {
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub position: String,
    #[serde(alias = "name")]
    pub company: String,
    pub city: String,
    pub country: String,
    #[serde(deserialize_with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    /// Rich text (HTML from the editor).
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub study_type: String,
    pub area: String,
    pub score: String,
    pub city: String,
    pub country: String,
    #[serde(deserialize_with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    /// Rich text, usually the course list.
    #[serde(alias = "courses")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: String,
    pub link: String,
    #[serde(deserialize_with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    pub description: String,
}

/// A singular section holding one rich-text blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichTextSection {
    pub description: String,
}

impl RichTextSection {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section identifiers
// ────────────────────────────────────────────────────────────────────────────

/// The six singular rich-text sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Skills,
    Languages,
    Volunteer,
    Interests,
    Awards,
    References,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Skills,
        BlockKind::Languages,
        BlockKind::Volunteer,
        BlockKind::Interests,
        BlockKind::Awards,
        BlockKind::References,
    ];
}

/// Every section type a template has to account for, in canonical reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    WorkExperience,
    Education,
    Projects,
    Skills,
    Languages,
    Volunteer,
    Interests,
    Awards,
    References,
}

impl SectionKind {
    pub const ALL: [SectionKind; 9] = [
        SectionKind::WorkExperience,
        SectionKind::Education,
        SectionKind::Projects,
        SectionKind::Skills,
        SectionKind::Languages,
        SectionKind::Volunteer,
        SectionKind::Interests,
        SectionKind::Awards,
        SectionKind::References,
    ];

    /// Wire name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::WorkExperience => "work_experience",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Skills => "skills",
            SectionKind::Languages => "languages",
            SectionKind::Volunteer => "volunteer",
            SectionKind::Interests => "interests",
            SectionKind::Awards => "awards",
            SectionKind::References => "references",
        }
    }

    /// Heading shown above the section.
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::WorkExperience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Projects => "Projects",
            SectionKind::Skills => "Skills",
            SectionKind::Languages => "Languages",
            SectionKind::Volunteer => "Volunteer Experience",
            SectionKind::Interests => "Interests",
            SectionKind::Awards => "Awards",
            SectionKind::References => "References",
        }
    }
}

impl From<BlockKind> for SectionKind {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Skills => SectionKind::Skills,
            BlockKind::Languages => SectionKind::Languages,
            BlockKind::Volunteer => SectionKind::Volunteer,
            BlockKind::Interests => SectionKind::Interests,
            BlockKind::Awards => SectionKind::Awards,
            BlockKind::References => SectionKind::References,
        }
    }
}

/// Date inputs arrive as `""` when the form field is cleared.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            // Accept full timestamps ("2021-03-01T00:00:00.000Z") by keeping the date part.
            let date_part = value.get(..10).unwrap_or(value);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_form_payload_camel_case() {
        let json = r#"{
            "personalInfo": { "firstname": "Jane", "socials": { "github": "jdoe" } },
            "workExperiences": [
                { "name": "Acme", "position": "", "startDate": "2021-03-01", "endDate": "" }
            ],
            "education": [ { "institution": "MIT", "courses": "<p>Algorithms</p>" } ],
            "skills": { "description": "<p>Rust</p>" }
        }"#;

        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.personal_info.firstname, "Jane");
        assert_eq!(doc.personal_info.socials.github, "jdoe");
        assert_eq!(doc.work_experiences[0].company, "Acme");
        assert_eq!(
            doc.work_experiences[0].start_date,
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );
        assert_eq!(doc.work_experiences[0].end_date, None);
        assert_eq!(doc.education[0].description, "<p>Algorithms</p>");
        assert_eq!(doc.skills.description, "<p>Rust</p>");
        assert!(doc.projects.is_empty());
        assert_eq!(doc.references, RichTextSection::default());
    }

    #[test]
    fn test_deserialize_timestamp_date_keeps_day() {
        let json = r#"{ "title": "CLI", "startDate": "2020-11-15T00:00:00.000Z" }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2020, 11, 15));
    }

    #[test]
    fn test_deserialize_rejects_garbage_date() {
        let json = r#"{ "title": "CLI", "startDate": "last spring" }"#;
        assert!(serde_json::from_str::<Project>(json).is_err());
    }

    #[test]
    fn test_block_accessors_cover_all_kinds() {
        let mut doc = ResumeDocument::default();
        for kind in BlockKind::ALL {
            doc.block_mut(kind).description = format!("{kind:?}");
        }
        assert_eq!(doc.block(BlockKind::Awards).description, "Awards");
        assert_eq!(doc.volunteer.description, "Volunteer");
    }

    #[test]
    fn test_section_wire_names_match_serde() {
        for kind in SectionKind::ALL {
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{}\"", kind.as_str())
            );
        }
    }

    #[test]
    fn test_every_block_maps_to_distinct_section() {
        let sections: std::collections::HashSet<SectionKind> =
            BlockKind::ALL.into_iter().map(SectionKind::from).collect();
        assert_eq!(sections.len(), BlockKind::ALL.len());
    }
}
