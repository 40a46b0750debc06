//! Section presence filter.
//!
//! Decides what is worth rendering. Two pure predicates (`is_item_present`,
//! `is_block_present`) plus `filter_document`, which applies them to a snapshot and
//! produces the [`PresentDocument`] every template consumes: absent items removed,
//! empty list sections and blank blocks omitted, rich text sanitized.
//!
//! One presence rule covers all rich text (block sections and record descriptions):
//! it is present iff its sanitized markup has visible text. The `<p></p>` sentinel
//! the editor emits for a cleared field is therefore absent, as is whitespace-only
//! or script-only content.

use chrono::NaiveDate;
use serde::Serialize;

use crate::document::rich_text::visible_text;
use crate::document::sanitize::{sanitize, SanitizedHtml};
use crate::models::resume::{
    BlockKind, Education, PersonalInfo, Project, ResumeDocument, SectionKind, WorkExperience,
};

/// Markup the editor produces for an emptied rich-text field.
pub const EMPTY_RICH_TEXT: &str = "<p></p>";

/// Token shown instead of an end date for ongoing entries.
pub const PRESENT_TOKEN: &str = "Present";

// ────────────────────────────────────────────────────────────────────────────
// Predicates
// ────────────────────────────────────────────────────────────────────────────

/// One field of a list record, as seen by the presence test.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Text(&'a str),
    RichText(&'a str),
    Date(Option<NaiveDate>),
}

impl Field<'_> {
    pub fn has_content(&self) -> bool {
        match self {
            Field::Text(s) => !s.trim().is_empty(),
            Field::RichText(s) => is_block_present(sanitize(s).as_str()),
            Field::Date(d) => d.is_some(),
        }
    }
}

/// A list-section record with heterogeneous fields.
pub trait SectionRecord {
    fn fields(&self) -> Vec<Field<'_>>;
}

impl SectionRecord for WorkExperience {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.position),
            Field::Text(&self.company),
            Field::Text(&self.city),
            Field::Text(&self.country),
            Field::Date(self.start_date),
            Field::Date(self.end_date),
            Field::RichText(&self.description),
        ]
    }
}

impl SectionRecord for Education {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.institution),
            Field::Text(&self.study_type),
            Field::Text(&self.area),
            Field::Text(&self.score),
            Field::Text(&self.city),
            Field::Text(&self.country),
            Field::Date(self.start_date),
            Field::Date(self.end_date),
            Field::RichText(&self.description),
        ]
    }
}

impl SectionRecord for Project {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.title),
            Field::Text(&self.link),
            Field::Date(self.start_date),
            Field::Date(self.end_date),
            Field::RichText(&self.description),
        ]
    }
}

/// True iff any field of the record has content.
pub fn is_item_present<R: SectionRecord>(record: &R) -> bool {
    record.fields().iter().any(Field::has_content)
}

/// True iff the rich-text description has visible content.
pub fn is_block_present(description: &str) -> bool {
    let trimmed = description.trim();
    if trimmed.is_empty() || trimmed == EMPTY_RICH_TEXT {
        return false;
    }
    !visible_text(trimmed).is_empty()
}

// ────────────────────────────────────────────────────────────────────────────
// Filtered, render-ready document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// `MM/yyyy - MM/yyyy`, or `MM/yyyy - Present` without an end date.
    pub fn label(&self) -> String {
        let end = self
            .end
            .map(format_month_year)
            .unwrap_or_else(|| PRESENT_TOKEN.to_string());
        format!("{} - {}", format_month_year(self.start), end)
    }
}

pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%m/%Y").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    /// Job title.
    Role,
    /// Degree or study type.
    Qualification,
    /// Field of study.
    Area,
    Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    pub kind: DetailKind,
    pub text: String,
}

/// A present list item, normalized so templates lay out every list section alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Company, institution or project title. May be empty.
    pub heading: String,
    pub dates: Option<DateRange>,
    pub details: Vec<Detail>,
    pub location: Option<String>,
    pub link: Option<String>,
    pub body: Option<SanitizedHtml>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    Entries(Vec<Entry>),
    Block(SanitizedHtml),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentSection {
    pub kind: SectionKind,
    pub body: SectionBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Phone,
    Email,
    Linkedin,
    Github,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub kind: ContactKind,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Header {
    pub firstname: String,
    pub lastname: String,
    pub location: Option<String>,
    pub contacts: Vec<Contact>,
    pub summary: Option<String>,
}

/// What templates render: only present content, in canonical section order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresentDocument {
    pub header: Header,
    pub sections: Vec<PresentSection>,
}

impl PresentDocument {
    #[cfg(test)]
    pub fn section(&self, kind: SectionKind) -> Option<&PresentSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }
}

pub fn filter_document(doc: &ResumeDocument) -> PresentDocument {
    let mut sections = Vec::new();

    let lists = [
        (
            SectionKind::WorkExperience,
            collect_entries(&doc.work_experiences, work_entry),
        ),
        (
            SectionKind::Education,
            collect_entries(&doc.education, education_entry),
        ),
        (
            SectionKind::Projects,
            collect_entries(&doc.projects, project_entry),
        ),
    ];
    for (kind, entries) in lists {
        if !entries.is_empty() {
            sections.push(PresentSection {
                kind,
                body: SectionBody::Entries(entries),
            });
        }
    }

    for kind in BlockKind::ALL {
        if let Some(html) = present_rich_text(&doc.block(kind).description) {
            sections.push(PresentSection {
                kind: kind.into(),
                body: SectionBody::Block(html),
            });
        }
    }

    PresentDocument {
        header: header(&doc.personal_info),
        sections,
    }
}

fn collect_entries<R: SectionRecord>(records: &[R], to_entry: fn(&R) -> Entry) -> Vec<Entry> {
    records
        .iter()
        .filter(|r| is_item_present(*r))
        .map(to_entry)
        .collect()
}

fn present_rich_text(raw: &str) -> Option<SanitizedHtml> {
    let html = sanitize(raw);
    is_block_present(html.as_str()).then_some(html)
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `city, country`, either part optional.
fn location(city: &str, country: &str) -> Option<String> {
    match (non_empty(city), non_empty(country)) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (Some(one), None) | (None, Some(one)) => Some(one),
        (None, None) => None,
    }
}

fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<DateRange> {
    start.map(|start| DateRange { start, end })
}

fn details(pairs: &[(DetailKind, &str)]) -> Vec<Detail> {
    pairs
        .iter()
        .filter_map(|(kind, text)| {
            non_empty(text).map(|text| Detail { kind: *kind, text })
        })
        .collect()
}

fn work_entry(exp: &WorkExperience) -> Entry {
    Entry {
        heading: exp.company.trim().to_string(),
        dates: date_range(exp.start_date, exp.end_date),
        details: details(&[(DetailKind::Role, exp.position.as_str())]),
        location: location(&exp.city, &exp.country),
        link: None,
        body: present_rich_text(&exp.description),
    }
}

fn education_entry(edu: &Education) -> Entry {
    Entry {
        heading: edu.institution.trim().to_string(),
        dates: date_range(edu.start_date, edu.end_date),
        details: details(&[
            (DetailKind::Qualification, edu.study_type.as_str()),
            (DetailKind::Area, edu.area.as_str()),
            (DetailKind::Score, edu.score.as_str()),
        ]),
        location: location(&edu.city, &edu.country),
        link: None,
        body: present_rich_text(&edu.description),
    }
}

fn project_entry(project: &Project) -> Entry {
    Entry {
        heading: project.title.trim().to_string(),
        dates: date_range(project.start_date, project.end_date),
        details: Vec::new(),
        location: None,
        link: non_empty(&project.link),
        body: present_rich_text(&project.description),
    }
}

fn header(info: &PersonalInfo) -> Header {
    let contacts = [
        (ContactKind::Phone, &info.phone),
        (ContactKind::Email, &info.email),
        (ContactKind::Linkedin, &info.socials.linkedin),
        (ContactKind::Github, &info.socials.github),
    ]
    .into_iter()
    .filter_map(|(kind, value)| non_empty(value).map(|value| Contact { kind, value }))
    .collect();

    Header {
        firstname: info.firstname.trim().to_string(),
        lastname: info.lastname.trim().to_string(),
        location: location(&info.city, &info.country),
        contacts,
        summary: non_empty(&info.summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::RichTextSection;
    use proptest::prelude::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_block_presence_rules() {
        assert!(!is_block_present(""));
        assert!(!is_block_present("   \n\t"));
        assert!(!is_block_present(EMPTY_RICH_TEXT));
        assert!(!is_block_present(" <p></p> "));
        assert!(!is_block_present("<p>  </p>"));
        assert!(!is_block_present("<p>&nbsp;</p>"));
        assert!(is_block_present("<p>Rust</p>"));
        assert!(is_block_present("plain text"));
    }

    #[test]
    fn test_item_present_when_single_field_set() {
        let exp = WorkExperience {
            company: "Acme".into(),
            ..Default::default()
        };
        assert!(is_item_present(&exp));

        let dated = Project {
            start_date: Some(date(2020, 1)),
            ..Default::default()
        };
        assert!(is_item_present(&dated));
    }

    #[test]
    fn test_item_absent_when_only_empty_markup() {
        let edu = Education {
            description: EMPTY_RICH_TEXT.into(),
            city: "  ".into(),
            ..Default::default()
        };
        assert!(!is_item_present(&edu));
    }

    #[test]
    fn test_list_of_absent_items_omits_section() {
        let doc = ResumeDocument {
            work_experiences: vec![WorkExperience::default(), WorkExperience::default()],
            projects: vec![Project {
                description: "<p></p>".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let present = filter_document(&doc);
        assert!(present.section(SectionKind::WorkExperience).is_none());
        assert!(present.section(SectionKind::Projects).is_none());
        assert!(present.sections.is_empty());
    }

    #[test]
    fn test_absent_items_dropped_from_present_list() {
        let doc = ResumeDocument {
            education: vec![
                Education::default(),
                Education {
                    institution: "MIT".into(),
                    ..Default::default()
                },
                Education::default(),
            ],
            ..Default::default()
        };
        let present = filter_document(&doc);
        let Some(SectionBody::Entries(entries)) =
            present.section(SectionKind::Education).map(|s| &s.body)
        else {
            panic!("education section should be present");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].heading, "MIT");
    }

    #[test]
    fn test_company_only_entry_has_no_role_or_body() {
        let doc = ResumeDocument {
            personal_info: PersonalInfo {
                firstname: "Jane".into(),
                ..Default::default()
            },
            work_experiences: vec![WorkExperience {
                company: "Acme".into(),
                position: String::new(),
                description: String::new(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let present = filter_document(&doc);
        let Some(SectionBody::Entries(entries)) =
            present.section(SectionKind::WorkExperience).map(|s| &s.body)
        else {
            panic!("work experience should be present");
        };
        assert_eq!(entries[0].heading, "Acme");
        assert!(entries[0].details.is_empty());
        assert!(entries[0].body.is_none());
        assert_eq!(present.header.firstname, "Jane");
    }

    #[test]
    fn test_empty_and_sentinel_blocks_omitted() {
        let doc = ResumeDocument {
            skills: RichTextSection::new(""),
            languages: RichTextSection::new("<p></p>"),
            interests: RichTextSection::new("<p>Chess</p>"),
            ..Default::default()
        };
        let present = filter_document(&doc);
        assert_eq!(present.kinds(), vec![SectionKind::Interests]);
    }

    #[test]
    fn test_script_only_block_is_absent() {
        let doc = ResumeDocument {
            awards: RichTextSection::new("<script>alert(1)</script>"),
            ..Default::default()
        };
        assert!(filter_document(&doc).sections.is_empty());
    }

    #[test]
    fn test_sections_follow_canonical_order() {
        let doc = ResumeDocument {
            references: RichTextSection::new("<p>On request</p>"),
            skills: RichTextSection::new("<p>Rust</p>"),
            projects: vec![Project {
                title: "CLI".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            filter_document(&doc).kinds(),
            vec![
                SectionKind::Projects,
                SectionKind::Skills,
                SectionKind::References
            ]
        );
    }

    #[test]
    fn test_date_range_present_token() {
        let open = DateRange {
            start: date(2021, 3),
            end: None,
        };
        assert_eq!(open.label(), "03/2021 - Present");

        let closed = DateRange {
            start: date(2019, 11),
            end: Some(date(2020, 2)),
        };
        assert_eq!(closed.label(), "11/2019 - 02/2020");
    }

    #[test]
    fn test_dates_hidden_without_start() {
        let doc = ResumeDocument {
            projects: vec![Project {
                title: "CLI".into(),
                end_date: Some(date(2022, 1)),
                ..Default::default()
            }],
            ..Default::default()
        };
        let present = filter_document(&doc);
        let Some(SectionBody::Entries(entries)) =
            present.section(SectionKind::Projects).map(|s| &s.body)
        else {
            panic!("projects should be present");
        };
        assert!(entries[0].dates.is_none());
    }

    #[test]
    fn test_header_collects_contacts_and_location() {
        let info = PersonalInfo {
            firstname: " Jane ".into(),
            lastname: "Doe".into(),
            email: "jane@doe.dev".into(),
            city: "Lisbon".into(),
            ..Default::default()
        };
        let header = header(&info);
        assert_eq!(header.firstname, "Jane");
        assert_eq!(header.location.as_deref(), Some("Lisbon"));
        assert_eq!(header.contacts.len(), 1);
        assert_eq!(header.contacts[0].kind, ContactKind::Email);
        assert!(header.summary.is_none());
    }

    #[test]
    fn test_record_body_is_sanitized() {
        let doc = ResumeDocument {
            work_experiences: vec![WorkExperience {
                company: "Acme".into(),
                description: "<p><b>Shipped</b></p><script>x()</script>".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let present = filter_document(&doc);
        let Some(SectionBody::Entries(entries)) =
            present.section(SectionKind::WorkExperience).map(|s| &s.body)
        else {
            panic!("work experience should be present");
        };
        let body = entries[0].body.as_ref().unwrap();
        assert!(body.as_str().contains("<b>Shipped</b>"));
        assert!(!body.as_str().contains("script"));
    }

    proptest! {
        #[test]
        fn prop_whitespace_only_records_are_absent(
            ws in prop::collection::vec(prop::sample::select(vec![" ", "\t", "\n", ""]), 7)
        ) {
            let exp = WorkExperience {
                position: ws[0].to_string(),
                company: ws[1].to_string(),
                city: ws[2].to_string(),
                country: ws[3].to_string(),
                description: format!("<p>{}</p>", ws[4]),
                ..Default::default()
            };
            prop_assert!(!is_item_present(&exp));
        }

        #[test]
        fn prop_any_visible_field_makes_record_present(
            text in "[A-Za-z0-9]{1,12}",
            slot in 0usize..4,
        ) {
            let mut exp = WorkExperience::default();
            match slot {
                0 => exp.position = text,
                1 => exp.company = text,
                2 => exp.city = text,
                _ => exp.description = format!("<p>{text}</p>"),
            }
            prop_assert!(is_item_present(&exp));
        }

        #[test]
        fn prop_all_absent_lists_never_produce_sections(count in 0usize..6) {
            let doc = ResumeDocument {
                work_experiences: vec![WorkExperience::default(); count],
                education: vec![Education::default(); count],
                projects: vec![Project::default(); count],
                ..Default::default()
            };
            prop_assert!(filter_document(&doc).sections.is_empty());
        }
    }
}
