//! Shared fixtures for unit tests.

use chrono::NaiveDate;

use crate::models::resume::{
    Education, PersonalInfo, Project, ResumeDocument, RichTextSection, Socials, WorkExperience,
};

pub fn date(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

/// A document with every section present.
pub fn full_document() -> ResumeDocument {
    ResumeDocument {
        personal_info: PersonalInfo {
            firstname: "Jane".into(),
            lastname: "Doe".into(),
            email: "jane@doe.dev".into(),
            phone: "+351 912 345 678".into(),
            socials: Socials {
                linkedin: "linkedin.com/in/janedoe".into(),
                github: "github.com/janedoe".into(),
            },
            city: "Lisbon".into(),
            country: "Portugal".into(),
            summary: "Backend engineer focused on reliable distributed systems.".into(),
        },
        work_experiences: vec![
            WorkExperience {
                position: "Senior Engineer".into(),
                company: "Acme".into(),
                city: "Lisbon".into(),
                country: "Portugal".into(),
                start_date: Some(date(2021, 3)),
                end_date: None,
                description: "<ul><li>Led the <strong>billing</strong> rewrite</li><li>Cut p99 latency by 40%</li></ul>".into(),
            },
            WorkExperience {
                position: "Engineer".into(),
                company: "Initech".into(),
                start_date: Some(date(2018, 1)),
                end_date: Some(date(2021, 2)),
                description: "<p>Maintained the reporting pipeline.</p>".into(),
                ..Default::default()
            },
        ],
        education: vec![Education {
            institution: "University of Porto".into(),
            study_type: "BSc".into(),
            area: "Computer Science".into(),
            score: "17/20".into(),
            start_date: Some(date(2014, 9)),
            end_date: Some(date(2017, 7)),
            description: "<p>Distributed systems, compilers</p>".into(),
            ..Default::default()
        }],
        projects: vec![Project {
            title: "resume-cli".into(),
            link: "https://github.com/janedoe/resume-cli".into(),
            start_date: Some(date(2022, 5)),
            end_date: None,
            description: "<p>Terminal resume builder.</p>".into(),
        }],
        skills: RichTextSection::new("<p>Rust, Go, <em>PostgreSQL</em></p>"),
        languages: RichTextSection::new("<p>English, Portuguese</p>"),
        volunteer: RichTextSection::new("<p>Mentor at Rails Girls</p>"),
        interests: RichTextSection::new("<p>Chess, climbing</p>"),
        awards: RichTextSection::new("<p>Hackathon winner 2019</p>"),
        references: RichTextSection::new("<p>Available on request</p>"),
    }
}

/// A document long enough to need several printed pages.
pub fn long_document() -> ResumeDocument {
    let paragraph = "<p>Designed, built and operated services handling millions of requests a day, \
                     mentoring engineers and owning incident response across several teams.</p>";
    let mut doc = full_document();
    doc.work_experiences = (0..30)
        .map(|i| WorkExperience {
            position: format!("Engineer {i}"),
            company: format!("Company {i}"),
            start_date: Some(date(2000 + i, 1)),
            end_date: Some(date(2001 + i, 1)),
            description: paragraph.repeat(3),
            ..Default::default()
        })
        .collect();
    doc
}
