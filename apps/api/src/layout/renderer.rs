//! `ResumeDocument` → visual tree.
//!
//! Pure and total. Each block decides for itself whether it has anything to
//! show; blank entries are skipped so half-filled resumes degrade cleanly.

use serde::Serialize;

use super::templates::{template, RuleStyle, SectionTag};
use crate::dates::PRESENT;
use crate::models::resume::{
    Certification, Education, Experience, LayoutId, PersonalDetails, Project, ResumeDocument,
};

/// Rich-text markup from the editor, emitted without sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedMarkup(String);

impl TrustedMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockEntry {
    pub title: String,
    pub subtitle: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<TrustedMarkup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockContent {
    Contact {
        name: String,
        job_title: String,
        lines: Vec<String>,
    },
    Text {
        text: String,
    },
    Entries {
        entries: Vec<BlockEntry>,
    },
    Items {
        items: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub section: SectionTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<&'static str>,
    pub content: BlockContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Node {
    Block(Block),
    Rule { color: String, emphasized: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub centered: bool,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnNode {
    pub span: u8,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualTree {
    pub layout: LayoutId,
    pub theme_color: String,
    pub header: Band,
    pub grid_columns: u8,
    pub columns: Vec<ColumnNode>,
}

impl VisualTree {
    fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.header
            .nodes
            .iter()
            .chain(self.columns.iter().flat_map(|c| c.nodes.iter()))
    }

    pub fn rule_count(&self) -> usize {
        self.nodes()
            .filter(|node| matches!(node, Node::Rule { .. }))
            .count()
    }

    /// Rendered blocks, band by band: the header first, then each column.
    pub fn arrangement(&self) -> Vec<Vec<SectionTag>> {
        let tags = |nodes: &[Node]| -> Vec<SectionTag> {
            nodes
                .iter()
                .filter_map(|node| match node {
                    Node::Block(block) => Some(block.section),
                    Node::Rule { .. } => None,
                })
                .collect()
        };
        std::iter::once(tags(&self.header.nodes))
            .chain(self.columns.iter().map(|c| tags(&c.nodes)))
            .collect()
    }
}

/// Renders the document with its selected layout.
pub fn render(doc: &ResumeDocument) -> VisualTree {
    let template = template(doc.layout);
    let rule = (doc.enable_hr_lines && template.rules != RuleStyle::None).then(|| Node::Rule {
        color: doc.theme_color.clone(),
        emphasized: template.rules == RuleStyle::Emphasized,
    });

    let mut header: Vec<Node> = template
        .header
        .iter()
        .filter_map(|tag| block(doc, *tag))
        .map(Node::Block)
        .collect();
    if !header.is_empty() {
        header.extend(rule.clone());
    }

    let columns = template
        .columns
        .iter()
        .map(|column| ColumnNode {
            span: column.span,
            nodes: separated(
                column.sections.iter().filter_map(|tag| block(doc, *tag)),
                rule.as_ref(),
            ),
        })
        .collect();

    VisualTree {
        layout: template.id,
        theme_color: doc.theme_color.clone(),
        header: Band {
            centered: template.centered_header,
            nodes: header,
        },
        grid_columns: template.grid_columns,
        columns,
    }
}

/// Blocks with `rule` between each adjacent pair.
fn separated(blocks: impl Iterator<Item = Block>, rule: Option<&Node>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for block in blocks {
        if let (Some(rule), false) = (rule, nodes.is_empty()) {
            nodes.push(rule.clone());
        }
        nodes.push(Node::Block(block));
    }
    nodes
}

fn block(doc: &ResumeDocument, section: SectionTag) -> Option<Block> {
    let (heading, content) = match section {
        SectionTag::Personal => (None, contact(&doc.personal)?),
        SectionTag::Summary => {
            let text = doc.summary.trim();
            if text.is_empty() {
                return None;
            }
            (Some("Summary"), BlockContent::Text { text: text.to_string() })
        }
        SectionTag::Experience => (
            Some("Professional Experience"),
            entries(&doc.experience, experience_entry)?,
        ),
        SectionTag::Education => (Some("Education"), entries(&doc.education, education_entry)?),
        SectionTag::Skills => (
            Some("Skills"),
            items(doc.skills.iter().map(|s| s.name.as_str()))?,
        ),
        SectionTag::Projects => (Some("Projects"), entries(&doc.projects, project_entry)?),
        SectionTag::Certifications => (
            Some("Certifications"),
            entries(&doc.certifications, certification_entry)?,
        ),
        SectionTag::Languages => (
            Some("Languages"),
            items(doc.languages.iter().map(String::as_str))?,
        ),
        SectionTag::Hobbies => (
            Some("Hobbies"),
            items(doc.hobbies.iter().map(String::as_str))?,
        ),
    };
    Some(Block {
        section,
        heading,
        content,
    })
}

fn contact(personal: &PersonalDetails) -> Option<BlockContent> {
    let name = [personal.first_name.trim(), personal.last_name.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let lines: Vec<String> = [&personal.address, &personal.phone, &personal.email]
        .into_iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    let job_title = personal.job_title.trim().to_string();
    if name.is_empty() && job_title.is_empty() && lines.is_empty() {
        return None;
    }
    Some(BlockContent::Contact {
        name,
        job_title,
        lines,
    })
}

/// Non-blank entries, or `None` when nothing is left.
fn entries<T: Default + PartialEq>(
    list: &[T],
    to_entry: fn(&T) -> BlockEntry,
) -> Option<BlockContent> {
    let blank = T::default();
    let entries: Vec<BlockEntry> = list
        .iter()
        .filter(|item| **item != blank)
        .map(to_entry)
        .collect();
    (!entries.is_empty()).then_some(BlockContent::Entries { entries })
}

fn items<'a>(values: impl Iterator<Item = &'a str>) -> Option<BlockContent> {
    let items: Vec<String> = values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(BlockContent::Items { items })
}

fn joined<S: AsRef<str>>(parts: &[S], separator: &str) -> String {
    parts
        .iter()
        .map(|part| part.as_ref().trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn markup(value: &str) -> Option<TrustedMarkup> {
    (!value.trim().is_empty()).then(|| TrustedMarkup(value.to_string()))
}

fn experience_entry(e: &Experience) -> BlockEntry {
    let end = if e.currently_working { PRESENT } else { e.end_date.as_str() };
    BlockEntry {
        title: e.title.trim().to_string(),
        subtitle: joined(&[&e.company_name, &e.city, &e.state], ", "),
        detail: joined(&[e.start_date.as_str(), end], " to "),
        body: markup(&e.work_summary),
        link: None,
    }
}

fn education_entry(e: &Education) -> BlockEntry {
    BlockEntry {
        title: e.university_name.trim().to_string(),
        subtitle: joined(&[&e.degree, &e.major], " in "),
        detail: joined(&[&e.start_date, &e.end_date], " - "),
        body: markup(&e.description),
        link: None,
    }
}

fn project_entry(p: &Project) -> BlockEntry {
    BlockEntry {
        title: p.title.trim().to_string(),
        subtitle: p.tech_stack.trim().to_string(),
        detail: String::new(),
        body: markup(&p.description),
        link: Some(p.link.trim().to_string()).filter(|link| !link.is_empty()),
    }
}

fn certification_entry(c: &Certification) -> BlockEntry {
    BlockEntry {
        title: c.title.trim().to_string(),
        subtitle: c.issuer.trim().to_string(),
        detail: c.year.trim().to_string(),
        body: markup(&c.description),
        link: None,
    }
}
