// Prompt templates for AI-assisted section fields.
// Every template closes with llm_client::prompts::NO_PREAMBLE_INSTRUCTION.

use crate::llm_client::prompts::NO_PREAMBLE_INSTRUCTION;

/// Experience work summary. Replace `{title}` and `{company}`.
pub const EXPERIENCE_SUMMARY_TEMPLATE: &str = "Generate 2-3 professional bullet points for the \
work summary/responsibilities section of a resume.
The role is \"{title}\" at \"{company}\".
Focus on quantifiable achievements and key contributions.
Return the summary as a single string with each bullet point on a new line \
(use hyphens or asterisks for bullets).
{no_preamble}";

/// Education description. Replace `{degree}`, `{major}` and `{university}`.
pub const EDUCATION_DESCRIPTION_TEMPLATE: &str = "Generate a 2-3 sentence concise description \
for an education entry on a resume.
The degree is \"{degree}\" in \"{major}\" from \"{university}\".
Mention key academic achievements or relevant coursework if implied.
{no_preamble}";

/// Project description. Replace `{title}` and `{tech_stack}`.
pub const PROJECT_DESCRIPTION_TEMPLATE: &str = "Generate 2-3 concise bullet points for the \
description of a project for a resume.
The project title is \"{title}\" and technologies used include \"{tech_stack}\".
Focus on the project's purpose, your role, and key features/outcomes.
Return the description as a single string with each bullet point on a new line \
(use hyphens or asterisks for bullets).
{no_preamble}";

/// Certification description. Replace `{title}`, `{issuer}` and `{year}`.
pub const CERTIFICATION_DESCRIPTION_TEMPLATE: &str = "Generate a concise, 1-2 sentence \
description for a certification on a resume.
The certification is \"{title}\" issued by \"{issuer}\" in \"{year}\".
Focus on the key skills validated or the significance of the certification.
{no_preamble}";

/// Professional summary. Replace `{job_title}`.
pub const SUMMARY_TEMPLATE: &str = "Generate a concise professional resume summary for the \
job title \"{job_title}\". The summary should be 3-4 lines long and directly usable.
{no_preamble}";

pub const DEFAULT_JOB_TITLE: &str = "Software Developer";

/// `value` trimmed, or `fallback` when blank.
pub fn or_placeholder<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    match value.trim() {
        "" => fallback,
        trimmed => trimmed,
    }
}

pub fn experience_summary(title: &str, company: &str) -> String {
    EXPERIENCE_SUMMARY_TEMPLATE
        .replace("{title}", or_placeholder(title, "Software Developer"))
        .replace("{company}", or_placeholder(company, "A Company"))
        .replace("{no_preamble}", NO_PREAMBLE_INSTRUCTION)
}

pub fn education_description(degree: &str, major: &str, university: &str) -> String {
    EDUCATION_DESCRIPTION_TEMPLATE
        .replace("{degree}", or_placeholder(degree, "A Degree"))
        .replace("{major}", or_placeholder(major, "A Major"))
        .replace("{university}", or_placeholder(university, "A University"))
        .replace("{no_preamble}", NO_PREAMBLE_INSTRUCTION)
}

pub fn project_description(title: &str, tech_stack: &str) -> String {
    PROJECT_DESCRIPTION_TEMPLATE
        .replace("{title}", or_placeholder(title, "A Project"))
        .replace("{tech_stack}", or_placeholder(tech_stack, "Various Technologies"))
        .replace("{no_preamble}", NO_PREAMBLE_INSTRUCTION)
}

pub fn certification_description(title: &str, issuer: &str, year: &str) -> String {
    CERTIFICATION_DESCRIPTION_TEMPLATE
        .replace("{title}", or_placeholder(title, "A Certification"))
        .replace("{issuer}", or_placeholder(issuer, "An Organization"))
        .replace("{year}", or_placeholder(year, "A Year"))
        .replace("{no_preamble}", NO_PREAMBLE_INSTRUCTION)
}

pub fn summary(job_title: &str) -> String {
    SUMMARY_TEMPLATE
        .replace("{job_title}", or_placeholder(job_title, DEFAULT_JOB_TITLE))
        .replace("{no_preamble}", NO_PREAMBLE_INSTRUCTION)
}
