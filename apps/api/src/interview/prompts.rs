// Interview prompt templates.
// Every template is filled by literal `{placeholder}` replacement; no other
// templating is applied.

use crate::llm_client::prompts::STYLE_DIRECTIVE;

pub const RESUME_ANALYSIS_PROMPT: &str = "\
You are an AI Interviewer. Analyze the following resume text to identify any Excel-related \
skills or projects. Summarize them if found. If not, state that none were found.

Resume text:
{resume_text}";

pub const INTRO_WITH_RESUME_PROMPT: &str = "\
You are an AI Interviewer named {interviewer_name}. Candidate: {candidate_name}. \
Based on their resume summary: {resume_summary}, introduce yourself and explain the \
interview structure. Avoid brackets.";

pub const INTRO_PROMPT: &str = "\
You are an AI Interviewer named {interviewer_name}. Candidate: {candidate_name}. \
Introduce yourself and explain the interview structure. Avoid brackets.";

pub const FIRST_QUESTION_PROMPT: &str = "\
You are an AI Interviewer {interviewer_name}. Candidate: {candidate_name}. \
Ask the first Excel-related question. {style}";

pub const NEXT_QUESTION_PROMPT: &str = "\
You are an AI Interviewer {interviewer_name}. Candidate: {candidate_name}. \
Based on history, ask the next Excel-related question. {style}";

pub const EVALUATION_PROMPT: &str = "\
You are an AI Interviewer {interviewer_name}. Candidate: {candidate_name}. \
Evaluate their answer: \"{answer}\". \
Begin your reply with a line of the exact form `Score: N` where N is a whole number from 0 to 10, \
then give short feedback. Avoid brackets.";

pub const FINAL_REPORT_PROMPT: &str = "\
You are an AI Interviewer {interviewer_name}. Candidate: {candidate_name}.
Provide a structured performance summary with:
**Overall Impression**
**Strengths**
**Areas for Improvement**
**Specific Examples**

Conversation History:
{transcript}";

/// Names interpolated into every interview prompt.
#[derive(Debug, Clone, Copy)]
pub struct Participants<'a> {
    pub candidate_name: &'a str,
    pub interviewer_name: &'a str,
}

impl Participants<'_> {
    fn fill(&self, template: &str, extra: &[(&str, &str)]) -> String {
        let mut values = vec![
            ("interviewer_name", self.interviewer_name),
            ("candidate_name", self.candidate_name),
            ("style", STYLE_DIRECTIVE),
        ];
        values.extend_from_slice(extra);
        fill(template, &values)
    }
}

/// Replaces `{key}` placeholders in one left-to-right pass. Substituted text
/// is never rescanned; unknown keys are left as written.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            values
                .iter()
                .find(|(key, _)| *key == &after[..close])
                .map(|(_, value)| (close, *value))
        });
        match known {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn resume_analysis(resume_text: &str) -> String {
    fill(RESUME_ANALYSIS_PROMPT, &[("resume_text", resume_text)])
}

pub fn intro(who: Participants<'_>, resume_summary: Option<&str>) -> String {
    match resume_summary {
        Some(summary) => who.fill(INTRO_WITH_RESUME_PROMPT, &[("resume_summary", summary)]),
        None => who.fill(INTRO_PROMPT, &[]),
    }
}

pub fn first_question(who: Participants<'_>) -> String {
    who.fill(FIRST_QUESTION_PROMPT, &[])
}

pub fn next_question(who: Participants<'_>) -> String {
    who.fill(NEXT_QUESTION_PROMPT, &[])
}

pub fn evaluation(who: Participants<'_>, answer: &str) -> String {
    who.fill(EVALUATION_PROMPT, &[("answer", answer)])
}

pub fn final_report(who: Participants<'_>, transcript: &str) -> String {
    who.fill(FINAL_REPORT_PROMPT, &[("transcript", transcript)])
}
