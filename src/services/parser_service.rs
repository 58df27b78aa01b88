use crate::models::question::{Difficulty, Question};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

static QUESTION_HEADING: OnceLock<Regex> = OnceLock::new();
static SECTION_HEADING: OnceLock<Regex> = OnceLock::new();
static KEYWORDS_LINE: OnceLock<Regex> = OnceLock::new();
static WEEK_IN_NAME: OnceLock<Regex> = OnceLock::new();

fn question_heading() -> &'static Regex {
    QUESTION_HEADING
        .get_or_init(|| Regex::new(r"(?i)^###\s*Q(\d+)\s*:\s*(.*)$").expect("valid regex"))
}

fn section_heading() -> &'static Regex {
    SECTION_HEADING.get_or_init(|| Regex::new(r"^#{1,2}\s+(.+)$").expect("valid regex"))
}

fn keywords_line() -> &'static Regex {
    KEYWORDS_LINE.get_or_init(|| {
        Regex::new(r"(?i)^\*\*Keywords:?\*\*:?\s*(.*)$").expect("valid regex")
    })
}

fn week_in_name() -> &'static Regex {
    WEEK_IN_NAME.get_or_init(|| Regex::new(r"(?i)week[\s_-]*(\d+)").expect("valid regex"))
}

#[derive(Debug)]
struct Draft {
    number: String,
    text: Vec<String>,
    keywords: Vec<String>,
    answer: Vec<String>,
    has_answer: bool,
    difficulty: Difficulty,
}

impl Draft {
    fn accepts_text(&self) -> bool {
        self.keywords.is_empty() && !self.has_answer
    }
}

/// Parses a markdown question bank into question records.
///
/// Questions are `### Q<n>: text` headings. Ids are `w<week>-q<n>` (or the
/// source slug when there is no week); a number repeated in the same file
/// gets a `-2`, `-3`, ... suffix. Level 1 and 2 headings naming a
/// difficulty tier switch the difficulty for the questions that follow;
/// before the first such heading questions are intermediate.
pub fn parse_question_bank(markdown: &str, week_number: Option<u32>, source: &str) -> Vec<Question> {
    let id_prefix = match week_number {
        Some(week) => format!("w{}", week),
        None => slugify(source),
    };

    let mut questions = Vec::new();
    let mut difficulty = Difficulty::Intermediate;
    let mut current: Option<Draft> = None;
    let mut in_details = false;

    for raw in markdown.lines() {
        let line = raw.trim();

        if in_details {
            if line.starts_with("</details>") {
                in_details = false;
            } else if let Some(draft) = current.as_mut() {
                if !line.starts_with("<summary") {
                    draft.answer.push(raw.trim_end().to_string());
                }
            }
            continue;
        }

        if let Some(caps) = question_heading().captures(line) {
            finish(&mut current, &mut questions, &id_prefix, week_number, source);
            let number = caps[1].trim_start_matches('0').to_string();
            let number = if number.is_empty() { "0".to_string() } else { number };
            let heading_text = caps[2].trim().to_string();
            current = Some(Draft {
                number,
                text: if heading_text.is_empty() { vec![] } else { vec![heading_text] },
                keywords: vec![],
                answer: vec![],
                has_answer: false,
                difficulty,
            });
            continue;
        }

        if line.starts_with('#') {
            finish(&mut current, &mut questions, &id_prefix, week_number, source);
            if let Some(caps) = section_heading().captures(line) {
                if let Some(tier) = section_difficulty(&caps[1]) {
                    difficulty = tier;
                }
            }
            continue;
        }

        let Some(draft) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = keywords_line().captures(line) {
            draft.keywords = caps[1]
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        } else if line.starts_with("<details") {
            draft.has_answer = true;
            in_details = true;
        } else if !line.is_empty() && line != "---" && draft.accepts_text() {
            draft.text.push(line.to_string());
        }
    }

    finish(&mut current, &mut questions, &id_prefix, week_number, source);
    disambiguate_ids(&mut questions);
    tracing::debug!(source, count = questions.len(), ?week_number, "Parsed question bank");
    questions
}

/// Extracts a week number from names like `week-3.md` or `Week_12 questions.md`.
pub fn week_number_from_name(name: &str) -> Option<u32> {
    week_in_name()
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

fn section_difficulty(title: &str) -> Option<Difficulty> {
    let title = title.to_lowercase();
    if title.contains("beginner") || title.contains("foundational") {
        Some(Difficulty::Beginner)
    } else if title.contains("intermediate") || title.contains("application") {
        Some(Difficulty::Intermediate)
    } else if title.contains("advanced") || title.contains("deep dive") {
        Some(Difficulty::Advanced)
    } else {
        None
    }
}

fn finish(
    current: &mut Option<Draft>,
    questions: &mut Vec<Question>,
    id_prefix: &str,
    week_number: Option<u32>,
    source: &str,
) {
    let Some(draft) = current.take() else {
        return;
    };
    let text = draft.text.join("\n").trim().to_string();
    if text.is_empty() {
        tracing::warn!(source, number = %draft.number, "Skipping question without text");
        return;
    }
    let answer = draft.answer.join("\n").trim().to_string();
    questions.push(Question {
        id: format!("{}-q{}", id_prefix, draft.number),
        week_number,
        difficulty: draft.difficulty,
        text,
        keywords: draft.keywords,
        model_answer: if answer.is_empty() { None } else { Some(answer) },
        source: if source.is_empty() { None } else { Some(source.to_string()) },
    });
}

// Numbering often restarts under each tier heading.
fn disambiguate_ids(questions: &mut [Question]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for question in questions.iter_mut() {
        let occurrence = seen.entry(question.id.clone()).or_insert(0);
        *occurrence += 1;
        if *occurrence > 1 {
            question.id = format!("{}-{}", question.id, occurrence);
        }
    }
}

fn slugify(source: &str) -> String {
    let stem = source.rsplit('/').next().unwrap_or(source);
    let stem = stem.strip_suffix(".md").unwrap_or(stem);
    let mut slug = String::with_capacity(stem.len());
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "bank".to_string()
    } else {
        slug
    }
}
