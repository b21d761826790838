//! Skill extraction: matches a fixed reference vocabulary of technology and
//! skill names against free text (job descriptions, CVs).

/// Reference vocabulary of skills recognized in free text. Read-only table
/// loaded once; never mutated at runtime.
pub const SKILL_VOCABULARY: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Python",
    "Java",
    "PHP",
    "C#",
    "HTML",
    "CSS",
    "SQL",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "Git",
    "Docker",
    "AWS",
    "Azure",
    "Linux",
    "Angular",
    "Vue.js",
    "Express",
    "Django",
    "Spring",
    "Adobe Photoshop",
    "Adobe Illustrator",
    "Design Graphique",
    "Arts Appliqués",
];

/// Baseline skills assumed when a job description mentions nothing from the
/// vocabulary, so scoring always has at least one signal to match against.
pub const DEFAULT_SKILLS: &[&str] = &["JavaScript", "HTML", "CSS"];

/// Extracts the vocabulary skills that occur as case-insensitive substrings
/// of `text`. Returns the default baseline set instead of an empty list.
/// Never fails.
pub fn extract_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();

    let found: Vec<String> = SKILL_VOCABULARY
        .iter()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect();

    if found.is_empty() {
        DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
    } else {
        found
    }
}
